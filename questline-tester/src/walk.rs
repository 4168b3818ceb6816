//! Seeded random-walk playthroughs with invariant checks.

use anyhow::{Context, Result, bail, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use questline_game::{
    GameState, LiteralFormula, PlainText, PlayState, PlayerIdentity, Quest, QuestEngine, Stage,
};

/// Settings for one batch of walks.
#[derive(Debug, Clone)]
pub struct WalkConfig {
    pub max_steps: usize,
    pub verbose: bool,
}

/// Outcome of a single seeded walk.
#[derive(Debug, Clone)]
pub struct WalkReport {
    pub seed: String,
    pub steps: usize,
    pub outcome: PlayState,
    pub finished: bool,
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for byte in bytes {
        hash = (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn check_invariants(quest: &Quest, state: &GameState) -> Result<()> {
    ensure!(
        state.param_values.len() == quest.params_count,
        "parameter vector length {} diverged from paramsCount {}",
        state.param_values.len(),
        quest.params_count
    );
    ensure!(
        state.param_show.len() == quest.params_count,
        "visibility vector length diverged"
    );
    for (index, (value, param)) in state.param_values.iter().zip(&quest.params).enumerate() {
        ensure!(
            (param.min..=param.max).contains(value),
            "parameter {index} value {value} escaped [{}, {}]",
            param.min,
            param.max
        );
    }
    Ok(())
}

fn check_round_trip(state: &GameState) -> Result<()> {
    let json = serde_json::to_string(state).context("serializing state")?;
    let restored: GameState = serde_json::from_str(&json).context("deserializing state")?;
    ensure!(restored == *state, "state changed across a JSON round trip");
    Ok(())
}

/// Play one quest from `seed` until it ends or `max_steps` runs out,
/// checking engine invariants after every transition.
pub fn run_walk(quest: &Quest, seed: &str, config: &WalkConfig) -> Result<WalkReport> {
    let engine = QuestEngine::new(quest, LiteralFormula, PlainText)
        .context("wrapping quest in an engine")?;
    let player = PlayerIdentity::default_eng();
    let mut pick_rng = ChaCha8Rng::seed_from_u64(fnv1a64(seed.as_bytes()));

    let mut state = engine.init_game(seed).context("initializing game")?;
    check_invariants(quest, &state)?;

    let mut steps = 0;
    let mut outcome = PlayState::Running;
    let mut finished = false;

    while steps < config.max_steps {
        let view = engine
            .ui_state(&state, &player)
            .context("projecting the current state")?;
        outcome = view.game_state;

        if view.game_state != PlayState::Running || view.choices.is_empty() {
            finished = view.game_state != PlayState::Running;
            break;
        }
        let active: Vec<_> = view
            .choices
            .iter()
            .filter(|choice| choice.active)
            .collect();
        if active.is_empty() {
            bail!("no active choice at step {steps} (state `{}`)", state.stage.tag());
        }
        let choice = active[pick_rng.random_range(0..active.len())];
        if config.verbose {
            log::info!(
                "seed {seed} step {steps}: `{}` (jump {})",
                choice.text,
                choice.jump_id
            );
        }

        let next = engine
            .perform_jump(&state, choice.jump_id)
            .with_context(|| format!("taking jump {} at step {steps}", choice.jump_id))?;
        check_invariants(quest, &next)?;
        check_round_trip(&next)?;

        state = next;
        steps += 1;
        if state.stage == Stage::ReturnedEnding {
            let view = engine.ui_state(&state, &player).context("ending view")?;
            outcome = view.game_state;
            finished = true;
            break;
        }
    }

    Ok(WalkReport {
        seed: seed.to_string(),
        steps,
        outcome,
        finished,
    })
}

/// Run the same walk twice and insist both histories agree, transition by
/// transition.
pub fn check_replay(quest: &Quest, seed: &str, config: &WalkConfig) -> Result<()> {
    let quiet = WalkConfig {
        verbose: false,
        ..config.clone()
    };
    let first = run_walk(quest, seed, &quiet)?;
    let second = run_walk(quest, seed, &quiet)?;
    ensure!(
        first.steps == second.steps && first.outcome == second.outcome,
        "replay diverged for seed {seed}: {} steps ({:?}) vs {} steps ({:?})",
        first.steps,
        first.outcome,
        second.steps,
        second.outcome
    );
    Ok(())
}
