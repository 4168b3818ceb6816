//! The transition engine: session initialization and the `perform_jump`
//! automaton step.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::EngineError;
use crate::collab::FormulaEvaluator;
use crate::constants::{JUMP_GO_BACK_TO_SHIP, MONEY_STARTING_CAP};
use crate::images::{self, ImageAssociation};
use crate::params::apply_param_changes;
use crate::quest::{Jump, JumpId, Quest};
use crate::rng::GameRng;
use crate::state::{GameState, PossibleJump, Stage};

/// Build the starting state for a quest from a seed string.
///
/// Money parameters ignore their authored starting formula and begin at
/// `min(max, 2000)`. Starting formulas of active parameters are evaluated
/// in index order against a single threaded RNG so initialization is fully
/// deterministic in the seed.
pub(crate) fn init_game<F: FormulaEvaluator>(
    quest: &Quest,
    seed: &str,
    formula: &F,
) -> Result<GameState, EngineError> {
    let mut rng = GameRng::from_seed_str(seed);
    let start = quest
        .starting_location()
        .ok_or(EngineError::NoStartingLocation)?;

    let mut values = Vec::with_capacity(quest.params_count);
    for param in &quest.params {
        if !param.active {
            values.push(0);
            continue;
        }
        let starting: Cow<'_, str> = if param.is_money {
            Cow::Owned(format!("[{}]", param.max.min(MONEY_STARTING_CAP)))
        } else {
            Cow::Borrowed(param.starting.as_str())
        };
        values.push(formula.eval(&starting, &[], &mut |bound| rng.random(bound))?);
    }

    Ok(GameState {
        stage: Stage::Starting,
        location_id: start.id,
        last_jump_id: None,
        possible_jumps: Vec::new(),
        param_values: values,
        param_show: vec![true; quest.params_count],
        jumped_count: BTreeMap::new(),
        location_visit_count: BTreeMap::new(),
        days_passed: 0,
        image_filename: None,
        alea_state: rng.export_state(),
    })
}

/// Advance the automaton by one player choice.
///
/// The reserved "go back to ship" choice short-circuits to the ending from
/// any stage. Otherwise the current stage decides the action; stages that
/// cannot accept a choice are an internal error.
pub(crate) fn perform_jump<F: FormulaEvaluator>(
    quest: &Quest,
    state: &GameState,
    jump_id: JumpId,
    images: &[ImageAssociation],
    formula: &F,
) -> Result<GameState, EngineError> {
    let mut rng = GameRng::from_state(&state.alea_state);
    let mut next = state.clone();

    if jump_id == JUMP_GO_BACK_TO_SHIP {
        next.stage = Stage::ReturnedEnding;
        next.alea_state = rng.export_state();
        return Ok(next);
    }

    // Illustration for this transition: explicit art on the jump being
    // shown wins over the association table keyed by the chosen id.
    let shown_jump = next.last_jump_id.and_then(|id| quest.jump(id));
    let image = shown_jump
        .and_then(|jump| images::explicit_art(jump.img.as_deref()))
        .or_else(|| images::jump_image(images, jump_id));
    if let Some(image) = image {
        next.image_filename = Some(image);
    }

    match next.stage {
        Stage::Starting => {
            next.stage = Stage::Location;
            enter_location(quest, &mut next)?;
        }
        Stage::Jump => {
            let last_id = next
                .last_jump_id
                .ok_or(EngineError::MissingLastJump("jump"))?;
            let jump = quest.jump(last_id).ok_or(EngineError::JumpNotFound(last_id))?;
            next.location_id = jump.to_location_id;
            next.stage = Stage::Location;
            enter_location(quest, &mut next)?;
        }
        Stage::Location => {
            take_jump(quest, &mut next, jump_id, images, formula, &mut rng)?;
        }
        Stage::JumpAndNextCrit { crit_param } => {
            next.stage = Stage::CritOnJump { crit_param };
            let jump = next.last_jump_id.and_then(|id| quest.jump(id));
            if let Some(image) = resolve_crit_image(quest, images, jump, crit_param) {
                next.image_filename = Some(image);
            }
        }
        Stage::CritOnLocation { crit_param } => {
            next.stage = Stage::CritOnLocationLastMessage { crit_param };
        }
        Stage::CritOnJump { .. } | Stage::CritOnLocationLastMessage { .. } | Stage::ReturnedEnding => {
            return Err(EngineError::UnexpectedStage(next.stage.tag()));
        }
    }

    next.alea_state = rng.export_state();
    Ok(next)
}

/// The `location` stage action: validate the choice, account for it, apply
/// the jump's parameter changes and pick the follow-up stage.
fn take_jump<F: FormulaEvaluator>(
    quest: &Quest,
    next: &mut GameState,
    jump_id: JumpId,
    images: &[ImageAssociation],
    formula: &F,
    rng: &mut GameRng,
) -> Result<(), EngineError> {
    if !next.possible_jumps.iter().any(|offer| offer.id == jump_id) {
        return Err(EngineError::JumpNotOffered {
            jump_id,
            location_id: next.location_id,
        });
    }
    let jump = quest.jump(jump_id).ok_or(EngineError::JumpNotFound(jump_id))?;

    next.last_jump_id = Some(jump_id);
    if jump.day_passed {
        next.days_passed += 1;
    }
    *next.jumped_count.entry(jump_id).or_insert(0) += 1;

    let triggered = apply_param_changes(
        quest,
        next,
        &jump.params_changes,
        formula,
        &mut |bound| rng.random(bound),
    )?;

    let destination = quest
        .location(jump.to_location_id)
        .ok_or(EngineError::LocationNotFound(jump.to_location_id))?;

    if jump.description.is_empty() {
        if let Some(&crit_param) = triggered.first() {
            next.stage = Stage::CritOnJump { crit_param };
            if let Some(image) = resolve_crit_image(quest, images, Some(jump), crit_param) {
                next.image_filename = Some(image);
            }
        } else {
            next.location_id = destination.id;
            next.stage = Stage::Location;
            enter_location(quest, next)?;
        }
    } else if let Some(&crit_param) = triggered.first() {
        next.stage = Stage::JumpAndNextCrit { crit_param };
    } else if destination.is_empty {
        next.location_id = destination.id;
        next.stage = Stage::Location;
        enter_location(quest, next)?;
    } else {
        next.stage = Stage::Jump;
    }
    Ok(())
}

/// Location-entry accounting: bump the re-entry counter (first entry
/// records 0) and rebuild the offered jumps in display order.
fn enter_location(quest: &Quest, state: &mut GameState) -> Result<(), EngineError> {
    let location = quest
        .location(state.location_id)
        .ok_or(EngineError::LocationNotFound(state.location_id))?;

    let visits = state
        .location_visit_count
        .get(&location.id)
        .map_or(0, |count| count + 1);
    state.location_visit_count.insert(location.id, visits);

    let mut offered: Vec<&Jump> = quest
        .jumps
        .iter()
        .filter(|jump| jump.from_location_id == location.id)
        .collect();
    offered.sort_by_key(|jump| (jump.showing_order, jump.id));
    state.possible_jumps = offered
        .into_iter()
        .map(|jump| PossibleJump {
            id: jump.id,
            active: true,
        })
        .collect();
    Ok(())
}

/// Crit illustration precedence: the change's own art, then the
/// parameter's art, then the association table.
fn resolve_crit_image(
    quest: &Quest,
    images: &[ImageAssociation],
    jump: Option<&Jump>,
    crit_param: usize,
) -> Option<String> {
    let from_change = jump
        .and_then(|jump| jump.params_changes.get(crit_param))
        .and_then(|change| change.img.as_deref())
        .filter(|name| !name.is_empty());
    let explicit = from_change.or_else(|| {
        quest
            .params
            .get(crit_param)
            .and_then(|param| param.img.as_deref())
            .filter(|name| !name.is_empty())
    });
    explicit
        .map(images::art_filename)
        .or_else(|| images::crit_image(images, crit_param))
}
