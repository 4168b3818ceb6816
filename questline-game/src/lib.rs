//! Questline Rules Engine
//!
//! Platform-agnostic interpreter for branching text quests. Given a
//! compiled quest definition and a current game state, the engine
//! deterministically computes the next state after a player choice and the
//! player-visible projection of any state. All I/O, persistence and
//! rendering belong to the host; this crate performs pure computation only.

pub mod collab;
pub mod constants;
pub mod images;
pub mod numbers;
pub mod params;
pub mod quest;
pub mod rng;
pub mod state;
pub mod text;
mod transition;
mod view;

use chrono::NaiveDate;
use thiserror::Error;

// Re-export commonly used types
pub use collab::{FormulaError, FormulaEvaluator, LiteralFormula, PlainText, TextRenderer};
pub use constants::{JUMP_GO_BACK_TO_SHIP, JUMP_I_AGREE, JUMP_NEXT};
pub use images::ImageAssociation;
pub use quest::{
    CritKind, Jump, JumpId, Location, LocationId, Param, ParamChange, ParamType, Quest,
    ShowDirective, ShowingRange,
};
pub use rng::{GameRng, RngState};
pub use state::{GameState, PossibleJump, Stage};
pub use text::{ChoiceLabels, Lang, PlayerIdentity, TemplateVars};
pub use view::{PlayState, PlayerChoice, PlayerState};

/// Errors raised by the engine. Fatal variants indicate corrupt quest data
/// or a defect in the caller; none of them are recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("quest has no starting location")]
    NoStartingLocation,
    #[error("location id={0} is not defined in the quest")]
    LocationNotFound(LocationId),
    #[error("jump id={0} is not defined in the quest")]
    JumpNotFound(JumpId),
    #[error("jump id={jump_id} is not offered at location id={location_id}")]
    JumpNotOffered {
        jump_id: JumpId,
        location_id: LocationId,
    },
    #[error("state `{0}` carries no last jump")]
    MissingLastJump(&'static str),
    #[error("state `{0}` cannot accept a player choice")]
    UnexpectedStage(&'static str),
    #[error("malformed quest: {0}")]
    MalformedQuest(String),
    #[error(transparent)]
    Formula(#[from] FormulaError),
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a game state under a slot name.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, slot: &str, state: &GameState) -> Result<(), Self::Error>;

    /// Load a game state from a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, slot: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete a saved game.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, slot: &str) -> Result<(), Self::Error>;
}

/// The engine facade: one quest plus its injected collaborators.
///
/// The quest is read-only for the engine's lifetime and may be shared
/// across concurrently running sessions, each with its own [`GameState`].
pub struct QuestEngine<'q, F, T> {
    quest: &'q Quest,
    formula: F,
    renderer: T,
    images: Vec<ImageAssociation>,
    base_date: Option<NaiveDate>,
}

impl<'q, F, T> QuestEngine<'q, F, T>
where
    F: FormulaEvaluator,
    T: TextRenderer,
{
    /// Wrap a quest with its formula and substitution collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedQuest`] when the definition violates
    /// structural invariants (parameter table sizes, inverted bounds), so
    /// the transition and projection paths can index it without re-checks.
    pub fn new(quest: &'q Quest, formula: F, renderer: T) -> Result<Self, EngineError> {
        validate_quest(quest)?;
        Ok(Self {
            quest,
            formula,
            renderer,
            images: Vec::new(),
            base_date: None,
        })
    }

    /// Attach the image-association table consulted when no explicit art
    /// is set.
    #[must_use]
    pub fn with_images(mut self, images: Vec<ImageAssociation>) -> Self {
        self.images = images;
        self
    }

    /// Pin the base calendar date used by the date template variables
    /// (defaults to today).
    #[must_use]
    pub fn with_base_date(mut self, date: NaiveDate) -> Self {
        self.base_date = Some(date);
        self
    }

    /// The quest this engine interprets.
    #[must_use]
    pub const fn quest(&self) -> &'q Quest {
        self.quest
    }

    /// Build the starting state from a seed string.
    ///
    /// # Errors
    ///
    /// Fails when the quest has no starting location or a starting formula
    /// cannot be evaluated.
    pub fn init_game(&self, seed: &str) -> Result<GameState, EngineError> {
        transition::init_game(self.quest, seed, &self.formula)
    }

    /// Advance the automaton by one player choice, returning the new state.
    /// The input state is never modified.
    ///
    /// # Errors
    ///
    /// Fails on unknown ids, a choice that is not currently offered, a
    /// stage that cannot accept choices, or a formula error.
    pub fn perform_jump(&self, state: &GameState, jump_id: JumpId) -> Result<GameState, EngineError> {
        transition::perform_jump(self.quest, state, jump_id, &self.images, &self.formula)
    }

    /// Project a state into what the player sees. Never mutates the state
    /// or advances its RNG sequence.
    ///
    /// # Errors
    ///
    /// Fails on dangling ids inside the state or a formula error.
    pub fn ui_state(
        &self,
        state: &GameState,
        player: &PlayerIdentity,
    ) -> Result<PlayerState, EngineError> {
        let base_date = self.base_date.unwrap_or_else(text::today);
        view::ui_state(self.quest, state, player, &self.formula, &self.renderer, base_date)
    }
}

fn validate_quest(quest: &Quest) -> Result<(), EngineError> {
    if quest.params.len() != quest.params_count {
        return Err(EngineError::MalformedQuest(format!(
            "paramsCount is {} but {} parameters are defined",
            quest.params_count,
            quest.params.len()
        )));
    }
    for (index, param) in quest.params.iter().enumerate() {
        if param.min > param.max {
            return Err(EngineError::MalformedQuest(format!(
                "parameter {} has min {} above max {}",
                index, param.min, param.max
            )));
        }
    }
    for location in &quest.locations {
        if location.params_changes.len() != quest.params_count {
            return Err(EngineError::MalformedQuest(format!(
                "location id={} defines {} parameter changes, expected {}",
                location.id,
                location.params_changes.len(),
                quest.params_count
            )));
        }
    }
    for jump in &quest.jumps {
        if jump.params_changes.len() != quest.params_count {
            return Err(EngineError::MalformedQuest(format!(
                "jump id={} defines {} parameter changes, expected {}",
                jump.id,
                jump.params_changes.len(),
                quest.params_count
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    fn minimal_quest() -> Quest {
        Quest {
            params_count: 0,
            params: vec![],
            locations: vec![Location {
                id: 1,
                is_starting: true,
                is_empty: false,
                is_faily: false,
                is_faily_deadly: false,
                is_success: false,
                texts: vec!["Start".to_string()],
                text_select_formula: None,
                params_changes: vec![],
            }],
            jumps: vec![],
            task_text: "Task".to_string(),
            success_text: "Done".to_string(),
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, GameState>>>,
    }

    impl GameStorage for MemoryStorage {
        type Error = Infallible;

        fn save_game(&self, slot: &str, state: &GameState) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(slot.to_string(), state.clone());
            Ok(())
        }

        fn load_game(&self, slot: &str) -> Result<Option<GameState>, Self::Error> {
            Ok(self.saves.borrow().get(slot).cloned())
        }

        fn delete_save(&self, slot: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(slot);
            Ok(())
        }
    }

    #[test]
    fn engine_rejects_mismatched_parameter_tables() {
        let mut quest = minimal_quest();
        quest.params_count = 2;
        let result = QuestEngine::new(&quest, LiteralFormula, PlainText);
        assert!(matches!(result, Err(EngineError::MalformedQuest(_))));
    }

    #[test]
    fn engine_initializes_and_projects_the_task_screen() {
        let quest = minimal_quest();
        let engine = QuestEngine::new(&quest, LiteralFormula, PlainText).expect("valid quest");
        let state = engine.init_game("seed").expect("init");
        assert_eq!(state.stage, Stage::Starting);

        let view = engine
            .ui_state(&state, &PlayerIdentity::default_eng())
            .expect("projection");
        assert_eq!(view.text, "Task");
        assert_eq!(view.choices.len(), 1);
        assert_eq!(view.choices[0].jump_id, JUMP_I_AGREE);
        assert_eq!(view.game_state, PlayState::Running);
    }

    #[test]
    fn storage_round_trip_preserves_the_session() {
        let quest = minimal_quest();
        let engine = QuestEngine::new(&quest, LiteralFormula, PlainText).expect("valid quest");
        let state = engine.init_game("slot-seed").expect("init");

        let storage = MemoryStorage::default();
        storage.save_game("slot-one", &state).expect("save");

        let loaded = storage
            .load_game("slot-one")
            .expect("load")
            .expect("save exists");
        assert_eq!(loaded, state);
        assert!(storage.load_game("missing").expect("load").is_none());

        storage.delete_save("slot-one").expect("delete");
        assert!(storage.load_game("slot-one").expect("load").is_none());
    }
}
