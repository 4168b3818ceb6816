//! View projection: the player-facing rendering of a game state.
//!
//! Projection is pure. It consumes RNG draws only from a throwaway
//! generator rebuilt from the persisted state vector, so viewing a state
//! any number of times never changes what happens next.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::EngineError;
use crate::collab::{FormulaEvaluator, TextRenderer};
use crate::constants::{JUMP_GO_BACK_TO_SHIP, JUMP_I_AGREE, JUMP_NEXT};
use crate::quest::{Jump, JumpId, Location, ParamType, Quest};
use crate::rng::GameRng;
use crate::state::{GameState, Stage};
use crate::text::{PlayerIdentity, TemplateVars, template_vars};

/// Overall outcome communicated alongside a projected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Running,
    Fail,
    Win,
    Dead,
}

/// One selectable choice in a projected view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerChoice {
    pub text: String,
    pub jump_id: JumpId,
    pub active: bool,
}

/// The player-visible projection of a game state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub text: String,
    pub image_file_name: Option<String>,
    /// Rendered parameter summaries, in parameter order.
    pub params_state: Vec<String>,
    pub choices: Vec<PlayerChoice>,
    pub game_state: PlayState,
}

struct Projector<'a, F, T> {
    quest: &'a Quest,
    state: &'a GameState,
    player: &'a PlayerIdentity,
    formula: &'a F,
    renderer: &'a T,
    vars: TemplateVars,
    rng: GameRng,
}

/// Project `state` into what the player sees.
pub(crate) fn ui_state<F: FormulaEvaluator, T: TextRenderer>(
    quest: &Quest,
    state: &GameState,
    player: &PlayerIdentity,
    formula: &F,
    renderer: &T,
    base_date: NaiveDate,
) -> Result<PlayerState, EngineError> {
    let mut projector = Projector {
        quest,
        state,
        player,
        formula,
        renderer,
        vars: template_vars(player, state.days_passed, base_date),
        rng: GameRng::from_state(&state.alea_state),
    };
    projector.project()
}

impl<'a, F: FormulaEvaluator, T: TextRenderer> Projector<'a, F, T> {
    fn project(&mut self) -> Result<PlayerState, EngineError> {
        let labels = self.player.lang.labels();
        match self.state.stage {
            Stage::Starting => Ok(PlayerState {
                text: self.render(&self.quest.task_text, None),
                image_file_name: None,
                params_state: Vec::new(),
                choices: vec![PlayerChoice {
                    text: labels.i_agree.to_string(),
                    jump_id: JUMP_I_AGREE,
                    active: true,
                }],
                game_state: PlayState::Running,
            }),
            Stage::Jump | Stage::JumpAndNextCrit { .. } => {
                let jump = self.last_jump()?;
                Ok(PlayerState {
                    text: self.render(&jump.description, None),
                    image_file_name: self.state.image_filename.clone(),
                    params_state: self.params_state(),
                    choices: vec![PlayerChoice {
                        text: labels.next.to_string(),
                        jump_id: JUMP_NEXT,
                        active: true,
                    }],
                    game_state: PlayState::Running,
                })
            }
            Stage::Location => self.project_location(false),
            Stage::CritOnLocation { .. } => self.project_location(true),
            Stage::CritOnJump { crit_param } => {
                let jump = self.last_jump()?;
                let template = jump
                    .params_changes
                    .get(crit_param)
                    .map(|change| change.crit_text.as_str())
                    .filter(|text| !text.is_empty())
                    .unwrap_or(self.quest.params[crit_param].crit_value_string.as_str());
                Ok(self.project_crit(template, crit_param))
            }
            Stage::CritOnLocationLastMessage { crit_param } => {
                let location = self.location()?;
                let template = location
                    .params_changes
                    .get(crit_param)
                    .map(|change| change.crit_text.as_str())
                    .filter(|text| !text.is_empty())
                    .unwrap_or(self.quest.params[crit_param].crit_value_string.as_str());
                Ok(self.project_crit(template, crit_param))
            }
            Stage::ReturnedEnding => Ok(PlayerState {
                text: self.render(&self.quest.success_text, None),
                image_file_name: None,
                params_state: Vec::new(),
                choices: Vec::new(),
                game_state: PlayState::Win,
            }),
        }
    }

    fn project_location(&mut self, crit_pending: bool) -> Result<PlayerState, EngineError> {
        let location = self.location()?;
        let text_index = self.location_text_index(location)?;
        let own_text = location
            .texts
            .get(text_index)
            .map_or("", String::as_str);

        // An empty location relays the description of the jump that led
        // into it instead of its own text.
        let last_jump = self.state.last_jump_id.and_then(|id| self.quest.jump(id));
        let template = match last_jump {
            Some(jump) if location.is_empty && !jump.description.is_empty() => {
                jump.description.as_str()
            }
            _ => own_text,
        };
        let text = self.render(template, None);
        let params_state = self.params_state();

        let labels = self.player.lang.labels();
        let choices = if crit_pending {
            vec![PlayerChoice {
                text: labels.next.to_string(),
                jump_id: JUMP_NEXT,
                active: true,
            }]
        } else if location.is_faily || location.is_faily_deadly {
            Vec::new()
        } else if location.is_success {
            vec![PlayerChoice {
                text: labels.go_back_to_ship.to_string(),
                jump_id: JUMP_GO_BACK_TO_SHIP,
                active: true,
            }]
        } else {
            let mut choices = Vec::with_capacity(self.state.possible_jumps.len());
            for offer in &self.state.possible_jumps {
                let jump = self
                    .quest
                    .jump(offer.id)
                    .ok_or(EngineError::JumpNotFound(offer.id))?;
                let rendered = self.render(&jump.text, None);
                choices.push(PlayerChoice {
                    text: if rendered.is_empty() {
                        labels.next.to_string()
                    } else {
                        rendered
                    },
                    jump_id: offer.id,
                    active: offer.active,
                });
            }
            choices
        };

        let game_state = if location.is_faily_deadly {
            PlayState::Dead
        } else if location.is_faily {
            PlayState::Fail
        } else {
            PlayState::Running
        };

        Ok(PlayerState {
            text,
            image_file_name: self.state.image_filename.clone(),
            params_state,
            choices,
            game_state,
        })
    }

    fn project_crit(&mut self, template: &str, crit_param: usize) -> PlayerState {
        let labels = self.player.lang.labels();
        let param_type = self.quest.params[crit_param].param_type;
        let choices = if param_type == ParamType::Success {
            vec![PlayerChoice {
                text: labels.go_back_to_ship.to_string(),
                jump_id: JUMP_GO_BACK_TO_SHIP,
                active: true,
            }]
        } else {
            Vec::new()
        };
        PlayerState {
            text: self.render(template, None),
            image_file_name: self.state.image_filename.clone(),
            params_state: self.params_state(),
            choices,
            game_state: match param_type {
                ParamType::Success => PlayState::Running,
                ParamType::Fail => PlayState::Fail,
                ParamType::Normal => PlayState::Dead,
            },
        }
    }

    /// Displayed text index for a location: formula-selected (1-based, out
    /// of range degrades to 0 with a warning) or round-robin over the
    /// non-blank texts by visit count.
    fn location_text_index(&mut self, location: &Location) -> Result<usize, EngineError> {
        if let Some(expr) = location.selection_formula() {
            let raw = {
                let rng = &mut self.rng;
                self.formula
                    .eval(expr, &self.state.param_values, &mut |bound| {
                        rng.random(bound)
                    })?
            };
            let selected = usize::try_from(i64::from(raw) - 1).ok();
            let chosen = selected.filter(|&index| {
                location
                    .texts
                    .get(index)
                    .is_some_and(|text| !text.is_empty())
            });
            if let Some(index) = chosen {
                return Ok(index);
            }
            log::warn!(
                "location id={} text formula selected index {} with no text, showing text 0",
                location.id,
                i64::from(raw) - 1
            );
            return Ok(0);
        }

        let non_blank: Vec<usize> = location
            .texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(index, _)| index)
            .collect();
        if non_blank.is_empty() {
            return Ok(0);
        }
        let turn = self.state.visit_count(location.id) as usize % non_blank.len();
        Ok(non_blank[turn])
    }

    /// Rendered summaries of every active, shown, displayable parameter.
    fn params_state(&mut self) -> Vec<String> {
        let mut rows = Vec::new();
        for index in 0..self.quest.params_count {
            let param = &self.quest.params[index];
            if !self.state.param_show[index] || !param.active {
                continue;
            }
            let value = self.state.param_values[index];
            if value == 0 && !param.show_when_zero {
                continue;
            }
            let matched = param
                .showing_info
                .iter()
                .find(|range| value >= range.from && value <= range.to);
            if let Some(range) = matched {
                rows.push(self.render(&range.text, Some(index)));
            }
        }
        rows
    }

    fn render(&mut self, template: &str, placeholder_index: Option<usize>) -> String {
        let rng = &mut self.rng;
        self.renderer.substitute(
            template,
            &self.vars,
            &self.state.param_values,
            &mut |bound| rng.random(bound),
            placeholder_index,
        )
    }

    fn location(&self) -> Result<&'a Location, EngineError> {
        self.quest
            .location(self.state.location_id)
            .ok_or(EngineError::LocationNotFound(self.state.location_id))
    }

    fn last_jump(&self) -> Result<&'a Jump, EngineError> {
        let id = self
            .state
            .last_jump_id
            .ok_or(EngineError::MissingLastJump(self.state.stage.tag()))?;
        self.quest.jump(id).ok_or(EngineError::JumpNotFound(id))
    }
}
