//! Immutable quest definition: parameters, locations and jumps.
//!
//! A [`Quest`] is produced by an out-of-scope loader and never changes for
//! the lifetime of a play session, so it can be shared freely across
//! concurrently running sessions.

use serde::{Deserialize, Serialize};

/// Identifier of a jump edge. Negative values are reserved choice ids.
pub type JumpId = i32;
/// Identifier of a location node.
pub type LocationId = i32;

/// Gameplay role of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Plain numeric variable with no terminal semantics.
    #[default]
    Normal,
    /// Reaching the critical bound ends the quest successfully.
    Success,
    /// Reaching the critical bound fails the quest.
    Fail,
}

/// Which bound of a parameter counts as critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CritKind {
    /// The parameter never triggers a critical branch.
    #[default]
    None,
    /// Triggers when the value lands exactly on `max`.
    Maximum,
    /// Triggers when the value lands exactly on `min`.
    Minimum,
}

/// Three-valued visibility directive carried by a parameter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShowDirective {
    /// Leave the current visibility untouched.
    #[default]
    Unchanged,
    /// Make the parameter visible.
    Show,
    /// Hide the parameter.
    Hide,
}

/// One value-range display rule of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowingRange {
    pub from: i32,
    pub to: i32,
    /// Template rendered when the value falls inside `[from, to]`.
    #[serde(default)]
    pub text: String,
}

/// A bounded numeric game variable with display and critical semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Param {
    pub min: i32,
    pub max: i32,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub crit_type: CritKind,
    pub is_money: bool,
    pub active: bool,
    pub show_when_zero: bool,
    /// Starting-value formula, evaluated at initialization.
    pub starting: String,
    /// Ordered display rules; the first matching range wins.
    pub showing_info: Vec<ShowingRange>,
    /// Generic message shown when the parameter goes critical.
    pub crit_value_string: String,
    pub img: Option<String>,
}

impl Default for Param {
    fn default() -> Self {
        Self {
            min: 0,
            max: 0,
            param_type: ParamType::Normal,
            crit_type: CritKind::None,
            is_money: false,
            active: true,
            show_when_zero: false,
            starting: String::new(),
            showing_info: Vec::new(),
            crit_value_string: String::new(),
            img: None,
        }
    }
}

/// Per-parameter mutation attached to a jump or a location.
///
/// Exactly one of the value modes applies: absolute set, percentage,
/// formula, or (by default) additive delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParamChange {
    #[serde(default)]
    pub change: i32,
    #[serde(default)]
    pub showing: ShowDirective,
    #[serde(default)]
    pub is_change_value: bool,
    #[serde(default)]
    pub is_change_percentage: bool,
    #[serde(default)]
    pub is_change_formula: bool,
    #[serde(default)]
    pub changing_formula: String,
    /// Override message when this change drives the parameter critical.
    #[serde(default)]
    pub crit_text: String,
    #[serde(default)]
    pub img: Option<String>,
}

/// A node in the quest graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    #[serde(default)]
    pub is_starting: bool,
    /// Empty locations relay the arriving jump's description instead of
    /// their own text.
    #[serde(default)]
    pub is_empty: bool,
    #[serde(default)]
    pub is_faily: bool,
    #[serde(default)]
    pub is_faily_deadly: bool,
    #[serde(default)]
    pub is_success: bool,
    /// Ordered display texts; entries may be blank.
    #[serde(default)]
    pub texts: Vec<String>,
    /// Optional formula selecting the displayed text (1-based result).
    #[serde(default)]
    pub text_select_formula: Option<String>,
    /// One entry per parameter index.
    #[serde(default)]
    pub params_changes: Vec<ParamChange>,
}

impl Location {
    /// Text-selection formula, with blank strings treated as absent.
    #[must_use]
    pub fn selection_formula(&self) -> Option<&str> {
        self.text_select_formula
            .as_deref()
            .filter(|expr| !expr.trim().is_empty())
    }
}

/// A directed edge between locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Jump {
    pub id: JumpId,
    pub from_location_id: LocationId,
    pub to_location_id: LocationId,
    /// Choice label offered to the player.
    #[serde(default)]
    pub text: String,
    /// Narrative shown before arrival; blank means the jump is silent.
    #[serde(default)]
    pub description: String,
    /// Whether taking this jump consumes an in-game day.
    #[serde(default)]
    pub day_passed: bool,
    /// Sort key for the order choices are offered in.
    #[serde(default)]
    pub showing_order: i32,
    /// One entry per parameter index.
    #[serde(default)]
    pub params_changes: Vec<ParamChange>,
    #[serde(default)]
    pub img: Option<String>,
}

/// The compiled, read-only definition of a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub params_count: usize,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub jumps: Vec<Jump>,
    /// Mission briefing shown on the task screen.
    #[serde(default)]
    pub task_text: String,
    /// Epilogue shown after returning to the ship.
    #[serde(default)]
    pub success_text: String,
}

impl Quest {
    /// Parse a quest definition from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a quest.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a location by id.
    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    /// Look up a jump by id.
    #[must_use]
    pub fn jump(&self, id: JumpId) -> Option<&Jump> {
        self.jumps.iter().find(|jump| jump.id == id)
    }

    /// The first location flagged as starting, if any.
    #[must_use]
    pub fn starting_location(&self) -> Option<&Location> {
        self.locations.iter().find(|location| location.is_starting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quest_parses_camel_case_json() {
        let json = r#"{
            "paramsCount": 1,
            "params": [
                {
                    "min": 0,
                    "max": 10,
                    "type": "fail",
                    "critType": "minimum",
                    "starting": "[5]",
                    "critValueString": "Out of fuel",
                    "showingInfo": [
                        { "from": 0, "to": 10, "text": "Fuel: <>" }
                    ]
                }
            ],
            "locations": [
                {
                    "id": 1,
                    "isStarting": true,
                    "texts": ["Hangar bay"],
                    "paramsChanges": [ {} ]
                }
            ],
            "jumps": [
                {
                    "id": 7,
                    "fromLocationId": 1,
                    "toLocationId": 1,
                    "text": "Refuel",
                    "dayPassed": true,
                    "paramsChanges": [ { "change": 3 } ]
                }
            ],
            "taskText": "Deliver the cargo",
            "successText": "Well done"
        }"#;

        let quest = Quest::from_json(json).expect("quest parses");
        assert_eq!(quest.params_count, 1);
        assert_eq!(quest.params[0].param_type, ParamType::Fail);
        assert_eq!(quest.params[0].crit_type, CritKind::Minimum);
        assert!(quest.params[0].active, "active defaults to true");
        assert_eq!(quest.starting_location().map(|l| l.id), Some(1));
        assert_eq!(quest.jump(7).map(|j| j.to_location_id), Some(1));
        assert!(quest.jump(7).is_some_and(|j| j.day_passed));
    }

    #[test]
    fn blank_selection_formula_counts_as_absent() {
        let location = Location {
            id: 3,
            is_starting: false,
            is_empty: false,
            is_faily: false,
            is_faily_deadly: false,
            is_success: false,
            texts: vec![],
            text_select_formula: Some("   ".to_string()),
            params_changes: vec![],
        };
        assert!(location.selection_formula().is_none());
    }
}
