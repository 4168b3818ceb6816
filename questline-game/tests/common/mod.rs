//! Shared fixtures for the integration suites.

use questline_game::{
    CritKind, Jump, Location, LiteralFormula, Param, ParamChange, ParamType, PlainText, Quest,
    QuestEngine,
};

/// Engine wrapper with the fixture collaborators.
pub fn engine(quest: &Quest) -> QuestEngine<'_, LiteralFormula, PlainText> {
    QuestEngine::new(quest, LiteralFormula, PlainText).expect("fixture quest is well formed")
}

fn location(id: i32, text: &str) -> Location {
    Location {
        id,
        texts: vec![text.to_string()],
        params_changes: vec![ParamChange::default()],
        ..Location::default()
    }
}

fn jump(id: i32, from: i32, to: i32, text: &str) -> Jump {
    Jump {
        id,
        from_location_id: from,
        to_location_id: to,
        text: text.to_string(),
        params_changes: vec![ParamChange::default()],
        ..Jump::default()
    }
}

/// One money parameter, a starting location and a single labeled jump to an
/// empty destination with no critical changes.
pub fn money_quest() -> Quest {
    let mut start = location(1, "Docking bay");
    start.is_starting = true;
    let mut destination = location(2, "");
    destination.is_empty = true;

    Quest {
        params_count: 1,
        params: vec![Param {
            min: 0,
            max: 65535,
            is_money: true,
            ..Param::default()
        }],
        locations: vec![start, destination],
        jumps: vec![jump(100, 1, 2, "Fly out")],
        task_text: "Deliver the parcel".to_string(),
        success_text: "The parcel arrives".to_string(),
    }
}

/// A small loop with a day-consuming jump and two critical parameters that
/// can be driven to their maximum at once.
pub fn crit_quest(second_param_type: ParamType) -> Quest {
    let crit = |param_type| Param {
        min: 0,
        max: 10,
        param_type,
        crit_type: CritKind::Maximum,
        starting: "[0]".to_string(),
        crit_value_string: "Critical".to_string(),
        ..Param::default()
    };

    let mut start = location(1, "Bridge");
    start.is_starting = true;
    let cabin = location(2, "Cabin");

    let mut both = jump(10, 1, 2, "Push everything");
    both.params_changes = vec![
        ParamChange {
            change: 10,
            ..ParamChange::default()
        },
        ParamChange {
            change: 10,
            ..ParamChange::default()
        },
    ];
    let mut second_only = jump(15, 1, 2, "Push the second dial");
    second_only.params_changes = vec![
        ParamChange::default(),
        ParamChange {
            change: 10,
            ..ParamChange::default()
        },
    ];
    let mut rest = jump(20, 1, 2, "Rest");
    rest.day_passed = true;
    rest.params_changes = vec![ParamChange::default(), ParamChange::default()];
    let mut back = jump(30, 2, 1, "Back");
    back.params_changes = vec![ParamChange::default(), ParamChange::default()];

    let fix = |location: &mut Location| {
        location.params_changes = vec![ParamChange::default(), ParamChange::default()];
    };
    let mut locations = vec![start, cabin];
    locations.iter_mut().for_each(fix);

    Quest {
        params_count: 2,
        params: vec![crit(ParamType::Fail), crit(second_param_type)],
        locations,
        jumps: vec![both, second_only, rest, back],
        task_text: "Survive".to_string(),
        success_text: "Survived".to_string(),
    }
}
