//! Wire-format and resume-equivalence checks for persisted states.

mod common;

use common::{crit_quest, engine};
use questline_game::{GameState, JUMP_I_AGREE, ParamType, Stage};

#[test]
fn serializing_mid_run_changes_nothing() {
    let quest = crit_quest(ParamType::Fail);
    let engine = engine(&quest);

    let state = engine.init_game("save-load").expect("init");
    let at_start = engine.perform_jump(&state, JUMP_I_AGREE).expect("agree");

    let json = serde_json::to_string(&at_start).expect("serialize");
    let restored: GameState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, at_start);

    let direct = engine.perform_jump(&at_start, 20).expect("rest");
    let resumed = engine.perform_jump(&restored, 20).expect("rest");
    assert_eq!(direct, resumed);
}

#[test]
fn wire_format_uses_the_documented_field_names() {
    let quest = crit_quest(ParamType::Fail);
    let engine = engine(&quest);

    let state = engine.init_game("wire").expect("init");
    let at_start = engine.perform_jump(&state, JUMP_I_AGREE).expect("agree");
    let arrived = engine.perform_jump(&at_start, 20).expect("rest");

    let value = serde_json::to_value(&arrived).expect("serialize");
    assert_eq!(value["state"], "location");
    assert_eq!(value["locationId"], 2);
    assert_eq!(value["lastJumpId"], 20);
    assert_eq!(value["daysPassed"], 1);
    assert_eq!(value["jumpedCount"]["20"], 1);
    assert_eq!(value["locationVisitCount"]["2"], 0);
    assert!(value["paramValues"].is_array());
    assert!(value["paramShow"].is_array());
    assert!(value["possibleJumps"].is_array());
    assert!(value.get("aleaState").is_some());
}

#[test]
fn crit_states_expose_their_parameter_on_the_wire() {
    let quest = crit_quest(ParamType::Fail);
    let engine = engine(&quest);

    let state = engine.init_game("crit-wire").expect("init");
    let at_start = engine.perform_jump(&state, JUMP_I_AGREE).expect("agree");
    let crit = engine.perform_jump(&at_start, 10).expect("push");
    assert_eq!(crit.stage, Stage::CritOnJump { crit_param: 0 });

    let value = serde_json::to_value(&crit).expect("serialize");
    assert_eq!(value["state"], "critonjump");
    assert_eq!(value["critParamId"], 0);

    let back: GameState = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, crit);
}
