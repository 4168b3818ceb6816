//! Engine-wide constants shared across modules.

use crate::quest::JumpId;

/// Reserved choice id emitted for the "I agree" choice on the task screen.
pub const JUMP_I_AGREE: JumpId = -1;
/// Reserved choice id emitted for "Next" continuation choices.
pub const JUMP_NEXT: JumpId = -2;
/// Reserved choice id that ends the quest from any state.
pub const JUMP_GO_BACK_TO_SHIP: JumpId = -3;

/// Starting-money cap applied to `is_money` parameters at initialization.
pub const MONEY_STARTING_CAP: i32 = 2000;

/// Default number of days granted to finish a quest; drives the `Day`,
/// `Date` and `CurDate` template variables.
pub const DEFAULT_DAYS_TO_PASS: u32 = 35;

/// Offset added to the rendered year in in-game calendar dates.
pub const GAME_YEAR_OFFSET: i32 = 1000;
