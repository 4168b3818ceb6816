//! Parameter Update Engine: applies an ordered set of per-parameter
//! changes and reports which parameters went critical.

use smallvec::SmallVec;

use crate::EngineError;
use crate::collab::FormulaEvaluator;
use crate::numbers::apply_percentage;
use crate::quest::{CritKind, ParamChange, ParamType, Quest, ShowDirective};
use crate::state::GameState;

/// Indices of parameters driven critical by one update, ascending.
/// Callers keep the lowest; the rest are dropped for the transition.
pub type CritTriggers = SmallVec<[usize; 4]>;

/// Apply `changes` (one entry per parameter index) to `state` in ascending
/// index order.
///
/// Value computation reads the pre-update values of all parameters, so a
/// formula change for parameter 3 sees parameter 1 as it was before this
/// update began. New values are clamped to the parameter bounds; a clamped
/// value that changed and landed exactly on the critical bound of a
/// non-Normal parameter records a trigger.
pub(crate) fn apply_param_changes<F: FormulaEvaluator>(
    quest: &Quest,
    state: &mut GameState,
    changes: &[ParamChange],
    formula: &F,
    random: &mut dyn FnMut(u32) -> u32,
) -> Result<CritTriggers, EngineError> {
    let old_values = state.param_values.clone();
    let mut new_values = old_values.clone();
    let mut triggered = CritTriggers::new();

    for (index, change) in changes.iter().enumerate().take(quest.params_count) {
        match change.showing {
            ShowDirective::Show => state.param_show[index] = true,
            ShowDirective::Hide => state.param_show[index] = false,
            ShowDirective::Unchanged => {}
        }

        if change.is_change_value {
            new_values[index] = change.change;
        } else if change.is_change_percentage {
            new_values[index] = apply_percentage(old_values[index], change.change);
        } else if change.is_change_formula {
            if !change.changing_formula.is_empty() {
                new_values[index] = formula.eval(&change.changing_formula, &old_values, random)?;
            }
        } else {
            new_values[index] = old_values[index].saturating_add(change.change);
        }

        let param = &quest.params[index];
        new_values[index] = new_values[index].clamp(param.min, param.max);

        if new_values[index] != old_values[index] && param.param_type != ParamType::Normal {
            let on_crit_bound = match param.crit_type {
                CritKind::Maximum => new_values[index] == param.max,
                CritKind::Minimum => new_values[index] == param.min,
                CritKind::None => false,
            };
            if on_crit_bound {
                triggered.push(index);
            }
        }
    }

    state.param_values = new_values;
    Ok(triggered)
}
