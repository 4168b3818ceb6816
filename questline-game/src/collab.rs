//! Seams for the external formula and substitution collaborators.
//!
//! The engine never parses the formula or template grammars itself; hosts
//! inject evaluators through these traits. The fixture implementations at
//! the bottom cover the minimal syntax the engine itself generates, which
//! is enough for tests and the QA tester.

use thiserror::Error;

use crate::text::TemplateVars;

/// Raised by a formula collaborator; propagated uncaught by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("formula evaluation failed: {0}")]
pub struct FormulaError(pub String);

/// Pure evaluator for the formula sublanguage.
///
/// `random` draws a uniform integer in `[0, bound)` from the sequence the
/// engine threads through the whole transition.
pub trait FormulaEvaluator {
    /// Evaluate `expression` against the given parameter values.
    ///
    /// # Errors
    ///
    /// Returns an error when the expression cannot be evaluated; the engine
    /// aborts the operation and surfaces it verbatim.
    fn eval(
        &self,
        expression: &str,
        param_values: &[i32],
        random: &mut dyn FnMut(u32) -> u32,
    ) -> Result<i32, FormulaError>;
}

/// Pure template-substitution engine.
pub trait TextRenderer {
    /// Render `template`, resolving variables, parameter references and the
    /// optional positional placeholder.
    fn substitute(
        &self,
        template: &str,
        vars: &TemplateVars,
        param_values: &[i32],
        random: &mut dyn FnMut(u32) -> u32,
        placeholder_index: Option<usize>,
    ) -> String;
}

/// Literal-only evaluator accepting `[n]` and bare integers (useful for
/// tests and fixture quests).
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralFormula;

impl FormulaEvaluator for LiteralFormula {
    fn eval(
        &self,
        expression: &str,
        _param_values: &[i32],
        _random: &mut dyn FnMut(u32) -> u32,
    ) -> Result<i32, FormulaError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);
        inner
            .trim()
            .parse()
            .map_err(|_| FormulaError(format!("not an integer literal: `{expression}`")))
    }
}

/// Renderer that returns templates untouched (useful for tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl TextRenderer for PlainText {
    fn substitute(
        &self,
        template: &str,
        _vars: &TemplateVars,
        _param_values: &[i32],
        _random: &mut dyn FnMut(u32) -> u32,
        _placeholder_index: Option<usize>,
    ) -> String {
        template.to_string()
    }
}
