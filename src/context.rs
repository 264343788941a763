use crate::error::CalcError;
use crate::interpreter::{evaluate, Environment};
use crate::validator::validate;

/// A reusable evaluation session.
///
/// Owns the environment that `let` bindings push onto. Validation runs
/// before evaluation, so a malformed expression never reaches the
/// evaluator. Bindings are popped on every exit path, which leaves the
/// environment empty between calls and makes reuse across many inputs
/// safe.
pub struct EvaluationContext {
    environment: Environment,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }

    /// Validates `input` and evaluates it to its integer value.
    pub fn evaluate_str(&mut self, input: &str) -> Result<i64, CalcError> {
        validate(input)?;
        evaluate(input, &mut self.environment)
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}
