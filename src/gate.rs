//! Interaction gate deciding whether a submission reaches the classifier.
//!
//! The gate is re-evaluated for every submission and keeps no state between
//! checks. Only the exact empty string is rejected; whitespace-only input is
//! passed through and normalizes to an empty document.

use serde::{Deserialize, Serialize};

/// Message shown instead of a result when nothing was submitted.
pub const EMPTY_INPUT_PROMPT: &str = "Please enter an SMS!";

/// Where a submission stands after passing through the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Nothing to classify; the user should be prompted.
    AwaitingValidInput,
    /// The input may be normalized and classified.
    ReadyToClassify,
}

impl GateState {
    /// Evaluate one submission.
    pub fn evaluate(input: &str) -> Self {
        if input.is_empty() {
            GateState::AwaitingValidInput
        } else {
            GateState::ReadyToClassify
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, GateState::ReadyToClassify)
    }

    /// The prompt to display, if any.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            GateState::AwaitingValidInput => Some(EMPTY_INPUT_PROMPT),
            GateState::ReadyToClassify => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        assert_eq!(GateState::evaluate(""), GateState::AwaitingValidInput);
        assert_eq!(GateState::evaluate("hi"), GateState::ReadyToClassify);
        assert_eq!(GateState::evaluate(" "), GateState::ReadyToClassify);
        assert_eq!(GateState::evaluate("?!"), GateState::ReadyToClassify);
    }

    #[test]
    fn test_prompt() {
        assert_eq!(
            GateState::AwaitingValidInput.prompt(),
            Some("Please enter an SMS!")
        );
        assert!(GateState::ReadyToClassify.prompt().is_none());
        assert!(GateState::ReadyToClassify.is_ready());
        assert!(!GateState::AwaitingValidInput.is_ready());
    }
}
