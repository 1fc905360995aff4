//! Contract violations and the aggregate construction error.

use serde::Serialize;
use thiserror::Error;

/// Blame for one failed contract: a message plus structured diagnostics.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("[{contract}] {message}")]
pub struct ContractViolation {
    pub contract: &'static str,
    pub message: String,
    pub data: serde_json::Value,
}

impl ContractViolation {
    pub fn new(contract: &'static str, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            contract,
            message: message.into(),
            data,
        }
    }
}

/// Every violation found while checking a machine definition.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Machine definition violates {count} contract(s): {summary}",
    count = .violations.len(),
    summary = summarize(.violations)
)]
pub struct ContractError {
    pub violations: Vec<ContractViolation>,
}

impl ContractError {
    /// Names of the violated contracts, in evaluation order, without repeats.
    pub fn contracts(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for violation in &self.violations {
            if !names.contains(&violation.contract) {
                names.push(violation.contract);
            }
        }
        names
    }

    pub fn violates(&self, contract: &str) -> bool {
        self.violations.iter().any(|v| v.contract == contract)
    }
}

fn summarize(violations: &[ContractViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn violation_display_names_contract() {
        let violation = ContractViolation::new("unique_state_names", "state `A` is declared twice", json!({ "state": "A" }));
        assert_eq!(violation.to_string(), "[unique_state_names] state `A` is declared twice");
    }

    #[test]
    fn error_lists_contracts_once() {
        let error = ContractError {
            violations: vec![
                ContractViolation::new("a", "first", json!(null)),
                ContractViolation::new("b", "second", json!(null)),
                ContractViolation::new("a", "third", json!(null)),
            ],
        };

        assert_eq!(error.contracts(), vec!["a", "b"]);
        assert!(error.violates("b"));
        assert!(!error.violates("c"));
        assert_eq!(
            error.to_string(),
            "Machine definition violates 3 contract(s): [a] first; [b] second; [a] third"
        );
    }
}
