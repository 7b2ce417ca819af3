//! Error kinds for segment tree construction.
//!
//! Every variant is fatal for the current report: a single bad record
//! invalidates the diagram, so nothing is retried or skipped.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Malformed CIDR or dotted-quad string.
    #[error("invalid address or CIDR: {0}")]
    Format(String),

    /// A block does not fit the binary subdivision of its parent:
    /// misaligned base address, outside the parent's range, overlapping
    /// an already declared block, or not strictly more specific.
    #[error("block {child} does not align under {parent}")]
    Alignment { parent: String, child: String },

    /// A subnet or NIC record references an owner id with no match.
    #[error("record references unknown owner {0}")]
    UnknownOwner(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TreeError::Format("10.0.0/16".to_string()).to_string(),
            "invalid address or CIDR: 10.0.0/16"
        );
        assert_eq!(
            TreeError::Alignment {
                parent: "10.0.0.0/16".to_string(),
                child: "10.0.64.0/17".to_string(),
            }
            .to_string(),
            "block 10.0.64.0/17 does not align under 10.0.0.0/16"
        );
        assert_eq!(
            TreeError::UnknownOwner("subnet-gone".to_string()).to_string(),
            "record references unknown owner subnet-gone"
        );
    }

    #[test]
    fn test_errors_compare_by_value() {
        assert_eq!(
            TreeError::UnknownOwner("vpc-1".to_string()),
            TreeError::UnknownOwner("vpc-1".to_string())
        );
        assert_ne!(
            TreeError::Format("x".to_string()),
            TreeError::UnknownOwner("x".to_string())
        );
    }
}
