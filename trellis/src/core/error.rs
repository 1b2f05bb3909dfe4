// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::fmt;

use crate::state::StateError;

/// A construction error, fatal to the rebuild of the subtree it occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A node's configuration was rejected by its own validation.
    InvalidNode {
        /// Short type name of the node.
        type_name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// A fallible child builder failed.
    Builder {
        /// Short type name of the node whose children were being built.
        type_name: &'static str,
        /// The builder's error message.
        message: String,
    },
    /// A state cell was accessed with the wrong type.
    State(StateError),
}

impl BuildError {
    /// An [`InvalidNode`](Self::InvalidNode) error.
    pub fn invalid(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            type_name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNode { type_name, reason } => {
                write!(f, "invalid {type_name}: {reason}")
            }
            Self::Builder { type_name, message } => {
                write!(f, "failed to build children of {type_name}: {message}")
            }
            Self::State(_) => f.write_str("state access failed"),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::State(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StateError> for BuildError {
    fn from(err: StateError) -> Self {
        Self::State(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_errors_are_chained() {
        let err = BuildError::from(StateError::TypeMismatch {
            name: "count",
            expected: "i32",
            found: "alloc::string::String",
        });
        assert_eq!(err.to_string(), "state access failed");
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("state `count` must be of type i32 (got alloc::string::String)")
        );
    }
}
