//! Decode-time error taxonomy.
//!
//! Every error is deterministic and non-retryable; the API layer in front
//! of this crate turns them into user-facing validation responses.
//! Encoding is total and has no error type.

use crate::name::NameError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    /// The top-level JSON value was not an object.
    #[error("exec specification must be a JSON object")]
    NotAnObject,

    /// A required field is absent or has the wrong JSON type for the kind
    /// being parsed. When the `kind` discriminator itself is at fault, the
    /// carried kind is the literal context `"exec"`.
    #[error("missing or invalid field '{field}' for exec kind '{kind}'")]
    MissingOrInvalidField { kind: String, field: String },

    /// The resolved kind is not in the supported set.
    #[error("exec kind '{kind}' is not supported, expected one of: {}", .allowed.join(", "))]
    UnknownKind { kind: String, allowed: Vec<String> },

    /// An element of a collection field failed to decode; the collaborator
    /// error is preserved as the source.
    #[error("invalid entry in field '{field}': {source}")]
    InvalidComponent {
        field: String,
        #[source]
        source: NameError,
    },
}

impl ExecError {
    pub(crate) fn field(kind: &str, field: &str) -> Self {
        ExecError::MissingOrInvalidField {
            kind: kind.to_string(),
            field: field.to_string(),
        }
    }
}
