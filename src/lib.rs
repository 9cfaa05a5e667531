//! Executable specifications for platform actions.
//!
//! An action's [`Exec`] decides what code runs when the action is invoked
//! and how that code must be packaged: plain source text on a managed
//! runtime (`nodejs`, `nodejs:6`, `swift`, `swift:3`, `python`), a jar
//! (`java`), an arbitrary container image (`blackbox`), or a composition
//! of other actions (`sequence`). The crate provides the union type, its
//! derived properties (image name, binary hint, byte size, pull and
//! log-sentinel flags), and a bidirectional JSON codec that enforces
//! per-kind field requirements and resolves "default runtime" aliases
//! against a [`RuntimeResolver`].
//!
//! ```
//! use action_exec::{Exec, StandardRuntimes};
//!
//! let exec = Exec::nodejs6("function main() { return {}; }", Some("main"));
//! let wire = exec.to_json();
//! let back = Exec::from_json(&wire, &StandardRuntimes).unwrap();
//! assert_eq!(back, exec);
//! ```
//!
//! Everything here is a pure transformation over immutable values: no
//! I/O, no shared state, nothing to cancel. Decoding is the only
//! fallible operation and fails fast with a typed [`ExecError`].

pub mod attachment;
mod codec;
pub mod error;
pub mod exec;
pub mod name;
pub mod runtimes;
pub mod size;

pub use attachment::{AttachedRef, Attachment, AttachmentError};
pub use error::ExecError;
pub use exec::{
    is_binary_code, BlackBoxExec, CodeExec, CodeKind, Exec, JavaExec, SequenceExec, ALLOWED_KINDS,
    BLACKBOX_SKELETON,
};
pub use name::{FullyQualifiedName, NameError};
pub use runtimes::{RuntimeResolver, StandardRuntimes};
pub use size::{total_size, Sizeable};
