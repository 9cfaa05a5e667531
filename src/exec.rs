//! The executable specification of an action.
//!
//! An [`Exec`] decides what code an action runs and how it must be
//! packaged: a managed-language runtime fed plain source text, a jar with
//! an entry class, an arbitrary pre-built container image ("black box"),
//! or a sequence composing other actions. The `kind` discriminator is
//! fixed at construction and fully determines which fields are valid.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::attachment::Attachment;
use crate::name::FullyQualifiedName;
use crate::size::{total_size, Sizeable};

pub const KIND_NODEJS: &str = "nodejs";
pub const KIND_NODEJS6: &str = "nodejs:6";
pub const KIND_SWIFT: &str = "swift";
pub const KIND_SWIFT3: &str = "swift:3";
pub const KIND_PYTHON: &str = "python";
pub const KIND_JAVA: &str = "java";
pub const KIND_SEQUENCE: &str = "sequence";
pub const KIND_BLACKBOX: &str = "blackbox";

/// Every kind the decoder accepts after default-alias resolution.
pub const ALLOWED_KINDS: &[&str] = &[
    KIND_NODEJS,
    KIND_NODEJS6,
    KIND_SWIFT,
    KIND_SWIFT3,
    KIND_PYTHON,
    KIND_JAVA,
    KIND_SEQUENCE,
    KIND_BLACKBOX,
];

/// The one black-box image the platform itself provides. It is already
/// present on every invoker, so it is never pulled, and it is the only
/// black-box image that writes log-completion sentinels.
pub const BLACKBOX_SKELETON: &str = "openwhisk/dockerskeleton";

/// Managed-language runtimes that take their code as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    NodeJs,
    NodeJs6,
    Swift,
    Swift3,
    Python,
}

impl CodeKind {
    pub const ALL: &'static [CodeKind] = &[
        CodeKind::NodeJs,
        CodeKind::NodeJs6,
        CodeKind::Swift,
        CodeKind::Swift3,
        CodeKind::Python,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CodeKind::NodeJs => KIND_NODEJS,
            CodeKind::NodeJs6 => KIND_NODEJS6,
            CodeKind::Swift => KIND_SWIFT,
            CodeKind::Swift3 => KIND_SWIFT3,
            CodeKind::Python => KIND_PYTHON,
        }
    }

    /// Looks up a (resolved, lower-cased) kind string.
    pub fn from_kind(kind: &str) -> Option<CodeKind> {
        match kind {
            KIND_NODEJS => Some(CodeKind::NodeJs),
            KIND_NODEJS6 => Some(CodeKind::NodeJs6),
            KIND_SWIFT => Some(CodeKind::Swift),
            KIND_SWIFT3 => Some(CodeKind::Swift3),
            KIND_PYTHON => Some(CodeKind::Python),
            _ => None,
        }
    }

    /// Runtime container image for this kind: colon dropped, `action`
    /// appended (`nodejs:6` runs on `nodejs6action`). Total over all kinds.
    pub fn image(self) -> String {
        format!("{}action", self.as_str().replace(':', ""))
    }

    /// Legacy runtimes kept for read compatibility. Whether to reject them
    /// on new creations is the caller's policy.
    pub fn is_deprecated(self) -> bool {
        matches!(self, CodeKind::Swift)
    }
}

/// Plain source text run on a managed-language runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExec {
    pub kind: CodeKind,
    pub code: String,
    pub main: Option<String>,
}

/// A jar payload with its entry class; the entry point is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaExec {
    pub jar: Attachment,
    pub main: String,
}

/// A pre-built container image, optionally seeded with code to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackBoxExec {
    pub image: String,
    pub code: Option<String>,
    pub main: Option<String>,
}

/// Other actions invoked in order. Order is execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceExec {
    pub components: Vec<FullyQualifiedName>,
}

/// The executable specification of an action. Immutable once built; a
/// changed exec is a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exec {
    Code(CodeExec),
    Java(JavaExec),
    BlackBox(BlackBoxExec),
    Sequence(SequenceExec),
}

impl Exec {
    pub fn code(kind: CodeKind, code: &str, main: Option<&str>) -> Exec {
        Exec::Code(CodeExec {
            kind,
            code: code.trim().to_string(),
            main: trimmed_opt(main),
        })
    }

    pub fn nodejs(code: &str, main: Option<&str>) -> Exec {
        Exec::code(CodeKind::NodeJs, code, main)
    }

    pub fn nodejs6(code: &str, main: Option<&str>) -> Exec {
        Exec::code(CodeKind::NodeJs6, code, main)
    }

    pub fn swift(code: &str, main: Option<&str>) -> Exec {
        Exec::code(CodeKind::Swift, code, main)
    }

    pub fn swift3(code: &str, main: Option<&str>) -> Exec {
        Exec::code(CodeKind::Swift3, code, main)
    }

    pub fn python(code: &str, main: Option<&str>) -> Exec {
        Exec::code(CodeKind::Python, code, main)
    }

    /// Wraps the jar payload inline; externally stored jars arrive through
    /// decoding instead.
    pub fn java(jar: &str, main: &str) -> Exec {
        Exec::Java(JavaExec {
            jar: Attachment::inline(jar.trim()),
            main: main.trim().to_string(),
        })
    }

    pub fn blackbox(image: &str, code: Option<&str>, main: Option<&str>) -> Exec {
        Exec::BlackBox(BlackBoxExec {
            image: image.trim().to_string(),
            code: trimmed_opt(code),
            main: trimmed_opt(main),
        })
    }

    pub fn sequence(components: Vec<FullyQualifiedName>) -> Exec {
        Exec::Sequence(SequenceExec { components })
    }

    /// The discriminator. Never empty; fixed for the lifetime of the value.
    pub fn kind(&self) -> &'static str {
        match self {
            Exec::Code(e) => e.kind.as_str(),
            Exec::Java(_) => KIND_JAVA,
            Exec::BlackBox(_) => KIND_BLACKBOX,
            Exec::Sequence(_) => KIND_SEQUENCE,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, Exec::Code(e) if e.kind.is_deprecated())
    }

    /// Container image the action runs on. Derived from the kind for all
    /// runtime kinds; stored verbatim for black boxes; absent for
    /// sequences, which run no container of their own.
    pub fn image(&self) -> Option<String> {
        match self {
            Exec::Code(e) => Some(e.kind.image()),
            Exec::Java(_) => Some(format!("{}action", KIND_JAVA)),
            Exec::BlackBox(e) => Some(e.image.clone()),
            Exec::Sequence(_) => None,
        }
    }

    /// Transport/storage hint: does the code payload look like base64?
    /// Recomputed on every call, never cached on the wire.
    pub fn binary(&self) -> bool {
        match self {
            Exec::Code(e) => is_binary_code(&e.code),
            Exec::Java(_) => true,
            Exec::BlackBox(e) => e.code.as_deref().map(is_binary_code).unwrap_or(false),
            Exec::Sequence(_) => false,
        }
    }

    /// Whether the invoker must fetch the image from a registry. Only
    /// black boxes pull, and the platform's own skeleton never does.
    pub fn pull(&self) -> bool {
        matches!(self, Exec::BlackBox(e) if e.image != BLACKBOX_SKELETON)
    }

    /// Whether the runtime emits log-completion sentinels on its standard
    /// streams. Jar runtimes do not; a black box does only when it runs
    /// the platform-controlled skeleton image.
    pub fn sentinelled_logs(&self) -> bool {
        match self {
            Exec::Java(_) => false,
            Exec::BlackBox(_) => !self.pull(),
            _ => true,
        }
    }
}

impl Sizeable for Exec {
    fn size_in_bytes(&self) -> usize {
        match self {
            Exec::Code(e) => e.code.len() + e.main.as_deref().map_or(0, str::len),
            Exec::Java(e) => e.jar.size_in_bytes() + e.main.len(),
            Exec::BlackBox(e) => {
                e.image.len()
                    + e.code.as_deref().map_or(0, str::len)
                    + e.main.as_deref().map_or(0, str::len)
            }
            Exec::Sequence(e) => total_size(&e.components),
        }
    }
}

/// Classifies a code payload as binary iff the trimmed text is non-empty,
/// its length is a multiple of 4, and it decodes as standard base64. A
/// heuristic with known false positives on short alphanumeric source text;
/// stored data depends on this exact behavior, so it must not be tightened.
pub fn is_binary_code(code: &str) -> bool {
    let trimmed = code.trim();
    !trimmed.is_empty() && trimmed.len() % 4 == 0 && BASE64.decode(trimmed).is_ok()
}

fn trimmed_opt(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
