//! Default-runtime resolution.
//!
//! Stored actions may request "the current default runtime" instead of a
//! concrete version. Resolving that alias at decode time lets the blessed
//! default evolve without rewriting stored action documents.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Maps virtual default-kind aliases to the concrete kind currently
/// blessed by the platform. Pure lookup; non-alias kinds map to themselves.
pub trait RuntimeResolver {
    fn resolve_default(&self, kind: &str) -> String;
}

lazy_static! {
    static ref DEFAULT_RUNTIMES: HashMap<&'static str, &'static str> = {
        let mut table = HashMap::new();
        table.insert("default", "nodejs:6");
        table.insert("nodejs:default", "nodejs:6");
        table.insert("swift:default", "swift:3");
        table.insert("python:default", "python");
        table.insert("java:default", "java");
        table
    };
}

/// The platform's current table of blessed default runtime versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRuntimes;

impl RuntimeResolver for StandardRuntimes {
    fn resolve_default(&self, kind: &str) -> String {
        match DEFAULT_RUNTIMES.get(kind) {
            Some(resolved) => {
                tracing::debug!("resolved default runtime alias '{}' to '{}'", kind, resolved);
                (*resolved).to_string()
            }
            None => kind.to_string(),
        }
    }
}
