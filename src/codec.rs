//! JSON codec for [`Exec`].
//!
//! The wire format is a JSON object discriminated by `kind`. Decoding
//! validates per-kind field requirements and resolves virtual default-kind
//! aliases through a [`RuntimeResolver`]; encoding is total and recomputes
//! derived fields (`binary`) instead of trusting anything on the wire.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::attachment::Attachment;
use crate::error::ExecError;
use crate::exec::{
    is_binary_code, BlackBoxExec, CodeExec, CodeKind, Exec, JavaExec, SequenceExec, ALLOWED_KINDS,
    KIND_BLACKBOX, KIND_JAVA, KIND_SEQUENCE,
};
use crate::name::FullyQualifiedName;
use crate::runtimes::{RuntimeResolver, StandardRuntimes};

impl Exec {
    /// Encodes to the wire shape. Total over every constructible value.
    pub fn to_json(&self) -> Value {
        match self {
            Exec::Code(e) => {
                let mut obj = Map::new();
                obj.insert("kind".to_string(), json!(e.kind.as_str()));
                obj.insert("code".to_string(), json!(e.code));
                obj.insert("binary".to_string(), json!(is_binary_code(&e.code)));
                if let Some(main) = &e.main {
                    obj.insert("main".to_string(), json!(main));
                }
                Value::Object(obj)
            }
            Exec::Java(e) => json!({
                "kind": KIND_JAVA,
                "jar": e.jar.to_json(),
                "main": e.main,
                "binary": true,
            }),
            Exec::Sequence(e) => json!({
                "kind": KIND_SEQUENCE,
                "components": e.components
                    .iter()
                    .map(FullyQualifiedName::qualified_name)
                    .collect::<Vec<_>>(),
            }),
            Exec::BlackBox(e) => {
                let mut obj = Map::new();
                obj.insert("kind".to_string(), json!(KIND_BLACKBOX));
                obj.insert("image".to_string(), json!(e.image));
                obj.insert("binary".to_string(), json!(self.binary()));
                // Blank code is indistinguishable from no code on the wire.
                if let Some(code) = e.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                    obj.insert("code".to_string(), json!(code));
                }
                if let Some(main) = &e.main {
                    obj.insert("main".to_string(), json!(main));
                }
                Value::Object(obj)
            }
        }
    }

    /// Decodes the wire shape, resolving default-kind aliases through
    /// `runtimes` before dispatching on the kind. Fails fast on the first
    /// missing or mistyped field.
    pub fn from_json(value: &Value, runtimes: &impl RuntimeResolver) -> Result<Exec, ExecError> {
        let obj = value.as_object().ok_or(ExecError::NotAnObject)?;

        let raw_kind = obj
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| ExecError::field("exec", "kind"))?
            .trim()
            .to_lowercase();
        let kind = runtimes.resolve_default(&raw_kind);

        if let Some(code_kind) = CodeKind::from_kind(&kind) {
            let code = require_str(obj, &kind, "code")?;
            let main = optional_str(obj, &kind, "main")?;
            if code_kind.is_deprecated() {
                tracing::warn!("decoded deprecated exec kind '{}'", kind);
            }
            return Ok(Exec::Code(CodeExec {
                kind: code_kind,
                code: code.trim().to_string(),
                main,
            }));
        }

        match kind.as_str() {
            KIND_JAVA => {
                let jar = obj
                    .get("jar")
                    .and_then(|v| Attachment::from_json(v).ok())
                    .ok_or_else(|| ExecError::field(&kind, "jar"))?;
                let main = require_str(obj, &kind, "main")?;
                Ok(Exec::Java(JavaExec {
                    jar,
                    main: main.trim().to_string(),
                }))
            }
            KIND_SEQUENCE => {
                let components = obj
                    .get("components")
                    .and_then(Value::as_array)
                    .ok_or_else(|| ExecError::field(&kind, "components"))?;
                let components = components
                    .iter()
                    .map(FullyQualifiedName::from_json)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| ExecError::InvalidComponent {
                        field: "components".to_string(),
                        source,
                    })?;
                Ok(Exec::Sequence(SequenceExec { components }))
            }
            KIND_BLACKBOX => {
                let image = require_str(obj, &kind, "image")?;
                let image = image.trim();
                if image.is_empty() {
                    return Err(ExecError::field(&kind, "image"));
                }
                let code = optional_str(obj, &kind, "code")?;
                let main = optional_str(obj, &kind, "main")?;
                Ok(Exec::BlackBox(BlackBoxExec {
                    image: image.to_string(),
                    code,
                    main,
                }))
            }
            other => Err(ExecError::UnknownKind {
                kind: other.to_string(),
                allowed: ALLOWED_KINDS.iter().map(|k| k.to_string()).collect(),
            }),
        }
    }
}

fn require_str(obj: &Map<String, Value>, kind: &str, field: &str) -> Result<String, ExecError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ExecError::field(kind, field))
}

/// Absent fields are fine; present fields must be strings. Blank strings
/// normalize to absent.
fn optional_str(
    obj: &Map<String, Value>,
    kind: &str,
    field: &str,
) -> Result<Option<String>, ExecError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => Err(ExecError::field(kind, field)),
    }
}

impl Serialize for Exec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Exec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Exec::from_json(&value, &StandardRuntimes).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Stand-in for the platform's runtime table.
    struct StubRuntimes;

    impl RuntimeResolver for StubRuntimes {
        fn resolve_default(&self, kind: &str) -> String {
            if kind == "default" {
                "nodejs:6".to_string()
            } else {
                kind.to_string()
            }
        }
    }

    fn decode(value: Value) -> Result<Exec, ExecError> {
        Exec::from_json(&value, &StubRuntimes)
    }

    #[test]
    fn nodejs_round_trip() {
        let exec = Exec::nodejs6("function main() { return {}; }", Some("main"));
        let encoded = exec.to_json();
        assert_eq!(
            encoded,
            json!({
                "kind": "nodejs:6",
                "code": "function main() { return {}; }",
                "binary": false,
                "main": "main",
            })
        );
        assert_eq!(decode(encoded).unwrap(), exec);
    }

    #[test]
    fn text_exec_without_main_omits_it() {
        let exec = Exec::python("def main(): pass", None);
        let encoded = exec.to_json();
        assert_eq!(
            encoded,
            json!({ "kind": "python", "code": "def main(): pass", "binary": false })
        );
        assert_eq!(decode(encoded).unwrap(), exec);
    }

    #[test]
    fn binary_code_round_trip() {
        let exec = Exec::swift3("YWJjZA==", None);
        let encoded = exec.to_json();
        assert_eq!(encoded["binary"], json!(true));
        assert_eq!(decode(encoded).unwrap(), exec);
    }

    #[test]
    fn java_round_trip() {
        let exec = Exec::java("UEsDBAoAAAAAAA==", "com.example.Main");
        let encoded = exec.to_json();
        assert_eq!(
            encoded,
            json!({
                "kind": "java",
                "jar": "UEsDBAoAAAAAAA==",
                "main": "com.example.Main",
                "binary": true,
            })
        );
        assert_eq!(decode(encoded).unwrap(), exec);
    }

    #[test]
    fn sequence_round_trip_preserves_order() {
        let exec = Exec::sequence(vec![
            "/guest/split".parse().unwrap(),
            "/guest/sort".parse().unwrap(),
            "/whisk.system/utils/echo".parse().unwrap(),
        ]);
        let encoded = exec.to_json();
        assert_eq!(
            encoded,
            json!({
                "kind": "sequence",
                "components": ["/guest/split", "/guest/sort", "/whisk.system/utils/echo"],
            })
        );
        assert_eq!(decode(encoded).unwrap(), exec);
    }

    #[test]
    fn blackbox_round_trip() {
        let exec = Exec::blackbox("user/image", Some("echo hi"), Some("run"));
        let encoded = exec.to_json();
        assert_eq!(
            encoded,
            json!({
                "kind": "blackbox",
                "image": "user/image",
                "binary": false,
                "code": "echo hi",
                "main": "run",
            })
        );
        assert_eq!(decode(encoded).unwrap(), exec);
    }

    #[test]
    fn blackbox_blank_code_is_omitted() {
        let exec = Exec::BlackBox(BlackBoxExec {
            image: "user/image".to_string(),
            code: Some("   ".to_string()),
            main: None,
        });
        let encoded = exec.to_json();
        assert_eq!(
            encoded,
            json!({ "kind": "blackbox", "image": "user/image", "binary": false })
        );
    }

    #[test]
    fn decode_rejects_non_object() {
        assert_eq!(decode(json!("nodejs")), Err(ExecError::NotAnObject));
        assert_eq!(decode(json!(["nodejs"])), Err(ExecError::NotAnObject));
    }

    #[test]
    fn decode_rejects_missing_kind() {
        assert_eq!(
            decode(json!({ "code": "x" })),
            Err(ExecError::field("exec", "kind"))
        );
        assert_eq!(
            decode(json!({ "kind": 3, "code": "x" })),
            Err(ExecError::field("exec", "kind"))
        );
    }

    #[test]
    fn decode_folds_kind_case_and_whitespace() {
        let exec = decode(json!({ "kind": "  NodeJS:6 ", "code": "x" })).unwrap();
        assert_eq!(exec.kind(), "nodejs:6");
    }

    #[test]
    fn decode_resolves_default_alias_before_dispatch() {
        let exec = decode(json!({ "kind": "default", "code": "x" })).unwrap();
        assert_eq!(exec.kind(), "nodejs:6");
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        match decode(json!({ "kind": "cobol", "code": "x" })) {
            Err(ExecError::UnknownKind { kind, allowed }) => {
                assert_eq!(kind, "cobol");
                assert_eq!(allowed, ALLOWED_KINDS.iter().map(|k| k.to_string()).collect::<Vec<_>>());
            }
            other => panic!("expected UnknownKind, got {:?}", other),
        }
    }

    #[test]
    fn decode_rejects_text_exec_without_code() {
        assert_eq!(
            decode(json!({ "kind": "python" })),
            Err(ExecError::field("python", "code"))
        );
        assert_eq!(
            decode(json!({ "kind": "python", "code": 1 })),
            Err(ExecError::field("python", "code"))
        );
    }

    #[test]
    fn decode_rejects_non_string_main() {
        assert_eq!(
            decode(json!({ "kind": "nodejs", "code": "x", "main": 5 })),
            Err(ExecError::field("nodejs", "main"))
        );
    }

    #[test]
    fn decode_rejects_java_without_main() {
        assert_eq!(
            decode(json!({ "kind": "java", "jar": "UEsDBA==" })),
            Err(ExecError::field("java", "main"))
        );
    }

    #[test]
    fn decode_rejects_java_with_bad_jar() {
        assert_eq!(
            decode(json!({ "kind": "java", "main": "Main" })),
            Err(ExecError::field("java", "jar"))
        );
        assert_eq!(
            decode(json!({ "kind": "java", "jar": 9, "main": "Main" })),
            Err(ExecError::field("java", "jar"))
        );
    }

    #[test]
    fn decode_accepts_attached_jar_reference() {
        let exec = decode(json!({
            "kind": "java",
            "jar": { "attachmentName": "jarfile", "length": 2048 },
            "main": "Main",
        }))
        .unwrap();
        assert_eq!(exec.kind(), "java");
        assert!(exec.binary());
        assert_eq!(
            crate::size::Sizeable::size_in_bytes(&exec),
            2048 + "Main".len()
        );
    }

    #[test]
    fn decode_rejects_sequence_with_non_array_components() {
        assert_eq!(
            decode(json!({ "kind": "sequence", "components": "/guest/echo" })),
            Err(ExecError::field("sequence", "components"))
        );
        assert_eq!(
            decode(json!({ "kind": "sequence" })),
            Err(ExecError::field("sequence", "components"))
        );
    }

    #[test]
    fn decode_propagates_component_errors() {
        match decode(json!({ "kind": "sequence", "components": [17] })) {
            Err(ExecError::InvalidComponent { field, source }) => {
                assert_eq!(field, "components");
                assert_eq!(source, crate::name::NameError::NotAString);
            }
            other => panic!("expected InvalidComponent, got {:?}", other),
        }
    }

    #[test]
    fn decode_accepts_empty_sequence() {
        let exec = decode(json!({ "kind": "sequence", "components": [] })).unwrap();
        assert_eq!(exec, Exec::sequence(vec![]));
    }

    #[test]
    fn decode_rejects_blackbox_without_image() {
        assert_eq!(
            decode(json!({ "kind": "blackbox" })),
            Err(ExecError::field("blackbox", "image"))
        );
        assert_eq!(
            decode(json!({ "kind": "blackbox", "image": "" })),
            Err(ExecError::field("blackbox", "image"))
        );
    }

    #[test]
    fn decode_normalizes_blank_blackbox_code() {
        let exec = decode(json!({
            "kind": "blackbox",
            "image": "user/image",
            "code": "   ",
        }))
        .unwrap();
        assert_eq!(exec, Exec::blackbox("user/image", None, None));
    }

    #[test]
    fn decode_ignores_binary_on_the_wire() {
        // binary is recomputed from code, never trusted.
        let exec = decode(json!({
            "kind": "nodejs",
            "code": "YWJjZA==",
            "binary": false,
        }))
        .unwrap();
        assert!(exec.binary());
    }

    #[test]
    fn decode_accepts_deprecated_swift() {
        let exec = decode(json!({ "kind": "swift", "code": "func main() {}" })).unwrap();
        assert!(exec.is_deprecated());
        assert_eq!(exec.kind(), "swift");
    }

    #[test]
    fn serde_deserialize_uses_standard_runtimes() {
        let exec: Exec =
            serde_json::from_value(json!({ "kind": "nodejs:default", "code": "x" })).unwrap();
        assert_eq!(exec.kind(), "nodejs:6");
    }

    #[test]
    fn serde_serialize_matches_to_json() {
        let exec = Exec::nodejs("function main() {}", None);
        assert_eq!(serde_json::to_value(&exec).unwrap(), exec.to_json());
    }

    #[test]
    fn serde_deserialize_reports_decode_errors() {
        let result: Result<Exec, _> = serde_json::from_value(json!({ "kind": "cobol" }));
        assert!(result.is_err());
    }
}
