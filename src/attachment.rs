//! Code payloads that may be carried inline or stored externally.
//!
//! The exec core never dereferences an attached payload; it only keeps the
//! reference and its recorded length for size accounting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::size::Sizeable;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("attachment must be a string or an attachment reference object")]
    Invalid,
}

/// A potentially large payload, inline or by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Inline(String),
    Attached(AttachedRef),
}

/// Pointer to an externally stored payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedRef {
    pub attachment_name: String,
    pub length: usize,
}

impl Attachment {
    pub fn inline(value: impl Into<String>) -> Self {
        Attachment::Inline(value.into())
    }

    /// Inline payloads travel as a bare JSON string, references as an object.
    pub fn to_json(&self) -> Value {
        match self {
            Attachment::Inline(value) => Value::String(value.clone()),
            Attachment::Attached(reference) => serde_json::json!({
                "attachmentName": reference.attachment_name,
                "length": reference.length,
            }),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, AttachmentError> {
        match value {
            Value::String(inline) => Ok(Attachment::Inline(inline.clone())),
            Value::Object(_) => serde_json::from_value::<AttachedRef>(value.clone())
                .map(Attachment::Attached)
                .map_err(|_| AttachmentError::Invalid),
            _ => Err(AttachmentError::Invalid),
        }
    }
}

impl Sizeable for Attachment {
    fn size_in_bytes(&self) -> usize {
        match self {
            Attachment::Inline(value) => value.len(),
            Attachment::Attached(reference) => reference.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn inline_round_trips_as_string() {
        let attachment = Attachment::inline("ZEhKMWRRPT0=");
        let encoded = attachment.to_json();
        assert_eq!(encoded, json!("ZEhKMWRRPT0="));
        assert_eq!(Attachment::from_json(&encoded).unwrap(), attachment);
    }

    #[test]
    fn attached_round_trips_as_object() {
        let attachment = Attachment::Attached(AttachedRef {
            attachment_name: "jarfile".to_string(),
            length: 4096,
        });
        let encoded = attachment.to_json();
        assert_eq!(encoded, json!({ "attachmentName": "jarfile", "length": 4096 }));
        assert_eq!(Attachment::from_json(&encoded).unwrap(), attachment);
    }

    #[test]
    fn rejects_non_string_non_object() {
        assert_eq!(
            Attachment::from_json(&json!(17)),
            Err(AttachmentError::Invalid)
        );
        assert_eq!(
            Attachment::from_json(&json!(["a"])),
            Err(AttachmentError::Invalid)
        );
    }

    #[test]
    fn rejects_object_missing_reference_fields() {
        assert_eq!(
            Attachment::from_json(&json!({ "name": "jarfile" })),
            Err(AttachmentError::Invalid)
        );
    }

    #[test]
    fn inline_size_is_payload_byte_length() {
        assert_eq!(Attachment::inline("YWJjZA==").size_in_bytes(), 8);
    }

    #[test]
    fn attached_size_is_recorded_length() {
        let attachment = Attachment::Attached(AttachedRef {
            attachment_name: "jarfile".to_string(),
            length: 1234,
        });
        assert_eq!(attachment.size_in_bytes(), 1234);
    }
}
