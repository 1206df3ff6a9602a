//! Response envelope
//!
//! Every server response is wrapped as `{success, resource | resources | message}`.

use crate::error::{Error, Result};
use serde_json::Value;

/// What a successful envelope carries
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `resource`: a single object
    One(Value),
    /// `resources`: a list, in server order
    Many(Vec<Value>),
    /// Neither key present; the whole envelope
    Other(Value),
}

/// Check `success` and split out the payload.
///
/// `status` is the HTTP status the envelope arrived with; it is attached to
/// `ServerRejected` errors.
pub fn open(body: Value, status: u16) -> Result<Payload> {
    let Some(map) = body.as_object() else {
        return Err(Error::Decode(format!(
            "expected a response envelope object, got {}",
            truncate(&body.to_string())
        )));
    };

    let success = match map.get("success") {
        Some(Value::Bool(success)) => *success,
        Some(other) => {
            return Err(Error::Decode(format!(
                "envelope 'success' is not a boolean: {}",
                other
            )))
        },
        None => return Err(Error::Decode("envelope is missing 'success'".to_string())),
    };

    if !success {
        return Err(Error::ServerRejected {
            status,
            message: rejection_message(&body),
        });
    }

    if let Some(resources) = map.get("resources") {
        let Some(items) = resources.as_array() else {
            return Err(Error::Decode("envelope 'resources' is not a list".to_string()));
        };
        return Ok(Payload::Many(items.clone()));
    }

    if let Some(resource) = map.get("resource") {
        return Ok(Payload::One(resource.clone()));
    }

    Ok(Payload::Other(body))
}

/// The server's `message`, or the serialized envelope when there is none
pub fn rejection_message(body: &Value) -> String {
    body.get("message")
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| body.to_string())
}

fn truncate(s: &str) -> String {
    const MAX: usize = 120;
    if s.len() > MAX {
        let mut end = MAX;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_resource() {
        let payload = open(json!({"success": true, "resource": {"_id": "a"}}), 200).unwrap();
        assert_eq!(payload, Payload::One(json!({"_id": "a"})));
    }

    #[test]
    fn test_resource_list_keeps_order() {
        let payload = open(
            json!({"success": true, "resources": [{"_id": "b"}, {"_id": "a"}, {"_id": "c"}]}),
            200,
        )
        .unwrap();
        let Payload::Many(items) = payload else {
            panic!("expected a list payload");
        };
        let ids: Vec<_> = items.iter().map(|i| i["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_message_only_is_forwarded() {
        let body = json!({"success": true, "message": "Client was deleted! Bye bye data."});
        assert_eq!(open(body.clone(), 200).unwrap(), Payload::Other(body));
    }

    #[test]
    fn test_failure_carries_message() {
        let err = open(json!({"success": false, "message": "Email taken. Please login. Thanks!"}), 400)
            .unwrap_err();
        match err {
            Error::ServerRejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Email taken. Please login. Thanks!");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failure_without_message_uses_envelope() {
        let err = open(json!({"success": false}), 200).unwrap_err();
        assert_eq!(err.server_message(), Some(r#"{"success":false}"#));
    }

    #[test]
    fn test_malformed_envelopes() {
        assert!(matches!(open(json!([1, 2]), 200), Err(Error::Decode(_))));
        assert!(matches!(open(json!({"resource": {}}), 200), Err(Error::Decode(_))));
        assert!(matches!(open(json!({"success": "yes"}), 200), Err(Error::Decode(_))));
        assert!(matches!(
            open(json!({"success": true, "resources": {}}), 200),
            Err(Error::Decode(_))
        ));
    }
}
