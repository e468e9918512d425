use serde::Serialize;
use serde_json::{Map, Value};
use crate::error::ProxyError;

// Inbound body, parsed but not yet validated
#[derive(Debug)]
pub struct RawProposalRequest {
    body: Value,
}

/// A validated proxy request. This is also the exact body forwarded upstream,
/// so unknown top-level fields from the caller never leave the proxy.
/// Messages are passed through untouched.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProposalRequest {
    pub proposal_id: String,
    pub timestamp: String,
    pub messages: Vec<Value>,
    pub model: String,
}

impl RawProposalRequest {
    // Only a JSON syntax error fails here
    pub fn from_slice(body: &[u8]) -> Result<Self, ProxyError> {
        let body = serde_json::from_slice(body).map_err(ProxyError::InvalidBody)?;
        Ok(Self { body })
    }

    pub fn validate(self) -> Result<ProposalRequest, ProxyError> {
        let Value::Object(mut fields) = self.body else {
            return Err(ProxyError::MissingParameters);
        };

        let proposal_id = take_string(&mut fields, "proposal_id")?;
        let timestamp = take_string(&mut fields, "timestamp")?;
        let messages = match fields.remove("messages") {
            Some(Value::Array(messages)) if !messages.is_empty() => messages,
            _ => return Err(ProxyError::MissingParameters),
        };
        let model = take_string(&mut fields, "model")?;

        Ok(ProposalRequest {
            proposal_id,
            timestamp,
            messages,
            model,
        })
    }
}

// absent, null, empty and non-string values are all rejected
fn take_string(fields: &mut Map<String, Value>, name: &str) -> Result<String, ProxyError> {
    match fields.remove(name) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value),
        _ => Err(ProxyError::MissingParameters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn complete() -> Value {
        json!({
            "proposal_id": "p1",
            "timestamp": "t1",
            "messages": [{"role": "user", "content": "hi"}],
            "model": "chat-model"
        })
    }

    fn parse(value: &Value) -> Result<ProposalRequest, ProxyError> {
        RawProposalRequest::from_slice(value.to_string().as_bytes())?.validate()
    }

    #[test]
    fn test_valid_request() {
        let req = parse(&complete()).unwrap();
        assert_eq!(req.proposal_id, "p1");
        assert_eq!(req.timestamp, "t1");
        assert_eq!(req.model, "chat-model");
        assert_eq!(req.messages, vec![json!({"role": "user", "content": "hi"})]);
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        for field in ["proposal_id", "timestamp", "messages", "model"] {
            let mut body = complete();
            body.as_object_mut().unwrap().remove(field);
            assert!(
                matches!(parse(&body), Err(ProxyError::MissingParameters)),
                "missing {field} should be rejected"
            );
        }
    }

    #[test]
    fn test_null_and_empty_fields_are_rejected() {
        for (field, value) in [
            ("proposal_id", json!("")),
            ("timestamp", json!(null)),
            ("messages", json!([])),
            ("model", json!("")),
        ] {
            let mut body = complete();
            body[field] = value;
            assert!(matches!(parse(&body), Err(ProxyError::MissingParameters)));
        }
    }

    #[test]
    fn test_wrong_types_are_missing_parameters() {
        for (field, value) in [
            ("proposal_id", json!(7)),
            ("timestamp", json!(true)),
            ("messages", json!("hi")),
            ("model", json!({"name": "chat-model"})),
        ] {
            let mut body = complete();
            body[field] = value;
            assert!(
                matches!(parse(&body), Err(ProxyError::MissingParameters)),
                "{field} with the wrong type should be rejected"
            );
        }

        // valid JSON that is not an object
        for body in [json!([]), json!(5), json!("text")] {
            assert!(matches!(parse(&body), Err(ProxyError::MissingParameters)));
        }
    }

    #[test]
    fn test_only_syntax_errors_fail_parsing() {
        let err = RawProposalRequest::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, ProxyError::InvalidBody(_)));

        assert!(RawProposalRequest::from_slice(br#"{"proposal_id": 7}"#).is_ok());
    }

    #[test]
    fn test_messages_are_forwarded_verbatim() {
        let mut body = complete();
        body["messages"] = json!([
            {"role": "user", "content": "hi", "name": "alice"},
            {"role": "assistant", "content": null, "tool_calls": [{"id": "call_1"}]},
            {"role": "tool", "content": "42", "tool_call_id": "call_1"}
        ]);
        let req = parse(&body).unwrap();

        let forwarded = serde_json::to_value(&req).unwrap();
        assert_eq!(forwarded["messages"], body["messages"]);
    }

    #[test]
    fn test_forwarded_body_drops_unknown_fields() {
        let mut body = complete();
        body["temperature"] = json!(0.2);
        let req = parse(&body).unwrap();

        let forwarded = serde_json::to_value(&req).unwrap();
        assert_eq!(forwarded, complete());
    }
}
