use serde::Serialize;
use serde_json::Value;

/// Endpoint that answers a single user message.
pub const CHAT_PATH: &str = "/api/chat";
/// Endpoint that discards the server-side conversation.
pub const CLEAR_PATH: &str = "/api/clear";

/// Body of `POST /api/chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    /// Asks the server to attach its `debug` trace to the reply.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub debug: bool,
}

/// Body of `POST /api/clear`: always `{}`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ClearRequest {}

/// Pulls a usable reply out of a `/api/chat` payload.
///
/// Usable means `reply` is present, is a string, and is not empty.
/// Anything else counts as the server breaking its contract.
pub fn reply_text(payload: &Value) -> Option<&str> {
    payload
        .get("reply")
        .and_then(Value::as_str)
        .filter(|reply| !reply.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_omits_debug_when_off() {
        let body = serde_json::to_value(ChatRequest {
            message: "hi",
            debug: false,
        })
        .unwrap();
        assert_eq!(body, json!({"message": "hi"}));
    }

    #[test]
    fn chat_request_includes_debug_when_on() {
        let body = serde_json::to_value(ChatRequest {
            message: "hi",
            debug: true,
        })
        .unwrap();
        assert_eq!(body, json!({"message": "hi", "debug": true}));
    }

    #[test]
    fn clear_request_is_empty_object() {
        assert_eq!(serde_json::to_string(&ClearRequest {}).unwrap(), "{}");
    }

    #[test]
    fn reply_text_accepts_non_empty_string() {
        assert_eq!(reply_text(&json!({"ok": true, "reply": "X"})), Some("X"));
        assert_eq!(reply_text(&json!({"reply": "  "})), Some("  "));
    }

    #[test]
    fn reply_text_rejects_unusable_payloads() {
        assert_eq!(reply_text(&json!({"reply": ""})), None);
        assert_eq!(reply_text(&json!({})), None);
        assert_eq!(reply_text(&json!({"reply": 42})), None);
        assert_eq!(reply_text(&json!({"reply": null})), None);
        assert_eq!(reply_text(&Value::Null), None);
        assert_eq!(reply_text(&json!(["reply"])), None);
    }
}
