use serde::{Deserialize, Serialize};

// -- Session --

/// JWT claims carried in the session cookie. `sub` is the username, which is
/// the primary key of the users table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Auth forms --

/// Fields missing from the submitted form deserialize as empty strings so the
/// handlers can answer with an inline message instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// -- Chat --

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: ChatStatus,
}

impl ChatResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            response: reply.into(),
            status: ChatStatus::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: message.into(),
            status: ChatStatus::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_wire_format() {
        let json = serde_json::to_value(ChatResponse::success("Rotate your crops.")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "response": "Rotate your crops.", "status": "success" })
        );

        let json = serde_json::to_value(ChatResponse::error("nope")).unwrap();
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn test_chat_request_missing_message_is_empty() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_empty());
    }
}
