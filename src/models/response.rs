use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

pub const UNAUTHORIZED: u16 = 401;

/// Status and raw body of a backend reply; the body is parsed on demand.
#[derive(Debug, Clone)]
pub struct ServerReply {
    pub status: u16,
    pub body: Bytes,
}

impl ServerReply {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == UNAUTHORIZED
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Upload success body. The backend may send any JSON; `status` and
/// `filename` are read when present as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadResponse(pub serde_json::Value);

impl UploadResponse {
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(serde_json::Value::as_str)
    }

    pub fn filename(&self) -> Option<&str> {
        self.0.get("filename").and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail` as display text. Validation errors carry structured details,
    /// which are rendered as JSON.
    pub fn detail_text(&self) -> Option<String> {
        match &self.detail {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}
