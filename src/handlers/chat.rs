use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ClientHandler, View};
use crate::error::{ClientError, ClientResult};
use crate::models::{ChatRequest, ErrorBody, OutgoingRequest};
use crate::services::Transport;

use super::upload::UNKNOWN_ERROR_DETAIL;

pub const CHAT_LOGIN_MESSAGE: &str = "Please log in to chat.";
pub const CHAT_OUTPUT_PREFIX: &str = "AI: ";

#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    LoginRequired,
    Answered(String),
    Failed { status: u16, detail: String },
}

impl ChatOutcome {
    pub fn into_result(self) -> ClientResult<String> {
        match self {
            ChatOutcome::Answered(answer) => Ok(answer),
            ChatOutcome::LoginRequired => Err(ClientError::Unauthenticated),
            ChatOutcome::Failed { status, detail } => Err(ClientError::remote(status, detail)),
        }
    }
}

impl<T: Transport, V: View> ClientHandler<T, V> {
    /// Sends `message` exactly as typed, empty or not.
    pub async fn submit_chat(&self, message: String) -> ClientResult<ChatOutcome> {
        debug!(message_length = message.len(), "Submitting chat message");

        let request = OutgoingRequest::chat(
            self.config.chat_path.clone(),
            &ChatRequest { message },
            self.token.clone(),
        )?;
        let reply = self.transport.send(request).await?;

        if reply.is_unauthorized() {
            warn!("Chat refused: not logged in");
            self.view.alert(CHAT_LOGIN_MESSAGE);
            self.view.navigate(&self.config.login_path);
            return Ok(ChatOutcome::LoginRequired);
        }

        // A 2xx body must be JSON; its `response` is shown even when missing.
        if reply.is_success() {
            let body: Value = reply.json()?;
            let answer = response_text(&body).unwrap_or_default();
            return Ok(self.render_answer(reply.status, answer));
        }

        let body: Option<Value> = reply.json().ok();
        if let Some(answer) = body.as_ref().and_then(response_text) {
            return Ok(self.render_answer(reply.status, answer));
        }

        let detail = body
            .and_then(|body| serde_json::from_value::<ErrorBody>(body).ok())
            .and_then(|body| body.detail_text())
            .unwrap_or_else(|| UNKNOWN_ERROR_DETAIL.to_string());
        warn!(status = reply.status, detail = %detail, "Chat failed");
        self.view.alert(&format!("Chat failed: {}", detail));
        Ok(ChatOutcome::Failed {
            status: reply.status,
            detail,
        })
    }

    fn render_answer(&self, status: u16, answer: String) -> ChatOutcome {
        info!(status = status, answer_length = answer.len(), "Chat answered");
        self.view
            .render_chat_output(&format!("{}{}", CHAT_OUTPUT_PREFIX, answer));
        ChatOutcome::Answered(answer)
    }
}

fn response_text(body: &Value) -> Option<String> {
    match body.get("response")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
