use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::ClientResult;
use crate::models::{OutgoingRequest, RequestBody, ServerReply};

/// Sends one request to the backend per call. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutgoingRequest) -> ClientResult<ServerReply>;
}

/// `Transport` over HTTP. No timeout is configured beyond the client defaults.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutgoingRequest) -> ClientResult<ServerReply> {
        let start = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.client.post(&url);
        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, token.bearer());
        }

        builder = match request.body {
            RequestBody::Multipart { field, file } => {
                debug!(
                    request_id = %request_id,
                    file_name = %file.name,
                    file_size = file.size,
                    "Building multipart body"
                );
                let mut part = Part::bytes(file.content.to_vec()).file_name(file.name);
                if let Some(mime_type) = &file.mime_type {
                    part = part.mime_str(mime_type)?;
                }
                builder.multipart(Form::new().part(field, part))
            }
            RequestBody::Json(value) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&value)?),
        };

        info!(
            request_id = %request_id,
            url = %url,
            authenticated = request.bearer.is_some(),
            "Sending request"
        );

        let response = builder.send().await.map_err(|e| {
            error!(request_id = %request_id, error = %e, "Request failed");
            e
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        info!(
            request_id = %request_id,
            status = status,
            body_bytes = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Response received"
        );

        Ok(ServerReply::new(status, body))
    }
}
