use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ClientError, ClientResult};
use crate::services::SessionToken;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const UPLOAD_FIELD: &str = "file";

/// A file picked by the user, with the MIME type the picker declared for it.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len(),
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Reads a file from disk and declares its type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::invalid_file(format!("{} has no file name", path.display())))?
            .to_string();
        let content = tokio::fs::read(path).await?;
        let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

        tracing::debug!(file_name = %name, size = content.len(), mime_type = %mime_type, "Loaded file from disk");
        Ok(Self::new(name, content).with_mime_type(mime_type))
    }

    /// Only the declared type counts; the content is never sniffed.
    pub fn is_pdf(&self) -> bool {
        self.mime_type.as_deref() == Some(PDF_MIME_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Multipart { field: &'static str, file: SelectedFile },
    Json(serde_json::Value),
}

/// One POST to the backend.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub path: String,
    pub body: RequestBody,
    pub bearer: Option<SessionToken>,
}

impl OutgoingRequest {
    pub fn upload(path: impl Into<String>, file: SelectedFile, bearer: Option<SessionToken>) -> Self {
        Self {
            path: path.into(),
            body: RequestBody::Multipart {
                field: UPLOAD_FIELD,
                file,
            },
            bearer,
        }
    }

    pub fn chat(
        path: impl Into<String>,
        request: &ChatRequest,
        bearer: Option<SessionToken>,
    ) -> ClientResult<Self> {
        Ok(Self {
            path: path.into(),
            body: RequestBody::Json(serde_json::to_value(request)?),
            bearer,
        })
    }
}
