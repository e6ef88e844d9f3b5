use std::time::Instant;
use tracing::{info, warn};

use super::{ClientHandler, View};
use crate::error::{ClientError, ClientResult};
use crate::models::{ErrorBody, OutgoingRequest, SelectedFile, UploadResponse};
use crate::services::Transport;

pub const INVALID_PDF_MESSAGE: &str = "Please upload a valid PDF.";
pub const UPLOAD_LOGIN_MESSAGE: &str = "Please log in to upload.";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "PDF uploaded successfully.";
pub const UNKNOWN_ERROR_DETAIL: &str = "unknown error";

#[derive(Debug)]
pub enum UploadOutcome {
    /// Caught locally; nothing was sent.
    Rejected { reason: ClientError },
    LoginRequired,
    Uploaded(UploadResponse),
    Failed { status: u16, detail: String },
}

impl UploadOutcome {
    /// The outcome as a result, for callers that stop on failure. The user
    /// has already been told either way.
    pub fn into_result(self) -> ClientResult<UploadResponse> {
        match self {
            UploadOutcome::Uploaded(body) => Ok(body),
            UploadOutcome::Rejected { reason } => Err(reason),
            UploadOutcome::LoginRequired => Err(ClientError::Unauthenticated),
            UploadOutcome::Failed { status, detail } => Err(ClientError::remote(status, detail)),
        }
    }
}

/// Exactly one file, declared as `application/pdf`.
pub fn select_pdf(mut files: Vec<SelectedFile>) -> ClientResult<SelectedFile> {
    match files.len() {
        0 => Err(ClientError::MissingFile),
        1 => {
            let file = files.remove(0);
            if file.is_pdf() {
                Ok(file)
            } else {
                Err(ClientError::invalid_file(format!(
                    "{} is declared as {}",
                    file.name,
                    file.mime_type.as_deref().unwrap_or("no type")
                )))
            }
        }
        n => Err(ClientError::invalid_file(format!("expected one file, got {}", n))),
    }
}

impl<T: Transport, V: View> ClientHandler<T, V> {
    pub async fn submit_upload(&self, files: Vec<SelectedFile>) -> ClientResult<UploadOutcome> {
        let start = Instant::now();

        let file = match select_pdf(files) {
            Ok(file) => file,
            Err(reason) => {
                warn!(error = %reason, "Upload rejected before sending");
                self.view.alert(INVALID_PDF_MESSAGE);
                return Ok(UploadOutcome::Rejected { reason });
            }
        };

        info!(file_name = %file.name, file_size = file.size, "Submitting upload");

        let request = OutgoingRequest::upload(
            self.config.upload_path.clone(),
            file,
            self.token.clone(),
        );
        let reply = self.transport.send(request).await?;

        if reply.is_unauthorized() {
            warn!("Upload refused: not logged in");
            self.view.alert(UPLOAD_LOGIN_MESSAGE);
            self.view.navigate(&self.config.login_path);
            return Ok(UploadOutcome::LoginRequired);
        }

        if reply.is_success() {
            let body: UploadResponse = reply.json()?;
            info!(
                status = reply.status,
                filename = ?body.filename(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Upload completed successfully"
            );
            self.view.alert(UPLOAD_SUCCESS_MESSAGE);
            return Ok(UploadOutcome::Uploaded(body));
        }

        let detail = reply
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.detail_text())
            .unwrap_or_else(|| UNKNOWN_ERROR_DETAIL.to_string());
        warn!(status = reply.status, detail = %detail, "Upload failed");
        self.view.alert(&format!("Upload failed: {}", detail));
        Ok(UploadOutcome::Failed {
            status: reply.status,
            detail,
        })
    }
}
