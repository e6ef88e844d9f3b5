pub mod chat;
pub mod upload;
pub mod view;

pub use chat::*;
pub use upload::*;
pub use view::*;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::SelectedFile;
use crate::services::{SessionToken, Transport};

/// Drives both form flows against one backend, on behalf of one session.
pub struct ClientHandler<T, V> {
    pub(crate) config: Config,
    pub(crate) transport: T,
    pub(crate) view: V,
    pub(crate) token: Option<SessionToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Ready,
    Redirected { login_path: String },
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    UploadSubmitted(Vec<SelectedFile>),
    ChatSubmitted(String),
}

impl<T: Transport, V: View> ClientHandler<T, V> {
    pub fn new(config: Config, transport: T, view: V, token: Option<SessionToken>) -> Self {
        Self {
            config,
            transport,
            view,
            token,
        }
    }

    /// Sends the user to the login view when a token is required and none is held.
    pub fn check_session(&self) -> SessionCheck {
        if self.config.require_token && self.token.is_none() {
            warn!(login_path = %self.config.login_path, "No session token, redirecting to login");
            self.view.navigate(&self.config.login_path);
            return SessionCheck::Redirected {
                login_path: self.config.login_path.clone(),
            };
        }
        debug!(has_token = self.token.is_some(), "Session check passed");
        SessionCheck::Ready
    }

    /// `check_session` as a result, for callers that stop when redirected.
    pub fn require_session(&self) -> ClientResult<()> {
        match self.check_session() {
            SessionCheck::Ready => Ok(()),
            SessionCheck::Redirected { .. } => Err(ClientError::Unauthenticated),
        }
    }

    pub async fn handle(&self, event: FormEvent) -> ClientResult<()> {
        match event {
            FormEvent::UploadSubmitted(files) => {
                let outcome = self.submit_upload(files).await?;
                debug!(?outcome, "Upload event handled");
            }
            FormEvent::ChatSubmitted(message) => {
                let outcome = self.submit_chat(message).await?;
                debug!(?outcome, "Chat event handled");
            }
        }
        Ok(())
    }
}

/// Attached form handlers. Dropping or disposing detaches them.
pub struct Mounted {
    events: mpsc::UnboundedSender<FormEvent>,
    dispatcher: JoinHandle<()>,
}

impl Mounted {
    pub fn submit(&self, event: FormEvent) -> ClientResult<()> {
        self.events.send(event).map_err(|_| ClientError::Detached)
    }

    pub fn submit_upload(&self, files: Vec<SelectedFile>) -> ClientResult<()> {
        self.submit(FormEvent::UploadSubmitted(files))
    }

    pub fn submit_chat(&self, message: impl Into<String>) -> ClientResult<()> {
        self.submit(FormEvent::ChatSubmitted(message.into()))
    }

    /// Stops accepting submissions. Requests already in flight are not
    /// aborted; this returns once they have settled.
    pub async fn dispose(self) {
        let Mounted { events, dispatcher } = self;
        drop(events);
        if let Err(e) = dispatcher.await {
            error!(error = %e, "Form dispatcher terminated abnormally");
        }
        info!("Form handlers detached");
    }
}

/// Runs the session check and, if it passes, attaches the form handlers.
///
/// Must be called from within a Tokio runtime.
pub fn mount<T, V>(handler: ClientHandler<T, V>) -> Result<Mounted, SessionCheck>
where
    T: Transport + 'static,
    V: View + 'static,
{
    if let redirected @ SessionCheck::Redirected { .. } = handler.check_session() {
        return Err(redirected);
    }

    let (events, receiver) = mpsc::unbounded_channel();
    let dispatcher = tokio::spawn(dispatch(Arc::new(handler), receiver));
    info!("Form handlers attached");

    Ok(Mounted { events, dispatcher })
}

// Each submission runs in its own task; nothing orders their completion.
async fn dispatch<T, V>(handler: Arc<ClientHandler<T, V>>, mut events: mpsc::UnboundedReceiver<FormEvent>)
where
    T: Transport + 'static,
    V: View + 'static,
{
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    let handler = Arc::clone(&handler);
                    in_flight.spawn(async move { handler.handle(event).await });
                }
                None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => log_settled(joined),
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        log_settled(joined);
    }
}

fn log_settled(joined: Result<ClientResult<()>, tokio::task::JoinError>) {
    match joined {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error_code = e.error_code(), error = %e, "Form submission failed"),
        Err(e) => error!(error = %e, "Form submission task panicked"),
    }
}
