//! pdfchat client
//!
//! Client-side handling for a PDF chat backend: uploading a document,
//! asking questions about it and carrying the session token along.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use handlers::{mount, ClientHandler, FormEvent, Mounted, SessionCheck, View};
pub use services::{parse_token, HttpTransport, SessionToken, Transport};
