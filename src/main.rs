use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdfchat::handlers::{mount, ClientHandler, View};
use pdfchat::models::SelectedFile;
use pdfchat::{ClientError, Config, HttpTransport, SessionToken};

#[derive(Parser, Debug)]
#[command(author, version, about = "Upload a PDF and chat about it")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a PDF document
    Upload { path: PathBuf },
    /// Ask one question about the uploaded document
    Chat { message: String },
    /// Read questions from stdin; `:upload <path>` uploads, `:quit` exits
    Interactive,
}

/// Alerts and chat output go to stdout, logs to stderr.
struct TerminalView {
    config: Config,
}

impl View for TerminalView {
    fn alert(&self, message: &str) {
        println!("[!] {}", message);
    }

    fn navigate(&self, path: &str) {
        println!("Open {} in your browser to continue.", self.config.url_for(path));
    }

    fn render_chat_output(&self, text: &str) {
        println!("{}", text);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdfchat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let token = config
        .cookie
        .as_deref()
        .and_then(SessionToken::from_cookie_header);
    let transport = HttpTransport::from_config(&config);
    let view = TerminalView {
        config: config.clone(),
    };
    let handler = ClientHandler::new(config, transport, view, token);

    match args.command {
        Command::Upload { path } => {
            handler.require_session()?;
            let file = SelectedFile::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            handler.submit_upload(vec![file]).await?.into_result()?;
        }
        Command::Chat { message } => {
            handler.require_session()?;
            handler.submit_chat(message).await?.into_result()?;
        }
        Command::Interactive => run_interactive(handler).await?,
    }

    Ok(())
}

async fn run_interactive(handler: ClientHandler<HttpTransport, TerminalView>) -> anyhow::Result<()> {
    let mounted = match mount(handler) {
        Ok(mounted) => mounted,
        Err(_) => return Err(ClientError::Unauthenticated.into()),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == ":quit" {
            break;
        }
        if let Some(path) = line.strip_prefix(":upload ") {
            match SelectedFile::from_path(path.trim()).await {
                Ok(file) => mounted.submit_upload(vec![file])?,
                Err(e) => eprintln!("Cannot read {}: {}", path.trim(), e),
            }
            continue;
        }
        mounted.submit_chat(line)?;
    }

    mounted.dispose().await;
    Ok(())
}
