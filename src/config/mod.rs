use std::env;
use anyhow::{Result, Context};
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";
pub const DEFAULT_CHAT_PATH: &str = "/chat";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub upload_path: String,
    pub chat_path: String,
    pub login_path: String,
    /// Redirect to the login view before wiring the forms when no token is held.
    pub require_token: bool,
    /// Raw cookie header the session token is read from.
    pub cookie: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            require_token: true,
            cookie: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_source(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            base_url: Self::string_var(&lookup, "PDFCHAT_BASE_URL", DEFAULT_BASE_URL),
            upload_path: Self::string_var(&lookup, "PDFCHAT_UPLOAD_PATH", DEFAULT_UPLOAD_PATH),
            chat_path: Self::string_var(&lookup, "PDFCHAT_CHAT_PATH", DEFAULT_CHAT_PATH),
            login_path: Self::string_var(&lookup, "PDFCHAT_LOGIN_PATH", DEFAULT_LOGIN_PATH),
            require_token: Self::parse_var(&lookup, "PDFCHAT_REQUIRE_TOKEN", true)
                .context("Failed to parse PDFCHAT_REQUIRE_TOKEN")?,
            cookie: lookup("PDFCHAT_COOKIE").filter(|c| !c.trim().is_empty()),
        };

        config.validate()?;

        info!(
            base_url = %config.base_url,
            require_token = config.require_token,
            cookie_present = config.cookie.is_some(),
            "Configuration loaded successfully"
        );
        Ok(config)
    }

    fn string_var<F>(lookup: &F, var_name: &str, default: &str) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(var_name) {
            Some(val) if !val.trim().is_empty() => val.trim().to_string(),
            _ => {
                info!("{} not set, using default: {}", var_name, default);
                default.to_string()
            }
        }
    }

    fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match lookup(var_name) {
            Some(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            None => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "PDFCHAT_BASE_URL must start with http:// or https://, got {}",
                self.base_url
            ));
        }
        for (name, path) in [
            ("PDFCHAT_UPLOAD_PATH", &self.upload_path),
            ("PDFCHAT_CHAT_PATH", &self.chat_path),
            ("PDFCHAT_LOGIN_PATH", &self.login_path),
        ] {
            if !path.starts_with('/') {
                return Err(anyhow::anyhow!("{} must start with '/', got {}", name, path));
            }
        }
        Ok(())
    }

    /// Absolute URL for an endpoint path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
