use std::fmt;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Returns the value of cookie `name` in a `Cookie`-style header, up to the next `;`.
///
/// Only an exact key match counts, so `my_access_token=...` is not mistaken for
/// `access_token`. An empty value is treated as absent.
pub fn parse_token(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|segment| segment.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Opaque session token issued by the login flow.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn from_cookie_header(cookie_header: &str) -> Option<Self> {
        parse_token(cookie_header, ACCESS_TOKEN_COOKIE).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = if self.0.chars().count() > 8 {
            self.0.chars().take(4).collect()
        } else {
            String::new()
        };
        write!(f, "SessionToken({}…)", shown)
    }
}
