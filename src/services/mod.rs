pub mod token;
pub mod transport;

pub use token::{parse_token, SessionToken, ACCESS_TOKEN_COOKIE};
pub use transport::{HttpTransport, Transport};
