use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Session token obtained by exchanging the API key with Twikey.
///
/// The token is sent verbatim in the `Authorization` header of every API call.
#[derive(Clone, Debug)]
pub struct SessionToken {
    pub(crate) token: Token,
    pub(crate) last_login: DateTime<Utc>,
}

impl SessionToken {
    /// Actual token contents held by this `SessionToken` instance.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Instant of the login that produced this token.
    pub fn last_login(&self) -> DateTime<Utc> {
        self.last_login
    }
}

impl Deref for SessionToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        self.token()
    }
}

/// Wrapper for a secret string that makes it harder to accidentally expose secrets
/// and ensures the backing memory is wiped on drop.
///
/// It is a wrapper around a [`secrecy::Secret`](secrecy::Secret).
///
/// ```rust
/// # use twikey_rust::apis::auth::Token;
/// let token = Token::new("my-api-key");
///
/// // The secret is redacted when printed with Debug
/// assert!(!format!("{:?}", token).contains("my-api-key"));
///
/// // But can be manually exposed calling `expose_secret()`
/// assert_eq!(token.expose_secret(), "my-api-key");
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Token(#[serde(serialize_with = "serialize_secret")] Secret<String>);

impl Token {
    /// Wraps a secret string in a new `Token`.
    pub fn new<T: Into<String>>(s: T) -> Self {
        Self(Secret::new(s.into()))
    }

    /// Exposes a reference to the underlying secret string.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl<T> From<T> for Token
where
    T: Into<String>,
{
    fn from(s: T) -> Self {
        Token::new(s)
    }
}

fn serialize_secret<S>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::ser::Serializer,
{
    secret.expose_secret().serialize(serializer)
}
