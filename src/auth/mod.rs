//! auth
//!
//! Credential resolution for the GitHub API.
//!
//! # Overview
//!
//! The export can run with a personal access token, with a username and
//! password (HTTP basic), or anonymously. Credentials are resolved once,
//! before any request, and handed to the forge as a plain value.
//!
//! # Resolution Rules
//!
//! 1. A username selects basic auth. The password comes from the inputs
//!    or, failing that, from a [`PasswordPrompt`]. Any token is ignored.
//! 2. Otherwise a non-empty token selects bearer auth.
//! 3. Otherwise requests are anonymous (subject to lower rate limits).
//!
//! # Security
//!
//! Secrets are never logged. [`Credentials`] redacts them in `Debug`.
//!
//! # Example
//!
//! ```
//! use ghexport::auth::{resolve, CredentialInputs, Credentials, NoPrompt};
//!
//! let inputs = CredentialInputs {
//!     token: Some("ghp_example".to_string()),
//!     ..Default::default()
//! };
//! let creds = resolve(inputs, &NoPrompt).unwrap();
//! assert_eq!(creds.kind(), "token");
//! assert!(!format!("{:?}", creds).contains("ghp_example"));
//! ```

mod errors;

pub use errors::AuthError;

use std::io::IsTerminal;

/// Credentials attached to every API request.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// No authentication
    #[default]
    Anonymous,
    /// Bearer token (personal access token or app token)
    Token(String),
    /// HTTP basic authentication
    Basic {
        /// Account login
        username: String,
        /// Password or token used as password
        password: String,
    },
}

impl Credentials {
    /// Short name of the credential kind, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Anonymous => "anonymous",
            Credentials::Token(_) => "token",
            Credentials::Basic { .. } => "basic",
        }
    }
}

// Custom Debug to avoid exposing secrets
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Raw credential inputs gathered from flags and environment.
#[derive(Clone, Default)]
pub struct CredentialInputs {
    /// Token from `--token`, `$GITHUBTOKEN` or `$GITHUB_TOKEN`
    pub token: Option<String>,
    /// Username from `--username` or `$GITHUB_USERNAME`
    pub username: Option<String>,
    /// Password from `--password` or `$GITHUB_PASSWORD`
    pub password: Option<String>,
}

/// Source of a password when none was supplied up front.
pub trait PasswordPrompt {
    /// Ask for the password of `username`.
    ///
    /// Returns `Ok(None)` if no password can be obtained (e.g. no terminal).
    fn password_for(&self, username: &str) -> Result<Option<String>, AuthError>;
}

/// Prompts on the controlling terminal with hidden input.
///
/// Yields nothing when stdin is not a terminal, so piped or scheduled
/// runs fail fast instead of hanging.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn password_for(&self, username: &str) -> Result<Option<String>, AuthError> {
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }
        rpassword::prompt_password(format!("GitHub password for {}: ", username))
            .map(Some)
            .map_err(|e| AuthError::Prompt(e.to_string()))
    }
}

/// Never yields a password.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl PasswordPrompt for NoPrompt {
    fn password_for(&self, _username: &str) -> Result<Option<String>, AuthError> {
        Ok(None)
    }
}

/// Drop empty and whitespace-only values.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve credential inputs into [`Credentials`].
///
/// # Errors
///
/// - [`AuthError::MissingPassword`] if a username has no password and the
///   prompt yields none
/// - [`AuthError::Prompt`] if the prompt itself fails
pub fn resolve(
    inputs: CredentialInputs,
    prompt: &dyn PasswordPrompt,
) -> Result<Credentials, AuthError> {
    let token = non_empty(inputs.token);

    if let Some(username) = non_empty(inputs.username) {
        if token.is_some() {
            tracing::warn!(%username, "username given, ignoring token");
        }
        let password = match non_empty(inputs.password) {
            Some(p) => p,
            None => non_empty(prompt.password_for(&username)?)
                .ok_or_else(|| AuthError::MissingPassword(username.clone()))?,
        };
        return Ok(Credentials::Basic { username, password });
    }

    Ok(match token {
        Some(token) => Credentials::Token(token.trim().to_string()),
        None => Credentials::Anonymous,
    })
}
