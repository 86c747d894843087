//! Login credentials passed into a run for authentication steps.

use std::fmt;

use serde::{Deserialize, Serialize};

const USERNAME_PLACEHOLDER: &str = "{username}";
const PASSWORD_PLACEHOLDER: &str = "{password}";

/// Credentials for login flows. The password never appears in Debug or
/// Display output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Substitute credential placeholders in planned input text.
    pub fn fill(&self, text: &str) -> String {
        text.replace(USERNAME_PLACEHOLDER, &self.username)
            .replace(PASSWORD_PLACEHOLDER, &self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
