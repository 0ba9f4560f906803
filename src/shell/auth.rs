//! Log-in / sign-up dialog.
//!
//! There is no account backend: submitting shows a confirmation and closes the
//! dialog. Entered credentials are never stored.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome Back",
            AuthMode::Signup => "Create Account",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            AuthMode::Login => "Successfully logged in!",
            AuthMode::Signup => "Successfully registered!",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthDialog {
    pub open: bool,
    pub mode: AuthMode,
}

impl AuthDialog {
    pub fn opened(mode: AuthMode) -> Self {
        Self { open: true, mode }
    }

    /// Confirmation shown when the form is submitted; `None` while closed.
    pub fn submit_message(&self) -> Option<&'static str> {
        self.open.then(|| self.mode.success_message())
    }
}

/// Values typed into the form. Dropped after submission.
#[derive(Clone, Default)]
pub struct Credentials {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
