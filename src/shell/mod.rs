//! The shell around the widgets: filter state, navigation, theme, auth
//! dialog and chat panel.

mod auth;
mod router;
mod state;

pub use auth::{AuthDialog, AuthMode, Credentials};
pub use router::Router;
pub use state::{ShellAction, ShellState, View};
