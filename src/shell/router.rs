//! Keeps the mounted widget in step with the shell's [`View`].

use super::state::View;
use crate::registry::ToolKind;
use crate::widgets::{self, Widget};

/// Owns at most one widget session.
#[derive(Default)]
pub struct Router {
    mounted: Option<Box<dyn Widget>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount or unmount so the session matches `view`.
    ///
    /// Returns true when a new session was mounted. Leaving a tool drops its
    /// session and every artifact it holds.
    pub fn sync(&mut self, view: View) -> bool {
        let wanted = match view {
            View::Grid => None,
            View::Tool(kind) => Some(kind),
        };
        if self.active() == wanted {
            return false;
        }

        if let Some(old) = self.mounted.take() {
            tracing::debug!(tool = old.kind().id(), "Unmounting widget");
        }
        match wanted {
            Some(kind) => {
                self.mounted = Some(widgets::mount(kind));
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<ToolKind> {
        self.mounted.as_ref().map(|w| w.kind())
    }

    pub fn widget(&self) -> Option<&dyn Widget> {
        self.mounted.as_deref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut (dyn Widget + 'static)> {
        self.mounted.as_deref_mut()
    }
}
