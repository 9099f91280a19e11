// Gateway module for view - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod pane;
mod sidebar;

// Public re-exports - the ONLY way to access view functionality
pub use pane::{format_time, pane_lines, LineKind, PaneLine, Speaker};
pub use sidebar::{sidebar_entries, sidebar_label, SidebarEntry};

use crate::session::{RenderRequest, SessionState};

/// Rendered sidebar and pane, refreshed only where a [`RenderRequest`] says so
#[derive(Debug, Default)]
pub struct SessionView {
    pub sidebar: Vec<SidebarEntry>,
    pub pane: Vec<PaneLine>,
    #[cfg(test)]
    sidebar_renders: u64,
    #[cfg(test)]
    pane_renders: u64,
}

impl SessionView {
    pub fn new(state: &SessionState) -> Self {
        let mut view = Self::default();
        view.apply(state, RenderRequest::BOTH);
        view
    }

    /// Rebuild the invalidated parts. Returns `true` when the pane was
    /// replaced, which also means it should be scrolled to the bottom.
    pub fn apply(&mut self, state: &SessionState, request: RenderRequest) -> bool {
        if request.sidebar {
            self.sidebar = sidebar_entries(state);
            #[cfg(test)]
            {
                self.sidebar_renders += 1;
            }
        }
        if request.pane {
            self.pane = pane_lines(state);
            #[cfg(test)]
            {
                self.pane_renders += 1;
            }
        }
        request.pane
    }

    #[cfg(test)]
    fn sidebar_renders(&self) -> u64 {
        self.sidebar_renders
    }

    #[cfg(test)]
    fn pane_renders(&self) -> u64 {
        self.pane_renders
    }

    /// Position of the active conversation in the sidebar
    pub fn active_index(&self) -> Option<usize> {
        self.sidebar.iter().position(|e| e.active)
    }
}
