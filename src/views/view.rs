use crate::ops::{Operation, TaskReport};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Actions that views can request
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action
    None,
    /// Quit the application
    Quit,
    /// Run an operation in the background
    Run(Operation),
    /// Close the current view, then run an operation
    Submit(Operation),
    /// Show a message on the status line without running anything
    Status(String),
    /// Push a new view onto the stack
    PushView(ViewType),
    /// Pop the current view and return to the previous one
    PopView,
    /// Open the local tag deletion dialog
    ConfirmDeleteLocal(String),
    /// Open the remote tag deletion dialog
    ConfirmDeleteRemote(String),
    /// Put text on the system clipboard
    Copy(String),
}

/// Types of views available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Pages,
    User,
    Settings,
    Aliases,
    Ssh,
    Clone,
    Tags,
    Releases,
    Confirm,
    Help,
    RebaseInfo,
}

/// Trait that all views must implement
pub trait View {
    /// Handle a key event, returns an action to perform
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action>;

    /// Update the view state (called on each frame)
    fn update(&mut self) -> Result<()> {
        Ok(())
    }

    /// Render the view
    fn draw(&mut self, frame: &mut Frame, area: Rect);

    /// Get the view's title (for status bar)
    fn title(&self) -> &str;

    fn view_type(&self) -> ViewType;

    /// A background operation finished. Every view sees every report and
    /// picks out what concerns it.
    fn on_report(&mut self, _report: &TaskReport) {}

    /// Called when the view is activated (moved to foreground)
    fn on_activate(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the view is deactivated (moved to background)
    fn on_deactivate(&mut self) -> Result<()> {
        Ok(())
    }
}
