use super::view::{Action, View, ViewType};
use crate::ops::TaskReport;
use anyhow::{anyhow, Result};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Manages a stack of views: the pages at the bottom, dialogs above
pub struct ViewManager {
    view_stack: Vec<Box<dyn View>>,
}

impl ViewManager {
    pub fn new() -> Self {
        Self {
            view_stack: Vec::new(),
        }
    }

    /// Push a view onto the stack
    pub fn push(&mut self, view: Box<dyn View>) -> Result<()> {
        if let Some(current) = self.view_stack.last_mut() {
            current.on_deactivate()?;
        }
        self.view_stack.push(view);
        if let Some(new) = self.view_stack.last_mut() {
            new.on_activate()?;
        }
        Ok(())
    }

    /// Pop the current view from the stack
    pub fn pop(&mut self) -> Result<()> {
        if self.view_stack.len() <= 1 {
            return Err(anyhow!("Cannot pop the last view"));
        }

        if let Some(mut old_view) = self.view_stack.pop() {
            old_view.on_deactivate()?;
        }

        if let Some(current) = self.view_stack.last_mut() {
            current.on_activate()?;
        }

        Ok(())
    }

    /// Get the current view
    pub fn current(&self) -> Option<&dyn View> {
        self.view_stack.last().map(|b| b.as_ref())
    }

    /// Get a mutable reference to the current view
    pub fn current_mut(&mut self) -> Option<&mut Box<dyn View>> {
        self.view_stack.last_mut()
    }

    pub fn current_type(&self) -> Option<ViewType> {
        self.current().map(|v| v.view_type())
    }

    /// Handle a key event, delegating to the current view
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        if let Some(view) = self.current_mut() {
            view.handle_key(key)
        } else {
            Ok(Action::None)
        }
    }

    /// Update every view; background views may still be waiting on work
    pub fn update(&mut self) -> Result<()> {
        for view in self.view_stack.iter_mut() {
            view.update()?;
        }
        Ok(())
    }

    /// Hand a finished operation's report to every view
    pub fn deliver(&mut self, report: &TaskReport) {
        for view in self.view_stack.iter_mut() {
            view.on_report(report);
        }
    }

    /// Render the stack bottom-up so dialogs appear over the pages
    pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
        for view in self.view_stack.iter_mut() {
            view.draw(frame, area);
        }
    }

    /// Get the title of the current view
    pub fn current_title(&self) -> &str {
        self.current().map(|v| v.title()).unwrap_or("gitsafe")
    }
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Payload;
    use crossterm::event::{KeyCode, KeyModifiers};

    // Mock view for testing
    struct MockView {
        title: String,
        activated: bool,
        reports: usize,
    }

    impl MockView {
        fn new(title: &str) -> Self {
            Self {
                title: title.to_string(),
                activated: false,
                reports: 0,
            }
        }
    }

    impl View for MockView {
        fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
            match key.code {
                KeyCode::Esc => Ok(Action::PopView),
                _ => Ok(Action::None),
            }
        }

        fn draw(&mut self, _frame: &mut Frame, _area: Rect) {}

        fn title(&self) -> &str {
            &self.title
        }

        fn view_type(&self) -> ViewType {
            ViewType::Help
        }

        fn on_report(&mut self, _report: &TaskReport) {
            self.reports += 1;
            self.title = format!("{} ({})", self.title, self.reports);
        }

        fn on_activate(&mut self) -> Result<()> {
            self.activated = true;
            Ok(())
        }

        fn on_deactivate(&mut self) -> Result<()> {
            self.activated = false;
            Ok(())
        }
    }

    fn report() -> TaskReport {
        TaskReport {
            target: ViewType::Tags,
            ok: true,
            status: "done".to_string(),
            output: None,
            payload: Payload::None,
        }
    }

    #[test]
    fn test_view_manager_creation() {
        let manager = ViewManager::new();
        assert_eq!(manager.current_type(), None);
        assert_eq!(manager.current_title(), "gitsafe");
    }

    #[test]
    fn test_push_and_pop() {
        let mut manager = ViewManager::new();
        manager.push(Box::new(MockView::new("View1"))).unwrap();
        manager.push(Box::new(MockView::new("View2"))).unwrap();
        assert_eq!(manager.current_title(), "View2");

        manager.pop().unwrap();
        assert_eq!(manager.current_title(), "View1");
    }

    #[test]
    fn test_cannot_pop_last_view() {
        let mut manager = ViewManager::new();
        manager.push(Box::new(MockView::new("View1"))).unwrap();

        assert!(manager.pop().is_err());
        assert_eq!(manager.current_title(), "View1");
    }

    #[test]
    fn test_keys_go_to_top_view() {
        let mut manager = ViewManager::new();
        manager.push(Box::new(MockView::new("View1"))).unwrap();
        let action = manager
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, Action::PopView);
    }

    #[test]
    fn test_deliver_reaches_every_view() {
        let mut manager = ViewManager::new();
        manager.push(Box::new(MockView::new("View1"))).unwrap();
        manager.push(Box::new(MockView::new("View2"))).unwrap();

        manager.deliver(&report());
        assert_eq!(manager.current_title(), "View2 (1)");
        manager.pop().unwrap();
        assert_eq!(manager.current_title(), "View1 (1)");
    }
}
