use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::ops::TaskReport;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Tabbed container holding one view per page
pub struct PagesView {
    pages: Vec<Box<dyn View>>,
    active: usize,
    scheme: ColorScheme,
}

impl PagesView {
    pub fn new(pages: Vec<Box<dyn View>>, scheme: ColorScheme) -> Self {
        Self {
            pages,
            active: 0,
            scheme,
        }
    }

    pub fn active_type(&self) -> Option<ViewType> {
        self.pages.get(self.active).map(|p| p.view_type())
    }

    fn activate(&mut self, index: usize) -> Result<()> {
        if index == self.active || index >= self.pages.len() {
            return Ok(());
        }
        self.pages[self.active].on_deactivate()?;
        self.active = index;
        self.pages[self.active].on_activate()
    }

    fn next(&mut self) -> Result<()> {
        if self.pages.is_empty() {
            return Ok(());
        }
        self.activate((self.active + 1) % self.pages.len())
    }

    fn prev(&mut self) -> Result<()> {
        if self.pages.is_empty() {
            return Ok(());
        }
        self.activate((self.active + self.pages.len() - 1) % self.pages.len())
    }
}

impl View for PagesView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('n') | KeyCode::Right if ctrl => self.next()?,
            KeyCode::Char('p') | KeyCode::Left if ctrl => self.prev()?,
            KeyCode::Char(c @ '1'..='9') if alt => {
                let index = c as usize - '1' as usize;
                self.activate(index)?;
            }
            _ => {
                return match self.pages.get_mut(self.active) {
                    Some(page) => page.handle_key(key),
                    None => Ok(Action::None),
                };
            }
        }
        Ok(Action::None)
    }

    fn update(&mut self) -> Result<()> {
        for page in self.pages.iter_mut() {
            page.update()?;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let titles: Vec<Line> = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| Line::from(format!("{} {}", i + 1, p.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.active)
            .block(Block::default().borders(Borders::ALL).title("gitsafe"))
            .highlight_style(
                Style::default()
                    .fg(self.scheme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, chunks[0]);

        if let Some(page) = self.pages.get_mut(self.active) {
            page.draw(frame, chunks[1]);
        }
    }

    fn title(&self) -> &str {
        self.pages
            .get(self.active)
            .map(|p| p.title())
            .unwrap_or("gitsafe")
    }

    fn view_type(&self) -> ViewType {
        ViewType::Pages
    }

    fn on_report(&mut self, report: &TaskReport) {
        for page in self.pages.iter_mut() {
            page.on_report(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{CloneView, ReleaseView, TagsView};
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::Path;

    fn pages() -> PagesView {
        let scheme = ColorScheme::default();
        PagesView::new(
            vec![
                Box::new(TagsView::new(scheme.clone(), Path::new("/repo"))),
                Box::new(ReleaseView::new(scheme.clone())),
                Box::new(CloneView::new(scheme.clone(), Path::new("/home"))),
            ],
            scheme,
        )
    }

    #[test]
    fn test_cycle_pages() {
        let mut view = pages();
        assert_eq!(view.title(), "Tags");
        view.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(view.title(), "Releases");
        view.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL))
            .unwrap();
        view.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(view.title(), "Clone");
    }

    #[test]
    fn test_alt_digit_jumps() {
        let mut view = pages();
        view.handle_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT))
            .unwrap();
        assert_eq!(view.active_type(), Some(ViewType::Releases));
        // out of range is ignored
        view.handle_key(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::ALT))
            .unwrap();
        assert_eq!(view.active_type(), Some(ViewType::Releases));
    }

    #[test]
    fn test_plain_keys_reach_active_page() {
        let mut view = pages();
        for _ in 0..3 {
            view.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
                .unwrap();
        }
        // "List tags" button
        let action = view
            .handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(action, Action::Run(_)));
    }

    #[test]
    fn test_draw_tab_bar() {
        let mut view = pages();
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|frame| view.draw(frame, frame.area())).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("1 Tags"));
        assert!(content.contains("3 Clone"));
    }
}
