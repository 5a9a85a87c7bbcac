use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Scrollable text page: key bindings, or the pull-rebase explanation
pub struct HelpView {
    kind: ViewType,
    scroll_offset: usize,
    lines: Vec<Line<'static>>,
}

impl HelpView {
    /// Create a new help view
    pub fn new(scheme: &ColorScheme) -> Self {
        Self {
            kind: ViewType::Help,
            scroll_offset: 0,
            lines: Self::build_help_lines(scheme),
        }
    }

    /// What `pull.rebase` changes
    pub fn rebase_info(scheme: &ColorScheme) -> Self {
        Self {
            kind: ViewType::RebaseInfo,
            scroll_offset: 0,
            lines: Self::build_rebase_lines(scheme),
        }
    }

    fn heading(text: &str, scheme: &ColorScheme) -> Line<'static> {
        Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(scheme.accent)
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn binding(keys: &str, text: &str, scheme: &ColorScheme) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {:<14}", keys), Style::default().fg(scheme.success)),
            Span::raw(text.to_string()),
        ])
    }

    /// Build the help content
    fn build_help_lines(scheme: &ColorScheme) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                "gitsafe - Help",
                Style::default()
                    .fg(scheme.warning)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::heading("Global", scheme),
            Self::binding("Ctrl+C Ctrl+Q", "Quit", scheme),
            Self::binding("F1", "Show this help", scheme),
            Self::binding("Ctrl+N Ctrl+P", "Next / previous page", scheme),
            Self::binding("Alt+1..7", "Jump to page", scheme),
            Self::binding("Esc", "Close help or dialog", scheme),
            Line::from(""),
            Self::heading("Forms", scheme),
            Self::binding("Up Down Tab", "Move between fields", scheme),
            Self::binding("Enter", "Press button; in a text field, go to the next field", scheme),
            Self::binding("Space", "Toggle checkbox, next choice", scheme),
            Self::binding("Left Right", "Change choice or number", scheme),
            Self::binding("PgUp PgDn", "Scroll the output pane", scheme),
            Line::from(""),
            Self::heading("Pages", scheme),
            Self::binding("User", "Global user.name and user.email", scheme),
            Self::binding("Settings", "Editor, branch, colors, push, rebase, credentials", scheme),
            Self::binding("Aliases", "Recommended command shortcuts", scheme),
            Self::binding("SSH", "Check, generate and copy your SSH key", scheme),
            Self::binding("Clone", "Clone a repository into a directory", scheme),
            Self::binding("Tags", "Select repository; list, create, push, delete tags", scheme),
            Self::binding("Releases", "Changelog, release tags and notes", scheme),
            Line::from(""),
            Self::heading("Deleting tags", scheme),
            Line::from("Local deletion asks for one final confirmation."),
            Line::from("Remote deletion affects every collaborator: it requires three"),
            Line::from("acknowledgements and the tag name typed exactly."),
            Line::from(""),
            Self::heading("Files", scheme),
            Line::from("  ~/.config/gitsafe/config.yaml   colors and settings"),
            Line::from("  GITSAFE_LOG=debug               more detailed log file"),
            Line::from(""),
            Line::from("Press q or Esc to close this help."),
        ]
    }

    fn build_rebase_lines(scheme: &ColorScheme) -> Vec<Line<'static>> {
        vec![
            Self::heading("Rebase on pull", scheme),
            Line::from(""),
            Line::from("By default `git pull` merges the remote branch into yours,"),
            Line::from("creating a merge commit whenever both sides have new commits."),
            Line::from(""),
            Line::from("With pull.rebase = true, `git pull` instead replays your local"),
            Line::from("commits on top of the fetched ones. History stays linear:"),
            Line::from(""),
            Line::from("  merge:   A---B---C---M      rebase:  A---B---C---D'"),
            Line::from("                \\     /"),
            Line::from("                 D---'"),
            Line::from(""),
            Self::heading("When to use it", scheme),
            Line::from("  - Feature branches that only you work on"),
            Line::from("  - Teams that prefer a linear history"),
            Line::from(""),
            Self::heading("Be careful", scheme),
            Line::from("  - Rebasing rewrites your local commits; never rebase commits"),
            Line::from("    that others already pulled"),
            Line::from("  - Conflicts are resolved commit by commit:"),
            Line::from("    fix, `git add`, then `git rebase --continue`"),
            Line::from("    or give up with `git rebase --abort`"),
            Line::from(""),
            Line::from("Press q or Esc to close."),
        ]
    }

    /// Scroll down
    fn scroll_down(&mut self, amount: usize) {
        let max_scroll = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max_scroll);
    }

    /// Scroll up
    fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }
}

impl View for HelpView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::F(1) => Ok(Action::PopView),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_down(1);
                Ok(Action::None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_up(1);
                Ok(Action::None)
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll_offset = 0;
                Ok(Action::None)
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.scroll_offset = self.lines.len().saturating_sub(1);
                Ok(Action::None)
            }
            KeyCode::PageDown => {
                self.scroll_down(20);
                Ok(Action::None)
            }
            KeyCode::PageUp => {
                self.scroll_up(20);
                Ok(Action::None)
            }
            _ => Ok(Action::None),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;

        let visible_lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll_offset)
            .take(visible_height)
            .cloned()
            .collect();

        let title = format!(
            "{} - {} / {} lines",
            self.title(),
            self.scroll_offset + visible_lines.len().min(visible_height),
            self.lines.len()
        );

        let paragraph =
            Paragraph::new(visible_lines).block(Block::default().title(title).borders(Borders::ALL));

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);

        if self.lines.len() > visible_height {
            let mut state = ScrollbarState::default()
                .content_length(self.lines.len())
                .position(self.scroll_offset);
            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));
            frame.render_stateful_widget(
                scrollbar,
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut state,
            );
        }
    }

    fn title(&self) -> &str {
        match self.kind {
            ViewType::RebaseInfo => "Rebase info",
            _ => "Help",
        }
    }

    fn view_type(&self) -> ViewType {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_scroll_is_bounded() {
        let mut view = HelpView::new(&ColorScheme::default());
        view.scroll_up(5);
        assert_eq!(view.scroll_offset, 0);
        view.scroll_down(1000);
        assert_eq!(view.scroll_offset, view.lines.len() - 1);
    }

    #[test]
    fn test_escape_closes() {
        let mut view = HelpView::rebase_info(&ColorScheme::default());
        assert_eq!(view.view_type(), ViewType::RebaseInfo);
        let action = view
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, Action::PopView);
    }

    #[test]
    fn test_draw_rebase_info() {
        let mut view = HelpView::rebase_info(&ColorScheme::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| view.draw(frame, frame.area())).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Rebase on pull"));
        assert!(content.contains("git rebase --abort"));
    }
}
