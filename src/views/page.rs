use super::form::Form;
use crate::config::ColorScheme;
use crate::ops::TaskReport;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Read-only text area under a page's form showing command output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPane {
    text: String,
    ok: Option<bool>,
    scroll: u16,
}

impl OutputPane {
    pub fn set(&mut self, text: impl Into<String>, ok: bool) {
        self.text = text.into();
        self.ok = Some(ok);
        self.scroll = 0;
    }

    /// Show a report's output if it has one
    pub fn apply(&mut self, report: &TaskReport) {
        if let Some(output) = &report.output {
            self.set(output.clone(), report.ok);
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scroll_down(&mut self, amount: u16) {
        let max = self.text.lines().count().saturating_sub(1) as u16;
        self.scroll = self.scroll.saturating_add(amount).min(max);
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    fn draw(&self, frame: &mut Frame, area: Rect, scheme: &ColorScheme) {
        let style = match self.ok {
            Some(false) => Style::default().fg(scheme.error),
            _ => Style::default(),
        };
        let paragraph = Paragraph::new(self.text.as_str())
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .title("Output (PgUp/PgDn)")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(scheme.muted)),
            );
        frame.render_widget(paragraph, area);
    }
}

/// Standard page layout: heading, form, output pane
pub fn draw_page(
    frame: &mut Frame,
    area: Rect,
    heading: &str,
    form: &Form,
    output: &OutputPane,
    scheme: &ColorScheme,
) {
    let mut lines = vec![
        Line::from(Span::styled(
            heading.to_string(),
            Style::default()
                .fg(scheme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(form.lines(scheme));

    let form_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(form_height), Constraint::Min(3)])
        .split(area);

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );
    output.draw(frame, chunks[1], scheme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Payload;
    use crate::views::ViewType;

    #[test]
    fn test_apply_ignores_reports_without_output() {
        let mut pane = OutputPane::default();
        pane.set("before", true);
        pane.apply(&TaskReport {
            target: ViewType::Tags,
            ok: true,
            status: "ok".to_string(),
            output: None,
            payload: Payload::None,
        });
        assert_eq!(pane.text(), "before");
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut pane = OutputPane::default();
        pane.set("a\nb\nc", true);
        pane.scroll_down(10);
        assert_eq!(pane.scroll, 2);
        pane.scroll_up(5);
        assert_eq!(pane.scroll, 0);
    }
}
