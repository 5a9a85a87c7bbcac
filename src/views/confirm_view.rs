use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::confirm::{LocalDeleteGate, RemoteCheck, RemoteDeleteGate};
use crate::ops::{Operation, Payload, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

enum Gate {
    Local(LocalDeleteGate),
    Remote(RemoteDeleteGate),
}

/// Modal dialog guarding a tag deletion
///
/// The dialog opens while the local existence lookup is still running and
/// only lets the deletion through once its gate is satisfied.
pub struct ConfirmView {
    gate: Gate,
    /// Focused row: a checkbox, or one past the last checkbox for the name input
    focus: usize,
    scheme: ColorScheme,
}

impl ConfirmView {
    pub fn local(tag: impl Into<String>, scheme: ColorScheme) -> Self {
        Self {
            gate: Gate::Local(LocalDeleteGate::new(tag)),
            focus: 0,
            scheme,
        }
    }

    pub fn remote(tag: impl Into<String>, scheme: ColorScheme) -> Self {
        Self {
            gate: Gate::Remote(RemoteDeleteGate::new(tag)),
            focus: 0,
            scheme,
        }
    }

    pub fn tag(&self) -> &str {
        match &self.gate {
            Gate::Local(gate) => gate.tag(),
            Gate::Remote(gate) => gate.tag(),
        }
    }

    fn rows(&self) -> usize {
        match &self.gate {
            Gate::Local(_) => 1,
            Gate::Remote(gate) => gate.checks().len() + 1,
        }
    }

    fn confirm(&self) -> Action {
        match &self.gate {
            Gate::Local(gate) => match gate.exists() {
                None => Action::Status("Still checking whether the tag exists...".to_string()),
                Some(false) => Action::Status(format!("Tag not found: '{}'", gate.tag())),
                Some(true) if gate.is_satisfied() => {
                    Action::Submit(Operation::DeleteLocalTag(gate.tag().to_string()))
                }
                Some(true) => Action::Status("You must confirm you understand".to_string()),
            },
            Gate::Remote(gate) => {
                if gate.is_satisfied() {
                    Action::Submit(Operation::DeleteRemoteTag(gate.tag().to_string()))
                } else if gate.exists_locally().is_none() {
                    Action::Status("Still checking whether the tag exists...".to_string())
                } else if !gate.name_matches() {
                    Action::Status("The typed name does not match the tag".to_string())
                } else {
                    Action::Status("You must check all required confirmations".to_string())
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Action {
        let rows = self.rows();
        match key.code {
            KeyCode::Esc => return Action::PopView,
            KeyCode::Down | KeyCode::Tab => self.focus = (self.focus + 1) % rows,
            KeyCode::Up | KeyCode::BackTab => self.focus = (self.focus + rows - 1) % rows,
            KeyCode::Enter => return self.confirm(),
            _ => {}
        }

        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let focus = self.focus;
        match &mut self.gate {
            Gate::Local(gate) => {
                if key.code == KeyCode::Char(' ') {
                    gate.understands_irreversible = !gate.understands_irreversible;
                }
            }
            Gate::Remote(gate) => {
                let checks = gate.checks();
                match checks.get(focus) {
                    Some(check) if key.code == KeyCode::Char(' ') => gate.toggle(*check),
                    Some(_) => {}
                    None => match key.code {
                        KeyCode::Char(c) if plain => gate.typed_name.push(c),
                        KeyCode::Backspace => {
                            gate.typed_name.pop();
                        }
                        _ => {}
                    },
                }
            }
        }
        Action::None
    }

    fn checkbox(&self, row: usize, checked: bool, label: &str) -> Line<'static> {
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = if row == self.focus {
            self.scheme.selected
        } else {
            Style::default()
        };
        Line::from(Span::styled(format!(" {} {}", mark, label), style))
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let warn = Style::default()
            .fg(self.scheme.error)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.scheme.muted);
        let mut lines = Vec::new();

        match &self.gate {
            Gate::Local(gate) => {
                lines.push(Line::from(Span::styled(
                    format!("Delete local tag '{}'", gate.tag()),
                    warn,
                )));
                lines.push(Line::from(""));
                match gate.exists() {
                    None => lines.push(Line::from(Span::styled("Checking tag...", muted))),
                    Some(false) => lines.push(Line::from(Span::styled(
                        format!("Tag not found: '{}'", gate.tag()),
                        Style::default().fg(self.scheme.warning),
                    ))),
                    Some(true) => {
                        lines.push(Line::from("This removes the tag from this repository only."));
                        lines.push(Line::from(""));
                        lines.push(self.checkbox(
                            0,
                            gate.understands_irreversible,
                            "I understand this action cannot be undone",
                        ));
                    }
                }
            }
            Gate::Remote(gate) => {
                lines.push(Line::from(Span::styled(
                    format!("DANGER: delete remote tag '{}'", gate.tag()),
                    warn,
                )));
                lines.push(Line::from(
                    "Anyone who already fetched the tag keeps it; releases pointing at it break.",
                ));
                lines.push(Line::from(""));
                match gate.exists_locally() {
                    None => lines.push(Line::from(Span::styled("Checking tag...", muted))),
                    Some(false) => lines.push(Line::from(Span::styled(
                        format!("Tag not found locally: '{}'", gate.tag()),
                        Style::default().fg(self.scheme.warning),
                    ))),
                    Some(true) => {}
                }
                for (row, check) in gate.checks().into_iter().enumerate() {
                    let label = match check {
                        RemoteCheck::NotifiedTeam => format!("{} (recommended)", check.label()),
                        _ => check.label().to_string(),
                    };
                    lines.push(self.checkbox(row, gate.is_checked(check), &label));
                }
                lines.push(Line::from(""));
                let input_row = gate.checks().len();
                let input_style = if self.focus == input_row {
                    self.scheme.selected
                } else {
                    Style::default()
                };
                let match_mark = if gate.name_matches() { " ok" } else { "" };
                lines.push(Line::from(vec![
                    Span::raw(" Type the tag name to confirm: "),
                    Span::styled(format!("{}_", gate.typed_name), input_style),
                    Span::styled(match_mark, Style::default().fg(self.scheme.success)),
                ]));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Space: toggle  Enter: delete  Esc: cancel",
            muted,
        )));
        lines
    }
}

/// Rectangle of the given percentage size centered in `area`
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

impl View for ConfirmView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        Ok(self.on_key(key))
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let popup = centered(area, 80, 70);
        let paragraph = Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(self.title().to_string())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.scheme.error)),
            );
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    fn title(&self) -> &str {
        match self.gate {
            Gate::Local(_) => "Confirm local deletion",
            Gate::Remote(_) => "Confirm remote deletion",
        }
    }

    fn view_type(&self) -> ViewType {
        ViewType::Confirm
    }

    fn on_report(&mut self, report: &TaskReport) {
        let Payload::TagExists { name, exists } = &report.payload else {
            return;
        };
        if name != self.tag() {
            return;
        }
        match &mut self.gate {
            Gate::Local(gate) => gate.set_exists(*exists),
            Gate::Remote(gate) => {
                gate.set_exists_locally(*exists);
                self.focus = 0;
            }
        }
    }
}
