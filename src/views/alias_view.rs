use super::form::{Field, Form, FormEvent};
use super::page::{draw_page, OutputPane};
use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::git::settings::recommended_aliases;
use crate::git::Alias;
use crate::ops::{Operation, Payload, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

/// Checklist of recommended aliases; already-defined ones come pre-checked
pub struct AliasView {
    aliases: Vec<Alias>,
    form: Form,
    output: OutputPane,
    scheme: ColorScheme,
}

impl AliasView {
    pub fn new(scheme: ColorScheme) -> Self {
        let aliases = recommended_aliases();
        let mut fields: Vec<Field> = aliases
            .iter()
            .map(|a| Field::toggle(&format!("git {:<8} -> {}", a.name, a.command), false))
            .collect();
        fields.push(Field::button("Apply selected aliases"));

        Self {
            aliases,
            form: Form::new(fields),
            output: OutputPane::default(),
            scheme,
        }
    }

    fn apply_index(&self) -> usize {
        self.aliases.len()
    }

    fn selected(&self) -> Vec<Alias> {
        self.aliases
            .iter()
            .enumerate()
            .filter(|(i, _)| self.form.is_on(*i))
            .map(|(_, a)| a.clone())
            .collect()
    }
}

impl View for AliasView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::PageDown => self.output.scroll_down(10),
            KeyCode::PageUp => self.output.scroll_up(10),
            _ => {
                if let FormEvent::Pressed(i) = self.form.handle_key(key) {
                    if i == self.apply_index() {
                        let selected = self.selected();
                        if selected.is_empty() {
                            return Ok(Action::Status("No aliases selected".to_string()));
                        }
                        return Ok(Action::Run(Operation::ApplyAliases(selected)));
                    }
                }
            }
        }
        Ok(Action::None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        draw_page(
            frame,
            area,
            "Recommended Git aliases",
            &self.form,
            &self.output,
            &self.scheme,
        );
    }

    fn title(&self) -> &str {
        "Aliases"
    }

    fn view_type(&self) -> ViewType {
        ViewType::Aliases
    }

    fn on_report(&mut self, report: &TaskReport) {
        if let Payload::Config(current) = &report.payload {
            for (i, alias) in self.aliases.iter().enumerate() {
                if current.configured_aliases.contains(&alias.name) {
                    self.form.set_toggle(i, true);
                }
            }
        }
        if report.target == ViewType::Aliases {
            self.output.apply(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CurrentConfig;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_nothing_selected() {
        let mut view = AliasView::new(ColorScheme::default());
        view.form.set_focus(view.apply_index());
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Status("No aliases selected".to_string())
        );
    }

    #[test]
    fn test_apply_checked_aliases() {
        let mut view = AliasView::new(ColorScheme::default());
        view.handle_key(key(KeyCode::Char(' '))).unwrap(); // st
        view.form.set_focus(view.apply_index());

        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Run(Operation::ApplyAliases(vec![Alias::new("st", "status")]))
        );
    }

    #[test]
    fn test_configured_aliases_are_checked() {
        let mut view = AliasView::new(ColorScheme::default());
        let current = CurrentConfig {
            configured_aliases: vec!["lg".to_string()],
            ..CurrentConfig::default()
        };
        view.on_report(&TaskReport {
            target: ViewType::User,
            ok: true,
            status: "loaded".to_string(),
            output: None,
            payload: Payload::Config(current),
        });

        let names: Vec<String> = view.selected().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["lg".to_string()]);
    }
}
