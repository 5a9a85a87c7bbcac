use super::form::{Field, Form, FormEvent};
use super::page::{draw_page, OutputPane};
use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::git::UserIdentity;
use crate::ops::{Operation, Payload, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

const NAME: usize = 0;
const EMAIL: usize = 1;
const SAVE: usize = 2;
const RELOAD: usize = 3;

/// Global `user.name` / `user.email`
pub struct UserView {
    form: Form,
    output: OutputPane,
    scheme: ColorScheme,
}

impl UserView {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            form: Form::new(vec![
                Field::text("Name", ""),
                Field::text("Email", ""),
                Field::button("Save"),
                Field::button("Reload current configuration"),
            ]),
            output: OutputPane::default(),
            scheme,
        }
    }

    fn identity(&self) -> UserIdentity {
        UserIdentity {
            name: self.form.text(NAME).trim().to_string(),
            email: self.form.text(EMAIL).trim().to_string(),
        }
    }
}

impl View for UserView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::PageDown => self.output.scroll_down(10),
            KeyCode::PageUp => self.output.scroll_up(10),
            _ => match self.form.handle_key(key) {
                FormEvent::Pressed(SAVE) => {
                    return Ok(Action::Run(Operation::SaveIdentity(self.identity())));
                }
                FormEvent::Pressed(RELOAD) => return Ok(Action::Run(Operation::LoadConfig)),
                _ => {}
            },
        }
        Ok(Action::None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        draw_page(
            frame,
            area,
            "Global Git identity",
            &self.form,
            &self.output,
            &self.scheme,
        );
    }

    fn title(&self) -> &str {
        "User"
    }

    fn view_type(&self) -> ViewType {
        ViewType::User
    }

    fn on_report(&mut self, report: &TaskReport) {
        if let Payload::Config(current) = &report.payload {
            self.form.set_text(NAME, &current.identity.name);
            self.form.set_text(EMAIL, &current.identity.email);
        }
        if report.target == ViewType::User {
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
    fn test_save_runs_with_trimmed_identity() {
        let mut view = UserView::new(ColorScheme::default());
        for c in " Ada ".chars() {
            view.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        // Enter on the name moves to the email field
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        for c in "ada@example.com".chars() {
            view.handle_key(key(KeyCode::Char(c))).unwrap();
        }

        // and Enter on the email to the save button
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        assert_eq!(view.form.focus(), SAVE);

        let action = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Action::Run(Operation::SaveIdentity(UserIdentity {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            }))
        );
    }

    #[test]
    fn test_loaded_config_fills_form() {
        let mut view = UserView::new(ColorScheme::default());
        let mut current = CurrentConfig::default();
        current.identity.name = "Grace".to_string();

        view.on_report(&TaskReport {
            target: ViewType::User,
            ok: true,
            status: "loaded".to_string(),
            output: None,
            payload: Payload::Config(current),
        });
        assert_eq!(view.identity().name, "Grace");
    }
}
