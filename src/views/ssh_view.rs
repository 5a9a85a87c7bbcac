use super::form::{Field, Form, FormEvent};
use super::page::{draw_page, OutputPane};
use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::git::ssh::GITHUB_KEYS_URL;
use crate::git::SshKeyStatus;
use crate::ops::{Operation, Payload, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

const EMAIL: usize = 0;
const CHECK: usize = 1;
const GENERATE: usize = 2;
const COPY: usize = 3;

pub struct SshView {
    form: Form,
    output: OutputPane,
    key: Option<SshKeyStatus>,
    scheme: ColorScheme,
}

impl SshView {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            form: Form::new(vec![
                Field::text("Email (blank: user.email)", ""),
                Field::button("Check SSH key"),
                Field::button("Generate new ed25519 key"),
                Field::button("Copy public key"),
            ]),
            output: OutputPane::default(),
            key: None,
            scheme,
        }
    }

    fn show_key(&mut self, status: &SshKeyStatus) {
        let text = match status.key() {
            Some(key) => format!(
                "{}\n\n{}\n\nAdd it to GitHub: {}",
                status.describe(),
                key.trim(),
                GITHUB_KEYS_URL
            ),
            None => format!(
                "{}\n\nGenerate one with the button above, then add it at {}",
                status.describe(),
                GITHUB_KEYS_URL
            ),
        };
        self.output.set(text, true);
    }
}

impl View for SshView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::PageDown => self.output.scroll_down(10),
            KeyCode::PageUp => self.output.scroll_up(10),
            _ => match self.form.handle_key(key) {
                FormEvent::Pressed(CHECK) => return Ok(Action::Run(Operation::CheckSshKey)),
                FormEvent::Pressed(GENERATE) => {
                    return Ok(Action::Run(Operation::GenerateSshKey {
                        email: self.form.text(EMAIL).trim().to_string(),
                    }));
                }
                FormEvent::Pressed(COPY) => {
                    return Ok(match self.key.as_ref().and_then(|k| k.key()) {
                        Some(key) => Action::Copy(key.trim().to_string()),
                        None => Action::Status("No SSH key to copy".to_string()),
                    });
                }
                _ => {}
            },
        }
        Ok(Action::None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        draw_page(
            frame,
            area,
            "SSH key",
            &self.form,
            &self.output,
            &self.scheme,
        );
    }

    fn title(&self) -> &str {
        "SSH"
    }

    fn view_type(&self) -> ViewType {
        ViewType::Ssh
    }

    fn on_report(&mut self, report: &TaskReport) {
        if report.target != ViewType::Ssh {
            return;
        }
        match &report.payload {
            Payload::SshKey(status) => {
                self.show_key(status);
                self.key = Some(status.clone());
            }
            _ => self.output.apply(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ssh_report(status: SshKeyStatus) -> TaskReport {
        TaskReport {
            target: ViewType::Ssh,
            ok: true,
            status: status.describe().to_string(),
            output: None,
            payload: Payload::SshKey(status),
        }
    }

    #[test]
    fn test_copy_without_key() {
        let mut view = SshView::new(ColorScheme::default());
        view.form.set_focus(COPY);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Status("No SSH key to copy".to_string())
        );
    }

    #[test]
    fn test_copy_found_key() {
        let mut view = SshView::new(ColorScheme::default());
        view.on_report(&ssh_report(SshKeyStatus::Ed25519(
            "ssh-ed25519 AAAA me@host\n".to_string(),
        )));
        assert!(view.output.text().contains("ssh-ed25519 AAAA me@host"));

        view.form.set_focus(COPY);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Copy("ssh-ed25519 AAAA me@host".to_string())
        );
    }

    #[test]
    fn test_generate_passes_email() {
        let mut view = SshView::new(ColorScheme::default());
        for c in "me@host".chars() {
            view.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        // Enter in the email field never runs ssh-keygen
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        assert_eq!(view.form.focus(), CHECK);

        view.form.set_focus(GENERATE);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Run(Operation::GenerateSshKey {
                email: "me@host".to_string()
            })
        );
    }
}
