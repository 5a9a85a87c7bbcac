use super::form::{Field, Form, FormEvent};
use super::page::{draw_page, OutputPane};
use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::git::settings::{
    match_editor, DEFAULT_BRANCH, DEFAULT_CREDENTIAL_TIMEOUT, EDITORS, MAX_CREDENTIAL_TIMEOUT,
};
use crate::git::{GlobalSettings, PushStrategy};
use crate::ops::{Operation, Payload, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

const EDITOR: usize = 0;
const BRANCH: usize = 1;
const COLOR: usize = 2;
const PUSH: usize = 3;
const REBASE: usize = 4;
const TIMEOUT: usize = 5;
const APPLY: usize = 6;
const REBASE_INFO: usize = 7;

/// Editor, default branch, colors, push/pull behavior and credential cache
pub struct SettingsView {
    form: Form,
    output: OutputPane,
    scheme: ColorScheme,
}

impl SettingsView {
    pub fn new(scheme: ColorScheme) -> Self {
        let pushes: Vec<&str> = PushStrategy::ALL.iter().map(|p| p.as_str()).collect();
        let mut view = Self {
            form: Form::new(vec![
                Field::choice("Editor", &EDITORS),
                Field::text("Default branch", DEFAULT_BRANCH),
                Field::toggle("Colored output", true),
                Field::choice("Push strategy", &pushes),
                Field::toggle("Rebase on pull", false),
                Field::number(
                    "Credential cache (s)",
                    DEFAULT_CREDENTIAL_TIMEOUT,
                    0,
                    MAX_CREDENTIAL_TIMEOUT,
                    300,
                ),
                Field::button("Apply configuration"),
                Field::button("What does rebase on pull do?"),
            ]),
            output: OutputPane::default(),
            scheme,
        };
        view.fill(&GlobalSettings::default());
        view
    }

    fn fill(&mut self, settings: &GlobalSettings) {
        self.form
            .set_selected(EDITOR, match_editor(&settings.editor).unwrap_or(0));
        self.form.set_text(BRANCH, &settings.default_branch);
        self.form.set_toggle(COLOR, settings.color_ui);
        let push = PushStrategy::ALL
            .iter()
            .position(|p| *p == settings.push_default)
            .unwrap_or(0);
        self.form.set_selected(PUSH, push);
        self.form.set_toggle(REBASE, settings.pull_rebase);
        self.form.set_number(TIMEOUT, settings.credential_timeout);
    }

    fn settings(&self) -> GlobalSettings {
        let branch = self.form.text(BRANCH).trim();
        GlobalSettings {
            editor: EDITORS[self.form.selected(EDITOR).min(EDITORS.len() - 1)].to_string(),
            default_branch: if branch.is_empty() {
                DEFAULT_BRANCH.to_string()
            } else {
                branch.to_string()
            },
            color_ui: self.form.is_on(COLOR),
            push_default: PushStrategy::ALL
                .get(self.form.selected(PUSH))
                .copied()
                .unwrap_or_default(),
            pull_rebase: self.form.is_on(REBASE),
            credential_timeout: self.form.number(TIMEOUT),
        }
    }
}

impl View for SettingsView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::PageDown => self.output.scroll_down(10),
            KeyCode::PageUp => self.output.scroll_up(10),
            _ => match self.form.handle_key(key) {
                FormEvent::Pressed(APPLY) => {
                    return Ok(Action::Run(Operation::ApplySettings(self.settings())));
                }
                FormEvent::Pressed(REBASE_INFO) => {
                    return Ok(Action::PushView(ViewType::RebaseInfo));
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
            "Global preferences",
            &self.form,
            &self.output,
            &self.scheme,
        );
    }

    fn title(&self) -> &str {
        "Settings"
    }

    fn view_type(&self) -> ViewType {
        ViewType::Settings
    }

    fn on_report(&mut self, report: &TaskReport) {
        if let Payload::Config(current) = &report.payload {
            self.fill(&current.settings);
        }
        if report.target == ViewType::Settings {
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
    fn test_defaults_round_trip_through_form() {
        let view = SettingsView::new(ColorScheme::default());
        assert_eq!(view.settings(), GlobalSettings::default());
    }

    #[test]
    fn test_blank_branch_falls_back_to_main() {
        let mut view = SettingsView::new(ColorScheme::default());
        view.form.set_text(BRANCH, "   ");
        assert_eq!(view.settings().default_branch, "main");
    }

    #[test]
    fn test_apply_collects_form() {
        let mut view = SettingsView::new(ColorScheme::default());
        view.handle_key(key(KeyCode::Right)).unwrap(); // editor -> nano
        view.form.set_focus(REBASE);
        view.handle_key(key(KeyCode::Char(' '))).unwrap();
        view.form.set_focus(APPLY);

        let Action::Run(Operation::ApplySettings(settings)) =
            view.handle_key(key(KeyCode::Enter)).unwrap()
        else {
            panic!("expected apply");
        };
        assert_eq!(settings.editor, "nano");
        assert!(settings.pull_rebase);
    }

    #[test]
    fn test_rebase_info_button() {
        let mut view = SettingsView::new(ColorScheme::default());
        view.form.set_focus(REBASE_INFO);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::PushView(ViewType::RebaseInfo)
        );
    }

    #[test]
    fn test_loaded_config_fills_form() {
        let mut view = SettingsView::new(ColorScheme::default());
        let mut current = CurrentConfig::default();
        current.settings.editor = "vim".to_string();
        current.settings.push_default = PushStrategy::Current;
        current.settings.credential_timeout = 900;

        view.on_report(&TaskReport {
            target: ViewType::User,
            ok: true,
            status: "loaded".to_string(),
            output: None,
            payload: Payload::Config(current.clone()),
        });
        assert_eq!(view.settings(), current.settings);
    }
}
