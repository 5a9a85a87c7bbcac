use super::form::{Field, Form, FormEvent};
use super::page::{draw_page, OutputPane};
use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::git::release::DEFAULT_CHANGELOG;
use crate::git::{Platform, ReleaseDraft, ReleaseKind};
use crate::ops::{Operation, Payload, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

const VERSION: usize = 0;
const TITLE: usize = 1;
const KIND: usize = 2;
const CHANGELOG: usize = 3;
const GENERATE: usize = 4;
const CREATE_TAG: usize = 5;
const PUSH_TAG: usize = 6;
const PREPARE: usize = 7;
const EXPORT: usize = 8;
const PLATFORM: usize = 9;
const URL: usize = 10;

const PLATFORMS: [Platform; 2] = [Platform::GitHub, Platform::GitLab];

pub struct ReleaseView {
    form: Form,
    output: OutputPane,
    scheme: ColorScheme,
}

impl ReleaseView {
    pub fn new(scheme: ColorScheme) -> Self {
        let kinds: Vec<String> = ReleaseKind::ALL.iter().map(|k| k.to_string()).collect();
        let kinds: Vec<&str> = kinds.iter().map(String::as_str).collect();
        Self {
            form: Form::new(vec![
                Field::text("Version (without v)", ""),
                Field::text("Title", ""),
                Field::choice("Type", &kinds),
                Field::multiline("Changelog", DEFAULT_CHANGELOG),
                Field::button("Generate changelog from commits"),
                Field::button("Create release tag"),
                Field::button("Push release tag"),
                Field::button("Prepare release (tag + notes file)"),
                Field::button("Export release notes"),
                Field::choice("Platform", &["GitHub", "GitLab"]),
                Field::button("Show releases page URL"),
            ]),
            output: OutputPane::default(),
            scheme,
        }
    }

    fn draft(&self) -> ReleaseDraft {
        ReleaseDraft {
            version: self.form.text(VERSION).trim().to_string(),
            title: self.form.text(TITLE).trim().to_string(),
            kind: ReleaseKind::ALL
                .get(self.form.selected(KIND))
                .copied()
                .unwrap_or_default(),
            changelog: self.form.text(CHANGELOG).to_string(),
        }
    }

    fn pressed(&self, index: usize) -> Action {
        let op = match index {
            GENERATE => Operation::GenerateChangelog,
            CREATE_TAG => Operation::CreateReleaseTag(self.draft()),
            PUSH_TAG => Operation::PushReleaseTag(self.draft()),
            PREPARE => Operation::PrepareRelease(self.draft()),
            EXPORT => Operation::ExportRelease(self.draft()),
            URL => Operation::ReleasesUrl(
                PLATFORMS
                    .get(self.form.selected(PLATFORM))
                    .copied()
                    .unwrap_or(Platform::GitHub),
            ),
            _ => return Action::None,
        };
        Action::Run(op)
    }
}

impl View for ReleaseView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::PageDown => self.output.scroll_down(10),
            KeyCode::PageUp => self.output.scroll_up(10),
            _ => {
                if let FormEvent::Pressed(index) = self.form.handle_key(key) {
                    return Ok(self.pressed(index));
                }
            }
        }
        Ok(Action::None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        draw_page(
            frame,
            area,
            "Releases",
            &self.form,
            &self.output,
            &self.scheme,
        );
    }

    fn title(&self) -> &str {
        "Releases"
    }

    fn view_type(&self) -> ViewType {
        ViewType::Releases
    }

    fn on_report(&mut self, report: &TaskReport) {
        if report.target != ViewType::Releases {
            return;
        }
        if let Payload::Changelog(text) = &report.payload {
            self.form.set_text(CHANGELOG, text);
        }
        self.output.apply(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_draft_from_form() {
        let mut view = ReleaseView::new(ColorScheme::default());
        for c in "1.2.0".chars() {
            view.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        view.form.set_focus(KIND);
        view.handle_key(key(KeyCode::Left)).unwrap();

        let draft = view.draft();
        assert_eq!(draft.tag_name(), "v1.2.0");
        assert_eq!(draft.kind, ReleaseKind::Beta);
        assert_eq!(draft.title(), "Release v1.2.0");
        assert_eq!(draft.changelog, DEFAULT_CHANGELOG);
    }

    #[test]
    fn test_enter_in_version_does_not_tag() {
        let mut view = ReleaseView::new(ColorScheme::default());
        for c in "1.0".chars() {
            view.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        assert_eq!(view.form.focus(), KIND);

        view.form.set_focus(CREATE_TAG);
        let Action::Run(Operation::CreateReleaseTag(draft)) =
            view.handle_key(key(KeyCode::Enter)).unwrap()
        else {
            panic!("expected release tag");
        };
        assert_eq!(draft.tag_name(), "v1.0");
    }

    #[test]
    fn test_buttons_map_to_operations() {
        let mut view = ReleaseView::new(ColorScheme::default());
        view.form.set_focus(GENERATE);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Run(Operation::GenerateChangelog)
        );

        view.form.set_focus(PLATFORM);
        view.handle_key(key(KeyCode::Right)).unwrap();
        view.form.set_focus(URL);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Run(Operation::ReleasesUrl(Platform::GitLab))
        );
    }

    #[test]
    fn test_generated_changelog_replaces_field() {
        let mut view = ReleaseView::new(ColorScheme::default());
        view.on_report(&TaskReport {
            target: ViewType::Releases,
            ok: true,
            status: "Changelog generated".to_string(),
            output: None,
            payload: Payload::Changelog("## Changelog from start".to_string()),
        });
        assert_eq!(view.draft().changelog, "## Changelog from start");
    }
}
