use super::form::{Field, Form, FormEvent};
use super::page::{draw_page, OutputPane};
use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::git::TagSort;
use crate::ops::{Operation, Payload, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};
use std::path::{Path, PathBuf};

const REPO: usize = 0;
const OPEN: usize = 1;
const SORT: usize = 2;
const LIST: usize = 3;
const NAME: usize = 4;
const MESSAGE: usize = 5;
const CREATE_LIGHT: usize = 6;
const CREATE_ANNOTATED: usize = 7;
const PUSH: usize = 8;
const PUSH_ALL: usize = 9;
const DELETE_LOCAL: usize = 10;
const DELETE_REMOTE: usize = 11;

/// Repository selection plus tag listing, creation, pushing and deletion
pub struct TagsView {
    form: Form,
    output: OutputPane,
    scheme: ColorScheme,
}

impl TagsView {
    pub fn new(scheme: ColorScheme, workdir: &Path) -> Self {
        let sorts: Vec<String> = TagSort::ALL.iter().map(|s| s.to_string()).collect();
        let sorts: Vec<&str> = sorts.iter().map(String::as_str).collect();
        Self {
            form: Form::new(vec![
                Field::text("Repository", &workdir.to_string_lossy()),
                Field::button("Open repository"),
                Field::choice("Order", &sorts),
                Field::button("List tags"),
                Field::text("Tag name", ""),
                Field::text("Message", ""),
                Field::button("Create lightweight tag"),
                Field::button("Create annotated tag"),
                Field::button("Push tag"),
                Field::button("Push all tags"),
                Field::button("Delete local tag..."),
                Field::button("Delete remote tag..."),
            ]),
            output: OutputPane::default(),
            scheme,
        }
    }

    fn sort(&self) -> TagSort {
        TagSort::ALL
            .get(self.form.selected(SORT))
            .copied()
            .unwrap_or_default()
    }

    fn name(&self) -> String {
        self.form.text(NAME).trim().to_string()
    }

    fn pressed(&self, index: usize) -> Action {
        match index {
            OPEN => {
                let path = self.form.text(REPO).trim();
                if path.is_empty() {
                    return Action::Status("Please enter a repository path".to_string());
                }
                Action::Run(Operation::SelectRepository(PathBuf::from(path)))
            }
            LIST => Action::Run(Operation::ListTags(self.sort())),
            CREATE_LIGHT => Action::Run(Operation::CreateLightweightTag(self.name())),
            CREATE_ANNOTATED => Action::Run(Operation::CreateAnnotatedTag {
                name: self.name(),
                message: self.form.text(MESSAGE).trim().to_string(),
            }),
            PUSH => Action::Run(Operation::PushTag(self.name())),
            PUSH_ALL => Action::Run(Operation::PushAllTags),
            DELETE_LOCAL | DELETE_REMOTE => {
                let name = self.name();
                if name.is_empty() {
                    return Action::Status(
                        "Please enter the EXACT name of the tag to delete".to_string(),
                    );
                }
                if index == DELETE_LOCAL {
                    Action::ConfirmDeleteLocal(name)
                } else {
                    Action::ConfirmDeleteRemote(name)
                }
            }
            _ => Action::None,
        }
    }
}

impl View for TagsView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::PageDown => self.output.scroll_down(10),
            KeyCode::PageUp => self.output.scroll_up(10),
            _ => match self.form.handle_key(key) {
                FormEvent::Pressed(index) => return Ok(self.pressed(index)),
                FormEvent::Changed(SORT) => {
                    return Ok(Action::Run(Operation::ListTags(self.sort())));
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
            "Tags",
            &self.form,
            &self.output,
            &self.scheme,
        );
    }

    fn title(&self) -> &str {
        "Tags"
    }

    fn view_type(&self) -> ViewType {
        ViewType::Tags
    }

    fn on_report(&mut self, report: &TaskReport) {
        match &report.payload {
            Payload::Repository { path, .. } => {
                self.form.set_text(REPO, &path.to_string_lossy());
            }
            Payload::TagDeleted(name) if *name == self.name() => {
                self.form.set_text(NAME, "");
            }
            _ => {}
        }
        if report.target == ViewType::Tags {
            self.output.apply(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view_with_name(name: &str) -> TagsView {
        let mut view = TagsView::new(ColorScheme::default(), Path::new("/repo"));
        view.form.set_text(NAME, name);
        view
    }

    #[test]
    fn test_delete_requires_name() {
        let mut view = view_with_name("  ");
        view.form.set_focus(DELETE_LOCAL);
        assert!(matches!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Status(_)
        ));
    }

    #[test]
    fn test_delete_opens_confirmation() {
        let mut view = view_with_name(" v1.0 ");
        view.form.set_focus(DELETE_REMOTE);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::ConfirmDeleteRemote("v1.0".to_string())
        );
        view.form.set_focus(DELETE_LOCAL);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::ConfirmDeleteLocal("v1.0".to_string())
        );
    }

    #[test]
    fn test_changing_sort_relists() {
        let mut view = view_with_name("");
        view.form.set_focus(SORT);
        assert_eq!(
            view.handle_key(key(KeyCode::Right)).unwrap(),
            Action::Run(Operation::ListTags(TagSort::Name))
        );
    }

    #[test]
    fn test_enter_in_name_does_not_create_tag() {
        let mut view = view_with_name("");
        view.form.set_focus(NAME);
        for c in "v1.O".chars() {
            view.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        assert_eq!(view.form.focus(), MESSAGE);
        assert_eq!(view.name(), "v1.O");
    }

    #[test]
    fn test_open_repository_button() {
        let mut view = view_with_name("");
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        assert_eq!(view.form.focus(), OPEN);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Run(Operation::SelectRepository(PathBuf::from("/repo")))
        );
    }

    #[test]
    fn test_annotated_from_message_field() {
        let mut view = view_with_name("v2");
        view.form.set_focus(MESSAGE);
        for c in "Second".chars() {
            view.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        // Enter leaves the message field for the create buttons
        assert_eq!(view.handle_key(key(KeyCode::Enter)).unwrap(), Action::None);
        assert_eq!(view.form.focus(), CREATE_LIGHT);
        view.form.set_focus(CREATE_ANNOTATED);
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)).unwrap(),
            Action::Run(Operation::CreateAnnotatedTag {
                name: "v2".to_string(),
                message: "Second".to_string(),
            })
        );
    }

    #[test]
    fn test_deleted_tag_clears_name() {
        let mut view = view_with_name("v1.0");
        view.on_report(&TaskReport {
            target: ViewType::Tags,
            ok: true,
            status: "deleted".to_string(),
            output: Some("Remaining tags:\n".to_string()),
            payload: Payload::TagDeleted("v1.0".to_string()),
        });
        assert_eq!(view.name(), "");
        assert_eq!(view.output.text(), "Remaining tags:\n");
    }

    #[test]
    fn test_draw_shows_repository() {
        let mut view = view_with_name("");
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|frame| view.draw(frame, frame.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("/repo"));
        assert!(content.contains("Sort by: date"));
    }
}
