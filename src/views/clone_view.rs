use super::form::{Field, Form, FormEvent};
use super::page::{draw_page, OutputPane};
use super::view::{Action, View, ViewType};
use crate::config::ColorScheme;
use crate::ops::{Operation, TaskReport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};
use std::path::{Path, PathBuf};

const URL: usize = 0;
const DEST: usize = 1;
const CLONE: usize = 2;

pub struct CloneView {
    form: Form,
    output: OutputPane,
    scheme: ColorScheme,
}

impl CloneView {
    pub fn new(scheme: ColorScheme, clone_dir: &Path) -> Self {
        Self {
            form: Form::new(vec![
                Field::text("Repository URL", ""),
                Field::text("Destination", &clone_dir.to_string_lossy()),
                Field::button("Clone"),
            ]),
            output: OutputPane::default(),
            scheme,
        }
    }

    fn operation(&self) -> Operation {
        Operation::Clone {
            url: self.form.text(URL).trim().to_string(),
            dest: PathBuf::from(self.form.text(DEST).trim()),
        }
    }
}

impl View for CloneView {
    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        match key.code {
            KeyCode::PageDown => self.output.scroll_down(10),
            KeyCode::PageUp => self.output.scroll_up(10),
            _ => match self.form.handle_key(key) {
                FormEvent::Pressed(CLONE) => {
                    return Ok(Action::Run(self.operation()));
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
            "Clone a repository",
            &self.form,
            &self.output,
            &self.scheme,
        );
    }

    fn title(&self) -> &str {
        "Clone"
    }

    fn view_type(&self) -> ViewType {
        ViewType::Clone
    }

    fn on_report(&mut self, report: &TaskReport) {
        if report.target == ViewType::Clone {
            self.output.apply(report);
        }
    }
}
