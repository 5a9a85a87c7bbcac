//! Keyboard-driven form fields shared by the pages.
//!
//! A [`Form`] is a flat list of fields with one focused at a time. Up/Down and
//! Tab/BackTab move focus; every other key goes to the focused field. Enter in
//! a single-line text field moves on to the next field, so only buttons are
//! ever pressed.

use crate::config::ColorScheme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text(String),
    /// Enter inserts a newline instead of moving on
    Multiline(String),
    Toggle(bool),
    Choice {
        options: Vec<String>,
        selected: usize,
    },
    Number {
        value: u32,
        min: u32,
        max: u32,
        step: u32,
    },
    Button,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(label: &str, value: &str) -> Self {
        Self::new(label, FieldKind::Text(value.to_string()))
    }

    pub fn multiline(label: &str, value: &str) -> Self {
        Self::new(label, FieldKind::Multiline(value.to_string()))
    }

    pub fn toggle(label: &str, on: bool) -> Self {
        Self::new(label, FieldKind::Toggle(on))
    }

    pub fn choice(label: &str, options: &[&str]) -> Self {
        Self::new(
            label,
            FieldKind::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
                selected: 0,
            },
        )
    }

    pub fn number(label: &str, value: u32, min: u32, max: u32, step: u32) -> Self {
        Self::new(
            label,
            FieldKind::Number {
                value: value.clamp(min, max),
                min,
                max,
                step,
            },
        )
    }

    pub fn button(label: &str) -> Self {
        Self::new(label, FieldKind::Button)
    }

    fn new(label: &str, kind: FieldKind) -> Self {
        Self {
            label: label.to_string(),
            kind,
        }
    }
}

/// What a key did to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Ignored,
    Moved,
    Changed(usize),
    /// Enter or Space on a button
    Pressed(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn set_focus(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormEvent::Moved
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                FormEvent::Moved
            }
            _ => self.edit(key),
        }
    }

    fn edit(&mut self, key: KeyEvent) -> FormEvent {
        let index = self.focus;
        let Some(field) = self.fields.get_mut(index) else {
            return FormEvent::Ignored;
        };
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match &mut field.kind {
            FieldKind::Text(value) => match key.code {
                KeyCode::Char(c) if plain => {
                    value.push(c);
                    FormEvent::Changed(index)
                }
                KeyCode::Backspace => {
                    value.pop();
                    FormEvent::Changed(index)
                }
                KeyCode::Enter => {
                    self.focus_next();
                    FormEvent::Moved
                }
                _ => FormEvent::Ignored,
            },
            FieldKind::Multiline(value) => match key.code {
                KeyCode::Char(c) if plain => {
                    value.push(c);
                    FormEvent::Changed(index)
                }
                KeyCode::Enter => {
                    value.push('\n');
                    FormEvent::Changed(index)
                }
                KeyCode::Backspace => {
                    value.pop();
                    FormEvent::Changed(index)
                }
                _ => FormEvent::Ignored,
            },
            FieldKind::Toggle(on) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    *on = !*on;
                    FormEvent::Changed(index)
                }
                _ => FormEvent::Ignored,
            },
            FieldKind::Choice { options, selected } => {
                if options.is_empty() {
                    return FormEvent::Ignored;
                }
                match key.code {
                    KeyCode::Left => {
                        *selected = (*selected + options.len() - 1) % options.len();
                        FormEvent::Changed(index)
                    }
                    KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => {
                        *selected = (*selected + 1) % options.len();
                        FormEvent::Changed(index)
                    }
                    _ => FormEvent::Ignored,
                }
            }
            FieldKind::Number {
                value,
                min,
                max,
                step,
            } => {
                match key.code {
                    KeyCode::Left | KeyCode::Char('-') => {
                        *value = value.saturating_sub(*step).max(*min);
                    }
                    KeyCode::Right | KeyCode::Char('+') => {
                        *value = value.saturating_add(*step).min(*max);
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() => {
                        let digit = c.to_digit(10).unwrap_or(0);
                        *value = value.saturating_mul(10).saturating_add(digit).min(*max);
                    }
                    KeyCode::Backspace => {
                        *value = (*value / 10).max(*min);
                    }
                    _ => return FormEvent::Ignored,
                }
                FormEvent::Changed(index)
            }
            FieldKind::Button => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => FormEvent::Pressed(index),
                _ => FormEvent::Ignored,
            },
        }
    }

    /// Text of a text or multiline field, empty for anything else
    pub fn text(&self, index: usize) -> &str {
        match self.fields.get(index).map(|f| &f.kind) {
            Some(FieldKind::Text(value)) | Some(FieldKind::Multiline(value)) => value.as_str(),
            _ => "",
        }
    }

    pub fn set_text(&mut self, index: usize, text: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            if let FieldKind::Text(value) | FieldKind::Multiline(value) = &mut field.kind {
                *value = text.to_string();
            }
        }
    }

    pub fn is_on(&self, index: usize) -> bool {
        matches!(
            self.fields.get(index).map(|f| &f.kind),
            Some(FieldKind::Toggle(true))
        )
    }

    pub fn set_toggle(&mut self, index: usize, on: bool) {
        if let Some(FieldKind::Toggle(value)) = self.fields.get_mut(index).map(|f| &mut f.kind) {
            *value = on;
        }
    }

    pub fn selected(&self, index: usize) -> usize {
        match self.fields.get(index).map(|f| &f.kind) {
            Some(FieldKind::Choice { selected, .. }) => *selected,
            _ => 0,
        }
    }

    pub fn set_selected(&mut self, index: usize, choice: usize) {
        if let Some(FieldKind::Choice { options, selected }) =
            self.fields.get_mut(index).map(|f| &mut f.kind)
        {
            if choice < options.len() {
                *selected = choice;
            }
        }
    }

    pub fn number(&self, index: usize) -> u32 {
        match self.fields.get(index).map(|f| &f.kind) {
            Some(FieldKind::Number { value, .. }) => *value,
            _ => 0,
        }
    }

    pub fn set_number(&mut self, index: usize, number: u32) {
        if let Some(FieldKind::Number { value, min, max, .. }) =
            self.fields.get_mut(index).map(|f| &mut f.kind)
        {
            *value = number.clamp(*min, *max);
        }
    }

    /// Render every field as styled lines, focused field highlighted
    pub fn lines(&self, scheme: &ColorScheme) -> Vec<Line<'static>> {
        let width = self
            .fields
            .iter()
            .filter(|f| !matches!(f.kind, FieldKind::Button | FieldKind::Toggle(_)))
            .map(|f| f.label.chars().count())
            .max()
            .unwrap_or(0);
        let mut lines = Vec::new();

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                scheme.selected
            } else {
                Style::default()
            };
            let label = Span::raw(format!("{}{:<width$}  ", marker, field.label, width = width));

            match &field.kind {
                FieldKind::Text(value) => {
                    let shown = if focused {
                        format!("{}_", value)
                    } else if value.is_empty() {
                        " ".to_string()
                    } else {
                        value.clone()
                    };
                    lines.push(Line::from(vec![label, Span::styled(shown, value_style)]));
                }
                FieldKind::Multiline(value) => {
                    lines.push(Line::from(label));
                    for text in value.split('\n') {
                        lines.push(Line::from(vec![
                            Span::styled("    │ ", Style::default().fg(scheme.muted)),
                            Span::styled(text.to_string(), value_style),
                        ]));
                    }
                }
                FieldKind::Toggle(on) => {
                    let mark = if *on { "[x]" } else { "[ ]" };
                    lines.push(Line::from(vec![
                        Span::raw(marker),
                        Span::styled(format!("{} {}", mark, field.label), value_style),
                    ]));
                }
                FieldKind::Choice { options, selected } => {
                    let current = options.get(*selected).cloned().unwrap_or_default();
                    lines.push(Line::from(vec![
                        label,
                        Span::styled(format!("< {} >", current), value_style),
                    ]));
                }
                FieldKind::Number { value, .. } => {
                    lines.push(Line::from(vec![
                        label,
                        Span::styled(format!("< {} >", value), value_style),
                    ]));
                }
                FieldKind::Button => {
                    let style = if focused {
                        scheme.selected.add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(scheme.accent)
                    };
                    lines.push(Line::from(vec![
                        Span::raw(marker),
                        Span::styled(format!("[ {} ]", field.label), style),
                    ]));
                }
            }
        }
        lines
    }
}
