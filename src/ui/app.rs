use super::event::Event;
use super::task::TaskRunner;
use crate::{
    config::{ColorScheme, Config},
    git::{GitCli, RepoSummary},
    ops::{Operation, Payload, TaskReport},
    views::{
        Action, AliasView, CloneView, ConfirmView, HelpView, PagesView, ReleaseView,
        SettingsView, SshView, TagsView, UserView, View, ViewManager, ViewType,
    },
};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main application state
pub struct App {
    running: bool,
    view_manager: ViewManager,
    tasks: TaskRunner,
    scheme: ColorScheme,
    /// Directory every git command runs in
    workdir: PathBuf,
    summary: Option<RepoSummary>,
    /// Last status message and whether it reports success
    status: Option<(String, bool)>,
    /// Waiting for the last-used repository to be reopened
    restoring: bool,
}

impl App {
    pub fn new(config: &Config, workdir: PathBuf) -> Result<Self> {
        let scheme = ColorScheme::from_config(&config.colors);
        let pages: Vec<Box<dyn View>> = vec![
            Box::new(UserView::new(scheme.clone())),
            Box::new(SettingsView::new(scheme.clone())),
            Box::new(AliasView::new(scheme.clone())),
            Box::new(SshView::new(scheme.clone())),
            Box::new(CloneView::new(scheme.clone(), &config.settings.clone_dir())),
            Box::new(TagsView::new(scheme.clone(), &workdir)),
            Box::new(ReleaseView::new(scheme.clone())),
        ];

        let mut view_manager = ViewManager::new();
        view_manager.push(Box::new(PagesView::new(pages, scheme.clone())))?;

        Ok(Self {
            running: true,
            view_manager,
            tasks: TaskRunner::new(config.settings.remote.clone()),
            scheme,
            workdir,
            summary: None,
            status: None,
            restoring: false,
        })
    }

    /// Load the current git configuration and reopen the last repository
    pub fn init(&mut self, last_repo: Option<&Path>) {
        self.run(Operation::LoadConfig);
        self.run(Operation::CheckSshKey);
        match last_repo {
            Some(path) => {
                self.restoring = true;
                self.run(Operation::SelectRepository(path.to_path_buf()));
            }
            None => self.run(Operation::RefreshRepository),
        }
    }

    /// Check if the application should keep running
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(message, _)| message.as_str())
    }

    /// Handle an event
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) => Ok(()),
            Event::Tick => Ok(()),
            Event::Mouse(_) => Ok(()),
        }
    }

    /// Handle a key event
    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers == KeyModifiers::CONTROL
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.running = false;
            return Ok(());
        }

        if key.code == KeyCode::F(1) && self.view_manager.current_type() == Some(ViewType::Pages) {
            return self.handle_action(Action::PushView(ViewType::Help));
        }

        let action = self.view_manager.handle_key(key)?;
        self.handle_action(action)
    }

    /// Handle an action from a view
    fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }
            Action::Run(op) => self.run(op),
            Action::Submit(op) => {
                self.view_manager.pop().ok();
                self.run(op);
            }
            Action::Status(message) => {
                self.status = Some((message, false));
            }
            Action::PushView(view_type) => match view_type {
                ViewType::Help => {
                    self.view_manager
                        .push(Box::new(HelpView::new(&self.scheme)))?;
                }
                ViewType::RebaseInfo => {
                    self.view_manager
                        .push(Box::new(HelpView::rebase_info(&self.scheme)))?;
                }
                _ => {}
            },
            Action::PopView => {
                self.view_manager.pop().ok(); // Ignore error if can't pop
            }
            Action::ConfirmDeleteLocal(tag) => {
                self.view_manager
                    .push(Box::new(ConfirmView::local(tag.clone(), self.scheme.clone())))?;
                self.run(Operation::CheckTag(tag));
            }
            Action::ConfirmDeleteRemote(tag) => {
                self.view_manager
                    .push(Box::new(ConfirmView::remote(tag.clone(), self.scheme.clone())))?;
                self.run(Operation::CheckTag(tag));
            }
            Action::Copy(text) => match copy_to_clipboard(&text) {
                Ok(()) => self.status = Some(("Key copied to clipboard".to_string(), true)),
                Err(e) => {
                    warn!(error = %e, "clipboard unavailable");
                    self.status = Some((
                        "Clipboard unavailable: copy the key from the output pane".to_string(),
                        false,
                    ));
                }
            },
            Action::None => {}
        }
        Ok(())
    }

    /// Start an operation against the current working directory
    fn run(&mut self, op: Operation) {
        self.status = Some((op.progress(), true));
        self.tasks.spawn(op, GitCli::new(&self.workdir));
    }

    /// Update application state
    pub fn update(&mut self) -> Result<()> {
        for report in self.tasks.drain() {
            self.apply(report);
        }
        self.view_manager.update()?;
        Ok(())
    }

    /// Apply a finished operation to the app and its views
    fn apply(&mut self, report: TaskReport) {
        let mut refresh = report.ok
            && matches!(report.target, ViewType::Tags | ViewType::Releases)
            && matches!(report.payload, Payload::None | Payload::TagDeleted(_));

        match &report.payload {
            Payload::Repository { path, summary } => {
                info!(workdir = %path.display(), "working directory changed");
                self.workdir = path.clone();
                self.status = Some(if self.restoring {
                    (format!("Loaded last repository: {}", summary.name), true)
                } else {
                    (report.status.clone(), true)
                });
                self.summary = Some(summary.clone());
                refresh = false;
            }
            // quiet refresh: the summary is on the status bar already
            Payload::Summary(summary) => self.summary = summary.clone(),
            _ => self.status = Some((report.status.clone(), report.ok)),
        }
        // only the repository selection settles the restore
        if report.target == ViewType::Tags {
            self.restoring = false;
        }

        self.view_manager.deliver(&report);
        if refresh {
            self.tasks
                .spawn(Operation::RefreshRepository, GitCli::new(&self.workdir));
        }
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Create layout with message line and status bar
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Message line
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        self.view_manager.draw(frame, chunks[0]);
        self.render_message(frame, chunks[1]);
        self.render_status_bar(frame, chunks[2]);
    }

    fn render_message(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some((message, true)) => Line::from(Span::styled(
                format!(" ✅ {}", message),
                Style::default().fg(self.scheme.success),
            )),
            Some((message, false)) => Line::from(Span::styled(
                format!(" ❌ {}", message),
                Style::default().fg(self.scheme.error),
            )),
            None => Line::from(""),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let repo = self
            .summary
            .as_ref()
            .map(|s| s.line())
            .unwrap_or_else(|| "Not a Git repository".to_string());
        let busy = match self.tasks.pending() {
            0 => String::new(),
            n => format!(" | {} running", n),
        };

        let status = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                self.view_manager.current_title().to_string(),
                Style::default().fg(self.scheme.warning),
            ),
            Span::raw(" | "),
            Span::styled(repo, Style::default().fg(self.scheme.accent)),
            Span::raw(format!(" | {}{}", self.workdir.display(), busy)),
            Span::raw(" | F1:help  Ctrl+N/P:page  Ctrl+Q:quit"),
        ]);

        let paragraph = Paragraph::new(status).style(self.scheme.status_bar);
        frame.render_widget(paragraph, area);
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Failed to open clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to copy to clipboard")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::RepoSummary;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn app(dir: &Path) -> App {
        App::new(&Config::default(), dir.to_path_buf()).unwrap()
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[tokio::test]
    async fn test_quit_on_ctrl_c() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        assert!(app.is_running());
        app.handle_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn test_help_opens_and_closes() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        app.handle_event(key(KeyCode::F(1), KeyModifiers::NONE)).unwrap();
        assert_eq!(app.view_manager.current_type(), Some(ViewType::Help));
        app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE)).unwrap();
        assert_eq!(app.view_manager.current_type(), Some(ViewType::Pages));
    }

    #[tokio::test]
    async fn test_delete_confirmation_dialog() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        app.handle_action(Action::ConfirmDeleteRemote("v1".to_string()))
            .unwrap();
        assert_eq!(app.view_manager.current_type(), Some(ViewType::Confirm));
        assert_eq!(app.status(), Some("Looking up tag v1..."));

        app.handle_action(Action::Submit(Operation::PushAllTags))
            .unwrap();
        assert_eq!(app.view_manager.current_type(), Some(ViewType::Pages));
    }

    #[tokio::test]
    async fn test_validation_status() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        app.handle_action(Action::Status("Please enter a URL".to_string()))
            .unwrap();
        assert_eq!(app.status(), Some("Please enter a URL"));
    }

    #[tokio::test]
    async fn test_repository_report_changes_workdir() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        app.restoring = true;
        app.apply(TaskReport {
            target: ViewType::Tags,
            ok: true,
            status: "Working in: /repo".to_string(),
            output: None,
            payload: Payload::Repository {
                path: PathBuf::from("/repo"),
                summary: RepoSummary {
                    name: "repo".to_string(),
                    branch: Some("main".to_string()),
                    tag_count: 2,
                },
            },
        });
        assert_eq!(app.workdir(), Path::new("/repo"));
        assert_eq!(app.status(), Some("Loaded last repository: repo"));
        assert!(!app.restoring);
    }

    #[tokio::test]
    async fn test_unrelated_failure_keeps_restoring() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        app.restoring = true;
        app.apply(TaskReport {
            target: ViewType::User,
            ok: false,
            status: "Error loading configuration".to_string(),
            output: None,
            payload: Payload::None,
        });
        assert!(app.restoring);

        app.apply(TaskReport {
            target: ViewType::Tags,
            ok: true,
            status: "Working in: /repo".to_string(),
            output: None,
            payload: Payload::Repository {
                path: PathBuf::from("/repo"),
                summary: RepoSummary {
                    name: "repo".to_string(),
                    branch: None,
                    tag_count: 0,
                },
            },
        });
        assert_eq!(app.status(), Some("Loaded last repository: repo"));
        assert!(!app.restoring);
    }

    #[tokio::test]
    async fn test_summary_report_keeps_status() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        app.status = Some(("Tag 'v1' pushed".to_string(), true));
        app.apply(TaskReport {
            target: ViewType::Tags,
            ok: true,
            status: "Not a Git repository".to_string(),
            output: None,
            payload: Payload::Summary(None),
        });
        assert_eq!(app.status(), Some("Tag 'v1' pushed"));
    }

    #[tokio::test]
    async fn test_render_status_bar() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path());
        app.status = Some(("Changelog generated".to_string(), true));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Changelog generated"));
        assert!(content.contains("Not a Git repository"));
        assert!(content.contains("1 User"));
    }
}
