// Terminal management, the event pump and background operations

pub mod app;
pub mod event;
pub mod task;
pub mod terminal;

pub use app::App;
pub use event::{Event, EventHandler};
pub use task::TaskRunner;
pub use terminal::Tui;
