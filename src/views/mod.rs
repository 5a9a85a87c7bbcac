// Views: the tabbed pages, dialogs and help

pub mod alias_view;
pub mod clone_view;
pub mod confirm_view;
pub mod form;
pub mod help_view;
pub mod manager;
pub mod page;
pub mod pages_view;
pub mod release_view;
pub mod settings_view;
pub mod ssh_view;
pub mod tags_view;
pub mod user_view;
pub mod view;

pub use alias_view::AliasView;
pub use clone_view::CloneView;
pub use confirm_view::ConfirmView;
pub use help_view::HelpView;
pub use manager::ViewManager;
pub use pages_view::PagesView;
pub use release_view::ReleaseView;
pub use settings_view::SettingsView;
pub use ssh_view::SshView;
pub use tags_view::TagsView;
pub use user_view::UserView;
pub use view::{Action, View, ViewType};
