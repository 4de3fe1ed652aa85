//! TUI view components
//!
//! Each component renders one part of the interface from the app state.

mod about;
mod compose;
mod containers;
mod env_editor;
mod footer;
mod groups;
mod header;
pub mod helpers;
mod images;
mod logs;
mod modal;
mod stats;

pub use about::render_about;
pub use compose::render_compose;
pub use containers::{container_row, render_container_table, render_containers};
pub use env_editor::render_env_editor;
pub use footer::render_footer;
pub use groups::{render_groups, render_networks};
pub use header::render_header;
pub use images::{render_images, render_volumes};
pub use logs::render_logs;
pub use modal::render_modal;
pub use stats::render_stats;
