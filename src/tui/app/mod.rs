//! Application module
//!
//! The main TUI application state and logic, split into state, keyboard
//! routing, command builders, the reducer and rendering.

pub mod modal;
pub mod state;

mod async_ops;
mod core;
mod events;
mod reducer;
mod rendering;

pub use core::App;
pub use events::Event;
pub use modal::{ModalKind, ModalOutcome, ModalState, PendingAction};
pub use reducer::reduce;
