//! Constants used throughout the TUI module

/// Rows kept visible below/above the selection before a list scrolls
pub const SCROLL_BUFFER: usize = 2;

/// Minimum terminal width required for the TUI
pub const MIN_TERMINAL_WIDTH: u16 = 60;

/// Minimum terminal height required for the TUI
pub const MIN_TERMINAL_HEIGHT: u16 = 12;

/// Header height (tab bar inside a bordered block)
pub const HEADER_HEIGHT: u16 = 3;

/// Footer height (one line of hints inside a bordered block)
pub const FOOTER_HEIGHT: u16 = 3;

/// How long the input thread waits for a terminal event before re-checking
/// for shutdown
pub const INPUT_POLL_MS: u64 = 100;

/// Default network driver when the create form leaves it blank
pub const DEFAULT_NETWORK_DRIVER: &str = "bridge";

/// Modal width as a percentage of the terminal
pub const MODAL_WIDTH_PERCENT: u16 = 60;
