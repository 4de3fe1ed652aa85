//! Theme and styling definitions
//!
//! All colors used by the views live here so that rendering code never
//! hard-codes a color.

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the TUI
pub struct Theme {
    // Header colors
    pub header_title: Color,
    pub tab_active: Color,
    pub tab_active_bg: Color,
    pub tab_inactive: Color,

    // Container state colors
    pub state_running: Color,
    pub state_paused: Color,
    pub state_exited: Color,
    pub state_other: Color,

    // Table colors
    pub table_header: Color,
    pub table_selected: Color,
    pub table_selected_bg: Color,
    pub table_normal: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_label: Color,
    pub text_value: Color,

    // Input colors
    pub filter_prompt: Color,
    pub input_focused: Color,

    // Operation colors
    pub operation_success: Color,
    pub operation_error: Color,
    pub operation_warning: Color,
    pub operation_confirm: Color,
    pub operation_cancel: Color,

    // Gauge colors
    pub gauge_low: Color,
    pub gauge_medium: Color,
    pub gauge_high: Color,

    // Footer colors
    pub footer_key: Color,
    pub footer_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_title: Color::Cyan,
            tab_active: Color::Black,
            tab_active_bg: Color::Cyan,
            tab_inactive: Color::Gray,

            state_running: Color::Green,
            state_paused: Color::Yellow,
            state_exited: Color::Red,
            state_other: Color::Gray,

            table_header: Color::Cyan,
            table_selected: Color::Blue,
            table_selected_bg: Color::DarkGray,
            table_normal: Color::White,

            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_label: Color::Cyan,
            text_value: Color::White,

            filter_prompt: Color::Yellow,
            input_focused: Color::Yellow,

            operation_success: Color::Green,
            operation_error: Color::Red,
            operation_warning: Color::Yellow,
            operation_confirm: Color::Green,
            operation_cancel: Color::Red,

            gauge_low: Color::Green,
            gauge_medium: Color::Yellow,
            gauge_high: Color::Red,

            footer_key: Color::Yellow,
            footer_text: Color::White,
        }
    }
}

impl Theme {
    pub fn header_title_style(&self) -> Style {
        Style::default()
            .fg(self.header_title)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_style(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.tab_active)
                .bg(self.tab_active_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.tab_inactive)
        }
    }

    /// Color for a container `state` string as reported by the daemon
    pub fn container_state_style(&self, state: &str) -> Style {
        let color = match state {
            "running" => self.state_running,
            "paused" | "restarting" => self.state_paused,
            "exited" | "dead" => self.state_exited,
            _ => self.state_other,
        };
        Style::default().fg(color)
    }

    pub fn table_header_style(&self) -> Style {
        Style::default()
            .fg(self.table_header)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_selected_style(&self) -> Style {
        Style::default()
            .fg(self.table_selected)
            .bg(self.table_selected_bg)
    }

    pub fn footer_key_style(&self) -> Style {
        Style::default().fg(self.footer_key)
    }

    pub fn filter_prompt_style(&self) -> Style {
        Style::default()
            .fg(self.filter_prompt)
            .add_modifier(Modifier::BOLD)
    }

    pub fn operation_success_style(&self) -> Style {
        Style::default()
            .fg(self.operation_success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn operation_error_style(&self) -> Style {
        Style::default()
            .fg(self.operation_error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn operation_warning_style(&self) -> Style {
        Style::default()
            .fg(self.operation_warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Gauge color by fill percentage
    pub fn gauge_color(&self, percent: f64) -> Color {
        if percent >= 90.0 {
            self.gauge_high
        } else if percent >= 70.0 {
            self.gauge_medium
        } else {
            self.gauge_low
        }
    }
}
