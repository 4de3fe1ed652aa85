//! Live resource usage of one container

use crate::tui::app::state::StatsState;
use crate::tui::theme::Theme;
use crate::tui::views::helpers::{create_themed_block, format_mb, render_loading_state};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Sparkline},
};

fn ratio(percent: f64) -> f64 {
    if !percent.is_finite() {
        return 0.0;
    }
    (percent / 100.0).clamp(0.0, 1.0)
}

pub fn render_stats(f: &mut Frame, area: Rect, stats: &StatsState, theme: &Theme) {
    let title = format!("Stats: {}", stats.container_name);
    let Some(latest) = &stats.latest else {
        render_loading_state(f, area, &title, "Waiting for the first sample...", theme);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .split(area);

    let cpu = Gauge::default()
        .block(create_themed_block(&title, theme))
        .gauge_style(Style::default().fg(theme.gauge_color(latest.cpu_percent)))
        .ratio(ratio(latest.cpu_percent))
        .label(format!("CPU {:.1}%", latest.cpu_percent));
    f.render_widget(cpu, chunks[0]);

    let memory_title = format!(
        "Memory ({} / {})",
        format_mb(latest.memory_usage),
        format_mb(latest.memory_limit)
    );
    let memory = Gauge::default()
        .block(create_themed_block(&memory_title, theme))
        .gauge_style(Style::default().fg(theme.gauge_color(latest.memory_percent)))
        .ratio(ratio(latest.memory_percent))
        .label(format!("{:.1}%", latest.memory_percent));
    f.render_widget(memory, chunks[1]);

    let history: Vec<u64> = stats.cpu_history.iter().copied().collect();
    let sparkline = Sparkline::default()
        .block(create_themed_block("CPU history", theme))
        .data(&history)
        .max(100)
        .style(Style::default().fg(theme.gauge_low));
    f.render_widget(sparkline, chunks[2]);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.text_label));
    let value = |text: String| Span::styled(text, Style::default().fg(theme.text_value));
    let io = vec![
        Line::from(vec![
            label("Network  "),
            value(format!(
                "↓ {}  ↑ {}",
                format_mb(latest.network_rx),
                format_mb(latest.network_tx)
            )),
        ]),
        Line::from(vec![
            label("Block IO "),
            value(format!(
                "read {}  write {}",
                format_mb(latest.block_read),
                format_mb(latest.block_write)
            )),
        ]),
        Line::from(vec![label("PIDs     "), value(latest.pids.to_string())]),
    ];
    f.render_widget(
        Paragraph::new(io).block(create_themed_block("I/O", theme)),
        chunks[3],
    );
}
