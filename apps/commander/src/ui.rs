//! Frame rendering.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use adbherd_fleet::{ConnectionState, EndpointRecord};

use crate::app::{App, InputMode, PRESET_COMMANDS};

/// Renders the entire frame from a registry snapshot and the UI state.
pub fn render(frame: &mut Frame, app: &App, records: &[EndpointRecord]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                                // title bar
            Constraint::Min(8),                                   // fleet panel
            Constraint::Length(PRESET_COMMANDS.len() as u16 + 2), // command menu
            Constraint::Length(8),                                // status log
            Constraint::Length(1),                                // footer / input
        ])
        .split(frame.area());

    render_title(frame, chunks[0], records);
    render_fleet(frame, chunks[1], app, records);
    render_menu(frame, chunks[2]);
    render_log(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);
}

fn render_title(frame: &mut Frame, area: Rect, records: &[EndpointRecord]) {
    let connected = records.iter().filter(|r| r.state.is_connected()).count();
    let title = format!(
        " adbherd — ADB fleet commander   connected {connected}/{}",
        records.len()
    );
    frame.render_widget(
        Paragraph::new(title).style(Style::default().add_modifier(Modifier::REVERSED)),
        area,
    );
}

fn state_color(state: &ConnectionState) -> Color {
    match state {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Failed(_) | ConnectionState::Errored(_) => Color::Red,
        ConnectionState::Unknown => Color::DarkGray,
    }
}

fn render_fleet(frame: &mut Frame, area: Rect, app: &App, records: &[EndpointRecord]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Fleet ({})", records.len()));

    if records.is_empty() {
        frame.render_widget(
            Paragraph::new("no endpoints yet — press 'r' to scan").block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let prefix = if i == app.selected { "> " } else { "  " };
            let mut spans = vec![
                Span::raw(prefix),
                Span::raw(format!("{:<22}", record.id.as_str())),
                Span::styled(
                    format!("{:<20}", record.state),
                    Style::default().fg(state_color(&record.state)),
                ),
            ];
            if let Some(output) = &record.last_output {
                spans.push(Span::styled(
                    format!("  {}", first_line(output)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_menu(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = PRESET_COMMANDS
        .iter()
        .enumerate()
        .map(|(i, (label, command))| {
            Line::from(vec![
                Span::raw(format!("  {}. {label}  ", i + 1)),
                Span::styled(*command, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title("Commands")),
        area,
    );
}

fn render_log(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app.log.tail(visible).map(Line::raw).collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status log")),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let footer = match app.input_mode {
        InputMode::Command => Paragraph::new(format!(" command: {}_", app.command_input))
            .style(Style::default().add_modifier(Modifier::REVERSED)),
        InputMode::Normal => Paragraph::new(
            " 'c' custom command · 'r' rescan · '1'-'3' presets · 'q' quit",
        )
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, area);
}

/// First line of a possibly multi-line command output.
fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}
