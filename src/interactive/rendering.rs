//! TUI rendering with ratatui
//!
//! Draws the tubes as columns, the live solver's verdict and the move log.

use super::app::{App, MessageStyle, Status};
use crate::core::{Piece, Tube};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph},
};

const PIECE_COLORS: [Color; 8] = [
    Color::White,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::Red,
    Color::LightYellow,
];

const fn piece_color(value: Piece) -> Color {
    let exponent = value.trailing_zeros() as usize;
    PIECE_COLORS[exponent.saturating_sub(1) % PIECE_COLORS.len()]
}

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Board and info
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_board(f, app, main_chunks[0]);
    render_info_panel(f, app, main_chunks[1]);
    render_status(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!("🔢 NUMBER SORT - {}", app.label))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

/// One text row of a tube column, `row` counted from the top slot
fn tube_cell(tube: &Tube, row: usize, height: usize) -> Span<'static> {
    let slot = height - 1 - row;
    if slot >= tube.capacity() {
        return Span::raw("      ");
    }
    match tube.pieces().get(slot) {
        Some(&value) => Span::styled(
            format!("│{value:^4}│"),
            Style::default()
                .fg(piece_color(value))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("│    │", Style::default().fg(Color::DarkGray)),
    }
}

fn render_board(f: &mut Frame, app: &App, area: Rect) {
    let tubes = app.puzzle.tubes();
    let height = tubes.iter().map(Tube::capacity).max().unwrap_or(0);

    let mut lines: Vec<Line> = Vec::with_capacity(height + 3);
    lines.push(Line::from(""));
    for row in 0..height {
        let mut spans = vec![Span::raw(" ")];
        for tube in tubes {
            spans.push(tube_cell(tube, row, height));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    let mut bottoms = vec![Span::raw(" ")];
    let mut labels = vec![Span::raw(" ")];
    for (i, _) in tubes.iter().enumerate() {
        let style = if app.selected == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        bottoms.push(Span::raw("╰────╯ "));
        labels.push(Span::styled(format!("{:^6}", (i + 1) % 10), style));
        labels.push(Span::raw(" "));
    }
    lines.push(Line::from(bottoms));
    lines.push(Line::from(labels));

    let board = Paragraph::new(lines).block(
        Block::default()
            .title(format!(
                " Board: {} pieces, target {} ",
                app.puzzle.piece_count(),
                app.puzzle.target_piece_count()
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(board, area);
}

fn render_info_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Live verdict
            Constraint::Length(3), // Solver progress
            Constraint::Min(5),    // Messages
        ])
        .split(area);

    render_verdict(f, app, chunks[0]);
    render_progress(f, app, chunks[1]);
    render_messages(f, app, chunks[2]);
}

fn render_verdict(f: &mut Frame, app: &App, area: Rect) {
    let target = app.puzzle.target_piece_count();
    let content = match app.answer() {
        Some(answer) => {
            let reachable = answer.min_pieces <= target;
            let (verdict, color) = if reachable {
                ("Target reachable", Color::Green)
            } else {
                ("Target out of reach", Color::Red)
            };
            let qualifier = if answer.exact { "" } else { " (best found)" };
            let mut lines = vec![
                Line::from(Span::styled(
                    verdict,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(
                    "Fewest pieces: {}{qualifier}",
                    answer.min_pieces
                )),
            ];
            if let Some(moves) = answer.optimal_moves {
                lines.push(Line::from(format!("Moves needed:  {moves}")));
            }
            lines
        }
        None if app.live.is_busy() => vec![Line::from("Thinking...")],
        None => vec![Line::from("No analysis")],
    };

    let verdict = Paragraph::new(content).block(
        Block::default()
            .title(" Live Solver ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(verdict, area);
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let fraction = app.progress.unwrap_or(0.0).clamp(0.0, 1.0);
    let label = if app.progress.is_some() {
        format!("{:.0}% of budget", fraction * 100.0)
    } else {
        "idle".to_string()
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(fraction)
        .label(label);
    f.render_widget(gauge, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let style = match msg.style {
                MessageStyle::Info => Style::default().fg(Color::White),
                MessageStyle::Success => Style::default().fg(Color::Green),
                MessageStyle::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));
    f.render_widget(messages_list, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ])
        .split(area);

    let (status_text, color) = match app.status() {
        Status::Playing => ("Playing", Color::White),
        Status::Won => ("Solved!", Color::Green),
        Status::Stuck => ("Stuck", Color::Red),
    };
    let status = Paragraph::new(status_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(status, chunks[0]);

    let moves = Paragraph::new(format!("Moves: {}", app.moves.len())).alignment(Alignment::Center);
    f.render_widget(moves, chunks[1]);

    let help = Paragraph::new("1-9,0: Tube | Esc: Drop | u: Undo | r: Restart | q: Quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}
