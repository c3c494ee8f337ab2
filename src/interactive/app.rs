//! TUI application state and logic

use crate::core::{Move, Puzzle};
use crate::live::{LiveAnswer, LiveConfig, LiveEvent, LiveSolver};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};

/// How long the event loop waits for input before ticking the solver
const TICK: Duration = Duration::from_millis(30);

/// Application state
pub struct App {
    pub label: String,
    pub initial: Puzzle,
    pub puzzle: Puzzle,
    pub moves: Vec<Move>,
    pub undo_stack: Vec<Puzzle>,
    /// Source tube picked with the first key press
    pub selected: Option<usize>,
    pub live: LiveSolver,
    pub progress: Option<f64>,
    pub messages: Vec<Message>,
    pub should_quit: bool,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Error,
}

/// Where the current position stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    Stuck,
}

impl App {
    #[must_use]
    pub fn new(label: String, puzzle: Puzzle, config: LiveConfig, now: Instant) -> Self {
        let mut app = Self {
            label,
            initial: puzzle.clone(),
            puzzle,
            moves: Vec::new(),
            undo_stack: Vec::new(),
            selected: None,
            live: LiveSolver::new(config),
            progress: None,
            messages: Vec::new(),
            should_quit: false,
        };
        app.add_message(
            "Press a tube number to pick it up, then another to drop.",
            MessageStyle::Info,
        );
        app.live.request(app.puzzle.clone(), now);
        app
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.puzzle.is_won() {
            Status::Won
        } else if self.puzzle.is_stuck() {
            Status::Stuck
        } else {
            Status::Playing
        }
    }

    /// Live answer for the current position, if one has been published
    #[must_use]
    pub fn answer(&self) -> Option<LiveAnswer> {
        self.live.answer()
    }

    /// Handle a tube key (0-based index)
    pub fn select_tube(&mut self, index: usize, now: Instant) {
        if index >= self.puzzle.tubes().len() {
            self.add_message(&format!("There is no tube {}", index + 1), MessageStyle::Error);
            return;
        }

        let Some(from) = self.selected.take() else {
            if self.puzzle.tubes()[index].is_empty() {
                self.add_message(&format!("Tube {} is empty", index + 1), MessageStyle::Error);
            } else {
                self.selected = Some(index);
            }
            return;
        };

        if from == index {
            return;
        }

        match self.puzzle.apply_move(from, index) {
            Some((next, mv)) => {
                let text = format!("Move {}: {mv}", self.moves.len() + 1);
                let style = if mv.merged() {
                    MessageStyle::Success
                } else {
                    MessageStyle::Info
                };
                self.undo_stack.push(std::mem::replace(&mut self.puzzle, next));
                self.moves.push(mv);
                self.add_message(&text, style);
                self.after_change(now);
            }
            None => self.add_message(
                &format!("Cannot move from tube {} to tube {}", from + 1, index + 1),
                MessageStyle::Error,
            ),
        }
    }

    pub fn undo(&mut self, now: Instant) {
        self.selected = None;
        if let Some(previous) = self.undo_stack.pop() {
            self.puzzle = previous;
            self.moves.pop();
            self.add_message("Undone!", MessageStyle::Info);
            self.live.request(self.puzzle.clone(), now);
        } else {
            self.add_message("Nothing to undo!", MessageStyle::Error);
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.selected = None;
        self.puzzle = self.initial.clone();
        self.moves.clear();
        self.undo_stack.clear();
        self.add_message("Level restarted", MessageStyle::Info);
        self.live.request(self.puzzle.clone(), now);
    }

    fn after_change(&mut self, now: Instant) {
        match self.status() {
            Status::Won => {
                self.add_message(
                    &format!("🎉 Solved in {} moves!", self.moves.len()),
                    MessageStyle::Success,
                );
            }
            Status::Stuck => {
                self.add_message("No moves left. Press 'u' to undo.", MessageStyle::Error);
            }
            Status::Playing => {}
        }
        self.live.request(self.puzzle.clone(), now);
    }

    /// Let the live solver do one slice of work
    pub fn tick(&mut self, now: Instant) {
        match self.live.poll(now) {
            LiveEvent::Progress(p) => self.progress = Some(p),
            LiveEvent::Finished(answer) => {
                self.progress = None;
                if !answer.exact {
                    self.add_message("Search budget reached, answer is a best guess", MessageStyle::Info);
                }
            }
            LiveEvent::Idle | LiveEvent::Waiting | LiveEvent::Discarded => {
                self.progress = self.live.progress();
            }
        }
    }

    pub fn add_message(&mut self, text: &str, style: MessageStyle) {
        self.messages.push(Message {
            text: text.to_string(),
            style,
        });

        // Keep only last 5 messages
        if self.messages.len() > 5 {
            self.messages.remove(0);
        }
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub fn run_tui(app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let now = Instant::now();
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true;
                }
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('u') => app.undo(now),
                KeyCode::Char('r') => app.restart(now),
                KeyCode::Esc => app.selected = None,
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    // '1'..'9' are tubes 1-9, '0' is tube 10
                    let digit = c.to_digit(10).map_or(0, |d| d as usize);
                    let index = if digit == 0 { 9 } else { digit - 1 };
                    app.select_tube(index, now);
                }
                _ => {}
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(text: &str) -> (App, Instant) {
        let now = Instant::now();
        let config = LiveConfig::default().with_debounce(Duration::ZERO);
        (App::new("test".to_string(), text.parse().unwrap(), config, now), now)
    }

    fn settle(app: &mut App, now: Instant) -> Option<LiveAnswer> {
        for _ in 0..10_000 {
            app.tick(now);
            if !app.live.is_busy() {
                break;
            }
        }
        app.answer()
    }

    #[test]
    fn two_presses_make_a_move() {
        let (mut app, now) = app("1 | 4:8,4,2 4:2 4:");
        app.select_tube(1, now);
        assert_eq!(app.selected, Some(1));
        app.select_tube(0, now);

        assert_eq!(app.selected, None);
        assert_eq!(app.moves.len(), 1);
        assert_eq!(app.moves[0].chain_length, 3);
        assert_eq!(app.status(), Status::Won);
    }

    #[test]
    fn empty_tube_cannot_be_picked() {
        let (mut app, now) = app("1 | 4:8,4,2 4:2 4:");
        app.select_tube(2, now);
        assert_eq!(app.selected, None);
        assert_eq!(app.messages.last().unwrap().style, MessageStyle::Error);

        app.select_tube(7, now);
        assert_eq!(app.selected, None);
    }

    #[test]
    fn undo_and_restart() {
        let (mut app, now) = app("2 | 4:2,4 4:4,2 4:");
        app.select_tube(0, now);
        app.select_tube(2, now);
        assert_eq!(app.moves.len(), 1);

        app.undo(now);
        assert_eq!(app.puzzle, app.initial);
        assert!(app.moves.is_empty());

        app.select_tube(0, now);
        app.select_tube(2, now);
        app.restart(now);
        assert_eq!(app.puzzle, app.initial);
        assert!(app.undo_stack.is_empty());

        app.undo(now);
        assert_eq!(app.messages.last().unwrap().text, "Nothing to undo!");
    }

    #[test]
    fn live_answer_follows_the_position() {
        let (mut app, now) = app("2 | 4:2,4 4:4,2 4:");
        let answer = settle(&mut app, now).unwrap();
        assert_eq!(answer.min_pieces, 2);
        assert_eq!(answer.optimal_moves, Some(2));
        assert_eq!(answer.fingerprint, app.puzzle.fingerprint());

        // Moving invalidates the old answer until the new one lands
        app.select_tube(0, now);
        app.select_tube(2, now);
        assert!(app.answer().is_none());

        let answer = settle(&mut app, now).unwrap();
        assert_eq!(answer.fingerprint, app.puzzle.fingerprint());
        assert_eq!(answer.optimal_moves, Some(1));
    }
}
