//! Terminal runner — ratatui event loop with terminal setup and teardown.
//!
//! Once per tick the loop drains the event bus into the status log, takes a
//! registry snapshot, and redraws. Key presses turn into fleet manager calls
//! that hand off to background tasks, so the render loop never waits on the
//! network.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::prelude::*;
use tokio_util::sync::CancellationToken;

use adbherd_fleet::FleetManager;

use crate::app::{App, AppAction};
use crate::ui;

/// How many log lines the UI retains.
const LOG_CAPACITY: usize = 100;

const TICK: Duration = Duration::from_millis(100);

/// Owns the terminal, the UI state, and the manager handle.
pub struct Commander {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    manager: Arc<FleetManager>,
}

impl Commander {
    /// Creates the runner, entering raw mode and the alternate screen.
    pub fn new(manager: Arc<FleetManager>) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            app: App::new(LOG_CAPACITY),
            manager,
        })
    }

    /// Runs the event loop until quit. Kicks off an initial scan on entry.
    pub async fn run(&mut self) -> io::Result<()> {
        self.manager.scan();

        let cancel = CancellationToken::new();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });
        }

        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                maybe_event = events.next() => {
                    if let Some(Ok(Event::Key(key))) = maybe_event
                        && key.kind == KeyEventKind::Press
                    {
                        let fleet_len = self.manager.registry().len();
                        match self.app.handle_key(key, fleet_len) {
                            Some(AppAction::Quit) => break,
                            Some(AppAction::Scan) => self.manager.scan(),
                            Some(AppAction::Broadcast(command)) => {
                                self.manager.broadcast(&command);
                            }
                            None => {}
                        }
                    }
                }

                _ = tick.tick() => {
                    for event in self.manager.drain_events() {
                        self.app.log.push_event(&event);
                    }
                    let records = self.manager.snapshot();
                    self.app.clamp_selection(records.len());

                    let app = &self.app;
                    self.terminal
                        .draw(|frame| ui::render(frame, app, &records))?;
                }
            }
        }

        self.manager.shutdown();
        Ok(())
    }

    /// Leaves the alternate screen and disables raw mode.
    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
