//! App: terminal init, main loop, key handling.

use crate::GameConfig;
use crate::board::Board;
use crate::input::{Action, InputBuffer, key_to_action};
use crate::piece::LcgKinds;
use crate::session::Session;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub struct App {
    config: GameConfig,
    theme: Theme,
    session: Session,
    buffer: InputBuffer,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let kinds = Box::new(LcgKinds::with_seed(config.seed));
        let board = Board::new(i32::from(config.width), i32::from(config.height), kinds);
        let session = Session::new(board, config.tick_interval);
        Self {
            config,
            theme,
            session,
            buffer: InputBuffer::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.frame_rate.max(1.0));
        let mut last_update = Instant::now();
        loop {
            terminal.draw(|f| {
                crate::ui::draw(f, &self.session, &self.theme, f.area());
            })?;

            if event::poll(frame_duration)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        match key_to_action(key) {
                            Some(Action::Quit) => return Ok(()),
                            Some(Action::Command(command)) => self.buffer.store(command),
                            None => {}
                        }
                    }
                }
            }

            let now = Instant::now();
            self.session.update(self.buffer.take(), now - last_update);
            last_update = now;
        }
    }
}
