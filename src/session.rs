//! Session: pause/loss orchestration, tick timing, row-clear tally.

use crate::board::Board;
use crate::piece::Command;
use std::time::Duration;

/// Re-arming one-shot countdown fed with elapsed time by the caller, so it
/// needs no clock of its own. The first poll arms it and reports not due;
/// afterwards it fires at most once per arming and immediately re-arms for
/// another `interval`.
#[derive(Debug, Default)]
pub struct TickTimer {
    remaining: Option<Duration>,
}

impl TickTimer {
    pub fn is_due(&mut self, elapsed: Duration, interval: Duration) -> bool {
        match self.remaining {
            None => {
                self.remaining = Some(interval);
                false
            }
            Some(remaining) if elapsed >= remaining => {
                self.remaining = Some(interval);
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - elapsed);
                false
            }
        }
    }
}

/// High-level game state and flow: holds the board and the tick timer,
/// consumes at most one input command per frame, and tallies cleared rows.
/// Terminal once `lost` is set; no board mutation happens after that.
#[derive(Debug)]
pub struct Session {
    pub paused: bool,
    pub lost: bool,
    pub rows_cleared: u32,
    pub board: Board,
    tick_interval: Duration,
    ticker: TickTimer,
    /// Due signal latched here so the timer keeps counting while paused;
    /// consumption waits for the pause to lift.
    tick_pending: bool,
}

impl Session {
    /// The tick interval is fixed for the whole game.
    pub fn new(board: Board, tick_interval: Duration) -> Self {
        Self {
            paused: false,
            lost: false,
            rows_cleared: 0,
            board,
            tick_interval,
            ticker: TickTimer::default(),
            tick_pending: false,
        }
    }

    /// One frame: feed the timer, handle a pause toggle, and unless paused
    /// forward the command to the board and consume a pending tick.
    pub fn update(&mut self, command: Option<Command>, elapsed: Duration) {
        if self.lost {
            return;
        }
        if self.ticker.is_due(elapsed, self.tick_interval) {
            self.tick_pending = true;
        }
        if command == Some(Command::TogglePause) {
            self.toggle_pause();
        }
        if !self.paused && !self.lost {
            match command {
                Some(Command::TogglePause) | None => {}
                Some(cmd) => self.board.command_falling(cmd),
            }
            if self.tick_pending {
                self.tick_pending = false;
                let (cleared, lost) = self.board.advance_tick();
                self.rows_cleared += cleared;
                self.lost = lost;
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, PieceKind, ScriptedKinds};

    const TICK: Duration = Duration::from_millis(600);

    fn session_sized(width: i32, height: i32) -> Session {
        let board = Board::new(
            width,
            height,
            Box::new(ScriptedKinds::new(&[PieceKind::O])),
        );
        Session::new(board, TICK)
    }

    fn session() -> Session {
        session_sized(10, 20)
    }

    #[test]
    fn timer_arms_on_first_poll_then_fires_once_per_interval() {
        let mut timer = TickTimer::default();
        let interval = Duration::from_millis(100);
        assert!(!timer.is_due(Duration::from_secs(9), interval)); // arming poll
        assert!(!timer.is_due(Duration::from_millis(60), interval));
        assert!(timer.is_due(Duration::from_millis(40), interval));
        assert!(!timer.is_due(Duration::from_millis(99), interval));
        assert!(timer.is_due(Duration::from_millis(500), interval)); // one firing, then re-armed
        assert!(!timer.is_due(Duration::from_millis(1), interval));
    }

    #[test]
    fn due_tick_moves_the_falling_piece_down() {
        let mut s = session();
        let before = s.board.falling().cells().to_vec();
        s.update(None, Duration::ZERO); // arms the timer
        s.update(None, TICK);
        let after = s.board.falling().cells().to_vec();
        for (b, a) in before.iter().zip(&after) {
            assert_eq!((b.0, b.1 - 1), *a);
        }
    }

    #[test]
    fn double_toggle_pause_leaves_all_state_unchanged() {
        let mut s = session();
        s.update(None, Duration::ZERO);
        let before = s.board.falling().clone();
        s.update(Some(Command::TogglePause), Duration::from_millis(1));
        assert!(s.paused);
        s.update(Some(Command::TogglePause), Duration::from_millis(1));
        assert!(!s.paused);
        assert_eq!(s.board.falling(), &before);
        assert_eq!(s.rows_cleared, 0);
    }

    #[test]
    fn commands_are_ignored_while_paused() {
        let mut s = session();
        s.update(None, Duration::ZERO);
        s.update(Some(Command::TogglePause), Duration::ZERO);
        let before = s.board.falling().clone();
        s.update(Some(Command::MoveLeft), Duration::from_millis(1));
        assert_eq!(s.board.falling(), &before);
    }

    #[test]
    fn tick_due_during_pause_is_latched_and_consumed_on_unpause() {
        let mut s = session();
        s.update(None, Duration::ZERO);
        s.update(Some(Command::TogglePause), Duration::ZERO);
        let before = s.board.falling().clone();
        s.update(None, TICK * 2); // timer fires but the tick is only latched
        assert_eq!(s.board.falling(), &before);
        s.update(Some(Command::TogglePause), Duration::ZERO);
        let rows: Vec<i32> = s.board.falling().cells().iter().map(|&(_, r)| r).collect();
        let expected: Vec<i32> = before.cells().iter().map(|&(_, r)| r - 1).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn several_intervals_spent_paused_collapse_into_a_single_tick() {
        let mut s = session();
        s.update(None, Duration::ZERO); // arms the timer
        s.update(Some(Command::TogglePause), Duration::ZERO);
        let before = s.board.falling().clone();
        // the timer fires once per interval; the latch stays one deep
        for _ in 0..4 {
            s.update(None, TICK);
        }
        assert_eq!(s.board.falling(), &before);
        s.update(Some(Command::TogglePause), Duration::ZERO);
        let rows: Vec<i32> = s.board.falling().cells().iter().map(|&(_, r)| r).collect();
        let expected: Vec<i32> = before.cells().iter().map(|&(_, r)| r - 1).collect();
        assert_eq!(rows, expected, "whole pause owes exactly one tick");
        let after_unpause = s.board.falling().clone();
        s.update(None, Duration::from_millis(1));
        assert_eq!(s.board.falling(), &after_unpause);
    }

    #[test]
    fn completed_row_adds_to_the_tally() {
        let mut s = session_sized(4, 20);
        let mut line = Piece::new(PieceKind::I);
        line.set_position(0, -1); // spans row 0, resting on the floor
        *s.board.falling_mut() = line;
        s.update(None, Duration::ZERO);
        s.update(None, TICK);
        assert_eq!(s.rows_cleared, 1);
        assert!(!s.lost);
    }

    #[test]
    fn update_after_loss_is_idempotent() {
        let mut s = session();
        let mut blocker = Piece::new(PieceKind::O);
        blocker.set_position(3, 18); // rows 18..=19
        s.board.place_settled(blocker);
        s.board.falling_mut().set_position(3, 20); // rests in the start zone
        s.update(None, Duration::ZERO);
        s.update(None, TICK);
        assert!(s.lost);
        let snapshot = s.board.falling().clone();
        s.update(Some(Command::MoveLeft), TICK * 3);
        assert!(s.lost);
        assert_eq!(s.board.falling(), &snapshot);
        assert_eq!(s.rows_cleared, 0);
    }
}
