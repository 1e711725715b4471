//! Board: grid state, collision checks, row clearing, tick advancement.

use crate::piece::{Command, KindSource, Piece};

/// Rows above the playable height where pieces spawn before descending into
/// view. A piece that comes to rest still intersecting this zone ends the
/// game.
pub const START_ZONE_HEIGHT: i32 = 4;

/// Preview anchor for the next piece, outside the left edge of the grid.
/// Never validity-checked; only read by the preview rendering.
const NEXT_X: i32 = -5;

/// The playfield. Settled pieces keep their identity after locking, so
/// clearing a row fragments them into remnants rather than collapsing a
/// uniform grid.
#[derive(Debug)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    settled: Vec<Piece>,
    falling: Piece,
    next: Piece,
    kinds: Box<dyn KindSource>,
}

impl Board {
    pub fn new(width: i32, height: i32, mut kinds: Box<dyn KindSource>) -> Self {
        let mut falling = Piece::new(kinds.next_kind());
        falling.set_position(width / 3, height);
        let mut next = Piece::new(kinds.next_kind());
        next.set_position(NEXT_X, height);
        Self {
            width,
            height,
            settled: Vec::new(),
            falling,
            next,
            kinds,
        }
    }

    /// Promote the preview piece to falling at the spawn anchor and draw a
    /// fresh preview.
    pub fn spawn(&mut self) {
        let mut next = Piece::new(self.kinds.next_kind());
        next.set_position(NEXT_X, self.height);
        self.falling = std::mem::replace(&mut self.next, next);
        self.falling.set_position(self.width / 3, self.height);
    }

    /// True iff the falling piece is inside the side walls, at or above the
    /// floor, and not overlapping any settled cell. There is no upper bound:
    /// pieces may occupy start-zone rows.
    pub fn is_valid_position(&self) -> bool {
        self.falling.cells().iter().all(|&(col, row)| {
            col >= 0
                && col < self.width
                && row >= 0
                && !self
                    .settled
                    .iter()
                    .any(|piece| piece.cells().contains(&(col, row)))
        })
    }

    /// Rows in `[0, height + START_ZONE_HEIGHT)` whose settled cell count
    /// equals the board width. Unordered.
    pub fn find_full_rows(&self) -> Vec<i32> {
        let total_rows = (self.height + START_ZONE_HEIGHT) as usize;
        let mut counts = vec![0; total_rows];
        for piece in &self.settled {
            for &(_, row) in piece.cells() {
                if row >= 0 && (row as usize) < total_rows {
                    counts[row as usize] += 1;
                }
            }
        }
        counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == self.width)
            .map(|(row, _)| row as i32)
            .collect()
    }

    /// Remove `row` from every settled piece; pieces left with no cells are
    /// dropped from the board.
    pub fn clear_row(&mut self, row: i32) {
        self.settled.retain_mut(|piece| piece.clear_row(row));
    }

    /// Clear several rows, highest first. Clearing a lower row first would
    /// shift the rows above it and invalidate their indices.
    pub fn clear_rows(&mut self, rows: &[i32]) {
        for row in descending(rows) {
            self.clear_row(row);
        }
    }

    /// Apply a command to the falling piece, rolling it back immediately if
    /// the result is invalid.
    pub fn command_falling(&mut self, command: Command) {
        self.falling.apply(command);
        if !self.is_valid_position() {
            self.falling.undo(command);
        }
    }

    /// One gravity tick: move the falling piece down if it can. Otherwise
    /// lock it into the settled collection, clear any completed rows, and
    /// either spawn the next piece or end the game. Returns the number of
    /// rows cleared and whether the game was lost.
    ///
    /// Loss is judged on the locked piece's cells after clearing: the game
    /// ends iff any remaining cell sits at or above the playable height.
    pub fn advance_tick(&mut self) -> (u32, bool) {
        self.falling.apply(Command::MoveDown);
        if self.is_valid_position() {
            return (0, false);
        }
        self.falling.undo(Command::MoveDown);

        self.settled.push(self.falling.clone());
        let full_rows = self.find_full_rows();
        self.clear_rows(&full_rows);

        let mut landed = self.falling.clone();
        for row in descending(&full_rows) {
            landed.clear_row(row);
        }
        let lost = landed.cells().iter().any(|&(_, row)| row >= self.height);
        if !lost {
            self.spawn();
        }
        (full_rows.len() as u32, lost)
    }

    pub fn settled(&self) -> &[Piece] {
        &self.settled
    }

    pub fn falling(&self) -> &Piece {
        &self.falling
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    #[cfg(test)]
    pub(crate) fn place_settled(&mut self, piece: Piece) {
        self.settled.push(piece);
    }

    #[cfg(test)]
    pub(crate) fn falling_mut(&mut self) -> &mut Piece {
        &mut self.falling
    }
}

fn descending(rows: &[i32]) -> Vec<i32> {
    let mut rows = rows.to_vec();
    rows.sort_unstable_by(|a, b| b.cmp(a));
    rows
}
