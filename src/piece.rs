//! Piece catalog and piece mechanics: kinds, orientations, commands.

/// One of the four cyclic orientations a piece can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Right,
    Down,
    Left,
    Up,
}

impl Orientation {
    pub fn clockwise(self) -> Self {
        match self {
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
            Self::Up => Self::Right,
        }
    }

    /// Three clockwise steps; there is no separate inverse table.
    pub fn counterclockwise(self) -> Self {
        self.clockwise().clockwise().clockwise()
    }
}

/// One frame's worth of player input. TogglePause is handled by the session
/// and never reaches the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    MoveDown,
    MoveLeft,
    MoveRight,
    RotateClockwise,
}

/// The seven standard piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    I,
    O,
    L,
    J,
    Z,
    S,
    T,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::L, Self::J, Self::Z, Self::S, Self::T];

    /// The four occupied cells in a 4x4 local grid, per orientation, as
    /// (col, row) offsets from the piece anchor. Row offsets grow upward.
    pub fn offsets(self, orientation: Orientation) -> &'static [(i8, i8); 4] {
        use Orientation::{Down, Left, Right, Up};
        match (self, orientation) {
            (Self::I, Right) => &[(0, 1), (1, 1), (2, 1), (3, 1)],
            (Self::I, Down) => &[(1, 0), (1, 1), (1, 2), (1, 3)],
            (Self::I, Left) => &[(0, 2), (1, 2), (2, 2), (3, 2)],
            (Self::I, Up) => &[(2, 0), (2, 1), (2, 2), (2, 3)],
            (Self::O, _) => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            (Self::L, Right) => &[(0, 1), (1, 1), (2, 1), (2, 2)],
            (Self::L, Down) => &[(1, 2), (1, 1), (1, 0), (2, 0)],
            (Self::L, Left) => &[(0, 0), (0, 1), (1, 1), (2, 1)],
            (Self::L, Up) => &[(0, 2), (1, 2), (1, 1), (1, 0)],
            (Self::J, Right) => &[(0, 2), (0, 1), (1, 1), (2, 1)],
            (Self::J, Down) => &[(2, 2), (1, 2), (1, 1), (1, 0)],
            (Self::J, Left) => &[(0, 1), (1, 1), (2, 1), (2, 0)],
            (Self::J, Up) => &[(0, 0), (1, 0), (1, 1), (1, 2)],
            (Self::Z, Right) => &[(0, 2), (1, 2), (1, 1), (2, 1)],
            (Self::Z, Down) => &[(2, 2), (2, 1), (1, 1), (1, 0)],
            (Self::Z, Left) => &[(0, 1), (1, 1), (1, 0), (2, 0)],
            (Self::Z, Up) => &[(0, 0), (0, 1), (1, 1), (1, 2)],
            (Self::S, Right) => &[(0, 1), (1, 1), (1, 2), (2, 2)],
            (Self::S, Down) => &[(1, 2), (1, 1), (2, 1), (2, 0)],
            (Self::S, Left) => &[(0, 0), (1, 0), (1, 1), (2, 1)],
            (Self::S, Up) => &[(0, 2), (0, 1), (1, 1), (1, 0)],
            (Self::T, Right) => &[(0, 1), (1, 1), (1, 2), (2, 1)],
            (Self::T, Down) => &[(1, 2), (1, 1), (1, 0), (2, 1)],
            (Self::T, Left) => &[(0, 1), (1, 1), (1, 0), (2, 1)],
            (Self::T, Up) => &[(0, 1), (1, 0), (1, 1), (1, 2)],
        }
    }

    /// Index into the theme's block palette:
    /// green, blue, purple, orange, brown, red, yellow.
    pub fn color_index(self) -> u8 {
        match self {
            Self::I => 0,
            Self::O => 1,
            Self::L => 2,
            Self::J => 3,
            Self::Z => 4,
            Self::S => 5,
            Self::T => 6,
        }
    }
}

/// Source of piece kinds for spawning. Production uses a seeded generator;
/// tests can implement this with a scripted sequence.
pub trait KindSource: std::fmt::Debug {
    fn next_kind(&mut self) -> PieceKind;
}

/// Seedable linear congruential generator choosing kinds uniformly.
#[derive(Debug, Clone)]
pub struct LcgKinds {
    state: u32,
}

impl LcgKinds {
    pub fn with_seed(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_rand(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.state >> 16
    }
}

impl KindSource for LcgKinds {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[(self.next_rand() as usize) % PieceKind::ALL.len()]
    }
}

/// Fixed repeating kind sequence for deterministic tests.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ScriptedKinds {
    queue: std::collections::VecDeque<PieceKind>,
}

#[cfg(test)]
impl ScriptedKinds {
    pub(crate) fn new(kinds: &[PieceKind]) -> Self {
        Self {
            queue: kinds.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl KindSource for ScriptedKinds {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.queue.pop_front().unwrap_or(PieceKind::O);
        self.queue.push_back(kind);
        kind
    }
}

/// A positioned, oriented piece. `cells` caches the board coordinates of its
/// blocks and is recomputed after every move or rotation. Once a piece has
/// settled, `clear_row` edits the cache directly and the piece fragments into
/// a remnant; the anchor and orientation then go stale and are never read
/// again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    x: i32,
    y: i32,
    orientation: Orientation,
    cells: Vec<(i32, i32)>,
}

impl Piece {
    /// New piece at the origin in spawn orientation.
    pub fn new(kind: PieceKind) -> Self {
        let mut piece = Self {
            kind,
            x: 0,
            y: 0,
            orientation: Orientation::Right,
            cells: Vec::with_capacity(4),
        };
        piece.recompute_cells();
        piece
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.recompute_cells();
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
        self.recompute_cells();
    }

    pub fn rotate_cw(&mut self) {
        self.orientation = self.orientation.clockwise();
        self.recompute_cells();
    }

    pub fn rotate_ccw(&mut self) {
        self.orientation = self.orientation.counterclockwise();
        self.recompute_cells();
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveDown => self.move_by(0, -1),
            Command::MoveLeft => self.move_by(-1, 0),
            Command::MoveRight => self.move_by(1, 0),
            Command::RotateClockwise => self.rotate_cw(),
            Command::TogglePause => {}
        }
    }

    /// Exact inverse of `apply` for the same command.
    pub fn undo(&mut self, command: Command) {
        match command {
            Command::MoveDown => self.move_by(0, 1),
            Command::MoveLeft => self.move_by(1, 0),
            Command::MoveRight => self.move_by(-1, 0),
            Command::RotateClockwise => self.rotate_ccw(),
            Command::TogglePause => {}
        }
    }

    /// Board coordinates of the occupied cells. Exactly 4 while the piece is
    /// whole; fewer once rows have been cleared out of a settled remnant.
    pub fn cells(&self) -> &[(i32, i32)] {
        &self.cells
    }

    fn recompute_cells(&mut self) {
        let offsets = self.kind.offsets(self.orientation);
        self.cells.clear();
        self.cells.extend(
            offsets
                .iter()
                .map(|&(dx, dy)| (self.x + i32::from(dx), self.y + i32::from(dy))),
        );
    }

    /// Drop this piece's cells on `row` and shift its cells above down one.
    /// Returns true while any cells remain.
    pub fn clear_row(&mut self, row: i32) -> bool {
        self.cells.retain(|&(_, r)| r != row);
        for cell in &mut self.cells {
            if cell.1 > row {
                cell.1 -= 1;
            }
        }
        !self.cells.is_empty()
    }
}
