use serde::{Deserialize, Serialize};

/// A cell coordinate in pixels (top-left corner of the cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell `step` pixels away in `direction`.
    #[must_use]
    pub const fn moved(self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * step,
            y: self.y + dy * step,
        }
    }

    #[must_use]
    pub const fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Absolute heading of the snake.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Headings in clockwise order.
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    const fn clockwise_index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Unit step in screen coordinates (y grows downward).
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    /// Heading after applying a relative turn.
    #[must_use]
    pub const fn turned(self, turn: Turn) -> Self {
        let index = self.clockwise_index();
        let index = match turn {
            Turn::Straight => index,
            Turn::Right => (index + 1) % 4,
            Turn::Left => (index + 3) % 4,
        };
        Self::CLOCKWISE[index]
    }
}

/// Relative move requested by a snake policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    #[default]
    Straight,
    Right,
    Left,
}

impl Turn {
    /// All turns in score-vector order.
    pub const ALL: [Turn; 3] = [Turn::Straight, Turn::Right, Turn::Left];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Turn::Straight => 0,
            Turn::Right => 1,
            Turn::Left => 2,
        }
    }
}
