//! Grid coordinates and movement directions.

use std::fmt;

/// A movement direction on the grid.
///
/// `Anywhere` is only meaningful at queue time; the action engine resolves it
/// to one of the four cardinal directions before the move is ever expanded.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Anywhere,
}

impl Direction {
    /// The four directions a unit move can actually take.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the direction pointing the other way.
    ///
    /// `Anywhere` has no opposite and maps to itself.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Anywhere => Self::Anywhere,
        }
    }

    /// Whether this is one of `Up`, `Down`, `Left`, `Right`.
    pub const fn is_cardinal(self) -> bool {
        !matches!(self, Self::Anywhere)
    }

    /// Row/column delta of a single unit step in this direction.
    pub const fn delta(self) -> (f64, f64) {
        match self {
            Self::Up => (-1.0, 0.0),
            Self::Down => (1.0, 0.0),
            Self::Left => (0.0, -1.0),
            Self::Right => (0.0, 1.0),
            Self::Anywhere => (0.0, 0.0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Anywhere => "anywhere",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell on the grid.
///
/// Coordinates are real-valued so that user expressions like `(1.5, 2)` can
/// be stored verbatim; moves only ever change them by whole units.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Position {
    pub row: f64,
    pub col: f64,
}

impl Position {
    pub const fn new(row: f64, col: f64) -> Self {
        Position { row, col }
    }

    /// The position one unit away in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Position {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Whether `other` is this cell or one of its four orthogonal neighbours.
    pub fn touches(self, other: Position) -> bool {
        let dr = (self.row - other.row).abs();
        let dc = (self.col - other.col).abs();
        dr + dc <= 1.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn opposite_is_an_involution_on_cardinals() {
        for d in Direction::CARDINAL {
            assert_ne!(d.opposite(), d);
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Direction::Anywhere.opposite(), Direction::Anywhere);
    }

    #[test]
    fn step_moves_one_unit() {
        let origin = Position::new(0.0, 0.0);
        assert_eq!(origin.step(Direction::Right), Position::new(0.0, 1.0));
        assert_eq!(origin.step(Direction::Left), Position::new(0.0, -1.0));
        assert_eq!(origin.step(Direction::Up), Position::new(-1.0, 0.0));
        assert_eq!(origin.step(Direction::Down), Position::new(1.0, 0.0));
    }

    #[test]
    fn touches_includes_same_cell_and_orthogonal_neighbours() {
        let p = Position::new(2.0, 2.0);
        assert!(p.touches(p));
        assert!(p.touches(Position::new(2.0, 3.0)));
        assert!(p.touches(Position::new(1.0, 2.0)));
        assert!(!p.touches(Position::new(3.0, 3.0)));
        assert!(!p.touches(Position::new(2.0, 4.0)));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Position::new(1.0, 2.5).to_string(), "(1, 2.5)");
        assert_eq!(Direction::Anywhere.to_string(), "anywhere");
    }
}
