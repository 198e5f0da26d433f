use std::fmt::{Display, Formatter};

use strum::VariantArray;

use crate::vector::Vector;

/// One of the six axis directions a string segment or move can take.
///
/// `Up`/`Down` run along +Y/−Y, `Right`/`Left` along +X/−X, and
/// `Forward`/`Back` along +Z/−Z.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub enum Direction {
    /// +Y
    Up,
    /// −Y
    Down,
    /// −X
    Left,
    /// +X
    Right,
    /// +Z
    Forward,
    /// −Z
    Back,
}

impl Direction {
    /// Invert the direction. An involution: `d.opposite().opposite() == d`.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Forward => Self::Back,
            Self::Back => Self::Forward,
        }
    }

    /// The unit displacement of a single step in this direction.
    pub fn unit_vector(self) -> Vector {
        match self {
            Self::Up => Vector::new(0, 1, 0),
            Self::Down => Vector::new(0, -1, 0),
            Self::Left => Vector::new(-1, 0, 0),
            Self::Right => Vector::new(1, 0, 0),
            Self::Forward => Vector::new(0, 0, 1),
            Self::Back => Vector::new(0, 0, -1),
        }
    }

    /// The offset from a lattice point to the wall cell on its lower-corner
    /// side along this direction: the unit vector for negative directions,
    /// zero for positive ones.
    ///
    /// A segment at `p` sweeping sideways covers a 2-cell square; adding the
    /// shift vectors of its own direction and of the move direction lands on
    /// the cell addressing the wall it would cross.
    pub fn shift_vector(self) -> Vector {
        match self {
            Self::Up | Self::Right | Self::Forward => Vector::ZERO,
            Self::Down | Self::Left | Self::Back => self.unit_vector(),
        }
    }

    /// The positive direction of the axis orthogonal to both arguments, or
    /// [`None`] when they share an axis.
    pub fn perpendicular(a: Self, b: Self) -> Option<Self> {
        if a.axis() == b.axis() {
            return None;
        }
        // the remaining axis; 0 + 1 + 2 == 3
        Some(match 3 - a.axis() - b.axis() {
            0 => Self::Right,
            1 => Self::Up,
            _ => Self::Forward,
        })
    }

    fn axis(self) -> usize {
        match self {
            Self::Left | Self::Right => 0,
            Self::Up | Self::Down => 1,
            Self::Forward | Self::Back => 2,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Up => "U",
            Self::Down => "D",
            Self::Left => "L",
            Self::Right => "R",
            Self::Forward => "F",
            Self::Back => "B",
        })
    }
}
