use bitflags::bitflags;
use ndarray::Array3;

use crate::direction::Direction;
use crate::vector::Vector;

bitflags! {
    /// Per-cell bitmask of wall-plane directions that carry a wall.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct WallMask: u8 {
        /// Wall in the +Y plane.
        const UP = 1 << 0;
        /// Wall in the −Y plane.
        const DOWN = 1 << 1;
        /// Wall in the −X plane.
        const LEFT = 1 << 2;
        /// Wall in the +X plane.
        const RIGHT = 1 << 3;
        /// Wall in the +Z plane.
        const FORWARD = 1 << 4;
        /// Wall in the −Z plane.
        const BACK = 1 << 5;
    }
}

impl Default for WallMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Direction> for WallMask {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Up => Self::UP,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
            Direction::Right => Self::RIGHT,
            Direction::Forward => Self::FORWARD,
            Direction::Back => Self::BACK,
        }
    }
}

/// Read-only wall oracle the move engine checks legality against.
///
/// Implementations must treat any coordinate outside `[ZERO, size)` as open;
/// the engine additionally guards its own lookups with that bounds test, so an
/// implementation is never queried out of range through
/// [`Playthrough`](crate::Playthrough).
pub trait Maze {
    /// Extent of the maze, in cells per axis.
    fn size(&self) -> Vector;

    /// Whether the wall addressed by `cell` blocks passage in the plane of
    /// `wall`.
    fn blocks(&self, cell: Vector, wall: Direction) -> bool;
}

impl<M: Maze> Maze for &M {
    fn size(&self) -> Vector {
        (**self).size()
    }

    fn blocks(&self, cell: Vector, wall: Direction) -> bool {
        (**self).blocks(cell, wall)
    }
}

/// A dense cuboid maze storing one [`WallMask`] per cell.
#[derive(Clone, Debug)]
pub struct GridMaze {
    size: Vector,
    walls: Array3<WallMask>,
}

impl GridMaze {
    /// A maze of the given size with every wall open.
    ///
    /// Negative size components are treated as zero extent.
    pub fn open(size: Vector) -> Self {
        let dims = (size.x.max(0) as usize, size.y.max(0) as usize, size.z.max(0) as usize);
        Self {
            size,
            walls: Array3::default(dims),
        }
    }

    fn index_of(&self, cell: Vector) -> Option<(usize, usize, usize)> {
        cell.in_box(Vector::ZERO, self.size)
            .then(|| (cell.x as usize, cell.y as usize, cell.z as usize))
    }

    /// The wall mask at `cell`, or an empty mask out of range.
    pub fn wall_mask(&self, cell: Vector) -> WallMask {
        self.index_of(cell).map_or(WallMask::empty(), |ix| self.walls[ix])
    }

    /// Place a wall at `cell` in the plane of `wall`. Out-of-range cells are
    /// ignored.
    pub fn set_wall(&mut self, cell: Vector, wall: Direction) -> &mut Self {
        if let Some(ix) = self.index_of(cell) {
            self.walls[ix] |= WallMask::from(wall);
        }
        self
    }

    /// Remove the wall at `cell` in the plane of `wall`, if present.
    pub fn clear_wall(&mut self, cell: Vector, wall: Direction) -> &mut Self {
        if let Some(ix) = self.index_of(cell) {
            self.walls[ix] &= !WallMask::from(wall);
        }
        self
    }
}

impl Maze for GridMaze {
    fn size(&self) -> Vector {
        self.size
    }

    fn blocks(&self, cell: Vector, wall: Direction) -> bool {
        self.wall_mask(cell).contains(WallMask::from(wall))
    }
}
