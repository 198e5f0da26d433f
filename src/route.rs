use std::fmt::{Display, Formatter};

use crate::direction::Direction;
use crate::vector::Vector;

/// One unit-length directed piece of the string.
///
/// The segment occupies the lattice edge leaving `position` in `direction`;
/// consecutive segments of a [`Route`] chain head to tail.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Segment {
    /// Lattice point the segment leaves from.
    pub position: Vector,
    /// Direction the segment runs in.
    pub direction: Direction,
    /// Whether the segment is part of the current selection.
    pub selected: bool,
}

/// Which end of the route an operation addresses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteEnd {
    /// The start of the route.
    Head,
    /// The end of the route.
    Tail,
}

/// Reasons a route cannot be threaded through a maze.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LayoutError {
    /// The string axis and the target axis coincide, leaving no third axis to
    /// center the string on.
    ParallelAxes,
}

/// The string's path through the maze: an ordered segment sequence plus the
/// cached position one step past the final segment.
///
/// A route is mutated only through [`Playthrough`](crate::Playthrough) moves or
/// a [`RouteEditor`](crate::editor::RouteEditor); external callers read it for
/// display and win checks.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub(crate) segments: Vec<Segment>,
    pub(crate) end_position: Vector,
    pub(crate) bounds: Vector,
    pub(crate) string_dir: Direction,
    pub(crate) target_dir: Direction,
}

impl Route {
    /// Thread a fresh, fully-selected string through a maze of extent `size`.
    ///
    /// The string spans the whole maze along `string_dir`, sits on the face
    /// selected by `target_dir`, and is centered on the remaining axis. Fails
    /// when the two directions share an axis.
    pub fn threaded(size: Vector, string_dir: Direction, target_dir: Direction) -> Result<Self, LayoutError> {
        let span = Direction::perpendicular(string_dir, target_dir).ok_or(LayoutError::ParallelAxes)?;
        let start = string_dir.shift_vector() * size.dot(string_dir.shift_vector())
            + target_dir.shift_vector() * size.dot(target_dir.shift_vector())
            + span.unit_vector() * (size.dot(span.unit_vector()) / 2);

        let step = string_dir.unit_vector();
        let mut segments = Vec::with_capacity(size.dot(step).unsigned_abs() as usize);
        let mut position = start;
        for _ in 0..size.dot(step).abs() {
            segments.push(Segment {
                position,
                direction: string_dir,
                selected: true,
            });
            position += step;
        }

        Ok(Self {
            segments,
            end_position: position,
            bounds: size,
            string_dir,
            target_dir,
        })
    }

    /// The number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the route has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments in order from head to tail.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The first segment's position, or [`None`] on an empty route.
    pub fn start_position(&self) -> Option<Vector> {
        self.segments.first().map(|segment| segment.position)
    }

    /// The lattice point one step past the final segment.
    pub fn end_position(&self) -> Vector {
        self.end_position
    }

    /// The axis the string predominantly runs along.
    pub fn string_direction(&self) -> Direction {
        self.string_dir
    }

    /// The direction of the face the string must be pushed past.
    pub fn target_direction(&self) -> Direction {
        self.target_dir
    }

    /// The maze extent the route was threaded through.
    pub fn bounds(&self) -> Vector {
        self.bounds
    }

    /// Whether the whole string has passed the target face.
    ///
    /// True iff the route is non-empty and the end position and every segment
    /// position, projected onto the target axis, lie at or past the face
    /// coordinate. Side-effect free.
    pub fn has_won(&self) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        let axis = self.target_dir.unit_vector();
        let threshold = self.bounds.dot(-self.target_dir.opposite().shift_vector());
        self.end_position.dot(axis) >= threshold
            && self.segments.iter().all(|segment| segment.position.dot(axis) >= threshold)
    }

    pub(crate) fn set_selected(&mut self, index: usize, selected: bool) {
        if let Some(segment) = self.segments.get_mut(index) {
            segment.selected = selected;
        }
    }
}

impl Display for Route {
    /// Renders the position/direction chain; unselected segments are starred.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            let mark = if segment.selected { "" } else { "*" };
            write!(f, "{}-{mark}{}{mark}-", segment.position, segment.direction)?;
        }
        write!(f, "{}", self.end_position)
    }
}
