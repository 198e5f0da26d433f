#![warn(missing_docs)]

//! # `clew`
//!
//! The rule engine of a 3D topological puzzle: a single continuous string is
//! threaded through a maze of unit cubes whose faces may carry walls. The
//! player selects a contiguous run of the string and pushes it sideways; the
//! string must slide without crossing walls, and the puzzle is won once the
//! whole string has passed the maze's target face.
//!
//! Thread a [`Route`] through a [`Maze`] implementation such as [`GridMaze`],
//! wrap both in a [`Playthrough`], and drive it with
//! [`try_move`](Playthrough::try_move), [`slide`](Playthrough::slide), and
//! [`undo`](Playthrough::undo); read [`route`](Playthrough::route),
//! [`score`](Playthrough::score), and [`has_won`](Playthrough::has_won) for
//! display. Structural edits outside play go through
//! [`editor::RouteEditor`].
//!
//! # Internals
//! The string is an ordered sequence of directed unit segments with a cached
//! end position. Moving a selected run sideways rewrites the route's topology
//! in one pass: connector segments are inserted or deleted where the run
//! meets the rest of the string, so continuity is preserved end to end while
//! segments merge, split, or vanish. After each committed move, off-axis
//! segments at either end are collapsed away and recorded, and the whole
//! rewrite is pushed onto a bounded last-N history, so an undo can re-expand
//! exactly what was collapsed and replay the inverse move. Legality is a pure
//! predicate checked in full before any mutation, against an opaque wall
//! oracle; out-of-range cells never block.

pub use direction::Direction;
pub use history::BoundedStack;
pub use maze::{GridMaze, Maze, WallMask};
pub use play::Playthrough;
pub use route::{LayoutError, Route, RouteEnd, Segment};
pub use vector::Vector;

pub(crate) mod direction;
pub mod editor;
pub(crate) mod history;
pub(crate) mod maze;
pub(crate) mod play;
pub(crate) mod route;
pub(crate) mod vector;
