use itertools::Itertools;
use log::{debug, trace};

use crate::direction::Direction;
use crate::history::BoundedStack;
use crate::maze::Maze;
use crate::route::{Route, RouteEnd, Segment};
use crate::vector::Vector;

/// Selection flags at the moment a move committed, one bit per segment.
#[derive(Clone, Debug)]
struct SelectionMask(Vec<u8>);

impl SelectionMask {
    fn of(segments: &[Segment]) -> Self {
        let mut bits = vec![0u8; segments.len().div_ceil(8)];
        for index in segments.iter().positions(|segment| segment.selected) {
            bits[index / 8] |= 1 << (index % 8);
        }
        Self(bits)
    }

    fn get(&self, index: usize) -> bool {
        self.0
            .get(index / 8)
            .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
    }
}

/// Everything needed to exactly reverse one committed move.
#[derive(Clone, Debug)]
struct HistoryEntry {
    /// Route length once the move finished collapsing.
    length: usize,
    selection: SelectionMask,
    direction: Direction,
    /// Off-axis segments stripped from the head after the move, in strip order.
    start_collapsed: Vec<Direction>,
    /// Off-axis segments stripped from the tail after the move, in strip order.
    end_collapsed: Vec<Direction>,
}

/// The move/undo protocol around one [`Route`] threaded through one maze.
///
/// All mutation of the route during play goes through this type; failed
/// operations return `false` and leave the route untouched. Structural edits
/// made elsewhere must be announced via [`external_edit_happened`]
/// (or performed through [`route_mut`], which announces them itself) so stale
/// history can never be replayed against a changed route.
///
/// [`external_edit_happened`]: Self::external_edit_happened
/// [`route_mut`]: Self::route_mut
pub struct Playthrough<M> {
    maze: M,
    route: Route,
    score: u32,
    history: BoundedStack<HistoryEntry>,
    in_extended_move: bool,
    boundary_slack: i32,
}

impl<M: Maze> Playthrough<M> {
    /// How far outside the maze a selected segment may be pushed before a move
    /// is rejected, unless overridden via [`with_limits`](Self::with_limits).
    pub const DEFAULT_BOUNDARY_SLACK: i32 = 5;

    /// Start playing `route` against `maze` with the default boundary slack
    /// and a history capacity of `10 + 2 * (x + y + z)` of the maze size.
    pub fn new(maze: M, route: Route) -> Self {
        let capacity = Self::default_history_capacity(maze.size());
        Self::with_limits(maze, route, Self::DEFAULT_BOUNDARY_SLACK, capacity)
    }

    /// Start playing with an explicit boundary slack and history capacity.
    ///
    /// Once more than `history_capacity` moves have been committed, the oldest
    /// entries are discarded and can no longer be undone.
    pub fn with_limits(maze: M, route: Route, boundary_slack: i32, history_capacity: usize) -> Self {
        Self {
            maze,
            route,
            score: 0,
            history: BoundedStack::with_capacity(history_capacity),
            in_extended_move: false,
            boundary_slack,
        }
    }

    fn default_history_capacity(size: Vector) -> usize {
        (10 + 2 * size.dot(Vector::new(1, 1, 1))).max(0) as usize
    }

    /// The maze being played against.
    pub fn maze(&self) -> &M {
        &self.maze
    }

    /// The current route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Structural access to the route for editing outside the move protocol.
    ///
    /// Behaves as if [`external_edit_happened`](Self::external_edit_happened)
    /// were called first: the undo history is emptied up front, so entries can
    /// never desynchronize from the edited route.
    pub fn route_mut(&mut self) -> &mut Route {
        self.external_edit_happened();
        &mut self.route
    }

    /// The running score: one point per bend pushed, refunded on undo.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether the whole string has passed the target face.
    pub fn has_won(&self) -> bool {
        self.route.has_won()
    }

    /// Whether an extended-move sequence is currently open.
    pub fn in_extended_move(&self) -> bool {
        self.in_extended_move
    }

    /// Open an extended-move sequence, permitting chained
    /// [`try_move_extended`](Self::try_move_extended) and
    /// [`undo_extended`](Self::undo_extended) calls until a non-extended call
    /// or a structural edit closes it.
    pub fn start_extended_move(&mut self) {
        self.in_extended_move = true;
    }

    /// Announce that the route was mutated outside this protocol.
    ///
    /// Closes any extended move and empties the undo history, which refers to
    /// route content by position and would otherwise desynchronize.
    pub fn external_edit_happened(&mut self) {
        self.in_extended_move = false;
        self.history.clear();
        debug!("external edit: undo history cleared");
    }

    /// Replace the route wholesale, as on loading a new level.
    ///
    /// Resets the score, closes any extended move, and empties the history.
    pub fn replace_route(&mut self, route: Route) {
        self.route = route;
        self.score = 0;
        self.in_extended_move = false;
        self.history.clear();
        debug!("route replaced ({} segments)", self.route.len());
    }

    /// Set the selection flag of one segment. Out-of-range indices are
    /// ignored. Closes any extended move.
    pub fn set_selected(&mut self, index: usize, selected: bool) {
        self.in_extended_move = false;
        self.route.set_selected(index, selected);
    }

    /// Grow (`outward`) or shrink the selection by one segment at the given
    /// end of the route, without moving anything.
    ///
    /// Fails when the selection already reaches the route boundary in the
    /// requested direction, or when there is nothing to shrink. Closes any
    /// extended move on success.
    pub fn slide(&mut self, end: RouteEnd, outward: bool) -> bool {
        let segments = &mut self.route.segments;
        if segments.is_empty() {
            return false;
        }
        let toggled = match end {
            RouteEnd::Head => {
                let boundary = segments.iter().position(|segment| segment.selected);
                if outward {
                    match boundary {
                        Some(0) => None,
                        Some(index) => Some((index - 1, true)),
                        // nothing selected; the search ran off the tail, so
                        // stepping back outward lands on the final segment
                        None => Some((segments.len() - 1, true)),
                    }
                } else {
                    boundary.map(|index| (index, false))
                }
            }
            RouteEnd::Tail => {
                let boundary = segments.iter().rposition(|segment| segment.selected);
                if outward {
                    match boundary {
                        Some(index) if index + 1 == segments.len() => None,
                        Some(index) => Some((index + 1, true)),
                        None => Some((0, true)),
                    }
                } else {
                    boundary.map(|index| (index, false))
                }
            }
        };
        let Some((index, selected)) = toggled else {
            return false;
        };
        segments[index].selected = selected;
        self.in_extended_move = false;
        true
    }

    /// Whether every selected segment may shift one step in `direction`.
    ///
    /// A pure predicate: checks the fixed-end rule, the soft bounding box, and
    /// the maze walls, in that order, and mutates nothing. False when no
    /// segment is selected.
    pub fn can_move(&self, direction: Direction) -> bool {
        let segments = self.route.segments();
        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            return false;
        };
        // the string's free ends are anchored: the selection may not drag
        // either end further out along the string axis
        if (direction == self.route.string_dir.opposite() && first.selected)
            || (direction == self.route.string_dir && last.selected)
        {
            return false;
        }

        let step = direction.unit_vector();
        let limit = self.maze.size().dot(step).max(0) + self.boundary_slack;
        let mut any_selected = false;
        for segment in segments.iter().filter(|segment| segment.selected) {
            any_selected = true;
            if segment.position.dot(step) >= limit {
                return false;
            }
            if segment.direction != direction && segment.direction != direction.opposite() {
                let wall = segment.position + segment.direction.shift_vector() + direction.shift_vector();
                if let Some(plane) = Direction::perpendicular(segment.direction, direction) {
                    if wall.in_box(Vector::ZERO, self.maze.size()) && self.maze.blocks(wall, plane) {
                        return false;
                    }
                }
            }
        }
        any_selected
    }

    /// Shift the selected segments one step in `direction` if legal.
    ///
    /// On success the move is recorded for [`undo`](Self::undo). Closes any
    /// extended move.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        self.try_move_inner(direction, false)
    }

    /// As [`try_move`](Self::try_move), but as part of an extended-move
    /// sequence; fails unless one is open.
    pub fn try_move_extended(&mut self, direction: Direction) -> bool {
        self.try_move_inner(direction, true)
    }

    fn try_move_inner(&mut self, direction: Direction, extended_move: bool) -> bool {
        if extended_move && !self.in_extended_move {
            return false;
        }
        self.in_extended_move = extended_move;
        if !self.can_move(direction) {
            return false;
        }
        self.do_move(direction, false);
        debug!("moved {direction}: {} segments, score {}", self.route.len(), self.score);
        true
    }

    /// Exactly reverse the most recent recorded move, including segments it
    /// collapsed away, refunding its score. Fails on an empty history.
    pub fn undo(&mut self) -> bool {
        self.undo_inner(false)
    }

    /// As [`undo`](Self::undo), but as part of an extended-move sequence;
    /// fails unless one is open.
    pub fn undo_extended(&mut self) -> bool {
        self.undo_inner(true)
    }

    fn undo_inner(&mut self, extended_move: bool) -> bool {
        if extended_move && !self.in_extended_move {
            return false;
        }
        self.in_extended_move = extended_move;
        let Some(entry) = self.history.pop() else {
            return false;
        };
        debug_assert_eq!(self.route.len(), entry.length);

        // re-expand what the move collapsed, walking each list in the order
        // it was recorded
        for &direction in &entry.start_collapsed {
            let anchor = self.route.start_position().unwrap_or(self.route.end_position);
            self.route.segments.insert(
                0,
                Segment {
                    position: anchor - direction.unit_vector(),
                    direction,
                    selected: false,
                },
            );
        }
        for &direction in &entry.end_collapsed {
            self.route.segments.push(Segment {
                position: self.route.end_position,
                direction,
                selected: false,
            });
            self.route.end_position += direction.unit_vector();
        }
        for (index, segment) in self.route.segments.iter_mut().enumerate() {
            segment.selected = entry.selection.get(index);
        }

        debug!("undoing move {}", entry.direction);
        self.do_move(entry.direction.opposite(), true);
        true
    }

    /// One pass over the route, shifting every selected segment by
    /// `direction` and rewriting the topology around each selected run.
    ///
    /// Legality is the caller's responsibility. With `undo_replay` unset this
    /// commits: score is added, the post-move selection is snapshotted,
    /// off-axis end segments are collapsed, and a history entry is pushed.
    /// With it set the score is subtracted and nothing is recorded.
    fn do_move(&mut self, direction: Direction, undo_replay: bool) {
        let step = direction.unit_vector();
        let string_dir = self.route.string_dir;
        let along_axis = direction == string_dir || direction == string_dir.opposite();

        let old = std::mem::take(&mut self.route.segments);
        let mut segments: Vec<Segment> = Vec::with_capacity(old.len() + 2);
        let mut bend_score = 0u32;
        let mut in_run = false;

        let mut index = 0;
        while index < old.len() {
            let mut segment = old[index];
            if segment.selected {
                if !in_run {
                    // entering a selected run: keep the string continuous
                    // behind it
                    if let Some(previous) = segments.last() {
                        if previous.direction == direction.opposite() {
                            // the run is pushed back over its connector
                            segments.pop();
                        } else {
                            segments.push(Segment {
                                position: segment.position,
                                direction,
                                selected: false,
                            });
                        }
                    } else if along_axis {
                        // a free end only pays out along the string's own axis
                        segments.push(Segment {
                            position: segment.position,
                            direction,
                            selected: false,
                        });
                    }
                }
                segment.position += step;
                if segment.direction != direction && segment.direction != direction.opposite() {
                    bend_score += 1;
                }
                segments.push(segment);
                in_run = true;
                index += 1;
            } else if in_run {
                // leaving a selected run
                if segment.direction == direction {
                    // the run slots into this segment's place; the segment
                    // after it is carried over untouched
                    index += 1;
                    if index == old.len() {
                        in_run = false;
                        break;
                    }
                    let follower = old[index];
                    segments.push(follower);
                    in_run = follower.selected;
                    index += 1;
                } else {
                    segments.push(Segment {
                        position: segment.position + step,
                        direction: direction.opposite(),
                        selected: false,
                    });
                    segments.push(segment);
                    in_run = false;
                    index += 1;
                }
            } else {
                segments.push(segment);
                in_run = false;
                index += 1;
            }
        }

        if in_run {
            // the route ended inside the run
            if along_axis {
                segments.push(Segment {
                    position: self.route.end_position + step,
                    direction: direction.opposite(),
                    selected: false,
                });
            } else {
                self.route.end_position += step;
            }
        }

        if undo_replay {
            self.score -= bend_score;
            self.route.segments = segments;
            return;
        }

        self.score += bend_score;
        let selection = SelectionMask::of(&segments);

        let head = segments
            .iter()
            .position(|segment| segment.direction == string_dir)
            .unwrap_or(segments.len());
        let start_collapsed = segments.drain(..head).map(|segment| segment.direction).collect_vec();

        let tail = segments
            .iter()
            .rposition(|segment| segment.direction == string_dir)
            .map_or(0, |found| found + 1);
        let mut end_collapsed = Vec::with_capacity(segments.len() - tail);
        if tail < segments.len() {
            self.route.end_position = segments[tail].position;
            end_collapsed.extend(segments.drain(tail..).rev().map(|segment| segment.direction));
        }

        trace!(
            "collapsed {} head / {} tail segments after moving {direction}",
            start_collapsed.len(),
            end_collapsed.len()
        );

        self.route.segments = segments;
        self.history.push(HistoryEntry {
            length: self.route.len(),
            selection,
            direction,
            start_collapsed,
            end_collapsed,
        });
    }
}
