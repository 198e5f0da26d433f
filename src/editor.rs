//! Direct structural editing of a [`Route`], outside the move/undo protocol.
//!
//! Used by authoring tools and tests; gameplay goes through
//! [`Playthrough`](crate::Playthrough). The editor touches neither score nor
//! history, so edits must be announced to any live playthrough via
//! [`Playthrough::external_edit_happened`](crate::Playthrough::external_edit_happened)
//! (or by obtaining the route through
//! [`Playthrough::route_mut`](crate::Playthrough::route_mut), which announces
//! them itself).

use log::debug;

use crate::direction::Direction;
use crate::route::{Route, Segment};

/// Replaces sub-ranges of a route with new direction runs.
pub struct RouteEditor<'a> {
    route: &'a mut Route,
}

impl<'a> RouteEditor<'a> {
    /// Edit `route`.
    pub fn new(route: &'a mut Route) -> Self {
        Self { route }
    }

    /// The route being edited.
    pub fn route(&self) -> &Route {
        &*self.route
    }

    /// Set the selection flag of one segment. Out-of-range indices are
    /// ignored.
    pub fn set_selected(&mut self, index: usize, selected: bool) {
        self.route.set_selected(index, selected);
    }

    /// Replace segments `[from..to)` with one segment per entry of
    /// `directions`, walked forward from the first replaced position.
    ///
    /// Segments that line up with a retained position keep their selection
    /// flag; segments the replacement adds are selected only when both the
    /// segment placed before them and the old end of the range were selected.
    /// After the explicit directions, filler is walked along the string axis
    /// until the resumed tail sits at its original offset, and every position
    /// after the edited range is re-flowed to keep the route continuous.
    ///
    /// The range is clamped to the route; `to == route.len()` edits up to the
    /// free end.
    pub fn set_segment(&mut self, from: usize, to: usize, directions: &[Direction]) {
        let route = &mut *self.route;
        let to = to.min(route.segments.len());
        let from = from.min(to);

        let end_selected = route.segments.get(to).map_or(true, |segment| segment.selected);
        let target = route.segments.get(to).map_or(route.end_position, |segment| segment.position);
        let before_selected = from
            .checked_sub(1)
            .and_then(|index| route.segments.get(index))
            .map_or(true, |segment| segment.selected);

        let retained = route.segments[from..to].to_vec();
        let mut replacement: Vec<Segment> = Vec::with_capacity(directions.len());
        let mut position = route.segments.get(from).map_or(route.end_position, |segment| segment.position);

        for &direction in directions {
            let selected = inherited_selection(&retained, &replacement, before_selected, end_selected);
            replacement.push(Segment { position, direction, selected });
            position += direction.unit_vector();
        }

        // walk filler along the string axis until the resumed tail lines up
        let mut filler = route.string_dir;
        let mut distance = filler.unit_vector().dot(target - position);
        if distance < 0 {
            distance = -distance;
            filler = filler.opposite();
        }
        for _ in 0..distance {
            let selected = inherited_selection(&retained, &replacement, before_selected, end_selected);
            replacement.push(Segment {
                position,
                direction: filler,
                selected,
            });
            position += filler.unit_vector();
        }

        debug!(
            "splicing {} segments over [{from}..{to}) of {}",
            replacement.len(),
            route.segments.len()
        );

        // install, then re-flow every untouched position after the edit
        let installed = replacement.len();
        route.segments.splice(from..to, replacement);
        for segment in &mut route.segments[from + installed..] {
            segment.position = position;
            position += segment.direction.unit_vector();
        }
        route.end_position = position;
    }
}

/// Selection for the next replacement segment: segments overwriting a retained
/// slot keep that slot's flag; inserted segments inherit from their
/// predecessor, gated on the old range end's flag.
fn inherited_selection(
    retained: &[Segment],
    replacement: &[Segment],
    before_selected: bool,
    end_selected: bool,
) -> bool {
    let index = replacement.len();
    match retained.get(index) {
        Some(original) => original.selected,
        None => {
            let previous = index
                .checked_sub(1)
                .map_or(before_selected, |prior| replacement[prior].selected);
            previous && end_selected
        }
    }
}
