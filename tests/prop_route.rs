//! Property-based tests for the move/undo engine.
//!
//! These tests verify invariants using randomized inputs:
//! - Route continuity after arbitrary play sequences
//! - Exact move/undo round-trips, including score
//! - Purity of the legality predicate
//! - Bounded history retention order

use clew::{BoundedStack, Direction, GridMaze, Playthrough, Route, RouteEnd, Vector};
use proptest::prelude::*;

fn direction(index: u8) -> Direction {
    match index % 6 {
        0 => Direction::Up,
        1 => Direction::Down,
        2 => Direction::Left,
        3 => Direction::Right,
        4 => Direction::Forward,
        _ => Direction::Back,
    }
}

fn walled_maze(walls: &[(u8, u8, u8, u8)]) -> GridMaze {
    let mut maze = GridMaze::open(Vector::new(5, 5, 5));
    for &(x, y, z, d) in walls {
        maze.set_wall(Vector::new(x as i32, y as i32, z as i32), direction(d));
    }
    maze
}

fn assert_continuous(route: &Route) {
    for pair in route.segments().windows(2) {
        assert_eq!(pair[1].position, pair[0].position + pair[0].direction.unit_vector());
    }
    if let Some(last) = route.segments().last() {
        assert_eq!(route.end_position(), last.position + last.direction.unit_vector());
    }
}

proptest! {
    /// Continuity holds after every move, and undoing every committed move
    /// restores the route and score exactly.
    #[test]
    fn play_keeps_the_string_continuous_and_reversible(
        walls in prop::collection::vec((0u8..5, 0u8..5, 0u8..5, 0u8..6), 0..12),
        slides in prop::collection::vec((any::<bool>(), any::<bool>()), 0..8),
        moves in prop::collection::vec(0u8..6, 0..24),
    ) {
        let route = Route::threaded(Vector::new(5, 5, 5), Direction::Right, Direction::Up).unwrap();
        let mut play = Playthrough::with_limits(walled_maze(&walls), route, 5, moves.len() + 1);

        for &(tail, outward) in &slides {
            play.slide(if tail { RouteEnd::Tail } else { RouteEnd::Head }, outward);
        }
        let snapshot = play.route().clone();

        let mut committed = 0;
        for &index in &moves {
            if play.try_move(direction(index)) {
                committed += 1;
            }
            assert_continuous(play.route());
        }

        for _ in 0..committed {
            prop_assert!(play.undo());
            assert_continuous(play.route());
        }
        prop_assert_eq!(play.route(), &snapshot);
        prop_assert_eq!(play.score(), 0);
    }

    /// `can_move` answers the same thing every time and never mutates.
    #[test]
    fn legality_is_a_pure_predicate(
        walls in prop::collection::vec((0u8..5, 0u8..5, 0u8..5, 0u8..6), 0..12),
        slides in prop::collection::vec((any::<bool>(), any::<bool>()), 0..8),
        probe in 0u8..6,
    ) {
        let route = Route::threaded(Vector::new(5, 5, 5), Direction::Right, Direction::Up).unwrap();
        let mut play = Playthrough::new(walled_maze(&walls), route);
        for &(tail, outward) in &slides {
            play.slide(if tail { RouteEnd::Tail } else { RouteEnd::Head }, outward);
        }

        let snapshot = play.route().clone();
        let first = play.can_move(direction(probe));
        let second = play.can_move(direction(probe));
        prop_assert_eq!(first, second);
        prop_assert_eq!(play.route(), &snapshot);
        prop_assert_eq!(play.score(), 0);
    }

    /// A full stack keeps exactly the newest `capacity` entries, in order.
    #[test]
    fn bounded_stack_retains_the_newest(
        capacity in 1usize..8,
        pushes in prop::collection::vec(any::<u16>(), 0..32),
    ) {
        let mut stack = BoundedStack::with_capacity(capacity);
        for &value in &pushes {
            stack.push(value);
        }
        prop_assert!(stack.len() <= capacity);
        for expected in pushes.iter().rev().take(stack.len()) {
            prop_assert_eq!(stack.pop(), Some(*expected));
        }
        prop_assert_eq!(stack.pop(), None);
    }
}
