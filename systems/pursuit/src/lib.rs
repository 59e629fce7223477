#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hazard pursuit policy that answers offered turns with steps toward the player.

use std::collections::BTreeMap;

use glam::Vec2;
use log::debug;
use scavenger_core::{ActorId, ActorView, Command, Direction, Event};

/// Chooses the step a hazard at `actor` takes toward `target`.
///
/// Hazards exactly in the player's column close the vertical gap; any other
/// x difference, however small, closes the horizontal gap first.
#[must_use]
pub fn pursuit_direction(actor: Vec2, target: Vec2) -> Direction {
    if target.x == actor.x {
        if target.y > actor.y {
            Direction::North
        } else {
            Direction::South
        }
    } else if target.x > actor.x {
        Direction::East
    } else {
        Direction::West
    }
}

/// Pure system that moves hazards on every other turn they are offered.
#[derive(Debug, Default)]
pub struct Pursuit {
    resting: BTreeMap<ActorId, bool>,
}

impl Pursuit {
    /// Creates a new pursuit system with every hazard ready to act.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits a step for each hazard that acts.
    pub fn handle(&mut self, events: &[Event], actors: &ActorView, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelStarted { .. } => self.resting.clear(),
                Event::TurnOffered { actor } => self.take_turn(*actor, actors, out),
                _ => {}
            }
        }
    }

    fn take_turn(&mut self, actor: ActorId, actors: &ActorView, out: &mut Vec<Command>) {
        let resting = self.resting.entry(actor).or_insert(false);
        if *resting {
            *resting = false;
            debug!("hazard {} skips its turn", actor.get());
            return;
        }

        let (Some(hazard), Some(player)) = (actors.get(actor), actors.player()) else {
            return;
        };
        let direction = pursuit_direction(Vec2::from(hazard.position), Vec2::from(player.position));
        *resting = true;
        out.push(Command::StepActor { actor, direction });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_column_moves_vertically() {
        assert_eq!(
            pursuit_direction(Vec2::new(3.0, 1.0), Vec2::new(3.0, 5.0)),
            Direction::North
        );
        assert_eq!(
            pursuit_direction(Vec2::new(3.0, 5.0), Vec2::new(3.0, 1.0)),
            Direction::South
        );
    }

    #[test]
    fn other_columns_move_horizontally() {
        assert_eq!(
            pursuit_direction(Vec2::new(1.0, 1.0), Vec2::new(4.0, 6.0)),
            Direction::East
        );
        assert_eq!(
            pursuit_direction(Vec2::new(5.0, 1.0), Vec2::new(4.0, 1.0)),
            Direction::West
        );
    }

    #[test]
    fn one_float_step_apart_still_moves_horizontally() {
        let beside = f32::from_bits(0.75_f32.to_bits() + 1);

        assert_eq!(
            pursuit_direction(Vec2::new(0.75, 1.0), Vec2::new(beside, 5.0)),
            Direction::East
        );
        assert_eq!(
            pursuit_direction(Vec2::new(beside, 1.0), Vec2::new(0.75, 5.0)),
            Direction::West
        );
    }
}
