//! Turn-based movement resolver and slide transitions.

use std::time::Duration;

use glam::Vec2;
use log::debug;
use scavenger_core::{
    ActorId, ActorKind, CellCoord, Direction, Event, MoveError, MoveOutcome, Occupant,
};

use crate::World;

/// Squared distance below which a slide snaps onto its destination.
pub const SLIDE_EPSILON: f32 = f32::EPSILON;

/// Attempts to move an actor one cell along a cardinal unit vector.
///
/// The occupancy probe runs from the actor's cell to the destination. A clear
/// path commits the logical cell immediately and starts a slide transition;
/// the visual position catches up over subsequent ticks. A blocker the actor
/// can interact with receives the actor's blocked behaviour instead. Any
/// other blocker leaves the world untouched apart from an
/// [`Event::ActorStalled`] notification.
///
/// Vectors other than the four cardinal unit vectors are rejected before
/// anything is mutated. Turn gating is the caller's concern; see `apply`.
pub fn attempt_move(
    world: &mut World,
    actor: ActorId,
    dx: i32,
    dy: i32,
    out_events: &mut Vec<Event>,
) -> Result<MoveOutcome, MoveError> {
    let direction = Direction::from_delta(dx, dy)?;
    resolve(world, actor, direction, out_events)
}

pub(crate) fn resolve(
    world: &mut World,
    actor_id: ActorId,
    direction: Direction,
    out_events: &mut Vec<Event>,
) -> Result<MoveOutcome, MoveError> {
    let index = world
        .actor_index(actor_id)
        .ok_or(MoveError::UnknownActor(actor_id))?;
    let (from, kind) = {
        let actor = &world.actors[index];
        (actor.cell, actor.kind)
    };

    let probe = match from.step(direction) {
        Some(to) => world
            .occupancy
            .probe(from, to, Some(actor_id))
            .map_or(Ok(to), Err),
        None => Err(Occupant::Terrain),
    };

    let occupant = match probe {
        Ok(to) => {
            world.occupancy.vacate(from);
            world.occupancy.occupy(to, Occupant::Actor(actor_id));
            world.actors[index].commit(to);
            out_events.push(Event::ActorMoved {
                actor: actor_id,
                from,
                to,
            });
            return Ok(MoveOutcome::Moved);
        }
        Err(occupant) => occupant,
    };

    if !world.interacts_with(kind, occupant) {
        debug!("actor {} stalled against {occupant:?}", actor_id.get());
        out_events.push(Event::ActorStalled {
            actor: actor_id,
            occupant,
        });
        return Ok(MoveOutcome::BlockedNoop);
    }

    out_events.push(Event::ActorBlocked {
        actor: actor_id,
        occupant,
    });
    on_blocked(world, actor_id, kind, occupant, out_events);
    Ok(MoveOutcome::Blocked(occupant))
}

fn on_blocked(
    world: &mut World,
    actor_id: ActorId,
    kind: ActorKind,
    occupant: Occupant,
    out_events: &mut Vec<Event>,
) {
    match (kind, occupant) {
        (ActorKind::Player, Occupant::Obstacle(obstacle)) => {
            let damage = world.config.wall_damage;
            world.damage_obstacle(obstacle, damage, out_events);
        }
        (ActorKind::Hazard(hazard), Occupant::Actor(_)) => {
            let amount = world.config.hazard_damage(hazard);
            out_events.push(Event::PlayerDamaged {
                attacker: actor_id,
                amount,
            });
            world.drain_food(amount, out_events);
        }
        _ => {}
    }
}

/// Animated interpolation toward the actor's logical cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Slide {
    destination: Vec2,
    speed: f32,
}

impl Slide {
    pub(crate) fn toward(cell: CellCoord, move_time: Duration) -> Self {
        let seconds = move_time.as_secs_f32();
        let speed = if seconds > 0.0 {
            1.0 / seconds
        } else {
            f32::INFINITY
        };
        Self {
            destination: cell_center(cell),
            speed,
        }
    }

    /// Moves `position` toward the destination; returns the new position and
    /// whether the slide has finished.
    pub(crate) fn advance(&self, position: Vec2, dt: Duration) -> (Vec2, bool) {
        if !self.speed.is_finite() {
            return (self.destination, true);
        }
        let max_step = self.speed * dt.as_secs_f32();
        let next = move_towards(position, self.destination, max_step);
        if next.distance_squared(self.destination) <= SLIDE_EPSILON {
            (self.destination, true)
        } else {
            (next, false)
        }
    }
}

/// Visual position of a cell centre expressed in cell units.
#[must_use]
pub fn cell_center(cell: CellCoord) -> Vec2 {
    Vec2::new(cell.column() as f32, cell.row() as f32)
}

fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_step || distance == 0.0 {
        target
    } else {
        current + offset / distance * max_step
    }
}
