#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the captions shown around the board.

use scavenger_core::{day_banner, starvation_message, ActorView, Event, TurnState};
use scavenger_world::{query, World};

/// Produces the text presented to the player between and during turns.
#[derive(Debug, Default)]
pub struct Bootstrap {
    food_change: Option<FoodChange>,
    intro: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FoodChange {
    Gained(u32),
    Lost(u32),
}

impl Bootstrap {
    /// Tracks level intros and the most recent food change.
    ///
    /// A food announcement lasts until the player acts again or a level starts.
    pub fn handle(&mut self, events: &[Event], actors: &ActorView) {
        let player = actors.player().map(|player| player.id);
        for event in events {
            match event {
                Event::LevelStarted { .. } => {
                    self.food_change = None;
                    self.intro = true;
                }
                Event::TurnStateChanged {
                    state: TurnState::PlayerTurn,
                } => self.intro = false,
                Event::ActorMoved { actor, .. } | Event::ActorBlocked { actor, .. }
                    if Some(*actor) == player =>
                {
                    self.food_change = None;
                }
                Event::ResourceCollected { points, .. } => {
                    self.food_change = Some(FoodChange::Gained(*points));
                }
                Event::PlayerDamaged { amount, .. } => {
                    self.food_change = Some(FoodChange::Lost(*amount));
                }
                _ => {}
            }
        }
    }

    /// Full-screen banner covering the board, if one should be shown.
    #[must_use]
    pub fn banner(&self, world: &World) -> Option<String> {
        let level = query::level(world);
        match query::turn_state(world) {
            TurnState::GameOver => Some(starvation_message(level)),
            _ if self.intro => Some(day_banner(level)),
            _ => None,
        }
    }

    /// Caption describing the player's food, prefixed by the latest change.
    #[must_use]
    pub fn food_caption(&self, world: &World) -> String {
        let food = query::food(world);
        match self.food_change {
            Some(FoodChange::Gained(points)) => format!("+{points} Food: {food}"),
            Some(FoodChange::Lost(amount)) => format!("-{amount} Food: {food}"),
            None => format!("Food: {food}"),
        }
    }
}
