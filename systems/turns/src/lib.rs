#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that sequences level intros, hazard turns and level changes.

use std::{collections::VecDeque, time::Duration};

use log::{debug, info};
use scavenger_core::{ActorId, ActorView, Command, Event, TurnState};

/// Delays the controller waits between phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnConfig {
    level_start_delay: Duration,
    turn_delay: Duration,
    level_restart_delay: Duration,
}

impl TurnConfig {
    /// Creates a new configuration using the provided delays.
    #[must_use]
    pub const fn new(
        level_start_delay: Duration,
        turn_delay: Duration,
        level_restart_delay: Duration,
    ) -> Self {
        Self {
            level_start_delay,
            turn_delay,
            level_restart_delay,
        }
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(2),
            Duration::from_millis(100),
            Duration::from_secs(1),
        )
    }
}

/// Pure system that drives the turn state machine from world events.
#[derive(Debug)]
pub struct Turns {
    config: TurnConfig,
    phase: Phase,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Intro {
        remaining: Duration,
    },
    Enemies {
        wait: Duration,
        pending: VecDeque<(ActorId, Duration)>,
    },
    Restart {
        remaining: Duration,
        next_level: u32,
    },
    Finished,
}

impl Turns {
    /// Creates a new controller using the supplied configuration.
    #[must_use]
    pub fn new(config: TurnConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Reports whether the game reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Consumes world events and the actor view to emit turn commands.
    ///
    /// Hazards are offered their turns strictly one after another in
    /// registration order, each followed by a pause equal to its move time.
    /// Every `TimeAdvanced` issues at most one offer, even when that pause is
    /// zero.
    pub fn handle(&mut self, events: &[Event], actors: &ActorView, out: &mut Vec<Command>) {
        for event in events {
            if self.phase == Phase::Finished {
                return;
            }

            match event {
                Event::LevelStarted { .. } => {
                    self.phase = Phase::Intro {
                        remaining: self.config.level_start_delay,
                    };
                }
                Event::TurnStateChanged {
                    state: TurnState::EnemiesResolving,
                } => self.begin_enemy_phase(actors),
                Event::ExitReached { level } => {
                    self.phase = Phase::Restart {
                        remaining: self.config.level_restart_delay,
                        next_level: level.saturating_add(1),
                    };
                }
                Event::GameOver { level } => {
                    info!("turn controller stopped after level {level}");
                    self.phase = Phase::Finished;
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                _ => {}
            }
        }
    }

    fn begin_enemy_phase(&mut self, actors: &ActorView) {
        let pending: VecDeque<_> = actors
            .hazards()
            .map(|hazard| (hazard.id, hazard.move_time))
            .collect();
        let mut wait = self.config.turn_delay;
        if pending.is_empty() {
            wait = wait.saturating_add(self.config.turn_delay);
        }
        debug!("resolving {} hazards", pending.len());
        self.phase = Phase::Enemies { wait, pending };
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        match &mut self.phase {
            Phase::Idle | Phase::Finished => {}
            Phase::Intro { remaining } => {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.phase = Phase::Idle;
                    out.push(Command::SetTurnState {
                        state: TurnState::PlayerTurn,
                    });
                }
            }
            Phase::Restart {
                remaining,
                next_level,
            } => {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    let level = *next_level;
                    self.phase = Phase::Idle;
                    out.push(Command::RequestLevel { level });
                }
            }
            Phase::Enemies { wait, pending } => {
                *wait = wait.saturating_sub(dt);
                if !wait.is_zero() {
                    return;
                }
                // At most one offer per tick so the offered hazard can step
                // before the next offer or the hand-back closes its gate.
                match pending.pop_front() {
                    Some((hazard, move_time)) => {
                        out.push(Command::OfferTurn { actor: hazard });
                        *wait = move_time;
                    }
                    None => {
                        self.phase = Phase::Idle;
                        out.push(Command::SetTurnState {
                            state: TurnState::PlayerTurn,
                        });
                    }
                }
            }
        }
    }
}

impl Default for Turns {
    fn default() -> Self {
        Self::new(TurnConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_expires_into_player_turn() {
        let mut turns = Turns::default();
        let mut commands = Vec::new();
        turns.handle(
            &[Event::LevelStarted {
                level: 1,
                columns: 8,
                rows: 8,
            }],
            &ActorView::default(),
            &mut commands,
        );
        turns.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(1_999),
            }],
            &ActorView::default(),
            &mut commands,
        );
        assert!(commands.is_empty());

        turns.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(1),
            }],
            &ActorView::default(),
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::SetTurnState {
                state: TurnState::PlayerTurn
            }]
        );
    }

    #[test]
    fn enemy_phase_without_hazards_waits_two_turn_delays() {
        let mut turns = Turns::default();
        let mut commands = Vec::new();
        turns.handle(
            &[
                Event::TurnStateChanged {
                    state: TurnState::EnemiesResolving,
                },
                Event::TimeAdvanced {
                    dt: Duration::from_millis(150),
                },
            ],
            &ActorView::default(),
            &mut commands,
        );
        assert!(commands.is_empty());

        turns.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(50),
            }],
            &ActorView::default(),
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::SetTurnState {
                state: TurnState::PlayerTurn
            }]
        );
    }

    #[test]
    fn game_over_silences_the_controller() {
        let mut turns = Turns::default();
        let mut commands = Vec::new();
        turns.handle(
            &[
                Event::GameOver { level: 2 },
                Event::LevelStarted {
                    level: 3,
                    columns: 8,
                    rows: 8,
                },
                Event::TimeAdvanced {
                    dt: Duration::from_secs(5),
                },
            ],
            &ActorView::default(),
            &mut commands,
        );
        assert!(turns.is_finished());
        assert!(commands.is_empty());
    }

    #[test]
    fn exit_requests_the_next_level_after_restart_delay() {
        let mut turns = Turns::default();
        let mut commands = Vec::new();
        turns.handle(
            &[
                Event::ExitReached { level: 4 },
                Event::TimeAdvanced {
                    dt: Duration::from_millis(600),
                },
                Event::TimeAdvanced {
                    dt: Duration::from_millis(400),
                },
            ],
            &ActorView::default(),
            &mut commands,
        );
        assert_eq!(commands, vec![Command::RequestLevel { level: 5 }]);
    }
}
