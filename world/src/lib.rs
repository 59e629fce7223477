#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Scavenger.

mod movement;
mod occupancy;

use std::time::Duration;

use glam::Vec2;
use log::{debug, info, warn};
use scavenger_core::{
    ActorId, ActorKind, CellCoord, Command, Direction, EntityKind, Event, HazardKind,
    LevelLayout, MoveOutcome, ObstacleId, Occupant, ResourceKind, SpawnedEntity, StepRejection,
    TurnState,
};

pub use movement::{attempt_move, cell_center, SLIDE_EPSILON};

use movement::Slide;
use occupancy::OccupancyGrid;

/// Tuning values the world applies while resolving gameplay rules.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Food the player owns before the first level.
    pub starting_food: u32,
    /// Health every freshly placed wall starts with.
    pub wall_health: i32,
    /// Damage the player deals to a wall per blocked move.
    pub wall_damage: i32,
    /// Food granted by a food pickup.
    pub food_points: u32,
    /// Food granted by a soda pickup.
    pub soda_points: u32,
    /// Food drained by a zombie attack.
    pub zombie_damage: u32,
    /// Food drained by a vampire attack.
    pub vampire_damage: u32,
    /// Time the player needs to slide across one cell.
    pub player_move_time: Duration,
    /// Time a hazard needs to slide across one cell.
    pub hazard_move_time: Duration,
}

impl WorldConfig {
    /// Food drained when the provided hazard hits the player.
    #[must_use]
    pub const fn hazard_damage(&self, hazard: HazardKind) -> u32 {
        match hazard {
            HazardKind::Zombie => self.zombie_damage,
            HazardKind::Vampire => self.vampire_damage,
        }
    }

    /// Food granted by the provided resource.
    #[must_use]
    pub const fn resource_points(&self, resource: ResourceKind) -> u32 {
        match resource {
            ResourceKind::Food => self.food_points,
            ResourceKind::Soda => self.soda_points,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            starting_food: 100,
            wall_health: 4,
            wall_damage: 1,
            food_points: 10,
            soda_points: 20,
            zombie_damage: 10,
            vampire_damage: 20,
            player_move_time: Duration::from_millis(100),
            hazard_move_time: Duration::from_millis(100),
        }
    }
}

/// Kinds of non-blocking pickups that trigger when the player enters their cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    /// Restores food.
    Resource(ResourceKind),
    /// Completes the level.
    Exit,
}

/// Represents the authoritative Scavenger world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    level: u32,
    columns: u32,
    rows: u32,
    occupancy: OccupancyGrid,
    obstacles: Vec<Obstacle>,
    pickups: Vec<Pickup>,
    actors: Vec<Actor>,
    food: u32,
    turn_state: TurnState,
    offered: Option<ActorId>,
}

impl World {
    /// Creates an empty world awaiting its first level.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            food: config.starting_food,
            config,
            level: 0,
            columns: 0,
            rows: 0,
            occupancy: OccupancyGrid::default(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            actors: Vec::new(),
            turn_state: TurnState::LevelSetup,
            offered: None,
        }
    }

    fn actor_index(&self, actor: ActorId) -> Option<usize> {
        self.actors.iter().position(|candidate| candidate.id == actor)
    }

    fn player_id(&self) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|actor| actor.kind == ActorKind::Player)
            .map(|actor| actor.id)
    }

    fn interacts_with(&self, kind: ActorKind, occupant: Occupant) -> bool {
        match (kind, occupant) {
            (ActorKind::Player, Occupant::Obstacle(_)) => true,
            (ActorKind::Hazard(_), Occupant::Actor(target)) => self.player_id() == Some(target),
            _ => false,
        }
    }

    fn damage_obstacle(&mut self, obstacle: ObstacleId, damage: i32, out_events: &mut Vec<Event>) {
        let Some(index) = self
            .obstacles
            .iter()
            .position(|candidate| candidate.id == obstacle)
        else {
            return;
        };

        let entry = &mut self.obstacles[index];
        entry.health = entry.health.saturating_sub(damage);
        if entry.health > 0 {
            out_events.push(Event::ObstacleDamaged {
                obstacle,
                remaining: entry.health,
            });
            return;
        }

        let removed = self.obstacles.remove(index);
        self.occupancy.vacate(removed.cell);
        out_events.push(Event::ObstacleDestroyed {
            obstacle,
            cell: removed.cell,
        });
    }

    fn drain_food(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        self.food = self.food.saturating_sub(amount);
        out_events.push(Event::FoodChanged { total: self.food });
        if self.food == 0 && self.turn_state != TurnState::GameOver {
            info!("player starved on level {}", self.level);
            self.set_turn_state(TurnState::GameOver, out_events);
            out_events.push(Event::GameOver { level: self.level });
        }
    }

    fn set_turn_state(&mut self, state: TurnState, out_events: &mut Vec<Event>) {
        if self.turn_state == state {
            return;
        }
        debug!("turn state {:?} -> {state:?}", self.turn_state);
        self.turn_state = state;
        self.offered = None;
        out_events.push(Event::TurnStateChanged { state });
    }

    fn begin_level(&mut self, level: u32, layout: LevelLayout, food: u32, out: &mut Vec<Event>) {
        self.level = level;
        self.columns = layout.columns;
        self.rows = layout.rows;
        self.food = food;
        self.occupancy = OccupancyGrid::new(layout.columns, layout.rows);
        self.obstacles.clear();
        self.pickups.clear();
        self.actors.clear();
        self.set_turn_state(TurnState::LevelSetup, out);

        out.push(Event::LevelStarted {
            level,
            columns: layout.columns,
            rows: layout.rows,
        });

        for cell in &layout.border {
            self.occupancy.occupy(*cell, Occupant::Terrain);
            out.push(Event::EntitySpawned {
                entity: SpawnedEntity::Terrain,
                cell: *cell,
            });
        }

        let player_move_time = self.config.player_move_time;
        self.register_actor(ActorKind::Player, layout.player_start, player_move_time, out);

        let mut next_obstacle = 0;
        for entity in layout.entities() {
            match entity.kind {
                EntityKind::Wall => {
                    if !self.occupancy.is_vacant(entity.cell) {
                        warn!("skipping wall on occupied cell {:?}", entity.cell);
                        continue;
                    }
                    let id = ObstacleId::new(next_obstacle);
                    next_obstacle += 1;
                    self.obstacles.push(Obstacle {
                        id,
                        cell: entity.cell,
                        health: self.config.wall_health,
                    });
                    self.occupancy.occupy(entity.cell, Occupant::Obstacle(id));
                    out.push(Event::EntitySpawned {
                        entity: SpawnedEntity::Obstacle(id),
                        cell: entity.cell,
                    });
                }
                EntityKind::Resource(resource) => {
                    self.pickups.push(Pickup {
                        cell: entity.cell,
                        kind: PickupKind::Resource(resource),
                    });
                    out.push(Event::EntitySpawned {
                        entity: SpawnedEntity::Resource(resource),
                        cell: entity.cell,
                    });
                }
                EntityKind::Hazard(hazard) => {
                    let move_time = self.config.hazard_move_time;
                    self.register_actor(ActorKind::Hazard(hazard), entity.cell, move_time, out);
                }
            }
        }

        self.pickups.push(Pickup {
            cell: layout.exit,
            kind: PickupKind::Exit,
        });
        out.push(Event::EntitySpawned {
            entity: SpawnedEntity::Exit,
            cell: layout.exit,
        });
        out.push(Event::FoodChanged { total: self.food });

        info!(
            "level {level} started on a {}x{} board with {} walls, {} pickups and {} actors",
            self.columns,
            self.rows,
            self.obstacles.len(),
            self.pickups.len(),
            self.actors.len()
        );
    }

    fn register_actor(
        &mut self,
        kind: ActorKind,
        cell: CellCoord,
        move_time: Duration,
        out: &mut Vec<Event>,
    ) {
        if !self.occupancy.is_vacant(cell) {
            warn!("skipping {kind:?} on occupied cell {cell:?}");
            return;
        }
        let id = ActorId::new(u32::try_from(self.actors.len()).unwrap_or(u32::MAX));
        self.actors.push(Actor {
            id,
            kind,
            cell,
            move_time,
            position: cell_center(cell),
            slide: None,
        });
        self.occupancy.occupy(cell, Occupant::Actor(id));
        out.push(Event::EntitySpawned {
            entity: SpawnedEntity::Actor(id, kind),
            cell,
        });
    }

    fn step_actor(&mut self, actor: ActorId, direction: Direction, out: &mut Vec<Event>) {
        let Some(kind) = self.actor_index(actor).map(|index| self.actors[index].kind) else {
            out.push(Event::StepRejected {
                actor,
                reason: StepRejection::UnknownActor,
            });
            return;
        };

        let rejection = match kind {
            ActorKind::Player if self.turn_state != TurnState::PlayerTurn => {
                Some(StepRejection::TurnGateClosed)
            }
            ActorKind::Hazard(_) if self.turn_state != TurnState::EnemiesResolving => {
                Some(StepRejection::TurnGateClosed)
            }
            ActorKind::Hazard(_) if self.offered != Some(actor) => {
                Some(StepRejection::TurnNotOffered)
            }
            _ => None,
        };
        if let Some(reason) = rejection {
            debug!("rejected step by actor {}: {reason:?}", actor.get());
            out.push(Event::StepRejected { actor, reason });
            return;
        }

        let outcome = match movement::resolve(self, actor, direction, out) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("step by actor {} failed: {error}", actor.get());
                return;
            }
        };

        match kind {
            ActorKind::Player => self.settle_player_action(actor, outcome, out),
            ActorKind::Hazard(_) => self.offered = None,
        }
    }

    fn settle_player_action(&mut self, player: ActorId, outcome: MoveOutcome, out: &mut Vec<Event>) {
        if outcome == MoveOutcome::BlockedNoop {
            return;
        }

        self.drain_food(1, out);
        if self.turn_state == TurnState::GameOver {
            return;
        }

        let mut reached_exit = false;
        if outcome == MoveOutcome::Moved {
            let Some(cell) = self.actor_index(player).map(|index| self.actors[index].cell) else {
                return;
            };
            reached_exit = self.collect_pickups(cell, out);
        }

        if reached_exit {
            info!("player reached the exit of level {}", self.level);
            out.push(Event::ExitReached { level: self.level });
            self.set_turn_state(TurnState::LevelSetup, out);
        } else {
            self.set_turn_state(TurnState::EnemiesResolving, out);
        }
    }

    /// Consumes every pickup on `cell`; returns whether the exit was among them.
    fn collect_pickups(&mut self, cell: CellCoord, out: &mut Vec<Event>) -> bool {
        let mut reached_exit = false;
        let mut index = 0;
        while index < self.pickups.len() {
            if self.pickups[index].cell != cell {
                index += 1;
                continue;
            }
            match self.pickups[index].kind {
                PickupKind::Resource(kind) => {
                    let pickup = self.pickups.remove(index);
                    let points = self.config.resource_points(kind);
                    self.food = self.food.saturating_add(points);
                    out.push(Event::ResourceCollected {
                        kind,
                        cell: pickup.cell,
                        points,
                    });
                    out.push(Event::FoodChanged { total: self.food });
                }
                PickupKind::Exit => {
                    reached_exit = true;
                    index += 1;
                }
            }
        }
        reached_exit
    }

    fn advance_slides(&mut self, dt: Duration, out: &mut Vec<Event>) {
        for actor in &mut self.actors {
            let Some(slide) = actor.slide else {
                continue;
            };
            let (position, finished) = slide.advance(actor.position, dt);
            actor.position = position;
            if finished {
                actor.slide = None;
                out.push(Event::SlideCompleted {
                    actor: actor.id,
                    cell: actor.cell,
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.turn_state == TurnState::GameOver && !matches!(command, Command::Tick { .. }) {
        debug!("ignoring {command:?} after game over");
        return;
    }

    match command {
        Command::RequestLevel { level } => {
            world.set_turn_state(TurnState::LevelSetup, out_events);
            out_events.push(Event::LevelRequested {
                level,
                food: world.food,
            });
        }
        Command::BeginLevel {
            level,
            layout,
            food,
        } => world.begin_level(level, layout, food, out_events),
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_slides(dt, out_events);
        }
        Command::StepActor { actor, direction } => world.step_actor(actor, direction, out_events),
        Command::OfferTurn { actor } => {
            let is_hazard = world
                .actor_index(actor)
                .is_some_and(|index| matches!(world.actors[index].kind, ActorKind::Hazard(_)));
            if world.turn_state == TurnState::EnemiesResolving && is_hazard {
                world.offered = Some(actor);
                out_events.push(Event::TurnOffered { actor });
            } else {
                debug!("ignoring turn offer for actor {}", actor.get());
            }
        }
        Command::SetTurnState { state } => world.set_turn_state(state, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use scavenger_core::{
        ActorId, ActorSnapshot, ActorView, CellCoord, ObstacleId, Occupant, TurnState,
    };

    use super::{PickupKind, World, WorldConfig};

    /// Level currently loaded into the world; zero before the first level.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Player's current food total.
    #[must_use]
    pub fn food(world: &World) -> u32 {
        world.food
    }

    /// Active turn state.
    #[must_use]
    pub fn turn_state(world: &World) -> TurnState {
        world.turn_state
    }

    /// Tuning values the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Board dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.occupancy.dimensions()
    }

    /// Hazard that currently holds an offered turn, if any.
    #[must_use]
    pub fn offered_turn(world: &World) -> Option<ActorId> {
        world.offered
    }

    /// Captures a read-only view of the actors on the board.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        ActorView::from_snapshots(
            world
                .actors
                .iter()
                .map(|actor| ActorSnapshot {
                    id: actor.id,
                    kind: actor.kind,
                    cell: actor.cell,
                    position: (actor.position.x, actor.position.y),
                    move_time: actor.move_time,
                    sliding: actor.slide.is_some(),
                })
                .collect(),
        )
    }

    /// Rendered position of an actor in cell units.
    #[must_use]
    pub fn actor_position(world: &World, actor: ActorId) -> Option<Vec2> {
        world
            .actors
            .iter()
            .find(|candidate| candidate.id == actor)
            .map(|candidate| candidate.position)
    }

    /// Standing obstacles as `(id, cell, health)` in placement order.
    #[must_use]
    pub fn obstacles(world: &World) -> Vec<(ObstacleId, CellCoord, i32)> {
        world
            .obstacles
            .iter()
            .map(|obstacle| (obstacle.id, obstacle.cell, obstacle.health))
            .collect()
    }

    /// Remaining pickups, the exit included.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<(CellCoord, PickupKind)> {
        world
            .pickups
            .iter()
            .map(|pickup| (pickup.cell, pickup.kind))
            .collect()
    }

    /// Blocking entity on the provided cell; cells off the board read as terrain.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<Occupant> {
        world.occupancy.occupant(cell)
    }

    /// Tests the straight segment between two cell centres for blocking entities.
    #[must_use]
    pub fn probe(
        world: &World,
        from: CellCoord,
        to: CellCoord,
        exclude: Option<ActorId>,
    ) -> Option<Occupant> {
        world.occupancy.probe(from, to, exclude)
    }
}

#[derive(Clone, Debug)]
struct Actor {
    id: ActorId,
    kind: ActorKind,
    cell: CellCoord,
    move_time: Duration,
    position: Vec2,
    slide: Option<Slide>,
}

impl Actor {
    fn commit(&mut self, destination: CellCoord) {
        self.cell = destination;
        self.slide = Some(Slide::toward(destination, self.move_time));
    }
}

#[derive(Clone, Copy, Debug)]
struct Obstacle {
    id: ObstacleId,
    cell: CellCoord,
    health: i32,
}

#[derive(Clone, Copy, Debug)]
struct Pickup {
    cell: CellCoord,
    kind: PickupKind,
}
