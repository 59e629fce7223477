#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Scavenger adapters.

use std::{error::Error, fmt, ops::RangeInclusive};

use anyhow::Result as AnyResult;
use glam::Vec2;
use scavenger_core::{
    ActorId, ActorKind, CellCoord, Direction, Event, HazardKind, ObstacleId, ResourceKind,
};

/// Pitch multipliers a sound effect may be played back with.
pub const PITCH_RANGE: RangeInclusive<f32> = 0.95..=1.05;

/// Number of recorded variants available for every sound cue.
pub const CUE_VARIANTS: u8 = 2;

/// Dimensions of the board being presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPresentation {
    /// Number of columns, border included.
    pub columns: u32,
    /// Number of rows, border included.
    pub rows: u32,
}

impl GridPresentation {
    /// Creates a new grid descriptor, rejecting empty boards.
    pub fn new(columns: u32, rows: u32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Snaps a visual position expressed in cell units to the nearest cell.
    ///
    /// Positions outside the board yield `None`.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        let rounded = position.round();
        if rounded.x < 0.0 || rounded.y < 0.0 {
            return None;
        }
        let column = rounded.x as u32;
        let row = rounded.y as u32;
        (column < self.columns && row < self.rows).then(|| CellCoord::new(column, row))
    }
}

/// Wall drawn on the board along with its remaining health.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneObstacle {
    /// Identifier of the wall.
    pub id: ObstacleId,
    /// Cell the wall stands on.
    pub cell: CellCoord,
    /// Hits the wall still absorbs.
    pub health: i32,
    /// Whether the wall has been hit at least once.
    pub damaged: bool,
}

/// Non-blocking pickup drawn beneath the actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupPresentation {
    /// Food or soda restoring the player's food.
    Resource(ResourceKind),
    /// Exit leading to the next level.
    Exit,
}

/// Pickup placed on a specific cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenePickup {
    /// Cell holding the pickup.
    pub cell: CellCoord,
    /// Kind of pickup.
    pub kind: PickupPresentation,
}

/// Actor drawn at its interpolated visual position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneActor {
    /// Identifier of the actor.
    pub id: ActorId,
    /// Behavioural variant of the actor.
    pub kind: ActorKind,
    /// Visual position in cell units; lags the logical cell while sliding.
    pub position: Vec2,
}

/// Scene description combining the board, its inhabitants and captions.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board dimensions.
    pub grid: GridPresentation,
    /// Impassable border cells.
    pub terrain: Vec<CellCoord>,
    /// Standing walls.
    pub obstacles: Vec<SceneObstacle>,
    /// Remaining pickups, the exit included.
    pub pickups: Vec<ScenePickup>,
    /// Player and hazards in registration order.
    pub actors: Vec<SceneActor>,
    /// Full-screen banner covering the board, if any.
    pub banner: Option<String>,
    /// Caption describing the player's food.
    pub food_text: String,
}

impl Scene {
    /// Creates a new scene descriptor for an otherwise empty board.
    #[must_use]
    pub fn new(grid: GridPresentation, food_text: impl Into<String>) -> Self {
        Self {
            grid,
            terrain: Vec::new(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            actors: Vec::new(),
            banner: None,
            food_text: food_text.into(),
        }
    }

    /// Actor whose visual position rounds to the provided cell, if any.
    #[must_use]
    pub fn actor_at(&self, cell: CellCoord) -> Option<&SceneActor> {
        self.actors
            .iter()
            .find(|actor| self.grid.cell_at(actor.position) == Some(cell))
    }
}

/// Rendering backend capable of presenting Scavenger scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Sound effects triggered by gameplay events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Footsteps of a committed player move.
    Move,
    /// Player chopping at a wall.
    Chop,
    /// Food pickup.
    Eat,
    /// Soda pickup.
    Drink,
    /// Hazard hitting the player.
    EnemyAttack,
    /// Player starved.
    GameOver,
}

impl SoundCue {
    /// Cue that accompanies `event`, if any. Only the player's moves make noise.
    #[must_use]
    pub fn for_event(event: &Event, player: Option<ActorId>) -> Option<Self> {
        match event {
            Event::ActorMoved { actor, .. } if Some(*actor) == player => Some(Self::Move),
            Event::ObstacleDamaged { .. } | Event::ObstacleDestroyed { .. } => Some(Self::Chop),
            Event::ResourceCollected {
                kind: ResourceKind::Food,
                ..
            } => Some(Self::Eat),
            Event::ResourceCollected {
                kind: ResourceKind::Soda,
                ..
            } => Some(Self::Drink),
            Event::PlayerDamaged { .. } => Some(Self::EnemyAttack),
            Event::GameOver { .. } => Some(Self::GameOver),
            _ => None,
        }
    }
}

/// Fire-and-forget sink for sound effects.
pub trait AudioSink {
    /// Plays the provided cue.
    fn play(&mut self, cue: SoundCue);
}

/// Source of player move requests, polled once per frame during the player's turn.
pub trait InputSource {
    /// Receives the scene presented on the previous frame before being polled.
    fn observe(&mut self, _scene: &Scene) {}

    /// Direction the player wants to step in, if any.
    fn next_direction(&mut self) -> Option<Direction>;
}

/// Single character used by text backends to draw the provided hazard.
#[must_use]
pub const fn hazard_glyph(kind: HazardKind) -> char {
    match kind {
        HazardKind::Zombie => 'Z',
        HazardKind::Vampire => 'V',
    }
}

/// Errors that can occur when constructing presentation descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Boards must contain at least one cell.
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { columns, rows } => {
                write!(f, "grid must contain cells (received {columns}x{rows})")
            }
        }
    }
}

impl Error for RenderingError {}
