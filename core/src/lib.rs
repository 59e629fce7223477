#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scavenger engine.
//!
//! Everything that changes a level goes in as a [`Command`] and comes back
//! out as [`Event`]s. The board types, layout descriptions and actor
//! snapshots that travel with those messages live here as well, so the
//! layout generator, turn controller and hazard pursuit never depend on one
//! another.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Banner prefix displayed while a level is being introduced.
pub const DAY_BANNER_PREFIX: &str = "Day";

/// Formats the intro banner shown while the provided level is set up.
#[must_use]
pub fn day_banner(level: u32) -> String {
    format!("{DAY_BANNER_PREFIX} {level}")
}

/// Formats the message displayed once the player runs out of food.
#[must_use]
pub fn starvation_message(level: u32) -> String {
    format!("After {level} days, you starved.")
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Asks the world to announce that the provided level should be generated.
    RequestLevel {
        /// Level number that should be generated next.
        level: u32,
    },
    /// Replaces the board with a freshly generated level layout.
    BeginLevel {
        /// Level number the layout was generated for.
        level: u32,
        /// Placement of every entity on the new board.
        layout: LevelLayout,
        /// Food total carried into the level.
        food: u32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an actor advance a single cell in the specified direction.
    StepActor {
        /// Identifier of the actor attempting to move.
        actor: ActorId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Grants a hazard actor permission to take exactly one step.
    OfferTurn {
        /// Hazard receiving the turn.
        actor: ActorId,
    },
    /// Requests that the world transition to the provided turn state.
    SetTurnState {
        /// State the world should activate.
        state: TurnState,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a level should be generated and carries the food total forward.
    LevelRequested {
        /// Level number awaiting generation.
        level: u32,
        /// Food total the player brings into the level.
        food: u32,
    },
    /// Confirms that a new level replaced the board.
    LevelStarted {
        /// Level number that became active.
        level: u32,
        /// Number of columns on the new board.
        columns: u32,
        /// Number of rows on the new board.
        rows: u32,
    },
    /// Reports that an entity was instantiated at the provided cell.
    EntitySpawned {
        /// Entity that was instantiated.
        entity: SpawnedEntity,
        /// Cell the entity occupies.
        cell: CellCoord,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the world entered a new turn state.
    TurnStateChanged {
        /// State that became active after processing commands.
        state: TurnState,
    },
    /// Confirms that a hazard was granted a single step.
    TurnOffered {
        /// Hazard that may now step.
        actor: ActorId,
    },
    /// Confirms that an actor committed a move between two cells.
    ActorMoved {
        /// Identifier of the actor that moved.
        actor: ActorId,
        /// Cell the actor occupied before moving.
        from: CellCoord,
        /// Cell the actor occupies after committing the move.
        to: CellCoord,
    },
    /// Reports that an actor was blocked by an entity it interacts with.
    ActorBlocked {
        /// Identifier of the blocked actor.
        actor: ActorId,
        /// Entity that blocked the move and received the interaction.
        occupant: Occupant,
    },
    /// Reports that an actor was blocked by an entity it cannot interact with.
    ActorStalled {
        /// Identifier of the blocked actor.
        actor: ActorId,
        /// Entity that blocked the move.
        occupant: Occupant,
    },
    /// Reports that an actor finished animating into its logical cell.
    SlideCompleted {
        /// Identifier of the actor that finished sliding.
        actor: ActorId,
        /// Cell the slide ended in.
        cell: CellCoord,
    },
    /// Reports that a step request was rejected without touching the world.
    StepRejected {
        /// Actor that issued the rejected step.
        actor: ActorId,
        /// Specific reason the step was rejected.
        reason: StepRejection,
    },
    /// Reports that an obstacle absorbed damage but still stands.
    ObstacleDamaged {
        /// Obstacle that was hit.
        obstacle: ObstacleId,
        /// Health remaining after the hit.
        remaining: i32,
    },
    /// Reports that an obstacle ran out of health and no longer blocks its cell.
    ObstacleDestroyed {
        /// Obstacle that was removed.
        obstacle: ObstacleId,
        /// Cell that became passable.
        cell: CellCoord,
    },
    /// Reports that the player picked up a resource.
    ResourceCollected {
        /// Kind of resource that was consumed.
        kind: ResourceKind,
        /// Cell the resource occupied.
        cell: CellCoord,
        /// Food points granted by the resource.
        points: u32,
    },
    /// Reports that a hazard hit the player.
    PlayerDamaged {
        /// Hazard responsible for the attack.
        attacker: ActorId,
        /// Food points the player lost.
        amount: u32,
    },
    /// Reports the player's food total after any change.
    FoodChanged {
        /// Food total after the change.
        total: u32,
    },
    /// Reports that the player reached the level exit.
    ExitReached {
        /// Level that was completed.
        level: u32,
    },
    /// Announces the terminal end of the game.
    GameOver {
        /// Level during which the player starved.
        level: u32,
    },
}

/// Turn phases that gate which actors may act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// A level is being generated or introduced; nobody may act.
    LevelSetup,
    /// The player may issue exactly one committed action.
    PlayerTurn,
    /// Hazards are taking their turns one after another.
    EnemiesResolving,
    /// The player starved. Terminal.
    GameOver,
}

/// Reasons a step request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepRejection {
    /// The current turn state does not accept steps from this actor.
    TurnGateClosed,
    /// The hazard has not been offered a turn.
    TurnNotOffered,
    /// No actor with the provided identifier exists.
    UnknownActor,
}

/// Cardinal movement directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every cardinal direction in clockwise order starting north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit vector `(dx, dy)` for the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Converts a unit vector into a direction, rejecting anything that is not cardinal.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Self, MoveError> {
        match (dx, dy) {
            (0, 1) => Ok(Self::North),
            (1, 0) => Ok(Self::East),
            (0, -1) => Ok(Self::South),
            (-1, 0) => Ok(Self::West),
            _ => Err(MoveError::InvalidDirection { dx, dy }),
        }
    }
}

/// Unique identifier assigned to an actor. Lower identifiers registered first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the obstacle identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighbouring cell in the provided direction, if it is representable.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }

    /// Reports whether the cell lies on the impassable border of a grid.
    #[must_use]
    pub const fn is_border(&self, columns: u32, rows: u32) -> bool {
        self.column == 0
            || self.row == 0
            || self.column + 1 >= columns
            || self.row + 1 >= rows
    }
}

/// Broad categories of entities the layout generator can scatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// Destructible walls that block movement.
    Obstacle,
    /// Food and soda pickups.
    Resource,
    /// Autonomous hazard actors.
    Hazard,
    /// The level exit.
    Exit,
}

/// Concrete resources that restore food.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Grants the configured food points.
    Food,
    /// Grants the configured soda points.
    Soda,
}

/// Concrete hazard actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Slower hitter that drains the configured zombie damage.
    Zombie,
    /// Harder hitter that drains the configured vampire damage.
    Vampire,
}

/// Concrete entity variants placed onto the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Destructible wall.
    Wall,
    /// Resource pickup.
    Resource(ResourceKind),
    /// Hazard actor.
    Hazard(HazardKind),
}

impl EntityKind {
    /// Category the entity kind belongs to.
    #[must_use]
    pub const fn category(self) -> EntityCategory {
        match self {
            Self::Wall => EntityCategory::Obstacle,
            Self::Resource(_) => EntityCategory::Resource,
            Self::Hazard(_) => EntityCategory::Hazard,
        }
    }
}

/// Inclusive range describing how many instances of a category are placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountRange {
    /// Smallest number of instances placed.
    pub minimum: i32,
    /// Largest number of instances placed.
    pub maximum: i32,
}

impl CountRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(minimum: i32, maximum: i32) -> Self {
        Self { minimum, maximum }
    }

    /// Creates a range that always yields exactly `count` instances.
    #[must_use]
    pub const fn exactly(count: i32) -> Self {
        Self::new(count, count)
    }

    /// Reports whether both bounds are non-negative and ordered.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.minimum >= 0 && self.minimum <= self.maximum
    }
}

/// Describes how many entities of one category the generator places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceableSpec {
    /// Category of the placed entities.
    pub category: EntityCategory,
    /// Inclusive count range drawn once per level.
    pub count: CountRange,
}

impl PlaceableSpec {
    /// Creates a new placeable spec.
    #[must_use]
    pub const fn new(category: EntityCategory, count: CountRange) -> Self {
        Self { category, count }
    }
}

/// Single entity assigned to a cell by the layout generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedEntity {
    /// Concrete variant of the entity.
    pub kind: EntityKind,
    /// Cell assigned to the entity.
    pub cell: CellCoord,
}

/// Entities placed on behalf of one [`PlaceableSpec`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementGroup {
    /// Spec the group was drawn for.
    pub spec: PlaceableSpec,
    /// Entities placed for the spec, in draw order.
    pub entities: Vec<PlacedEntity>,
}

/// Complete description of a generated level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Number of columns on the board, border included.
    pub columns: u32,
    /// Number of rows on the board, border included.
    pub rows: u32,
    /// Permanently impassable border cells.
    pub border: Vec<CellCoord>,
    /// One group per spec, in spec order.
    pub groups: Vec<PlacementGroup>,
    /// Fixed cell of the level exit.
    pub exit: CellCoord,
    /// Cell where the player starts the level.
    pub player_start: CellCoord,
}

impl LevelLayout {
    /// Iterator over every pool-drawn entity across all groups.
    pub fn entities(&self) -> impl Iterator<Item = &PlacedEntity> {
        self.groups.iter().flat_map(|group| group.entities.iter())
    }

    /// Number of pool-drawn entities in the provided category.
    #[must_use]
    pub fn count_of(&self, category: EntityCategory) -> usize {
        self.entities()
            .filter(|entity| entity.kind.category() == category)
            .count()
    }
}

/// Entity announced to the spawn/render collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnedEntity {
    /// Impassable border terrain.
    Terrain,
    /// Destructible obstacle.
    Obstacle(ObstacleId),
    /// Resource pickup.
    Resource(ResourceKind),
    /// Level exit.
    Exit,
    /// Actor of the provided kind.
    Actor(ActorId, ActorKind),
}

/// Behavioural variants of actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Player-controlled actor that chops obstacles.
    Player,
    /// Autonomous hazard that attacks the player.
    Hazard(HazardKind),
}

/// Capability-tagged result of an occupancy probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// Border terrain or the area outside the grid.
    Terrain,
    /// Destructible obstacle.
    Obstacle(ObstacleId),
    /// Another actor.
    Actor(ActorId),
}

/// Result of a resolved move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The actor committed to the destination and began sliding.
    Moved,
    /// The actor interacted with the blocking entity instead of moving.
    Blocked(Occupant),
    /// The actor was blocked by something it cannot interact with.
    BlockedNoop,
}

/// Errors reported by the movement resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The requested vector is not one of the four cardinal unit vectors.
    #[error("({dx}, {dy}) is not a cardinal unit direction")]
    InvalidDirection {
        /// Requested column delta.
        dx: i32,
        /// Requested row delta.
        dy: i32,
    },
    /// No actor with the provided identifier exists.
    #[error("actor {} does not exist", .0.get())]
    UnknownActor(ActorId),
}

/// Errors reported by the level layout generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The board has no interior cell.
    #[error("a {columns}x{rows} board has no interior cells; at least 3x3 is required")]
    InvalidDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// A spec has a negative or inverted count range.
    #[error("malformed {category:?} count range [{minimum}, {maximum}]")]
    MalformedSpec {
        /// Category of the offending spec.
        category: EntityCategory,
        /// Requested minimum.
        minimum: i32,
        /// Requested maximum.
        maximum: i32,
    },
    /// The free-cell pool ran dry before every spec was satisfied.
    #[error("placing {requested} {category:?} entities overflows the {available} free cells left")]
    LayoutOverflow {
        /// Category being placed when the pool ran dry.
        category: EntityCategory,
        /// Instances drawn for that category.
        requested: u32,
        /// Free cells remaining when the category started placing.
        available: u32,
    },
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: ActorId,
    /// Behavioural variant of the actor.
    pub kind: ActorKind,
    /// Logical cell owned by the actor.
    pub cell: CellCoord,
    /// Rendered position in cell units; lags `cell` while sliding.
    pub position: (f32, f32),
    /// Seconds required to traverse one cell.
    pub move_time: Duration,
    /// Indicates whether a slide transition is still in progress.
    pub sliding: bool,
}

/// Read-only snapshot describing all actors on the board.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view ordered by registration.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured actor snapshots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the player actor, if one is registered.
    #[must_use]
    pub fn player(&self) -> Option<&ActorSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.kind == ActorKind::Player)
    }

    /// Iterator over hazard snapshots in registration order.
    pub fn hazards(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| matches!(snapshot.kind, ActorKind::Hazard(_)))
    }

    /// Snapshot of the provided actor, if it exists.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }
}
