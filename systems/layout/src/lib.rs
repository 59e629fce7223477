#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic level layout generation.
//!
//! [`generate_level`] scatters walls, resources and hazards over the interior
//! of a bordered grid by sampling a shuffled free-cell pool without
//! replacement. [`LevelBuilder`] wraps it as a pure system that answers
//! [`Event::LevelRequested`] with a [`Command::BeginLevel`] batch.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scavenger_core::{
    CellCoord, Command, CountRange, EntityCategory, EntityKind, Event, HazardKind, LayoutError,
    LevelLayout, PlaceableSpec, PlacedEntity, PlacementGroup, ResourceKind,
};
use sha2::{Digest, Sha256};

/// Cell the player occupies when a level begins; never handed to the pool.
pub const PLAYER_START: CellCoord = CellCoord::new(1, 1);

const RESOURCE_VARIANTS: [ResourceKind; 2] = [ResourceKind::Food, ResourceKind::Soda];
const HAZARD_VARIANTS: [HazardKind; 2] = [HazardKind::Zombie, HazardKind::Vampire];

/// Generates a level layout from the provided specs and seed.
///
/// Border cells are recorded as impassable terrain. Every spec then draws a
/// uniform count from its inclusive range and claims that many cells from the
/// interior pool, so placements never overlap across specs. The exit sits on
/// the top-right interior corner regardless of what the pool handed out.
///
/// Dimensions below 3x3 and malformed count ranges are rejected before any
/// random draw. Running out of free cells aborts the whole layout.
pub fn generate_level(
    columns: u32,
    rows: u32,
    specs: &[PlaceableSpec],
    seed: u64,
) -> Result<LevelLayout, LayoutError> {
    if columns < 3 || rows < 3 {
        return Err(LayoutError::InvalidDimensions { columns, rows });
    }
    for spec in specs {
        if !spec.count.is_valid() || spec.category == EntityCategory::Exit {
            return Err(LayoutError::MalformedSpec {
                category: spec.category,
                minimum: spec.count.minimum,
                maximum: spec.count.maximum,
            });
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pool = interior_pool(columns, rows);
    let mut groups = Vec::with_capacity(specs.len());

    for spec in specs {
        let requested = rng.gen_range(spec.count.minimum..=spec.count.maximum);
        let requested = u32::try_from(requested).unwrap_or(0);
        let available = u32::try_from(pool.len()).unwrap_or(u32::MAX);
        if requested > available {
            return Err(LayoutError::LayoutOverflow {
                category: spec.category,
                requested,
                available,
            });
        }

        let mut entities = Vec::with_capacity(pool.len().min(requested as usize));
        for _ in 0..requested {
            let index = rng.gen_range(0..pool.len());
            let cell = pool.remove(index);
            let kind = pick_kind(spec.category, &mut rng);
            entities.push(PlacedEntity { kind, cell });
        }
        debug!(
            "placed {} {:?} entities, {} free cells remain",
            entities.len(),
            spec.category,
            pool.len()
        );
        groups.push(PlacementGroup {
            spec: *spec,
            entities,
        });
    }

    Ok(LevelLayout {
        columns,
        rows,
        border: border_cells(columns, rows),
        groups,
        exit: CellCoord::new(columns - 2, rows - 2),
        player_start: PLAYER_START,
    })
}

/// Number of hazards placed on the provided level: `floor(log2(level))`.
#[must_use]
pub fn hazard_count(level: u32) -> u32 {
    level.checked_ilog2().unwrap_or(0)
}

/// Derives the layout seed for a level from the session seed.
#[must_use]
pub fn level_seed(session_seed: u64, level: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(level.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

fn interior_pool(columns: u32, rows: u32) -> Vec<CellCoord> {
    let mut pool = Vec::new();
    for column in 1..columns - 1 {
        for row in 1..rows - 1 {
            let cell = CellCoord::new(column, row);
            if cell != PLAYER_START {
                pool.push(cell);
            }
        }
    }
    pool
}

fn border_cells(columns: u32, rows: u32) -> Vec<CellCoord> {
    let mut border = Vec::new();
    for column in 0..columns {
        for row in 0..rows {
            let cell = CellCoord::new(column, row);
            if cell.is_border(columns, rows) {
                border.push(cell);
            }
        }
    }
    border
}

fn pick_kind(category: EntityCategory, rng: &mut ChaCha8Rng) -> EntityKind {
    match category {
        EntityCategory::Resource => {
            EntityKind::Resource(RESOURCE_VARIANTS[rng.gen_range(0..RESOURCE_VARIANTS.len())])
        }
        EntityCategory::Hazard => {
            EntityKind::Hazard(HAZARD_VARIANTS[rng.gen_range(0..HAZARD_VARIANTS.len())])
        }
        EntityCategory::Obstacle | EntityCategory::Exit => EntityKind::Wall,
    }
}

/// Board size, count ranges and seed used for every generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    /// Number of columns, border included.
    pub columns: u32,
    /// Number of rows, border included.
    pub rows: u32,
    /// Wall count range per level.
    pub walls: CountRange,
    /// Resource count range per level.
    pub resources: CountRange,
    /// Session seed from which per-level seeds are derived.
    pub seed: u64,
}

impl LevelPlan {
    /// Specs generated for the provided level, in placement order.
    #[must_use]
    pub fn specs_for(&self, level: u32) -> Vec<PlaceableSpec> {
        let hazards = i32::try_from(hazard_count(level)).unwrap_or(i32::MAX);
        vec![
            PlaceableSpec::new(EntityCategory::Obstacle, self.walls),
            PlaceableSpec::new(EntityCategory::Resource, self.resources),
            PlaceableSpec::new(EntityCategory::Hazard, CountRange::exactly(hazards)),
        ]
    }
}

impl Default for LevelPlan {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            walls: CountRange::new(5, 9),
            resources: CountRange::new(1, 5),
            seed: 0,
        }
    }
}

/// Pure system that turns level requests into fully populated boards.
#[derive(Debug, Default)]
pub struct LevelBuilder {
    plan: LevelPlan,
    queued: Option<LevelLayout>,
}

impl LevelBuilder {
    /// Creates a new builder generating levels according to `plan`.
    #[must_use]
    pub fn new(plan: LevelPlan) -> Self {
        Self { plan, queued: None }
    }

    /// Uses `layout` for the next requested level instead of generating one.
    pub fn queue_layout(&mut self, layout: LevelLayout) {
        self.queued = Some(layout);
    }

    /// Generates the layout for a single level without touching queued layouts.
    pub fn build(&self, level: u32) -> Result<LevelLayout, LayoutError> {
        generate_level(
            self.plan.columns,
            self.plan.rows,
            &self.plan.specs_for(level),
            level_seed(self.plan.seed, level),
        )
    }

    /// Consumes world events and emits `BeginLevel` commands for requested levels.
    ///
    /// A failing generation aborts the batch and leaves `out` without a
    /// partially populated level.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) -> Result<(), LayoutError> {
        for event in events {
            let Event::LevelRequested { level, food } = event else {
                continue;
            };

            let layout = match self.queued.take() {
                Some(layout) => layout,
                None => self.build(*level)?,
            };
            info!(
                "level {level}: {} walls, {} resources, {} hazards",
                layout.count_of(EntityCategory::Obstacle),
                layout.count_of(EntityCategory::Resource),
                layout.count_of(EntityCategory::Hazard)
            );
            out.push(Command::BeginLevel {
                level: *level,
                layout,
                food: *food,
            });
        }
        Ok(())
    }
}
