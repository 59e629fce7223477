use std::collections::HashSet;

use scavenger_core::{
    CellCoord, Command, CountRange, EntityCategory, EntityKind, Event, LayoutError,
    PlaceableSpec,
};
use scavenger_system_layout::{
    generate_level, hazard_count, level_seed, LevelBuilder, LevelPlan, PLAYER_START,
};

fn classic_specs(level: u32) -> Vec<PlaceableSpec> {
    LevelPlan::default().specs_for(level)
}

#[test]
fn placements_respect_ranges_and_never_overlap() {
    for seed in 0..64 {
        for level in [1, 2, 5, 16] {
            let specs = classic_specs(level);
            let layout = generate_level(8, 8, &specs, seed).expect("layout fits");

            assert_eq!(layout.groups.len(), specs.len());
            let mut seen = HashSet::new();
            for (group, spec) in layout.groups.iter().zip(&specs) {
                assert_eq!(group.spec, *spec);
                let placed = group.entities.len() as i32;
                assert!(
                    (spec.count.minimum..=spec.count.maximum).contains(&placed),
                    "seed {seed}: {placed} {:?} outside {:?}",
                    spec.category,
                    spec.count
                );
                for entity in &group.entities {
                    assert_eq!(entity.kind.category(), spec.category);
                    assert!(!entity.cell.is_border(8, 8), "entity on border");
                    assert_ne!(entity.cell, PLAYER_START);
                    assert!(seen.insert(entity.cell), "overlapping placement");
                }
            }
        }
    }
}

#[test]
fn hazard_count_grows_logarithmically() {
    assert_eq!(hazard_count(1), 0);
    assert_eq!(hazard_count(2), 1);
    assert_eq!(hazard_count(3), 1);
    assert_eq!(hazard_count(4), 2);
    assert_eq!(hazard_count(8), 3);
    assert_eq!(hazard_count(0), 0);

    for (level, expected) in [(1, 0), (2, 1), (4, 2), (8, 3)] {
        let layout = generate_level(8, 8, &classic_specs(level), 99).expect("layout fits");
        assert_eq!(layout.count_of(EntityCategory::Hazard), expected);
    }
}

#[test]
fn identical_seed_produces_identical_layout() {
    let specs = classic_specs(6);
    let first = generate_level(10, 9, &specs, 0x5eed).expect("layout fits");
    let second = generate_level(10, 9, &specs, 0x5eed).expect("layout fits");
    assert_eq!(first, second);
}

#[test]
fn exit_and_border_are_fixed() {
    let layout = generate_level(8, 6, &classic_specs(1), 3).expect("layout fits");

    assert_eq!(layout.exit, CellCoord::new(6, 4));
    assert_eq!(layout.player_start, CellCoord::new(1, 1));
    assert_eq!(layout.border.len(), 2 * 8 + 2 * (6 - 2));
    assert!(layout.border.iter().all(|cell| cell.is_border(8, 6)));
}

#[test]
fn rejects_boards_without_interior() {
    assert_eq!(
        generate_level(2, 8, &[], 1),
        Err(LayoutError::InvalidDimensions {
            columns: 2,
            rows: 8
        })
    );
}

#[test]
fn rejects_malformed_specs_before_drawing() {
    let inverted = [PlaceableSpec::new(
        EntityCategory::Obstacle,
        CountRange::new(4, 2),
    )];
    assert_eq!(
        generate_level(8, 8, &inverted, 1),
        Err(LayoutError::MalformedSpec {
            category: EntityCategory::Obstacle,
            minimum: 4,
            maximum: 2
        })
    );

    let negative = [PlaceableSpec::new(
        EntityCategory::Resource,
        CountRange::new(-1, 2),
    )];
    assert!(matches!(
        generate_level(8, 8, &negative, 1),
        Err(LayoutError::MalformedSpec { .. })
    ));
}

#[test]
fn overflowing_demand_fails_instead_of_underplacing() {
    // A 4x4 board has four interior cells, one of them reserved for the player.
    let specs = [
        PlaceableSpec::new(EntityCategory::Obstacle, CountRange::exactly(2)),
        PlaceableSpec::new(EntityCategory::Resource, CountRange::exactly(2)),
    ];
    assert_eq!(
        generate_level(4, 4, &specs, 11),
        Err(LayoutError::LayoutOverflow {
            category: EntityCategory::Resource,
            requested: 2,
            available: 1,
        })
    );

    let exact = [PlaceableSpec::new(
        EntityCategory::Obstacle,
        CountRange::exactly(3),
    )];
    let layout = generate_level(4, 4, &exact, 11).expect("three cells fit");
    assert_eq!(layout.count_of(EntityCategory::Obstacle), 3);
}

#[test]
fn builder_answers_level_requests_with_carried_food() {
    let plan = LevelPlan {
        seed: 42,
        ..LevelPlan::default()
    };
    let mut builder = LevelBuilder::new(plan);
    let mut commands = Vec::new();

    builder
        .handle(
            &[
                Event::TimeAdvanced {
                    dt: std::time::Duration::from_millis(16),
                },
                Event::LevelRequested { level: 4, food: 73 },
            ],
            &mut commands,
        )
        .expect("default plan fits");

    assert_eq!(commands.len(), 1);
    let Command::BeginLevel {
        level,
        layout,
        food,
    } = &commands[0]
    else {
        panic!("unexpected command: {:?}", commands[0]);
    };
    assert_eq!(*level, 4);
    assert_eq!(*food, 73);
    assert_eq!(layout.count_of(EntityCategory::Hazard), 2);
    assert_eq!(
        *layout,
        generate_level(8, 8, &plan.specs_for(4), level_seed(42, 4)).expect("layout fits")
    );
}

#[test]
fn builder_prefers_queued_layout_once() {
    let plan = LevelPlan::default();
    let mut builder = LevelBuilder::new(plan);
    let mut queued = builder.build(1).expect("layout fits");
    queued.groups[0].entities.clear();
    builder.queue_layout(queued.clone());

    let mut commands = Vec::new();
    builder
        .handle(&[Event::LevelRequested { level: 1, food: 100 }], &mut commands)
        .expect("queued layout");
    builder
        .handle(&[Event::LevelRequested { level: 2, food: 100 }], &mut commands)
        .expect("generated layout");

    match (&commands[0], &commands[1]) {
        (
            Command::BeginLevel { layout: first, .. },
            Command::BeginLevel { layout: second, .. },
        ) => {
            assert_eq!(*first, queued);
            assert_eq!(*second, builder.build(2).expect("layout fits"));
        }
        other => panic!("unexpected commands: {other:?}"),
    }
}

#[test]
fn builder_surfaces_overflow() {
    let plan = LevelPlan {
        columns: 3,
        rows: 3,
        walls: CountRange::exactly(1),
        ..LevelPlan::default()
    };
    let mut builder = LevelBuilder::new(plan);
    let mut commands = Vec::new();

    let result = builder.handle(&[Event::LevelRequested { level: 1, food: 5 }], &mut commands);

    assert!(matches!(result, Err(LayoutError::LayoutOverflow { .. })));
    assert!(commands.is_empty());
}

#[test]
fn resource_and_hazard_variants_are_drawn() {
    let specs = [
        PlaceableSpec::new(EntityCategory::Resource, CountRange::exactly(20)),
        PlaceableSpec::new(EntityCategory::Hazard, CountRange::exactly(20)),
    ];
    let layout = generate_level(12, 12, &specs, 5).expect("layout fits");
    let kinds: HashSet<EntityKind> = layout.entities().map(|entity| entity.kind).collect();
    assert_eq!(kinds.len(), 4, "expected both resource and hazard variants");
}
