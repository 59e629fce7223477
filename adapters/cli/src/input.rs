use std::collections::VecDeque;

use anyhow::{bail, Result};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scavenger_core::{ActorKind, CellCoord, Direction};
use scavenger_rendering::{InputSource, PickupPresentation, Scene};

/// Replays a fixed list of moves written as `N`, `E`, `S` and `W`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedInput {
    moves: VecDeque<Direction>,
}

impl ScriptedInput {
    pub(crate) fn parse(script: &str) -> Result<Self> {
        let mut moves = VecDeque::new();
        for symbol in script.chars().filter(|symbol| !symbol.is_whitespace()) {
            let direction = match symbol.to_ascii_uppercase() {
                'N' => Direction::North,
                'E' => Direction::East,
                'S' => Direction::South,
                'W' => Direction::West,
                other => bail!("unknown move '{other}' in script"),
            };
            moves.push_back(direction);
        }
        Ok(Self { moves })
    }
}

impl InputSource for ScriptedInput {
    fn next_direction(&mut self) -> Option<Direction> {
        self.moves.pop_front()
    }
}

/// Seeded player that heads for the exit, occasionally wandering off to get unstuck.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    player: Option<CellCoord>,
    exit: Option<CellCoord>,
}

const WANDER_CHANCE: f64 = 0.25;

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            player: None,
            exit: None,
        }
    }
}

impl InputSource for Autopilot {
    fn observe(&mut self, scene: &Scene) {
        self.player = scene
            .actors
            .iter()
            .find(|actor| actor.kind == ActorKind::Player)
            .and_then(|actor| scene.grid.cell_at(actor.position));
        self.exit = scene
            .pickups
            .iter()
            .find(|pickup| pickup.kind == PickupPresentation::Exit)
            .map(|pickup| pickup.cell);
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let (player, exit) = (self.player?, self.exit?);
        let mut toward = Vec::with_capacity(2);
        if exit.column() > player.column() {
            toward.push(Direction::East);
        } else if exit.column() < player.column() {
            toward.push(Direction::West);
        }
        if exit.row() > player.row() {
            toward.push(Direction::North);
        } else if exit.row() < player.row() {
            toward.push(Direction::South);
        }

        if toward.is_empty() || self.rng.gen_bool(WANDER_CHANCE) {
            return Direction::ALL.choose(&mut self.rng).copied();
        }
        toward.choose(&mut self.rng).copied()
    }
}
