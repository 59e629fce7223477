use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use scavenger_core::{ActorView, CellCoord, Command, Event, LevelLayout, Occupant, TurnState};
use scavenger_rendering::{
    AudioSink, GridPresentation, InputSource, PickupPresentation, RenderingBackend, Scene,
    SceneActor, SceneObstacle, ScenePickup, SoundCue,
};
use scavenger_system_bootstrap::Bootstrap;
use scavenger_system_layout::LevelBuilder;
use scavenger_system_pursuit::Pursuit;
use scavenger_system_turns::Turns;
use scavenger_world::{self as world, query, PickupKind, World};

use crate::config::GameConfig;

/// Owns the world, its systems and the collaborators that surround them.
pub(crate) struct Session {
    world: World,
    builder: LevelBuilder,
    turns: Turns,
    pursuit: Pursuit,
    bootstrap: Bootstrap,
    renderer: Box<dyn RenderingBackend>,
    audio: Box<dyn AudioSink>,
    input: Box<dyn InputSource>,
    frame: Duration,
}

impl Session {
    pub(crate) fn new(
        config: &GameConfig,
        frame: Duration,
        renderer: Box<dyn RenderingBackend>,
        audio: Box<dyn AudioSink>,
        input: Box<dyn InputSource>,
    ) -> Self {
        Self {
            world: World::new(config.world_config()),
            builder: LevelBuilder::new(config.level_plan()),
            turns: Turns::new(config.turn_config()),
            pursuit: Pursuit::new(),
            bootstrap: Bootstrap::default(),
            renderer,
            audio,
            input,
            frame,
        }
    }

    /// Plays `layout` instead of a generated board for the next level.
    pub(crate) fn queue_layout(&mut self, layout: LevelLayout) {
        self.builder.queue_layout(layout);
    }

    /// Requests the first level and presents its intro.
    pub(crate) fn start(&mut self, level: u32) -> Result<()> {
        info!("starting session on level {level}");
        self.submit(Command::RequestLevel { level })?;
        let scene = self.scene()?;
        self.renderer.present(&scene)
    }

    /// Advances the session by one frame: player input, then time, then presentation.
    pub(crate) fn frame(&mut self) -> Result<()> {
        if query::turn_state(&self.world) == TurnState::PlayerTurn {
            let scene = self.scene()?;
            self.input.observe(&scene);
            let player = query::actor_view(&self.world).player().map(|player| player.id);
            if let (Some(actor), Some(direction)) = (player, self.input.next_direction()) {
                self.submit(Command::StepActor { actor, direction })?;
            }
        }

        self.submit(Command::Tick { dt: self.frame })?;
        let scene = self.scene()?;
        self.renderer.present(&scene)
    }

    /// Whether the player starved and nothing else will happen.
    pub(crate) fn is_over(&self) -> bool {
        self.turns.is_finished()
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies `command` and routes the resulting events through every system
    /// until no system has anything left to say.
    fn submit(&mut self, command: Command) -> Result<()> {
        let mut pending = vec![command];
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            let view = query::actor_view(&self.world);
            self.builder
                .handle(&events, &mut pending)
                .context("failed to build the requested level")?;
            self.turns.handle(&events, &view, &mut pending);
            self.pursuit.handle(&events, &view, &mut pending);
            self.bootstrap.handle(&events, &view);
            self.play_cues(&events, &view);
        }
        Ok(())
    }

    fn play_cues(&mut self, events: &[Event], view: &ActorView) {
        let player = view.player().map(|player| player.id);
        for event in events {
            if let Some(cue) = SoundCue::for_event(event, player) {
                debug!("cue {cue:?} for {event:?}");
                self.audio.play(cue);
            }
        }
    }

    /// Builds the scene presented for the current world state.
    pub(crate) fn scene(&self) -> Result<Scene> {
        let (columns, rows) = query::dimensions(&self.world);
        let grid = GridPresentation::new(columns.max(1), rows.max(1))
            .context("world has no board to present")?;
        let wall_health = query::config(&self.world).wall_health;

        let mut scene = Scene::new(grid, self.bootstrap.food_caption(&self.world));
        scene.banner = self.bootstrap.banner(&self.world);
        scene.terrain = (0..columns)
            .flat_map(|column| (0..rows).map(move |row| CellCoord::new(column, row)))
            .filter(|cell| query::occupant(&self.world, *cell) == Some(Occupant::Terrain))
            .collect();
        scene.obstacles = query::obstacles(&self.world)
            .into_iter()
            .map(|(id, cell, health)| SceneObstacle {
                id,
                cell,
                health,
                damaged: health < wall_health,
            })
            .collect();
        scene.pickups = query::pickups(&self.world)
            .into_iter()
            .map(|(cell, kind)| ScenePickup {
                cell,
                kind: match kind {
                    PickupKind::Resource(resource) => PickupPresentation::Resource(resource),
                    PickupKind::Exit => PickupPresentation::Exit,
                },
            })
            .collect();
        scene.actors = query::actor_view(&self.world)
            .iter()
            .map(|actor| SceneActor {
                id: actor.id,
                kind: actor.kind,
                position: actor.position.into(),
            })
            .collect();
        Ok(scene)
    }
}
