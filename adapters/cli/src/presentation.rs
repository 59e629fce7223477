use std::io::Write;

use anyhow::{Context, Result};
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scavenger_core::{ActorKind, CellCoord, ResourceKind};
use scavenger_rendering::{
    hazard_glyph, AudioSink, PickupPresentation, RenderingBackend, Scene, SoundCue, CUE_VARIANTS,
    PITCH_RANGE,
};

/// Draws scenes as character grids, skipping frames that look unchanged.
#[derive(Debug)]
pub(crate) struct TextRenderer<W> {
    writer: W,
    last_frame: Option<String>,
}

impl<W: Write> TextRenderer<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            last_frame: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextRenderer<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let frame = draw(scene);
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }
        self.writer
            .write_all(frame.as_bytes())
            .and_then(|()| self.writer.flush())
            .context("failed to write frame")?;
        self.last_frame = Some(frame);
        Ok(())
    }
}

/// Renders the scene with the top row first.
pub(crate) fn draw(scene: &Scene) -> String {
    let mut frame = String::new();
    if let Some(banner) = &scene.banner {
        frame.push_str(banner);
        frame.push('\n');
    } else {
        for row in (0..scene.grid.rows).rev() {
            for column in 0..scene.grid.columns {
                frame.push(glyph(scene, CellCoord::new(column, row)));
            }
            frame.push('\n');
        }
    }
    frame.push_str(&scene.food_text);
    frame.push_str("\n\n");
    frame
}

fn glyph(scene: &Scene, cell: CellCoord) -> char {
    if let Some(actor) = scene.actor_at(cell) {
        return match actor.kind {
            ActorKind::Player => '@',
            ActorKind::Hazard(kind) => hazard_glyph(kind),
        };
    }
    if let Some(obstacle) = scene.obstacles.iter().find(|obstacle| obstacle.cell == cell) {
        return if obstacle.damaged { 'w' } else { 'W' };
    }
    if let Some(pickup) = scene.pickups.iter().find(|pickup| pickup.cell == cell) {
        return match pickup.kind {
            PickupPresentation::Resource(ResourceKind::Food) => 'f',
            PickupPresentation::Resource(ResourceKind::Soda) => 's',
            PickupPresentation::Exit => 'E',
        };
    }
    if scene.terrain.contains(&cell) {
        '#'
    } else {
        '.'
    }
}

/// Audio sink that logs cues with a randomly chosen variant and pitch.
#[derive(Debug)]
pub(crate) struct LogAudio {
    rng: ChaCha8Rng,
}

impl LogAudio {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        let variant = self.rng.gen_range(0..CUE_VARIANTS);
        let pitch = self.rng.gen_range(PITCH_RANGE);
        info!("sound {cue:?} variant {variant} at pitch {pitch:.3}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use scavenger_core::{ActorId, HazardKind, ObstacleId};
    use scavenger_rendering::{GridPresentation, SceneActor, SceneObstacle, ScenePickup};

    fn scene() -> Scene {
        let grid = GridPresentation::new(4, 3).expect("valid grid");
        let mut scene = Scene::new(grid, "Food: 42");
        scene.terrain = (0..4)
            .flat_map(|column| (0..3).map(move |row| CellCoord::new(column, row)))
            .filter(|cell| cell.is_border(4, 3))
            .collect();
        scene.obstacles.push(SceneObstacle {
            id: ObstacleId::new(0),
            cell: CellCoord::new(2, 1),
            health: 3,
            damaged: true,
        });
        scene.actors.push(SceneActor {
            id: ActorId::new(0),
            kind: ActorKind::Player,
            position: Vec2::new(1.0, 1.0),
        });
        scene
    }

    #[test]
    fn draws_rows_from_the_top() {
        assert_eq!(draw(&scene()), "####\n#@w#\n####\nFood: 42\n\n");
    }

    #[test]
    fn actors_cover_pickups() {
        let mut scene = scene();
        scene.pickups.push(ScenePickup {
            cell: CellCoord::new(1, 1),
            kind: PickupPresentation::Exit,
        });
        scene.actors.push(SceneActor {
            id: ActorId::new(1),
            kind: ActorKind::Hazard(HazardKind::Vampire),
            position: Vec2::new(2.0, 2.0),
        });

        assert_eq!(draw(&scene), "##V#\n#@w#\n####\nFood: 42\n\n");
    }

    #[test]
    fn banner_replaces_the_board() {
        let mut scene = scene();
        scene.banner = Some("Day 3".to_owned());

        assert_eq!(draw(&scene), "Day 3\nFood: 42\n\n");
    }

    #[test]
    fn unchanged_frames_are_written_once() {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.present(&scene()).expect("writes");
        renderer.present(&scene()).expect("writes");

        let output = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert_eq!(output.matches("Food: 42").count(), 1);
    }
}
