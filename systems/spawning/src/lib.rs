#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave playback at spawn points and removal of enemies at the exit.

pub mod waves;

pub use waves::{standard_waves, WaveConfig};

use tracing::{debug, info};
use turret_defence_core::{
    components::{BoundingBox, Despawnable, Despawning, PathGraph, Spawning, WaveStep},
    Entity, ScoreEventKind,
};
use turret_defence_world::{
    enemies::spawn_enemy, FrameContext, Processor, SceneSignal, SimError, World,
};

/// Plays the active wave of every spawner, one step per tick.
///
/// Enemies are scaled to the zero-based index of the wave that spawns them.
/// Once the final wave is over its script is played again, forever.
#[derive(Debug, Default)]
pub struct SpawningProcessor {
    scratch: Vec<Entity>,
}

impl Processor for SpawningProcessor {
    fn name(&self) -> &'static str {
        "spawning"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        world
            .store()
            .collect::<(Spawning, BoundingBox, PathGraph)>(&mut self.scratch);

        for &spawner in &self.scratch {
            let spawning = world.store_mut().get_mut::<Spawning>(spawner)?;
            let level = spawning.current_wave_index as u32;
            let final_wave = !spawning.has_next_wave();
            let Some(wave) = spawning.current_wave_mut() else {
                continue;
            };

            match wave.current_step() {
                None if final_wave => {
                    wave.restart();
                    debug!(?spawner, wave = level + 1, "final wave replayed");
                }
                None => {
                    spawning.advance();
                    info!(?spawner, wave = spawning.current_wave_number(), "wave started");
                }
                Some(WaveStep::Wait(duration)) => {
                    wave.elapsed += frame.delta_ms;
                    if wave.elapsed >= duration {
                        wave.advance();
                    }
                }
                Some(WaveStep::SpawnEnemy(kind)) => {
                    wave.enemy_spawn_count += 1;
                    wave.advance();
                    let enemy =
                        spawn_enemy(world, spawner, kind, level, frame.assets, frame.stats)?;
                    debug!(?spawner, ?enemy, ?kind, level, "enemy spawned");
                }
            }
        }
        Ok(())
    }
}

/// Removes enemies that reach an exit zone.
///
/// Every removal counts a despawn and requests the game-over transition.
#[derive(Debug, Default)]
pub struct DespawnProcessor {
    exits: Vec<Entity>,
    arrived: Vec<Entity>,
}

impl Processor for DespawnProcessor {
    fn name(&self) -> &'static str {
        "despawn"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        world
            .store()
            .collect::<(Despawning, BoundingBox)>(&mut self.exits);

        for &exit in &self.exits {
            let store = world.store();
            let zone = store.get::<BoundingBox>(exit)?.rect;
            self.arrived.clear();
            self.arrived.extend(
                store
                    .query2::<Despawnable, BoundingBox>()
                    .filter(|(_, _, bbox)| zone.overlaps(&bbox.rect))
                    .map(|(entity, _, _)| entity),
            );

            for &entity in &self.arrived {
                info!(?entity, "enemy reached the exit");
                let _ = world.store_mut().destroy(entity);
                world.track_score_event(ScoreEventKind::EnemyDespawn)?;
                frame.signal(SceneSignal::GameOver);
            }
        }
        Ok(())
    }
}
