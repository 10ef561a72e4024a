#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Assembles the standard processor pipeline and drives a game session.

use tracing::info;
use turret_defence_core::{
    status::{Burn, Poison, Shock},
    Assets, InputEvent, StatsTable,
};
use turret_defence_system_damage::{DamageProcessor, DotProcessor, TimedStatusProcessor};
use turret_defence_system_hud::HudProcessor;
use turret_defence_system_lifecycle::{
    AnimationProcessor, FadeOutProcessor, LifetimeProcessor, OutOfBoundsProcessor,
    TimeToLiveProcessor,
};
use turret_defence_system_movement::{PathingProcessor, RotationSyncProcessor, VelocityProcessor};
use turret_defence_system_player_input::PlayerInputProcessor;
use turret_defence_system_research::ResearchProcessor;
use turret_defence_system_spawning::{DespawnProcessor, SpawningProcessor};
use turret_defence_system_turrets::TurretProcessor;
use turret_defence_world::{
    FrameContext, Pipeline, ProcessorId, SceneSignal, SimError, UiSync, World,
};

/// Builds the full game pipeline.
///
/// Turrets fire after damage and expiry have run, so a shot first lands
/// on the tick after it is fired.
///
/// Returns the pipeline together with the handle of the spawning
/// processor, which is removed once the game is over.
#[must_use]
pub fn standard_pipeline() -> (Pipeline, ProcessorId) {
    let mut pipeline = Pipeline::new();
    let _ = pipeline.add(PlayerInputProcessor);
    let _ = pipeline.add(ResearchProcessor);
    let spawning = pipeline.add(SpawningProcessor::default());
    let _ = pipeline.add(DotProcessor::<Burn>::default());
    let _ = pipeline.add(DotProcessor::<Poison>::default());
    let _ = pipeline.add(DotProcessor::buffeting());
    let _ = pipeline.add(TimedStatusProcessor::freezing());
    let _ = pipeline.add(TimedStatusProcessor::<Shock>::default());
    let _ = pipeline.add(VelocityProcessor::default());
    let _ = pipeline.add(PathingProcessor::default());
    let _ = pipeline.add(DamageProcessor::default());
    let _ = pipeline.add(DespawnProcessor::default());
    let _ = pipeline.add(TimeToLiveProcessor::default());
    let _ = pipeline.add(LifetimeProcessor::default());
    let _ = pipeline.add(FadeOutProcessor);
    let _ = pipeline.add(OutOfBoundsProcessor::default());
    let _ = pipeline.add(TurretProcessor::default());
    let _ = pipeline.add(AnimationProcessor::default());
    let _ = pipeline.add(RotationSyncProcessor::default());
    let _ = pipeline.add(HudProcessor::default());
    (pipeline, spawning)
}

/// Game scene: the world, its pipeline and the published interface state.
#[derive(Debug)]
pub struct Session {
    world: World,
    pipeline: Pipeline,
    spawning: ProcessorId,
    ui: UiSync,
    ticks: u64,
}

impl Session {
    /// Starts a session over a populated world with the standard pipeline.
    #[must_use]
    pub fn new(world: World) -> Self {
        let (pipeline, spawning) = standard_pipeline();
        Self {
            world,
            pipeline,
            spawning,
            ui: UiSync::default(),
            ticks: 0,
        }
    }

    /// Simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the simulated world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Interface snapshot published by the last tick.
    #[must_use]
    pub fn ui(&self) -> &UiSync {
        &self.ui
    }

    /// Processors still running.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reports whether an enemy has reached the exit.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.ui.game_over
    }

    /// Advances the simulation by `delta_ms`, applying `events` first.
    pub fn tick(
        &mut self,
        delta_ms: f32,
        events: &[InputEvent],
        assets: &Assets,
        stats: &StatsTable,
    ) -> Result<(), SimError> {
        let mut frame = FrameContext::new(delta_ms, events, assets, stats, &mut self.ui);
        self.pipeline.tick(&mut self.world, &mut frame)?;
        let signals = frame.signals;
        self.ticks += 1;

        for signal in signals {
            match signal {
                SceneSignal::GameOver => self.enter_game_over(),
            }
        }
        Ok(())
    }

    fn enter_game_over(&mut self) {
        if self.pipeline.remove(self.spawning) {
            info!(
                tick = self.ticks,
                score = self.ui.score,
                wave = self.ui.wave_number,
                "game over"
            );
        }
        self.ui.game_over = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_runs_in_the_documented_order() {
        let (pipeline, spawning) = standard_pipeline();

        assert!(pipeline.contains(spawning));
        assert_eq!(
            pipeline.names(),
            vec![
                "player_input",
                "research",
                "spawning",
                "burning",
                "poisoned",
                "buffeted",
                "frozen",
                "shocked",
                "velocity",
                "pathing",
                "damage",
                "despawn",
                "time_to_live",
                "lifetime",
                "fade_out",
                "out_of_bounds",
                "turrets",
                "animation",
                "rotation_sync",
                "hud",
            ]
        );
    }
}
