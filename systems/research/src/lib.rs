#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progress of the player's research project.

use tracing::info;
use turret_defence_core::components::PlayerResearch;
use turret_defence_world::{FrameContext, Processor, SimError, World};

/// Advances the running research project and records its completion.
#[derive(Debug, Default)]
pub struct ResearchProcessor;

impl Processor for ResearchProcessor {
    fn name(&self) -> &'static str {
        "research"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        let research = world.player_component_mut::<PlayerResearch>()?;
        if let Some(kind) = research.advance(frame.delta_ms) {
            info!(
                ?kind,
                unlocks = ?kind.unlocks_turret(),
                cap = research.upgrade_cap(),
                "research completed"
            );
        }
        Ok(())
    }
}
