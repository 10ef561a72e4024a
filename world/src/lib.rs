#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state and entity factories for Turret Defence.

pub mod economy;
pub mod effects;
pub mod enemies;
pub mod map;
pub mod pipeline;
pub mod turrets;
pub mod ui;

mod error;

pub use error::SimError;
pub use pipeline::{FrameContext, Pipeline, Processor, ProcessorId, SceneSignal};
pub use ui::UiSync;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use turret_defence_core::{
    components::{PlayerInputMachine, PlayerResearch, PlayerResources, ScoreTracker},
    Entity, Rect, ScoreEventKind, Store, StoreError, PLAYER_STARTING_MONEY,
};

/// Component store plus the handles every processor needs.
#[derive(Debug)]
pub struct World {
    store: Store,
    player: Entity,
    bounds: Rect,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world covering `bounds` with a freshly funded player.
    ///
    /// `seed` drives every randomised effect so runs can be reproduced.
    #[must_use]
    pub fn new(bounds: Rect, seed: u64) -> Self {
        let mut store = Store::new();
        let player = store
            .create()
            .with(PlayerInputMachine::default())
            .with(ScoreTracker::default())
            .with(PlayerResources {
                money: PLAYER_STARTING_MONEY,
            })
            .with(PlayerResearch::default())
            .build();

        Self {
            store,
            player,
            bounds,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Read access to every component.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Write access to every component.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Entity holding the player's resources, research and selection.
    #[must_use]
    pub const fn player(&self) -> Entity {
        self.player
    }

    /// Playable area; entities leaving it may be culled.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Seeded random source for randomised effects.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Borrows a component of the player entity.
    pub fn player_component<T: 'static>(&self) -> Result<&T, StoreError> {
        self.store.get::<T>(self.player)
    }

    /// Mutably borrows a component of the player entity.
    pub fn player_component_mut<T: 'static>(&mut self) -> Result<&mut T, StoreError> {
        self.store.get_mut::<T>(self.player)
    }

    /// Money the player can spend.
    pub fn money(&self) -> Result<u32, StoreError> {
        Ok(self.player_component::<PlayerResources>()?.money)
    }

    /// Counts a score event on the player's tracker.
    pub fn track_score_event(&mut self, kind: ScoreEventKind) -> Result<(), StoreError> {
        self.player_component_mut::<ScoreTracker>()?.record(kind);
        Ok(())
    }
}
