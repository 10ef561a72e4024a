#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Expiry, culling and frame animation of short-lived entities.

use tracing::trace;
use turret_defence_core::{
    components::{
        Animated, BoundingBox, FadeOut, Lifetime, RemoveOnOutOfBounds, Renderable, TimeToLive,
    },
    Entity,
};
use turret_defence_world::{FrameContext, Processor, SimError, World};

/// Destroys entities whose [`TimeToLive`] has elapsed.
#[derive(Debug, Default)]
pub struct TimeToLiveProcessor {
    expired: Vec<Entity>,
}

impl Processor for TimeToLiveProcessor {
    fn name(&self) -> &'static str {
        "time_to_live"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        let store = world.store_mut();
        self.expired.clear();
        for (entity, ttl) in store.query_mut::<TimeToLive>() {
            ttl.elapsed += frame.delta_ms;
            if ttl.expired() {
                self.expired.push(entity);
            }
        }
        for &entity in &self.expired {
            trace!(?entity, "time to live elapsed");
            let _ = store.destroy(entity);
        }
        Ok(())
    }
}

/// Counts down [`Lifetime`] and destroys entities that run out.
#[derive(Debug, Default)]
pub struct LifetimeProcessor {
    expired: Vec<Entity>,
}

impl Processor for LifetimeProcessor {
    fn name(&self) -> &'static str {
        "lifetime"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        let store = world.store_mut();
        self.expired.clear();
        for (entity, lifetime) in store.query_mut::<Lifetime>() {
            lifetime.remaining -= frame.delta_ms;
            if lifetime.expired() {
                self.expired.push(entity);
            }
        }
        for &entity in &self.expired {
            let _ = store.destroy(entity);
        }
        Ok(())
    }
}

/// Advances every [`FadeOut`]; expiry is left to the entity's countdown.
#[derive(Debug, Default)]
pub struct FadeOutProcessor;

impl Processor for FadeOutProcessor {
    fn name(&self) -> &'static str {
        "fade_out"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        for (_, fade) in world.store_mut().query_mut::<FadeOut>() {
            fade.elapsed = (fade.elapsed + frame.delta_ms).min(fade.duration);
        }
        Ok(())
    }
}

/// Destroys marked entities that no longer touch the playable area.
#[derive(Debug, Default)]
pub struct OutOfBoundsProcessor {
    outside: Vec<Entity>,
}

impl Processor for OutOfBoundsProcessor {
    fn name(&self) -> &'static str {
        "out_of_bounds"
    }

    fn process(&mut self, world: &mut World, _: &mut FrameContext<'_>) -> Result<(), SimError> {
        let bounds = world.bounds();
        let store = world.store_mut();
        self.outside.clear();
        self.outside.extend(
            store
                .query2::<RemoveOnOutOfBounds, BoundingBox>()
                .filter(|(_, _, bbox)| !bounds.overlaps(&bbox.rect))
                .map(|(entity, _, _)| entity),
        );
        for &entity in &self.outside {
            trace!(?entity, "left the map");
            let _ = store.destroy(entity);
        }
        Ok(())
    }
}

/// Steps frame animations and shows the current frame.
#[derive(Debug, Default)]
pub struct AnimationProcessor {
    scratch: Vec<Entity>,
}

impl Processor for AnimationProcessor {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        let store = world.store_mut();
        store.collect::<(Animated, Renderable)>(&mut self.scratch);

        for &entity in &self.scratch {
            let animated = store.get_mut::<Animated>(entity)?;
            animated.elapsed += frame.delta_ms;
            if animated.frame_expired() {
                animated.advance_frame();
            }
            let current = animated.current_frame();
            store.get_mut::<Renderable>(entity)?.set_source(current);
        }
        Ok(())
    }
}
