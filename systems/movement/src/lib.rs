#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Velocity integration, waypoint following and sprite rotation.

use tracing::trace;
use turret_defence_core::{
    components::{BoundingBox, Renderable, UnitPathing, Velocity},
    geometry::facing_degrees,
    Entity,
};
use turret_defence_world::{FrameContext, Processor, SimError, World};

/// Moves every entity by its effective velocity.
///
/// Adjustments age every tick, whether or not the entity moved.
#[derive(Debug, Default)]
pub struct VelocityProcessor {
    scratch: Vec<Entity>,
}

impl Processor for VelocityProcessor {
    fn name(&self) -> &'static str {
        "velocity"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        let store = world.store_mut();
        store.collect::<(Velocity, BoundingBox)>(&mut self.scratch);

        for &entity in &self.scratch {
            let velocity = store.get_mut::<Velocity>(entity)?;
            let step = velocity.effective() * frame.delta_ms;
            velocity.tick_adjustments(frame.delta_ms);
            store.get_mut::<BoundingBox>(entity)?.rect.translate(step);
        }
        Ok(())
    }
}

/// Steers walkers toward their current waypoint.
///
/// Reaching a waypoint targets the next one; the final waypoint is kept,
/// leaving removal to the exit zone.
#[derive(Debug, Default)]
pub struct PathingProcessor {
    scratch: Vec<Entity>,
}

impl Processor for PathingProcessor {
    fn name(&self) -> &'static str {
        "pathing"
    }

    fn process(&mut self, world: &mut World, _: &mut FrameContext<'_>) -> Result<(), SimError> {
        let store = world.store_mut();
        store.collect::<(UnitPathing, BoundingBox, Velocity)>(&mut self.scratch);

        for &entity in &self.scratch {
            let rect = store.get::<BoundingBox>(entity)?.rect;
            let pathing = store.get_mut::<UnitPathing>(entity)?;
            let Some(mut target) = pathing.current_target() else {
                continue;
            };
            if rect.contains_point(target) {
                pathing.advance();
                trace!(?entity, index = pathing.index, "waypoint reached");
                target = pathing.current_target().unwrap_or(target);
            }

            let Some(heading) = (target - rect.center()).try_normalize() else {
                continue;
            };
            let velocity = store.get_mut::<Velocity>(entity)?;
            velocity.base = heading * velocity.base.length();
            store.get_mut::<BoundingBox>(entity)?.facing = heading;
        }
        Ok(())
    }
}

/// Re-derives each sprite from its facing and recentres the box on it.
#[derive(Debug, Default)]
pub struct RotationSyncProcessor {
    scratch: Vec<Entity>,
}

impl Processor for RotationSyncProcessor {
    fn name(&self) -> &'static str {
        "rotation_sync"
    }

    fn process(&mut self, world: &mut World, _: &mut FrameContext<'_>) -> Result<(), SimError> {
        let store = world.store_mut();
        store.collect::<(Renderable, BoundingBox)>(&mut self.scratch);

        for &entity in &self.scratch {
            let bbox = *store.get::<BoundingBox>(entity)?;
            let renderable = store.get_mut::<Renderable>(entity)?;
            renderable.rotate_to(facing_degrees(bbox.facing));
            let size = renderable.image.size;
            store.get_mut::<BoundingBox>(entity)?.rect = bbox.rect.resized_about_center(size);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use turret_defence_core::{
        components::{AdjustmentKey, AdjustmentKind, RenderOrder, VelocityAdjustment},
        Assets, Rect, Sprite, StatsTable, Vec2,
    };
    use turret_defence_world::UiSync;

    use super::*;

    fn tick(processor: &mut impl Processor, world: &mut World, delta_ms: f32) {
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let mut ui = UiSync::default();
        let mut frame = FrameContext::new(delta_ms, &[], &assets, &stats, &mut ui);
        processor
            .process(world, &mut frame)
            .expect("processor succeeds");
    }

    fn walker(world: &mut World, center: Vec2, base: Vec2) -> Entity {
        world
            .store_mut()
            .create()
            .with(BoundingBox::new(Rect::from_center(center, Vec2::splat(10.0))))
            .with(Velocity::new(base))
            .build()
    }

    fn center(world: &World, entity: Entity) -> Vec2 {
        world
            .store()
            .get::<BoundingBox>(entity)
            .expect("bounding box")
            .rect
            .center()
    }

    #[test]
    fn slowdown_scales_speed_until_it_expires() {
        let mut world = World::new(Rect::new(0.0, 0.0, 1_000.0, 1_000.0), 0);
        let entity = walker(&mut world, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0));
        let velocity = world
            .store_mut()
            .get_mut::<Velocity>(entity)
            .expect("velocity");
        velocity.adjust(
            AdjustmentKey::Buffeted,
            VelocityAdjustment::new(AdjustmentKind::Slowdown { factor: 0.5 }, 10.0),
        );

        let mut processor = VelocityProcessor::default();
        tick(&mut processor, &mut world, 10.0);
        assert_eq!(center(&world, entity), Vec2::new(105.0, 100.0));

        tick(&mut processor, &mut world, 10.0);
        assert_eq!(center(&world, entity), Vec2::new(115.0, 100.0));
    }

    #[test]
    fn immobile_entities_still_age_their_adjustments() {
        let mut world = World::new(Rect::new(0.0, 0.0, 1_000.0, 1_000.0), 0);
        let entity = walker(&mut world, Vec2::new(100.0, 100.0), Vec2::new(0.0, 2.0));
        world
            .store_mut()
            .get_mut::<Velocity>(entity)
            .expect("velocity")
            .adjust(
                AdjustmentKey::Frozen,
                VelocityAdjustment::new(AdjustmentKind::Immobile, 30.0),
            );

        let mut processor = VelocityProcessor::default();
        for _ in 0..3 {
            tick(&mut processor, &mut world, 10.0);
        }

        assert_eq!(center(&world, entity), Vec2::new(100.0, 100.0));
        assert!(world
            .store()
            .get::<Velocity>(entity)
            .expect("velocity")
            .adjustments
            .is_empty());
    }

    #[test]
    fn reaching_a_waypoint_turns_toward_the_next_one() {
        let mut world = World::new(Rect::new(0.0, 0.0, 1_000.0, 1_000.0), 0);
        let entity = walker(&mut world, Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0));
        world
            .store_mut()
            .add(
                entity,
                UnitPathing::new(vec![Vec2::new(102.0, 100.0), Vec2::new(102.0, 400.0)]),
            )
            .expect("entity alive");

        let mut processor = PathingProcessor::default();
        tick(&mut processor, &mut world, 16.0);

        let store = world.store();
        assert_eq!(store.get::<UnitPathing>(entity).map(|p| p.index), Ok(1));
        let velocity = store.get::<Velocity>(entity).expect("velocity");
        assert!((velocity.base.length() - 0.5).abs() < 1e-6, "speed preserved");
        assert!(velocity.base.y > 0.49, "heading south, got {:?}", velocity.base);
        let facing = store.get::<BoundingBox>(entity).expect("bbox").facing;
        assert!((facing - Vec2::Y).length() < 0.01);
    }

    #[test]
    fn final_waypoint_is_never_passed() {
        let mut world = World::new(Rect::new(0.0, 0.0, 1_000.0, 1_000.0), 0);
        let entity = walker(&mut world, Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0));
        world
            .store_mut()
            .add(entity, UnitPathing::new(vec![Vec2::new(100.0, 100.0)]))
            .expect("entity alive");

        let mut processor = PathingProcessor::default();
        for _ in 0..3 {
            tick(&mut processor, &mut world, 16.0);
        }

        assert_eq!(world.store().get::<UnitPathing>(entity).map(|p| p.index), Ok(0));
    }

    #[test]
    fn rotation_keeps_the_centre() {
        let mut world = World::new(Rect::new(0.0, 0.0, 1_000.0, 1_000.0), 0);
        let sprite = Sprite::new(Assets::placeholder().rocket_missile.image, Vec2::new(40.0, 10.0));
        let entity = world
            .store_mut()
            .create()
            .with(BoundingBox::facing(
                Rect::from_center(Vec2::new(200.0, 200.0), sprite.size),
                Vec2::Y,
            ))
            .with(Renderable::new(sprite, RenderOrder::Objects))
            .build();

        let mut processor = RotationSyncProcessor::default();
        tick(&mut processor, &mut world, 16.0);

        let store = world.store();
        let renderable = store.get::<Renderable>(entity).expect("renderable");
        assert!((renderable.rotation - 90.0).abs() < 1e-4);
        assert!((renderable.image.size - Vec2::new(10.0, 40.0)).length() < 1e-3);
        let rect = store.get::<BoundingBox>(entity).expect("bbox").rect;
        assert!((rect.center() - Vec2::new(200.0, 200.0)).length() < 1e-3);
        assert!((rect.size() - Vec2::new(10.0, 40.0)).length() < 1e-3);
    }
}
