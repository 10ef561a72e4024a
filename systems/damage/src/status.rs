//! Ticking of status effects carried by enemies.

use std::marker::PhantomData;

use tracing::trace;
use turret_defence_core::{
    components::{AdjustmentKey, AdjustmentKind, Enemy, Velocity, VelocityAdjustment},
    status::{Buffet, DamageOverTime, Freeze, StatusKind, StatusMarker, TimedStatus},
    Entity,
};
use turret_defence_world::{enemies::kill_enemy, FrameContext, Processor, SimError, World};

/// Speed factor applied to buffeted enemies.
pub const BUFFETED_SLOWDOWN: f32 = 0.5;

const fn processor_name(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Burning => "burning",
        StatusKind::Poisoned => "poisoned",
        StatusKind::Buffeted => "buffeted",
        StatusKind::Frozen => "frozen",
        StatusKind::Shocked => "shocked",
    }
}

/// Applies periodic damage from one damage-over-time effect.
///
/// At most one damage tick lands per simulation tick. The component is
/// removed once its duration has elapsed.
#[derive(Debug)]
pub struct DotProcessor<K> {
    scratch: Vec<Entity>,
    slowdown: Option<(AdjustmentKey, f32)>,
    kind: PhantomData<K>,
}

impl<K> Default for DotProcessor<K> {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            slowdown: None,
            kind: PhantomData,
        }
    }
}

impl DotProcessor<Buffet> {
    /// Buffeted processor that also keeps its targets slowed while the
    /// effect lasts.
    #[must_use]
    pub fn buffeting() -> Self {
        Self {
            slowdown: Some((AdjustmentKey::Buffeted, BUFFETED_SLOWDOWN)),
            ..Self::default()
        }
    }
}

impl<K: StatusMarker> Processor for DotProcessor<K> {
    fn name(&self) -> &'static str {
        processor_name(K::KIND)
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        world
            .store()
            .collect::<(DamageOverTime<K>, Enemy)>(&mut self.scratch);

        for &enemy in &self.scratch {
            let store = world.store_mut();
            if !store.is_alive(enemy) {
                continue;
            }
            let status = store.get_mut::<DamageOverTime<K>>(enemy)?;
            status.elapsed += frame.delta_ms;
            let mut damage = None;
            if status.tick_due() {
                status.ticks += 1;
                damage = Some(status.damage);
            }
            let (expired, remaining) = (status.expired(), status.remaining());

            if let Some((key, factor)) = self.slowdown.filter(|_| !expired) {
                if let Some(velocity) = store.try_get_mut::<Velocity>(enemy) {
                    velocity.adjust(
                        key,
                        VelocityAdjustment::new(AdjustmentKind::Slowdown { factor }, remaining),
                    );
                }
            }

            if let Some(damage) = damage {
                let body = store.get_mut::<Enemy>(enemy)?;
                body.take_damage(damage);
                trace!(?enemy, damage, kind = ?K::KIND, "status damage");
                if body.is_dead() {
                    kill_enemy(world, enemy)?;
                    continue;
                }
            }
            if expired {
                let _ = world.store_mut().remove::<DamageOverTime<K>>(enemy);
            }
        }
        Ok(())
    }
}

/// Ages a timed status flag and removes it once expired.
#[derive(Debug)]
pub struct TimedStatusProcessor<K> {
    scratch: Vec<Entity>,
    immobilises: Option<AdjustmentKey>,
    kind: PhantomData<K>,
}

impl<K> Default for TimedStatusProcessor<K> {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            immobilises: None,
            kind: PhantomData,
        }
    }
}

impl TimedStatusProcessor<Freeze> {
    /// Frozen processor that holds its targets in place while the flag
    /// lasts.
    #[must_use]
    pub fn freezing() -> Self {
        Self {
            immobilises: Some(AdjustmentKey::Frozen),
            ..Self::default()
        }
    }
}

impl<K: StatusMarker> Processor for TimedStatusProcessor<K> {
    fn name(&self) -> &'static str {
        processor_name(K::KIND)
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        let store = world.store_mut();
        store.collect::<(TimedStatus<K>,)>(&mut self.scratch);

        for &entity in &self.scratch {
            let status = store.get_mut::<TimedStatus<K>>(entity)?;
            status.elapsed += frame.delta_ms;
            if status.expired() {
                let _ = store.remove::<TimedStatus<K>>(entity);
                continue;
            }
            let remaining = status.remaining();
            if let Some(key) = self.immobilises {
                if let Some(velocity) = store.try_get_mut::<Velocity>(entity) {
                    velocity.adjust(
                        key,
                        VelocityAdjustment::new(AdjustmentKind::Immobile, remaining),
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use turret_defence_core::{
        status::{Buffeted, Burn, Burning, Frozen, Shock, Shocked},
        Assets, Rect, StatsTable, Vec2, PLAYER_STARTING_MONEY,
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
            .expect("status pass succeeds");
    }

    fn walker(world: &mut World, health: u32) -> Entity {
        world
            .store_mut()
            .create()
            .with(Enemy::new(4, health))
            .with(Velocity::new(Vec2::new(0.1, 0.0)))
            .build()
    }

    fn world() -> World {
        World::new(Rect::new(0.0, 0.0, 100.0, 100.0), 0)
    }

    #[test]
    fn burning_ticks_on_cadence_then_expires() {
        let mut world = world();
        let enemy = walker(&mut world, 100);
        world
            .store_mut()
            .add(enemy, Burning::new(5, 250.0, 1_000.0))
            .expect("enemy alive");
        let mut processor = DotProcessor::<Burn>::default();

        let mut health = Vec::new();
        for _ in 0..8 {
            tick(&mut processor, &mut world, 125.0);
            health.push(world.store().get::<Enemy>(enemy).expect("alive").health());
        }

        assert_eq!(health, vec![100, 95, 95, 90, 90, 85, 85, 80]);
        assert!(!world.store().has::<Burning>(enemy));
    }

    #[test]
    fn status_damage_can_kill() {
        let mut world = world();
        let enemy = walker(&mut world, 3);
        world
            .store_mut()
            .add(enemy, Burning::new(5, 100.0, 1_000.0))
            .expect("enemy alive");

        tick(
            &mut DotProcessor::<Burn>::default(),
            &mut world,
            100.0,
        );

        assert!(!world.store().is_alive(enemy));
        assert_eq!(world.money(), Ok(PLAYER_STARTING_MONEY + 4));
    }

    #[test]
    fn buffeted_keeps_refreshing_its_slowdown() {
        let mut world = world();
        let enemy = walker(&mut world, 100);
        world
            .store_mut()
            .add(enemy, Buffeted::new(0, 500.0, 300.0))
            .expect("enemy alive");
        let mut processor = DotProcessor::buffeting();

        tick(&mut processor, &mut world, 100.0);

        let velocity = world.store().get::<Velocity>(enemy).expect("velocity");
        let adjustment = velocity.adjustments[&AdjustmentKey::Buffeted];
        assert_eq!(
            adjustment.kind,
            AdjustmentKind::Slowdown {
                factor: BUFFETED_SLOWDOWN
            }
        );
        assert_eq!(adjustment.duration, 200.0);
        assert!((velocity.effective() - Vec2::new(0.05, 0.0)).length() < 1e-6);
    }

    #[test]
    fn frozen_holds_the_enemy_until_it_thaws() {
        let mut world = world();
        let enemy = walker(&mut world, 100);
        world
            .store_mut()
            .add(enemy, Frozen::new(200.0))
            .expect("enemy alive");
        let mut processor = TimedStatusProcessor::freezing();

        tick(&mut processor, &mut world, 100.0);
        let velocity = world.store().get::<Velocity>(enemy).expect("velocity");
        assert_eq!(velocity.effective(), Vec2::ZERO);
        assert_eq!(velocity.adjustments[&AdjustmentKey::Frozen].duration, 100.0);

        tick(&mut processor, &mut world, 100.0);
        assert!(!world.store().has::<Frozen>(enemy));
    }

    #[test]
    fn shocked_is_a_plain_timer() {
        let mut world = world();
        let enemy = walker(&mut world, 100);
        world
            .store_mut()
            .add(enemy, Shocked::new(500.0))
            .expect("enemy alive");
        let mut processor = TimedStatusProcessor::<Shock>::default();

        tick(&mut processor, &mut world, 250.0);
        assert!(world.store().has::<Shocked>(enemy));
        assert!(world
            .store()
            .get::<Velocity>(enemy)
            .expect("velocity")
            .adjustments
            .is_empty());

        tick(&mut processor, &mut world, 250.0);
        assert!(!world.store().has::<Shocked>(enemy));
    }
}
