#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turret targeting and the firing cycle.
//!
//! Each turret runs `Idle → Tracking → Firing → FiringAnimation →
//! (Reloading) → Tracking`, dropping back to `Idle` whenever no enemy is in
//! range. Firing dispatches to the kind-specific effect factories.

use tracing::trace;
use turret_defence_core::{
    components::{BoundingBox, Renderable, TurretMachine, TurretState},
    geometry::rotate_degrees,
    spatial::find_nearest,
    Assets, Entity, Sprite, TurretKind,
};
use turret_defence_world::{effects::fire_turret, FrameContext, Processor, SimError, World};

/// Drives every turret state machine once per tick.
#[derive(Debug, Default)]
pub struct TurretProcessor {
    scratch: Vec<Entity>,
}

impl Processor for TurretProcessor {
    fn name(&self) -> &'static str {
        "turrets"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        world
            .store()
            .collect::<(TurretMachine, BoundingBox)>(&mut self.scratch);

        for &turret in &self.scratch {
            if !world.store().is_alive(turret) {
                continue;
            }
            step_turret(world, turret, frame.delta_ms, frame.assets)?;
        }
        Ok(())
    }
}

fn step_turret(
    world: &mut World,
    turret: Entity,
    delta_ms: f32,
    assets: &Assets,
) -> Result<(), SimError> {
    let store = world.store();
    let rect = store.get::<BoundingBox>(turret)?.rect;
    let range = store.get::<TurretMachine>(turret)?.range();
    let target = find_nearest(store, &rect, range);
    let aim = match target {
        Some(enemy) => Some(store.get::<BoundingBox>(enemy)?.rect.center() - rect.center()),
        None => None,
    };

    let machine = world.store_mut().get_mut::<TurretMachine>(turret)?;
    machine.elapsed += delta_ms;
    let from = machine.state;
    let mut fire_at = None;
    let mut spin = None;

    match (machine.state, target) {
        (TurretState::Idle, Some(_)) => machine.state = TurretState::Tracking,
        (TurretState::Idle, None) => {
            if machine.rotates {
                spin = Some(machine.idle_rotation_speed * delta_ms);
            }
        }
        (TurretState::Tracking | TurretState::Firing, None) => {
            machine.state = TurretState::Idle;
        }
        (TurretState::Tracking, Some(_)) => {
            if machine.can_fire() {
                machine.state = TurretState::Firing;
            }
        }
        (TurretState::Firing, Some(enemy)) => {
            machine.elapsed = 0.0;
            machine.state = TurretState::FiringAnimation;
            fire_at = Some(enemy);
        }
        (TurretState::FiringAnimation, _) => {
            if machine.finished_firing_animation() {
                machine.state = if machine.reloading_duration > 0.0 {
                    TurretState::Reloading
                } else {
                    TurretState::Tracking
                };
            }
        }
        (TurretState::Reloading, _) => {
            if machine.finished_reloading() {
                machine.state = TurretState::Tracking;
            }
        }
    }

    let machine = world.store().get::<TurretMachine>(turret)?;
    let (kind, to, rotates) = (machine.kind, machine.state, machine.rotates);
    if from != to {
        trace!(?turret, ?from, ?to, "turret state");
    }

    let bbox = world.store_mut().get_mut::<BoundingBox>(turret)?;
    if let Some(degrees) = spin {
        bbox.facing = rotate_degrees(bbox.facing, degrees);
    }
    if rotates && matches!(from, TurretState::Tracking | TurretState::Firing) {
        if let Some(aim) = aim.and_then(|aim| aim.try_normalize()) {
            bbox.facing = aim;
        }
    }

    if let Some(enemy) = fire_at {
        fire_turret(world, turret, enemy, assets)?;
    }

    sync_firing_sprite(world, turret, kind, to, assets)
}

fn sync_firing_sprite(
    world: &mut World,
    turret: Entity,
    kind: TurretKind,
    state: TurretState,
    assets: &Assets,
) -> Result<(), SimError> {
    if kind != TurretKind::Bullet {
        return Ok(());
    }
    let wanted: Sprite = if state == TurretState::FiringAnimation {
        assets.bullet_turret_firing
    } else {
        assets.turret(kind)
    };
    if let Some(renderable) = world.store_mut().try_get_mut::<Renderable>(turret) {
        if renderable.source != wanted {
            renderable.set_source(wanted);
        }
    }
    Ok(())
}
