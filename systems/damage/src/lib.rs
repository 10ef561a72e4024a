#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision damage, on-hit effects and status effect ticking.

pub mod status;

pub use status::{DotProcessor, TimedStatusProcessor};

use tracing::{debug, trace};
use turret_defence_core::{
    components::{BoundingBox, CollisionBehavior, DamagesEnemy, DamagesEnemyEffect, Enemy},
    status::{Reapply, StatusEffect},
    Assets, Entity, Store, StoreError,
};
use turret_defence_world::{enemies::kill_enemy, FrameContext, Processor, SimError, World};

/// Resolves overlaps between damaging entities and enemies.
///
/// Sources are snapshotted before the pass, so entities created by on-hit
/// effects start damaging on the next tick. Each source hits the enemies
/// nearest its centre first.
#[derive(Debug, Default)]
pub struct DamageProcessor {
    sources: Vec<Entity>,
    enemies: Vec<Entity>,
    targets: Vec<(f32, Entity)>,
}

impl Processor for DamageProcessor {
    fn name(&self) -> &'static str {
        "damage"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        world
            .store()
            .collect::<(DamagesEnemy, BoundingBox)>(&mut self.sources);

        for &source in &self.sources {
            if !world.store().has::<DamagesEnemy>(source) {
                continue;
            }
            world
                .store()
                .collect::<(Enemy, BoundingBox)>(&mut self.enemies);
            resolve_source(
                world,
                source,
                &self.enemies,
                &mut self.targets,
                frame.assets,
            )?;
        }
        Ok(())
    }
}

fn resolve_source(
    world: &mut World,
    source: Entity,
    enemies: &[Entity],
    targets: &mut Vec<(f32, Entity)>,
    assets: &Assets,
) -> Result<(), SimError> {
    let store = world.store();
    let rect = store.get::<BoundingBox>(source)?.rect;
    targets.clear();
    for &enemy in enemies {
        let body = store.get::<BoundingBox>(enemy)?.rect;
        if rect.overlaps(&body) {
            targets.push((rect.center_distance(&body), enemy));
        }
    }
    targets.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut hits = 0_u32;
    for &(_, enemy) in targets.iter() {
        let store = world.store();
        if !store.is_alive(enemy) {
            continue;
        }
        let damages = store.get::<DamagesEnemy>(source)?;
        let spent = match damages.on_collision {
            CollisionBehavior::DeleteEntity => hits > 0 || damages.expired(),
            CollisionBehavior::RemoveComponent | CollisionBehavior::Pierce => damages.expired(),
            CollisionBehavior::DoNothing => false,
        };
        if spent {
            break;
        }
        let budgeted = damages.on_collision != CollisionBehavior::DoNothing;

        let store = world.store_mut();
        let damages = store.get_mut::<DamagesEnemy>(source)?;
        if budgeted {
            damages.pierced_count += 1;
        }
        let damage = damages.damage;
        let effects = damages.effects.clone();
        hits += 1;

        let body = store.get_mut::<Enemy>(enemy)?;
        body.take_damage(damage);
        trace!(?source, ?enemy, damage, health = body.health(), "hit");
        if body.is_dead() {
            kill_enemy(world, enemy)?;
            continue;
        }
        for effect in &effects {
            apply_effect(world.store_mut(), source, enemy, effect, assets)?;
        }
    }

    if hits > 0 {
        consume(world.store_mut(), source)?;
    }
    Ok(())
}

/// Applies one on-hit effect of `source` to the surviving `enemy`.
pub fn apply_effect(
    store: &mut Store,
    source: Entity,
    enemy: Entity,
    effect: &DamagesEnemyEffect,
    assets: &Assets,
) -> Result<(), StoreError> {
    match effect {
        DamagesEnemyEffect::AddsComponent { status, overwrite } => {
            apply_status(store, enemy, *status, *overwrite)
        }
        DamagesEnemyEffect::DynamicCreator(creator) => creator.create(store, source, enemy, assets),
    }
}

/// Attaches `status` to `enemy`.
///
/// Without `overwrite`, an active status of the same kind is extended
/// instead of replaced.
pub fn apply_status(
    store: &mut Store,
    enemy: Entity,
    status: StatusEffect,
    overwrite: bool,
) -> Result<(), StoreError> {
    match status {
        StatusEffect::Burning(status) => attach(store, enemy, status, overwrite),
        StatusEffect::Poisoned(status) => attach(store, enemy, status, overwrite),
        StatusEffect::Buffeted(status) => attach(store, enemy, status, overwrite),
        StatusEffect::Frozen(status) => attach(store, enemy, status, overwrite),
        StatusEffect::Shocked(status) => attach(store, enemy, status, overwrite),
    }
}

fn attach<T: Reapply + 'static>(
    store: &mut Store,
    enemy: Entity,
    status: T,
    overwrite: bool,
) -> Result<(), StoreError> {
    if !overwrite {
        if let Some(active) = store.try_get_mut::<T>(enemy) {
            active.reapply(&status);
            return Ok(());
        }
    }
    store.add(enemy, status)
}

fn consume(store: &mut Store, source: Entity) -> Result<(), StoreError> {
    let damages = store.get::<DamagesEnemy>(source)?;
    match damages.on_collision {
        CollisionBehavior::DeleteEntity => {
            let _ = store.destroy(source);
        }
        CollisionBehavior::RemoveComponent => {
            let _ = store.remove::<DamagesEnemy>(source);
        }
        CollisionBehavior::Pierce => {
            if damages.expired() {
                debug!(?source, pierced = damages.pierced_count, "pierces exhausted");
                let _ = store.destroy(source);
            }
        }
        CollisionBehavior::DoNothing => {}
    }
    Ok(())
}
