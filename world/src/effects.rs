//! Projectiles and area effects created when turrets fire.
//!
//! Each turret kind builds its own entity tree. Follow-ups that only exist
//! once a hit lands (explosions, chain lightning) are attached as
//! [`DynamicEffectCreator`] callbacks and run by damage resolution.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;
use turret_defence_core::{
    components::{
        Animated, BoundingBox, CollisionBehavior, DamagesEnemy, DamagesEnemyEffect,
        DynamicEffectCreator, FadeOut, FrostMissile, RemoveOnOutOfBounds, RenderOrder, Renderable,
        RocketMissile, TimeToLive, TurretMachine, Velocity, PIERCE_ALL,
    },
    geometry::rotate_degrees,
    spatial::find_all_in_range,
    status::{Buffeted, Burning, Frozen, Poisoned, Shocked, StatusEffect},
    assets::Frames,
    Assets, Entity, Rect, Store, StoreError, TurretKind, Vec2,
};

use crate::{SimError, World};

const BULLET_SIZE: f32 = 12.0;
const BULLET_TIME_TO_LIVE: f32 = 50.0;

const FLAME_SPEED: f32 = 0.20;
const FLAME_CONE_HALF_ANGLE: f32 = 30.0;
const FLAME_SPAWN_OFFSET: f32 = 40.0;
const FLAME_PIERCES: u32 = 9999;

const FROST_SPEED: f32 = 0.5;
const FROST_SPAWN_OFFSET: f32 = 64.0;
const FROST_IMPACT_DAMAGE: u32 = 1;
const FROST_FREEZE_DURATION: f32 = 1_000.0;
const FROST_FRAME_STEP: f32 = 50.0;
const FROST_EXPLOSION_TIME_TO_LIVE: f32 = 800.0;

const ROCKET_SPEED: f32 = 0.95;
const ROCKET_EXPLOSION_TIME_TO_LIVE: f32 = 250.0;

const LIGHTNING_FRAME_STEP: f32 = 100.0;
const LIGHTNING_TIME_TO_LIVE: f32 = 1_600.0;
const LIGHTNING_SHOCK_DURATION: f32 = 500.0;
const CHAIN_LIGHTNING_RANGE: f32 = 250.0;

const POISON_FRAME_STEP: f32 = 100.0;
const POISON_TIME_TO_LIVE: f32 = 1_600.0;
const POISON_PIERCES: u32 = 9999;

const TORNADO_SPEED: f32 = 0.025;
const TORNADO_FRAME_STEP: f32 = 400.0;
const TORNADO_TIME_TO_LIVE: f32 = 4_000.0;
const TORNADO_PIERCES: u32 = 9999;

/// Turret values captured at the moment of firing.
#[derive(Clone, Copy, Debug)]
struct Shot {
    kind: TurretKind,
    origin: Vec2,
    target: Vec2,
    damage: u32,
    range: f32,
    dot_tick_rate: f32,
    dot_duration: f32,
}

impl Shot {
    fn aim(&self) -> Vec2 {
        (self.target - self.origin).try_normalize().unwrap_or(Vec2::X)
    }
}

/// Creates the projectile or effect the turret releases at `target`.
pub fn fire_turret(
    world: &mut World,
    turret: Entity,
    target: Entity,
    assets: &Assets,
) -> Result<(), SimError> {
    let store = world.store();
    let machine = store.get::<TurretMachine>(turret)?;
    let shot = Shot {
        kind: machine.kind,
        origin: store.get::<BoundingBox>(turret)?.rect.center(),
        target: store.get::<BoundingBox>(target)?.rect.center(),
        damage: machine.damage(),
        range: machine.range(),
        dot_tick_rate: machine.dot_tick_rate(),
        dot_duration: machine.dot_duration(),
    };

    let effect = match shot.kind {
        TurretKind::Bullet => create_bullet(world.store_mut(), &shot),
        TurretKind::Flame => {
            let spread = world
                .rng()
                .gen_range(-FLAME_CONE_HALF_ANGLE..=FLAME_CONE_HALF_ANGLE);
            create_flame(world.store_mut(), &shot, spread, assets)
        }
        TurretKind::Frost => create_frost(world.store_mut(), &shot, assets),
        TurretKind::Rocket => create_missile(world.store_mut(), &shot, assets),
        TurretKind::Lightning => create_lightning_strike(world.store_mut(), &shot, assets),
        TurretKind::Poison => create_poison_zone(world.store_mut(), &shot, assets),
        TurretKind::Tornado => {
            let heading = world.rng().gen_range(-180.0..=180.0);
            create_tornado(world.store_mut(), &shot, heading, assets)
        }
    };
    debug!(?turret, ?target, ?effect, kind = ?shot.kind, "turret fired");
    Ok(())
}

fn create_bullet(store: &mut Store, shot: &Shot) -> Entity {
    store
        .create()
        .with(BoundingBox::new(Rect::from_center(
            shot.target,
            Vec2::splat(BULLET_SIZE),
        )))
        .with(DamagesEnemy::new(shot.damage))
        .with(TimeToLive::new(BULLET_TIME_TO_LIVE))
        .build()
}

fn create_flame(store: &mut Store, shot: &Shot, spread: f32, assets: &Assets) -> Entity {
    let heading = rotate_degrees(shot.aim(), spread);
    let velocity = heading * FLAME_SPEED;
    let sprite = assets.flame_particle;
    let center = shot.origin + heading * FLAME_SPAWN_OFFSET;
    let burning = Burning::new(shot.damage, shot.dot_tick_rate, shot.dot_duration);

    store
        .create()
        .with(BoundingBox::facing(
            Rect::from_center(center, sprite.size),
            heading,
        ))
        .with(Renderable::new(sprite, RenderOrder::Objects))
        .with(Velocity::new(velocity))
        .with(RemoveOnOutOfBounds)
        .with(TimeToLive::new(shot.range / FLAME_SPEED))
        .with(
            DamagesEnemy::new(0)
                .on_collision(CollisionBehavior::Pierce)
                .pierces(FLAME_PIERCES)
                .effect(DamagesEnemyEffect::extends(StatusEffect::Burning(burning))),
        )
        .build()
}

fn create_frost(store: &mut Store, shot: &Shot, assets: &Assets) -> Entity {
    let heading = shot.aim();
    let animated = Animated::new(assets.frost_missile_frames.clone(), FROST_FRAME_STEP);
    let frame = animated.current_frame();
    let center = shot.origin + heading * FROST_SPAWN_OFFSET;

    store
        .create()
        .with(BoundingBox::new(Rect::from_center(center, frame.size)))
        .with(Renderable::new(frame, RenderOrder::Objects))
        .with(animated)
        .with(Velocity::new(heading * FROST_SPEED))
        .with(RemoveOnOutOfBounds)
        .with(FrostMissile {
            damage: shot.damage,
        })
        .with(
            DamagesEnemy::new(FROST_IMPACT_DAMAGE)
                .effect(DamagesEnemyEffect::extends(StatusEffect::Frozen(
                    Frozen::new(FROST_FREEZE_DURATION),
                )))
                .effect(DamagesEnemyEffect::DynamicCreator(
                    DynamicEffectCreator::new(create_frost_explosion),
                )),
        )
        .build()
}

fn create_frost_explosion(
    store: &mut Store,
    source: Entity,
    _target: Entity,
    assets: &Assets,
) -> Result<(), StoreError> {
    let damage = store.get::<FrostMissile>(source)?.damage;
    let center = store.get::<BoundingBox>(source)?.rect.center();
    let animated = Animated::new(
        assets.frost_missile_explosion_frames.clone(),
        FROST_FRAME_STEP,
    );
    let frame = animated.current_frame();

    let _ = store
        .create()
        .with(BoundingBox::new(Rect::from_center(center, frame.size)))
        .with(Renderable::new(frame, RenderOrder::Objects))
        .with(animated)
        .with(TimeToLive::new(FROST_EXPLOSION_TIME_TO_LIVE))
        .with(
            DamagesEnemy::new(damage)
                .on_collision(CollisionBehavior::RemoveComponent)
                .pierces(PIERCE_ALL),
        )
        .build();
    Ok(())
}

fn create_missile(store: &mut Store, shot: &Shot, assets: &Assets) -> Entity {
    let heading = shot.aim();
    let sprite = assets.rocket_missile;

    store
        .create()
        .with(BoundingBox::facing(
            Rect::from_center(shot.origin, sprite.size),
            heading,
        ))
        .with(Renderable::new(sprite, RenderOrder::Objects))
        .with(Velocity::new(heading * ROCKET_SPEED))
        .with(RocketMissile {
            damage: shot.damage,
        })
        .with(RemoveOnOutOfBounds)
        .with(
            DamagesEnemy::new(0).effect(DamagesEnemyEffect::DynamicCreator(
                DynamicEffectCreator::new(create_rocket_explosion),
            )),
        )
        .build()
}

fn create_rocket_explosion(
    store: &mut Store,
    source: Entity,
    _target: Entity,
    assets: &Assets,
) -> Result<(), StoreError> {
    let damage = store.get::<RocketMissile>(source)?.damage;
    let center = store.get::<BoundingBox>(source)?.rect.center();
    let sprite = assets.rocket_missile_explosion;

    let _ = store
        .create()
        .with(BoundingBox::new(Rect::from_center(center, sprite.size)))
        .with(Renderable::new(sprite, RenderOrder::Objects))
        .with(TimeToLive::new(ROCKET_EXPLOSION_TIME_TO_LIVE))
        .with(FadeOut::new(ROCKET_EXPLOSION_TIME_TO_LIVE))
        .with(
            DamagesEnemy::new(damage)
                .on_collision(CollisionBehavior::RemoveComponent)
                .pierces(PIERCE_ALL),
        )
        .build();
    Ok(())
}

fn create_lightning_strike(store: &mut Store, shot: &Shot, assets: &Assets) -> Entity {
    let strike = lightning(shot.damage, chain_lightning(shot.damage / 2));
    spawn_lightning(
        store,
        shot.target,
        assets.lightning_strike_frames.clone(),
        strike,
    )
}

/// Damage of a strike that shocks its target and then jumps on.
fn lightning(damage: u32, jump: DynamicEffectCreator) -> DamagesEnemy {
    DamagesEnemy::new(damage)
        .on_collision(CollisionBehavior::RemoveComponent)
        .effect(DamagesEnemyEffect::adds(StatusEffect::Shocked(
            Shocked::new(LIGHTNING_SHOCK_DURATION),
        )))
        .effect(DamagesEnemyEffect::DynamicCreator(jump))
}

fn spawn_lightning(
    store: &mut Store,
    center: Vec2,
    frames: Frames,
    damages: DamagesEnemy,
) -> Entity {
    let animated = Animated::new(frames, LIGHTNING_FRAME_STEP);
    let frame = animated.current_frame();
    store
        .create()
        .with(BoundingBox::new(Rect::from_center(center, frame.size)))
        .with(Renderable::new(frame, RenderOrder::Objects))
        .with(animated)
        .with(TimeToLive::new(LIGHTNING_TIME_TO_LIVE))
        .with(damages)
        .build()
}

/// Jumps from the struck enemy to every enemy in range that is not
/// already shocked.
fn chain_lightning(damage: u32) -> DynamicEffectCreator {
    DynamicEffectCreator::new(move |store, _source, target, assets| {
        let origin = store.get::<BoundingBox>(target)?.rect;
        let shocked: BTreeSet<Entity> =
            store.query::<Shocked>().map(|(entity, _)| entity).collect();
        let jumps = find_all_in_range(store, &origin, CHAIN_LIGHTNING_RANGE, &shocked);

        for enemy in jumps {
            let center = store.get::<BoundingBox>(enemy)?.rect.center();
            let strike = lightning(damage, chain_lightning(damage));
            let _ = spawn_lightning(store, center, assets.chain_lightning_frames.clone(), strike);
        }
        Ok(())
    })
}

fn create_poison_zone(store: &mut Store, shot: &Shot, assets: &Assets) -> Entity {
    let animated = Animated::new(assets.poison_strike_frames.clone(), POISON_FRAME_STEP);
    let frame = animated.current_frame();
    let poisoned = Poisoned::new(shot.damage, shot.dot_tick_rate, shot.dot_duration);

    store
        .create()
        .with(BoundingBox::new(Rect::from_center(shot.target, frame.size)))
        .with(Renderable::new(frame, RenderOrder::Objects))
        .with(animated)
        .with(TimeToLive::new(POISON_TIME_TO_LIVE))
        .with(
            DamagesEnemy::new(0)
                .on_collision(CollisionBehavior::Pierce)
                .pierces(POISON_PIERCES)
                .effect(DamagesEnemyEffect::extends(StatusEffect::Poisoned(poisoned))),
        )
        .build()
}

fn create_tornado(store: &mut Store, shot: &Shot, heading: f32, assets: &Assets) -> Entity {
    let animated = Animated::new(assets.tornado_strike_frames.clone(), TORNADO_FRAME_STEP);
    let frame = animated.current_frame();
    let velocity = rotate_degrees(Vec2::new(TORNADO_SPEED, 0.0), heading);
    let buffeted = Buffeted::new(shot.damage, shot.dot_tick_rate, shot.dot_duration);

    store
        .create()
        .with(BoundingBox::new(Rect::from_center(shot.target, frame.size)))
        .with(Renderable::new(frame, RenderOrder::Objects))
        .with(animated)
        .with(Velocity::new(velocity))
        .with(TimeToLive::new(TORNADO_TIME_TO_LIVE))
        .with(
            DamagesEnemy::new(0)
                .on_collision(CollisionBehavior::Pierce)
                .pierces(TORNADO_PIERCES)
                .effect(DamagesEnemyEffect::extends(StatusEffect::Buffeted(buffeted))),
        )
        .build()
}
