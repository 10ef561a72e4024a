//! Enemy creation and removal.

use tracing::info;
use turret_defence_core::{
    components::{
        BoundingBox, Despawnable, Enemy, PathGraph, PlayerResources, RenderOrder, Renderable,
        UnitPathing, Velocity,
    },
    Assets, EnemyKind, Entity, Rect, ScoreEventKind, StatsTable, Vec2,
};

use crate::{SimError, World};

/// Spawns an enemy of `kind` at `spawn_point`, scaled to `level`.
///
/// The enemy appears with its left edge on the spawn point, vertically
/// centred, already walking toward the first waypoint.
pub fn spawn_enemy(
    world: &mut World,
    spawn_point: Entity,
    kind: EnemyKind,
    level: u32,
    assets: &Assets,
    stats: &StatsTable,
) -> Result<Entity, SimError> {
    let sheet = stats.enemy(kind)?;
    let store = world.store_mut();
    let origin = store.get::<BoundingBox>(spawn_point)?.rect.origin();
    let vertices = store.get::<PathGraph>(spawn_point)?.vertices.clone();

    let sprite = assets.enemy(kind);
    let rect = Rect::new(
        origin.x,
        origin.y - sprite.size.y / 2.0,
        sprite.size.x,
        sprite.size.y,
    );
    let heading = vertices
        .first()
        .and_then(|target| (*target - rect.center()).try_normalize())
        .unwrap_or(Vec2::X);

    let enemy = store
        .create()
        .with(Enemy::new(sheet.bounty(level), sheet.max_health(level)))
        .with(Velocity::new(heading * sheet.speed))
        .with(BoundingBox::facing(rect, heading))
        .with(Renderable::new(sprite, RenderOrder::Objects))
        .with(Despawnable)
        .with(UnitPathing::new(vertices))
        .build();
    Ok(enemy)
}

/// Removes a dead enemy, paying its bounty and counting the kill.
pub fn kill_enemy(world: &mut World, enemy: Entity) -> Result<(), SimError> {
    let bounty = world.store().get::<Enemy>(enemy)?.bounty();
    let _ = world.store_mut().destroy(enemy);
    world.player_component_mut::<PlayerResources>()?.money += bounty;
    world.track_score_event(ScoreEventKind::EnemyKill)?;
    info!(?enemy, bounty, "enemy killed");
    Ok(())
}
