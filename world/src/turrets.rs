//! Turret and build zone construction.
//!
//! These factories perform no economic checks; see [`crate::economy`] for
//! the guarded player-facing operations.

use turret_defence_core::{
    components::{
        BoundingBox, ExtraKind, ExtraOrder, ExtraRenderable, RenderOrder, Renderable,
        TurretBuildZone, TurretMachine,
    },
    Assets, Entity, Rect, Sprite, StatsTable, Store, StoreError, TurretKind, Vec2,
};

use crate::SimError;

/// Margin added around the range circle of the range ring overlay.
const RANGE_RING_MARGIN: f32 = 20.0;

/// Places a build zone centred on `center`.
pub fn create_build_zone(store: &mut Store, center: Vec2, assets: &Assets) -> Entity {
    let sprite = assets.turret_build_zone;
    store
        .create()
        .with(Renderable::new(sprite, RenderOrder::Environment))
        .with(BoundingBox::new(Rect::from_center(center, sprite.size)))
        .with(TurretBuildZone)
        .build()
}

/// Replaces the build zone with an idle turret of `kind`.
pub fn build_turret(
    store: &mut Store,
    build_zone: Entity,
    kind: TurretKind,
    assets: &Assets,
    stats: &StatsTable,
) -> Result<Entity, SimError> {
    let sheet = stats.turret(kind)?;
    let center = store.get::<BoundingBox>(build_zone)?.rect.center();
    let sprite = assets.turret(kind);

    let _ = store.destroy(build_zone);

    let turret = store
        .create()
        .with(TurretMachine::new(
            kind,
            sheet.base.clone(),
            sheet.per_level.clone(),
        ))
        .with(BoundingBox::new(Rect::from_center(center, sprite.size)))
        .with(Renderable::new(sprite, RenderOrder::Objects))
        .build();
    Ok(turret)
}

/// Destroys the turret and restores a build zone in its place.
///
/// Returns the new build zone.
pub fn demolish_turret(
    store: &mut Store,
    turret: Entity,
    assets: &Assets,
) -> Result<Entity, StoreError> {
    let center = store.get::<BoundingBox>(turret)?.rect.center();
    let _ = store.destroy(turret);
    Ok(create_build_zone(store, center, assets))
}

/// Shows the range ring on `selected` and hides it on every other turret.
pub fn sync_selected_turret_range(
    store: &mut Store,
    selected: Option<Entity>,
    assets: &Assets,
) -> Result<(), StoreError> {
    for (_, renderable) in store.query_mut::<Renderable>() {
        let _ = renderable.extras.remove(&ExtraKind::TurretRange);
    }

    let Some(turret) = selected else {
        return Ok(());
    };

    let range = store.get::<TurretMachine>(turret)?.range();
    let center = store.get::<BoundingBox>(turret)?.rect.center();
    let extent = Vec2::splat(range * 2.0 + RANGE_RING_MARGIN);
    let ring = ExtraRenderable {
        sprite: Sprite::new(assets.range_ring.image, extent),
        rect: Rect::from_center(center, extent),
        order: ExtraOrder::Over,
        fill: 1.0,
    };
    let _ = store
        .get_mut::<Renderable>(turret)?
        .extras
        .insert(ExtraKind::TurretRange, ring);
    Ok(())
}
