//! Populates a world from a parsed map layout.

use tracing::debug;
use turret_defence_core::{
    components::{BoundingBox, Despawning, PathGraph, Spawning, SpawningWave},
    Assets, Entity, Rect, Vec2,
};

use crate::{turrets::create_build_zone, World};

/// Objects extracted from a tile map by the loading layer.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    /// Centres of the turret build zones.
    pub build_zones: Vec<Vec2>,
    /// Enemy path; the first vertex is the spawn point.
    pub path: Vec<Vec2>,
    /// Zone removing enemies that reach it.
    pub exit: Rect,
}

/// Handles of the entities created by [`populate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapEntities {
    /// Wave spawner at the head of the path.
    pub spawner: Entity,
    /// End-of-path despawn zone.
    pub exit: Entity,
    /// Build zones in layout order.
    pub build_zones: Vec<Entity>,
}

/// Creates the spawner, the exit zone and every build zone of `layout`.
///
/// Enemies walk the path vertices after the spawn point.
pub fn populate(
    world: &mut World,
    layout: &MapLayout,
    waves: Vec<SpawningWave>,
    assets: &Assets,
) -> MapEntities {
    let store = world.store_mut();
    let spawn_point = layout.path.first().copied().unwrap_or(Vec2::ZERO);

    let spawner = store
        .create()
        .with(BoundingBox::new(Rect::new(spawn_point.x, spawn_point.y, 0.0, 0.0)))
        .with(PathGraph {
            vertices: layout.path.iter().skip(1).copied().collect(),
        })
        .with(Spawning::new(waves))
        .build();
    let exit = store
        .create()
        .with(BoundingBox::new(layout.exit))
        .with(Despawning)
        .build();
    let build_zones = layout
        .build_zones
        .iter()
        .map(|center| create_build_zone(store, *center, assets))
        .collect::<Vec<_>>();

    debug!(?spawner, ?exit, zones = build_zones.len(), "map populated");
    MapEntities {
        spawner,
        exit,
        build_zones,
    }
}
