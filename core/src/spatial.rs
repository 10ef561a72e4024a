//! Range queries over enemies, measured between rectangle centres.

use std::collections::BTreeSet;

use crate::{
    components::{BoundingBox, Enemy},
    geometry::Rect,
    store::{Entity, Store},
};

/// Finds the enemy whose centre is closest to `origin`'s centre.
///
/// Enemies farther than `max_range` are never returned. On exact ties the
/// enemy seen first in storage order wins.
#[must_use]
pub fn find_nearest(store: &Store, origin: &Rect, max_range: f32) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;

    for (entity, _, bbox) in store.query2::<Enemy, BoundingBox>() {
        let distance = origin.center_distance(&bbox.rect);
        if distance > max_range {
            continue;
        }
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((entity, distance)),
        }
    }

    best.map(|(entity, _)| entity)
}

/// Lists every enemy within `max_range` of `origin`, skipping `exclude`.
#[must_use]
pub fn find_all_in_range(
    store: &Store,
    origin: &Rect,
    max_range: f32,
    exclude: &BTreeSet<Entity>,
) -> Vec<Entity> {
    store
        .query2::<Enemy, BoundingBox>()
        .filter(|(entity, _, bbox)| {
            !exclude.contains(entity) && origin.center_distance(&bbox.rect) <= max_range
        })
        .map(|(entity, _, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn enemy_at(store: &mut Store, x: f32, y: f32) -> Entity {
        store
            .create()
            .with(Enemy::new(1, 10))
            .with(BoundingBox::new(Rect::from_center(
                Vec2::new(x, y),
                Vec2::splat(10.0),
            )))
            .build()
    }

    fn origin() -> Rect {
        Rect::from_center(Vec2::ZERO, Vec2::splat(20.0))
    }

    #[test]
    fn nearest_ignores_out_of_range_candidates() {
        let mut store = Store::new();
        let _far = enemy_at(&mut store, 500.0, 0.0);

        assert_eq!(find_nearest(&store, &origin(), 100.0), None);

        let near = enemy_at(&mut store, 50.0, 0.0);
        assert_eq!(find_nearest(&store, &origin(), 100.0), Some(near));
    }

    #[test]
    fn nearest_prefers_first_seen_on_ties() {
        let mut store = Store::new();
        let first = enemy_at(&mut store, 30.0, 0.0);
        let _second = enemy_at(&mut store, -30.0, 0.0);
        let _third = enemy_at(&mut store, 0.0, 40.0);

        assert_eq!(find_nearest(&store, &origin(), 100.0), Some(first));
    }

    #[test]
    fn range_query_honours_exclusions() {
        let mut store = Store::new();
        let a = enemy_at(&mut store, 10.0, 0.0);
        let b = enemy_at(&mut store, 0.0, 10.0);
        let _c = enemy_at(&mut store, 300.0, 0.0);

        let all = find_all_in_range(&store, &origin(), 50.0, &BTreeSet::new());
        assert_eq!(all.len(), 2);

        let rest = find_all_in_range(&store, &origin(), 50.0, &BTreeSet::from([a]));
        assert_eq!(rest, vec![b]);
    }

    #[test]
    fn entities_without_enemy_are_not_candidates() {
        let mut store = Store::new();
        let _decoy = store
            .create()
            .with(BoundingBox::new(origin()))
            .build();

        assert_eq!(find_nearest(&store, &origin(), 1_000.0), None);
    }
}
