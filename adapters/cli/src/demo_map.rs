//! Built-in map used by headless runs.

use turret_defence_core::{Rect, Vec2};
use turret_defence_world::map::MapLayout;

/// Playable area of the demo map.
pub(crate) const BOUNDS: Rect = Rect::new(0.0, 0.0, 960.0, 640.0);

/// Bent path from the left edge to the right edge with build zones on
/// both sides of each straight.
pub(crate) fn layout() -> MapLayout {
    let path = vec![
        Vec2::new(0.0, 96.0),
        Vec2::new(640.0, 96.0),
        Vec2::new(640.0, 416.0),
        Vec2::new(160.0, 416.0),
        Vec2::new(160.0, 576.0),
        Vec2::new(960.0, 576.0),
    ];
    let build_zones = [
        (160.0, 192.0),
        (320.0, 192.0),
        (480.0, 192.0),
        (544.0, 320.0),
        (736.0, 256.0),
        (384.0, 320.0),
        (256.0, 512.0),
        (448.0, 512.0),
        (640.0, 512.0),
        (64.0, 480.0),
    ]
    .into_iter()
    .map(|(x, y)| Vec2::new(x, y))
    .collect();

    MapLayout {
        build_zones,
        path,
        exit: Rect::new(920.0, 544.0, 40.0, 64.0),
    }
}
