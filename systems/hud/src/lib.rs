#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Publishes the interface snapshot and the overlays drawn on enemies.
//!
//! The processor runs last in the pipeline so every label reflects the
//! state reached at the end of the tick. Health bars appear once an enemy
//! has taken damage; status icons line up above its top-right corner while
//! the matching effect is active.

use std::collections::BTreeMap;

use turret_defence_core::{
    components::{
        BoundingBox, Enemy, ExtraKind, ExtraOrder, ExtraRenderable, PlayerInputMachine,
        PlayerInputState, PlayerResearch, Renderable, ScoreTracker, Spawning, TurretMachine,
    },
    status::{Buffeted, Burning, Frozen, Poisoned, Shocked, StatusKind},
    Assets, Entity, Rect, ScoreEventKind, StatsTable, Store, TurretProperty, Vec2,
};
use tracing::trace;
use turret_defence_world::{
    ui::{ResearchPanel, TurretPanel},
    FrameContext, Processor, SimError, UiSync, World,
};

/// Gap between an enemy and the overlays drawn above it.
const OVERLAY_GAP: f32 = 4.0;

/// Refreshes [`UiSync`] and enemy overlays once per tick.
#[derive(Debug, Default)]
pub struct HudProcessor {
    scratch: Vec<Entity>,
}

impl Processor for HudProcessor {
    fn name(&self) -> &'static str {
        "hud"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        publish(world, frame.stats, frame.ui)?;

        world
            .store()
            .collect::<(Enemy, BoundingBox, Renderable)>(&mut self.scratch);
        for &enemy in &self.scratch {
            decorate_enemy(world.store_mut(), enemy, frame.assets)?;
        }
        trace!(
            money = frame.ui.money,
            wave = frame.ui.wave_number,
            enemies = self.scratch.len(),
            "hud published"
        );
        Ok(())
    }
}

fn publish(world: &World, stats: &StatsTable, ui: &mut UiSync) -> Result<(), SimError> {
    let money = world.money()?;
    let tracker = world.player_component::<ScoreTracker>()?;
    let research = world.player_component::<PlayerResearch>()?;
    let machine = world.player_component::<PlayerInputMachine>()?;

    ui.money = money;
    ui.score = tracker.total_score();
    ui.despawned = tracker.count(ScoreEventKind::EnemyDespawn);
    if let Some((_, spawning)) = world.store().query::<Spawning>().next() {
        ui.wave_number = spawning.current_wave_number();
        ui.wave_progress = spawning.current_wave().map_or(100, |wave| wave.progress());
    }
    ui.placing = machine
        .turret_to_build
        .filter(|_| machine.state == PlayerInputState::PlacingTurret);
    ui.research = research
        .in_progress
        .zip(research.progress())
        .map(|(kind, progress)| ResearchPanel { kind, progress });
    ui.selected_turret = match machine.selected_turret {
        Some(turret) => turret_panel(world.store(), turret, money, research, stats)?,
        None => None,
    };
    Ok(())
}

fn turret_panel(
    store: &Store,
    turret: Entity,
    money: u32,
    research: &PlayerResearch,
    stats: &StatsTable,
) -> Result<Option<TurretPanel>, SimError> {
    let Some(machine) = store.try_get::<TurretMachine>(turret) else {
        return Ok(None);
    };
    let costs = &stats.turret(machine.kind)?.costs;
    let cap = research.upgrade_cap();

    let levels: BTreeMap<TurretProperty, u32> = TurretProperty::UPGRADEABLE
        .into_iter()
        .map(|property| (property, machine.level(property)))
        .collect();
    let upgrade_available = TurretProperty::UPGRADEABLE
        .into_iter()
        .map(|property| {
            let available = machine.can_upgrade(property, cap) && money >= costs.upgrade;
            (property, available)
        })
        .collect();

    Ok(Some(TurretPanel {
        turret,
        kind: machine.kind,
        levels,
        damage: machine.damage(),
        range: machine.range(),
        firing_cooldown: machine.firing_cooldown(),
        upgrade_cost: costs.upgrade,
        upgrade_available,
        sell_reward: costs.sell,
    }))
}

fn decorate_enemy(store: &mut Store, enemy: Entity, assets: &Assets) -> Result<(), SimError> {
    let rect = store.get::<BoundingBox>(enemy)?.rect;
    let body = store.get::<Enemy>(enemy)?;
    let damaged = body.health() < body.max_health();
    let fill = f32::from(body.health_ratio()) / 100.0;
    let active: Vec<StatusKind> = StatusKind::ALL
        .into_iter()
        .filter(|&kind| status_active(store, enemy, kind))
        .collect();

    let extras = &mut store.get_mut::<Renderable>(enemy)?.extras;
    let bar = assets.health_bar;
    let bar_rect = Rect::new(rect.x, rect.y - OVERLAY_GAP - bar.size.y, rect.w, bar.size.y);
    if damaged {
        let _ = extras.insert(
            ExtraKind::HealthBar,
            ExtraRenderable {
                sprite: bar,
                rect: bar_rect,
                order: ExtraOrder::Over,
                fill,
            },
        );
    } else {
        let _ = extras.remove(&ExtraKind::HealthBar);
    }

    for kind in StatusKind::ALL {
        let _ = extras.remove(&ExtraKind::Status(kind));
    }
    let mut right = rect.right();
    for kind in active {
        let icon = assets.status_icon(kind);
        right -= icon.size.x;
        let origin = Vec2::new(right, bar_rect.y - OVERLAY_GAP - icon.size.y);
        let _ = extras.insert(
            ExtraKind::Status(kind),
            ExtraRenderable {
                sprite: icon,
                rect: Rect::new(origin.x, origin.y, icon.size.x, icon.size.y),
                order: ExtraOrder::Over,
                fill: 1.0,
            },
        );
    }
    Ok(())
}

fn status_active(store: &Store, enemy: Entity, kind: StatusKind) -> bool {
    match kind {
        StatusKind::Burning => store.has::<Burning>(enemy),
        StatusKind::Poisoned => store.has::<Poisoned>(enemy),
        StatusKind::Buffeted => store.has::<Buffeted>(enemy),
        StatusKind::Frozen => store.has::<Frozen>(enemy),
        StatusKind::Shocked => store.has::<Shocked>(enemy),
    }
}
