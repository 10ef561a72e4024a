//! Player-facing economic actions.
//!
//! Every action validates all of its preconditions before touching the
//! world, so a rejected action leaves no trace.

use thiserror::Error;
use tracing::info;
use turret_defence_core::{
    components::{BoundingBox, PlayerResearch, PlayerResources, TurretBuildZone, TurretMachine},
    Assets, Entity, ResearchKind, StatsTable, TurretKind, TurretProperty,
};

use crate::{
    turrets::{build_turret, demolish_turret},
    SimError, World,
};

/// Economic rule a player action broke.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionRejected {
    /// The player cannot afford the action.
    #[error("costs {cost} but only {available} is available")]
    InsufficientFunds {
        /// Price of the action.
        cost: u32,
        /// Money the player holds.
        available: u32,
    },
    /// The turret kind needs a research project first.
    #[error("{0:?} requires {1:?}")]
    Locked(TurretKind, ResearchKind),
    /// The property already sits at the current upgrade cap.
    #[error("{property:?} is already at level {cap}")]
    UpgradeCapReached {
        /// Property the player tried to upgrade.
        property: TurretProperty,
        /// Cap in effect.
        cap: u32,
    },
    /// The property cannot be bought.
    #[error("{0:?} is not upgradeable")]
    NotUpgradeable(TurretProperty),
    /// Another project is already running.
    #[error("already researching {0:?}")]
    ResearchBusy(ResearchKind),
    /// The project is finished or already running.
    #[error("{0:?} is already researched")]
    ResearchUnavailable(ResearchKind),
    /// The entity is not a free build zone.
    #[error("{0:?} is not a build zone")]
    NotABuildZone(Entity),
    /// The entity is not a turret.
    #[error("{0:?} is not a turret")]
    NotATurret(Entity),
}

fn ensure_funds(world: &World, cost: u32) -> Result<(), SimError> {
    let available = world.money()?;
    if available < cost {
        return Err(ActionRejected::InsufficientFunds { cost, available }.into());
    }
    Ok(())
}

fn spend(world: &mut World, cost: u32) -> Result<(), SimError> {
    let resources = world.player_component_mut::<PlayerResources>()?;
    resources.money = resources.money.saturating_sub(cost);
    Ok(())
}

/// Buys a turret of `kind` on `build_zone`.
pub fn try_build_turret(
    world: &mut World,
    build_zone: Entity,
    kind: TurretKind,
    assets: &Assets,
    stats: &StatsTable,
) -> Result<Entity, SimError> {
    if !world.store().has::<TurretBuildZone>(build_zone) {
        return Err(ActionRejected::NotABuildZone(build_zone).into());
    }
    let research = world.player_component::<PlayerResearch>()?;
    if let Some(required) = kind.required_research() {
        if !research.is_completed(required) {
            return Err(ActionRejected::Locked(kind, required).into());
        }
    }
    let cost = stats.turret(kind)?.costs.build;
    let _ = world.store().get::<BoundingBox>(build_zone)?;
    ensure_funds(world, cost)?;

    spend(world, cost)?;
    let turret = build_turret(world.store_mut(), build_zone, kind, assets, stats)?;
    info!(?turret, ?kind, cost, "turret built");
    Ok(turret)
}

/// Buys one level of `property` on `turret`.
pub fn try_upgrade_turret(
    world: &mut World,
    turret: Entity,
    property: TurretProperty,
    stats: &StatsTable,
) -> Result<(), SimError> {
    if !property.is_upgradeable() {
        return Err(ActionRejected::NotUpgradeable(property).into());
    }
    let Some(machine) = world.store().try_get::<TurretMachine>(turret) else {
        return Err(ActionRejected::NotATurret(turret).into());
    };
    let cap = world.player_component::<PlayerResearch>()?.upgrade_cap();
    if !machine.can_upgrade(property, cap) {
        return Err(ActionRejected::UpgradeCapReached { property, cap }.into());
    }
    let cost = stats.turret(machine.kind)?.costs.upgrade;
    ensure_funds(world, cost)?;

    spend(world, cost)?;
    let machine = world.store_mut().get_mut::<TurretMachine>(turret)?;
    let _ = machine.upgrade(property, cap);
    info!(?turret, ?property, level = machine.level(property), "turret upgraded");
    Ok(())
}

/// Sells `turret`, refunding its sell price.
///
/// Returns the build zone left in its place.
pub fn try_sell_turret(
    world: &mut World,
    turret: Entity,
    assets: &Assets,
    stats: &StatsTable,
) -> Result<Entity, SimError> {
    let Some(machine) = world.store().try_get::<TurretMachine>(turret) else {
        return Err(ActionRejected::NotATurret(turret).into());
    };
    let refund = stats.turret(machine.kind)?.costs.sell;

    let zone = demolish_turret(world.store_mut(), turret, assets)?;
    world.player_component_mut::<PlayerResources>()?.money += refund;
    info!(?turret, refund, "turret sold");
    Ok(zone)
}

/// Pays for and starts `kind`.
pub fn try_start_research(
    world: &mut World,
    kind: ResearchKind,
    stats: &StatsTable,
) -> Result<(), SimError> {
    let research = world.player_component::<PlayerResearch>()?;
    if let Some(running) = research.in_progress {
        return Err(ActionRejected::ResearchBusy(running).into());
    }
    if !research.is_incomplete(kind) {
        return Err(ActionRejected::ResearchUnavailable(kind).into());
    }
    let sheet = stats.research(kind)?;
    ensure_funds(world, sheet.cost)?;

    spend(world, sheet.cost)?;
    world
        .player_component_mut::<PlayerResearch>()?
        .start(kind, sheet.duration);
    info!(?kind, cost = sheet.cost, "research started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use turret_defence_core::{Rect, StoreError, Vec2, MAX_UPGRADE_LEVEL, PLAYER_STARTING_MONEY};

    use super::*;
    use crate::turrets::create_build_zone;

    fn funded_world(money: u32) -> World {
        let mut world = World::new(Rect::new(0.0, 0.0, 960.0, 960.0), 5);
        world
            .player_component_mut::<PlayerResources>()
            .expect("player exists")
            .money = money;
        world
    }

    #[test]
    fn zone_without_a_position_is_not_charged() {
        let mut world = funded_world(PLAYER_STARTING_MONEY);
        let zone = world.store_mut().create().with(TurretBuildZone).build();

        let result = try_build_turret(
            &mut world,
            zone,
            TurretKind::Bullet,
            &Assets::placeholder(),
            &StatsTable::standard(),
        );

        assert!(matches!(
            result,
            Err(SimError::Store(StoreError::MissingComponent { .. }))
        ));
        assert_eq!(world.money(), Ok(PLAYER_STARTING_MONEY));
        assert!(world.store().is_alive(zone));
    }

    fn rejection(result: Result<impl std::fmt::Debug, SimError>) -> ActionRejected {
        match result {
            Err(SimError::Rejected(reason)) => reason,
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[test]
    fn second_build_without_funds_changes_nothing() {
        let mut world = funded_world(50);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let first = create_build_zone(world.store_mut(), Vec2::new(100.0, 100.0), &assets);
        let second = create_build_zone(world.store_mut(), Vec2::new(300.0, 100.0), &assets);

        let turret = try_build_turret(&mut world, first, TurretKind::Bullet, &assets, &stats)
            .expect("exactly affordable");
        assert!(world.store().has::<TurretMachine>(turret));
        assert_eq!(world.money(), Ok(0));

        let entities_before = world.store().len();
        let reason = rejection(try_build_turret(
            &mut world,
            second,
            TurretKind::Bullet,
            &assets,
            &stats,
        ));

        assert_eq!(
            reason,
            ActionRejected::InsufficientFunds {
                cost: 50,
                available: 0
            }
        );
        assert_eq!(world.money(), Ok(0));
        assert_eq!(world.store().len(), entities_before);
        assert!(world.store().has::<TurretBuildZone>(second));
    }

    #[test]
    fn locked_turrets_cannot_be_built() {
        let mut world = funded_world(10_000);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let zone = create_build_zone(world.store_mut(), Vec2::ZERO, &assets);

        let reason = rejection(try_build_turret(
            &mut world,
            zone,
            TurretKind::Rocket,
            &assets,
            &stats,
        ));

        assert_eq!(
            reason,
            ActionRejected::Locked(TurretKind::Rocket, ResearchKind::UnlockRocketTurret)
        );
        assert_eq!(world.money(), Ok(10_000));
    }

    #[test]
    fn building_on_a_turret_is_rejected() {
        let mut world = funded_world(1_000);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let zone = create_build_zone(world.store_mut(), Vec2::ZERO, &assets);
        let turret = try_build_turret(&mut world, zone, TurretKind::Bullet, &assets, &stats)
            .expect("affordable");

        let reason = rejection(try_build_turret(
            &mut world,
            turret,
            TurretKind::Bullet,
            &assets,
            &stats,
        ));

        assert_eq!(reason, ActionRejected::NotABuildZone(turret));
    }

    #[test]
    fn upgrades_stop_at_the_research_cap() {
        let mut world = funded_world(100_000);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let zone = create_build_zone(world.store_mut(), Vec2::ZERO, &assets);
        let turret = try_build_turret(&mut world, zone, TurretKind::Bullet, &assets, &stats)
            .expect("affordable");

        for _ in 0..5 {
            try_upgrade_turret(&mut world, turret, TurretProperty::Damage, &stats)
                .expect("below the base cap");
        }
        let reason = rejection(try_upgrade_turret(
            &mut world,
            turret,
            TurretProperty::Damage,
            &stats,
        ));
        assert_eq!(
            reason,
            ActionRejected::UpgradeCapReached {
                property: TurretProperty::Damage,
                cap: 5
            }
        );

        let _ = world
            .player_component_mut::<PlayerResearch>()
            .expect("player exists")
            .completed
            .insert(ResearchKind::UnlockExtendedUpgrades);
        while try_upgrade_turret(&mut world, turret, TurretProperty::Damage, &stats).is_ok() {}

        let machine = world.store().get::<TurretMachine>(turret).expect("turret");
        assert_eq!(machine.level(TurretProperty::Damage), MAX_UPGRADE_LEVEL);
        assert_eq!(machine.damage(), 10 + 5 * MAX_UPGRADE_LEVEL);
        assert_eq!(world.money(), Ok(100_000 - 50 - 25 * MAX_UPGRADE_LEVEL));
    }

    #[test]
    fn upgrade_without_funds_keeps_the_level() {
        let mut world = funded_world(50);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let zone = create_build_zone(world.store_mut(), Vec2::ZERO, &assets);
        let turret = try_build_turret(&mut world, zone, TurretKind::Bullet, &assets, &stats)
            .expect("affordable");

        let reason = rejection(try_upgrade_turret(
            &mut world,
            turret,
            TurretProperty::Range,
            &stats,
        ));

        assert!(matches!(reason, ActionRejected::InsufficientFunds { .. }));
        assert_eq!(
            world
                .store()
                .get::<TurretMachine>(turret)
                .map(|m| m.level(TurretProperty::Range)),
            Ok(0)
        );
    }

    #[test]
    fn selling_refunds_and_restores_the_zone() {
        let mut world = funded_world(50);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let zone = create_build_zone(world.store_mut(), Vec2::ZERO, &assets);
        let turret = try_build_turret(&mut world, zone, TurretKind::Bullet, &assets, &stats)
            .expect("affordable");

        let restored = try_sell_turret(&mut world, turret, &assets, &stats).expect("turret exists");

        assert_eq!(world.money(), Ok(25));
        assert!(world.store().has::<TurretBuildZone>(restored));
        assert_eq!(
            rejection(try_sell_turret(&mut world, turret, &assets, &stats)),
            ActionRejected::NotATurret(turret)
        );
    }

    #[test]
    fn research_runs_one_project_at_a_time() {
        let mut world = funded_world(PLAYER_STARTING_MONEY + 500);
        let stats = StatsTable::standard();

        try_start_research(&mut world, ResearchKind::UnlockFlameTurret, &stats)
            .expect("affordable and idle");

        assert_eq!(world.money(), Ok(PLAYER_STARTING_MONEY + 250));
        assert_eq!(
            rejection(try_start_research(
                &mut world,
                ResearchKind::UnlockRocketTurret,
                &stats
            )),
            ActionRejected::ResearchBusy(ResearchKind::UnlockFlameTurret)
        );

        let research = world
            .player_component_mut::<PlayerResearch>()
            .expect("player exists");
        assert_eq!(research.advance(10_000.0), Some(ResearchKind::UnlockFlameTurret));
        assert_eq!(
            rejection(try_start_research(
                &mut world,
                ResearchKind::UnlockFlameTurret,
                &stats
            )),
            ActionRejected::ResearchUnavailable(ResearchKind::UnlockFlameTurret)
        );
    }
}
