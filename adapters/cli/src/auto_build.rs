//! Greedy scripted player for headless runs.
//!
//! The player acts only through input events, exactly as a human would:
//! it fills every free build zone with the priciest turret it can afford,
//! then spends on research and finally on upgrades.

use turret_defence_core::{
    components::{BoundingBox, PlayerResearch, TurretBuildZone, TurretMachine},
    InputEvent, Key, ResearchKind, StatsTable, TurretKind, TurretProperty, UiElement,
};
use turret_defence_world::{SimError, World};

/// Plans the input events of one tick.
#[derive(Debug, Default)]
pub(crate) struct AutoBuilder;

impl AutoBuilder {
    /// Appends the events for at most one purchase to `out`.
    pub(crate) fn plan(
        &mut self,
        world: &World,
        stats: &StatsTable,
        out: &mut Vec<InputEvent>,
    ) -> Result<(), SimError> {
        let money = world.money()?;
        let research = world.player_component::<PlayerResearch>()?;
        let store = world.store();

        if let Some((_, _, zone)) = store.query2::<TurretBuildZone, BoundingBox>().next() {
            let Some(kind) = priciest_affordable(research, stats, money) else {
                return Ok(());
            };
            out.extend([
                InputEvent::KeyDown(Key::Escape),
                InputEvent::UiButtonPress(UiElement::BuildTurret(kind)),
                InputEvent::MouseLeftClickUp(zone.rect.center()),
            ]);
            return Ok(());
        }

        if research.is_idle() {
            let next = ResearchKind::ALL.into_iter().find(|&kind| {
                research.is_incomplete(kind)
                    && stats.research(kind).is_ok_and(|sheet| sheet.cost <= money)
            });
            if let Some(kind) = next {
                out.push(InputEvent::UiButtonPress(UiElement::StartResearch(kind)));
                return Ok(());
            }
        }

        let cap = research.upgrade_cap();
        let candidate = store
            .query2::<TurretMachine, BoundingBox>()
            .filter_map(|(_, machine, bbox)| {
                let property = TurretProperty::UPGRADEABLE
                    .into_iter()
                    .filter(|&property| machine.can_upgrade(property, cap))
                    .min_by_key(|&property| machine.level(property))?;
                let cost = stats.turret(machine.kind).ok()?.costs.upgrade;
                let total: u32 = TurretProperty::UPGRADEABLE
                    .into_iter()
                    .map(|property| machine.level(property))
                    .sum();
                (cost <= money).then_some((total, bbox.rect.center(), property))
            })
            .min_by_key(|(total, _, _)| *total);

        if let Some((_, center, property)) = candidate {
            out.extend([
                InputEvent::KeyDown(Key::Escape),
                InputEvent::MouseLeftClickUp(center),
                InputEvent::UiButtonPress(UiElement::UpgradeTurret(property)),
                InputEvent::KeyDown(Key::Escape),
            ]);
        }
        Ok(())
    }
}

fn priciest_affordable(
    research: &PlayerResearch,
    stats: &StatsTable,
    money: u32,
) -> Option<TurretKind> {
    TurretKind::ALL
        .into_iter()
        .filter(|&kind| research.unlocked(kind))
        .filter_map(|kind| Some((kind, stats.turret(kind).ok()?.costs.build)))
        .filter(|&(_, cost)| cost <= money)
        .max_by_key(|&(_, cost)| cost)
        .map(|(kind, _)| kind)
}
