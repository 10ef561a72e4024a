//! Snapshot the interface layer reads to refresh labels and panels.

use std::collections::BTreeMap;

use turret_defence_core::{Entity, ResearchKind, TurretKind, TurretProperty};

/// Values published to the interface once per tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiSync {
    /// Spendable money.
    pub money: u32,
    /// One-based number of the active wave.
    pub wave_number: usize,
    /// Spawned share of the active wave, as a percentage.
    pub wave_progress: u8,
    /// Enemies killed.
    pub score: u32,
    /// Enemies that reached the exit.
    pub despawned: u32,
    /// Turret kind awaiting a build zone.
    pub placing: Option<TurretKind>,
    /// Research project in progress.
    pub research: Option<ResearchPanel>,
    /// Panel of the selected turret.
    pub selected_turret: Option<TurretPanel>,
    /// Whether the run has ended.
    pub game_over: bool,
}

/// Running research project.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResearchPanel {
    /// Project being researched.
    pub kind: ResearchKind,
    /// Completed share, as a percentage.
    pub progress: u8,
}

/// Statistics and actions of the selected turret.
#[derive(Clone, Debug, PartialEq)]
pub struct TurretPanel {
    /// Selected turret.
    pub turret: Entity,
    /// Turret archetype.
    pub kind: TurretKind,
    /// Purchased level per upgradeable property.
    pub levels: BTreeMap<TurretProperty, u32>,
    /// Damage per hit.
    pub damage: u32,
    /// Targeting radius.
    pub range: f32,
    /// Milliseconds between shots.
    pub firing_cooldown: f32,
    /// Price of one more level.
    pub upgrade_cost: u32,
    /// Whether each upgradeable property can be bought right now.
    pub upgrade_available: BTreeMap<TurretProperty, bool>,
    /// Refund when sold.
    pub sell_reward: u32,
}
