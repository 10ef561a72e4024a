#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core vocabulary shared by every Turret Defence crate.
//!
//! The crate owns the archetype-free component store, every component the
//! simulation attaches to entities, rectangle geometry and spatial queries,
//! plus the typed inputs consumed from external collaborators: the asset
//! bundle, the stats table and normalized input events.

pub mod assets;
pub mod components;
pub mod geometry;
pub mod input;
pub mod spatial;
pub mod stats;
pub mod status;
pub mod store;

pub use assets::{Assets, ImageId, Sprite};
pub use geometry::Rect;
pub use glam::Vec2;
pub use input::{InputEvent, Key, UiElement};
pub use stats::{EnemyStats, ResearchStats, StatsError, StatsTable, TurretCosts, TurretStats};
pub use store::{Entity, EntityBuilder, Signature, Store, StoreError};

use serde::{Deserialize, Serialize};

/// Money granted to a freshly created player.
pub const PLAYER_STARTING_MONEY: u32 = 75;

/// Highest upgrade level any turret property can reach.
pub const MAX_UPGRADE_LEVEL: u32 = 10;

/// Upgrade level cap in effect until extended upgrades are researched.
pub const BASE_UPGRADE_LEVEL_CAP: u32 = 5;

/// Degrees per millisecond an idle rotating turret spins.
pub const IDLE_ROTATION_SPEED: f32 = 0.025;

/// Enemy archetypes that waves can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline infantry.
    Grunt,
    /// Slow, heavily armoured unit.
    Tank,
    /// Sturdier and faster infantry.
    Elite,
    /// Fast, lightly armoured raider.
    Commando,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [Self; 4] = [Self::Grunt, Self::Tank, Self::Elite, Self::Commando];
}

/// Turret archetypes the player can construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurretKind {
    /// Instant-hit gun turret.
    Bullet,
    /// Cone of burning particles.
    Flame,
    /// Freezing projectile with a frost burst.
    Frost,
    /// Missile with an explosive follow-up.
    Rocket,
    /// Chain-jumping lightning strike.
    Lightning,
    /// Lingering poison zone.
    Poison,
    /// Drifting tornado that buffets enemies.
    Tornado,
}

impl TurretKind {
    /// Every turret kind in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Bullet,
        Self::Flame,
        Self::Frost,
        Self::Rocket,
        Self::Lightning,
        Self::Poison,
        Self::Tornado,
    ];

    /// Whether the turret turns to face its target.
    #[must_use]
    pub const fn rotates(self) -> bool {
        !matches!(self, Self::Lightning | Self::Poison | Self::Tornado)
    }

    /// Milliseconds spent in the firing animation after each shot.
    #[must_use]
    pub const fn firing_animation_duration(self) -> f32 {
        match self {
            Self::Bullet => 250.0,
            _ => 0.0,
        }
    }

    /// Milliseconds spent reloading after the firing animation.
    #[must_use]
    pub const fn reloading_duration(self) -> f32 {
        match self {
            Self::Rocket => 500.0,
            _ => 0.0,
        }
    }

    /// Research that must complete before the turret can be built.
    #[must_use]
    pub const fn required_research(self) -> Option<ResearchKind> {
        match self {
            Self::Bullet | Self::Frost => None,
            Self::Flame => Some(ResearchKind::UnlockFlameTurret),
            Self::Rocket => Some(ResearchKind::UnlockRocketTurret),
            Self::Lightning => Some(ResearchKind::UnlockLightningTurret),
            Self::Poison => Some(ResearchKind::UnlockPoisonTurret),
            Self::Tornado => Some(ResearchKind::UnlockTornadoTurret),
        }
    }
}

/// Turret statistics derived from base values and upgrade levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurretProperty {
    /// Damage per hit or per damage-over-time tick.
    Damage,
    /// Cooldown in milliseconds between shots.
    RateOfFire,
    /// Targeting radius in world units.
    Range,
    /// Milliseconds between damage-over-time ticks.
    DotTickRate,
    /// Milliseconds a damage-over-time effect lasts.
    DotDuration,
}

impl TurretProperty {
    /// Properties the player can spend money upgrading.
    pub const UPGRADEABLE: [Self; 3] = [Self::Damage, Self::Range, Self::RateOfFire];

    /// Reports whether the player may upgrade this property.
    #[must_use]
    pub const fn is_upgradeable(self) -> bool {
        matches!(self, Self::Damage | Self::Range | Self::RateOfFire)
    }
}

/// Research projects available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResearchKind {
    /// Unlocks the flame turret.
    UnlockFlameTurret,
    /// Unlocks the rocket turret.
    UnlockRocketTurret,
    /// Unlocks the lightning turret.
    UnlockLightningTurret,
    /// Unlocks the poison turret.
    UnlockPoisonTurret,
    /// Unlocks the tornado turret.
    UnlockTornadoTurret,
    /// Raises the upgrade cap to [`MAX_UPGRADE_LEVEL`].
    UnlockExtendedUpgrades,
}

impl ResearchKind {
    /// Every research kind in declaration order.
    pub const ALL: [Self; 6] = [
        Self::UnlockFlameTurret,
        Self::UnlockRocketTurret,
        Self::UnlockLightningTurret,
        Self::UnlockPoisonTurret,
        Self::UnlockTornadoTurret,
        Self::UnlockExtendedUpgrades,
    ];

    /// Turret kind made buildable by this research, if any.
    #[must_use]
    pub const fn unlocks_turret(self) -> Option<TurretKind> {
        match self {
            Self::UnlockFlameTurret => Some(TurretKind::Flame),
            Self::UnlockRocketTurret => Some(TurretKind::Rocket),
            Self::UnlockLightningTurret => Some(TurretKind::Lightning),
            Self::UnlockPoisonTurret => Some(TurretKind::Poison),
            Self::UnlockTornadoTurret => Some(TurretKind::Tornado),
            Self::UnlockExtendedUpgrades => None,
        }
    }
}

/// Events tallied by the score tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreEventKind {
    /// An enemy was killed by the player's defences.
    EnemyKill,
    /// An enemy reached the end of the path.
    EnemyDespawn,
}
