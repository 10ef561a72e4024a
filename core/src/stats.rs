//! Numeric stat sheets keyed by enemy, turret and research kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EnemyKind, ResearchKind, TurretKind, TurretProperty};

/// Raised when a kind has no sheet in the table.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StatsError {
    /// No sheet for the enemy kind.
    #[error("no stats for enemy kind {0:?}")]
    MissingEnemy(EnemyKind),
    /// No sheet for the turret kind.
    #[error("no stats for turret kind {0:?}")]
    MissingTurret(TurretKind),
    /// No sheet for the research kind.
    #[error("no stats for research kind {0:?}")]
    MissingResearch(ResearchKind),
}

/// Level-scaled enemy statistics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Health at level zero.
    pub base_health: u32,
    /// Health gained per level.
    pub health_per_level: u32,
    /// Bounty at level zero.
    pub base_bounty: u32,
    /// Bounty gained per level.
    pub bounty_per_level: u32,
    /// Walking speed in world units per millisecond.
    pub speed: f32,
}

impl EnemyStats {
    /// Health of an enemy spawned at `level`.
    #[must_use]
    pub const fn max_health(&self, level: u32) -> u32 {
        self.base_health
            .saturating_add(level.saturating_mul(self.health_per_level))
    }

    /// Bounty of an enemy spawned at `level`.
    #[must_use]
    pub const fn bounty(&self, level: u32) -> u32 {
        self.base_bounty
            .saturating_add(level.saturating_mul(self.bounty_per_level))
    }
}

/// Money flows attached to a turret kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurretCosts {
    /// Price of construction.
    pub build: u32,
    /// Price of one property level.
    pub upgrade: u32,
    /// Refund when sold.
    pub sell: u32,
}

/// Base statistics, per-level changes and costs of a turret kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretStats {
    /// Level-zero statistics.
    pub base: BTreeMap<TurretProperty, f32>,
    /// Change per upgrade level.
    pub per_level: BTreeMap<TurretProperty, f32>,
    /// Prices.
    pub costs: TurretCosts,
}

/// Price and duration of a research project.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchStats {
    /// Money spent when the project starts.
    pub cost: u32,
    /// Milliseconds until completion.
    pub duration: f32,
}

/// Lookup table consulted by entity factories and the economy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    /// Enemy sheets.
    #[serde(default)]
    pub enemies: BTreeMap<EnemyKind, EnemyStats>,
    /// Turret sheets.
    #[serde(default)]
    pub turrets: BTreeMap<TurretKind, TurretStats>,
    /// Research sheets.
    #[serde(default)]
    pub research: BTreeMap<ResearchKind, ResearchStats>,
}

impl StatsTable {
    /// Sheet for `kind`.
    pub fn enemy(&self, kind: EnemyKind) -> Result<&EnemyStats, StatsError> {
        self.enemies.get(&kind).ok_or(StatsError::MissingEnemy(kind))
    }

    /// Sheet for `kind`.
    pub fn turret(&self, kind: TurretKind) -> Result<&TurretStats, StatsError> {
        self.turrets.get(&kind).ok_or(StatsError::MissingTurret(kind))
    }

    /// Sheet for `kind`.
    pub fn research(&self, kind: ResearchKind) -> Result<&ResearchStats, StatsError> {
        self.research
            .get(&kind)
            .ok_or(StatsError::MissingResearch(kind))
    }

    /// Built-in table used when no stats file is supplied.
    #[must_use]
    pub fn standard() -> Self {
        use TurretProperty::{Damage, DotDuration, DotTickRate, Range, RateOfFire};

        let enemy = |base_health, health_per_level, base_bounty, bounty_per_level, speed| {
            EnemyStats {
                base_health,
                health_per_level,
                base_bounty,
                bounty_per_level,
                speed,
            }
        };
        let enemies = BTreeMap::from([
            (EnemyKind::Grunt, enemy(30, 5, 5, 1, 0.10)),
            (EnemyKind::Tank, enemy(100, 5, 25, 5, 0.05)),
            (EnemyKind::Elite, enemy(60, 8, 15, 3, 0.12)),
            (EnemyKind::Commando, enemy(45, 6, 10, 2, 0.16)),
        ]);

        let turret = |build, base: &[(TurretProperty, f32)], per_level: &[(TurretProperty, f32)]| {
            TurretStats {
                base: base.iter().copied().collect(),
                per_level: per_level.iter().copied().collect(),
                costs: TurretCosts {
                    build,
                    upgrade: 25,
                    sell: 25,
                },
            }
        };
        let turrets = BTreeMap::from([
            (
                TurretKind::Bullet,
                turret(
                    50,
                    &[(Damage, 10.0), (RateOfFire, 1_000.0), (Range, 200.0)],
                    &[(Damage, 5.0), (RateOfFire, -50.0), (Range, 25.0)],
                ),
            ),
            (
                TurretKind::Flame,
                turret(
                    250,
                    &[
                        (Damage, 2.0),
                        (RateOfFire, 50.0),
                        (Range, 150.0),
                        (DotTickRate, 250.0),
                        (DotDuration, 1_000.0),
                    ],
                    &[(Damage, 1.0), (RateOfFire, -2.0), (Range, 15.0)],
                ),
            ),
            (
                TurretKind::Frost,
                turret(
                    100,
                    &[(Damage, 3.0), (RateOfFire, 2_000.0), (Range, 500.0)],
                    &[(Damage, 2.0), (RateOfFire, -150.0), (Range, 100.0)],
                ),
            ),
            (
                TurretKind::Rocket,
                turret(
                    500,
                    &[(Damage, 40.0), (RateOfFire, 3_000.0), (Range, 400.0)],
                    &[(Damage, 10.0), (RateOfFire, -150.0), (Range, 40.0)],
                ),
            ),
            (
                TurretKind::Lightning,
                turret(
                    1_000,
                    &[(Damage, 30.0), (RateOfFire, 2_500.0), (Range, 300.0)],
                    &[(Damage, 8.0), (RateOfFire, -150.0), (Range, 30.0)],
                ),
            ),
            (
                TurretKind::Poison,
                turret(
                    1_000,
                    &[
                        (Damage, 3.0),
                        (RateOfFire, 2_500.0),
                        (Range, 250.0),
                        (DotTickRate, 250.0),
                        (DotDuration, 3_000.0),
                    ],
                    &[(Damage, 1.0), (RateOfFire, -100.0), (Range, 25.0)],
                ),
            ),
            (
                TurretKind::Tornado,
                turret(
                    1_000,
                    &[
                        (Damage, 2.0),
                        (RateOfFire, 4_000.0),
                        (Range, 300.0),
                        (DotTickRate, 500.0),
                        (DotDuration, 2_000.0),
                    ],
                    &[(Damage, 1.0), (RateOfFire, -200.0), (Range, 25.0)],
                ),
            ),
        ]);

        let research = |cost, seconds: f32| ResearchStats {
            cost,
            duration: seconds * 1_000.0,
        };
        let research = BTreeMap::from([
            (ResearchKind::UnlockFlameTurret, research(250, 10.0)),
            (ResearchKind::UnlockRocketTurret, research(250, 10.0)),
            (ResearchKind::UnlockLightningTurret, research(1_000, 30.0)),
            (ResearchKind::UnlockPoisonTurret, research(1_000, 30.0)),
            (ResearchKind::UnlockTornadoTurret, research(1_000, 30.0)),
            (ResearchKind::UnlockExtendedUpgrades, research(1_000, 30.0)),
        ]);

        Self {
            enemies,
            turrets,
            research,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_sheets_saturate_instead_of_wrapping() {
        let sheet = EnemyStats {
            base_health: u32::MAX - 1,
            health_per_level: u32::MAX,
            base_bounty: 10,
            bounty_per_level: 1 << 31,
            speed: 0.1,
        };

        assert_eq!(sheet.max_health(3), u32::MAX);
        assert_eq!(sheet.bounty(4), u32::MAX);
        assert_eq!(sheet.max_health(0), u32::MAX - 1);
    }

    #[test]
    fn standard_table_covers_every_kind() {
        let table = StatsTable::standard();

        for kind in EnemyKind::ALL {
            assert!(table.enemy(kind).is_ok(), "{kind:?} has no enemy sheet");
        }
        for kind in TurretKind::ALL {
            assert!(table.turret(kind).is_ok(), "{kind:?} has no turret sheet");
        }
        for kind in ResearchKind::ALL {
            assert!(table.research(kind).is_ok(), "{kind:?} has no research sheet");
        }
    }

    #[test]
    fn standard_build_costs_match_the_price_list() {
        let table = StatsTable::standard();
        let costs: Vec<u32> = TurretKind::ALL
            .into_iter()
            .map(|kind| table.turret(kind).map(|stats| stats.costs.build))
            .collect::<Result<_, _>>()
            .expect("every turret has a sheet");

        assert_eq!(costs, vec![50, 250, 100, 500, 1_000, 1_000, 1_000]);
    }

    #[test]
    fn enemy_sheet_scales_with_level() {
        let grunt = StatsTable::standard()
            .enemy(EnemyKind::Grunt)
            .copied()
            .expect("grunt sheet");

        assert_eq!(grunt.max_health(0), 30);
        assert_eq!(grunt.max_health(4), 50);
        assert_eq!(grunt.bounty(3), 8);
    }

    #[test]
    fn toml_sheets_deserialize_with_kind_keys() {
        let table: StatsTable = toml::from_str(
            r#"
            [enemies.Tank]
            base_health = 100
            health_per_level = 5
            base_bounty = 25
            bounty_per_level = 5
            speed = 0.05

            [turrets.Bullet]
            costs = { build = 50, upgrade = 25, sell = 25 }
            base = { Damage = 10.0, RateOfFire = 1000.0, Range = 200.0 }
            per_level = { Damage = 5.0 }

            [research.UnlockRocketTurret]
            cost = 250
            duration = 10000.0
            "#,
        )
        .expect("valid stats sheet");

        assert_eq!(table.enemy(EnemyKind::Tank).map(|s| s.max_health(2)), Ok(110));
        assert_eq!(
            table.turret(TurretKind::Bullet).map(|s| s.costs.build),
            Ok(50)
        );
        assert_eq!(
            table.enemy(EnemyKind::Grunt),
            Err(StatsError::MissingEnemy(EnemyKind::Grunt))
        );
        assert_eq!(
            table
                .research(ResearchKind::UnlockRocketTurret)
                .map(|s| s.duration),
            Ok(10_000.0)
        );
    }
}
