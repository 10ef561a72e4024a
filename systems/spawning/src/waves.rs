//! Deterministic wave scripts.

use turret_defence_core::{
    components::{SpawningWave, WaveStep},
    EnemyKind,
};

/// Shape of the generated wave list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    /// Number of waves.
    pub waves: usize,
    /// Enemies in the first wave.
    pub base_enemies: u32,
    /// Extra enemies added by each following wave.
    pub enemies_per_wave: u32,
    /// Pause between spawns within a wave, in milliseconds.
    pub spawn_interval_ms: f32,
    /// Pause before the first spawn of each wave, in milliseconds.
    pub wave_interval_ms: f32,
}

impl WaveConfig {
    /// Creates a configuration.
    #[must_use]
    pub const fn new(
        waves: usize,
        base_enemies: u32,
        enemies_per_wave: u32,
        spawn_interval_ms: f32,
        wave_interval_ms: f32,
    ) -> Self {
        Self {
            waves,
            base_enemies,
            enemies_per_wave,
            spawn_interval_ms,
            wave_interval_ms,
        }
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self::new(10, 10, 2, 1_000.0, 5_000.0)
    }
}

/// Builds the wave list described by `config`.
///
/// The first wave sends only grunts; each later wave mixes in the next
/// enemy kind until all four rotate.
#[must_use]
pub fn standard_waves(config: &WaveConfig) -> Vec<SpawningWave> {
    (0..config.waves)
        .map(|index| {
            let count = config.base_enemies + index as u32 * config.enemies_per_wave;
            let variety = index.min(EnemyKind::ALL.len() - 1) + 1;
            let mut steps = vec![WaveStep::Wait(config.wave_interval_ms)];
            for spawn in 0..count as usize {
                if spawn > 0 {
                    steps.push(WaveStep::Wait(config.spawn_interval_ms));
                }
                steps.push(WaveStep::SpawnEnemy(EnemyKind::ALL[spawn % variety]));
            }
            SpawningWave::new(steps)
        })
        .collect()
}
