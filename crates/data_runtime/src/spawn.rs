//! Spawn director tuning: difficulty curve, population caps, placement,
//! enemy level formula and boss-encounter timing.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LevelCfg {
    /// Level floor for zone floor 1.
    pub base: u32,
    /// Added per zone floor above 1.
    pub per_floor: u32,
    /// Added per elapsed minute (truncated).
    pub per_minute: f32,
    /// Chance of a +1 jitter on top of the formula.
    pub jitter_chance: f64,
    pub max: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpawnTuning {
    /// Interval at t=0; shrinks linearly with elapsed minutes.
    pub base_interval_s: f32,
    pub interval_decay_per_min_s: f32,
    /// Hard floor (500 ms).
    pub min_interval_s: f32,
    /// Batch size steps: at `batch_minutes[i]` elapsed minutes the batch
    /// becomes `batch_sizes[i]`. Slices must be the same length.
    pub batch_minutes: Vec<f32>,
    pub batch_sizes: Vec<usize>,
    pub population_cap: usize,
    /// Ring placement around the player.
    pub spawn_radius: f32,
    pub spawn_retries: u32,
    pub ring_test_points: u32,
    /// Boss placement uses the ring test with this extra margin factor.
    pub boss_margin: f32,
    /// Seconds before the boss trigger during which spawning slows and the
    /// enemy level formula is frozen.
    pub pre_boss_window_s: f32,
    /// Interval multiplier inside the pre-boss window (>1 slows spawning).
    pub pre_boss_stretch: f32,
    pub boss_timer_s: f32,
    /// Fraction of alive mobs culled when the boss spawns, picked uniformly
    /// in this range.
    pub boss_cull_fraction: (f32, f32),
    /// Post-boss spawn freeze, seconds, picked uniformly in this range at
    /// boss spawn time.
    pub post_boss_freeze_s: (f32, f32),
    /// Enemies farther than this from the player are force-killed while
    /// population exceeds `leash_cull_threshold` of cap.
    pub leash_distance: f32,
    pub leash_cull_threshold: f32,
    pub level: LevelCfg,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval_s: 3.0,
            interval_decay_per_min_s: 0.25,
            min_interval_s: 0.5,
            batch_minutes: vec![0.0, 2.0, 4.0, 6.0, 8.0],
            batch_sizes: vec![3, 4, 5, 6, 8],
            population_cap: 300,
            spawn_radius: 400.0,
            spawn_retries: 30,
            ring_test_points: 8,
            boss_margin: 2.0,
            pre_boss_window_s: 30.0,
            pre_boss_stretch: 2.0,
            boss_timer_s: 300.0,
            boss_cull_fraction: (0.6, 0.8),
            post_boss_freeze_s: (5.0, 8.0),
            leash_distance: 1600.0,
            leash_cull_threshold: 0.7,
            level: LevelCfg {
                base: 1,
                per_floor: 2,
                per_minute: 0.5,
                jitter_chance: 0.3,
                max: 99,
            },
        }
    }
}

impl SpawnTuning {
    pub fn load_default() -> Result<Self> {
        let path = crate::data_root().join("config/spawn.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let t: Self = toml::from_str(&txt).context("parse spawn TOML")?;
            Ok(t)
        } else {
            Ok(Self::default())
        }
    }

    /// Batch size for the given elapsed time (step function of minutes).
    pub fn batch_size(&self, elapsed_s: f32) -> usize {
        let minutes = elapsed_s / 60.0;
        let mut size = *self.batch_sizes.first().unwrap_or(&3);
        for (m, s) in self.batch_minutes.iter().zip(&self.batch_sizes) {
            if minutes >= *m {
                size = *s;
            }
        }
        size
    }

    /// Current spawn interval, including the pre-boss stretch.
    pub fn interval(&self, elapsed_s: f32, boss_timer_remaining: f32) -> f32 {
        let minutes = elapsed_s / 60.0;
        let mut iv = (self.base_interval_s - minutes * self.interval_decay_per_min_s)
            .max(self.min_interval_s);
        if boss_timer_remaining > 0.0 && boss_timer_remaining <= self.pre_boss_window_s {
            iv *= self.pre_boss_stretch;
        }
        iv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_decays_to_floor() {
        let t = SpawnTuning::default();
        assert!(t.interval(0.0, 1000.0) > t.interval(300.0, 1000.0));
        // Far past the decay horizon the floor holds.
        assert_eq!(t.interval(36_000.0, 1000.0), t.min_interval_s);
    }

    #[test]
    fn interval_stretched_in_pre_boss_window() {
        let t = SpawnTuning::default();
        let normal = t.interval(60.0, 120.0);
        let stretched = t.interval(60.0, 20.0);
        assert!((stretched / normal - t.pre_boss_stretch).abs() < 1e-5);
    }

    #[test]
    fn batch_size_steps_up() {
        let t = SpawnTuning::default();
        assert_eq!(t.batch_size(0.0), 3);
        assert_eq!(t.batch_size(3.0 * 60.0), 4);
        assert_eq!(t.batch_size(9.0 * 60.0), 8);
    }
}
