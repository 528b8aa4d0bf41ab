//! Boss attack-cycle tuning: charge durations, cooldowns and the special
//! explosion shape.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BossTuning {
    /// Ranged cycle: wind-up before a single shot at the player's
    /// then-current position.
    pub ranged_charge_s: f32,
    pub ranged_cooldown_s: f32,
    /// Special cycle: wind-up, then a lump damage check against the
    /// explosion radius, then a cosmetic shock recovery.
    pub special_charge_s: f32,
    pub special_cooldown_s: f32,
    pub special_radius: f32,
    /// Lump damage = boss damage x this multiplier.
    pub special_damage_mult: f32,
    pub shock_s: f32,
    /// The special cycle only starts while the player is within this
    /// factor of the explosion radius.
    pub special_trigger_factor: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            ranged_charge_s: 1.2,
            ranged_cooldown_s: 3.0,
            special_charge_s: 2.0,
            special_cooldown_s: 8.0,
            special_radius: 220.0,
            special_damage_mult: 2.5,
            shock_s: 1.0,
            special_trigger_factor: 1.5,
        }
    }
}

impl BossTuning {
    pub fn load_default() -> Result<Self> {
        let path = crate::data_root().join("config/boss.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let t: Self = toml::from_str(&txt).context("parse boss TOML")?;
            Ok(t)
        } else {
            Ok(Self::default())
        }
    }
}
