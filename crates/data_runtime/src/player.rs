//! Player baseline combat stats. Upgrade multipliers applied on top of
//! these are session state, not data.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCfg {
    pub max_hp: i32,
    pub speed: f32,
    /// Hitbox half-extent.
    pub radius: f32,
    pub damage: i32,
    /// Primary attacks per second.
    pub attack_speed: f32,
    pub attack_range: f32,
    pub crit_chance: f64,
    pub crit_damage: f32,
    pub knockback: f32,
    pub invuln_s: f32,
    /// Enemy-repulsion steering.
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    /// Spells unlocked at session start.
    #[serde(default)]
    pub spells: Vec<String>,
}

impl Default for PlayerCfg {
    fn default() -> Self {
        Self {
            max_hp: 100,
            speed: 200.0,
            radius: 24.0,
            damage: 10,
            attack_speed: 1.0,
            attack_range: 900.0,
            crit_chance: 0.1,
            crit_damage: 2.0,
            knockback: 160.0,
            invuln_s: 0.5,
            repulsion_radius: 60.0,
            repulsion_strength: 40.0,
            spells: vec![
                "fireball".to_string(),
                "lance".to_string(),
                "chain_spark".to_string(),
            ],
        }
    }
}

impl PlayerCfg {
    pub fn load_default() -> Result<Self> {
        let path = crate::data_root().join("config/player.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let c: Self = toml::from_str(&txt).context("parse player TOML")?;
            Ok(c)
        } else {
            Ok(Self::default())
        }
    }
}
