//! Per-species enemy base stats. Level scaling happens in the spawn
//! director; this crate only carries the level-1 baseline and per-level
//! growth rates.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesSpec {
    pub hp: i32,
    pub damage: i32,
    /// Movement speed in units/s.
    pub speed: f32,
    /// Hitbox half-extent.
    pub radius: f32,
    pub attack: AttackKind,
    /// Distance at which this species starts attacking.
    pub attack_range: f32,
    pub attack_cooldown_s: f32,
    /// Fractional HP/damage growth per level above 1.
    #[serde(default = "default_hp_growth")]
    pub hp_per_level: f32,
    #[serde(default = "default_damage_growth")]
    pub damage_per_level: f32,
    /// Projectile speed for ranged species; ignored for melee.
    #[serde(default = "default_projectile_speed")]
    pub projectile_speed: f32,
}

fn default_hp_growth() -> f32 {
    0.25
}
fn default_damage_growth() -> f32 {
    0.12
}
fn default_projectile_speed() -> f32 {
    300.0
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesDb {
    pub species: HashMap<String, SpeciesSpec>,
}

impl SpeciesDb {
    pub fn load_default() -> Result<Self> {
        let path = crate::data_root().join("config/species.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let db: Self = toml::from_str(&txt).context("parse species TOML")?;
            Ok(db)
        } else {
            Ok(Self::builtin())
        }
    }

    /// Coded defaults used when no data file is shipped.
    pub fn builtin() -> Self {
        let mut species = HashMap::new();
        species.insert(
            "walker".to_string(),
            SpeciesSpec {
                hp: 30,
                damage: 8,
                speed: 120.0,
                radius: 20.0,
                attack: AttackKind::Melee,
                attack_range: 48.0,
                attack_cooldown_s: 1.2,
                hp_per_level: 0.25,
                damage_per_level: 0.12,
                projectile_speed: 0.0,
            },
        );
        species.insert(
            "spitter".to_string(),
            SpeciesSpec {
                hp: 22,
                damage: 6,
                speed: 100.0,
                radius: 18.0,
                attack: AttackKind::Ranged,
                attack_range: 420.0,
                attack_cooldown_s: 2.0,
                hp_per_level: 0.2,
                damage_per_level: 0.1,
                projectile_speed: 300.0,
            },
        );
        species.insert(
            "brute".to_string(),
            SpeciesSpec {
                hp: 90,
                damage: 16,
                speed: 80.0,
                radius: 30.0,
                attack: AttackKind::Melee,
                attack_range: 64.0,
                attack_cooldown_s: 1.8,
                hp_per_level: 0.3,
                damage_per_level: 0.15,
                projectile_speed: 0.0,
            },
        );
        species.insert(
            "grave_tyrant".to_string(),
            SpeciesSpec {
                hp: 1200,
                damage: 24,
                speed: 70.0,
                radius: 48.0,
                attack: AttackKind::Ranged,
                attack_range: 700.0,
                attack_cooldown_s: 2.5,
                hp_per_level: 0.2,
                damage_per_level: 0.1,
                projectile_speed: 340.0,
            },
        );
        Self { species }
    }

    pub fn get(&self, name: &str) -> Option<&SpeciesSpec> {
        self.species.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_melee_and_ranged() {
        let db = SpeciesDb::builtin();
        assert_eq!(db.get("walker").unwrap().attack, AttackKind::Melee);
        assert_eq!(db.get("spitter").unwrap().attack, AttackKind::Ranged);
        assert!(db.get("spitter").unwrap().projectile_speed > 0.0);
    }

    #[test]
    fn load_default_never_fails_without_files() {
        let db = SpeciesDb::load_default().expect("load");
        assert!(!db.species.is_empty());
    }
}
