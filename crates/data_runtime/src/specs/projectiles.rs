//! Projectile specifications keyed by attack action name. The player's
//! combat stats scale the damage at spawn; these specs carry the
//! per-variant shape (speed, range, AOE, pierce, bounce, element).

use crate::status::Element;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PierceSpec {
    /// Max enemies hit before deactivation; 0 = unlimited.
    pub max_hits: u32,
    /// Damage multiplier lost per prior hit; floored at 0.2 overall.
    pub reduction_per_hit: f32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BounceSpec {
    pub max_bounces: u32,
    /// Search radius for the next target after a hit.
    pub detect_radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub max_range: f32,
    /// Base damage multiplier against the attacker's damage stat.
    #[serde(default = "default_damage_mult")]
    pub damage_mult: f32,
    #[serde(default = "default_knockback_mult")]
    pub knockback_mult: f32,
    #[serde(default)]
    pub aoe_radius: Option<f32>,
    #[serde(default)]
    pub pierce: Option<PierceSpec>,
    #[serde(default)]
    pub bounce: Option<BounceSpec>,
    #[serde(default = "default_element")]
    pub element: Element,
    /// Spell cooldown; the primary attack uses the player's attack speed
    /// instead.
    #[serde(default)]
    pub cooldown_s: f32,
}

fn default_damage_mult() -> f32 {
    1.0
}
fn default_knockback_mult() -> f32 {
    1.0
}
fn default_element() -> Element {
    Element::Neutral
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectileSpecDb {
    /// Map from action name (e.g., "bolt", "fireball") to spec.
    pub actions: HashMap<String, ProjectileSpec>,
}

impl ProjectileSpecDb {
    pub fn load_default() -> Result<Self> {
        let path = crate::data_root().join("config/projectiles.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let db: Self = toml::from_str(&txt).context("parse projectiles TOML")?;
            Ok(db)
        } else {
            Ok(Self::builtin())
        }
    }

    pub fn builtin() -> Self {
        let mut actions = HashMap::new();
        actions.insert(
            "bolt".to_string(),
            ProjectileSpec {
                speed: 400.0,
                max_range: 900.0,
                damage_mult: 1.0,
                knockback_mult: 1.0,
                aoe_radius: None,
                pierce: None,
                bounce: None,
                element: Element::Neutral,
                cooldown_s: 0.0,
            },
        );
        actions.insert(
            "fireball".to_string(),
            ProjectileSpec {
                speed: 320.0,
                max_range: 800.0,
                damage_mult: 1.4,
                knockback_mult: 1.2,
                aoe_radius: Some(120.0),
                pierce: None,
                bounce: None,
                element: Element::Fire,
                cooldown_s: 4.0,
            },
        );
        actions.insert(
            "lance".to_string(),
            ProjectileSpec {
                speed: 500.0,
                max_range: 1000.0,
                damage_mult: 1.1,
                knockback_mult: 0.8,
                aoe_radius: None,
                pierce: Some(PierceSpec {
                    max_hits: 3,
                    reduction_per_hit: 0.2,
                }),
                bounce: None,
                element: Element::Neutral,
                cooldown_s: 3.0,
            },
        );
        actions.insert(
            "chain_spark".to_string(),
            ProjectileSpec {
                speed: 420.0,
                max_range: 900.0,
                damage_mult: 0.9,
                knockback_mult: 0.6,
                aoe_radius: None,
                pierce: None,
                bounce: Some(BounceSpec {
                    max_bounces: 3,
                    detect_radius: 260.0,
                }),
                element: Element::Shock,
                cooldown_s: 5.0,
            },
        );
        // Enemy shots are always simple: no AOE/pierce/bounce.
        actions.insert(
            "spit".to_string(),
            ProjectileSpec {
                speed: 300.0,
                max_range: 700.0,
                damage_mult: 1.0,
                knockback_mult: 0.5,
                aoe_radius: None,
                pierce: None,
                bounce: None,
                element: Element::Neutral,
                cooldown_s: 0.0,
            },
        );
        Self { actions }
    }

    pub fn get(&self, action: &str) -> Option<&ProjectileSpec> {
        self.actions.get(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_variants_cover_branches() {
        let db = ProjectileSpecDb::builtin();
        assert!(db.get("fireball").unwrap().aoe_radius.is_some());
        assert!(db.get("lance").unwrap().pierce.is_some());
        assert!(db.get("chain_spark").unwrap().bounce.is_some());
        let spit = db.get("spit").unwrap();
        assert!(spit.aoe_radius.is_none() && spit.pierce.is_none() && spit.bounce.is_none());
    }
}
