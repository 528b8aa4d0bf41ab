//! Zone (battle map) data: bounds, static blockers, the weighted enemy
//! pool, floor number and the boss species for the encounter.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RectCfg {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolEntry {
    pub species: String,
    pub weight: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneCfg {
    pub name: String,
    pub floor: u32,
    pub bounds: RectCfg,
    #[serde(default)]
    pub blockers: Vec<RectCfg>,
    /// Weighted spawn pool; an empty pool yields no spawns (not an error).
    #[serde(default)]
    pub pool: Vec<PoolEntry>,
    pub boss_species: String,
}

impl ZoneCfg {
    pub fn load(name: &str) -> Result<Self> {
        let path = crate::data_root().join(format!("zones/{name}.toml"));
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let z: Self = toml::from_str(&txt).context("parse zone TOML")?;
            Ok(z)
        } else {
            Ok(Self::builtin())
        }
    }

    pub fn load_default() -> Result<Self> {
        Self::load("barrow_fields")
    }

    pub fn builtin() -> Self {
        Self {
            name: "barrow_fields".to_string(),
            floor: 1,
            bounds: RectCfg {
                min: [0.0, 0.0],
                max: [4096.0, 4096.0],
            },
            blockers: vec![
                RectCfg {
                    min: [1800.0, 1800.0],
                    max: [2000.0, 2296.0],
                },
                RectCfg {
                    min: [600.0, 3000.0],
                    max: [1100.0, 3120.0],
                },
            ],
            pool: vec![
                PoolEntry {
                    species: "walker".to_string(),
                    weight: 6.0,
                },
                PoolEntry {
                    species: "spitter".to_string(),
                    weight: 3.0,
                },
                PoolEntry {
                    species: "brute".to_string(),
                    weight: 1.0,
                },
            ],
            boss_species: "grave_tyrant".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pool_weights_positive() {
        let z = ZoneCfg::builtin();
        assert!(z.pool.iter().all(|e| e.weight > 0.0));
        assert!(!z.boss_species.is_empty());
    }
}
