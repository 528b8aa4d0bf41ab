//! Status-effect table: per-kind durations, tick intervals and magnitudes,
//! plus the fixed element -> effect mapping used by on-hit procs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Neutral,
    Fire,
    Venom,
    Ice,
    Water,
    Shock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Burn,
    Poison,
    Slow,
    Stun,
    Wet,
    Freeze,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusSpec {
    pub duration_s: f32,
    /// Periodic-damage interval; `None` for purely modal effects
    /// (slow/wet/freeze/stun).
    pub tick_interval_s: Option<f32>,
    /// Damage per tick for burn/poison; speed multiplier for
    /// slow/wet/freeze; unused for stun.
    pub magnitude: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProcSpec {
    pub effect: StatusKind,
    pub chance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusTable {
    pub effects: HashMap<StatusKind, StatusSpec>,
    /// Element -> proc. Elements absent from the map never proc.
    pub procs: HashMap<Element, ProcSpec>,
}

impl StatusTable {
    pub fn load_default() -> Result<Self> {
        let path = crate::data_root().join("config/status.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let t: Self = toml::from_str(&txt).context("parse status TOML")?;
            Ok(t)
        } else {
            Ok(Self::builtin())
        }
    }

    pub fn builtin() -> Self {
        let mut effects = HashMap::new();
        effects.insert(
            StatusKind::Burn,
            StatusSpec {
                duration_s: 3.0,
                tick_interval_s: Some(0.5),
                magnitude: 4.0,
            },
        );
        effects.insert(
            StatusKind::Poison,
            StatusSpec {
                duration_s: 5.0,
                tick_interval_s: Some(0.8),
                magnitude: 3.0,
            },
        );
        effects.insert(
            StatusKind::Slow,
            StatusSpec {
                duration_s: 2.5,
                tick_interval_s: None,
                magnitude: 0.5,
            },
        );
        effects.insert(
            StatusKind::Stun,
            StatusSpec {
                duration_s: 1.0,
                tick_interval_s: None,
                magnitude: 0.0,
            },
        );
        effects.insert(
            StatusKind::Wet,
            StatusSpec {
                duration_s: 4.0,
                tick_interval_s: None,
                magnitude: 0.75,
            },
        );
        effects.insert(
            StatusKind::Freeze,
            StatusSpec {
                duration_s: 1.5,
                tick_interval_s: None,
                magnitude: 0.1,
            },
        );
        let mut procs = HashMap::new();
        procs.insert(
            Element::Fire,
            ProcSpec {
                effect: StatusKind::Burn,
                chance: 0.25,
            },
        );
        procs.insert(
            Element::Venom,
            ProcSpec {
                effect: StatusKind::Poison,
                chance: 0.35,
            },
        );
        procs.insert(
            Element::Ice,
            ProcSpec {
                effect: StatusKind::Freeze,
                chance: 0.2,
            },
        );
        procs.insert(
            Element::Water,
            ProcSpec {
                effect: StatusKind::Wet,
                chance: 0.4,
            },
        );
        procs.insert(
            Element::Shock,
            ProcSpec {
                effect: StatusKind::Stun,
                chance: 0.15,
            },
        );
        Self { effects, procs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_effects_have_tick_intervals() {
        let t = StatusTable::builtin();
        assert!(t.effects[&StatusKind::Burn].tick_interval_s.is_some());
        assert!(t.effects[&StatusKind::Poison].tick_interval_s.is_some());
        assert!(t.effects[&StatusKind::Slow].tick_interval_s.is_none());
    }

    #[test]
    fn neutral_never_procs() {
        let t = StatusTable::builtin();
        assert!(!t.procs.contains_key(&Element::Neutral));
    }
}
