//! Events raised by the tick and drained by presentation/persistence
//! collaborators. The core owns no file or wire format; these are plain
//! in-process values.

use data_runtime::status::{Element, StatusKind};
use glam::Vec2;

use crate::actor::EnemyId;

#[derive(Debug, Clone)]
pub enum SimEvent {
    /// A confirmed hit, for damage-number overlays.
    Damage {
        pos: Vec2,
        amount: i32,
        crit: bool,
        target_player: bool,
    },
    /// An enemy died this tick. `no_loot` marks leash/boss-trigger culls;
    /// consumers skip loot/XP for those.
    Death {
        enemy: EnemyId,
        pos: Vec2,
        species: String,
        level: u32,
        no_loot: bool,
    },
    /// Particle burst request (explosions, hit sparks).
    Particles {
        pos: Vec2,
        count: u32,
        element: Element,
    },
    StatusApplied {
        enemy: EnemyId,
        kind: StatusKind,
    },
    BossSpawned {
        enemy: EnemyId,
    },
    BossDown {
        enemy: EnemyId,
    },
    /// The player died; the session is over once the caller decides so.
    PlayerDown,
}
