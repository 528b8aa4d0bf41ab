//! combat_core: authoritative horde-battle simulation.
//!
//! One `SessionState` owns the full battle: the player, the enemy store,
//! in-flight projectiles, static map geometry and a seeded RNG. `step`
//! advances the world by a variable delta through a fixed-order schedule
//! (spawning, statuses, movement, attacks, projectiles, the boss
//! director, then damage application and cleanup) and raises `SimEvent`s
//! for presentation/persistence collaborators to drain. The core is
//! single-threaded and deterministic for a given seed and input stream.

pub mod actor;
pub mod events;
pub mod geom;
pub mod schedule;
pub mod status;
pub mod systems;
pub mod telemetry;

use anyhow::Result;
use collision_static::{Rect, StaticIndex};
use data_runtime::boss::BossTuning;
use data_runtime::player::PlayerCfg;
use data_runtime::spawn::SpawnTuning;
use data_runtime::species::SpeciesDb;
use data_runtime::specs::projectiles::ProjectileSpecDb;
use data_runtime::status::StatusTable;
use data_runtime::zone::{RectCfg, ZoneCfg};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub use actor::{Enemy, EnemyId, Health, Player, ProjOwner, Projectile, ProjectileId};
pub use events::SimEvent;
pub use schedule::{Ctx, Schedule};
use systems::boss::BossDirector;
use systems::spawn::SpawnState;

/// Knockback impulse base for enemy shots hitting the player.
const ENEMY_SHOT_KNOCKBACK: f32 = 120.0;
/// Upper clamp on a single simulation step (long stalls don't teleport
/// projectiles through hitboxes).
const MAX_STEP_S: f32 = 0.1;

/// Per-tick player intent, supplied by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerInput {
    pub move_dir: Vec2,
    /// World-space aim point for attacks and spells.
    pub aim: Vec2,
    pub attack: bool,
}

/// Immutable data bundle a session is built from.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub zone: ZoneCfg,
    pub species: SpeciesDb,
    pub tuning: SpawnTuning,
    pub boss_tuning: BossTuning,
    pub projectiles: ProjectileSpecDb,
    pub status: StatusTable,
    pub player: PlayerCfg,
}

impl SessionConfig {
    /// Coded defaults only; used by tests and as the loader fallback.
    pub fn builtin() -> Self {
        Self {
            zone: ZoneCfg::builtin(),
            species: SpeciesDb::builtin(),
            tuning: SpawnTuning::default(),
            boss_tuning: BossTuning::default(),
            projectiles: ProjectileSpecDb::builtin(),
            status: StatusTable::builtin(),
            player: PlayerCfg::default(),
        }
    }

    /// Load from `data/` where present, falling back per table.
    pub fn load_default() -> Result<Self> {
        Ok(Self {
            zone: ZoneCfg::load_default()?,
            species: SpeciesDb::load_default()?,
            tuning: SpawnTuning::load_default()?,
            boss_tuning: BossTuning::load_default()?,
            projectiles: ProjectileSpecDb::load_default()?,
            status: StatusTable::load_default()?,
            player: PlayerCfg::load_default()?,
        })
    }
}

/// Boss HUD snapshot.
#[derive(Clone, Debug)]
pub struct BossStatus {
    pub species: String,
    pub hp: i32,
    pub max_hp: i32,
    pub pos: Vec2,
}

fn rect_from_cfg(r: &RectCfg) -> Rect {
    Rect::new(Vec2::from_array(r.min), Vec2::from_array(r.max))
}

pub struct SessionState {
    pub player: Player,
    pub enemies: actor::EnemyStore,
    pub projectiles: Vec<Projectile>,
    next_proj_id: u32,
    pub statics: StaticIndex,
    pub zone: ZoneCfg,
    pub species: SpeciesDb,
    pub tuning: SpawnTuning,
    pub boss_tuning: BossTuning,
    pub proj_specs: ProjectileSpecDb,
    pub status_table: StatusTable,
    pub spawn: SpawnState,
    pub boss: BossDirector,
    pub boss_id: Option<EnemyId>,
    pub rng: SmallRng,
    pub input: PlayerInput,
    pub events: Vec<SimEvent>,
}

impl SessionState {
    /// Build a session from config. The player starts at the map center;
    /// static geometry is fixed for the battle's lifetime.
    pub fn new(seed: u64, cfg: SessionConfig) -> Self {
        let bounds = rect_from_cfg(&cfg.zone.bounds);
        let blockers = cfg.zone.blockers.iter().map(rect_from_cfg).collect();
        let statics = StaticIndex::new(bounds, blockers);
        let player = Player::new(bounds.center(), cfg.player);
        let spawn = SpawnState::new(cfg.tuning.boss_timer_s);
        Self {
            player,
            enemies: actor::EnemyStore::default(),
            projectiles: Vec::new(),
            next_proj_id: 0,
            statics,
            zone: cfg.zone,
            species: cfg.species,
            tuning: cfg.tuning,
            boss_tuning: cfg.boss_tuning,
            proj_specs: cfg.projectiles,
            status_table: cfg.status,
            spawn,
            boss: BossDirector::default(),
            boss_id: None,
            rng: SmallRng::seed_from_u64(seed),
            input: PlayerInput::default(),
            events: Vec::new(),
        }
    }

    /// Advance the battle by `dt` seconds under the given input. Runs the
    /// full fixed-order schedule once; degraded sub-steps (failed spawn
    /// placement, missing specs) log and skip rather than abort the tick.
    pub fn step(&mut self, dt: f32, input: PlayerInput) {
        if dt <= 0.0 {
            return;
        }
        let started = std::time::Instant::now();
        self.input = input;
        let mut ctx = Ctx::new(dt.min(MAX_STEP_S));
        Schedule::run(self, &mut ctx);
        debug_assert!(ctx.dmg.is_empty(), "damage bus drained by apply_damage");
        metrics::histogram!("sim.tick_ms").record(started.elapsed().as_secs_f64() * 1000.0);
    }

    fn alloc_proj_id(&mut self) -> ProjectileId {
        let id = ProjectileId(self.next_proj_id);
        self.next_proj_id = self.next_proj_id.wrapping_add(1);
        id
    }

    /// Spawn a player projectile for a named action, aimed at a world
    /// point. Damage, crit and knockback are snapshotted from the player's
    /// current stats; an unknown action logs and spawns nothing.
    pub fn spawn_player_projectile(&mut self, action: &str, aim: Vec2) -> Option<ProjectileId> {
        let Some(spec) = self.proj_specs.get(action).cloned() else {
            log::warn!("unknown projectile action {action:?}");
            return None;
        };
        let from = self.player.pos;
        let mut dir = (aim - from).normalize_or_zero();
        if dir == Vec2::ZERO {
            dir = Vec2::X;
        }
        let base_damage = (self.player.damage() as f32 * spec.damage_mult).round() as i32;
        let id = self.alloc_proj_id();
        self.projectiles.push(Projectile {
            id,
            owner: ProjOwner::Player,
            pos: from,
            vel: dir * spec.speed,
            traveled: 0.0,
            max_range: spec.max_range * self.player.upgrades.range,
            base_damage,
            knockback: self.player.knockback() * spec.knockback_mult,
            crit_chance: self.player.crit_chance(),
            crit_damage: self.player.crit_damage(),
            element: spec.element,
            aoe_radius: spec.aoe_radius,
            pierce: spec.pierce.map(|p| actor::PierceState {
                max_hits: p.max_hits,
                reduction_per_hit: p.reduction_per_hit,
                hits_done: 0,
            }),
            bounce: spec.bounce.map(|b| actor::BounceState {
                max_bounces: b.max_bounces,
                detect_radius: b.detect_radius,
                bounces_done: 0,
            }),
            hit_set: std::collections::HashSet::new(),
            exploded: false,
            alive: true,
        });
        Some(id)
    }

    /// Spawn a simple enemy shot (no AOE/pierce/bounce). Range and
    /// knockback shape come from the shared "spit" spec.
    pub fn spawn_enemy_projectile(
        &mut self,
        owner: ProjOwner,
        from: Vec2,
        dir: Vec2,
        damage: i32,
        speed: f32,
    ) -> ProjectileId {
        let (max_range, knock_mult) = self
            .proj_specs
            .get("spit")
            .map(|s| (s.max_range, s.knockback_mult))
            .unwrap_or((700.0, 0.5));
        let id = self.alloc_proj_id();
        self.projectiles.push(Projectile {
            id,
            owner,
            pos: from,
            vel: dir.normalize_or_zero() * speed,
            traveled: 0.0,
            max_range,
            base_damage: damage,
            knockback: ENEMY_SHOT_KNOCKBACK * knock_mult,
            crit_chance: 0.0,
            crit_damage: 1.0,
            element: data_runtime::status::Element::Neutral,
            aoe_radius: None,
            pierce: None,
            bounce: None,
            hit_set: std::collections::HashSet::new(),
            exploded: false,
            alive: true,
        });
        id
    }

    /// Cast an unlocked spell at a world-space aim point. `None` when the
    /// spell is not unlocked or still cooling down.
    pub fn cast_spell(&mut self, action: &str, aim: Vec2) -> Option<ProjectileId> {
        if !self.player.hp.alive() {
            return None;
        }
        let slot = self
            .player
            .spells
            .iter()
            .position(|s| s.action == action && s.cooldown <= 0.0)?;
        let cooldown = self.proj_specs.get(action).map(|s| s.cooldown_s)?;
        let id = self.spawn_player_projectile(action, aim)?;
        self.player.spells[slot].cooldown = cooldown;
        Some(id)
    }

    /// Take this tick's events, leaving the buffer empty.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seconds until the boss trigger; zero once triggered.
    pub fn boss_timer_remaining(&self) -> f32 {
        if self.spawn.boss_spawned {
            0.0
        } else {
            self.spawn.boss_timer_remaining.max(0.0)
        }
    }

    /// HUD snapshot of the current boss, if one is alive.
    pub fn boss_status(&self) -> Option<BossStatus> {
        let id = self.boss_id?;
        let b = self.enemies.get(id)?;
        if !b.alive() {
            return None;
        }
        Some(BossStatus {
            species: b.species.clone(),
            hp: b.hp.hp,
            max_hp: b.hp.max,
            pos: b.pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_starts_empty_at_map_center() {
        let s = SessionState::new(1, SessionConfig::builtin());
        assert_eq!(s.enemies.alive_count(), 0);
        assert!(s.projectiles.is_empty());
        let c = s.statics.bounds.center();
        assert_eq!(s.player.pos, c);
        assert!(s.boss_timer_remaining() > 0.0);
    }

    #[test]
    fn primary_projectile_snapshots_player_damage() {
        let mut s = SessionState::new(1, SessionConfig::builtin());
        s.player.upgrades.damage = 2.0;
        let aim = s.player.pos + Vec2::X * 100.0;
        let id = s.spawn_player_projectile("bolt", aim).expect("bolt spec");
        let p = s.projectiles.iter().find(|p| p.id == id).unwrap();
        assert_eq!(p.base_damage, s.player.damage());
        // A later upgrade must not retroactively change in-flight shots.
        let frozen = p.base_damage;
        s.player.upgrades.damage = 4.0;
        assert_eq!(s.projectiles[0].base_damage, frozen);
    }

    #[test]
    fn spell_cooldown_gates_recast() {
        let mut s = SessionState::new(1, SessionConfig::builtin());
        let aim = s.player.pos + Vec2::X * 200.0;
        assert!(s.cast_spell("fireball", aim).is_some());
        assert!(
            s.cast_spell("fireball", aim).is_none(),
            "still cooling down"
        );
        assert!(s.cast_spell("not_a_spell", aim).is_none());
    }

    #[test]
    fn cast_uses_the_aim_it_was_given() {
        let mut s = SessionState::new(1, SessionConfig::builtin());
        // A stale aim left over from the last tick must not leak in.
        s.input.aim = s.player.pos + Vec2::Y * 500.0;
        let aim = s.player.pos + Vec2::X * 500.0;
        let id = s.cast_spell("lance", aim).expect("lance unlocked");
        let p = s.projectiles.iter().find(|p| p.id == id).unwrap();
        assert!(p.vel.x > 0.0 && p.vel.y.abs() < 1e-4);
    }

    #[test]
    fn zero_or_negative_dt_is_a_no_op() {
        let mut s = SessionState::new(1, SessionConfig::builtin());
        s.step(0.0, PlayerInput::default());
        s.step(-1.0, PlayerInput::default());
        assert!(s.drain_events().is_empty());
        assert_eq!(s.spawn.elapsed_s, 0.0);
    }
}
