//! Actor types and the enemy store: stable ids, clamped health, the
//! player, enemies and projectiles mutated by the tick systems.

use std::collections::HashSet;

use collision_static::Rect;
use data_runtime::player::PlayerCfg;
use data_runtime::species::{AttackKind, SpeciesSpec};
use data_runtime::status::Element;
use glam::Vec2;

use crate::status::StatusEffect;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnemyId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectileId(pub u32);

#[derive(Copy, Clone, Debug)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    #[inline]
    pub fn new(max: i32) -> Self {
        Self { hp: max, max }
    }
    #[inline]
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
    /// Apply damage (or healing when negative), clamped to `[0, max]`.
    #[inline]
    pub fn apply(&mut self, amount: i32) {
        self.hp = (self.hp - amount).clamp(0, self.max);
    }
}

/// Session-scoped upgrade multipliers stacked on the player's base stats.
#[derive(Clone, Debug)]
pub struct UpgradeSet {
    pub damage: f32,
    pub attack_speed: f32,
    pub range: f32,
    pub move_speed: f32,
    pub knockback: f32,
    pub crit_chance_add: f64,
    pub crit_damage_add: f32,
}

impl Default for UpgradeSet {
    fn default() -> Self {
        Self {
            damage: 1.0,
            attack_speed: 1.0,
            range: 1.0,
            move_speed: 1.0,
            knockback: 1.0,
            crit_chance_add: 0.0,
            crit_damage_add: 0.0,
        }
    }
}

/// An unlocked spell with its own cooldown, independent of the primary
/// attack cooldown.
#[derive(Clone, Debug)]
pub struct SpellSlot {
    pub action: String,
    pub cooldown: f32,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: Health,
    pub base: PlayerCfg,
    pub upgrades: UpgradeSet,
    pub spells: Vec<SpellSlot>,
    pub attack_cd: f32,
    pub invuln: f32,
    pub knockback_vel: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, cfg: PlayerCfg) -> Self {
        let spells = cfg
            .spells
            .iter()
            .map(|a| SpellSlot {
                action: a.clone(),
                cooldown: 0.0,
            })
            .collect();
        Self {
            pos,
            vel: Vec2::ZERO,
            hp: Health::new(cfg.max_hp),
            base: cfg,
            upgrades: UpgradeSet::default(),
            spells,
            attack_cd: 0.0,
            invuln: 0.0,
            knockback_vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn damage(&self) -> i32 {
        (self.base.damage as f32 * self.upgrades.damage).round() as i32
    }
    #[inline]
    pub fn move_speed(&self) -> f32 {
        self.base.speed * self.upgrades.move_speed
    }
    #[inline]
    pub fn attack_interval(&self) -> f32 {
        1.0 / (self.base.attack_speed * self.upgrades.attack_speed).max(0.01)
    }
    #[inline]
    pub fn crit_chance(&self) -> f64 {
        (self.base.crit_chance + self.upgrades.crit_chance_add).clamp(0.0, 1.0)
    }
    #[inline]
    pub fn crit_damage(&self) -> f32 {
        self.base.crit_damage + self.upgrades.crit_damage_add
    }
    #[inline]
    pub fn knockback(&self) -> f32 {
        self.base.knockback * self.upgrades.knockback
    }
    #[inline]
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.base.radius))
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub species: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: Health,
    pub level: u32,
    pub radius: f32,
    pub speed: f32,
    pub damage: i32,
    pub attack: AttackKind,
    pub attack_range: f32,
    pub attack_interval: f32,
    pub attack_cd: f32,
    /// Ranged attack-animation revert countdown, advanced by the tick.
    pub attack_anim: f32,
    pub projectile_speed: f32,
    pub knockback_vel: Vec2,
    pub status: Option<StatusEffect>,
    /// Whether this enemy leads melee pursuit with a predicted intercept.
    /// Rolled once at construction.
    pub anticipates: bool,
    pub is_boss: bool,
    /// Killed by leash/boss culling; consumers skip loot for these deaths.
    pub no_loot: bool,
}

impl Enemy {
    /// Build a leveled enemy from its species baseline. HP and damage grow
    /// fractionally per level above 1.
    pub fn from_species(
        id: EnemyId,
        species: &str,
        spec: &SpeciesSpec,
        level: u32,
        pos: Vec2,
        anticipates: bool,
        is_boss: bool,
    ) -> Self {
        let growth = (level.saturating_sub(1)) as f32;
        let hp = (spec.hp as f32 * (1.0 + spec.hp_per_level * growth)).round() as i32;
        let damage = (spec.damage as f32 * (1.0 + spec.damage_per_level * growth)).round() as i32;
        Self {
            id,
            species: species.to_string(),
            pos,
            vel: Vec2::ZERO,
            hp: Health::new(hp.max(1)),
            level,
            radius: spec.radius,
            speed: spec.speed,
            damage,
            attack: spec.attack,
            attack_range: spec.attack_range,
            attack_interval: spec.attack_cooldown_s,
            attack_cd: 0.0,
            attack_anim: 0.0,
            projectile_speed: spec.projectile_speed,
            knockback_vel: Vec2::ZERO,
            status: None,
            anticipates,
            is_boss,
            no_loot: false,
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.hp.alive()
    }

    #[inline]
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.radius))
    }

    /// Movement speed after the current status effect's factor.
    #[inline]
    pub fn effective_speed(&self) -> f32 {
        self.speed * crate::status::speed_factor(&self.status)
    }
}

/// Enemy collection with stable spawn-order iteration. Dead enemies stay
/// in place until end-of-tick cleanup so in-flight resolution is never
/// perturbed.
#[derive(Default, Debug)]
pub struct EnemyStore {
    next_id: u32,
    pub enemies: Vec<Enemy>,
}

impl EnemyStore {
    pub fn alloc_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn push(&mut self, e: Enemy) -> EnemyId {
        let id = e.id;
        self.enemies.push(e);
        id
    }

    #[inline]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
    #[inline]
    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive()).count()
    }

    /// Snapshot of alive ids in spawn order, taken before a mutating pass.
    pub fn alive_ids(&self) -> Vec<EnemyId> {
        self.enemies
            .iter()
            .filter(|e| e.alive())
            .map(|e| e.id)
            .collect()
    }

    pub fn remove_dead(&mut self) {
        self.enemies.retain(|e| e.alive());
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProjOwner {
    Player,
    Enemy(EnemyId),
}

#[derive(Clone, Copy, Debug)]
pub struct PierceState {
    pub max_hits: u32,
    pub reduction_per_hit: f32,
    pub hits_done: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct BounceState {
    pub max_bounces: u32,
    pub detect_radius: f32,
    pub bounces_done: u32,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner: ProjOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub traveled: f32,
    pub max_range: f32,
    /// Authoritative pre-pierce damage; every hit computes from this.
    pub base_damage: i32,
    pub knockback: f32,
    /// Attacker crit stats snapshotted at creation.
    pub crit_chance: f64,
    pub crit_damage: f32,
    pub element: Element,
    pub aoe_radius: Option<f32>,
    pub pierce: Option<PierceState>,
    pub bounce: Option<BounceState>,
    /// Enemies this projectile instance has already damaged.
    pub hit_set: HashSet<EnemyId>,
    pub exploded: bool,
    pub alive: bool,
}

impl Projectile {
    /// Pierce damage multiplier for the next hit, recomputed fresh from
    /// the hit count, floored at 0.2. 1.0 for non-piercing projectiles.
    #[inline]
    pub fn pierce_multiplier(&self) -> f32 {
        match self.pierce {
            Some(p) => (1.0 - p.hits_done as f32 * p.reduction_per_hit).max(0.2),
            None => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_clamps_both_ends() {
        let mut h = Health::new(30);
        h.apply(40);
        assert_eq!(h.hp, 0);
        assert!(!h.alive());
        h.apply(-100);
        assert_eq!(h.hp, 30);
    }

    #[test]
    fn level_scaling_grows_hp_and_damage() {
        let db = data_runtime::species::SpeciesDb::builtin();
        let spec = db.get("walker").unwrap();
        let l1 = Enemy::from_species(EnemyId(0), "walker", spec, 1, Vec2::ZERO, false, false);
        let l5 = Enemy::from_species(EnemyId(1), "walker", spec, 5, Vec2::ZERO, false, false);
        assert!(l5.hp.max > l1.hp.max);
        assert!(l5.damage > l1.damage);
    }

    #[test]
    fn pierce_multiplier_floors_at_point_two() {
        let mut p = Projectile {
            id: ProjectileId(0),
            owner: ProjOwner::Player,
            pos: Vec2::ZERO,
            vel: Vec2::X,
            traveled: 0.0,
            max_range: 100.0,
            base_damage: 10,
            knockback: 0.0,
            crit_chance: 0.0,
            crit_damage: 2.0,
            element: Element::Neutral,
            aoe_radius: None,
            pierce: Some(PierceState {
                max_hits: 0,
                reduction_per_hit: 0.3,
                hits_done: 0,
            }),
            bounce: None,
            hit_set: HashSet::new(),
            exploded: false,
            alive: true,
        };
        let mut last = f32::INFINITY;
        for hits in 0..10 {
            p.pierce.as_mut().unwrap().hits_done = hits;
            let m = p.pierce_multiplier();
            assert!(m <= last, "multiplier must be non-increasing");
            assert!(m >= 0.2);
            last = m;
        }
        assert_eq!(last, 0.2);
    }
}
