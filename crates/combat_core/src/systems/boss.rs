//! Boss attack state machines: a ranged cycle (charge, then one shot at
//! the player's then-current position) and a special explosion cycle
//! (charge, radius-gated lump damage, cosmetic shock recovery). Records
//! are keyed by enemy id in arenas owned by the session, never by object
//! reference, so a dead boss simply drops its entries.

use std::collections::HashMap;

use glam::Vec2;

use crate::actor::EnemyId;
use crate::events::SimEvent;
use crate::geom::within;
use crate::schedule::{Ctx, DamageEvent, DamageTarget};
use crate::SessionState;

#[derive(Debug, Clone, Copy)]
pub struct RangedCycle {
    pub elapsed: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct SpecialCycle {
    pub elapsed: f32,
    pub duration: f32,
    pub exploded: bool,
    pub shock_remaining: f32,
}

/// Per-boss cycle arenas. At most one instance of each cycle per boss;
/// re-trigger attempts while one is active are ignored.
#[derive(Default, Debug)]
pub struct BossDirector {
    ranged: HashMap<EnemyId, RangedCycle>,
    special: HashMap<EnemyId, SpecialCycle>,
    ranged_cd: HashMap<EnemyId, f32>,
    special_cd: HashMap<EnemyId, f32>,
}

impl BossDirector {
    /// Drop every record for a boss (death or session teardown).
    pub fn discard(&mut self, id: EnemyId) {
        self.ranged.remove(&id);
        self.special.remove(&id);
        self.ranged_cd.remove(&id);
        self.special_cd.remove(&id);
    }

    #[cfg(test)]
    pub fn charging_ranged(&self, id: EnemyId) -> bool {
        self.ranged.contains_key(&id)
    }
    #[cfg(test)]
    pub fn charging_special(&self, id: EnemyId) -> bool {
        self.special.contains_key(&id)
    }
}

pub fn boss_director(srv: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    let Some(bid) = srv.boss_id else { return };
    let Some(boss) = srv.enemies.get(bid) else {
        srv.boss.discard(bid);
        return;
    };
    if !boss.alive() {
        // Death mid-cycle discards without firing/exploding.
        srv.boss.discard(bid);
        return;
    }
    let (boss_pos, boss_damage, proj_speed) = (boss.pos, boss.damage, boss.projectile_speed);
    let player_pos = srv.player.pos;
    let t = srv.boss_tuning.clone();

    // Cooldowns gate cycle starts; a running cycle also blocks a restart.
    let rcd = srv.boss.ranged_cd.entry(bid).or_insert(0.0);
    *rcd = (*rcd - dt).max(0.0);
    let start_ranged = *rcd <= 0.0 && !srv.boss.ranged.contains_key(&bid);
    if start_ranged {
        srv.boss.ranged.insert(
            bid,
            RangedCycle {
                elapsed: 0.0,
                duration: t.ranged_charge_s,
            },
        );
    }
    let scd = srv.boss.special_cd.entry(bid).or_insert(0.0);
    *scd = (*scd - dt).max(0.0);
    let player_near = within(
        player_pos,
        boss_pos,
        t.special_radius * t.special_trigger_factor,
    );
    if *scd <= 0.0 && player_near && !srv.boss.special.contains_key(&bid) {
        srv.boss.special.insert(
            bid,
            SpecialCycle {
                elapsed: 0.0,
                duration: t.special_charge_s,
                exploded: false,
                shock_remaining: 0.0,
            },
        );
    }
    debug_assert!(srv.boss.ranged.len() <= 1 && srv.boss.special.len() <= 1);

    // Ranged cycle: fire once at the player's *then-current* position.
    let mut fire_dir: Option<Vec2> = None;
    if let Some(c) = srv.boss.ranged.get_mut(&bid) {
        c.elapsed += dt;
        if c.elapsed >= c.duration {
            fire_dir = Some((player_pos - boss_pos).normalize_or_zero());
        }
    }
    if let Some(dir) = fire_dir {
        srv.boss.ranged.remove(&bid);
        srv.boss.ranged_cd.insert(bid, t.ranged_cooldown_s);
        srv.spawn_enemy_projectile(
            crate::actor::ProjOwner::Enemy(bid),
            boss_pos,
            dir,
            boss_damage,
            proj_speed,
        );
    }

    // Special cycle: the radius gate is evaluated at charge completion,
    // so a player who stepped out during the wind-up takes nothing.
    let mut done = false;
    if let Some(c) = srv.boss.special.get_mut(&bid) {
        if !c.exploded {
            c.elapsed += dt;
            if c.elapsed >= c.duration {
                c.exploded = true;
                c.shock_remaining = t.shock_s;
                if within(player_pos, boss_pos, t.special_radius) {
                    let amount =
                        (boss_damage as f32 * t.special_damage_mult).round() as i32;
                    ctx.dmg.push(DamageEvent {
                        target: DamageTarget::Player,
                        amount,
                        crit: false,
                        pos: player_pos,
                    });
                }
                srv.events.push(SimEvent::Particles {
                    pos: boss_pos,
                    count: (t.special_radius / 8.0) as u32,
                    element: data_runtime::status::Element::Neutral,
                });
            }
        } else {
            c.shock_remaining -= dt;
            if c.shock_remaining <= 0.0 {
                done = true;
            }
        }
    }
    if done {
        srv.boss.special.remove(&bid);
        srv.boss.special_cd.insert(bid, t.special_cooldown_s);
    }
}
