//! Projectile resolver: integration, direct hits, and the crit / pierce /
//! AOE / bounce / status branches. One direct hit per projectile per tick,
//! resolved in stable spawn order against a snapshot of the alive list.

use glam::Vec2;
use rand::Rng;

use crate::actor::{EnemyId, ProjOwner};
use crate::events::SimEvent;
use crate::geom::within;
use crate::schedule::{Ctx, DamageEvent, DamageTarget};
use crate::status::StatusEffect;
use crate::SessionState;

/// Knockback multiplier against bosses.
const BOSS_KNOCKBACK_FACTOR: f32 = 0.2;
/// Particle count for hits without an AOE radius.
const HIT_PARTICLES: u32 = 6;

pub fn player_projectiles(srv: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    let ids = srv.enemies.alive_ids();
    for pi in 0..srv.projectiles.len() {
        if srv.projectiles[pi].owner != ProjOwner::Player || !srv.projectiles[pi].alive {
            continue;
        }
        integrate(srv, pi, dt);
        if !srv.projectiles[pi].alive {
            continue;
        }

        // Direct hit: first alive enemy, in spawn order, not already in
        // the hit set, whose hitbox contains the projectile point.
        let pos = srv.projectiles[pi].pos;
        let mut direct = None;
        for &id in &ids {
            if srv.projectiles[pi].hit_set.contains(&id) {
                continue;
            }
            if let Some(e) = srv.enemies.get(id) {
                if e.alive() && e.hitbox().contains(pos) {
                    direct = Some(id);
                    break;
                }
            }
        }
        let Some(target) = direct else { continue };
        resolve_hit(srv, ctx, pi, target);
        metrics::counter!("sim.projectile_hits_total").increment(1);

        // AOE branch: first confirmed hit only; the explosion re-scans
        // other alive, not-yet-hit enemies around the impact point.
        if let Some(radius) = srv.projectiles[pi].aoe_radius {
            if !srv.projectiles[pi].exploded {
                srv.projectiles[pi].exploded = true;
                let center = srv.projectiles[pi].pos;
                for &id in &ids {
                    if id == target || srv.projectiles[pi].hit_set.contains(&id) {
                        continue;
                    }
                    let in_range = srv
                        .enemies
                        .get(id)
                        .map(|e| e.alive() && within(e.pos, center, radius))
                        .unwrap_or(false);
                    if in_range {
                        resolve_hit(srv, ctx, pi, id);
                    }
                }
            }
        }

        // Branch termination: pierce counts direct hits, bounce retargets,
        // plain projectiles are absorbed by the first hit.
        let still_alive = after_direct_hit(srv, pi, &ids);
        srv.projectiles[pi].alive = still_alive;
    }
}

fn integrate(srv: &mut SessionState, pi: usize, dt: f32) {
    let p = &mut srv.projectiles[pi];
    let step = p.vel * dt;
    p.pos += step;
    p.traveled += step.length();
    if p.traveled > p.max_range {
        p.alive = false;
    }
}

/// Apply the full hit pipeline to one enemy: pierce-reduced damage off
/// the authoritative base, one crit roll, knockback, status proc, and a
/// particle burst. The enemy enters the projectile's hit set.
fn resolve_hit(srv: &mut SessionState, ctx: &mut Ctx, pi: usize, target: EnemyId) {
    let (base, mult, crit_chance, crit_damage, knockback, element, aoe, proj_pos) = {
        let p = &srv.projectiles[pi];
        (
            p.base_damage,
            p.pierce_multiplier(),
            p.crit_chance,
            p.crit_damage,
            p.knockback,
            p.element,
            p.aoe_radius,
            p.pos,
        )
    };
    let crit = srv.rng.random_bool(crit_chance);
    let mut amount = (base as f32 * mult).round() as i32;
    if crit {
        amount = (amount as f32 * crit_damage).round() as i32;
    }

    let proc = srv.status_table.procs.get(&element).copied();
    let proc_roll = match proc {
        Some(pr) => srv.rng.random_bool(pr.chance),
        None => false,
    };

    let Some(e) = srv.enemies.get_mut(target) else { return };
    let enemy_pos = e.pos;
    let factor = if e.is_boss { BOSS_KNOCKBACK_FACTOR } else { 1.0 };
    let dir = (enemy_pos - proj_pos).normalize_or_zero();
    e.knockback_vel += dir * knockback * factor;
    if proc_roll {
        if let Some(pr) = proc {
            if let Some(eff) = StatusEffect::from_table(pr.effect, &srv.status_table) {
                if let Some(e) = srv.enemies.get_mut(target) {
                    // Replaces any prior effect outright.
                    e.status = Some(eff);
                }
                srv.events.push(SimEvent::StatusApplied {
                    enemy: target,
                    kind: pr.effect,
                });
            }
        }
    }

    ctx.dmg.push(DamageEvent {
        target: DamageTarget::Enemy(target),
        amount,
        crit,
        pos: enemy_pos,
    });
    srv.events.push(SimEvent::Particles {
        pos: enemy_pos,
        count: aoe.map(|r| (r / 8.0) as u32).unwrap_or(HIT_PARTICLES),
        element,
    });

    let p = &mut srv.projectiles[pi];
    debug_assert!(!p.hit_set.contains(&target), "enemy hit twice by one pass");
    p.hit_set.insert(target);
}

/// Post-hit branching; returns whether the projectile stays alive.
fn after_direct_hit(srv: &mut SessionState, pi: usize, ids: &[EnemyId]) -> bool {
    // Pierce: count the direct hit; 0 = unlimited.
    if srv.projectiles[pi].pierce.is_some() {
        let p = srv.projectiles[pi].pierce.as_mut().unwrap();
        p.hits_done += 1;
        let done = p.max_hits > 0 && p.hits_done >= p.max_hits;
        return !done;
    }
    // Bounce: retarget toward the nearest alive, not-yet-hit enemy within
    // the detect radius, preserving speed. The count increments whether or
    // not a target was found; only exceeding the max deactivates.
    if let Some(b) = srv.projectiles[pi].bounce {
        let from = srv.projectiles[pi].pos;
        let mut best: Option<(f32, Vec2)> = None;
        for &id in ids {
            if srv.projectiles[pi].hit_set.contains(&id) {
                continue;
            }
            if let Some(e) = srv.enemies.get(id) {
                if !e.alive() {
                    continue;
                }
                let d2 = e.pos.distance_squared(from);
                if d2 <= b.detect_radius * b.detect_radius
                    && best.map(|(bd, _)| d2 < bd).unwrap_or(true)
                {
                    best = Some((d2, e.pos));
                }
            }
        }
        let speed = srv.projectiles[pi].vel.length();
        if let Some((_, target_pos)) = best {
            let dir = (target_pos - from).normalize_or_zero();
            srv.projectiles[pi].vel = dir * speed;
        }
        let b = srv.projectiles[pi].bounce.as_mut().unwrap();
        b.bounces_done += 1;
        return b.bounces_done <= b.max_bounces;
    }
    // Plain (including AOE) projectiles are absorbed by the first hit.
    false
}

/// Enemy projectiles are always simple: direct hit against the player's
/// hitbox, damage + knockback, no AOE/pierce/bounce. The invulnerability
/// window is honoured by damage application.
pub fn enemy_projectiles(srv: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    let hitbox = srv.player.hitbox();
    let player_pos = srv.player.pos;
    for pi in 0..srv.projectiles.len() {
        if srv.projectiles[pi].owner == ProjOwner::Player || !srv.projectiles[pi].alive {
            continue;
        }
        integrate(srv, pi, dt);
        if !srv.projectiles[pi].alive {
            continue;
        }
        let p = &srv.projectiles[pi];
        if !hitbox.contains(p.pos) {
            continue;
        }
        let dir = (player_pos - p.pos).normalize_or_zero();
        let knock = dir * p.knockback;
        let amount = p.base_damage;
        let pos = p.pos;
        let element = p.element;
        srv.projectiles[pi].alive = false;
        srv.player.knockback_vel += knock;
        ctx.dmg.push(DamageEvent {
            target: DamageTarget::Player,
            amount,
            crit: false,
            pos,
        });
        srv.events.push(SimEvent::Particles {
            pos,
            count: HIT_PARTICLES,
            element,
        });
    }
}
