//! Per-frame movement and steering: player input movement with enemy
//! repulsion, enemy pursuit/anticipation/stand-off, pairwise separation,
//! knockback decay, and enemy melee/ranged attacks.

use collision_static::Rect;
use data_runtime::species::AttackKind;
use glam::Vec2;

use crate::actor::ProjOwner;
use crate::geom::predicted_intercept;
use crate::schedule::{Ctx, DamageEvent, DamageTarget};
use crate::status::blocks_action;
use crate::SessionState;

/// Seconds of target lead used by anticipating melee pursuers.
const ANTICIPATION_LEAD_S: f32 = 0.5;
/// Knockback velocity multiplier applied each tick.
const KNOCKBACK_DECAY: f32 = 0.85;
/// Below this speed a knockback impulse is zeroed.
const KNOCKBACK_EPSILON: f32 = 1.0;
/// Neighbour radius for the pairwise separation pass, as a multiple of
/// the enemy's own radius.
const SEPARATION_RADIUS_FACTOR: f32 = 2.0;
const SEPARATION_STRENGTH: f32 = 60.0;
/// Ranged attack-animation revert countdown armed on each shot.
const RANGED_ANIM_S: f32 = 0.4;

/// Move a box of `half` extents from `pos` by `delta`, resolving each
/// axis independently against static geometry so the mover slides along
/// walls. Returns the new position and which axes were blocked.
fn slide_move(
    statics: &collision_static::StaticIndex,
    pos: Vec2,
    half: Vec2,
    delta: Vec2,
) -> (Vec2, [bool; 2]) {
    let mut out = pos;
    let mut blocked = [false, false];
    let try_x = Vec2::new(out.x + delta.x, out.y);
    if statics.blocked_rect(&Rect::from_center(try_x, half)) {
        blocked[0] = true;
    } else {
        out = try_x;
    }
    let try_y = Vec2::new(out.x, out.y + delta.y);
    if statics.blocked_rect(&Rect::from_center(try_y, half)) {
        blocked[1] = true;
    } else {
        out = try_y;
    }
    (statics.clamp_to_bounds(out, half), blocked)
}

pub fn player_move(srv: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    let p = &mut srv.player;
    p.attack_cd = (p.attack_cd - dt).max(0.0);
    p.invuln = (p.invuln - dt).max(0.0);
    for s in p.spells.iter_mut() {
        s.cooldown = (s.cooldown - dt).max(0.0);
    }
    if !p.hp.alive() {
        p.vel = Vec2::ZERO;
        return;
    }

    let dir = srv.input.move_dir.normalize_or_zero();
    p.vel = dir * p.move_speed();

    // Averaged normalized push away from nearby enemies.
    let mut push = Vec2::ZERO;
    let mut n = 0u32;
    let radius = p.base.repulsion_radius;
    for e in srv.enemies.iter() {
        if !e.alive() {
            continue;
        }
        let d = p.pos - e.pos;
        let d2 = d.length_squared();
        if d2 < radius * radius && d2 > 1e-6 {
            push += d / d2.sqrt();
            n += 1;
        }
    }
    let repulsion = if n > 0 {
        (push / n as f32) * p.base.repulsion_strength
    } else {
        Vec2::ZERO
    };

    let half = Vec2::splat(p.base.radius);
    let delta = (p.vel + repulsion) * dt;
    let (pos, _) = slide_move(&srv.statics, p.pos, half, delta);
    p.pos = pos;

    // Player knockback from enemy hits, same decay as enemies.
    if p.knockback_vel.length_squared() > KNOCKBACK_EPSILON * KNOCKBACK_EPSILON {
        let (pos, blocked) = slide_move(&srv.statics, p.pos, half, p.knockback_vel * dt);
        p.pos = pos;
        if blocked[0] {
            p.knockback_vel.x = 0.0;
        }
        if blocked[1] {
            p.knockback_vel.y = 0.0;
        }
        p.knockback_vel *= KNOCKBACK_DECAY;
    } else {
        p.knockback_vel = Vec2::ZERO;
    }
}

/// Primary attack: fires a bolt toward the aim point whenever the input
/// holds attack and the cooldown has elapsed.
pub fn player_attack(srv: &mut SessionState, _ctx: &mut Ctx) {
    if !srv.input.attack || srv.player.attack_cd > 0.0 || !srv.player.hp.alive() {
        return;
    }
    let aim = srv.input.aim;
    if srv.spawn_player_projectile("bolt", aim).is_some() {
        srv.player.attack_cd = srv.player.attack_interval();
    }
}

pub fn enemy_move(srv: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    let player_pos = srv.player.pos;
    let player_vel = srv.player.vel;
    let player_radius = srv.player.base.radius;
    let player_moving = player_vel.length_squared() > 1.0;

    // Pursuit is resolved against a position snapshot taken before the
    // pass, so enemies never observe a neighbour's this-tick move.
    let ids = srv.enemies.alive_ids();
    for &id in &ids {
        let Some(e) = srv.enemies.get(id) else { continue };
        if blocks_action(&e.status) {
            continue;
        }
        let (pos, radius, speed, attack, range, anticipates) = (
            e.pos,
            e.radius,
            e.effective_speed(),
            e.attack,
            e.attack_range,
            e.anticipates,
        );

        let target =
            if attack == AttackKind::Melee && anticipates && player_moving {
                predicted_intercept(player_pos, player_vel, ANTICIPATION_LEAD_S)
            } else {
                player_pos
            };
        let to = target - pos;
        let dist = to.length();

        // Ranged enemies hold once in range; melee respect a stand-off of
        // half the larger bounding box. Both fall back to separation-only
        // movement (applied below for everyone).
        let advance = match attack {
            AttackKind::Ranged => dist > range,
            AttackKind::Melee => {
                let standoff = radius.max(player_radius);
                dist - speed * dt > standoff
            }
        };
        if !advance || dist <= 1e-4 {
            continue;
        }
        let step = to / dist * speed * dt;
        let half = Vec2::splat(radius);
        let (new_pos, _) = slide_move(&srv.statics, pos, half, step);
        if let Some(e) = srv.enemies.get_mut(id) {
            e.vel = (new_pos - pos) / dt.max(1e-6);
            e.pos = new_pos;
        }
    }

    separation_pass(srv, dt);
    knockback_pass(srv, dt);
}

/// Averaged normalized push between neighbours closer than the separation
/// radius, applied symmetrically. Independent of pursuit.
fn separation_pass(srv: &mut SessionState, dt: f32) {
    let n = srv.enemies.enemies.len();
    if n < 2 {
        return;
    }
    let mut push = vec![Vec2::ZERO; n];
    for i in 0..n {
        if !srv.enemies.enemies[i].alive() {
            continue;
        }
        for j in (i + 1)..n {
            if !srv.enemies.enemies[j].alive() {
                continue;
            }
            let a = &srv.enemies.enemies[i];
            let b = &srv.enemies.enemies[j];
            let radius = (a.radius + b.radius) * 0.5 * SEPARATION_RADIUS_FACTOR;
            let d = a.pos - b.pos;
            let d2 = d.length_squared();
            if d2 < radius * radius && d2 > 1e-6 {
                let dist = d2.sqrt();
                let overlap = radius - dist;
                let f = (d / dist) * overlap * SEPARATION_STRENGTH * dt / radius;
                push[i] += f;
                push[j] -= f;
            }
        }
    }
    for (i, f) in push.iter().enumerate() {
        if f.length_squared() > 0.0 && srv.enemies.enemies[i].alive() {
            let half = Vec2::splat(srv.enemies.enemies[i].radius);
            let pos = srv.enemies.enemies[i].pos;
            let (new_pos, _) = slide_move(&srv.statics, pos, half, *f);
            srv.enemies.enemies[i].pos = new_pos;
        }
    }
}

/// Additive knockback impulse with exponential decay; a blocked axis
/// zeroes that axis's velocity (no bounce).
fn knockback_pass(srv: &mut SessionState, dt: f32) {
    let statics = srv.statics.clone();
    for e in srv.enemies.iter_mut() {
        if !e.alive() {
            continue;
        }
        if e.knockback_vel.length_squared() <= KNOCKBACK_EPSILON * KNOCKBACK_EPSILON {
            e.knockback_vel = Vec2::ZERO;
            continue;
        }
        let half = Vec2::splat(e.radius);
        let (new_pos, blocked) = slide_move(&statics, e.pos, half, e.knockback_vel * dt);
        e.pos = new_pos;
        if blocked[0] {
            e.knockback_vel.x = 0.0;
        }
        if blocked[1] {
            e.knockback_vel.y = 0.0;
        }
        e.knockback_vel *= KNOCKBACK_DECAY;
    }
}

/// Enemy attacks against the player. Bosses are driven by the boss
/// director instead; stunned enemies do not act.
pub fn enemy_attack(srv: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    let player_pos = srv.player.pos;
    let player_alive = srv.player.hp.alive();
    let ids = srv.enemies.alive_ids();
    let mut shots: Vec<(crate::actor::EnemyId, Vec2, Vec2, i32, f32)> = Vec::new();
    for &id in &ids {
        let Some(e) = srv.enemies.get_mut(id) else { continue };
        e.attack_cd = (e.attack_cd - dt).max(0.0);
        e.attack_anim = (e.attack_anim - dt).max(0.0);
        if e.is_boss || !player_alive || blocks_action(&e.status) {
            continue;
        }
        let dist = e.pos.distance(player_pos);
        if dist > e.attack_range || e.attack_cd > 0.0 {
            continue;
        }
        e.attack_cd = e.attack_interval;
        match e.attack {
            AttackKind::Melee => {
                ctx.dmg.push(DamageEvent {
                    target: DamageTarget::Player,
                    amount: e.damage,
                    crit: false,
                    pos: player_pos,
                });
            }
            AttackKind::Ranged => {
                e.attack_anim = RANGED_ANIM_S;
                let dir = (player_pos - e.pos).normalize_or_zero();
                shots.push((id, e.pos, dir, e.damage, e.projectile_speed));
            }
        }
    }
    for (id, from, dir, damage, speed) in shots {
        srv.spawn_enemy_projectile(ProjOwner::Enemy(id), from, dir, damage, speed);
    }
}
