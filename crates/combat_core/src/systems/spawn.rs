//! Spawn director: the time-scaled difficulty curve, weighted species
//! selection, ring-validated placement, the boss trigger and leash
//! culling.

use collision_static::Rect;
use glam::Vec2;
use rand::Rng;

use crate::actor::{Enemy, EnemyId};
use crate::events::SimEvent;
use crate::geom::ring_dir;
use crate::schedule::Ctx;
use crate::SessionState;

/// Chance rolled once per enemy at construction to pursue a predicted
/// intercept instead of the player's current position.
pub const ANTICIPATE_CHANCE: f64 = 0.35;

/// Mutable spawn bookkeeping owned by the session.
#[derive(Debug)]
pub struct SpawnState {
    pub elapsed_s: f32,
    pub spawn_timer: f32,
    pub boss_timer_remaining: f32,
    pub boss_spawned: bool,
    pub post_boss_freeze: f32,
    /// The boss-trigger cull runs once per encounter even when boss
    /// placement has to retry.
    cull_done: bool,
    /// Enemy level locked at entry into the pre-boss window so difficulty
    /// does not spike just before the encounter; cleared once the boss is
    /// placed so post-boss spawns resume the formula.
    frozen_level: Option<u32>,
}

impl SpawnState {
    pub fn new(boss_timer_s: f32) -> Self {
        Self {
            elapsed_s: 0.0,
            spawn_timer: 0.0,
            boss_timer_remaining: boss_timer_s,
            boss_spawned: false,
            post_boss_freeze: 0.0,
            cull_done: false,
            frozen_level: None,
        }
    }
}

pub fn spawn_director(srv: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    srv.spawn.elapsed_s += dt;
    if !srv.spawn.boss_spawned {
        srv.spawn.boss_timer_remaining -= dt;
    }
    if srv.spawn.post_boss_freeze > 0.0 {
        srv.spawn.post_boss_freeze -= dt;
    }

    // Freeze the level formula on entry into the pre-boss window.
    if !srv.spawn.boss_spawned
        && srv.spawn.frozen_level.is_none()
        && srv.spawn.boss_timer_remaining <= srv.tuning.pre_boss_window_s
    {
        srv.spawn.frozen_level = Some(formula_level(srv));
    }

    if !srv.spawn.boss_spawned && srv.spawn.boss_timer_remaining <= 0.0 {
        trigger_boss(srv);
    }

    leash_cull(srv);

    // Gates: an alive boss, a full population, or the post-boss freeze
    // window all suppress spawning.
    let boss_alive = srv
        .boss_id
        .and_then(|id| srv.enemies.get(id))
        .map(|b| b.alive())
        .unwrap_or(false);
    if boss_alive || srv.spawn.post_boss_freeze > 0.0 {
        return;
    }
    let alive = srv.enemies.alive_count();
    if alive >= srv.tuning.population_cap {
        return;
    }

    srv.spawn.spawn_timer -= dt;
    if srv.spawn.spawn_timer > 0.0 {
        return;
    }
    srv.spawn.spawn_timer += srv
        .tuning
        .interval(srv.spawn.elapsed_s, srv.spawn.boss_timer_remaining);

    let headroom = srv.tuning.population_cap - alive;
    let batch = srv.tuning.batch_size(srv.spawn.elapsed_s).min(headroom);
    for _ in 0..batch {
        let Some(species) = pick_species(srv) else {
            return; // empty or zero-weight pool: no spawn, not an error
        };
        spawn_one(srv, &species, false);
    }
}

/// Weighted selection: cumulative-weight walk, first candidate whose
/// running remainder crosses <= 0 wins.
fn pick_species(srv: &mut SessionState) -> Option<String> {
    let total: f32 = srv.zone.pool.iter().map(|e| e.weight).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = srv.rng.random_range(0.0..total);
    for entry in &srv.zone.pool {
        roll -= entry.weight;
        if roll <= 0.0 {
            return Some(entry.species.clone());
        }
    }
    // Float accumulation can leave a sliver; the last entry takes it.
    srv.zone.pool.last().map(|e| e.species.clone())
}

/// Current enemy level from the difficulty formula, ignoring the pre-boss
/// freeze (callers pick the frozen value themselves).
fn formula_level(srv: &mut SessionState) -> u32 {
    let cfg = &srv.tuning.level;
    let minutes = srv.spawn.elapsed_s / 60.0;
    let mut level = cfg.base
        + (srv.zone.floor.saturating_sub(1)) * cfg.per_floor
        + (minutes * cfg.per_minute) as u32;
    if srv.rng.random_bool(cfg.jitter_chance) {
        level += 1;
    }
    level.min(cfg.max)
}

fn current_level(srv: &mut SessionState) -> u32 {
    match srv.spawn.frozen_level {
        Some(l) => l,
        None => formula_level(srv),
    }
}

/// Ring-validated placement: a candidate on the spawn ring around the
/// player, clamped to map bounds, rejected if any of the 8 ring points or
/// the full bounding box overlaps static geometry. Fail-closed: `None`
/// after the retry budget, never a fallback position.
fn find_spawn_position(srv: &mut SessionState, half_extent: f32) -> Option<Vec2> {
    let t = &srv.tuning;
    let retries = t.spawn_retries;
    let ring_points = t.ring_test_points;
    let spawn_radius = t.spawn_radius;
    for _ in 0..retries {
        let angle = srv.rng.random_range(0.0..std::f32::consts::TAU);
        let cand = srv.player.pos + Vec2::new(angle.cos(), angle.sin()) * spawn_radius;
        let cand = srv
            .statics
            .clamp_to_bounds(cand, Vec2::splat(half_extent));
        let ring_ok = (0..ring_points)
            .all(|k| !srv.statics.blocked_point(cand + ring_dir(k, ring_points) * half_extent));
        if !ring_ok {
            continue;
        }
        let bbox = Rect::from_center(cand, Vec2::splat(half_extent));
        if !srv.statics.blocked_rect(&bbox) {
            return Some(cand);
        }
    }
    None
}

fn spawn_one(srv: &mut SessionState, species: &str, is_boss: bool) -> Option<EnemyId> {
    let spec = srv.species.get(species)?.clone();
    let margin = if is_boss { srv.tuning.boss_margin } else { 1.0 };
    let pos = find_spawn_position(srv, spec.radius * margin)?;
    let level = current_level(srv);
    let anticipates = srv.rng.random_bool(ANTICIPATE_CHANCE);
    let id = srv.enemies.alloc_id();
    let enemy = Enemy::from_species(id, species, &spec, level, pos, anticipates, is_boss);
    srv.enemies.push(enemy);
    metrics::counter!("sim.spawns_total").increment(1);
    Some(id)
}

/// Boss trigger: cull 60-80% of alive non-boss mobs, arm the post-boss
/// spawn freeze, then place the boss with the larger ring margin. If
/// placement fails its retry budget the trigger re-runs next tick;
/// `boss_spawned` is only set on success.
fn trigger_boss(srv: &mut SessionState) {
    if !srv.spawn.cull_done {
        srv.spawn.cull_done = true;
        let (lo, hi) = srv.tuning.boss_cull_fraction;
        let frac = srv.rng.random_range(lo..hi);
        let mut ids = srv.enemies.alive_ids();
        let cull = (ids.len() as f32 * frac).round() as usize;
        // Partial Fisher-Yates: a uniform random subset of size `cull`.
        for i in 0..cull.min(ids.len()) {
            let j = srv.rng.random_range(i..ids.len());
            ids.swap(i, j);
            if let Some(e) = srv.enemies.get_mut(ids[i]) {
                e.hp.hp = 0;
                e.no_loot = true;
            }
        }
        let (flo, fhi) = srv.tuning.post_boss_freeze_s;
        srv.spawn.post_boss_freeze = srv.rng.random_range(flo..fhi);
        log::info!(
            "boss trigger: culled {} of {} mobs, spawn freeze {:.1}s",
            cull,
            ids.len(),
            srv.spawn.post_boss_freeze
        );
    }
    let species = srv.zone.boss_species.clone();
    match spawn_one(srv, &species, true) {
        Some(id) => {
            srv.boss_id = Some(id);
            srv.spawn.boss_spawned = true;
            // The pre-boss level freeze ends with the encounter; later
            // spawns resume the elapsed-time formula.
            srv.spawn.frozen_level = None;
            srv.events.push(SimEvent::BossSpawned { enemy: id });
            metrics::counter!("sim.boss_spawns_total").increment(1);
        }
        None => {
            log::warn!("boss placement failed, retrying next tick");
        }
    }
}

/// Force-kill mobs beyond the leash distance while population exceeds the
/// cull threshold; bound per-tick simulation cost. Bosses are exempt.
fn leash_cull(srv: &mut SessionState) {
    let threshold =
        (srv.tuning.population_cap as f32 * srv.tuning.leash_cull_threshold) as usize;
    if srv.enemies.alive_count() <= threshold {
        return;
    }
    let player = srv.player.pos;
    let leash2 = srv.tuning.leash_distance * srv.tuning.leash_distance;
    for e in srv.enemies.iter_mut() {
        if !e.alive() || e.is_boss {
            continue;
        }
        if e.pos.distance_squared(player) > leash2 {
            e.hp.hp = 0;
            e.no_loot = true;
            metrics::counter!("sim.leash_culls_total").increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionConfig;
    use glam::vec2;

    fn session() -> SessionState {
        SessionState::new(7, SessionConfig::builtin())
    }

    #[test]
    fn pick_species_honours_zero_weight_pool() {
        let mut s = session();
        for e in s.zone.pool.iter_mut() {
            e.weight = 0.0;
        }
        assert!(pick_species(&mut s).is_none());
    }

    #[test]
    fn pick_species_converges_to_weights() {
        let mut s = session();
        // Builtin pool is walker 6 / spitter 3 / brute 1.
        let n = 10_000usize;
        let mut counts = std::collections::HashMap::new();
        for _ in 0..n {
            let sp = pick_species(&mut s).expect("non-empty pool");
            *counts.entry(sp).or_insert(0usize) += 1;
        }
        let frac = |name: &str| *counts.get(name).unwrap_or(&0) as f64 / n as f64;
        assert!((frac("walker") - 0.6).abs() < 0.03);
        assert!((frac("spitter") - 0.3).abs() < 0.03);
        assert!((frac("brute") - 0.1).abs() < 0.03);
    }

    #[test]
    fn empty_pool_spawns_nothing() {
        let mut s = session();
        s.zone.pool.clear();
        let mut ctx = Ctx::new(10.0); // well past the first interval
        spawn_director(&mut s, &mut ctx);
        assert_eq!(s.enemies.alive_count(), 0);
    }

    #[test]
    fn placement_is_on_ring_and_clear_of_blockers() {
        let mut s = session();
        s.player.pos = vec2(2048.0, 2048.0);
        for _ in 0..50 {
            let p = find_spawn_position(&mut s, 20.0).expect("open map placement");
            assert!(!s
                .statics
                .blocked_rect(&Rect::from_center(p, Vec2::splat(20.0))));
            // Unclamped candidates sit exactly on the ring.
            let d = p.distance(s.player.pos);
            assert!(d <= s.tuning.spawn_radius + 1e-3);
        }
    }

    #[test]
    fn placement_fails_closed_when_fully_blocked() {
        let mut s = session();
        s.player.pos = vec2(2048.0, 2048.0);
        // Wall off the entire map.
        s.statics.blockers = vec![s.statics.bounds];
        assert!(find_spawn_position(&mut s, 20.0).is_none());
    }

    #[test]
    fn level_freezes_inside_pre_boss_window() {
        let mut s = session();
        s.spawn.boss_timer_remaining = s.tuning.pre_boss_window_s + 1.0;
        let mut ctx = Ctx::new(2.0);
        spawn_director(&mut s, &mut ctx);
        let frozen = s.spawn.frozen_level.expect("entered pre-boss window");
        assert_eq!(current_level(&mut s), frozen);
    }

    #[test]
    fn level_formula_resumes_after_boss_spawn() {
        let mut s = session();
        s.tuning.level.per_minute = 10.0;
        s.tuning.level.jitter_chance = 0.0;
        s.spawn.boss_timer_remaining = 0.2;
        let mut ctx = Ctx::new(0.1);
        spawn_director(&mut s, &mut ctx);
        assert!(s.spawn.frozen_level.is_some(), "pre-boss window freezes");
        spawn_director(&mut s, &mut ctx);
        assert!(s.spawn.boss_spawned, "timer expiry places the boss");
        assert!(
            s.spawn.frozen_level.is_none(),
            "freeze lifts with the boss up"
        );
        // Ten elapsed minutes at 10 levels/minute must show up again.
        s.spawn.elapsed_s = 600.0;
        assert!(current_level(&mut s) > s.tuning.level.base + 50);
    }
}
