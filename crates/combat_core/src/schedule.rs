//! Fixed-order tick schedule. Systems operate on the full session state
//! and communicate through the `Ctx` damage bus; damage application,
//! death events and cleanup always run last, so no system observes a
//! mid-tick removal.

use glam::Vec2;

use crate::actor::EnemyId;
use crate::events::SimEvent;
use crate::{status, systems, SessionState};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DamageTarget {
    Player,
    Enemy(EnemyId),
}

#[derive(Copy, Clone, Debug)]
pub struct DamageEvent {
    pub target: DamageTarget,
    pub amount: i32,
    pub crit: bool,
    pub pos: Vec2,
}

/// Per-tick scratch: elapsed delta and the damage bus.
pub struct Ctx {
    pub dt: f32,
    pub dmg: Vec<DamageEvent>,
}

impl Ctx {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            dmg: Vec::new(),
        }
    }
}

const SYSTEM_ORDER: &[&str] = &[
    "spawn_director",
    "status_tick",
    "player_move",
    "player_attack",
    "enemy_move",
    "enemy_attack",
    "player_projectiles",
    "enemy_projectiles",
    "boss_director",
    "apply_damage",
    "cleanup",
];

/// Schedule order by name, for ordering tests.
pub fn system_names_for_test() -> Vec<&'static str> {
    SYSTEM_ORDER.to_vec()
}

pub struct Schedule;

impl Schedule {
    pub fn run(srv: &mut SessionState, ctx: &mut Ctx) {
        systems::spawn::spawn_director(srv, ctx);
        status::status_tick(srv, ctx);
        systems::motion::player_move(srv, ctx);
        systems::motion::player_attack(srv, ctx);
        systems::motion::enemy_move(srv, ctx);
        systems::motion::enemy_attack(srv, ctx);
        systems::projectiles::player_projectiles(srv, ctx);
        systems::projectiles::enemy_projectiles(srv, ctx);
        systems::boss::boss_director(srv, ctx);
        apply_damage(srv, ctx);
        cleanup(srv, ctx);
    }
}

/// Drain the damage bus into HP mutations and damage events. Player hits
/// respect the invulnerability window and re-arm it; enemy HP is clamped
/// so it never goes negative.
fn apply_damage(srv: &mut SessionState, ctx: &mut Ctx) {
    for d in ctx.dmg.drain(..) {
        match d.target {
            DamageTarget::Enemy(id) => {
                if let Some(e) = srv.enemies.get_mut(id) {
                    if !e.alive() {
                        continue;
                    }
                    e.hp.apply(d.amount);
                    srv.events.push(SimEvent::Damage {
                        pos: d.pos,
                        amount: d.amount,
                        crit: d.crit,
                        target_player: false,
                    });
                }
            }
            DamageTarget::Player => {
                if srv.player.invuln > 0.0 || !srv.player.hp.alive() {
                    continue;
                }
                srv.player.hp.apply(d.amount);
                srv.player.invuln = srv.player.base.invuln_s;
                srv.events.push(SimEvent::Damage {
                    pos: d.pos,
                    amount: d.amount,
                    crit: d.crit,
                    target_player: true,
                });
                if !srv.player.hp.alive() {
                    srv.events.push(SimEvent::PlayerDown);
                }
            }
        }
    }
}

/// Emit death events for enemies that reached 0 HP this tick, then remove
/// them and finished projectiles. Ownership of the removed enemy data
/// passes to the event (loot pipeline), not retained here.
fn cleanup(srv: &mut SessionState, _ctx: &mut Ctx) {
    let mut boss_down = None;
    for e in srv.enemies.iter() {
        if e.alive() {
            continue;
        }
        srv.events.push(SimEvent::Death {
            enemy: e.id,
            pos: e.pos,
            species: e.species.clone(),
            level: e.level,
            no_loot: e.no_loot,
        });
        metrics::counter!("sim.deaths_total").increment(1);
        if e.is_boss {
            boss_down = Some(e.id);
        }
    }
    if let Some(id) = boss_down {
        log::info!("boss {:?} down", id);
        srv.events.push(SimEvent::BossDown { enemy: id });
        srv.boss.discard(id);
        srv.boss_id = None;
    }
    srv.enemies.remove_dead();
    srv.projectiles.retain(|p| p.alive);
}
