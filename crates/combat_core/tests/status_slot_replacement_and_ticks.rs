//! Single status slot: a fire proc replaces an existing poison outright,
//! and the fresh burn deals its periodic damage until expiry.

use combat_core::{Enemy, Health, PlayerInput, SessionConfig, SessionState, SimEvent};
use data_runtime::status::StatusKind;
use glam::Vec2;

#[test]
fn status_slot_replacement_and_ticks() {
    let mut cfg = SessionConfig::builtin();
    cfg.zone.pool.clear();
    cfg.zone.blockers.clear();
    cfg.tuning.boss_timer_s = 1.0e9;
    cfg.player.crit_chance = 0.0;
    // Make the fire proc deterministic.
    for proc in cfg.status.procs.values_mut() {
        proc.chance = 1.0;
    }
    let mut s = SessionState::new(9, cfg);

    let spec = s.species.get("walker").unwrap().clone();
    let id = s.enemies.alloc_id();
    let pos = s.player.pos + Vec2::X * 60.0;
    let mut e = Enemy::from_species(id, "walker", &spec, 1, pos, false, false);
    e.hp = Health::new(10_000);
    e.status = combat_core::status::StatusEffect::from_table(
        StatusKind::Poison,
        &s.status_table,
    );
    s.enemies.push(e);

    s.spawn_player_projectile("fireball", pos).expect("fireball spec");

    let mut applied = Vec::new();
    let mut tick_amounts = Vec::new();
    // Long enough for the hit plus two burn ticks (0.5s interval).
    for _ in 0..30 {
        s.step(0.05, PlayerInput::default());
        for ev in s.drain_events() {
            match ev {
                SimEvent::StatusApplied { kind, .. } => applied.push(kind),
                SimEvent::Damage {
                    amount,
                    target_player: false,
                    ..
                } if amount == 4 => tick_amounts.push(amount),
                _ => {}
            }
        }
    }

    assert_eq!(applied, vec![StatusKind::Burn], "fire proc replaced poison");
    let e = s.enemies.get(id).expect("enemy survives");
    match &e.status {
        Some(st) => assert_eq!(st.kind, StatusKind::Burn, "one slot, newest wins"),
        None => panic!("burn still running inside its duration"),
    }
    assert!(
        tick_amounts.len() >= 2,
        "burn ticked at least twice, got {}",
        tick_amounts.len()
    );
}
