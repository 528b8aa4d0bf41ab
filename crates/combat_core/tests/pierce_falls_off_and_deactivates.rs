//! A piercing lance through a line of four enemies: damage falls off per
//! prior hit (1.0, 0.8, 0.6 of base), and the projectile deactivates
//! after its third hit, leaving the fourth enemy untouched.

use combat_core::{Enemy, Health, PlayerInput, SessionConfig, SessionState, SimEvent};
use glam::Vec2;

fn quiet_session(seed: u64) -> SessionState {
    let mut cfg = SessionConfig::builtin();
    cfg.zone.pool.clear();
    cfg.zone.blockers.clear();
    cfg.tuning.boss_timer_s = 1.0e9;
    cfg.player.crit_chance = 0.0;
    SessionState::new(seed, cfg)
}

#[test]
fn pierce_falls_off_and_deactivates() {
    let mut s = quiet_session(3);
    let spec = s.species.get("walker").unwrap().clone();
    for k in 1..=4u32 {
        let id = s.enemies.alloc_id();
        let pos = s.player.pos + Vec2::X * (100.0 * k as f32);
        let mut e = Enemy::from_species(id, "walker", &spec, 1, pos, false, false);
        e.hp = Health::new(10_000); // survive every hit
        s.enemies.push(e);
    }

    let aim = s.player.pos + Vec2::X * 1000.0;
    s.spawn_player_projectile("lance", aim).expect("lance spec");

    // Base lance damage: player 10 x 1.1 mult = 11; falloff 0.2/hit.
    let mut amounts = Vec::new();
    for _ in 0..120 {
        s.step(0.016, PlayerInput::default());
        for ev in s.drain_events() {
            if let SimEvent::Damage {
                amount,
                target_player: false,
                ..
            } = ev
            {
                amounts.push(amount);
            }
        }
    }

    assert_eq!(amounts, vec![11, 9, 7], "three hits with per-hit falloff");
    assert!(
        s.projectiles.is_empty(),
        "lance deactivates at its hit limit"
    );
    assert_eq!(s.enemies.alive_count(), 4, "nobody died to the lance");
}
