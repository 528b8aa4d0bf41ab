//! A chaining spark hops through a cluster, damaging each enemy once at
//! full (undiminished) damage, never revisiting a previous target.

use combat_core::{Enemy, Health, PlayerInput, SessionConfig, SessionState, SimEvent};
use glam::Vec2;

#[test]
fn bounce_chains_without_rehitting() {
    let mut cfg = SessionConfig::builtin();
    cfg.zone.pool.clear();
    cfg.zone.blockers.clear();
    cfg.tuning.boss_timer_s = 1.0e9;
    cfg.player.crit_chance = 0.0;
    let mut s = SessionState::new(13, cfg);

    let spec = s.species.get("walker").unwrap().clone();
    let cluster = [
        s.player.pos + Vec2::new(80.0, 0.0),
        s.player.pos + Vec2::new(140.0, 90.0),
        s.player.pos + Vec2::new(200.0, -40.0),
    ];
    let mut ids = Vec::new();
    for pos in cluster {
        let id = s.enemies.alloc_id();
        let mut e = Enemy::from_species(id, "walker", &spec, 1, pos, false, false);
        e.hp = Health::new(10_000);
        s.enemies.push(e);
        ids.push(id);
    }
    let before: Vec<i32> = ids
        .iter()
        .map(|&id| s.enemies.get(id).unwrap().hp.hp)
        .collect();

    s.spawn_player_projectile("chain_spark", cluster[0])
        .expect("chain_spark spec");

    // Base chain damage: player 10 x 0.9 mult = 9, no falloff per bounce.
    let mut amounts = Vec::new();
    for _ in 0..80 {
        s.step(0.025, PlayerInput::default());
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

    assert_eq!(amounts, vec![9, 9, 9], "each cluster member hit once");
    for (&id, &hp0) in ids.iter().zip(&before) {
        let e = s.enemies.get(id).expect("alive");
        assert_eq!(hp0 - e.hp.hp, 9, "exactly one hit per enemy");
    }
}
