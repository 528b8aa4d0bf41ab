//! The boss trigger: 60-80% of the standing horde is culled without loot,
//! the boss spawns on the ring, and the post-boss spawn freeze is armed
//! in the 5-8s band.

use combat_core::{Enemy, PlayerInput, SessionConfig, SessionState, SimEvent};
use glam::Vec2;

#[test]
fn boss_trigger_culls_and_freezes_spawns() {
    let mut cfg = SessionConfig::builtin();
    cfg.zone.pool.clear(); // only the pre-placed horde
    cfg.zone.blockers.clear();
    cfg.tuning.boss_timer_s = 1.0;
    cfg.player.crit_chance = 0.0;
    let mut s = SessionState::new(11, cfg);

    let spec = s.species.get("walker").unwrap().clone();
    for k in 0..10u32 {
        let id = s.enemies.alloc_id();
        let pos = s.player.pos + Vec2::new(300.0, -450.0 + 100.0 * k as f32);
        s.enemies
            .push(Enemy::from_species(id, "walker", &spec, 1, pos, false, false));
    }

    let mut boss_spawned = false;
    let mut culled = 0usize;
    let mut freeze_at_trigger = 0.0f32;
    for _ in 0..15 {
        s.step(0.1, PlayerInput::default());
        for ev in s.drain_events() {
            match ev {
                SimEvent::BossSpawned { .. } => {
                    boss_spawned = true;
                    freeze_at_trigger = s.spawn.post_boss_freeze;
                }
                SimEvent::Death { no_loot: true, .. } => culled += 1,
                _ => {}
            }
        }
        if boss_spawned {
            break;
        }
    }

    assert!(boss_spawned, "boss up after the timer elapses");
    assert!(s.boss_id.is_some());
    assert!(s.boss_status().is_some());
    assert!(
        (6..=8).contains(&culled),
        "60-80% of 10 mobs culled, got {culled}"
    );
    let survivors = s.enemies.alive_count() - 1; // minus the boss
    assert_eq!(survivors, 10 - culled);
    assert!(
        freeze_at_trigger > 4.0 && freeze_at_trigger < 8.0,
        "post-boss freeze armed in band, got {freeze_at_trigger}"
    );
    assert_eq!(s.boss_timer_remaining(), 0.0);
}
