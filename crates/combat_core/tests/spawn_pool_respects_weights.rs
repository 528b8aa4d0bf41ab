//! Weighted species selection: over a large spawned population the 6/3/1
//! pool weights show up as roughly 60/30/10 proportions.

use combat_core::{PlayerInput, SessionConfig, SessionState};

#[test]
fn spawn_pool_respects_weights() {
    let mut cfg = SessionConfig::builtin();
    cfg.zone.blockers.clear();
    cfg.tuning.population_cap = 300;
    cfg.tuning.base_interval_s = 0.1;
    cfg.tuning.min_interval_s = 0.1;
    cfg.tuning.boss_timer_s = 1.0e9;
    // Enemies would wander off the ring and trip the leash; keep it wide.
    cfg.tuning.leash_distance = 1.0e9;
    let mut s = SessionState::new(17, cfg);

    for _ in 0..400 {
        s.step(0.1, PlayerInput::default());
        s.drain_events();
        if s.enemies.alive_count() >= 300 {
            break;
        }
    }
    let total = s.enemies.alive_count();
    assert!(total >= 250, "population filled, got {total}");

    let count = |name: &str| s.enemies.iter().filter(|e| e.species == name).count();
    let (w, sp, b) = (count("walker"), count("spitter"), count("brute"));
    assert_eq!(w + sp + b, total);
    assert!(w > sp && sp > b, "ordering follows weights: {w}/{sp}/{b}");
    let frac = |n: usize| n as f32 / total as f32;
    assert!(
        (0.45..0.75).contains(&frac(w)),
        "walker share {:.2}",
        frac(w)
    );
    assert!(
        (0.15..0.45).contains(&frac(sp)),
        "spitter share {:.2}",
        frac(sp)
    );
    assert!(frac(b) < 0.25, "brute share {:.2}", frac(b));
}
