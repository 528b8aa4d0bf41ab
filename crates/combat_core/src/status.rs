//! Single-slot status-effect engine. An enemy holds at most one effect;
//! applying a new one replaces the old outright (no stacking, no duration
//! extension).

use data_runtime::status::{StatusKind, StatusTable};

use crate::schedule::{Ctx, DamageEvent, DamageTarget};
use crate::SessionState;

#[derive(Clone, Copy, Debug)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining: f32,
    pub tick_interval: Option<f32>,
    pub tick_timer: f32,
    pub magnitude: f32,
}

impl StatusEffect {
    /// Instantiate from the data table; unknown kinds yield `None`.
    pub fn from_table(kind: StatusKind, table: &StatusTable) -> Option<Self> {
        let spec = table.effects.get(&kind)?;
        Some(Self {
            kind,
            remaining: spec.duration_s,
            tick_interval: spec.tick_interval_s,
            tick_timer: spec.tick_interval_s.unwrap_or(0.0),
            magnitude: spec.magnitude,
        })
    }
}

/// Movement-speed multiplier from the current effect. Slow/wet/freeze are
/// multiplicative slows; everything else leaves speed untouched.
#[inline]
pub fn speed_factor(status: &Option<StatusEffect>) -> f32 {
    match status {
        Some(s) => match s.kind {
            StatusKind::Slow | StatusKind::Wet | StatusKind::Freeze => s.magnitude,
            _ => 1.0,
        },
        None => 1.0,
    }
}

/// Whether the effect suppresses pursuit and attacking. Stun gates both
/// for its duration; knockback still applies.
#[inline]
pub fn blocks_action(status: &Option<StatusEffect>) -> bool {
    matches!(
        status,
        Some(StatusEffect {
            kind: StatusKind::Stun,
            ..
        })
    )
}

/// Advance every enemy's effect: periodic burn/poison damage (each tick
/// can kill on its own) and expiry back to no effect.
pub fn status_tick(state: &mut SessionState, ctx: &mut Ctx) {
    let dt = ctx.dt;
    for e in state.enemies.iter_mut() {
        if !e.alive() {
            continue;
        }
        let Some(s) = e.status.as_mut() else { continue };
        s.remaining -= dt;
        if let Some(interval) = s.tick_interval {
            s.tick_timer -= dt;
            while s.tick_timer <= 0.0 {
                s.tick_timer += interval;
                ctx.dmg.push(DamageEvent {
                    target: DamageTarget::Enemy(e.id),
                    amount: s.magnitude.round() as i32,
                    crit: false,
                    pos: e.pos,
                });
            }
        }
        if s.remaining <= 0.0 {
            e.status = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StatusTable {
        StatusTable::builtin()
    }

    #[test]
    fn slow_family_scales_speed() {
        let t = table();
        let slow = Some(StatusEffect::from_table(StatusKind::Slow, &t).unwrap());
        let burn = Some(StatusEffect::from_table(StatusKind::Burn, &t).unwrap());
        assert!(speed_factor(&slow) < 1.0);
        assert_eq!(speed_factor(&burn), 1.0);
        assert_eq!(speed_factor(&None), 1.0);
    }

    #[test]
    fn only_stun_blocks_action() {
        let t = table();
        let stun = Some(StatusEffect::from_table(StatusKind::Stun, &t).unwrap());
        let freeze = Some(StatusEffect::from_table(StatusKind::Freeze, &t).unwrap());
        assert!(blocks_action(&stun));
        assert!(!blocks_action(&freeze));
        assert!(!blocks_action(&None));
    }

    #[test]
    fn replacement_carries_full_duration() {
        let t = table();
        let mut s = StatusEffect::from_table(StatusKind::Burn, &t).unwrap();
        s.remaining = 0.1;
        // Replacing is just overwriting the slot; the fresh effect carries
        // its own base duration.
        let fresh = StatusEffect::from_table(StatusKind::Poison, &t).unwrap();
        assert_eq!(fresh.remaining, t.effects[&StatusKind::Poison].duration_s);
    }
}
