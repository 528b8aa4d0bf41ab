//! collision_static: static axis-aligned blocking rectangles for a battle
//! map, plus the map bounds. Point/rect overlap queries only; movement
//! policy (axis-split sliding, spawn ring validation) lives in the caller.

use glam::Vec2;

/// Axis-aligned rectangle, `min` inclusive / `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Per-map set of static blockers. Built once at session start from zone
/// data; never mutated during a battle.
#[derive(Clone, Debug)]
pub struct StaticIndex {
    pub bounds: Rect,
    pub blockers: Vec<Rect>,
}

impl StaticIndex {
    pub fn new(bounds: Rect, blockers: Vec<Rect>) -> Self {
        Self { bounds, blockers }
    }

    /// A map with no interior geometry, only bounds.
    pub fn open(bounds: Rect) -> Self {
        Self {
            bounds,
            blockers: Vec::new(),
        }
    }

    #[inline]
    pub fn blocked_point(&self, p: Vec2) -> bool {
        self.blockers.iter().any(|b| b.contains(p))
    }

    #[inline]
    pub fn blocked_rect(&self, r: &Rect) -> bool {
        self.blockers.iter().any(|b| b.overlaps(r))
    }

    /// Clamp an entity center so its box of `half` extents stays inside the
    /// map bounds.
    #[inline]
    pub fn clamp_to_bounds(&self, p: Vec2, half: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.bounds.min.x + half.x, self.bounds.max.x - half.x),
            p.y.clamp(self.bounds.min.y + half.y, self.bounds.max.y - half.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn idx() -> StaticIndex {
        StaticIndex::new(
            Rect::new(vec2(0.0, 0.0), vec2(1000.0, 1000.0)),
            vec![Rect::new(vec2(100.0, 100.0), vec2(200.0, 200.0))],
        )
    }

    #[test]
    fn point_queries() {
        let s = idx();
        assert!(s.blocked_point(vec2(150.0, 150.0)));
        assert!(!s.blocked_point(vec2(50.0, 50.0)));
        // max edge is exclusive
        assert!(!s.blocked_point(vec2(200.0, 200.0)));
    }

    #[test]
    fn rect_queries() {
        let s = idx();
        let hit = Rect::from_center(vec2(95.0, 150.0), vec2(10.0, 10.0));
        let miss = Rect::from_center(vec2(50.0, 50.0), vec2(10.0, 10.0));
        assert!(s.blocked_rect(&hit));
        assert!(!s.blocked_rect(&miss));
    }

    #[test]
    fn clamp_keeps_box_inside() {
        let s = idx();
        let p = s.clamp_to_bounds(vec2(-50.0, 2000.0), vec2(16.0, 16.0));
        assert_eq!(p, vec2(16.0, 984.0));
    }

}
