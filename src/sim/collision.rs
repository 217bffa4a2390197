//! Collision detection and response for axis-aligned boxes
//!
//! Everything solid in a level is an axis-aligned rectangle, so the only
//! primitive needed is the AABB overlap test. The interesting part is the
//! response: a moving box that ends a step inside a platform has to be pushed
//! back out along exactly one axis, and which axis depends on where the box
//! was before the step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Platform;

/// Slack when comparing a previous edge against a platform face, so a body
/// resting exactly on a surface still counts as "came from above".
const EDGE_EPSILON: f32 = 0.01;

/// Axis-aligned rectangle in level pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test: boxes that merely share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.size.is_finite()
    }
}

/// Which face of a platform a body was pushed out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landed on the platform's top face
    Ground,
    /// Bumped the platform's underside
    Ceiling,
    /// Ran into a wall on the body's left
    WallLeft,
    /// Ran into a wall on the body's right
    WallRight,
}

impl Contact {
    pub fn is_wall(self) -> bool {
        matches!(self, Contact::WallLeft | Contact::WallRight)
    }
}

/// Summary of every contact produced while resolving one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub ground: bool,
    pub wall: Option<Contact>,
}

/// Push a body out of a single platform.
///
/// `prev` is the body's top-left before this step's integration. Vertical
/// faces take priority: a descending body whose previous bottom edge was at or
/// above the platform top lands; an ascending body whose previous top edge was
/// at or below the platform bottom bumps its head. Otherwise a body moving
/// sideways into a face it was previously clear of is stopped at that face.
/// Bodies that were already interpenetrating (e.g. a fast diagonal approach
/// into a corner) fall back to the minimum-translation axis.
///
/// Only one axis is corrected per platform. Vertical velocity is zeroed on
/// ground/ceiling contacts; horizontal velocity is left to the caller, which
/// decides whether a wall stops or bounces the body.
pub fn resolve_platform(
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Vec2,
    prev: Vec2,
    platform: &Aabb,
) -> Option<Contact> {
    let body = Aabb::from_pos_size(*pos, size);
    if !body.overlaps(platform) {
        return None;
    }
    let before = Aabb::from_pos_size(prev, size);

    if vel.y > 0.0 && before.bottom() <= platform.top() + EDGE_EPSILON {
        pos.y = platform.top() - size.y;
        vel.y = 0.0;
        return Some(Contact::Ground);
    }
    if vel.y < 0.0 && before.top() >= platform.bottom() - EDGE_EPSILON {
        pos.y = platform.bottom();
        vel.y = 0.0;
        return Some(Contact::Ceiling);
    }
    if vel.x > 0.0 && before.right() <= platform.left() + EDGE_EPSILON {
        pos.x = platform.left() - size.x;
        return Some(Contact::WallRight);
    }
    if vel.x < 0.0 && before.left() >= platform.right() - EDGE_EPSILON {
        pos.x = platform.right();
        return Some(Contact::WallLeft);
    }

    Some(push_out_minimum(pos, vel, size, platform))
}

/// Minimum-translation fallback for bodies that started the step overlapping
fn push_out_minimum(pos: &mut Vec2, vel: &mut Vec2, size: Vec2, platform: &Aabb) -> Contact {
    let body = Aabb::from_pos_size(*pos, size);
    let push_up = body.bottom() - platform.top();
    let push_down = platform.bottom() - body.top();
    let push_left = body.right() - platform.left();
    let push_right = platform.right() - body.left();

    let vertical = push_up.min(push_down);
    let horizontal = push_left.min(push_right);

    if vertical <= horizontal {
        if push_up <= push_down {
            pos.y = platform.top() - size.y;
            if vel.y > 0.0 {
                vel.y = 0.0;
            }
            Contact::Ground
        } else {
            pos.y = platform.bottom();
            if vel.y < 0.0 {
                vel.y = 0.0;
            }
            Contact::Ceiling
        }
    } else if push_left <= push_right {
        pos.x = platform.left() - size.x;
        Contact::WallRight
    } else {
        pos.x = platform.right();
        Contact::WallLeft
    }
}

/// Resolve a body against every solid platform, in order.
pub fn resolve_platforms(
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Vec2,
    prev: Vec2,
    platforms: &[Platform],
) -> Contacts {
    let mut contacts = Contacts::default();
    for platform in platforms.iter().filter(|p| p.solid) {
        match resolve_platform(pos, vel, size, prev, &platform.bounds) {
            Some(Contact::Ground) => contacts.ground = true,
            Some(wall) if wall.is_wall() => contacts.wall = Some(wall),
            _ => {}
        }
    }
    contacts
}

/// Whether a 1x1 box at `point` sits inside any solid platform
pub fn point_supported(point: Vec2, platforms: &[Platform]) -> bool {
    let sample = Aabb::from_pos_size(point, Vec2::ONE);
    platforms
        .iter()
        .any(|p| p.solid && sample.overlaps(&p.bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformKind;

    fn ground(x: f32, y: f32, w: f32, h: f32) -> Platform {
        Platform::new(Aabb::new(x, y, w, h), PlatformKind::Ground, false)
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let inside = Aabb::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_landing_snaps_to_top() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 32.0);
        let size = Vec2::new(32.0, 32.0);
        let prev = Vec2::new(10.0, 66.0);
        let mut pos = Vec2::new(10.0, 70.0);
        let mut vel = Vec2::new(0.0, 240.0);

        let contact = resolve_platform(&mut pos, &mut vel, size, prev, &platform);
        assert_eq!(contact, Some(Contact::Ground));
        assert_eq!(pos.y, 68.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_head_bump_snaps_below() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 32.0);
        let size = Vec2::new(32.0, 32.0);
        let prev = Vec2::new(10.0, 134.0);
        let mut pos = Vec2::new(10.0, 128.0);
        let mut vel = Vec2::new(0.0, -300.0);

        let contact = resolve_platform(&mut pos, &mut vel, size, prev, &platform);
        assert_eq!(contact, Some(Contact::Ceiling));
        assert_eq!(pos.y, 132.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_side_hit_stops_at_near_face() {
        let wall = Aabb::new(100.0, 0.0, 32.0, 200.0);
        let size = Vec2::new(32.0, 32.0);
        let prev = Vec2::new(66.0, 50.0);
        let mut pos = Vec2::new(70.0, 50.0);
        let mut vel = Vec2::new(180.0, 30.0);

        let contact = resolve_platform(&mut pos, &mut vel, size, prev, &wall);
        assert_eq!(contact, Some(Contact::WallRight));
        assert_eq!(pos.x, 68.0);
        // Falling alongside a wall keeps its vertical speed
        assert_eq!(vel.y, 30.0);
    }

    #[test]
    fn test_embedded_body_uses_minimum_translation() {
        let platform = Aabb::new(0.0, 0.0, 100.0, 100.0);
        let size = Vec2::new(10.0, 10.0);
        // Already inside, nearest face is the right one
        let mut pos = Vec2::new(95.0, 50.0);
        let mut vel = Vec2::ZERO;
        let prev = pos;
        let contact = resolve_platform(&mut pos, &mut vel, size, prev, &platform);
        assert_eq!(contact, Some(Contact::WallLeft));
        assert_eq!(pos.x, 100.0);
    }

    #[test]
    fn test_resolve_skips_non_solid() {
        let mut cloud = ground(0.0, 100.0, 200.0, 32.0);
        cloud.solid = false;
        let mut pos = Vec2::new(10.0, 70.0);
        let mut vel = Vec2::new(0.0, 240.0);
        let contacts = resolve_platforms(
            &mut pos,
            &mut vel,
            Vec2::splat(32.0),
            Vec2::new(10.0, 66.0),
            &[cloud],
        );
        assert!(!contacts.ground);
        assert_eq!(pos.y, 70.0);
    }

    #[test]
    fn test_contacts_summary() {
        let size = Vec2::splat(32.0);
        let ceiling = [ground(0.0, 100.0, 200.0, 32.0)];
        let mut pos = Vec2::new(10.0, 128.0);
        let mut vel = Vec2::new(0.0, -300.0);
        let contacts = resolve_platforms(&mut pos, &mut vel, size, Vec2::new(10.0, 134.0), &ceiling);
        assert_eq!(contacts, Contacts::default());
        assert_eq!(pos.y, 132.0);

        let wall = [ground(100.0, 0.0, 32.0, 200.0)];
        let mut pos = Vec2::new(70.0, 50.0);
        let mut vel = Vec2::new(180.0, 0.0);
        let contacts = resolve_platforms(&mut pos, &mut vel, size, Vec2::new(66.0, 50.0), &wall);
        assert!(!contacts.ground);
        assert_eq!(contacts.wall, Some(Contact::WallRight));
        assert!(contacts.wall.is_some_and(Contact::is_wall));
        assert!(!Contact::Ceiling.is_wall());
    }

    #[test]
    fn test_point_supported() {
        let platforms = [ground(0.0, 100.0, 64.0, 32.0)];
        assert!(point_supported(Vec2::new(10.0, 100.0), &platforms));
        assert!(!point_supported(Vec2::new(80.0, 100.0), &platforms));
        assert!(!point_supported(Vec2::new(10.0, 99.0), &platforms));
    }
}
