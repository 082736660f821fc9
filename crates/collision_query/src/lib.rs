//! collision_query: static colliders, layer-filtered sphere casts, and a
//! kinematic capsule body with penetration resolve + grounding.
//!
//! The index is a flat collider list; every query walks it with a cheap
//! narrow test per shape. Collider counts a single character cares about
//! stay small enough that no broadphase is needed.

#![deny(warnings, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::many_single_char_names)]

use glam::Vec3;
use smallvec::SmallVec;

/// Collision layer bit set. Colliders carry one or more bits; queries pass a
/// mask and only colliders whose bits intersect the mask are considered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Axis-aligned box collider.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Upright cylinder collider (axis along +Y).
#[derive(Clone, Copy, Debug)]
pub struct CylinderY {
    pub center: Vec3,
    pub radius: f32,
    pub half_height: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum ShapeRef {
    Box(Aabb),
    Cyl(CylinderY),
}

#[derive(Clone, Copy, Debug)]
pub struct StaticCollider {
    pub shape: ShapeRef,
    pub layers: LayerMask,
    pub is_trigger: bool,
}

impl StaticCollider {
    /// Solid collider on all layers.
    #[must_use]
    pub fn solid(shape: ShapeRef) -> Self {
        Self {
            shape,
            layers: LayerMask::ALL,
            is_trigger: false,
        }
    }
}

/// Flat list of static colliders shared by all queries.
#[derive(Clone, Debug, Default)]
pub struct StaticIndex {
    pub colliders: Vec<StaticCollider>,
}

/// Nearest blocking surface reported by a sphere cast.
#[derive(Clone, Copy, Debug)]
pub struct CastHit {
    pub distance: f32,
    pub normal: Vec3,
}

impl StaticIndex {
    /// Sweep a sphere of `radius` from `origin` along unit `dir` for at most
    /// `max_dist`, against colliders matching `mask`.
    ///
    /// A collider the sphere already overlaps at the start reports a hit at
    /// distance zero; ground probes rely on that.
    #[must_use]
    pub fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        dir: Vec3,
        max_dist: f32,
        mask: LayerMask,
        ignore_triggers: bool,
    ) -> Option<CastHit> {
        let mut best: Option<CastHit> = None;
        for c in &self.colliders {
            if ignore_triggers && c.is_trigger {
                continue;
            }
            if !c.layers.intersects(mask) {
                continue;
            }
            let hit = match c.shape {
                ShapeRef::Box(b) => cast_sphere_box(origin, radius, dir, max_dist, &b),
                ShapeRef::Cyl(cy) => cast_sphere_cyl(origin, radius, dir, max_dist, &cy),
            };
            if let Some(h) = hit {
                if best.is_none_or(|b| h.distance < b.distance) {
                    best = Some(h);
                }
            }
        }
        best
    }
}

fn cast_sphere_box(origin: Vec3, radius: f32, dir: Vec3, max_dist: f32, b: &Aabb) -> Option<CastHit> {
    // Minkowski-expand the box by the sphere radius, then slab-test the ray.
    let min = b.min - Vec3::splat(radius);
    let max = b.max + Vec3::splat(radius);
    let mut t_min = 0.0f32;
    let mut t_max = max_dist;
    // Entry normal; stays -dir for the initially-overlapping case.
    let mut normal = -dir;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-8 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_min {
            t_min = t0;
            let mut n = Vec3::ZERO;
            n[axis] = -d.signum();
            normal = n;
        }
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(CastHit {
        distance: t_min,
        normal,
    })
}

fn cast_sphere_cyl(
    origin: Vec3,
    radius: f32,
    dir: Vec3,
    max_dist: f32,
    c: &CylinderY,
) -> Option<CastHit> {
    let rr = c.radius + radius;
    let top = c.center.y + c.half_height;
    let bot = c.center.y - c.half_height;
    let ox = origin.x - c.center.x;
    let oz = origin.z - c.center.z;
    let lateral2 = ox * ox + oz * oz;
    let in_band = origin.y >= bot - radius && origin.y <= top + radius;
    if lateral2 <= rr * rr && in_band {
        return Some(CastHit {
            distance: 0.0,
            normal: lateral_normal(ox, oz),
        });
    }

    let mut best: Option<CastHit> = None;
    // Lateral surface: quadratic in the XZ plane against the expanded radius.
    let a = dir.x * dir.x + dir.z * dir.z;
    if a > 1e-8 {
        let b2 = 2.0 * (ox * dir.x + oz * dir.z);
        let cq = lateral2 - rr * rr;
        let disc = b2 * b2 - 4.0 * a * cq;
        if disc >= 0.0 {
            let t = (-b2 - disc.sqrt()) / (2.0 * a);
            if (0.0..=max_dist).contains(&t) {
                let y = origin.y + dir.y * t;
                if y >= bot - radius && y <= top + radius {
                    let hx = ox + dir.x * t;
                    let hz = oz + dir.z * t;
                    best = Some(CastHit {
                        distance: t,
                        normal: lateral_normal(hx, hz),
                    });
                }
            }
        }
    }
    // Cap planes (flat approximation of the rounded caps).
    if dir.y.abs() > 1e-8 {
        for (plane_y, n) in [(top + radius, Vec3::Y), (bot - radius, -Vec3::Y)] {
            let t = (plane_y - origin.y) / dir.y;
            if !(0.0..=max_dist).contains(&t) {
                continue;
            }
            // Must approach the cap from its outside.
            if (origin.y - plane_y) * dir.y >= 0.0 {
                continue;
            }
            let hx = origin.x + dir.x * t - c.center.x;
            let hz = origin.z + dir.z * t - c.center.z;
            if hx * hx + hz * hz <= rr * rr && best.is_none_or(|bst| t < bst.distance) {
                best = Some(CastHit {
                    distance: t,
                    normal: n,
                });
            }
        }
    }
    best
}

fn lateral_normal(x: f32, z: f32) -> Vec3 {
    let n = Vec3::new(x, 0.0, z);
    if n.length_squared() > 1e-12 {
        n.normalize()
    } else {
        Vec3::X
    }
}

#[derive(Clone, Copy, Debug)]
struct Contact {
    normal: Vec3,
    depth: f32,
}

const MAX_RESOLVE_ITERS: u32 = 4;

/// Kinematic capsule mover. `pos` is the foot point (bottom of the capsule);
/// the capsule axis runs up from there.
#[derive(Clone, Copy, Debug)]
pub struct CharacterBody {
    pub pos: Vec3,
    pub radius: f32,
    pub height: f32,
    pub skin_width: f32,
    pub slope_limit_deg: f32,
    grounded: bool,
}

impl CharacterBody {
    #[must_use]
    pub fn new(pos: Vec3, radius: f32, height: f32) -> Self {
        Self {
            pos,
            radius,
            height: height.max(2.0 * radius),
            skin_width: 0.05,
            slope_limit_deg: 45.0,
            grounded: false,
        }
    }

    /// True while the last `move_by` ended with a supporting contact.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Apply `disp` in one step and push the capsule out of any colliders it
    /// ended up penetrating. A contact whose normal is within the slope limit
    /// of +Y counts as ground.
    pub fn move_by(&mut self, disp: Vec3, index: &StaticIndex) {
        self.pos += disp;
        self.grounded = false;
        let min_ground_ny = self.slope_limit_deg.to_radians().cos();
        for _ in 0..MAX_RESOLVE_ITERS {
            let mut contacts: SmallVec<[Contact; 8]> = SmallVec::new();
            self.collect_contacts(index, &mut contacts);
            if contacts.is_empty() {
                break;
            }
            for ct in &contacts {
                if ct.normal.y >= min_ground_ny {
                    self.grounded = true;
                }
            }
            let Some(best) = contacts
                .iter()
                .copied()
                .max_by(|a, b| a.depth.total_cmp(&b.depth))
            else {
                break;
            };
            if best.depth <= 1e-4 {
                break;
            }
            self.pos += best.normal * best.depth;
        }
    }

    fn collect_contacts(&self, index: &StaticIndex, out: &mut SmallVec<[Contact; 8]>) {
        for c in &index.colliders {
            if c.is_trigger {
                continue;
            }
            let contact = match c.shape {
                ShapeRef::Box(b) => capsule_vs_box(self.pos, self.radius, self.height, &b),
                ShapeRef::Cyl(cy) => capsule_vs_cyl(self.pos, self.radius, self.height, &cy),
            };
            if let Some(ct) = contact {
                out.push(ct);
            }
        }
    }
}

fn capsule_vs_box(pos: Vec3, radius: f32, height: f32, b: &Aabb) -> Option<Contact> {
    // Vertical capsule: pick the axis point nearest the box in Y, then test
    // that sphere against the box.
    let p0y = pos.y + radius;
    let p1y = pos.y + height - radius;
    let box_cy = (b.min.y + b.max.y) * 0.5;
    let sc = Vec3::new(pos.x, box_cy.clamp(p0y, p1y), pos.z);
    let q = sc.clamp(b.min, b.max);
    let d = sc - q;
    let d2 = d.length_squared();
    if d2 > 1e-12 {
        let dist = d2.sqrt();
        let depth = radius - dist;
        if depth > 0.0 {
            return Some(Contact {
                normal: d / dist,
                depth,
            });
        }
        return None;
    }
    // Sphere center inside the box: push out through the nearest face.
    let mut best_depth = f32::MAX;
    let mut best_normal = Vec3::Y;
    for axis in 0..3 {
        let to_min = sc[axis] - b.min[axis];
        if to_min < best_depth {
            best_depth = to_min;
            let mut n = Vec3::ZERO;
            n[axis] = -1.0;
            best_normal = n;
        }
        let to_max = b.max[axis] - sc[axis];
        if to_max < best_depth {
            best_depth = to_max;
            let mut n = Vec3::ZERO;
            n[axis] = 1.0;
            best_normal = n;
        }
    }
    Some(Contact {
        normal: best_normal,
        depth: best_depth + radius,
    })
}

fn capsule_vs_cyl(pos: Vec3, radius: f32, height: f32, c: &CylinderY) -> Option<Contact> {
    let p0y = pos.y + radius;
    let p1y = pos.y + height - radius;
    let y_closest = c.center.y.clamp(p0y, p1y);
    let top = c.center.y + c.half_height;
    let bot = c.center.y - c.half_height;
    let dx = pos.x - c.center.x;
    let dz = pos.z - c.center.z;
    let dist = (dx * dx + dz * dz).sqrt();
    let allowed = c.radius + radius;
    let depth = allowed - dist;
    let y_penetrates = y_closest >= bot - radius && y_closest <= top + radius;
    if depth > 0.0 && y_penetrates {
        let normal = if dist > 1e-6 {
            Vec3::new(dx / dist, 0.0, dz / dist)
        } else {
            Vec3::X
        };
        return Some(Contact { normal, depth });
    }
    None
}
