//! Layered UV coordinate modification.
//!
//! A modifier is a global transform plus a priority-ordered list of
//! mappings, each scoped to a masked region of UV space. Samplers run
//! coordinates through the modifier before wrapping.

/// A single UV transform: pivot-relative scale, shear, and rotation,
/// followed by an offset. Optional speeds drive time-based scrolling and
/// spinning via [`UvModifier::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    /// U offset, applied last.
    pub offset_u: f64,
    /// V offset, applied last.
    pub offset_v: f64,
    /// U scale about the pivot.
    pub scale_u: f64,
    /// V scale about the pivot.
    pub scale_v: f64,
    /// Rotation about the pivot, in radians.
    pub rotation: f64,
    /// U shear factor.
    pub skew_u: f64,
    /// V shear factor.
    pub skew_v: f64,
    /// Pivot U coordinate.
    pub pivot_u: f64,
    /// Pivot V coordinate.
    pub pivot_v: f64,
    /// Rotation speed in radians per second.
    pub rotation_speed: f64,
    /// U scroll speed per second.
    pub scroll_speed_u: f64,
    /// V scroll speed per second.
    pub scroll_speed_v: f64,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            offset_u: 0.0,
            offset_v: 0.0,
            scale_u: 1.0,
            scale_v: 1.0,
            rotation: 0.0,
            skew_u: 0.0,
            skew_v: 0.0,
            pivot_u: 0.5,
            pivot_v: 0.5,
            rotation_speed: 0.0,
            scroll_speed_u: 0.0,
            scroll_speed_v: 0.0,
        }
    }
}

impl UvTransform {
    /// Create an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the transform to a UV coordinate pair.
    pub fn apply(&self, u: f64, v: f64) -> (f64, f64) {
        // Translate to the pivot.
        let mut u = u - self.pivot_u;
        let mut v = v - self.pivot_v;

        u *= self.scale_u;
        v *= self.scale_v;

        // Sequential shear: the v shear reads the already-sheared u.
        u += v * self.skew_u;
        v += u * self.skew_v;

        if self.rotation != 0.0 {
            let cos = self.rotation.cos();
            let sin = self.rotation.sin();
            let ru = u * cos - v * sin;
            let rv = u * sin + v * cos;
            u = ru;
            v = rv;
        }

        u += self.pivot_u;
        v += self.pivot_v;

        (u + self.offset_u, v + self.offset_v)
    }

    fn advance(&mut self, dt: f64) {
        if self.rotation_speed != 0.0 {
            self.rotation = (self.rotation + self.rotation_speed * dt)
                .rem_euclid(std::f64::consts::TAU);
        }
        self.offset_u += self.scroll_speed_u * dt;
        self.offset_v += self.scroll_speed_v * dt;
    }
}

/// How a mapping's transformed coordinates blend with the incoming ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UvBlendMode {
    /// Interpolate toward the transformed coordinates by the region weight.
    #[default]
    Replace,
    /// Add the weighted transformed coordinates.
    Add,
    /// Multiply by the transformed coordinates, weighted.
    Multiply,
    /// Photoshop-style overlay, weighted.
    Overlay,
}

/// Shape of a region mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UvMask {
    /// Uniform weight 1 inside the rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the rectangle; weight falls off as 1 - r^2.
    Ellipse,
    /// Linear gradient in u from 0 at min_u to 1 at max_u; never excludes.
    Gradient,
}

/// A rectangular region of UV space with a mask shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRegion {
    /// Minimum U of the region.
    pub min_u: f64,
    /// Maximum U of the region.
    pub max_u: f64,
    /// Minimum V of the region.
    pub min_v: f64,
    /// Maximum V of the region.
    pub max_v: f64,
    /// Mask shape of the region.
    pub mask: UvMask,
}

impl UvRegion {
    /// Full [0, 1] x [0, 1] region.
    pub fn full(mask: UvMask) -> Self {
        Self { min_u: 0.0, max_u: 1.0, min_v: 0.0, max_v: 1.0, mask }
    }

    /// Whether a coordinate falls inside the region.
    pub fn contains(&self, u: f64, v: f64) -> bool {
        match self.mask {
            UvMask::Rectangle => {
                u >= self.min_u && u <= self.max_u && v >= self.min_v && v <= self.max_v
            }
            UvMask::Ellipse => {
                let cu = (self.min_u + self.max_u) * 0.5;
                let cv = (self.min_v + self.max_v) * 0.5;
                let ru = (self.max_u - self.min_u) * 0.5;
                let rv = (self.max_v - self.min_v) * 0.5;
                let du = (u - cu) / ru;
                let dv = (v - cv) / rv;
                du * du + dv * dv <= 1.0
            }
            UvMask::Gradient => true,
        }
    }

    /// Influence weight of the region at a coordinate.
    pub fn weight(&self, u: f64, v: f64) -> f64 {
        match self.mask {
            UvMask::Rectangle => 1.0,
            UvMask::Ellipse => {
                let cu = (self.min_u + self.max_u) * 0.5;
                let cv = (self.min_v + self.max_v) * 0.5;
                let ru = (self.max_u - self.min_u) * 0.5;
                let rv = (self.max_v - self.min_v) * 0.5;
                let du = (u - cu) / ru;
                let dv = (v - cv) / rv;
                let distance = (du * du + dv * dv).sqrt();
                if distance <= 1.0 {
                    1.0 - distance * distance
                } else {
                    0.0
                }
            }
            UvMask::Gradient => {
                if u <= self.min_u {
                    0.0
                } else if u >= self.max_u {
                    1.0
                } else {
                    (u - self.min_u) / (self.max_u - self.min_u)
                }
            }
        }
    }
}

/// One scoped transform layer of a [`UvModifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct UvMapping {
    /// Mapping name, for lookup and removal.
    pub name: String,
    /// Disabled mappings are skipped.
    pub enabled: bool,
    /// Region the mapping applies to.
    pub region: UvRegion,
    /// Transform applied inside the region.
    pub transform: UvTransform,
    /// Blend mode against the incoming coordinates.
    pub blend: UvBlendMode,
    /// Higher priorities apply first.
    pub priority: i32,
}

impl UvMapping {
    /// Create an enabled mapping.
    pub fn new(name: impl Into<String>, region: UvRegion, transform: UvTransform) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            region,
            transform,
            blend: UvBlendMode::Replace,
            priority: 0,
        }
    }

    /// Set the blend mode.
    pub fn with_blend(mut self, blend: UvBlendMode) -> Self {
        self.blend = blend;
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// A stack of layered UV transforms: a global transform plus
/// priority-ordered masked mappings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UvModifier {
    mappings: Vec<UvMapping>,
    /// Transform applied before any mapping.
    pub global: UvTransform,
}

impl UvModifier {
    /// Create a modifier with an identity global transform and no
    /// mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping, keeping the list sorted by descending priority.
    /// Insertion order breaks ties.
    pub fn add_mapping(&mut self, mapping: UvMapping) {
        let at = self
            .mappings
            .partition_point(|m| m.priority >= mapping.priority);
        self.mappings.insert(at, mapping);
    }

    /// Remove a mapping by name. Returns whether one was removed.
    pub fn remove_mapping(&mut self, name: &str) -> bool {
        let before = self.mappings.len();
        self.mappings.retain(|m| m.name != name);
        self.mappings.len() != before
    }

    /// Look up a mapping by name.
    pub fn mapping_mut(&mut self, name: &str) -> Option<&mut UvMapping> {
        self.mappings.iter_mut().find(|m| m.name == name)
    }

    /// Advance scroll and rotation animation by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.global.advance(dt);
        for mapping in &mut self.mappings {
            if mapping.enabled {
                mapping.transform.advance(dt);
            }
        }
    }

    /// Run a UV coordinate through the global transform and every enabled
    /// mapping whose region contains it, in descending priority order.
    pub fn transform_uv(&self, u: f64, v: f64) -> (f64, f64) {
        let (mut u, mut v) = self.global.apply(u, v);

        for mapping in &self.mappings {
            if !mapping.enabled || !mapping.region.contains(u, v) {
                continue;
            }
            let w = mapping.region.weight(u, v);
            let (nu, nv) = mapping.transform.apply(u, v);
            let (bu, bv) = blend(mapping.blend, u, v, nu, nv, w);
            u = bu;
            v = bv;
        }

        (u, v)
    }
}

fn blend(mode: UvBlendMode, u1: f64, v1: f64, u2: f64, v2: f64, w: f64) -> (f64, f64) {
    match mode {
        UvBlendMode::Replace => (u1 * (1.0 - w) + u2 * w, v1 * (1.0 - w) + v2 * w),
        UvBlendMode::Add => (u1 + u2 * w, v1 + v2 * w),
        UvBlendMode::Multiply => (
            u1 * (1.0 - w) + u1 * u2 * w,
            v1 * (1.0 - w) + v1 * v2 * w,
        ),
        UvBlendMode::Overlay => {
            let overlay = |a: f64, b: f64| {
                if a < 0.5 {
                    2.0 * a * b
                } else {
                    1.0 - 2.0 * (1.0 - a) * (1.0 - b)
                }
            };
            (
                u1 * (1.0 - w) + overlay(u1, u2) * w,
                v1 * (1.0 - w) + overlay(v1, v2) * w,
            )
        }
    }
}
