/// Timing curve of a key segment. Maps the raw segment factor in [0, 1] to the
/// factor used for blending the two keys.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Curve {
    Instant,
    Linear,
    Quadratic(f32),
    Cubic(f32, f32),
    Quartic(f32, f32, f32),
    Quintic(f32, f32, f32, f32),
    Bezier(CubicBezierRegion),
}

impl Default for Curve {
    fn default() -> Self {
        Self::Linear
    }
}

impl Curve {
    /// Builds a curve from the SCON `curve_type` name and its `c1..c4` values.
    pub fn parse(curve_type: &str, c: [f32; 4]) -> Option<Self> {
        let curve = match curve_type {
            "instant" => Self::Instant,
            "linear" => Self::Linear,
            "quadratic" => Self::Quadratic(c[0]),
            "cubic" => Self::Cubic(c[0], c[1]),
            "quartic" => Self::Quartic(c[0], c[1], c[2]),
            "quintic" => Self::Quintic(c[0], c[1], c[2], c[3]),
            "bezier" => Self::Bezier(CubicBezierRegion::timing(c[0], c[1], c[2], c[3])),
            _ => return None,
        };
        Some(curve)
    }

    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Curve::Instant => 0.0,
            Curve::Linear => t,
            Curve::Quadratic(c1) => quadratic(0.0, c1, 1.0, t),
            Curve::Cubic(c1, c2) => cubic(0.0, c1, c2, 1.0, t),
            Curve::Quartic(c1, c2, c3) => quartic(0.0, c1, c2, c3, 1.0, t),
            Curve::Quintic(c1, c2, c3, c4) => quintic(0.0, c1, c2, c3, c4, 1.0, t),
            Curve::Bezier(ref region) => region.sample_at(region.find_t(t)),
        }
    }

    pub fn is_instant(&self) -> bool {
        matches!(self, Curve::Instant)
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn quadratic(a: f32, b: f32, c: f32, t: f32) -> f32 {
    lerp(lerp(a, b, t), lerp(b, c, t), t)
}

fn cubic(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    lerp(quadratic(a, b, c, t), quadratic(b, c, d, t), t)
}

fn quartic(a: f32, b: f32, c: f32, d: f32, e: f32, t: f32) -> f32 {
    lerp(cubic(a, b, c, d, t), cubic(b, c, d, e, t), t)
}

fn quintic(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32, t: f32) -> f32 {
    lerp(quartic(a, b, c, d, e, t), quartic(b, c, d, e, f, t), t)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezierRegion {
    start_x: f32,
    start_y: f32,
    handle_0_x: f32,
    handle_0_y: f32,
    handle_1_x: f32,
    handle_1_y: f32,
    end_x: f32,
    end_y: f32
}

impl CubicBezierRegion {
    /// Timing curve running from (0, 0) to (1, 1).
    pub fn timing(handle_0_x: f32, handle_0_y: f32, handle_1_x: f32, handle_1_y: f32) -> Self {
        Self {
            start_x: 0.0,
            start_y: 0.0,
            handle_0_x,
            handle_0_y,
            handle_1_x,
            handle_1_y,
            end_x: 1.0,
            end_y: 1.0
        }
    }

    /// Finds the curve parameter whose x coordinate is `x`. The x handles of a
    /// timing curve stay inside [0, 1] so x(t) is monotonic and bisection is safe.
    pub fn find_t(&self, x: f32) -> f32 {
        const EPS: f32 = 0.00001;
        const MAX_STEPS: usize = 32;
        let (mut l, mut r) = (0.0f32, 1.0f32);
        let mut t = x;
        for _ in 0..MAX_STEPS {
            let sample = CubicBezierRegion::cubic_resolve(
                t,
                self.start_x,
                self.handle_0_x,
                self.handle_1_x,
                self.end_x
            );
            if (sample - x).abs() <= EPS {
                break;
            }
            if sample > x { r = t; } else { l = t; }
            t = (l + r) * 0.5;
        }
        t
    }

    pub fn sample_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        CubicBezierRegion::cubic_resolve(
            t,
            self.start_y,
            self.handle_0_y,
            self.handle_1_y,
            self.end_y
        )
    }

    fn cubic_resolve(t: f32, k1: f32, k2: f32, k3: f32, k4: f32) -> f32 {
        let (a, b, c) = ( k1 + (k2 - k1) * t, k2 + (k3 - k2) * t, k3 + (k4 - k3) * t);
        let (d, e) = (a + (b - a) * t, b + (c - b) * t);
        d + (e - d) * t
    }
}
