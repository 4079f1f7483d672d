//! Parametric flight paths for enemy waves.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::str::FromStr;

use nalgebra::{Vector2, Vector3};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SimError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    Circle,
    Ellipse,
    /// Straight dive from above the field to below it.
    Line,
}

impl FromStr for CurveKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(CurveKind::Circle),
            "ellipse" => Ok(CurveKind::Ellipse),
            "line" | "vline" => Ok(CurveKind::Line),
            _ => Err(SimError::UnknownCurve(s.to_string())),
        }
    }
}

// ── Presets ──────────────────────────────────────────────────────────────────
// Small fixed lists keep consecutive waves from stacking on one another.

const ORBIT_CENTERS: [(f32, f32); 3] = [(-0.4, 0.25), (0.4, 0.25), (0.0, 0.4)];
const CIRCLE_RADII: [f32; 2] = [0.35, 0.45];
const ELLIPSE_RADII: [(f32, f32); 2] = [(0.6, 0.3), (0.45, 0.25)];
const DIVE_LANES: [f32; 4] = [-0.6, -0.2, 0.2, 0.6];
const DIVE_TOP: f32 = 1.3;
const DIVE_BOTTOM: f32 = -1.3;

fn orbit_center(rng: &mut impl Rng) -> Vector2<f32> {
    let &(x, y) = ORBIT_CENTERS.choose(rng).unwrap_or(&ORBIT_CENTERS[0]);
    Vector2::new(x, y)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    /// Full turn starting at the top of the orbit.
    Ellipse {
        center: Vector2<f32>,
        radius_x: f32,
        radius_y: f32,
    },
    Line {
        start: Vector2<f32>,
        end: Vector2<f32>,
    },
}

impl Curve {
    pub fn circle(center: Vector2<f32>, radius: f32) -> Self {
        Curve::Ellipse {
            center,
            radius_x: radius,
            radius_y: radius,
        }
    }

    pub fn ellipse(center: Vector2<f32>, radius_x: f32, radius_y: f32) -> Self {
        Curve::Ellipse {
            center,
            radius_x,
            radius_y,
        }
    }

    pub fn line(start: Vector2<f32>, end: Vector2<f32>) -> Self {
        Curve::Line { start, end }
    }

    /// Pick parameters for `kind` from the preset lists.
    pub fn random(kind: CurveKind, rng: &mut impl Rng) -> Self {
        match kind {
            CurveKind::Circle => {
                let radius = *CIRCLE_RADII.choose(rng).unwrap_or(&CIRCLE_RADII[0]);
                Curve::circle(orbit_center(rng), radius)
            }
            CurveKind::Ellipse => {
                let &(rx, ry) = ELLIPSE_RADII.choose(rng).unwrap_or(&ELLIPSE_RADII[0]);
                Curve::ellipse(orbit_center(rng), rx, ry)
            }
            CurveKind::Line => {
                let x = *DIVE_LANES.choose(rng).unwrap_or(&DIVE_LANES[0]);
                Curve::line(Vector2::new(x, DIVE_TOP), Vector2::new(x, DIVE_BOTTOM))
            }
        }
    }

    /// Point at parameter `t`; `t` in `[0, 1]` covers the whole path.
    pub fn sample(&self, t: f32) -> Vector2<f32> {
        match *self {
            Curve::Ellipse {
                center,
                radius_x,
                radius_y,
            } => {
                let angle = FRAC_PI_2 + t * TAU;
                center + Vector2::new(radius_x * angle.cos(), radius_y * angle.sin())
            }
            Curve::Line { start, end } => start + (end - start) * t,
        }
    }

    /// `divisions + 1` evenly spaced points, for drawing the path.
    pub fn points(&self, divisions: usize) -> Vec<Vector2<f32>> {
        let n = divisions.max(1);
        (0..=n).map(|i| self.sample(i as f32 / n as f32)).collect()
    }
}

/// Choose a curve family by weight.  `None` when the table is empty or
/// every weight is zero.
pub fn choose_kind(weights: &[(CurveKind, u32)], rng: &mut impl Rng) -> Option<CurveKind> {
    let index = WeightedIndex::new(weights.iter().map(|&(_, w)| w)).ok()?;
    Some(weights[index.sample(rng)].0)
}

/// Maps curve-local points into world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceFrame {
    pub origin: Vector3<f32>,
    pub scale: f32,
}

impl ReferenceFrame {
    pub fn at_depth(depth: f32) -> Self {
        Self {
            origin: Vector3::new(0.0, 0.0, depth),
            scale: 1.0,
        }
    }

    pub fn to_world(&self, local: Vector2<f32>) -> Vector3<f32> {
        self.origin + Vector3::new(local.x, local.y, 0.0) * self.scale
    }
}
