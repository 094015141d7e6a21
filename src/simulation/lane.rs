use super::{wrap_to_pi, Point, Vec2};
use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

/// Newton iteration cap for projecting onto a curved centerline.
const PROJECTION_MAX_ITERATIONS: usize = 50;
/// Projection has converged once a Newton step moves less than this [m].
const PROJECTION_TOLERANCE: f64 = 1e-9;
/// Spacing of the coarse centerline sampling used when Newton fails [m].
const FALLBACK_SAMPLE_SPACING: f64 = 1.0;

/// Marking drawn along a lane edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    None,
    #[default]
    Striped,
    Continuous,
    ContinuousLine,
}

/// A lane centerline together with its width and markings.
///
/// Longitudinal coordinates `s` live in `[0, length]`. Queries outside that
/// interval are answered by extending the lane along its boundary tangent.
/// Lateral offsets are positive to the left of the direction of travel.
#[derive(Debug, Clone, PartialEq)]
pub enum Lane {
    Straight(StraightLane),
    Sine(SineLane),
}

impl Lane {
    /// World position `lateral` meters off the centerline at progress `s`.
    pub fn position(&self, s: f64, lateral: f64) -> Point {
        match self {
            Lane::Straight(lane) => lane.position(s, lateral),
            Lane::Sine(lane) => lane.position(s, lateral),
        }
    }

    /// Centerline tangent direction at `s` [rad].
    pub fn heading_at(&self, s: f64) -> f64 {
        match self {
            Lane::Straight(lane) => lane.heading_at(s),
            Lane::Sine(lane) => lane.heading_at(s),
        }
    }

    pub fn width_at(&self, _s: f64) -> f64 {
        self.width()
    }

    pub fn width(&self) -> f64 {
        self.base().width
    }

    pub fn length(&self) -> f64 {
        self.base().length
    }

    pub fn line_types(&self) -> [LineType; 2] {
        self.base().line_types
    }

    /// Inverse of [`Lane::position`]: `(s, lateral)` of a world point.
    pub fn local_coordinates(&self, point: &Point) -> (f64, f64) {
        match self {
            Lane::Straight(lane) => lane.local_coordinates(point),
            Lane::Sine(lane) => lane.local_coordinates(point),
        }
    }

    pub fn on_lane(&self, point: &Point) -> bool {
        let (s, lateral) = self.local_coordinates(point);
        lateral.abs() <= self.width_at(s) / 2.0 && (0.0..=self.length()).contains(&s)
    }

    /// Whether the point has been carried past the end of the lane.
    pub fn after_end(&self, point: &Point) -> bool {
        let (s, _) = self.local_coordinates(point);
        s > self.length()
    }

    /// Lateral offset plus any longitudinal overshoot past either end.
    pub fn distance(&self, point: &Point) -> f64 {
        let (s, lateral) = self.local_coordinates(point);
        lateral.abs() + (s - self.length()).max(0.0) + (-s).max(0.0)
    }

    fn base(&self) -> &StraightLane {
        match self {
            Lane::Straight(lane) => lane,
            Lane::Sine(lane) => &lane.base,
        }
    }
}

impl From<StraightLane> for Lane {
    fn from(lane: StraightLane) -> Self {
        Lane::Straight(lane)
    }
}

impl From<SineLane> for Lane {
    fn from(lane: SineLane) -> Self {
        Lane::Sine(lane)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StraightLane {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub line_types: [LineType; 2],
    length: f64,
    heading: f64,
    direction: Vec2,
    direction_lateral: Vec2,
}

impl StraightLane {
    pub fn new(start: Point, end: Point, width: f64, line_types: [LineType; 2]) -> Self {
        let delta = end - start;
        let length = delta.magnitude();
        let direction = if length > 0.0 { delta / length } else { Vector2::x() };

        Self {
            start,
            end,
            width,
            line_types,
            length,
            heading: direction.y.atan2(direction.x),
            direction,
            direction_lateral: Vector2::new(-direction.y, direction.x),
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn position(&self, s: f64, lateral: f64) -> Point {
        self.start + self.direction * s + self.direction_lateral * lateral
    }

    pub fn heading_at(&self, _s: f64) -> f64 {
        self.heading
    }

    pub fn local_coordinates(&self, point: &Point) -> (f64, f64) {
        let delta = *point - self.start;
        (delta.dot(&self.direction), delta.dot(&self.direction_lateral))
    }

    /// Express a world point in the lane frame (x along, y to the left).
    fn frame_coordinates(&self, point: &Point) -> Vec2 {
        let (s, lateral) = self.local_coordinates(point);
        Vector2::new(s, lateral)
    }

    fn world_position(&self, local: &Vec2) -> Point {
        self.position(local.x, local.y)
    }
}

/// A lane whose centerline oscillates as
/// `amplitude * sin(pulsation * s + phase)` around a straight base line.
///
/// `s` is progress along the base line rather than true arclength; for the
/// small amplitudes used here the difference is tolerated.
#[derive(Debug, Clone, PartialEq)]
pub struct SineLane {
    base: StraightLane,
    pub amplitude: f64,
    pub pulsation: f64,
    pub phase: f64,
    /// Newton iteration budget before falling back to sampling
    max_iterations: usize,
}

#[derive(Debug, Clone, Copy, Error)]
#[error(
    "projection onto sine lane did not converge after {iterations} iterations \
     (last step {last_step:.3e} m)"
)]
struct ProjectionFailure {
    iterations: usize,
    last_step: f64,
}

impl SineLane {
    pub fn new(
        start: Point,
        end: Point,
        amplitude: f64,
        pulsation: f64,
        phase: f64,
        width: f64,
        line_types: [LineType; 2],
    ) -> Self {
        Self {
            base: StraightLane::new(start, end, width, line_types),
            amplitude,
            pulsation,
            phase,
            max_iterations: PROJECTION_MAX_ITERATIONS,
        }
    }

    pub fn position(&self, s: f64, lateral: f64) -> Point {
        let local = self.centerline(s) + self.normal(s) * lateral;
        self.base.world_position(&local)
    }

    pub fn heading_at(&self, s: f64) -> f64 {
        let s = self.clamp(s);
        wrap_to_pi(self.base.heading + self.slope(s).atan())
    }

    pub fn local_coordinates(&self, point: &Point) -> (f64, f64) {
        let local = self.base.frame_coordinates(point);

        let s = match self.project(&local) {
            Ok(s) => s,
            Err(failure) => {
                debug!("{}, falling back to sampled centerline", failure);
                self.nearest_sample(&local)
            }
        };

        let lateral = (local - self.centerline(s)).dot(&self.normal(s));
        (s, lateral)
    }

    fn clamp(&self, s: f64) -> f64 {
        s.clamp(0.0, self.base.length)
    }

    fn slope(&self, s: f64) -> f64 {
        self.amplitude * self.pulsation * (self.pulsation * s + self.phase).cos()
    }

    /// Centerline in the base frame, extended linearly past both ends.
    fn centerline(&self, s: f64) -> Vec2 {
        let clamped = self.clamp(s);
        let lateral = self.amplitude * (self.pulsation * clamped + self.phase).sin();
        let anchor = Vector2::new(clamped, lateral);
        anchor + self.derivative(s) * (s - clamped)
    }

    fn derivative(&self, s: f64) -> Vec2 {
        Vector2::new(1.0, self.slope(self.clamp(s)))
    }

    fn second_derivative(&self, s: f64) -> Vec2 {
        if s < 0.0 || s > self.base.length {
            return Vector2::zeros();
        }
        let angle = self.pulsation * s + self.phase;
        let curvature = -self.amplitude * self.pulsation.powi(2) * angle.sin();
        Vector2::new(0.0, curvature)
    }

    fn normal(&self, s: f64) -> Vec2 {
        let tangent = self.derivative(s).normalize();
        Vector2::new(-tangent.y, tangent.x)
    }

    /// Newton search for the `s` closest to `local`, seeded with the
    /// projection onto the base line.
    fn project(&self, local: &Vec2) -> Result<f64, ProjectionFailure> {
        // Keep each step within a quarter wavelength so the search cannot
        // jump across a crest.
        let max_step =
            if self.pulsation > 0.0 { FRAC_PI_2 / self.pulsation } else { f64::INFINITY };

        let mut s = local.x;
        let mut last_step = f64::INFINITY;

        for _ in 0..self.max_iterations {
            let offset = self.centerline(s) - *local;
            let first = self.derivative(s);
            let gradient = offset.dot(&first);
            let hessian = first.norm_squared() + offset.dot(&self.second_derivative(s));
            // Gauss-Newton when the distance is locally concave
            let denominator = if hessian > f64::EPSILON { hessian } else { first.norm_squared() };

            let step = (gradient / denominator).clamp(-max_step, max_step);
            s -= step;
            last_step = step.abs();

            if last_step < PROJECTION_TOLERANCE {
                return Ok(s);
            }
        }

        Err(ProjectionFailure {
            iterations: self.max_iterations,
            last_step,
        })
    }

    fn nearest_sample(&self, local: &Vec2) -> f64 {
        let length = self.base.length;
        let samples = (length / FALLBACK_SAMPLE_SPACING).ceil().max(1.0) as usize;
        let distance = |s: f64| (self.centerline(s) - *local).norm_squared();

        (0..=samples)
            .map(|i| length * i as f64 / samples as f64)
            .min_by(|a, b| distance(*a).total_cmp(&distance(*b)))
            .unwrap_or(0.0)
    }
}
