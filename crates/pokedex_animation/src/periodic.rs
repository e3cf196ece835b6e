//! Looping decorative motions
//!
//! Float (vertical sine bob), rotate (continuous turn) and square-path
//! motions are pure functions of a repeating timeline value in [0, 1]. The
//! timeline only advances while its element is active; when deactivated it
//! freezes where it is rather than snapping back.

use std::f32::consts::TAU;

use pokedex_core::Vec2;

use crate::values::ElementTransform;

/// A repeating timeline, optionally running back and forth
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopingTimeline {
    period_secs: f32,
    reverse: bool,
    elapsed: f32,
    active: bool,
}

impl LoopingTimeline {
    /// A loop of `period_secs` seconds; non-positive periods are treated as
    /// one second
    pub fn new(period_secs: f32, reverse: bool) -> Self {
        let period_secs = if period_secs.is_finite() && period_secs > 0.0 {
            period_secs
        } else {
            tracing::warn!("Invalid loop period {}, using 1s", period_secs);
            1.0
        };
        Self {
            period_secs,
            reverse,
            elapsed: 0.0,
            active: false,
        }
    }

    pub fn period_secs(&self) -> f32 {
        self.period_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run or freeze the loop
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Advance by `dt` seconds if active
    pub fn advance(&mut self, dt: f32) {
        if !self.active || dt <= 0.0 || !dt.is_finite() {
            return;
        }
        // A reversing loop repeats every two periods
        let cycle = self.period_secs * 2.0;
        self.elapsed = (self.elapsed + dt) % cycle;
    }

    /// Current value in [0, 1]
    ///
    /// Sawtooth when not reversing, triangle wave when reversing.
    pub fn value(&self) -> f32 {
        let cycles = self.elapsed / self.period_secs;
        let frac = cycles.fract();
        if self.reverse && (cycles.floor() as u64) % 2 == 1 {
            1.0 - frac
        } else {
            frac
        }
    }
}

/// Vertical bob: `amplitude * sin(2πv)`
pub fn float_offset(value: f32, amplitude: f32) -> f32 {
    amplitude * (TAU * value).sin()
}

/// Continuous turn: one full revolution per unit of timeline
pub fn rotation_angle(value: f32) -> f32 {
    TAU * value
}

/// Walk the edges of a `side`-sized square, one edge per quarter
///
/// Quarter 0 moves right along x, 1 moves down along y, 2 moves left, 3 moves
/// up back to the origin. The path is continuous, including the wrap from
/// the end of quarter 3 to the start of quarter 0.
pub fn square_path(value: f32, side: f32) -> Vec2 {
    let v = if value.is_finite() {
        value.rem_euclid(1.0)
    } else {
        0.0
    };
    let scaled = v * 4.0;
    let quarter = (scaled.floor() as usize).min(3);
    let f = (scaled - quarter as f32).clamp(0.0, 1.0);

    match quarter {
        0 => Vec2::new(side * f, 0.0),
        1 => Vec2::new(side, side * f),
        2 => Vec2::new(side * (1.0 - f), side),
        _ => Vec2::new(0.0, side * (1.0 - f)),
    }
}

/// Which decorative motion a loop drives
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PeriodicKind {
    Float { amplitude: f32 },
    Rotate,
    SquarePath { side: f32 },
}

/// A looping timeline bound to one decorative motion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicMotion {
    timeline: LoopingTimeline,
    kind: PeriodicKind,
}

impl PeriodicMotion {
    pub fn new(kind: PeriodicKind, timeline: LoopingTimeline) -> Self {
        Self { timeline, kind }
    }

    /// Bob up and down by `amplitude` every `period_secs`, reversing
    pub fn float(amplitude: f32, period_secs: f32) -> Self {
        Self::new(
            PeriodicKind::Float { amplitude },
            LoopingTimeline::new(period_secs, true),
        )
    }

    /// One full turn every `period_secs`
    pub fn rotate(period_secs: f32) -> Self {
        Self::new(PeriodicKind::Rotate, LoopingTimeline::new(period_secs, false))
    }

    /// Trace a square of `side` every `period_secs`
    pub fn square(side: f32, period_secs: f32) -> Self {
        Self::new(
            PeriodicKind::SquarePath { side },
            LoopingTimeline::new(period_secs, false),
        )
    }

    pub fn kind(&self) -> PeriodicKind {
        self.kind
    }

    pub fn timeline(&self) -> &LoopingTimeline {
        &self.timeline
    }

    pub fn set_active(&mut self, active: bool) {
        self.timeline.set_active(active);
    }

    pub fn is_active(&self) -> bool {
        self.timeline.is_active()
    }

    pub fn advance(&mut self, dt: f32) {
        self.timeline.advance(dt);
    }

    /// Transform for the current loop position
    pub fn sample(&self) -> ElementTransform {
        let v = self.timeline.value();
        match self.kind {
            PeriodicKind::Float { amplitude } => ElementTransform {
                offset: Vec2::new(0.0, float_offset(v, amplitude)),
                ..ElementTransform::IDENTITY
            },
            PeriodicKind::Rotate => ElementTransform {
                rotation: rotation_angle(v),
                ..ElementTransform::IDENTITY
            },
            PeriodicKind::SquarePath { side } => ElementTransform {
                offset: square_path(v, side),
                ..ElementTransform::IDENTITY
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Interpolate;

    #[test]
    fn test_square_path_is_continuous_at_quarters() {
        let side = 40.0;
        let eps = 1e-4;
        for k in 0..4 {
            let boundary = (k + 1) as f32 * 0.25;
            let end_of_k = square_path(boundary - 1e-6, side);
            let start_of_next = square_path(boundary, side);
            assert!(
                end_of_k.approx_eq(&start_of_next, 1e-3),
                "jump at quarter {k}: {end_of_k:?} vs {start_of_next:?}"
            );
        }
        // Wrap: end of quarter 3 is the start of quarter 0
        assert!(square_path(1.0, side).approx_eq(&square_path(0.0, side), eps));
    }

    #[test]
    fn test_square_path_corners() {
        let side = 10.0;
        assert_eq!(square_path(0.0, side), Vec2::new(0.0, 0.0));
        assert_eq!(square_path(0.25, side), Vec2::new(10.0, 0.0));
        assert_eq!(square_path(0.5, side), Vec2::new(10.0, 10.0));
        assert_eq!(square_path(0.75, side), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_square_path_moves_one_axis_per_quarter() {
        let side = 10.0;
        let a = square_path(0.30, side);
        let b = square_path(0.40, side);
        assert_eq!(a.x, b.x);
        assert!(b.y > a.y);
    }

    #[test]
    fn test_looping_timeline_reverses() {
        let mut timeline = LoopingTimeline::new(1.0, true);
        timeline.set_active(true);
        timeline.advance(0.25);
        assert!((timeline.value() - 0.25).abs() < 1e-5);
        timeline.advance(1.0);
        assert!((timeline.value() - 0.75).abs() < 1e-5);
        timeline.advance(1.0);
        assert!((timeline.value() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_looping_timeline_freezes_when_inactive() {
        let mut motion = PeriodicMotion::float(10.0, 2.0);
        motion.set_active(true);
        motion.advance(0.3);
        let frozen = motion.sample();

        motion.set_active(false);
        motion.advance(5.0);
        assert_eq!(motion.sample(), frozen);

        motion.set_active(true);
        motion.advance(0.1);
        assert_ne!(motion.sample(), frozen);
    }

    #[test]
    fn test_float_and_rotate_values() {
        assert!(float_offset(0.0, 10.0).abs() < 1e-6);
        assert!((float_offset(0.25, 10.0) - 10.0).abs() < 1e-4);
        assert!((rotation_angle(0.5) - std::f32::consts::PI).abs() < 1e-6);

        let mut spin = PeriodicMotion::rotate(4.0);
        spin.set_active(true);
        spin.advance(1.0);
        assert!((spin.sample().rotation - TAU / 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_period_falls_back() {
        assert_eq!(LoopingTimeline::new(0.0, false).period_secs(), 1.0);
        assert_eq!(LoopingTimeline::new(f32::NAN, true).period_secs(), 1.0);
    }
}
