//! Staggered entrance sequencing
//!
//! A list load drives one shared timeline from 0 to 1. Each item gets a
//! window of that timeline, offset by its index, so entrances cascade instead
//! of firing together:
//!
//! ```text
//! base  = clamp(index / count * total_fraction, 0, 1)
//! start = clamp(base, 0, 1 - span_fraction)
//! end   = clamp(start + span_fraction, 0, 1)
//! ```
//!
//! Every window has the same length (`span_fraction`) and starts never move
//! backwards as the index grows. Windows may overlap.
//!
//! Inputs are clamped rather than rejected: an empty list during a data
//! transition is routine, so `count == 0` or an out-of-range index still
//! produce a valid window.

use crate::easing::Easing;
use crate::values::Interpolate;

/// A sub-range `[start, end]` of a shared timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaggerWindow {
    pub start: f32,
    pub end: f32,
}

impl StaggerWindow {
    /// Window length
    pub fn len(&self) -> f32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= f32::EPSILON
    }

    /// Map shared timeline value `t` to this window's local progress in [0, 1]
    ///
    /// Non-decreasing in `t`. A zero-length window is a step at `start`.
    pub fn local_progress(&self, t: f32) -> f32 {
        if t.is_nan() {
            return 0.0;
        }
        if self.is_empty() {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        ((t - self.start) / self.len()).clamp(0.0, 1.0)
    }
}

fn unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Compute the stagger window of item `index` in a list of `count` items
///
/// `span_fraction` is the window length and `total_fraction` the part of the
/// timeline over which starts are spread.
pub fn window(
    index: usize,
    count: usize,
    span_fraction: f32,
    total_fraction: f32,
) -> StaggerWindow {
    let span = unit(span_fraction, 1.0);
    let total = unit(total_fraction, 1.0);

    if count == 0 || index >= count {
        tracing::trace!("Clamping stagger input (index {} of {})", index, count);
    }
    let count = count.max(1);
    let index = index.min(count - 1);

    let base_start = (index as f32 / count as f32 * total).clamp(0.0, 1.0);
    let start = base_start.clamp(0.0, 1.0 - span);
    let end = (start + span).clamp(0.0, 1.0);

    StaggerWindow { start, end }
}

/// Stagger parameters for one list
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaggerPlan {
    pub span_fraction: f32,
    pub total_fraction: f32,
    pub count: usize,
}

impl StaggerPlan {
    pub fn new(count: usize, span_fraction: f32, total_fraction: f32) -> Self {
        Self {
            span_fraction,
            total_fraction,
            count,
        }
    }

    /// List entrance defaults: each item takes 40% of the timeline, starts
    /// spread over the first 60%
    pub fn list(count: usize) -> Self {
        Self::new(count, 0.4, 0.6)
    }

    pub fn window(&self, index: usize) -> StaggerWindow {
        window(index, self.count, self.span_fraction, self.total_fraction)
    }

    /// Windows for every item in order
    pub fn windows(&self) -> impl Iterator<Item = StaggerWindow> + '_ {
        (0..self.count).map(move |i| self.window(i))
    }

    /// Entrance frame of item `index` at shared timeline value `t`
    pub fn frame(&self, index: usize, t: f32, style: &EntranceStyle) -> EntranceFrame {
        style.sample(self.window(index).local_progress(t))
    }
}

/// How an item enters: fade plus vertical slide
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntranceStyle {
    pub from_opacity: f32,
    pub to_opacity: f32,
    pub from_offset_y: f32,
    pub to_offset_y: f32,
    pub easing: Easing,
}

/// Sampled entrance values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntranceFrame {
    pub opacity: f32,
    pub offset_y: f32,
}

impl EntranceStyle {
    /// List items fade in while rising 50px
    pub fn list_item() -> Self {
        Self {
            from_opacity: 0.0,
            to_opacity: 1.0,
            from_offset_y: 50.0,
            to_offset_y: 0.0,
            easing: Easing::EaseOutCubic,
        }
    }

    /// Detail screen sections fade in while rising 30px
    pub fn detail_header() -> Self {
        Self {
            from_offset_y: 30.0,
            ..Self::list_item()
        }
    }

    /// Sample at local progress `p`
    ///
    /// `p == 0` gives exactly the start values and `p >= 1` exactly the end
    /// values. Overshooting curves carry the offset past its end; opacity
    /// stays within [0, 1].
    pub fn sample(&self, p: f32) -> EntranceFrame {
        if p >= 1.0 {
            return EntranceFrame {
                opacity: self.to_opacity,
                offset_y: self.to_offset_y,
            };
        }
        let eased = self.easing.apply(p);
        EntranceFrame {
            opacity: self.from_opacity.lerp(&self.to_opacity, eased).clamp(0.0, 1.0),
            offset_y: self.from_offset_y.lerp(&self.to_offset_y, eased),
        }
    }
}

impl Default for EntranceStyle {
    fn default() -> Self {
        Self::list_item()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_windows() {
        let first = window(0, 20, 0.4, 0.6);
        assert!((first.start - 0.0).abs() < 1e-6);
        assert!((first.end - 0.4).abs() < 1e-6);

        let last = window(19, 20, 0.4, 0.6);
        assert!((last.start - 0.57).abs() < 1e-5);
        assert!((last.end - 0.97).abs() < 1e-5);
    }

    #[test]
    fn test_starts_are_monotonic() {
        for count in 2..40 {
            for &(span, total) in &[(0.4, 0.6), (0.1, 1.0), (0.9, 0.95), (1.0, 1.0)] {
                let plan = StaggerPlan::new(count, span, total);
                let windows: Vec<_> = plan.windows().collect();
                for pair in windows.windows(2) {
                    assert!(pair[0].start <= pair[1].start);
                }
            }
        }
    }

    #[test]
    fn test_window_length_is_constant() {
        let plan = StaggerPlan::new(30, 0.25, 0.9);
        for w in plan.windows() {
            assert!((w.len() - 0.25).abs() < 1e-6);
            assert!(w.start >= 0.0 && w.end <= 1.0);
        }
    }

    #[test]
    fn test_malformed_inputs_clamp() {
        let empty = window(0, 0, 0.4, 0.6);
        assert_eq!(empty, StaggerWindow { start: 0.0, end: 0.4 });

        let past_end = window(50, 10, 0.4, 0.6);
        assert_eq!(past_end, window(9, 10, 0.4, 0.6));

        let wild = window(3, 10, 7.0, f32::NAN);
        assert!(wild.start >= 0.0 && wild.end <= 1.0 && wild.start <= wild.end);
    }

    #[test]
    fn test_local_progress_is_monotonic() {
        let w = window(5, 20, 0.4, 0.6);
        let mut prev = 0.0;
        for i in 0..=200 {
            let p = w.local_progress(i as f32 / 200.0);
            assert!(p >= prev);
            prev = p;
        }
        assert_eq!(w.local_progress(0.0), 0.0);
        assert_eq!(w.local_progress(1.0), 1.0);
    }

    #[test]
    fn test_zero_length_window_steps() {
        let w = StaggerWindow { start: 0.5, end: 0.5 };
        assert_eq!(w.local_progress(0.49), 0.0);
        assert_eq!(w.local_progress(0.5), 1.0);
    }

    #[test]
    fn test_entrance_endpoints() {
        let style = EntranceStyle::list_item();
        assert_eq!(
            style.sample(0.0),
            EntranceFrame {
                opacity: 0.0,
                offset_y: 50.0
            }
        );
        assert_eq!(
            style.sample(1.0),
            EntranceFrame {
                opacity: 1.0,
                offset_y: 0.0
            }
        );

        for i in 0..=100 {
            let frame = style.sample(i as f32 / 100.0);
            assert!((0.0..=1.0).contains(&frame.opacity));
            assert!((0.0..=50.0).contains(&frame.offset_y));
        }
    }

    #[test]
    fn test_overshooting_easing_keeps_offset_overshoot() {
        let style = EntranceStyle {
            easing: Easing::EaseOutBack,
            ..EntranceStyle::list_item()
        };
        assert!(Easing::EaseOutBack.apply(0.6) > 1.0);

        let frame = style.sample(0.6);
        assert!(frame.offset_y < 0.0, "offset should swing past its rest position");
        assert_eq!(frame.opacity, 1.0);

        assert_eq!(
            style.sample(1.0),
            EntranceFrame {
                opacity: 1.0,
                offset_y: 0.0
            }
        );
    }

    #[test]
    fn test_cascade_frames() {
        let plan = StaggerPlan::list(20);
        let style = EntranceStyle::list_item();
        // Halfway through, the first item is done and the last has not started
        let first = plan.frame(0, 0.5, &style);
        let last = plan.frame(19, 0.5, &style);
        assert_eq!(first.opacity, 1.0);
        assert_eq!(last.opacity, 0.0);
    }
}
