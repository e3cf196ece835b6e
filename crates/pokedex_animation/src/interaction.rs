//! Per-element interaction state
//!
//! Each card or list item owns one [`Interaction`]. Pointer and gesture
//! callbacks feed it [`InteractionEvent`]s; the frame driver calls
//! [`Interaction::advance`]; the presentation tree reads
//! [`Interaction::transform`]. Nothing here touches state outside the
//! element.
//!
//! ```text
//! Idle ──enter──▶ Hovering ──exit──▶ Idle
//! Idle | Hovering ──drag start──▶ Dragging ──drag end──▶ Releasing(spring)
//! Releasing ──settled / timed out──▶ Idle (or Hovering if the pointer is inside)
//! ```

use pokedex_core::Vec2;

use crate::easing::Easing;
use crate::spring::{SettleRule, SpringConfig, SpringMotion2, SpringPhase};
use crate::values::ElementTransform;

/// Pointer and gesture input for one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    PointerEnter,
    PointerExit,
    DragStart,
    /// Per-frame drag delta
    DragUpdate(Vec2),
    /// Gesture released with this velocity (px/s)
    DragEnd { velocity: Vec2 },
    /// Toggles the tilt flourish
    Tap,
}

/// Interaction state of one element
#[derive(Clone, Copy, Debug)]
pub enum InteractionState {
    Idle,
    Hovering,
    Dragging { offset: Vec2 },
    Releasing(SpringMotion2),
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Hovering => "hovering",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::Releasing(_) => "releasing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_hovering(&self) -> bool {
        matches!(self, InteractionState::Hovering)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::Dragging { .. })
    }

    pub fn is_releasing(&self) -> bool {
        matches!(self, InteractionState::Releasing(_))
    }
}

/// Tuning for hover emphasis, tilt and release springs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionParams {
    pub spring: SpringConfig,
    pub settle: SettleRule,
    /// Extra scale at full hover (0.05 = 5% larger)
    pub hover_scale: f32,
    /// Upward lift in pixels at full hover
    pub hover_lift: f32,
    /// Hover emphasis change per second (1 / transition time)
    pub hover_rate: f32,
    /// Tilt angle in radians when toggled on
    pub tilt_angle: f32,
    /// Tilt change per second
    pub tilt_rate: f32,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            spring: SpringConfig::critical(),
            settle: SettleRule::default(),
            hover_scale: 0.05,
            hover_lift: 8.0,
            hover_rate: 5.0,
            tilt_angle: 0.3,
            tilt_rate: 2.5,
        }
    }
}

fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}

/// Interaction state machine plus its derived emphasis values
#[derive(Clone, Debug)]
pub struct Interaction {
    state: InteractionState,
    params: InteractionParams,
    pointer_inside: bool,
    /// Hover emphasis in [0, 1]
    hover_amount: f32,
    tilted: bool,
    /// Tilt progress in [0, 1]
    tilt_amount: f32,
}

impl Interaction {
    pub fn new(params: InteractionParams) -> Self {
        Self {
            state: InteractionState::Idle,
            params,
            pointer_inside: false,
            hover_amount: 0.0,
            tilted: false,
            tilt_amount: 0.0,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn params(&self) -> &InteractionParams {
        &self.params
    }

    pub fn is_tilted(&self) -> bool {
        self.tilted
    }

    /// Apply an event. Returns true when the state changed.
    pub fn handle(&mut self, event: InteractionEvent) -> bool {
        use InteractionEvent as E;
        use InteractionState as S;

        match event {
            E::PointerEnter => self.pointer_inside = true,
            E::PointerExit => self.pointer_inside = false,
            _ => {}
        }

        let next = match (&mut self.state, event) {
            (S::Idle, E::PointerEnter) => Some(S::Hovering),
            (S::Hovering, E::PointerExit) => Some(S::Idle),

            (S::Idle | S::Hovering, E::DragStart) => Some(S::Dragging {
                offset: Vec2::ZERO,
            }),
            // Grabbing a card mid-release picks it up where it is
            (S::Releasing(motion), E::DragStart) => Some(S::Dragging {
                offset: motion.value(),
            }),

            (S::Dragging { offset }, E::DragUpdate(delta)) => {
                *offset += delta;
                None
            }
            (S::Dragging { offset }, E::DragEnd { velocity }) => {
                Some(S::Releasing(SpringMotion2::release(
                    self.params.spring,
                    *offset,
                    velocity,
                    Vec2::ZERO,
                    self.params.settle,
                )))
            }

            (S::Dragging { .. }, E::Tap) => None,
            (_, E::Tap) => {
                self.tilted = !self.tilted;
                None
            }

            _ => None,
        };

        match next {
            Some(state) => {
                tracing::trace!("Interaction {} -> {}", self.state.name(), state.name());
                self.state = state;
                true
            }
            None => false,
        }
    }

    /// Advance derived motion by `dt` seconds
    ///
    /// Returns true while the element still needs frames.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt < 0.0 {
            return self.needs_frames();
        }

        let hover_target = if self.state.is_hovering() { 1.0 } else { 0.0 };
        self.hover_amount = approach(self.hover_amount, hover_target, self.params.hover_rate * dt);

        let tilt_target = if self.tilted { 1.0 } else { 0.0 };
        self.tilt_amount = approach(self.tilt_amount, tilt_target, self.params.tilt_rate * dt);

        if let InteractionState::Releasing(motion) = &mut self.state {
            let phase = motion.advance(dt);
            if phase.is_done() {
                if phase == SpringPhase::TimedOut {
                    tracing::debug!("Release spring timed out, snapping to rest");
                }
                let next = if self.pointer_inside {
                    InteractionState::Hovering
                } else {
                    InteractionState::Idle
                };
                tracing::trace!("Interaction releasing -> {}", next.name());
                self.state = next;
            }
        }

        self.needs_frames()
    }

    fn needs_frames(&self) -> bool {
        let hover_target = if self.state.is_hovering() { 1.0 } else { 0.0 };
        let tilt_target = if self.tilted { 1.0 } else { 0.0 };
        self.state.is_releasing()
            || self.hover_amount != hover_target
            || self.tilt_amount != tilt_target
    }

    /// Drag or spring displacement, zero otherwise
    pub fn displacement(&self) -> Vec2 {
        match &self.state {
            InteractionState::Dragging { offset } => *offset,
            InteractionState::Releasing(motion) => motion.value(),
            _ => Vec2::ZERO,
        }
    }

    /// Transform for the current frame
    pub fn transform(&self) -> ElementTransform {
        let hover = Easing::EaseInOut.apply(self.hover_amount);
        let tilt = Easing::EaseInOutCubic.apply(self.tilt_amount);
        ElementTransform {
            offset: self.displacement() + Vec2::new(0.0, -self.params.hover_lift * hover),
            scale: 1.0 + self.params.hover_scale * hover,
            rotation: self.params.tilt_angle * tilt,
            opacity: 1.0,
        }
    }

    /// Drop all transient state (element recycled or removed)
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.pointer_inside = false;
        self.hover_amount = 0.0;
        self.tilted = false;
        self.tilt_amount = 0.0;
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(InteractionParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_hover_enter_exit_without_frame_leaves_no_residue() {
        let mut interaction = Interaction::default();
        assert!(interaction.handle(InteractionEvent::PointerEnter));
        assert!(interaction.handle(InteractionEvent::PointerExit));

        assert!(interaction.state().is_idle());
        assert_eq!(interaction.displacement(), Vec2::ZERO);
        assert!(interaction.transform().is_identity(1e-6));
    }

    #[test]
    fn test_hover_emphasis_ramps() {
        let mut interaction = Interaction::default();
        interaction.handle(InteractionEvent::PointerEnter);
        for _ in 0..30 {
            interaction.advance(FRAME);
        }
        let t = interaction.transform();
        assert!((t.scale - 1.05).abs() < 1e-5);
        assert!((t.offset.y + 8.0).abs() < 1e-4);
        assert!(!interaction.advance(FRAME));

        interaction.handle(InteractionEvent::PointerExit);
        assert!(interaction.advance(FRAME));
        for _ in 0..30 {
            interaction.advance(FRAME);
        }
        assert!(interaction.transform().is_identity(1e-5));
    }

    #[test]
    fn test_drag_accumulates_deltas() {
        let mut interaction = Interaction::default();
        interaction.handle(InteractionEvent::PointerEnter);
        assert!(interaction.handle(InteractionEvent::DragStart));
        interaction.handle(InteractionEvent::DragUpdate(Vec2::new(5.0, 1.0)));
        interaction.handle(InteractionEvent::DragUpdate(Vec2::new(15.0, -1.0)));
        assert_eq!(interaction.displacement(), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_undamped_release_times_out_to_idle() {
        let params = InteractionParams {
            spring: SpringConfig::new(100.0, 0.0, 1.0).unwrap(),
            settle: SettleRule {
                max_duration_secs: 0.5,
                ..SettleRule::default()
            },
            ..InteractionParams::default()
        };
        let mut interaction = Interaction::new(params);
        interaction.handle(InteractionEvent::DragStart);
        interaction.handle(InteractionEvent::DragUpdate(Vec2::new(20.0, 0.0)));
        interaction.handle(InteractionEvent::DragEnd {
            velocity: Vec2::ZERO,
        });

        let mut frames = 0;
        while interaction.advance(FRAME) {
            frames += 1;
            assert!(frames <= 40, "release was not cut off");
        }
        assert!(frames >= 29, "timed out before the duration cap");
        assert!(interaction.state().is_idle());
        assert_eq!(interaction.displacement(), Vec2::ZERO);
        assert!(interaction.transform().is_identity(1e-6));
    }

    #[test]
    fn test_release_settles_back_to_idle() {
        let mut interaction = Interaction::default();
        interaction.handle(InteractionEvent::DragStart);
        interaction.handle(InteractionEvent::DragUpdate(Vec2::new(20.0, 0.0)));
        assert!(interaction.handle(InteractionEvent::DragEnd {
            velocity: Vec2::ZERO
        }));
        assert!(interaction.state().is_releasing());
        assert_eq!(interaction.displacement(), Vec2::new(20.0, 0.0));

        let mut frames = 0;
        while interaction.advance(FRAME) {
            frames += 1;
            assert!(frames < 200);
        }
        assert!(interaction.state().is_idle());
        assert_eq!(interaction.displacement(), Vec2::ZERO);
    }

    #[test]
    fn test_release_returns_to_hover_when_pointer_inside() {
        let mut interaction = Interaction::default();
        interaction.handle(InteractionEvent::PointerEnter);
        interaction.handle(InteractionEvent::DragStart);
        interaction.handle(InteractionEvent::DragUpdate(Vec2::new(0.0, 12.0)));
        interaction.handle(InteractionEvent::DragEnd {
            velocity: Vec2::new(0.0, -40.0),
        });
        for _ in 0..180 {
            interaction.advance(FRAME);
        }
        assert!(interaction.state().is_hovering());
    }

    #[test]
    fn test_grab_during_release_keeps_position() {
        let mut interaction = Interaction::default();
        interaction.handle(InteractionEvent::DragStart);
        interaction.handle(InteractionEvent::DragUpdate(Vec2::new(30.0, 0.0)));
        interaction.handle(InteractionEvent::DragEnd {
            velocity: Vec2::ZERO,
        });
        interaction.advance(FRAME * 3.0);
        let midway = interaction.displacement();

        interaction.handle(InteractionEvent::DragStart);
        assert!(interaction.state().is_dragging());
        assert_eq!(interaction.displacement(), midway);
    }

    #[test]
    fn test_ignored_events() {
        let mut interaction = Interaction::default();
        assert!(!interaction.handle(InteractionEvent::PointerExit));
        assert!(!interaction.handle(InteractionEvent::DragUpdate(Vec2::new(1.0, 1.0))));
        assert!(!interaction.handle(InteractionEvent::DragEnd {
            velocity: Vec2::ZERO
        }));
        assert!(interaction.state().is_idle());
    }

    #[test]
    fn test_tap_toggles_tilt() {
        let mut interaction = Interaction::default();
        interaction.handle(InteractionEvent::Tap);
        assert!(interaction.is_tilted());
        for _ in 0..60 {
            interaction.advance(FRAME);
        }
        assert!((interaction.transform().rotation - 0.3).abs() < 1e-5);

        interaction.handle(InteractionEvent::Tap);
        for _ in 0..60 {
            interaction.advance(FRAME);
        }
        assert!(interaction.transform().rotation.abs() < 1e-5);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut interaction = Interaction::default();
        interaction.handle(InteractionEvent::PointerEnter);
        interaction.handle(InteractionEvent::Tap);
        interaction.advance(0.1);
        interaction.reset();
        assert!(interaction.state().is_idle());
        assert!(interaction.transform().is_identity(1e-6));
    }
}
