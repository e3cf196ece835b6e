//! Spring physics
//!
//! Damped harmonic oscillator used to return dragged elements to rest.
//! [`Spring`] is stepped with RK4 each frame; [`SpringSolution`] gives the
//! closed-form displacement at any time for all three damping regimes.
//! [`SpringMotion`] adds the settle rule: a spring counts as done once it has
//! stayed within epsilon for a minimum time, or when it hits the maximum
//! duration.

use pokedex_core::Vec2;

use crate::error::{AnimationError, Result};

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    stiffness: f32,
    damping: f32,
    mass: f32,
}

/// Damping regime of a spring configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DampingRegime {
    /// Oscillates around the target
    Underdamped,
    /// Fastest approach without oscillation
    Critical,
    /// Creeps toward the target without oscillation
    Overdamped,
}

const CRITICAL_RATIO_TOLERANCE: f32 = 1e-3;

impl SpringConfig {
    /// Create a new spring configuration
    ///
    /// Mass and stiffness must be finite and positive, damping finite and
    /// non-negative.
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Result<Self> {
        if !(stiffness.is_finite() && stiffness > 0.0) {
            return Err(AnimationError::InvalidSpring(format!(
                "stiffness must be positive, got {stiffness}"
            )));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(AnimationError::InvalidSpring(format!(
                "mass must be positive, got {mass}"
            )));
        }
        if !(damping.is_finite() && damping >= 0.0) {
            return Err(AnimationError::InvalidSpring(format!(
                "damping must be non-negative, got {damping}"
            )));
        }
        Ok(Self {
            stiffness,
            damping,
            mass,
        })
    }

    /// Create a configuration from a damping ratio (1.0 = critical)
    pub fn with_damping_ratio(stiffness: f32, ratio: f32, mass: f32) -> Result<Self> {
        if !(ratio.is_finite() && ratio >= 0.0) {
            return Err(AnimationError::InvalidSpring(format!(
                "damping ratio must be non-negative, got {ratio}"
            )));
        }
        if !(stiffness.is_finite() && stiffness > 0.0 && mass.is_finite() && mass > 0.0) {
            return Err(AnimationError::InvalidSpring(format!(
                "stiffness and mass must be positive, got {stiffness} and {mass}"
            )));
        }
        Self::new(stiffness, ratio * 2.0 * (stiffness * mass).sqrt(), mass)
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self {
            stiffness: 120.0,
            damping: 14.0,
            mass: 1.0,
        }
    }

    /// A wobbly spring with overshoot (good for playful cards)
    pub fn wobbly() -> Self {
        Self {
            stiffness: 180.0,
            damping: 12.0,
            mass: 1.0,
        }
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
        }
    }

    /// A very stiff spring with minimal oscillation
    pub fn snappy() -> Self {
        Self {
            stiffness: 600.0,
            damping: 40.0,
            mass: 1.0,
        }
    }

    /// Critically damped drag-release spring (no overshoot)
    pub fn critical() -> Self {
        Self {
            stiffness: 200.0,
            damping: 2.0 * 200.0_f32.sqrt(),
            mass: 1.0,
        }
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Damping relative to critical damping
    pub fn damping_ratio(&self) -> f32 {
        self.damping / self.critical_damping()
    }

    /// Undamped angular frequency (rad/s)
    pub fn natural_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Longest RK4 step that stays stable for this spring
    ///
    /// Bounded by the fastest rate in the system, the natural frequency or
    /// `damping / mass`, so stiff springs are integrated in finer steps.
    pub fn stable_step(&self) -> f32 {
        let fastest = self.natural_frequency().max(self.damping / self.mass);
        MAX_SUBSTEP.min(1.0 / fastest)
    }

    pub fn regime(&self) -> DampingRegime {
        let ratio = self.damping_ratio();
        if (ratio - 1.0).abs() < CRITICAL_RATIO_TOLERANCE {
            DampingRegime::Critical
        } else if ratio < 1.0 {
            DampingRegime::Underdamped
        } else {
            DampingRegime::Overdamped
        }
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.regime() == DampingRegime::Underdamped
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        self.regime() == DampingRegime::Critical
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.regime() == DampingRegime::Overdamped
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::critical()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    /// A spring released at `from` with `velocity`, heading for `target`
    pub fn released(config: SpringConfig, from: f32, velocity: f32, target: f32) -> Self {
        Self {
            config,
            value: from,
            velocity,
            target,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Change the target; the current velocity is kept
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Displacement from the target
    pub fn displacement(&self) -> f32 {
        self.value - self.target
    }

    /// Whether displacement and velocity are both under the rule's epsilons
    pub fn is_at_rest(&self, rule: &SettleRule) -> bool {
        self.displacement().abs() < rule.epsilon && self.velocity.abs() < rule.velocity_epsilon
    }

    /// Jump to the target and stop
    pub fn snap_to_target(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }

    /// Step the spring simulation using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

// ============================================================================
// Closed form
// ============================================================================

/// Analytic motion of a released spring
#[derive(Clone, Copy, Debug)]
pub struct SpringSolution {
    config: SpringConfig,
    x0: f32,
    v0: f32,
    target: f32,
}

impl SpringSolution {
    /// Released at `from` with `velocity`, moving toward `target`
    pub fn new(config: SpringConfig, from: f32, velocity: f32, target: f32) -> Self {
        Self {
            config,
            x0: from - target,
            v0: velocity,
            target,
        }
    }

    /// Value at time `t` seconds after release
    pub fn value_at(&self, t: f32) -> f32 {
        self.target + self.state_at(t).0
    }

    /// Velocity at time `t` seconds after release
    pub fn velocity_at(&self, t: f32) -> f32 {
        self.state_at(t).1
    }

    /// (displacement, velocity) at time `t`
    fn state_at(&self, t: f32) -> (f32, f32) {
        let t = t.max(0.0);
        let w0 = self.config.natural_frequency();
        let zeta = self.config.damping_ratio();
        let (x0, v0) = (self.x0, self.v0);

        match self.config.regime() {
            DampingRegime::Underdamped => {
                let wd = w0 * (1.0 - zeta * zeta).sqrt();
                let a = zeta * w0;
                let b = (v0 + a * x0) / wd;
                let decay = (-a * t).exp();
                let (sin, cos) = (wd * t).sin_cos();
                let x = decay * (x0 * cos + b * sin);
                let v = decay * (v0 * cos - (a * b + wd * x0) * sin);
                (x, v)
            }
            DampingRegime::Critical => {
                let decay = (-w0 * t).exp();
                let b = v0 + w0 * x0;
                (decay * (x0 + b * t), decay * (v0 - w0 * b * t))
            }
            DampingRegime::Overdamped => {
                let root = (zeta * zeta - 1.0).sqrt();
                let r1 = -w0 * (zeta - root);
                let r2 = -w0 * (zeta + root);
                let c2 = (v0 - r1 * x0) / (r2 - r1);
                let c1 = x0 - c2;
                let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
                (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
            }
        }
    }
}

// ============================================================================
// Settling
// ============================================================================

/// When a released spring counts as finished
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettleRule {
    /// Largest displacement from target that counts as rest
    pub epsilon: f32,
    /// Largest speed that counts as rest
    pub velocity_epsilon: f32,
    /// Seconds the spring must stay at rest before it is settled
    pub min_settle_secs: f32,
    /// Hard cap on the animation length in seconds
    pub max_duration_secs: f32,
}

impl Default for SettleRule {
    fn default() -> Self {
        // Half a pixel and 5px/s are imperceptible
        Self {
            epsilon: 0.5,
            velocity_epsilon: 5.0,
            min_settle_secs: 0.05,
            max_duration_secs: 2.0,
        }
    }
}

/// Progress of a released spring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpringPhase {
    /// Outside the rest band
    Moving,
    /// Inside the rest band, waiting out the minimum settle time
    Settling,
    /// Came to rest
    Settled,
    /// Cut off by the maximum duration
    TimedOut,
}

impl SpringPhase {
    pub fn is_done(&self) -> bool {
        matches!(self, SpringPhase::Settled | SpringPhase::TimedOut)
    }
}

/// Frames longer than this are split so RK4 stays accurate after a hitch
const MAX_SUBSTEP: f32 = 1.0 / 60.0;

/// A spring plus its settle rule
#[derive(Clone, Copy, Debug)]
pub struct SpringMotion {
    spring: Spring,
    rule: SettleRule,
    elapsed: f32,
    at_rest_for: f32,
    phase: SpringPhase,
}

impl SpringMotion {
    pub fn new(spring: Spring, rule: SettleRule) -> Self {
        let mut motion = Self {
            spring,
            rule,
            elapsed: 0.0,
            at_rest_for: 0.0,
            phase: SpringPhase::Moving,
        };
        motion.update_phase(0.0);
        motion
    }

    /// A drag release: start at `from` with `velocity`, return to `target`
    pub fn release(
        config: SpringConfig,
        from: f32,
        velocity: f32,
        target: f32,
        rule: SettleRule,
    ) -> Self {
        Self::new(Spring::released(config, from, velocity, target), rule)
    }

    pub fn value(&self) -> f32 {
        self.spring.value()
    }

    pub fn velocity(&self) -> f32 {
        self.spring.velocity()
    }

    pub fn target(&self) -> f32 {
        self.spring.target()
    }

    pub fn phase(&self) -> SpringPhase {
        self.phase
    }

    /// Seconds since release
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_done(&self) -> bool {
        self.phase.is_done()
    }

    /// Retarget mid-flight, keeping the velocity
    pub fn set_target(&mut self, target: f32) {
        self.spring.set_target(target);
        if self.phase.is_done() {
            self.elapsed = 0.0;
            self.at_rest_for = 0.0;
            self.phase = SpringPhase::Moving;
        }
        self.update_phase(0.0);
    }

    /// Advance by `dt` seconds and return the new phase
    pub fn advance(&mut self, dt: f32) -> SpringPhase {
        if self.phase.is_done() || dt <= 0.0 || !dt.is_finite() {
            return self.phase;
        }

        let max_step = self.spring.config().stable_step();
        let mut remaining = dt;
        while remaining > 0.0 {
            let step = remaining.min(max_step);
            self.spring.step(step);
            remaining -= step;
        }
        self.elapsed += dt;
        self.update_phase(dt);
        self.phase
    }

    fn update_phase(&mut self, dt: f32) {
        if self.spring.is_at_rest(&self.rule) {
            self.at_rest_for += dt;
            if self.at_rest_for >= self.rule.min_settle_secs {
                self.spring.snap_to_target();
                self.phase = SpringPhase::Settled;
                return;
            }
            self.phase = SpringPhase::Settling;
        } else {
            self.at_rest_for = 0.0;
            self.phase = SpringPhase::Moving;
        }

        if self.elapsed >= self.rule.max_duration_secs {
            tracing::debug!(
                "Spring cut off after {:.2}s at displacement {:.3}",
                self.elapsed,
                self.spring.displacement()
            );
            self.spring.snap_to_target();
            self.phase = SpringPhase::TimedOut;
        }
    }
}

/// Two independent axis springs sharing one configuration
#[derive(Clone, Copy, Debug)]
pub struct SpringMotion2 {
    x: SpringMotion,
    y: SpringMotion,
}

impl SpringMotion2 {
    /// A 2D drag release toward `target`
    pub fn release(
        config: SpringConfig,
        from: Vec2,
        velocity: Vec2,
        target: Vec2,
        rule: SettleRule,
    ) -> Self {
        Self {
            x: SpringMotion::release(config, from.x, velocity.x, target.x, rule),
            y: SpringMotion::release(config, from.y, velocity.y, target.y, rule),
        }
    }

    pub fn value(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.velocity(), self.y.velocity())
    }

    /// Combined phase: moving while either axis moves
    pub fn phase(&self) -> SpringPhase {
        use SpringPhase::*;
        match (self.x.phase(), self.y.phase()) {
            (Moving, _) | (_, Moving) => Moving,
            (Settling, _) | (_, Settling) => Settling,
            (TimedOut, _) | (_, TimedOut) => TimedOut,
            (Settled, Settled) => Settled,
        }
    }

    pub fn is_done(&self) -> bool {
        self.x.is_done() && self.y.is_done()
    }

    pub fn advance(&mut self, dt: f32) -> SpringPhase {
        self.x.advance(dt);
        self.y.advance(dt);
        self.phase()
    }
}
