//! Motion configuration
//!
//! All tunables of the motion core in one TOML-friendly struct. Every field
//! has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! [stagger]
//! span_fraction = 0.4
//! total_fraction = 0.6
//! list_duration_ms = 1200
//!
//! [spring]
//! stiffness = 200.0
//! damping_ratio = 1.0
//!
//! [hover]
//! scale = 0.05
//! lift = 8.0
//! ```

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::interaction::InteractionParams;
use crate::periodic::PeriodicMotion;
use crate::spring::{SettleRule, SpringConfig};
use crate::stagger::{EntranceStyle, StaggerPlan};

/// Root motion configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    pub stagger: StaggerSection,
    pub spring: SpringSection,
    pub settle: SettleSection,
    pub hover: HoverSection,
    pub periodic: PeriodicSection,
}

/// `[stagger]` - list and detail entrance timing
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StaggerSection {
    pub span_fraction: f32,
    pub total_fraction: f32,
    pub list_duration_ms: u32,
    pub detail_duration_ms: u32,
    pub offset_y: f32,
    pub easing: Easing,
}

impl Default for StaggerSection {
    fn default() -> Self {
        Self {
            span_fraction: 0.4,
            total_fraction: 0.6,
            list_duration_ms: 1200,
            detail_duration_ms: 800,
            offset_y: 50.0,
            easing: Easing::EaseOutCubic,
        }
    }
}

/// `[spring]` - drag-release spring
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpringSection {
    pub stiffness: f32,
    pub damping_ratio: f32,
    pub mass: f32,
}

impl Default for SpringSection {
    fn default() -> Self {
        Self {
            stiffness: 200.0,
            damping_ratio: 1.0,
            mass: 1.0,
        }
    }
}

/// `[settle]` - when a released spring is done
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SettleSection {
    pub epsilon: f32,
    pub velocity_epsilon: f32,
    pub min_settle_ms: u32,
    pub max_duration_ms: u32,
}

impl Default for SettleSection {
    fn default() -> Self {
        let rule = SettleRule::default();
        Self {
            epsilon: rule.epsilon,
            velocity_epsilon: rule.velocity_epsilon,
            min_settle_ms: 50,
            max_duration_ms: 2000,
        }
    }
}

/// `[hover]` - hover emphasis and tilt
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HoverSection {
    pub scale: f32,
    pub lift: f32,
    pub transition_ms: u32,
    pub tilt_degrees: f32,
    pub tilt_transition_ms: u32,
}

impl Default for HoverSection {
    fn default() -> Self {
        Self {
            scale: 0.05,
            lift: 8.0,
            transition_ms: 200,
            tilt_degrees: 17.0,
            tilt_transition_ms: 400,
        }
    }
}

/// `[periodic]` - decorative loops
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PeriodicSection {
    pub float_amplitude: f32,
    pub float_period_ms: u32,
    pub rotate_period_ms: u32,
    pub square_side: f32,
    pub square_period_ms: u32,
}

impl Default for PeriodicSection {
    fn default() -> Self {
        Self {
            float_amplitude: 10.0,
            float_period_ms: 1500,
            rotate_period_ms: 3000,
            square_side: 40.0,
            square_period_ms: 4000,
        }
    }
}

fn secs(ms: u32) -> f32 {
    ms as f32 / 1000.0
}

fn rate(ms: u32) -> f32 {
    // A zero transition snaps immediately
    if ms == 0 {
        f32::INFINITY
    } else {
        1000.0 / ms as f32
    }
}

impl MotionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MotionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnimationError::InvalidConfig(e.to_string()))
    }

    /// Check ranges that sampling would otherwise silently clamp
    pub fn validate(&self) -> Result<()> {
        let s = &self.stagger;
        let ordered = s.span_fraction > 0.0
            && s.span_fraction <= s.total_fraction
            && s.total_fraction <= 1.0;
        if !ordered {
            return Err(AnimationError::InvalidConfig(format!(
                "stagger needs 0 < span_fraction <= total_fraction <= 1, got {} and {}",
                s.span_fraction, s.total_fraction
            )));
        }
        if self.settle.max_duration_ms == 0 {
            return Err(AnimationError::InvalidConfig(
                "settle.max_duration_ms must be positive".to_string(),
            ));
        }
        if !(self.settle.epsilon > 0.0 && self.settle.velocity_epsilon > 0.0) {
            return Err(AnimationError::InvalidConfig(
                "settle epsilons must be positive".to_string(),
            ));
        }
        self.spring_config()?;
        Ok(())
    }

    pub fn spring_config(&self) -> Result<SpringConfig> {
        let s = &self.spring;
        SpringConfig::with_damping_ratio(s.stiffness, s.damping_ratio, s.mass)
    }

    pub fn settle_rule(&self) -> SettleRule {
        SettleRule {
            epsilon: self.settle.epsilon,
            velocity_epsilon: self.settle.velocity_epsilon,
            min_settle_secs: secs(self.settle.min_settle_ms),
            max_duration_secs: secs(self.settle.max_duration_ms),
        }
    }

    pub fn interaction_params(&self) -> Result<InteractionParams> {
        Ok(InteractionParams {
            spring: self.spring_config()?,
            settle: self.settle_rule(),
            hover_scale: self.hover.scale,
            hover_lift: self.hover.lift,
            hover_rate: rate(self.hover.transition_ms),
            tilt_angle: self.hover.tilt_degrees.to_radians(),
            tilt_rate: rate(self.hover.tilt_transition_ms),
        })
    }

    /// Stagger plan for a list of `count` items
    pub fn stagger_plan(&self, count: usize) -> StaggerPlan {
        StaggerPlan::new(count, self.stagger.span_fraction, self.stagger.total_fraction)
    }

    pub fn entrance_style(&self) -> EntranceStyle {
        EntranceStyle {
            from_offset_y: self.stagger.offset_y,
            easing: self.stagger.easing,
            ..EntranceStyle::list_item()
        }
    }

    pub fn list_duration_secs(&self) -> f32 {
        secs(self.stagger.list_duration_ms)
    }

    pub fn detail_duration_secs(&self) -> f32 {
        secs(self.stagger.detail_duration_ms)
    }

    pub fn float_motion(&self) -> PeriodicMotion {
        PeriodicMotion::float(self.periodic.float_amplitude, secs(self.periodic.float_period_ms))
    }

    pub fn rotate_motion(&self) -> PeriodicMotion {
        PeriodicMotion::rotate(secs(self.periodic.rotate_period_ms))
    }

    pub fn square_motion(&self) -> PeriodicMotion {
        PeriodicMotion::square(self.periodic.square_side, secs(self.periodic.square_period_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = MotionConfig::from_toml_str("").unwrap();
        assert_eq!(config, MotionConfig::default());
        assert!(config.spring_config().unwrap().is_critically_damped());
        assert_eq!(config.settle_rule(), SettleRule::default());
    }

    #[test]
    fn test_partial_document() {
        let config = MotionConfig::from_toml_str(
            r#"
            [stagger]
            span_fraction = 0.2
            easing = "ease-out-back"

            [hover]
            transition_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.stagger.span_fraction, 0.2);
        assert_eq!(config.stagger.total_fraction, 0.6);
        assert_eq!(config.stagger.easing, Easing::EaseOutBack);
        assert!(config.interaction_params().unwrap().hover_rate.is_infinite());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_stagger =
            MotionConfig::from_toml_str("[stagger]\nspan_fraction = 0.9\ntotal_fraction = 0.5");
        assert!(matches!(bad_stagger, Err(AnimationError::InvalidConfig(_))));

        let bad_spring = MotionConfig::from_toml_str("[spring]\nmass = 0.0");
        assert!(matches!(bad_spring, Err(AnimationError::InvalidSpring(_))));

        let not_toml = MotionConfig::from_toml_str("[stagger");
        assert!(matches!(not_toml, Err(AnimationError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MotionConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(MotionConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_derived_values() {
        let config = MotionConfig::default();
        assert_eq!(config.list_duration_secs(), 1.2);
        assert_eq!(config.stagger_plan(20).window(0).end, 0.4);
        let params = config.interaction_params().unwrap();
        assert!((params.hover_rate - 5.0).abs() < 1e-6);
        assert!((params.tilt_angle - 17.0_f32.to_radians()).abs() < 1e-6);
    }
}
