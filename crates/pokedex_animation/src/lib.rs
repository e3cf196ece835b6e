//! Pokédex Motion Core
//!
//! Entrance sequencing, spring physics and interaction states for the
//! catalog's cards and list items. All math is pure: given a timeline value
//! and parameters it returns transform values, and the presentation tree
//! decides how to draw them.
//!
//! # Features
//!
//! - **Stagger windows**: per-item slices of a shared timeline for cascaded
//!   entrances
//! - **Easing**: the usual curves plus cubic bezier
//! - **Spring physics**: RK4 stepping and closed-form solutions for under-,
//!   critically and over-damped springs, with a bounded settle rule
//! - **Interaction states**: hover, drag and release per element
//! - **Periodic motions**: float, rotate and square-path loops that freeze
//!   when inactive
//! - **Scheduler**: create / advance / dispose lifecycle with owner handles
//!
//! # Example
//!
//! ```rust
//! use pokedex_animation::{EntranceStyle, StaggerPlan};
//!
//! let plan = StaggerPlan::list(20);
//! let style = EntranceStyle::list_item();
//!
//! // Halfway through the list timeline
//! let first = plan.frame(0, 0.5, &style);
//! let last = plan.frame(19, 0.5, &style);
//! assert_eq!(first.opacity, 1.0);
//! assert_eq!(last.opacity, 0.0);
//! ```

pub mod config;
pub mod easing;
pub mod error;
pub mod interaction;
pub mod periodic;
pub mod scheduler;
pub mod spring;
pub mod stagger;
pub mod timeline;
pub mod values;

pub use config::MotionConfig;
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use interaction::{Interaction, InteractionEvent, InteractionParams, InteractionState};
pub use periodic::{
    float_offset, rotation_angle, square_path, LoopingTimeline, PeriodicKind, PeriodicMotion,
};
pub use scheduler::{
    AnimatedLoop, AnimatedSpring, AnimatedTimeline, AnimationScheduler, LoopId, SchedulerHandle,
    SpringId, TimelineId,
};
pub use spring::{
    DampingRegime, SettleRule, Spring, SpringConfig, SpringMotion, SpringMotion2, SpringPhase,
    SpringSolution,
};
pub use stagger::{window, EntranceFrame, EntranceStyle, StaggerPlan, StaggerWindow};
pub use timeline::{PlaybackState, Timeline};
pub use values::{ElementTransform, Interpolate};
