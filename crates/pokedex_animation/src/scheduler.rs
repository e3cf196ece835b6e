//! Animation scheduler
//!
//! Owns every live timeline, released spring and decorative loop of a screen
//! and advances them once per frame. The frame driver calls
//! [`AnimationScheduler::advance`]; nothing runs on its own thread.
//!
//! Elements never hold animation state in the scheduler directly. They hold
//! owner wrappers (`AnimatedTimeline`, `AnimatedSpring`, `AnimatedLoop`) that
//! register on creation and dispose their entry exactly once when dropped, so
//! no animation outlives the element that created it.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;

use pokedex_core::Vec2;
use slotmap::{new_key_type, SlotMap};

use crate::periodic::PeriodicMotion;
use crate::spring::{SettleRule, SpringConfig, SpringMotion2, SpringPhase};
use crate::timeline::Timeline;

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
    /// Handle to a registered spring release
    pub struct SpringId;
    /// Handle to a registered decorative loop
    pub struct LoopId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    timelines: SlotMap<TimelineId, Timeline>,
    springs: SlotMap<SpringId, SpringMotion2>,
    loops: SlotMap<LoopId, PeriodicMotion>,
    last_frame: Instant,
}

impl SchedulerInner {
    fn has_active(&self) -> bool {
        self.timelines.iter().any(|(_, t)| t.is_playing())
            || self.springs.iter().any(|(_, s)| !s.is_done())
            || self.loops.iter().any(|(_, l)| l.is_active())
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The animation scheduler that advances all registered animations
///
/// Typically held by the screen; elements receive a [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Set whenever something moved and the presentation tree should redraw
    needs_redraw: Arc<AtomicBool>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                springs: SlotMap::with_key(),
                loops: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
            needs_redraw: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a handle to this scheduler for passing to elements
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
            needs_redraw: Arc::downgrade(&self.needs_redraw),
        }
    }

    /// Advance every animation by `dt` seconds
    ///
    /// Returns true if any animation still needs frames. Entries are not
    /// removed when they finish; only their owners dispose them.
    pub fn advance(&self, dt: f32) -> bool {
        let mut inner = lock(&self.inner);
        inner.last_frame = Instant::now();

        for (_, timeline) in inner.timelines.iter_mut() {
            timeline.advance(dt);
        }

        for (id, spring) in inner.springs.iter_mut() {
            if spring.is_done() {
                continue;
            }
            if spring.advance(dt) == SpringPhase::TimedOut {
                tracing::debug!("Spring {:?} hit its duration cap", id);
            }
        }

        for (_, motion) in inner.loops.iter_mut() {
            motion.advance(dt);
        }

        let active = inner.has_active();
        if active {
            self.needs_redraw.store(true, Ordering::Release);
        }
        active
    }

    /// Advance by the wall-clock time since the previous frame
    pub fn tick(&self) -> bool {
        let dt = {
            let inner = lock(&self.inner);
            (Instant::now() - inner.last_frame).as_secs_f32()
        };
        self.advance(dt)
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).has_active()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Manually request a redraw
    pub fn request_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
    }

    pub fn timeline_count(&self) -> usize {
        lock(&self.inner).timelines.len()
    }

    pub fn spring_count(&self) -> usize {
        lock(&self.inner).springs.len()
    }

    pub fn loop_count(&self) -> usize {
        lock(&self.inner).loops.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// It won't keep the scheduler alive; once the scheduler is gone every call
/// is a no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
    needs_redraw: Weak<AtomicBool>,
}

impl SchedulerHandle {
    fn with_inner<R>(&self, f: impl FnOnce(&mut SchedulerInner) -> R) -> Option<R> {
        let inner = self.inner.upgrade()?;
        let mut guard = lock(&inner);
        Some(f(&mut guard))
    }

    /// Whether the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Ask the presentation tree for a new frame
    pub fn request_redraw(&self) {
        if let Some(flag) = self.needs_redraw.upgrade() {
            flag.store(true, Ordering::Release);
        }
    }

    // =========================================================================
    // Timelines
    // =========================================================================

    pub fn create_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        self.with_inner(|inner| {
            // Avoid a huge first dt for a timeline created after an idle period
            inner.last_frame = Instant::now();
            inner.timelines.insert(timeline)
        })
    }

    pub fn with_timeline<R>(
        &self,
        id: TimelineId,
        f: impl FnOnce(&mut Timeline) -> R,
    ) -> Option<R> {
        self.with_inner(|inner| inner.timelines.get_mut(id).map(f)).flatten()
    }

    pub fn timeline_progress(&self, id: TimelineId) -> Option<f32> {
        self.with_timeline(id, |t| t.progress())
    }

    pub fn dispose_timeline(&self, id: TimelineId) -> Option<Timeline> {
        self.with_inner(|inner| inner.timelines.remove(id)).flatten()
    }

    // =========================================================================
    // Springs
    // =========================================================================

    pub fn create_spring(&self, motion: SpringMotion2) -> Option<SpringId> {
        self.with_inner(|inner| {
            inner.last_frame = Instant::now();
            inner.springs.insert(motion)
        })
    }

    pub fn spring(&self, id: SpringId) -> Option<SpringMotion2> {
        self.with_inner(|inner| inner.springs.get(id).copied()).flatten()
    }

    pub fn dispose_spring(&self, id: SpringId) -> Option<SpringMotion2> {
        self.with_inner(|inner| inner.springs.remove(id)).flatten()
    }

    // =========================================================================
    // Loops
    // =========================================================================

    pub fn create_loop(&self, motion: PeriodicMotion) -> Option<LoopId> {
        self.with_inner(|inner| {
            inner.last_frame = Instant::now();
            inner.loops.insert(motion)
        })
    }

    pub fn with_loop<R>(&self, id: LoopId, f: impl FnOnce(&mut PeriodicMotion) -> R) -> Option<R> {
        self.with_inner(|inner| inner.loops.get_mut(id).map(f)).flatten()
    }

    pub fn dispose_loop(&self, id: LoopId) -> Option<PeriodicMotion> {
        self.with_inner(|inner| inner.loops.remove(id)).flatten()
    }
}

// ============================================================================
// Owner wrappers
// ============================================================================

/// A screen timeline owned by one element
///
/// # Example
///
/// ```
/// use pokedex_animation::{AnimatedTimeline, AnimationScheduler};
///
/// let scheduler = AnimationScheduler::new();
/// let entrance = AnimatedTimeline::new(scheduler.handle(), 1.2);
/// entrance.start();
/// scheduler.advance(0.6);
/// assert!((entrance.progress() - 0.5).abs() < 1e-5);
///
/// drop(entrance);
/// assert_eq!(scheduler.timeline_count(), 0);
/// ```
pub struct AnimatedTimeline {
    handle: SchedulerHandle,
    id: Option<TimelineId>,
}

impl AnimatedTimeline {
    pub fn new(handle: SchedulerHandle, duration_secs: f32) -> Self {
        let id = handle.create_timeline(Timeline::new(duration_secs));
        Self { handle, id }
    }

    pub fn start(&self) {
        self.with(|t| t.start());
        self.handle.request_redraw();
    }

    pub fn stop(&self) {
        self.with(|t| t.stop());
    }

    pub fn finish(&self) {
        self.with(|t| t.finish());
        self.handle.request_redraw();
    }

    /// Progress in [0, 1]; 1 once the scheduler is gone
    pub fn progress(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.timeline_progress(id))
            .unwrap_or(1.0)
    }

    pub fn is_playing(&self) -> bool {
        self.with(|t| t.is_playing()).unwrap_or(false)
    }

    /// Release the scheduler entry now instead of at drop
    pub fn dispose(self) {}

    fn with<R>(&self, f: impl FnOnce(&mut Timeline) -> R) -> Option<R> {
        self.id.and_then(|id| self.handle.with_timeline(id, f))
    }
}

impl Drop for AnimatedTimeline {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.dispose_timeline(id);
        }
    }
}

/// A drag-release spring owned by one element
///
/// Each release replaces the previous spring; the old entry is disposed.
pub struct AnimatedSpring {
    handle: SchedulerHandle,
    id: Option<SpringId>,
    config: SpringConfig,
    rule: SettleRule,
    /// Last value read from the scheduler, held once it is gone
    last: Cell<Vec2>,
}

impl AnimatedSpring {
    pub fn new(handle: SchedulerHandle, config: SpringConfig, rule: SettleRule) -> Self {
        Self {
            handle,
            id: None,
            config,
            rule,
            last: Cell::new(Vec2::ZERO),
        }
    }

    /// Release from `from` with `velocity`, springing back to the origin
    pub fn release(&mut self, from: Vec2, velocity: Vec2) {
        self.dispose_current();
        let motion = SpringMotion2::release(self.config, from, velocity, Vec2::ZERO, self.rule);
        self.id = self.handle.create_spring(motion);
        self.last.set(from);
        self.handle.request_redraw();
    }

    /// Current displacement
    pub fn value(&self) -> Vec2 {
        match self.id.and_then(|id| self.handle.spring(id)) {
            Some(motion) => {
                self.last.set(motion.value());
                motion.value()
            }
            None => self.last.get(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.id
            .and_then(|id| self.handle.spring(id))
            .map(|m| !m.is_done())
            .unwrap_or(false)
    }

    /// Stop and jump back to rest
    pub fn snap(&mut self) {
        self.dispose_current();
        self.last.set(Vec2::ZERO);
    }

    fn dispose_current(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.dispose_spring(id);
        }
    }
}

impl Drop for AnimatedSpring {
    fn drop(&mut self) {
        self.dispose_current();
    }
}

/// A decorative loop owned by one element
pub struct AnimatedLoop {
    handle: SchedulerHandle,
    id: Option<LoopId>,
}

impl AnimatedLoop {
    pub fn new(handle: SchedulerHandle, motion: PeriodicMotion) -> Self {
        let id = handle.create_loop(motion);
        Self { handle, id }
    }

    /// Run while hovered or active; freeze otherwise
    pub fn set_active(&self, active: bool) {
        if let Some(id) = self.id {
            self.handle.with_loop(id, |m| m.set_active(active));
            if active {
                self.handle.request_redraw();
            }
        }
    }

    pub fn sample(&self) -> crate::values::ElementTransform {
        self.id
            .and_then(|id| self.handle.with_loop(id, |m| m.sample()))
            .unwrap_or_default()
    }
}

impl Drop for AnimatedLoop {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.dispose_loop(id);
        }
    }
}
