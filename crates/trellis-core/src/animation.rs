//! Time-driven interpolation.
//!
//! Nothing here reads the wall clock on its own: every update takes the
//! frame's `Instant`, which the frame driver obtains from an injected
//! [`Clock`]. Tests install a [`ManualClock`] and step it explicitly.

use std::sync::Arc;

use parking_lot::Mutex;
use web_time::{Duration, Instant};

use crate::{Color, Insets, Matrix, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(200),
            easing: Easing::EaseOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    /// Completes on the first update after a restart.
    pub fn instant() -> Self {
        Self::tween(Duration::ZERO, Easing::Linear)
    }

    pub fn fast() -> Self {
        Self::tween(Duration::from_millis(150), Easing::EaseOut)
    }

    pub fn slow() -> Self {
        Self::tween(Duration::from_millis(600), Easing::EaseInOut)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Vec2::new(self.x.interpolate(&other.x, t), self.y.interpolate(&other.y, t))
    }
}

impl Interpolate for Insets {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Insets::new(
            self.left.interpolate(&other.left, t),
            self.top.interpolate(&other.top, t),
            self.right.interpolate(&other.right, t),
            self.bottom.interpolate(&other.bottom, t),
        )
    }
}

impl Interpolate for Matrix {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Interpolate for Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        let c = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color(
            c(self.0, other.0),
            c(self.1, other.1),
            c(self.2, other.2),
            c(self.3, other.3),
        )
    }
}

// Animation clock
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock driven by hand. Clones share the same instant.
#[derive(Clone)]
pub struct ManualClock {
    t: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            t: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.t.lock();
        *t += by;
    }

    pub fn set(&self, at: Instant) {
        *self.t.lock() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.t.lock()
    }
}

/// The values an [`Animator`] moves between. Each animator only cares about
/// some of the channels; the rest stay at their neutral values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorState {
    pub matrix: Matrix,
    /// Added to every measured box edge (positive grows the box).
    pub box_adjust: Insets,
    pub opacity: f32,
}

impl Default for AnimatorState {
    fn default() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            box_adjust: Insets::ZERO,
            opacity: 1.0,
        }
    }
}

impl AnimatorState {
    pub fn with_matrix(matrix: Matrix) -> Self {
        Self {
            matrix,
            ..Self::default()
        }
    }
}

impl Interpolate for AnimatorState {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            matrix: self.matrix.interpolate(&other.matrix, t),
            box_adjust: self.box_adjust.interpolate(&other.box_adjust, t),
            opacity: self.opacity.interpolate(&other.opacity, t),
        }
    }
}

/// Interpolates between a `before` and an `after` state once restarted.
///
/// When progress reaches 1 the animator stops running but keeps reporting the
/// `after` state.
#[derive(Clone, Debug)]
pub struct Animator {
    pub spec: AnimationSpec,
    before: AnimatorState,
    after: AnimatorState,
    current: AnimatorState,
    started: Option<Instant>,
    progress: f32,
    running: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimationSpec::default())
    }
}

impl Animator {
    pub fn new(spec: AnimationSpec) -> Self {
        Self::with_states(spec, AnimatorState::default(), AnimatorState::default())
    }

    pub fn with_states(spec: AnimationSpec, before: AnimatorState, after: AnimatorState) -> Self {
        Self {
            spec,
            before,
            after,
            current: after,
            started: None,
            progress: 1.0,
            running: false,
        }
    }

    pub fn before(&self) -> &AnimatorState {
        &self.before
    }

    pub fn after(&self) -> &AnimatorState {
        &self.after
    }

    pub fn set_before(&mut self, state: AnimatorState) {
        self.before = state;
    }

    pub fn set_after(&mut self, state: AnimatorState) {
        self.after = state;
    }

    pub fn restart(&mut self, now: Instant) {
        self.started = Some(now);
        self.running = true;
        self.progress = 0.0;
        self.current = self.before;
    }

    /// Stops where it is; `current` keeps its last value.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances to `now`. Returns whether the animator is still running.
    pub fn update(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        let Some(start) = self.started else {
            self.running = false;
            return false;
        };

        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.spec.delay {
            self.progress = 0.0;
            self.current = self.before;
            return true;
        }

        let t = elapsed - self.spec.delay;
        if self.spec.duration.is_zero() || t >= self.spec.duration {
            self.progress = 1.0;
            self.current = self.after;
            self.running = false;
            return false;
        }

        self.progress = t.as_secs_f32() / self.spec.duration.as_secs_f32();
        self.current = self.sample(self.progress);
        true
    }

    /// State at an arbitrary progress, without touching the animator.
    pub fn sample(&self, progress: f32) -> AnimatorState {
        let eased = self.spec.easing.interpolate(progress);
        self.before.interpolate(&self.after, eased)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn current(&self) -> &AnimatorState {
        &self.current
    }
}

/// Value that transitions smoothly toward its latest target.
pub struct AnimatedValue<T: Interpolate + Clone> {
    current: T,
    target: T,
    start: T,
    spec: AnimationSpec,
    start_time: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T, spec: AnimationSpec) -> Self {
        Self {
            current: initial.clone(),
            target: initial.clone(),
            start: initial,
            spec,
            start_time: None,
        }
    }

    pub fn set_target(&mut self, target: T, now: Instant) {
        self.start = self.current.clone();
        self.target = target;
        self.start_time = Some(now);
    }

    /// Jumps to `value` and stops any transition in flight.
    pub fn snap(&mut self, value: T) {
        self.current = value.clone();
        self.start = value.clone();
        self.target = value;
        self.start_time = None;
    }

    pub fn update(&mut self, now: Instant) -> bool {
        let Some(start) = self.start_time else {
            return false;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.spec.delay {
            return true;
        }

        let animation_time = elapsed - self.spec.delay;
        if self.spec.duration.is_zero() || animation_time >= self.spec.duration {
            self.current = self.target.clone();
            self.start_time = None;
            return false;
        }

        let t = animation_time.as_secs_f32() / self.spec.duration.as_secs_f32();
        let eased_t = self.spec.easing.interpolate(t);
        self.current = self.start.interpolate(&self.target, eased_t);
        true
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.start_time.is_some()
    }
}
