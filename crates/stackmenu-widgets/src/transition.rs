#![forbid(unsafe_code)]

//! Enter and exit transitions for stack frames.
//!
//! A [`FrameTransition`] is a progress state machine advanced by
//! [`tick`](FrameTransition::tick). Hosts read the interpolated
//! [`TransitionValues`] (opacity and horizontal offset) each frame and apply
//! them to whatever visual element backs the frame.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use stackmenu_widgets::transition::{FrameTransition, TransitionConfig};
//!
//! let config = TransitionConfig::default();
//! let mut transition = FrameTransition::enter();
//!
//! assert!(!transition.tick(Duration::from_millis(50), &config));
//! let values = transition.values(&config);
//! assert!(values.opacity > 0.0 && values.opacity < 1.0);
//!
//! assert!(transition.tick(Duration::from_secs(1), &config));
//! assert_eq!(transition.values(&config).opacity, 1.0);
//! ```
//!
//! # Invariants
//!
//! - Progress is always in `[0.0, 1.0]`.
//! - Opacity is always in `[0.0, 1.0]`, even with an overshooting easing.
//! - A zero-duration transition finishes on its first tick.

use web_time::Duration;

// ============================================================================
// Direction
// ============================================================================

/// Which way a frame is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionDirection {
    /// The frame is appearing on top of the stack.
    Enter,
    /// The frame is leaving the stack.
    Exit,
}

// ============================================================================
// Entrance / Exit kinds
// ============================================================================

/// Entrance animation for a pushed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum EntranceKind {
    /// Slide in from the right while fading in.
    #[default]
    SlideIn,
    /// Fade in without moving.
    FadeIn,
    /// Appear instantly.
    None,
}

impl EntranceKind {
    fn initial_opacity(self) -> f64 {
        match self {
            Self::SlideIn | Self::FadeIn => 0.0,
            Self::None => 1.0,
        }
    }

    fn initial_offset(self, distance: u16) -> i16 {
        match self {
            Self::SlideIn => distance.min(i16::MAX as u16) as i16,
            Self::FadeIn | Self::None => 0,
        }
    }
}

/// Exit animation for a popped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ExitKind {
    /// Slide out to the right while fading out.
    #[default]
    SlideOut,
    /// Fade out without moving.
    FadeOut,
    /// Disappear instantly.
    None,
}

impl ExitKind {
    fn final_offset(self, distance: u16) -> i16 {
        match self {
            Self::SlideOut => distance.min(i16::MAX as u16) as i16,
            Self::FadeOut | Self::None => 0,
        }
    }
}

// ============================================================================
// Easing
// ============================================================================

/// Easing curve applied to raw progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Easing {
    Linear,
    /// Decelerating; good for entrances.
    #[default]
    EaseOut,
    /// Accelerating; good for exits.
    EaseIn,
    EaseInOut,
    /// Slight overshoot then settle.
    Back,
}

impl Easing {
    /// Apply the curve to `t` (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::Back => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let t_minus_1 = t - 1.0;
                1.0 + c3 * t_minus_1 * t_minus_1 * t_minus_1 + c1 * t_minus_1 * t_minus_1
            }
        }
    }

    /// Whether the curve can leave `0.0..=1.0`.
    #[must_use]
    pub fn can_overshoot(self) -> bool {
        matches!(self, Self::Back)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Timing and shape of frame transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionConfig {
    pub entrance: EntranceKind,
    pub exit: ExitKind,
    pub entrance_duration: Duration,
    pub exit_duration: Duration,
    pub entrance_easing: Easing,
    pub exit_easing: Easing,
    /// Horizontal travel of slide animations, in cells.
    pub slide_distance: u16,
    /// Swap in [`reduced_motion`](Self::reduced_motion) when the host asks
    /// for reduced motion.
    pub respect_reduced_motion: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            entrance: EntranceKind::SlideIn,
            exit: ExitKind::SlideOut,
            entrance_duration: Duration::from_millis(200),
            exit_duration: Duration::from_millis(150),
            entrance_easing: Easing::EaseOut,
            exit_easing: Easing::EaseIn,
            slide_distance: 8,
            respect_reduced_motion: true,
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No animation at all: every transition settles immediately.
    #[must_use]
    pub fn none() -> Self {
        Self {
            entrance: EntranceKind::None,
            exit: ExitKind::None,
            entrance_duration: Duration::ZERO,
            exit_duration: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Short linear fades without movement.
    #[must_use]
    pub fn reduced_motion() -> Self {
        Self {
            entrance: EntranceKind::FadeIn,
            exit: ExitKind::FadeOut,
            entrance_duration: Duration::from_millis(100),
            exit_duration: Duration::from_millis(100),
            entrance_easing: Easing::Linear,
            exit_easing: Easing::Linear,
            slide_distance: 0,
            respect_reduced_motion: true,
        }
    }

    #[must_use]
    pub fn entrance(mut self, kind: EntranceKind) -> Self {
        self.entrance = kind;
        self
    }

    #[must_use]
    pub fn exit(mut self, kind: ExitKind) -> Self {
        self.exit = kind;
        self
    }

    #[must_use]
    pub fn entrance_duration(mut self, duration: Duration) -> Self {
        self.entrance_duration = duration;
        self
    }

    #[must_use]
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    #[must_use]
    pub fn entrance_easing(mut self, easing: Easing) -> Self {
        self.entrance_easing = easing;
        self
    }

    #[must_use]
    pub fn exit_easing(mut self, easing: Easing) -> Self {
        self.exit_easing = easing;
        self
    }

    #[must_use]
    pub fn slide_distance(mut self, cells: u16) -> Self {
        self.slide_distance = cells;
        self
    }

    #[must_use]
    pub fn respect_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = respect;
        self
    }

    /// The config actually used, given the host's reduced-motion preference.
    #[must_use]
    pub fn effective(&self, reduced_motion: bool) -> Self {
        if reduced_motion && self.respect_reduced_motion {
            Self::reduced_motion()
        } else {
            self.clone()
        }
    }

    /// Duration of a transition in `direction`.
    #[must_use]
    pub fn duration(&self, direction: TransitionDirection) -> Duration {
        match direction {
            TransitionDirection::Enter => self.entrance_duration,
            TransitionDirection::Exit => self.exit_duration,
        }
    }
}

// ============================================================================
// Transition state
// ============================================================================

/// Interpolated visual state of a transitioning frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionValues {
    /// `0.0` transparent, `1.0` opaque.
    pub opacity: f64,
    /// Horizontal displacement in cells; positive is to the right.
    pub offset: i16,
}

impl TransitionValues {
    /// Fully shown, at rest.
    pub const STABLE: Self = Self {
        opacity: 1.0,
        offset: 0,
    };
}

/// Progress of one enter or exit transition.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTransition {
    direction: TransitionDirection,
    progress: f64,
    reduced_motion: bool,
}

impl FrameTransition {
    #[must_use]
    pub fn new(direction: TransitionDirection) -> Self {
        Self {
            direction,
            progress: 0.0,
            reduced_motion: false,
        }
    }

    #[must_use]
    pub fn enter() -> Self {
        Self::new(TransitionDirection::Enter)
    }

    #[must_use]
    pub fn exit() -> Self {
        Self::new(TransitionDirection::Exit)
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    #[must_use]
    pub fn direction(&self) -> TransitionDirection {
        self.direction
    }

    /// Raw progress in `[0.0, 1.0]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Whether this transition would finish without any elapsed time.
    #[must_use]
    pub fn is_instant(&self, config: &TransitionConfig) -> bool {
        config
            .effective(self.reduced_motion)
            .duration(self.direction)
            .is_zero()
    }

    /// Advance by `delta`. Returns `true` once the transition has finished.
    pub fn tick(&mut self, delta: Duration, config: &TransitionConfig) -> bool {
        let duration = config
            .effective(self.reduced_motion)
            .duration(self.direction)
            .as_secs_f64();
        if duration > 0.0 {
            self.progress += delta.as_secs_f64() / duration;
        } else {
            self.progress = 1.0;
        }
        self.progress = self.progress.clamp(0.0, 1.0);
        self.is_finished()
    }

    /// Jump to the end.
    pub fn finish(&mut self) {
        self.progress = 1.0;
    }

    /// Progress after easing.
    #[must_use]
    pub fn eased_progress(&self, config: &TransitionConfig) -> f64 {
        let config = config.effective(self.reduced_motion);
        match self.direction {
            TransitionDirection::Enter => config.entrance_easing.apply(self.progress),
            TransitionDirection::Exit => config.exit_easing.apply(self.progress),
        }
    }

    /// Opacity and offset at the current progress.
    #[must_use]
    pub fn values(&self, config: &TransitionConfig) -> TransitionValues {
        let effective = config.effective(self.reduced_motion);
        let p = self.eased_progress(config);
        let distance = effective.slide_distance;
        match self.direction {
            TransitionDirection::Enter => {
                let initial_opacity = effective.entrance.initial_opacity();
                let initial_offset = f64::from(effective.entrance.initial_offset(distance));
                TransitionValues {
                    opacity: (initial_opacity + (1.0 - initial_opacity) * p).clamp(0.0, 1.0),
                    offset: (initial_offset * (1.0 - p)).round() as i16,
                }
            }
            TransitionDirection::Exit => {
                let final_offset = f64::from(effective.exit.final_offset(distance));
                TransitionValues {
                    opacity: (1.0 - p).clamp(0.0, 1.0),
                    offset: (final_offset * p).round() as i16,
                }
            }
        }
    }
}
