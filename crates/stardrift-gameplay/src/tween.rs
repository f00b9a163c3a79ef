//! Time-based tweening.
//!
//! A [`Tween`] interpolates between two values over a duration in seconds,
//! shaped by an [`Ease`]. Tweens can repeat, and with `yoyo` every other cycle
//! plays backwards, so `repeat = 1` with yoyo goes out and comes back.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stardrift_common::Color;

/// Values that can be tweened.
pub trait Interpolate: Copy {
    /// Value at fraction `t` between `self` and `to`.
    fn interpolate(self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Color {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Quadratic deceleration.
    #[default]
    Power1Out,
    /// Quadratic acceleration then deceleration.
    Power1InOut,
    /// Cubic deceleration.
    Power2Out,
    /// Cubic acceleration then deceleration.
    Power2InOut,
    /// Bounces against the end value.
    BounceOut,
    /// Overshoots and oscillates into the end value.
    ElasticOut,
}

impl Ease {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            },
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            },
            Self::BounceOut => bounce_out(t),
            Self::ElasticOut => {
                if t <= 0.0 || t >= 1.0 {
                    t
                } else {
                    let period = TAU / 3.0;
                    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * period).sin() + 1.0
                }
            },
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984_375
    }
}

/// A single interpolation over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    ease: Ease,
    yoyo: bool,
    repeat: u32,
}

impl<T: Interpolate> Tween<T> {
    /// Creates a tween from `from` to `to` lasting `duration` seconds.
    #[must_use]
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
            yoyo: false,
            repeat: 0,
        }
    }

    /// Plays `repeat` extra cycles, alternating direction.
    #[must_use]
    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.yoyo = true;
        self.repeat = repeat;
        self
    }

    /// Duration of all cycles together.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.duration * (self.repeat + 1) as f32
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.total_duration());
        self.value()
    }

    /// Value at the current time.
    #[must_use]
    pub fn value(&self) -> T {
        if self.duration <= 0.0 {
            return self.end_value();
        }

        let cycle = ((self.elapsed / self.duration) as u32).min(self.repeat);
        let local = ((self.elapsed - cycle as f32 * self.duration) / self.duration).min(1.0);
        let progress = if self.yoyo && cycle % 2 == 1 {
            self.ease.apply(1.0 - local)
        } else {
            self.ease.apply(local)
        };
        self.from.interpolate(self.to, progress)
    }

    /// Value once every cycle has played.
    #[must_use]
    pub fn end_value(&self) -> T {
        if self.yoyo && self.repeat % 2 == 1 {
            self.from
        } else {
            self.to
        }
    }

    /// Whether every cycle has played.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total_duration()
    }

    /// Start value.
    #[must_use]
    pub const fn from(&self) -> T {
        self.from
    }

    /// Target value.
    #[must_use]
    pub const fn to(&self) -> T {
        self.to
    }
}

/// A tween applied as increments on top of other motion.
///
/// Several relative tweens on the same property add up instead of fighting
/// over the absolute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeTween {
    tween: Tween<Vec3>,
    applied: Vec3,
}

impl RelativeTween {
    /// Moves by `delta` in total over `duration` seconds.
    #[must_use]
    pub fn new(delta: Vec3, duration: f32, ease: Ease) -> Self {
        Self::from_tween(Tween::new(Vec3::ZERO, delta, duration, ease))
    }

    /// Wraps a tween that starts at zero.
    #[must_use]
    pub fn from_tween(tween: Tween<Vec3>) -> Self {
        Self {
            tween,
            applied: Vec3::ZERO,
        }
    }

    /// Advances and returns the increment to add this tick.
    pub fn step(&mut self, dt: f32) -> Vec3 {
        let value = self.tween.advance(dt);
        let delta = value - self.applied;
        self.applied = value;
        delta
    }

    /// Whether the whole delta has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.tween.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EASES: [Ease; 7] = [
        Ease::Linear,
        Ease::Power1Out,
        Ease::Power1InOut,
        Ease::Power2Out,
        Ease::Power2InOut,
        Ease::BounceOut,
        Ease::ElasticOut,
    ];

    #[test]
    fn test_eases_hit_endpoints() {
        for ease in EASES {
            assert!(ease.apply(0.0).abs() < 1e-5, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-5, "{ease:?} at 1");
        }
    }

    #[test]
    fn test_in_out_is_symmetric_at_half() {
        assert!((Ease::Power1InOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Ease::Power2InOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::ElasticOut.apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_linear_tween_progress() {
        let mut tween = Tween::new(0.0_f32, 10.0, 1.0, Ease::Linear);
        assert!((tween.advance(0.25) - 2.5).abs() < 1e-5);
        assert!(!tween.is_finished());
        assert!((tween.advance(1.0) - 10.0).abs() < 1e-5);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_yoyo_returns_to_start() {
        let mut tween = Tween::new(1.0_f32, 1.5, 0.3, Ease::Linear).yoyo(1);
        assert!((tween.total_duration() - 0.6).abs() < 1e-6);
        assert!((tween.advance(0.3) - 1.5).abs() < 1e-4);
        assert!((tween.advance(0.15) - 1.25).abs() < 1e-4);
        assert!((tween.advance(0.15) - 1.0).abs() < 1e-4);
        assert!(tween.is_finished());
        assert!((tween.end_value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let tween = Tween::new(Vec3::ZERO, Vec3::ONE, 0.0, Ease::Linear);
        assert_eq!(tween.value(), Vec3::ONE);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_color_tween() {
        let mut tween = Tween::new(Color::BLACK, Color::WHITE, 0.5, Ease::Linear);
        let mid = tween.advance(0.25);
        assert!((mid.r - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_relative_tween_sums_to_delta() {
        let delta = Vec3::new(0.0, 0.0, -0.5);
        let mut tween = RelativeTween::new(delta, 1.5, Ease::Power2InOut);
        let mut total = Vec3::ZERO;
        while !tween.is_finished() {
            total += tween.step(1.0 / 60.0);
        }
        assert!((total - delta).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_relative_yoyo_nets_zero(dy in -2.0f32..2.0, frames in 1usize..20) {
            let tween = Tween::new(Vec3::ZERO, Vec3::new(0.0, dy, 0.0), 0.5, Ease::Power2Out).yoyo(1);
            let mut relative = RelativeTween::from_tween(tween);
            let mut total = Vec3::ZERO;
            let dt = 1.0 / frames as f32;
            while !relative.is_finished() {
                total += relative.step(dt);
            }
            prop_assert!(total.length() < 1e-4);
        }
    }
}
