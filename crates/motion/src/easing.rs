use std::time::Duration;

use serde::{Deserialize, Serialize};

/// CSS-style cubic Bezier timing curve through (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn component(u: f32, p1: f32, p2: f32) -> f32 {
        let inv = 1.0 - u;
        3.0 * inv * inv * u * p1 + 3.0 * inv * u * u * p2 + u * u * u
    }

    fn derivative(u: f32, p1: f32, p2: f32) -> f32 {
        let inv = 1.0 - u;
        3.0 * inv * inv * p1 + 6.0 * inv * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
    }

    /// Output progress for input progress `x` in [0, 1].
    pub fn solve(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        // Newton first, bisection when the slope flattens out.
        let mut u = x;
        for _ in 0..8 {
            let err = Self::component(u, self.x1, self.x2) - x;
            if err.abs() < 1e-6 {
                return Self::component(u, self.y1, self.y2);
            }
            let slope = Self::derivative(u, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            u -= err / slope;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        u = x;
        for _ in 0..48 {
            let v = Self::component(u, self.x1, self.x2);
            if (v - x).abs() < 1e-6 {
                break;
            }
            if v < x {
                lo = u;
            } else {
                hi = u;
            }
            u = 0.5 * (lo + hi);
        }
        Self::component(u, self.y1, self.y2)
    }
}

/// Named timing curves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    Bezier(CubicBezier),
}

impl Easing {
    pub fn curve(&self) -> Option<CubicBezier> {
        match self {
            Self::Linear => None,
            Self::EaseIn => Some(CubicBezier::new(0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some(CubicBezier::new(0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some(CubicBezier::new(0.42, 0.0, 0.58, 1.0)),
            Self::Bezier(curve) => Some(*curve),
        }
    }

    /// Eased progress for linear progress `t`, clamped into [0, 1].
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self.curve() {
            None => t,
            Some(curve) => curve.solve(t),
        }
    }
}

/// Time-based interpolation between two scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            delay: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Value `elapsed` after the tween was started. Holds `from` through the delay.
    pub fn sample(&self, elapsed: Duration) -> f32 {
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return self.from;
        };
        let t = if self.duration.is_zero() {
            1.0
        } else {
            running.as_secs_f32() / self.duration.as_secs_f32()
        };
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-2.0), 0.0);
            assert_eq!(easing.apply(3.0), 1.0);
        }
    }

    #[test]
    fn ease_out_leads_and_ease_in_lags() {
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn easing_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = Easing::EaseOut.apply(i as f32 / 100.0);
            assert!(v >= last - 1e-5);
            last = v;
        }
    }

    #[test]
    fn tween_holds_through_delay_then_finishes() {
        let tween = Tween::new(0.0, 1.0, Duration::from_millis(600))
            .with_delay(Duration::from_millis(200))
            .with_easing(Easing::Linear);

        assert_eq!(tween.sample(Duration::ZERO), 0.0);
        assert_eq!(tween.sample(Duration::from_millis(200)), 0.0);
        assert!((tween.sample(Duration::from_millis(500)) - 0.5).abs() < 1e-5);
        assert!(!tween.is_finished(Duration::from_millis(799)));
        assert!(tween.is_finished(Duration::from_millis(800)));
        assert_eq!(tween.sample(Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn zero_duration_tween_jumps() {
        let tween = Tween::new(20.0, 0.0, Duration::ZERO);
        assert_eq!(tween.sample(Duration::ZERO), 0.0);
        assert!(tween.is_finished(Duration::ZERO));
    }
}
