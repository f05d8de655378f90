use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::MotionError;

/// Longest integration sub-step. Stiff presets (k = 500) are only stable with
/// semi-implicit Euler when `dt * sqrt(k / m)` stays well below 2.
const MAX_SUBSTEP: f32 = 0.001;

/// A value a spring can animate: needs vector arithmetic and a length.
pub trait SpringValue:
    Copy + Debug + PartialEq + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
    const ZERO: Self;

    fn magnitude(self) -> f32;
}

impl SpringValue for f32 {
    const ZERO: Self = 0.0;

    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl SpringValue for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn magnitude(self) -> f32 {
        self.length()
    }
}

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Restoring force per unit of displacement.
    pub stiffness: f32,
    /// Opposing force per unit of velocity.
    pub damping: f32,
    pub mass: f32,
    /// Displacement below which the spring may come to rest.
    pub rest_delta: f32,
    /// Speed below which the spring may come to rest.
    pub rest_speed: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_delta: 0.01,
            rest_speed: 0.01,
        }
    }
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            ..Self::default()
        }
    }

    /// Damping that exactly cancels oscillation for the given stiffness (unit mass).
    pub fn critical(stiffness: f32) -> Self {
        Self::new(stiffness, 2.0 * stiffness.sqrt())
    }

    /// Snappy preset for the cursor dot.
    pub fn cursor_dot() -> Self {
        Self::new(500.0, 28.0)
    }

    /// Softer preset for the trailing cursor ring.
    pub fn cursor_ring() -> Self {
        Self::new(250.0, 20.0)
    }

    /// Overdamped preset for the scroll progress bar.
    pub fn scroll_bar() -> Self {
        Self {
            rest_delta: 0.001,
            rest_speed: 0.001,
            ..Self::new(100.0, 30.0)
        }
    }

    /// Stiff, heavily damped preset for pointer tilt.
    pub fn tilt() -> Self {
        Self::new(500.0, 100.0)
    }

    /// `damping / (2 * sqrt(stiffness * mass))`; 1.0 is critical.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    pub fn validate(&self) -> Result<(), MotionError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MotionError::InvalidSpring {
                    field,
                    expected: "finite and positive",
                    value,
                })
            }
        };
        positive("stiffness", self.stiffness)?;
        positive("mass", self.mass)?;
        positive("rest_delta", self.rest_delta)?;
        positive("rest_speed", self.rest_speed)?;
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(MotionError::InvalidSpring {
                field: "damping",
                expected: "finite and non-negative",
                value: self.damping,
            });
        }
        Ok(())
    }
}

/// Second-order filter pulling a value toward a moving target.
///
/// `a = (-k * (x - target) - c * v) / m`, integrated with semi-implicit Euler
/// in fixed sub-steps so the result does not depend on the host frame rate.
#[derive(Debug, Clone)]
pub struct Spring<T: SpringValue> {
    config: SpringConfig,
    current: T,
    target: T,
    velocity: T,
    settled: bool,
}

impl<T: SpringValue> Spring<T> {
    /// A spring resting at `initial`.
    pub fn new(initial: T, config: SpringConfig) -> Self {
        Self {
            config,
            current: initial,
            target: initial,
            velocity: T::ZERO,
            settled: true,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn value(&self) -> T {
        self.current
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Retarget the spring. Motion continues from the current value and velocity.
    pub fn set_target(&mut self, target: T) {
        if target != self.target {
            self.target = target;
            self.settled = false;
        }
    }

    /// Teleport to `value` and rest there.
    pub fn jump_to(&mut self, value: T) {
        self.current = value;
        self.target = value;
        self.velocity = T::ZERO;
        self.settled = true;
    }

    /// Advance the simulation by `dt` and return the new value.
    pub fn step(&mut self, dt: Duration) -> T {
        if self.settled {
            return self.current;
        }
        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP);
            self.integrate(h);
            remaining -= h;
            if self.try_rest() {
                break;
            }
        }
        self.current
    }

    fn integrate(&mut self, h: f32) {
        let displacement = self.current - self.target;
        let force = displacement * -self.config.stiffness + self.velocity * -self.config.damping;
        let acceleration = force * (1.0 / self.config.mass);
        self.velocity = self.velocity + acceleration * h;
        self.current = self.current + self.velocity * h;
    }

    fn try_rest(&mut self) -> bool {
        let displacement = (self.current - self.target).magnitude();
        if displacement < self.config.rest_delta
            && self.velocity.magnitude() < self.config.rest_speed
        {
            self.current = self.target;
            self.velocity = T::ZERO;
            self.settled = true;
        }
        self.settled
    }
}
