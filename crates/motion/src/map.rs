use serde::{Deserialize, Serialize};

use crate::MotionError;

/// Linear interpolation from an input domain onto an output range, clamped at
/// the domain edges.
///
/// The input range may be descending; the output range may run either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearMap {
    input: [f32; 2],
    output: [f32; 2],
}

impl LinearMap {
    pub fn new(input: [f32; 2], output: [f32; 2]) -> Result<Self, MotionError> {
        let finite = input.iter().chain(output.iter()).all(|v| v.is_finite());
        if !finite || input[0] == input[1] {
            return Err(MotionError::DegenerateRange(input[0], input[1]));
        }
        Ok(Self { input, output })
    }

    pub fn input(&self) -> [f32; 2] {
        self.input
    }

    pub fn output(&self) -> [f32; 2] {
        self.output
    }

    /// Map `value`. Values beyond either end of the domain produce that end's output.
    /// NaN maps to the first output endpoint.
    pub fn apply(&self, value: f32) -> f32 {
        let [i0, i1] = self.input;
        let [o0, o1] = self.output;
        let t = (value - i0) / (i1 - i0);
        if t.is_nan() {
            return o0;
        }
        let t = t.clamp(0.0, 1.0);
        o0 + (o1 - o0) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_endpoints_and_midpoint() {
        let m = LinearMap::new([-300.0, 300.0], [10.0, -10.0]).unwrap();
        assert_eq!(m.apply(-300.0), 10.0);
        assert_eq!(m.apply(300.0), -10.0);
        assert_eq!(m.apply(0.0), 0.0);
        assert!((m.apply(150.0) - -5.0).abs() < 1e-5);
    }

    #[test]
    fn clamps_outside_domain() {
        let m = LinearMap::new([-300.0, 300.0], [-10.0, 10.0]).unwrap();
        assert_eq!(m.apply(-1000.0), -10.0);
        assert_eq!(m.apply(1000.0), 10.0);
        assert_eq!(m.apply(f32::INFINITY), 10.0);
    }

    #[test]
    fn descending_input_range() {
        let m = LinearMap::new([1.0, 0.0], [0.0, 100.0]).unwrap();
        assert_eq!(m.apply(1.0), 0.0);
        assert_eq!(m.apply(0.0), 100.0);
        assert_eq!(m.apply(-5.0), 100.0);
    }

    #[test]
    fn nan_maps_to_first_output() {
        let m = LinearMap::new([0.0, 1.0], [3.0, 4.0]).unwrap();
        assert_eq!(m.apply(f32::NAN), 3.0);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        assert_eq!(
            LinearMap::new([2.0, 2.0], [0.0, 1.0]),
            Err(MotionError::DegenerateRange(2.0, 2.0))
        );
        assert!(LinearMap::new([0.0, f32::NAN], [0.0, 1.0]).is_err());
    }
}
