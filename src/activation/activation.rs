use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            // Split on sign so exp() never overflows for large |x|.
            ActivationFunction::Sigmoid => {
                if x >= 0.0 {
                    1.0 / (1.0 + (-x).exp())
                } else {
                    let e = x.exp();
                    e / (1.0 + e)
                }
            }
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Element-wise derivative, evaluated at the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        let s = ActivationFunction::Sigmoid;
        assert_eq!(s.function(0.0), 0.5);
        assert!(s.function(-1000.0).is_finite());
        assert!(s.function(1000.0) <= 1.0);
        assert!((s.function(2.0) + s.function(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn relu_gates_negative_inputs() {
        let r = ActivationFunction::ReLU;
        assert_eq!(r.function(-3.0), 0.0);
        assert_eq!(r.function(3.0), 3.0);
        assert_eq!(r.derivative(-3.0), 0.0);
        assert_eq!(r.derivative(3.0), 1.0);
    }
}
