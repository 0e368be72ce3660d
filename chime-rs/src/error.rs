#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A scalar input lies outside the range the model is defined on.
    #[error("{name} = {value} is out of range: expected {expected}")]
    Domain {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A numeric input is NaN or infinite, or a count is negative.
    #[error("{name} must be a finite, non-negative number (got {value})")]
    Invalid {
        name: &'static str,
        value: f64,
    },

    /// The compartments summed to zero after a step, so they cannot be rescaled.
    #[error("population vanished after SIR step; cannot renormalize to {target}")]
    ZeroPopulation {
        target: f64,
    },

    #[error("policy schedule must contain at least one phase")]
    EmptySchedule,
}

impl ModelError {
    pub(crate) fn domain(name: &'static str, value: f64, expected: &'static str) -> Self {
        Self::Domain {
            name,
            value,
            expected,
        }
    }
}

/// Fails with [`ModelError::Invalid`] unless `value` is finite and `>= 0`.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ModelError::Invalid { name, value })
    }
}
