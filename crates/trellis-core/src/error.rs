use thiserror::Error;

/// Errors surfaced to whoever set a bad value. Layout itself never fails; it
/// clamps instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

pub type Result<T, E = ControlError> = std::result::Result<T, E>;

impl ControlError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ControlError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub fn check_finite(name: &'static str, v: f32) -> Result<f32> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ControlError::invalid(name, format!("{v} is not finite")))
    }
}

pub fn check_non_negative(name: &'static str, v: f32) -> Result<f32> {
    let v = check_finite(name, v)?;
    if v < 0.0 {
        return Err(ControlError::invalid(name, format!("{v} is negative")));
    }
    Ok(v)
}

pub fn check_unit(name: &'static str, v: f32) -> Result<f32> {
    let v = check_finite(name, v)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(ControlError::invalid(name, format!("{v} is outside [0, 1]")));
    }
    Ok(v)
}
