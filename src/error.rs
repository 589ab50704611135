/// Errors reported by the engine.
///
/// Only configuration and construction can fail. Stepping never does.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An out-of-range, non-positive or non-finite parameter.
    InvalidParameter {
        /// Name of the offending parameter, e.g. `"mass.star"`.
        name: &'static str,
        reason: String,
    },
}

impl Error {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Name of the parameter that failed validation.
    pub fn parameter(&self) -> &'static str {
        match self {
            Error::InvalidParameter { name, .. } => name,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{}`: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let err = Error::invalid("time_step", "must be positive, got -1");
        assert_eq!(err.parameter(), "time_step");
        assert_eq!(
            err.to_string(),
            "invalid parameter `time_step`: must be positive, got -1"
        );
    }
}
