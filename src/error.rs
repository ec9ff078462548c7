use thiserror::Error;

pub type Result<T> = std::result::Result<T, CastError>;

#[derive(Debug, Error, PartialEq)]
pub enum CastError {
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    #[error("ray for column {column} left the map after {steps} steps without hitting a wall")]
    RayEscapedBounds { column: usize, steps: usize },

    #[error("camera at ({x}, {y}) is outside the map")]
    CameraOutsideMap { x: f64, y: f64 },

    #[error("invalid map: {reason}")]
    InvalidMap { reason: String },
}

impl CastError {
    #[must_use]
    pub fn invalid_map(reason: impl Into<String>) -> Self {
        Self::InvalidMap {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CastError;

    #[test]
    fn messages_carry_context() {
        let err = CastError::RayEscapedBounds {
            column: 17,
            steps: 20,
        };
        assert_eq!(
            err.to_string(),
            "ray for column 17 left the map after 20 steps without hitting a wall"
        );
        assert_eq!(
            CastError::invalid_map("ragged row 3").to_string(),
            "invalid map: ragged row 3"
        );
    }
}
