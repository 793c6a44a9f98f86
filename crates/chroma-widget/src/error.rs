// SPDX-License-Identifier: MIT
//
// Construction errors.
//
// Nothing a widget does after construction can fail on its values: inputs
// are clamped. What can be wrong is the shape of a slider itself, and that
// is rejected up front so the clamping and track arithmetic never see an
// empty range, a zero divisor, or a track too wide to draw.

use thiserror::Error;

/// Why a [`Slider`](crate::slider::Slider) could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SliderError {
    #[error("slider minimum {minimum} is greater than its maximum {maximum}")]
    InvertedBounds { minimum: i32, maximum: i32 },

    #[error("slider step must be positive, got {step}")]
    NonPositiveStep { step: i32 },

    #[error("slider value {value} is outside [{minimum}, {maximum}]")]
    ValueOutOfRange { value: i32, minimum: i32, maximum: i32 },

    #[error("slider track would be {positions} positions wide, limit is {limit}")]
    TrackTooLong { positions: i64, limit: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_numbers() {
        let err = SliderError::InvertedBounds {
            minimum: 10,
            maximum: 2,
        };
        assert_eq!(
            err.to_string(),
            "slider minimum 10 is greater than its maximum 2"
        );

        let err = SliderError::ValueOutOfRange {
            value: 300,
            minimum: 0,
            maximum: 255,
        };
        assert_eq!(err.to_string(), "slider value 300 is outside [0, 255]");
    }

    #[test]
    fn step_message() {
        let err = SliderError::NonPositiveStep { step: 0 };
        assert_eq!(err.to_string(), "slider step must be positive, got 0");
    }

    #[test]
    fn track_message() {
        let err = SliderError::TrackTooLong {
            positions: 2000,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "slider track would be 2000 positions wide, limit is 1024"
        );
    }
}
