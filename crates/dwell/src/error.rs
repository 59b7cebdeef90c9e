use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("A radial menu needs at least 2 sectors, got {0}")]
    InvalidSectorCount(usize),
    #[error("Angle gap must be finite, non-negative and narrower than a sector ({width}°), got {gap}°")]
    InvalidAngleGap { gap: f64, width: f64 },
    #[error("Dead-zone radius must be finite and non-negative, got {0}")]
    InvalidDeadzone(f64),
    #[error("Dwell selection time must be finite and positive, got {0}s")]
    InvalidSelectionTime(f64),
}
