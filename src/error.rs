use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid window: {name} must be between 1 and {max}, got {value}")]
    InvalidWindow {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("no {0} records were generated")]
    EmptySeries(&'static str),

    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
}
