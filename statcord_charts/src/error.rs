use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// Not enough samples were collected yet to draw a chart
    #[error("Need {required} latency samples, only {available} available")]
    InsufficientSamples { required: usize, available: usize },

    /// Every slice of the pie would be empty
    #[error("There is nothing to draw in the pie chart")]
    EmptyPie,

    #[error("Failed to draw chart: {0}")]
    Draw(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw(value.to_string())
    }
}

pub type Result<T> = ::core::result::Result<T, ChartError>;
