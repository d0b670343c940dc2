mod error;
mod history;
mod labels;
mod latency;
mod pie;
mod render;

pub use error::{ChartError, Result};
pub use history::LatencyHistory;
pub use labels::{axis_labels, AxisLabels};
pub use latency::{LatencyStats, BAND_RATIO, CHUNK_SIZE, CHUNK_SPREAD};
pub use pie::{composite_onto_legend, render_status_pie, StatusBreakdown};
pub use render::render_latency_chart;
