use std::{f64::consts::PI, io::Cursor};

use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbImage};
use log::debug;
use plotters::{coord::Shift, prelude::*};

use crate::{axis_labels, ChartError, LatencyStats, Result};

const WIDTH: u32 = 1500;
const HEIGHT: u32 = 750;

const ALICE_BLUE: RGBColor = RGBColor(240, 248, 255);
const THISTLE: RGBColor = RGBColor(216, 191, 216);
const INDIAN_RED: RGBColor = RGBColor(205, 92, 92);
const DARK_ORCHID: RGBColor = RGBColor(153, 50, 204);
const FOREST_GREEN: RGBColor = RGBColor(34, 139, 34);
const LIME: RGBColor = RGBColor(0, 255, 0);
const DODGER_BLUE: RGBColor = RGBColor(30, 144, 255);
const CRIMSON: RGBColor = RGBColor(220, 20, 60);
const DARK_RED: RGBColor = RGBColor(139, 0, 0);

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Draw the three panel latency chart and return it as PNG bytes.
///
/// This is CPU bound, callers on the async runtime should run it on the blocking pool.
pub fn render_latency_chart(name: &str, stats: &LatencyStats, now: DateTime<Utc>) -> Result<Vec<u8>> {
    let labels = axis_labels(now);
    let mut pixels = vec![0u8; WIDTH as usize * HEIGHT as usize * 3];

    // The backend holds `pixels` until the end of this block, early returns included.
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let title = format!(
            "Latency over Time ({name}) | {} UTC",
            now.format("%Y-%m-%d %H:%M:%S")
        );
        let root = root.titled(&title, ("sans-serif", 24))?;

        let (width, height) = root.dim_in_pixel();
        let (upper, lower) = root.split_vertically((height / 2) as i32);
        let (detail, stability) = upper.split_horizontally((width / 2) as i32);

        draw_detail(&detail, stats, &labels.detail)?;
        draw_stability(&stability, stats, &labels.stability)?;
        draw_long(&lower, stats, &labels.long)?;

        root.present()?;
    }

    let png = encode_png(pixels, WIDTH, HEIGHT)?;
    debug!("Rendered {name} latency chart ({} bytes)", png.len());

    Ok(png)
}

/// Short horizon: raw samples, mean, bands and the log scaled trace.
fn draw_detail(area: &Area<'_>, stats: &LatencyStats, labels: &[String]) -> Result<()> {
    let count = stats.samples.len() as f64;
    let pad = (stats.range() / 4.0).max(1.0);
    let (log_low, log_high) = finite_bounds(&stats.log_series);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .right_y_label_area_size(40)
        .build_cartesian_2d(0f64..count, (stats.min - pad)..(stats.max + pad))?
        .set_secondary_coord(0f64..count, log_low..log_high);

    chart.plotting_area().fill(&THISTLE.mix(0.2))?;

    chart
        .configure_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| tick_label(labels, *x, 10.0))
        .y_desc("Milliseconds(ms)")
        .draw()?;

    chart.configure_secondary_axes().y_desc("ln(ms)").draw()?;

    let xs: Vec<f64> = (0..stats.samples.len()).map(|i| i as f64).collect();

    for (band, label) in [(stats.upper_band, "+50%"), (stats.lower_band, "-50%")] {
        chart
            .draw_series(LineSeries::new(
                xs.iter().map(|&x| (x, band)),
                INDIAN_RED.stroke_width(1),
            ))?
            .label(label)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], INDIAN_RED));
    }

    let steps = stats
        .samples
        .iter()
        .enumerate()
        .flat_map(|(i, &v)| [(i as f64, v), (i as f64 + 1.0, v)]);
    chart
        .draw_series(LineSeries::new(steps, BLUE.mix(0.8).stroke_width(1)))?
        .label("Ping")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(
            stats
                .above_band
                .iter()
                .map(|&i| TriangleMarker::new((i as f64, stats.samples[i]), 6, RED.filled())),
        )?
        .label("Mark Up")
        .legend(|(x, y)| TriangleMarker::new((x + 10, y), 6, RED.filled()));

    chart.draw_series(
        stats
            .below_band
            .iter()
            .map(|&i| Cross::new((i as f64, stats.samples[i]), 5, GREEN.stroke_width(2))),
    )?;

    chart
        .draw_series(LineSeries::new(
            xs.iter().map(|&x| (x, stats.mean)),
            BLUE.mix(0.6).stroke_width(1),
        ))?
        .label("Mean")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.mix(0.6)));

    chart
        .draw_secondary_series(LineSeries::new(
            xs.iter()
                .zip(&stats.log_series)
                .filter(|(_, v)| v.is_finite())
                .map(|(&x, &v)| (x, v)),
            DARK_ORCHID.mix(0.9),
        ))?
        .label("ln(Ping)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], DARK_ORCHID));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Stability panel: each sample as `sin(sample * 2π / 180)` over coloured zones.
///
/// The y axis reads top to bottom from -1 to 1, so values are plotted negated and
/// labelled back.
fn draw_stability(area: &Area<'_>, stats: &LatencyStats, labels: &[String]) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..PI, -1f64..1f64)?;

    chart.plotting_area().fill(&ALICE_BLUE.mix(0.3))?;

    chart
        .configure_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| tick_label(labels, *x, PI / 6.0))
        .y_label_formatter(&|y| format!("{:.2}", -y + 0.0))
        .y_desc("Network Stability")
        .draw()?;

    let zones = [(-1.0, -0.25, LIME), (-0.25, 0.25, DODGER_BLUE), (0.25, 1.0, CRIMSON)];
    chart.draw_series(
        zones
            .iter()
            .map(|&(low, high, color)| Rectangle::new([(0.0, low), (PI, high)], color.mix(0.2).filled())),
    )?;

    let last = stats.stability.len().saturating_sub(1).max(1) as f64;
    let curve: Vec<(f64, f64)> = stats
        .stability
        .iter()
        .enumerate()
        .map(|(i, t)| (-PI + 2.0 * PI * i as f64 / last, -t))
        .filter(|(x, _)| *x >= 0.0)
        .collect();

    chart
        .draw_series(AreaSeries::new(curve, -1.0, DARK_RED.mix(0.9)))?
        .label("Stability")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], DARK_RED.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Long horizon: the doubled series as a filled area, extrema and the chunk mean trend.
fn draw_long(area: &Area<'_>, stats: &LatencyStats, labels: &[String]) -> Result<()> {
    let count = stats.doubled.len() as f64;
    let headroom = (stats.max * 0.15).max(10.0);
    let step = count / labels.len().saturating_sub(1).max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..count, 0f64..(stats.max + headroom))?;

    chart.plotting_area().fill(&ALICE_BLUE.mix(0.3))?;

    chart
        .configure_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| tick_label(labels, *x, step))
        .x_desc("Time(HHMM) UTC")
        .y_desc("Latency(ms)")
        .draw()?;

    let doubled: Vec<(f64, f64)> = stats
        .doubled
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    chart
        .draw_series(
            AreaSeries::new(doubled.iter().copied(), 0.0, DARK_ORCHID.mix(0.3))
                .border_style(DARK_ORCHID.stroke_width(2)),
        )?
        .label("Ping")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], DARK_ORCHID));

    let steps = doubled.iter().enumerate().flat_map(|(i, &(x, v))| {
        let previous = if i == 0 { x } else { x - 1.0 };
        [(previous, v), (x, v)]
    });
    chart
        .draw_series(LineSeries::new(steps, DARK_ORCHID.mix(0.5)))?
        .label("Steps")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], DARK_ORCHID.mix(0.5)));

    chart
        .draw_series(LineSeries::new(
            stats
                .chunk_trace
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v)),
            FOREST_GREEN.stroke_width(2),
        ))?
        .label("Average")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FOREST_GREEN));

    chart.draw_series(
        stats
            .max_positions
            .iter()
            .map(|&i| TriangleMarker::new(((i * 2) as f64, stats.max), 10, INDIAN_RED.filled())),
    )?;
    chart.draw_series(
        stats
            .min_positions
            .iter()
            .map(|&i| Cross::new(((i * 2) as f64, stats.min), 8, LIME.stroke_width(3))),
    )?;

    if let (Some(&high), Some(&low)) = (stats.max_positions.first(), stats.min_positions.first()) {
        chart.draw_series([
            Text::new(
                format!("{:.0}ms", stats.max),
                ((high * 2) as f64, stats.max - 10.0),
                ("sans-serif", 16).into_font(),
            ),
            Text::new(
                format!("{:.0}ms", stats.min),
                ((low * 2) as f64, (stats.min - 10.0).max(0.0)),
                ("sans-serif", 16).into_font(),
            ),
        ])?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Label of the tick closest to `x`, with ticks `step` apart starting at 0.
fn tick_label(labels: &[String], x: f64, step: f64) -> String {
    if labels.is_empty() || step <= 0.0 || !x.is_finite() {
        return String::new();
    }

    let index = (x / step).round().clamp(0.0, (labels.len() - 1) as f64) as usize;
    labels[index].clone()
}

/// Padded range of the finite values, `(0, 1)` when there are none.
fn finite_bounds(values: &[f64]) -> (f64, f64) {
    let (low, high) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &v| {
            (low.min(v), high.max(v))
        });

    if !low.is_finite() {
        return (0.0, 1.0);
    }

    let pad = ((high - low) / 4.0).max(0.5);
    (low - pad, high + pad)
}

pub(crate) fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ChartError::Draw("pixel buffer does not match image size".to_string()))?;

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;

    Ok(out.into_inner())
}
