use std::{io::Cursor, path::Path};

use image::{imageops, ImageFormat, Rgba, RgbaImage, RgbImage};
use log::debug;
use plotters::prelude::*;

use crate::{ChartError, Result};

const PIE_SIZE: (u32, u32) = (640, 480);

/// Where the pie lands on the legend image, relative to its top left corner.
const PIE_OFFSET: (i64, i64) = (-100, -80);

/// Background colour of the pie canvas, turned transparent before compositing.
const BACKGROUND_KEY: RGBColor = RGBColor(255, 0, 255);

const SLICE_COLORS: [RGBColor; 4] = [
    RGBColor(0x43, 0xB5, 0x81),
    RGBColor(0x74, 0x7F, 0x8D),
    RGBColor(0xF0, 0x47, 0x47),
    RGBColor(0xFA, 0xA6, 0x1A),
];

/// How many members are in each presence status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub online: u64,
    /// Offline and invisible members
    pub offline: u64,
    pub dnd: u64,
    pub idle: u64,
}

impl StatusBreakdown {
    pub fn total(&self) -> u64 {
        self.online + self.offline + self.dnd + self.idle
    }

    /// Slice sizes in legend order: online, offline, dnd, idle.
    pub fn sizes(&self) -> [f64; 4] {
        [self.online, self.offline, self.dnd, self.idle].map(|count| count as f64)
    }
}

/// Draw the status pie and paste it onto the legend image at `legend`.
pub fn render_status_pie(breakdown: &StatusBreakdown, legend: &Path) -> Result<Vec<u8>> {
    if breakdown.total() == 0 {
        return Err(ChartError::EmptyPie);
    }

    let (width, height) = PIE_SIZE;
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut pixels, PIE_SIZE).into_drawing_area();
        root.fill(&BACKGROUND_KEY)?;

        let center = (width as i32 / 2, height as i32 / 2);
        let radius = height as f64 * 0.32;
        let sizes = breakdown.sizes();
        let labels = ["", "", "", ""];

        let mut pie = Pie::new(&center, &radius, &sizes, &SLICE_COLORS, &labels);
        pie.start_angle(90.0);
        pie.percentages(("sans-serif", 20).into_font().color(&WHITE));

        root.draw(&pie)?;
        root.present()?;
    }

    let chart = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ChartError::Draw("pixel buffer does not match image size".to_string()))?;
    let base = image::open(legend)?.into_rgba8();

    let composed = composite_onto_legend(&chart, base);

    let mut out = Cursor::new(Vec::new());
    composed.write_to(&mut out, ImageFormat::Png)?;

    debug!("Rendered status pie for {} members", breakdown.total());

    Ok(out.into_inner())
}

/// Overlay the pie onto `base`, treating the background key colour as transparent.
pub fn composite_onto_legend(chart: &RgbImage, mut base: RgbaImage) -> RgbaImage {
    let RGBColor(key_r, key_g, key_b) = BACKGROUND_KEY;

    let overlay = RgbaImage::from_fn(chart.width(), chart.height(), |x, y| {
        let [r, g, b] = chart.get_pixel(x, y).0;

        if (r, g, b) == (key_r, key_g, key_b) {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([r, g, b, 255])
        }
    });

    imageops::overlay(&mut base, &overlay, PIE_OFFSET.0, PIE_OFFSET.1);
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_breakdown_is_rejected() {
        let err = render_status_pie(&StatusBreakdown::default(), Path::new("missing.png"));

        assert!(matches!(err, Err(ChartError::EmptyPie)));
    }

    #[test]
    fn sizes_follow_legend_order() {
        let breakdown = StatusBreakdown {
            online: 1,
            offline: 2,
            dnd: 3,
            idle: 4,
        };

        assert_eq!(breakdown.total(), 10);
        assert_eq!(breakdown.sizes(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn key_colour_becomes_transparent() {
        let RGBColor(r, g, b) = BACKGROUND_KEY;
        let mut chart = RgbImage::from_pixel(200, 200, Rgb([r, g, b]));
        chart.put_pixel(150, 130, Rgb([1, 2, 3]));

        let base = RgbaImage::from_pixel(100, 100, Rgba([9, 9, 9, 255]));
        let composed = composite_onto_legend(&chart, base);

        // (150, 130) on the chart lands on (50, 50) of the legend.
        assert_eq!(composed.get_pixel(50, 50), &Rgba([1, 2, 3, 255]));
        assert_eq!(composed.get_pixel(10, 10), &Rgba([9, 9, 9, 255]));
        assert_eq!(composed.dimensions(), (100, 100));
    }
}
