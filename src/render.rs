//! Composing the canvas: the base bitmap with both overlay segments on top.

use crate::config::MeasureOptions;
use crate::draw_state::MeasurementContext;
use crate::error::Result;
use crate::geometry::Segment;
use crate::image_loader::Bitmap;
use image::{ImageFormat, Rgba, RgbaImage};
use kurbo::Point;
use std::path::Path;

/// Redraw from scratch: copy the bitmap, then paint the reference segment
/// and then the measure segment. Empty (zero-length) segments are skipped.
pub fn compose(bitmap: &Bitmap, context: &MeasurementContext, opts: &MeasureOptions) -> RgbaImage {
    let mut canvas = bitmap.pixels().clone();
    for (segment, color) in [
        (context.reference, opts.reference_color),
        (context.measure, opts.measure_color),
    ] {
        if !segment.is_empty() {
            draw_segment(&mut canvas, &segment, Rgba(color), opts.line_thickness);
        }
    }
    canvas
}

/// paint a segment by stamping filled discs along it, one per pixel step.
pub fn draw_segment(canvas: &mut RgbaImage, segment: &Segment, color: Rgba<u8>, thickness: f32) {
    let radius = (thickness.max(1.0) as f64) / 2.0;
    let steps = segment.length().ceil().max(1.0) as usize;
    let line = segment.as_line();
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let p = line.p0.lerp(line.p1, t);
        stamp_disc(canvas, p, radius, color);
    }
}

fn stamp_disc(canvas: &mut RgbaImage, center: Point, radius: f64, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    let min_x = (center.x - radius).floor().max(0.0) as i64;
    let min_y = (center.y - radius).floor().max(0.0) as i64;
    let max_x = ((center.x + radius).ceil() as i64).min(w as i64 - 1);
    let max_y = ((center.y + radius).ceil() as i64).min(h as i64 - 1);
    // pixel (x, y) covers the square [x, x+1) x [y, y+1); test its center
    let r2 = radius * radius;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            if dx * dx + dy * dy <= r2 {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// write the composed canvas to `path` as PNG.
pub fn export_png(canvas: &RgbaImage, path: &Path) -> Result<()> {
    canvas.save_with_format(path, ImageFormat::Png)?;
    log::info!("exported {}x{} canvas to {}", canvas.width(), canvas.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn blank(w: u32, h: u32) -> Bitmap {
        Bitmap::from_rgba(RgbaImage::from_pixel(w, h, BG))
    }

    fn count(canvas: &RgbaImage, color: [u8; 4]) -> usize {
        canvas.pixels().filter(|p| p.0 == color).count()
    }

    #[test]
    fn empty_context_leaves_bitmap_untouched() {
        let bitmap = blank(20, 20);
        let ctx = MeasurementContext::for_dimensions(20, 20);
        let canvas = compose(&bitmap, &ctx, &MeasureOptions::default());
        assert_eq!(&canvas, bitmap.pixels());
    }

    #[test]
    fn paints_both_segments_in_their_colors() {
        let opts = MeasureOptions::default();
        let ctx = MeasurementContext {
            reference: Segment::new(Point::new(2.0, 5.0), Point::new(18.0, 5.0)),
            measure: Segment::new(Point::new(2.0, 15.0), Point::new(18.0, 15.0)),
            dimensions: (20, 20),
        };
        let canvas = compose(&blank(20, 20), &ctx, &opts);
        assert_eq!(canvas.get_pixel(10, 5).0, opts.reference_color);
        assert_eq!(canvas.get_pixel(10, 15).0, opts.measure_color);
        assert_eq!(canvas.get_pixel(10, 10), &BG);
        assert!(count(&canvas, opts.reference_color) > 0);
        assert!(count(&canvas, opts.measure_color) > 0);
    }

    #[test]
    fn measure_is_drawn_over_reference() {
        let opts = MeasureOptions::default();
        let seg = Segment::new(Point::new(0.0, 10.0), Point::new(20.0, 10.0));
        let ctx = MeasurementContext {
            reference: seg,
            measure: seg,
            dimensions: (20, 20),
        };
        let canvas = compose(&blank(20, 20), &ctx, &opts);
        assert_eq!(count(&canvas, opts.reference_color), 0);
        assert_eq!(canvas.get_pixel(10, 10).0, opts.measure_color);
    }

    #[test]
    fn segments_outside_the_bitmap_are_clipped() {
        let mut canvas = RgbaImage::from_pixel(10, 10, BG);
        let seg = Segment::new(Point::new(-50.0, -50.0), Point::new(60.0, 60.0));
        draw_segment(&mut canvas, &seg, Rgba([255, 0, 0, 255]), 2.0);
        assert_eq!(canvas.get_pixel(5, 5).0, [255, 0, 0, 255]);
    }

    #[test]
    fn export_writes_a_decodable_png() {
        let path = std::env::temp_dir().join("measurer_export_test.png");
        let canvas = RgbaImage::from_pixel(3, 4, Rgba([1, 2, 3, 255]));
        export_png(&canvas, &path).unwrap();
        let back = crate::image_loader::decode_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(back.unwrap().pixels(), &canvas);
    }
}
