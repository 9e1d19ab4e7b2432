use approx::assert_relative_eq;
use image::{Rgba, RgbaImage};
use kurbo::Point;
use measurer::config::MeasureOptions;
use measurer::image_loader::Bitmap;
use measurer::{DrawState, Effect, LineKind, Session};

const BG: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn white(w: u32, h: u32) -> Bitmap {
    Bitmap::from_rgba(RgbaImage::from_pixel(w, h, BG))
}

// canvas placed somewhere inside the window, like egui would
const ORIGIN: Point = Point::new(40.0, 70.0);

fn at(x: f64, y: f64) -> Point {
    Point::new(ORIGIN.x + x, ORIGIN.y + y)
}

#[test]
fn four_clicks_draw_both_lines_with_one_redraw_per_pair() {
    let mut session = Session::new();
    session.load_bitmap(white(200, 100));

    let mut redraws = 0;
    let mut click = |session: &mut Session, p: Point| {
        if session.click(p, ORIGIN) == Some(Effect::Redraw) {
            redraws += 1;
        }
    };

    click(&mut session, at(0.0, 10.0));
    assert_eq!(session.state(), DrawState::ReferenceEnd);
    click(&mut session, at(100.0, 10.0));
    assert_eq!(session.state(), DrawState::ReferenceStart);

    session.select_mode(LineKind::Measure);
    click(&mut session, at(0.0, 50.0));
    assert_eq!(session.state(), DrawState::MeasureEnd);
    click(&mut session, at(40.0, 50.0));
    assert_eq!(session.state(), DrawState::MeasureStart);

    assert_eq!(redraws, 2);
    assert_relative_eq!(session.context().reference.length(), 100.0);
    assert_relative_eq!(session.context().measure.length(), 40.0);
}

#[test]
fn calculate_scales_against_reference() {
    let mut session = Session::new();
    session.load_bitmap(white(200, 100));
    session.click(at(0.0, 0.0), ORIGIN);
    session.click(at(100.0, 0.0), ORIGIN);
    session.select_mode(LineKind::Measure);
    session.click(at(0.0, 0.0), ORIGIN);
    session.click(at(40.0, 0.0), ORIGIN);

    session.reference_input = "50".into();
    assert_relative_eq!(session.calculate(), 20.0);
    assert_eq!(session.result(), Some(20.0));

    session.reference_input = "abc".into();
    assert_eq!(session.calculate(), 0.0);
}

#[test]
fn calculate_before_drawing_is_zero() {
    let mut session = Session::new();
    session.load_bitmap(white(10, 10));
    session.reference_input = "50".into();
    assert_eq!(session.calculate(), 0.0);
}

#[test]
fn second_image_resets_segments() {
    let mut session = Session::new();
    session.load_bitmap(white(200, 100));
    session.click(at(5.0, 5.0), ORIGIN);
    session.click(at(50.0, 5.0), ORIGIN);
    session.select_mode(LineKind::Measure);
    session.click(at(5.0, 20.0), ORIGIN);

    session.load_bitmap(white(64, 48));
    assert!(session.context().reference.is_empty());
    assert!(session.context().measure.is_empty());
    assert_eq!(session.state(), DrawState::ReferenceStart);
    assert_eq!(session.bitmap().map(|b| b.dimensions()), Some((64, 48)));
}

#[test]
fn rendered_canvas_shows_completed_lines() {
    let opts = MeasureOptions::default();
    let mut session = Session::new();
    session.load_bitmap(white(120, 60));

    session.click(at(10.0, 10.0), ORIGIN);
    session.click(at(110.0, 10.0), ORIGIN);
    session.select_mode(LineKind::Measure);
    session.click(at(10.0, 40.0), ORIGIN);
    session.click(at(110.0, 40.0), ORIGIN);

    let canvas = session.render(&opts).unwrap();
    assert_eq!(canvas.dimensions(), (120, 60));
    assert_eq!(canvas.get_pixel(60, 10).0, opts.reference_color);
    assert_eq!(canvas.get_pixel(60, 40).0, opts.measure_color);
    assert_eq!(canvas.get_pixel(60, 25), &BG);
}
