//! The owned state container that the UI dispatches into.
//!
//! A `Session` holds everything that belongs to one loaded image. Clicks go
//! through [`Session::click`], which reads the current [`DrawState`] and
//! routes the point through the pure transition; state and context are then
//! replaced as a whole.

use crate::calculator;
use crate::config::MeasureOptions;
use crate::draw_state::{self, DrawState, Effect, MeasurementContext};
use crate::error::{MeasureError, Result};
use crate::geometry::{self, LineKind};
use crate::image_loader::Bitmap;
use crate::render;
use image::RgbaImage;
use kurbo::Point;

#[derive(Default)]
pub struct Session {
    bitmap: Option<Bitmap>,
    state: DrawState,
    context: MeasurementContext,
    /// raw text of the known reference length, as typed by the user
    pub reference_input: String,
    result: Option<f64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// replace the bitmap and discard every measurement made on the old one.
    ///
    /// Always asks for a redraw so the canvas shows the new bitmap.
    pub fn load_bitmap(&mut self, bitmap: Bitmap) -> Effect {
        let (w, h) = bitmap.dimensions();
        log::info!("new bitmap {}x{}, measurements reset", w, h);
        self.context = MeasurementContext::for_dimensions(w, h);
        self.state = DrawState::default();
        self.result = None;
        self.bitmap = Some(bitmap);
        Effect::Redraw
    }

    /// take the outcome of a background load. A successful load that fits in
    /// a `max_side` texture replaces the session; on any error the current
    /// bitmap, segments and state are left as they are.
    pub fn finish_load(&mut self, result: Result<Bitmap>, max_side: usize) -> Result<Effect> {
        let bitmap = result?;
        bitmap.ensure_fits(max_side)?;
        Ok(self.load_bitmap(bitmap))
    }

    /// handle a click at `viewport_pos` on a canvas whose top-left corner is
    /// at `canvas_origin`. Clicks before any image is loaded are ignored.
    pub fn click(&mut self, viewport_pos: Point, canvas_origin: Point) -> Option<Effect> {
        self.bitmap.as_ref()?;
        let local = geometry::to_canvas_local(viewport_pos, canvas_origin);
        let transition = draw_state::on_click(self.state, &self.context, local);
        log::debug!(
            "{:?} -> {:?} at ({:.1}, {:.1})",
            self.state,
            transition.state,
            local.x,
            local.y
        );
        self.state = transition.state;
        self.context = transition.context;
        if transition.effect == Some(Effect::Redraw) {
            // a finished line makes the shown length stale
            self.result = None;
        }
        transition.effect
    }

    /// mode-switch control: start drawing a line of `kind`, whatever the
    /// current state.
    pub fn select_mode(&mut self, kind: LineKind) {
        log::debug!("mode switched to {}", kind.label());
        self.state = DrawState::start_of(kind);
    }

    /// compute the real-world length of the measure segment and remember it
    /// for display.
    pub fn calculate(&mut self) -> f64 {
        let real = calculator::parse_reference_length(&self.reference_input);
        let value = calculator::measure(&self.context.reference, real, &self.context.measure);
        self.result = Some(value);
        value
    }

    /// the composed canvas for the current bitmap and segments
    pub fn render(&self, opts: &MeasureOptions) -> Result<RgbaImage> {
        let bitmap = self.bitmap.as_ref().ok_or(MeasureError::NoImage)?;
        Ok(render::compose(bitmap, &self.context, opts))
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn context(&self) -> &MeasurementContext {
        &self.context
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }
}
