use crate::config::MeasureOptions;
use crate::draw_state::{DrawState, Effect};
use crate::error::{MeasureError, Result};
use crate::geometry::LineKind;
use crate::session::Session;
use eframe::egui::{
    self, Color32, ColorImage, Context, Painter, Pos2, Rect, Response, Sense, Stroke,
    TextureHandle, TextureOptions, Vec2,
};
use image::RgbaImage;
use kurbo::Point;

/// The on-screen canvas: a texture holding the last composed image, sized
/// 1:1 to the loaded bitmap.
#[derive(Default)]
pub struct Canvas {
    texture: Option<TextureHandle>,
    // kept around so it can be exported without composing again
    composed: Option<RgbaImage>,
}

fn to_point(p: Pos2) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

fn to_pos(p: Point) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

fn color(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// upload a freshly composed image, replacing whatever was shown.
    ///
    /// Images larger than the backend's texture limit are refused and the
    /// previous texture is kept.
    pub fn refresh(&mut self, ctx: &Context, image: RgbaImage) -> Result<()> {
        let max_side = ctx.input(|i| i.max_texture_side);
        let (width, height) = image.dimensions();
        if width as usize > max_side || height as usize > max_side {
            return Err(MeasureError::TooLarge {
                width,
                height,
                max_side,
            });
        }
        let size = [width as usize, height as usize];
        let pixels = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(pixels, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("canvas", pixels, TextureOptions::NEAREST));
            }
        }
        self.composed = Some(image);
        Ok(())
    }

    pub fn composed(&self) -> Option<&RgbaImage> {
        self.composed.as_ref()
    }

    /// draw the canvas and feed clicks into the session. Returns the effect
    /// of the click, if there was one.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        session: &mut Session,
        opts: &MeasureOptions,
    ) -> Option<Effect> {
        let Some(texture) = &self.texture else {
            ui.centered_and_justified(|ui| {
                ui.label("Choose a PNG image and press Load, or drop a file here.");
            });
            return None;
        };

        let size = Vec2::new(texture.size()[0] as f32, texture.size()[1] as f32);
        let texture_id = texture.id();

        egui::ScrollArea::both()
            .show(ui, |ui| {
                let (response, painter) = ui.allocate_painter(size, Sense::click());
                painter.image(
                    texture_id,
                    response.rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );

                let effect = Self::handle_input(&response, session);
                Self::paint_pending(&painter, &response, session, opts);
                effect
            })
            .inner
    }

    fn handle_input(response: &Response, session: &mut Session) -> Option<Effect> {
        if !response.clicked() {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        session.click(to_point(pos), to_point(response.rect.min))
    }

    /// hint for a half-drawn line: a dot at its first point and a thin line
    /// to the pointer. Not part of the composed image.
    fn paint_pending(
        painter: &Painter,
        response: &Response,
        session: &Session,
        opts: &MeasureOptions,
    ) {
        let state = session.state();
        if !matches!(state, DrawState::ReferenceEnd | DrawState::MeasureEnd) {
            return;
        }
        let kind = state.kind();
        let c = color(match kind {
            LineKind::Reference => opts.reference_color,
            LineKind::Measure => opts.measure_color,
        });
        let origin = response.rect.min.to_vec2();
        let start = to_pos(session.context().segment(kind).start) + origin;

        painter.circle_filled(start, opts.line_thickness.max(2.0), c);
        if let Some(hover) = response.hover_pos() {
            painter.line_segment([start, hover], Stroke::new(1.0, c.gamma_multiply(0.6)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_image_is_refused() {
        let ctx = Context::default();
        let max_side = ctx.input(|i| i.max_texture_side);
        let mut canvas = Canvas::new();
        let err = canvas
            .refresh(&ctx, RgbaImage::new(max_side as u32 + 1, 1))
            .unwrap_err();
        assert!(matches!(err, MeasureError::TooLarge { height: 1, .. }));
        assert!(canvas.composed().is_none());
    }

    #[test]
    fn refresh_keeps_composed_image() {
        let ctx = Context::default();
        let mut canvas = Canvas::new();
        canvas.refresh(&ctx, RgbaImage::new(8, 4)).unwrap();
        assert_eq!(canvas.composed().map(|i| i.dimensions()), Some((8, 4)));
        canvas.refresh(&ctx, RgbaImage::new(3, 3)).unwrap();
        assert_eq!(canvas.composed().map(|i| i.dimensions()), Some((3, 3)));
    }
}
