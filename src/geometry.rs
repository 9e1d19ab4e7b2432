use kurbo::{Line, Point, Vec2};

/// euclidean distance between two canvas points, in pixels.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Which of the two user-drawn lines a click or a color belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    Reference,
    Measure,
}

impl LineKind {
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::Reference => "Reference",
            LineKind::Measure => "Measure",
        }
    }
}

/// A line between two points in canvas pixel space.
///
/// The default segment sits at the origin and has zero length, which is how
/// an "empty" (not yet drawn) line is represented.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Default for Segment {
    fn default() -> Self {
        Segment::new(Point::ZERO, Point::ZERO)
    }
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0.0
    }

    pub fn with_start(self, start: Point) -> Self {
        Segment { start, ..self }
    }

    pub fn with_end(self, end: Point) -> Self {
        Segment { end, ..self }
    }

    pub fn as_line(&self) -> Line {
        Line::new(self.start, self.end)
    }
}

/// translate a pointer position from viewport space into canvas-local
/// space by subtracting the canvas' on-screen origin.
pub fn to_canvas_local(viewport_pos: Point, canvas_origin: Point) -> Point {
    let offset: Vec2 = viewport_pos - canvas_origin;
    offset.to_point()
}
