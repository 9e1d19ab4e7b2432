//! The four-phase click cycle used to draw the reference and measure lines.
//!
//! Every click is handled by [`on_click`], a pure function of the current
//! state, the current context and the clicked point. It never mutates its
//! inputs; callers replace their state and context with the returned ones.

use crate::geometry::{LineKind, Segment};
use kurbo::Point;

/// How the next click on the canvas is interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DrawState {
    #[default]
    ReferenceStart,
    ReferenceEnd,
    MeasureStart,
    MeasureEnd,
}

impl DrawState {
    /// the "Start" state of the given line kind (what the mode buttons set).
    pub fn start_of(kind: LineKind) -> Self {
        match kind {
            LineKind::Reference => DrawState::ReferenceStart,
            LineKind::Measure => DrawState::MeasureStart,
        }
    }

    pub fn kind(&self) -> LineKind {
        match self {
            DrawState::ReferenceStart | DrawState::ReferenceEnd => LineKind::Reference,
            DrawState::MeasureStart | DrawState::MeasureEnd => LineKind::Measure,
        }
    }

    /// status bar prompt for the current state
    pub fn prompt(&self) -> &'static str {
        match self {
            DrawState::ReferenceStart => "Reference: click the first point",
            DrawState::ReferenceEnd => "Reference: click the second point",
            DrawState::MeasureStart => "Measure: click the first point",
            DrawState::MeasureEnd => "Measure: click the second point",
        }
    }
}

/// Current segments plus the size of the bitmap they were drawn on.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MeasurementContext {
    pub reference: Segment,
    pub measure: Segment,
    /// pixel width/height of the loaded bitmap
    pub dimensions: (u32, u32),
}

impl MeasurementContext {
    /// fresh context for a newly loaded bitmap: both segments empty.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        MeasurementContext {
            dimensions: (width, height),
            ..Default::default()
        }
    }

    pub fn segment(&self, kind: LineKind) -> Segment {
        match kind {
            LineKind::Reference => self.reference,
            LineKind::Measure => self.measure,
        }
    }
}

/// Side effect requested by a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// redraw the base bitmap and both overlay segments
    Redraw,
}

/// Result of feeding one click into the state machine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: DrawState,
    pub context: MeasurementContext,
    pub effect: Option<Effect>,
}

/// write `point` (canvas-local) into the field selected by `state` and
/// advance within the current pair. Completing an "End" state asks for a
/// redraw and cycles back to the matching "Start".
pub fn on_click(state: DrawState, context: &MeasurementContext, point: Point) -> Transition {
    let (state, context, effect) = match state {
        DrawState::ReferenceStart => (
            DrawState::ReferenceEnd,
            MeasurementContext {
                reference: context.reference.with_start(point),
                ..*context
            },
            None,
        ),
        DrawState::ReferenceEnd => (
            DrawState::ReferenceStart,
            MeasurementContext {
                reference: context.reference.with_end(point),
                ..*context
            },
            Some(Effect::Redraw),
        ),
        DrawState::MeasureStart => (
            DrawState::MeasureEnd,
            MeasurementContext {
                measure: context.measure.with_start(point),
                ..*context
            },
            None,
        ),
        DrawState::MeasureEnd => (
            DrawState::MeasureStart,
            MeasurementContext {
                measure: context.measure.with_end(point),
                ..*context
            },
            Some(Effect::Redraw),
        ),
    };

    Transition {
        state,
        context,
        effect,
    }
}
