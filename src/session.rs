//! One interactive selection, from first event to outcome.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geometry::{CropBox, SelectionRect};
use crate::resolve::resolve;
use crate::scale::{ScaleResult, Viewport, compute_scale};
use crate::selection::{InteractionState, MoveModifier, SelectionEvent, SelectionMachine, Step};

/// Caller-owned image description. The session only reads the dimensions;
/// `handle` is for the host to render the preview and perform the crop.
#[derive(Debug, Clone)]
pub struct SourceImage<H> {
    pub width: u32,
    pub height: u32,
    pub handle: H,
}

impl<H> SourceImage<H> {
    pub fn new(width: u32, height: u32, handle: H) -> Self {
        Self {
            width,
            height,
            handle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Confirmed(CropBox),
    Cancelled,
}

/// Result of feeding one event to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    RectChanged(SelectionRect),
    Finished(SessionOutcome),
}

#[derive(Debug, Clone)]
pub struct SelectionSession {
    source_width: u32,
    source_height: u32,
    scale: ScaleResult,
    machine: SelectionMachine,
    outcome: Option<SessionOutcome>,
}

impl SelectionSession {
    pub fn new<H>(source: &SourceImage<H>, viewport: Viewport) -> Result<Self> {
        Self::with_move_modifier(source, viewport, MoveModifier::default())
    }

    /// Validates the inputs and computes the display scale.
    pub fn with_move_modifier<H>(
        source: &SourceImage<H>,
        viewport: Viewport,
        move_modifier: MoveModifier,
    ) -> Result<Self> {
        if source.width == 0 || source.height == 0 {
            return Err(Error::InvalidImage {
                width: source.width,
                height: source.height,
            });
        }
        if viewport.max_width == 0 || viewport.max_height == 0 {
            return Err(Error::InvalidViewport {
                max_width: viewport.max_width,
                max_height: viewport.max_height,
            });
        }

        let scale = compute_scale(
            source.width,
            source.height,
            viewport.max_width,
            viewport.max_height,
        );
        debug!(
            source = %format!("{}x{}", source.width, source.height),
            display = %format!("{}x{}", scale.display_width, scale.display_height),
            scale = scale.scale,
            "selection session started"
        );

        Ok(Self {
            source_width: source.width,
            source_height: source.height,
            scale,
            machine: SelectionMachine::new(
                scale.display_width,
                scale.display_height,
                move_modifier,
            ),
            outcome: None,
        })
    }

    pub fn scale(&self) -> &ScaleResult {
        &self.scale
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    /// Current rectangle in display coordinates.
    pub fn rect(&self) -> Option<SelectionRect> {
        self.machine.rect()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn handle(&mut self, event: SelectionEvent) -> Transition {
        if let Some(outcome) = self.outcome {
            return Transition::Finished(outcome);
        }

        match self.machine.handle(event) {
            Step::Ignored => Transition::Unchanged,
            Step::RectChanged(rect) => Transition::RectChanged(rect),
            Step::Confirm(rect) => {
                let resolved =
                    resolve(rect, &self.scale, self.source_width, self.source_height);
                let outcome = match resolved {
                    Some(crop) => SessionOutcome::Confirmed(crop),
                    None => {
                        debug!(?rect, "selection collapsed after scaling");
                        SessionOutcome::Cancelled
                    }
                };
                Transition::Finished(self.finish(outcome))
            }
            Step::Cancel => Transition::Finished(self.finish(SessionOutcome::Cancelled)),
        }
    }

    /// Ends the session without a terminal event, e.g. when the host window is
    /// destroyed. Returns the already recorded outcome if there is one.
    pub fn abandon(&mut self) -> SessionOutcome {
        match self.outcome {
            Some(outcome) => outcome,
            None => {
                debug!("selection session abandoned");
                self.finish(SessionOutcome::Cancelled)
            }
        }
    }

    /// Drives the session from `events` until it finishes. `on_rect` sees every
    /// rectangle change. An exhausted stream counts as a cancel.
    pub fn run<I, F>(mut self, events: I, mut on_rect: F) -> SessionOutcome
    where
        I: IntoIterator<Item = SelectionEvent>,
        F: FnMut(SelectionRect),
    {
        for event in events {
            match self.handle(event) {
                Transition::Unchanged => {}
                Transition::RectChanged(rect) => on_rect(rect),
                Transition::Finished(outcome) => return outcome,
            }
        }
        self.abandon()
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        match outcome {
            SessionOutcome::Confirmed(crop) => info!(?crop, "selection confirmed"),
            SessionOutcome::Cancelled => info!("selection cancelled"),
        }
        self.outcome = Some(outcome);
        outcome
    }
}

/// Runs one selection session over a caller-supplied event stream.
///
/// Blocks for as long as `events` does; a channel receiver's iterator works
/// well here. Invalid image or viewport dimensions are rejected before any
/// event is read.
pub fn run_selection_session<H, I>(
    source: &SourceImage<H>,
    viewport: Viewport,
    events: I,
) -> Result<SessionOutcome>
where
    I: IntoIterator<Item = SelectionEvent>,
{
    let session = SelectionSession::new(source, viewport)?;
    Ok(session.run(events, |_| {}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::selection::{Modifiers, PointerButton};

    fn image(w: u32, h: u32) -> SourceImage<()> {
        SourceImage::new(w, h, ())
    }

    fn drag(from: (i32, i32), to: (i32, i32)) -> Vec<SelectionEvent> {
        vec![
            SelectionEvent::PointerDown {
                pos: Point::new(from.0, from.1),
                button: PointerButton::Primary,
                modifiers: Modifiers::NONE,
            },
            SelectionEvent::PointerMove {
                pos: Point::new(to.0, to.1),
            },
            SelectionEvent::PointerUp {
                pos: Point::new(to.0, to.1),
                button: PointerButton::Primary,
            },
        ]
    }

    #[test]
    fn rejects_empty_image() {
        let err = SelectionSession::new(&image(0, 10), Viewport::new(100, 100)).unwrap_err();
        assert!(matches!(err, Error::InvalidImage { width: 0, height: 10 }));
    }

    #[test]
    fn rejects_empty_viewport() {
        let err = run_selection_session(&image(10, 10), Viewport::new(100, 0), Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidViewport { .. }));
    }

    #[test]
    fn exhausted_stream_cancels() {
        let outcome =
            run_selection_session(&image(50, 50), Viewport::new(100, 100), drag((1, 1), (20, 20)))
                .unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled);
    }

    #[test]
    fn outcome_is_produced_once() {
        let mut session = SelectionSession::new(&image(50, 50), Viewport::new(100, 100)).unwrap();
        for event in drag((1, 1), (20, 20)) {
            session.handle(event);
        }
        let first = session.handle(SelectionEvent::Confirm);
        let crop = CropBox {
            x1: 1,
            y1: 1,
            x2: 20,
            y2: 20,
        };
        assert_eq!(first, Transition::Finished(SessionOutcome::Confirmed(crop)));
        assert_eq!(
            session.handle(SelectionEvent::Cancel),
            Transition::Finished(SessionOutcome::Confirmed(crop))
        );
        assert_eq!(session.abandon(), SessionOutcome::Confirmed(crop));
    }

    #[test]
    fn abandon_before_outcome_cancels() {
        let mut session = SelectionSession::new(&image(50, 50), Viewport::new(100, 100)).unwrap();
        for event in drag((1, 1), (20, 20)) {
            session.handle(event);
        }
        assert_eq!(session.abandon(), SessionOutcome::Cancelled);
        assert_eq!(session.outcome(), Some(SessionOutcome::Cancelled));
    }

    #[test]
    fn run_reports_rect_changes() {
        let session = SelectionSession::new(&image(50, 50), Viewport::new(100, 100)).unwrap();
        let mut seen = Vec::new();
        let mut events = drag((5, 5), (30, 25));
        events.push(SelectionEvent::Confirm);
        let outcome = session.run(events, |rect| seen.push(rect));
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen.last(),
            Some(&SelectionRect {
                x1: 5,
                y1: 5,
                x2: 30,
                y2: 25
            })
        );
        assert!(matches!(outcome, SessionOutcome::Confirmed(_)));
    }
}
