use inkboard_shared::{ChatMessage, History, Point, Segment, Stroke, WireEvent};

use crate::persistence::HistoryStore;
use crate::render::Renderer;

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_SIZE: f32 = 5.0;

/// The client-side state model and protocol logic: translates local
/// pointer gestures into paints plus outbound events, and inbound events
/// into paints plus history mutations.
///
/// Outbound operations return the event the caller should transmit;
/// `handle_inbound` never returns one. Remote events therefore cannot be
/// re-emitted, which is what keeps a remote `reset` from ping-ponging
/// between clients forever.
pub struct Session<R: Renderer, S: HistoryStore> {
    renderer: R,
    store: S,
    history: History,
    current: Stroke,
    pen_down: bool,
    last_x: f32,
    last_y: f32,
    color: String,
    size: f32,
}

impl<R: Renderer, S: HistoryStore> Session<R, S> {
    /// Builds a session from whatever the store has persisted. Absent or
    /// unreadable state starts the board empty.
    pub fn new(renderer: R, store: S) -> Self {
        let history = store.load();
        Self {
            renderer,
            store,
            history,
            current: Stroke::default(),
            pen_down: false,
            last_x: 0.0,
            last_y: 0.0,
            color: DEFAULT_COLOR.to_string(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_color(&mut self, color: String) {
        self.color = color;
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    /// Repaints the whole surface from history. Needed after anything
    /// that invalidates the raster, e.g. a canvas resize.
    pub fn repaint(&mut self) {
        self.renderer.repaint_all(&self.history);
    }

    /// Pen down: starts the in-progress stroke with one point. Calling
    /// this again without an intervening `end_stroke` replaces the
    /// pending buffer; the last gesture wins.
    pub fn begin_stroke(&mut self, x: f32, y: f32) -> WireEvent {
        self.pen_down = true;
        self.last_x = x;
        self.last_y = y;
        self.current = Stroke::starting_at(self.sample(x, y));
        self.renderer.paint_dot(x, y, &self.color, self.size);
        WireEvent::StartPath {
            x,
            y,
            color: self.color.clone(),
            size: self.size,
        }
    }

    /// Appends one point to the in-progress stroke and paints the segment
    /// from the previous point. Uses the attributes that are current at
    /// call time, not the ones the stroke started with. Silent no-op when
    /// the pen is up, which swallows spurious pointer-move events.
    pub fn extend_stroke(&mut self, x: f32, y: f32) -> Option<WireEvent> {
        if !self.pen_down {
            return None;
        }
        let segment = Segment {
            x0: self.last_x,
            y0: self.last_y,
            x1: x,
            y1: y,
            color: self.color.clone(),
            size: self.size,
        };
        self.renderer.paint_segment(&segment);
        self.current.push(self.sample(x, y));
        self.last_x = x;
        self.last_y = y;
        Some(WireEvent::Draw(segment))
    }

    /// Pen up: finalizes the in-progress stroke into history (even a
    /// single-point one) and persists. No-op when the pen is up.
    pub fn end_stroke(&mut self) -> Option<WireEvent> {
        if !self.pen_down {
            return None;
        }
        self.pen_down = false;
        self.history.push(std::mem::take(&mut self.current));
        self.store.save(&self.history);
        Some(WireEvent::EndPath)
    }

    /// Removes the most recently finalized stroke. No-op on an empty
    /// history.
    pub fn undo(&mut self) -> Option<WireEvent> {
        self.history.pop()?;
        self.store.save(&self.history);
        self.renderer.repaint_all(&self.history);
        Some(WireEvent::Undo)
    }

    /// Local reset: clears everything and returns the event to broadcast.
    pub fn request_reset(&mut self) -> WireEvent {
        self.apply_reset();
        WireEvent::Reset
    }

    /// Clears history, persisted state, and the surface without emitting
    /// anything. This is the half of reset that remote events reach.
    pub fn apply_reset(&mut self) {
        self.pen_down = false;
        self.current = Stroke::default();
        self.history.clear();
        self.store.clear();
        self.renderer.clear();
    }

    /// Single dispatch point for everything arriving over the wire,
    /// local echo excluded. Remote strokes are painted but never enter
    /// this client's own history; persistence stays local-only. Chat is
    /// the one event whose effect lives outside the drawing state, so it
    /// is handed back for display.
    pub fn handle_inbound(&mut self, event: WireEvent) -> Option<ChatMessage> {
        match event {
            WireEvent::StartPath { x, y, color, size } => {
                self.renderer.paint_dot(x, y, &color, size);
            }
            WireEvent::Draw(segment) => {
                self.renderer.paint_segment(&segment);
            }
            WireEvent::EndPath => {
                // Stroke boundary only; segments are self-describing.
            }
            WireEvent::Undo => {
                if self.history.pop().is_some() {
                    self.renderer.repaint_all(&self.history);
                }
            }
            WireEvent::Reset => {
                self.apply_reset();
            }
            WireEvent::Chat(message) => return Some(message),
        }
        None
    }

    fn sample(&self, x: f32, y: f32) -> Point {
        Point {
            x,
            y,
            color: self.color.clone(),
            size: self.size,
        }
    }
}
