use serde::{Deserialize, Serialize};

/// One sampled pointer location, carrying the brush attributes that were
/// active when it was sampled. Attributes are denormalized per point so a
/// stroke can change color or size mid-gesture on replay.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub color: String,
    pub size: f32,
}

/// One continuous pointer-down-to-pointer-up gesture. Append-only while
/// being captured, immutable once pushed into a [`History`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn starting_at(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Ordered list of finalized strokes. Insertion order is chronological
/// order is undo order: the only mutations are pushing a newly finalized
/// stroke, popping the most recent one, and clearing everything.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct History {
    pub strokes: Vec<Stroke>,
}

impl History {
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }
}

/// Wire-only unit of incremental drawing: a single line between two
/// consecutive points of a stroke. Never stored, only relayed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Segment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub color: String,
    pub size: f32,
}

/// Ephemeral chat line. Displayed and discarded, never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub user: String,
    pub text: String,
}

/// Everything that travels between a client and the relay, in both
/// directions. The hub forwards these verbatim to all other peers
/// (rewriting only the chat sender name), so there is a single event
/// vocabulary instead of separate client/server message sets.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum WireEvent {
    #[serde(rename = "startPath")]
    StartPath {
        x: f32,
        y: f32,
        color: String,
        size: f32,
    },
    #[serde(rename = "draw")]
    Draw(Segment),
    #[serde(rename = "endPath")]
    EndPath,
    #[serde(rename = "undo")]
    Undo,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "chat")]
    Chat(ChatMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> Point {
        Point {
            x,
            y,
            color: "#ff0000".to_string(),
            size: 3.0,
        }
    }

    #[test]
    fn start_path_uses_named_tag_and_flat_payload() {
        let event = WireEvent::StartPath {
            x: 1.0,
            y: 2.0,
            color: "#000000".to_string(),
            size: 5.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"startPath\""));
        assert!(json.contains("\"x\":1.0"));
        assert!(json.contains("\"color\":\"#000000\""));
    }

    #[test]
    fn draw_flattens_segment_fields_next_to_tag() {
        let event = WireEvent::Draw(Segment {
            x0: 0.0,
            y0: 0.0,
            x1: 5.0,
            y1: 5.0,
            color: "#ff0000".to_string(),
            size: 3.0,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"draw\""));
        assert!(json.contains("\"x1\":5.0"));
        let parsed: WireEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn payload_free_events_are_tag_only() {
        for (event, frame) in [
            (WireEvent::EndPath, "{\"type\":\"endPath\"}"),
            (WireEvent::Undo, "{\"type\":\"undo\"}"),
            (WireEvent::Reset, "{\"type\":\"reset\"}"),
        ] {
            assert_eq!(serde_json::to_string(&event).unwrap(), frame);
            assert_eq!(serde_json::from_str::<WireEvent>(frame).unwrap(), event);
        }
    }

    #[test]
    fn chat_round_trips() {
        let event = WireEvent::Chat(ChatMessage {
            user: "User".to_string(),
            text: "hello".to_string(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"chat\""));
        assert_eq!(serde_json::from_str::<WireEvent>(&json).unwrap(), event);
    }

    #[test]
    fn history_serializes_as_bare_stroke_arrays() {
        let mut history = History::default();
        let mut stroke = Stroke::starting_at(point(0.0, 0.0));
        stroke.push(point(5.0, 5.0));
        history.push(stroke);
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.starts_with("[["));
        assert_eq!(serde_json::from_str::<History>(&json).unwrap(), history);
    }

    #[test]
    fn history_pops_most_recent_first() {
        let mut history = History::default();
        history.push(Stroke::starting_at(point(0.0, 0.0)));
        history.push(Stroke::starting_at(point(9.0, 9.0)));
        let last = history.pop().unwrap();
        assert_eq!(last.points[0].x, 9.0);
        assert_eq!(history.len(), 1);
    }
}
