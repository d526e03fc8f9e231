use web_sys::Storage;

use inkboard_shared::History;

/// Fixed key the drawing history lives under in browser storage.
pub const STORAGE_KEY: &str = "inkboard.history";

/// Durable key-value persistence for the local client's own history.
/// Only ever sees local strokes; remote state never reaches it.
pub trait HistoryStore {
    fn save(&mut self, history: &History);
    fn load(&self) -> History;
    fn clear(&mut self);
}

pub fn encode_history(history: &History) -> String {
    serde_json::to_string(history).unwrap_or_else(|_| "[]".to_string())
}

/// Absent or unparseable state is never fatal: it decodes to an empty
/// history.
pub fn decode_history(payload: &str) -> History {
    serde_json::from_str(payload).unwrap_or_default()
}

/// `window.localStorage` bridge. Storage failures (quota, privacy mode)
/// degrade silently, matching the rest of the error model.
pub struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    pub fn new(storage: Option<Storage>) -> Self {
        Self { storage }
    }
}

impl HistoryStore for BrowserStore {
    fn save(&mut self, history: &History) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(STORAGE_KEY, &encode_history(history));
        }
    }

    fn load(&self) -> History {
        let Some(storage) = &self.storage else {
            return History::default();
        };
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(payload)) => decode_history(&payload),
            _ => History::default(),
        }
    }

    fn clear(&mut self) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(STORAGE_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_shared::{Point, Stroke};

    fn sample_history() -> History {
        let mut history = History::default();
        let mut stroke = Stroke::starting_at(Point {
            x: 0.0,
            y: 0.0,
            color: "#ff0000".to_string(),
            size: 3.0,
        });
        stroke.push(Point {
            x: 5.0,
            y: 5.0,
            color: "#ff0000".to_string(),
            size: 3.0,
        });
        history.push(stroke);
        history.push(Stroke::starting_at(Point {
            x: 1.0,
            y: 2.0,
            color: "#0000ff".to_string(),
            size: 8.0,
        }));
        history
    }

    #[test]
    fn round_trips_any_well_formed_history() {
        let history = sample_history();
        assert_eq!(decode_history(&encode_history(&history)), history);
    }

    #[test]
    fn empty_history_round_trips() {
        let history = History::default();
        assert_eq!(encode_history(&history), "[]");
        assert_eq!(decode_history("[]"), history);
    }

    #[test]
    fn malformed_payload_decodes_to_empty() {
        for payload in ["", "not json", "{\"oops\":1}", "[[{\"x\":1}]]"] {
            assert!(decode_history(payload).is_empty());
        }
    }
}
