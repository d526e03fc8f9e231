use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, PointerEvent, Window};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Pointer position relative to the canvas box.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let x = event.client_x() as f64 - rect.left();
    let y = event.client_y() as f64 - rect.top();
    (x as f32, y as f32)
}

/// Sizes the raster to the canvas layout width and 60% of the window
/// height. Resizing wipes the raster, so the caller must repaint after.
pub fn resize_canvas(window: &Window, canvas: &HtmlCanvasElement) {
    let rect = canvas.get_bounding_client_rect();
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(600.0)
        * 0.6;
    canvas.set_width(rect.width() as u32);
    canvas.set_height(height as u32);
}

/// Appends one chat line and keeps the pane scrolled to the bottom.
pub fn append_chat_line(document: &Document, messages: &Element, user: &str, text: &str) {
    let Ok(line) = document.create_element("div") else {
        return;
    };
    line.set_class_name("message");
    line.set_text_content(Some(&format!("{user}: {text}")));
    let _ = messages.append_child(&line);
    messages.set_scroll_top(messages.scroll_height());
}
