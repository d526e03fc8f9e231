use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlFormElement,
    HtmlInputElement, PointerEvent,
};

use inkboard_shared::{ChatMessage, WireEvent};

use crate::dom::{append_chat_line, event_to_point, get_element, resize_canvas};
use crate::persistence::BrowserStore;
use crate::render::CanvasRenderer;
use crate::session::Session;
use crate::ws::{connect_ws, WsEvent};

type AppSession = Session<CanvasRenderer, BrowserStore>;

const LOCAL_CHAT_NAME: &str = "You";

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "drawingCanvas")?;
    let undo_button: Element = get_element(&document, "undoBtn")?;
    let reset_button: Element = get_element(&document, "resetBtn")?;
    let color_picker: HtmlInputElement = get_element(&document, "colorPicker")?;
    let brush_size: HtmlInputElement = get_element(&document, "brushSize")?;
    let chat_form: HtmlFormElement = get_element(&document, "chatForm")?;
    let message_input: HtmlInputElement = get_element(&document, "messageInput")?;
    let chat_messages: Element = get_element(&document, "chatMessages")?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    resize_canvas(&window, &canvas);
    let renderer = CanvasRenderer::new(canvas.clone(), ctx);
    let store = BrowserStore::new(window.local_storage().ok().flatten());
    let session: Rc<RefCell<AppSession>> = Rc::new(RefCell::new(Session::new(renderer, store)));
    session.borrow_mut().repaint();

    let sender = {
        let session = session.clone();
        let document = document.clone();
        let chat_messages = chat_messages.clone();
        connect_ws(&window, move |event| match event {
            WsEvent::Message(message) => {
                if let Some(ChatMessage { user, text }) =
                    session.borrow_mut().handle_inbound(message)
                {
                    append_chat_line(&document, &chat_messages, &user, &text);
                }
            }
            WsEvent::Open => {
                web_sys::console::log_1(&"connected".into());
            }
            WsEvent::Close | WsEvent::Error => {
                web_sys::console::log_1(&"disconnected".into());
            }
        })?
    };

    {
        let session = session.clone();
        let sender = sender.clone();
        let canvas_for_event = canvas.clone();
        let onpointerdown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let (x, y) = event_to_point(&canvas_for_event, &event);
            let outbound = session.borrow_mut().begin_stroke(x, y);
            sender.send(&outbound);
        });
        canvas
            .add_event_listener_with_callback("pointerdown", onpointerdown.as_ref().unchecked_ref())?;
        onpointerdown.forget();
    }

    {
        let session = session.clone();
        let sender = sender.clone();
        let canvas_for_event = canvas.clone();
        let onpointermove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let (x, y) = event_to_point(&canvas_for_event, &event);
            if let Some(outbound) = session.borrow_mut().extend_stroke(x, y) {
                sender.send(&outbound);
            }
        });
        canvas
            .add_event_listener_with_callback("pointermove", onpointermove.as_ref().unchecked_ref())?;
        onpointermove.forget();
    }

    {
        let session = session.clone();
        let sender = sender.clone();
        let onpointerup = Closure::<dyn FnMut(PointerEvent)>::new(move |_| {
            if let Some(outbound) = session.borrow_mut().end_stroke() {
                sender.send(&outbound);
            }
        });
        // Leaving the canvas ends the gesture too.
        canvas.add_event_listener_with_callback("pointerup", onpointerup.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerout", onpointerup.as_ref().unchecked_ref())?;
        onpointerup.forget();
    }

    {
        let session = session.clone();
        let sender = sender.clone();
        let onundo = Closure::<dyn FnMut(Event)>::new(move |_| {
            if let Some(outbound) = session.borrow_mut().undo() {
                sender.send(&outbound);
            }
        });
        undo_button.add_event_listener_with_callback("click", onundo.as_ref().unchecked_ref())?;
        onundo.forget();
    }

    {
        let session = session.clone();
        let sender = sender.clone();
        let window_for_confirm = window.clone();
        let onreset = Closure::<dyn FnMut(Event)>::new(move |_| {
            let confirmed = window_for_confirm
                .confirm_with_message(
                    "Are you sure you want to reset the drawing? This action cannot be undone.",
                )
                .unwrap_or(false);
            if confirmed {
                let outbound = session.borrow_mut().request_reset();
                sender.send(&outbound);
            }
        });
        reset_button.add_event_listener_with_callback("click", onreset.as_ref().unchecked_ref())?;
        onreset.forget();
    }

    {
        let session = session.clone();
        let input = color_picker.clone();
        let oncolor = Closure::<dyn FnMut(Event)>::new(move |_| {
            session.borrow_mut().set_color(input.value());
        });
        color_picker.add_event_listener_with_callback("change", oncolor.as_ref().unchecked_ref())?;
        oncolor.forget();
    }

    {
        let session = session.clone();
        let input = brush_size.clone();
        let onsize = Closure::<dyn FnMut(Event)>::new(move |_| {
            if let Ok(size) = input.value().parse::<f32>() {
                session.borrow_mut().set_size(size);
            }
        });
        brush_size.add_event_listener_with_callback("input", onsize.as_ref().unchecked_ref())?;
        onsize.forget();
    }

    {
        let sender = sender.clone();
        let document = document.clone();
        let chat_messages = chat_messages.clone();
        let input = message_input.clone();
        let onsubmit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let text = input.value();
            if text.is_empty() {
                return;
            }
            sender.send(&WireEvent::Chat(ChatMessage {
                user: LOCAL_CHAT_NAME.to_string(),
                text: text.clone(),
            }));
            append_chat_line(&document, &chat_messages, LOCAL_CHAT_NAME, &text);
            input.set_value("");
        });
        chat_form.add_event_listener_with_callback("submit", onsubmit.as_ref().unchecked_ref())?;
        onsubmit.forget();
    }

    {
        let session = session.clone();
        let window_for_resize = window.clone();
        let canvas = canvas.clone();
        let onresize = Closure::<dyn FnMut(Event)>::new(move |_| {
            resize_canvas(&window_for_resize, &canvas);
            session.borrow_mut().repaint();
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    Ok(())
}
