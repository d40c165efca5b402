use super::InputWiring;
use crate::input::InputEvent;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Key name from a `KeyboardEvent` to the char the input map understands.
#[inline]
pub fn key_char(key: &str) -> Option<char> {
    match key {
        "Enter" => Some('\n'),
        " " | "Spacebar" => Some(' '),
        k => {
            let mut chars = k.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}

pub fn wire_keydown(w: InputWiring) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
                    return;
                }
                if let Some(c) = key_char(&ev.key()) {
                    w.dispatch(InputEvent::Key(c));
                    if c == ' ' {
                        ev.prevent_default();
                    }
                }
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
