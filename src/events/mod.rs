use crate::app::GlobeSlot;
use crate::dom;
use crate::input::{InputEvent, PointerTracker};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

mod keyboard;
mod pointer;

pub use keyboard::wire_keydown;
pub use pointer::wire_pointer_handlers;

/// Everything an input handler needs to reach the current globe.
#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub globe: GlobeSlot,
    pub tracker: Rc<RefCell<PointerTracker>>,
}

impl InputWiring {
    /// Map one event and apply the resulting command, if any.
    pub fn dispatch(&self, ev: InputEvent) {
        let Some(cmd) = self.tracker.borrow_mut().map(ev) else {
            return;
        };
        let consumed = match self.globe.borrow().as_ref() {
            Some(g) => g.driver.borrow_mut().apply(cmd),
            None => false,
        };
        if !consumed && cmd == crate::input::Command::ToggleFullscreen {
            dom::toggle_fullscreen(&self.canvas);
        }
    }
}
