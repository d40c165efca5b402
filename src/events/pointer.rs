use super::InputWiring;
use crate::input::InputEvent;
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let w = rect.width().max(1.0) as f32;
    let h = rect.height().max(1.0) as f32;
    Vec2::new(
        (x_css / w) * canvas.width() as f32,
        (y_css / h) * canvas.height() as f32,
    )
}

fn touch_spread(ev: &web::TouchEvent) -> Option<f32> {
    let touches = ev.touches();
    if touches.length() != 2 {
        return None;
    }
    let a = touches.get(0)?;
    let b = touches.get(1)?;
    let dx = (a.client_x() - b.client_x()) as f32;
    let dy = (a.client_y() - b.client_y()) as f32;
    Some((dx * dx + dy * dy).sqrt())
}

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    name: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
    {
        log::error!("[input] cannot listen for {}: {:?}", name, e);
    }
    closure.forget();
}

pub fn wire_pointer_handlers(w: InputWiring) {
    let Some(window) = web::window() else {
        return;
    };
    let canvas_target: web::EventTarget = w.canvas.clone().into();
    let window_target: web::EventTarget = window.into();

    {
        let w = w.clone();
        listen(&canvas_target, "pointerdown", move |ev: web::PointerEvent| {
            let p = pointer_canvas_px(&ev, &w.canvas);
            _ = w.canvas.set_pointer_capture(ev.pointer_id());
            w.dispatch(InputEvent::PointerDown(p));
            ev.prevent_default();
        });
    }
    {
        let w = w.clone();
        listen(&window_target, "pointermove", move |ev: web::PointerEvent| {
            let p = pointer_canvas_px(&ev, &w.canvas);
            w.dispatch(InputEvent::PointerMove(p));
        });
    }
    {
        let w = w.clone();
        listen(&window_target, "pointerup", move |ev: web::PointerEvent| {
            let p = pointer_canvas_px(&ev, &w.canvas);
            w.dispatch(InputEvent::PointerUp(p));
        });
    }
    {
        let w = w.clone();
        listen(&canvas_target, "wheel", move |ev: web::WheelEvent| {
            w.dispatch(InputEvent::Wheel(ev.delta_y() as f32));
            ev.prevent_default();
        });
    }
    {
        let w = w.clone();
        let last_spread: Rc<Cell<Option<f32>>> = Rc::new(Cell::new(None));
        let spread_end = last_spread.clone();
        listen(&canvas_target, "touchmove", move |ev: web::TouchEvent| {
            match touch_spread(&ev) {
                Some(spread) => {
                    if let Some(prev) = last_spread.replace(Some(spread)) {
                        w.dispatch(InputEvent::Pinch(spread - prev));
                    }
                    ev.prevent_default();
                }
                None => last_spread.set(None),
            }
        });
        listen(&canvas_target, "touchend", move |_ev: web::TouchEvent| {
            spread_end.set(None);
        });
    }
    {
        let w = w.clone();
        listen(&canvas_target, "click", move |_ev: web::MouseEvent| {
            w.dispatch(InputEvent::Click);
        });
    }
    listen(&canvas_target, "dblclick", move |ev: web::MouseEvent| {
        w.dispatch(InputEvent::DoubleClick);
        ev.prevent_default();
    });
}
