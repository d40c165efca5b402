use crate::config::SceneConfig;
use crate::dom;
use crate::events::{self, InputWiring};
use crate::feed::HitRecord;
use crate::frame::{start_loop, RunningLoop, WebDriver};
use crate::input::{Command, PointerTracker};
use crate::overlay;
use crate::render::{GpuRenderer, HeadlessRenderer, Renderer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// One live globe: its driver and the loop feeding it.
pub struct Globe {
    pub driver: Rc<RefCell<WebDriver>>,
    running: RunningLoop,
}

impl Globe {
    /// Stop the loop, then release the scene. Safe to call twice.
    pub fn teardown(&self) {
        if self.running.cancel() {
            self.driver.borrow_mut().shutdown();
        }
    }
}

/// The globe currently mounted on the canvas, if any.
pub type GlobeSlot = Rc<RefCell<Option<Globe>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("globe-fx starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn read_config(canvas: &web::HtmlCanvasElement) -> SceneConfig {
    let mut config = match canvas.get_attribute("data-config") {
        Some(json) => SceneConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("[config] {}; using defaults", e);
            SceneConfig::default()
        }),
        None => SceneConfig::default(),
    };
    if let Some(url) = canvas.get_attribute("data-feed-url") {
        config.feed_url = url;
    }
    config
}

async fn build_globe(canvas: &web::HtmlCanvasElement, config: SceneConfig) -> Globe {
    let renderer: Box<dyn Renderer> = match GpuRenderer::new(canvas).await {
        Ok(gpu) => Box::new(gpu),
        Err(e) => {
            log::warn!("[render] WebGPU unavailable ({:?}); running headless", e);
            Box::new(HeadlessRenderer::new())
        }
    };
    let mut driver = WebDriver::new(config, renderer, rand::random());
    driver.set_aspect(dom::canvas_aspect(canvas));
    let driver = Rc::new(RefCell::new(driver));
    let running = start_loop(driver.clone());
    Globe { driver, running }
}

/// Replace whatever globe is mounted. Builds that finish after a newer
/// request started are torn down instead of mounted.
fn mount(
    slot: &GlobeSlot,
    generation: &Rc<Cell<u64>>,
    canvas: &web::HtmlCanvasElement,
    config: SceneConfig,
) {
    if let Some(old) = slot.borrow_mut().take() {
        old.teardown();
    }
    let ticket = generation.get().wrapping_add(1);
    generation.set(ticket);

    let slot = slot.clone();
    let generation = generation.clone();
    let canvas = canvas.clone();
    spawn_local(async move {
        let globe = build_globe(&canvas, config).await;
        if generation.get() != ticket {
            globe.teardown();
            return;
        }
        if let Some(stale) = slot.borrow_mut().replace(globe) {
            stale.teardown();
        }
        log::info!("[app] globe mounted (generation {})", ticket);
    });
}

fn wire_controls(document: &web::Document, wiring: &InputWiring) {
    for (id, kind) in overlay::control_ids() {
        let slot = wiring.globe.clone();
        dom::add_click_listener(document, id, move || {
            if let Some(g) = slot.borrow().as_ref() {
                g.driver.borrow_mut().apply(Command::Trigger(kind));
            }
        });
    }
}

fn wire_resize(
    canvas: &web::HtmlCanvasElement,
    slot: &GlobeSlot,
    generation: &Rc<Cell<u64>>,
    config: SceneConfig,
) {
    let Some(window) = web::window() else {
        return;
    };
    let canvas = canvas.clone();
    let slot = slot.clone();
    let generation = generation.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas);
        mount(&slot, &generation, &canvas, config.clone());
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Subscribe to the hit feed. A broken stream is closed and not retried.
fn wire_feed(url: &str, slot: &GlobeSlot) {
    let source = match web::EventSource::new(url) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("[feed] cannot open {}: {:?}", url, e);
            return;
        }
    };

    let slot = slot.clone();
    let on_message = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
        let Some(data) = ev.data().as_string() else {
            log::warn!("[feed] non-text message ignored");
            return;
        };
        let record = match HitRecord::parse(&data) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[feed] dropped message: {}", e);
                return;
            }
        };
        if let Some(g) = slot.borrow().as_ref() {
            let mut driver = g.driver.borrow_mut();
            driver.ingest(&record);
            if let Some(doc) = dom::window_document() {
                overlay::update_feed_log(&doc, &driver.sim.feed_log);
            }
        } else {
            log::debug!("[feed] no globe mounted, record dropped: {}", record.log_line());
        }
    }) as Box<dyn FnMut(_)>);
    source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    let source_err = source.clone();
    let on_error = Closure::wrap(Box::new(move |_ev: web::Event| {
        log::error!("[feed] stream error; closing");
        source_err.close();
    }) as Box<dyn FnMut(_)>);
    source.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_backing_size(&canvas);

    let config = read_config(&canvas);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid config: {}", e))?;

    let slot: GlobeSlot = Rc::new(RefCell::new(None));
    let generation = Rc::new(Cell::new(0_u64));

    let wiring = InputWiring {
        canvas: canvas.clone(),
        globe: slot.clone(),
        tracker: Rc::new(RefCell::new(PointerTracker::default())),
    };
    events::wire_pointer_handlers(wiring.clone());
    events::wire_keydown(wiring.clone());
    wire_controls(&document, &wiring);
    wire_feed(&config.feed_url, &slot);
    wire_resize(&canvas, &slot, &generation, config.clone());

    mount(&slot, &generation, &canvas, config);
    Ok(())
}
