#![cfg(target_arch = "wasm32")]

use std::sync::Arc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::platform::web::{EventLoopExtWebSys, WindowAttributesExtWebSys, WindowExtWebSys};
use winit::window::Window;

use crate::app::App;
use crate::hud::{CrosshairColor, HudSink};
use crate::page::{self, CanvasPlacement, Styles};
use crate::{seeded_rng, Demo, Renderer, RoomConfig, Scene};

const TITLE: &str = "Shape Room";

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logger already initialized"));
    }
}

/// Starts the demo in the page.
///
/// Renders into the canvas named by `canvas_id`, leaving its size and the page
/// layout to the host, or appends a full-page canvas when it is omitted. `config_xml` takes the same `<room>` document as the desktop
/// `--config` flag.
#[wasm_bindgen]
pub async fn run(
    canvas_id: Option<String>,
    seed: Option<u32>,
    config_xml: Option<String>,
) -> Result<(), JsValue> {
    let mut config = match config_xml {
        Some(xml) => RoomConfig::from_xml(&xml)
            .map_err(|err| JsValue::from_str(&format!("failed to parse config: {err}")))?,
        None => RoomConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = Some(u64::from(seed));
    }
    config
        .validate()
        .map_err(|err| JsValue::from_str(&format!("invalid config: {err}")))?;

    let browser = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let document = browser
        .document()
        .ok_or_else(|| JsValue::from_str("missing document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("missing document body"))?;
    let placement = CanvasPlacement::from_canvas_id(canvas_id.as_deref());
    set_styles(&body, placement.body_styles())?;

    let width = browser.inner_width()?.as_f64().unwrap_or(1280.0);
    let height = browser.inner_height()?.as_f64().unwrap_or(720.0);
    let mut attributes = Window::default_attributes()
        .with_title(TITLE)
        .with_inner_size(LogicalSize::new(width, height));
    attributes = match canvas_id {
        Some(id) => {
            let canvas: HtmlCanvasElement = document
                .get_element_by_id(&id)
                .ok_or_else(|| JsValue::from_str("canvas element not found"))?
                .dyn_into()
                .map_err(|_| JsValue::from_str("element is not a canvas"))?;
            attributes.with_canvas(Some(canvas))
        }
        None => attributes.with_append(true),
    };

    let event_loop = EventLoop::new()
        .map_err(|err| JsValue::from_str(&format!("failed to create event loop: {err}")))?;
    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(attributes)
            .map_err(|err| JsValue::from_str(&format!("window error: {err}")))?,
    );
    if let Some(canvas) = window.canvas() {
        set_styles(&canvas, placement.canvas_styles())?;
    }

    let scene = Scene::generate(&config, &mut seeded_rng(config.seed));
    let renderer = Renderer::new(Arc::clone(&window), &scene)
        .await
        .map_err(|err| JsValue::from_str(&format!("renderer error: {err}")))?;
    let demo = Demo::with_scene(config, scene, renderer.aspect());
    demo.log_summary();
    for line in demo.describe_shapes() {
        info!("{line}");
    }

    let hud = DomHud::attach(&document, &body)?;
    let app = App::new(renderer, demo, Box::new(hud), false);
    event_loop.spawn_app(app);
    Ok(())
}

/// True while the page holds pointer lock.
pub fn pointer_locked() -> bool {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.pointer_lock_element())
        .is_some()
}

/// Counter text in the top-left corner and a ring crosshair at the center.
struct DomHud {
    counter: HtmlElement,
    crosshair: HtmlElement,
}

impl DomHud {
    fn attach(document: &Document, body: &HtmlElement) -> Result<Self, JsValue> {
        let counter = create_overlay(document, page::COUNTER)?;
        let crosshair = create_overlay(document, page::CROSSHAIR)?;
        body.append_child(&counter)?;
        body.append_child(&crosshair)?;
        Ok(Self { counter, crosshair })
    }
}

impl HudSink for DomHud {
    fn show_counter(&mut self, text: &str) {
        self.counter.set_text_content(Some(text));
    }

    fn show_crosshair(&mut self, color: CrosshairColor) {
        if let Err(err) = self
            .crosshair
            .style()
            .set_property("border-color", color.css())
        {
            warn!("failed to update crosshair: {err:?}");
        }
    }
}

fn create_overlay(document: &Document, styles: Styles) -> Result<HtmlElement, JsValue> {
    let element: HtmlElement = document
        .create_element("div")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("div is not an HtmlElement"))?;
    set_styles(&element, page::OVERLAY)?;
    set_styles(&element, styles)?;
    Ok(element)
}

fn set_styles(element: &HtmlElement, styles: Styles) -> Result<(), JsValue> {
    let style = element.style();
    for (name, value) in styles {
        style.set_property(name, value)?;
    }
    Ok(())
}
