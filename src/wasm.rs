//! Browser front end.
//!
//! [`RoiEditor`] is the handle a host page creates for one camera. It owns
//! the editor session, wires canvas/window/image events into it, and runs
//! persistence calls on the JS event loop. Nothing here holds a session
//! borrow across an `.await`.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlImageElement, MouseEvent,
    Window,
};

use crate::config::{CONFIG_STORAGE_KEY, EditorConfig};
use crate::controller::{EditorSession, Tool};
use crate::error::{EditorError, Result};
use crate::logging;
use crate::model::Point;
use crate::persistence::{HttpBackend, PersistenceClient};
use crate::render::Surface;
use crate::snapshot::snapshot_src;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

impl From<EditorError> for JsValue {
    fn from(err: EditorError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

// ============================================================================
// Canvas surface
// ============================================================================

/// [`Surface`] over a 2D canvas context, with the snapshot as background.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: HtmlImageElement,
}

impl CanvasSurface {
    fn set_style(&self, property: &str, color: &str) {
        let result = js_sys::Reflect::set(
            self.ctx.as_ref(),
            &JsValue::from_str(property),
            &JsValue::from_str(color),
        );
        if result.is_err() {
            log::warn!("Failed to set {} to {}", property, color);
        }
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: f64, height: f64) {
        // Canvas dimensions are integral; assignment truncates like the DOM does.
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn draw_background(&mut self, width: f64, height: f64) {
        if let Err(e) = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(&self.image, 0.0, 0.0, width, height)
        {
            log::warn!("Failed to draw snapshot: {:?}", e);
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_style("strokeStyle", color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.set_style("fillStyle", color);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        if let Err(e) = self.ctx.arc(x, y, radius, 0.0, TAU) {
            log::warn!("Failed to draw vertex marker: {:?}", e);
        }
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.stroke_rect(x, y, width, height);
    }
}

// ============================================================================
// Event wiring
// ============================================================================

/// A DOM listener that detaches itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> std::result::Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            .is_err()
        {
            log::debug!("Failed to detach {} listener", self.event);
        }
    }
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_position(canvas: &HtmlCanvasElement, event: &Event) -> Option<Point> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let rect = canvas.get_bounding_client_rect();
    Some(Point::new(
        f64::from(mouse.client_x()) - rect.left(),
        f64::from(mouse.client_y()) - rect.top(),
    ))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

fn stored_config(window: &Window) -> EditorConfig {
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(CONFIG_STORAGE_KEY).ok().flatten());
    EditorConfig::from_json_or_default(stored.as_deref())
}

fn alert(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window.alert_with_message(message).is_err() {
        log::warn!("Alert failed: {}", message);
    }
}

fn notify(outcome: Result<String>) {
    match outcome {
        Ok(message) => alert(&message),
        Err(e) => alert(&format!("Error: {e}")),
    }
}

fn missing(what: &str) -> JsValue {
    JsValue::from_str(&format!("{what} not available"))
}

// ============================================================================
// Exported editor
// ============================================================================

type SharedSession = Rc<RefCell<EditorSession<CanvasSurface>>>;

/// Region editor bound to one canvas, one snapshot and one camera.
#[wasm_bindgen]
pub struct RoiEditor {
    session: SharedSession,
    client: PersistenceClient<HttpBackend>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl RoiEditor {
    /// Attach to `canvas_id`, show `image_src` (URL or bare base64 JPEG)
    /// and load the stored regions for `camera_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        image_src: &str,
        camera_id: &str,
        api_base_url: Option<String>,
    ) -> std::result::Result<RoiEditor, JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let mut config = stored_config(&window);
        if let Some(url) = api_base_url {
            config.api_base_url = url;
        }
        logging::init(config.log_level);
        log::info!("🎯 ROI editor starting for camera {}", camera_id);

        let client = PersistenceClient::new(HttpBackend::new(config.api_base_url.clone()), camera_id)?;

        let document = window.document().ok_or_else(|| missing("document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("canvas '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("'{canvas_id}' is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| missing("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let image = HtmlImageElement::new()?;

        let surface = CanvasSurface {
            canvas: canvas.clone(),
            ctx,
            image: image.clone(),
        };
        let session: SharedSession = Rc::new(RefCell::new(EditorSession::new(config, surface)));
        if let Some((width, height)) = window_size(&window) {
            session.borrow_mut().resize(width, height)?;
        }

        let listeners = vec![
            {
                let session = session.clone();
                let c = canvas.clone();
                Listener::attach(&canvas, "mousedown", move |event: Event| {
                    if let Some(pos) = canvas_position(&c, &event) {
                        session.borrow_mut().pointer_down(pos);
                    }
                })?
            },
            {
                let session = session.clone();
                let c = canvas.clone();
                Listener::attach(&canvas, "mousemove", move |event: Event| {
                    if let Some(pos) = canvas_position(&c, &event) {
                        session.borrow_mut().pointer_move(pos);
                    }
                })?
            },
            {
                let session = session.clone();
                Listener::attach(&canvas, "mouseup", move |_: Event| {
                    session.borrow_mut().pointer_up();
                })?
            },
            {
                let session = session.clone();
                let w = window.clone();
                Listener::attach(&window, "resize", move |_: Event| {
                    let Some((width, height)) = window_size(&w) else {
                        return;
                    };
                    if let Err(e) = session.borrow_mut().resize(width, height) {
                        log::warn!("Ignoring resize: {}", e);
                    }
                })?
            },
            {
                let session = session.clone();
                let img = image.clone();
                Listener::attach(&image, "load", move |_: Event| {
                    let width = f64::from(img.natural_width());
                    let height = f64::from(img.natural_height());
                    if let Err(e) = session.borrow_mut().image_loaded(width, height) {
                        log::error!("Snapshot unusable: {}", e);
                    }
                })?
            },
            {
                let session = session.clone();
                Listener::attach(&image, "error", move |_: Event| {
                    session.borrow_mut().image_failed("snapshot could not be decoded");
                })?
            },
        ];

        image.set_src(&snapshot_src(image_src));

        let editor = RoiEditor {
            session,
            client,
            _listeners: listeners,
        };
        editor.load();
        Ok(editor)
    }

    /// Replace the local regions with the stored ones. Failures are logged.
    pub fn load(&self) {
        let session = self.session.clone();
        let client = self.client.clone();
        spawn_local(async move {
            let result = client.load().await;
            if session.borrow_mut().apply_loaded(result).is_err() {
                log::debug!("Keeping current regions");
            }
        });
    }

    /// Send the current regions and alert the outcome.
    pub fn save(&self) {
        let shapes = self.session.borrow().snapshot();
        let session = self.session.clone();
        let client = self.client.clone();
        spawn_local(async move {
            let result = client.save(&shapes).await;
            let outcome = session.borrow().apply_saved(result);
            notify(outcome);
        });
    }

    /// Delete the stored regions; local ones are cleared only on success.
    pub fn clear(&self) {
        let session = self.session.clone();
        let client = self.client.clone();
        spawn_local(async move {
            let result = client.clear().await;
            let outcome = session.borrow_mut().apply_cleared(result);
            notify(outcome);
        });
    }

    #[wasm_bindgen(js_name = undoLastPoint)]
    pub fn undo_last_point(&self) {
        self.session.borrow_mut().undo_last_vertex();
    }

    #[wasm_bindgen(js_name = undoLastShape)]
    pub fn undo_last_shape(&self) {
        self.session.borrow_mut().undo_last_shape();
    }

    /// Close the polygon being drawn. Alerts when it has too few points.
    #[wasm_bindgen(js_name = completePolygon)]
    pub fn complete_polygon(&self) {
        let result = self.session.borrow_mut().complete_shape();
        if let Err(e) = result {
            alert(&e.to_string());
        }
    }

    /// Switch between `"polygon"` and `"rectangle"` drawing.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) -> std::result::Result<(), JsValue> {
        let tool: Tool = name.parse()?;
        self.session.borrow_mut().set_tool(tool);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> String {
        self.session.borrow().tool().name().to_string()
    }

    #[wasm_bindgen(getter, js_name = regionCount)]
    pub fn region_count(&self) -> usize {
        self.session.borrow().store().shapes().len()
    }
}
