#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and DOM implementations of the host seams.
//!
//! Only compiled on `wasm32` targets.

use std::any::Any;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wayfinder_core::{ClientRect, ScrollOffset, ViewportSize, round_half_up};
use wayfinder_runtime::{
    ElementHandle, LayoutProbe, StorageBackend, StorageError, StorageResult, TourConfig,
    ViewportChange, ViewportSignal, ViewportSource, WeakSignal,
};

use crate::tour_core::{HostBindings, TourCore};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn js_error_text(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// `window.localStorage`.
struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> StorageResult<web_sys::Storage> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
        window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(js_error_text(&err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_owned()))
    }
}

impl StorageBackend for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(js_error_text(&err)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::WriteRejected {
                key: key.to_owned(),
                reason: js_error_text(&err),
            })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StorageError::WriteRejected {
                key: key.to_owned(),
                reason: js_error_text(&err),
            })
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

struct DomElement(web_sys::Element);

impl ElementHandle for DomElement {
    fn client_rect(&self) -> Option<ClientRect> {
        if !self.0.is_connected() {
            return None;
        }
        let rect = self.0.get_bounding_client_rect();
        Some(ClientRect::new(
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height(),
        ))
    }
}

struct WindowProbe {
    window: web_sys::Window,
}

impl LayoutProbe for WindowProbe {
    fn scroll_offset(&self) -> ScrollOffset {
        ScrollOffset::new(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn viewport_size(&self) -> ViewportSize {
        let dimension = |value: Result<JsValue, JsValue>| {
            value
                .ok()
                .and_then(|v| v.as_f64())
                .map_or(0, round_half_up)
        };
        ViewportSize::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }
}

// ---------------------------------------------------------------------------
// Viewport events
// ---------------------------------------------------------------------------

/// Window `resize` and capturing `scroll` listeners feeding a
/// [`ViewportSignal`]. Removed on drop.
struct DomViewportEvents {
    window: web_sys::Window,
    on_resize: Closure<dyn FnMut(web_sys::Event)>,
    on_scroll: Closure<dyn FnMut(web_sys::Event)>,
}

impl DomViewportEvents {
    fn install(
        window: &web_sys::Window,
        signal: WeakSignal<ViewportChange>,
    ) -> Result<Self, JsValue> {
        let resize_signal = signal.clone();
        let on_resize = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(signal) = resize_signal.upgrade() {
                signal.emit(ViewportChange::Resize);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        let on_scroll = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(signal) = signal.upgrade() {
                signal.emit(ViewportChange::Scroll);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        // Capture phase so scrolls inside nested containers are seen too.
        window.add_event_listener_with_callback_and_bool(
            "scroll",
            on_scroll.as_ref().unchecked_ref(),
            true,
        )?;
        tracing::trace!("viewport listeners installed");
        Ok(Self {
            window: window.clone(),
            on_resize,
            on_scroll,
        })
    }
}

impl Drop for DomViewportEvents {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        let _ = self.window.remove_event_listener_with_callback_and_bool(
            "scroll",
            self.on_scroll.as_ref().unchecked_ref(),
            true,
        );
        tracing::trace!("viewport listeners removed");
    }
}

/// Installs [`DomViewportEvents`] on demand.
struct DomViewportSource {
    window: web_sys::Window,
}

impl ViewportSource for DomViewportSource {
    fn listen(&self, signal: WeakSignal<ViewportChange>) -> Option<Box<dyn Any>> {
        match DomViewportEvents::install(&self.window, signal) {
            Ok(events) => Some(Box::new(events)),
            Err(err) => {
                console_error(&format!(
                    "wayfinder: viewport listeners not installed: {}",
                    js_error_text(&err)
                ));
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Push `path` onto the history stack and let routers know.
fn history_navigate(path: &str) {
    let result = window().and_then(|window| {
        window
            .history()?
            .push_state_with_url(&JsValue::NULL, "", Some(path))?;
        let event = web_sys::Event::new("popstate")?;
        window.dispatch_event(&event)?;
        Ok(())
    });
    if let Err(err) = result {
        console_error(&format!("wayfinder: navigation to {path} failed: {}", js_error_text(&err)));
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// One tour mounted in the page.
///
/// Callbacks registered with `onChange` run synchronously inside tour
/// methods; they should schedule a re-render rather than call back into the
/// tour directly.
#[wasm_bindgen]
pub struct WebTour {
    core: TourCore,
}

#[wasm_bindgen]
impl WebTour {
    /// Mount tour `id` with default styling.
    #[wasm_bindgen(constructor)]
    pub fn new(id: &str, steps_json: &str) -> Result<WebTour, JsValue> {
        Self::mount(id, steps_json, TourConfig::default())
    }

    /// Mount tour `id` with a JSON `TourConfig`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(id: &str, steps_json: &str, config_json: &str) -> Result<WebTour, JsValue> {
        let config = TourConfig::from_json_str(config_json)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Self::mount(id, steps_json, config)
    }

    fn mount(id: &str, steps_json: &str, config: TourConfig) -> Result<WebTour, JsValue> {
        install_panic_hook();
        let window = window()?;
        let core = TourCore::new(
            id,
            steps_json,
            config,
            HostBindings {
                storage: Rc::new(LocalStorage),
                probe: Rc::new(WindowProbe {
                    window: window.clone(),
                }),
                viewport: ViewportSignal::new(),
                viewport_source: Rc::new(DomViewportSource { window }),
                navigate: Box::new(history_navigate),
            },
        )
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { core })
    }

    pub fn step(&self) -> usize {
        self.core.tour().step()
    }

    #[wasm_bindgen(js_name = stepCount)]
    pub fn step_count(&self) -> usize {
        self.core.tour().step_count()
    }

    #[wasm_bindgen(js_name = isDone)]
    pub fn is_done(&self) -> bool {
        self.core.tour().is_done()
    }

    pub fn next(&self) -> usize {
        self.core.tour().next()
    }

    pub fn back(&self) -> usize {
        self.core.tour().back()
    }

    pub fn finish(&self) {
        self.core.tour().finish();
    }

    #[wasm_bindgen(js_name = jumpTo)]
    pub fn jump_to(&self, index: usize) -> usize {
        self.core.tour().jump_to(index)
    }

    /// Navigate to `path`, recording it as the tour's route first.
    pub fn navigate(&self, path: &str) {
        self.core.navigate(path);
    }

    /// Compare the recorded route with `location.pathname`. Returns the
    /// resume dialog as JSON when they differ.
    #[wasm_bindgen(js_name = checkResume)]
    pub fn check_resume(&mut self) -> Result<Option<String>, JsValue> {
        let path = window()?.location().pathname()?;
        Ok(self.core.check_resume(&path))
    }

    /// Answer the resume dialog: `true` resumes, `false` stays.
    #[wasm_bindgen(js_name = answerResume)]
    pub fn answer_resume(&mut self, resume: bool) -> Option<String> {
        self.core.answer_resume(resume)
    }

    /// Use `element` as the target of step `step_index`.
    pub fn highlight(&mut self, step_index: usize, element: web_sys::Element) {
        self.core.highlight(step_index, Rc::new(DomElement(element)));
    }

    pub fn unhighlight(&mut self, step_index: usize) {
        self.core.unhighlight(step_index);
    }

    /// Highlight layers for `step_index` as JSON, or `undefined`.
    #[wasm_bindgen(js_name = highlightLayers)]
    pub fn highlight_layers(&self, step_index: usize) -> Option<String> {
        self.core.layers_json(step_index)
    }

    #[wasm_bindgen(js_name = plainStyle)]
    pub fn plain_style(&self) -> String {
        self.core.plain_style()
    }

    /// Popup view for `step_index` as JSON.
    pub fn popup(&self, step_index: usize) -> String {
        self.core.popup_json(step_index)
    }

    /// Click `"next"`, `"back"`, or `"finish"` on a default popup panel.
    pub fn click(&self, step_index: usize, kind: &str) -> bool {
        self.core.click(step_index, kind)
    }

    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        self.core.on_change(Rc::new(move || {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                console_error(&format!("wayfinder: onChange failed: {}", js_error_text(&err)));
            }
        }));
    }

    /// Forget persisted progress for this tour.
    pub fn reset(&self) -> Result<(), JsValue> {
        let tour = self.core.tour();
        tour.store()
            .reset(tour.id())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}
