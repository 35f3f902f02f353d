#![forbid(unsafe_code)]

//! Host-agnostic tour session behind the browser export.
//!
//! [`TourCore`] owns everything one embedded tour needs: the shared
//! [`Tour`], a highlighter per registered step, the resume guard, and the
//! tour-aware navigator. Views are returned as JSON strings so the
//! `wasm-bindgen` layer stays a thin shim. Native tests drive it with
//! in-memory storage and static layout.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;
use wayfinder_core::TourStep;
use wayfinder_runtime::{
    ConfigError, ElementHandle, Highlighter, LayoutProbe, Navigator, ResumeGuard, StorageBackend,
    Subscription, Tour, TourConfig, TourNavigator, ViewportSignal, ViewportSource, feed_on_demand,
};
use wayfinder_widgets::{
    ButtonKind, ButtonView, HighlightChrome, LayerRole, PopupView, ResumeChoice, ResumeDialog,
    Side, TourPopup, answer,
};

/// Host routing callback.
pub type HostNavigate = Box<dyn Fn(&str)>;

/// Failures constructing a [`TourCore`].
#[derive(Debug, Error)]
pub enum WebError {
    #[error("invalid steps JSON: {0}")]
    Steps(#[source] serde_json::Error),
    #[error("invalid tour config: {0}")]
    Config(#[from] ConfigError),
}

/// Everything the host supplies.
pub struct HostBindings {
    pub storage: Rc<dyn StorageBackend>,
    pub probe: Rc<dyn LayoutProbe>,
    pub viewport: ViewportSignal,
    /// Listeners feeding `viewport`; installed only while a highlight is live.
    pub viewport_source: Rc<dyn ViewportSource>,
    pub navigate: HostNavigate,
}

/// One embedded tour.
pub struct TourCore {
    tour: Tour,
    config: TourConfig,
    chrome: HighlightChrome,
    probe: Rc<dyn LayoutProbe>,
    viewport: ViewportSignal,
    navigator: TourNavigator<HostNavigate>,
    highlighters: BTreeMap<usize, Highlighter>,
    guard: ResumeGuard,
    on_change: Option<Rc<dyn Fn()>>,
    subscriptions: Vec<Subscription>,
}

impl TourCore {
    /// Mount tour `id` from a JSON step array.
    pub fn new(
        id: &str,
        steps_json: &str,
        config: TourConfig,
        host: HostBindings,
    ) -> Result<Self, WebError> {
        let steps = TourStep::parse_sequence(steps_json).map_err(WebError::Steps)?;
        let config = config.validated()?;
        feed_on_demand(&host.viewport, host.viewport_source);
        let store = config.progress_store(host.storage);
        let tour = Tour::mount(id, steps, store);
        let navigator = tour.navigator(host.navigate);
        Ok(Self {
            chrome: HighlightChrome::new(config.clone()),
            config,
            tour,
            probe: host.probe,
            viewport: host.viewport,
            navigator,
            highlighters: BTreeMap::new(),
            guard: ResumeGuard::default(),
            on_change: None,
            subscriptions: Vec::new(),
        })
    }

    #[must_use]
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Navigate through the tour so the route is recorded first.
    pub fn navigate(&self, path: &str) {
        self.navigator.navigate(path);
    }

    /// Run the resume check for `current_path`. Returns the dialog as JSON
    /// when the user should be asked.
    pub fn check_resume(&mut self, current_path: &str) -> Option<String> {
        self.guard = ResumeGuard::on_mount(self.tour.store(), self.tour.id(), current_path);
        let dialog = ResumeDialog::from_guard(&self.guard)?;
        Some(
            json!({
                "heading": dialog.heading,
                "prompt": dialog.prompt,
                "choices": dialog.choices.map(ResumeChoice::label),
                "route": dialog.route,
            })
            .to_string(),
        )
    }

    /// Answer an open resume prompt. Returns the route navigated to.
    pub fn answer_resume(&mut self, resume: bool) -> Option<String> {
        let choice = if resume {
            ResumeChoice::Resume
        } else {
            ResumeChoice::Exit
        };
        answer(&mut self.guard, choice, &self.navigator)
    }

    /// Track `element` as the target of `step`, replacing any previous one.
    pub fn highlight(&mut self, step: usize, element: Rc<dyn ElementHandle>) {
        if let Some(existing) = self.highlighters.get(&step) {
            existing.attach(element);
            return;
        }
        let highlighter =
            Highlighter::new(&self.tour, step, self.probe.clone(), self.viewport.clone());
        if let Some(callback) = &self.on_change {
            let callback = Rc::clone(callback);
            self.subscriptions
                .push(highlighter.subscribe(move |_| callback()));
        }
        highlighter.attach(element);
        debug!(tour_id = self.tour.id(), step, "highlight target registered");
        self.highlighters.insert(step, highlighter);
    }

    /// Stop tracking the target of `step`.
    pub fn unhighlight(&mut self, step: usize) {
        if let Some(highlighter) = self.highlighters.get(&step) {
            highlighter.detach();
        }
    }

    /// Render layers for `step` as a JSON array, `None` when nothing is lit.
    #[must_use]
    pub fn layers_json(&self, step: usize) -> Option<String> {
        let layers = self.chrome.for_highlighter(self.highlighters.get(&step)?)?;
        let layers: Vec<Value> = layers
            .iter()
            .map(|layer| {
                json!({
                    "role": role_name(layer.role),
                    "style": layer.style.to_string(),
                })
            })
            .collect();
        Some(Value::Array(layers).to_string())
    }

    /// Wrapper style for a target that is not highlighted.
    #[must_use]
    pub fn plain_style(&self) -> String {
        HighlightChrome::plain().to_string()
    }

    /// Popup view for `step` as JSON.
    #[must_use]
    pub fn popup_json(&self, step: usize) -> String {
        popup_to_json(&self.popup_view(step)).to_string()
    }

    /// Click a default-panel button of `step`'s popup. Unknown kinds and
    /// disabled buttons are ignored.
    pub fn click(&self, step: usize, kind: &str) -> bool {
        let Some(kind) = parse_kind(kind) else {
            return false;
        };
        self.popup(step).click(kind)
    }

    /// Invoke `callback` whenever the step, completion, or any highlight
    /// rectangle changes.
    pub fn on_change(&mut self, callback: Rc<dyn Fn()>) {
        self.subscriptions.clear();
        let step_cb = Rc::clone(&callback);
        self.subscriptions
            .push(self.tour.subscribe_step(move |_| step_cb()));
        let done_cb = Rc::clone(&callback);
        self.subscriptions
            .push(self.tour.subscribe_done(move |_| done_cb()));
        for highlighter in self.highlighters.values() {
            let rect_cb = Rc::clone(&callback);
            self.subscriptions
                .push(highlighter.subscribe(move |_| rect_cb()));
        }
        self.on_change = Some(callback);
    }

    fn popup(&self, step: usize) -> TourPopup {
        TourPopup::new(&self.tour, step).auto_place(&self.config.popup)
    }

    fn popup_view(&self, step: usize) -> PopupView {
        let popup = self.popup(step);
        match self.highlighters.get(&step).and_then(Highlighter::rect) {
            Some(rect) => popup.view_near(
                rect,
                self.probe.scroll_offset(),
                self.probe.viewport_size(),
            ),
            None => popup.view(),
        }
    }
}

fn parse_kind(kind: &str) -> Option<ButtonKind> {
    match kind {
        "next" => Some(ButtonKind::Next),
        "back" => Some(ButtonKind::Back),
        "finish" => Some(ButtonKind::Finish),
        _ => None,
    }
}

fn role_name(role: LayerRole) -> &'static str {
    use wayfinder_widgets::BandSide;
    match role {
        LayerRole::Wrapper => "wrapper",
        LayerRole::Content => "content",
        LayerRole::Backdrop => "backdrop",
        LayerRole::Band(BandSide::Top) => "band-top",
        LayerRole::Band(BandSide::Left) => "band-left",
        LayerRole::Band(BandSide::Right) => "band-right",
        LayerRole::Band(BandSide::Bottom) => "band-bottom",
        LayerRole::Ring => "ring",
    }
}

fn side_name(side: Option<Side>) -> Value {
    match side {
        Some(Side::Below) => "below".into(),
        Some(Side::Above) => "above".into(),
        Some(Side::Right) => "right".into(),
        Some(Side::Left) => "left".into(),
        None => Value::Null,
    }
}

fn button_to_json(button: &ButtonView) -> Value {
    json!({
        "kind": button.kind.label(),
        "label": button.label,
        "disabled": button.disabled,
    })
}

fn popup_to_json(view: &PopupView) -> Value {
    match view {
        PopupView::Hidden => json!({ "kind": "hidden" }),
        PopupView::Container { position, side } => json!({
            "kind": "container",
            "style": position.css(),
            "side": side_name(*side),
        }),
        PopupView::Panel(panel) => json!({
            "kind": "panel",
            "style": panel.position.css(),
            "title": panel.title,
            "content": panel.content,
            "back": button_to_json(&panel.back),
            "primary": button_to_json(&panel.primary),
            "side": side_name(panel.side),
        }),
    }
}
