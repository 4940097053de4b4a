//! Browser glue: DOM implementations of the viewer capabilities and the
//! exported `mount_viewer` entry point.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call `mount_viewer(container, optionsJson)` once per viewer and keep
//! the returned [`ViewerHandle`]. The handle owns the core and every DOM
//! listener; `dispose()` (or dropping the handle from JS via `free()`)
//! removes the listeners and tears the core down. Event and frame callbacks
//! only hold weak references to the core, so nothing here keeps a disposed
//! viewer alive.

use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver,
    Response, WheelEvent, Window,
};

use crate::backend::{BackendError, RenderBackend, SurfaceSize, clamp_pixel_ratio};
use crate::camera::{PerspectiveCamera, Point};
use crate::controls::Button;
use crate::host::{Container, ViewerConfig, ViewerCore, load_into};
use crate::loader::{AssetFetcher, LoadError, LoadProgress, ModelSource};
use crate::render::{build_draw_list, draw};
use crate::render_loop::FrameScheduler;
use crate::scene::Scene;
use crate::scroll_lock::{PageScroll, ScrollLock};

type WebCore = ViewerCore<CanvasBackend, RafScheduler>;
type FrameCallback = Closure<dyn FnMut(f64)>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
}

thread_local! {
    /// One scroll lock per page, shared by every mounted viewer.
    static PAGE_SCROLL: OnceCell<Option<ScrollLock>> = const { OnceCell::new() };
}

fn page_scroll_lock() -> Option<ScrollLock> {
    PAGE_SCROLL.with(|cell| {
        cell.get_or_init(|| {
            let body = web_sys::window()?.document()?.body()?;
            Some(ScrollLock::new(BodyScroll { body, saved_overflow: None }))
        })
        .clone()
    })
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Canvas2D renderer. The canvas is created on attach and removed on detach.
pub struct CanvasBackend {
    document: Document,
    container: HtmlElement,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    size: SurfaceSize,
    dpr: f64,
}

impl CanvasBackend {
    fn apply_size(&mut self, size: SurfaceSize, device_pixel_ratio: f64) {
        self.size = size;
        self.dpr = clamp_pixel_ratio(device_pixel_ratio);
        if let Some(canvas) = &self.canvas {
            let buffer = size.buffer_size(device_pixel_ratio);
            canvas.set_width(buffer.width);
            canvas.set_height(buffer.height);
        }
    }
}

impl RenderBackend for CanvasBackend {
    fn attach_surface(&mut self, size: SurfaceSize, device_pixel_ratio: f64) -> Result<(), BackendError> {
        let unavailable = |err: JsValue| BackendError::ContextUnavailable(format!("{err:?}"));
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(unavailable)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BackendError::ContextUnavailable("created element is not a canvas".into()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(unavailable)?
            .ok_or_else(|| BackendError::ContextUnavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackendError::ContextUnavailable("unexpected context type".into()))?;

        let style = canvas.style();
        for (name, value) in [("display", "block"), ("width", "100%"), ("height", "100%"), ("touch-action", "none")] {
            style.set_property(name, value).map_err(unavailable)?;
        }
        self.container.append_child(&canvas).map_err(unavailable)?;

        self.canvas = Some(canvas);
        self.ctx = Some(ctx);
        self.apply_size(size, device_pixel_ratio);
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize, device_pixel_ratio: f64) {
        self.apply_size(size, device_pixel_ratio);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), BackendError> {
        let ctx = self.ctx.as_ref().ok_or(BackendError::NotAttached)?;
        let width = f64::from(self.size.width);
        let height = f64::from(self.size.height);
        let faces = build_draw_list(scene, camera, width, height);
        draw(ctx, &faces, scene.background, width, height, self.dpr).map_err(|err| BackendError::Draw(format!("{err:?}")))
    }

    fn detach_surface(&mut self) {
        self.ctx = None;
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
    }
}

/// The container element the viewer was mounted into.
struct DomContainer<'a> {
    element: &'a HtmlElement,
    window: &'a Window,
}

impl Container for DomContainer<'_> {
    fn is_attached(&self) -> bool {
        self.element.is_connected()
    }

    fn size(&self) -> SurfaceSize {
        let dim = |v: i32| u32::try_from(v).unwrap_or(0);
        SurfaceSize::new(dim(self.element.client_width()), dim(self.element.client_height()))
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}

/// `requestAnimationFrame` scheduling for one viewer.
pub struct RafScheduler {
    window: Window,
    callback: Rc<FrameCallback>,
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        match self.window.request_animation_frame((*self.callback).as_ref().unchecked_ref()) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::error!("requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {err:?}");
        }
    }
}

/// Locks page scrolling by hiding overflow on `<body>`.
struct BodyScroll {
    body: HtmlElement,
    saved_overflow: Option<String>,
}

impl PageScroll for BodyScroll {
    fn set_scroll_locked(&mut self, locked: bool) {
        let style = self.body.style();
        let result = if locked {
            match style.get_property_value("overflow") {
                Ok(previous) => {
                    self.saved_overflow = Some(previous);
                    style.set_property("overflow", "hidden")
                }
                Err(err) => Err(err),
            }
        } else {
            match self.saved_overflow.take().filter(|v| !v.is_empty()) {
                Some(previous) => style.set_property("overflow", &previous),
                None => style.remove_property("overflow").map(|_| ()),
            }
        };
        if let Err(err) = result {
            log::warn!("failed to update page scroll lock: {err:?}");
        }
    }
}

/// Fetches model bytes with `window.fetch`.
struct FetchAsset {
    window: Window,
}

#[async_trait(?Send)]
impl AssetFetcher for FetchAsset {
    async fn fetch(&self, url: &str, progress: &mut dyn FnMut(LoadProgress)) -> Result<Vec<u8>, LoadError> {
        let fetch_error = |err: JsValue| LoadError::Fetch(format!("{err:?}"));
        let response: Response = JsFuture::from(self.window.fetch_with_str(url))
            .await
            .map_err(fetch_error)?
            .dyn_into()
            .map_err(fetch_error)?;
        if !(200..300).contains(&response.status()) {
            return Err(LoadError::HttpStatus(response.status()));
        }

        let total = content_length(&response);
        progress(LoadProgress { loaded: 0, total });

        let buffer = JsFuture::from(response.array_buffer().map_err(fetch_error)?).await.map_err(fetch_error)?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        progress(LoadProgress { loaded: bytes.len() as u64, total: total.or(Some(bytes.len() as u64)) });
        Ok(bytes)
    }
}

fn content_length(response: &Response) -> Option<u64> {
    let Ok(Some(value)) = response.headers().get("content-length") else {
        return None;
    };
    match value.trim().parse() {
        Ok(len) => Some(len),
        Err(_) => None,
    }
}

// =============================================================================
// ENTRY POINT
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MountOptions {
    #[serde(flatten)]
    config: ViewerConfig,
    /// Model to load right after mounting.
    model_url: Option<String>,
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Follows layout-driven size changes of the container element.
struct SizeObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

/// A mounted viewer, owned by the page.
#[wasm_bindgen]
pub struct ViewerHandle {
    core: Rc<RefCell<WebCore>>,
    window: Window,
    listeners: Vec<Listener>,
    size_observer: Option<SizeObserver>,
}

/// Mount a viewer into `container`. `options` is a JSON object of
/// `ViewerConfig` fields plus an optional `modelUrl`.
///
/// Returns `undefined` when the container is not attached to the document.
///
/// # Errors
///
/// Returns an error for malformed options or when no window is available.
#[wasm_bindgen(js_name = mountViewer)]
pub fn mount_viewer(container: HtmlElement, options: &str) -> Result<Option<ViewerHandle>, JsValue> {
    let options: MountOptions = if options.trim().is_empty() {
        MountOptions::default()
    } else {
        serde_json::from_str(options).map_err(|err| JsValue::from_str(&format!("invalid viewer options: {err}")))?
    };
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let scroll = page_scroll_lock().ok_or_else(|| JsValue::from_str("no document body"))?;

    let slot: Rc<OnceCell<Weak<RefCell<WebCore>>>> = Rc::new(OnceCell::new());
    let frame_slot = Rc::clone(&slot);
    let callback: FrameCallback = Closure::new(move |now_ms: f64| {
        if let Some(core) = frame_slot.get().and_then(Weak::upgrade)
            && let Ok(mut core) = core.try_borrow_mut()
        {
            core.tick(now_ms);
        }
    });

    let backend = CanvasBackend {
        document,
        container: container.clone(),
        canvas: None,
        ctx: None,
        size: SurfaceSize::default(),
        dpr: 1.0,
    };
    let scheduler = RafScheduler { window: window.clone(), callback: Rc::new(callback) };
    let dom = DomContainer { element: &container, window: &window };
    let Some(core) = ViewerCore::mount(&dom, options.config, backend, scheduler, scroll) else {
        return Ok(None);
    };

    let core = Rc::new(RefCell::new(core));
    if slot.set(Rc::downgrade(&core)).is_err() {
        log::warn!("viewer frame slot already set");
    }

    let mut handle = ViewerHandle { core, window, listeners: Vec::new(), size_observer: None };
    handle.bind_input(&container)?;
    handle.observe_size(&container)?;
    match options.model_url {
        Some(url) => handle.load_url(url),
        None => {
            if handle.core.borrow().config().project_slug.is_some() {
                handle.core.borrow_mut().show_placeholder();
            }
        }
    }
    Ok(Some(handle))
}

fn button_of(event: &MouseEvent) -> Button {
    match event.button() {
        1 => Button::Middle,
        2 => Button::Secondary,
        _ => Button::Primary,
    }
}

fn point_of(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.offset_x()), f64::from(event.offset_y()))
}

impl ViewerHandle {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        mut handler: impl FnMut(&mut WebCore, &Event) + 'static,
    ) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.core);
        let callback: Closure<dyn FnMut(Event)> = Closure::new(move |event: Event| {
            if let Some(core) = weak.upgrade()
                && let Ok(mut core) = core.try_borrow_mut()
            {
                handler(&mut core, &event);
            }
        });
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener { target: target.clone(), kind, callback });
        Ok(())
    }

    fn bind_input(&mut self, container: &HtmlElement) -> Result<(), JsValue> {
        let target: &EventTarget = container.as_ref();
        self.listen(target, "pointerenter", |core, _| core.pointer_enter())?;
        self.listen(target, "pointerleave", |core, event| core.pointer_leave(event.time_stamp()))?;
        self.listen(target, "pointerdown", |core, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                core.pointer_down(point_of(mouse), button_of(mouse), event.time_stamp());
            }
        })?;
        self.listen(target, "pointermove", |core, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                core.pointer_move(point_of(mouse));
            }
        })?;
        self.listen(target, "pointerup", |core, event| core.pointer_up(event.time_stamp()))?;
        self.listen(target, "contextmenu", |_, event| event.prevent_default())?;
        self.listen(target, "wheel", |core, event| {
            if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
                event.prevent_default();
                core.wheel(wheel.delta_y(), event.time_stamp());
            }
        })?;

        // Window resizes also catch device pixel ratio changes (browser zoom).
        let element = container.clone();
        let window = self.window.clone();
        let window_target: EventTarget = self.window.clone().into();
        self.listen(&window_target, "resize", move |core, _| {
            let dom = DomContainer { element: &element, window: &window };
            core.resize(dom.size(), dom.device_pixel_ratio());
        })
    }

    fn observe_size(&mut self, container: &HtmlElement) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.core);
        let element = container.clone();
        let window = self.window.clone();
        let callback: Closure<dyn FnMut(js_sys::Array)> = Closure::new(move |_entries: js_sys::Array| {
            if let Some(core) = weak.upgrade()
                && let Ok(mut core) = core.try_borrow_mut()
            {
                let dom = DomContainer { element: &element, window: &window };
                core.resize(dom.size(), dom.device_pixel_ratio());
            }
        });
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(container);
        self.size_observer = Some(SizeObserver { observer, _callback: callback });
        Ok(())
    }

    fn remove_listeners(&mut self) {
        if let Some(size) = self.size_observer.take() {
            size.observer.disconnect();
        }
        for listener in self.listeners.drain(..) {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.callback.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove {} listener: {err:?}", listener.kind);
            }
        }
    }
}

#[wasm_bindgen]
impl ViewerHandle {
    /// Load a model from a URL, replacing the current one when it arrives.
    #[wasm_bindgen(js_name = loadUrl)]
    pub fn load_url(&self, url: String) {
        self.spawn_load(ModelSource::Url(url));
    }

    /// Load a model from file bytes picked by the user.
    #[wasm_bindgen(js_name = loadFile)]
    pub fn load_file(&self, name: String, content_type: Option<String>, bytes: Vec<u8>) {
        self.spawn_load(ModelSource::File { name, content_type, bytes });
    }

    fn spawn_load(&self, source: ModelSource) {
        let weak = Rc::downgrade(&self.core);
        let fetcher = FetchAsset { window: self.window.clone() };
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = load_into(&weak, source, &fetcher).await;
            log::debug!("model load finished: {outcome:?}");
        });
    }

    /// Session state as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be serialized.
    pub fn status(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.core.borrow().session()).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = resetCamera)]
    pub fn reset_camera(&self) {
        self.core.borrow_mut().reset_camera();
    }

    #[wasm_bindgen(js_name = setAutoRotate)]
    pub fn set_auto_rotate(&self, enabled: bool) {
        self.core.borrow_mut().set_auto_rotate(enabled);
    }

    #[wasm_bindgen(js_name = setPlaying)]
    pub fn set_playing(&self, playing: bool) {
        self.core.borrow_mut().set_playing(playing);
    }

    /// Tear the viewer down. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.remove_listeners();
        self.core.borrow_mut().dispose();
    }
}

impl Drop for ViewerHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
