//! Viewer host: the lifecycle of one mounted viewer.
//!
//! DESIGN
//! ======
//! `ViewerCore` owns everything a viewer instance needs (session state,
//! scene, camera, orbit controls, animation driver, render loop) and reaches
//! the page only through the capability traits it is generic over. All five
//! page-specific viewers are the same core with a different [`ViewerConfig`].
//!
//! Loads are asynchronous, so every load is tagged with a [`LoadTicket`].
//! A completion is applied only if its ticket is still the newest and the
//! viewer has not been disposed; anything else is dropped untouched.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `web` module wraps a core in `Rc<RefCell<_>>`, wires DOM events and
//! `requestAnimationFrame` to the methods here, and drives loads through
//! [`load_into`], which holds only a weak reference while the fetch runs.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::cell::RefCell;
use std::rc::Weak;

use serde::Deserialize;

use crate::animation::AnimationDriver;
use crate::backend::{BackendError, RenderBackend, SurfaceSize};
use crate::camera::{PerspectiveCamera, Point};
use crate::consts::{AUTO_ROTATE_SPEED, BACKGROUND, DEFAULT_CAMERA_POSITION, DEFAULT_FOV_DEG, TARGET_SIZE};
use crate::controls::{Button, ControlsConfig, OrbitControls};
use crate::loader::{AssetFetcher, LoadError, LoadProgress, ModelLoader, ModelSource};
use crate::math::Rgb;
use crate::model::ModelSubtree;
use crate::placeholder::placeholder_cube;
use crate::render_loop::{FrameScheduler, LoopState, RenderLoop};
use crate::scene::Scene;
use crate::scroll_lock::{ScrollGuard, ScrollLock};
use crate::session::ViewerSession;

// =============================================================================
// CONFIG
// =============================================================================

/// Options for one viewer instance. Every field has a default, so an empty
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub background: Rgb,
    pub fov_deg: f32,
    pub camera_position: [f32; 3],
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub autoplay: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub target_size: f32,
    /// Project the viewer belongs to; picks the placeholder colour.
    pub project_slug: Option<String>,
    /// Show the placeholder cube when a load fails.
    pub placeholder_on_error: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: BACKGROUND,
            fov_deg: DEFAULT_FOV_DEG,
            camera_position: DEFAULT_CAMERA_POSITION.to_array(),
            auto_rotate: true,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            autoplay: true,
            enable_zoom: true,
            enable_pan: false,
            target_size: TARGET_SIZE,
            project_slug: None,
            placeholder_on_error: false,
        }
    }
}

impl ViewerConfig {
    fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera {
            fov_deg: self.fov_deg,
            position: self.camera_position.into(),
            ..PerspectiveCamera::default()
        }
    }

    fn controls(&self) -> ControlsConfig {
        ControlsConfig {
            auto_rotate: self.auto_rotate,
            auto_rotate_speed: self.auto_rotate_speed,
            enable_zoom: self.enable_zoom,
            enable_pan: self.enable_pan,
            ..ControlsConfig::default()
        }
    }
}

// =============================================================================
// CAPABILITIES AND LOAD TYPES
// =============================================================================

/// The element a viewer renders into.
pub trait Container {
    /// Whether the element is currently part of the document.
    fn is_attached(&self) -> bool;

    /// Layout size in CSS pixels.
    fn size(&self) -> SurfaceSize;

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("viewer has been disposed")]
    Disposed,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What happened to a load completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The model is now attached.
    Applied,
    /// The load failed; the message is in the session error.
    Failed(String),
    /// A newer load started first; the result was dropped.
    Stale,
    /// The viewer was disposed first; the result was dropped.
    Disposed,
}

// =============================================================================
// CORE
// =============================================================================

pub struct ViewerCore<B: RenderBackend, S: FrameScheduler> {
    config: ViewerConfig,
    session: ViewerSession,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    animation: Option<AnimationDriver>,
    render_loop: RenderLoop<S>,
    backend: B,
    surface_attached: bool,
    /// Last applied container size and pixel ratio.
    surface: (SurfaceSize, f64),
    scroll: ScrollLock,
    scroll_hold: Option<ScrollGuard>,
    generation: u64,
    disposed: bool,
}

impl<B: RenderBackend, S: FrameScheduler> ViewerCore<B, S> {
    /// Mount a viewer into `container`.
    ///
    /// Returns `None`, without touching the backend, when the container is
    /// not attached to the document. A backend that cannot create its
    /// surface leaves the viewer mounted with the error in the session and
    /// the render loop stopped.
    pub fn mount(
        container: &dyn Container,
        config: ViewerConfig,
        backend: B,
        scheduler: S,
        scroll: ScrollLock,
    ) -> Option<Self> {
        if !container.is_attached() {
            log::debug!("viewer container not attached; skipping mount");
            return None;
        }

        let size = container.size();
        let mut camera = config.camera();
        camera.set_aspect(size);
        let mut controls = OrbitControls::new(config.controls(), &camera);
        controls.set_viewport_height(f64::from(size.height));

        let mut core = Self {
            scene: Scene::new(config.background),
            session: ViewerSession { auto_rotate: config.auto_rotate, ..ViewerSession::default() },
            camera,
            controls,
            animation: None,
            render_loop: RenderLoop::new(scheduler),
            backend,
            surface_attached: false,
            surface: (size, container.device_pixel_ratio()),
            scroll,
            scroll_hold: None,
            generation: 0,
            disposed: false,
            config,
        };

        match core.backend.attach_surface(size, container.device_pixel_ratio()) {
            Ok(()) => {
                core.surface_attached = true;
                core.render_loop.start();
            }
            Err(err) => {
                log::error!("viewer renderer init failed: {err}");
                core.session.error = Some(err.to_string());
                core.render_loop.stop();
            }
        }
        Some(core)
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    #[must_use]
    pub fn animation(&self) -> Option<&AnimationDriver> {
        self.animation.as_ref()
    }

    #[must_use]
    pub fn loop_state(&self) -> LoopState {
        self.render_loop.state()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        self.render_loop.scheduler()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// A loader configured with this viewer's target size.
    #[must_use]
    pub fn loader(&self) -> ModelLoader {
        ModelLoader::new(self.config.target_size)
    }

    // --- Surface ---

    /// Apply a new container size. Both the container observer and window
    /// resizes report here, so a size that changes nothing is skipped.
    pub fn resize(&mut self, size: SurfaceSize, device_pixel_ratio: f64) {
        if self.disposed || size.is_empty() || self.surface == (size, device_pixel_ratio) {
            return;
        }
        self.surface = (size, device_pixel_ratio);
        self.camera.set_aspect(size);
        self.controls.set_viewport_height(f64::from(size.height));
        if self.surface_attached {
            self.backend.resize(size, device_pixel_ratio);
        }
    }

    // --- Loading ---

    /// Start a load. Any load still in flight becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Disposed`] after [`dispose`](Self::dispose).
    pub fn begin_load(&mut self) -> Result<LoadTicket, ViewerError> {
        if self.disposed {
            return Err(ViewerError::Disposed);
        }
        self.generation += 1;
        self.session.begin_load();
        Ok(LoadTicket { generation: self.generation })
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        !self.disposed && ticket.generation == self.generation
    }

    pub fn report_progress(&mut self, ticket: LoadTicket, progress: LoadProgress) {
        if self.is_current(ticket)
            && let Some(ratio) = progress.ratio()
        {
            self.session.progress = Some(ratio);
        }
    }

    /// Apply the result of the load identified by `ticket`.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<ModelSubtree, LoadError>) -> LoadOutcome {
        if self.disposed {
            return LoadOutcome::Disposed;
        }
        if ticket.generation != self.generation {
            log::debug!("discarding stale load {} (current {})", ticket.generation, self.generation);
            return LoadOutcome::Stale;
        }
        match result {
            Ok(model) => {
                self.set_model(model);
                LoadOutcome::Applied
            }
            Err(err) => {
                let message = err.to_string();
                log::warn!("model load failed: {message}");
                self.session.load_failed(message.clone());
                if self.config.placeholder_on_error {
                    self.attach(placeholder_cube(self.config.project_slug.as_deref(), self.config.target_size));
                }
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Replace the displayed model. The previous subtree and its animation
    /// are released before the new one is attached.
    pub fn set_model(&mut self, model: ModelSubtree) {
        if self.disposed {
            return;
        }
        self.attach(model);
        let has_animations = self.animation.is_some();
        self.session.model_ready(has_animations, self.config.autoplay);
    }

    /// Show the project placeholder cube (for projects without a model).
    pub fn show_placeholder(&mut self) {
        let cube = placeholder_cube(self.config.project_slug.as_deref(), self.config.target_size);
        self.set_model(cube);
    }

    fn attach(&mut self, model: ModelSubtree) {
        self.release_model();
        if model.has_animations() {
            self.animation = Some(AnimationDriver::new(&model.clips, self.config.autoplay));
        }
        self.scene.attach_model(model);
    }

    fn release_model(&mut self) {
        if let Some(mut animation) = self.animation.take() {
            animation.dispose();
        }
        self.scene.detach_model();
        self.session.has_animations = false;
        self.session.playing = false;
    }

    // --- Frame ---

    /// Handle one frame callback: animation, then controls, then draw.
    /// Returns whether a frame was drawn.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(delta) = self.render_loop.on_frame(now_ms) else {
            return false;
        };
        if let Some(animation) = self.animation.as_mut() {
            animation.update(delta);
        }
        self.controls.update(&mut self.camera, delta, now_ms);
        if let Err(err) = self.backend.render(&self.scene, &self.camera) {
            log::warn!("frame render failed: {err}");
            return false;
        }
        true
    }

    // --- Input ---

    /// Pointer entered the canvas: take a scroll-lock hold.
    pub fn pointer_enter(&mut self) {
        if self.disposed {
            return;
        }
        self.controls.pointer_enter();
        if self.scroll_hold.is_none() {
            self.scroll_hold = Some(self.scroll.acquire());
        }
        self.session.hovering = true;
    }

    /// Pointer left the canvas: release the hold and end any drag.
    pub fn pointer_leave(&mut self, now_ms: f64) {
        self.controls.pointer_leave(now_ms);
        self.scroll_hold = None;
        self.session.hovering = false;
        self.session.interacting = false;
    }

    pub fn pointer_down(&mut self, at: Point, button: Button, now_ms: f64) {
        if self.disposed {
            return;
        }
        self.controls.pointer_down(at, button, now_ms);
        self.session.interacting = self.controls.is_dragging();
    }

    pub fn pointer_move(&mut self, at: Point) {
        if self.disposed {
            return;
        }
        self.controls.pointer_move(at, &self.camera);
    }

    pub fn pointer_up(&mut self, now_ms: f64) {
        self.controls.pointer_up(now_ms);
        self.session.interacting = false;
    }

    pub fn wheel(&mut self, delta_y: f64, now_ms: f64) {
        if self.disposed {
            return;
        }
        self.controls.wheel(delta_y, now_ms);
    }

    // --- Commands ---

    /// Restore the initial camera pose and drop pending orbit motion.
    pub fn reset_camera(&mut self) {
        self.controls.reset(&mut self.camera);
    }

    /// Switch idle auto-rotation on or off. Motion already in flight still
    /// damps out.
    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.controls.set_auto_rotate(enabled);
        self.session.auto_rotate = enabled;
    }

    pub fn set_playing(&mut self, playing: bool) {
        if let Some(animation) = self.animation.as_mut() {
            animation.set_playing(playing);
            self.session.playing = animation.is_playing();
        }
    }

    // --- Teardown ---

    /// Stop the loop, release the scroll hold, the animation and the model,
    /// and remove the output surface. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.render_loop.stop();
        self.scroll_hold = None;
        self.release_model();
        if self.surface_attached {
            self.backend.detach_surface();
            self.surface_attached = false;
        }
        self.session.loading = false;
        log::debug!("viewer disposed");
    }
}

impl<B: RenderBackend, S: FrameScheduler> Drop for ViewerCore<B, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// ASYNC LOAD DRIVER
// =============================================================================

/// Load `source` into the viewer behind `core`.
///
/// Only a weak reference is held while the fetch is pending, so a viewer
/// dropped mid-load is not kept alive; the completion then reports
/// [`LoadOutcome::Disposed`].
pub async fn load_into<B, S, F>(
    core: &Weak<RefCell<ViewerCore<B, S>>>,
    source: ModelSource,
    fetcher: &F,
) -> LoadOutcome
where
    B: RenderBackend,
    S: FrameScheduler,
    F: AssetFetcher + ?Sized,
{
    let (ticket, loader) = {
        let Some(viewer) = core.upgrade() else {
            return LoadOutcome::Disposed;
        };
        let Ok(mut viewer) = viewer.try_borrow_mut() else {
            log::warn!("viewer busy; load not started");
            return LoadOutcome::Stale;
        };
        match viewer.begin_load() {
            Ok(ticket) => (ticket, viewer.loader()),
            Err(_) => return LoadOutcome::Disposed,
        }
    };

    let progress_target = Weak::clone(core);
    let mut on_progress = move |progress: LoadProgress| {
        if let Some(viewer) = progress_target.upgrade()
            && let Ok(mut viewer) = viewer.try_borrow_mut()
        {
            viewer.report_progress(ticket, progress);
        }
    };
    let result = loader.load(source, fetcher, &mut on_progress).await;

    match core.upgrade() {
        Some(viewer) => match viewer.try_borrow_mut() {
            Ok(mut viewer) => viewer.finish_load(ticket, result),
            Err(_) => {
                log::warn!("viewer busy when load completed; dropping result");
                LoadOutcome::Stale
            }
        },
        None => LoadOutcome::Disposed,
    }
}
