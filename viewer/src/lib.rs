//! 3D model viewer for project case studies.
//!
//! The viewer core is backend-agnostic: it owns the session state, the scene
//! (lights plus at most one normalized model subtree), an orbit camera, the
//! animation driver and the render loop state machine, and reaches the
//! outside world only through small capability traits ([`backend::RenderBackend`],
//! [`render_loop::FrameScheduler`], [`scroll_lock::PageScroll`],
//! [`loader::AssetFetcher`], [`host::Container`]). Tests substitute fakes for
//! all of them. The `web` feature supplies the browser implementations and a
//! Canvas2D renderer, compiled to WebAssembly.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`host`] | Viewer host: mount, resize, load lifecycle, input, dispose |
//! | [`session`] | Per-viewer UI-facing state (loading, error, playback) |
//! | [`loader`] | Format detection, fetch, parse, normalization |
//! | [`format`] | Supported model formats and their file-name/MIME rules |
//! | [`model`] | Parsed model subtree and bounding-box normalization |
//! | [`placeholder`] | Project-coloured fallback cube |
//! | [`controls`] | Orbit controls: drag, zoom clamp, damping, auto-rotate |
//! | [`animation`] | Clip mixer advanced once per frame |
//! | [`render_loop`] | Idle → Running → Stopped frame scheduling |
//! | [`scroll_lock`] | Reference-counted page scroll lock |
//! | [`scene`] | Background, standard lights and the attached model |
//! | [`backend`] | Rendering capability trait and surface types |
//! | [`camera`] | Perspective camera and projection |
//! | [`math`] | Bounding boxes and colours |
//! | [`consts`] | Design constants (target size, camera, lights, timings) |
//! | [`render`] | Shaded draw list; Canvas2D drawing under the `web` feature |
//! | `web` | DOM glue and the exported `mount_viewer` entry point (`web` feature) |

pub mod animation;
pub mod backend;
pub mod camera;
pub mod consts;
pub mod controls;
pub mod format;
pub mod host;
pub mod loader;
pub mod math;
pub mod model;
pub mod placeholder;
pub mod render;
pub mod render_loop;
pub mod scene;
pub mod scroll_lock;
pub mod session;

#[cfg(feature = "web")]
pub mod web;

pub use format::ModelFormat;
pub use host::{Container, LoadOutcome, LoadTicket, ViewerConfig, ViewerCore};
pub use loader::{LoadError, ModelLoader, ModelSource};
pub use model::ModelSubtree;
