//! Per-viewer state exposed to the page: loading flag, error message,
//! playback and pointer status, load progress.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSession {
    pub loading: bool,
    pub error: Option<String>,
    pub has_animations: bool,
    pub playing: bool,
    /// Idle auto-rotation is switched on.
    pub auto_rotate: bool,
    /// A drag gesture is in progress.
    pub interacting: bool,
    /// The pointer is over the canvas.
    pub hovering: bool,
    /// Last reported load progress in `[0, 1]`, when the total is known.
    pub progress: Option<f32>,
}

impl ViewerSession {
    pub(crate) fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
        self.progress = None;
    }

    pub(crate) fn model_ready(&mut self, has_animations: bool, playing: bool) {
        self.loading = false;
        self.progress = Some(1.0);
        self.has_animations = has_animations;
        self.playing = has_animations && playing;
    }

    pub(crate) fn load_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}
