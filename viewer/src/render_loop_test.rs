#![allow(clippy::float_cmp)]

use super::*;

#[derive(Debug, Default)]
struct FakeScheduler {
    next: u32,
    requested: Vec<u32>,
    cancelled: Vec<u32>,
    refuse: bool,
}

impl FrameScheduler for FakeScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        if self.refuse {
            return None;
        }
        self.next += 1;
        self.requested.push(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.cancelled.push(handle);
    }
}

#[test]
fn new_loop_is_idle_and_ignores_frames() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    assert_eq!(lp.state(), LoopState::Idle);
    assert_eq!(lp.on_frame(16.0), None);
    assert!(lp.scheduler().requested.is_empty());
}

#[test]
fn start_requests_first_frame() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    assert!(lp.start());
    assert_eq!(lp.state(), LoopState::Running);
    assert!(lp.has_pending_frame());
    assert_eq!(lp.scheduler().requested, vec![1]);
}

#[test]
fn start_twice_is_rejected() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    assert!(lp.start());
    assert!(!lp.start());
    assert_eq!(lp.scheduler().requested.len(), 1);
}

#[test]
fn first_frame_uses_nominal_delta() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    assert_eq!(lp.on_frame(1_000.0), Some(NOMINAL_FRAME_SECS));
}

#[test]
fn later_frames_use_measured_delta() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    lp.on_frame(1_000.0);
    let delta = lp.on_frame(1_033.0).unwrap_or_default();
    assert!((delta - 0.033).abs() < 1e-4);
}

#[test]
fn long_gap_is_clamped() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    lp.on_frame(0.0);
    assert_eq!(lp.on_frame(10_000.0), Some(MAX_FRAME_SECS));
}

#[test]
fn backwards_clock_gives_zero_delta() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    lp.on_frame(100.0);
    assert_eq!(lp.on_frame(50.0), Some(0.0));
}

#[test]
fn each_frame_requests_the_next() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    lp.on_frame(0.0);
    lp.on_frame(16.0);
    assert_eq!(lp.scheduler().requested, vec![1, 2, 3]);
    assert_eq!(lp.frames(), 2);
}

#[test]
fn stop_cancels_pending_frame() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    lp.on_frame(0.0);
    lp.stop();
    assert_eq!(lp.state(), LoopState::Stopped);
    assert!(!lp.has_pending_frame());
    assert_eq!(lp.scheduler().cancelled, vec![2]);
}

#[test]
fn frame_after_stop_does_nothing() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    lp.stop();
    assert_eq!(lp.on_frame(16.0), None);
    assert_eq!(lp.scheduler().requested, vec![1]);
    assert_eq!(lp.frames(), 0);
}

#[test]
fn stop_twice_cancels_once() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.start();
    lp.stop();
    lp.stop();
    assert_eq!(lp.scheduler().cancelled, vec![1]);
}

#[test]
fn no_restart_after_stop() {
    let mut lp = RenderLoop::new(FakeScheduler::default());
    lp.stop();
    assert!(!lp.start());
    assert_eq!(lp.state(), LoopState::Stopped);
}

#[test]
fn refused_request_stops_loop() {
    let mut lp = RenderLoop::new(FakeScheduler { refuse: true, ..FakeScheduler::default() });
    assert!(!lp.start());
    assert_eq!(lp.state(), LoopState::Stopped);
}
