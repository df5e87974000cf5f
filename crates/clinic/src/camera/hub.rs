//! The shared camera slot.
//!
//! The server has one camera. [`CameraHub`] owns whichever loop is running,
//! hands frame receivers to viewers, and remembers why the last loop failed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Bytes;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::CameraError;
use super::capture::{CameraLoop, StopHandle};
use super::pose::PoseEstimator;
use super::source::FrameSource;

/// Latest encoded frame; `None` until the first frame is published.
///
/// `changed()` fails once the loop has ended.
pub type FrameReceiver = watch::Receiver<Option<Bytes>>;

/// What the Video page should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraStatus {
    Idle,
    Running,
    /// Stop was requested; the loop still holds the device until its
    /// current read returns.
    Stopping,
    /// The last loop ended on an error.
    Failed(String),
}

/// Result of a start request that did not fail to open the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Another loop still holds the camera, or is being opened.
    Busy,
}

/// Single-camera slot shared across requests.
#[derive(Clone, Default)]
pub struct CameraHub {
    inner: Arc<Mutex<HubState>>,
}

#[derive(Default)]
struct HubState {
    /// Kept until its task finishes, even after a stop request.
    running: Option<RunningCamera>,
    /// A start is opening the device.
    opening: bool,
    /// Bumped on every start; only the current loop may set `last_error`.
    generation: u64,
    last_error: Option<String>,
}

struct RunningCamera {
    stop: StopHandle,
    frames: FrameReceiver,
    task: JoinHandle<()>,
}

impl RunningCamera {
    fn is_live(&self) -> bool {
        !self.task.is_finished()
    }

    fn is_streaming(&self) -> bool {
        self.is_live() && !self.stop.should_stop()
    }
}

/// Clears the `opening` reservation however the start ends.
struct OpeningGuard<'a> {
    hub: &'a CameraHub,
}

impl Drop for OpeningGuard<'_> {
    fn drop(&mut self) {
        self.hub.state().opening = false;
    }
}

impl CameraHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HubState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a device with `open` and start a loop on it.
    ///
    /// The slot is reserved before `open` runs, so the device is never opened
    /// while a previous loop (even a stopping one) still holds it.
    ///
    /// # Errors
    ///
    /// Returns the error from `open`; the slot is left empty.
    pub async fn start<F>(
        &self,
        open: F,
        estimator: Box<dyn PoseEstimator>,
    ) -> Result<StartOutcome, CameraError>
    where
        F: FnOnce() -> Result<Box<dyn FrameSource>, CameraError> + Send + 'static,
    {
        let generation = {
            let mut state = self.state();
            if state.opening || state.running.as_ref().is_some_and(RunningCamera::is_live) {
                return Ok(StartOutcome::Busy);
            }
            state.opening = true;
            state.generation += 1;
            state.generation
        };
        let _opening = OpeningGuard { hub: self };

        let source = tokio::task::spawn_blocking(open)
            .await
            .map_err(|e| CameraError::DeviceUnavailable(e.to_string()))??;

        let stop = StopHandle::new();
        let (publish, frames) = watch::channel(None);
        let camera_loop = CameraLoop::new(source, estimator, stop.clone(), publish);
        let hub = Arc::clone(&self.inner);
        let loop_stop = stop.clone();

        let task = tokio::task::spawn_blocking(move || match camera_loop.run() {
            Ok(exit) => tracing::info!(frames = exit.frames, "Camera stopped"),
            Err(e) if loop_stop.should_stop() => {
                tracing::info!(error = %e, "Camera failed after stop was requested");
            }
            Err(e) => {
                tracing::error!(error = %e, "Camera loop failed");
                let mut state = hub.lock().unwrap_or_else(PoisonError::into_inner);
                if state.generation == generation {
                    state.last_error = Some(e.to_string());
                }
            }
        });

        {
            let mut state = self.state();
            state.last_error = None;
            state.running = Some(RunningCamera { stop, frames, task });
        }
        tracing::info!(generation, "Camera started");
        Ok(StartOutcome::Started)
    }

    /// Signal the running loop to stop. Returns `false` if none was streaming.
    ///
    /// The loop keeps the slot until it has released the device.
    pub fn stop(&self) -> bool {
        let state = self.state();
        match state.running.as_ref().filter(|running| running.is_streaming()) {
            Some(running) => {
                running.stop.stop();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn status(&self) -> CameraStatus {
        let state = self.state();
        match &state.running {
            Some(running) if running.is_streaming() => CameraStatus::Running,
            Some(running) if running.is_live() => CameraStatus::Stopping,
            _ => state
                .last_error
                .clone()
                .map_or(CameraStatus::Idle, CameraStatus::Failed),
        }
    }

    /// A receiver for the running loop's frames.
    #[must_use]
    pub fn subscribe(&self) -> Option<FrameReceiver> {
        self.state()
            .running
            .as_ref()
            .filter(|running| running.is_streaming())
            .map(|running| running.frames.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use image::{Rgb, RgbImage};

    use super::*;
    use crate::camera::capture::tests::CountingSource;
    use crate::camera::frame::Frame;
    use crate::camera::pose::NoopEstimator;

    async fn wait_for(hub: &CameraHub, wanted: impl Fn(&CameraStatus) -> bool) -> CameraStatus {
        for _ in 0..200 {
            let status = hub.status();
            if wanted(&status) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        hub.status()
    }

    fn counting(frames: usize) -> impl FnOnce() -> Result<Box<dyn FrameSource>, CameraError> {
        move || Ok(Box::new(CountingSource::new(frames)) as Box<dyn FrameSource>)
    }

    /// Counts devices held at once; each read blocks for a while.
    #[derive(Clone, Default)]
    struct DeviceCounter {
        open: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl DeviceCounter {
        fn opener(
            self,
            fail_reads: bool,
        ) -> impl FnOnce() -> Result<Box<dyn FrameSource>, CameraError> {
            let counter = self;
            move || {
                let now = counter.open.fetch_add(1, Ordering::SeqCst) + 1;
                counter.peak.fetch_max(now, Ordering::SeqCst);
                Ok(Box::new(SlowSource { counter, fail_reads }) as Box<dyn FrameSource>)
            }
        }
    }

    struct SlowSource {
        counter: DeviceCounter,
        fail_reads: bool,
    }

    impl FrameSource for SlowSource {
        fn read(&mut self) -> Result<Frame, CameraError> {
            std::thread::sleep(Duration::from_millis(150));
            if self.fail_reads {
                return Err(CameraError::ReadFailed("device disconnected".to_string()));
            }
            Ok(Frame::rgb(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))))
        }
    }

    impl Drop for SlowSource {
        fn drop(&mut self) {
            self.counter.open.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_idle_hub_has_no_frames() {
        let hub = CameraHub::new();
        assert_eq!(hub.status(), CameraStatus::Idle);
        assert!(hub.subscribe().is_none());
        assert!(!hub.stop());
    }

    #[tokio::test]
    async fn test_failed_read_is_reported() {
        let hub = CameraHub::new();
        let outcome = hub.start(counting(2), Box::new(NoopEstimator)).await.unwrap();
        assert_eq!(outcome, StartOutcome::Started);

        let status = wait_for(&hub, |s| matches!(s, CameraStatus::Failed(_))).await;
        assert_eq!(
            status,
            CameraStatus::Failed("frame read failed: device disconnected".to_string())
        );
    }

    #[tokio::test]
    async fn test_open_failure_leaves_slot_free() {
        let hub = CameraHub::new();
        let err = hub
            .start(
                || Err(CameraError::DeviceUnavailable("no camera configured".to_string())),
                Box::new(NoopEstimator),
            )
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CameraError::DeviceUnavailable(_)));
        assert_eq!(hub.status(), CameraStatus::Idle);

        let outcome = hub.start(counting(1), Box::new(NoopEstimator)).await.unwrap();
        assert_eq!(outcome, StartOutcome::Started);
    }

    #[tokio::test]
    async fn test_stop_ends_running_loop() {
        let hub = CameraHub::new();
        let opened = hub
            .start(counting(usize::MAX), Box::new(NoopEstimator))
            .await
            .unwrap();
        assert_eq!(opened, StartOutcome::Started);

        let mut frames = hub.subscribe().unwrap();
        frames.changed().await.unwrap();
        assert!(frames.borrow().is_some());
        let again = hub.start(counting(1), Box::new(NoopEstimator)).await.unwrap();
        assert_eq!(again, StartOutcome::Busy);

        assert!(hub.stop());
        assert!(hub.subscribe().is_none());
        assert_eq!(wait_for(&hub, |s| *s == CameraStatus::Idle).await, CameraStatus::Idle);
        while frames.changed().await.is_ok() {}
    }

    #[tokio::test]
    async fn test_restart_waits_for_stopping_loop_to_release_device() {
        let hub = CameraHub::new();
        let devices = DeviceCounter::default();

        let first = hub.start(devices.clone().opener(false), Box::new(NoopEstimator)).await.unwrap();
        assert_eq!(first, StartOutcome::Started);
        assert!(hub.stop());
        assert_eq!(hub.status(), CameraStatus::Stopping);

        let second = hub.start(devices.clone().opener(false), Box::new(NoopEstimator)).await.unwrap();
        assert_eq!(second, StartOutcome::Busy);
        assert_eq!(devices.open.load(Ordering::SeqCst), 1);

        assert_eq!(wait_for(&hub, |s| *s == CameraStatus::Idle).await, CameraStatus::Idle);
        assert_eq!(devices.open.load(Ordering::SeqCst), 0);

        let third = hub.start(devices.clone().opener(false), Box::new(NoopEstimator)).await.unwrap();
        assert_eq!(third, StartOutcome::Started);
        assert_eq!(devices.peak.load(Ordering::SeqCst), 1);
        hub.stop();
    }

    #[tokio::test]
    async fn test_failure_after_stop_is_not_reported() {
        let hub = CameraHub::new();
        let devices = DeviceCounter::default();

        hub.start(devices.clone().opener(true), Box::new(NoopEstimator)).await.unwrap();
        assert!(hub.stop());

        assert_eq!(wait_for(&hub, |s| *s == CameraStatus::Idle).await, CameraStatus::Idle);
        assert_eq!(devices.open.load(Ordering::SeqCst), 0);
    }
}
