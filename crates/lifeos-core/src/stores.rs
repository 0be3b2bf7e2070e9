//! Small pieces of client-side state shared across commands.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::CaptureApi;
use crate::error::CoreError;
use crate::models::{Capture, NewCapture};

pub const CAPTURE_FAILED: &str = "Failed to save capture. Please try again.";

/// Quick-capture dialog: a draft that is sent to the inbox on submit.
#[derive(Debug, Default)]
pub struct CaptureModal {
    is_open: bool,
    is_submitting: bool,
    draft: String,
}

impl CaptureModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Close and discard the draft, unless a submit is in flight.
    pub fn close(&mut self) -> bool {
        if self.is_submitting {
            return false;
        }
        self.is_open = false;
        self.draft.clear();
        true
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn can_submit(&self) -> bool {
        self.is_open && !self.is_submitting && !self.draft.trim().is_empty()
    }

    pub async fn submit<B: CaptureApi + Send + Sync>(
        &mut self,
        backend: &B,
        source: &str,
    ) -> Result<Capture, CoreError> {
        if self.is_submitting {
            return Err(CoreError::Busy);
        }
        let data = NewCapture::new(&self.draft, source)?;

        self.is_submitting = true;
        let result = backend.create_capture(data).await;
        self.is_submitting = false;

        let capture = result.map_err(|err| err.with_context(CAPTURE_FAILED))?;
        info!(id = %capture.id, "captured");
        self.close();
        Ok(capture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerSnapshot {
    pub session_id: Option<Uuid>,
    pub elapsed_seconds: u64,
    pub is_running: bool,
}

#[derive(Default)]
struct TimerState {
    snapshot: TimerSnapshot,
    ticker: Option<JoinHandle<()>>,
}

/// Elapsed-time counter for the active workout session.
///
/// `start` spawns a ticker on the current tokio runtime that calls `tick`
/// once per second until `stop`. Clones share one timer. The ticker holds a
/// weak handle and exits once every clone is dropped.
#[derive(Clone, Default)]
pub struct WorkoutTimer {
    state: Arc<Mutex<TimerState>>,
}

impl WorkoutTimer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self, session_id: Uuid) {
        self.resume(session_id, 0);
    }

    /// Start counting from `elapsed_seconds`, replacing any running ticker.
    pub fn resume(&self, session_id: Uuid, elapsed_seconds: u64) {
        let weak = Arc::downgrade(&self.state);
        let ticker = tokio::spawn(run_ticker(weak));

        let mut state = self.lock();
        if let Some(previous) = state.ticker.replace(ticker) {
            previous.abort();
        }
        state.snapshot = TimerSnapshot {
            session_id: Some(session_id),
            elapsed_seconds,
            is_running: true,
        };
        debug!(%session_id, elapsed_seconds, "workout timer started");
    }

    pub fn tick(&self) {
        self.lock().snapshot.elapsed_seconds += 1;
    }

    /// Stop ticking; the elapsed count is kept for display.
    pub fn stop(&self) {
        let mut state = self.lock();
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        state.snapshot.session_id = None;
        state.snapshot.is_running = false;
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock().snapshot
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.lock().snapshot.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.lock().snapshot.is_running
    }
}

async fn run_ticker(state: Weak<Mutex<TimerState>>) {
    let mut clock = interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    clock.tick().await;
    loop {
        clock.tick().await;
        let Some(state) = state.upgrade() else {
            break;
        };
        WorkoutTimer { state }.tick();
    }
}

/// `75` -> `1:15`, `3725` -> `1:02:05`
pub fn format_elapsed(seconds: u64) -> String {
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
