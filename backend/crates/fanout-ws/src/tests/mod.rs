mod registration_guard;

use crate::{ConnectionHandle, ConnectionId, RegistryStats, Result, WsError};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::watch;

/// Observer side of a `RecordingHandle`, kept by the test after the handle
/// has been handed to the registry.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    received: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
    failing: Arc<AtomicBool>,
}

impl Recorder {
    pub(crate) fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Make every later push to this handle fail
    pub(crate) fn fail_pushes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

/// In-memory connection handle that records what the dispatch loop pushes
pub(crate) struct RecordingHandle {
    connection_id: ConnectionId,
    recorder: Recorder,
}

impl ConnectionHandle for RecordingHandle {
    fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    fn push(&self, payload: &Utf8Bytes) -> Result<()> {
        if self.recorder.failing.load(Ordering::SeqCst) {
            return Err(WsError::send_buffer_full());
        }
        self.recorder
            .received
            .lock()
            .unwrap()
            .push(payload.as_str().to_string());
        Ok(())
    }

    fn close(self) {
        self.recorder.closed.store(true, Ordering::SeqCst);
    }
}

pub(crate) fn recording_handle() -> (RecordingHandle, Recorder) {
    let recorder = Recorder::default();
    let handle = RecordingHandle {
        connection_id: ConnectionId::new(),
        recorder: recorder.clone(),
    };
    (handle, recorder)
}

/// Poll `condition` until it holds or a second passes
pub(crate) async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// Wait up to a second for the published registry stats to satisfy `condition`
pub(crate) async fn wait_for_stats(
    stats: &mut watch::Receiver<RegistryStats>,
    condition: impl FnMut(&RegistryStats) -> bool,
) -> bool {
    matches!(
        tokio::time::timeout(Duration::from_secs(1), stats.wait_for(condition)).await,
        Ok(Ok(_))
    )
}
