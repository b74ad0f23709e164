//! Scan session lifecycle and the camera device seam.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ScanError;

/// Boxed future returned by [`ScanDevice`] methods, keeping the trait
/// object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Abstract camera input device.
///
/// The platform capture layer implements this trait; frame grabbing and
/// symbol decoding happen on its side. It delivers one decoded string per
/// recognized symbol per frame and may repeat values freely — repeat
/// filtering is the session's job.
pub trait ScanDevice: Send + Sync {
    /// Begins frame capture and returns the raw detection channel.
    ///
    /// Fails with [`ScanError::DeviceUnavailable`] when the camera cannot
    /// be acquired.
    fn open(&self) -> BoxFuture<'_, Result<mpsc::Receiver<String>, ScanError>>;

    /// Ceases frame capture. Must tolerate being called when not open.
    fn close(&self) -> BoxFuture<'_, ()>;

    /// Switches the torch on or off.
    fn set_torch(&self, on: bool) -> BoxFuture<'_, Result<(), ScanError>>;
}

struct SessionState {
    running: bool,
    cancel: Option<CancellationToken>,
    /// Bumped on every `start`; a pump only tears down state belonging to
    /// its own run, so a quick stop/start cannot be clobbered by the old
    /// pump's cleanup.
    epoch: u64,
    /// Every code emitted so far in this session's lifetime. Survives
    /// stop/start so a restarted session never re-emits a value.
    seen: HashSet<String>,
}

/// One camera-based decoding lifecycle, from start to stop.
///
/// Decoded codes are delivered on a single-consumer channel taken once via
/// [`take_codes`](Self::take_codes), so the consumer never observes
/// overlapping deliveries.
pub struct ScanSession {
    device: Arc<dyn ScanDevice>,
    inner: Arc<Mutex<SessionState>>,
    codes_tx: mpsc::Sender<String>,
    codes_rx: Mutex<Option<mpsc::Receiver<String>>>,
}

impl ScanSession {
    /// Creates an idle session over the given device.
    pub fn new(device: Arc<dyn ScanDevice>) -> Self {
        let (codes_tx, codes_rx) = mpsc::channel(64);
        Self {
            device,
            inner: Arc::new(Mutex::new(SessionState {
                running: false,
                cancel: None,
                epoch: 0,
                seen: HashSet::new(),
            })),
            codes_tx,
            codes_rx: Mutex::new(Some(codes_rx)),
        }
    }

    /// Takes the decoded-code receiver. Can only be called once.
    pub async fn take_codes(&self) -> Option<mpsc::Receiver<String>> {
        self.codes_rx.lock().await.take()
    }

    /// Begins reading frames. Safe to call when already running (no-op).
    ///
    /// On [`ScanError::DeviceUnavailable`] the session remains idle; there
    /// is no automatic retry.
    pub async fn start(&self) -> Result<(), ScanError> {
        let mut state = self.inner.lock().await;
        if state.running {
            debug!("scan session already running");
            return Ok(());
        }

        let raw_rx = self.device.open().await?;

        let cancel = CancellationToken::new();
        state.running = true;
        state.cancel = Some(cancel.clone());
        state.epoch += 1;
        let epoch = state.epoch;
        drop(state);

        let inner = Arc::clone(&self.inner);
        let codes_tx = self.codes_tx.clone();
        tokio::spawn(async move {
            pump(raw_rx, cancel, epoch, inner, codes_tx).await;
        });

        info!("scan session started");
        Ok(())
    }

    /// Ceases reading frames. Safe to call when already idle (no-op).
    ///
    /// Only frame delivery is cancelled; a code already handed to the
    /// consumer keeps whatever processing it triggered.
    pub async fn stop(&self) {
        let mut state = self.inner.lock().await;
        if !state.running {
            return;
        }
        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
        }
        state.running = false;
        drop(state);

        self.device.close().await;
        info!("scan session stopped");
    }

    /// Switches the torch. A side operation: the scanning state is
    /// unchanged whether it succeeds or fails.
    pub async fn toggle_torch(&self, on: bool) -> Result<(), ScanError> {
        self.device.set_torch(on).await
    }

    /// Returns whether the session is currently reading frames.
    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.running
    }
}

/// Forwards fresh detections to the consumer until cancelled or the device
/// channel closes.
async fn pump(
    mut raw_rx: mpsc::Receiver<String>,
    cancel: CancellationToken,
    epoch: u64,
    inner: Arc<Mutex<SessionState>>,
    codes_tx: mpsc::Sender<String>,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            detection = raw_rx.recv() => {
                let Some(code) = detection else {
                    debug!("device detection channel closed");
                    break;
                };
                let fresh = inner.lock().await.seen.insert(code.clone());
                if !fresh {
                    debug!(%code, "duplicate detection suppressed");
                    continue;
                }
                if codes_tx.send(code).await.is_err() {
                    // Consumer dropped the receiver; nothing left to feed.
                    break;
                }
            }
        }
    }

    let mut state = inner.lock().await;
    if state.epoch == epoch {
        state.running = false;
        state.cancel = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// Scripted camera device: tests feed detections through `emit`.
    struct ScriptedDevice {
        sender: Mutex<Option<mpsc::Sender<String>>>,
        fail_open: bool,
        fail_torch: bool,
        open_count: AtomicUsize,
        close_count: AtomicUsize,
        torch_calls: std::sync::Mutex<Vec<bool>>,
    }

    impl ScriptedDevice {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sender: Mutex::new(None),
                fail_open: false,
                fail_torch: false,
                open_count: AtomicUsize::new(0),
                close_count: AtomicUsize::new(0),
                torch_calls: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                sender: Mutex::new(None),
                fail_open: true,
                fail_torch: false,
                open_count: AtomicUsize::new(0),
                close_count: AtomicUsize::new(0),
                torch_calls: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn torch_broken() -> Arc<Self> {
            Arc::new(Self {
                sender: Mutex::new(None),
                fail_open: false,
                fail_torch: true,
                open_count: AtomicUsize::new(0),
                close_count: AtomicUsize::new(0),
                torch_calls: std::sync::Mutex::new(Vec::new()),
            })
        }

        async fn emit(&self, code: &str) {
            let sender = self.sender.lock().await;
            sender
                .as_ref()
                .expect("device not open")
                .send(code.to_string())
                .await
                .unwrap();
        }
    }

    impl ScanDevice for ScriptedDevice {
        fn open(&self) -> BoxFuture<'_, Result<mpsc::Receiver<String>, ScanError>> {
            Box::pin(async move {
                if self.fail_open {
                    return Err(ScanError::DeviceUnavailable("no capture device".into()));
                }
                self.open_count.fetch_add(1, Ordering::SeqCst);
                let (tx, rx) = mpsc::channel(64);
                *self.sender.lock().await = Some(tx);
                Ok(rx)
            })
        }

        fn close(&self) -> BoxFuture<'_, ()> {
            Box::pin(async move {
                self.close_count.fetch_add(1, Ordering::SeqCst);
                *self.sender.lock().await = None;
            })
        }

        fn set_torch(&self, on: bool) -> BoxFuture<'_, Result<(), ScanError>> {
            self.torch_calls.lock().unwrap().push(on);
            Box::pin(async move {
                if self.fail_torch {
                    return Err(ScanError::Torch("torch hardware fault".into()));
                }
                Ok(())
            })
        }
    }

    async fn recv_code(rx: &mut mpsc::Receiver<String>) -> String {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for code")
            .expect("code channel closed")
    }

    #[tokio::test]
    async fn emits_each_value_once_per_session() {
        let device = ScriptedDevice::new();
        let session = ScanSession::new(device.clone());
        let mut codes = session.take_codes().await.unwrap();

        session.start().await.unwrap();
        device.emit("QR1").await;
        device.emit("QR1").await;
        device.emit("QR2").await;
        device.emit("QR1").await;

        assert_eq!(recv_code(&mut codes).await, "QR1");
        assert_eq!(recv_code(&mut codes).await, "QR2");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(codes.try_recv().is_err());
    }

    #[tokio::test]
    async fn dedup_survives_stop_and_restart() {
        let device = ScriptedDevice::new();
        let session = ScanSession::new(device.clone());
        let mut codes = session.take_codes().await.unwrap();

        session.start().await.unwrap();
        device.emit("QR1").await;
        assert_eq!(recv_code(&mut codes).await, "QR1");

        session.stop().await;
        session.start().await.unwrap();
        device.emit("QR1").await;
        device.emit("QR2").await;

        // QR1 was already emitted earlier in this session's lifetime.
        assert_eq!(recv_code(&mut codes).await, "QR2");
    }

    #[tokio::test]
    async fn start_when_running_is_noop() {
        let device = ScriptedDevice::new();
        let session = ScanSession::new(device.clone());

        session.start().await.unwrap();
        session.start().await.unwrap();

        assert!(session.is_running().await);
        assert_eq!(device.open_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_when_idle_is_noop() {
        let device = ScriptedDevice::new();
        let session = ScanSession::new(device.clone());

        session.stop().await;
        assert!(!session.is_running().await);
        assert_eq!(device.close_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unavailable_device_leaves_session_idle() {
        let device = ScriptedDevice::broken();
        let session = ScanSession::new(device.clone());

        let result = session.start().await;
        assert!(matches!(result, Err(ScanError::DeviceUnavailable(_))));
        assert!(!session.is_running().await);
    }

    #[tokio::test]
    async fn stop_cancels_frame_delivery() {
        let device = ScriptedDevice::new();
        let session = ScanSession::new(device.clone());
        let mut codes = session.take_codes().await.unwrap();

        session.start().await.unwrap();
        device.emit("QR1").await;
        assert_eq!(recv_code(&mut codes).await, "QR1");

        session.stop().await;
        assert!(!session.is_running().await);
        assert_eq!(device.close_count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(codes.try_recv().is_err());
    }

    #[tokio::test]
    async fn torch_toggle_does_not_change_state() {
        let device = ScriptedDevice::new();
        let session = ScanSession::new(device.clone());

        session.start().await.unwrap();
        session.toggle_torch(true).await.unwrap();
        assert!(session.is_running().await);
        session.toggle_torch(false).await.unwrap();
        assert!(session.is_running().await);

        assert_eq!(*device.torch_calls.lock().unwrap(), vec![true, false]);
    }

    #[tokio::test]
    async fn torch_failure_does_not_change_state() {
        let device = ScriptedDevice::torch_broken();
        let session = ScanSession::new(device.clone());
        let mut codes = session.take_codes().await.unwrap();

        session.start().await.unwrap();
        let result = session.toggle_torch(true).await;
        assert!(matches!(result, Err(ScanError::Torch(_))));

        // Scanning is unaffected by the failed side operation.
        assert!(session.is_running().await);
        device.emit("QR1").await;
        assert_eq!(recv_code(&mut codes).await, "QR1");
    }

    #[tokio::test]
    async fn take_codes_once() {
        let device = ScriptedDevice::new();
        let session = ScanSession::new(device);

        assert!(session.take_codes().await.is_some());
        assert!(session.take_codes().await.is_none());
    }
}
