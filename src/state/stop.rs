use tokio::sync::watch;

/// Creates a linked stop handle and signal
///
/// The supervisor keeps the [`StopHandle`]; workers and the emitter each get
/// a clone of the [`StopSignal`].
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Sending half of the cooperative stop signal
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Signals every holder of a [`StopSignal`]; idempotent
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half of the cooperative stop signal
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once a stop has been signalled
    ///
    /// Also resolves if the handle was dropped, since nothing can then
    /// coordinate the crawl any more.
    pub async fn stopped(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}
