//! Cooperative cancellation for in-flight generation requests.

use tokio::sync::watch;

/// Triggers cancellation of every [`AbortSignal`] created alongside it.
#[derive(Debug)]
pub struct AbortHandle {
    sender: watch::Sender<bool>,
}

/// Observes whether the paired [`AbortHandle`] has fired.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    receiver: watch::Receiver<bool>,
}

/// Creates a connected handle and signal.
pub fn abort_pair() -> (AbortHandle, AbortSignal) {
    let (sender, receiver) = watch::channel(false);
    (AbortHandle { sender }, AbortSignal { receiver })
}

impl AbortHandle {
    pub fn abort(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.sender.borrow()
    }
}

impl AbortSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_aborted(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once the handle fires. Pends forever if the handle is dropped
    /// without firing.
    pub async fn aborted(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|aborted| *aborted).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::never()
    }
}
