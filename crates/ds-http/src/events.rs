use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle events published by the refresh coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A renewal succeeded and the store holds a fresh access token.
    TokenRenewed,
    /// A renewal failed and the store was cleared; the user must sign in again.
    SessionExpired { reason: String },
}

pub(crate) fn channel() -> broadcast::Sender<AuthEvent> {
    let (tx, _) = broadcast::channel(EVENT_CAPACITY);
    tx
}
