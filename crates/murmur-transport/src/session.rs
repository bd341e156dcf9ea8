use tokio::sync::mpsc;

/// Capacity of the per-upload event channel.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Events emitted over the lifetime of one upload.
///
/// The sequence is zero or more `Progress` events terminated by exactly one
/// `Completed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Progress {
        bytes_transferred: u64,
        total_bytes: u64,
    },
    Failed {
        reason: String,
    },
    Completed,
}

/// Lifecycle of one upload as tracked by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Pending,
    Transferring,
    Succeeded,
    Failed,
}

/// Handle to one in-flight upload.
///
/// Owned by the pipeline for the duration of the transfer and discarded on
/// the terminal event.  There is no cancel path: dropping the session stops
/// event delivery but the transfer task runs to completion.
pub struct UploadSession {
    key: String,
    total_bytes: u64,
    state: UploadState,
    events: mpsc::Receiver<UploadEvent>,
}

impl UploadSession {
    pub(crate) fn new(key: String, total_bytes: u64, events: mpsc::Receiver<UploadEvent>) -> Self {
        Self {
            key,
            total_bytes,
            state: UploadState::Pending,
            events,
        }
    }

    /// Object key this session uploads under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Lifecycle state as advanced by the events drained so far.
    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Next event, or `None` once the channel closes after the terminal
    /// event.
    pub async fn next_event(&mut self) -> Option<UploadEvent> {
        let event = self.events.recv().await;
        match &event {
            Some(UploadEvent::Progress { .. }) => self.state = UploadState::Transferring,
            Some(UploadEvent::Completed) => self.state = UploadState::Succeeded,
            Some(UploadEvent::Failed { .. }) => self.state = UploadState::Failed,
            None => {}
        }
        event
    }
}

/// Transfer progress as an integer percentage, clamped to 0–100.
pub fn percent(bytes_transferred: u64, total_bytes: u64) -> u8 {
    if total_bytes == 0 {
        return 100;
    }
    let pct = bytes_transferred.saturating_mul(100) / total_bytes;
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(100, 200), 50);
        assert_eq!(percent(200, 200), 100);
        assert_eq!(percent(300, 200), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn percent_rounds_down() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
    }

    #[tokio::test]
    async fn session_state_follows_events() {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut session = UploadSession::new("obj".into(), 10, rx);
        assert_eq!(session.state(), UploadState::Pending);

        tx.send(UploadEvent::Progress {
            bytes_transferred: 5,
            total_bytes: 10,
        })
        .await
        .unwrap();
        tx.send(UploadEvent::Completed).await.unwrap();
        drop(tx);

        session.next_event().await.unwrap();
        assert_eq!(session.state(), UploadState::Transferring);

        session.next_event().await.unwrap();
        assert_eq!(session.state(), UploadState::Succeeded);

        assert!(session.next_event().await.is_none());
    }

    #[tokio::test]
    async fn failed_event_marks_session_failed() {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut session = UploadSession::new("obj".into(), 10, rx);

        tx.send(UploadEvent::Failed {
            reason: "link dropped".into(),
        })
        .await
        .unwrap();
        drop(tx);

        assert!(matches!(
            session.next_event().await,
            Some(UploadEvent::Failed { .. })
        ));
        assert_eq!(session.state(), UploadState::Failed);
    }
}
