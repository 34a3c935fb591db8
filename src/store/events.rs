//! Store-to-subscriber notification hub.
//!
//! Mutations publish a [`StoreEvent`]; interested components subscribe and
//! re-render. Delivery is lossy: a lagging or absent subscriber simply
//! misses events, mirroring how a dropped timer tick was silently lost in
//! the client.

use tokio::sync::broadcast;

use crate::sim::live_stats::LiveStats;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub enum StoreEvent {
    SessionChanged {
        user_id: Option<String>,
    },
    CourseCreated {
        course_id: String,
    },
    CourseUpdated {
        course_id: String,
    },
    CourseDeleted {
        course_id: String,
    },
    QuizSet {
        course_id: String,
    },
    EnrollmentAdded {
        user_id: String,
        course_id: String,
    },
    ProgressUpdated {
        user_id: String,
        course_id: String,
        progress_percentage: u32,
    },
    QuizAttemptSaved {
        user_id: String,
        course_id: String,
        passed: bool,
    },
    CertificateIssued {
        user_id: String,
        course_id: String,
        certificate_number: String,
    },
    NoteSaved {
        note_id: String,
    },
    NoteDeleted {
        note_id: String,
    },
    StatsTick(LiveStats),
}

#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Publish to whoever is listening. No subscribers is not an error.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe();

        hub.publish(StoreEvent::CourseCreated {
            course_id: "course-1".to_string(),
        });

        match rx.recv().await.unwrap() {
            StoreEvent::CourseCreated { course_id } => assert_eq!(course_id, "course-1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let hub = EventHub::new();
        hub.publish(StoreEvent::SessionChanged { user_id: None });
        assert_eq!(hub.subscriber_count(), 0);
    }
}
