use crate::events::SubmissionEvent;
use crate::research::SubmissionStage;
use crate::utils::submission_log::SubmissionLog;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// Fans progress out to the event channel, the diagnostic log and `tracing`.
///
/// A closed channel is ignored: a client that went away does not stop the work.
pub struct ProgressReporter {
    events: Option<UnboundedSender<SubmissionEvent>>,
    log: SubmissionLog,
}

impl ProgressReporter {
    pub fn new(events: Option<UnboundedSender<SubmissionEvent>>, log: SubmissionLog) -> Self {
        Self { events, log }
    }

    pub fn log(&self) -> &SubmissionLog {
        &self.log
    }

    pub fn progress(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.log.record(&message);
        if let Some(tx) = &self.events {
            let _ = tx.send(SubmissionEvent::Progress(message));
        }
    }

    /// Announce a state transition
    pub fn stage(&self, stage: SubmissionStage, message: impl Into<String>) {
        let message = message.into();
        self.log.record(&format!("stage={}", stage));
        self.progress(message);
    }

    /// Log-only: truncated payload sent to the generation backend
    pub fn snippet(&self, label: &str, text: &str) {
        self.log.record_snippet(label, text);
    }

    /// Record the terminal outcome and deliver it. Returns false when nobody
    /// is listening.
    pub fn finish(&self, event: SubmissionEvent) -> bool {
        match &event {
            SubmissionEvent::Result(result) => {
                self.log.record(&format!("done: {} topic(s)", result.len()))
            }
            SubmissionEvent::Failure(message) => self.log.record(&format!("failed: {}", message)),
            SubmissionEvent::Progress(_) => {}
        }
        match &self.events {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}
