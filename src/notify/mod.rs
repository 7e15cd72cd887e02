//! Out-of-band leave notifications.
//!
//! Lifecycle transitions hand a [`Notification`] to the [`Notifier`] and
//! return immediately. A single [`NotificationWorker`] task drains the
//! queue, renders each job and delivers it through a [`Mailer`], retrying
//! failed deliveries. Delivery outcome is only ever logged.

pub mod mailer;

use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::model::leave_request::{LeaveCategory, LeaveStatus};
pub use mailer::{Envelope, Mailer, Outbox};

const SIGN_OFF: &str = "Regards,\nLeave Manager System";

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// New request, addressed to the reviewing faculty
    Submitted {
        recipient: String,
        student_name: String,
        class_name: Option<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
        category: LeaveCategory,
    },
    /// Approval or rejection, addressed to the student
    Decided {
        recipient: String,
        student_name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: LeaveStatus,
        comment: Option<String>,
    },
}

impl Notification {
    pub fn render(&self) -> Envelope {
        match self {
            Notification::Submitted {
                recipient,
                student_name,
                class_name,
                start_date,
                end_date,
                reason,
                category,
            } => Envelope {
                to: recipient.clone(),
                subject: format!(
                    "New Leave Request from {} ({})",
                    student_name,
                    class_name.as_deref().unwrap_or("Unknown Class")
                ),
                body: format!(
                    "Dear Faculty,\n\n\
                     A new leave request has been submitted.\n\n\
                     Student: {}\n\
                     Class: {}\n\
                     Dates: {} to {}\n\
                     Category: {}\n\
                     Reason: {}\n\n\
                     Please review this request in the leave manager portal.\n\n\
                     {}",
                    student_name,
                    class_name.as_deref().unwrap_or("N/A"),
                    start_date,
                    end_date,
                    category,
                    reason,
                    SIGN_OFF
                ),
            },
            Notification::Decided {
                recipient,
                student_name,
                start_date,
                end_date,
                status,
                comment,
            } => {
                let mut body = format!(
                    "Dear {},\n\nYour leave request from {} to {} has been {}.\n\n",
                    student_name, start_date, end_date, status
                );
                if let Some(comment) = comment.as_deref().filter(|c| !c.trim().is_empty()) {
                    body.push_str(&format!("Message from Faculty:\n{}\n\n", comment));
                }
                body.push_str("You can view the details in your student portal.\n\n");
                body.push_str(SIGN_OFF);

                Envelope {
                    to: recipient.clone(),
                    subject: format!("Leave Request {}: {} to {}", status, start_date, end_date),
                    body,
                }
            }
        }
    }
}

/// Cloneable producer side of the notification queue.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Consumer side, owned by the worker.
pub type NotificationQueue = mpsc::UnboundedReceiver<Notification>;

pub fn channel() -> (Notifier, NotificationQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, rx)
}

impl Notifier {
    /// Fire-and-forget. A stopped worker loses the job; that is logged and
    /// nothing else.
    pub fn notify(&self, job: Notification) {
        if let Err(e) = self.tx.send(job) {
            warn!(job = ?e.0, "Notification worker is gone, dropping notification");
        }
    }
}

pub struct NotificationWorker<M> {
    rx: NotificationQueue,
    mailer: M,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<M: Mailer> NotificationWorker<M> {
    pub fn new(rx: NotificationQueue, mailer: M, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            rx,
            mailer,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Runs until every [`Notifier`] has been dropped.
    pub async fn run(mut self) {
        info!("Notification worker started");
        while let Some(job) = self.rx.recv().await {
            self.dispatch(job.render()).await;
        }
        info!("Notification worker stopped");
    }

    async fn dispatch(&self, envelope: Envelope) {
        for attempt in 1..=self.max_attempts {
            match self.mailer.deliver(&envelope).await {
                Ok(()) => {
                    info!(to = %envelope.to, subject = %envelope.subject, "Notification delivered");
                    return;
                }
                Err(e) => {
                    warn!(to = %envelope.to, attempt, error = %e, "Notification delivery failed");
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay * attempt).await;
                    }
                }
            }
        }
        error!(
            to = %envelope.to,
            subject = %envelope.subject,
            attempts = self.max_attempts,
            "Giving up on notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::mailer::MailError;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingMailer {
        failures_left: Arc<Mutex<u32>>,
        attempts: Arc<Mutex<u32>>,
        delivered: Arc<Mutex<Vec<Envelope>>>,
    }

    impl RecordingMailer {
        fn failing(times: u32) -> Self {
            let mailer = Self::default();
            *mailer.failures_left.lock().unwrap() = times;
            mailer
        }
    }

    impl Mailer for RecordingMailer {
        async fn deliver(&self, envelope: &Envelope) -> Result<(), MailError> {
            *self.attempts.lock().unwrap() += 1;
            let mut failures = self.failures_left.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(MailError("smtp unavailable".into()));
            }
            self.delivered.lock().unwrap().push(envelope.clone());
            Ok(())
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn decided(comment: Option<&str>) -> Notification {
        Notification::Decided {
            recipient: "asha@college.edu".into(),
            student_name: "Asha".into(),
            start_date: date(3),
            end_date: date(4),
            status: LeaveStatus::Approved,
            comment: comment.map(str::to_string),
        }
    }

    #[test]
    fn renders_submission_for_faculty() {
        let envelope = Notification::Submitted {
            recipient: "hod@college.edu".into(),
            student_name: "Asha".into(),
            class_name: None,
            start_date: date(3),
            end_date: date(4),
            reason: "fever".into(),
            category: LeaveCategory::Medical,
        }
        .render();

        assert_eq!(envelope.to, "hod@college.edu");
        assert_eq!(envelope.subject, "New Leave Request from Asha (Unknown Class)");
        assert!(envelope.body.contains("Dates: 2026-02-03 to 2026-02-04"));
        assert!(envelope.body.contains("Category: MEDICAL"));
    }

    #[test]
    fn renders_decision_with_optional_comment() {
        let with = decided(Some("Get well soon")).render();
        assert_eq!(with.subject, "Leave Request APPROVED: 2026-02-03 to 2026-02-04");
        assert!(with.body.contains("Message from Faculty:\nGet well soon"));

        let without = decided(None).render();
        assert!(!without.body.contains("Message from Faculty"));
    }

    #[actix_web::test]
    async fn worker_retries_until_delivered() {
        let (notifier, queue) = channel();
        let mailer = RecordingMailer::failing(2);
        let worker = NotificationWorker::new(queue, mailer.clone(), 3, Duration::ZERO);

        notifier.notify(decided(None));
        drop(notifier);
        worker.run().await;

        assert_eq!(*mailer.attempts.lock().unwrap(), 3);
        assert_eq!(mailer.delivered.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn worker_gives_up_and_moves_on() {
        let (notifier, queue) = channel();
        let mailer = RecordingMailer::failing(2);
        let worker = NotificationWorker::new(queue, mailer.clone(), 2, Duration::ZERO);

        notifier.notify(decided(Some("first")));
        notifier.notify(decided(Some("second")));
        drop(notifier);
        worker.run().await;

        let delivered = mailer.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].body.contains("second"));
    }

    #[test]
    fn notify_after_worker_stopped_does_not_fail() {
        let (notifier, queue) = channel();
        drop(queue);
        notifier.notify(decided(None));
    }
}
