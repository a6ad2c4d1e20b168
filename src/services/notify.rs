use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NotificationReport, WarningRecord};
use crate::services::mailer::MailRelay;

#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    pub warning: WarningRecord,
    pub delivered: bool,
    pub attempted: usize,
    pub succeeded: usize,
}

/// Sends one warning mail per step, in order. A failed send is counted and the batch
/// moves on to the next recipient.
pub struct NotificationBatch<'a, M: MailRelay + ?Sized> {
    relay: &'a M,
    pending: std::vec::IntoIter<WarningRecord>,
    batch_id: Uuid,
    total: usize,
    attempted: usize,
    succeeded: usize,
}

impl<'a, M: MailRelay + ?Sized> NotificationBatch<'a, M> {
    pub fn new(relay: &'a M, warnings: Vec<WarningRecord>) -> Self {
        NotificationBatch {
            relay,
            total: warnings.len(),
            pending: warnings.into_iter(),
            batch_id: Uuid::new_v4(),
            attempted: 0,
            succeeded: 0,
        }
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub async fn next(&mut self) -> Option<SendOutcome> {
        let warning = self.pending.next()?;
        self.attempted += 1;

        let delivered = match self.relay.send(&warning).await {
            Ok(()) => {
                self.succeeded += 1;
                true
            }
            Err(err) => {
                warn!(
                    "Warning mail to {} (employee {}) failed: {}",
                    warning.email, warning.employee_id, err
                );
                false
            }
        };

        Some(SendOutcome {
            warning,
            delivered,
            attempted: self.attempted,
            succeeded: self.succeeded,
        })
    }

    pub fn report(&self) -> NotificationReport {
        NotificationReport {
            batch_id: self.batch_id,
            succeeded: self.succeeded,
            total: self.total,
        }
    }

    pub async fn run(mut self) -> NotificationReport {
        while self.next().await.is_some() {}
        let report = self.report();
        info!(
            "Notification batch {} finished: {}/{}",
            report.batch_id, report.succeeded, report.total
        );
        report
    }
}
