use std::path::Path;

use tracing::{error, info, info_span, Instrument};

use crate::models::{LeaveRecord, NotificationReport, UploadReceipt};
use crate::services::api::{LeaveApi, UploadFile};
use crate::services::mailer::MailRelay;
use crate::services::notify::NotificationBatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    Uploading,
    Uploaded,
    Notifying,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub stage: UploadStage,
    pub receipt: Option<UploadReceipt>,
    /// Fresh history when the post-upload refresh succeeded.
    pub history: Option<Vec<LeaveRecord>>,
    pub notification: Option<NotificationReport>,
    pub error: Option<String>,
    pub trail: Vec<UploadStage>,
}

impl UploadOutcome {
    fn start() -> Self {
        UploadOutcome {
            stage: UploadStage::Idle,
            receipt: None,
            history: None,
            notification: None,
            error: None,
            trail: vec![UploadStage::Idle],
        }
    }

    fn advance(&mut self, stage: UploadStage) {
        info!("Upload workflow: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        self.trail.push(stage);
    }

    fn fail(mut self, message: String) -> Self {
        error!("Upload workflow failed in {:?}: {}", self.stage, message);
        self.error = Some(message);
        self.advance(UploadStage::Failed);
        self
    }

    /// Lines shown to the user, in the order the events happened.
    pub fn messages(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(receipt) = &self.receipt {
            lines.push(receipt.message.clone());
        }
        if self.stage == UploadStage::Failed {
            lines.push("Upload failed".to_string());
        }
        if let Some(report) = self.notification.as_ref().filter(|r| r.total > 0) {
            lines.push(report.message());
        }
        lines
    }
}

/// Upload, refresh history, fetch warnings, then mail each warned employee in turn.
/// Without a selected file nothing happens and the outcome stays `Idle`.
pub async fn upload_and_notify<A, M>(api: &A, relay: &M, file: Option<&Path>) -> UploadOutcome
where
    A: LeaveApi + ?Sized,
    M: MailRelay + ?Sized,
{
    let mut outcome = UploadOutcome::start();

    let Some(path) = file else {
        return outcome;
    };

    outcome.advance(UploadStage::Uploading);

    let upload = match UploadFile::read(path).await {
        Ok(upload) => upload,
        Err(err) => return outcome.fail(format!("{}: {}", path.display(), err)),
    };
    info!("Uploading {} ({} bytes)", upload.file_name, upload.bytes.len());

    let receipt = match api.upload(upload).await {
        Ok(receipt) => receipt,
        Err(err) => return outcome.fail(err.to_string()),
    };
    if !receipt.accepted() {
        info!("Server rejected upload ({}): {}", receipt.status, receipt.message);
    }
    outcome.receipt = Some(receipt);
    outcome.advance(UploadStage::Uploaded);

    match api.fetch_history().await {
        Ok(history) => outcome.history = Some(history),
        Err(err) => error!("History refresh after upload failed: {}", err),
    }

    outcome.advance(UploadStage::Notifying);
    let warnings = match api.fetch_warnings().await {
        Ok(warnings) => warnings,
        Err(err) => return outcome.fail(err.to_string()),
    };

    let batch = NotificationBatch::new(relay, warnings);
    let span = info_span!("notify", batch_id = %batch.batch_id(), total = batch.total());
    let report = batch.run().instrument(span).await;
    outcome.notification = Some(report);
    outcome.advance(UploadStage::Done);

    outcome
}
