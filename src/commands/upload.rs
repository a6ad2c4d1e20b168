use std::path::Path;

use crate::services::api::LeaveApi;
use crate::services::mailer::MailRelay;
use crate::services::state::Dashboard;
use crate::services::workflow::UploadStage;

pub const FILE_FORMAT_HELP: &str = "\
Upload an .xlsx sheet whose first row is a header and whose columns are:
  Email | Leave Start Date (dd-mm-yyyy) | Leave End Date (dd-mm-yyyy)
  | Type Of Leave (Business Leave, Sick Leave, Vacation Leave) | Site (Office, WFH)";

pub async fn upload<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    path: Option<&Path>,
) -> Result<String, String> {
    let Some(path) = path else {
        return Ok(FILE_FORMAT_HELP.to_string());
    };

    let outcome = dashboard.upload_and_notify(Some(path)).await;
    let message = dashboard.take_notice().unwrap_or_default();

    if outcome.stage == UploadStage::Failed {
        let detail = outcome.error.unwrap_or_default();
        return Err(format!("{}\n{}", message, detail).trim().to_string());
    }

    Ok(message)
}
