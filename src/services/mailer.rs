use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::MailRelaySettings;
use crate::errors::MailError;
use crate::models::WarningRecord;

/// Outbound mail relay used for negative-balance warnings.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, warning: &WarningRecord) -> Result<(), MailError>;
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TemplateParams {
    pub employee_id: i64,
    pub employee_name: String,
    pub to_email: String,
    pub remaining_days: i64,
    pub leave_type: String,
}

impl From<&WarningRecord> for TemplateParams {
    fn from(warning: &WarningRecord) -> Self {
        TemplateParams {
            employee_id: warning.employee_id,
            employee_name: warning.employee_name.clone(),
            to_email: warning.email.clone(),
            remaining_days: warning.remaining,
            leave_type: warning.leave_type.clone(),
        }
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams,
}

/// EmailJS REST relay (`POST /api/v1.0/email/send`).
pub struct EmailJsRelay {
    client: reqwest::Client,
    settings: Option<MailRelaySettings>,
}

impl EmailJsRelay {
    pub fn new(client: reqwest::Client, settings: Option<MailRelaySettings>) -> Self {
        EmailJsRelay { client, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_some()
    }
}

#[async_trait]
impl MailRelay for EmailJsRelay {
    async fn send(&self, warning: &WarningRecord) -> Result<(), MailError> {
        let settings = self.settings.as_ref().ok_or(MailError::NotConfigured)?;

        let request = SendRequest {
            service_id: &settings.service_id,
            template_id: &settings.template_id,
            user_id: &settings.public_key,
            template_params: TemplateParams::from(warning),
        };

        let response = self.client.post(&settings.url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }

        debug!("Warning mail accepted for {}", warning.email);
        Ok(())
    }
}
