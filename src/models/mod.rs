use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::null_as_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub leave_type_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remaining_leave_days: i64,
}

impl LeaveRecord {
    /// A negative balance is highlighted in the table and triggers a warning mail.
    pub fn is_overdrawn(&self) -> bool {
        self.remaining_leave_days < 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub employee_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_days: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sick_days: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vacation_days: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub business_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningRecord {
    #[serde(rename = "warningID", default, skip_serializing_if = "Option::is_none")]
    pub warning_id: Option<i64>,
    #[serde(rename = "EmployeeID")]
    pub employee_id: i64,
    #[serde(rename = "EmployeeName", default, deserialize_with = "null_as_default")]
    pub employee_name: String,
    #[serde(rename = "Email", default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "Remaining")]
    pub remaining: i64,
    #[serde(rename = "LeaveType", default, deserialize_with = "null_as_default")]
    pub leave_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardMode {
    History,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search_text: String,
    pub selected_month: u32,
    pub selected_year: i32,
    pub month_filter: bool,
    pub current_page: usize,
    pub summary_current_page: usize,
    pub mode: DashboardMode,
}

impl ViewState {
    pub fn new(selected_month: u32, selected_year: i32) -> Self {
        ViewState {
            search_text: String::new(),
            selected_month,
            selected_year,
            month_filter: false,
            current_page: 1,
            summary_current_page: 1,
            mode: DashboardMode::History,
        }
    }

    pub fn month_year(&self) -> MonthYear {
        MonthYear {
            month: self.selected_month,
            year: self.selected_year,
        }
    }

    pub fn reset_pages(&mut self) {
        self.current_page = 1;
        self.summary_current_page = 1;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        let now = Local::now();
        ViewState::new(now.month(), now.year())
    }
}

/// Plain-text answer of `/api/upload`, kept even when the server rejected the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub status: u16,
    pub message: String,
}

impl UploadReceipt {
    pub fn accepted(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReport {
    pub batch_id: Uuid,
    pub succeeded: usize,
    pub total: usize,
}

impl NotificationReport {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn message(&self) -> String {
        format!("Email notifications sent: {}/{}", self.succeeded, self.total)
    }
}
