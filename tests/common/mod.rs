//! Shared fixtures: mock API and relay, record builders, a one-shot HTTP responder.
#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use leave_dashboard::errors::{ApiError, ApiResult, MailError};
use leave_dashboard::models::{LeaveRecord, MonthYear, SummaryRecord, UploadReceipt, WarningRecord};
use leave_dashboard::services::api::{LeaveApi, UploadFile};
use leave_dashboard::services::mailer::MailRelay;

mock! {
    pub Api {}

    #[async_trait]
    impl LeaveApi for Api {
        async fn fetch_history(&self) -> ApiResult<Vec<LeaveRecord>>;
        async fn fetch_summary(&self, period: MonthYear) -> ApiResult<Vec<SummaryRecord>>;
        async fn upload(&self, file: UploadFile) -> ApiResult<UploadReceipt>;
        async fn fetch_warnings(&self) -> ApiResult<Vec<WarningRecord>>;
    }
}

mock! {
    pub Relay {}

    #[async_trait]
    impl MailRelay for Relay {
        async fn send(&self, warning: &WarningRecord) -> Result<(), MailError>;
    }
}

pub fn transport_error() -> ApiError {
    ApiError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

pub fn relay_error() -> MailError {
    MailError::Rejected {
        status: 429,
        body: "Too many requests".to_string(),
    }
}

pub fn leave(id: i64, name: &str, start_date: &str, remaining: i64) -> LeaveRecord {
    LeaveRecord {
        id: Some(id),
        employee_id: Some(1000 + id),
        employee_name: name.to_string(),
        site: "Office".to_string(),
        leave_type_name: "Vacation Leave".to_string(),
        start_date: start_date.to_string(),
        end_date: start_date.to_string(),
        approved: Some(true),
        remaining_leave_days: remaining,
    }
}

pub fn numbered_leaves(count: i64) -> Vec<LeaveRecord> {
    (1..=count)
        .map(|id| leave(id, &format!("Employee {id}"), "2025-03-10", 5))
        .collect()
}

pub fn summary(name: &str, total: f64) -> SummaryRecord {
    SummaryRecord {
        employee_name: name.to_string(),
        total_days: total,
        sick_days: total,
        vacation_days: 0.0,
        business_days: 0.0,
    }
}

pub fn warning(employee_id: i64) -> WarningRecord {
    WarningRecord {
        warning_id: None,
        employee_id,
        employee_name: format!("Employee {employee_id}"),
        email: format!("employee{employee_id}@example.com"),
        remaining: -1,
        leave_type: "Sick Leave".to_string(),
    }
}

pub fn receipt(status: u16, message: &str) -> UploadReceipt {
    UploadReceipt {
        status,
        message: message.to_string(),
    }
}

/// Answers exactly one request with `status` and `body`, then yields the raw request head.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let read = socket.read(&mut buf).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{}", addr), handle)
}

/// Base URL of a port nobody listens on.
pub async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
