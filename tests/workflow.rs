mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};

use common::{leave, receipt, relay_error, transport_error, warning, MockApi, MockRelay};
use leave_dashboard::models::WarningRecord;
use leave_dashboard::services::notify::NotificationBatch;
use leave_dashboard::services::workflow::{upload_and_notify, UploadStage};
use tempfile::NamedTempFile;

fn xlsx_fixture() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("leaves")
        .suffix(".xlsx")
        .tempfile()
        .unwrap();
    file.write_all(b"PK\x03\x04 fake workbook").unwrap();
    file
}

fn relay_failing_for(failing: Vec<i64>, expected_calls: usize) -> MockRelay {
    let mut relay = MockRelay::new();
    relay
        .expect_send()
        .times(expected_calls)
        .returning(move |w: &WarningRecord| {
            if failing.contains(&w.employee_id) {
                Err(relay_error())
            } else {
                Ok(())
            }
        });
    relay
}

#[tokio::test]
async fn no_selected_file_is_a_no_op() {
    let api = MockApi::new();
    let relay = MockRelay::new();

    let outcome = upload_and_notify(&api, &relay, None).await;

    assert_eq!(outcome.stage, UploadStage::Idle);
    assert_eq!(outcome.trail, vec![UploadStage::Idle]);
    assert!(outcome.messages().is_empty());
}

#[tokio::test]
async fn upload_refreshes_history_and_reports_two_of_three() {
    let file = xlsx_fixture();
    let mut api = MockApi::new();
    api.expect_upload()
        .times(1)
        .withf(|upload| upload.file_name.ends_with(".xlsx") && upload.bytes.starts_with(b"PK"))
        .returning(|_| Ok(receipt(200, "Excel upload succeeded")));
    api.expect_fetch_history()
        .times(1)
        .returning(|| Ok(vec![leave(1, "Anna", "2025-03-01", -2)]));
    api.expect_fetch_warnings()
        .times(1)
        .returning(|| Ok(vec![warning(1), warning(2), warning(3)]));
    let relay = relay_failing_for(vec![2], 3);

    let outcome = upload_and_notify(&api, &relay, Some(file.path())).await;

    assert_eq!(outcome.stage, UploadStage::Done);
    assert_eq!(
        outcome.trail,
        vec![
            UploadStage::Idle,
            UploadStage::Uploading,
            UploadStage::Uploaded,
            UploadStage::Notifying,
            UploadStage::Done,
        ]
    );
    assert_eq!(outcome.history.as_ref().map(Vec::len), Some(1));
    let report = outcome.notification.clone().unwrap();
    assert_eq!((report.succeeded, report.total), (2, 3));
    assert_eq!(
        outcome.messages(),
        vec![
            "Excel upload succeeded".to_string(),
            "Email notifications sent: 2/3".to_string(),
        ]
    );
}

#[tokio::test]
async fn success_count_is_total_minus_failures() {
    for (total, failing) in [(0usize, vec![]), (1, vec![1]), (4, vec![]), (5, vec![1, 3, 5])] {
        let warnings: Vec<WarningRecord> = (1..=total as i64).map(warning).collect();
        let relay = relay_failing_for(failing.clone(), total);

        let report = NotificationBatch::new(&relay, warnings).run().await;

        assert_eq!(report.total, total);
        assert_eq!(report.succeeded, total - failing.len());
        assert_eq!(report.failed(), failing.len());
    }
}

#[tokio::test]
async fn batch_yields_running_counter_in_order() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let log = sent.clone();
    let mut relay = MockRelay::new();
    relay.expect_send().times(3).returning(move |w: &WarningRecord| {
        log.lock().unwrap().push(w.employee_id);
        if w.employee_id == 11 {
            Err(relay_error())
        } else {
            Ok(())
        }
    });

    let mut batch = NotificationBatch::new(&relay, vec![warning(10), warning(11), warning(12)]);
    let mut steps = Vec::new();
    while let Some(step) = batch.next().await {
        steps.push((step.warning.employee_id, step.delivered, step.attempted, step.succeeded));
    }

    assert_eq!(
        steps,
        vec![(10, true, 1, 1), (11, false, 2, 1), (12, true, 3, 2)]
    );
    assert_eq!(*sent.lock().unwrap(), vec![10, 11, 12]);
    assert_eq!(batch.report().message(), "Email notifications sent: 2/3");
}

#[tokio::test]
async fn transport_failure_on_upload_skips_refresh() {
    let file = xlsx_fixture();
    let mut api = MockApi::new();
    api.expect_upload().times(1).returning(|_| Err(transport_error()));
    api.expect_fetch_history().never();
    api.expect_fetch_warnings().never();
    let mut relay = MockRelay::new();
    relay.expect_send().never();

    let outcome = upload_and_notify(&api, &relay, Some(file.path())).await;

    assert_eq!(outcome.stage, UploadStage::Failed);
    assert_eq!(
        outcome.trail,
        vec![UploadStage::Idle, UploadStage::Uploading, UploadStage::Failed]
    );
    assert!(outcome.history.is_none());
    assert_eq!(outcome.messages(), vec!["Upload failed".to_string()]);
}

#[tokio::test]
async fn unreadable_file_fails_before_upload() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.xlsx");
    let mut api = MockApi::new();
    api.expect_upload().never();
    let relay = MockRelay::new();

    let outcome = upload_and_notify(&api, &relay, Some(missing.as_path())).await;

    assert_eq!(outcome.stage, UploadStage::Failed);
    assert!(outcome.error.unwrap().contains("missing.xlsx"));
}

#[tokio::test]
async fn server_rejection_still_refreshes_and_notifies() {
    let file = xlsx_fixture();
    let mut api = MockApi::new();
    api.expect_upload()
        .times(1)
        .returning(|_| Ok(receipt(400, "Row 3: email not found")));
    api.expect_fetch_history().times(1).returning(|| Ok(Vec::new()));
    api.expect_fetch_warnings()
        .times(1)
        .returning(|| Ok(vec![warning(4)]));
    let relay = relay_failing_for(vec![], 1);

    let outcome = upload_and_notify(&api, &relay, Some(file.path())).await;

    assert_eq!(outcome.stage, UploadStage::Done);
    assert!(!outcome.receipt.as_ref().unwrap().accepted());
    assert_eq!(outcome.messages()[0], "Row 3: email not found");
    assert_eq!(outcome.messages()[1], "Email notifications sent: 1/1");
}

#[tokio::test]
async fn history_refresh_failure_does_not_stop_notification() {
    let file = xlsx_fixture();
    let mut api = MockApi::new();
    api.expect_upload().returning(|_| Ok(receipt(200, "ok")));
    api.expect_fetch_history().times(1).returning(|| Err(transport_error()));
    api.expect_fetch_warnings()
        .times(1)
        .returning(|| Ok(vec![warning(1), warning(2)]));
    let relay = relay_failing_for(vec![], 2);

    let outcome = upload_and_notify(&api, &relay, Some(file.path())).await;

    assert_eq!(outcome.stage, UploadStage::Done);
    assert!(outcome.history.is_none());
    assert_eq!(outcome.notification.unwrap().succeeded, 2);
}

#[tokio::test]
async fn warning_fetch_failure_fails_after_refresh() {
    let file = xlsx_fixture();
    let mut api = MockApi::new();
    api.expect_upload().returning(|_| Ok(receipt(200, "ok")));
    api.expect_fetch_history()
        .times(1)
        .returning(|| Ok(vec![leave(9, "Somchai", "2025-01-01", -1)]));
    api.expect_fetch_warnings().times(1).returning(|| Err(transport_error()));
    let mut relay = MockRelay::new();
    relay.expect_send().never();

    let outcome = upload_and_notify(&api, &relay, Some(file.path())).await;

    assert_eq!(outcome.stage, UploadStage::Failed);
    assert_eq!(outcome.history.as_ref().map(Vec::len), Some(1));
    assert_eq!(
        outcome.trail,
        vec![
            UploadStage::Idle,
            UploadStage::Uploading,
            UploadStage::Uploaded,
            UploadStage::Notifying,
            UploadStage::Failed,
        ]
    );
    assert_eq!(outcome.messages(), vec!["ok".to_string(), "Upload failed".to_string()]);
}

#[tokio::test]
async fn empty_warning_list_sends_nothing() {
    let file = xlsx_fixture();
    let mut api = MockApi::new();
    api.expect_upload().returning(|_| Ok(receipt(200, "ok")));
    api.expect_fetch_history().returning(|| Ok(Vec::new()));
    api.expect_fetch_warnings().returning(|| Ok(Vec::new()));
    let mut relay = MockRelay::new();
    relay.expect_send().never();

    let outcome = upload_and_notify(&api, &relay, Some(file.path())).await;

    assert_eq!(outcome.stage, UploadStage::Done);
    assert_eq!(outcome.notification.as_ref().unwrap().total, 0);
    assert_eq!(outcome.messages(), vec!["ok".to_string()]);
}
