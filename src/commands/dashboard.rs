use crate::models::{DashboardMode, LeaveRecord, SummaryRecord};
use crate::pagination::Page;
use crate::services::api::LeaveApi;
use crate::services::mailer::MailRelay;
use crate::services::state::Dashboard;
use crate::utils::format_days;

pub const EMPTY_HISTORY: &str = "Loading data or no records found";

pub fn show<A: LeaveApi, M: MailRelay>(dashboard: &Dashboard<A, M>) -> Result<String, String> {
    let view = dashboard.view();
    let body = match view.mode {
        DashboardMode::History => {
            let mut title = "Leaves History".to_string();
            if view.month_filter {
                title.push_str(&format!(" ({:02}/{})", view.selected_month, view.selected_year));
            }
            format!("{}\n{}", title, render_history(&dashboard.history_page()))
        }
        DashboardMode::Summary => {
            // rows may lag the selection after a failed fetch
            let shown = dashboard.summary_period();
            format!(
                "Leave Summary {:02}/{}\n{}",
                shown.month,
                shown.year,
                render_summary(&dashboard.summary_page(), shown.month, shown.year)
            )
        }
    };

    if view.search_text.trim().is_empty() {
        Ok(body)
    } else {
        Ok(format!("Search: {}\n{}", view.search_text.trim(), body))
    }
}

pub fn render_history(page: &Page<LeaveRecord>) -> String {
    let mut out = format!(
        "  {:>6} | {:<28} | {:<8} | {:<16} | {:<10} | {:<10} | {:>9}\n",
        "ID", "Name", "Site", "Type", "Start Date", "End Date", "Remaining"
    );

    if page.is_empty() {
        out.push_str(&format!("  {}\n", EMPTY_HISTORY));
        return out;
    }

    for leave in &page.items {
        let marker = if leave.is_overdrawn() { '!' } else { ' ' };
        let id = leave.id.map(|id| id.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{} {:>6} | {:<28} | {:<8} | {:<16} | {:<10} | {:<10} | {:>9}\n",
            marker,
            id,
            leave.employee_name,
            leave.site,
            leave.leave_type_name,
            short_date(&leave.start_date),
            short_date(&leave.end_date),
            leave.remaining_leave_days
        ));
    }

    out.push_str(&navigator(page));
    out
}

pub fn render_summary(page: &Page<SummaryRecord>, month: u32, year: i32) -> String {
    let mut out = format!(
        "  {:<28} | {:>6} | {:>6} | {:>8} | {:>8}\n",
        "Name", "Total", "Sick", "Vacation", "Business"
    );

    if page.is_empty() {
        out.push_str(&format!("  {}\n", empty_summary(month, year)));
        return out;
    }

    for row in &page.items {
        out.push_str(&format!(
            "  {:<28} | {:>6} | {:>6} | {:>8} | {:>8}\n",
            row.employee_name,
            format_days(row.total_days),
            format_days(row.sick_days),
            format_days(row.vacation_days),
            format_days(row.business_days)
        ));
    }

    out.push_str(&navigator(page));
    out
}

pub fn empty_summary(month: u32, year: i32) -> String {
    format!("No summary data for {:02}/{}", month, year)
}

/// Page buttons, hidden when everything fits on one page.
fn navigator<T>(page: &Page<T>) -> String {
    if page.total_pages <= 1 {
        return String::new();
    }

    let buttons: Vec<String> = page
        .pages
        .iter()
        .map(|entry| match entry {
            Some(n) if *n == page.page => format!("[{}]", n),
            Some(n) => n.to_string(),
            None => "…".to_string(),
        })
        .collect();

    format!(
        "Page {}/{} ({} rows): {}\n",
        page.page,
        page.total_pages,
        page.total_items,
        buttons.join(" ")
    )
}

fn short_date(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

pub fn search<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    text: &str,
) -> Result<String, String> {
    dashboard.set_search(text);
    show(dashboard)
}

pub fn page<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    page: usize,
) -> Result<String, String> {
    dashboard.go_to_page(page);
    show(dashboard)
}

pub async fn month<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    month: u32,
) -> Result<String, String> {
    if !dashboard.set_month(month).await {
        return Err(format!("Month must be 1-12, got {}", month));
    }
    show(dashboard)
}

pub async fn year<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    year: i32,
) -> Result<String, String> {
    if !dashboard.set_year(year).await {
        return Err(format!("Year must have four digits, got {}", year));
    }
    show(dashboard)
}

pub fn month_filter<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    enabled: bool,
) -> Result<String, String> {
    dashboard.set_month_filter(enabled);
    show(dashboard)
}

pub async fn mode<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    mode: DashboardMode,
) -> Result<String, String> {
    dashboard.set_mode(mode).await;
    show(dashboard)
}

pub async fn refresh<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
) -> Result<String, String> {
    dashboard.refresh().await;
    show(dashboard)
}
