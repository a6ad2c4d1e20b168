use std::path::Path;

use tracing::{error, info};

use crate::models::{DashboardMode, LeaveRecord, MonthYear, SummaryRecord, ViewState};
use crate::pagination::{clamp_page, filter_leaves, filter_summaries, paginate, total_pages, Page};
use crate::services::api::LeaveApi;
use crate::services::mailer::MailRelay;
use crate::services::workflow::{upload_and_notify, UploadOutcome};
use crate::utils::{is_valid_month, is_valid_year};

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub history: Vec<LeaveRecord>,
    pub summaries: Vec<SummaryRecord>,
    /// Period `summaries` were fetched for; lags the selection when a refetch fails.
    pub summary_period: Option<MonthYear>,
    pub view: ViewState,
    /// Last message meant for the user (fetch failure, upload result, ...).
    pub notice: Option<String>,
}

pub struct Dashboard<A, M> {
    api: A,
    relay: M,
    page_size: usize,
    state: DashboardState,
}

impl<A: LeaveApi, M: MailRelay> Dashboard<A, M> {
    pub fn new(api: A, relay: M, page_size: usize) -> Self {
        Self::with_state(api, relay, page_size, DashboardState::default())
    }

    pub fn with_state(api: A, relay: M, page_size: usize, state: DashboardState) -> Self {
        Dashboard {
            api,
            relay,
            page_size: page_size.max(1),
            state,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &ViewState {
        &self.state.view
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.state.notice.take()
    }

    pub async fn refresh_history(&mut self) {
        match self.api.fetch_history().await {
            Ok(records) => {
                info!("Loaded {} leave records", records.len());
                self.state.history = records;
                self.clamp_pages();
            }
            Err(err) => {
                error!("Fetch error: {}", err);
                self.state.notice = Some(format!("Could not load leave history: {}", err));
            }
        }
    }

    pub async fn refresh_summary(&mut self) {
        let period = self.state.view.month_year();
        match self.api.fetch_summary(period).await {
            Ok(records) => {
                info!(
                    "Loaded {} summary rows for {:02}/{}",
                    records.len(),
                    period.month,
                    period.year
                );
                self.state.summaries = records;
                self.state.summary_period = Some(period);
                self.clamp_pages();
            }
            Err(err) => {
                error!("Summary fetch error: {}", err);
                self.state.notice = Some(format!("Could not load summary: {}", err));
            }
        }
    }

    pub async fn refresh(&mut self) {
        match self.state.view.mode {
            DashboardMode::History => self.refresh_history().await,
            DashboardMode::Summary => self.refresh_summary().await,
        }
    }

    pub fn set_search(&mut self, text: &str) {
        self.state.view.search_text = text.to_string();
        self.state.view.reset_pages();
    }

    pub async fn set_month(&mut self, month: u32) -> bool {
        if !is_valid_month(month) {
            return false;
        }
        self.state.view.selected_month = month;
        self.period_changed().await;
        true
    }

    pub async fn set_year(&mut self, year: i32) -> bool {
        if !is_valid_year(year) {
            return false;
        }
        self.state.view.selected_year = year;
        self.period_changed().await;
        true
    }

    pub fn set_month_filter(&mut self, enabled: bool) {
        self.state.view.month_filter = enabled;
        self.state.view.reset_pages();
    }

    pub async fn set_mode(&mut self, mode: DashboardMode) {
        self.state.view.mode = mode;
        self.state.view.reset_pages();
        if mode == DashboardMode::Summary {
            self.refresh_summary().await;
        }
    }

    async fn period_changed(&mut self) {
        self.state.view.reset_pages();
        if self.state.view.mode == DashboardMode::Summary {
            self.refresh_summary().await;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        let total = total_pages(self.filtered_history().len(), self.page_size);
        self.state.view.current_page = clamp_page(page, total);
    }

    pub fn set_summary_page(&mut self, page: usize) {
        let total = total_pages(self.filtered_summaries().len(), self.page_size);
        self.state.view.summary_current_page = clamp_page(page, total);
    }

    /// Sets the page of whichever table is active.
    pub fn go_to_page(&mut self, page: usize) {
        match self.state.view.mode {
            DashboardMode::History => self.set_page(page),
            DashboardMode::Summary => self.set_summary_page(page),
        }
    }

    pub fn filtered_history(&self) -> Vec<LeaveRecord> {
        let view = &self.state.view;
        let period = view.month_filter.then(|| view.month_year());
        filter_leaves(&self.state.history, &view.search_text, period)
    }

    pub fn filtered_summaries(&self) -> Vec<SummaryRecord> {
        filter_summaries(&self.state.summaries, &self.state.view.search_text)
    }

    pub fn history_page(&self) -> Page<LeaveRecord> {
        paginate(
            &self.filtered_history(),
            self.state.view.current_page,
            self.page_size,
        )
    }

    /// Period the summary table shows: the last fetched one, else the selection.
    pub fn summary_period(&self) -> MonthYear {
        self.state
            .summary_period
            .unwrap_or_else(|| self.state.view.month_year())
    }

    pub fn summary_page(&self) -> Page<SummaryRecord> {
        paginate(
            &self.filtered_summaries(),
            self.state.view.summary_current_page,
            self.page_size,
        )
    }

    fn clamp_pages(&mut self) {
        let page = self.state.view.current_page;
        self.set_page(page);
        let summary_page = self.state.view.summary_current_page;
        self.set_summary_page(summary_page);
    }

    pub async fn upload_and_notify(&mut self, file: Option<&Path>) -> UploadOutcome {
        let outcome = upload_and_notify(&self.api, &self.relay, file).await;

        if let Some(history) = outcome.history.clone() {
            self.state.history = history;
            self.clamp_pages();
        }

        let messages = outcome.messages();
        if !messages.is_empty() {
            self.state.notice = Some(messages.join("\n"));
        }

        outcome
    }
}
