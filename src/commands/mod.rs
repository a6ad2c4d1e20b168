//! Console commands that drive the dashboard, one line of input per command.

use std::path::PathBuf;

use crate::models::DashboardMode;
use crate::services::api::LeaveApi;
use crate::services::mailer::MailRelay;
use crate::services::state::Dashboard;

pub mod dashboard;
pub mod upload;

pub const USAGE: &str = "\
Commands:
  show                      render the active table
  search <text>             filter by employee name or leave id (empty clears)
  page <n>                  go to page n
  month <1-12>              select month
  year <yyyy>               select year
  filter on|off             restrict history to the selected month
  mode history|summary      switch table
  refresh                   reload the active table
  upload [path]             upload an .xlsx file and notify negative balances
  help                      this text
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Search(String),
    Page(usize),
    Month(u32),
    Year(i32),
    MonthFilter(bool),
    Mode(DashboardMode),
    Refresh,
    Upload(Option<PathBuf>),
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name.to_lowercase().as_str() {
        "" | "show" => Ok(Command::Show),
        "search" => Ok(Command::Search(rest.to_string())),
        "page" => rest
            .parse::<usize>()
            .map(Command::Page)
            .map_err(|_| format!("Invalid page: {:?}", rest)),
        "month" => rest
            .parse::<u32>()
            .map(Command::Month)
            .map_err(|_| format!("Invalid month: {:?}", rest)),
        "year" => rest
            .parse::<i32>()
            .map(Command::Year)
            .map_err(|_| format!("Invalid year: {:?}", rest)),
        "filter" => match rest.to_lowercase().as_str() {
            "on" => Ok(Command::MonthFilter(true)),
            "off" => Ok(Command::MonthFilter(false)),
            other => Err(format!("Expected on or off, got {:?}", other)),
        },
        "mode" => match rest.to_lowercase().as_str() {
            "history" => Ok(Command::Mode(DashboardMode::History)),
            "summary" => Ok(Command::Mode(DashboardMode::Summary)),
            other => Err(format!("Unknown mode {:?}", other)),
        },
        "refresh" => Ok(Command::Refresh),
        "upload" => Ok(Command::Upload(
            Some(rest).filter(|p| !p.is_empty()).map(PathBuf::from),
        )),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command {:?}. Type help for a list.", other)),
    }
}

pub async fn execute<A: LeaveApi, M: MailRelay>(
    dashboard: &mut Dashboard<A, M>,
    command: Command,
) -> Result<String, String> {
    match command {
        Command::Show => dashboard::show(dashboard),
        Command::Search(text) => dashboard::search(dashboard, &text),
        Command::Page(page) => dashboard::page(dashboard, page),
        Command::Month(month) => dashboard::month(dashboard, month).await,
        Command::Year(year) => dashboard::year(dashboard, year).await,
        Command::MonthFilter(enabled) => dashboard::month_filter(dashboard, enabled),
        Command::Mode(mode) => dashboard::mode(dashboard, mode).await,
        Command::Refresh => dashboard::refresh(dashboard).await,
        Command::Upload(path) => upload::upload(dashboard, path.as_deref()).await,
        Command::Help => Ok(USAGE.to_string()),
        Command::Quit => Ok(String::new()),
    }
}
