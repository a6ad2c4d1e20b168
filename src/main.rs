use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use leave_dashboard::commands::{self, Command, USAGE};
use leave_dashboard::config::Settings;
use leave_dashboard::services::api::HttpLeaveApi;
use leave_dashboard::services::mailer::EmailJsRelay;
use leave_dashboard::services::state::Dashboard;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env().map_err(|e| anyhow!("Config: {}", e))?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = settings.http_client()?;
    let api = HttpLeaveApi::new(client.clone(), settings.api_base_url.clone());
    let relay = EmailJsRelay::new(client, settings.mail_relay.clone());
    if !relay.is_configured() {
        warn!("EMAILJS_* settings missing; warning mails will fail after uploads");
    }

    info!("Using leave API at {}", settings.api_base_url);
    let mut dashboard = Dashboard::new(api, relay, settings.page_size);
    dashboard.refresh_history().await;
    print_result(commands::execute(&mut dashboard, Command::Show).await);
    flush_notice(&mut dashboard);
    println!("{}", USAGE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        print_result(commands::execute(&mut dashboard, command).await);
        flush_notice(&mut dashboard);
    }

    Ok(())
}

fn print_result(result: Result<String, String>) {
    match result {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(message) => eprintln!("{}", message),
    }
}

fn flush_notice<A, M>(dashboard: &mut Dashboard<A, M>)
where
    A: leave_dashboard::services::api::LeaveApi,
    M: leave_dashboard::services::mailer::MailRelay,
{
    if let Some(notice) = dashboard.take_notice() {
        eprintln!("{}", notice);
    }
}
