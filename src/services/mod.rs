pub mod api;
pub mod mailer;
pub mod notify;
pub mod state;
pub mod workflow;
