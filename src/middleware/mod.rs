pub mod language;
pub mod request_log;
pub mod session;
