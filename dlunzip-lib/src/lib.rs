pub mod cache;
pub mod config;
pub mod controller;
pub mod display;
pub mod download_client;
pub mod error;
pub mod extract;
pub mod http;
pub mod logging;
pub mod ui_thread;

#[cfg(test)]
pub mod test_helpers;
