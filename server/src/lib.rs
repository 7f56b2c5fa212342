#![doc = include_str!("../README.md")]

use tokio::sync::OnceCell;

#[cfg(test)]
#[macro_use]
pub mod test_util;

#[macro_use]
pub mod coverage;
pub mod config;
pub mod intake;
pub mod session;
pub use crate::config::Config;
pub use crate::session::{CoverageSession, SessionSettings, SessionUpdate};

/// Initialized log4rs handle
pub static LOG_HANDLE: OnceCell<Option<log4rs::Handle>> = OnceCell::const_new();
pub(crate) async fn get_log_handle() -> Option<log4rs::Handle> {
    LOG_HANDLE
        .get_or_init(|| async move {
            // Log to stderr, stdout carries the view models
            let console = log4rs::append::console::ConsoleAppender::builder()
                .target(log4rs::append::console::Target::Stderr)
                .encoder(Box::new(log4rs::encode::pattern::PatternEncoder::new(
                    "{d(%Y-%m-%d %H:%M:%S)} | {I} | {h({l}):5.5} | {t} | {m}{n}",
                )))
                .build();
            match log4rs::config::Config::builder()
                .appender(
                    log4rs::config::Appender::builder().build("console", Box::new(console)),
                )
                .build(
                    log4rs::config::Root::builder()
                        .appender("console")
                        .build(log::LevelFilter::Debug),
                ) {
                Ok(config) => log4rs::init_config(config).ok(),
                Err(_) => None,
            }
        })
        .await
        .to_owned()
}

/// Initialize a log4rs logger with provided configuration file path
pub async fn load_logger_config_from_file(config_file: &str) -> Result<(), String> {
    let log_handle = get_log_handle()
        .await
        .ok_or("(load_logger_config_from_file) Could not get the log handle.")?;
    match log4rs::config::load_config_file(config_file, Default::default()) {
        Ok(config) => {
            log_handle.set_config(config);
            Ok(())
        }
        Err(e) => Err(format!(
            "(logger) Could not parse log config file [{}]: {}.",
            config_file, e,
        )),
    }
}

/// Tokio signal handler that will wait for a user to press CTRL+C.
/// The intake loop selects on it next to the location channel.
///
/// # Examples
///
/// ## using a shutdown signal channel
/// ```
/// use svc_coverage::shutdown_signal;
/// pub async fn run() {
///     let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
///     let waiter = tokio::spawn(shutdown_signal("intake", Some(shutdown_rx)));
///
///     // Send the shutdown request
///     shutdown_tx.send(()).expect("Could not stop intake.");
///     waiter.await.expect("Shutdown waiter panicked.");
/// }
/// ```
pub async fn shutdown_signal(
    service: &str,
    shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
) {
    match shutdown_rx {
        Some(receiver) => receiver
            .await
            .expect("(shutdown_signal) expect tokio signal oneshot Receiver"),
        None => tokio::signal::ctrl_c()
            .await
            .expect("(shutdown_signal) expect tokio signal ctrl-c"),
    }

    log::warn!("(shutdown_signal) shutdown requested for [{}].", service);
}
