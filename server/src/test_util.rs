//! test utilities. Provides log macros and shared fixtures for unit tests.

/// Writes a debug! message to the test::ut logger
#[macro_export]
macro_rules! ut_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "test::ut", $($arg)+)
    };
}

/// Writes an info! message to the test::ut logger
#[macro_export]
macro_rules! ut_info {
    ($($arg:tt)+) => {
        log::info!(target: "test::ut", $($arg)+)
    };
}

/// Writes an error! message to the test::ut logger
#[macro_export]
macro_rules! ut_error {
    ($($arg:tt)+) => {
        log::error!(target: "test::ut", $($arg)+)
    };
}

/// Initializes the console logger from any test, sync or async.
///
/// The log handle is awaited on a scratch thread with its own runtime, so
/// this never nests a runtime inside the caller's one.
pub fn init_test_logger() {
    let initialized = std::thread::spawn(|| {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .map(|runtime| runtime.block_on(crate::get_log_handle()).is_some())
    })
    .join();

    match initialized {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => ut_error!("(init_test_logger) Could not build runtime: {}", e),
        Err(_) => ut_error!("(init_test_logger) Logger thread panicked."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_logger_from_sync_test() {
        init_test_logger();
        assert!(crate::LOG_HANDLE.initialized());
    }

    #[tokio::test]
    async fn test_init_test_logger_inside_runtime() {
        init_test_logger();
        assert!(crate::LOG_HANDLE.initialized());
        ut_info!("(test_init_test_logger_inside_runtime) Success.");
    }
}
