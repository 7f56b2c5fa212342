//! log macro's for coverage engine logging

/// Writes a debug! message to the app::loader logger
#[macro_export]
macro_rules! loader_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::loader", $($arg)+)
    };
}

/// Writes an info! message to the app::loader logger
#[macro_export]
macro_rules! loader_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::loader", $($arg)+)
    };
}

/// Writes an warn! message to the app::loader logger
#[macro_export]
macro_rules! loader_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::loader", $($arg)+)
    };
}

/// Writes an error! message to the app::loader logger
#[macro_export]
macro_rules! loader_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::loader", $($arg)+)
    };
}

/// Writes a debug! message to the app::filter logger
#[macro_export]
macro_rules! filter_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::filter", $($arg)+)
    };
}

/// Writes an info! message to the app::filter logger
#[macro_export]
macro_rules! filter_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::filter", $($arg)+)
    };
}

/// Writes an warn! message to the app::filter logger
#[macro_export]
macro_rules! filter_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::filter", $($arg)+)
    };
}

/// Writes an error! message to the app::filter logger
#[macro_export]
macro_rules! filter_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::filter", $($arg)+)
    };
}

/// Writes a debug! message to the app::session logger
#[macro_export]
macro_rules! session_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::session", $($arg)+)
    };
}

/// Writes an info! message to the app::session logger
#[macro_export]
macro_rules! session_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::session", $($arg)+)
    };
}

/// Writes an warn! message to the app::session logger
#[macro_export]
macro_rules! session_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::session", $($arg)+)
    };
}

/// Writes an error! message to the app::session logger
#[macro_export]
macro_rules! session_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::session", $($arg)+)
    };
}

/// Writes a debug! message to the app::intake logger
#[macro_export]
macro_rules! intake_debug {
    ($($arg:tt)+) => {
        log::debug!(target: "app::intake", $($arg)+)
    };
}

/// Writes an info! message to the app::intake logger
#[macro_export]
macro_rules! intake_info {
    ($($arg:tt)+) => {
        log::info!(target: "app::intake", $($arg)+)
    };
}

/// Writes an warn! message to the app::intake logger
#[macro_export]
macro_rules! intake_warn {
    ($($arg:tt)+) => {
        log::warn!(target: "app::intake", $($arg)+)
    };
}

/// Writes an error! message to the app::intake logger
#[macro_export]
macro_rules! intake_error {
    ($($arg:tt)+) => {
        log::error!(target: "app::intake", $($arg)+)
    };
}
