//! Loggers a [`Client`](crate::Client) can write its diagnostics to.
//!
//! Each client owns its logger instead of going through the global `log`
//! facade, so that libraries embedding this crate stay quiet unless asked.

use log::{Log, Metadata, Record};

/// Discards everything. The default for new clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Log for NopLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        false
    }

    fn log(&self, _: &Record<'_>) {}

    fn flush(&self) {}
}

/// Forwards to whatever logger is installed for the `log` facade, e.g. by
/// `env_logger::init()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        log::logger().log(record)
    }

    fn flush(&self) {
        log::logger().flush()
    }
}

macro_rules! log_to {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &dyn ::log::Log = $logger;
        let metadata = ::log::Metadata::builder()
            .level($level)
            .target(module_path!())
            .build();
        if logger.enabled(&metadata) {
            logger.log(
                &::log::Record::builder()
                    .metadata(metadata)
                    .args(format_args!($($arg)+))
                    .module_path_static(Some(module_path!()))
                    .file_static(Some(file!()))
                    .line(Some(line!()))
                    .build(),
            );
        }
    }};
}

macro_rules! debug_to {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logging::log_to!($logger, ::log::Level::Debug, $($arg)+)
    };
}

macro_rules! error_to {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logging::log_to!($logger, ::log::Level::Error, $($arg)+)
    };
}

pub(crate) use {debug_to, error_to, log_to};
