use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use env_logger::{Builder, Env, fmt::Color};
use std::io::Write;
use once_cell::sync::OnceCell;
use thiserror::Error;

/// Environment variable overriding the requested verbosity (e.g. `MENDEL_LOG=genetics=trace`)
pub const LOG_ENV_VAR: &str = "MENDEL_LOG";

static INSTANCE: OnceCell<Logger> = OnceCell::new();

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to register the global logger: another logger was already set")]
    AlreadySet(#[source] log::SetLoggerError),

    #[error("Logger was initialized twice")]
    AlreadyInitialized,
}

#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Initialize the global logger. `verbosity` ranges from 0 (errors only) to 4+ (trace).
    ///
    /// # Errors
    /// - if a global logger was already set within this process.
    pub fn init(verbosity: u8) -> Result<(), LoggerError> {
        let log_level = Self::u8_to_loglevel(verbosity);
        let env = Env::default().filter(LOG_ENV_VAR);

        let logger = Builder::new().filter_level(log_level)
            .format(|buf, record| {
                // Errors are tagged with their origin and printed intensely.
                let (traceback, intense) = match record.level() {
                    Level::Error => (format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0)), true),
                    _            => (String::new(), false),
                };

                let mut arg_style = buf.style();
                arg_style.set_intense(intense);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        // Route log records through the progress bars, so that both never overlap.
        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger)
            .try_init()
            .map_err(LoggerError::AlreadySet)?;
        INSTANCE.set(Self{multi_pg}).map_err(|_| LoggerError::AlreadyInitialized)
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Error,
            1            => LevelFilter::Warn,
            2            => LevelFilter::Info,
            3            => LevelFilter::Debug,
            4..= u8::MAX => LevelFilter::Trace
        }
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Return the `MultiProgress` handle of the global logger, if it was ever initialized.
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }

    /// Register a new progress bar of length `len`.
    ///
    /// The bar is hidden whenever the global logger was never initialized (e.g. library use or tests),
    /// or when the current log level hides informative messages.
    pub fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
        let bar = match Self::multi() {
            Some(multi) if log::max_level() >= LevelFilter::Info => multi.add(ProgressBar::new(len)),
            _ => ProgressBar::hidden(),
        };
        let style = ProgressStyle::with_template("{msg:>12} [{elapsed_precise}] {wide_bar} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(message);
        bar
    }
}
