use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// How log lines are rendered.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFormat {
    pub debug: bool,
    /// One JSON object per line instead of colored text.
    pub json: bool,
    /// Append `file:line` of the call site.
    pub caller: bool,
}

fn caller_of(record: &log::Record) -> Option<String> {
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => Some(format!("{file}:{line}")),
        _ => None,
    }
}

pub fn setup_logging(format: LogFormat) {
    let level = if format.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::from_default_env();
    builder
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level);

    if format.json {
        let pid = std::process::id();
        builder.format(move |buf, record| {
            let mut line = serde_json::json!({
                "time": buf.timestamp().to_string(),
                "level": record.level().to_string().to_lowercase(),
                "target": record.target(),
                "msg": record.args().to_string(),
                "pid": pid,
                "version": env!("CARGO_PKG_VERSION"),
            });
            if format.caller
                && let Some(caller) = caller_of(record)
            {
                line["caller"] = serde_json::Value::String(caller);
            }
            writeln!(buf, "{}", line)
        });
    } else {
        builder.format(move |buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let mut line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                Level::Debug | Level::Trace => {
                    format!("[{} {}] {}", name.cyan(), "DEBUG".dimmed(), record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            if format.caller
                && let Some(caller) = caller_of(record)
            {
                line.push_str(&format!(" {}", caller.dimmed()));
            }
            writeln!(buf, "{}", line)
        });
    }

    // A second init (tests, lib callers with their own logger) is not an error for us.
    let _ = builder.try_init();
}
