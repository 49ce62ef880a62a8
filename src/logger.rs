use chrono::Local;
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Module path without the crate prefix, e.g. `app::controller`.
fn module_tag(target: &str) -> &str {
    target.split_once("::").map_or(target, |(_, rest)| rest)
}

/// Coloured single-line log format with the thread name, so GUI and
/// `pose-io` worker lines can be told apart.
pub fn init_logger() {
    Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let time = Local::now().format("%H:%M:%S%.3f");
            let level_color = match record.level() {
                Level::Error => "\x1b[31m\x1b[1m",
                Level::Warn => "\x1b[33m\x1b[1m",
                Level::Info => "\x1b[32m\x1b[1m",
                Level::Debug => "\x1b[36m\x1b[1m",
                Level::Trace => "\x1b[90m\x1b[1m",
            };
            let thread = std::thread::current();
            writeln!(
                buf,
                "{}{} {:<5}\x1b[0m {:<8} [{}:{}] {}",
                time,
                level_color,
                record.level(),
                thread.name().unwrap_or("worker"),
                module_tag(record.target()),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .init();
}
