use simplelog::{Config, LevelFilter, WriteLogger};

/// Environment variable holding the log level (`off` when unset).
const LOG_ENV: &str = "MYSH_LOG";

/// Parse a level name; unknown or missing names turn logging off.
fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Off)
}

/// Install the stderr logger. Records never go to stdout, which may be
/// redirected to a file or a pipe at the time they are written.
pub fn init() {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());
    if level == LevelFilter::Off {
        return;
    }

    if let Err(e) = WriteLogger::init(level, Config::default(), std::io::stderr()) {
        eprintln!("mysh: cannot start logger: {e}");
    }
}
