use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOG_SINK: OnceLock<Mutex<Box<dyn Write + Send>>> = OnceLock::new();

/// Routes log lines to `sink` instead of stderr. Only the first call wins.
pub fn set_log_sink(sink: Box<dyn Write + Send>) -> bool {
    LOG_SINK.set(Mutex::new(sink)).is_ok()
}

pub fn set_log_file(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    if !set_log_sink(Box::new(file)) {
        anyhow::bail!("Log output was already configured");
    }
    Ok(())
}

pub fn log_msg(msg: &str) {
    if let Some(mutex) = LOG_SINK.get() {
        if let Ok(mut sink) = mutex.lock() {
            let _ = writeln!(sink, "{}", msg);
            let _ = sink.flush();
            return;
        }
    }
    eprintln!("{}", msg);
}

#[macro_export]
macro_rules! logger {
    ($($arg:tt)*) => {
        $crate::logger::log_msg(&format!($($arg)*));
    };
}
