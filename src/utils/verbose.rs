/// Environment variable toggled by `--verbose`.
pub const VERBOSE_ENV: &str = "PINBUMP_VERBOSE";

pub fn enabled() -> bool {
    std::env::var(VERBOSE_ENV).is_ok()
}

/// Print a `[VERBOSE]` diagnostic to stderr when verbose output is on.
pub fn log(message: impl AsRef<str>) {
    if enabled() {
        eprintln!("[VERBOSE] {}", message.as_ref());
    }
}
