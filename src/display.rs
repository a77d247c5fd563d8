// display.rs: notification level and stderr display helpers.
//
// The library is silent by default (level 0). The `lz4cat` front end raises
// the level from its -v / -q flags. Levels:
//   0 = no output; 1 = errors only; 2 = results + warnings;
//   3 = per-file progress; 4+ = verbose (frame and block events).

use std::sync::atomic::{AtomicI32, Ordering};

/// Global notification level shared by the library and the CLI.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(0);

/// Returns the current notification level.
#[inline]
pub fn notification_level() -> i32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the notification level; returns the new value.
#[inline]
pub fn set_notification_level(level: i32) -> i32 {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
    level
}

/// Write `msg` to stderr if the current notification level is ≥ `level`.
/// Flushes stderr at verbose levels so interleaved output stays ordered.
#[inline]
pub fn display_level(level: i32, msg: &str) {
    if notification_level() >= level {
        eprint!("{}", msg);
        if notification_level() >= 4 {
            use std::io::Write;
            let _ = std::io::stderr().flush();
        }
    }
}

/// Conditionally print to stderr at or above `level`.
///
/// The message is only formatted when it will be shown.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::display::notification_level() >= $level {
            $crate::display::display_level($level, &format!($($arg)*));
        }
    };
}
