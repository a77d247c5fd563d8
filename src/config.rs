// config.rs: Compile-time configuration constants.
//
// Runtime behaviour of the decoder itself is configured per reader through
// `frame::ReadOptions`; the values here only shape the `lz4cat` front end.

// Size of the chunk lz4cat requests from the frame reader per read call.
// Can be overridden with the -B / --buffer-size flag.
pub const CAT_BUFFER_SIZE: usize = 64 * 1024;

// Smallest accepted --buffer-size.
pub const CAT_BUFFER_SIZE_MIN: usize = 1;

// Notification level lz4cat starts from before -v / -q adjustments.
// 2 = results + warnings (see `display`).
pub const DISPLAY_LEVEL_DEFAULT: i32 = 2;

// Pseudo file name selecting standard input / output.
pub const STDIO_MARK: &str = "-";
