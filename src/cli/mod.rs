//! Command-line interface for the `lz4cat` binary.
//!
//! | Submodule | Responsibility |
//! |-----------|---------------|
//! | [`args`]  | `CatArgs`: clap-derived flags, size parsing, mapping onto `ReadOptions` and the notification level. |
//! | [`cat`]   | Input/output resolution and the copy loop driving `Lz4FrameReader`. |
//!
//! Typical call sequence: `CatArgs::parse` → `set_notification_level` → `cat::run`.

pub mod args;
pub mod cat;
