//! Binary entry point for `lz4cat`.
//!
//! 1. Flags are parsed by [`CatArgs`]; clap prints usage and exits on error.
//! 2. The notification level is set from `-v` / `-q`.
//! 3. [`run`] decodes every input into the selected output.
//!
//! Any failure is reported at level 1 and the process exits with status 1.

use clap::Parser;

use lz4stream::cli::args::CatArgs;
use lz4stream::cli::cat::run;
use lz4stream::display::set_notification_level;

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let args = CatArgs::parse();
    let level = args.display_level();
    // Results go to stdout; keep stderr to errors unless asked otherwise.
    if args.writes_stdout() && level == 2 {
        set_notification_level(1);
    } else {
        set_notification_level(level);
    }

    lz4stream::displaylevel!(
        3,
        "*** lz4cat v{} {}-bit ***\n",
        lz4stream::version_string(),
        std::mem::size_of::<*const ()>() * 8
    );

    if let Err(e) = run(&args) {
        lz4stream::displaylevel!(1, "lz4cat: {:#}\n", e);
        std::process::exit(1);
    }
}
