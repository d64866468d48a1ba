//! Birda Activity CLI entry point.

#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = birda_activity::run() {
        eprintln!("error: {e}");
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}
