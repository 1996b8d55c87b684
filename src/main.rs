//! ghexport binary entry point.

fn main() {
    std::process::exit(ghexport::cli::run());
}
