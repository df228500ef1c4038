//! Forgeform binary entry point.

use forgeform::ui::output;

fn main() {
    if let Err(err) = forgeform::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
