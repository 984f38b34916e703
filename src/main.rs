//! boardsync main entrypoint.

use boardsync::run;
use boardsync::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
