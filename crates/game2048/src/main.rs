use std::process::ExitCode;

use game2048::app::{bootstrap, loop_runner};

fn main() -> ExitCode {
    bootstrap::init_tracing();
    loop_runner::run(bootstrap::build_app())
}
