use std::process::ExitCode;

use graphlab_labs::{arrangements, run_lab};

fn main() -> ExitCode {
    run_lab("arrangements", arrangements::run)
}
