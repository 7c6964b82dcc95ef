use std::process::ExitCode;

use graphlab_labs::{matching, run_lab};

fn main() -> ExitCode {
    run_lab("matching", matching::run)
}
