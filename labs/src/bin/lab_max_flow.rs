use std::process::ExitCode;

use graphlab_labs::{flow, run_lab};

fn main() -> ExitCode {
    run_lab("max-flow", flow::run)
}
