use std::process::ExitCode;

use graphlab_labs::{cliques, run_lab};

fn main() -> ExitCode {
    run_lab("cliques", cliques::run)
}
