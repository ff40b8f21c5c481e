use std::io::{self, Read};

use simplex_solver::command::{self, SimplexInput};

/// Reads one request as JSON on stdin and writes the response as JSON on
/// stdout. Malformed JSON is a process error; a well-formed request that
/// describes a malformed problem still produces a contract response.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    let input: SimplexInput = serde_json::from_str(&raw)?;

    let output = command::solve(input);

    serde_json::to_writer(io::stdout().lock(), &output)?;
    println!();
    Ok(())
}
