//! Writing command results to stdout.

use serde::Serialize;

/// Print `value` as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a one-line message.
#[allow(clippy::print_stdout)]
pub fn line(message: &str) {
    println!("{message}");
}

/// Print the remote schema.
#[allow(clippy::print_stdout)]
pub fn schema() {
    print!("{}", bazarlink_data::REMOTE_SCHEMA_SQL);
}
