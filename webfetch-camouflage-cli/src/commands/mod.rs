//! Subcommand implementations

pub mod fetch;
pub mod profiles;
pub mod serve;

use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_ERROR;
use std::io::Write;

/// Write command output, reporting a closed or failing stream as an error
pub fn write_output<W: Write>(mut writer: W, text: &str) -> CliResult<()> {
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| CliError {
            message: format!("Failed to write output: {e}"),
            exit_code: EXIT_ERROR,
            source: Some(e.into()),
        })
}
