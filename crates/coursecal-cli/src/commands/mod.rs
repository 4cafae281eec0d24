//! Command implementations.

pub mod calendar;
pub mod config;
pub mod extract;

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::CliResult;

/// Reads an input file, `-` meaning stdin.
pub(crate) fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Writes bytes to `output`, or stdout when none is given.
pub(crate) fn write_output(output: Option<&Path>, bytes: &[u8]) -> CliResult<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)?;
            debug!(path = %path.display(), bytes = bytes.len(), "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
