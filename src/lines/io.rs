//! Line-oriented input and output

use crate::config::LimitsConfig;
use crate::error::{Result, SortError};
use anyhow::Context;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read `\n` or `\r\n` terminated lines from a byte stream.
///
/// The final line must be terminated unless the stream is empty. A carriage
/// return anywhere except directly before the line feed is rejected, as are
/// NUL bytes, which the decoder uses as the padding terminator.
pub fn read_lines<R: BufRead>(mut reader: R, limits: &LimitsConfig) -> Result<Vec<Vec<u8>>> {
    let mut lines = Vec::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let read = reader.read_until(b'\n', &mut buffer)?;
        if read == 0 {
            break;
        }

        let line_number = lines.len() + 1;
        if buffer.last() != Some(&b'\n') {
            return Err(SortError::IncompleteLine {
                line: line_number,
                pending: buffer.len(),
            });
        }
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }

        check_line(line_number, &buffer, limits)?;
        if lines.len() == limits.max_lines {
            return Err(SortError::TooManyLines { limit: limits.max_lines });
        }

        lines.push(buffer.clone());
    }

    Ok(lines)
}

/// Apply the same checks as [`read_lines`] to lines that are already split
pub fn check_lines(lines: &[Vec<u8>], limits: &LimitsConfig) -> Result<()> {
    if lines.len() > limits.max_lines {
        return Err(SortError::TooManyLines { limit: limits.max_lines });
    }
    for (index, line) in lines.iter().enumerate() {
        if line.contains(&b'\n') {
            return Err(SortError::EmbeddedNewline { line: index + 1 });
        }
        check_line(index + 1, line, limits)?;
    }
    Ok(())
}

fn check_line(line_number: usize, line: &[u8], limits: &LimitsConfig) -> Result<()> {
    if line.contains(&b'\r') {
        return Err(SortError::StrayCarriageReturn { line: line_number });
    }
    if let Some(offset) = line.iter().position(|&byte| byte == 0) {
        return Err(SortError::NulByte { line: line_number, offset });
    }
    if line.len() > limits.max_line_length {
        return Err(SortError::LineTooLong {
            line: line_number,
            length: line.len(),
            limit: limits.max_line_length,
        });
    }
    Ok(())
}

/// Load lines from a file, or from standard input when no path is given
pub fn load_lines(path: Option<&Path>, limits: &LimitsConfig) -> anyhow::Result<Vec<Vec<u8>>> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            read_lines(BufReader::new(file), limits)
                .with_context(|| format!("Failed to read lines from: {}", path.display()))
        }
        None => {
            let stdin = std::io::stdin();
            read_lines(stdin.lock(), limits).context("Failed to read lines from <stdin>")
        }
    }
}

/// Write lines, each followed by a single line feed
pub fn write_lines<W: Write>(mut out: W, lines: &[Vec<u8>]) -> std::io::Result<()> {
    for line in lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
