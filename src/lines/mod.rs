//! Input lines: ingestion, width normalization and ordering

pub mod io;
pub mod order;
pub mod padded;

pub use io::{check_lines, load_lines, read_lines, write_lines};
pub use order::{first_disorder, is_sorted, padded_cmp};
pub use padded::{bit_width, PaddedLines};
