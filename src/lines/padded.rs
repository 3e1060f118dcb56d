//! Zero-padded bit view over the input lines

/// Width in bits every line is padded to: eight times the longest line
pub fn bit_width(lines: &[Vec<u8>]) -> usize {
    8 * lines.iter().map(Vec::len).max().unwrap_or(0)
}

/// The input lines, padded on the right with zero bits to a common width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedLines {
    lines: Vec<Vec<u8>>,
    width: usize,
}

impl PaddedLines {
    pub fn new(lines: Vec<Vec<u8>>) -> Self {
        let width = bit_width(&lines);
        Self { lines, width }
    }

    /// Number of lines (N)
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Common width in bits (W)
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    /// Bit `bit` of line `line`, most significant bit of byte 0 first.
    /// Bits past the end of the line read as zero.
    #[inline]
    pub fn bit(&self, line: usize, bit: usize) -> bool {
        match self.lines[line].get(bit / 8) {
            Some(&byte) => byte & (0x80 >> (bit % 8)) != 0,
            None => false,
        }
    }
}
