//! Destinations for generated clauses
//!
//! The constraint generator only sees [`ClauseSink`]. Whether the clauses end
//! up in a DIMACS file, in a live solver or in memory is decided by the caller.

use super::constraints::Clause;
use super::variables::Literal;
use crate::error::Result;
use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};

/// Receives clauses literal by literal, in generation order
pub trait ClauseSink {
    /// Append a literal to the clause under construction
    fn add_literal(&mut self, literal: Literal) -> Result<()>;

    /// Close the clause under construction
    fn end_clause(&mut self) -> Result<()>;

    /// Called once after the last clause with the final variable count
    fn finish(&mut self, variable_count: usize) -> Result<()>;

    /// Add a complete clause
    fn add_clause(&mut self, literals: &[Literal]) -> Result<()> {
        for &literal in literals {
            self.add_literal(literal)?;
        }
        self.end_clause()
    }
}

/// Writes clauses in DIMACS CNF.
///
/// The header has to carry the real totals, so clause lines are spooled to an
/// anonymous temporary file and copied out, behind the header, by
/// [`ClauseSink::finish`].
pub struct DimacsWriter<W: Write> {
    out: W,
    body: BufWriter<File>,
    clause_count: usize,
}

impl<W: Write> DimacsWriter<W> {
    pub fn new(out: W) -> Result<Self> {
        Ok(Self {
            out,
            body: BufWriter::new(tempfile::tempfile()?),
            clause_count: 0,
        })
    }

    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClauseSink for DimacsWriter<W> {
    fn add_literal(&mut self, literal: Literal) -> Result<()> {
        debug_assert_ne!(literal, 0, "0 is the clause terminator");
        write!(self.body, "{} ", literal)?;
        Ok(())
    }

    fn end_clause(&mut self) -> Result<()> {
        self.body.write_all(b"0\n")?;
        self.clause_count += 1;
        Ok(())
    }

    fn finish(&mut self, variable_count: usize) -> Result<()> {
        writeln!(self.out, "p cnf {} {}", variable_count, self.clause_count)?;

        self.body.flush()?;
        let spool = self.body.get_mut();
        spool.seek(SeekFrom::Start(0))?;
        io::copy(spool, &mut self.out)?;
        spool.set_len(0)?;
        spool.seek(SeekFrom::Start(0))?;

        self.out.flush()?;
        Ok(())
    }
}

/// Keeps every clause in memory
#[derive(Debug, Default)]
pub struct ClauseBuffer {
    pub clauses: Vec<Clause>,
    pub variable_count: usize,
    current: Vec<Literal>,
}

impl ClauseBuffer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClauseSink for ClauseBuffer {
    fn add_literal(&mut self, literal: Literal) -> Result<()> {
        self.current.push(literal);
        Ok(())
    }

    fn end_clause(&mut self) -> Result<()> {
        let literals = std::mem::take(&mut self.current);
        self.clauses.push(Clause::new(literals));
        Ok(())
    }

    fn finish(&mut self, variable_count: usize) -> Result<()> {
        self.variable_count = variable_count;
        Ok(())
    }
}

/// Counts clauses and literals without keeping them
#[derive(Debug, Default, Clone, Copy)]
pub struct ClauseCounter {
    pub clauses: usize,
    pub literals: usize,
    pub variable_count: usize,
}

impl ClauseSink for ClauseCounter {
    fn add_literal(&mut self, _literal: Literal) -> Result<()> {
        self.literals += 1;
        Ok(())
    }

    fn end_clause(&mut self) -> Result<()> {
        self.clauses += 1;
        Ok(())
    }

    fn finish(&mut self, variable_count: usize) -> Result<()> {
        self.variable_count = variable_count;
        Ok(())
    }
}
