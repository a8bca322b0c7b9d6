//! # Streaming reader for Horizons observer tables
//!
//! [`ReferenceReader`] walks a reference file line by line and yields
//! [`ReferenceEvent`]s: a [`ReferenceEvent::Target`] each time the header declares the
//! observed body, and a [`ReferenceEvent::Record`] for each data line found inside a
//! `$$SOE` / `$$EOE` block.
//!
//! ## State machine
//! -----------------
//! ```text
//!            Target            $$SOE
//!   Start ──────────▶ HeaderSeen ─────▶ InBlock ◀──┐
//!     │                                  │  $$EOE   │ $$SOE
//!     │ $$SOE                            ▼          │
//!     ▼                               OutOfBlock ───┘
//!   OrphanBlock ── Target ──▶ InBlock
//!
//!   any state ── end of input / error ──▶ Done
//! ```
//!
//! * Data lines are only parsed in `InBlock`. A block opened before any target
//!   (`OrphanBlock`) is skipped entirely, so a file without a target line yields no record.
//! * A second header re-declares the target for the records that follow it.
//! * Reaching the end of input inside a block is accepted; the block simply ends there.
//! * The first error (I/O, malformed header or record) ends the pass: the iterator is then
//!   exhausted and never resumes.
use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    sync::Arc,
};

use camino::Utf8Path;
use log::{debug, warn};

use crate::{
    constants::{BLOCK_END_MARKER, BLOCK_START_MARKER, TARGET_MARKER, TARGET_NAME_TOKEN},
    ephemcheck_errors::EphemCheckError,
    horizons::record::ReferenceRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No target declared, outside any data block.
    Start,
    /// Inside a data block opened before any target was declared.
    OrphanBlock,
    /// Target declared, no data block opened yet.
    HeaderSeen,
    InBlock,
    /// Target declared, a data block has been closed.
    OutOfBlock,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceEvent {
    Target(Arc<str>),
    Record(ReferenceRecord),
}

enum LineKind<'a> {
    Target(Option<&'a str>),
    BlockStart,
    BlockEnd,
    Other,
}

fn classify(line: &str) -> LineKind<'_> {
    if line.starts_with(TARGET_MARKER) {
        LineKind::Target(line.split_whitespace().nth(TARGET_NAME_TOKEN))
    } else if line.starts_with(BLOCK_START_MARKER) {
        LineKind::BlockStart
    } else if line.starts_with(BLOCK_END_MARKER) {
        LineKind::BlockEnd
    } else {
        LineKind::Other
    }
}

impl ReaderState {
    fn on_target(self) -> Self {
        match self {
            ReaderState::OrphanBlock | ReaderState::InBlock => ReaderState::InBlock,
            ReaderState::Done => ReaderState::Done,
            _ => ReaderState::HeaderSeen,
        }
    }

    fn on_block_start(self) -> Self {
        match self {
            ReaderState::Start | ReaderState::OrphanBlock => ReaderState::OrphanBlock,
            ReaderState::HeaderSeen | ReaderState::InBlock | ReaderState::OutOfBlock => {
                ReaderState::InBlock
            }
            ReaderState::Done => ReaderState::Done,
        }
    }

    fn on_block_end(self) -> Self {
        match self {
            ReaderState::OrphanBlock => ReaderState::Start,
            ReaderState::InBlock => ReaderState::OutOfBlock,
            other => other,
        }
    }
}

/// Lazy, single-pass reader over a Horizons observer table.
pub struct ReferenceReader<R> {
    lines: Lines<R>,
    line_number: usize,
    state: ReaderState,
    target: Option<Arc<str>>,
}

impl ReferenceReader<BufReader<File>> {
    /// Open a reference file for reading.
    ///
    /// Return
    /// ----------
    /// * the reader positioned before the first line, or an [`EphemCheckError::IoError`]
    pub fn open(path: &Utf8Path) -> Result<Self, EphemCheckError> {
        let file = File::open(path)?;
        Ok(ReferenceReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReferenceReader<R> {
    pub fn new(reader: R) -> Self {
        ReferenceReader {
            lines: reader.lines(),
            line_number: 0,
            state: ReaderState::Start,
            target: None,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Name of the most recently declared target, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn next_event(&mut self) -> Result<Option<ReferenceEvent>, EphemCheckError> {
        loop {
            if self.state == ReaderState::Done {
                return Ok(None);
            }

            let Some(line) = self.lines.next() else {
                if matches!(self.state, ReaderState::InBlock | ReaderState::OrphanBlock) {
                    warn!(
                        "end of input reached inside a data block (no {BLOCK_END_MARKER} after line {})",
                        self.line_number
                    );
                }
                self.state = ReaderState::Done;
                return Ok(None);
            };
            let line = line?;
            self.line_number += 1;

            match classify(&line) {
                LineKind::Target(Some(name)) => {
                    debug!("line {}: target body {name}", self.line_number);
                    let name: Arc<str> = Arc::from(name);
                    self.target = Some(Arc::clone(&name));
                    self.state = self.state.on_target();
                    return Ok(Some(ReferenceEvent::Target(name)));
                }
                LineKind::Target(None) => {
                    return Err(EphemCheckError::MalformedHeader {
                        line: self.line_number,
                        content: line.clone(),
                    });
                }
                LineKind::BlockStart => {
                    if self.state == ReaderState::Start {
                        warn!(
                            "line {}: data block opened before any target, skipping it",
                            self.line_number
                        );
                    }
                    self.state = self.state.on_block_start();
                }
                LineKind::BlockEnd => {
                    self.state = self.state.on_block_end();
                }
                LineKind::Other => {
                    if self.state != ReaderState::InBlock {
                        continue;
                    }
                    let Some(body) = self.target.as_ref().map(Arc::clone) else {
                        continue;
                    };
                    let record = ReferenceRecord::from_horizons_line(body, self.line_number, &line)
                        .map_err(|source| EphemCheckError::MalformedRecord {
                            line: self.line_number,
                            source,
                        })?;
                    return Ok(Some(ReferenceEvent::Record(record)));
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for ReferenceReader<R> {
    type Item = Result<ReferenceEvent, EphemCheckError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(e) => {
                self.state = ReaderState::Done;
                Some(Err(e))
            }
        }
    }
}
