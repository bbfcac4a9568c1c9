//! VCD parsing and signal-value lookup.
//!
//! A [`VcdTrace`] holds, per signal, the time-ordered list of value changes
//! from one simulation run. Lookup returns the last value recorded at or
//! before the requested timestamp. Signals are addressable both by their
//! plain reference name (`out`) and by their dotted scope path (`top.out`).

use crate::error::{Result, VcdError};
use std::collections::HashMap;
use std::path::Path;

/// One parsed waveform trace.
#[derive(Debug, Clone)]
pub struct VcdTrace {
    /// Reference name and dotted scope path -> change-list slot.
    names: HashMap<String, usize>,
    /// Per slot: value changes ordered by timestamp (nondecreasing).
    changes: Vec<Vec<(u64, String)>>,
    /// Timescale declaration, verbatim (e.g. `1ns`), if present.
    timescale: Option<String>,
}

impl VcdTrace {
    /// Read and parse a VCD file from disk.
    pub fn read_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse VCD text.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).run()
    }

    /// Value of `signal` at `timestamp`, or `None` if the trace never
    /// declared such a signal.
    ///
    /// A declared signal with no change recorded at or before `timestamp`
    /// reads as `"x"` (unknown), matching simulator semantics for
    /// not-yet-dumped values.
    pub fn signal_value(&self, signal: &str, timestamp: u64) -> Option<&str> {
        let slot = *self.names.get(signal)?;
        let changes = &self.changes[slot];
        let idx = changes.partition_point(|(t, _)| *t <= timestamp);
        if idx == 0 {
            return Some("x");
        }
        Some(changes[idx - 1].1.as_str())
    }

    /// The trace's `$timescale` declaration, if any.
    pub fn timescale(&self) -> Option<&str> {
        self.timescale.as_deref()
    }
}

/// Token-stream parser over one VCD document.
struct Parser<'a> {
    /// (line number, token) pairs in document order.
    tokens: Vec<(usize, &'a str)>,
    pos: usize,
    /// Identifier code -> change-list slot.
    ids: HashMap<&'a str, usize>,
    scope: Vec<&'a str>,
    trace: VcdTrace,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let tokens = input
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |t| (i + 1, t)))
            .collect();
        Parser {
            tokens,
            pos: 0,
            ids: HashMap::new(),
            scope: Vec::new(),
            trace: VcdTrace {
                names: HashMap::new(),
                changes: Vec::new(),
                timescale: None,
            },
        }
    }

    fn run(mut self) -> Result<VcdTrace> {
        self.header()?;
        self.body()?;
        Ok(self.trace)
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let tok = self.tokens.get(self.pos).copied();
        self.pos += 1;
        tok
    }

    /// Collect the tokens of a `$keyword ... $end` section.
    fn section(&mut self, line: usize, keyword: &str) -> Result<Vec<&'a str>> {
        let mut toks = Vec::new();
        loop {
            match self.next() {
                Some((_, "$end")) => return Ok(toks),
                Some((_, tok)) => toks.push(tok),
                None => {
                    return Err(VcdError::Syntax {
                        line,
                        reason: format!("unterminated {keyword} section"),
                    })
                }
            }
        }
    }

    /// Declarations up to `$enddefinitions`.
    fn header(&mut self) -> Result<()> {
        while let Some((line, tok)) = self.next() {
            match tok {
                "$enddefinitions" => {
                    self.section(line, tok)?;
                    return Ok(());
                }
                "$var" => self.var(line)?,
                "$scope" => {
                    let toks = self.section(line, tok)?;
                    // [kind, name]
                    match toks.get(1) {
                        Some(name) => self.scope.push(*name),
                        None => {
                            return Err(VcdError::Syntax {
                                line,
                                reason: "incomplete $scope declaration".into(),
                            })
                        }
                    }
                }
                "$upscope" => {
                    self.section(line, tok)?;
                    self.scope.pop();
                }
                "$timescale" => {
                    let toks = self.section(line, tok)?;
                    self.trace.timescale = Some(toks.join(" "));
                }
                t if t.starts_with('$') => {
                    // $date, $version, $comment, ...
                    self.section(line, t)?;
                }
                t => {
                    return Err(VcdError::Syntax {
                        line,
                        reason: format!("unexpected token {t:?} before $enddefinitions"),
                    })
                }
            }
        }
        Err(VcdError::Syntax {
            line: self.tokens.last().map_or(0, |(l, _)| *l),
            reason: "missing $enddefinitions".into(),
        })
    }

    /// `$var <type> <width> <id> <ref> [<index>] $end`
    fn var(&mut self, line: usize) -> Result<()> {
        let toks = self.section(line, "$var")?;
        let (id, reference) = match (toks.get(2), toks.get(3)) {
            (Some(id), Some(reference)) => (*id, *reference),
            _ => {
                return Err(VcdError::Syntax {
                    line,
                    reason: "incomplete $var declaration".into(),
                })
            }
        };

        let next_slot = self.trace.changes.len();
        let slot = *self.ids.entry(id).or_insert_with(|| next_slot);
        if slot == next_slot {
            self.trace.changes.push(Vec::new());
        }

        // First declaration of a name wins; later duplicates (other scopes)
        // stay reachable through their dotted path.
        self.trace
            .names
            .entry(reference.to_string())
            .or_insert(slot);
        if !self.scope.is_empty() {
            let path = format!("{}.{}", self.scope.join("."), reference);
            self.trace.names.entry(path).or_insert(slot);
        }
        Ok(())
    }

    /// Value-change section after `$enddefinitions`.
    fn body(&mut self) -> Result<()> {
        let mut time = 0u64;
        while let Some((line, tok)) = self.next() {
            match tok {
                t if t.starts_with('#') => {
                    time = t[1..].parse().map_err(|_| VcdError::Syntax {
                        line,
                        reason: format!("invalid timestamp {t:?}"),
                    })?;
                }
                "$dumpvars" | "$dumpall" | "$dumpon" | "$dumpoff" | "$end" => {
                    // Contents are ordinary value changes; the markers
                    // themselves carry no information for lookup.
                }
                "$comment" => {
                    self.section(line, tok)?;
                }
                t if t.starts_with(['b', 'B', 'r', 'R', 's', 'S']) => {
                    let value = t[1..].to_string();
                    let Some((_, id)) = self.next() else {
                        return Err(VcdError::Syntax {
                            line,
                            reason: format!("value {t:?} has no identifier code"),
                        });
                    };
                    self.record(id, time, value);
                }
                t if t.starts_with(['0', '1', 'x', 'X', 'z', 'Z']) && t.len() > 1 => {
                    let value = t[..1].to_ascii_lowercase();
                    self.record(&t[1..], time, value);
                }
                t => {
                    return Err(VcdError::Syntax {
                        line,
                        reason: format!("unexpected token {t:?} in value-change section"),
                    })
                }
            }
        }
        Ok(())
    }

    fn record(&mut self, id: &'a str, time: u64, value: String) {
        // Undeclared identifier codes get an anonymous slot rather than a
        // hard error; some dumpers emit extras the header never declared.
        let next_slot = self.trace.changes.len();
        let slot = match self.ids.get(id) {
            Some(slot) => *slot,
            None => {
                self.ids.insert(id, next_slot);
                self.trace.changes.push(Vec::new());
                next_slot
            }
        };
        let changes = &mut self.trace.changes[slot];
        // Same-timestamp re-dump: the last write wins.
        if let Some(last) = changes.last_mut() {
            if last.0 == time {
                last.1 = value;
                return;
            }
        }
        changes.push((time, value));
    }
}
