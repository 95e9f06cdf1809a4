//! Per-scan state threaded through the matcher.

use super::slot::{SlotRead, SlotType, SlotValue, SlotWrite};

/// Mutable state for one scan over one instruction stream: the current
/// position, the slot bindings made so far, and an optional step trace.
///
/// A context belongs to exactly one scan. Reusing one across scans carries
/// bindings from the previous scan into the next; create a fresh context
/// per candidate instead.
#[derive(Debug, Clone)]
pub struct Context {
    position: usize,
    bindings: Vec<(u32, SlotValue)>,
    tracing: bool,
    trace: Vec<String>,
}

impl Context {
    /// A context at stream start with no bindings.
    pub fn start() -> Self {
        Self {
            position: 0,
            bindings: Vec::new(),
            tracing: false,
            trace: Vec::new(),
        }
    }

    /// Enable step-by-step trace accumulation for this scan.
    pub fn with_trace(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Move the starting position, for scans beginning mid-stream.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Current stream position.
    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Bind `slot` to `value`, overwriting any prior binding.
    pub fn store<T: SlotType>(&mut self, slot: SlotWrite<T>, value: T) {
        let key = slot.key();
        let value = value.into_value();
        match self.bindings.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.bindings.push((key, value)),
        }
    }

    /// Value bound to `slot`, or `None` while the slot is unwritten.
    pub fn retrieve<T: SlotType>(&self, slot: SlotRead<T>) -> Option<T> {
        let key = slot.key();
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, value)| T::from_value(*value))
    }

    /// Accumulated trace lines; empty unless tracing was enabled.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    pub(crate) fn is_tracing(&self) -> bool {
        self.tracing
    }

    pub(crate) fn force_trace(&mut self) {
        self.tracing = true;
    }

    pub(crate) fn note(&mut self, line: String) {
        tracing::trace!("{line}");
        self.trace.push(line);
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            bindings: self.bindings.clone(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: &Snapshot) {
        self.position = snapshot.position;
        self.bindings.clear();
        self.bindings.extend_from_slice(&snapshot.bindings);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::start()
    }
}

/// Saved position and bindings for backtracking.
///
/// The trace is deliberately not part of the snapshot: abandoned paths stay
/// visible when tracing is on.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    position: usize,
    bindings: Vec<(u32, SlotValue)>,
}

impl Snapshot {
    pub(crate) fn position(&self) -> usize {
        self.position
    }
}
