//! Per-invocation record of what has been sent so far.

use cmdbot_core::MessageHandle;

/// The one-or-more message handles produced from sending one logical chunk
/// (a chunk may have been split further by platform length limits). Handles
/// preserve chunk order; index 0 is the anchor that survives truncation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentUnit {
    handles: Vec<MessageHandle>,
}

impl SentUnit {
    pub fn new(handles: Vec<MessageHandle>) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &[MessageHandle] {
        &self.handles
    }

    pub fn first(&self) -> Option<&MessageHandle> {
        self.handles.first()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn into_handles(self) -> Vec<MessageHandle> {
        self.handles
    }
}

/// Ordered sent units plus the cursor identifying which unit the next edit
/// targets. `cursor` is `None` (no prior output to edit against) or a valid
/// index into `units`. An explicit value threaded through each reconciliation
/// call rather than hidden fields on a long-lived object.
#[derive(Debug, Clone, Default)]
pub struct ResponseState {
    units: Vec<SentUnit>,
    cursor: Option<usize>,
}

impl ResponseState {
    /// Empty state: no sent units, cursor at rest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn units(&self) -> &[SentUnit] {
        &self.units
    }

    /// Steps the cursor to the next sent-unit slot and returns it. The slot
    /// may be one past the current unit list, in which case the response at
    /// that slot is a fresh send rather than an edit.
    pub(crate) fn advance(&mut self) -> usize {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next);
        next
    }

    pub(crate) fn unit(&self, slot: usize) -> Option<&SentUnit> {
        self.units.get(slot)
    }

    pub(crate) fn set_unit(&mut self, slot: usize, unit: SentUnit) {
        self.units[slot] = unit;
    }

    pub(crate) fn push_unit(&mut self, unit: SentUnit) {
        self.units.push(unit);
    }

    /// Removes and returns every unit from `from` on (the stale tail).
    pub(crate) fn drain_tail(&mut self, from: usize) -> Vec<SentUnit> {
        if from >= self.units.len() {
            return Vec::new();
        }
        self.units.split_off(from)
    }

    /// Rests the cursor so the next respond call starts from slot 0 again,
    /// keeping the current unit list for the next run to edit against.
    pub(crate) fn rest(&mut self) {
        self.cursor = None;
    }
}
