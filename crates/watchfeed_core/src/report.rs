/// Outcome for one closed entry of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDecision {
    pub identifier: Option<String>,
    pub kept: bool,
}

/// What the filter did with the entries it saw, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterReport {
    pub decisions: Vec<EntryDecision>,
    /// Input ended while an entry was still open; that entry was dropped.
    pub unterminated: bool,
}

impl FilterReport {
    pub fn kept(&self) -> usize {
        self.decisions.iter().filter(|d| d.kept).count()
    }

    pub fn discarded(&self) -> usize {
        self.decisions.len() - self.kept()
    }
}
