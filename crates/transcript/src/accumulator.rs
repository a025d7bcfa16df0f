//! Per-stream reconciliation of interim vs. final fragments.
//!
//! Each speech stream alternates between revisable interim fragments and
//! committed final ones. The accumulator keeps exactly two strings per
//! stream: the append-only finalized text and the latest interim fragment.
//! A final fragment replaces nothing already committed; it only extends.

/// Running transcript state for one speech stream.
///
/// `apply` trusts the per-stream arrival order of its single source; it does
/// not reorder or deduplicate across out-of-order delivery.
#[derive(Debug, Clone, Default)]
pub struct StreamAccumulator {
    finalized: String,
    interim: String,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fragment. Returns the newly committed delta when `is_final`
    /// produced new text, `None` otherwise.
    ///
    /// Empty or whitespace-only fragments are ignored with no state change.
    pub fn apply(&mut self, text: &str, is_final: bool) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        if !is_final {
            self.interim.clear();
            self.interim.push_str(trimmed);
            return None;
        }

        if !self.finalized.is_empty() {
            self.finalized.push(' ');
        }
        self.finalized.push_str(trimmed);
        self.interim.clear();

        Some(trimmed.to_string())
    }

    pub fn finalized_text(&self) -> &str {
        &self.finalized
    }

    pub fn interim_text(&self) -> &str {
        &self.interim
    }

    /// Session start / clear only; never called mid-session.
    pub fn reset(&mut self) {
        self.finalized.clear();
        self.interim.clear();
    }
}
