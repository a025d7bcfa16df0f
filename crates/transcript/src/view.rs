//! Fuses the two per-speaker accumulators into one ordered conversation.
//!
//! Entries are appended in arrival order of their finalize events. The two
//! streams ride independent audio pipelines with independent latency, so no
//! clock reconciliation between them is attempted; ordering is "whichever
//! finalized delta landed first". This is a known approximation, kept on
//! purpose.

use std::collections::BTreeMap;

use coach_stt_interface::TranscriptFragment;

use crate::accumulator::StreamAccumulator;
use crate::types::{ConversationEntry, MergeUpdate, Speaker, now_unix_ms};

/// Ordered conversation history plus the live combined-text projection.
///
/// Owns both stream accumulators and the entry history exclusively; callers
/// get read projections only.
#[derive(Debug, Default)]
pub struct ConversationView {
    streams: BTreeMap<Speaker, StreamAccumulator>,
    entries: Vec<ConversationEntry>,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fragment for one speaker. Appends a [`ConversationEntry`]
    /// iff the fragment produced a non-empty finalized delta.
    pub fn apply(&mut self, speaker: Speaker, fragment: &TranscriptFragment) -> MergeUpdate {
        let delta = self
            .streams
            .entry(speaker)
            .or_default()
            .apply(&fragment.text, fragment.is_final);

        let new_entry = delta.map(|text| {
            let entry = ConversationEntry {
                id: uuid::Uuid::new_v4().to_string(),
                speaker,
                text,
                // Creation times must not run backwards across entries.
                timestamp_ms: self
                    .entries
                    .last()
                    .map_or(0, |e| e.timestamp_ms)
                    .max(now_unix_ms()),
            };
            self.entries.push(entry.clone());
            entry
        });

        MergeUpdate { new_entry }
    }

    /// The live projection consumed by analysis and presentation: every
    /// finalized entry in order, then any in-progress interim fragment per
    /// stream, each rendered as `"<Speaker>: <text>"`.
    pub fn combined_transcript(&self) -> String {
        let mut combined = String::new();

        for entry in &self.entries {
            combined.push_str(entry.speaker.label());
            combined.push_str(": ");
            combined.push_str(&entry.text);
            combined.push_str("\n\n");
        }

        for speaker in [Speaker::Client, Speaker::Operator] {
            if let Some(acc) = self.streams.get(&speaker) {
                let interim = acc.interim_text();
                if !interim.is_empty() {
                    combined.push_str(speaker.label());
                    combined.push_str(": ");
                    combined.push_str(interim);
                    combined.push_str("\n\n");
                }
            }
        }

        combined
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn finalized_text(&self, speaker: Speaker) -> &str {
        self.streams
            .get(&speaker)
            .map_or("", |acc| acc.finalized_text())
    }

    pub fn interim_text(&self, speaker: Speaker) -> &str {
        self.streams
            .get(&speaker)
            .map_or("", |acc| acc.interim_text())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self
                .streams
                .values()
                .all(|acc| acc.finalized_text().is_empty() && acc.interim_text().is_empty())
    }

    /// Drop all history and stream state, as at session start.
    pub fn clear(&mut self) {
        self.entries.clear();
        for acc in self.streams.values_mut() {
            acc.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interim(text: &str) -> TranscriptFragment {
        TranscriptFragment::interim(text)
    }

    fn finalized(text: &str) -> TranscriptFragment {
        TranscriptFragment::finalized(text)
    }

    #[test]
    fn interim_then_final_produces_exactly_one_entry() {
        let mut view = ConversationView::new();

        let update = view.apply(Speaker::Client, &interim("I think"));
        assert!(update.new_entry.is_none());

        let update = view.apply(Speaker::Client, &finalized("I think it's too expensive"));
        let entry = update.new_entry.unwrap();
        assert_eq!(entry.speaker, Speaker::Client);
        assert_eq!(entry.text, "I think it's too expensive");

        let combined = view.combined_transcript();
        assert_eq!(
            combined.matches("Client:").count(),
            1,
            "one utterance must render as one client line, not two"
        );
    }

    #[test]
    fn operator_final_lands_while_client_is_mid_interim() {
        let mut view = ConversationView::new();

        view.apply(Speaker::Client, &interim("well I was wondering"));
        let update = view.apply(Speaker::Operator, &finalized("Let me explain the pricing"));

        assert!(update.new_entry.is_some());
        assert_eq!(view.entries().len(), 1);
        assert_eq!(view.entries()[0].speaker, Speaker::Operator);

        // The client interim stays a live-only projection.
        let combined = view.combined_transcript();
        assert!(combined.contains("You: Let me explain the pricing"));
        assert!(combined.contains("Client: well I was wondering"));
        assert_eq!(view.interim_text(Speaker::Client), "well I was wondering");
    }

    #[test]
    fn entry_count_equals_nonempty_finalized_deltas() {
        let mut view = ConversationView::new();

        let events = [
            (Speaker::Client, interim("so")),
            (Speaker::Client, finalized("so what does it cost")),
            (Speaker::Operator, finalized("It starts at forty a month")),
            (Speaker::Client, finalized("   ")), // ignored
            (Speaker::Client, finalized("that's a lot")),
            (Speaker::Operator, interim("we can")),
        ];

        let mut appended = 0;
        for (speaker, fragment) in &events {
            if view.apply(*speaker, fragment).new_entry.is_some() {
                appended += 1;
            }
        }

        assert_eq!(appended, 3);
        assert_eq!(view.entries().len(), 3);
    }

    #[test]
    fn entries_follow_finalize_arrival_order() {
        let mut view = ConversationView::new();

        view.apply(Speaker::Operator, &finalized("first"));
        view.apply(Speaker::Client, &finalized("second"));
        view.apply(Speaker::Operator, &finalized("third"));

        let speakers: Vec<_> = view.entries().iter().map(|e| e.speaker).collect();
        assert_eq!(
            speakers,
            [Speaker::Operator, Speaker::Client, Speaker::Operator]
        );

        assert!(
            view.entries()
                .windows(2)
                .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms),
            "entry timestamps must be monotonic"
        );
    }

    #[test]
    fn combined_transcript_renders_speaker_labels() {
        let mut view = ConversationView::new();

        view.apply(Speaker::Client, &finalized("I already have a vendor"));
        view.apply(Speaker::Operator, &finalized("What do they charge you?"));

        assert_eq!(
            view.combined_transcript(),
            "Client: I already have a vendor\n\nYou: What do they charge you?\n\n"
        );
    }

    #[test]
    fn clear_then_replay_matches_a_fresh_session() {
        let events = [
            (Speaker::Client, finalized("hello")),
            (Speaker::Operator, finalized("hi there")),
            (Speaker::Client, interim("I was")),
        ];

        let mut reused = ConversationView::new();
        reused.apply(Speaker::Client, &finalized("stale"));
        reused.apply(Speaker::Operator, &interim("leftover"));
        reused.clear();
        assert!(reused.is_empty());

        let mut fresh = ConversationView::new();
        for (speaker, fragment) in &events {
            reused.apply(*speaker, fragment);
            fresh.apply(*speaker, fragment);
        }

        let reused_texts: Vec<_> = reused.entries().iter().map(|e| &e.text).collect();
        let fresh_texts: Vec<_> = fresh.entries().iter().map(|e| &e.text).collect();
        assert_eq!(reused_texts, fresh_texts);
        assert_eq!(reused.combined_transcript(), fresh.combined_transcript());
    }

    #[test]
    fn empty_view_projects_empty_string() {
        let view = ConversationView::new();
        assert!(view.is_empty());
        assert_eq!(view.combined_transcript(), "");
    }
}
