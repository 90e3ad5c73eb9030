use crate::communities::Stance;
use crate::counting::{bump, merge_counts, sum_counts, DateCounts};
use serde::{Deserialize, Serialize};

/// Per-topic result: how often the topic was referenced, split by stance and
/// date bucket. Serializes to
/// `{name, total_references, support_references_per_date, oppose_references_per_date, neutral_references_per_date}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub name: String,
    pub total_references: u64,
    pub support_references_per_date: DateCounts,
    pub oppose_references_per_date: DateCounts,
    pub neutral_references_per_date: DateCounts,
}

impl TopicSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn add_reference(&mut self, date: &str, stance: Stance) {
        let counts = match stance {
            Stance::Supporting => &mut self.support_references_per_date,
            Stance::Opposing => &mut self.oppose_references_per_date,
            Stance::Neutral => &mut self.neutral_references_per_date,
        };
        bump(counts, date);
        self.total_references += 1;
    }

    pub fn per_date(&self, stance: Stance) -> &DateCounts {
        match stance {
            Stance::Supporting => &self.support_references_per_date,
            Stance::Opposing => &self.oppose_references_per_date,
            Stance::Neutral => &self.neutral_references_per_date,
        }
    }

    /// Count for one stance and date (0 when absent).
    pub fn count(&self, stance: Stance, date: &str) -> u64 {
        self.per_date(stance).get(date).copied().unwrap_or(0)
    }

    /// Sum over all three stance maps; equals `total_references` for any
    /// summary built through `add_reference` / `merge`.
    pub fn bucket_total(&self) -> u64 {
        sum_counts(&self.support_references_per_date)
            + sum_counts(&self.oppose_references_per_date)
            + sum_counts(&self.neutral_references_per_date)
    }

    /// Fold another partial summary of the same topic into this one.
    pub fn merge(&mut self, other: TopicSummary) {
        debug_assert_eq!(self.name, other.name);
        self.total_references += other.total_references;
        merge_counts(&mut self.support_references_per_date, other.support_references_per_date);
        merge_counts(&mut self.oppose_references_per_date, other.oppose_references_per_date);
        merge_counts(&mut self.neutral_references_per_date, other.neutral_references_per_date);
    }
}
