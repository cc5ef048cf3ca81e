//! Derives the statistics a match record carries from its score.

use matchfeed_domain::{MatchEntry, MatchRecord, SprtConfig, SprtDecision, SprtValue};

use super::sprt::SprtParams;

/// Pure statistics over win/loss counts, parameterised by the SPRT setup.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsEngine {
    params: SprtParams,
}

impl StatsEngine {
    /// Engine over explicit SPRT parameters.
    pub fn new(params: SprtParams) -> Self {
        Self { params }
    }

    /// Engine whose parameters come from the `sprt` config section.
    pub fn from_config(config: &SprtConfig) -> Self {
        Self::new(SprtParams::from(config))
    }

    /// The parameters in use.
    pub fn params(&self) -> &SprtParams {
        &self.params
    }

    /// Verdict of the test, `None` while undecided.
    pub fn compute_sprt(&self, wins: u32, losses: u32) -> Option<SprtDecision> {
        self.params.decide(wins, losses)
    }

    /// Progress toward a verdict in percent; meaningful while undecided.
    pub fn progress_estimate(&self, wins: u32, losses: u32) -> i64 {
        self.params.progress(wins, losses)
    }

    /// The verdict when there is one, otherwise the progress estimate.
    pub fn evaluate(&self, wins: u32, losses: u32) -> SprtValue {
        self.params.evaluate(wins, losses)
    }

    /// Builds the served record for `entry`: SPRT state and win rate from the
    /// score, creation time from the id.
    pub fn annotate(&self, entry: MatchEntry) -> MatchRecord {
        let sprt = self.evaluate(entry.network1_wins, entry.network1_losses);
        let winrate = win_rate(entry.network1_wins, entry.network1_losses);
        let time = entry.id.timestamp();
        MatchRecord { entry, sprt, winrate, time }
    }

    /// [`annotate`](Self::annotate) each entry, keeping their order.
    pub fn annotate_all(&self, entries: Vec<MatchEntry>) -> Vec<MatchRecord> {
        entries.into_iter().map(|entry| self.annotate(entry)).collect()
    }
}

/// Share of games won by network1 as a percentage with two decimals.
///
/// A match without wins reports `"0.00"` without dividing, which also covers
/// a match with no games at all.
pub fn win_rate(wins: u32, losses: u32) -> String {
    if wins == 0 {
        return format!("{:.2}", 0.0);
    }
    let games = u64::from(wins) + u64::from(losses);
    format!("{:.2}", f64::from(wins) * 100.0 / games as f64)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use matchfeed_domain::{NetworkDescriptor, ObjectId};

    use super::*;

    fn entry(wins: u32, losses: u32) -> MatchEntry {
        let created = Utc.timestamp_opt(1_520_000_000, 0).unwrap();
        let mut entry = MatchEntry::new(
            ObjectId::with_timestamp(created),
            NetworkDescriptor::new("9f3a"),
            NetworkDescriptor::new("1c2b"),
        );
        entry.network1_wins = wins;
        entry.network1_losses = losses;
        entry.game_count = wins + losses;
        entry
    }

    #[test]
    fn win_rate_formats_two_decimals() {
        assert_eq!(win_rate(11, 3), "78.57");
        assert_eq!(win_rate(1, 2), "33.33");
        assert_eq!(win_rate(5, 0), "100.00");
    }

    #[test]
    fn win_rate_without_wins_is_zero() {
        assert_eq!(win_rate(0, 7), "0.00");
        assert_eq!(win_rate(0, 0), "0.00");
    }

    #[test]
    fn annotate_derives_every_field() {
        let engine = StatsEngine::default();
        let record = engine.annotate(entry(11, 3));

        assert_eq!(record.sprt, SprtValue::Progress(68));
        assert_eq!(record.winrate, "78.57");
        assert_eq!(record.time, Utc.timestamp_opt(1_520_000_000, 0).unwrap());
        assert_eq!(record.entry.network1_wins, 11);
    }

    #[test]
    fn annotate_all_keeps_order() {
        let engine = StatsEngine::default();
        let first = entry(100, 10);
        let second = entry(0, 0);
        let ids = [first.id, second.id];

        let records = engine.annotate_all(vec![first, second]);

        assert_eq!(records.iter().map(MatchRecord::id).collect::<Vec<_>>(), ids);
        assert_eq!(records[0].sprt, SprtValue::Decided(SprtDecision::Accepted));
        assert_eq!(records[1].sprt, SprtValue::Progress(50));
    }

    #[test]
    fn engine_uses_configured_hypotheses() {
        let config = SprtConfig { elo1: 200.0, ..SprtConfig::default() };
        let engine = StatsEngine::from_config(&config);
        assert_eq!(engine.compute_sprt(11, 3), Some(SprtDecision::Accepted));
        assert_eq!(engine.params().elo1, 200.0);
    }
}
