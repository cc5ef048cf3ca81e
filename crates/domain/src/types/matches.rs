//! Match feed types
//!
//! A [`MatchEntry`] is a match as the store returns it: two networks and the
//! running score. A [`MatchRecord`] is the same entry annotated with values
//! derived from the score (SPRT state, win rate) and from the id (creation
//! time). Records are only ever built from an entry in one step, so the
//! derived values cannot drift from the counts they were computed from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::object_id::ObjectId;
use crate::impl_domain_status_conversions;

/// Opponent metadata joined into a match.
///
/// Carries no store-internal or networking fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_steps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    /// Self-play games produced by this network
    #[serde(default)]
    pub game_count: u64,
}

impl NetworkDescriptor {
    /// Descriptor with only the hash filled in
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            description: None,
            training_count: None,
            training_steps: None,
            filesize: None,
            game_count: 0,
        }
    }
}

/// A match between two networks as stored, without derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub network1: NetworkDescriptor,
    pub network2: NetworkDescriptor,
    pub network1_wins: u32,
    pub network1_losses: u32,
    pub game_count: u32,
    /// Games scheduled for this match
    #[serde(default)]
    pub number_to_play: u32,
    #[serde(default)]
    pub is_test: bool,
}

impl MatchEntry {
    /// New match with an empty score.
    pub fn new(id: ObjectId, network1: NetworkDescriptor, network2: NetworkDescriptor) -> Self {
        Self {
            id,
            network1,
            network2,
            network1_wins: 0,
            network1_losses: 0,
            game_count: 0,
            number_to_play: 0,
            is_test: false,
        }
    }

    /// Copy of this entry with one more finished game.
    ///
    /// `network1_won` selects whether the win or the loss column of the
    /// first network grows.
    #[must_use]
    pub fn with_outcome(&self, network1_won: bool) -> Self {
        let mut next = self.clone();
        next.game_count = next.game_count.saturating_add(1);
        if network1_won {
            next.network1_wins = next.network1_wins.saturating_add(1);
        } else {
            next.network1_losses = next.network1_losses.saturating_add(1);
        }
        next
    }

    /// Whether `hash` plays on either side of this match.
    pub fn involves(&self, hash: &str) -> bool {
        self.network1.hash == hash || self.network2.hash == hash
    }
}

/// Terminal SPRT verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprtDecision {
    /// The alternative hypothesis holds: network1 is stronger
    Accepted,
    /// The null hypothesis holds: no improvement
    Rejected,
}

impl_domain_status_conversions!(SprtDecision {
    Accepted => "accepted",
    Rejected => "rejected",
});

/// SPRT state of a match: a verdict, or how far the test has travelled
/// toward one (percent, 0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SprtValue {
    /// The test has stopped with this verdict
    Decided(SprtDecision),
    /// Undecided; percent of the way to a bound
    Progress(i64),
}

impl SprtValue {
    /// The verdict, `None` while undecided.
    pub fn decision(&self) -> Option<SprtDecision> {
        match self {
            Self::Decided(decision) => Some(*decision),
            Self::Progress(_) => None,
        }
    }

    /// The progress percent, `None` once decided.
    pub fn progress(&self) -> Option<i64> {
        match self {
            Self::Progress(percent) => Some(*percent),
            Self::Decided(_) => None,
        }
    }
}

/// A match annotated with derived statistics, as served by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// The stored match, flattened into the record
    #[serde(flatten)]
    pub entry: MatchEntry,
    /// SPRT verdict or progress
    #[serde(rename = "SPRT")]
    pub sprt: SprtValue,
    /// Percentage of games won by network1, two decimals
    pub winrate: String,
    /// Creation time read from the id
    pub time: DateTime<Utc>,
}

impl MatchRecord {
    /// Id of the underlying match.
    pub fn id(&self) -> ObjectId {
        self.entry.id
    }
}
