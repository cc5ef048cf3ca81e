//! Sequential probability ratio test over win/loss counts.
//!
//! Each game is a Bernoulli trial for network1. The log-likelihood ratio uses
//! the normal approximation of the score distribution:
//!
//! ```text
//! s     = W / N                       observed score
//! var_s = s (1 - s) / N               variance of the mean
//! s_k   = 1 / (1 + 10^(-elo_k / 400)) expected score under H_k
//! LLR   = (s1 - s0) (2s - s0 - s1) / (2 var_s)
//! ```
//!
//! The test accepts H1 once `LLR > ln((1 - beta) / alpha)` and rejects it once
//! `LLR < ln(beta / (1 - alpha))`. Zero counts are evaluated as one so the
//! statistic is finite from the first game on.

use matchfeed_domain::{SprtConfig, SprtDecision, SprtValue};

/// Hypotheses and error rates of the test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprtParams {
    /// Elo difference under H0
    pub elo0: f64,
    /// Elo difference under H1
    pub elo1: f64,
    /// Probability of accepting H1 when H0 holds
    pub alpha: f64,
    /// Probability of rejecting H1 when it holds
    pub beta: f64,
}

impl Default for SprtParams {
    fn default() -> Self {
        Self::from(&SprtConfig::default())
    }
}

impl From<&SprtConfig> for SprtParams {
    fn from(config: &SprtConfig) -> Self {
        Self { elo0: config.elo0, elo1: config.elo1, alpha: config.alpha, beta: config.beta }
    }
}

impl SprtParams {
    /// LLR below which H1 is rejected
    pub fn lower_bound(&self) -> f64 {
        (self.beta / (1.0 - self.alpha)).ln()
    }

    /// LLR above which H1 is accepted
    pub fn upper_bound(&self) -> f64 {
        ((1.0 - self.beta) / self.alpha).ln()
    }

    /// Log-likelihood ratio of H1 against H0 for the given score.
    pub fn llr(&self, wins: u32, losses: u32) -> f64 {
        let wins = f64::from(wins.max(1));
        let losses = f64::from(losses.max(1));

        let games = wins + losses;
        let score = wins / games;
        let variance_of_mean = score * (1.0 - score) / games;

        let s0 = expected_score(self.elo0);
        let s1 = expected_score(self.elo1);

        (s1 - s0) * (2.0 * score - s0 - s1) / variance_of_mean / 2.0
    }

    /// Verdict once a bound is crossed, `None` while the test is still open.
    pub fn decide(&self, wins: u32, losses: u32) -> Option<SprtDecision> {
        let llr = self.llr(wins, losses);
        if llr > self.upper_bound() {
            Some(SprtDecision::Accepted)
        } else if llr < self.lower_bound() {
            Some(SprtDecision::Rejected)
        } else {
            None
        }
    }

    /// Position of the LLR between the two bounds, as a whole percentage.
    ///
    /// 0 sits on the rejection bound, 100 on the acceptance bound, 50 halfway.
    pub fn progress(&self, wins: u32, losses: u32) -> i64 {
        let lower = self.lower_bound();
        let span = self.upper_bound() - lower;
        let percent = 100.0 * (self.llr(wins, losses) - lower) / span;
        percent.round().clamp(0.0, 100.0) as i64
    }

    /// Verdict if decided, otherwise the progress estimate.
    pub fn evaluate(&self, wins: u32, losses: u32) -> SprtValue {
        match self.decide(wins, losses) {
            Some(decision) => SprtValue::Decided(decision),
            None => SprtValue::Progress(self.progress(wins, losses)),
        }
    }
}

/// Expected score of a player `elo` points stronger than its opponent.
fn expected_score(elo: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-elo / 400.0))
}

/// [`SprtParams::decide`] with the default hypotheses (0 vs +35 Elo, 5%/5%).
pub fn compute_sprt(wins: u32, losses: u32) -> Option<SprtDecision> {
    SprtParams::default().decide(wins, losses)
}

/// [`SprtParams::progress`] with the default hypotheses.
pub fn progress_estimate(wins: u32, losses: u32) -> i64 {
    SprtParams::default().progress(wins, losses)
}
