use chrono::{DateTime, Utc};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::error::{MetricsError, Result};

/// How long the copy acknowledgement stays visible.
pub const COPY_NOTICE_WINDOW: Duration = Duration::from_millis(2000);

/// Solved-problem counts for one user, as committed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_solved: u32,
    pub easy_solved: u32,
    pub medium_solved: u32,
    pub hard_solved: u32,
}

impl Stats {
    /// Sum of the three per-difficulty counts. The provider's total is not
    /// required to match this.
    pub fn difficulty_sum(&self) -> u32 {
        self.easy_solved + self.medium_solved + self.hard_solved
    }

    pub fn chart_segments(&self) -> [ChartSegment; 3] {
        [
            ChartSegment { difficulty: Difficulty::Easy, value: self.easy_solved },
            ChartSegment { difficulty: Difficulty::Medium, value: self.medium_solved },
            ChartSegment { difficulty: Difficulty::Hard, value: self.hard_solved },
        ]
    }
}

/// Raw wire shape of the provider's `/{username}/solved` response.
///
/// Every field is optional: the provider answers structurally valid JSON even
/// when the username is unknown, carrying an `error`/`errors` indicator
/// instead of counts. Converting into `Stats` is the semantic validation
/// step, separate from transport/decode failures.
#[derive(Debug, Clone, Deserialize)]
pub struct SolvedPayload {
    #[serde(rename = "solvedProblem")]
    pub solved_problem: Option<u32>,
    #[serde(rename = "easySolved")]
    pub easy_solved: Option<u32>,
    #[serde(rename = "mediumSolved")]
    pub medium_solved: Option<u32>,
    #[serde(rename = "hardSolved")]
    pub hard_solved: Option<u32>,
    pub error: Option<serde_json::Value>,
    pub errors: Option<serde_json::Value>,
}

impl SolvedPayload {
    /// Validate the payload and produce committed stats.
    ///
    /// An explicit error indicator or an absent `solvedProblem` field is an
    /// upstream error. A present-but-zero solved count is a valid result;
    /// absent per-difficulty counts default to 0.
    pub fn into_stats(self) -> Result<Stats> {
        if let Some(indicator) = self.error.or(self.errors) {
            let message = match &indicator {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(MetricsError::Upstream(message));
        }

        let total = self
            .solved_problem
            .ok_or_else(|| MetricsError::Upstream("response missing solved count".to_string()))?;

        Ok(Stats {
            total_solved: total,
            easy_solved: self.easy_solved.unwrap_or(0),
            medium_solved: self.medium_solved.unwrap_or(0),
            hard_solved: self.hard_solved.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Difficulty::Easy => Color::Cyan,
            Difficulty::Medium => Color::Yellow,
            Difficulty::Hard => Color::Red,
        }
    }
}

/// One slice of the difficulty breakdown, derived fresh from `Stats` on each
/// render and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSegment {
    pub difficulty: Difficulty,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,    // Before the initial fetch resolves
    Loading, // A search is in flight
    Success, // Stats committed for the current username
    Error,   // Last search failed; previous username kept
}

/// The search state machine. `stats` is `Some` exactly when `phase` is
/// `Success`; `username` only ever changes on a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub username: String,
    pub stats: Option<Stats>,
    pub phase: Phase,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl SearchState {
    pub fn new(initial_username: &str) -> Self {
        Self {
            username: initial_username.to_string(),
            stats: None,
            phase: Phase::Idle,
            fetched_at: None,
        }
    }

    /// Transition into Loading. Any prior result or error banner is cleared.
    pub fn begin(&mut self) {
        self.phase = Phase::Loading;
        self.stats = None;
    }

    /// Apply the outcome of a fetch for `searched`. Failures keep the
    /// last-known-good committed username.
    pub fn resolve(&mut self, searched: &str, outcome: Result<Stats>) {
        match outcome {
            Ok(stats) => {
                self.username = searched.to_string();
                self.stats = Some(stats);
                self.phase = Phase::Success;
                self.fetched_at = Some(Utc::now());
            }
            Err(_) => {
                self.stats = None;
                self.phase = Phase::Error;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed,
}

/// Transient clipboard acknowledgement, independent of the search state.
#[derive(Debug, Clone, Copy)]
pub struct CopyNotice {
    pub outcome: CopyOutcome,
    pub shown_at: Instant,
}

impl CopyNotice {
    pub fn new(outcome: CopyOutcome) -> Self {
        Self {
            outcome,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= COPY_NOTICE_WINDOW
    }
}

#[derive(Debug)]
pub struct AppState {
    pub search: SearchState,
    pub input_buffer: String,
    pub copy_notice: Option<CopyNotice>,
}

impl AppState {
    pub fn new(initial_username: &str) -> Self {
        Self {
            search: SearchState::new(initial_username),
            input_buffer: String::new(),
            copy_notice: None,
        }
    }
}

pub fn profile_url(username: &str) -> String {
    format!("https://leetcode.com/{}", username)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SolvedPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn payload_with_all_fields_decodes_exactly() {
        let payload = parse(
            r#"{"solvedProblem": 250, "easySolved": 120, "mediumSolved": 100, "hardSolved": 30}"#,
        );
        let stats = payload.into_stats().unwrap();
        assert_eq!(stats.total_solved, 250);
        assert_eq!(stats.easy_solved, 120);
        assert_eq!(stats.medium_solved, 100);
        assert_eq!(stats.hard_solved, 30);
    }

    #[test]
    fn absent_difficulty_fields_default_to_zero() {
        let payload = parse(r#"{"solvedProblem": 10}"#);
        let stats = payload.into_stats().unwrap();
        assert_eq!(stats.total_solved, 10);
        assert_eq!(stats.easy_solved, 0);
        assert_eq!(stats.medium_solved, 0);
        assert_eq!(stats.hard_solved, 0);
    }

    #[test]
    fn zero_solved_is_a_valid_success() {
        let payload = parse(
            r#"{"solvedProblem": 0, "easySolved": 0, "mediumSolved": 0, "hardSolved": 0}"#,
        );
        let stats = payload.into_stats().unwrap();
        assert_eq!(stats.total_solved, 0);
    }

    #[test]
    fn explicit_error_indicator_is_upstream_error() {
        let payload = parse(r#"{"error": "user not found"}"#);
        let err = payload.into_stats().unwrap_err();
        assert!(err.is_semantic());
        assert!(err.to_string().contains("user not found"));
    }

    #[test]
    fn errors_array_is_upstream_error() {
        let payload = parse(r#"{"errors": [{"message": "that user does not exist"}]}"#);
        assert!(payload.into_stats().unwrap_err().is_semantic());
    }

    #[test]
    fn missing_solved_count_is_upstream_error() {
        let payload = parse(r#"{"easySolved": 5}"#);
        assert!(payload.into_stats().unwrap_err().is_semantic());
    }

    #[test]
    fn chart_segments_keep_fixed_order_and_values() {
        let stats = Stats {
            total_solved: 250,
            easy_solved: 120,
            medium_solved: 100,
            hard_solved: 30,
        };
        let segments = stats.chart_segments();

        assert_eq!(segments[0].difficulty, Difficulty::Easy);
        assert_eq!(segments[1].difficulty, Difficulty::Medium);
        assert_eq!(segments[2].difficulty, Difficulty::Hard);
        assert_eq!(segments[0].value, 120);
        assert_eq!(segments[1].value, 100);
        assert_eq!(segments[2].value, 30);

        let segment_sum: u32 = segments.iter().map(|s| s.value).sum();
        assert_eq!(segment_sum, stats.difficulty_sum());
    }

    #[test]
    fn segment_colors_are_fixed_per_difficulty() {
        assert_eq!(Difficulty::Easy.color(), Color::Cyan);
        assert_eq!(Difficulty::Medium.color(), Color::Yellow);
        assert_eq!(Difficulty::Hard.color(), Color::Red);
    }

    #[test]
    fn resolve_success_commits_the_searched_username() {
        let mut state = SearchState::new("Priyanshu");
        state.begin();
        state.resolve(
            "gaurav_era",
            Ok(Stats {
                total_solved: 250,
                easy_solved: 120,
                medium_solved: 100,
                hard_solved: 30,
            }),
        );

        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.username, "gaurav_era");
        assert!(state.stats.is_some());
        assert!(state.fetched_at.is_some());
    }

    #[test]
    fn resolve_failure_keeps_the_committed_username() {
        let mut state = SearchState::new("Priyanshu");
        state.begin();
        state.resolve(
            "Priyanshu",
            Ok(Stats {
                total_solved: 42,
                easy_solved: 20,
                medium_solved: 15,
                hard_solved: 7,
            }),
        );

        state.begin();
        state.resolve(
            "ghost_user_404",
            Err(MetricsError::Upstream("user not found".to_string())),
        );

        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.username, "Priyanshu");
        assert!(state.stats.is_none());
    }

    #[test]
    fn begin_clears_previous_stats() {
        let mut state = SearchState::new("Priyanshu");
        state.resolve(
            "Priyanshu",
            Ok(Stats {
                total_solved: 1,
                easy_solved: 1,
                medium_solved: 0,
                hard_solved: 0,
            }),
        );

        state.begin();
        assert_eq!(state.phase, Phase::Loading);
        assert!(state.stats.is_none());
    }

    #[test]
    fn profile_url_embeds_the_username() {
        assert_eq!(profile_url("gaurav_era"), "https://leetcode.com/gaurav_era");
    }
}
