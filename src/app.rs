use crate::api::StatsClient;
use crate::clipboard;
use crate::error::Result;
use crate::types::*;
use ratatui::layout::Alignment;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Fixed banner text for a failed search, regardless of the failure class.
pub const ERROR_BANNER: &str = "user not found or rate limit reached";

/// Outcome of one spawned fetch, tagged with its issue order so stale
/// responses can be discarded.
#[derive(Debug)]
pub struct FetchDone {
    pub seq: u64,
    pub username: String,
    pub outcome: Result<Stats>,
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    client: StatsClient,
    fetch_seq: u64,
    results_tx: UnboundedSender<FetchDone>,
    results_rx: UnboundedReceiver<FetchDone>,
}

impl App {
    pub fn new(initial_username: &str, client: StatsClient) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(initial_username),
            should_quit: false,
            client,
            fetch_seq: 0,
            results_tx,
            results_rx,
        }
    }

    pub fn handle_input(&mut self, c: char) {
        self.state.input_buffer.push(c);
    }

    pub fn handle_enter(&mut self) {
        let query = self.state.input_buffer.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.state.input_buffer.clear();
        self.search(&query);
    }

    /// Issue a search for `raw`. Spawns the fetch and returns immediately;
    /// the outcome comes home through the results channel.
    pub fn search(&mut self, raw: &str) {
        let Some(seq) = self.begin_search(raw) else {
            return;
        };

        let username = raw.trim().to_string();
        let client = self.client.clone();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let outcome = client.fetch_solved(&username).await;
            // The receiver only drops on shutdown; losing the result is fine then.
            let _ = tx.send(FetchDone { seq, username, outcome });
        });
    }

    /// Synchronous half of `search`: validates input and transitions to
    /// Loading. Returns the sequence number the fetch must carry, or `None`
    /// for the empty-input no-op.
    fn begin_search(&mut self, raw: &str) -> Option<u64> {
        let username = raw.trim();
        if username.is_empty() {
            return None;
        }

        self.fetch_seq += 1;
        self.state.search.begin();
        info!(username = username, seq = self.fetch_seq, "search started");
        Some(self.fetch_seq)
    }

    /// Apply any completed fetches. Called once per event-loop iteration.
    pub fn drain_fetch_results(&mut self) {
        while let Ok(done) = self.results_rx.try_recv() {
            self.apply_fetch(done);
        }
    }

    fn apply_fetch(&mut self, done: FetchDone) {
        if done.seq != self.fetch_seq {
            debug!(
                seq = done.seq,
                latest = self.fetch_seq,
                "discarding stale fetch result"
            );
            return;
        }

        match &done.outcome {
            Ok(stats) => info!(
                username = %done.username,
                total_solved = stats.total_solved,
                "search succeeded"
            ),
            Err(e) if e.is_semantic() => {
                warn!(username = %done.username, error = %e, "provider rejected username")
            }
            Err(e) => warn!(username = %done.username, error = %e, "fetch failed"),
        }

        self.state.search.resolve(&done.username, done.outcome);
    }

    /// Copy `https://leetcode.com/{committed}` to the system clipboard and
    /// show a time-boxed acknowledgement either way.
    pub fn copy_profile_link(&mut self) {
        let url = profile_url(&self.state.search.username);
        match clipboard::copy_text(&url) {
            Ok(()) => {
                info!(url = %url, "profile link copied");
                self.state.copy_notice = Some(CopyNotice::new(CopyOutcome::Copied));
            }
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.state.copy_notice = Some(CopyNotice::new(CopyOutcome::Failed));
            }
        }
    }

    /// Expire timed UI state.
    pub fn tick(&mut self) {
        if self.state.copy_notice.map_or(false, |n| n.is_expired()) {
            self.state.copy_notice = None;
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(12), // Search input
                Constraint::Percentage(12), // Status line
                Constraint::Percentage(64), // Results
                Constraint::Percentage(12), // Help information
            ])
            .split(f.area());

        self.render_input(f, main_chunks[0]);
        self.render_status(f, main_chunks[1]);
        self.render_results(f, main_chunks[2]);
        self.render_help(f, main_chunks[3]);
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().title("Search Username").borders(Borders::ALL);

        let input = Paragraph::new(Line::from(vec![Span::raw(&self.state.input_buffer)]))
            .block(block)
            .alignment(Alignment::Center);

        f.render_widget(input, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let mut parts: Vec<Span> = Vec::new();

        match self.state.search.phase {
            Phase::Idle | Phase::Loading => parts.push(Span::styled(
                "LOADING_DATA...",
                Style::default().fg(Color::Yellow),
            )),
            Phase::Error => parts.push(Span::styled(
                ERROR_BANNER,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Phase::Success => {}
        }

        if let Some(notice) = &self.state.copy_notice {
            if !parts.is_empty() {
                parts.push(Span::raw("  "));
            }
            match notice.outcome {
                CopyOutcome::Copied => parts.push(Span::styled(
                    "Profile link copied",
                    Style::default().fg(Color::Green),
                )),
                CopyOutcome::Failed => parts.push(Span::styled(
                    "Clipboard unavailable",
                    Style::default().fg(Color::Red),
                )),
            }
        }

        let status = Paragraph::new(Line::from(parts))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);

        f.render_widget(status, area);
    }

    fn render_results(&self, f: &mut Frame, area: Rect) {
        // Suppressed while no committed stats exist (loading or failed search).
        let Some(stats) = self.state.search.stats else {
            f.render_widget(Block::default().title("Results").borders(Borders::ALL), area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
            .split(area);

        self.render_summary(f, chunks[0], &stats);
        self.render_breakdown(f, chunks[1], &stats);
    }

    fn render_summary(&self, f: &mut Frame, area: Rect, stats: &Stats) {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                stats.total_solved.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![Span::raw("Total Problems Solved")]),
            Line::from(""),
            Line::from(vec![Span::styled(
                &self.state.search.username,
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![Span::styled(
                profile_url(&self.state.search.username),
                Style::default().fg(Color::Gray),
            )]),
        ];

        if let Some(fetched_at) = self.state.search.fetched_at {
            text.push(Line::from(""));
            text.push(Line::from(vec![Span::styled(
                format!("Updated {} UTC", fetched_at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            )]));
        }

        let summary = Paragraph::new(text)
            .block(Block::default().title("Summary").borders(Borders::ALL))
            .alignment(Alignment::Center);

        f.render_widget(summary, area);
    }

    fn render_breakdown(&self, f: &mut Frame, area: Rect, stats: &Stats) {
        let segments = stats.chart_segments();
        let max = segments.iter().map(|s| s.value).max().unwrap_or(0).max(1);
        // Room for borders, label column and value column.
        let bar_width = area.width.saturating_sub(18).max(10) as u32;

        let mut text = vec![Line::from("")];
        for segment in segments {
            let filled = (segment.value * bar_width / max) as usize;
            text.push(Line::from(vec![
                Span::raw(format!("{:<8}", segment.difficulty.label())),
                Span::styled(
                    "█".repeat(filled),
                    Style::default().fg(segment.difficulty.color()),
                ),
                Span::raw(format!(" {}", segment.value)),
            ]));
            text.push(Line::from(""));
        }

        let breakdown = Paragraph::new(text).block(
            Block::default()
                .title("Difficulty Breakdown")
                .borders(Borders::ALL),
        );

        f.render_widget(breakdown, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = Line::from(vec![Span::raw(
            "ESC to quit | Enter to search | Tab to copy profile link",
        )]);

        let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));

        f.render_widget(help, area);
    }
}
