//! Report structures rendered as text tables or JSON.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

/// Width of the bar for a probability of 1 in distribution listings.
const DISTRIBUTION_BAR_WIDTH: f64 = 50.0;
/// Width of the bar for a probability of 1 in recommendation listings.
const RECOMMEND_BAR_WIDTH: f64 = 30.0;

/// Output of one command.
#[derive(Debug, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Sequences(SequencesReport),
    Matrix(MatrixReport),
    Initial(DistributionReport),
    Forecast(ForecastReport),
    Stationary(StationaryReport),
    Recommend(RecommendReport),
}

impl Report {
    /// Renders the report as pretty JSON or as plain text.
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            serde_json::to_string_pretty(self).context("failed to serialize report")
        } else {
            Ok(self.to_string())
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequences(r) => write!(f, "{r}"),
            Self::Matrix(r) => write!(f, "{r}"),
            Self::Initial(r) => write!(f, "{r}"),
            Self::Forecast(r) => write!(f, "{r}"),
            Self::Stationary(r) => write!(f, "{r}"),
            Self::Recommend(r) => write!(f, "{r}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SequencesReport {
    pub states: Vec<String>,
    pub total: usize,
    pub skipped: usize,
    pub shown: Vec<SequenceView>,
}

#[derive(Debug, Serialize)]
pub struct SequenceView {
    pub user_id: String,
    pub states: Vec<String>,
}

impl fmt::Display for SequencesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Platforms: {}", self.states.join(", "))?;
        if self.shown.is_empty() {
            return writeln!(f, "No navigation sequences to show.");
        }
        writeln!(
            f,
            "Showing {} of {} sequences ({} lines skipped)",
            self.shown.len(),
            self.total,
            self.skipped
        )?;
        for (i, seq) in self.shown.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "User {} ({}):", i + 1, seq.user_id)?;
            writeln!(f, "   {}", seq.states.join(" → "))?;
            writeln!(f, "   Transitions:")?;
            for (j, pair) in seq.states.windows(2).enumerate() {
                writeln!(f, "   {}. {} → {}", j + 1, pair[0], pair[1])?;
            }
        }
        if self.total > self.shown.len() {
            writeln!(f)?;
            writeln!(f, "... and {} more sequences", self.total - self.shown.len())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Matrices and distributions
// ---------------------------------------------------------------------------

/// A labelled square matrix (rows are "from", columns are "to").
#[derive(Debug, Serialize)]
pub struct MatrixReport {
    pub steps: u32,
    pub states: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl fmt::Display for MatrixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps == 1 {
            writeln!(f, "Transition matrix (row = from, column = to)")?;
        } else {
            writeln!(f, "Transition matrix after {} steps", self.steps)?;
        }
        let label_w = label_width(&self.states);
        let cell_w = self.states.iter().map(|s| s.len()).max().unwrap_or(0).max(8);

        write!(f, "{:label_w$}", "")?;
        for name in &self.states {
            write!(f, " {name:>cell_w$}")?;
        }
        writeln!(f)?;
        for (name, row) in self.states.iter().zip(&self.rows) {
            write!(f, "{name:<label_w$}")?;
            for &p in row {
                write!(f, " {:>cell_w$}", percent(p))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One state with its probability.
#[derive(Debug, Clone, Serialize)]
pub struct ProbEntry {
    pub state: String,
    pub prob: f64,
}

/// A probability vector, listed in state order or sorted descending.
#[derive(Debug, Serialize)]
pub struct DistributionReport {
    pub title: String,
    pub entries: Vec<ProbEntry>,
}

impl DistributionReport {
    /// Pairs names with probabilities in state order.
    pub fn new(title: impl Into<String>, states: &[String], probs: &[f64]) -> Self {
        let entries = states
            .iter()
            .zip(probs)
            .map(|(state, &prob)| ProbEntry {
                state: state.clone(),
                prob,
            })
            .collect();
        Self {
            title: title.into(),
            entries,
        }
    }

    /// Sorts entries by descending probability; ties keep state order.
    pub fn sorted(mut self) -> Self {
        self.entries.sort_by(|a, b| b.prob.total_cmp(&a.prob));
        self
    }
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let w = self.entries.iter().map(|e| e.state.len()).max().unwrap_or(0);
        for e in &self.entries {
            writeln!(
                f,
                "{:<w$} [{:>7}] {}",
                e.state,
                percent(e.prob),
                bar('█', e.prob, DISTRIBUTION_BAR_WIDTH)
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ForecastReport {
    pub steps: u32,
    pub matrix: MatrixReport,
    pub distribution: DistributionReport,
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.matrix)?;
        write!(f, "{}", self.distribution)
    }
}

#[derive(Debug, Serialize)]
pub struct StationaryReport {
    pub eigenvalue_re: f64,
    pub eigenvalue_im: f64,
    pub residual: f64,
    pub distribution: DistributionReport,
}

impl fmt::Display for StationaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.distribution)?;
        writeln!(
            f,
            "(eigenvalue {:.6}{:+.6}i, max |πP - π| = {:.2e})",
            self.eigenvalue_re, self.eigenvalue_im, self.residual
        )
    }
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct RecommendReport {
    pub top: usize,
    pub platforms: Vec<RecommendationView>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationView {
    pub from: String,
    pub destinations: Vec<ProbEntry>,
    pub suggested: Option<String>,
}

impl fmt::Display for RecommendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top {} destinations per platform", self.top)?;
        for rec in &self.platforms {
            writeln!(f)?;
            writeln!(f, "┌ Users of {}", rec.from)?;
            for (i, d) in rec.destinations.iter().enumerate() {
                writeln!(
                    f,
                    "│ {}. {:>6.1}% → {} {}",
                    i + 1,
                    d.prob * 100.0,
                    d.state,
                    bar('▌', d.prob, RECOMMEND_BAR_WIDTH)
                )?;
            }
            if let Some(best) = &rec.suggested {
                writeln!(f, "│   Suggested integration: {best}")?;
            }
        }
        writeln!(f, "└{}", "─".repeat(40))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// `floor(p * width)` copies of `ch`; probabilities outside `[0, 1]` are clamped.
fn bar(ch: char, p: f64, width: f64) -> String {
    let n = (p.clamp(0.0, 1.0) * width).floor() as usize;
    std::iter::repeat_n(ch, n).collect()
}

fn label_width(states: &[String]) -> usize {
    states.iter().map(|s| s.len()).max().unwrap_or(0)
}
