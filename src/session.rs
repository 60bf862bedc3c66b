//! Loaded data plus fitted model, and the commands that query them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use aitrends_io::{IoError, SequenceData, read_sequences};
use aitrends_markov::MarkovModel;

use crate::cli::Command;
use crate::config::AitrendsConfig;
use crate::convert;
use crate::report::{
    DistributionReport, ForecastReport, MatrixReport, ProbEntry, RecommendReport,
    RecommendationView, Report, SequenceView, SequencesReport, StationaryReport,
};

/// Sequences read from disk and the model estimated from them.
#[derive(Debug)]
pub struct Session {
    data: SequenceData,
    model: MarkovModel,
    source: PathBuf,
}

impl Session {
    /// Reads the sequence file named by `config` (or `data_override`) and
    /// fits the model.
    ///
    /// A missing file is logged and treated as an empty dataset, so the model
    /// falls back to uniform rows. Other read failures are errors.
    pub fn load(config: &AitrendsConfig, data_override: Option<PathBuf>) -> Result<Self> {
        let _span = info_span!("load").entered();

        let states = convert::build_state_set(&config.states)?;
        let initial = convert::build_initial(&config.states)?;
        let markov_cfg = convert::build_markov_config(&config.chain)?;
        let reader_cfg = convert::build_reader_config(&config.data)?;
        let source = convert::resolve_data_path(&config.data, data_override);

        info!(path = %source.display(), "reading navigation sequences");
        let data = match read_sequences(&source, &states, &reader_cfg) {
            Ok(data) => data,
            Err(IoError::FileNotFound { path }) => {
                warn!(
                    path = %path.display(),
                    "sequence file not found, using the smoothing prior only"
                );
                SequenceData::default()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to load sequences: {}", source.display()));
            }
        };

        let model = MarkovModel::fit(&data.records, states, initial, &markov_cfg)
            .context("failed to estimate transition matrix")?;
        info!(
            n_sequences = data.len(),
            n_transitions = data.n_transitions(),
            "model ready"
        );
        Ok(Self::new(data, model, source))
    }

    /// Wraps already loaded parts.
    pub fn new(data: SequenceData, model: MarkovModel, source: PathBuf) -> Self {
        Self {
            data,
            model,
            source,
        }
    }

    /// Path the sequences were read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Runs one analysis command.
    pub fn execute(&self, command: &Command) -> Result<Report> {
        match *command {
            Command::Sequences { limit } => Ok(Report::Sequences(self.sequences(limit))),
            Command::Matrix => Ok(Report::Matrix(self.matrix())),
            Command::Initial => Ok(Report::Initial(self.initial())),
            Command::Forecast { steps } => self.forecast(steps).map(Report::Forecast),
            Command::Stationary => self.stationary().map(Report::Stationary),
            Command::Recommend { top } => self.recommend(top).map(Report::Recommend),
            Command::Shell => bail!("already in the interactive shell"),
        }
    }

    fn state_names(&self) -> Vec<String> {
        self.model.states().names().to_vec()
    }

    fn sequences(&self, limit: usize) -> SequencesReport {
        SequencesReport {
            states: self.state_names(),
            total: self.data.len(),
            skipped: self.data.skipped.len(),
            shown: self
                .data
                .records
                .iter()
                .take(limit)
                .map(|r| SequenceView {
                    user_id: r.user_id.clone(),
                    states: r.states.clone(),
                })
                .collect(),
        }
    }

    fn matrix(&self) -> MatrixReport {
        let p = self.model.matrix().as_array();
        MatrixReport {
            steps: 1,
            states: self.state_names(),
            rows: p.rows().into_iter().map(|r| r.to_vec()).collect(),
        }
    }

    fn initial(&self) -> DistributionReport {
        DistributionReport::new(
            "Initial distribution",
            &self.state_names(),
            &self.model.initial().as_array().to_vec(),
        )
    }

    fn forecast(&self, steps: u32) -> Result<ForecastReport> {
        let pn = self
            .model
            .n_step_matrix(steps)
            .with_context(|| format!("failed to compute {steps}-step matrix"))?;
        let dist = self
            .model
            .n_step_distribution(steps)
            .with_context(|| format!("failed to compute {steps}-step distribution"))?;
        Ok(ForecastReport {
            steps,
            matrix: MatrixReport {
                steps,
                states: self.state_names(),
                rows: pn.rows().into_iter().map(|r| r.to_vec()).collect(),
            },
            distribution: DistributionReport::new(
                format!("Distribution after {steps} steps"),
                &self.state_names(),
                &dist.to_vec(),
            ),
        })
    }

    fn stationary(&self) -> Result<StationaryReport> {
        let pi = self
            .model
            .stationary()
            .context("failed to compute stationary distribution")?;
        let residual = pi.residual(self.model.matrix().as_array());
        let lambda = pi.eigenvalue();
        Ok(StationaryReport {
            eigenvalue_re: lambda.re,
            eigenvalue_im: lambda.im,
            residual,
            distribution: DistributionReport::new(
                "Long-run distribution",
                &self.state_names(),
                &pi.probs().to_vec(),
            )
            .sorted(),
        })
    }

    fn recommend(&self, top: usize) -> Result<RecommendReport> {
        let recs = self
            .model
            .recommendations(top)
            .context("failed to rank destinations")?;
        let platforms = recs
            .into_iter()
            .map(|rec| RecommendationView {
                suggested: rec.best().map(|d| d.name.clone()),
                from: rec.from,
                destinations: rec
                    .destinations
                    .into_iter()
                    .map(|d| ProbEntry {
                        state: d.name,
                        prob: d.prob,
                    })
                    .collect(),
            })
            .collect();
        Ok(RecommendReport { top, platforms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aitrends_io::SequenceRecord;
    use aitrends_markov::{Distribution, MarkovConfig, StateSet};
    use approx::assert_abs_diff_eq;

    fn record(user: &str, states: &[&str]) -> SequenceRecord {
        SequenceRecord {
            user_id: user.to_string(),
            states: states.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn session() -> Session {
        let data = SequenceData {
            records: vec![
                record("u1", &["A", "B"]),
                record("u2", &["A", "B"]),
                record("u3", &["B", "C"]),
                record("u4", &["C", "A"]),
            ],
            skipped: Vec::new(),
        };
        let states = StateSet::new(["A", "B", "C"]).unwrap();
        let initial = Distribution::from_slice(&[0.5, 0.3, 0.2]).unwrap();
        let model =
            MarkovModel::fit(&data.records, states, initial, &MarkovConfig::new()).unwrap();
        Session::new(data, model, PathBuf::from("memory.csv"))
    }

    #[test]
    fn matrix_report_rows() {
        let Report::Matrix(m) = session().execute(&Command::Matrix).unwrap() else {
            panic!("expected matrix report");
        };
        assert_abs_diff_eq!(m.rows[0][1], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(m.rows[0][0], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn sequences_limited() {
        let Report::Sequences(s) = session().execute(&Command::Sequences { limit: 2 }).unwrap()
        else {
            panic!("expected sequences report");
        };
        assert_eq!(s.total, 4);
        assert_eq!(s.shown.len(), 2);
        assert_eq!(s.shown[1].user_id, "u2");
    }

    #[test]
    fn forecast_zero_steps_is_identity() {
        let Report::Forecast(f) = session().execute(&Command::Forecast { steps: 0 }).unwrap()
        else {
            panic!("expected forecast report");
        };
        assert_eq!(f.matrix.rows[1], vec![0.0, 1.0, 0.0]);
        assert_abs_diff_eq!(f.distribution.entries[0].prob, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn stationary_sorted_and_normalized() {
        let Report::Stationary(s) = session().execute(&Command::Stationary).unwrap() else {
            panic!("expected stationary report");
        };
        let probs: Vec<f64> = s.distribution.entries.iter().map(|e| e.prob).collect();
        assert_abs_diff_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(probs.windows(2).all(|w| w[0] >= w[1]));
        assert!(s.residual < 1e-6);
    }

    #[test]
    fn recommend_best_destination() {
        let Report::Recommend(r) = session().execute(&Command::Recommend { top: 2 }).unwrap()
        else {
            panic!("expected recommend report");
        };
        assert_eq!(r.platforms.len(), 3);
        assert_eq!(r.platforms[0].destinations.len(), 2);
        assert_eq!(r.platforms[0].suggested.as_deref(), Some("B"));
    }

    #[test]
    fn invalid_requests_are_errors() {
        let s = session();
        assert!(s.execute(&Command::Recommend { top: 0 }).is_err());
        assert!(s.execute(&Command::Shell).is_err());
    }

    #[test]
    fn load_reads_file_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visits.csv");
        std::fs::write(&path, "user,s1,s2\nu1,OpenAI,Cohere\nu2,Cohere,Mistral\n").unwrap();

        let s = Session::load(&AitrendsConfig::default(), Some(path.clone())).unwrap();
        assert_eq!(s.source(), path.as_path());
        let Report::Sequences(seq) = s.execute(&Command::Sequences { limit: 5 }).unwrap() else {
            panic!("expected sequences report");
        };
        assert_eq!(seq.total, 1);
        assert_eq!(seq.skipped, 1);
    }

    #[test]
    fn load_missing_file_falls_back_to_uniform() {
        let s = Session::load(
            &AitrendsConfig::default(),
            Some(PathBuf::from("/no/such/dir/visits.csv")),
        )
        .unwrap();
        let Report::Matrix(m) = s.execute(&Command::Matrix).unwrap() else {
            panic!("expected matrix report");
        };
        assert_eq!(m.rows.len(), 5);
        for row in &m.rows {
            for &p in row {
                assert_abs_diff_eq!(p, 0.2, epsilon = 1e-12);
            }
        }
        let Report::Sequences(seq) = s.execute(&Command::Sequences { limit: 5 }).unwrap() else {
            panic!("expected sequences report");
        };
        assert_eq!(seq.total, 0);
        assert!(s.execute(&Command::Stationary).is_ok());
    }

    #[test]
    fn load_unreadable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Session::load(&AitrendsConfig::default(), Some(dir.path().to_path_buf()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to load sequences"));
    }
}
