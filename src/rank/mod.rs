//! Best-candidate selection over a stream of tiles.
//!
//! [`Ranker::find_best_match`] extracts the scene descriptors once, then
//! scores every candidate by counting ratio-test matches of its descriptors
//! against the scene. The best candidate only changes on a strictly higher
//! score, so among equal scores the first one in stream order wins. Every
//! candidate is evaluated; there is no early exit.
//!
//! With the `rayon` feature and [`RankConfig::parallel`], candidates are
//! scored concurrently but folded in stream order, which keeps the result
//! identical to the sequential scan.

use crate::diag::{Diagnostic, DiagnosticSink, SkipReason};
use crate::feature::{DescriptorSet, FeatureExtractor, GradientExtractor};
use crate::image::OwnedImage;
use crate::matcher::{count_good_matches, match_top_two, DEFAULT_RATIO};
use crate::trace::{trace_event, trace_span};
use crate::util::{TileMatchError, TileMatchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::fmt;

/// Result string when no candidate scored above zero.
pub const NOT_FOUND: &str = "not_found";
/// Result string when the scene image is unusable.
pub const INVALID_SCENE: &str = "invalid_scene";

/// One tile offered to the ranker.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Display name reported when this tile wins (usually the file name).
    pub name: String,
    /// Decoded image, or the reason decoding failed.
    pub image: TileMatchResult<OwnedImage>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, image: OwnedImage) -> Self {
        Self {
            name: name.into(),
            image: Ok(image),
        }
    }

    /// A candidate whose image could not be produced; it will be skipped.
    pub fn failed(name: impl Into<String>, err: TileMatchError) -> Self {
        Self {
            name: name.into(),
            image: Err(err),
        }
    }
}

/// Final answer of a ranking run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The best tile and its good-match count (always > 0).
    Found { name: String, score: usize },
    /// No tile scored above zero.
    NotFound,
    /// The scene could not be used; no tile was scored.
    InvalidScene,
}

impl MatchOutcome {
    /// The tile name, or [`NOT_FOUND`] / [`INVALID_SCENE`].
    pub fn as_str(&self) -> &str {
        match self {
            MatchOutcome::Found { name, .. } => name,
            MatchOutcome::NotFound => NOT_FOUND,
            MatchOutcome::InvalidScene => INVALID_SCENE,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            MatchOutcome::Found { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MatchOutcome::Found { .. })
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome plus scan statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankReport {
    pub outcome: MatchOutcome,
    /// Good-match count of the winner, 0 when nothing was found.
    pub best_score: usize,
    /// Descriptors extracted from the scene.
    pub scene_descriptors: usize,
    /// Candidates that were matched against the scene.
    pub scored: usize,
    /// Candidates dropped before matching.
    pub skipped: usize,
}

impl RankReport {
    fn invalid_scene() -> Self {
        Self {
            outcome: MatchOutcome::InvalidScene,
            best_score: 0,
            scene_descriptors: 0,
            scored: 0,
            skipped: 0,
        }
    }
}

/// Configuration for [`Ranker`].
#[derive(Clone, Debug, PartialEq)]
pub struct RankConfig {
    /// Ratio-test threshold; a match is good when `d1 < ratio * d2`.
    pub ratio: f32,
    /// Score candidates in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            parallel: false,
        }
    }
}

impl RankConfig {
    pub fn validate(&self) -> TileMatchResult<()> {
        if !(self.ratio > 0.0 && self.ratio <= 1.0) {
            return Err(TileMatchError::InvalidConfig("ratio must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Running best while the stream is consumed.
#[derive(Default)]
struct ScanState {
    best_name: Option<String>,
    best_score: usize,
    scored: usize,
    skipped: usize,
}

impl ScanState {
    fn fold(&mut self, name: String, result: Result<usize, SkipReason>, sink: &dyn DiagnosticSink) {
        match result {
            Err(reason) => {
                self.skipped += 1;
                sink.record(&Diagnostic::CandidateSkipped {
                    name: &name,
                    reason: &reason,
                });
            }
            Ok(score) => {
                self.scored += 1;
                sink.record(&Diagnostic::CandidateScored { name: &name, score });
                if score > self.best_score {
                    sink.record(&Diagnostic::NewBest { name: &name, score });
                    self.best_score = score;
                    self.best_name = Some(name);
                }
            }
        }
    }

    fn finish(self, scene_descriptors: usize) -> RankReport {
        let outcome = match self.best_name {
            Some(name) if self.best_score > 0 => MatchOutcome::Found {
                name,
                score: self.best_score,
            },
            _ => MatchOutcome::NotFound,
        };
        RankReport {
            outcome,
            best_score: self.best_score,
            scene_descriptors,
            scored: self.scored,
            skipped: self.skipped,
        }
    }
}

/// Picks the candidate whose descriptors best match the scene.
pub struct Ranker<E = GradientExtractor> {
    extractor: E,
    cfg: RankConfig,
}

impl Default for Ranker<GradientExtractor> {
    fn default() -> Self {
        Self::new(GradientExtractor::default())
    }
}

impl<E: FeatureExtractor> Ranker<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            cfg: RankConfig::default(),
        }
    }

    /// Replaces the configuration after checking it.
    pub fn with_config(mut self, cfg: RankConfig) -> TileMatchResult<Self> {
        cfg.validate()?;
        self.cfg = cfg;
        Ok(self)
    }

    pub fn config(&self) -> &RankConfig {
        &self.cfg
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Good-match count of one tile's descriptors against the scene.
    pub fn score(&self, tile: &DescriptorSet, scene: &DescriptorSet) -> usize {
        count_good_matches(&match_top_two(tile, scene), self.cfg.ratio)
    }

    /// Runs the full scan and returns the winner.
    ///
    /// A scene `Err` (or a scene the extractor rejects) ends the run with
    /// [`MatchOutcome::InvalidScene`] without pulling any candidate from the
    /// stream. Candidates that fail to decode or yield no descriptors are
    /// skipped.
    pub fn find_best_match<I>(
        &self,
        scene: TileMatchResult<OwnedImage>,
        candidates: I,
        sink: &dyn DiagnosticSink,
    ) -> RankReport
    where
        I: IntoIterator<Item = Candidate>,
    {
        let _span = trace_span!("find_best_match").entered();

        let scene_desc = match scene.and_then(|img| self.extractor.extract(img.view())) {
            Ok(desc) => desc,
            Err(err) => {
                let reason = err.to_string();
                sink.record(&Diagnostic::SceneRejected { reason: &reason });
                sink.record(&Diagnostic::Finished {
                    result: INVALID_SCENE,
                });
                return RankReport::invalid_scene();
            }
        };
        sink.record(&Diagnostic::SceneReady {
            descriptors: scene_desc.len(),
        });

        #[cfg(feature = "rayon")]
        let state = if self.cfg.parallel {
            self.scan_parallel(&scene_desc, candidates, sink)
        } else {
            self.scan_sequential(&scene_desc, candidates, sink)
        };
        #[cfg(not(feature = "rayon"))]
        let state = self.scan_sequential(&scene_desc, candidates, sink);

        let report = state.finish(scene_desc.len());
        sink.record(&Diagnostic::Finished {
            result: report.outcome.as_str(),
        });
        trace_event!(
            "rank_done",
            scored = report.scored,
            skipped = report.skipped,
            best_score = report.best_score
        );
        report
    }

    fn evaluate(&self, candidate: &Candidate, scene: &DescriptorSet) -> Result<usize, SkipReason> {
        let image = candidate
            .image
            .as_ref()
            .map_err(|err| SkipReason::Undecodable(err.to_string()))?;
        let desc = self
            .extractor
            .extract(image.view())
            .map_err(|err| SkipReason::ExtractionFailed(err.to_string()))?;
        if desc.is_empty() {
            return Err(SkipReason::NoDescriptors);
        }
        Ok(self.score(&desc, scene))
    }

    fn scan_sequential<I>(
        &self,
        scene: &DescriptorSet,
        candidates: I,
        sink: &dyn DiagnosticSink,
    ) -> ScanState
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut state = ScanState::default();
        for candidate in candidates {
            sink.record(&Diagnostic::CandidateStarted {
                name: &candidate.name,
            });
            let result = self.evaluate(&candidate, scene);
            state.fold(candidate.name, result, sink);
        }
        state
    }

    #[cfg(feature = "rayon")]
    fn scan_parallel<I>(
        &self,
        scene: &DescriptorSet,
        candidates: I,
        sink: &dyn DiagnosticSink,
    ) -> ScanState
    where
        I: IntoIterator<Item = Candidate>,
    {
        let candidates: Vec<Candidate> = candidates.into_iter().collect();
        // Each image is dropped as soon as it has been scored.
        let results: Vec<(String, Result<usize, SkipReason>)> = candidates
            .into_par_iter()
            .map(|candidate| {
                let result = self.evaluate(&candidate, scene);
                (candidate.name, result)
            })
            .collect();

        let mut state = ScanState::default();
        for (name, result) in results {
            sink.record(&Diagnostic::CandidateStarted { name: &name });
            state.fold(name, result, sink);
        }
        state
    }
}
