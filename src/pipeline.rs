//! Multi-resolution decomposition pipeline.
//!
//! One pass per entry of `resolutions::RESOLUTION_REGISTRY`. Each pass
//! aggregates the raw series at its bucket width, checks the bucket count
//! against the resolution's gate, and either decomposes or records an
//! insufficient-data outcome. Passes share nothing but read access to the
//! raw series and a per-run cache of aggregations, so Monthly and Seasonal
//! bucket the data once.
//!
//! Gate misses are data, not errors. Errors tied to one pass's data
//! (`AnalysisError::is_pass_local`) end that pass as `Failed` and the other
//! passes still run. Contract violations propagate to the caller and no
//! partial report list is returned.

use crate::analysis::{aggregate, decompose};
use crate::insight::{build_report, Report};
use crate::logging::{self, Stage};
use crate::model::{AnalysisError, DecompositionModel, DecompositionResult, TimeSeries};
use crate::resolutions::{BucketWidth, Resolution, ResolutionSpec, RESOLUTION_REGISTRY};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of a single resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Decomposed(DecompositionResult),
    /// The aggregation produced fewer buckets than the gate requires.
    InsufficientData { buckets: usize, required: usize },
    /// The pass hit an error in its own data.
    Failed(AnalysisError),
}

/// A pass outcome tagged with its resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionAnalysis {
    pub resolution: Resolution,
    pub outcome: ResolutionOutcome,
}

impl ResolutionAnalysis {
    pub fn decomposition(&self) -> Option<&DecompositionResult> {
        match &self.outcome {
            ResolutionOutcome::Decomposed(result) => Some(result),
            ResolutionOutcome::InsufficientData { .. } | ResolutionOutcome::Failed(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunables for a full run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub model: DecompositionModel,
    /// Fraction of observed points listed as low and high periods.
    pub extremes_threshold: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            model: DecompositionModel::Additive,
            extremes_threshold: crate::analysis::extremes::DEFAULT_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs the gate-then-decompose stage for every registered resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionPipeline {
    model: DecompositionModel,
}

impl ResolutionPipeline {
    pub fn new(model: DecompositionModel) -> Self {
        Self { model }
    }

    /// Analyses `raw` at every resolution, in registry order.
    pub fn run(&self, raw: &TimeSeries) -> Result<Vec<ResolutionAnalysis>, AnalysisError> {
        let mut cache = AggregationCache::new(raw);
        let mut analyses = Vec::with_capacity(RESOLUTION_REGISTRY.len());
        for spec in RESOLUTION_REGISTRY {
            let outcome = cache
                .get(spec.bucket)
                .and_then(|aggregated| self.run_stage(spec, aggregated));
            let outcome = isolate_pass(outcome)?;
            analyses.push(ResolutionAnalysis {
                resolution: spec.resolution,
                outcome,
            });
        }
        Ok(analyses)
    }

    /// Analyses `raw` at a single resolution.
    pub fn run_resolution(
        &self,
        raw: &TimeSeries,
        resolution: Resolution,
    ) -> Result<ResolutionAnalysis, AnalysisError> {
        let spec = resolution.spec();
        let outcome = aggregate(raw, spec.bucket)
            .inspect_err(|e| logging::log_analysis_failure(Stage::Aggregate, spec.resolution.name(), e))
            .and_then(|aggregated| self.run_stage(spec, &aggregated));
        Ok(ResolutionAnalysis {
            resolution,
            outcome: isolate_pass(outcome)?,
        })
    }

    /// The shared gate-then-process stage, parameterized by the registry entry.
    pub fn run_stage(
        &self,
        spec: &ResolutionSpec,
        aggregated: &TimeSeries,
    ) -> Result<ResolutionOutcome, AnalysisError> {
        let name = spec.resolution.name();
        let buckets = aggregated.len();

        if buckets < spec.min_buckets {
            logging::info(
                Stage::Decompose,
                Some(name),
                &format!(
                    "Not enough data: {} {} buckets, need {}",
                    buckets, spec.bucket, spec.min_buckets
                ),
            );
            return Ok(ResolutionOutcome::InsufficientData {
                buckets,
                required: spec.min_buckets,
            });
        }

        let result = decompose(aggregated, spec.period, self.model).inspect_err(|e| {
            logging::log_analysis_failure(Stage::Decompose, name, e);
        })?;

        logging::debug(
            Stage::Decompose,
            Some(name),
            &format!(
                "Decomposed {} buckets ({} model, period {})",
                buckets, self.model, spec.period
            ),
        );
        Ok(ResolutionOutcome::Decomposed(result))
    }
}

/// Turns a pass-local error into a `Failed` outcome; anything else propagates.
fn isolate_pass(
    outcome: Result<ResolutionOutcome, AnalysisError>,
) -> Result<ResolutionOutcome, AnalysisError> {
    match outcome {
        Err(e) if e.is_pass_local() => Ok(ResolutionOutcome::Failed(e)),
        other => other,
    }
}

/// Aggregations computed so far in one run, keyed by bucket width.
struct AggregationCache<'a> {
    raw: &'a TimeSeries,
    by_width: HashMap<BucketWidth, TimeSeries>,
}

impl<'a> AggregationCache<'a> {
    fn new(raw: &'a TimeSeries) -> Self {
        Self {
            raw,
            by_width: HashMap::new(),
        }
    }

    fn get(&mut self, width: BucketWidth) -> Result<&TimeSeries, AnalysisError> {
        if !self.by_width.contains_key(&width) {
            let aggregated = aggregate(self.raw, width).inspect_err(|e| {
                logging::log_analysis_failure(Stage::Aggregate, &width.to_string(), e);
            })?;
            logging::debug(
                Stage::Aggregate,
                None,
                &format!("{} raw points -> {} {} buckets", self.raw.len(), aggregated.len(), width),
            );
            self.by_width.insert(width, aggregated);
        }
        Ok(&self.by_width[&width])
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Everything one run produces: the per-resolution decompositions for a
/// renderer and the matching reports, both in resolution order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    pub analyses: Vec<ResolutionAnalysis>,
    pub reports: Vec<Report>,
}

/// Runs the full pipeline and builds one report per resolution.
pub fn run_analysis(raw: &TimeSeries, options: &AnalysisOptions) -> Result<AnalysisRun, AnalysisError> {
    crate::analysis::extremes::validate_threshold(options.extremes_threshold)?;

    let analyses = ResolutionPipeline::new(options.model).run(raw)?;
    let decomposed = analyses.iter().filter(|a| a.decomposition().is_some()).count();
    let failed = analyses
        .iter()
        .filter(|a| matches!(a.outcome, ResolutionOutcome::Failed(_)))
        .count();
    logging::log_run_summary(
        analyses.len(),
        decomposed,
        analyses.len() - decomposed - failed,
        failed,
    );

    let reports = analyses
        .iter()
        .map(|analysis| build_report(analysis, options.extremes_threshold))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisRun { analyses, reports })
}

/// Reports only, in fixed resolution order.
pub fn analyze(raw: &TimeSeries, options: &AnalysisOptions) -> Result<Vec<Report>, AnalysisError> {
    run_analysis(raw, options).map(|run| run.reports)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
