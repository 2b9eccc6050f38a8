//! # Generation Pipeline
//!
//! Drives one run through `LOADING → MODELING → EMITTING → ASSEMBLING`.
//!
//! Each stage either hands its output to the next or stops the run with a
//! [`RunFailure`] naming the stage. Emission fans out over scoped threads,
//! one job per (emitter, unit) pair; results are merged by job index so the
//! artifact set, and any collision reported, does not depend on thread
//! scheduling.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, error, info};

use super::artifacts::GeneratedArtifactSet;
use super::assembler::{assemble, plan, AssemblyReport};
use super::emitter::{EmittedFile, Emitter, EmitterKind, RenderUnit};
use crate::artifact::{load_artifacts, ArtifactListing};
use crate::config::ProjectConfiguration;
use crate::error::{ErrorKind, Result, RunFailure, Stage};
use crate::model::{build_project_model, ProjectModel, OPENAPI_YAML};

/// Observable state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Loading,
    Modeling,
    Emitting,
    Assembling,
    Done,
    Failed { stage: Stage, kind: ErrorKind },
}

impl From<Stage> for RunState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Loading => RunState::Loading,
            Stage::Modeling => RunState::Modeling,
            Stage::Emitting => RunState::Emitting,
            Stage::Assembling => RunState::Assembling,
        }
    }
}

/// State history of one run; the last entry is the current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRun {
    history: Vec<RunState>,
}

impl GenerationRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<RunState> {
        self.history.last().copied()
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    fn enter(&mut self, stage: Stage) {
        debug!(%stage, "entering stage");
        self.history.push(stage.into());
    }

    fn finish(&mut self) {
        self.history.push(RunState::Done);
    }

    /// Run `step` as `stage`, recording the failure state if it errors.
    fn stage<T>(&mut self, stage: Stage, step: impl FnOnce() -> Result<T>) -> Result<T, RunFailure> {
        self.enter(stage);
        step().map_err(|err| {
            error!(%stage, kind = %err.kind(), error = %err, "stage failed");
            self.history.push(RunState::Failed {
                stage,
                kind: err.kind(),
            });
            RunFailure { stage, error: err }
        })
    }
}

/// How a run is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Emitters in merge order
    pub emitters: Vec<EmitterKind>,
    /// Compute the assembly report without writing
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            emitters: EmitterKind::ALL.to_vec(),
            dry_run: false,
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub model: ProjectModel,
    pub artifacts: GeneratedArtifactSet,
    pub report: AssemblyReport,
    pub run: GenerationRun,
}

/// Generate a project with the default emitters and write it to
/// `config.output_dir`.
pub fn generate(
    listing: &ArtifactListing,
    config: &ProjectConfiguration,
) -> Result<GenerationOutcome, RunFailure> {
    generate_with(listing, config, &RunOptions::default())
}

/// Generate a project with explicit [`RunOptions`].
pub fn generate_with(
    listing: &ArtifactListing,
    config: &ProjectConfiguration,
    options: &RunOptions,
) -> Result<GenerationOutcome, RunFailure> {
    let mut run = GenerationRun::new();
    let (model, artifacts, report) = execute(&mut run, listing, config, options)?;
    run.finish();
    info!(
        project = %config.project_name,
        contracts = model.contracts.len(),
        files = artifacts.len(),
        dry_run = options.dry_run,
        "generation complete"
    );
    Ok(GenerationOutcome {
        model,
        artifacts,
        report,
        run,
    })
}

fn execute(
    run: &mut GenerationRun,
    listing: &ArtifactListing,
    config: &ProjectConfiguration,
    options: &RunOptions,
) -> Result<(ProjectModel, GeneratedArtifactSet, AssemblyReport), RunFailure> {
    let manifest = run.stage(Stage::Loading, || load_artifacts(listing))?;
    let model = run.stage(Stage::Modeling, || build_project_model(&manifest, config))?;
    let artifacts = run.stage(Stage::Emitting, || emit(&model, config, &options.emitters))?;
    let retired = retired_outputs(config);
    let report = run.stage(Stage::Assembling, || {
        if options.dry_run {
            Ok(plan(&artifacts, &config.output_dir, &retired))
        } else {
            assemble(&artifacts, &config.output_dir, &retired)
        }
    })?;
    Ok((model, artifacts, report))
}

/// Optional outputs the configuration turns off, to be removed from an
/// existing tree.
fn retired_outputs(config: &ProjectConfiguration) -> Vec<&'static str> {
    if config.generate_swagger {
        Vec::new()
    } else {
        vec![OPENAPI_YAML]
    }
}

/// Load and model only; nothing is rendered or written.
pub fn inspect(
    listing: &ArtifactListing,
    config: &ProjectConfiguration,
) -> Result<ProjectModel, RunFailure> {
    let mut run = GenerationRun::new();
    let manifest = run.stage(Stage::Loading, || load_artifacts(listing))?;
    run.stage(Stage::Modeling, || build_project_model(&manifest, config))
}

/// Render every (emitter, unit) pair concurrently and merge the results.
///
/// Units are the contracts in name order followed by the project. The merge
/// walks jobs in that order, so the first error and the first colliding path
/// are the same on every run.
pub fn emit(
    model: &ProjectModel,
    config: &ProjectConfiguration,
    emitters: &[EmitterKind],
) -> Result<GeneratedArtifactSet> {
    let units: Vec<RenderUnit<'_>> = model
        .contracts
        .iter()
        .map(RenderUnit::Contract)
        .chain(std::iter::once(RenderUnit::Project(model)))
        .collect();
    let jobs: Vec<(EmitterKind, RenderUnit<'_>)> = emitters
        .iter()
        .flat_map(|emitter| units.iter().map(move |unit| (*emitter, *unit)))
        .collect();
    debug!(jobs = jobs.len(), "fanning out emitters");

    let (tx, rx) = mpsc::channel::<(usize, Result<Vec<EmittedFile>>)>();
    thread::scope(|scope| {
        for (index, (emitter, unit)) in jobs.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let _ = tx.send((index, emitter.render(*unit, config)));
            });
        }
    });
    drop(tx);

    let results: BTreeMap<usize, Result<Vec<EmittedFile>>> = rx.into_iter().collect();
    let mut set = GeneratedArtifactSet::new();
    for (_, result) in results {
        set.extend(result?)?;
    }
    Ok(set)
}
