use std::time::Instant;

use tracing::{info, warn};

use crate::fetch::ContentFetcher;
use crate::llm::CompletionClient;
use crate::models::{
    Document, PipelineRun, RunFailure, RunRequest, StageOutcome, StageResult,
};

use super::plan::PipelinePlan;
use super::stage::{assemble_input, InputBlock, StageSpec};

/// Executes a pipeline plan against one request
///
/// All sources are fetched first; any fetch failure ends the run before a
/// single stage is attempted. Branch stages then run per source in source
/// order, fail-fast, and the synthesis stage merges the branch outputs.
/// Source labels appear on stage results only when the run has two sources.
pub struct PipelineRunner<F, C> {
    fetcher: F,
    completion: C,
}

impl<F: ContentFetcher, C: CompletionClient> PipelineRunner<F, C> {
    pub fn new(fetcher: F, completion: C) -> Self {
        Self {
            fetcher,
            completion,
        }
    }

    /// Run the plan to completion or first failure, returning the full record
    pub async fn run(&self, plan: &PipelinePlan, request: &RunRequest) -> PipelineRun {
        let mut run = PipelineRun::begin(plan.name(), &request.objective);
        let multi = request.sources.is_multi();

        info!(
            "Run {}: {} pipeline, {} source(s)",
            run.run_id,
            plan.name(),
            request.sources.count()
        );

        let mut documents: Vec<Document> = Vec::with_capacity(request.sources.count());
        for source in request.sources.iter() {
            info!("Fetching {} ({})", source.url, source.label);
            match self.fetcher.fetch(source).await {
                Ok(document) => {
                    info!("Fetched {} ({} chars)", source.url, document.body.len());
                    documents.push(document);
                }
                Err(e) => {
                    warn!("Fetch of {} failed: {}", source.url, e);
                    run.fail(RunFailure {
                        stage: "fetch".to_string(),
                        source: multi.then(|| source.label.clone()),
                        cause: e.to_string(),
                    });
                    return run;
                }
            }
        }

        // outputs[i][j] = output of branch stage j for document i
        let mut branch_outputs: Vec<Vec<String>> = Vec::with_capacity(documents.len());
        for document in &documents {
            let mut outputs: Vec<String> = Vec::with_capacity(plan.branch().len());
            for stage in plan.branch() {
                let input = branch_input(plan, stage, request, document, &outputs);
                let label = multi.then(|| document.source.label.clone());
                let Some(output) = self.execute_stage(stage, &input, label, &mut run).await
                else {
                    return run;
                };
                outputs.push(output);
            }
            branch_outputs.push(outputs);
        }

        let input = synthesis_input(plan, request, &documents, &branch_outputs, multi);
        if let Some(artifact) = self
            .execute_stage(plan.synthesis(), &input, None, &mut run)
            .await
        {
            run.finish_ok(artifact);
        }

        run
    }

    /// Call the completion service for one stage and record the result.
    /// Returns the output on success; on failure the run is closed.
    async fn execute_stage(
        &self,
        stage: &StageSpec,
        input: &str,
        source: Option<String>,
        run: &mut PipelineRun,
    ) -> Option<String> {
        match &source {
            Some(label) => info!(
                "Stage {} ({}): {} input chars",
                stage.name,
                label,
                input.len()
            ),
            None => info!("Stage {}: {} input chars", stage.name, input.len()),
        }

        let started = Instant::now();
        let result = self
            .completion
            .complete(&stage.role, &stage.instruction, input)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                info!(
                    "Stage {}: {} output chars in {}ms",
                    stage.name,
                    output.len(),
                    elapsed_ms
                );
                run.record(StageResult {
                    stage: stage.name.clone(),
                    source,
                    outcome: StageOutcome::Ok {
                        output: output.clone(),
                    },
                    elapsed_ms,
                });
                Some(output)
            }
            Err(e) => {
                warn!("Stage {} failed: {}", stage.name, e);
                let cause = e.to_string();
                run.record(StageResult {
                    stage: stage.name.clone(),
                    source: source.clone(),
                    outcome: StageOutcome::Error {
                        detail: cause.clone(),
                    },
                    elapsed_ms,
                });
                run.fail(RunFailure {
                    stage: stage.name.clone(),
                    source,
                    cause,
                });
                None
            }
        }
    }
}

/// Input for one branch stage: the source body when declared, then each
/// required predecessor output from the same branch in plan order
fn branch_input(
    plan: &PipelinePlan,
    stage: &StageSpec,
    request: &RunRequest,
    document: &Document,
    outputs: &[String],
) -> String {
    let mut blocks = Vec::new();

    if stage.reads_source {
        blocks.push(InputBlock::new(
            format!("Source ({})", document.source.label),
            document.body.clone(),
        ));
    }

    // outputs is exactly the already-run prefix of the branch, so zipping
    // pairs every completed stage with its output
    for (predecessor, output) in plan.branch().iter().zip(outputs) {
        if stage.requires.contains(&predecessor.name) {
            blocks.push(InputBlock::new(predecessor.title.clone(), output.clone()));
        }
    }

    assemble_input(&request.objective, &request.aux, blocks.as_slice())
}

/// Input for the synthesis stage: required branch outputs grouped by source
/// in source order, labeled per source when the run has two
fn synthesis_input(
    plan: &PipelinePlan,
    request: &RunRequest,
    documents: &[Document],
    branch_outputs: &[Vec<String>],
    multi: bool,
) -> String {
    let stage = plan.synthesis();
    let mut blocks = Vec::new();

    for (document, outputs) in documents.iter().zip(branch_outputs) {
        for (predecessor, output) in plan.branch().iter().zip(outputs) {
            if stage.requires.contains(&predecessor.name) {
                let label = if multi {
                    format!("{} ({})", predecessor.title, document.source.label)
                } else {
                    predecessor.title.clone()
                };
                blocks.push(InputBlock::new(label, output.clone()));
            }
        }
    }

    assemble_input(&request.objective, &request.aux, blocks.as_slice())
}
