use crate::error::SequencingError;
use crate::llm::prompts;

use super::stage::StageSpec;

/// A validated, fixed pipeline: branch stages that run once per source,
/// then one synthesis stage that merges branch outputs
///
/// Validation happens only here. Execution never re-checks sequencing,
/// because a `PipelinePlan` cannot hold a stage whose requirements are
/// unsatisfied.
#[derive(Debug, Clone)]
pub struct PipelinePlan {
    name: String,
    branch: Vec<StageSpec>,
    synthesis: StageSpec,
}

impl PipelinePlan {
    /// Validate stage wiring and build a plan
    ///
    /// Branch stages run in the given order; each may only require stages
    /// declared before it. The synthesis stage may only require branch
    /// stages, must require at least one, and must not read the source.
    pub fn try_new(
        name: impl Into<String>,
        branch: Vec<StageSpec>,
        synthesis: StageSpec,
    ) -> Result<Self, SequencingError> {
        if branch.is_empty() {
            return Err(SequencingError::Empty);
        }

        {
            let mut seen: Vec<&str> = Vec::with_capacity(branch.len());
            for stage in &branch {
                if seen.contains(&stage.name.as_str()) || stage.name == synthesis.name {
                    return Err(SequencingError::DuplicateStage {
                        stage: stage.name.clone(),
                    });
                }
                for required in &stage.requires {
                    if !seen.contains(&required.as_str()) {
                        return Err(SequencingError::UnknownPredecessor {
                            stage: stage.name.clone(),
                            requires: required.clone(),
                        });
                    }
                }
                seen.push(stage.name.as_str());
            }
        }

        if synthesis.reads_source {
            return Err(SequencingError::SynthesisReadsSource {
                stage: synthesis.name.clone(),
            });
        }
        if synthesis.requires.is_empty() {
            return Err(SequencingError::SynthesisWithoutInputs {
                stage: synthesis.name.clone(),
            });
        }
        for required in &synthesis.requires {
            if !branch.iter().any(|s| s.name == *required) {
                return Err(SequencingError::UnknownPredecessor {
                    stage: synthesis.name.clone(),
                    requires: required.clone(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            branch,
            synthesis,
        })
    }

    /// The editorial pipeline: analyze, fact-check, and summarize a news
    /// article, then compose an editorial from all three results
    pub fn editorial() -> Self {
        Self {
            name: "editorial".to_string(),
            branch: vec![
                StageSpec::new(
                    "analysis",
                    "Analysis",
                    prompts::CONTENT_ANALYST_ROLE,
                    prompts::CONTENT_ANALYST_INSTRUCTION,
                )
                .reading_source(),
                StageSpec::new(
                    "fact_check",
                    "Fact Check",
                    prompts::FACT_CHECKER_ROLE,
                    prompts::FACT_CHECKER_INSTRUCTION,
                )
                .reading_source(),
                StageSpec::new(
                    "summary",
                    "Summary",
                    prompts::SUMMARIZER_ROLE,
                    prompts::SUMMARIZER_INSTRUCTION,
                )
                .reading_source(),
            ],
            synthesis: StageSpec::new(
                "editorial",
                "Editorial",
                prompts::EDITOR_ROLE,
                prompts::EDITOR_INSTRUCTION,
            )
            .requiring(&["analysis", "fact_check", "summary"]),
        }
    }

    /// The campaign pipeline: analyze a website for marketing insights,
    /// draft copy from the analysis, then propose a campaign idea
    pub fn campaign() -> Self {
        Self {
            name: "campaign".to_string(),
            branch: vec![
                StageSpec::new(
                    "analysis",
                    "Analysis",
                    prompts::MARKETING_ANALYST_ROLE,
                    prompts::MARKETING_ANALYST_INSTRUCTION,
                )
                .reading_source(),
                StageSpec::new(
                    "copy",
                    "Marketing Copy",
                    prompts::COPYWRITER_ROLE,
                    prompts::COPYWRITER_INSTRUCTION,
                )
                .requiring(&["analysis"]),
            ],
            synthesis: StageSpec::new(
                "campaign",
                "Campaign Idea",
                prompts::STRATEGIST_ROLE,
                prompts::STRATEGIST_INSTRUCTION,
            )
            .requiring(&["analysis", "copy"]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-source stages in execution order
    pub fn branch(&self) -> &[StageSpec] {
        &self.branch
    }

    /// The merging stage that runs once after all branches
    pub fn synthesis(&self) -> &StageSpec {
        &self.synthesis
    }

    /// Declared stage names in execution order for a single-source run
    pub fn stage_names(&self) -> Vec<&str> {
        self.branch
            .iter()
            .map(|s| s.name.as_str())
            .chain(std::iter::once(self.synthesis.name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch_stage(name: &str) -> StageSpec {
        StageSpec::new(name, name, "analyst", "Analyze.").reading_source()
    }

    fn synthesis_stage(requires: &[&str]) -> StageSpec {
        StageSpec::new("merge", "Merge", "editor", "Merge.").requiring(requires)
    }

    #[test]
    fn test_canned_plans_pass_validation() {
        for plan in [PipelinePlan::editorial(), PipelinePlan::campaign()] {
            let revalidated = PipelinePlan::try_new(
                plan.name().to_string(),
                plan.branch().to_vec(),
                plan.synthesis().clone(),
            );
            assert!(revalidated.is_ok(), "plan {} failed validation", plan.name());
        }
    }

    #[test]
    fn test_editorial_stage_order() {
        let plan = PipelinePlan::editorial();
        assert_eq!(
            plan.stage_names(),
            vec!["analysis", "fact_check", "summary", "editorial"]
        );
        assert_eq!(
            plan.synthesis().requires,
            vec!["analysis", "fact_check", "summary"]
        );
        assert!(!plan.synthesis().reads_source);
    }

    #[test]
    fn test_campaign_stage_order() {
        let plan = PipelinePlan::campaign();
        assert_eq!(plan.stage_names(), vec!["analysis", "copy", "campaign"]);
        assert_eq!(plan.branch()[1].requires, vec!["analysis".to_string()]);
    }

    #[test]
    fn test_empty_branch_rejected() {
        let result = PipelinePlan::try_new("empty", vec![], synthesis_stage(&["analysis"]));
        assert_eq!(result.unwrap_err(), SequencingError::Empty);
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let result = PipelinePlan::try_new(
            "dup",
            vec![branch_stage("analysis"), branch_stage("analysis")],
            synthesis_stage(&["analysis"]),
        );
        assert_eq!(
            result.unwrap_err(),
            SequencingError::DuplicateStage {
                stage: "analysis".to_string()
            }
        );
    }

    #[test]
    fn test_branch_cannot_require_later_stage() {
        let first = StageSpec::new("copy", "Copy", "copywriter", "Write.").requiring(&["analysis"]);
        let result = PipelinePlan::try_new(
            "backwards",
            vec![first, branch_stage("analysis")],
            synthesis_stage(&["analysis"]),
        );
        assert_eq!(
            result.unwrap_err(),
            SequencingError::UnknownPredecessor {
                stage: "copy".to_string(),
                requires: "analysis".to_string()
            }
        );
    }

    #[test]
    fn test_synthesis_cannot_read_source() {
        let synthesis = synthesis_stage(&["analysis"]).reading_source();
        let result = PipelinePlan::try_new("bad", vec![branch_stage("analysis")], synthesis);
        assert_eq!(
            result.unwrap_err(),
            SequencingError::SynthesisReadsSource {
                stage: "merge".to_string()
            }
        );
    }

    #[test]
    fn test_synthesis_must_require_something() {
        let result =
            PipelinePlan::try_new("bad", vec![branch_stage("analysis")], synthesis_stage(&[]));
        assert_eq!(
            result.unwrap_err(),
            SequencingError::SynthesisWithoutInputs {
                stage: "merge".to_string()
            }
        );
    }

    #[test]
    fn test_synthesis_unknown_requirement_rejected() {
        let result = PipelinePlan::try_new(
            "bad",
            vec![branch_stage("analysis")],
            synthesis_stage(&["analysis", "verdict"]),
        );
        assert_eq!(
            result.unwrap_err(),
            SequencingError::UnknownPredecessor {
                stage: "merge".to_string(),
                requires: "verdict".to_string()
            }
        );
    }

    #[test]
    fn test_synthesis_name_cannot_collide_with_branch() {
        let synthesis = StageSpec::new("analysis", "Analysis", "editor", "Merge.")
            .requiring(&["analysis"]);
        let result = PipelinePlan::try_new("bad", vec![branch_stage("analysis")], synthesis);
        assert_eq!(
            result.unwrap_err(),
            SequencingError::DuplicateStage {
                stage: "analysis".to_string()
            }
        );
    }
}
