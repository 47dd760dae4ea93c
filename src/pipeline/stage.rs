use crate::models::AuxParams;

/// One declared text-transformation step
///
/// A stage is pure data; the runner interprets it. Its input is assembled
/// from the run objective, auxiliary fields, the source document when
/// `reads_source` is set, and the outputs of the stages named in `requires`.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// Machine name, unique within a plan (e.g. "fact_check")
    pub name: String,
    /// Label used in assembled inputs and reports (e.g. "Fact Check")
    pub title: String,
    /// Role the completion service is asked to assume
    pub role: String,
    /// Task instruction framing the completion call
    pub instruction: String,
    /// Include the fetched document body in this stage's input
    pub reads_source: bool,
    /// Names of earlier stages whose outputs this stage consumes
    pub requires: Vec<String>,
}

impl StageSpec {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        role: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            role: role.into(),
            instruction: instruction.into(),
            reads_source: false,
            requires: Vec::new(),
        }
    }

    pub fn reading_source(mut self) -> Self {
        self.reads_source = true;
        self
    }

    pub fn requiring(mut self, stages: &[&str]) -> Self {
        self.requires = stages.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A labeled block of text contributing to one stage input
#[derive(Debug, Clone)]
pub struct InputBlock {
    pub label: String,
    pub text: String,
}

impl InputBlock {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Assemble the exact text sent to the completion service for one stage:
/// the objective, auxiliary fields in caller order, then each labeled block.
/// Block text is included byte for byte.
pub fn assemble_input(objective: &str, aux: &AuxParams, blocks: &[InputBlock]) -> String {
    let mut parts = Vec::with_capacity(1 + blocks.len());

    parts.push(format!("Objective: {}", objective));
    for (name, value) in aux.iter() {
        parts.push(format!("{}: {}", name, value));
    }
    for block in blocks {
        parts.push(format!("{}:\n{}", block.label, block.text));
    }

    parts.join("\n\n")
}
