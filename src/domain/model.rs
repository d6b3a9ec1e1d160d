use serde::{Deserialize, Serialize};

/// Where the war under test comes from. Every accepted URL form maps onto
/// exactly one variant, so the fetch step can match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactSource {
    Maven {
        group: String,
        artifact: String,
        version: String,
        packaging: Option<String>,
    },
    Artifact {
        item: String,
        run: String,
        artifact: String,
    },
    Stable {
        item: String,
        artifact: String,
    },
    PlainUrl(String),
}

/// The fetched, verified and stashed war.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarArtifact {
    pub path: String,
    pub stash_name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    /// One of the numeric exclusion-list branches.
    Split { index: usize },
    /// The fixed branch for a separately-tagged test category.
    Category { tag: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestBranch {
    pub name: String,
    pub kind: BranchKind,
    pub exclusions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitPlan {
    pub branches: Vec<TestBranch>,
}

/// What a single branch run produced. The archival flags are informational;
/// report collection is best-effort and never fails the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchOutcome {
    pub branch: String,
    pub node: String,
    pub reports_archived: bool,
    pub bundle_archived: bool,
    pub diagnostics_archived: bool,
    pub duration_ms: u64,
}
