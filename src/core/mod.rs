pub mod fetch;
pub mod runner;
pub mod source;
pub mod split;
pub mod version;

pub use crate::domain::model::{
    ArtifactSource, BranchKind, BranchOutcome, SplitPlan, TestBranch, WarArtifact,
};
pub use crate::domain::ports::{Host, Storage, TestPartitioner};
pub use crate::utils::error::Result;
