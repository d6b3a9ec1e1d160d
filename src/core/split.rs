use crate::core::{BranchKind, SplitPlan, TestBranch, TestPartitioner};
use crate::utils::error::{AthError, Result};
use std::collections::HashMap;

pub const DEFAULT_SPLIT_COUNT: usize = 7;

/// Builds the branch plan: `count` exclusion-list branches from the supplied
/// partitioner, plus exactly one fixed branch for the tagged category, which
/// is never part of the numeric split.
pub fn build_split_plan(
    count: usize,
    category: &str,
    partitioner: &dyn TestPartitioner,
) -> Result<SplitPlan> {
    let exclusion_lists = partitioner.exclusion_lists(count)?;
    if exclusion_lists.len() != count {
        return Err(AthError::ProcessingError {
            message: format!(
                "Partitioner produced {} exclusion lists for {} branches",
                exclusion_lists.len(),
                count
            ),
        });
    }

    let mut branches: Vec<TestBranch> = exclusion_lists
        .into_iter()
        .enumerate()
        .map(|(index, exclusions)| TestBranch {
            name: format!("split{}", index),
            kind: BranchKind::Split { index },
            exclusions,
        })
        .collect();

    branches.push(TestBranch {
        name: category.to_string(),
        kind: BranchKind::Category {
            tag: category.to_string(),
        },
        exclusions: Vec::new(),
    });

    Ok(SplitPlan { branches })
}

pub fn plan_summary(plan: &SplitPlan) -> HashMap<String, serde_json::Value> {
    let mut summary = HashMap::new();

    let split_count = plan
        .branches
        .iter()
        .filter(|b| matches!(b.kind, BranchKind::Split { .. }))
        .count();
    let excluded_total: usize = plan.branches.iter().map(|b| b.exclusions.len()).sum();
    let branch_names: Vec<serde_json::Value> = plan
        .branches
        .iter()
        .map(|b| serde_json::Value::String(b.name.clone()))
        .collect();

    summary.insert(
        "total_branches".to_string(),
        serde_json::Value::Number(plan.branches.len().into()),
    );
    summary.insert(
        "split_branches".to_string(),
        serde_json::Value::Number(split_count.into()),
    );
    summary.insert(
        "total_exclusions".to_string(),
        serde_json::Value::Number(excluded_total.into()),
    );
    summary.insert("branches".to_string(), serde_json::Value::Array(branch_names));

    summary
}
