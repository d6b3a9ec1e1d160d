use crate::core::TestPartitioner;
use crate::utils::error::{AthError, Result};

/// Fallback partitioner for when no test history is available: deals a flat
/// list of test names round-robin into buckets, then hands each branch the
/// tests belonging to every other bucket as its exclusion list.
pub struct RoundRobinPartitioner {
    tests: Vec<String>,
}

impl RoundRobinPartitioner {
    pub fn new(tests: Vec<String>) -> Self {
        Self { tests }
    }
}

impl TestPartitioner for RoundRobinPartitioner {
    fn exclusion_lists(&self, branch_count: usize) -> Result<Vec<Vec<String>>> {
        if branch_count == 0 {
            return Err(AthError::ProcessingError {
                message: "Cannot partition tests into zero branches".to_string(),
            });
        }

        let mut lists = vec![Vec::new(); branch_count];
        for (i, test) in self.tests.iter().enumerate() {
            let bucket = i % branch_count;
            for (branch, list) in lists.iter_mut().enumerate() {
                if branch != bucket {
                    list.push(test.clone());
                }
            }
        }
        Ok(lists)
    }
}
