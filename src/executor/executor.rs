//! Pipeline executor
//!
//! Applies a canonical operator sequence to a record set, producing a new
//! record set. Execution is deterministic: same operators and same input
//! give the same output.
//!
//! Each step consumes the previous step's working set. The caller's slice
//! is copied once up front and never touched afterwards.

use crate::planner::Operator;
use crate::record::{Record, RecordSet};

use super::errors::{ExecutorError, ExecutorResult, StepError};
use super::filters::PredicateFilter;
use super::grouping::GroupAggregator;
use super::projection::Projector;
use super::result::ExecutionResult;
use super::sorter::ResultSorter;

/// Stateless executor over in-memory record sets
pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Executes `operators` in the given order against a copy of `records`.
    ///
    /// Operators are expected in canonical order (see `OperatorPlanner`).
    /// Execution stops at the first failing operator and no partial result
    /// is returned.
    pub fn execute(records: &[Record], operators: &[Operator]) -> ExecutorResult<ExecutionResult> {
        let mut working: RecordSet = records.to_vec();

        for (index, operator) in operators.iter().enumerate() {
            working = Self::apply(working, operator).map_err(|cause| {
                ExecutorError::operation_failed(operator.kind(), index + 1, cause)
            })?;
        }

        Ok(ExecutionResult {
            input_count: records.len(),
            returned_count: working.len(),
            operators_applied: operators.len(),
            records: working,
        })
    }

    /// Applies a single operator to the working set
    fn apply(working: RecordSet, operator: &Operator) -> Result<RecordSet, StepError> {
        match operator {
            Operator::Filter { predicate } => PredicateFilter::apply(working, predicate),
            Operator::GroupBy {
                field,
                aggregations,
            } => GroupAggregator::group(&working, field, aggregations),
            Operator::Sort { field, descending } => {
                let mut sorted = working;
                ResultSorter::sort(&mut sorted, field, *descending)?;
                Ok(sorted)
            }
            Operator::Select { fields } => Ok(Projector::select(working, fields)),
            Operator::Limit { count } => Ok(Projector::limit(working, *count)),
        }
    }
}
