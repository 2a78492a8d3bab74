//! Explain plan output
//!
//! Produces deterministic, human-readable, numbered plan output.

use std::fmt;

use serde::Serialize;

use super::ast::Operator;
use super::planner::OperatorPlanner;

/// One numbered line of an explain plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainStep {
    /// 1-based position in the canonical sequence
    pub position: usize,
    /// Operator name (WHERE, GROUP BY, SORT, SELECT, LIMIT)
    pub operator: &'static str,
    /// Operator parameters
    pub detail: String,
}

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainPlan {
    pub steps: Vec<ExplainStep>,
}

impl ExplainPlan {
    /// Creates an explain plan from declared operators (reordered first)
    pub fn from_operators(operators: &[Operator]) -> Self {
        let steps = OperatorPlanner::reorder(operators)
            .iter()
            .enumerate()
            .map(|(i, op)| ExplainStep {
                position: i + 1,
                operator: op.kind().as_str(),
                detail: describe(op),
            })
            .collect();

        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

fn describe(op: &Operator) -> String {
    match op {
        Operator::Select { fields } => format!("[{}]", fields.join(", ")),
        Operator::Filter { predicate } => predicate.label().to_string(),
        Operator::Sort { field, descending } => format!(
            "by field '{}' ({})",
            field,
            if *descending { "descending" } else { "ascending" }
        ),
        Operator::GroupBy {
            field,
            aggregations,
        } => {
            if aggregations.is_empty() {
                format!("field '{}'", field)
            } else {
                let aggs: Vec<String> = aggregations
                    .iter()
                    .map(|(f, agg)| format!("{}: {}", f, agg.name()))
                    .collect();
                format!("field '{}' with aggregations [{}]", field, aggs.join(", "))
            }
        }
        Operator::Limit { count } => format!("{} records", count),
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return writeln!(f, "No operations to execute");
        }

        writeln!(f, "Execution plan:")?;
        for step in &self.steps {
            writeln!(f, "{}. {}: {}", step.position, step.operator, step.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::aggregate::{Aggregation, Aggregations};
    use crate::planner::ast::Predicate;

    #[test]
    fn test_empty_plan() {
        let plan = ExplainPlan::from_operators(&[]);
        assert!(plan.is_empty());
        assert_eq!(plan.to_string(), "No operations to execute\n");
    }

    #[test]
    fn test_numbered_canonical_rendering() {
        let ops = vec![
            Operator::limit(1),
            Operator::select(["Name", "Stars"]),
            Operator::sort("Stars", true),
            Operator::filter(Predicate::from_fn("Language is null", |_| true)),
            Operator::group_by(
                "Language",
                Aggregations::new().with("Stars", Aggregation::Average),
            ),
        ];
        let rendered = ExplainPlan::from_operators(&ops).to_string();

        let expected = "Execution plan:\n\
            1. WHERE: Language is null\n\
            2. GROUP BY: field 'Language' with aggregations [Stars: average]\n\
            3. SORT: by field 'Stars' (descending)\n\
            4. SELECT: [Name, Stars]\n\
            5. LIMIT: 1 records\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_group_by_without_aggregations() {
        let ops = vec![Operator::group_by("Language", Aggregations::new())];
        let plan = ExplainPlan::from_operators(&ops);
        assert_eq!(plan.steps[0].detail, "field 'Language'");
    }
}
