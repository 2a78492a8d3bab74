//! Operator planner
//!
//! Reorders declared operators into the canonical execution order:
//! 1. Filter (shrinks the working set before anything else)
//! 2. GroupBy
//! 3. Sort
//! 4. Select (runs late so earlier steps still see every field)
//! 5. Limit (bounds the final result, never an intermediate one)
//!
//! Relative order among operators of the same kind is preserved.

use super::ast::Operator;

/// Stateless planner producing canonical operator sequences
pub struct OperatorPlanner;

impl OperatorPlanner {
    /// Returns the operators in canonical order.
    ///
    /// Pure and idempotent: reordering a canonical sequence is a no-op.
    pub fn reorder(operators: &[Operator]) -> Vec<Operator> {
        let mut ordered = operators.to_vec();
        // sort_by_key is stable, so same-kind operators keep declared order
        ordered.sort_by_key(|op| op.kind().rank());
        ordered
    }

    /// Returns true when `operators` already is in canonical order
    pub fn is_canonical(operators: &[Operator]) -> bool {
        operators
            .windows(2)
            .all(|pair| pair[0].kind().rank() <= pair[1].kind().rank())
    }
}
