//! Query builder facade
//!
//! Accumulates operators through chained declarations, validating every
//! referenced field as it is declared. `execute` plans and runs the pending
//! operators over the builder's snapshot, then clears them.
//!
//! Clearing is destructive: a second `execute` with nothing declared in
//! between returns the whole snapshot unchanged.

use crate::executor::{ExecutionResult, ExecutorResult, PipelineExecutor};
use crate::observability::{
    log_event, log_event_with_fields, Event, MetricsRegistry, ObservationScope,
};
use crate::planner::{Aggregations, Condition, ExplainPlan, Operator, OperatorPlanner, Predicate};
use crate::record::{Record, RecordSet};
use crate::schema::{FieldValidator, Schema, SchemaResult, ValidatorConfig};

/// Chainable query over one in-memory record set.
///
/// Not meant to be shared between threads; use one builder per query.
#[derive(Debug)]
pub struct QueryBuilder {
    source: RecordSet,
    validator: FieldValidator,
    pending: Vec<Operator>,
    metrics: MetricsRegistry,
}

impl QueryBuilder {
    /// Creates a builder over a snapshot of `records`.
    ///
    /// The schema is derived from the first record.
    pub fn new(records: Vec<Record>) -> Self {
        Self::with_config(records, ValidatorConfig::default())
    }

    /// Creates a builder with custom suggestion settings
    pub fn with_config(records: Vec<Record>, config: ValidatorConfig) -> Self {
        let schema = Schema::from_records(&records);
        Self {
            source: records,
            validator: FieldValidator::with_config(schema, config),
            pending: Vec::new(),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Projects results to `fields`, in order. Duplicates are collapsed.
    pub fn select<S: AsRef<str>>(&mut self, fields: &[S]) -> SchemaResult<&mut Self> {
        self.check(fields.iter().map(|f| f.as_ref()))?;
        let op = Operator::select(fields.iter().map(|f| f.as_ref().to_string()));
        Ok(self.push(op))
    }

    /// Keeps records for which `predicate` holds.
    ///
    /// Predicates are opaque, so nothing is validated here.
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.push(Operator::filter(predicate))
    }

    /// Keeps records for which an infallible closure returns true
    pub fn where_<F>(&mut self, label: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.filter(Predicate::from_fn(label, function))
    }

    /// Keeps records matching a declarative condition.
    ///
    /// Unlike closures, conditions name their fields, which are validated.
    pub fn filter_condition(&mut self, condition: Condition) -> SchemaResult<&mut Self> {
        self.check(condition.fields())?;
        Ok(self.filter(Predicate::from_condition(condition)))
    }

    /// Stable sort by `field`
    pub fn sort(&mut self, field: &str, descending: bool) -> SchemaResult<&mut Self> {
        self.check([field])?;
        Ok(self.push(Operator::sort(field, descending)))
    }

    /// Groups by `field`, aggregating the named fields per group
    pub fn group_by(&mut self, field: &str, aggregations: Aggregations) -> SchemaResult<&mut Self> {
        self.check(std::iter::once(field).chain(aggregations.fields()))?;
        Ok(self.push(Operator::group_by(field, aggregations)))
    }

    /// Keeps at most `count` records
    pub fn limit(&mut self, count: usize) -> &mut Self {
        self.push(Operator::limit(count))
    }

    /// Runs the pending operators and returns the resulting records.
    ///
    /// Pending operators are cleared on success and kept on failure.
    pub fn execute(&mut self) -> ExecutorResult<Vec<Record>> {
        self.execute_detailed().map(ExecutionResult::into_records)
    }

    /// Like `execute`, but also returns execution counters
    pub fn execute_detailed(&mut self) -> ExecutorResult<ExecutionResult> {
        let plan = OperatorPlanner::reorder(&self.pending);
        let operators = plan.len().to_string();
        let reordered = (!OperatorPlanner::is_canonical(&self.pending)).to_string();
        log_event_with_fields(
            Event::QueryPlanned,
            &[("operators", operators.as_str()), ("reordered", reordered.as_str())],
        );

        let source = self.source.len().to_string();
        let scope = ObservationScope::with_fields(
            "QUERY",
            &[("operators", operators.as_str()), ("source", source.as_str())],
        );

        match PipelineExecutor::execute(&self.source, &plan) {
            Ok(result) => {
                self.metrics
                    .record_execution(result.input_count, result.returned_count);
                let returned = result.returned_count.to_string();
                scope.complete_with_fields(&[("returned", returned.as_str())]);
                log_event(Event::QueryExecuted);
                self.pending.clear();
                Ok(result)
            }
            Err(err) => {
                self.metrics.increment_queries_failed();
                let reason = err.to_string();
                scope.fail(&reason);
                log_event_with_fields(Event::QueryFailed, &[("reason", reason.as_str())]);
                Err(err)
            }
        }
    }

    /// Renders the canonical plan without running or clearing it
    pub fn explain(&self) -> ExplainPlan {
        ExplainPlan::from_operators(&self.pending)
    }

    /// Declared operators, in declaration order
    pub fn pending(&self) -> &[Operator] {
        &self.pending
    }

    /// Replaces the pending operators, e.g. with a saved query
    pub fn load_operators(&mut self, operators: Vec<Operator>) {
        self.pending = operators;
    }

    pub fn schema(&self) -> &Schema {
        self.validator.schema()
    }

    /// Number of records in the snapshot
    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    fn push(&mut self, op: Operator) -> &mut Self {
        self.pending.push(op);
        self
    }

    fn check<'f, I>(&self, fields: I) -> SchemaResult<()>
    where
        I: IntoIterator<Item = &'f str>,
    {
        self.validator.validate(fields).map_err(|err| {
            self.metrics.increment_fields_rejected();
            log_event_with_fields(
                Event::FieldRejected,
                &[("field", err.field()), ("message", err.message())],
            );
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::StepError;
    use crate::planner::{Aggregation, OperatorKind};
    use crate::record::Scalar;

    fn repos() -> Vec<Record> {
        vec![
            Record::from_pairs([
                ("Name", Scalar::str("a")),
                ("Stars", Scalar::Int(10)),
                ("Language", Scalar::str("Go")),
            ]),
            Record::from_pairs([
                ("Name", Scalar::str("b")),
                ("Stars", Scalar::Int(50)),
                ("Language", Scalar::Null),
            ]),
        ]
    }

    #[test]
    fn test_select_sort_limit_scenario() {
        let mut builder = QueryBuilder::new(repos());
        builder
            .select(&["Name", "Stars"])
            .unwrap()
            .sort("Stars", true)
            .unwrap()
            .limit(1);

        let rows = builder.execute().unwrap();

        assert_eq!(
            rows,
            vec![Record::from_pairs([
                ("Name", Scalar::str("b")),
                ("Stars", Scalar::Int(50)),
            ])]
        );
    }

    #[test]
    fn test_where_language_is_null() {
        let mut builder = QueryBuilder::new(repos());
        builder
            .filter_condition(Condition::is_null("Language"))
            .unwrap()
            .select(&["Name"])
            .unwrap();

        let rows = builder.execute().unwrap();
        assert_eq!(rows, vec![Record::from_pairs([("Name", Scalar::str("b"))])]);
    }

    #[test]
    fn test_unknown_field_rejected_at_declaration() {
        let mut builder = QueryBuilder::new(repos());

        let err = builder.sort("Starz", true).unwrap_err();

        assert_eq!(err.field(), "Starz");
        assert!(err.suggestions().iter().any(|s| s == "Stars"));
        assert!(builder.pending().is_empty());
        assert_eq!(builder.metrics().snapshot().fields_rejected, 1);
    }

    #[test]
    fn test_group_by_validates_aggregation_fields() {
        let mut builder = QueryBuilder::new(repos());
        let aggs = Aggregations::new().with("Forks", Aggregation::Sum);

        assert!(builder.group_by("Language", aggs).is_err());
    }

    #[test]
    fn test_execute_clears_pending() {
        let mut builder = QueryBuilder::new(repos());
        builder.limit(1);

        assert_eq!(builder.execute().unwrap().len(), 1);
        assert!(builder.pending().is_empty());

        // Nothing pending: the whole snapshot comes back
        assert_eq!(builder.execute().unwrap(), repos());
    }

    #[test]
    fn test_failed_execute_keeps_pending() {
        let mut builder = QueryBuilder::new(repos());
        builder
            .group_by("Language", Aggregations::new())
            .unwrap()
            .sort("Stars", false)
            .unwrap();

        let err = builder.execute().unwrap_err();

        assert_eq!(err.operator(), OperatorKind::Sort);
        assert!(matches!(err.cause(), StepError::MissingField { .. }));
        assert_eq!(builder.pending().len(), 2);
        assert_eq!(builder.metrics().snapshot().queries_failed, 1);
    }

    #[test]
    fn test_explain_does_not_mutate() {
        let mut builder = QueryBuilder::new(repos());
        builder.limit(1).where_("starred", |r| r.contains("Stars"));

        let plan = builder.explain();

        assert_eq!(plan.steps[0].operator, "WHERE");
        assert_eq!(plan.steps[1].operator, "LIMIT");
        assert_eq!(builder.pending().len(), 2);
    }

    #[test]
    fn test_explain_with_nothing_declared() {
        let builder = QueryBuilder::new(repos());

        let plan = builder.explain();

        assert!(plan.is_empty());
        assert_eq!(plan.to_string(), "No operations to execute\n");
    }

    #[test]
    fn test_empty_source() {
        let mut builder = QueryBuilder::new(Vec::new());
        builder.limit(3);

        assert!(builder.execute().unwrap().is_empty());
        assert!(builder.pending().is_empty());
        assert!(builder.schema().is_empty());
    }

    #[test]
    fn test_source_snapshot_untouched() {
        let mut builder = QueryBuilder::new(repos());
        builder.select(&["Name"]).unwrap();
        builder.execute().unwrap();

        assert_eq!(builder.source_len(), 2);
        assert_eq!(builder.execute().unwrap(), repos());
    }
}
