//! Pipeline Semantics Tests
//!
//! End-to-end properties of declare → plan → execute:
//! - Canonical order is enforced regardless of declaration order
//! - Limit bounds the final result only
//! - Select tolerates fields a grouping did not produce
//! - Unknown fields fail at declaration with suggestions

use repoquery::executor::StepError;
use repoquery::planner::{Aggregation, Aggregations, Condition, OperatorKind, OperatorPlanner};
use repoquery::{Operator, Predicate, QueryBuilder, Record, Scalar};

// =============================================================================
// Helper Functions
// =============================================================================

fn repo(name: &str, stars: i64, language: Option<&str>) -> Record {
    Record::from_pairs([
        ("Name", Scalar::str(name)),
        ("Stars", Scalar::Int(stars)),
        ("Language", Scalar::from(language)),
    ])
}

fn two_repos() -> Vec<Record> {
    vec![repo("a", 10, Some("Go")), repo("b", 50, None)]
}

fn dataset() -> Vec<Record> {
    vec![
        repo("alpha", 120, Some("Rust")),
        repo("beta", 40, Some("Go")),
        repo("gamma", 300, Some("Rust")),
        repo("delta", 7, None),
        repo("epsilon", 90, Some("Go")),
        repo("zeta", 55, Some("Python")),
    ]
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

/// Test: select + sort desc + limit 1 returns the most starred, projected.
#[test]
fn test_select_sort_limit() {
    let mut builder = QueryBuilder::new(two_repos());
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

/// Test: filtering on a null language then projecting the name.
#[test]
fn test_where_language_is_null() {
    let mut builder = QueryBuilder::new(two_repos());
    builder
        .where_("Language is null", |r| {
            r.get("Language").map_or(true, Scalar::is_null)
        })
        .select(&["Name"])
        .unwrap();

    let rows = builder.execute().unwrap();

    assert_eq!(rows, vec![Record::from_pairs([("Name", Scalar::str("b"))])]);
}

/// Test: average per group, groups in first-seen order, null is a group.
#[test]
fn test_group_by_average() {
    let records = vec![
        Record::from_pairs([("Language", Scalar::str("Go")), ("Stars", Scalar::Int(10))]),
        Record::from_pairs([("Language", Scalar::str("Go")), ("Stars", Scalar::Int(30))]),
        Record::from_pairs([("Language", Scalar::Null), ("Stars", Scalar::Int(50))]),
    ];
    let mut builder = QueryBuilder::new(records);
    builder
        .group_by(
            "Language",
            Aggregations::new().with("Stars", Aggregation::Average),
        )
        .unwrap();

    let rows = builder.execute().unwrap();

    assert_eq!(
        rows,
        vec![
            Record::from_pairs([("Language", Scalar::str("Go")), ("Stars", Scalar::Int(20))]),
            Record::from_pairs([("Language", Scalar::Null), ("Stars", Scalar::Int(50))]),
        ]
    );
}

// =============================================================================
// Planner properties
// =============================================================================

/// Test: reorder(reorder(ops)) == reorder(ops)
#[test]
fn test_reorder_idempotent() {
    let ops = vec![
        Operator::limit(2),
        Operator::select(["Name"]),
        Operator::filter(Predicate::from_fn("any", |_| true)),
        Operator::sort("Stars", false),
    ];

    let once = OperatorPlanner::reorder(&ops);
    let twice = OperatorPlanner::reorder(&once);

    let kinds = |ops: &[Operator]| ops.iter().map(Operator::kind).collect::<Vec<_>>();
    assert_eq!(kinds(&once), kinds(&twice));
    assert_eq!(
        kinds(&once),
        vec![
            OperatorKind::Filter,
            OperatorKind::Sort,
            OperatorKind::Select,
            OperatorKind::Limit,
        ]
    );
}

/// Test: two declaration orders of the same operators give the same result.
#[test]
fn test_declared_order_independence() {
    let mut forward = QueryBuilder::new(dataset());
    forward
        .filter_condition(Condition::not_null("Language"))
        .unwrap()
        .group_by(
            "Language",
            Aggregations::new()
                .with("Stars", Aggregation::Sum)
                .with("Name", Aggregation::Count),
        )
        .unwrap()
        .sort("Stars", true)
        .unwrap()
        .select(&["Language", "Stars", "Name"])
        .unwrap()
        .limit(2);

    let mut backward = QueryBuilder::new(dataset());
    backward
        .limit(2)
        .select(&["Language", "Stars", "Name"])
        .unwrap()
        .sort("Stars", true)
        .unwrap()
        .group_by(
            "Language",
            Aggregations::new()
                .with("Stars", Aggregation::Sum)
                .with("Name", Aggregation::Count),
        )
        .unwrap()
        .filter_condition(Condition::not_null("Language"))
        .unwrap();

    let expected = vec![
        Record::from_pairs([
            ("Language", Scalar::str("Rust")),
            ("Stars", Scalar::Int(420)),
            ("Name", Scalar::Int(2)),
        ]),
        Record::from_pairs([
            ("Language", Scalar::str("Go")),
            ("Stars", Scalar::Int(130)),
            ("Name", Scalar::Int(2)),
        ]),
    ];
    assert_eq!(forward.execute().unwrap(), expected);
    assert_eq!(backward.execute().unwrap(), expected);
}

/// Test: explain lists the canonical order, not the declared one.
#[test]
fn test_explain_canonical() {
    let mut builder = QueryBuilder::new(two_repos());
    builder
        .limit(1)
        .select(&["Name", "Stars"])
        .unwrap()
        .sort("Stars", true)
        .unwrap();

    let rendered = builder.explain().to_string();

    assert_eq!(
        rendered,
        "Execution plan:\n\
         1. SORT: by field 'Stars' (descending)\n\
         2. SELECT: [Name, Stars]\n\
         3. LIMIT: 1 records\n"
    );
}

// =============================================================================
// Limit property
// =============================================================================

/// Test: len(execute()) == min(n, len(records after preceding operators))
#[test]
fn test_limit_bounds_final_result() {
    let with_language = dataset()
        .iter()
        .filter(|r| !r.get("Language").map_or(true, Scalar::is_null))
        .count();

    for n in [0, 1, 3, with_language, with_language + 10] {
        let mut builder = QueryBuilder::new(dataset());
        builder
            .limit(n)
            .filter_condition(Condition::not_null("Language"))
            .unwrap()
            .sort("Stars", false)
            .unwrap();

        let rows = builder.execute().unwrap();
        assert_eq!(rows.len(), n.min(with_language), "limit {}", n);
    }
}

/// Test: limit applies after sort even when declared first.
#[test]
fn test_limit_declared_first_still_applies_last() {
    let mut builder = QueryBuilder::new(dataset());
    builder.limit(1).sort("Stars", true).unwrap();

    let rows = builder.execute().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Name"), Some(&Scalar::str("gamma")));
}

// =============================================================================
// GroupBy / Select interplay
// =============================================================================

/// Test: selecting a field the grouping dropped yields null, not an error.
#[test]
fn test_select_after_group_by_yields_null() {
    let mut builder = QueryBuilder::new(dataset());
    builder
        .group_by("Language", Aggregations::new())
        .unwrap()
        .select(&["Language", "Name"])
        .unwrap();

    let rows = builder.execute().unwrap();

    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.get("Name") == Some(&Scalar::Null)));
}

/// Test: aggregating a group whose values are all null yields null.
#[test]
fn test_all_null_group_aggregates_to_null() {
    let records = vec![
        Record::from_pairs([("Language", Scalar::str("Go")), ("Stars", Scalar::Null)]),
        Record::from_pairs([("Language", Scalar::str("Go")), ("Stars", Scalar::Null)]),
        Record::from_pairs([("Language", Scalar::str("C")), ("Stars", Scalar::Int(4))]),
    ];
    let mut builder = QueryBuilder::new(records);
    builder
        .group_by(
            "Language",
            Aggregations::new().with("Stars", Aggregation::Max),
        )
        .unwrap();

    let rows = builder.execute().unwrap();

    assert_eq!(rows[0].get("Stars"), Some(&Scalar::Null));
    assert_eq!(rows[1].get("Stars"), Some(&Scalar::Int(4)));
}

// =============================================================================
// Validation and execution failures
// =============================================================================

/// Test: "Starz" is rejected with "Stars" among the suggestions.
#[test]
fn test_unknown_field_suggestions() {
    let mut builder = QueryBuilder::new(two_repos());

    let err = builder.select(&["Name", "Starz"]).unwrap_err();

    assert_eq!(err.field(), "Starz");
    assert!(err.suggestions().iter().any(|s| s == "Stars"));
    assert!(builder.pending().is_empty());
}

/// Test: a raising predicate surfaces as an execution error naming WHERE.
#[test]
fn test_predicate_failure_reports_operator() {
    let mut builder = QueryBuilder::new(two_repos());
    builder
        .filter(Predicate::new("Forks > 1", |r| {
            Ok(r.require("Forks")?.as_i64().unwrap_or(0) > 1)
        }))
        .limit(1);

    let err = builder.execute().unwrap_err();

    assert_eq!(err.operator(), OperatorKind::Filter);
    assert_eq!(err.position(), 1);
    assert!(matches!(err.cause(), StepError::Predicate(_)));
    assert_eq!(builder.pending().len(), 2);
}

/// Test: sorting a column that mixes kinds fails instead of guessing.
#[test]
fn test_sort_mixed_kinds_fails() {
    let records = vec![
        Record::from_pairs([("Stars", Scalar::Int(1))]),
        Record::from_pairs([("Stars", Scalar::str("many"))]),
    ];
    let mut builder = QueryBuilder::new(records);
    builder.sort("Stars", false).unwrap();

    let err = builder.execute().unwrap_err();

    assert_eq!(err.operator(), OperatorKind::Sort);
    assert!(matches!(err.cause(), StepError::MixedKinds { .. }));
}

/// Test: nulls sort last in both directions.
#[test]
fn test_sort_nulls_last() {
    let records = vec![
        Record::from_pairs([("Name", Scalar::str("n")), ("Stars", Scalar::Null)]),
        Record::from_pairs([("Name", Scalar::str("lo")), ("Stars", Scalar::Int(1))]),
        Record::from_pairs([("Name", Scalar::str("hi")), ("Stars", Scalar::Int(9))]),
    ];

    for descending in [false, true] {
        let mut builder = QueryBuilder::new(records.clone());
        builder.sort("Stars", descending).unwrap();

        let rows = builder.execute().unwrap();
        assert_eq!(rows[2].get("Name"), Some(&Scalar::str("n")));
    }
}
