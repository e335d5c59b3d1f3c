//! Configurable builder policies and the two conversion directions.

mod common;

use common::*;
use quarry::{
    config::{OrderConflict, QueryConfig, RangeCheck},
    error::ErrorClass,
    model::FieldRef,
    prelude::*,
    query::{
        BuilderError, CompareOp, ContradictionError, IdFilter, Mask, OrderSpec, Predicate,
        PredicateError, PredicateGroup, QueryError, Subject,
    },
    value::{Value, ValueType},
};

fn configured(config: QueryConfig) -> quarry::query::QueryBuilder<ProjectId, ProjectState> {
    project_query().with_config(config)
}

fn filter_only(predicate: Predicate<FieldRef>) -> RecordQuery<ProjectId, ProjectState> {
    let subject = Subject::new(
        PredicateGroup::new([predicate]),
        Vec::<PredicateGroup<FieldRef>>::new(),
    );

    RecordQuery::new(
        IdFilter::all(),
        subject,
        Mask::empty(),
        OrderSpec::new(),
        None,
    )
}

// ----------------------------------------------------------------------
// Ordering
// ----------------------------------------------------------------------

#[test]
fn replace_policy_keeps_position_and_takes_last_direction() {
    let query = configured(QueryConfig::new().with_order_conflict(OrderConflict::Replace))
        .order_by(ProjectState::DAYS_SINCE_STARTED, OrderDirection::Asc)
        .order_by(ProjectState::OWNER_HANDLE, OrderDirection::Asc)
        .order_by(ProjectState::DAYS_SINCE_STARTED, OrderDirection::Desc)
        .build()
        .expect("replace");

    assert_eq!(
        query.ordering().fields(),
        [
            (
                ProjectState::DAYS_SINCE_STARTED.column(),
                OrderDirection::Desc
            ),
            (ProjectState::OWNER_HANDLE.column(), OrderDirection::Asc),
        ]
    );
}

#[test]
fn reject_policy_fails_on_reordering_a_column() {
    let err = configured(QueryConfig::new().with_order_conflict(OrderConflict::Reject))
        .order_by(ProjectState::DAYS_SINCE_STARTED, OrderDirection::Asc)
        .order_by(ProjectState::DAYS_SINCE_STARTED, OrderDirection::Desc)
        .build()
        .expect_err("duplicate order");

    assert_eq!(
        err,
        QueryError::Builder(BuilderError::DuplicateOrder {
            column: "days_since_started".to_string()
        })
    );
    assert_eq!(err.class(), ErrorClass::Unsupported);
}

#[test]
fn enum_and_bool_columns_are_not_sort_keys() {
    for err in [
        project_query()
            .order_by(ProjectState::STATUS, OrderDirection::Asc)
            .build()
            .expect_err("enum"),
        project_query()
            .order_by(ProjectState::ARCHIVED, OrderDirection::Desc)
            .build()
            .expect_err("bool"),
    ] {
        assert!(matches!(
            err,
            QueryError::Builder(BuilderError::UnorderableColumn { .. })
        ));
        assert_eq!(err.class(), ErrorClass::Unsupported);
    }
}

// ----------------------------------------------------------------------
// Range emptiness
// ----------------------------------------------------------------------

#[test]
fn empty_range_fails_at_build_by_default() {
    let err = project_query()
        .days_since_started()
        .is_greater_than(Days(10))
        .days_since_started()
        .is_less_than(Days(5))
        .build()
        .expect_err("empty range");

    assert_eq!(
        err,
        QueryError::Contradiction(ContradictionError::EmptyRange {
            column: "days_since_started".to_string()
        })
    );
}

#[test]
fn deferred_range_builds_and_matches_nothing() {
    let query = configured(QueryConfig::new().with_range_check(RangeCheck::Deferred))
        .days_since_started()
        .is_greater_than(Days(10))
        .days_since_started()
        .is_less_than(Days(5))
        .build()
        .expect("deferred");

    for days in [0, 5, 7, 10, 40] {
        assert!(!query.matches(&1, &project(Status::Started, days)));
    }
}

#[test]
fn deferred_query_copies_into_a_default_builder() {
    let query = configured(QueryConfig::new().with_range_check(RangeCheck::Deferred))
        .days_since_started()
        .is_greater_than(Days(10))
        .days_since_started()
        .is_less_than(Days(5))
        .build()
        .expect("deferred");

    let copy = query.copy_to(project_query()).build().expect("copy");

    assert_eq!(copy, query);
    assert_eq!(copy.range_check(), RangeCheck::Deferred);
    assert_eq!(copy.to_record_query(), query.to_record_query());
}

#[test]
fn deferred_range_still_rejects_equality_conflicts() {
    let err = configured(QueryConfig::new().with_range_check(RangeCheck::Deferred))
        .status()
        .is(Status::Done)
        .status()
        .is_not(Status::Done)
        .build()
        .expect_err("equality conflict");

    assert_eq!(err.class(), ErrorClass::Contradiction);
}

#[test]
fn policies_load_from_toml() {
    let config = QueryConfig::from_toml_str(
        r#"
        order_conflict = "reject"
        range_check = "deferred"
        "#,
    )
    .expect("config");

    let builder = configured(config);
    assert_eq!(builder.config(), config);

    let err = builder
        .either(|e| {
            e.or(|b| {
                b.order_by(ProjectState::STATUS, OrderDirection::Asc)
                    .status()
                    .is(Status::Done)
            })
        })
        .build()
        .expect_err("branch order");
    assert_eq!(
        err,
        QueryError::Builder(BuilderError::BranchNotFilterOnly {
            operation: "order_by"
        })
    );
}

// ----------------------------------------------------------------------
// Conversion
// ----------------------------------------------------------------------

#[test]
fn copy_round_trips_through_a_fresh_builder() {
    let query = project_query()
        .id()
        .is_in([1, 2])
        .status()
        .is_in([Status::Started, Status::Created])
        .either(|e| {
            e.or(|b| b.days_since_started().is_greater_or_equal_to(Days(30)))
                .or(|b| b.archived().is(true))
        })
        .order_by(ProjectState::DAYS_SINCE_STARTED, OrderDirection::Desc)
        .with_mask([ProjectState::STATUS.column()])
        .limit(3)
        .build()
        .expect("query");

    let copy = query.copy_to(project_query()).build().expect("copy");

    assert_eq!(copy, query);
    assert_eq!(copy.to_record_query(), query.to_record_query());
}

#[test]
fn record_query_rebinds_to_the_shape() {
    let query = project_query()
        .status()
        .is(Status::Started)
        .owned_by()
        .is("ana".to_string())
        .build()
        .expect("query");

    let rebound = EntityQuery::try_from_record(&query.to_record_query()).expect("rebind");

    assert_eq!(rebound, query);
}

#[test]
fn unknown_record_field_is_rejected() {
    let budget = FieldRef::new("budget", ValueType::Uint);
    let predicate =
        Predicate::compare(budget, CompareOp::Gt, Value::Uint(5)).expect("budget predicate");
    let record = filter_only(predicate);

    let err = EntityQuery::try_from_record(&record).expect_err("unknown field");

    assert_eq!(err.class(), ErrorClass::UnknownColumn);
    assert_eq!(
        err,
        QueryError::Predicate(PredicateError::UnknownColumn {
            entity: "ProjectState",
            column: "budget".to_string(),
        })
    );
}

#[test]
fn drifted_record_field_type_is_rejected() {
    let status = FieldRef::new("status", ValueType::Text);
    let predicate = Predicate::compare(status, CompareOp::Eq, Value::Text("Done".to_string()))
        .expect("text predicate");
    let record = filter_only(predicate);

    let err = EntityQuery::try_from_record(&record).expect_err("type drift");

    assert_eq!(err.class(), ErrorClass::TypeMismatch);
}
