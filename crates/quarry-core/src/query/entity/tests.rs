use super::*;
use crate::{
    config::{OrderConflict, QueryConfig, RangeCheck},
    error::ErrorClass,
    query::{
        OrderDirection,
        builder::BuilderError,
        predicate::{CompareOp, Predicate},
        subject::PredicateGroup,
    },
    test_fixtures::{ProjectName, ProjectState, ProjectStateColumns, Status, project_query},
    traits::ColumnValue,
    value::{Value, ValueType},
};

fn sample() -> EntityQuery<u64, ProjectState> {
    project_query()
        .id()
        .is_in([1, 2, 3])
        .status()
        .is_not(Status::Cancelled)
        .project_name()
        .is_not(ProjectName::default())
        .either(|e| {
            e.or(|b| b.days_since_started().is_greater_than(30))
                .or(|b| b.archived().is(true))
        })
        .order_by(ProjectState::DAYS_SINCE_STARTED, OrderDirection::Desc)
        .order_by(ProjectState::TITLE, OrderDirection::Asc)
        .with_mask([ProjectState::TITLE.column(), ProjectState::STATUS.column()])
        .limit(25)
        .build()
        .expect("sample query")
}

#[test]
fn record_projection_swaps_columns_for_field_refs() {
    let query = sample();
    let record = query.to_record_query();

    assert_eq!(record.entity_name(), "ProjectState");
    assert_eq!(record.ids(), query.ids());
    assert_eq!(record.limit(), query.limit());
    assert_eq!(
        record.subject(),
        &query.subject().clone().map_columns(FieldRef::from)
    );
    assert_eq!(
        record.ordering().fields()[0],
        (
            FieldRef::new("days_since_started", ValueType::Uint),
            OrderDirection::Desc
        )
    );
    assert!(record.mask().contains(&FieldRef::new("title", ValueType::Text)));
}

#[test]
fn projected_subject_keeps_default_message_predicate() {
    let query = project_query()
        .project_name()
        .is_not(ProjectName::default())
        .build()
        .expect("query");
    let record = query.to_record_query();

    let expected = Predicate::compare(
        FieldRef::from(ProjectState::PROJECT_NAME.column()),
        CompareOp::Ne,
        ProjectName::default().to_value(),
    )
    .expect("ne");

    assert_eq!(record.subject().conjunction().len(), 1);
    assert!(record.subject().conjunction().contains(&expected));
}

#[test]
fn copy_to_fresh_builder_round_trips() {
    let query = sample();
    let copied = query
        .copy_to(ProjectState::new_query())
        .build()
        .expect("copy");

    assert_eq!(copied, query);
    assert_eq!(copied.to_record_query(), query.to_record_query());
}

#[test]
fn copy_to_keeps_target_config() {
    let query = project_query()
        .order_by(ProjectState::TITLE, OrderDirection::Asc)
        .build()
        .expect("query");

    let err = query
        .copy_to(
            project_query().with_config(
                QueryConfig::new().with_order_conflict(OrderConflict::Reject),
            ),
        )
        .order_by(ProjectState::TITLE, OrderDirection::Desc)
        .build()
        .expect_err("reject applies after copy");

    assert_eq!(err.class(), ErrorClass::Unsupported);
}

#[test]
fn copy_to_builds_on_existing_state() {
    let base = project_query()
        .status()
        .is(Status::Started)
        .build()
        .expect("base");

    let derived = base
        .copy_to(project_query())
        .days_since_started()
        .is_greater_than(7)
        .build()
        .expect("derived");

    assert_eq!(derived.subject().conjunction().len(), 2);
    assert_ne!(derived, base);
}

#[test]
fn copy_to_preserves_deferred_empty_ranges() {
    let deferred = QueryConfig::new().with_range_check(RangeCheck::Deferred);
    let query = project_query()
        .with_config(deferred)
        .days_since_started()
        .is_greater_than(10)
        .days_since_started()
        .is_less_than(5)
        .build()
        .expect("deferred");

    let copied = query
        .copy_to(project_query().with_config(deferred))
        .build()
        .expect("copy");
    assert_eq!(copied, query);

    // a strict target does not re-check ranges it is only replaying
    let strict = query.copy_to(project_query()).build().expect("strict copy");
    assert_eq!(strict, query);
    assert_eq!(strict.range_check(), RangeCheck::Deferred);
    assert_eq!(strict.to_record_query(), query.to_record_query());
}

#[test]
fn strict_copy_keeps_checking_ranges_of_new_criteria() {
    let query = project_query()
        .days_since_started()
        .is_greater_than(10)
        .build()
        .expect("strict");
    assert_eq!(query.range_check(), RangeCheck::AtBuild);

    let err = query
        .copy_to(project_query())
        .days_since_started()
        .is_less_than(5)
        .build()
        .expect_err("empty range");
    assert_eq!(err.class(), ErrorClass::Contradiction);
}

#[test]
fn deferred_copy_replays_empty_range_alternatives() {
    let deferred = QueryConfig::new().with_range_check(RangeCheck::Deferred);
    let query = project_query()
        .with_config(deferred)
        .either(|e| {
            e.or(|b| {
                b.days_since_started()
                    .is_greater_than(10)
                    .days_since_started()
                    .is_less_than(5)
            })
            .or(|b| b.archived().is(true))
        })
        .build()
        .expect("deferred either");
    assert_eq!(query.subject().alternatives().len(), 2);

    let copied = query.copy_to(project_query()).build().expect("copy");

    assert_eq!(copied, query);
}

#[test]
fn rebound_record_queries_replay_without_range_check() {
    let deferred = QueryConfig::new().with_range_check(RangeCheck::Deferred);
    let query = project_query()
        .with_config(deferred)
        .days_since_started()
        .is_greater_than(10)
        .days_since_started()
        .is_less_than(5)
        .build()
        .expect("deferred");

    let back = EntityQuery::try_from_record(&query.to_record_query()).expect("rebind");
    assert_eq!(back.range_check(), RangeCheck::Deferred);
    assert_eq!(back.copy_to(project_query()).build(), Ok(query));
}

#[test]
fn record_query_converts_back_losslessly() {
    let query = sample();
    let back = EntityQuery::try_from(&query.to_record_query()).expect("reverse");

    assert_eq!(back, query);
}

#[test]
fn reverse_projection_rejects_unknown_fields() {
    let stray = Predicate::compare(
        FieldRef::new("owner", ValueType::Text),
        CompareOp::Eq,
        Value::Text("ice".to_string()),
    )
    .expect("well-formed");
    let record = RecordQuery::<u64, ProjectState>::new(
        IdFilter::all(),
        Subject::new(PredicateGroup::new([stray]), []),
        Mask::default(),
        OrderSpec::default(),
        None,
    );

    let err = EntityQuery::try_from_record(&record).expect_err("unknown");
    assert_eq!(
        err,
        QueryError::Predicate(PredicateError::UnknownColumn {
            entity: "ProjectState",
            column: "owner".to_string(),
        })
    );
}

#[test]
fn reverse_projection_rejects_type_drift() {
    let record = RecordQuery::<u64, ProjectState>::new(
        IdFilter::all(),
        Subject::default(),
        Mask::new([FieldRef::new("title", ValueType::Bytes)]),
        OrderSpec::default(),
        None,
    );

    let err = EntityQuery::try_from_record(&record).expect_err("type drift");
    assert_eq!(err.class(), ErrorClass::TypeMismatch);
}

#[test]
fn reverse_projection_rejects_unorderable_sort_keys() {
    let status = FieldRef::from(ProjectState::STATUS.column());
    let record = RecordQuery::<u64, ProjectState>::new(
        IdFilter::all(),
        Subject::default(),
        Mask::default(),
        OrderSpec::from_fields([(status, OrderDirection::Asc)]),
        None,
    );

    let err = EntityQuery::try_from_record(&record).expect_err("unorderable");
    assert_eq!(
        err,
        QueryError::Builder(BuilderError::UnorderableColumn {
            column: "status".to_string()
        })
    );
    assert_eq!(err.class(), ErrorClass::Unsupported);
}

#[test]
fn equality_ignores_criterion_order() {
    let a = project_query()
        .status()
        .is(Status::Started)
        .archived()
        .is(false)
        .build()
        .expect("a");
    let b = project_query()
        .archived()
        .is(false)
        .status()
        .is(Status::Started)
        .build()
        .expect("b");

    assert_eq!(a, b);
}

#[test]
fn conversions_record_events() {
    crate::obs::metrics_reset_all();

    let query = sample();
    let _ = query.to_record_query();
    let _ = query.copy_to(project_query());

    let report = crate::obs::metrics_report();
    assert_eq!(report.ops.record_projections, 1);
    assert_eq!(report.ops.copies, 1);
    assert_eq!(report.entities["ProjectState"].copies, 1);
}
