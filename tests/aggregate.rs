#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::{json, Value};
use stance_etl::{
    aggregate, AggregateInput, Aggregator, ConfigError, Corpus, DateBucketing, SkipReason, Stance,
    StanceETL, Topic, TopicSummary, TopicTally,
};
use std::collections::BTreeMap;

fn etl_for(base: &std::path::Path) -> StanceETL {
    StanceETL::new()
        .base_dir(base)
        .out_dir(base)
        .communities(test_communities())
        .topics(test_topics())
        .progress(false)
}

fn assert_totals_consistent(topics: &[TopicSummary]) {
    for t in topics {
        assert_eq!(t.bucket_total(), t.total_references, "totals drifted for {}", t.name);
    }
}

/// The three stance scenarios in one bucket: a supporting community, an
/// opposing community, and a community in neither set.
#[test]
fn stance_scenarios_in_memory() {
    let mut by_date = BTreeMap::<String, Vec<Value>>::new();
    by_date.insert("2024_01".into(), vec![
        json!({"subreddit": "Israel", "body": "a deadly attack occurred"}),
        json!({"subreddit": "Gaza", "body": "attack on the camp"}),
        json!({"subreddit": "unrelated_sub", "body": "attack"}),
        json!({"subreddit": "Israel", "body": "nothing relevant"}),
    ]);
    let topics = vec![Topic::new("attacks", ["attack"]).unwrap()];
    let out = aggregate(&topics, &by_date, &test_communities());

    assert_eq!(out.len(), 1);
    let t = &out[0];
    assert_eq!(t.name, "attacks");
    assert_eq!(t.support_references_per_date.get("2024_01"), Some(&1));
    assert_eq!(t.oppose_references_per_date.get("2024_01"), Some(&1));
    assert_eq!(t.neutral_references_per_date.get("2024_01"), Some(&1));
    assert_eq!(t.total_references, 3);
}

/// A community listed in both sets counts as supporting.
#[test]
fn overlap_resolves_to_supporting() {
    let sets = test_communities();
    assert_eq!(sets.overlapping(), vec!["israelpalestine".to_string()]);
    assert_eq!(sets.classify(Some("IsraelPalestine")), Stance::Supporting);
    assert_eq!(sets.classify(Some("gaza")), Stance::Opposing);
    assert_eq!(sets.classify(None), Stance::Neutral);
}

/// Conversation messages nested under a text-field key still count.
#[test]
fn nested_messages_under_text_fields_are_counted() {
    let mut by_date = BTreeMap::<String, Vec<Value>>::new();
    by_date.insert("2024_01".into(), vec![
        json!({"subreddit": "Israel", "body": {"text": "rocket attack"}}),
        json!({"subreddit": "Gaza", "text": [{"body": "hello"}, {"body": "another attack"}]}),
    ]);
    let topics = vec![Topic::new("attacks", ["attack"]).unwrap()];
    let out = aggregate(&topics, &by_date, &test_communities());

    assert_eq!(out[0].count(Stance::Supporting, "2024_01"), 1);
    assert_eq!(out[0].count(Stance::Opposing, "2024_01"), 1);
    assert_eq!(out[0].total_references, 2);
}

/// Records with neither a subreddit nor text are skipped; the rest still count.
#[test]
fn malformed_records_are_skipped() {
    let topics = test_topics();
    let sets = test_communities();
    let mut tally = TopicTally::new(&topics, &sets);
    tally.ingest("2024_01", &json!({"id": "x"}));
    tally.ingest("2024_01", &json!({"subreddit": "Israel", "body": "attack"}));
    assert_eq!(tally.malformed(), 1);
    let out = tally.finish();
    assert_eq!(out[0].total_references, 1);
    assert_eq!(out[1].total_references, 0);
}

/// Full pipeline over the filtered corpus, bucketed by file month.
/// `notes.json` has no date in its name, so it contributes nothing and is reported.
#[test]
fn filter_then_aggregate_by_file_month() {
    let base = make_corpus_basic();
    let etl = etl_for(&base);
    etl.filter_corpora().unwrap();
    let run = etl.aggregate_topics().unwrap();

    let names: Vec<&str> = run.topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["attacks", "aid"]);

    let attacks = run.topic("attacks").unwrap();
    assert_eq!(attacks.count(Stance::Supporting, "2024_01"), 3);
    assert_eq!(attacks.count(Stance::Opposing, "2024_01"), 1);
    assert_eq!(attacks.count(Stance::Opposing, "2024_02"), 1);
    assert!(attacks.neutral_references_per_date.is_empty());
    assert_eq!(attacks.total_references, 5);

    let aid = run.topic("aid").unwrap();
    assert_eq!(aid.count(Stance::Opposing, "2024_01"), 1);
    assert_eq!(aid.total_references, 1);

    assert_totals_consistent(&run.topics);
    assert_eq!(run.report.files_read, 4);
    assert_eq!(run.report.records_matched, 6);
    assert_eq!(run.report.files_skipped.len(), 1);
    assert!(run.report.files_skipped[0].path.ends_with("notes.json"));
    assert_eq!(run.report.files_skipped[0].reason, SkipReason::NoDateInName);
}

/// Reading the raw corpus surfaces neutral mentions, including a record with
/// text but no subreddit.
#[test]
fn raw_input_counts_neutral_mentions() {
    let base = make_corpus_basic();
    let run = etl_for(&base).aggregate_input(AggregateInput::Raw).aggregate_topics().unwrap();

    let attacks = run.topic("attacks").unwrap();
    assert_eq!(attacks.count(Stance::Neutral, "2024_01"), 3);
    assert_eq!(attacks.total_references, 8);
    assert_eq!(run.report.records_matched, 9);
    assert_totals_consistent(&run.topics);
}

/// Day bucketing uses each record's own timestamp (number or numeric string);
/// records without one are counted as undated.
#[test]
fn aggregate_by_record_day() {
    let base = make_corpus_basic();
    let etl = etl_for(&base).corpora(&[Corpus::Comments]);
    etl.filter_corpora().unwrap();
    let run = etl.bucketing(DateBucketing::RecordDay).aggregate_topics().unwrap();

    let attacks = run.topic("attacks").unwrap();
    assert_eq!(attacks.count(Stance::Supporting, "2024-01-02"), 1);
    assert_eq!(attacks.count(Stance::Opposing, "2024-01-03"), 1);
    assert_eq!(attacks.count(Stance::Opposing, "2024-02-01"), 1);
    assert_eq!(attacks.total_references, 3);
    assert_eq!(run.report.records_undated, 2);
    assert_totals_consistent(&run.topics);
}

/// Parallel file processing merges to the same result as sequential.
#[test]
fn concurrent_files_merge_to_sequential_result() {
    let base = make_corpus_basic();
    let seq = etl_for(&base).aggregate_input(AggregateInput::Raw).aggregate_topics().unwrap();
    let par = etl_for(&base)
        .aggregate_input(AggregateInput::Raw)
        .file_concurrency(3)
        .aggregate_topics()
        .unwrap();
    assert_eq!(seq.topics, par.topics);
    assert_eq!(seq.report.records_matched, par.report.records_matched);
}

/// A corrupt month is skipped; the other months' counts are unaffected.
#[test]
fn corrupt_month_does_not_contribute() {
    let base = make_corpus_basic();
    let clean = etl_for(&base).aggregate_input(AggregateInput::Raw).aggregate_topics().unwrap();
    add_corrupt_month(&base);
    let run = etl_for(&base).aggregate_input(AggregateInput::Raw).aggregate_topics().unwrap();

    assert_eq!(clean.topics, run.topics);
    assert!(run
        .report
        .files_skipped
        .iter()
        .any(|s| s.path.ends_with("RC_2024_03.json") && matches!(s.reason, SkipReason::Malformed(_))));
}

/// Partial tallies merge by summation.
#[test]
fn tallies_merge_by_summation() {
    let topics = test_topics();
    let sets = test_communities();
    let mut a = TopicTally::new(&topics, &sets);
    let mut b = TopicTally::new(&topics, &sets);
    a.ingest("2024_01", &json!({"subreddit": "Israel", "body": "attack"}));
    b.ingest("2024_01", &json!({"subreddit": "Israel", "body": "attack and aid"}));
    b.ingest("2024_02", &json!({"subreddit": "Gaza", "body": "attack"}));
    a.merge(b);

    let out = a.finish();
    assert_eq!(out[0].count(Stance::Supporting, "2024_01"), 2);
    assert_eq!(out[0].count(Stance::Opposing, "2024_02"), 1);
    assert_eq!(out[0].total_references, 3);
    assert_eq!(out[1].total_references, 1);
}

/// The JSON output uses the documented field names.
#[test]
fn summaries_written_as_json() {
    let base = make_corpus_basic();
    let etl = etl_for(&base);
    etl.filter_corpora().unwrap();
    let out = base.join("results").join("topics.json");
    let run = etl.aggregate_topics_to_json(&out, true).unwrap();

    let written = read_json_array(&out);
    assert_eq!(written.len(), run.topics.len());
    let first = &written[0];
    assert_eq!(first["name"], "attacks");
    assert_eq!(first["total_references"], 5);
    assert_eq!(first["support_references_per_date"]["2024_01"], 3);
    assert_eq!(first["oppose_references_per_date"]["2024_02"], 1);
    assert!(first["neutral_references_per_date"].as_object().unwrap().is_empty());

    let back: Vec<TopicSummary> = serde_json::from_value(Value::Array(written)).unwrap();
    assert_eq!(back, run.topics);
}

/// Writing over an existing results file replaces it whole and leaves no temp file.
#[test]
fn summaries_replace_previous_results() {
    let base = make_corpus_basic();
    let etl = etl_for(&base);
    etl.filter_corpora().unwrap();
    let results = base.join("results");
    std::fs::create_dir_all(&results).unwrap();
    let out = results.join("topics.json");
    std::fs::write(&out, b"[{\"truncated\": ").unwrap();

    let run = etl.aggregate_topics_to_json(&out, false).unwrap();
    let written = read_json_array(&out);
    assert_eq!(written.len(), run.topics.len());

    let names: Vec<String> = std::fs::read_dir(&results)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["topics.json".to_string()]);
}

/// An upper-case extension is dated like a lower-case one.
#[test]
fn upper_case_extension_is_dated() {
    let base = tempfile::tempdir().unwrap();
    write_json_array(&base.path().join("comments").join("RC_2024_05.JSON"), &[
        json!({"subreddit": "Israel", "body": "attack"}),
    ]);
    let run = etl_for(base.path())
        .corpora(&[Corpus::Comments])
        .aggregate_input(AggregateInput::Raw)
        .aggregate_topics()
        .unwrap();
    assert!(run.report.files_skipped.is_empty());
    assert_eq!(run.topic("attacks").unwrap().count(Stance::Supporting, "2024_05"), 1);
}

#[test]
fn topic_configuration_is_validated() {
    let base = make_corpus_basic();
    let dup = vec![
        Topic::new("attacks", ["attack"]).unwrap(),
        Topic::new("attacks", ["strike"]).unwrap(),
    ];
    let err = etl_for(&base).topics(dup).aggregate_topics().unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::DuplicateTopic { topic: "attacks".into() })
    );

    let err = etl_for(&base).topics(vec![]).aggregate_topics().unwrap_err();
    assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::NoTopics));
}
