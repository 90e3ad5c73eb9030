use anyhow::Result;
use stance_etl::presets::{attack_topics, event_topics, israel_palestine_communities};
use stance_etl::{init_tracing_once, StanceETL};
use std::path::PathBuf;

const DATA_ROOT: &str = "./data";
const OUT_ROOT: &str = "./data";
const RESULT_PATH: &str = "./data/topics.json";

fn main() -> Result<()> {
    init_tracing_once();
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(8);

    let mut topics = attack_topics()?;
    topics.extend(event_topics()?);

    let etl = StanceETL::new()
        .base_dir(PathBuf::from(DATA_ROOT))
        .out_dir(PathBuf::from(OUT_ROOT))
        .communities(israel_palestine_communities()?)
        .topics(topics)
        .parallelism(hw)
        .file_concurrency(2)
        .progress(true);

    let filtered = etl.clone().progress_label("Filtering files").filter_corpora()?;
    println!(
        "Filtered {} files: kept {} of {} records ({} files skipped)",
        filtered.files_written,
        filtered.records_kept,
        filtered.records_read,
        filtered.files_skipped.len()
    );

    let run = etl
        .progress_label("Counting topics")
        .aggregate_topics_to_json(&PathBuf::from(RESULT_PATH), true)?;

    for topic in &run.topics {
        println!("Topic: {}", topic.name);
        println!("Total References: {}", topic.total_references);
        println!("Supporting References per Date:");
        for (date, count) in &topic.support_references_per_date {
            println!("  {date}: {count}");
        }
        println!("Opposing References per Date:");
        for (date, count) in &topic.oppose_references_per_date {
            println!("  {date}: {count}");
        }
        println!("Neutral References per Date:");
        for (date, count) in &topic.neutral_references_per_date {
            println!("  {date}: {count}");
        }
    }
    for skip in &run.report.files_skipped {
        eprintln!("skipped {}: {}", skip.path.display(), skip.reason);
    }
    Ok(())
}
