#![allow(dead_code)]

use serde_json::{json, Value};
use stance_etl::{CommunitySets, Topic};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Write `records` as a single JSON array, the corpus file shape.
pub fn write_json_array(path: &Path, records: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    serde_json::to_writer(&mut f, records).unwrap();
    f.flush().unwrap();
}

pub fn read_json_array(path: &Path) -> Vec<Value> {
    let f = File::open(path).unwrap();
    serde_json::from_reader(BufReader::new(f)).unwrap()
}

/// Every file under `dir` (recursive), keyed by relative path, with contents.
pub fn snapshot_dir(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut out = BTreeMap::new();
    for ent in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let ent = ent.unwrap();
        if !ent.file_type().is_file() {
            continue;
        }
        let rel = ent.path().strip_prefix(dir).unwrap().to_path_buf();
        out.insert(rel, fs::read(ent.path()).unwrap());
    }
    out
}

/// Small community sets mirroring the curated lists, including the overlap
/// on "IsraelPalestine".
pub fn test_communities() -> CommunitySets {
    CommunitySets::new(
        ["Israel", "Judaism", "Jewish", "IsraelPalestine"],
        ["Palestine", "Gaza", "IsraelPalestine"],
    )
    .unwrap()
}

/// Two topics: "attacks" = ["attack"], "aid" = ["aid"].
pub fn test_topics() -> Vec<Topic> {
    vec![
        Topic::new("attacks", ["attack"]).unwrap(),
        Topic::new("aid", ["aid"]).unwrap(),
    ]
}

/// Build a tiny corpus:
/// - comments/RC_2024_01.json: 6 records
///     Israel (attack, ts 2024-01-02), Gaza (ATTACK, string timestamp 2024-01-03),
///     unrelated_sub (attack), IsraelPalestine (attack, no ts), Judaism (no keyword, no ts),
///     and one record without a subreddit (attack)
/// - comments/RC_2024_02.json: "palestine" in lowercase (attack, ts 2024-02-01)
/// - conversations/CV_2024_01.json: Israel (nested "attack"), cooking (nested "attack")
/// - submissions/RS_2024_01.json: Gaza ("Aid trucks"), Jewish (no keyword)
/// - submissions/notes.json: Israel (attack), no date in the file name
pub fn make_corpus_basic() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();

    write_json_array(&base.join("comments").join("RC_2024_01.json"), &[
        json!({"id":"c1","subreddit":"Israel","body":"a deadly attack occurred","created_utc":1704153600}),
        json!({"id":"c2","subreddit":"Gaza","body":"Another ATTACK on the camp","timestamp":"1704240000"}),
        json!({"id":"c3","subreddit":"unrelated_sub","body":"attack of the clones","created_utc":1704153600}),
        json!({"id":"c4","subreddit":"IsraelPalestine","body":"the attack was debated"}),
        json!({"id":"c5","subreddit":"Judaism","body":"shabbat recipes"}),
        json!({"id":"c6","body":"no subreddit attack"}),
    ]);
    write_json_array(&base.join("comments").join("RC_2024_02.json"), &[
        json!({"id":"c7","subreddit":"palestine","body":"airstrike and attack reported","created_utc":1706745600}),
    ]);
    write_json_array(&base.join("conversations").join("CV_2024_01.json"), &[
        json!({"subreddit":"Israel","messages":[{"text":"hello"},{"text":"rocket attack overnight"}]}),
        json!({"subreddit":"cooking","messages":[{"text":"attack the dough"}]}),
    ]);
    write_json_array(&base.join("submissions").join("RS_2024_01.json"), &[
        json!({"id":"s1","subreddit":"Gaza","title":"Aid trucks","selftext":"no violence today"}),
        json!({"id":"s2","subreddit":"Jewish","title":"Weekly thread","selftext":""}),
    ]);
    write_json_array(&base.join("submissions").join("notes.json"), &[
        json!({"id":"s3","subreddit":"Israel","title":"attack"}),
    ]);

    base
}

/// Add a truncated (unparseable) month to the comments corpus.
pub fn add_corrupt_month(base: &Path) {
    let p = base.join("comments").join("RC_2024_03.json");
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    let mut f = File::create(p).unwrap();
    write!(&mut f, "[{{\"subreddit\": \"Israel\", \"body\": \"attack").unwrap();
}
