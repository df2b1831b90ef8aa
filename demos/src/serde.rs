use anyhow::Result;
use serde_json::Value;
use std::{fs::File, io::BufReader, path::PathBuf};

pub async fn bench_value(path: &PathBuf) -> Result<u64> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let reader = BufReader::new(file);

    let _: Value = serde_json::from_reader(reader)?;

    Ok(len)
}
