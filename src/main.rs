use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use rusty_filters::data::loader::load_file;
use rusty_filters::data::writer::write_csv;
use rusty_filters::pipeline::Pipeline;

const USAGE: &str = "usage: rusty-filters <data file> [pipeline.json] [output.csv]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args.next().context(USAGE)?;
    let pipeline = match args.next() {
        Some(path) => Pipeline::load(Path::new(&path))?,
        None => Pipeline::default(),
    };

    let dataset = load_file(Path::new(&input))?;
    let filtered = pipeline
        .build(dataset.table.clone())
        .context("building filter pipeline")?;
    info!(
        "{} filter stages, output {} rows x {} columns",
        pipeline.filters.len(),
        filtered.row_count(),
        filtered.column_count()
    );

    match args.next() {
        Some(output) => {
            let file = File::create(&output).with_context(|| format!("creating {output}"))?;
            write_csv(filtered.as_ref(), &dataset.column_names, BufWriter::new(file))
        }
        None => write_csv(filtered.as_ref(), &dataset.column_names, io::stdout().lock()),
    }
}
