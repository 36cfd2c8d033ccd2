use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const ROWS: usize = 1000;
const SPIKE_PROBABILITY: f64 = 0.02;

/// One generated sample.
struct Sample {
    index: i64,
    time: f64,
    signal: f64,
    label: &'static str,
}

/// Slow sine with two harmonics, gaussian noise and sparse spikes: something
/// for the convolution to smooth and the median to de-spike.
fn generate(rng: &mut StdRng) -> Result<Vec<Sample>> {
    let noise = Normal::new(0.0, 0.15).context("noise distribution")?;
    let samples = (0..ROWS)
        .map(|i| {
            let time = i as f64 * 0.01;
            let clean = (time * 2.0).sin() + 0.3 * (time * 7.0).sin();
            let spike = rng.gen_bool(SPIKE_PROBABILITY);
            let signal = clean + noise.sample(&mut *rng) + if spike { rng.gen_range(3.0..6.0) } else { 0.0 };
            Sample {
                index: i as i64,
                time,
                signal,
                label: if spike { "spike" } else { "ok" },
            }
        })
        .collect();
    Ok(samples)
}

fn write_csv(path: &PathBuf, samples: &[Sample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["index", "time", "signal", "label"])?;
    for s in samples {
        writer.write_record([
            s.index.to_string(),
            s.time.to_string(),
            s.signal.to_string(),
            s.label.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &PathBuf, samples: &[Sample]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("index", DataType::Int64, false),
        Field::new("time", DataType::Float64, false),
        Field::new("signal", DataType::Float64, false),
        Field::new("label", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(samples.iter().map(|s| s.index))),
            Arc::new(Float64Array::from_iter_values(samples.iter().map(|s| s.time))),
            Arc::new(Float64Array::from_iter_values(samples.iter().map(|s| s.signal))),
            Arc::new(StringArray::from_iter_values(samples.iter().map(|s| s.label))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut rng = StdRng::seed_from_u64(42);
    let samples = generate(&mut rng)?;

    let csv_path = out_dir.join("sample.csv");
    write_csv(&csv_path, &samples)?;
    info!("wrote {} rows to {}", samples.len(), csv_path.display());

    let parquet_path = out_dir.join("sample.parquet");
    write_parquet(&parquet_path, &samples)?;
    info!("wrote {} rows to {}", samples.len(), parquet_path.display());

    Ok(())
}
