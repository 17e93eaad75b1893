//! Training Session Example
//!
//! Walks through a full logging session: declare a project and group, start
//! a trial, record arguments and metrics, then report and save.
//!
//! Run with: cargo run --example training_session

use anyhow::Result;
use trackdb::{AggregatorKind, TrackClient, TrialStatus};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut client = TrackClient::new("file:training_session.json")?;

    client.set_project("convnet", "simple convnet on a toy dataset")?;
    client.set_group("baseline", "no augmentation")?;

    let uid = client.new_trial()?;
    println!("started trial {uid}");

    client.log_arguments(
        [("lr", 0.001), ("batch_size", 32.0), ("epochs", 5.0)],
        true,
    )?;

    client.time("train", |client| {
        for epoch in 0..5u64 {
            #[allow(clippy::cast_precision_loss)]
            let loss = 2.3 / (epoch as f64 + 1.0);
            let accuracy = 1.0 - loss / 2.5;

            client.log_metrics(Some(epoch), [("loss", loss), ("accuracy", accuracy)])?;
            client.log_value("gpu_temp", 55.0 + epoch as f64, AggregatorKind::Ring(3))?;
        }
        Ok(())
    })?;

    client.finish(TrialStatus::Success)?;

    println!("{}", client.report()?);
    client.save()?;
    println!("saved to training_session.json");

    Ok(())
}
