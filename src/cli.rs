//! Command-line interface
//!
//! `train` runs the offline pipeline, `serve` starts the HTTP server, and
//! `predict` is the interactive single-prediction prompt.

use clap::{Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::artifact::PricePipeline;
use crate::pipeline::{train_and_package, TrainOptions};
use crate::schema;
use crate::server::{run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
    let _ = std::io::stdout().flush();
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn kv(key: &str, val: &str) {
    println!("  {} {}", dim(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "domus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Housing price regression: training pipeline and prediction service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the model and write the pipeline artifact
    Train {
        /// Input CSV with the 13 feature columns and MEDV target
        #[arg(short, long)]
        data: PathBuf,

        /// Output artifact path
        #[arg(short, long, default_value = "pipeline.json")]
        output: PathBuf,

        /// Stratification key column
        #[arg(long, default_value = "CHAS")]
        stratify: String,

        /// Test set fraction
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Grid-search cross-validation folds
        #[arg(long, default_value = "5")]
        cv_folds: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Serve predictions over HTTP
    Serve {
        /// Pipeline artifact path
        #[arg(short, long, default_value = "pipeline.json")]
        artifact: PathBuf,

        /// Server host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "5000")]
        port: u16,
    },

    /// Interactively predict a single house price
    Predict {
        /// Pipeline artifact path
        #[arg(short, long, default_value = "pipeline.json")]
        artifact: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data: &PathBuf,
    output: &PathBuf,
    stratify: &str,
    test_fraction: f64,
    cv_folds: usize,
    seed: u64,
) -> anyhow::Result<()> {
    section("Train");

    let mut opts = TrainOptions::new(data.clone(), output.clone());
    opts.stratify_column = stratify.to_string();
    opts.test_fraction = test_fraction;
    opts.cv_folds = cv_folds;
    opts.seed = seed;

    step_run("Running training pipeline");
    let start = Instant::now();
    let report = train_and_package(&opts)?;
    step_done(&format!("{:?}", start.elapsed()));

    section("Report");
    kv("rows", &format!(
        "{} ({} train / {} test)",
        report.n_rows, report.n_train, report.n_test
    ));
    kv("best params", &report.best_params.to_string());
    kv("cv score (neg MSE)", &format!("{:.4}", report.best_cv_score));
    kv("test RMSE", &format!("{:.4}", report.test_rmse));
    kv("train RMSE", &format!("{:.4}", report.train_rmse));
    kv("cv RMSE", &format!(
        "{:.2} (±{:.2})",
        report.cv_rmse.mean, report.cv_rmse.std
    ));

    section("Feature importance");
    for (name, importance) in &report.feature_importances {
        println!("  {:<10} {:.4}", name, importance);
    }

    println!();
    println!("  {} artifact written to {}", ok("✓"), output.display());
    Ok(())
}

pub async fn cmd_serve(artifact: &PathBuf, host: &str, port: u16) -> anyhow::Result<()> {
    let config = ServerConfig::new(host, port, artifact.clone());
    run_server(config).await
}

fn read_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = std::io::stdout().flush();
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
    input.trim().to_string()
}

/// Prompt for one feature value; re-ask on parse errors, confirm values
/// outside the advisory range.
fn prompt_feature(spec: &schema::FeatureSpec) -> f64 {
    loop {
        println!();
        println!("  {}: {}", spec.name.white().bold(), spec.description);
        println!("  {}", dim(&format!("valid range: {} to {}", spec.min, spec.max)));

        let input = read_line(&format!("  enter value for {}: ", spec.name));
        let value: f64 = match input.parse() {
            Ok(v) => v,
            Err(_) => {
                println!("  {}", "please enter a valid number".red());
                continue;
            }
        };

        if value < spec.min || value > spec.max {
            let confirm = read_line("  value outside typical range, are you sure? (y/n): ");
            if confirm.to_lowercase() != "y" {
                continue;
            }
        }

        return value;
    }
}

pub fn cmd_predict(artifact: &PathBuf) -> anyhow::Result<()> {
    section("Housing price prediction");
    let pipeline = PricePipeline::load(artifact)?;
    println!("  {} artifact loaded ({})", ok("✓"), dim(pipeline.created_at()));

    loop {
        println!();
        println!("  please enter the details of the house:");

        let row: Vec<f64> = schema::FEATURES.iter().map(prompt_feature).collect();

        section("House details");
        for (spec, value) in schema::FEATURES.iter().zip(&row) {
            kv(spec.name, &value.to_string());
        }

        match pipeline.predict(&row) {
            Ok(price) => {
                println!();
                println!(
                    "  predicted house price: {}",
                    format!("${price:.3}k").green().bold()
                );
            }
            Err(e) => println!("  {} {}", "error making prediction:".red(), e),
        }

        loop {
            let again = read_line("\n  predict another house price? (y/n): ");
            match again.to_lowercase().as_str() {
                "y" => break,
                "n" => {
                    println!("  {}", dim("thank you for using the housing price predictor"));
                    return Ok(());
                }
                _ => println!("  please enter 'y' or 'n'"),
            }
        }
    }
}
