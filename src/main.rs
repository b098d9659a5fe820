use clap::{Parser, Subcommand};
use srl_record::dataset::{ArgumentBuilder, ExtractArgs, IDataset};
use tracing_subscriber::EnvFilter;

/// Feature record builder for semantic role classification
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct SrlRecord {
    /// Task to run
    #[clap(subcommand)]
    command: Option<Command>,
}

/// All of subcommand
#[derive(Subcommand)]
enum Command {
    /// Extract argument feature records into ARFF relation files
    Extract(ExtractArgs),
    /// help for `srl-record'
    Help,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let srl_record = SrlRecord::parse();
    match &srl_record.command.unwrap_or_else(|| {
        println!("srl-record must with subcommand, use `srl-record help` get the usage");
        Command::Help
    }) {
        Command::Extract(args) => {
            tracing::debug!("extract args: {:?}", args);
            let mut builder = ArgumentBuilder::new(args);
            match builder.build() {
                Ok(summary) => {
                    for failure in &summary.failures {
                        eprintln!("{}", failure);
                    }
                    println!(
                        "({} argument records extracted, {} arguments skipped)",
                        summary.records,
                        summary.failures.len()
                    );
                    for path in &summary.report.written {
                        println!("\t'{}'", path.display());
                    }
                    if !summary.report.is_complete() {
                        std::process::exit(1);
                    }
                }
                Err(err) => {
                    eprintln!("error: {}", err);
                    std::process::exit(2);
                }
            }
        }
        Command::Help => (),
    }
    println!("finished record!");
}
