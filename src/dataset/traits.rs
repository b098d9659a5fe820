use std::path::Path;
use tracing::info;
use crate::dataset::arff::WriteReport;
use crate::error::{Error, Result};

/// What a finished build hands back to its caller.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub records: usize,
    pub failures: Vec<Error>,
    pub report: WriteReport,
}

pub trait IDataset<S, R> {
    /// Validate the configuration; nothing may be written when this fails.
    fn init(&mut self) -> Result<()>;
    /// Decoded samples, plus the ones that could not be decoded.
    fn read_dataset(&self) -> Result<(Vec<S>, Vec<Error>)>;
    /// Records in sample order, plus the samples that had to be skipped.
    fn build_dataset(&self, samples: Vec<S>) -> (Vec<R>, Vec<Error>);
    fn save_dataset(&self, records: Vec<R>) -> Result<WriteReport>;
    fn get_output_path(&self) -> &Path;

    fn build(&mut self) -> Result<BuildSummary> {
        self.init()?;
        let (samples, mut failures) = self.read_dataset()?;
        info!("Processing {} samples...", samples.len());
        let (records, skipped) = self.build_dataset(samples);
        failures.extend(skipped);
        let count = records.len();
        info!("Saving {} records to {}", count, self.get_output_path().display());
        let report = self.save_dataset(records)?;
        Ok(BuildSummary {
            records: count,
            failures,
            report,
        })
    }
}
