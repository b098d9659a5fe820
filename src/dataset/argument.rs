use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use clap::Args;
use indicatif::ProgressBar;
use tracing::{error, info};
use crate::corpus::{read_instances, AnnotatedInstance};
use crate::dataset::arff::{partition_bounds, AttributeDomain, Dataset, Remainder, WriteReport};
use crate::dataset::ipc;
use crate::dataset::traits::IDataset;
use crate::error::{Error, Result};
use crate::feature::{FeatureExtractor, Record};

/// argument record args structure
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// JSON-lines file of annotated predicate instances
    #[clap(long, short, visible_alias = "input")]
    pub path: String,
    /// output directory of the relation files, defaults to the directory of the input
    #[clap(long, short, visible_alias = "output")]
    pub output_path: Option<String>,
    /// relation name, also used as file name stem
    #[clap(long, default_value = "SemanticArgumentClassification")]
    pub relation: String,
    /// comma separated features to extract for every argument
    #[clap(long, default_value = "predicate,path,phraseType,position,voice,class")]
    pub features: String,
    /// comma separated names of the partition files
    #[clap(long, default_value = "train,dev,test")]
    pub splits: String,
    /// comma separated share of records for each partition
    #[clap(long, default_value = "0.6,0.2,0.2")]
    pub ratios: String,
    /// share of the instance corpus to process, taken from the front
    #[clap(long, default_value = "1.0")]
    pub instance_ratio: f64,
    /// also write every relation file as arrow ipc records
    #[clap(long)]
    pub with_ipc: bool,
    /// dump the nominal value domains to domains.txt
    #[clap(long)]
    pub save_domains: bool,
    /// reject ratios that leave records out of every partition
    #[clap(long)]
    pub strict_ratios: bool,
    /// extract instances on all cores
    #[clap(long)]
    pub parallel: bool,
}

impl ExtractArgs {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            output_path: None,
            relation: "SemanticArgumentClassification".to_string(),
            features: "predicate,path,phraseType,position,voice,class".to_string(),
            splits: "train,dev,test".to_string(),
            ratios: "0.6,0.2,0.2".to_string(),
            instance_ratio: 1.0,
            with_ipc: false,
            save_domains: false,
            strict_ratios: false,
            parallel: false,
        }
    }
}

fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

pub struct ArgumentBuilder<'a> {
    args: &'a ExtractArgs,
    output_path: PathBuf,
    extractor: FeatureExtractor,
    splits: Vec<String>,
    ratios: Vec<f64>,
}

impl<'a> ArgumentBuilder<'a> {
    pub fn new(args: &'a ExtractArgs) -> Self {
        let output_path = match &args.output_path {
            Some(output_path) => PathBuf::from(output_path),
            None => Path::new(&args.path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        Self {
            args,
            output_path,
            extractor: FeatureExtractor::default(),
            splits: Vec::new(),
            ratios: Vec::new(),
        }
    }

    fn remainder(&self) -> Remainder {
        if self.args.strict_ratios {
            Remainder::Reject
        } else {
            Remainder::Drop
        }
    }

    fn relation_file(&self, part: &str, extension: &str) -> PathBuf {
        self.output_path
            .join(format!("{}_data_{}.{}", self.args.relation, part, extension))
    }

    pub fn full_file(&self) -> PathBuf {
        self.relation_file("full", "arff")
    }

    pub fn partition_files(&self) -> Vec<PathBuf> {
        self.splits
            .iter()
            .map(|split| self.relation_file(split, "arff"))
            .collect()
    }

    fn save_domains(&self, dataset: &Dataset) -> Result<()> {
        let path = self.output_path.join("domains.txt");
        let file = File::create(&path).map_err(|err| Error::io(&path, err))?;
        let mut writer = BufWriter::new(file);
        for (name, domain) in dataset.attributes() {
            if let AttributeDomain::Nominal(values) = domain {
                for (idx, value) in values.iter().enumerate() {
                    writeln!(&mut writer, "{}\t{}\t{}", name, idx, value)
                        .map_err(|err| Error::io(&path, err))?;
                }
            }
        }
        writer.flush().map_err(|err| Error::io(&path, err))
    }

    fn save_ipc(&self, dataset: &Dataset, report: &mut WriteReport) -> Result<()> {
        let mut targets = vec![(self.relation_file("full", "records.ipc"), 0, dataset.len())];
        let bounds = partition_bounds(&self.ratios, dataset.len(), self.remainder())?;
        for (split, (low, high)) in self.splits.iter().zip(bounds) {
            targets.push((self.relation_file(split, "records.ipc"), low, high));
        }
        for (path, low, high) in targets {
            match ipc::write_records(dataset, low, high, &path) {
                Ok(()) => report.written.push(path),
                Err(err) => {
                    error!("could not write records: {}", err);
                    report.failed.push(err);
                }
            }
        }
        Ok(())
    }
}

impl<'a> IDataset<AnnotatedInstance, Record> for ArgumentBuilder<'a> {
    fn init(&mut self) -> Result<()> {
        self.extractor = FeatureExtractor::from_names(&split_list(&self.args.features))?;
        if self.extractor.features().is_empty() {
            return Err(Error::configuration("no features requested"));
        }
        self.splits = split_list(&self.args.splits)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.ratios = split_list(&self.args.ratios)
            .into_iter()
            .map(|ratio| {
                ratio
                    .parse::<f64>()
                    .map_err(|_| Error::configuration(format!("invalid ratio `{}`", ratio)))
            })
            .collect::<Result<Vec<f64>>>()?;
        if self.splits.len() != self.ratios.len() {
            return Err(Error::configuration(format!(
                "number of files ({}) and ratios ({}) are not equal",
                self.splits.len(),
                self.ratios.len()
            )));
        }
        partition_bounds(&self.ratios, 0, self.remainder())?;
        if !(0.0..=1.0).contains(&self.args.instance_ratio) {
            return Err(Error::configuration(format!(
                "instance ratio {} is not within [0, 1]",
                self.args.instance_ratio
            )));
        }
        if !self.output_path.as_os_str().is_empty() && !self.output_path.is_dir() {
            return Err(Error::configuration(format!(
                "output path {} is not a directory",
                self.output_path.display()
            )));
        }
        Ok(())
    }

    fn read_dataset(&self) -> Result<(Vec<AnnotatedInstance>, Vec<Error>)> {
        let corpus = read_instances(Path::new(&self.args.path))?;
        let mut instances = corpus.instances;
        let keep = (instances.len() as f64 * self.args.instance_ratio).floor() as usize;
        instances.truncate(keep);
        Ok((instances, corpus.failures))
    }

    fn build_dataset(&self, samples: Vec<AnnotatedInstance>) -> (Vec<Record>, Vec<Error>) {
        let pb = ProgressBar::new(samples.len() as u64);
        let extraction = self.extractor.extract_batch(&samples, self.args.parallel, &pb);
        (extraction.records, extraction.failures)
    }

    fn save_dataset(&self, records: Vec<Record>) -> Result<WriteReport> {
        let mut dataset = Dataset::new(&self.args.relation);
        for feature in self.extractor.features() {
            dataset.declare(feature.name(), AttributeDomain::nominal())?;
        }
        for record in records {
            dataset.add_record(record);
        }

        let files = self.partition_files();
        let mut report = dataset.write_partitioned_with(&files, &self.ratios, self.remainder())?;
        let full = self.full_file();
        match dataset.write_to_file(&full) {
            Ok(()) => report.written.insert(0, full),
            Err(err) => {
                error!("could not write full dataset: {}", err);
                report.failed.push(err);
            }
        }
        if self.args.with_ipc {
            self.save_ipc(&dataset, &mut report)?;
        }
        if self.args.save_domains {
            if let Err(err) = self.save_domains(&dataset) {
                error!("could not write domains: {}", err);
                report.failed.push(err);
            }
        }
        info!(
            written = report.written.len(),
            failed = report.failed.len(),
            "saved relation files"
        );
        Ok(report)
    }

    fn get_output_path(&self) -> &Path {
        &self.output_path
    }
}
