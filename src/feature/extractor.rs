use std::fmt;
use std::str::FromStr;
use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{info, warn};
use crate::corpus::{AnnotatedInstance, Argument};
use crate::error::{Error, Result};
use crate::feature::label::normalize;
use crate::feature::path::tree_path;

/// Features that can be requested for an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Predicate,
    Path,
    PhraseType,
    Position,
    Voice,
    Class,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Predicate,
        Feature::Path,
        Feature::PhraseType,
        Feature::Position,
        Feature::Voice,
        Feature::Class,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Predicate => "predicate",
            Feature::Path => "path",
            Feature::PhraseType => "phraseType",
            Feature::Position => "position",
            Feature::Voice => "voice",
            Feature::Class => "class",
        }
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .iter()
            .find(|feature| feature.name() == s)
            .copied()
            .ok_or_else(|| Error::configuration(format!("unsupported feature `{}`", s)))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature values of one argument, in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: Vec<(String, String)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::default();
        for (key, value) in iter {
            let key = key.into();
            let value = value.into();
            match record.values.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => record.values.push((key, value)),
            }
        }
        record
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{} : {}", name, value)?;
        }
        Ok(())
    }
}

/// Records of a batch together with the arguments that had to be skipped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub failures: Vec<Error>,
}

/// Builds one [`Record`] per argument of an annotated instance.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    features: Vec<Feature>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Feature::ALL.to_vec())
    }
}

impl FeatureExtractor {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let features = names
            .iter()
            .map(|name| name.as_ref().trim().parse())
            .collect::<Result<Vec<Feature>>>()?;
        Ok(Self::new(features))
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// One result per argument; a failing argument does not affect the others.
    pub fn extract(&self, instance: &AnnotatedInstance) -> Vec<Result<Record>> {
        instance
            .arguments
            .iter()
            .map(|argument| {
                self.extract_argument(instance, argument)
                    .map_err(|err| Error::extraction(&instance.id, err))
            })
            .collect()
    }

    fn extract_argument(&self, instance: &AnnotatedInstance, argument: &Argument) -> Result<Record> {
        let tree = &instance.tree;
        let mut values = Vec::with_capacity(self.features.len());
        for feature in &self.features {
            let value = match feature {
                Feature::Predicate => predicate_lemma(&instance.roleset).to_string(),
                Feature::Path => {
                    let arg_node = argument.pointer.resolve_node(tree)?;
                    let pred_node = instance.predicate.resolve_node(tree)?;
                    tree_path(tree, arg_node, pred_node)?
                }
                Feature::PhraseType => {
                    let arg_node = argument.pointer.resolve_node(tree)?;
                    normalize(tree.node(arg_node)?.label()).to_string()
                }
                Feature::Position => {
                    let arg_word = argument.pointer.resolve_word_index()?;
                    let pred_word = instance.predicate.resolve_word_index()?;
                    position(arg_word, pred_word).to_string()
                }
                Feature::Voice => instance.voice.as_str().to_string(),
                Feature::Class => role_class(&argument.role).to_string(),
            };
            values.push((feature.name(), value));
        }
        Ok(values.into_iter().collect())
    }

    /// Extract every instance, keeping records in instance order. Failures are
    /// logged and collected, never fatal.
    pub fn extract_batch(
        &self,
        instances: &[AnnotatedInstance],
        parallel: bool,
        pb: &ProgressBar,
    ) -> Extraction {
        let per_instance: Vec<Vec<Result<Record>>> = if parallel {
            instances
                .par_iter()
                .map(|instance| {
                    pb.inc(1);
                    self.extract(instance)
                })
                .collect()
        } else {
            instances
                .iter()
                .map(|instance| {
                    pb.inc(1);
                    self.extract(instance)
                })
                .collect()
        };
        pb.finish_with_message("done");

        let mut extraction = Extraction::default();
        for result in per_instance.into_iter().flatten() {
            match result {
                Ok(record) => extraction.records.push(record),
                Err(err) => {
                    warn!("skipping argument: {}", err);
                    extraction.failures.push(err);
                }
            }
        }
        info!(
            records = extraction.records.len(),
            failures = extraction.failures.len(),
            instances = instances.len(),
            "extracted argument records"
        );
        extraction
    }
}

/// `rise.01` -> `rise`.
pub fn predicate_lemma(roleset: &str) -> &str {
    roleset
        .rsplit_once('.')
        .map(|(lemma, _)| lemma)
        .unwrap_or(roleset)
}

/// `ARGM-TMP` -> `ARGM`.
pub fn role_class(role: &str) -> &str {
    role.split('-').next().unwrap_or(role)
}

pub fn position(arg_word: usize, pred_word: usize) -> &'static str {
    if arg_word < pred_word {
        "before"
    } else {
        "after"
    }
}
