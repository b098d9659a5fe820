use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde::Deserialize;
use tracing::{info, warn};
use crate::corpus::pointer::SpanPointer;
use crate::corpus::tree::Tree;
use crate::error::{Error, Result};

/// Grammatical voice of the predicate.
///
/// Serialized as `active`, `passive` or `NONE`; an `unspecified` voice (or
/// any unrecognised code) comes out as `NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Voice {
    Active,
    Passive,
    #[default]
    Unspecified,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Active => "active",
            Voice::Passive => "passive",
            Voice::Unspecified => "NONE",
        }
    }
}

impl From<String> for Voice {
    /// Accepts PropBank inflection codes (`a`, `p`) as well as the full words.
    fn from(value: String) -> Self {
        match value.as_str() {
            "a" | "active" => Voice::Active,
            "p" | "passive" => Voice::Passive,
            _ => Voice::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Argument {
    pub pointer: SpanPointer,
    pub role: String,
}

/// One predicate occurrence with its role-labelled arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatedInstance {
    #[serde(default)]
    pub id: String,
    pub predicate: SpanPointer,
    /// Lemma plus sense suffix, e.g. `rise.01`.
    pub roleset: String,
    #[serde(default)]
    pub voice: Voice,
    pub arguments: Vec<Argument>,
    pub tree: Tree,
}

/// Decoded instances of a corpus file and the lines that had to be skipped.
#[derive(Debug, Default)]
pub struct Corpus {
    pub instances: Vec<AnnotatedInstance>,
    pub failures: Vec<Error>,
}

/// Decode one instance per non-blank line. Instances without an id are
/// named after their line number. Undecodable lines are logged and skipped;
/// a read failure ends the corpus at that line.
pub fn parse_instances<R: BufRead>(reader: R) -> Corpus {
    let mut corpus = Corpus::default();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                let err = Error::Corpus {
                    line: line_no,
                    reason: err.to_string(),
                };
                warn!("stopping corpus: {}", err);
                corpus.failures.push(err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AnnotatedInstance>(&line) {
            Ok(mut instance) => {
                if instance.id.is_empty() {
                    instance.id = line_no.to_string();
                }
                corpus.instances.push(instance);
            }
            Err(err) => {
                let err = Error::Corpus {
                    line: line_no,
                    reason: err.to_string(),
                };
                warn!("skipping instance: {}", err);
                corpus.failures.push(err);
            }
        }
    }
    corpus
}

pub fn read_instances(path: &Path) -> Result<Corpus> {
    let file = File::open(path).map_err(|err| Error::io(path, err))?;
    let corpus = parse_instances(BufReader::new(file));
    info!(
        count = corpus.instances.len(),
        skipped = corpus.failures.len(),
        path = %path.display(),
        "read annotated instances"
    );
    Ok(corpus)
}
