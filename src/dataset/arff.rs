use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use crate::error::{Error, Result};
use crate::feature::Record;

/// Slack allowed when checking that partition ratios sum to at most one.
const RATIO_EPSILON: f64 = 1e-9;

/// Value space of a declared attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeDomain {
    /// Distinct values in order of first appearance.
    Nominal(Vec<String>),
    /// Unconstrained values; the payload is the declared type, e.g. `string`.
    FreeForm(String),
}

impl AttributeDomain {
    pub fn nominal() -> Self {
        AttributeDomain::Nominal(Vec::new())
    }

    /// Insert-if-absent. Returns whether the value was new.
    pub fn insert(&mut self, value: &str) -> bool {
        match self {
            AttributeDomain::Nominal(values) if !values.iter().any(|v| v == value) => {
                values.push(value.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        match self {
            AttributeDomain::Nominal(values) => values.iter().position(|v| v == value),
            AttributeDomain::FreeForm(_) => None,
        }
    }

    fn declaration(&self) -> String {
        match self {
            AttributeDomain::Nominal(values) => {
                let values: Vec<_> = values.iter().map(|v| quote(v)).collect();
                format!("{{{}}}", values.join(","))
            }
            AttributeDomain::FreeForm(kind) => kind.clone(),
        }
    }
}

/// What to do with the records behind the last partition boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Remainder {
    /// Leave them out of every partition.
    #[default]
    Drop,
    /// Refuse ratios that sum to less than one.
    Reject,
}

/// Outcome of writing several files; a failed file does not stop the rest.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<Error>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Relation with declared attributes and the records that populate them.
#[derive(Debug, Clone)]
pub struct Dataset {
    relation: String,
    attributes: Vec<(String, AttributeDomain)>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(relation: &str) -> Self {
        Self {
            relation: relation.to_string(),
            attributes: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Declare `name`. Declaring a nominal attribute again merges the given
    /// values into the existing domain, which never shrinks; changing the kind
    /// or the free-form type is refused.
    pub fn declare(&mut self, name: &str, domain: AttributeDomain) -> Result<()> {
        let existing = match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => existing,
            None => {
                self.attributes.push((name.to_string(), domain));
                return Ok(());
            }
        };
        match (existing, domain) {
            (existing @ AttributeDomain::Nominal(_), AttributeDomain::Nominal(values)) => {
                for value in &values {
                    existing.insert(value);
                }
                Ok(())
            }
            (AttributeDomain::FreeForm(kind), AttributeDomain::FreeForm(other)) if *kind == other => {
                Ok(())
            }
            (existing, domain) => Err(Error::configuration(format!(
                "attribute `{}` is already declared as {}, cannot redeclare it as {}",
                name,
                existing.declaration(),
                domain.declaration()
            ))),
        }
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDomain> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, domain)| domain)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeDomain)> {
        self.attributes.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Grow the nominal domain of `name` by `value`.
    pub fn add_to_attribute(&mut self, name: &str, value: &str) -> Result<bool> {
        let (_, domain) = self
            .attributes
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))?;
        if let AttributeDomain::FreeForm(_) = domain {
            warn!(attribute = name, "not adding `{}`, attribute is not nominal", value);
            return Ok(false);
        }
        Ok(domain.insert(value))
    }

    /// Append `record`, first growing every nominal domain it has a value for.
    pub fn add_record(&mut self, record: Record) {
        for (name, domain) in self.attributes.iter_mut() {
            if let Some(value) = record.get(name) {
                domain.insert(value);
            }
        }
        for (name, _) in record.iter() {
            if self.attribute(name).is_none() {
                warn!("{}; value omitted", Error::UnknownAttribute(name.to_string()));
            }
        }
        self.records.push(record);
    }

    /// Header plus the records in `[low, high)`.
    pub fn serialize(&self, low: usize, high: usize) -> Result<String> {
        if low > high || high > self.records.len() {
            return Err(Error::configuration(format!(
                "record range [{}, {}) is invalid for {} records",
                low,
                high,
                self.records.len()
            )));
        }
        let mut out = String::new();
        let _ = write!(out, "@relation {}\n\n", quote(&self.relation));
        for (name, domain) in &self.attributes {
            let _ = writeln!(out, "@attribute {} {}", name, domain.declaration());
        }
        out.push_str("\n@data\n");
        for (offset, record) in self.records[low..high].iter().enumerate() {
            let mut fields = Vec::with_capacity(self.attributes.len());
            for (name, _) in &self.attributes {
                let value = record.get(name).ok_or_else(|| Error::MissingValue {
                    record: low + offset,
                    attribute: name.clone(),
                })?;
                fields.push(quote(value));
            }
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        Ok(out)
    }

    pub fn to_arff(&self) -> Result<String> {
        self.serialize(0, self.records.len())
    }

    /// Write every record to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        self.write_range(path, 0, self.records.len())
    }

    fn write_range(&self, path: &Path, low: usize, high: usize) -> Result<()> {
        let text = self.serialize(low, high)?;
        let file = File::create(path).map_err(|err| Error::io(path, err))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|err| Error::io(path, err))?;
        debug!(path = %path.display(), records = high - low, "wrote relation file");
        Ok(())
    }

    /// Split the records into consecutive slices sized by `ratios` and write
    /// each to the matching file. Records past the last boundary are dropped.
    pub fn write_partitioned<P: AsRef<Path>>(&self, files: &[P], ratios: &[f64]) -> Result<WriteReport> {
        self.write_partitioned_with(files, ratios, Remainder::Drop)
    }

    pub fn write_partitioned_with<P: AsRef<Path>>(
        &self,
        files: &[P],
        ratios: &[f64],
        remainder: Remainder,
    ) -> Result<WriteReport> {
        if files.len() != ratios.len() {
            return Err(Error::configuration(format!(
                "number of files ({}) and ratios ({}) are not equal",
                files.len(),
                ratios.len()
            )));
        }
        let bounds = partition_bounds(ratios, self.records.len(), remainder)?;
        let mut report = WriteReport::default();
        for (file, (low, high)) in files.iter().zip(bounds) {
            let path = file.as_ref();
            match self.write_range(path, low, high) {
                Ok(()) => report.written.push(path.to_path_buf()),
                Err(err) => {
                    error!("could not write partition: {}", err);
                    report.failed.push(err);
                }
            }
        }
        Ok(report)
    }
}

/// `[low, high)` slices for each ratio over `total` records, cumulative floor
/// boundaries starting at zero.
pub fn partition_bounds(ratios: &[f64], total: usize, remainder: Remainder) -> Result<Vec<(usize, usize)>> {
    if let Some(bad) = ratios.iter().find(|r| !r.is_finite() || **r < 0.0) {
        return Err(Error::configuration(format!("invalid ratio {}", bad)));
    }
    let sum: f64 = ratios.iter().sum();
    if sum > 1.0 + RATIO_EPSILON {
        return Err(Error::configuration(format!(
            "ratios sum to {}, which exceeds 1",
            sum
        )));
    }
    if remainder == Remainder::Reject && sum < 1.0 - RATIO_EPSILON {
        return Err(Error::configuration(format!(
            "ratios sum to {}, records would be left out",
            sum
        )));
    }
    let mut cursor = 0;
    let mut bounds = Vec::with_capacity(ratios.len());
    for ratio in ratios {
        let upper = ((ratio * total as f64).floor() as usize + cursor).min(total);
        bounds.push((cursor, upper));
        cursor = upper;
    }
    if cursor < total {
        debug!(dropped = total - cursor, "records beyond the last partition");
    }
    Ok(bounds)
}

/// Wrap values containing whitespace in double quotes.
pub fn quote(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

/// Read an `@attribute` declaration back into its name and domain.
pub fn parse_attribute_line(line: &str) -> Result<(String, AttributeDomain)> {
    let malformed = || Error::configuration(format!("malformed attribute line `{}`", line));
    let rest = line.strip_prefix("@attribute ").ok_or_else(malformed)?;
    let (name, spec) = rest.split_once(' ').ok_or_else(malformed)?;
    let spec = spec.trim_end_matches(&['\r', '\n'][..]);
    let inner = match spec.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(inner) => inner,
        None => return Ok((name.to_string(), AttributeDomain::FreeForm(spec.to_string()))),
    };
    let mut values = Vec::new();
    if inner.is_empty() {
        return Ok((name.to_string(), AttributeDomain::Nominal(values)));
    }
    let mut current = String::new();
    let mut quoted = false;
    for ch in inner.chars() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => values.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if quoted {
        return Err(malformed());
    }
    values.push(current);
    Ok((name.to_string(), AttributeDomain::Nominal(values)))
}
