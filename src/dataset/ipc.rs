use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use arrow::array::{ArrayRef, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use tracing::debug;
use crate::dataset::arff::{AttributeDomain, Dataset};
use crate::error::{Error, Result};

const BATCH_SIZE: usize = 100;

/// Nominal attributes become UInt32 columns of domain indices, free-form
/// attributes stay Utf8.
pub fn schema(dataset: &Dataset) -> Schema {
    let fields = dataset
        .attributes()
        .map(|(name, domain)| match domain {
            AttributeDomain::Nominal(_) => Field::new(name, DataType::UInt32, false),
            AttributeDomain::FreeForm(_) => Field::new(name, DataType::Utf8, false),
        })
        .collect::<Vec<_>>();
    Schema::new(fields)
}

/// Write the records in `[low, high)` as an Arrow IPC file.
pub fn write_records(dataset: &Dataset, low: usize, high: usize, path: &Path) -> Result<()> {
    let records = dataset.records().get(low..high).ok_or_else(|| {
        Error::configuration(format!(
            "record range [{}, {}) is invalid for {} records",
            low,
            high,
            dataset.len()
        ))
    })?;
    let schema = Arc::new(schema(dataset));
    let file = File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = FileWriter::try_new(file, &schema)?;
    for (n, chunk) in records.chunks(BATCH_SIZE).enumerate() {
        let mut columns = Vec::new();
        for (name, domain) in dataset.attributes() {
            let mut values = Vec::with_capacity(chunk.len());
            for (i, record) in chunk.iter().enumerate() {
                values.push(record.get(name).ok_or_else(|| Error::MissingValue {
                    record: low + n * BATCH_SIZE + i,
                    attribute: name.to_string(),
                })?);
            }
            let column = match domain {
                AttributeDomain::Nominal(_) => {
                    let ids = values
                        .iter()
                        .map(|value| {
                            domain
                                .index_of(value)
                                .map(|id| id as u32)
                                .ok_or_else(|| Error::UnknownAttribute(format!("{}={}", name, value)))
                        })
                        .collect::<Result<Vec<u32>>>()?;
                    Arc::new(UInt32Array::from(ids)) as ArrayRef
                }
                AttributeDomain::FreeForm(_) => Arc::new(StringArray::from(values)) as ArrayRef,
            };
            columns.push(column);
        }
        let batch = RecordBatch::try_new(schema.clone(), columns)?;
        writer.write(&batch)?;
    }
    writer.finish()?;
    debug!(path = %path.display(), records = records.len(), "wrote ipc records");
    Ok(())
}
