use crate::error::{Error, Result};
use crate::post::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records to the given path as a single JSON array.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    let to_error = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
    serde_json::to_writer(&mut writer, records).map_err(|error| to_error(error.into()))?;
    writer.flush().map_err(to_error)?;

    log::info!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}
