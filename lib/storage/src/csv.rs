//! Descriptor CSV persistence.
//!
//! One record per line: an identifier field followed by the descriptor
//! elements, comma-separated. An empty numeric cell reads back as 0.0; a
//! non-empty cell that fails to parse fails the whole read with the
//! offending line number.

use cbir_core::{Descriptor, Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn parse_row(line: &str, line_number: usize) -> Result<(String, Descriptor)> {
    let mut cells = line.split(',');
    // split always yields at least one cell
    let id = cells.next().unwrap_or_default().to_string();
    let mut values = Vec::new();
    for cell in cells {
        if cell.is_empty() {
            values.push(0.0);
            continue;
        }
        let value = cell.trim().parse::<f32>().map_err(|_| Error::Csv {
            line: line_number,
            message: format!("invalid numeric cell {cell:?}"),
        })?;
        values.push(value);
    }
    Ok((id, Descriptor::new(values)))
}

fn read_rows(path: impl AsRef<Path>) -> Result<Vec<(String, Descriptor)>> {
    let file = File::open(path.as_ref())?;
    let mut rows = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        rows.push(parse_row(&line, index + 1)?);
    }
    debug!(count = rows.len(), path = %path.as_ref().display(), "read descriptor rows");
    Ok(rows)
}

/// Read a descriptor CSV preserving row order.
pub fn read_descriptors_csv(path: impl AsRef<Path>) -> Result<Vec<(String, Descriptor)>> {
    read_rows(path)
}

/// Read an embeddings CSV into a lookup keyed by identifier.
///
/// Later rows win on duplicate identifiers.
pub fn read_embeddings_csv(path: impl AsRef<Path>) -> Result<HashMap<String, Descriptor>> {
    Ok(read_rows(path)?.into_iter().collect())
}

/// Write descriptors as CSV rows, one `identifier,v0,v1,...` record per
/// line. Fails only on an unwritable destination.
pub fn write_descriptors_csv(
    path: impl AsRef<Path>,
    descriptors: &[(String, Descriptor)],
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    for (id, descriptor) in descriptors {
        write!(writer, "{id}")?;
        for value in descriptor.as_slice() {
            write!(writer, ",{value}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
