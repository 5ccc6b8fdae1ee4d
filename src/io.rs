//! Reading and writing node arrays at byte offsets within files.
//!
//! Several node arrays (and other records) may share one file. Every operation takes the byte
//! offset at which its record starts and advances it past the record, so that consecutive calls
//! read or write consecutive records.
use crate::node_array::NodeArray;
use crate::Real;
use eyre::{eyre, Context};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::Path;

pub mod snapshot;

pub use snapshot::{NodeArraySnapshot, NodeValueDump};

/// Serializes `record` into the file at `offset`, creating the file if necessary.
///
/// Bytes before and after the written region are left untouched.
pub fn write_record_at<S, P>(path: P, offset: &mut u64, record: &S) -> eyre::Result<()>
where
    S: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = bincode::serialize(record).wrap_err("failed to serialize record")?;
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open {} for writing", path.display()))?;
    file.seek(SeekFrom::Start(*offset))
        .wrap_err("failed to seek to record offset")?;
    file.write_all(&bytes).wrap_err("failed to write record")?;
    info!("Wrote {} bytes to {} at offset {}", bytes.len(), path.display(), offset);
    *offset += bytes.len() as u64;
    Ok(())
}

/// Deserializes a record from the file at `offset` and advances `offset` past it.
pub fn read_record_at<S, P>(path: P, offset: &mut u64) -> eyre::Result<S>
where
    S: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).wrap_err_with(|| format!("failed to open {} for reading", path.display()))?;
    let file_len = file
        .metadata()
        .wrap_err_with(|| format!("failed to query size of {}", path.display()))?
        .len();
    if *offset > file_len {
        return Err(eyre!(
            "offset {} is beyond the end of {} ({} bytes)",
            offset,
            path.display(),
            file_len
        ));
    }
    let mut reader = BufReader::new(file);
    reader
        .seek(SeekFrom::Start(*offset))
        .wrap_err("failed to seek to record offset")?;
    let record = bincode::deserialize_from(&mut reader).wrap_err("failed to deserialize record")?;
    let end = reader
        .stream_position()
        .wrap_err("failed to determine end of record")?;
    info!("Read {} bytes from {} at offset {}", end - *offset, path.display(), offset);
    *offset = end;
    Ok(record)
}

impl<T> NodeArray<T>
where
    T: Real + Serialize + DeserializeOwned,
{
    /// Writes layout and values of the node array, tagged with `id`.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, offset: &mut u64, id: u32) -> eyre::Result<()> {
        write_record_at(path, offset, &NodeArraySnapshot::from_node_array(self, id))
            .wrap_err("failed to write node array")
    }

    /// Writes only the values of the node array, tagged with `id`.
    pub fn dump_updated_values<P: AsRef<Path>>(&self, path: P, offset: &mut u64, id: u32) -> eyre::Result<()> {
        write_record_at(path, offset, &NodeValueDump::from_node_array(self, id))
            .wrap_err("failed to dump node array values")
    }

    /// Replaces layout and values with a record written by [`write_to_file`](Self::write_to_file).
    ///
    /// Returns the id the record was tagged with. Registered element segments are kept.
    /// On error, the node array is unchanged.
    pub fn initialize_from_file<P: AsRef<Path>>(&mut self, path: P, offset: &mut u64) -> eyre::Result<u32> {
        let mut record_offset = *offset;
        let snapshot: NodeArraySnapshot<T> =
            read_record_at(path, &mut record_offset).wrap_err("failed to read node array")?;
        let id = snapshot.id;
        snapshot.restore_into(self)?;
        *offset = record_offset;
        Ok(id)
    }

    /// Replaces the values with a record written by
    /// [`dump_updated_values`](Self::dump_updated_values).
    ///
    /// The record must match the current node count and segment layout, that is the same segment
    /// ids with the same widths in the same order. Returns the id the record was tagged with.
    /// On error, the node array is unchanged.
    pub fn update_values_from_file<P: AsRef<Path>>(&mut self, path: P, offset: &mut u64) -> eyre::Result<u32> {
        let mut record_offset = *offset;
        let dump: NodeValueDump<T> =
            read_record_at(path, &mut record_offset).wrap_err("failed to read node array values")?;
        let id = dump.id;
        dump.restore_into(self)?;
        *offset = record_offset;
        Ok(id)
    }
}
