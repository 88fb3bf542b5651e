//! Byte-exact file rewrite around a spliced chunk

use std::fs::{self, Permissions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::offset::resolve_offset;
use crate::{StegError, StegResult};

/// How the bytes at the splice offset are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceMode {
    /// Keep everything after the offset; the file grows
    Insert,
    /// Drop as many source bytes as the new chunk is long
    Replace,
}

/// Write `source[..offset] ++ chunk_bytes ++ rest` to `dest`.
///
/// `rest` is `source[offset..]` for [`SpliceMode::Insert`] and
/// `source[offset + chunk_bytes.len()..]` for [`SpliceMode::Replace`].
/// The offset must already be bounds checked. Returns the bytes written.
pub fn splice<R, W>(
    source: &mut R,
    dest: &mut W,
    offset: u64,
    chunk_bytes: &[u8],
    mode: SpliceMode,
) -> StegResult<u64>
where
    R: Read + Seek + ?Sized,
    W: Write + ?Sized,
{
    source.seek(SeekFrom::Start(0))?;

    let head = io::copy(&mut (&mut *source).take(offset), dest)?;
    if head < offset {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "source ended before the splice offset",
        )
        .into());
    }

    dest.write_all(chunk_bytes)?;

    if mode == SpliceMode::Replace {
        let skip = i64::try_from(chunk_bytes.len())
            .map_err(|_| StegError::ChunkTooLarge(chunk_bytes.len()))?;
        source.seek(SeekFrom::Current(skip))?;
    }

    let tail = io::copy(source, dest)?;
    debug!(head, inserted = chunk_bytes.len(), tail, ?mode, "spliced");

    Ok(head + chunk_bytes.len() as u64 + tail)
}

/// Splice into a new file at `output`, atomically.
///
/// The offset is checked against the source length before anything is
/// created. Bytes go to a temporary file next to `output` that is renamed
/// over it only once fully written, so on any error `output` is left as it
/// was (absent or with its old content).
pub fn splice_to_path<R>(
    source: &mut R,
    output: &Path,
    offset: i64,
    chunk_bytes: &[u8],
    mode: SpliceMode,
) -> StegResult<u64>
where
    R: Read + Seek + ?Sized,
{
    let len = source.seek(SeekFrom::End(0))?;
    let offset = resolve_offset(offset, len)?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    let written = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let written = splice(source, &mut writer, offset, chunk_bytes, mode)?;
        writer.flush()?;
        written
    };
    if let Some(permissions) = output_permissions(output)? {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(output).map_err(|e| e.error)?;

    info!(output = %output.display(), offset, written, ?mode, "output written");
    Ok(written)
}

/// Mode for the finished file: an existing output keeps its own, a new one
/// gets 0644 rather than the temp file's 0600. `None` leaves the temp file's.
fn output_permissions(output: &Path) -> StegResult<Option<Permissions>> {
    match fs::metadata(output) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
