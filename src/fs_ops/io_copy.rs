//! Streaming copy used by the cross-device fallback.
//!
//! - The destination is created with `create_new`, so an existing file is never clobbered.
//! - 1 MiB buffers keep the syscall count down on large files.
//! - The destination is fsynced before returning; the caller renames it into
//!   place only after that, so a crash never leaves a half-written visible file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` -> `dst` (which must not exist) and fsync. Returns bytes written.
pub(super) fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let expected = src_f.metadata()?.len();
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;

    // A source that shrank mid-copy must not count as a complete copy.
    if bytes < expected {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("short copy: {bytes} of {expected} bytes"),
        ));
    }
    Ok(bytes)
}
