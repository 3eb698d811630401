//! The `fileio` namespace: directories, files and file handles.
//!
//! Handle lifecycle is `Unopened -> Open -> Closed`. `fOpen`/`fCreate`
//! produce an open handle, `fClose` closes it, and every stream operation
//! on a closed handle is an `InvalidHandle` error. `fCheckHandle` checks
//! liveness without failing.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

use cathode_native::{
    NativeDescriptor, NativeModule, NativeRegistryBuilder, NativeResult, RegistryError,
};
use cathode_value::{
    invalid_argument, invalid_handle, type_mismatch, unsupported_literal, ArrayValue, FileHandle,
};
use tracing::debug;

pub const FILEIO_NAMESPACE: &str = "fileio";

/// Registers the `fileio` functions.
pub struct FileIoModule;

impl NativeModule for FileIoModule {
    fn namespace(&self) -> &str {
        FILEIO_NAMESPACE
    }

    fn register(&self, builder: &mut NativeRegistryBuilder) -> Result<(), RegistryError> {
        let desc = |name: &str, params: &[&str]| {
            NativeDescriptor::with_params(name, params.iter().copied())
                .in_namespace(FILEIO_NAMESPACE)
        };
        builder
            .register(desc("dExists", &["path"]), dir_exists)?
            .register(desc("dCreate", &["path"]), dir_create)?
            .register(desc("dUnlink", &["path"]), dir_unlink)?
            .register(desc("fUnlink", &["path"]), file_unlink)?
            .register(desc("fCheckHandle", &["handle"]), check_handle)?
            .register(desc("fOpen", &["path", "mode"]), file_open)?
            .register(desc("fExists", &["path"]), file_exists)?
            .register(desc("fCreate", &["path"]), file_create)?
            .register(desc("fGetPath", &["path"]), full_path)?
            .register(desc("fClose", &["handle"]), file_close)?
            .register(desc("fReadLine", &["handle"]), read_line)?
            .register(desc("fLen", &["handle"]), file_len)?
            .register(desc("fGetPos", &["handle"]), get_pos)?
            .register(desc("fSetPos", &["handle", "pos"]), set_pos)?
            .register(desc("fRead", &["handle", "count"]), read_bytes)?
            .register(desc("fWrite", &["handle", "data"]), write_bytes)?
            .register(
                desc("fWriteLine", &["handle", "line", "encoding"]),
                write_line,
            )?;
        Ok(())
    }
}

/// Log a swallowed OS error.
fn os_failure(operation: &str, path: &Path, err: &io::Error) {
    debug!(operation, path = %path.display(), error = %err, "file operation failed");
}

/// Run `f` on the stream of an open handle.
fn with_open<R>(
    handle: &FileHandle,
    operation: &str,
    f: impl FnOnce(&mut File) -> R,
) -> NativeResult<R> {
    handle.with_stream(f).ok_or_else(|| invalid_handle(operation))
}

// Directories

fn dir_exists(path: String) -> NativeResult<bool> {
    Ok(Path::new(&path).is_dir())
}

/// Creates missing parents too.
fn dir_create(path: String) -> NativeResult<bool> {
    Ok(fs::create_dir_all(&path)
        .inspect_err(|err| os_failure("dCreate", Path::new(&path), err))
        .is_ok())
}

/// Fails on a non-empty directory.
fn dir_unlink(path: String) -> NativeResult<bool> {
    Ok(fs::remove_dir(&path)
        .inspect_err(|err| os_failure("dUnlink", Path::new(&path), err))
        .is_ok())
}

// Files by path

fn file_exists(path: String) -> NativeResult<bool> {
    Ok(Path::new(&path).is_file())
}

fn file_unlink(path: String) -> NativeResult<bool> {
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(err) => {
            os_failure("fUnlink", Path::new(&path), &err);
            Ok(false)
        }
    }
}

fn open_options(mode: &str) -> Option<OpenOptions> {
    let mut options = OpenOptions::new();
    match mode {
        "r" => options.read(true),
        "rw" => options.read(true).write(true).create(true),
        "w" => options.write(true).create(true),
        _ => return None,
    };
    Some(options)
}

/// `r` needs an existing file; `rw` and `w` create it and never truncate.
fn file_open(path: String, mode: String) -> NativeResult<Option<FileHandle>> {
    let Some(options) = open_options(&mode) else {
        debug!(operation = "fOpen", %path, %mode, "unsupported open mode");
        return Ok(None);
    };
    Ok(match options.open(&path) {
        Ok(stream) => Some(FileHandle::open(stream, path)),
        Err(err) => {
            os_failure("fOpen", Path::new(&path), &err);
            None
        }
    })
}

/// Create or truncate, opened for reading and writing.
fn file_create(path: String) -> NativeResult<Option<FileHandle>> {
    let opened = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path);
    Ok(match opened {
        Ok(stream) => Some(FileHandle::open(stream, path)),
        Err(err) => {
            os_failure("fCreate", Path::new(&path), &err);
            None
        }
    })
}

/// Absolute, lexically normalized path. The input comes back unchanged when
/// the working directory is unavailable.
fn full_path(path: String) -> NativeResult<String> {
    let relative = Path::new(&path);
    let joined = if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(relative),
            Err(err) => {
                os_failure("fGetPath", relative, &err);
                return Ok(path);
            }
        }
    };
    Ok(normalize_lexically(&joined).display().to_string())
}

/// Drop `.` components and fold `..` into its parent without touching the
/// file system. `..` at the root stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

// Handles

fn check_handle(handle: FileHandle) -> NativeResult<bool> {
    Ok(handle.is_open())
}

/// Closing an already closed handle is a no-op.
fn file_close(handle: FileHandle) -> NativeResult<()> {
    if !handle.close() {
        debug!(path = %handle.path().display(), "fClose on a closed handle");
    }
    Ok(())
}

/// Bytes up to the next `\n` or end of stream, one char per byte (Latin-1).
/// The newline is consumed but not returned.
fn read_line(handle: FileHandle) -> NativeResult<String> {
    let path = handle.path();
    with_open(&handle, "fReadLine", |stream| {
        let mut line = String::new();
        let mut byte = [0u8; 1];
        loop {
            match stream.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(char::from(byte[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    os_failure("fReadLine", &path, &err);
                    break;
                }
            }
        }
        line
    })
}

/// Length in bytes, or -1 when the OS cannot report it.
fn file_len(handle: FileHandle) -> NativeResult<i64> {
    let path = handle.path();
    with_open(&handle, "fLen", |stream| {
        match stream.metadata() {
            Ok(meta) => i64::try_from(meta.len()).unwrap_or(i64::MAX),
            Err(err) => {
                os_failure("fLen", &path, &err);
                -1
            }
        }
    })
}

/// Stream position, or -1 when the OS cannot report it.
fn get_pos(handle: FileHandle) -> NativeResult<i64> {
    let path = handle.path();
    with_open(&handle, "fGetPos", |stream| match stream.stream_position() {
        Ok(pos) => i64::try_from(pos).unwrap_or(i64::MAX),
        Err(err) => {
            os_failure("fGetPos", &path, &err);
            -1
        }
    })
}

fn set_pos(handle: FileHandle, pos: i64) -> NativeResult<()> {
    let Ok(pos) = u64::try_from(pos) else {
        return Err(invalid_argument(
            "fSetPos",
            format!("position must not be negative, got {pos}"),
        ));
    };
    let path = handle.path();
    with_open(&handle, "fSetPos", |stream| {
        if let Err(err) = stream.seek(SeekFrom::Start(pos)) {
            os_failure("fSetPos", &path, &err);
        }
    })
}

/// Up to `count` bytes from the current position; fewer at end of stream.
/// Void for a negative count or an I/O failure.
fn read_bytes(handle: FileHandle, count: i64) -> NativeResult<Option<Vec<u8>>> {
    let path = handle.path();
    with_open(&handle, "fRead", |stream| {
        let limit = u64::try_from(count).ok()?;
        let mut data = Vec::new();
        match Read::by_ref(stream).take(limit).read_to_end(&mut data) {
            Ok(_) => Some(data),
            Err(err) => {
                os_failure("fRead", &path, &err);
                None
            }
        }
    })
}

/// Every element must be a `Byte`.
fn collect_bytes(data: &ArrayValue) -> NativeResult<Vec<u8>> {
    data.with_items(|items| {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_byte().ok_or_else(|| {
                    type_mismatch("byte", item.type_name())
                        .with_note(format!("element {index} of argument 2"))
                })
            })
            .collect()
    })
}

fn write_all(handle: &FileHandle, operation: &str, bytes: &[u8]) -> NativeResult<bool> {
    let path = handle.path();
    with_open(handle, operation, |stream| match stream.write_all(bytes) {
        Ok(()) => true,
        Err(err) => {
            os_failure(operation, &path, &err);
            false
        }
    })
}

fn write_bytes(handle: FileHandle, data: ArrayValue) -> NativeResult<bool> {
    let bytes = collect_bytes(&data)?;
    write_all(&handle, "fWrite", &bytes)
}

fn write_line(handle: FileHandle, line: String, encoding: String) -> NativeResult<bool> {
    let encoding = LineEncoding::parse(&encoding)
        .ok_or_else(|| unsupported_literal("encoding", &encoding))?;
    write_all(&handle, "fWriteLine", &encoding.encode_line(&line))
}

/// Text encodings accepted by `fWriteLine`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LineEncoding {
    /// One byte per char; non-ASCII chars become `?`.
    Ascii,
    /// UTF-16 little-endian, no byte order mark.
    Unicode,
    Utf8,
}

impl LineEncoding {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "ascii" => Some(LineEncoding::Ascii),
            "unicode" => Some(LineEncoding::Unicode),
            "utf8" => Some(LineEncoding::Utf8),
            _ => None,
        }
    }

    /// Encode `line` followed by `\n`.
    fn encode_line(self, line: &str) -> Vec<u8> {
        let chars = line.chars().chain(std::iter::once('\n'));
        match self {
            LineEncoding::Ascii => chars
                .map(|c| u8::try_from(c).ok().filter(u8::is_ascii).unwrap_or(b'?'))
                .collect(),
            LineEncoding::Unicode => chars
                .collect::<String>()
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect(),
            LineEncoding::Utf8 => {
                let mut bytes = Vec::with_capacity(line.len().saturating_add(1));
                bytes.extend_from_slice(line.as_bytes());
                bytes.push(b'\n');
                bytes
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
