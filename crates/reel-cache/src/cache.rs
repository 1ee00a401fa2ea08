//! Writeable and readable views of the append-only backing store.
//!
//! Every byte written through a [`WriteableCache`] lands at the offset the
//! cache's [`index`](WriteableCache::index) reported just before the write.
//! Offsets handed out this way stay valid for the life of the backing
//! store: nothing is ever overwritten.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::CacheConfig;
use crate::error::CacheError;

// ── Writing ─────────────────────────────────────────────────────

/// Counting writer over an append-only sink.
#[derive(Debug)]
pub struct WriteableCache<W: Write> {
    inner: W,
    index: u64,
}

impl<W: Write> WriteableCache<W> {
    /// Wrap an empty sink.
    pub fn new(inner: W) -> Self {
        Self::with_index(inner, 0)
    }

    /// Wrap a sink that already holds `index` bytes.
    pub fn with_index(inner: W, index: u64) -> Self {
        Self { inner, index }
    }

    /// Offset the next written byte will occupy.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The counting writer. Bytes written here advance [`index`](Self::index).
    pub fn writer(&mut self) -> &mut dyn Write {
        self
    }

    /// A side buffer to be appended later with [`Deferred::commit`].
    pub fn deferred(&self) -> Deferred {
        Deferred::new()
    }

    /// The wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the sink. Buffered sinks are not flushed.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for WriteableCache<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.index += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Bytes staged outside a cache, appended in one piece on commit.
///
/// The buffer can be filled while other chunks are written to the cache;
/// its index is only decided by [`commit`](Self::commit).
#[derive(Debug, Default, Clone)]
pub struct Deferred {
    buf: Vec<u8>,
}

impl Deferred {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staged bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The staged bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append the staged bytes to `cache`, returning the index they start at.
    pub fn commit<W: Write>(self, cache: &mut WriteableCache<W>) -> io::Result<u64> {
        let index = cache.index();
        cache.write_all(&self.buf)?;
        Ok(index)
    }
}

impl Write for Deferred {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Reading ─────────────────────────────────────────────────────

/// Random-access reader factory over the backing store.
///
/// Each [`seek`](Self::seek) returns a fresh reader; readers never share a
/// position, so any number may be live at once.
pub trait ReadableCache {
    /// Reader positioned inside the store.
    type Reader<'a>: Read
    where
        Self: 'a;

    /// A reader positioned at absolute offset `index`.
    ///
    /// Offsets past the end of the store are rejected with
    /// [`io::ErrorKind::UnexpectedEof`].
    fn seek(&self, index: u64) -> io::Result<Self::Reader<'_>>;
}

impl ReadableCache for [u8] {
    type Reader<'a> = &'a [u8];

    fn seek(&self, index: u64) -> io::Result<&[u8]> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i..))
            .ok_or_else(|| past_end(index, self.len() as u64))
    }
}

impl ReadableCache for Vec<u8> {
    type Reader<'a> = &'a [u8];

    fn seek(&self, index: u64) -> io::Result<&[u8]> {
        self.as_slice().seek(index)
    }
}

fn past_end(index: u64, len: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("offset {index} is past the end of the cache ({len} bytes)"),
    )
}

// ── Files ───────────────────────────────────────────────────────

/// File-backed cache.
///
/// [`create`](Self::create) and [`append`](Self::append) return the
/// writeable side; [`open`](Self::open) returns this readable side, which
/// opens a new buffered handle on every seek. Readers only observe bytes
/// the writer has flushed.
#[derive(Clone, Debug)]
pub struct FileCache {
    path: PathBuf,
    read_buffer_bytes: usize,
}

impl FileCache {
    /// Create (or truncate) `path` and return a cache writing to it.
    pub fn create(
        path: impl AsRef<Path>,
        config: &CacheConfig,
    ) -> Result<WriteableCache<BufWriter<File>>, CacheError> {
        config.validate()?;
        let file = File::create(path)?;
        Ok(WriteableCache::new(BufWriter::with_capacity(
            config.write_buffer_bytes,
            file,
        )))
    }

    /// Continue writing at the end of an existing cache file.
    pub fn append(
        path: impl AsRef<Path>,
        config: &CacheConfig,
    ) -> Result<WriteableCache<BufWriter<File>>, CacheError> {
        config.validate()?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(WriteableCache::with_index(
            BufWriter::with_capacity(config.write_buffer_bytes, file),
            len,
        ))
    }

    /// The readable side of an existing cache file.
    pub fn open(path: impl AsRef<Path>, config: &CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();
        File::open(&path)?;
        Ok(Self {
            path,
            read_buffer_bytes: config.read_buffer_bytes,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReadableCache for FileCache {
    type Reader<'a> = BufReader<File>;

    fn seek(&self, index: u64) -> io::Result<BufReader<File>> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if index > len {
            return Err(past_end(index, len));
        }
        file.seek(SeekFrom::Start(index))?;
        Ok(BufReader::with_capacity(self.read_buffer_bytes, file))
    }
}
