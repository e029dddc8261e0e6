//! Read-only byte streams returned by a successful load.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;

/// An opened, read-only handle to resource bytes.
///
/// # Object Safety
///
/// This trait is object-safe: loaders hand out [`Stream`], a
/// `Box<dyn InputStream>`.
pub trait InputStream: Read + Seek + Send {
    /// Total size of the resource in bytes.
    fn size(&self) -> u64;

    /// Read everything from the current position to the end.
    fn read_all(&mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(Bytes::from(buf))
    }
}

/// A boxed stream, as returned by `ResourceLoader::load`.
pub type Stream = Box<dyn InputStream>;

/// A stream over bytes already in memory.
pub struct MemoryStream {
    cursor: Cursor<Bytes>,
}

impl MemoryStream {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            cursor: Cursor::new(data.into()),
        }
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl InputStream for MemoryStream {
    fn size(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }
}

/// A buffered stream over a file on disk.
pub struct FileStream {
    reader: BufReader<File>,
    size: u64,
}

impl FileStream {
    /// Open `path` for reading.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            size,
        })
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl InputStream for FileStream {
    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn memory_stream_reads_and_seeks() {
        let mut stream = MemoryStream::new(Bytes::from_static(b"hello world"));
        assert_eq!(stream.size(), 11);

        stream.seek(SeekFrom::Start(6)).unwrap();
        assert_eq!(stream.read_all().unwrap(), Bytes::from_static(b"world"));
    }

    #[test]
    fn boxed_stream_works() {
        let mut stream: Stream = Box::new(MemoryStream::new(vec![1u8, 2, 3]));
        assert_eq!(stream.size(), 3);
        assert_eq!(stream.read_all().unwrap().as_ref(), &[1u8, 2, 3]);
    }

    #[test]
    fn file_stream_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "layerfs-file-stream-{}.bin",
            std::process::id()
        ));
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(b"on disk").unwrap();
            f.sync_all().unwrap();
        }

        let mut stream = FileStream::open(&path).unwrap();
        assert_eq!(stream.size(), 7);
        assert_eq!(stream.read_all().unwrap(), Bytes::from_static(b"on disk"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_stream_missing_file_is_io_error() {
        let result = FileStream::open(Path::new("/definitely/not/here.bin"));
        assert!(result.is_err());
    }
}
