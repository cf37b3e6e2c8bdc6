use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

use crate::dprintln;

/// Random-access byte source the chunk walker pulls from.
///
/// `read_at` fills `buf` from the absolute `offset` and returns how many bytes
/// were copied. Returning fewer bytes than requested means end of stream and
/// is treated as truncation. An `Err` is a reader failure.
pub trait ChunkReader {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

impl<F> ChunkReader for F
where
    F: FnMut(&mut [u8], u64) -> io::Result<usize>,
{
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self(buf, offset)
    }
}

fn copy_at(data: &[u8], buf: &mut [u8], offset: u64) -> usize {
    let Ok(start) = usize::try_from(offset) else {
        return 0;
    };
    let Some(available) = data.get(start..) else {
        return 0;
    };

    let len = available.len().min(buf.len());
    buf[..len].copy_from_slice(&available[..len]);
    len
}

/// Reads from an in-memory blob, such as an AAF essence summary or an
/// embedded essence stream.
#[derive(Debug, Clone, Copy)]
pub struct BlobReader<'a> {
    data: &'a [u8],
}

impl<'a> BlobReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ChunkReader for BlobReader<'_> {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        Ok(copy_at(self.data, buf, offset))
    }
}

/// Reads from an open file with seek + read.
#[derive(Debug)]
pub struct FileReader {
    file: File,
    name: String,
}

impl FileReader {
    pub fn new(file: File, name: impl Into<String>) -> Self {
        Self {
            file,
            name: name.into(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(file, path.display().to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ChunkReader for FileReader {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        if let Err(e) = self.file.seek(SeekFrom::Start(offset)) {
            tracing::error!("Could not seek to {} in file '{}': {}", offset, self.name, e);
            return Err(e);
        }

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => {
                    dprintln!("EOF reached in file '{}'", self.name);
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::error!(
                        "Incomplete read of '{}': {} bytes read out of {} requested: {}",
                        self.name,
                        filled,
                        buf.len(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        Ok(filled)
    }
}

/// Reads from a memory-mapped file.
#[derive(Debug)]
pub struct MmapReader {
    map: Mmap,
}

impl MmapReader {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let map = unsafe { MmapOptions::new().map(&file)? };
        Ok(Self { map })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.map
    }
}

impl ChunkReader for MmapReader {
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        Ok(copy_at(&self.map, buf, offset))
    }
}
