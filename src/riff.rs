//! Streaming RIFF/WAVE and FORM/AIFF/AIFC chunk walker.
//!
//! The walker pulls bytes through a [`ChunkReader`] at absolute offsets and
//! fills a [`RiffAudioFile`] with the format fields it meets on the way. It
//! never needs the whole file in memory.

use crate::dprintln;
use crate::error::{Result, RiffError};
use crate::flags::flag_set;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

mod aif;
mod reader;
mod wav;

pub use reader::{BlobReader, ChunkReader, FileReader, MmapReader};
pub use wav::{WavBextChunk, WavFmtChunk, write_wav_header};

// Chunk Identifiers
const RIFF_CHUNK_ID: &[u8; 4] = b"RIFF";
const FORM_CHUNK_ID: &[u8; 4] = b"FORM";
const WAVE_FORMAT_ID: &[u8; 4] = b"WAVE";
const AIFF_FORMAT_ID: &[u8; 4] = b"AIFF";
const AIFC_FORMAT_ID: &[u8; 4] = b"AIFC";

// Chunk Structures
const HEADER_SIZE: usize = 12; // RIFF/FORM + size + format tag
const CHUNK_HEADER_SIZE: usize = 8; // id + size

/// Audio format fields discovered in a RIFF-family file.
///
/// Fields the walker did not reach (because of an early return requested by
/// [`ParseFlags`], or because the file is truncated) stay zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RiffAudioFile {
    /// Frames per second.
    pub sample_rate: u32,
    /// Bits per sample.
    pub sample_size: u16,
    pub channels: u16,
    /// Sample frames for one channel.
    pub sample_count: u64,
    /// Byte offset of the first PCM sample in the source stream.
    pub pcm_audio_start_offset: u64,
}

impl RiffAudioFile {
    fn bytes_per_sample(&self) -> u64 {
        u64::from(self.sample_size / 8)
    }

    // Frames held by `size` bytes of interleaved PCM, when the layout is known
    fn frames_in(&self, size: u64) -> Option<u64> {
        if self.channels == 0 || self.bytes_per_sample() == 0 {
            return None;
        }
        Some(size / u64::from(self.channels) / self.bytes_per_sample())
    }
}

flag_set! {
    /// Early-return behavior of [`parse_audio_file`].
    pub struct ParseFlags(u32);
}

impl ParseFlags {
    pub const NONE: Self = Self(0);
    /// Return as soon as the format chunk (`fmt ` or `COMM`) is parsed.
    pub const HEADER_ONLY: Self = Self(1 << 0);
    /// Return as soon as the audio data chunk (`data` or `SSND`) is located.
    /// AAF essence summaries carry a data chunk header but no audio.
    pub const AAF_SUMMARY: Self = Self(1 << 1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Wave,
    Aiff,
}

impl Container {
    fn from_format_tag(tag: &[u8]) -> Option<Self> {
        if tag == WAVE_FORMAT_ID {
            Some(Container::Wave)
        } else if tag == AIFF_FORMAT_ID || tag == AIFC_FORMAT_ID {
            Some(Container::Aiff)
        } else {
            None
        }
    }

    fn outer_id(self) -> &'static [u8; 4] {
        match self {
            Container::Wave => RIFF_CHUNK_ID,
            Container::Aiff => FORM_CHUNK_ID,
        }
    }

    fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            Container::Wave => LittleEndian::read_u32(bytes),
            Container::Aiff => BigEndian::read_u32(bytes),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ChunkHeader {
    id: [u8; 4],
    size: u32,
    /// Offset of the chunk header in the stream.
    offset: u64,
}

impl ChunkHeader {
    fn body_offset(&self) -> u64 {
        self.offset + CHUNK_HEADER_SIZE as u64
    }

    // Offset of the next chunk, chunks are padded to an even size
    fn end(&self) -> Result<u64> {
        let padded = u64::from(self.size) + u64::from(self.size & 1);
        let end = self
            .body_offset()
            .checked_add(padded)
            .filter(|end| usize::try_from(*end).is_ok())
            .ok_or(RiffError::SizeOverflow {
                offset: self.offset,
                size: self.size,
            })?;
        Ok(end)
    }
}

enum Flow {
    Continue,
    Stop,
}

fn read_at<R>(reader: &mut R, buf: &mut [u8], offset: u64) -> Result<usize>
where
    R: ChunkReader + ?Sized,
{
    reader.read_at(buf, offset).map_err(|source| RiffError::Read {
        offset,
        len: buf.len(),
        source,
    })
}

// Reads a fixed-size chunk body, `None` when the stream ends first or the
// reader fails past the outer header
fn read_body<R, const N: usize>(reader: &mut R, offset: u64) -> Option<[u8; N]>
where
    R: ChunkReader + ?Sized,
{
    let mut body = [0u8; N];
    let got = match read_at(reader, &mut body, offset) {
        Ok(got) => got,
        Err(e) => {
            tracing::warn!("{}, keeping the fields read so far", e);
            return None;
        }
    };
    if got < N {
        dprintln!("Truncated chunk at {}: {} of {} bytes", offset, got, N);
        return None;
    }
    Some(body)
}

/// Walks a WAVE or AIFF/AIFC container and returns its audio format fields.
///
/// A short or unreadable outer header, an unknown format tag or a chunk size
/// past the addressable range is an error. A truncated body or a reader
/// error further in only ends the walk, and the fields found so far are
/// returned.
pub fn parse_audio_file<R: ChunkReader + ?Sized>(
    reader: &mut R,
    flags: ParseFlags,
) -> Result<RiffAudioFile> {
    let mut header = [0u8; HEADER_SIZE];
    let got = read_at(reader, &mut header, 0)?;
    if got < HEADER_SIZE {
        return Err(RiffError::ShortHeader {
            got,
            expected: HEADER_SIZE,
        });
    }

    let container = Container::from_format_tag(&header[8..12]).ok_or_else(|| {
        RiffError::UnsupportedFormat(String::from_utf8_lossy(&header[8..12]).into_owned())
    })?;

    if &header[0..4] != container.outer_id() {
        tracing::warn!(
            "Unexpected container id {:?} for {:?} format",
            String::from_utf8_lossy(&header[0..4]),
            container
        );
    }

    let extent = u64::from(container.read_u32(&header[4..8])) + CHUNK_HEADER_SIZE as u64;
    let mut file = RiffAudioFile::default();
    let mut pos = HEADER_SIZE as u64;

    while pos < extent {
        let Some(raw) = read_body::<R, CHUNK_HEADER_SIZE>(reader, pos) else {
            break;
        };

        let chunk = ChunkHeader {
            id: [raw[0], raw[1], raw[2], raw[3]],
            size: container.read_u32(&raw[4..8]),
            offset: pos,
        };
        let next = chunk.end()?;

        dprintln!(
            "Chunk {:?} at {} ({} bytes)",
            String::from_utf8_lossy(&chunk.id),
            chunk.offset,
            chunk.size
        );

        let flow = match container {
            Container::Wave => wav::visit_chunk(reader, &chunk, flags, &mut file),
            Container::Aiff => aif::visit_chunk(reader, &chunk, flags, &mut file),
        };

        if let Flow::Stop = flow {
            break;
        }

        pos = next;
    }

    Ok(file)
}
