use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

use super::{
    CHUNK_HEADER_SIZE, ChunkHeader, ChunkReader, Flow, ParseFlags, RIFF_CHUNK_ID, RiffAudioFile,
    WAVE_FORMAT_ID, read_body,
};
use crate::error::{Result, RiffError};

// Format tags
const FORMAT_PCM: u16 = 1;

// Chunk Identifiers
const FMT_CHUNK_ID: &[u8; 4] = b"fmt ";
const DATA_CHUNK_ID: &[u8; 4] = b"data";
const BEXT_CHUNK_ID: &[u8; 4] = b"bext";

// Chunk Structures
const STANDARD_FMT_CHUNK_SIZE: usize = 16;
const BEXT_CHUNK_SIZE: usize = 602;
const BEXT_VERSION: u16 = 1;

pub(super) fn visit_chunk<R: ChunkReader + ?Sized>(
    reader: &mut R,
    chunk: &ChunkHeader,
    flags: ParseFlags,
    file: &mut RiffAudioFile,
) -> Flow {
    match &chunk.id {
        FMT_CHUNK_ID => {
            if (chunk.size as usize) < STANDARD_FMT_CHUNK_SIZE {
                tracing::warn!("fmt chunk is too small: {} bytes", chunk.size);
                return Flow::Stop;
            }

            let Some(fmt) = read_body::<R, STANDARD_FMT_CHUNK_SIZE>(reader, chunk.body_offset())
            else {
                return Flow::Stop;
            };

            // format tag (0..2), byte rate (8..12) and block align (12..14) are not needed
            file.channels = LittleEndian::read_u16(&fmt[2..4]);
            file.sample_rate = LittleEndian::read_u32(&fmt[4..8]);
            file.sample_size = LittleEndian::read_u16(&fmt[14..16]);

            if flags.contains(ParseFlags::HEADER_ONLY) {
                return Flow::Stop;
            }
        }
        DATA_CHUNK_ID => {
            if let Some(frames) = file.frames_in(u64::from(chunk.size)) {
                file.sample_count = frames;
            }
            file.pcm_audio_start_offset = chunk.body_offset();

            if flags.contains(ParseFlags::AAF_SUMMARY) {
                return Flow::Stop;
            }
        }
        _ => {}
    }

    Flow::Continue
}

/// Format fields needed to write a PCM `fmt ` chunk. The derived fields
/// (byte rate, block align) are computed on write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WavFmtChunk {
    pub channels: u16,
    pub samples_per_sec: u32,
    pub bits_per_sample: u16,
}

impl WavFmtChunk {
    pub fn new(channels: u16, samples_per_sec: u32, bits_per_sample: u16) -> Self {
        Self {
            channels,
            samples_per_sec,
            bits_per_sample,
        }
    }

    /// Saturates at `u16::MAX` for layouts no reader could play.
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bits_per_sample / 8)
    }

    pub fn avg_bytes_per_sec(&self) -> u32 {
        self.samples_per_sec.saturating_mul(u32::from(self.block_align()))
    }
}

/// Broadcast Wave `bext` chunk (EBU Tech 3285, version 1 layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBextChunk {
    pub description: [u8; 256],
    pub originator: [u8; 32],
    pub originator_reference: [u8; 32],
    /// `yyyy:mm:dd`
    pub origination_date: [u8; 10],
    /// `hh:mm:ss`
    pub origination_time: [u8; 8],
    /// First sample count since midnight.
    pub time_reference: u64,
    /// Always written as 1.
    pub version: u16,
    pub umid: [u8; 64],
    pub loudness_value: i16,
    pub loudness_range: i16,
    pub max_true_peak_level: i16,
    pub max_momentary_loudness: i16,
    pub max_short_term_loudness: i16,
    pub reserved: [u8; 180],
}

impl Default for WavBextChunk {
    fn default() -> Self {
        Self {
            description: [0; 256],
            originator: [0; 32],
            originator_reference: [0; 32],
            origination_date: [0; 10],
            origination_time: [0; 8],
            time_reference: 0,
            version: BEXT_VERSION,
            umid: [0; 64],
            loudness_value: 0,
            loudness_range: 0,
            max_true_peak_level: 0,
            max_momentary_loudness: 0,
            max_short_term_loudness: 0,
            reserved: [0; 180],
        }
    }
}

// Copies as much of `text` as fits, the rest of the field is zeroed
fn set_text(field: &mut [u8], text: &str) {
    let len = text.len().min(field.len());
    field[..len].copy_from_slice(&text.as_bytes()[..len]);
    field[len..].fill(0);
}

fn text_of(field: &[u8]) -> String {
    String::from_utf8_lossy(field)
        .trim_end_matches('\0')
        .to_string()
}

impl WavBextChunk {
    pub fn set_description(&mut self, text: &str) {
        set_text(&mut self.description, text);
    }

    pub fn set_originator(&mut self, text: &str) {
        set_text(&mut self.originator, text);
    }

    pub fn set_originator_reference(&mut self, text: &str) {
        set_text(&mut self.originator_reference, text);
    }

    pub fn set_origination_date(&mut self, text: &str) {
        set_text(&mut self.origination_date, text);
    }

    pub fn set_origination_time(&mut self, text: &str) {
        set_text(&mut self.origination_time, text);
    }

    pub fn description(&self) -> String {
        text_of(&self.description)
    }

    pub fn originator(&self) -> String {
        text_of(&self.originator)
    }

    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> std::io::Result<()> {
        sink.write_all(&self.description)?;
        sink.write_all(&self.originator)?;
        sink.write_all(&self.originator_reference)?;
        sink.write_all(&self.origination_date)?;
        sink.write_all(&self.origination_time)?;
        sink.write_u64::<LittleEndian>(self.time_reference)?;
        sink.write_u16::<LittleEndian>(BEXT_VERSION)?;
        sink.write_all(&self.umid)?;
        sink.write_i16::<LittleEndian>(self.loudness_value)?;
        sink.write_i16::<LittleEndian>(self.loudness_range)?;
        sink.write_i16::<LittleEndian>(self.max_true_peak_level)?;
        sink.write_i16::<LittleEndian>(self.max_momentary_loudness)?;
        sink.write_i16::<LittleEndian>(self.max_short_term_loudness)?;
        sink.write_all(&self.reserved)?;
        Ok(())
    }
}

/// Writes a RIFF/WAVE header for `audio_data_size` bytes of PCM that the
/// caller appends right after it.
///
/// The `fmt ` chunk is always PCM; the `bext` chunk, when given, is always
/// written as version 1.
pub fn write_wav_header<W: Write + ?Sized>(
    sink: &mut W,
    fmt: &WavFmtChunk,
    bext: Option<&WavBextChunk>,
    audio_data_size: u32,
) -> Result<()> {
    let bext_size = bext.map_or(0, |_| CHUNK_HEADER_SIZE + BEXT_CHUNK_SIZE);
    let header_size =
        4 + CHUNK_HEADER_SIZE + STANDARD_FMT_CHUNK_SIZE + bext_size + CHUNK_HEADER_SIZE;
    let riff_size = header_size as u64 + u64::from(audio_data_size);
    let riff_size = u32::try_from(riff_size).map_err(|_| RiffError::SizeOverflow {
        offset: 0,
        size: audio_data_size,
    })?;

    sink.write_all(RIFF_CHUNK_ID)?;
    sink.write_u32::<LittleEndian>(riff_size)?;
    sink.write_all(WAVE_FORMAT_ID)?;

    // ---- fmt chunk ----
    sink.write_all(FMT_CHUNK_ID)?;
    sink.write_u32::<LittleEndian>(STANDARD_FMT_CHUNK_SIZE as u32)?;
    sink.write_u16::<LittleEndian>(FORMAT_PCM)?;
    sink.write_u16::<LittleEndian>(fmt.channels)?;
    sink.write_u32::<LittleEndian>(fmt.samples_per_sec)?;
    sink.write_u32::<LittleEndian>(fmt.avg_bytes_per_sec())?;
    sink.write_u16::<LittleEndian>(fmt.block_align())?;
    sink.write_u16::<LittleEndian>(fmt.bits_per_sample)?;

    // ---- bext chunk ----
    if let Some(bext) = bext {
        sink.write_all(BEXT_CHUNK_ID)?;
        sink.write_u32::<LittleEndian>(BEXT_CHUNK_SIZE as u32)?;
        bext.write_to(sink)?;
    }

    // ---- data chunk ----
    sink.write_all(DATA_CHUNK_ID)?;
    sink.write_u32::<LittleEndian>(audio_data_size)?;

    Ok(())
}
