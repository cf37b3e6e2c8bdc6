use byteorder::{BigEndian, ByteOrder};

use super::{ChunkHeader, ChunkReader, Flow, ParseFlags, RiffAudioFile, read_body};
use crate::extended::extended_to_u32;

// Chunk Identifiers
const COMM_CHUNK_ID: &[u8; 4] = b"COMM";
const SSND_CHUNK_ID: &[u8; 4] = b"SSND";

// Chunk Structures
const COMM_CHUNK_SIZE: usize = 18; // channels + frames + bits + 80-bit rate
const SSND_PREAMBLE_SIZE: usize = 8; // offset + block size

pub(super) fn visit_chunk<R: ChunkReader + ?Sized>(
    reader: &mut R,
    chunk: &ChunkHeader,
    flags: ParseFlags,
    file: &mut RiffAudioFile,
) -> Flow {
    match &chunk.id {
        COMM_CHUNK_ID => {
            if (chunk.size as usize) < COMM_CHUNK_SIZE {
                tracing::warn!("COMM chunk is too small: {} bytes", chunk.size);
                return Flow::Stop;
            }

            let Some(comm) = read_body::<R, COMM_CHUNK_SIZE>(reader, chunk.body_offset()) else {
                return Flow::Stop;
            };

            let mut rate = [0u8; 10];
            rate.copy_from_slice(&comm[8..18]);

            file.channels = BigEndian::read_u16(&comm[0..2]);
            file.sample_count = u64::from(BigEndian::read_u32(&comm[2..6]));
            file.sample_size = BigEndian::read_u16(&comm[6..8]);
            file.sample_rate = extended_to_u32(rate);

            if flags.contains(ParseFlags::HEADER_ONLY) {
                return Flow::Stop;
            }
        }
        SSND_CHUNK_ID => {
            let Some(preamble) = read_body::<R, SSND_PREAMBLE_SIZE>(reader, chunk.body_offset())
            else {
                return Flow::Stop;
            };

            // Frames and start offset cover the sound bytes, not the chunk body:
            // the preamble and the offset padding are skipped. Block size (4..8)
            // is always zero in practice.
            let offset = BigEndian::read_u32(&preamble[0..4]);
            let sound_size = u64::from(chunk.size)
                .saturating_sub(SSND_PREAMBLE_SIZE as u64)
                .saturating_sub(u64::from(offset));

            if let Some(frames) = file.frames_in(sound_size) {
                if file.sample_count != 0 && file.sample_count != frames {
                    tracing::warn!(
                        "COMM announces {} frames but SSND holds {}, using SSND",
                        file.sample_count,
                        frames
                    );
                }
                file.sample_count = frames;
            }

            file.pcm_audio_start_offset =
                chunk.body_offset() + SSND_PREAMBLE_SIZE as u64 + u64::from(offset);

            if flags.contains(ParseFlags::AAF_SUMMARY) {
                return Flow::Stop;
            }
        }
        _ => {}
    }

    Flow::Continue
}
