pub mod error;
pub mod extended;
mod flags;
mod prelude;
pub mod riff;
pub mod uri;

use std::path::{Path, PathBuf};

use crate::prelude::*;

pub use error::{AddressError, RiffError, UriError};
pub use riff::{
    BlobReader, ChunkReader, FileReader, MmapReader, ParseFlags, RiffAudioFile, WavBextChunk,
    WavFmtChunk, parse_audio_file, write_wav_header,
};
pub use uri::{SchemeType, Uri, UriFlags, UriOptions};

pub fn debug_println(args: std::fmt::Arguments) {
    if cfg!(debug_assertions) {
        tracing::debug!("{}", args);
    }
}

// Helper macro to use it like println!
#[macro_export]
macro_rules! dprintln {
    ($($arg:tt)*) => {
        $crate::debug_println(format_args!($($arg)*))
    };
}

/// True for the external essence files the RIFF walker understands.
pub fn is_pcm_essence_path(path: impl AsRef<Path>) -> bool {
    let Some(extension) = path.as_ref().extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    matches!(
        extension.to_lowercase().as_str(),
        "wav" | "wave" | "aif" | "aiff" | "aifc"
    )
}

/// Memory-maps a WAV or AIFF file and reads its audio format fields.
pub fn probe_file(path: impl AsRef<Path>, flags: ParseFlags) -> R<RiffAudioFile> {
    let path = path.as_ref();

    if !is_pcm_essence_path(path) {
        return Err(anyhow!("Not a WAV or AIFF file: {}", path.display()));
    }

    let mut reader = MmapReader::open(path)
        .map_err(|e| anyhow!("Could not open {}: {}", path.display(), e))?;
    dprintln!("Probing {} ({} bytes)", path.display(), reader.as_bytes().len());

    let file = parse_audio_file(&mut reader, flags)
        .map_err(|e| anyhow!("Could not parse {}: {}", path.display(), e))?;
    Ok(file)
}

/// Probes many files in parallel. Results are in the order of `paths`.
pub fn probe_files(paths: &[PathBuf], flags: ParseFlags) -> Vec<R<RiffAudioFile>> {
    paths
        .par_iter() // One file per task
        .map(|path| probe_file(path, flags))
        .collect()
}
