//! Magic-byte audio sniffing.
//!
//! Classification trusts leading bytes only, never a URL extension or a
//! declared content type. Only audio formats get a positive answer; images,
//! text and anything unrecognized all come back as None.

/// A positively identified audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SniffedType {
    /// Extension used for the persisted file.
    pub ext: &'static str,
    /// MIME tag for the format.
    pub mime: &'static str,
}

const MP3: SniffedType = SniffedType { ext: "mp3", mime: "audio/mpeg" };
const FLAC: SniffedType = SniffedType { ext: "flac", mime: "audio/flac" };
const OGG: SniffedType = SniffedType { ext: "ogg", mime: "audio/ogg" };
const WAV: SniffedType = SniffedType { ext: "wav", mime: "audio/wav" };
const M4A: SniffedType = SniffedType { ext: "m4a", mime: "audio/mp4" };
const AIFF: SniffedType = SniffedType { ext: "aiff", mime: "audio/aiff" };
const AMR: SniffedType = SniffedType { ext: "amr", mime: "audio/amr" };
const MIDI: SniffedType = SniffedType { ext: "mid", mime: "audio/midi" };

/// Classify a leading buffer as a known audio format.
pub fn sniff_audio(header: &[u8]) -> Option<SniffedType> {
    if header.len() < 4 {
        return None;
    }

    // MP3 with an ID3v2 tag.
    if header.starts_with(b"ID3") {
        return Some(MP3);
    }

    // Bare MPEG audio frame sync (MPEG-1/2 layer III).
    if header[0] == 0xFF && matches!(header[1], 0xFB | 0xFA | 0xF3 | 0xF2 | 0xE3 | 0xE2) {
        return Some(MP3);
    }

    if header.starts_with(b"fLaC") {
        return Some(FLAC);
    }

    if header.starts_with(b"OggS") {
        return Some(OGG);
    }

    // RIFF container; only the WAVE form is audio (AVI shares the prefix).
    if header.starts_with(b"RIFF") && header.len() >= 12 && &header[8..12] == b"WAVE" {
        return Some(WAV);
    }

    if header.starts_with(b"FORM") && header.len() >= 12 && &header[8..12] == b"AIFF" {
        return Some(AIFF);
    }

    // ISO base media: audio-only brands of the ftyp box.
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        let brand = &header[8..12];
        if brand == b"M4A " || brand == b"M4B " {
            return Some(M4A);
        }
        return None;
    }

    if header.starts_with(b"#!AMR") {
        return Some(AMR);
    }

    if header.starts_with(b"MThd") {
        return Some(MIDI);
    }

    None
}
