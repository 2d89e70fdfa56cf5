//! Generated media: illustrations and narration audio.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use masal_error::{MasalResult, PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize};

/// Base URL of the blurred stock image used when illustration fails.
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://picsum.photos/512/512?blur=2&random=";

/// Reference to an illustration.
///
/// Either an inline `data:` URI carrying the generated image, or a remote URL
/// (used by placeholders).
///
/// # Examples
///
/// ```
/// use masal_core::ImageRef;
///
/// let image = ImageRef::inline("image/png", "iVBORw0KGgo=");
/// assert_eq!(image.as_str(), "data:image/png;base64,iVBORw0KGgo=");
/// assert_eq!(image.inline_data(), Some(("image/png", "iVBORw0KGgo=")));
///
/// let fallback = ImageRef::placeholder();
/// assert!(fallback.is_placeholder());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap base64 image bytes as a `data:` URI.
    pub fn inline(mime: &str, base64_data: &str) -> Self {
        Self(format!("data:{};base64,{}", mime, base64_data))
    }

    /// Reference a remote image.
    pub fn remote(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// A fresh placeholder image; the random suffix defeats caching.
    pub fn placeholder() -> Self {
        Self(format!("{}{}", PLACEHOLDER_IMAGE_BASE, uuid::Uuid::new_v4()))
    }

    /// The reference as a string usable in an `<img src>`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns true if this is a fallback placeholder rather than a generated image.
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_IMAGE_BASE)
    }

    /// Split an inline reference into `(mime, base64)`.
    pub fn inline_data(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix("data:")?;
        let (mime, data) = rest.split_once(";base64,")?;
        Some((mime, data))
    }
}

/// Narration audio as returned by speech synthesis.
///
/// The payload is base64 of raw little-endian PCM at a fixed format
/// ([`AudioPayload::SAMPLE_RATE`], mono, 16-bit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioPayload(String);

impl AudioPayload {
    /// Sample rate of synthesized speech in Hz.
    pub const SAMPLE_RATE: u32 = 24_000;
    /// Channel count of synthesized speech.
    pub const CHANNELS: u16 = 1;
    /// Bits per sample of synthesized speech.
    pub const BITS_PER_SAMPLE: u16 = 16;

    /// Wrap base64 PCM.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    /// The base64 payload.
    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Consume into the base64 string.
    pub fn into_base64(self) -> String {
        self.0
    }

    /// Decode the raw PCM bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn decode_pcm(&self) -> MasalResult<Vec<u8>> {
        STANDARD.decode(self.0.trim()).map_err(|e| {
            PipelineError::new(PipelineErrorKind::InvalidMedia(format!(
                "audio is not valid base64: {}",
                e
            )))
            .into()
        })
    }

    /// Package the PCM as a WAV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    ///
    /// # Examples
    ///
    /// ```
    /// use masal_core::AudioPayload;
    ///
    /// // Two silent samples.
    /// let audio = AudioPayload::from_base64("AAAAAA==");
    /// let wav = audio.to_wav().unwrap();
    /// assert_eq!(&wav[0..4], b"RIFF");
    /// assert_eq!(wav.len(), 44 + 4);
    /// ```
    pub fn to_wav(&self) -> MasalResult<Vec<u8>> {
        let pcm = self.decode_pcm()?;
        Ok(wav_from_pcm(
            &pcm,
            Self::SAMPLE_RATE,
            Self::CHANNELS,
            Self::BITS_PER_SAMPLE,
        ))
    }
}

/// Prefix raw PCM with a canonical 44-byte RIFF/WAVE header.
fn wav_from_pcm(pcm: &[u8], sample_rate: u32, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_describes_mono_16bit_24khz() {
        let wav = wav_from_pcm(&[0u8; 8], 24_000, 1, 16);

        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 36 + 8);
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
        assert_eq!(
            u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
            24_000
        );
        assert_eq!(
            u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]),
            48_000
        );
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 8);
    }

    #[test]
    fn invalid_base64_is_an_error() {
        let audio = AudioPayload::from_base64("not base64!!");
        assert!(audio.to_wav().is_err());
    }
}
