//! Image payloads sent to the oracle and the digests stored in history.

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image_hasher::{HashAlg, HasherConfig};

const DEFAULT_MIME: &str = "image/jpeg";

/// An uploaded image, kept both as raw bytes and as a `data:` URI.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    mime: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn from_bytes(bytes: Vec<u8>, mime: impl Into<String>) -> Result<Self> {
        let mime = mime.into();
        if !mime.starts_with("image/") {
            bail!("Please upload an image file (got {mime})");
        }
        Ok(Self { mime, bytes })
    }

    /// Accepts a `data:<mime>;base64,<payload>` URI or bare base64, which is
    /// assumed to be JPEG.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let (mime, encoded) = match uri.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| anyhow!("data URI is missing its payload"))?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| anyhow!("only base64 data URIs are supported"))?;
                (mime.to_string(), payload)
            }
            None => (DEFAULT_MIME.to_string(), uri),
        };

        let bytes = STANDARD
            .decode(encoded.trim())
            .context("image payload is not valid base64")?;
        Self::from_bytes(bytes, mime)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Perceptual hash of the image, base64 encoded. History entries keep this
    /// instead of pixel data.
    pub fn digest(&self) -> Result<String> {
        let img = image::load_from_memory(&self.bytes).context("failed to decode image")?;
        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::DoubleGradient)
            .hash_size(8, 8)
            .to_hasher();

        let hash = hasher.hash_image(&img);
        Ok(hash.to_base64())
    }
}
