//! QR code generation.

use std::path::{Path, PathBuf};

use qrcode::render::svg;
use qrcode::QrCode;

use crate::types::config::QrConfig;
use crate::{RetroError, RetroResult};

/// Encodes data as a QR code image on disk.
pub trait QrGenerator: Send + Sync {
    /// Writes the image and returns its path.
    fn generate(&self, data: &str) -> RetroResult<PathBuf>;
}

/// Renders QR codes as SVG files.
#[derive(Debug, Clone)]
pub struct SvgQrGenerator {
    output: PathBuf,
    min_dimension: u32,
}

impl SvgQrGenerator {
    /// Creates a generator writing to `output`.
    pub fn new(output: impl Into<PathBuf>, min_dimension: u32) -> Self {
        Self {
            output: output.into(),
            min_dimension,
        }
    }

    /// Creates a generator from the `[qr]` configuration.
    pub fn from_config(config: &QrConfig) -> Self {
        Self::new(config.output.clone(), config.min_dimension)
    }

    /// Path the image is written to.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl QrGenerator for SvgQrGenerator {
    fn generate(&self, data: &str) -> RetroResult<PathBuf> {
        if data.trim().is_empty() {
            return Err(RetroError::Qr("nothing to encode".to_string()));
        }

        let code = QrCode::new(data.as_bytes()).map_err(|e| RetroError::Qr(e.to_string()))?;
        let image = code
            .render()
            .min_dimensions(self.min_dimension, self.min_dimension)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.output, image)?;

        tracing::info!(path = %self.output.display(), bytes = data.len(), "QR code written");
        Ok(self.output.clone())
    }
}
