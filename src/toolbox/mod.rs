//! # Toolbox
//!
//! Interfacce strette verso le capacità esterne usate dai compressori.
//!
//! ## Responsabilità:
//! - `ImageEncoder`: ri-codifica bytes immagine (JPEG con qualità, PNG lossless)
//! - `HeicDecoder`: decodifica HEIC tramite tool esterno in bytes PNG
//! - `PdfRasterizer`: ricomprime un PDF con un preset Ghostscript
//! - `DocumentConverter`: converte DOCX → PDF con LibreOffice
//!
//! Le implementazioni reali stanno nei sottomoduli; i test sostituiscono
//! implementazioni fake senza dipendere dai binari installati.

mod ghostscript;
mod heif;
mod image_codec;
mod libreoffice;
mod process;

#[cfg(test)]
pub mod testing;

pub use ghostscript::Ghostscript;
pub use heif::HeifTools;
pub use image_codec::ImageCodec;
pub use libreoffice::LibreOffice;
pub use process::run_tool;

use crate::config::PdfPreset;
use crate::error::CompressError;
use crate::tool_resolver::ToolPathResolver;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Encoding produced by an [`ImageEncoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeTarget {
    /// Lossy, honours the quality setting
    Jpeg,
    /// Lossless, maximum compression
    Png,
}

#[async_trait]
pub trait ImageEncoder: Send + Sync {
    /// Decode `data` and re-encode it as `target`
    async fn encode(&self, data: Vec<u8>, target: EncodeTarget, quality: u8) -> Result<Vec<u8>, CompressError>;
}

#[async_trait]
pub trait HeicDecoder: Send + Sync {
    /// Decode a HEIC file into PNG bytes
    async fn decode(&self, input: &Path) -> Result<Vec<u8>, CompressError>;
}

#[async_trait]
pub trait PdfRasterizer: Send + Sync {
    /// Write a recompressed copy of `input` to `output`
    async fn rasterize(&self, input: &Path, output: &Path, preset: PdfPreset) -> Result<(), CompressError>;
}

#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert `input` to PDF inside `out_dir`, returning the produced file
    async fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, CompressError>;
}

/// The set of capabilities a batch runs with
#[derive(Clone)]
pub struct Toolbox {
    pub image: Arc<dyn ImageEncoder>,
    pub heic: Arc<dyn HeicDecoder>,
    pub pdf: Arc<dyn PdfRasterizer>,
    pub converter: Arc<dyn DocumentConverter>,
}

impl Toolbox {
    /// Capabilities backed by the `image` crate and the tools found by `resolver`
    pub fn system(resolver: Arc<ToolPathResolver>) -> Self {
        Self {
            image: Arc::new(ImageCodec),
            heic: Arc::new(HeifTools::new(resolver.clone())),
            pdf: Arc::new(Ghostscript::new(resolver.clone())),
            converter: Arc::new(LibreOffice::new(resolver)),
        }
    }
}

impl std::fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolbox").finish_non_exhaustive()
    }
}
