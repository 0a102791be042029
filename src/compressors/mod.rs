//! # Compressor Strategies
//!
//! Una strategia per ogni `FileKind`, con dispatch su un enum chiuso.
//!
//! ## Responsabilità:
//! - Selezionare la strategia per il tipo di file (`Strategy::for_kind`)
//! - Eseguire la compressione scrivendo **solo** sul path di staging ricevuto
//! - Restituire un `CompressError` tipizzato in caso di fallimento
//!
//! Il commit dello staging sulla destinazione finale spetta all'orchestratore.
//!
//! ## Strategie:
//! - `Image`: ri-codifica JPEG/PNG in-process, HEIC → JPEG tramite decoder esterno
//! - `Pdf`: Ghostscript con il preset configurato
//! - `Document`: DOCX → PDF (LibreOffice), poi la strategia `Pdf`
//! - `OfficeGeneric`: repack del container ZIP con deflate massimo

pub mod document;
pub mod image;
pub mod office;
pub mod pdf;

use crate::batch::CompressionJob;
use crate::classifier::{FileKind, ImageFormat, OfficeFamily};
use crate::error::CompressError;
use crate::toolbox::Toolbox;
use std::path::Path;
use tracing::debug;

/// Compression procedure selected for a file kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Image(ImageFormat),
    Pdf,
    Document,
    OfficeGeneric(OfficeFamily),
}

impl Strategy {
    pub fn for_kind(kind: FileKind) -> Self {
        match kind {
            FileKind::Image(format) => Strategy::Image(format),
            FileKind::Pdf => Strategy::Pdf,
            FileKind::Document => Strategy::Document,
            FileKind::OfficeGeneric(family) => Strategy::OfficeGeneric(family),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Image(_) => "image",
            Strategy::Pdf => "pdf",
            Strategy::Document => "document",
            Strategy::OfficeGeneric(_) => "office",
        }
    }

    /// Compress `job.input` into `staging`
    pub async fn compress(&self, job: &CompressionJob, toolbox: &Toolbox, staging: &Path) -> Result<(), CompressError> {
        debug!("Compressing {} with {} strategy", job.input.display(), self.name());
        let settings = &job.settings;

        match *self {
            Strategy::Image(format) => image::compress(&job.input, format, settings, toolbox, staging).await,
            Strategy::Pdf => pdf::compress(&job.input, settings, toolbox, staging).await,
            Strategy::Document => document::compress(&job.input, settings, toolbox, staging).await,
            Strategy::OfficeGeneric(family) => office::compress(&job.input, family, settings, toolbox, staging).await,
        }
    }
}
