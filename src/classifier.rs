//! # File Classifier
//!
//! Determina il tipo semantico di un file a partire dall'estensione.
//!
//! ## Responsabilità:
//! - Mappa fissa estensione → `FileKind` (case-insensitive)
//! - Nessun I/O: funzione pura del path
//! - Estensioni sconosciute → `None` (unsupported), mai un errore
//!
//! ## Formati supportati:
//! - **Document**: DOCX
//! - **Pdf**: PDF
//! - **Image**: JPG, JPEG, PNG, HEIC
//! - **OfficeGeneric**: XLSX, XLS, PPTX, PPT

use std::path::Path;

/// Image encodings accepted as input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// Needs a decode step by an external tool before re-encoding
    Heic,
}

/// Office containers other than Word documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfficeFamily {
    Spreadsheet,
    Presentation,
}

impl OfficeFamily {
    /// Folder inside the container that holds embedded media
    pub fn media_prefix(&self) -> &'static str {
        match self {
            OfficeFamily::Spreadsheet => "xl/media/",
            OfficeFamily::Presentation => "ppt/media/",
        }
    }
}

/// Semantic kind of a supported input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Document,
    Pdf,
    Image(ImageFormat),
    OfficeGeneric(OfficeFamily),
}

const EXTENSIONS: &[(&str, FileKind)] = &[
    ("docx", FileKind::Document),
    ("pdf", FileKind::Pdf),
    ("jpg", FileKind::Image(ImageFormat::Jpeg)),
    ("jpeg", FileKind::Image(ImageFormat::Jpeg)),
    ("png", FileKind::Image(ImageFormat::Png)),
    ("heic", FileKind::Image(ImageFormat::Heic)),
    ("xlsx", FileKind::OfficeGeneric(OfficeFamily::Spreadsheet)),
    ("xls", FileKind::OfficeGeneric(OfficeFamily::Spreadsheet)),
    ("pptx", FileKind::OfficeGeneric(OfficeFamily::Presentation)),
    ("ppt", FileKind::OfficeGeneric(OfficeFamily::Presentation)),
];

/// Classify a path by its extension
pub fn classify(path: &Path) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, kind)| *kind)
}

pub fn is_supported(path: &Path) -> bool {
    classify(path).is_some()
}

/// Every extension the classifier recognises, lowercase and without the dot
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    EXTENSIONS.iter().map(|(ext, _)| *ext)
}

impl FileKind {
    /// Short label used in logs and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Pdf => "pdf",
            FileKind::Image(_) => "image",
            FileKind::OfficeGeneric(_) => "office",
        }
    }

    /// Extension of the compressed output for `input`
    pub fn output_extension(&self, input: &Path) -> String {
        match self {
            FileKind::Document => "pdf".to_string(),
            FileKind::Image(ImageFormat::Heic) => "jpg".to_string(),
            _ => input
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Whether the output has a different logical format than the input
    pub fn changes_format(&self) -> bool {
        matches!(self, FileKind::Document | FileKind::Image(ImageFormat::Heic))
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
