//! Fake capabilities and sample fixtures for tests.

use super::{DocumentConverter, HeicDecoder, ImageCodec, PdfRasterizer, Toolbox};
use crate::config::PdfPreset;
use crate::error::CompressError;
use crate::platform::Tool;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageOutputFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% recompressed\n%%EOF\n";

/// How a fake tool behaves when called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    Missing,
    Fail,
    /// Never finishes
    Hang,
}

/// Call counters shared by the fakes of one toolbox
#[derive(Debug, Default)]
pub struct Calls {
    pub pdf: AtomicUsize,
    pub convert: AtomicUsize,
    pub heic: AtomicUsize,
}

impl Calls {
    pub fn pdf(&self) -> usize {
        self.pdf.load(Ordering::SeqCst)
    }

    pub fn convert(&self) -> usize {
        self.convert.load(Ordering::SeqCst)
    }

    pub fn heic(&self) -> usize {
        self.heic.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.pdf() + self.convert() + self.heic()
    }
}

async fn outcome(tool: Tool, behavior: Behavior) -> Result<(), CompressError> {
    match behavior {
        Behavior::Succeed => Ok(()),
        Behavior::Hang => {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok(())
        }
        Behavior::Missing => Err(CompressError::tool_missing(tool)),
        Behavior::Fail => Err(CompressError::tool_failed(tool, "exited with exit status: 1")),
    }
}

pub struct FakePdf {
    calls: Arc<Calls>,
    behavior: Behavior,
}

#[async_trait]
impl PdfRasterizer for FakePdf {
    async fn rasterize(&self, _input: &Path, output: &Path, _preset: PdfPreset) -> Result<(), CompressError> {
        self.calls.pdf.fetch_add(1, Ordering::SeqCst);
        outcome(Tool::Ghostscript, self.behavior).await?;
        tokio::fs::write(output, FAKE_PDF).await?;
        Ok(())
    }
}

pub struct FakeConverter {
    calls: Arc<Calls>,
    behavior: Behavior,
}

#[async_trait]
impl DocumentConverter for FakeConverter {
    async fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, CompressError> {
        self.calls.convert.fetch_add(1, Ordering::SeqCst);
        outcome(Tool::LibreOffice, self.behavior).await?;
        let produced = super::LibreOffice::expected_output(input, out_dir);
        tokio::fs::write(&produced, b"%PDF-1.7\nconverted\n%%EOF\n").await?;
        Ok(produced)
    }
}

pub struct FakeHeic {
    calls: Arc<Calls>,
    behavior: Behavior,
}

#[async_trait]
impl HeicDecoder for FakeHeic {
    async fn decode(&self, _input: &Path) -> Result<Vec<u8>, CompressError> {
        self.calls.heic.fetch_add(1, Ordering::SeqCst);
        outcome(Tool::HeifConvert, self.behavior).await?;
        Ok(sample_png(24, 24))
    }
}

/// Toolbox with the real image codec and fake external tools
pub struct FakeToolbox {
    pub pdf: Behavior,
    pub convert: Behavior,
    pub heic: Behavior,
}

impl Default for FakeToolbox {
    fn default() -> Self {
        Self {
            pdf: Behavior::Succeed,
            convert: Behavior::Succeed,
            heic: Behavior::Succeed,
        }
    }
}

impl FakeToolbox {
    pub fn build(self) -> (Toolbox, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let toolbox = Toolbox {
            image: Arc::new(ImageCodec),
            heic: Arc::new(FakeHeic { calls: calls.clone(), behavior: self.heic }),
            pdf: Arc::new(FakePdf { calls: calls.clone(), behavior: self.pdf }),
            converter: Arc::new(FakeConverter { calls: calls.clone(), behavior: self.convert }),
        };
        (toolbox, calls)
    }
}

/// Noisy gradient so that encoders have something to compress
fn sample_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let noise = ((x * 31 + y * 17) ^ (x * y)) % 64;
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            (noise * 4) as u8,
            if (x + y) % 7 == 0 { 128 } else { 255 },
        ])
    })
}

pub fn sample_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let rgb = image::DynamicImage::ImageRgba8(sample_image(width, height)).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
        .unwrap();
    out
}

pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(sample_image(width, height))
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}
