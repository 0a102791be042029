//! Image strategy: JPEG and HEIC become JPEG at the configured quality,
//! PNG is re-encoded losslessly.

use crate::classifier::ImageFormat;
use crate::config::Settings;
use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::toolbox::{EncodeTarget, Toolbox};
use std::path::Path;

pub async fn compress(
    input: &Path,
    format: ImageFormat,
    settings: &Settings,
    toolbox: &Toolbox,
    output: &Path,
) -> Result<(), CompressError> {
    let (data, target) = match format {
        ImageFormat::Jpeg => (FileManager::read_input(input).await?, EncodeTarget::Jpeg),
        ImageFormat::Png => (FileManager::read_input(input).await?, EncodeTarget::Png),
        ImageFormat::Heic => (toolbox.heic.decode(input).await?, EncodeTarget::Jpeg),
    };

    let encoded = toolbox.image.encode(data, target, settings.jpeg_quality).await?;
    FileManager::write_output(output, &encoded).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::toolbox::testing::{sample_jpeg, sample_png, Behavior, FakeToolbox};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_jpeg_is_reencoded() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.jpg");
        let output = temp_dir.path().join("out.jpg");
        std::fs::write(&input, sample_jpeg(96, 96, 100)).unwrap();

        let (toolbox, _) = FakeToolbox::default().build();
        compress(&input, ImageFormat::Jpeg, &Settings::default(), &toolbox, &output)
            .await
            .unwrap();

        let written = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), image::ImageFormat::Jpeg);
        assert!(written.len() as u64 <= std::fs::metadata(&input).unwrap().len());
    }

    #[tokio::test]
    async fn test_png_stays_png() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("b.png");
        let output = temp_dir.path().join("out.png");
        std::fs::write(&input, sample_png(32, 32)).unwrap();

        let (toolbox, _) = FakeToolbox::default().build();
        compress(&input, ImageFormat::Png, &Settings::default(), &toolbox, &output)
            .await
            .unwrap();

        assert_eq!(
            image::guess_format(&std::fs::read(&output).unwrap()).unwrap(),
            image::ImageFormat::Png
        );
    }

    #[tokio::test]
    async fn test_heic_goes_through_decoder_then_jpeg() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("c.heic");
        let output = temp_dir.path().join("out.jpg");
        std::fs::write(&input, b"ftypheic").unwrap();

        let (toolbox, calls) = FakeToolbox::default().build();
        compress(&input, ImageFormat::Heic, &Settings::default(), &toolbox, &output)
            .await
            .unwrap();

        assert_eq!(calls.heic(), 1);
        assert_eq!(
            image::guess_format(&std::fs::read(&output).unwrap()).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[tokio::test]
    async fn test_heic_without_decoder() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("c.heic");
        std::fs::write(&input, b"ftypheic").unwrap();

        let (toolbox, _) = FakeToolbox { heic: Behavior::Missing, ..Default::default() }.build();
        let err = compress(&input, ImageFormat::Heic, &Settings::default(), &toolbox, &temp_dir.path().join("o.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalToolMissing);
    }

    #[tokio::test]
    async fn test_corrupt_jpeg() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("broken.jpg");
        std::fs::write(&input, b"\xFF\xD8\xFF garbage").unwrap();

        let (toolbox, _) = FakeToolbox::default().build();
        let err = compress(&input, ImageFormat::Jpeg, &Settings::default(), &toolbox, &temp_dir.path().join("o.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
    }
}
