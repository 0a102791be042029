//! # Platform-specific utilities
//!
//! Questo modulo centralizza la conoscenza cross-platform sui tool esterni:
//! nomi degli eseguibili per sistema operativo, percorsi di installazione
//! noti e istruzioni di installazione da mostrare all'utente.

use std::path::PathBuf;

/// External programs the compressors delegate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// PDF recompression (`gs`)
    Ghostscript,
    /// DOCX to PDF conversion (`soffice`)
    LibreOffice,
    /// HEIC decoding via libheif
    HeifConvert,
    /// HEIC decoding fallback
    ImageMagick,
    /// HEIC decoding on macOS
    Sips,
    /// Completion sound
    SoundPlayer,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Ghostscript,
        Tool::LibreOffice,
        Tool::HeifConvert,
        Tool::ImageMagick,
        Tool::Sips,
        Tool::SoundPlayer,
    ];

    /// Human readable name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Ghostscript => "Ghostscript",
            Tool::LibreOffice => "LibreOffice",
            Tool::HeifConvert => "heif-convert",
            Tool::ImageMagick => "ImageMagick",
            Tool::Sips => "sips",
            Tool::SoundPlayer => "sound player",
        }
    }

    /// Executable names to look for, in order of preference (without `.exe`)
    pub fn executables(&self) -> &'static [&'static str] {
        match self {
            Tool::Ghostscript if cfg!(windows) => &["gswin64c", "gswin32c", "gs"],
            Tool::Ghostscript => &["gs"],
            Tool::LibreOffice => &["soffice", "libreoffice"],
            Tool::HeifConvert => &["heif-convert", "heif-dec"],
            Tool::ImageMagick => &["magick", "convert"],
            Tool::Sips => &["sips"],
            Tool::SoundPlayer if cfg!(target_os = "macos") => &["afplay"],
            Tool::SoundPlayer if cfg!(windows) => &["powershell"],
            Tool::SoundPlayer => &["paplay", "canberra-gtk-play", "aplay"],
        }
    }

    /// Install locations checked when the tool is not on `PATH`
    pub fn well_known_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        match self {
            Tool::Ghostscript => {
                if cfg!(target_os = "macos") {
                    paths.push(PathBuf::from("/opt/homebrew/bin/gs"));
                    paths.push(PathBuf::from("/usr/local/bin/gs"));
                }
            }
            Tool::LibreOffice => {
                if cfg!(target_os = "macos") {
                    paths.push(PathBuf::from("/Applications/LibreOffice.app/Contents/MacOS/soffice"));
                } else if cfg!(windows) {
                    paths.push(PathBuf::from(r"C:\Program Files\LibreOffice\program\soffice.exe"));
                    paths.push(PathBuf::from(r"C:\Program Files (x86)\LibreOffice\program\soffice.exe"));
                }
            }
            Tool::HeifConvert | Tool::ImageMagick => {
                if cfg!(target_os = "macos") {
                    for name in self.executables() {
                        paths.push(PathBuf::from("/opt/homebrew/bin").join(name));
                    }
                }
            }
            Tool::Sips => {
                if cfg!(target_os = "macos") {
                    paths.push(PathBuf::from("/usr/bin/sips"));
                }
            }
            Tool::SoundPlayer => {}
        }
        paths
    }

    /// Installation instructions for the current platform
    pub fn install_hint(&self) -> String {
        let hint = if cfg!(target_os = "macos") {
            match self {
                Tool::Ghostscript => "brew install ghostscript",
                Tool::LibreOffice => "brew install --cask libreoffice",
                Tool::HeifConvert => "brew install libheif",
                Tool::ImageMagick => "brew install imagemagick",
                Tool::Sips => "bundled with macOS",
                Tool::SoundPlayer => "bundled with macOS",
            }
        } else if cfg!(windows) {
            match self {
                Tool::Ghostscript => "download from https://ghostscript.com/releases/",
                Tool::LibreOffice => "download from https://www.libreoffice.org/download/",
                Tool::HeifConvert => "install libheif via vcpkg or MSYS2",
                Tool::ImageMagick => "download from https://imagemagick.org/script/download.php",
                Tool::Sips => "not available on Windows",
                Tool::SoundPlayer => "bundled with Windows",
            }
        } else {
            match self {
                Tool::Ghostscript => "sudo apt-get install ghostscript",
                Tool::LibreOffice => "sudo apt-get install libreoffice-writer",
                Tool::HeifConvert => "sudo apt-get install libheif-examples",
                Tool::ImageMagick => "sudo apt-get install imagemagick",
                Tool::Sips => "not available on Linux",
                Tool::SoundPlayer => "sudo apt-get install pulseaudio-utils",
            }
        };
        hint.to_string()
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// System information structure
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl SystemInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            family: std::env::consts::FAMILY,
        }
    }
}

impl std::fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.os, self.arch, self.family)
    }
}
