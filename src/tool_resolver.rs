//! # Tool Path Resolver
//!
//! This module handles finding external tools in different environments:
//! - Bundled next to the application (`tools/` folder or `FILE_COMPRESSOR_TOOLS_DIR`)
//! - System-installed tools on `PATH`
//! - Well-known install locations (Homebrew, LibreOffice.app, Program Files)

use crate::error::CompressError;
use crate::platform::{SystemInfo, Tool};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the bundled tools directory
pub const TOOLS_DIR_ENV: &str = "FILE_COMPRESSOR_TOOLS_DIR";

/// Tool path resolver for different deployment environments
#[derive(Debug, Clone)]
pub struct ToolPathResolver {
    /// Directory where tools are bundled with the application
    tools_dir: Option<PathBuf>,
    /// Value of `PATH` searched for system tools
    search_path: Option<OsString>,
    /// Whether well-known install locations are consulted
    use_well_known: bool,
}

impl ToolPathResolver {
    /// Create a resolver for the running process
    pub fn new() -> Self {
        Self {
            tools_dir: Self::detect_bundled_tools_dir(),
            search_path: env::var_os("PATH"),
            use_well_known: true,
        }
    }

    /// Create a resolver that only looks in the given locations
    pub fn with_locations(tools_dir: Option<PathBuf>, search_path: Option<OsString>) -> Self {
        Self {
            tools_dir,
            search_path,
            use_well_known: false,
        }
    }

    /// Detect the bundled tools directory
    fn detect_bundled_tools_dir() -> Option<PathBuf> {
        if let Some(dir) = env::var_os(TOOLS_DIR_ENV) {
            let tools_path = PathBuf::from(dir);
            debug!("Checking {}: {:?}", TOOLS_DIR_ENV, tools_path);
            if tools_path.is_dir() {
                return Some(tools_path);
            }
            warn!("{} points to a missing directory: {}", TOOLS_DIR_ENV, tools_path.display());
        }

        let exe_path = env::current_exe().ok()?;
        let app_dir = exe_path.parent()?;
        let possible_paths = [
            app_dir.join("tools"),
            app_dir.join("resources").join("tools"),
            // macOS bundle: Contents/MacOS/<exe> -> Contents/Resources/tools
            app_dir.join("..").join("Resources").join("tools"),
        ];

        for path in &possible_paths {
            debug!("Checking bundled tools path: {:?}", path);
            if path.is_dir() {
                debug!("Found bundled tools directory: {:?}", path);
                return Some(path.clone());
            }
        }

        debug!("No bundled tools directory found");
        None
    }

    /// Resolve the path to a tool, trying each of its executable names
    pub fn resolve(&self, tool: Tool) -> Option<PathBuf> {
        for name in tool.executables() {
            if let Some(ref tools_dir) = self.tools_dir {
                if let Some(path) = Self::find_in_dir(tools_dir, name) {
                    debug!("Using bundled tool: {} -> {:?}", name, path);
                    return Some(path);
                }
            }

            if let Some(path) = self.find_in_system_path(name) {
                debug!("Using system tool: {} -> {:?}", name, path);
                return Some(path);
            }
        }

        if self.use_well_known {
            if let Some(path) = tool.well_known_paths().into_iter().find(|p| p.is_file()) {
                debug!("Using well-known install location: {} -> {:?}", tool, path);
                return Some(path);
            }
        }

        debug!("Tool not found: {}", tool);
        None
    }

    /// Resolve a tool or fail with installation instructions
    pub fn require(&self, tool: Tool) -> Result<PathBuf, CompressError> {
        self.resolve(tool).ok_or_else(|| CompressError::tool_missing(tool))
    }

    /// Look for `name` directly in `dir` or in a `dir/<name>/` subfolder
    fn find_in_dir(dir: &Path, name: &str) -> Option<PathBuf> {
        let file_name = format!("{}{}", name, env::consts::EXE_SUFFIX);
        [dir.join(&file_name), dir.join(name).join(&file_name)]
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Find tool in the search path
    fn find_in_system_path(&self, name: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        env::split_paths(search_path).find_map(|dir| Self::find_in_dir(&dir, name))
    }

    /// Get a report of tool availability
    pub fn tools_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Platform: {}\n", SystemInfo::current()));
        report.push_str(&format!("Bundled tools dir: {:?}\n", self.tools_dir));

        let groups = [
            ("PDF", vec![Tool::Ghostscript]),
            ("DOCX", vec![Tool::LibreOffice]),
            ("HEIC", vec![Tool::HeifConvert, Tool::ImageMagick, Tool::Sips]),
            ("Sound", vec![Tool::SoundPlayer]),
        ];

        for (category, tools) in groups {
            report.push_str(&format!("\n{}:\n", category));
            for tool in tools {
                match self.resolve(tool) {
                    Some(path) => report.push_str(&format!("  ✅ {} -> {}\n", tool, path.display())),
                    None => report.push_str(&format!("  ❌ {} (install with: {})\n", tool, tool.install_hint())),
                }
            }
        }

        report
    }
}

impl Default for ToolPathResolver {
    fn default() -> Self {
        Self::new()
    }
}
