//! # Utility Functions Module
//!
//! Helpers for building external tool command lines without lossy
//! path-to-string conversions.

use std::ffi::OsString;
use std::path::Path;

/// Joins a flag prefix and a path into one argument, e.g. `-sOutputFile=/tmp/out.pdf`.
///
/// # Example
/// ```rust
/// use file_compressor::utils::prefixed_arg;
/// use std::path::Path;
///
/// let arg = prefixed_arg("-sOutputFile=", Path::new("/tmp/out.pdf"));
/// assert_eq!(arg, "-sOutputFile=/tmp/out.pdf");
/// ```
pub fn prefixed_arg(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path.as_os_str());
    arg
}

/// Last `max_chars` characters of a tool's stderr, trimmed, for error messages
pub fn tail_of_output(bytes: &[u8], max_chars: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    let count = text.chars().count();
    if count <= max_chars {
        text.to_string()
    } else {
        let tail: String = text.chars().skip(count - max_chars).collect();
        format!("…{}", tail)
    }
}

/// Builds a `Vec<OsString>` from mixed `&str`, `String`, `&Path` and `OsString` items.
///
/// # Example
/// ```rust
/// use file_compressor::args;
/// use std::path::Path;
///
/// let input = Path::new("/tmp/in.pdf");
/// let args = args!["-dBATCH", format!("-dPDFSETTINGS={}", "/screen"), input];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        vec![$(::std::ffi::OsString::from($item)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_prefixed_arg() {
        let arg = prefixed_arg("-sOutputFile=", Path::new("/tmp/dir with space/out.pdf"));
        assert_eq!(arg, OsString::from("-sOutputFile=/tmp/dir with space/out.pdf"));
    }

    #[test]
    fn test_args_macro_mixed_types() {
        let input = PathBuf::from("/tmp/in.docx");
        let result = args!["--headless", format!("--convert-to={}", "pdf"), input.as_path()];
        assert_eq!(
            result,
            vec![
                OsString::from("--headless"),
                OsString::from("--convert-to=pdf"),
                OsString::from("/tmp/in.docx"),
            ]
        );
    }

    #[test]
    fn test_args_macro_empty() {
        let result: Vec<OsString> = args![];
        assert!(result.is_empty());
    }

    #[test]
    fn test_tail_of_output() {
        assert_eq!(tail_of_output(b"  short error \n", 100), "short error");
        assert_eq!(tail_of_output(b"0123456789", 4), "…6789");
        assert_eq!(tail_of_output(b"", 10), "");
    }
}
