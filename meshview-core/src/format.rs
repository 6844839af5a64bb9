/// Format dispatch and STL encoding detection
use std::io;

use crate::error::LoadError;

/// Model formats recognized by the load pipeline, decided once at
/// dispatch time from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Stl,
    Obj,
}

impl ModelFormat {
    /// Derive the format from the substring after the final `.` in the
    /// path. Pure string inspection; performs no I/O.
    pub fn from_path(path: &str) -> Result<Self, LoadError> {
        let extension = path.rsplit('.').next().unwrap_or("");
        match extension.to_ascii_lowercase().as_str() {
            "stl" => Ok(Self::Stl),
            "obj" => Ok(Self::Obj),
            _ => Err(LoadError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }
}

/// Encoding of an STL file, sniffed from its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlEncoding {
    Ascii,
    Binary,
}

impl StlEncoding {
    /// Classify STL bytes as ASCII if the first line (up to and including
    /// the first `\n`, or the whole input when none is present) starts
    /// with `solid`, case-insensitively; binary otherwise. A zero-byte
    /// file cannot be classified.
    ///
    /// Known limitation: a binary STL whose 80-byte header happens to
    /// begin with "solid" text is misclassified as ASCII and will fail
    /// to parse. The first line is the only signal this sniff uses.
    pub fn detect(data: &[u8]) -> Result<Self, LoadError> {
        if data.is_empty() {
            return Err(LoadError::Detect(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no first line to classify",
            )));
        }

        let line_end = data
            .iter()
            .position(|&byte| byte == b'\n')
            .map(|index| index + 1)
            .unwrap_or(data.len());
        let first_line = String::from_utf8_lossy(&data[..line_end]);

        if first_line.to_ascii_lowercase().starts_with("solid") {
            Ok(Self::Ascii)
        } else {
            Ok(Self::Binary)
        }
    }
}
