//! Typed errors for font discovery and registration.

use std::path::PathBuf;

/// Errors produced while scanning folders or registering font files.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The requested folder does not exist.
    #[error("folder not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The requested path exists but is not a folder.
    #[error("not a folder: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The folder listing itself failed.
    #[error("failed to read folder {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font file could not be read from disk.
    #[error("failed to read font file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but contains no face the registry could parse.
    #[error("no usable font face in {}", .0.display())]
    InvalidFont(PathBuf),
}

impl FontError {
    /// Whether the error concerns the requested folder rather than one file in it.
    pub fn is_folder_error(&self) -> bool {
        matches!(
            self,
            FontError::DirectoryNotFound(_) | FontError::NotADirectory(_) | FontError::ReadDir { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_errors_are_classified() {
        assert!(FontError::DirectoryNotFound(PathBuf::from("/nope")).is_folder_error());
        assert!(FontError::NotADirectory(PathBuf::from("/etc/hosts")).is_folder_error());
        assert!(!FontError::InvalidFont(PathBuf::from("bad.ttf")).is_folder_error());
    }

    #[test]
    fn test_display_names_path() {
        let err = FontError::InvalidFont(PathBuf::from("broken.otf"));
        assert_eq!(err.to_string(), "no usable font face in broken.otf");
    }
}
