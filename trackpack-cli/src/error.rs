//! Error handling for trackpack CLI

use std::path::PathBuf;
use thiserror::Error;
use trackpack_core::LayoutError;

/// Main error type for trackpack CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Invalid region '{region}': {message}")]
    Region { region: String, message: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn parse<S: Into<String>, M: Into<String>>(file: S, message: M) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn region<S: Into<String>, M: Into<String>>(region: S, message: M) -> Self {
        Self::Region {
            region: region.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Track paths in trackpack.toml are relative to the working directory",
                path.display()
            ));
        }

        CliError::Region { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Use the form chrom:start-end, e.g. chr1:10,000-20,000\n\
                 • Positions are 1-based and inclusive; k and M suffixes are accepted",
            );
        }

        CliError::Config { .. } | CliError::Layout(_) => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your trackpack.toml configuration file\n\
                 • Use 'trackpack config --example' to generate a sample configuration\n\
                 • Row heights and cells_per_row must be at least 1",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("genes.bed"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_layout_error_conversion() {
        let err: CliError = LayoutError::ZeroCells.into();
        assert!(matches!(err, CliError::Layout(_)));
        assert!(format_error_with_suggestions(&err).contains("trackpack.toml"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }
}
