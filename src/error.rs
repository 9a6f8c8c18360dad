use miette::Diagnostic;
use thiserror::Error;

/// Main error type for postgen operations
#[derive(Error, Diagnostic, Debug)]
pub enum PostError {
    #[error("Invalid colour: {value}")]
    #[diagnostic(
        code(postgen::colour),
        help("Colours are 6 hex digits with an optional leading #, e.g. #0A66C2")
    )]
    InvalidColorFormat { value: String },

    #[error("Color scheme '{name}' not found")]
    #[diagnostic(code(postgen::scheme))]
    SchemeNotFound {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unknown dimension preset: {name}")]
    #[diagnostic(code(postgen::dimension))]
    UnknownDimensionPreset {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("Template '{name}' not found at {path}")]
    #[diagnostic(
        code(postgen::template),
        help("Run `postgen templates create-defaults` to seed the built-in templates")
    )]
    TemplateNotFound {
        name: String,
        path: std::path::PathBuf,
    },

    #[error("Canvas not created")]
    #[diagnostic(code(postgen::canvas), help("Call create_canvas() first"))]
    CanvasNotInitialized,

    #[error("No image to save")]
    #[diagnostic(code(postgen::canvas), help("Call create_canvas() before save()"))]
    NoCanvasToSave,

    #[error("Invalid argument: {message}")]
    #[diagnostic(code(postgen::argument))]
    InvalidArgument {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(postgen::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(postgen::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to encode {path}: {message}")]
    #[diagnostic(code(postgen::encode))]
    Encode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(postgen::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Network error: {message}")]
    #[diagnostic(code(postgen::network))]
    Network { message: String },
}

impl PostError {
    /// Shorthand for an [`PostError::InvalidArgument`] without help text.
    pub fn invalid(message: impl Into<String>) -> Self {
        PostError::InvalidArgument {
            message: message.into(),
            help: None,
        }
    }

    /// Whether the error was caused by the caller's configuration rather
    /// than by the environment. The HTTP layer maps these to 4xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PostError::InvalidColorFormat { .. }
                | PostError::SchemeNotFound { .. }
                | PostError::UnknownDimensionPreset { .. }
                | PostError::TemplateNotFound { .. }
                | PostError::InvalidArgument { .. }
                | PostError::Parse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(PostError::InvalidColorFormat {
            value: "#12".to_string()
        }
        .is_client_error());
        assert!(PostError::invalid("bad spacing").is_client_error());
        assert!(!PostError::CanvasNotInitialized.is_client_error());
        assert!(!PostError::Network {
            message: "timeout".to_string()
        }
        .is_client_error());
    }

    #[test]
    fn test_messages() {
        let err = PostError::SchemeNotFound {
            name: "nope".to_string(),
            help: None,
        };
        assert_eq!(err.to_string(), "Color scheme 'nope' not found");
        assert_eq!(PostError::NoCanvasToSave.to_string(), "No image to save");
    }
}
