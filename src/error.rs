use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum VmBatchError {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config from {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {message}")]
    ExternalCommand { command: String, message: String },

    #[error("{message}")]
    #[diagnostic(help("{hint}"))]
    Libvirt { message: String, hint: String },

    #[error("domain '{name}' is already defined")]
    #[diagnostic(help("undefine it first with `virsh undefine {name}` or pick another name_prefix"))]
    DomainExists { name: String },

    #[error("prompt error: {message}")]
    Prompt { message: String },

    #[error("cancelled by user")]
    PromptCancelled,

    #[error("no scripted answer left for prompt '{prompt}'")]
    InputExhausted { prompt: String },
}
