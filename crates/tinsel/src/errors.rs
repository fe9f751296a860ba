//! Error types for Tinsel.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Rust's uses the Debug trait to show errors when they're returned from main
                    // But, thiserror uses the Display trait to show errors. This redirects Debug to Display, essentially.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

#[derive(Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {path}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Config file `{path}` must be a mapping of keys to values")]
    NotAMapping { path: PathBuf },
    #[error("Config is missing the required `public` key (the output directory)")]
    MissingOutputDir,
    #[error("Config key `{key}` must be a string path")]
    InvalidPath { key: String },
    #[error("Config key `{key}` is reserved for use by templates and cannot be set")]
    ReservedKey { key: String },
    #[error("Unknown value `{value}` for `permalink_collisions`, expected `warn` or `error`")]
    InvalidCollisionPolicy { value: String },
    #[error(
        "Refusing to use `{path}` as the output directory: it contains the project itself and would be wiped at the start of every build"
    )]
    UnsafeOutputDir { path: PathBuf },
}

#[derive(Error)]
pub enum ContentError {
    #[error("Invalid glob pattern for content directory: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Failed to list content files")]
    WalkFailed(#[source] glob::GlobError),
    #[error("Failed to read content file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed front-matter in {path}")]
    MalformedFrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Front-matter in {path} must be a mapping of keys to values")]
    FrontMatterNotAMapping { path: PathBuf },
    #[error("Front-matter key `{key}` in {path} must be a string")]
    InvalidField { path: PathBuf, key: String },
    #[error("Could not derive a permalink for {path} from the title `{title}`, set `permalink` explicitly")]
    EmptyPermalink { path: PathBuf, title: String },
}

#[derive(Error)]
pub enum TemplateError {
    #[error("Failed to read partial: {path}")]
    PartialReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Layout `{layout}` used by {page} must be a path inside the templates directory")]
    UnsafeLayoutName { layout: String, page: PathBuf },
    #[error("Failed to compile partial `{name}`")]
    PartialCompileFailed {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    #[error("Failed to read layout `{layout}` ({path}) used by {page}")]
    LayoutReadFailed {
        layout: String,
        path: PathBuf,
        page: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to compile layout `{layout}`")]
    LayoutCompileFailed {
        layout: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    #[error("Failed to render page {page}")]
    PageRenderFailed {
        page: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },
    #[error("Failed to render layout `{layout}` for page {page}")]
    LayoutRenderFailed {
        layout: String,
        page: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },
    #[error("Failed to build the template context")]
    ContextFailed(#[source] serde_json::Error),
}

#[derive(Error)]
pub enum BuildError {
    #[error("Failed to reset output directory: {path}")]
    ResetFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Static directory `{path}` is configured but does not exist")]
    StaticDirMissing { path: PathBuf },
    #[error("Failed to copy static file: {path}")]
    StaticCopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Permalink `{permalink}` of {page} points outside of the output directory")]
    UnsafePermalink { permalink: String, page: PathBuf },
    #[error("{first} and {second} both resolve to {path}")]
    PermalinkCollision {
        path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Failed to write page: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("A write task stopped before completing")]
    WriteTaskFailed(#[source] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum TinselError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl_debug_for_error!(ConfigError, ContentError, TemplateError, BuildError);
