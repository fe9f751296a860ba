//! Loading of the content of your website: one [`Page`] per file of the source directory.
//!
//! Every file may start with a YAML front-matter block delimited by `---` lines:
//! ```md
//! ---
//! title: Hello World
//! layout: main
//! markdown: true
//! tags: [intro, news]
//! ---
//! # Hi {{page.title}}
//! ```
//! `title`, `permalink`, `layout` and `markdown` have a meaning for Tinsel, every other key ends up in [`Page::extra`]
//! and is available to templates like any other field of the page.
use std::{
    fs,
    path::{Path, PathBuf},
};

use glob::MatchOptions;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use serde_yaml::Value;

mod frontmatter;
pub mod markdown;

use crate::errors::ContentError;
pub use frontmatter::Fields;
pub(crate) use frontmatter::mapping_into_fields;
use frontmatter::{FieldsError, is_truthy, parse_fields, scalar_to_string, split_front_matter};
pub use markdown::render_markdown;

/// A single page of the website, loaded from a file of the source directory.
///
/// Serializes to the flat object templates see as `page` (and as the items of `site.pages`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// The `title` front-matter field, or the path of the file relative to the source directory, without its extension.
    pub title: String,
    /// The `permalink` front-matter field, or a slug of [`Page::title`].
    pub permalink: String,
    /// The body of the file, after its front-matter.
    pub content: String,
    /// Name of the layout the rendered page is wrapped in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// The `markdown` front-matter field, as written. Any truthy value sends the rendered page through Markdown before
    /// its layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<Value>,
    /// Every other front-matter field.
    #[serde(flatten)]
    pub extra: Fields,
    /// The file this page was loaded from.
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl Page {
    /// Builds a page from the raw text of a file, `name` being the path of the file relative to the source directory.
    pub fn parse(name: &str, raw: &str, source_path: impl Into<PathBuf>) -> Result<Self, ContentError> {
        let source_path = source_path.into();
        let (data, body) = split_front_matter(raw);

        let mut fields = match data.map(parse_fields).transpose() {
            Ok(fields) => fields.unwrap_or_default(),
            Err(FieldsError::Yaml(source)) => {
                return Err(ContentError::MalformedFrontMatter {
                    path: source_path,
                    source,
                });
            }
            Err(FieldsError::NotAMapping) => {
                return Err(ContentError::FrontMatterNotAMapping { path: source_path });
            }
        };

        let title = take_string(&mut fields, "title", &source_path)?
            .unwrap_or_else(|| title_from_name(name));

        let permalink = match take_string(&mut fields, "permalink", &source_path)? {
            Some(permalink) => permalink,
            None => {
                let permalink = permalink_from_title(&title);
                if permalink.is_empty() {
                    return Err(ContentError::EmptyPermalink {
                        path: source_path,
                        title,
                    });
                }
                permalink
            }
        };

        let layout = take_string(&mut fields, "layout", &source_path)?;
        let markdown = fields.remove("markdown");

        if fields.remove("content").is_some() {
            warn!(target: "content", "{} sets a `content` field in its front-matter, it is ignored in favor of the body of the file", source_path.display());
        }

        Ok(Self {
            title,
            permalink,
            content: body.to_string(),
            layout,
            markdown,
            extra: fields,
            source_path,
        })
    }

    /// Whether the rendered page should go through Markdown.
    pub fn is_markdown(&self) -> bool {
        self.markdown.as_ref().is_some_and(is_truthy)
    }
}

/// Removes a string field, treating empty strings and `null` as absent.
fn take_string(fields: &mut Fields, key: &str, path: &Path) -> Result<Option<String>, ContentError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match scalar_to_string(&value) {
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => Ok(Some(s)),
            None => Err(ContentError::InvalidField {
                path: path.to_path_buf(),
                key: key.to_string(),
            }),
        },
    }
}

/// The relative path of the file, without the extension of its last segment.
pub fn title_from_name(name: &str) -> String {
    let file_start = name.rfind('/').map_or(0, |i| i + 1);

    match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => name[..file_start + dot].to_string(),
        _ => name.to_string(),
    }
}

/// Lowercase, URL-safe slug of a title. Runs of anything but ASCII letters and digits become a single `-`.
pub fn permalink_from_title(title: &str) -> String {
    slug::slugify(title)
}

/// A file found under a content, partial or template directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SourceFile {
    /// Path relative to the directory, with `/` separators.
    pub name: String,
    pub path: PathBuf,
}

/// Lists every regular file under `root`, recursively, sorted by relative path. Hidden files are skipped.
///
/// A missing directory has no files.
pub(crate) fn list_files(root: &Path) -> Result<Vec<SourceFile>, ContentError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: true,
    };

    let entries = glob::glob_with(&pattern, options).map_err(|source| {
        ContentError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        }
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(ContentError::WalkFailed)?;
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(&path);
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(SourceFile { name, path });
    }

    files.sort();
    Ok(files)
}

/// Loads every file of `source_dir` as a [`Page`], in the order of their relative paths.
///
/// Files are read and parsed in parallel. The first unreadable or malformed file aborts the whole load.
pub fn load_pages(source_dir: &Path) -> Result<Vec<Page>, ContentError> {
    if !source_dir.is_dir() {
        warn!(target: "content", "Content directory {} does not exist, no pages will be generated", source_dir.display());
        return Ok(Vec::new());
    }

    let files = list_files(source_dir)?;

    files
        .par_iter()
        .map(|file| {
            let raw = fs::read_to_string(&file.path).map_err(|source| ContentError::ReadFailed {
                path: file.path.clone(),
                source,
            })?;

            let page = Page::parse(&file.name, &raw, &file.path)?;
            debug!(target: "content", "{} -> {}", file.name, page.permalink);

            Ok(page)
        })
        .collect()
}
