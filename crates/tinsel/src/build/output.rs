use std::path::{Component, Path, PathBuf};

use log::warn;
use rustc_hash::FxHashMap;
use tokio::task::JoinSet;

use crate::{
    build::options::CollisionPolicy,
    content::Page,
    errors::BuildError,
};

/// A rendered page, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub path: PathBuf,
    pub content: String,
    pub(crate) permalink: String,
    pub(crate) source_path: PathBuf,
}

impl OutputUnit {
    pub(crate) fn new(output_dir: &Path, page: &Page, content: String) -> Result<Self, BuildError> {
        Ok(Self {
            path: output_path(output_dir, page)?,
            content,
            permalink: page.permalink.clone(),
            source_path: page.source_path.clone(),
        })
    }
}

/// `<output_dir>/<permalink>/index.html`. Leading and trailing slashes of the permalink are ignored, so a permalink of
/// `/` is the root `index.html`.
pub fn output_path(output_dir: &Path, page: &Page) -> Result<PathBuf, BuildError> {
    let mut path = output_dir.to_path_buf();

    for component in Path::new(&page.permalink).components() {
        match component {
            Component::Normal(segment) => path.push(segment),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                return Err(BuildError::UnsafePermalink {
                    permalink: page.permalink.clone(),
                    page: page.source_path.clone(),
                });
            }
        }
    }

    path.push("index.html");
    Ok(path)
}

/// Drops outputs that would be overwritten by a later output with the same path, following `policy`.
///
/// The page list order decides the winner, so the result doesn't depend on the order writes complete in.
pub(crate) fn resolve_collisions(
    outputs: Vec<OutputUnit>,
    policy: CollisionPolicy,
) -> Result<Vec<OutputUnit>, BuildError> {
    let (collisions, kept) = {
        let mut last_index_for_path: FxHashMap<&Path, usize> = FxHashMap::default();
        let mut collisions = Vec::new();

        for (index, output) in outputs.iter().enumerate() {
            if let Some(previous) = last_index_for_path.insert(&output.path, index) {
                collisions.push((previous, index));
            }
        }

        let mut kept: Vec<usize> = last_index_for_path.into_values().collect();
        kept.sort_unstable();
        (collisions, kept)
    };

    if collisions.is_empty() {
        return Ok(outputs);
    }

    for &(previous, current) in &collisions {
        let (first, second) = (&outputs[previous], &outputs[current]);

        match policy {
            CollisionPolicy::Error => {
                return Err(BuildError::PermalinkCollision {
                    path: second.path.clone(),
                    first: first.source_path.clone(),
                    second: second.source_path.clone(),
                });
            }
            CollisionPolicy::Warn => {
                warn!(target: "pages", "{} and {} both resolve to {}, keeping {}", first.source_path.display(), second.source_path.display(), second.path.display(), second.source_path.display());
            }
        }
    }

    let mut outputs: Vec<Option<OutputUnit>> = outputs.into_iter().map(Some).collect();
    Ok(kept
        .into_iter()
        .filter_map(|index| outputs[index].take())
        .collect())
}

/// Writes every output concurrently, creating parent directories as needed.
///
/// Every write runs to completion, even if others fail. The first failure, in output order, is returned.
pub(crate) async fn write_outputs(outputs: Vec<OutputUnit>) -> Result<(), BuildError> {
    let mut writes = JoinSet::new();

    for (index, output) in outputs.into_iter().enumerate() {
        writes.spawn(async move { (index, write_page_file(&output.path, output.content.as_bytes()).await) });
    }

    let mut failures = Vec::new();
    while let Some(result) = writes.join_next().await {
        match result {
            Ok((_, Ok(()))) => {}
            Ok((index, Err(error))) => failures.push((index, error)),
            Err(join_error) => failures.push((usize::MAX, BuildError::WriteTaskFailed(join_error))),
        }
    }

    match failures.into_iter().min_by_key(|(index, _)| *index) {
        Some((_, error)) => Err(error),
        None => Ok(()),
    }
}

async fn write_page_file(file_path: &Path, content: &[u8]) -> Result<(), BuildError> {
    let write_failed = |source: std::io::Error| BuildError::WriteFailed {
        path: file_path.to_path_buf(),
        source,
    };

    // Create the parent directories if they don't exist
    if let Some(parent_dir) = file_path.parent() {
        tokio::fs::create_dir_all(parent_dir)
            .await
            .map_err(write_failed)?;
    }

    tokio::fs::write(file_path, content).await.map_err(write_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn page(name: &str, permalink: &str) -> Page {
        Page::parse(
            name,
            &format!("---\npermalink: '{}'\n---\n", permalink),
            format!("src/{}", name),
        )
        .unwrap()
    }

    fn unit(output_dir: &Path, page: &Page, content: &str) -> OutputUnit {
        OutputUnit::new(output_dir, page, content.to_string()).unwrap()
    }

    #[test]
    fn test_output_path_convention() {
        let public = Path::new("public");

        assert_eq!(
            output_path(public, &page("about.md", "about")).unwrap(),
            PathBuf::from("public/about/index.html")
        );
        assert_eq!(
            output_path(public, &page("team.md", "/about/team/")).unwrap(),
            PathBuf::from("public/about/team/index.html")
        );
        assert_eq!(
            output_path(public, &page("index.md", "/")).unwrap(),
            PathBuf::from("public/index.html")
        );
    }

    #[test]
    fn test_output_path_rejects_parent_segments() {
        let error = output_path(Path::new("public"), &page("evil.md", "../../etc")).unwrap_err();

        assert!(matches!(error, BuildError::UnsafePermalink { .. }));
    }

    #[test]
    fn test_collisions_keep_last_page() {
        let public = Path::new("public");
        let outputs = vec![
            unit(public, &page("a.md", "same"), "first"),
            unit(public, &page("b.md", "other"), "other"),
            unit(public, &page("c.md", "same"), "second"),
        ];

        let resolved = resolve_collisions(outputs, CollisionPolicy::Warn).unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].content, "other");
        assert_eq!(resolved[1].content, "second");
    }

    #[test]
    fn test_collisions_can_be_fatal() {
        let public = Path::new("public");
        let outputs = vec![
            unit(public, &page("a.md", "same"), "first"),
            unit(public, &page("c.md", "/same/"), "second"),
        ];

        let error = resolve_collisions(outputs, CollisionPolicy::Error).unwrap_err();

        match error {
            BuildError::PermalinkCollision { first, second, .. } => {
                assert_eq!(first, PathBuf::from("src/a.md"));
                assert_eq!(second, PathBuf::from("src/c.md"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_no_collisions_is_untouched() {
        let public = Path::new("public");
        let outputs = vec![
            unit(public, &page("a.md", "a"), "a"),
            unit(public, &page("b.md", "b"), "b"),
        ];

        let resolved = resolve_collisions(outputs.clone(), CollisionPolicy::Error).unwrap();

        assert_eq!(resolved, outputs);
    }

    #[tokio::test]
    async fn test_write_outputs_creates_directories() {
        let dir = TempDir::new().unwrap();
        let outputs = vec![
            unit(dir.path(), &page("a.md", "about"), "about"),
            unit(dir.path(), &page("b.md", "blog/2024/hello"), "hello"),
        ];

        write_outputs(outputs).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("about/index.html")).unwrap(),
            "about"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("blog/2024/hello/index.html")).unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn test_write_outputs_overwrites_and_reports_failures() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("about")).unwrap();
        std::fs::write(dir.path().join("about/index.html"), "old").unwrap();
        // A file where a directory is needed makes the second write fail
        std::fs::write(dir.path().join("blocked"), "").unwrap();

        let outputs = vec![
            unit(dir.path(), &page("a.md", "about"), "new"),
            unit(dir.path(), &page("b.md", "blocked/page"), "never"),
        ];

        let error = write_outputs(outputs).await.unwrap_err();

        assert!(matches!(error, BuildError::WriteFailed { .. }));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("about/index.html")).unwrap(),
            "new"
        );
    }

    #[tokio::test]
    async fn test_write_outputs_reports_first_failure_in_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("blocked"), "").unwrap();

        let outputs = vec![
            unit(dir.path(), &page("a.md", "fine"), "fine"),
            unit(dir.path(), &page("b.md", "blocked/first"), "first"),
            unit(dir.path(), &page("c.md", "blocked/second"), "second"),
        ];

        let error = write_outputs(outputs).await.unwrap_err();

        match error {
            BuildError::WriteFailed { path, .. } => {
                assert_eq!(path, dir.path().join("blocked/first/index.html"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(dir.path().join("fine/index.html").exists());
    }
}
