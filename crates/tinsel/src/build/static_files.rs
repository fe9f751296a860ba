use std::{fs, path::Path};

use crate::{BuildOutput, errors::BuildError};

/// Copies the content of `source` into `destination`, merging with whatever is already there.
pub(crate) fn copy_recursively(
    source: &Path,
    destination: &Path,
    build_metadata: &mut BuildOutput,
) -> Result<(), BuildError> {
    let copy_failed = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| BuildError::StaticCopyFailed { path, source }
    };

    fs::create_dir_all(destination).map_err(copy_failed(destination))?;

    let mut entries = fs::read_dir(source)
        .map_err(copy_failed(source))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(copy_failed(source))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let source_path = entry.path();
        let destination_path = destination.join(entry.file_name());
        let filetype = entry.file_type().map_err(copy_failed(&source_path))?;

        if filetype.is_dir() {
            copy_recursively(&source_path, &destination_path, build_metadata)?;
        } else {
            fs::copy(&source_path, &destination_path).map_err(copy_failed(&source_path))?;
            build_metadata.add_static_file(destination_path, source_path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_recursively() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("img")).unwrap();
        fs::write(source.path().join("styles.css"), "body {}").unwrap();
        fs::write(source.path().join("img/logo.svg"), "<svg/>").unwrap();
        fs::write(destination.path().join("existing.txt"), "kept").unwrap();

        let mut metadata = BuildOutput::default();
        copy_recursively(source.path(), destination.path(), &mut metadata).unwrap();

        assert_eq!(
            fs::read_to_string(destination.path().join("styles.css")).unwrap(),
            "body {}"
        );
        assert_eq!(
            fs::read_to_string(destination.path().join("img/logo.svg")).unwrap(),
            "<svg/>"
        );
        assert!(destination.path().join("existing.txt").exists());
        assert_eq!(metadata.static_files.len(), 2);
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let destination = TempDir::new().unwrap();
        let mut metadata = BuildOutput::default();

        let error = copy_recursively(
            &destination.path().join("nope"),
            destination.path(),
            &mut metadata,
        )
        .unwrap_err();

        assert!(matches!(error, BuildError::StaticCopyFailed { .. }));
    }
}
