use std::{collections::BTreeMap, fs, path::Path};

use handlebars::Handlebars;
use log::debug;

use crate::{content::list_files, errors::TemplateError, errors::TinselError};

const PARTIAL_EXTENSION: &str = ".hbs";

/// Named template fragments, usable from any page or layout with `{{> name}}`.
///
/// One registry is built per build, before any page is rendered, and handed to the [`PageRenderer`](super::PageRenderer).
#[derive(Debug, Default, Clone)]
pub struct PartialRegistry {
    partials: BTreeMap<String, String>,
}

impl PartialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every file under `dir`, named after its path relative to `dir` without the `.hbs` extension.
    ///
    /// e.g. `partials/nav/main.hbs` is available as `{{> nav/main}}`. A missing directory gives an empty registry.
    pub fn load(dir: &Path) -> Result<Self, TinselError> {
        let mut registry = Self::new();

        for file in list_files(dir)? {
            let template =
                fs::read_to_string(&file.path).map_err(|source| TemplateError::PartialReadFailed {
                    path: file.path.clone(),
                    source,
                })?;

            let name = partial_name(&file.name);
            debug!(target: "templates", "Registered partial `{}` from {}", name, file.path.display());
            registry.register(name, template);
        }

        Ok(registry)
    }

    /// Registers a partial, replacing any previous partial with the same name.
    pub fn register(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.partials.insert(name.into(), template.into());
    }

    /// The source of the partial registered under `name`, as it was read.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.partials.get(name).map(String::as_str)
    }

    /// Every registered partial name, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.partials.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Compiles every partial into the template engine.
    pub(crate) fn install(&self, engine: &mut Handlebars<'_>) -> Result<(), TemplateError> {
        for (name, template) in &self.partials {
            engine
                .register_partial(name, template)
                .map_err(|source| TemplateError::PartialCompileFailed {
                    name: name.clone(),
                    source: Box::new(source),
                })?;
        }

        Ok(())
    }
}

fn partial_name(relative_path: &str) -> &str {
    relative_path
        .strip_suffix(PARTIAL_EXTENSION)
        .unwrap_or(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_name() {
        assert_eq!(partial_name("header.hbs"), "header");
        assert_eq!(partial_name("nav/main.hbs"), "nav/main");
        assert_eq!(partial_name("footer.html"), "footer.html");
    }

    #[test]
    fn test_load_nested_partials() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("nav")).unwrap();
        fs::write(dir.path().join("header.hbs"), "<header>{{page.title}}</header>").unwrap();
        fs::write(dir.path().join("nav/main.hbs"), "<nav></nav>").unwrap();

        let registry = PartialRegistry::load(dir.path()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["header", "nav/main"]);
        assert_eq!(registry.get("nav/main"), Some("<nav></nav>"));
    }

    #[test]
    fn test_load_missing_directory() {
        let dir = TempDir::new().unwrap();

        let registry = PartialRegistry::load(&dir.path().join("partials")).unwrap();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_install_reports_invalid_partial() {
        let mut registry = PartialRegistry::new();
        registry.register("broken", "{{#each items}}never closed");

        let mut engine = Handlebars::new();
        let error = registry.install(&mut engine).unwrap_err();

        assert!(matches!(error, TemplateError::PartialCompileFailed { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_registries_are_independent() {
        let mut first = PartialRegistry::new();
        first.register("greeting", "hello");
        let second = PartialRegistry::new();

        assert_eq!(first.get("greeting"), Some("hello"));
        assert_eq!(second.get("greeting"), None);
    }
}
