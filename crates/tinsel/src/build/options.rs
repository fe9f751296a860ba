use std::{collections::BTreeMap, path::PathBuf};

/// Tinsel build options. Should be passed to [`generate()`](crate::generate()).
///
/// Usually loaded from a `tinsel.yml` file through [`load_config()`](crate::config::load_config), but can be built by hand.
///
/// ## Examples
/// Default values:
/// ```rs
/// use tinsel::{generate, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, tinsel::errors::TinselError> {
///   generate(BuildOptions::default())
/// }
/// ```
/// Custom values:
/// ```rs
/// use tinsel::{generate, BuildOptions, BuildOutput, CollisionPolicy};
///
/// fn main() -> Result<BuildOutput, tinsel::errors::TinselError> {
///   generate(BuildOptions {
///     output_dir: "dist".into(),
///     static_dir: Some("static".into()),
///     permalink_collisions: CollisionPolicy::Error,
///     ..Default::default()
///   })
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory the site is generated into. Removed and recreated at the start of every build.
    pub output_dir: PathBuf,

    /// Directory whose contents are copied verbatim into `output_dir` before pages are written.
    pub static_dir: Option<PathBuf>,

    /// Directory containing the content files, one page per file.
    pub source_dir: PathBuf,

    /// Directory containing layouts, referenced by name (without the `.hbs` extension) from a page's `layout` field.
    pub templates_dir: PathBuf,

    /// Directory containing partials. A missing directory simply means no partials.
    pub partials_dir: PathBuf,

    /// What to do when two pages resolve to the same output file.
    pub permalink_collisions: CollisionPolicy,

    /// Global template data, exposed to every template under `site` next to `site.pages`.
    ///
    /// When loaded from a config file, this is the whole config mapping.
    pub site_data: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Log a warning and keep the page that comes last in the page list.
    #[default]
    Warn,
    /// Abort the build.
    Error,
}

/// Provides default values for [`crate::generate()`], following the usual `src/`, `templates/`, `public/` project layout.
impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output_dir: "public".into(),
            static_dir: None,
            source_dir: "src".into(),
            templates_dir: "templates".into(),
            partials_dir: PathBuf::from("templates").join("partials"),
            permalink_collisions: CollisionPolicy::default(),
            site_data: BTreeMap::new(),
        }
    }
}

impl BuildOptions {
    /// Path of the layout template with the given name.
    pub fn layout_path(&self, layout: &str) -> PathBuf {
        self.templates_dir.join(format!("{}.hbs", layout))
    }
}
