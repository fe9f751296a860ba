#![cfg_attr(docsrs, feature(doc_cfg))]
//! Tinsel is a small static site generator using [Handlebars](https://handlebarsjs.com) templates.
//!
//! A site is a directory of content files, each one becoming a page at `<public>/<permalink>/index.html`, rendered
//! with access to every other page of the site. Content files can start with a YAML front-matter block:
//!
//! ```md
//! ---
//! title: About Us
//! layout: base
//! markdown: true
//! ---
//! # {{page.title}}
//!
//! {{> signature}}
//! ```
//!
//! Builds are usually run through the `tinsel` CLI, reading a `tinsel.yml` config file, but can also be started from
//! code with [`generate()`].

// Modules the end-user will interact directly or indirectly with
pub mod config;
pub mod content;
pub mod errors;
pub mod templating;

// Exports for end-users
pub use build::metadata::{BuildOutput, PageOutput, StaticAssetOutput};
pub use build::options::{BuildOptions, CollisionPolicy};
pub use build::output::output_path;

mod build;

// Internal modules
mod logging;

use build::execute_build;
use errors::TinselError;
use logging::init_logging;

/// The version of Tinsel being used.
///
/// ## Example
/// ```rs
/// use tinsel::GENERATOR;
///
/// format!("<meta name=\"generator\" content=\"{}\">", GENERATOR);
/// ```
pub const GENERATOR: &str = concat!("Tinsel v", env!("CARGO_PKG_VERSION"));

/// Tinsel entrypoint. Wipes the output directory, then generates every page of the site into it.
///
/// ## Example
/// ```rs
/// use tinsel::{config::load_config, generate, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   let options = load_config("tinsel.yml")?;
///   Ok(generate(options)?)
/// }
/// ```
pub fn generate(options: BuildOptions) -> Result<BuildOutput, TinselError> {
    init_logging();

    let async_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    execute_build(&options, &async_runtime)
}
