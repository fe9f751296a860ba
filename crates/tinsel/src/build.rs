use std::{env, fs, path::Path, time::Instant};

use crate::{
    BuildOptions, BuildOutput,
    content::load_pages,
    errors::{BuildError, ConfigError, TinselError},
    logging::print_title,
    templating::{PageRenderer, PartialRegistry, SiteContext},
};
use colored::{ColoredString, Colorize};
use log::{info, trace};
use rayon::prelude::*;

use crate::logging::{FormatElapsedTimeOptions, format_elapsed_time};

pub mod metadata;
pub mod options;
pub mod output;
mod static_files;

use output::{OutputUnit, resolve_collisions, write_outputs};
use static_files::copy_recursively;

pub fn execute_build(
    options: &BuildOptions,
    async_runtime: &tokio::runtime::Runtime,
) -> Result<BuildOutput, TinselError> {
    async_runtime.block_on(async { build(options).await })
}

/// Runs a full build: reset the output directory, read static files, partials and pages, render every page, write.
///
/// Each phase only starts once the previous one is complete, and the first error aborts the build.
pub async fn build(options: &BuildOptions) -> Result<BuildOutput, TinselError> {
    let build_start = Instant::now();
    let mut build_metadata = BuildOutput::new(build_start);

    let route_format_options = FormatElapsedTimeOptions {
        additional_fn: Some(&|msg: ColoredString| {
            let formatted_msg = format!("(+{})", msg);
            if msg.fgcolor.is_none() {
                formatted_msg.dimmed()
            } else {
                formatted_msg.into()
            }
        }),
        ..Default::default()
    };

    let section_format_options = FormatElapsedTimeOptions {
        sec_red_threshold: 5,
        sec_yellow_threshold: 1,
        millis_red_threshold: None,
        millis_yellow_threshold: None,
        ..Default::default()
    };

    trace!(target: "build", "Setting up required directories...");
    reset_output_dir(options)?;

    info!(target: "build", "Output directory: {}", options.output_dir.display());

    if let Some(static_dir) = &options.static_dir {
        let assets_start = Instant::now();
        print_title("copying assets");

        if !static_dir.is_dir() {
            return Err(BuildError::StaticDirMissing {
                path: static_dir.clone(),
            }
            .into());
        }

        // Copy the static directory to the output directory, pages written later win over colliding files
        copy_recursively(static_dir, &options.output_dir, &mut build_metadata)?;

        info!(target: "assets", "{}", format!("{} static files copied in {}", build_metadata.static_files.len(), format_elapsed_time(assets_start.elapsed(), &FormatElapsedTimeOptions::default())).bold());
    }

    let content_start = Instant::now();
    print_title("loading content");

    let partials = PartialRegistry::load(&options.partials_dir)?;
    info!(target: "templates", "{} partials registered", partials.len());

    let pages = load_pages(&options.source_dir)?;
    info!(target: "content", "{}", format!("{} pages loaded in {}", pages.len(), format_elapsed_time(content_start.elapsed(), &section_format_options)).bold());

    print_title("generating pages");
    let pages_start = Instant::now();

    let context = SiteContext::new(&pages, &options.site_data)?;
    let mut renderer = PageRenderer::new(&partials, context)?;
    let layout_count = renderer.load_layouts(&pages, options)?;
    info!(target: "templates", "{} layouts compiled", layout_count);

    let outputs = pages
        .par_iter()
        .map(|page| -> Result<OutputUnit, TinselError> {
            let route_start = Instant::now();

            let content = renderer.render(page)?;
            let output = OutputUnit::new(&options.output_dir, page, content)?;

            info!(target: "pages", "{} -> {} {}", page.permalink, output.path.to_string_lossy().dimmed(), format_elapsed_time(route_start.elapsed(), &route_format_options));

            Ok(output)
        })
        .collect::<Result<Vec<_>, TinselError>>()?;

    let outputs = resolve_collisions(outputs, options.permalink_collisions)?;

    for output in &outputs {
        build_metadata.add_page(output.permalink.clone(), output.path.clone(), output.source_path.clone());
    }

    write_outputs(outputs).await?;

    info!(target: "pages", "{}", format!("generated {} pages in {}", build_metadata.pages.len(), format_elapsed_time(pages_start.elapsed(), &section_format_options)).bold());

    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "build", "{}", format!("Build completed in {}", format_elapsed_time(build_start.elapsed(), &section_format_options)).bold());

    Ok(build_metadata)
}

/// Removes the output directory and creates it again, empty.
fn reset_output_dir(options: &BuildOptions) -> Result<(), TinselError> {
    let output_dir = &options.output_dir;
    let reset_failed = |source: std::io::Error| BuildError::ResetFailed {
        path: output_dir.clone(),
        source,
    };

    if output_dir.exists() {
        ensure_output_dir_is_disposable(options)?;
        fs::remove_dir_all(output_dir).map_err(reset_failed)?;
    }

    fs::create_dir_all(output_dir).map_err(reset_failed)?;

    Ok(())
}

/// The output directory is wiped on every build, it must not contain the project's own files.
fn ensure_output_dir_is_disposable(options: &BuildOptions) -> Result<(), ConfigError> {
    let Ok(output_dir) = options.output_dir.canonicalize() else {
        return Ok(());
    };

    let current_dir = env::current_dir().ok();
    let protected: [Option<&Path>; 4] = [
        Some(options.source_dir.as_path()),
        Some(options.templates_dir.as_path()),
        options.static_dir.as_deref(),
        current_dir.as_deref(),
    ];

    for dir in protected.into_iter().flatten() {
        if let Ok(dir) = dir.canonicalize()
            && dir.starts_with(&output_dir)
        {
            return Err(ConfigError::UnsafeOutputDir {
                path: options.output_dir.clone(),
            });
        }
    }

    Ok(())
}
