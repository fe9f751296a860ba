//! Rendering of pages with [Handlebars](https://handlebarsjs.com) templates.
//!
//! Every page's body is itself a template, rendered against `{ site, page }`. It can then go through Markdown and be
//! wrapped in a layout from the templates directory, rendered against `{ site, page, content }`.
use std::{
    fs,
    path::{Component, Path},
};

use handlebars::Handlebars;
use log::debug;

mod context;
mod partials;

pub use context::{PageContext, SiteContext};
pub use partials::PartialRegistry;

use crate::{
    BuildOptions,
    content::{Page, render_markdown},
    errors::TemplateError,
};

/// Layouts share the engine's template namespace with partials, this keeps them apart.
const LAYOUT_PREFIX: &str = "layout:";

fn layout_key(layout: &str) -> String {
    format!("{}{}", LAYOUT_PREFIX, layout)
}

/// Whether `layout` only has plain segments, so joining it onto the templates directory stays inside it.
fn is_contained(layout: &str) -> bool {
    Path::new(layout)
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
}

/// Renders pages to their final content.
///
/// Layouts are compiled once, by [`PageRenderer::load_layouts`], and reused by every page that uses them.
pub struct PageRenderer {
    engine: Handlebars<'static>,
    context: SiteContext,
}

impl PageRenderer {
    pub fn new(partials: &PartialRegistry, context: SiteContext) -> Result<Self, TemplateError> {
        let mut engine = Handlebars::new();
        partials.install(&mut engine)?;

        Ok(Self { engine, context })
    }

    /// Reads and compiles every layout used by `pages`. Each layout file is read once.
    ///
    /// A page referencing a layout that doesn't exist fails here, naming the page.
    pub fn load_layouts(&mut self, pages: &[Page], options: &BuildOptions) -> Result<usize, TemplateError> {
        let mut loaded = 0;

        for page in pages {
            let Some(layout) = &page.layout else {
                continue;
            };

            let key = layout_key(layout);
            if self.engine.has_template(&key) {
                continue;
            }

            if !is_contained(layout) {
                return Err(TemplateError::UnsafeLayoutName {
                    layout: layout.clone(),
                    page: page.source_path.clone(),
                });
            }

            let path = options.layout_path(layout);
            let template = fs::read_to_string(&path).map_err(|source| TemplateError::LayoutReadFailed {
                layout: layout.clone(),
                path: path.clone(),
                page: page.source_path.clone(),
                source,
            })?;

            self.engine
                .register_template_string(&key, template)
                .map_err(|source| TemplateError::LayoutCompileFailed {
                    layout: layout.clone(),
                    source: Box::new(source),
                })?;

            debug!(target: "templates", "Compiled layout `{}` from {}", layout, path.display());
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Renders the page's body as a template, then through Markdown if the page asks for it, then through its layout.
    pub fn render(&self, page: &Page) -> Result<String, TemplateError> {
        let mut rendered = self
            .engine
            .render_template(&page.content, &self.context.page_context(page))
            .map_err(|source| TemplateError::PageRenderFailed {
                page: page.source_path.clone(),
                source: Box::new(source),
            })?;

        if page.is_markdown() {
            rendered = render_markdown(&rendered);
        }

        if let Some(layout) = &page.layout {
            rendered = self
                .engine
                .render(&layout_key(layout), &self.context.layout_context(page, &rendered))
                .map_err(|source| TemplateError::LayoutRenderFailed {
                    layout: layout.clone(),
                    page: page.source_path.clone(),
                    source: Box::new(source),
                })?;
        }

        Ok(rendered)
    }
}
