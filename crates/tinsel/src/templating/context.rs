use serde::Serialize;
use serde_json::Value;

use crate::{
    content::{Fields, Page},
    errors::TemplateError,
};

/// Builds the data templates are rendered against.
///
/// The `site` object (every page, plus the global site data) is serialized once per build and shared by every page.
#[derive(Debug, Clone)]
pub struct SiteContext {
    site: Value,
}

#[derive(Serialize)]
struct Site<'a> {
    pages: &'a [Page],
    #[serde(flatten)]
    data: &'a Fields,
}

/// The data a single page, or its layout, is rendered against.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    pub site: &'a Value,
    pub page: &'a Page,
    /// The rendered body of the page. Only set for layouts, where `page.content` is still the raw, unrendered body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

impl SiteContext {
    pub fn new(pages: &[Page], site_data: &Fields) -> Result<Self, TemplateError> {
        let site = serde_json::to_value(Site {
            pages,
            data: site_data,
        })
        .map_err(TemplateError::ContextFailed)?;

        Ok(Self { site })
    }

    /// The serialized `site` object every template sees: `site.pages` plus the global site data.
    pub fn site(&self) -> &Value {
        &self.site
    }

    /// `{ site, page }`, for the body of a page.
    pub fn page_context<'a>(&'a self, page: &'a Page) -> PageContext<'a> {
        PageContext {
            site: &self.site,
            page,
            content: None,
        }
    }

    /// `{ site, page, content }`, for the layout of a page.
    pub fn layout_context<'a>(&'a self, page: &'a Page, content: &'a str) -> PageContext<'a> {
        PageContext {
            site: &self.site,
            page,
            content: Some(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<Page> {
        vec![
            Page::parse("index.md", "---\ntitle: Home\npermalink: /\n---\nhome", "src/index.md").unwrap(),
            Page::parse("about.md", "---\nauthor: Jane\n---\nabout", "src/about.md").unwrap(),
        ]
    }

    #[test]
    fn test_site_contains_pages_and_data() {
        let pages = pages();
        let mut data = Fields::new();
        data.insert("name".into(), "My Site".into());
        data.insert("public".into(), "public".into());

        let context = SiteContext::new(&pages, &data).unwrap();
        let site = context.site();

        assert_eq!(site["name"], "My Site");
        assert_eq!(site["public"], "public");
        assert_eq!(site["pages"].as_array().unwrap().len(), 2);
        assert_eq!(site["pages"][0]["title"], "Home");
        assert_eq!(site["pages"][1]["author"], "Jane");
    }

    #[test]
    fn test_page_context_has_no_content() {
        let pages = pages();
        let context = SiteContext::new(&pages, &Fields::new()).unwrap();

        let value = serde_json::to_value(context.page_context(&pages[1])).unwrap();

        assert_eq!(value["page"]["title"], "about");
        assert_eq!(value["page"]["content"], "about");
        assert!(value.get("content").is_none());
        assert!(value["site"]["pages"].is_array());
    }

    #[test]
    fn test_layout_context_has_rendered_content() {
        let pages = pages();
        let context = SiteContext::new(&pages, &Fields::new()).unwrap();

        let value = serde_json::to_value(context.layout_context(&pages[0], "<p>home</p>")).unwrap();

        assert_eq!(value["content"], "<p>home</p>");
        assert_eq!(value["page"]["content"], "home");
    }
}
