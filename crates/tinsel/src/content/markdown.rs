use pulldown_cmark::{Options, Parser, html};

/// Render Markdown to HTML.
///
/// CommonMark, plus tables, strikethrough and task lists. Raw HTML in the input is passed through untouched, which
/// matters here since the input is the output of the page's template and may already contain markup.
///
/// ## Example
/// ```rs
/// use tinsel::content::render_markdown;
///
/// assert_eq!(render_markdown("**bold**"), "<p><strong>bold</strong></p>\n");
/// ```
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options);

    let mut html_output = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut html_output, parser);

    html_output
}
