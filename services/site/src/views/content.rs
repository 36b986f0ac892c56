//! Post bodies: markdown (with inline HTML passed through) rendered by
//! pulldown-cmark, then sanitised by ammonia before it reaches the page.

use maud::{Markup, PreEscaped};
use pulldown_cmark::{html as md_html, Options, Parser};

pub(crate) fn render_body(content: &str) -> Markup {
    let parser = Parser::new_ext(content, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut body_html = String::with_capacity(content.len() * 3 / 2);
    md_html::push_html(&mut body_html, parser);
    PreEscaped(ammonia::clean(&body_html))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(content: &str) -> String {
        render_body(content).into_string()
    }

    #[test]
    fn headings_and_paragraphs() {
        let html = render("## Start with your GP\nA referral helps.\nIt is quick.\n\nSecond paragraph.");
        assert!(html.contains("<h2>Start with your GP</h2>"));
        assert!(html.contains("<p>A referral helps.\nIt is quick.</p>"));
        assert!(html.contains("<p>Second paragraph.</p>"));
    }

    #[test]
    fn deeper_headings_keep_their_text() {
        let html = render("#### Medication options\nStimulants are first line.");
        assert!(html.contains("<h4>Medication options</h4>"));
        assert!(html.contains("<p>Stimulants are first line.</p>"));
    }

    #[test]
    fn hash_prefixed_lines_stay_in_the_paragraph() {
        let html = render("Tips for school:\n#1 tip is routine\nKeep a planner.");
        assert!(html.contains("#1 tip is routine"));
        assert!(html.contains("Keep a planner."));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn html_content_is_rendered_not_escaped() {
        let html = render("<p>Read the <strong>guide</strong>.</p>");
        assert!(html.contains("<p>Read the <strong>guide</strong>.</p>"));
        assert!(!html.contains("&lt;p&gt;"));
    }

    #[test]
    fn links_are_rendered_and_unsafe_schemes_dropped() {
        let html = render("See [Medicare](https://www.servicesaustralia.gov.au) or [this](javascript:alert(1)).");
        assert!(html.contains("href=\"https://www.servicesaustralia.gov.au\""));
        assert!(html.contains(">Medicare</a>"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn bullet_blocks_become_lists() {
        let html = render("- School reports\n- GP referral");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>School reports</li>"));
        assert!(html.contains("<li>GP referral</li>"));
    }

    #[test]
    fn scripts_and_handlers_are_stripped() {
        let html = render("<script>alert(1)</script>\n\n<p onclick=\"steal()\">Hello</p>");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(!html.contains("onclick"));
        assert!(html.contains("Hello"));
    }
}
