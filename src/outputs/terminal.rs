//! Plain-text rendering of the feed.
//!
//! Articles are printed as cards; failures as an error panel with the
//! remediation tip and a retry instruction.

use crate::error::PipelineError;
use crate::feed::Renderer;
use crate::models::{Article, SearchRequest};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

/// Format one article as a text card.
pub fn format_card(article: &Article) -> String {
    let mut card = String::new();
    writeln!(card, "[{}] {}", article.category, article.title).unwrap();
    writeln!(card, "    {}", article.summary).unwrap();
    writeln!(card, "    {} · {}", article.source, article.date).unwrap();
    writeln!(card, "    {}", article.url).unwrap();
    writeln!(card, "    image: {}", article.image).unwrap();
    card
}

/// Format the error panel shown in place of the feed.
pub fn format_error_panel(request: &SearchRequest, error: &PipelineError) -> String {
    let mut panel = String::new();
    writeln!(panel, "😕 Unable to load news").unwrap();
    writeln!(panel, "    {}", error).unwrap();
    if let Some(hint) = error.hint() {
        writeln!(panel, "    Tip: {}", hint).unwrap();
    }
    writeln!(panel, "    Type :retry to try again ({})", request).unwrap();
    panel
}

/// Writes cards and error panels to a byte sink (stdout by default).
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: Mutex<W>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write feed to terminal");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn on_articles(&self, request: &SearchRequest, articles: &[Article]) {
        let mut text = String::new();
        writeln!(
            text,
            "\n=== {} ({} articles) ===\n",
            request.category.label(),
            articles.len()
        )
        .unwrap();
        for article in articles {
            text.push_str(&format_card(article));
            text.push('\n');
        }
        self.emit(&text);
    }

    fn on_error(&self, request: &SearchRequest, error: &PipelineError) {
        self.emit(&format!("\n{}\n", format_error_panel(request, error)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn article() -> Article {
        Article {
            title: "Chips get faster".to_string(),
            category: "Innovations".to_string(),
            summary: "A summary".to_string(),
            source: "Example Wire".to_string(),
            date: "5/6/2025".to_string(),
            url: "https://example.com/chips".to_string(),
            image: "https://example.com/chips.png".to_string(),
        }
    }

    #[test]
    fn test_format_card() {
        let card = format_card(&article());
        assert!(card.starts_with("[Innovations] Chips get faster\n"));
        assert!(card.contains("Example Wire · 5/6/2025"));
        assert!(card.contains("https://example.com/chips\n"));
    }

    #[test]
    fn test_error_panel_has_message_hint_and_retry() {
        let request = SearchRequest::new(Category::Startups, Some("quantum".into()));
        let panel = format_error_panel(&request, &PipelineError::RateLimited);
        assert!(panel.contains("Unable to load news"));
        assert!(panel.contains("Daily quota exceeded"));
        assert!(panel.contains("Tip: You have reached the daily limit"));
        assert!(panel.contains(":retry"));
        assert!(panel.contains("startups \"quantum\""));
    }

    #[test]
    fn test_renderer_writes_cards() {
        let renderer = TerminalRenderer::new(Vec::new());
        let request = SearchRequest::for_category(Category::Innovations);
        renderer.on_articles(&request, &[article(), article()]);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("=== Innovations (2 articles) ==="));
        assert_eq!(out.matches("[Innovations] Chips get faster").count(), 2);
    }

    #[test]
    fn test_renderer_writes_error_panel() {
        let renderer = TerminalRenderer::new(Vec::new());
        renderer.on_error(
            &SearchRequest::for_category(Category::Latest),
            &PipelineError::NoResults,
        );
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("No articles found"));
        assert!(out.contains("Try broadening your search terms"));
    }
}
