//! Interactive line-oriented session on stdin.
//!
//! Plain text is a search (debounced); lines starting with `:` are commands:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `:cat <name>` | Select a category and fetch it |
//! | `:retry` | Re-issue the request behind the displayed result |
//! | `:categories` | List the available categories |
//! | `:quit` | Leave the session |
//!
//! Searches and category switches may overlap; the controller guarantees
//! the last one issued is what ends up on screen.

use crate::debounce::Debouncer;
use crate::feed::{FeedController, FeedEvent, Renderer};
use crate::fetch::{ConnectivityProbe, Transport};
use crate::models::Category;
use futures::stream::{FuturesUnordered, StreamExt};
use itertools::Itertools;
use std::error::Error;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Category(Category),
    Retry,
    ListCategories,
    Quit,
    Unknown(String),
}

/// Parse one line of user input.
pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    let Some(command) = trimmed.strip_prefix(':') else {
        return Command::Search(trimmed.to_string());
    };
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("cat" | "category"), Some(name)) => Command::Category(Category::parse(name)),
        (Some("retry"), None) => Command::Retry,
        (Some("categories"), None) => Command::ListCategories,
        (Some("quit" | "q"), None) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|c| format!("{} ({})", c.as_str(), c.label()))
        .join(", ")
}

/// Run the session until `:quit` or end of input.
///
/// The initial page load is dispatched immediately. At end of input a
/// pending search fires without waiting out the debounce window; `:quit`
/// discards it. In-flight dispatches are drained before returning.
#[instrument(level = "info", skip_all)]
pub async fn run<T, C, R, I>(
    controller: &FeedController<T, C, R>,
    input: I,
    debounce: Duration,
) -> Result<(), Box<dyn Error>>
where
    T: Transport,
    C: ConnectivityProbe,
    R: Renderer,
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut debouncer = Debouncer::new(debounce);
    let mut inflight = FuturesUnordered::new();
    inflight.push(controller.dispatch(FeedEvent::PageLoad));

    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    if let Some(text) = debouncer.flush() {
                        inflight.push(controller.dispatch(FeedEvent::SearchTextChanged(text)));
                    }
                    break;
                };
                match parse_line(&line) {
                    Command::Search(text) => debouncer.push(text, Instant::now()),
                    Command::Category(category) => {
                        debouncer.cancel();
                        inflight.push(controller.dispatch(FeedEvent::CategorySelected(category)));
                    }
                    Command::Retry => match controller.displayed_request() {
                        Some(request) => {
                            debouncer.cancel();
                            inflight.push(controller.dispatch(FeedEvent::RetryRequested(request)));
                        }
                        None => info!("Nothing to retry yet"),
                    },
                    Command::ListCategories => println!("Categories: {}", category_list()),
                    Command::Quit => break,
                    Command::Unknown(raw) => {
                        warn!(input = %raw, "Unknown command");
                        println!("Commands: :cat <name>, :retry, :categories, :quit");
                    }
                }
            }
            Some(outcome) = inflight.next(), if !inflight.is_empty() => {
                debug!(?outcome, "Dispatch settled");
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(text) = debouncer.take_ready(Instant::now()) {
                    inflight.push(controller.dispatch(FeedEvent::SearchTextChanged(text)));
                }
            }
        }
    }

    while let Some(outcome) = inflight.next().await {
        debug!(?outcome, "Dispatch settled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        RecordingRenderer, Rendered, ScriptedTransport, pipeline, two_articles_body,
    };

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("quantum chips"), Command::Search("quantum chips".into()));
        assert_eq!(parse_line(""), Command::Search(String::new()));
        assert_eq!(parse_line(":cat ai-ml"), Command::Category(Category::AiMl));
        assert_eq!(parse_line(":category bogus"), Command::Category(Category::Unset));
        assert_eq!(parse_line(":retry"), Command::Retry);
        assert_eq!(parse_line(":categories"), Command::ListCategories);
        assert_eq!(parse_line(":quit\r\n"), Command::Quit);
        assert_eq!(parse_line(":dance"), Command::Unknown(":dance".into()));
    }

    #[test]
    fn test_category_list() {
        let list = category_list();
        assert!(list.starts_with("latest (Latest News)"));
        assert!(list.contains("ai-ml (AI & ML)"));
    }

    #[tokio::test]
    async fn test_session_flow() {
        let transport = ScriptedTransport::status(200, &two_articles_body());
        let renderer = RecordingRenderer::default();
        let controller =
            FeedController::new(pipeline(transport.clone()), renderer.clone(), Category::Latest);
        let input: &[u8] = b":cat startups\nquantum\n";

        run(&controller, input, Duration::from_millis(10)).await.unwrap();

        // page load, category switch, then the search typed just before EOF
        assert_eq!(
            transport.searches(),
            vec![
                "technology news".to_string(),
                Category::Startups.canned_query().unwrap().to_string(),
                "quantum".to_string(),
            ]
        );
        assert_eq!(controller.state().active_category, Category::Startups);
        assert_eq!(
            controller.displayed_request(),
            Some(crate::models::SearchRequest::new(
                Category::Startups,
                Some("quantum".into())
            ))
        );
        assert!(matches!(renderer.calls().last(), Some(Rendered::Articles(_, _))));
    }

    #[tokio::test]
    async fn test_session_search_at_eof_fires_before_window() {
        let transport = ScriptedTransport::status(200, &two_articles_body());
        let controller = FeedController::new(
            pipeline(transport.clone()),
            RecordingRenderer::default(),
            Category::Latest,
        );
        let input: &[u8] = b"quantum\n";

        run(&controller, input, Duration::from_secs(60)).await.unwrap();

        assert_eq!(transport.last_search().as_deref(), Some("quantum"));
    }

    #[tokio::test]
    async fn test_session_quit_discards_pending_search() {
        let transport = ScriptedTransport::status(200, &two_articles_body());
        let controller = FeedController::new(
            pipeline(transport.clone()),
            RecordingRenderer::default(),
            Category::Latest,
        );
        let input: &[u8] = b"quantum\n:quit\n";

        run(&controller, input, Duration::from_secs(60)).await.unwrap();

        assert_eq!(transport.searches(), vec!["technology news".to_string()]);
    }

    #[tokio::test]
    async fn test_session_retry_without_display_is_noop() {
        let transport = ScriptedTransport::hang();
        let renderer = RecordingRenderer::default();
        let controller = FeedController::new(
            crate::pipeline::Pipeline::new(
                Box::new(crate::test_support::gnews_provider()),
                crate::fetch::Fetcher::new(
                    transport.clone(),
                    crate::test_support::StaticProbe(true),
                    Duration::from_millis(20),
                ),
                crate::normalize::Normalizer::default(),
            ),
            renderer.clone(),
            Category::Latest,
        );
        let input: &[u8] = b":retry\n:quit\n";

        run(&controller, input, Duration::from_millis(10)).await.unwrap();

        // only the page load was issued; it timed out and rendered an error
        assert_eq!(transport.searches().len(), 1);
        assert!(matches!(
            renderer.calls().as_slice(),
            [Rendered::Error(_, crate::error::PipelineError::Timeout)]
        ));
    }
}
