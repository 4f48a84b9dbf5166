//! Interactive selection session for Trall.
//!
//! One search opens at most one session: the numbered result list goes out,
//! exactly one reply is consumed, and the session ends in one of four
//! terminal outcomes. There is no re-prompt loop on bad input, and a timeout
//! ends the exchange silently; both behaviors are deliberate.

use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::transport::MessageTransport;
use std::time::Duration;
use tracing::debug;

/// Terminal outcome of a selection session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The reply matched the reserved cancel keyword.
    Cancelled,
    /// The reply was not an integer, or was outside `[1, result_count]`.
    Invalid,
    /// A valid pick; holds the 1-based index into the search result.
    Selected(usize),
    /// No reply arrived before the timeout. The caller sends nothing.
    TimedOut,
}

/// An open session awaiting a single reply.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    result_count: usize,
    timeout: Duration,
    cancel_keyword: String,
}

/// Render the 1-indexed numbered list for a search result.
///
/// Returns None for an empty result; no session should be opened in that
/// case. The footer tells the user the reply window and the cancel keyword.
pub fn render_results(
    entries: &[CatalogEntry],
    timeout: Duration,
    cancel_keyword: &str,
) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut text = String::from("Search results:\n");
    for (i, entry) in entries.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, entry.display_name));
    }
    text.push_str(&format!(
        "\nReply with a number within {}s to play, or send \"{}\" to cancel",
        timeout.as_secs(),
        cancel_keyword
    ));
    Some(text)
}

impl SelectionSession {
    pub fn open(result_count: usize, timeout: Duration, cancel_keyword: impl Into<String>) -> Self {
        Self {
            result_count,
            timeout,
            cancel_keyword: cancel_keyword.into(),
        }
    }

    /// Wait for the one reply this session consumes and interpret it.
    pub async fn await_choice(&self, transport: &dyn MessageTransport) -> Result<Outcome> {
        let reply = transport.await_reply(self.timeout).await?;
        let outcome = match reply {
            None => Outcome::TimedOut,
            Some(text) => self.interpret(&text),
        };
        debug!("selection session ended: {:?}", outcome);
        Ok(outcome)
    }

    /// Interpret a reply: cancel keyword first, then integer range check.
    fn interpret(&self, reply: &str) -> Outcome {
        if reply == self.cancel_keyword {
            return Outcome::Cancelled;
        }
        match reply.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.result_count => Outcome::Selected(n),
            _ => Outcome::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{AudioProfile, ChannelTransport};

    fn entries(names: &[&str]) -> Vec<CatalogEntry> {
        names
            .iter()
            .map(|n| CatalogEntry {
                raw_name: format!("{}.mp3", n),
                display_name: n.to_string(),
            })
            .collect()
    }

    fn session(count: usize) -> SelectionSession {
        SelectionSession::open(count, Duration::from_millis(100), "cancel")
    }

    #[test]
    fn renders_numbered_list_with_footer() {
        let text = render_results(&entries(&["a", "ab"]), Duration::from_secs(30), "cancel")
            .unwrap();
        assert!(text.starts_with("Search results:\n1. a\n2. ab\n"));
        assert!(text.contains("within 30s"));
        assert!(text.contains("\"cancel\""));
    }

    #[test]
    fn empty_result_opens_no_session() {
        assert!(render_results(&[], Duration::from_secs(30), "cancel").is_none());
    }

    #[test]
    fn cancel_keyword_wins_over_parsing() {
        assert_eq!(session(3).interpret("cancel"), Outcome::Cancelled);
    }

    #[test]
    fn in_range_numbers_select() {
        assert_eq!(session(3).interpret("1"), Outcome::Selected(1));
        assert_eq!(session(3).interpret("3"), Outcome::Selected(3));
    }

    #[test]
    fn out_of_range_and_non_numeric_are_invalid() {
        for reply in ["0", "4", "9", "-1", "2.5", "two", "", " ", "1x"] {
            assert_eq!(session(3).interpret(reply), Outcome::Invalid, "{:?}", reply);
        }
    }

    #[tokio::test]
    async fn reply_flows_through_transport() {
        let (transport, remote) = ChannelTransport::pair(AudioProfile::Any);
        remote.reply("2");
        let outcome = session(3).await_choice(&transport).await.unwrap();
        assert_eq!(outcome, Outcome::Selected(2));
    }

    #[tokio::test]
    async fn silence_times_out() {
        let (transport, _remote) = ChannelTransport::pair(AudioProfile::Any);
        let outcome = session(3).await_choice(&transport).await.unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
    }

    #[tokio::test]
    async fn only_one_reply_is_consumed() {
        let (transport, remote) = ChannelTransport::pair(AudioProfile::Any);
        remote.reply("nonsense");
        remote.reply("2");
        // The first reply decides the outcome; the session never re-prompts.
        let outcome = session(3).await_choice(&transport).await.unwrap();
        assert_eq!(outcome, Outcome::Invalid);
    }
}
