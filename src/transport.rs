//! Chat channel contract and the mock agent used by the widget in testing.
//!
//! The mock simulates a bidirectional channel: canned keyword-matched
//! replies, artificial latency, and a manually triggered outage/reconnect
//! path. There is no retry and no cancellation; a pending reply is always
//! delivered once started.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// Connection state surfaced by the chat status banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportStatus {
    Connecting,
    Connected,
    Offline,
}

impl TransportStatus {
    pub fn label(self) -> &'static str {
        match self {
            TransportStatus::Connecting => "Connecting…",
            TransportStatus::Connected => "Connected",
            TransportStatus::Offline => "Offline",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentReply {
    pub content: String,
}

/// Narrow send/receive contract the chat widget talks to. A send while the
/// channel is down is a no-op, not an error.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Resolves once the channel is up.
    async fn connect(&self);

    /// Returns the agent reply, or `None` when the channel is down.
    async fn send(&self, text: &str) -> Option<AgentReply>;

    fn status(&self) -> TransportStatus;
}

const CONNECT_DELAY: Duration = Duration::from_millis(600);
const REPLY_DELAY_MS: std::ops::RangeInclusive<u64> = 1200..=2000;

/// Placeholder substituted with the recommendation id in reply templates.
const REC_PLACEHOLDER: &str = "{rec}";

pub const DEFAULT_RECOMMENDATION_ID: &str = "IZ-2041";

struct CannedReply {
    keywords: &'static [&'static str],
    reply: &'static str,
}

/// Lookup is first match over this table, so earlier rows win. Matching is
/// case-insensitive substring matching; a keyword may hit inside a longer
/// word and that is accepted behavior.
const CANNED_REPLIES: &[CannedReply] = &[
    CannedReply {
        keywords: &["hello", "hi", "hey"],
        reply: "Hello! I can walk you through your cloud spend, flag idle \
                resources, or explain any recommendation. What would you like \
                to look at?",
    },
    CannedReply {
        keywords: &["cost", "spend", "bill"],
        reply: "Your tracked monthly spend is trending slightly above last \
                month. The biggest movers are compute instances; see \
                recommendation {rec} for a rightsizing option.",
    },
    CannedReply {
        keywords: &["saving", "optimi", "cheaper"],
        reply: "The largest available saving right now is recommendation \
                {rec}: two instances have sat below 5% CPU for 14 days and \
                can be downsized without impact.",
    },
    CannedReply {
        keywords: &["recommend"],
        reply: "Recommendation {rec} is open: downsize underutilized compute. \
                Apply it from the resource card, or ask me for the details.",
    },
    CannedReply {
        keywords: &["ram", "memory", "cpu"],
        reply: "Utilization charts live on each resource card. Expand a card \
                in the inventory to see the series this month.",
    },
    CannedReply {
        keywords: &["report"],
        reply: "Reports are generated per role from the Reports tab. A fresh \
                one usually takes under a minute to reach Ready.",
    },
];

const DEFAULT_REPLY: &str =
    "I did not catch that. Try asking about costs, savings, or reports — or \
     open recommendation {rec} to see the current top suggestion.";

/// First-match keyword lookup with the recommendation id substituted into
/// the chosen template.
pub fn canned_reply_for(text: &str, recommendation_id: &str) -> String {
    let lowered = text.to_lowercase();
    for row in CANNED_REPLIES {
        if row.keywords.iter().any(|kw| lowered.contains(kw)) {
            return render_reply(row.reply, recommendation_id);
        }
    }
    render_reply(DEFAULT_REPLY, recommendation_id)
}

fn render_reply(template: &str, recommendation_id: &str) -> String {
    template.replace(REC_PLACEHOLDER, recommendation_id)
}

/// Test double for the real agent channel. Keyword table plus jittered
/// delays; state is two flags so the widget can render a banner.
pub struct MockAgentTransport {
    connecting: AtomicBool,
    connected: AtomicBool,
    recommendation_id: String,
}

impl MockAgentTransport {
    pub fn new(recommendation_id: impl Into<String>) -> Self {
        Self {
            connecting: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            recommendation_id: recommendation_id.into(),
        }
    }

    /// Drops the channel immediately. Replies already in flight are still
    /// delivered; only new sends become no-ops.
    pub fn simulate_outage(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Runs the same fixed connect delay as the initial `connect`.
    pub async fn reconnect(&self) {
        self.connect().await;
    }
}

impl Default for MockAgentTransport {
    fn default() -> Self {
        Self::new(DEFAULT_RECOMMENDATION_ID)
    }
}

#[async_trait]
impl ChatTransport for MockAgentTransport {
    async fn connect(&self) {
        self.connecting.store(true, Ordering::SeqCst);
        tokio::time::sleep(CONNECT_DELAY).await;
        self.connecting.store(false, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
    }

    async fn send(&self, text: &str) -> Option<AgentReply> {
        if !self.connected.load(Ordering::SeqCst) {
            return None;
        }
        let delay_ms = rand::rng().random_range(REPLY_DELAY_MS);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Some(AgentReply {
            content: canned_reply_for(text, &self.recommendation_id),
        })
    }

    fn status(&self) -> TransportStatus {
        if self.connecting.load(Ordering::SeqCst) {
            TransportStatus::Connecting
        } else if self.connected.load(Ordering::SeqCst) {
            TransportStatus::Connected
        } else {
            TransportStatus::Offline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        let reply = canned_reply_for("what does my BILL look like", "IZ-7");
        assert!(reply.contains("IZ-7"));
        assert!(reply.contains("monthly spend"));
    }

    #[test]
    fn earlier_rows_win_on_overlap() {
        // "cost" row precedes "recommend" row; a message hitting both gets
        // the cost reply.
        let reply = canned_reply_for("recommend me a cost cut", "IZ-7");
        assert!(reply.contains("monthly spend"));
    }

    #[test]
    fn keywords_match_inside_longer_words() {
        let reply = canned_reply_for("make that cheaperish please", "IZ-7");
        assert!(reply.contains("largest available saving"));
    }

    #[test]
    fn unmatched_text_gets_templated_fallback() {
        let reply = canned_reply_for("zzz", "IZ-99");
        assert!(reply.contains("IZ-99"));
        assert!(reply.starts_with("I did not catch that"));
    }
}
