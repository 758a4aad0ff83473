//! Integration tests for the mock agent transport
//!
//! Covers the connect gate, the keyword table, and the simulated
//! outage/reconnect path. Timers run under tokio's paused clock, so the
//! artificial latency costs nothing here.

use infrazen::transport::{
    ChatTransport, DEFAULT_RECOMMENDATION_ID, MockAgentTransport, TransportStatus, canned_reply_for,
};

mod connect_gate {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn send_before_connect_is_a_noop() {
        let transport = MockAgentTransport::default();
        assert_eq!(transport.status(), TransportStatus::Offline);
        assert!(transport.send("what is my bill?").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn connect_flips_the_flag_and_enables_sends() {
        let transport = MockAgentTransport::default();
        transport.connect().await;
        assert_eq!(transport.status(), TransportStatus::Connected);

        let reply = transport.send("hello there").await.expect("reply");
        assert!(reply.content.starts_with("Hello!"));
    }

    #[tokio::test(start_paused = true)]
    async fn outage_makes_sends_noops_until_reconnect() {
        let transport = MockAgentTransport::default();
        transport.connect().await;
        transport.simulate_outage();
        assert_eq!(transport.status(), TransportStatus::Offline);
        assert!(transport.send("hello").await.is_none());

        transport.reconnect().await;
        assert_eq!(transport.status(), TransportStatus::Connected);
        assert!(transport.send("hello").await.is_some());
    }
}

mod keyword_table {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn replies_substitute_the_recommendation_id() {
        let transport = MockAgentTransport::new("IZ-77");
        transport.connect().await;
        let reply = transport.send("Where are my SAVINGS?").await.expect("reply");
        assert!(reply.content.contains("IZ-77"));
        assert!(!reply.content.contains("{rec}"));
    }

    #[test]
    fn every_lookup_path_renders_the_template() {
        for text in ["costs?", "recommendations?", "unmatched gibberish"] {
            let reply = canned_reply_for(text, DEFAULT_RECOMMENDATION_ID);
            assert!(!reply.contains("{rec}"), "unrendered template for {text:?}");
        }
    }

    #[test]
    fn matching_ignores_case() {
        let lower = canned_reply_for("report please", "IZ-1");
        let upper = canned_reply_for("REPORT PLEASE", "IZ-1");
        assert_eq!(lower, upper);
    }
}
