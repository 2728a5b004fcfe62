use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use blue::ai::{self, Composer, ContentGateway, GeminiClient, RequestGuard};
use blue::models::models::TrendingTopic;

/// Gateway double that replies from a script of (delay, reply) pairs, one
/// per call, in call order.
struct SlowGateway {
    scripts: Mutex<VecDeque<(u64, String)>>,
}

#[async_trait]
impl ContentGateway for SlowGateway {
    async fn generate_text(&self, _prompt: &str) -> String {
        let (delay, reply) = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted gateway call");
        tokio::time::sleep(Duration::from_millis(delay)).await;
        reply
    }

    async fn generate_image(&self, _prompt: &str) -> Option<String> {
        None
    }

    async fn trending_topics(&self) -> Vec<TrendingTopic> {
        ai::fallback_trending()
    }
}

#[tokio::test]
async fn unreachable_gateway_returns_fixed_fallbacks() {
    // Nothing listens here, so every call fails and gets converted at the
    // call site.
    let client = GeminiClient::new(String::new(), "http://127.0.0.1:1".to_string());

    assert_eq!(client.generate_text("rust").await, ai::BUSY_FALLBACK);
    assert_eq!(client.generate_image("rust").await, None);

    let topics = client.trending_topics().await;
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].topic, "Blue AI");
    assert_eq!(topics[1].topic, "Remote Work");
    assert_eq!(topics, ai::fallback_trending());
}

#[test]
fn request_guard_latest_ticket_wins() {
    let guard = RequestGuard::default();

    let first = guard.issue();
    assert!(guard.is_current(&first));

    let second = guard.issue();
    assert!(!guard.is_current(&first));
    assert!(guard.is_current(&second));
}

#[tokio::test]
async fn stale_generation_is_dropped() {
    let gateway = Arc::new(SlowGateway {
        scripts: Mutex::new(VecDeque::from([
            (200, "first".to_string()),
            (10, "second".to_string()),
        ])),
    });
    let composer = Composer::new(gateway);

    // The second request is issued while the first is still in flight; the
    // slow first response comes back stale and must not clobber the draft.
    let (first, second) = tokio::join!(composer.enhance("one"), composer.enhance("two"));
    assert_eq!(first, None);
    assert_eq!(second, Some("second".to_string()));
    assert_eq!(composer.draft(), "second");
}

#[tokio::test]
async fn latest_generation_lands_on_the_draft() {
    let gateway = Arc::new(SlowGateway {
        scripts: Mutex::new(VecDeque::from([(1, "enhanced text".to_string())])),
    });
    let composer = Composer::new(gateway);
    composer.set_draft("rough idea");

    let applied = composer.enhance("rough idea").await;
    assert_eq!(applied.as_deref(), Some("enhanced text"));
    assert_eq!(composer.draft(), "enhanced text");
}
