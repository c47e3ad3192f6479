//! Session lifecycle driven through the hooks layer with a scripted
//! transport: register, browse with the session token, log out.

use std::sync::Arc;

use asideka_client::api::posts::{Post, PostListParams};
use asideka_client::domain::ports::HttpMethod;
use asideka_client::domain::route_guard::{RouteDecision, evaluate};
use asideka_client::domain::{AccountRegistration, LoginCredentials, SessionContext};
use asideka_client::query::{Hooks, QueryCache, QueryState};
use asideka_client::test_support::{MutableClock, RecordingNotifier, ScriptedTransport};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const LOGIN: &str = "/authentication/login";
const CREATE_ACCOUNT: &str = "/authentication/create-account";
const POSTS: &str = "/posts";

struct Flow {
    hooks: Hooks,
    transport: Arc<ScriptedTransport>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<MutableClock>,
}

#[fixture]
fn flow() -> Flow {
    let start = Utc
        .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid start instant");
    let clock = Arc::new(MutableClock::new(start));
    let transport = Arc::new(ScriptedTransport::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let session = SessionContext::new(clock.clone());
    let cache = Arc::new(QueryCache::new(clock.clone(), std::time::Duration::from_secs(30)));
    let hooks = Hooks::connect(transport.clone(), session, cache, notifier.clone());
    Flow {
        hooks,
        transport,
        notifier,
        clock,
    }
}

fn registration() -> AccountRegistration {
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "pw").expect("valid credentials");
    AccountRegistration::try_new(credentials, "Ada", "Lovelace", None).expect("valid registration")
}

fn login_ok(expiry: &str) -> Value {
    json!({
        "status": "success",
        "message": "Login successful",
        "payload": {
            "token": "tok-1",
            "tokenExpiry": expiry,
            "userProfile": {"id": "u-1", "firstname": "Ada", "lastname": "Lovelace"}
        }
    })
}

fn posts_page(title: &str) -> Value {
    json!({"status": "success", "payload": [{"id": "p-1", "title": title}]})
}

#[rstest]
#[tokio::test]
async fn register_signs_in_and_logout_clears_everything(flow: Flow) {
    flow.transport
        .respond_json(HttpMethod::Post, CREATE_ACCOUNT, json!({"status": "success"}));
    flow.transport
        .respond_json(HttpMethod::Post, LOGIN, login_ok("2025-03-02T09:00:00Z"));
    flow.transport
        .respond_json(HttpMethod::Get, POSTS, posts_page("Opening"));

    let navigation = flow.hooks.register(&registration()).await.expect("registered");
    assert_eq!(navigation.target(), "/dashboard");
    assert_eq!(
        evaluate(flow.hooks.is_authenticated(), "/login"),
        RouteDecision::Redirect("/dashboard")
    );

    let posts = flow.hooks.posts(PostListParams::default()).fetch().await;
    assert_eq!(posts.data().map(Vec::len), Some(1));
    let bearer = flow
        .transport
        .calls()
        .into_iter()
        .find(|call| call.request.path == POSTS)
        .and_then(|call| call.bearer);
    assert_eq!(bearer.as_deref(), Some("tok-1"));

    let home = flow.hooks.logout();
    assert_eq!(home.target(), "/");
    assert!(!flow.hooks.is_authenticated());
    assert!(flow.hooks.cache().is_empty());
    assert_eq!(
        evaluate(flow.hooks.is_authenticated(), "/dashboard/posts"),
        RouteDecision::Redirect("/login")
    );
    assert_eq!(
        flow.notifier.successes(),
        vec![
            "Account created successfully!".to_owned(),
            "Logged out successfully!".to_owned(),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn failed_auto_login_sends_user_to_login_page(flow: Flow) {
    flow.transport
        .respond_json(HttpMethod::Post, CREATE_ACCOUNT, json!({"status": "success"}));
    flow.transport.respond_json(
        HttpMethod::Post,
        LOGIN,
        json!({"status": "failed", "message": "Account pending verification"}),
    );

    let navigation = flow.hooks.register(&registration()).await.expect("registered");

    assert_eq!(navigation.target(), "/login");
    assert!(!flow.hooks.is_authenticated());
}

#[rstest]
#[tokio::test]
async fn expired_session_reads_as_signed_out(flow: Flow) {
    flow.transport
        .respond_json(HttpMethod::Post, LOGIN, login_ok("2025-03-01T10:00:00Z"));
    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "pw").expect("valid credentials");

    flow.hooks.login(&credentials).await.expect("login succeeds");
    assert!(flow.hooks.is_authenticated());

    flow.clock.advance_seconds(2 * 60 * 60);

    assert!(!flow.hooks.is_authenticated());
    assert_eq!(
        evaluate(flow.hooks.is_authenticated(), "/dashboard"),
        RouteDecision::Redirect("/login")
    );
}

#[rstest]
#[tokio::test]
async fn cached_results_go_stale_after_the_freshness_window(flow: Flow) {
    flow.transport
        .respond_json(HttpMethod::Get, POSTS, posts_page("First"))
        .respond_json(HttpMethod::Get, POSTS, posts_page("Second"));
    let posts = flow.hooks.posts(PostListParams::default());

    let first = posts.fetch().await;
    let cached = posts.fetch().await;
    flow.clock.advance_seconds(31);
    let refreshed = posts.fetch().await;

    let title = |state: &QueryState<Vec<Post>>| {
        state.data().and_then(|items| items.first()).map(|post| post.title.clone())
    };
    assert_eq!(title(&first), Some("First".to_owned()));
    assert_eq!(title(&cached), Some("First".to_owned()));
    assert_eq!(title(&refreshed), Some("Second".to_owned()));
    assert_eq!(flow.transport.call_count(HttpMethod::Get, POSTS), 2);
}
