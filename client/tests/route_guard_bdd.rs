//! Behaviour tests for the navigation guard.
//!
//! Scenarios drive a real `SessionContext` so the guard decision reflects
//! what a signed-in or signed-out client actually holds.

use std::cell::RefCell;

use asideka_client::domain::route_guard::{RouteDecision, evaluate};
use asideka_client::domain::{Session, SessionContext, UserProfile};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct GuardWorld {
    session: SessionContext,
    decision: RefCell<Option<RouteDecision>>,
}

impl GuardWorld {
    fn new() -> Self {
        Self {
            session: SessionContext::default(),
            decision: RefCell::new(None),
        }
    }

    fn decision(&self) -> RouteDecision {
        self.decision.borrow().expect("a path should have been requested")
    }
}

#[fixture]
fn world() -> GuardWorld {
    GuardWorld::new()
}

#[given("no active session")]
fn no_active_session(world: &GuardWorld) {
    world.session.sign_out();
}

#[given("an active session")]
fn an_active_session(world: &GuardWorld) {
    let profile = UserProfile {
        id: Some("u-1".to_owned()),
        ..UserProfile::default()
    };
    let session = Session::new("tok-1", "", profile).expect("valid session");
    world.session.sign_in(session);
}

#[when("the session is signed out")]
fn the_session_is_signed_out(world: &GuardWorld) {
    world.session.sign_out();
}

#[when("the visitor requests {path}")]
fn the_visitor_requests(world: &GuardWorld, path: String) {
    let path = path.trim_matches('"');
    *world.decision.borrow_mut() = Some(evaluate(world.session.is_present(), path));
}

#[then("the visitor is redirected to {target}")]
fn the_visitor_is_redirected_to(world: &GuardWorld, target: String) {
    assert_eq!(
        world.decision().redirect_target(),
        Some(target.trim_matches('"')),
        "guard should redirect"
    );
}

#[then("the page renders")]
fn the_page_renders(world: &GuardWorld) {
    assert_eq!(world.decision(), RouteDecision::PassThrough);
}

#[scenario(path = "tests/features/route_guard.feature")]
fn route_guard_scenarios(world: GuardWorld) {
    drop(world);
}
