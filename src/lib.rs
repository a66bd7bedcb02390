//! Shared fixtures for the end-to-end tests
//!
//! [`FakeGitHub`] is a stateful stand-in for the organization REST API.
//! Mutations change its state, so a flow can be run repeatedly against it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::{json, Value};
use teamsync_github::GitHubConfig;
use teamsync_http::HttpConfig;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Organization state behind the fake API
#[derive(Debug, Default, Clone)]
pub struct OrgState {
    pub members: BTreeSet<String>,
    pub pending: BTreeSet<String>,
    pub teams: BTreeMap<String, BTreeSet<String>>,
    pub users: BTreeMap<String, u64>,
    /// Invitations for these logins are answered with 422
    pub conflicts: BTreeSet<String>,
    /// User probes answer 403 with an exhausted rate limit
    pub rate_limited: bool,
    /// `METHOD path` of every mutating request, in order
    pub mutations: Vec<String>,
}

impl OrgState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, login: &str) -> Self {
        self.members.insert(login.to_string());
        self.user(login)
    }

    pub fn pending(mut self, login: &str) -> Self {
        self.pending.insert(login.to_string());
        self.user(login)
    }

    pub fn user(mut self, login: &str) -> Self {
        let next = self.users.len() as u64 + 1;
        self.users.entry(login.to_string()).or_insert(next);
        self
    }

    pub fn team(mut self, slug: &str, logins: &[&str]) -> Self {
        self.teams.insert(
            slug.to_string(),
            logins.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn conflict(mut self, login: &str) -> Self {
        self.conflicts.insert(login.to_string());
        self
    }
}

/// Stateful responder mounted on a [`MockServer`]
#[derive(Clone)]
pub struct FakeGitHub {
    state: Arc<Mutex<OrgState>>,
}

impl FakeGitHub {
    /// Start a server answering every request from `state`
    pub async fn start(state: OrgState) -> (MockServer, Self) {
        let server = MockServer::start().await;
        let fake = Self {
            state: Arc::new(Mutex::new(state)),
        };
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    pub fn state(&self) -> OrgState {
        self.lock().clone()
    }

    /// Apply a change to the remote state between runs
    pub fn update(&self, change: impl FnOnce(&mut OrgState)) {
        change(&mut self.lock());
    }

    fn lock(&self) -> MutexGuard<'_, OrgState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Client configuration pointing at `server`, with short retry delays
pub fn config_for(server: &MockServer) -> GitHubConfig {
    let http = HttpConfig::default()
        .with_retry_count(2)
        .with_retry_delay(Duration::from_millis(5));
    GitHubConfig::new("acme", "test-token")
        .with_api_url(server.uri())
        .with_http(http)
}

fn page(request: &Request, items: Vec<Value>) -> ResponseTemplate {
    let query: BTreeMap<String, String> = request.url.query_pairs().into_owned().collect();
    let per_page = query
        .get("per_page")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(30);
    let page = query
        .get("page")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let batch: Vec<Value> = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    ResponseTemplate::new(200).set_body_json(batch)
}

fn logins(set: &BTreeSet<String>) -> Vec<Value> {
    set.iter().map(|login| json!({ "login": login })).collect()
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" }))
}

impl Respond for FakeGitHub {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.lock();
        let method = request.method.as_str().to_string();
        let path = request.url.path().to_string();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        if method != "GET" {
            state.mutations.push(format!("{} {}", method, path));
        }

        match (method.as_str(), segments.as_slice()) {
            ("GET", ["orgs", _, "members"]) => page(request, logins(&state.members)),
            ("GET", ["orgs", _, "invitations"]) => page(request, logins(&state.pending)),
            ("GET", ["orgs", _, "teams"]) => {
                let teams = state.teams.keys().map(|slug| json!({ "slug": slug })).collect();
                page(request, teams)
            }
            ("GET", ["orgs", _, "teams", slug, "members"]) => match state.teams.get(*slug) {
                Some(members) => page(request, logins(members)),
                None => not_found(),
            },
            ("PUT", ["orgs", _, "teams", slug, "memberships", login]) => {
                match state.teams.get_mut(*slug) {
                    Some(team) => {
                        team.insert(login.to_string());
                        ResponseTemplate::new(200).set_body_json(json!({ "state": "active" }))
                    }
                    None => not_found(),
                }
            }
            ("DELETE", ["orgs", _, "teams", slug, "memberships", login]) => {
                match state.teams.get_mut(*slug) {
                    Some(team) => {
                        team.remove(*login);
                        ResponseTemplate::new(204)
                    }
                    None => not_found(),
                }
            }
            ("GET", ["users", login]) => {
                if state.rate_limited {
                    return ResponseTemplate::new(403)
                        .insert_header("X-RateLimit-Remaining", "0")
                        .set_body_json(json!({ "message": "API rate limit exceeded" }));
                }
                match state.users.get(*login) {
                    Some(id) => {
                        ResponseTemplate::new(200).set_body_json(json!({ "id": id, "login": login }))
                    }
                    None => not_found(),
                }
            }
            ("POST", ["orgs", _, "invitations"]) => {
                let invitee = serde_json::from_slice::<Value>(&request.body)
                    .ok()
                    .and_then(|body| body.get("invitee_id").and_then(Value::as_u64));
                let login = invitee.and_then(|id| {
                    state
                        .users
                        .iter()
                        .find(|(_, uid)| **uid == id)
                        .map(|(login, _)| login.clone())
                });
                match login {
                    Some(login) if state.conflicts.contains(&login) => ResponseTemplate::new(422)
                        .set_body_json(json!({ "message": "Validation Failed" })),
                    Some(login) => {
                        state.pending.insert(login);
                        ResponseTemplate::new(201).set_body_json(json!({ "id": 1 }))
                    }
                    None => not_found(),
                }
            }
            _ => not_found(),
        }
    }
}
