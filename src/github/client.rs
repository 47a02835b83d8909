//! GitHub API client
//!
//! A thin reqwest wrapper scoped to one organization. Authentication is a
//! personal access token when no username is configured, HTTP basic auth
//! otherwise.

use crate::domain::ports::{MembershipService, WebhookRegistration};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Members are listed 100 at a time; a short page terminates the listing.
const MEMBERS_PER_PAGE: usize = 100;

// =============================================================================
// Configuration
// =============================================================================

/// GitHub credentials. `password` is a personal access token when `username`
/// is absent.
#[derive(Debug, Clone)]
pub struct GithubCredentials {
    pub username: Option<String>,
    pub password: String,
}

/// Configuration for the GitHub client
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub credentials: GithubCredentials,
    /// Organization login, e.g. "my-research-lab"
    pub organization: String,
    /// API base URL; overridable for tests
    pub api_base: String,
}

impl GithubConfig {
    pub fn new(credentials: GithubCredentials, organization: impl Into<String>) -> Self {
        Self {
            credentials,
            organization: organization.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Organization {
    id: u64,
    login: String,
}

#[derive(Debug, Deserialize)]
struct Member {
    login: String,
}

#[derive(Debug, Serialize)]
struct HookRequest<'a> {
    name: &'static str,
    active: bool,
    events: &'a [String],
    config: HookConfig<'a>,
}

#[derive(Debug, Serialize)]
struct HookConfig<'a> {
    url: &'a str,
    content_type: &'a str,
}

// =============================================================================
// Client
// =============================================================================

/// GitHub API client scoped to one organization
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    /// Build the client and verify the organization exists.
    ///
    /// The lookup doubles as the authentication check; any failure here is
    /// fatal to startup.
    pub async fn connect(config: GithubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("gpfs-provisioner"));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        if config.credentials.username.is_some() {
            info!("Logging into GitHub with username/password");
        } else {
            info!("Logging into GitHub with a token");
        }

        let client = Self { http, config };

        let org: Organization = client
            .check(client.get(&client.org_url("")).send().await?)
            .await?
            .json()
            .await?;
        info!("Retrieved organization {} (id {})", org.login, org.id);

        Ok(client)
    }

    fn org_url(&self, suffix: &str) -> String {
        format!(
            "{}/orgs/{}{}",
            self.config.api_base,
            urlencoding::encode(&self.config.organization),
            suffix
        )
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.authorize(self.http.get(url))
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.authorize(self.http.post(url))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.credentials.username {
            Some(username) => req.basic_auth(username, Some(&self.config.credentials.password)),
            None => req.header(
                "Authorization",
                format!("token {}", self.config.credentials.password),
            ),
        }
    }

    /// Turn a non-success response into [`Error::GithubApi`].
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::GithubApi {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MembershipService for GithubClient {
    async fn list_members(&self) -> Result<Vec<String>> {
        let mut logins = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}?per_page={}&page={}",
                self.org_url("/members"),
                MEMBERS_PER_PAGE,
                page
            );
            let members: Vec<Member> =
                self.check(self.get(&url).send().await?).await?.json().await?;

            debug!("Fetched {} members on page {}", members.len(), page);

            let last_page = members.len() < MEMBERS_PER_PAGE;
            logins.extend(members.into_iter().map(|m| m.login));

            if last_page {
                break;
            }
            page += 1;
        }

        Ok(logins)
    }

    async fn register_webhook(&self, registration: &WebhookRegistration) -> Result<()> {
        let body = HookRequest {
            name: "web",
            active: true,
            events: &registration.events,
            config: HookConfig {
                url: &registration.url,
                content_type: &registration.content_type,
            },
        };

        info!(
            "Attempting to register webhook on {} at {}",
            self.config.organization, registration.url
        );

        let response = self.post(&self.org_url("/hooks")).json(&body).send().await?;

        // 422 means a hook with this config already exists, usually left
        // over from a previous run of the provisioner.
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            info!("Webhook already registered");
            return Ok(());
        }

        self.check(response).await?;
        info!("Successfully registered webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GithubConfig {
        GithubConfig::new(
            GithubCredentials {
                username: None,
                password: "tok".into(),
            },
            "my-org",
        )
    }

    #[test]
    fn test_org_url_encodes_organization() {
        let mut cfg = config();
        cfg.organization = "weird org".into();
        let client = GithubClient {
            http: reqwest::Client::new(),
            config: cfg,
        };

        assert_eq!(
            client.org_url("/members"),
            "https://api.github.com/orgs/weird%20org/members"
        );
    }

    #[test]
    fn test_hook_request_serialization() {
        let registration =
            WebhookRegistration::organization_events("https://hub.example.com/callback");
        let body = HookRequest {
            name: "web",
            active: true,
            events: &registration.events,
            config: HookConfig {
                url: &registration.url,
                content_type: &registration.content_type,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["name"], "web");
        assert_eq!(json["active"], true);
        assert_eq!(json["events"][0], "organization");
        assert_eq!(json["config"]["url"], "https://hub.example.com/callback");
        assert_eq!(json["config"]["content_type"], "json");
    }

    #[test]
    fn test_member_page_deserialization() {
        let members: Vec<Member> =
            serde_json::from_str(r#"[{"login": "alice", "id": 1}, {"login": "bob", "id": 2}]"#)
                .unwrap();
        let logins: Vec<String> = members.into_iter().map(|m| m.login).collect();
        assert_eq!(logins, vec!["alice".to_string(), "bob".to_string()]);
    }
}
