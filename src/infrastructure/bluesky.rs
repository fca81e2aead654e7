//! # Bluesky Feed Adapter
//!
//! Implements the `FeedProvider` trait against the AT Protocol XRPC API using `reqwest`.
//! Works anonymously against the public AppView; when credentials are configured a session
//! is created lazily. An expired or rejected access token is renewed once per request,
//! through `refreshSession` first and a fresh login if the refresh token is dead too.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::config::BlueskyConfig;
use crate::domain::handle;
use crate::domain::traits::FeedProvider;
use crate::domain::types::{ExternalLink, ImageRef, Post, PostMedia};

const USER_AGENT: &str = concat!("skyrelay/", env!("CARGO_PKG_VERSION"));

pub struct BlueskyClient {
    http: reqwest::Client,
    api_base: String,
    credentials: Option<(String, String)>,
    session: RwLock<Option<Session>>,
}

#[derive(Debug, Default, Deserialize)]
struct XrpcError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    refresh_jwt: String,
}

#[derive(Debug, Deserialize)]
struct AuthorFeed {
    #[serde(default)]
    feed: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    post: PostView,
    #[serde(default)]
    reason: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostView {
    uri: String,
    author: Author,
    #[serde(default)]
    record: Value,
    #[serde(default)]
    embed: Option<Value>,
    #[serde(default)]
    indexed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Author {
    handle: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl BlueskyClient {
    pub fn new(config: &BlueskyConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let credentials = match (&config.identifier, &config.app_password) {
            (Some(id), Some(pw)) if !id.is_empty() && !pw.is_empty() => {
                Some((id.clone(), pw.clone()))
            }
            _ => None,
        };

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            credentials,
            session: RwLock::new(None),
        })
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.api_base, method)
    }

    /// The current access token, logging in first if there is no session.
    async fn token(&self) -> Result<Option<String>> {
        let Some((identifier, password)) = &self.credentials else {
            return Ok(None);
        };
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(Some(session.access_jwt.clone()));
        }

        let mut slot = self.session.write().await;
        if let Some(session) = slot.as_ref() {
            return Ok(Some(session.access_jwt.clone()));
        }
        let resp = self
            .http
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&serde_json::json!({ "identifier": identifier, "password": password }))
            .send()
            .await
            .context("createSession request failed")?;
        let session = read_session(resp, "createSession").await?;
        tracing::info!("Bluesky session created for {}", identifier);
        let token = session.access_jwt.clone();
        *slot = Some(session);
        Ok(Some(token))
    }

    /// Replaces the session whose access token was `stale`. A failed refresh drops the
    /// session so the next request logs in from scratch. No-op if another request
    /// already renewed it.
    async fn renew_session(&self, stale: &str) {
        let mut slot = self.session.write().await;
        let refresh_jwt = match slot.as_ref() {
            Some(session) if session.access_jwt == stale => session.refresh_jwt.clone(),
            _ => return,
        };

        let refreshed = match self
            .http
            .post(self.xrpc_url("com.atproto.server.refreshSession"))
            .bearer_auth(&refresh_jwt)
            .send()
            .await
        {
            Ok(resp) => read_session(resp, "refreshSession").await,
            Err(e) => Err(anyhow::Error::new(e).context("refreshSession request failed")),
        };
        match refreshed {
            Ok(session) => {
                tracing::info!("Bluesky session refreshed");
                *slot = Some(session);
            }
            Err(e) => {
                tracing::warn!("Bluesky session refresh failed, logging in again: {:#}", e);
                *slot = None;
            }
        }
    }

    /// GETs an XRPC query. `Ok(None)` means the upstream reported the subject as not found.
    async fn query<T: DeserializeOwned>(&self, method: &str, params: &[(&str, &str)]) -> Result<Option<T>> {
        let mut renewed = false;
        loop {
            let token = self.token().await?;
            let mut req = self.http.get(self.xrpc_url(method)).query(params);
            if let Some(token) = &token {
                req = req.bearer_auth(token);
            }
            let resp = req
                .send()
                .await
                .with_context(|| format!("{method} request failed"))?;
            let status = resp.status();

            if status.is_success() {
                let body = resp
                    .json::<T>()
                    .await
                    .with_context(|| format!("Invalid {method} response"))?;
                return Ok(Some(body));
            }

            let err: XrpcError = resp.json().await.unwrap_or_default();
            if !renewed
                && is_session_expired(status, &err)
                && let Some(stale) = token.as_deref()
            {
                tracing::warn!("Bluesky session rejected ({} {}), renewing", status, err.error);
                self.renew_session(stale).await;
                renewed = true;
                continue;
            }
            if is_not_found(status, &err) {
                return Ok(None);
            }
            bail!("{} returned {}: {} {}", method, status, err.error, err.message);
        }
    }
}

async fn read_session(resp: reqwest::Response, method: &str) -> Result<Session> {
    let status = resp.status();
    if !status.is_success() {
        let err: XrpcError = resp.json().await.unwrap_or_default();
        bail!("Bluesky {} failed ({}): {} {}", method, status, err.error, err.message);
    }
    resp.json()
        .await
        .with_context(|| format!("Invalid {method} response"))
}

/// The PDS answers an expired access token with `400 ExpiredToken`, not `401`.
fn is_session_expired(status: StatusCode, err: &XrpcError) -> bool {
    status == StatusCode::UNAUTHORIZED
        || (status == StatusCode::BAD_REQUEST
            && matches!(err.error.as_str(), "ExpiredToken" | "InvalidToken"))
}

fn is_not_found(status: StatusCode, err: &XrpcError) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    status == StatusCode::BAD_REQUEST
        && (err.error == "ActorNotFound"
            || err.message.to_lowercase().contains("not found")
            || err.message.to_lowercase().contains("could not find"))
}

#[async_trait]
impl FeedProvider for BlueskyClient {
    async fn profile_exists(&self, handle: &str) -> Result<bool> {
        let profile: Option<IgnoredAny> = self
            .query("app.bsky.actor.getProfile", &[("actor", handle)])
            .await?;
        Ok(profile.is_some())
    }

    async fn fetch_newest_post(&self, handle: &str) -> Result<Option<Post>> {
        let feed: Option<AuthorFeed> = self
            .query(
                "app.bsky.feed.getAuthorFeed",
                &[("actor", handle), ("limit", "1"), ("filter", "posts_no_replies")],
            )
            .await?;
        let Some(feed) = feed else {
            bail!("Profile not found: {handle}");
        };
        Ok(feed.feed.into_iter().next().map(to_post))
    }
}

fn to_post(item: FeedItem) -> Post {
    let FeedItem { post, reason } = item;
    let text = post
        .record
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let created_at = post
        .record
        .get("createdAt")
        .and_then(Value::as_str)
        .or(post.indexed_at.as_deref())
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    let url = match handle::rkey(&post.uri) {
        Some(rkey) => format!("https://bsky.app/profile/{}/post/{}", post.author.handle, rkey),
        None => format!("https://bsky.app/profile/{}", post.author.handle),
    };
    let media = post.embed.as_ref().map(parse_media).filter(|m| !m.is_empty());
    let is_repost = reason
        .as_ref()
        .and_then(|r| r.get("$type"))
        .and_then(Value::as_str)
        .is_some_and(|t| t.ends_with("reasonRepost"));

    Post {
        id: post.uri,
        text,
        author_handle: post.author.handle,
        author_display_name: post.author.display_name.filter(|n| !n.trim().is_empty()),
        created_at,
        url,
        media,
        is_repost,
    }
}

fn parse_media(embed: &Value) -> PostMedia {
    let mut media = PostMedia::default();
    let kind = embed.get("$type").and_then(Value::as_str).unwrap_or_default();

    if kind.starts_with("app.bsky.embed.recordWithMedia") {
        if let Some(inner) = embed.get("media") {
            return parse_media(inner);
        }
        return media;
    }

    if let Some(images) = embed.get("images").and_then(Value::as_array) {
        for image in images {
            let url = image
                .get("fullsize")
                .or_else(|| image.get("thumb"))
                .and_then(Value::as_str);
            if let Some(url) = url {
                media.images.push(ImageRef {
                    url: url.to_string(),
                    alt: image
                        .get("alt")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                });
            }
        }
    }

    if let Some(external) = embed.get("external")
        && let Some(uri) = external.get("uri").and_then(Value::as_str)
    {
        let field = |name: &str| {
            external
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        media.external = Some(ExternalLink {
            uri: uri.to_string(),
            title: field("title"),
            description: field("description"),
        });
    }

    media
}
