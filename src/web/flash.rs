//! One-shot flash messages carried across a redirect in a cookie.
//!
//! The cookie value is a `&`-separated list of `category:message` pairs
//! with the message urlencoded. The next page that renders takes the
//! messages and clears the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

/// Flash cookie name.
pub const FLASH_COOKIE: &str = "flash";

/// Flash category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashCategory::Success),
            "danger" => Some(FlashCategory::Danger),
            _ => None,
        }
    }
}

/// A flash message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Queue a message for the next rendered page.
pub fn push(jar: CookieJar, category: FlashCategory, message: impl Into<String>) -> CookieJar {
    let mut flashes = pending(&jar);
    flashes.push(Flash::new(category, message));
    jar.add(build_cookie(encode(&flashes)))
}

/// Queue a success message.
pub fn success(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    push(jar, FlashCategory::Success, message)
}

/// Queue an error message.
pub fn danger(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    push(jar, FlashCategory::Danger, message)
}

/// Take all pending messages and clear the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    let flashes = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, flashes);
    }
    (jar.remove(build_cookie(String::new())), flashes)
}

fn pending(jar: &CookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .map(|c| decode(c.value()))
        .unwrap_or_default()
}

fn build_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn encode(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| format!("{}:{}", f.category.as_str(), urlencoding::encode(&f.message)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Malformed entries are dropped.
fn decode(value: &str) -> Vec<Flash> {
    value
        .split('&')
        .filter_map(|entry| {
            let (category, message) = entry.split_once(':')?;
            let category = FlashCategory::parse(category)?;
            let message = urlencoding::decode(message).ok()?;
            Some(Flash::new(category, message.into_owned()))
        })
        .collect()
}
