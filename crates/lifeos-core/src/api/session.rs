use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;

/// Cookie jar shared by every request of one [`ApiClient`](super::ApiClient).
///
/// The backend scopes its auth cookies to the API host, so the jar keeps a
/// flat name -> value map and sends every cookie to that host. A snapshot can
/// be persisted between CLI invocations and restored on start-up.
#[derive(Debug, Default)]
pub struct SessionStore {
    cookies: Mutex<BTreeMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(cookies: BTreeMap<String, String>) -> Self {
        Self {
            cookies: Mutex::new(cookies),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one `Set-Cookie` header. Expired or emptied cookies are removed.
    fn apply(&self, header: &str) {
        let mut parts = header.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let name = name.trim();
        let value = value.trim().trim_matches('"');
        if name.is_empty() {
            return;
        }
        let expired = parts.any(|attr| {
            let attr = attr.trim().to_ascii_lowercase();
            attr == "max-age=0" || attr.starts_with("max-age=-")
        });
        let mut cookies = self.lock();
        if expired || value.is_empty() {
            cookies.remove(name);
        } else {
            cookies.insert(name.to_string(), value.to_string());
        }
    }
}

impl CookieStore for SessionStore {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        for header in cookie_headers {
            if let Ok(header) = header.to_str() {
                self.apply(header);
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let cookies = self.lock();
        if cookies.is_empty() {
            return None;
        }
        let joined = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&joined).ok()
    }
}
