//! Request and response snapshots as seen by the offline cache.

use bytes::Bytes;
use url::Url;

/// What the page intends to do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestDestination {
    /// A full page load.
    Document,
    Style,
    Script,
    Image,
    Font,
    Manifest,
    /// `fetch()` / XHR calls.
    Empty,
}

impl RequestDestination {
    /// Destinations served cache-first.
    pub fn is_static_asset(&self) -> bool {
        matches!(
            self,
            RequestDestination::Document
                | RequestDestination::Style
                | RequestDestination::Script
                | RequestDestination::Image
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: String,
    pub url: Url,
    pub destination: RequestDestination,
    pub body: Option<Bytes>,
}

impl FetchRequest {
    pub fn new(method: &str, url: Url) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url,
            destination: RequestDestination::Empty,
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: Url, body: impl Into<Bytes>) -> Self {
        let mut req = Self::new("POST", url);
        req.body = Some(body.into());
        req
    }

    /// A top-level page load.
    pub fn navigate(url: Url) -> Self {
        Self::get(url).with_destination(RequestDestination::Document)
    }

    pub fn with_destination(mut self, destination: RequestDestination) -> Self {
        self.destination = destination;
        self
    }

    pub fn is_read(&self) -> bool {
        self.method == "GET"
    }

    pub fn is_navigation(&self) -> bool {
        self.destination == RequestDestination::Document
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, &self.url)
    }
}

/// Cache identity of a request: method plus URL without fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn new(method: &str, url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self(format!("{} {}", method.to_ascii_uppercase(), url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the response relates to the requesting origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Same-origin.
    Basic,
    Cors,
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub response_type: ResponseType,
    pub redirected: bool,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl FetchResponse {
    /// Same-origin, non-redirected response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            response_type: ResponseType::Basic,
            redirected: false,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Any 2xx.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Exactly 200, same-origin, not redirected: the only shape stored by cache-first.
    pub fn is_direct_ok(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic && !self.redirected
    }
}
