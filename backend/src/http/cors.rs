use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, VARY,
};
use hyper::{Response, StatusCode};

/// Cross-origin policy permitting exactly one client origin.
pub struct CorsPolicy {
    origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(origin: &str) -> Result<Self, anyhow::Error> {
        Ok(Self {
            origin: HeaderValue::from_str(origin)?,
        })
    }

    /// Attached to every response, preflight or not.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }

    pub fn preflight(&self) -> Response<Full<Bytes>> {
        Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header(ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS")
            .header(ACCESS_CONTROL_ALLOW_HEADERS, "content-type")
            .header(ACCESS_CONTROL_MAX_AGE, "3600")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }
}
