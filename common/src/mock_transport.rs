// S3DropBox Rust client for Amazon S3 style object storage
// Copyright 2026 S3DropBox Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use s3dropbox::s3::error::{Error, NetworkError};
use s3dropbox::s3::multimap_ext::Multimap;
use futures_util::stream;
use s3dropbox::s3::transport::{ByteStream, HttpRequest, HttpResponse, HttpTransport};
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Request as seen by [`MockTransport`], body fully drained
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Multimap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// First value of a header, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        let without_scheme = self.url.split_once("://").map_or(self.url.as_str(), |(_, r)| r);
        let path = without_scheme.find('/').map_or("/", |i| &without_scheme[i..]);
        path.split('?').next().unwrap_or(path)
    }

    pub fn query(&self) -> &str {
        self.url.split_once('?').map_or("", |(_, q)| q)
    }

    /// Value of a query parameter, still percent-encoded
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query().split('&').find_map(|pair| match pair.split_once('=') {
            Some((k, v)) if k == name => Some(v),
            None if pair == name => Some(""),
            _ => None,
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Canned response of a [`MockTransport`]
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    /// Held back this long before it is returned
    pub delay: Option<Duration>,
    /// Body stream breaks after this many bytes
    pub reset_after: Option<usize>,
}

impl MockResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
            delay: None,
            reset_after: None,
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Connection drops once `bytes` of the body were delivered
    pub fn reset_after(mut self, bytes: usize) -> Self {
        self.reset_after = Some(bytes);
        self
    }

    fn body_stream(&self) -> ByteStream {
        let Some(cut) = self.reset_after else {
            let body = self.body.clone();
            return Box::pin(stream::once(async move { Ok(body) }));
        };
        let head = self.body.slice(..cut.min(self.body.len()));
        Box::pin(stream::iter(vec![
            Ok(head),
            Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )),
        ]))
    }

    /// Server error document with given code
    pub fn error(status: StatusCode, code: &str) -> Self {
        Self::new(status).body(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>{code}</Code><Message>{code}</Message><RequestId>4442587FB7D0A2F9</RequestId></Error>"
        ))
    }
}

type Responder = dyn Fn(&RecordedRequest) -> Result<MockResponse, Error> + Send + Sync;

/// In-memory [`HttpTransport`] answering from a script and recording every
/// request it receives
pub struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responder: Box<Responder>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &self.requests.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&RecordedRequest) -> Result<MockResponse, Error> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Transport answering every request with the same response
    pub fn always(response: MockResponse) -> Arc<Self> {
        Self::new(move |_| Ok(response.clone()))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_with(&self, method: Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let body = request.body.collect().await.map_err(NetworkError::Stream)?;
        let recorded = RecordedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body,
        };
        log::debug!("mock transport got {} {}", recorded.method, recorded.url);
        self.requests.lock().unwrap().push(recorded.clone());

        let response = (self.responder)(&recorded)?;
        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }
        let mut headers = HeaderMap::new();
        for (name, value) in &response.headers {
            headers.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        if !headers.contains_key(http::header::CONTENT_LENGTH) && recorded.method != Method::HEAD {
            headers.insert(
                http::header::CONTENT_LENGTH,
                HeaderValue::from(response.body.len()),
            );
        }
        Ok(HttpResponse::new(
            response.status,
            headers,
            response.body_stream(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3dropbox::s3::multimap_ext::MultimapExt;

    fn recorded(url: &str) -> RecordedRequest {
        let mut headers = Multimap::new();
        headers.add("Content-MD5", "abc");
        RecordedRequest {
            method: Method::PUT,
            url: url.to_string(),
            headers,
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_recorded_request_accessors() {
        let r = recorded("https://bucket.s3.amazonaws.com/a/b?partNumber=2&uploadId=x%2By");
        assert_eq!(r.path(), "/a/b");
        assert_eq!(r.query_param("partNumber"), Some("2"));
        assert_eq!(r.query_param("uploadId"), Some("x%2By"));
        assert_eq!(r.header("content-md5"), Some("abc"));

        let r = recorded("https://bucket.s3.amazonaws.com/a?uploads");
        assert_eq!(r.query_param("uploads"), Some(""));
    }

    #[tokio::test]
    async fn test_reset_after_breaks_body() {
        let transport = MockTransport::always(MockResponse::ok().body("0123456789").reset_after(4));
        let request = HttpRequest {
            method: Method::GET,
            url: String::from("https://bucket.s3.amazonaws.com/key"),
            headers: Multimap::new(),
            body: s3dropbox::s3::transport::RequestBody::Empty,
        };
        let mut resp = transport.send(request).await.unwrap();
        assert_eq!(resp.content_length(), Some(10));
        assert_eq!(resp.chunk().await.unwrap().unwrap(), Bytes::from("0123"));
        assert!(matches!(
            resp.chunk().await,
            Err(Error::Network(NetworkError::Stream(_)))
        ));
    }
}
