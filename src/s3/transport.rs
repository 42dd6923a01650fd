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

//! HTTP transport seam.
//!
//! The client never talks to a concrete HTTP library directly: requests go through
//! an [`HttpTransport`] handed to it at construction. [`ReqwestTransport`] is the
//! default; tests and applications with special needs (an NTLM proxy, say) plug in
//! their own.

use crate::s3::error::{Error, NetworkError, ValidationErr};
use crate::s3::header_constants::CONTENT_LENGTH;
use crate::s3::multimap_ext::Multimap;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, TryStreamExt};
use http::{HeaderMap, Method, StatusCode};
use std::fmt;
use std::pin::Pin;
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Boxed stream of body chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static>>;

/// Request body
pub enum RequestBody {
    Empty,
    Bytes(Bytes),
    /// Streamed body of a known length
    Stream { length: u64, stream: ByteStream },
}

impl RequestBody {
    pub fn len(&self) -> u64 {
        match self {
            RequestBody::Empty => 0,
            RequestBody::Bytes(b) => b.len() as u64,
            RequestBody::Stream { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the whole body into memory
    pub async fn collect(self) -> Result<Bytes, std::io::Error> {
        match self {
            RequestBody::Empty => Ok(Bytes::new()),
            RequestBody::Bytes(b) => Ok(b),
            RequestBody::Stream { length, stream } => {
                let buf = stream
                    .try_fold(BytesMut::with_capacity(length as usize), |mut buf, chunk| async move {
                        buf.extend_from_slice(&chunk);
                        Ok(buf)
                    })
                    .await?;
                Ok(buf.freeze())
            }
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            RequestBody::Stream { length, .. } => write!(f, "Stream({length} bytes)"),
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        RequestBody::Bytes(b)
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Bytes(Bytes::from(s))
    }
}

/// Request handed to a transport
#[derive(Debug, TypedBuilder)]
pub struct HttpRequest {
    pub method: Method,
    #[builder(setter(into))]
    pub url: String,
    #[builder(default)]
    pub headers: Multimap,
    #[builder(default = RequestBody::Empty, setter(into))]
    pub body: RequestBody,
}

/// Response returned by a transport. Dropping it releases the connection.
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: ByteStream,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: ByteStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response with an in-memory body
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
        Self::new(status, headers, Box::pin(stream))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text; `None` when absent or not valid text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of the Content-Length header
    pub fn content_length(&self) -> Option<u64> {
        self.header(CONTENT_LENGTH).and_then(|v| v.trim().parse().ok())
    }

    /// Next chunk of the body, `None` at the end
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, Error> {
        match self.body.next().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(NetworkError::Stream(e).into()),
            None => Ok(None),
        }
    }

    /// Reads the whole body
    pub async fn bytes(mut self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

/// Sends HTTP requests. Implementations own connection pooling; the client only
/// borrows the transport per request.
#[async_trait]
pub trait HttpTransport: fmt::Debug + Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error>;
}

/// Proxy settings. NTLM fields are carried as-is for transports that implement
/// that handshake; [`ReqwestTransport`] only applies host, port and basic
/// credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ntlm_host: Option<String>,
    pub ntlm_domain: Option<String>,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "*****"))
            .field("ntlm_host", &self.ntlm_host)
            .field("ntlm_domain", &self.ntlm_domain)
            .finish()
    }
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn ntlm(mut self, host: impl Into<String>, domain: impl Into<String>) -> Self {
        self.ntlm_host = Some(host.into());
        self.ntlm_domain = Some(domain.into());
        self
    }

    pub fn uses_ntlm(&self) -> bool {
        self.ntlm_host.is_some() || self.ntlm_domain.is_some()
    }
}

/// Settings of the default transport
///
/// # Example
///
/// ```
/// use s3dropbox::s3::transport::{ProxyConfig, TransportConfig};
/// use std::time::Duration;
///
/// let config = TransportConfig::default()
///     .connect_timeout(Duration::from_secs(5))
///     .proxy(ProxyConfig::new("proxy.example.com", 8080).credentials("user", "pass"));
/// ```
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Default: 10 seconds
    pub connect_timeout: Duration,
    /// Maximum idle time between reads. Default: 10 seconds
    pub read_timeout: Duration,
    pub proxy: Option<ProxyConfig>,
    /// Accept invalid TLS certificates. Insecure; for testing only.
    pub ignore_cert_check: bool,
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            proxy: None,
            ignore_cert_check: false,
            user_agent: None,
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn ignore_cert_check(mut self, ignore: bool) -> Self {
        self.ignore_cert_check = ignore;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// [`HttpTransport`] backed by a pooled `reqwest::Client`
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let user_agent = config.user_agent.clone().unwrap_or_else(|| {
            String::from("S3DropBox (")
                + std::env::consts::OS
                + "; "
                + std::env::consts::ARCH
                + ") s3dropbox/"
                + env!("CARGO_PKG_VERSION")
        });

        let mut builder = reqwest::Client::builder()
            .no_gzip()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(user_agent);

        #[cfg(any(
            feature = "default-tls",
            feature = "native-tls",
            feature = "rustls-tls"
        ))]
        if config.ignore_cert_check {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy) = &config.proxy {
            let mut p = reqwest::Proxy::all(format!("http://{}:{}", proxy.host, proxy.port))
                .map_err(ValidationErr::HttpClient)?;
            if let Some(username) = &proxy.username {
                p = p.basic_auth(username, proxy.password.as_deref().unwrap_or_default());
            }
            if proxy.uses_ntlm() {
                log::warn!(
                    "NTLM settings for proxy {}:{} are not applied by the reqwest transport",
                    proxy.host,
                    proxy.port
                );
            }
            builder = builder.proxy(p);
        }

        Ok(Self {
            client: builder.build().map_err(ValidationErr::HttpClient)?,
        })
    }

    /// Wraps an already configured client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let mut req = self.client.request(request.method.clone(), &request.url);

        for (key, values) in request.headers.iter_all() {
            for value in values {
                req = req.header(key, value);
            }
        }

        req = match request.body {
            RequestBody::Empty => {
                if request.method == Method::PUT || request.method == Method::POST {
                    req.body(Bytes::new())
                } else {
                    req
                }
            }
            RequestBody::Bytes(b) => req.body(b),
            RequestBody::Stream { length, stream } => req
                .header(CONTENT_LENGTH, length)
                .body(reqwest::Body::wrap_stream(stream)),
        };

        let resp = req.send().await.map_err(NetworkError::from)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes_stream().map_err(std::io::Error::other);

        Ok(HttpResponse::new(status, headers, Box::pin(body)))
    }
}
