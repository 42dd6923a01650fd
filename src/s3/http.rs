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

//! Request addressing and signing: base URL, URL construction and the builder
//! that turns [`Parameters`] into an authenticated request

use crate::s3::creds::Provider;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::DATE;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::parameters::Parameters;
use crate::s3::signer::{presign_v2, sign_v2_s3};
use crate::s3::utils::{UtcTime, to_http_header_value, utc_now};
use http::{Method, Uri};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default storage endpoint
pub const DEFAULT_HOST: &str = "s3.amazonaws.com";

/// Base URL of the storage service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    pub https: bool,
    pub host: String,
    pub port: u16,
    /// Hosted-style addressing: the bucket is a subdomain of the host instead of
    /// the first path segment
    pub virtual_style: bool,
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            https: true,
            host: DEFAULT_HOST.to_string(),
            port: 0,
            virtual_style: true,
        }
    }
}

impl BaseUrl {
    /// Host (and port) a request for given bucket is sent to
    pub fn host_for(&self, bucket: Option<&str>) -> String {
        let mut host = String::new();
        if self.virtual_style {
            if let Some(bucket) = bucket {
                host.push_str(bucket);
                host.push('.');
            }
        }
        host.push_str(&self.host);
        if self.port > 0 {
            host.push(':');
            host.push_str(&self.port.to_string());
        }
        host
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scheme = if self.https { "https" } else { "http" };
        write!(f, "{}://{}", scheme, self.host_for(None))
    }
}

impl FromStr for BaseUrl {
    type Err = ValidationErr;

    /// Convert a string to a BaseUrl.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3dropbox::s3::http::BaseUrl;
    ///
    /// let base_url: BaseUrl = "s3.amazonaws.com".parse().unwrap();
    /// assert!(base_url.https);
    /// let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
    /// assert_eq!(base_url.port, 9000);
    /// ```
    fn from_str(s: &str) -> Result<Self, ValidationErr> {
        let url = s
            .parse::<Uri>()
            .map_err(|e| ValidationErr::InvalidBaseUrl(e.to_string()))?;

        let https = match url.scheme_str() {
            None | Some("https") => true,
            Some("http") => false,
            Some(_) => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "scheme must be http or https".into(),
                ));
            }
        };

        let host = match url.host() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "valid host must be provided".into(),
                ));
            }
        };

        let mut port = url.port_u16().unwrap_or(0);
        if (https && port == 443) || (!https && port == 80) {
            port = 0;
        }

        if url.path() != "/" && !url.path().is_empty() {
            return Err(ValidationErr::InvalidBaseUrl(
                "path must be empty for base URL".into(),
            ));
        }
        if url.query().is_some() {
            return Err(ValidationErr::InvalidBaseUrl(
                "query must be none for base URL".into(),
            ));
        }

        Ok(BaseUrl {
            https,
            host,
            port,
            virtual_style: true,
        })
    }
}

/// Fully addressed and authenticated request, minus its body
#[derive(Clone, Debug)]
pub struct SignedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Multimap,
}

/// Turns [`Parameters`] plus credentials into signed requests and URLs
#[derive(Clone, Debug)]
pub struct RequestBuilder {
    base_url: BaseUrl,
    provider: Arc<dyn Provider + Send + Sync + 'static>,
}

impl RequestBuilder {
    pub fn new(base_url: BaseUrl, provider: Arc<dyn Provider + Send + Sync + 'static>) -> Self {
        Self { base_url, provider }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Builds a signed request stamped with the current time
    pub fn build(
        &self,
        parameters: Parameters,
        query: &Multimap,
    ) -> Result<SignedRequest, ValidationErr> {
        self.build_at(parameters, query, utc_now())
    }

    /// Builds a signed request, using `now` for a missing Date header
    pub fn build_at(
        &self,
        mut parameters: Parameters,
        query: &Multimap,
        now: UtcTime,
    ) -> Result<SignedRequest, ValidationErr> {
        if parameters.expires().is_none() && !parameters.headers().contains_key_ignore_case(DATE) {
            parameters.add_header(DATE, to_http_header_value(now));
        }

        let string_to_sign = parameters.to_sign()?;
        let url = self.create_url(&parameters, query);
        let method = parameters.method().clone();

        let creds = self.provider.fetch();
        let mut headers = parameters.into_headers();
        sign_v2_s3(
            &mut headers,
            &string_to_sign,
            &creds.access_key,
            &creds.secret_key,
        );

        Ok(SignedRequest {
            method,
            url,
            headers,
        })
    }

    /// Builds the URL of a request; `query` is appended with `?`, or with `&`
    /// when the path already carries a sub-resource
    pub fn create_url(&self, parameters: &Parameters, query: &Multimap) -> String {
        let scheme = if self.base_url.https { "https" } else { "http" };
        let path = parameters.to_path(!self.base_url.virtual_style);

        let mut url = format!(
            "{}://{}{}",
            scheme,
            self.base_url.host_for(parameters.bucket()),
            path
        );
        if !query.is_empty() {
            url.push(if path.contains('?') { '&' } else { '?' });
            url.push_str(&query.to_query_string());
        }
        url
    }

    /// Builds a presigned URL. Parameters must carry an expiry; the signature
    /// and credentials travel as query parameters instead of headers.
    pub fn presign(&self, parameters: &Parameters) -> Result<String, ValidationErr> {
        let expires = parameters
            .expires()
            .ok_or(ValidationErr::MissingDateHeader)?;
        let string_to_sign = parameters.to_sign()?;

        let creds = self.provider.fetch();
        let mut query = Multimap::new();
        presign_v2(
            &mut query,
            &string_to_sign,
            &creds.access_key,
            &creds.secret_key,
            expires,
        );

        Ok(self.create_url(parameters, &query))
    }
}
