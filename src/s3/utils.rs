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

//! Various utility and helper functions

use crate::s3::error::{ParseError, ValidationErr};
use base64::engine::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use std::path::Path;
use xmltree::Element;

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// Namespace of S3 response documents
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Everything but RFC 3986 unreserved characters is percent-encoded
const URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a path segment or query component
pub fn url_encode(s: &str) -> String {
    utf8_percent_encode(s, URL_ENCODE_SET).to_string()
}

/// Encodes data using base64 algorithm
pub fn b64encode(input: impl AsRef<[u8]>) -> String {
    BASE64.encode(input)
}

/// Gets base64 encoded MD5 hash of given data
pub fn md5sum_hash(data: &[u8]) -> String {
    b64encode(md5::compute(data).0)
}

/// Gets current UTC time
pub fn utc_now() -> UtcTime {
    chrono::offset::Utc::now()
}

/// Gets HTTP header value of given time, e.g. `Tue, 27 Mar 2007 19:36:42 GMT`
pub fn to_http_header_value(time: UtcTime) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses an RFC 1123 HTTP date such as a `Last-Modified` header
pub fn from_http_header_value(s: &str) -> Result<UtcTime, ParseError> {
    Ok(DateTime::parse_from_rfc2822(s.trim())?.with_timezone(&Utc))
}

/// Parses ISO8601 UTC formatted value to time
pub fn from_iso8601utc(s: &str) -> Result<UtcTime, ParseError> {
    let dt = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ"))?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
}

/// Guesses the Content-Type of an upload from its file extension
pub fn content_type_for(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    // browsers only play these when served with the HTML5 video types
    match extension.as_deref() {
        Some("ogv") => return String::from("video/ogg"),
        Some("mp4") => return String::from("video/mp4"),
        Some("webm") => return String::from("video/webm"),
        _ => {}
    }

    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Validates given bucket name
pub fn check_bucket_name(bucket_name: &str) -> Result<(), ValidationErr> {
    let invalid = |reason: &str| {
        Err(ValidationErr::InvalidBucketName {
            name: bucket_name.to_string(),
            reason: reason.to_string(),
        })
    };

    if bucket_name.trim().is_empty() {
        return invalid("bucket name cannot be empty");
    }
    if bucket_name.len() < 3 {
        return invalid("bucket name cannot be less than 3 characters");
    }
    if bucket_name.len() > 63 {
        return invalid("bucket name cannot be greater than 63 characters");
    }

    lazy_static! {
        static ref IPV4_REGEX: Regex = Regex::new(r"^((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])$").unwrap();
        static ref VALID_BUCKET_NAME_REGEX: Regex =
            Regex::new("^[a-z0-9][a-z0-9\\.\\-]{1,61}[a-z0-9]$").unwrap();
    }

    if IPV4_REGEX.is_match(bucket_name) {
        return invalid("bucket name cannot be an IP address");
    }
    if bucket_name.contains("..") || bucket_name.contains(".-") || bucket_name.contains("-.") {
        return invalid("bucket name contains invalid successive characters '..', '.-' or '-.'");
    }
    if !VALID_BUCKET_NAME_REGEX.is_match(bucket_name) {
        return invalid("bucket name does not follow S3 standards");
    }

    Ok(())
}

/// Validates given object key
pub fn check_object_name(key: &str) -> Result<(), ValidationErr> {
    if key.is_empty() {
        return Err(ValidationErr::EmptyObjectKey);
    }
    Ok(())
}

/// Parses an XML document and checks the name of its root element
pub fn root_element(body: &[u8], expected: &str) -> Result<Element, ParseError> {
    let root = Element::parse(body)?;
    if root.name != expected {
        return Err(ParseError::UnexpectedRoot {
            expected: expected.to_string(),
            found: root.name,
        });
    }
    Ok(root)
}

/// Iterates the child elements named `tag` that live in the parent's namespace
pub fn children<'a>(element: &'a Element, tag: &'a str) -> impl Iterator<Item = &'a Element> {
    element
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .filter(move |child| child.name == tag && child.namespace == element.namespace)
}

/// Gets the first child element named `tag` in the parent's namespace
pub fn get_child<'a>(element: &'a Element, tag: &'a str) -> Option<&'a Element> {
    children(element, tag).next()
}

/// Gets text value of given XML element for given tag.
pub fn get_text(element: &Element, tag: &str) -> Result<String, ParseError> {
    get_child(element, tag)
        .map(|child| child.get_text().unwrap_or_default().to_string())
        .ok_or_else(|| ParseError::MissingTag(tag.to_string()))
}

/// Gets optional text value of given XML element for given tag.
pub fn get_option_text(element: &Element, tag: &str) -> Option<String> {
    get_child(element, tag).map(|child| child.get_text().unwrap_or_default().to_string())
}

/// Gets default text value of given XML element for given tag.
pub fn get_default_text(element: &Element, tag: &str) -> String {
    get_option_text(element, tag).unwrap_or_default()
}
