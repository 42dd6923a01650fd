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

//! Error definitions for S3 operations

use crate::s3::utils::{get_default_text, root_element};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Error document returned by the server
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub resource: String,
    pub request_id: String,
    pub host_id: String,
    pub bucket_name: String,
    pub object_name: String,
}

impl ErrorResponse {
    /// Parses an `<Error>` document
    pub fn parse(body: &[u8]) -> Result<ErrorResponse, ParseError> {
        let root = root_element(body, "Error")?;

        Ok(ErrorResponse {
            code: get_default_text(&root, "Code"),
            message: get_default_text(&root, "Message"),
            resource: get_default_text(&root, "Resource"),
            request_id: get_default_text(&root, "RequestId"),
            host_id: get_default_text(&root, "HostId"),
            bucket_name: get_default_text(&root, "BucketName"),
            object_name: get_default_text(&root, "Key"),
        })
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {}, message: {}, resource: {}, request_id: {}",
            self.code, self.message, self.resource, self.request_id
        )
    }
}

/// Configuration, addressing and signing problems. These are programmer or
/// environment errors and are never retried.
#[derive(Error, Debug)]
pub enum ValidationErr {
    #[error("invalid bucket name '{name}': {reason}")]
    InvalidBucketName { name: String, reason: String },

    #[error("object key cannot be empty")]
    EmptyObjectKey,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("no credentials provider configured")]
    MissingCredentials,

    #[error("request must carry a Date header or an expiry")]
    MissingDateHeader,

    #[error("invalid transfer configuration: {0}")]
    InvalidTransferConfig(String),

    #[error("multipart upload {upload_id} is already {state}")]
    SessionClosed {
        upload_id: String,
        state: &'static str,
    },

    #[error("part number {0} is out of range 1..=10000")]
    InvalidPartNumber(u16),

    #[error("part number {0} was already uploaded")]
    DuplicatePart(u16),

    #[error("multipart upload {0} has no parts")]
    EmptyParts(String),

    #[error("unable to configure HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Transport failures: connection, timeout or I/O errors while a request or
/// response was in flight.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP request failed")]
    ReqwestError(#[from] reqwest::Error),

    #[error("stream failed mid-transfer")]
    Stream(#[source] std::io::Error),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// The server answered, but not the way the operation expected.
#[derive(Error, Debug)]
pub enum S3ServerError {
    #[error("unexpected response; expected HTTP status {expected}, got {actual}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        response: Option<ErrorResponse>,
    },

    #[error("server reported an error ({0})")]
    ErrorInBody(ErrorResponse),
}

/// Malformed response payloads or headers.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed XML document")]
    Xml(#[from] xmltree::ParseError),

    #[error("<{0}> tag not found")]
    MissingTag(String),

    #[error("unexpected document root <{found}>; expected <{expected}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("invalid integer")]
    Int(#[from] std::num::ParseIntError),

    #[error("invalid timestamp")]
    Time(#[from] chrono::ParseError),

    #[error("missing or invalid {0} header")]
    Header(String),

    #[error("truncated listing did not advance past marker '{0}'")]
    StalledListing(String),
}

#[derive(Error, Debug)]
pub enum IoError {
    #[error("local I/O failed")]
    IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("S3 server error: {0}")]
    S3Server(#[from] S3ServerError),

    #[error("drive I/O error: {0}")]
    DriveIo(#[from] IoError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErr),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::DriveIo(IoError::IOError(e))
    }
}

impl From<xmltree::ParseError> for Error {
    fn from(e: xmltree::ParseError) -> Self {
        Error::Parse(ParseError::Xml(e))
    }
}

impl Error {
    /// Builds the "unexpected response" error, keeping the server's error
    /// document when the body carried one.
    pub fn unexpected_status(expected: u16, actual: u16, body: &[u8]) -> Self {
        let response = if body.is_empty() {
            None
        } else {
            ErrorResponse::parse(body).ok()
        };
        Error::S3Server(S3ServerError::UnexpectedStatus {
            expected,
            actual,
            response,
        })
    }

    /// Returns `(expected, actual)` status codes for unexpected-response errors
    pub fn status_mismatch(&self) -> Option<(u16, u16)> {
        match self {
            Error::S3Server(S3ServerError::UnexpectedStatus {
                expected, actual, ..
            }) => Some((*expected, *actual)),
            _ => None,
        }
    }

    /// Returns the parsed server error document, if any
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Error::S3Server(S3ServerError::UnexpectedStatus { response, .. }) => response.as_ref(),
            Error::S3Server(S3ServerError::ErrorInBody(response)) => Some(response),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_response() {
        let body = br#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchKey</Code>
  <Message>The resource you requested does not exist</Message>
  <Resource>/mybucket/myfoto.jpg</Resource>
  <RequestId>4442587FB7D0A2F9</RequestId>
</Error>"#;
        let resp = ErrorResponse::parse(body).unwrap();
        assert_eq!(resp.code, "NoSuchKey");
        assert_eq!(resp.resource, "/mybucket/myfoto.jpg");
        assert_eq!(resp.request_id, "4442587FB7D0A2F9");
        assert_eq!(resp.host_id, "");
    }

    #[test]
    fn test_parse_error_response_rejects_other_documents() {
        let body = b"<ListAllMyBucketsResult/>";
        assert!(matches!(
            ErrorResponse::parse(body),
            Err(ParseError::UnexpectedRoot { .. })
        ));
    }

    #[test]
    fn test_unexpected_status_keeps_both_codes() {
        let err = Error::unexpected_status(200, 403, b"<Error><Code>AccessDenied</Code></Error>");
        assert_eq!(err.status_mismatch(), Some((200, 403)));
        assert_eq!(err.error_response().unwrap().code, "AccessDenied");
    }

    #[test]
    fn test_unexpected_status_with_garbage_body() {
        let err = Error::unexpected_status(204, 500, b"<html>oops");
        assert_eq!(err.status_mismatch(), Some((204, 500)));
        assert!(err.error_response().is_none());
    }
}
