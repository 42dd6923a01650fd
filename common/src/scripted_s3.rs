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

use crate::mock_transport::{MockResponse, RecordedRequest};
use http::{Method, StatusCode};
use s3dropbox::s3::error::{Error, NetworkError};
use uuid::Uuid;

/// How a scripted part upload fails
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartFailure {
    /// Server answers `500 Internal Server Error`
    Status,
    /// Connection drops before any response
    Transport,
}

/// Scripted object store speaking enough of the protocol for uploads:
/// single `PUT`s, multipart initiate, parts, complete and abort.
#[derive(Clone, Debug)]
pub struct ScriptedS3 {
    pub upload_id: String,
    failing_part: Option<(u16, PartFailure)>,
    complete_error: Option<String>,
    abort_status: StatusCode,
}

impl Default for ScriptedS3 {
    fn default() -> Self {
        Self {
            upload_id: Uuid::new_v4().to_string(),
            failing_part: None,
            complete_error: None,
            abort_status: StatusCode::NO_CONTENT,
        }
    }
}

impl ScriptedS3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_part(mut self, part_number: u16, failure: PartFailure) -> Self {
        self.failing_part = Some((part_number, failure));
        self
    }

    /// Complete answers `200 OK` with an `<Error>` document of this code
    pub fn complete_error(mut self, code: &str) -> Self {
        self.complete_error = Some(code.to_string());
        self
    }

    pub fn abort_status(mut self, status: StatusCode) -> Self {
        self.abort_status = status;
        self
    }

    pub fn respond(&self, request: &RecordedRequest) -> Result<MockResponse, Error> {
        let part_number = request.query_param("partNumber");
        let upload_id = request.query_param("uploadId");

        match (&request.method, part_number, upload_id) {
            (&Method::POST, None, None) if request.query_param("uploads").is_some() => {
                Ok(MockResponse::ok().body(format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <InitiateMultipartUploadResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                     <Bucket>bucket</Bucket><Key>key</Key><UploadId>{}</UploadId>\
                     </InitiateMultipartUploadResult>",
                    self.upload_id
                )))
            }
            (&Method::PUT, Some(n), Some(_)) => {
                let n: u16 = n.parse().unwrap();
                match self.failing_part {
                    Some((failing, PartFailure::Status)) if failing == n => Ok(MockResponse::error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "InternalError",
                    )),
                    Some((failing, PartFailure::Transport)) if failing == n => {
                        Err(NetworkError::Transport(String::from("connection reset by peer")).into())
                    }
                    _ => Ok(MockResponse::ok().header("ETag", &format!("\"etag-{n}\""))),
                }
            }
            (&Method::POST, None, Some(_)) => match &self.complete_error {
                Some(code) => Ok(MockResponse::error(StatusCode::OK, code)),
                None => Ok(MockResponse::ok().body(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <CompleteMultipartUploadResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                     <Location>http://bucket.s3.amazonaws.com/key</Location>\
                     <Bucket>bucket</Bucket><Key>key</Key><ETag>\"3858f62230ac3c915f300c664312c11f-9\"</ETag>\
                     </CompleteMultipartUploadResult>",
                )),
            },
            (&Method::DELETE, None, Some(_)) => Ok(MockResponse::new(self.abort_status)),
            (&Method::PUT, None, None) => Ok(MockResponse::ok().header("ETag", "\"single\"")),
            _ => Ok(MockResponse::error(StatusCode::NOT_FOUND, "NoSuchKey")),
        }
    }
}
