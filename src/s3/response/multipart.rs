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

use crate::s3::error::{Error, ErrorResponse, ParseError, S3ServerError};
use crate::s3::types::MultipartUploadInfo;
use crate::s3::utils::{
    children, from_iso8601utc, get_default_text, get_option_text, get_text, root_element,
};
use xmltree::Element;

/// Response of the multipart initiate request
#[derive(Debug, Clone)]
pub struct InitiateMultipartUploadResponse {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

impl InitiateMultipartUploadResponse {
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let root = root_element(body, "InitiateMultipartUploadResult")?;
        Ok(Self {
            bucket: get_default_text(&root, "Bucket"),
            key: get_default_text(&root, "Key"),
            upload_id: get_text(&root, "UploadId")?,
        })
    }
}

/// Response of the multipart complete request
#[derive(Debug, Clone)]
pub struct CompleteMultipartUploadResponse {
    pub location: String,
    pub bucket: String,
    pub key: String,
    pub etag: String,
}

impl CompleteMultipartUploadResponse {
    /// Parses the result. The server may answer `200 OK` and still report a
    /// failure in an `<Error>` body, which is returned as an error here.
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        let root = Element::parse(body)?;
        if root.name == "Error" {
            let response = ErrorResponse::parse(body)?;
            return Err(S3ServerError::ErrorInBody(response).into());
        }
        if root.name != "CompleteMultipartUploadResult" {
            return Err(ParseError::UnexpectedRoot {
                expected: String::from("CompleteMultipartUploadResult"),
                found: root.name,
            }
            .into());
        }

        Ok(Self {
            location: get_default_text(&root, "Location"),
            bucket: get_default_text(&root, "Bucket"),
            key: get_default_text(&root, "Key"),
            etag: get_default_text(&root, "ETag").trim_matches('"').to_string(),
        })
    }
}

/// Response of listing the multipart uploads in progress on a bucket
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsResponse {
    pub uploads: Vec<MultipartUploadInfo>,
    /// `(key-marker, upload-id-marker)` of the next page, present when truncated
    pub next_markers: Option<(String, String)>,
}

impl ListMultipartUploadsResponse {
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let root = root_element(body, "ListMultipartUploadsResult")?;

        let mut uploads = Vec::new();
        for upload in children(&root, "Upload") {
            let initiated = match get_option_text(upload, "Initiated") {
                Some(v) => Some(from_iso8601utc(&v)?),
                None => None,
            };
            uploads.push(MultipartUploadInfo {
                key: get_text(upload, "Key")?,
                upload_id: get_text(upload, "UploadId")?,
                initiated,
            });
        }

        let is_truncated = get_default_text(&root, "IsTruncated").eq_ignore_ascii_case("true");
        let next_markers = if is_truncated {
            let key_marker = get_default_text(&root, "NextKeyMarker");
            if key_marker.is_empty() {
                return Err(ParseError::MissingTag(String::from("NextKeyMarker")));
            }
            Some((key_marker, get_default_text(&root, "NextUploadIdMarker")))
        } else {
            None
        };

        Ok(Self {
            uploads,
            next_markers,
        })
    }
}
