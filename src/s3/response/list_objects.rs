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

use crate::s3::error::ParseError;
use crate::s3::types::StorageObject;
use crate::s3::utils::{
    children, from_iso8601utc, get_default_text, get_option_text, get_text, root_element,
};

/// Response of a `GET bucket` object listing
#[derive(Debug, Clone, Default)]
pub struct ListObjectsResponse {
    pub objects: Vec<StorageObject>,
    pub common_prefixes: Vec<String>,
    /// Where the next page starts; present only when the listing was truncated
    pub next_marker: Option<String>,
}

impl ListObjectsResponse {
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let root = root_element(body, "ListBucketResult")?;

        let is_truncated = get_default_text(&root, "IsTruncated").eq_ignore_ascii_case("true");

        let mut objects = Vec::new();
        for content in children(&root, "Contents") {
            let last_modified = match get_option_text(content, "LastModified") {
                Some(v) => Some(from_iso8601utc(&v)?),
                None => None,
            };
            objects.push(StorageObject {
                key: get_text(content, "Key")?,
                size: get_text(content, "Size")?.trim().parse::<u64>()?,
                last_modified,
            });
        }

        let mut common_prefixes = Vec::new();
        for prefix in children(&root, "CommonPrefixes") {
            common_prefixes.push(get_text(prefix, "Prefix")?);
        }

        // NextMarker is only sent when a delimiter was requested; otherwise the
        // last key of the page is where the next one starts.
        let next_marker = if is_truncated {
            let marker = get_option_text(&root, "NextMarker")
                .filter(|m| !m.is_empty())
                .or_else(|| {
                    let last_key = objects.last().map(|o| o.key.clone());
                    let last_prefix = common_prefixes.last().cloned();
                    last_key.max(last_prefix)
                })
                .ok_or_else(|| ParseError::MissingTag(String::from("NextMarker")))?;
            Some(marker)
        } else {
            None
        };

        Ok(ListObjectsResponse {
            objects,
            common_prefixes,
            next_marker,
        })
    }
}
