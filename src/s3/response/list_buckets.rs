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
use crate::s3::types::Bucket;
use crate::s3::utils::{children, from_iso8601utc, get_child, get_option_text, get_text, root_element};

/// Response of [list_buckets()](crate::s3::client::S3Client::list_buckets) API
#[derive(Debug, Clone)]
pub struct ListBucketsResponse {
    pub owner: Option<String>,
    pub buckets: Vec<Bucket>,
}

impl ListBucketsResponse {
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let root = root_element(body, "ListAllMyBucketsResult")?;
        let buckets = get_child(&root, "Buckets")
            .ok_or_else(|| ParseError::MissingTag(String::from("Buckets")))?;

        let mut bucket_list: Vec<Bucket> = Vec::new();
        for bucket in children(buckets, "Bucket") {
            let creation_date = match get_option_text(bucket, "CreationDate") {
                Some(v) => Some(from_iso8601utc(&v)?),
                None => None,
            };
            bucket_list.push(Bucket {
                name: get_text(bucket, "Name")?,
                creation_date,
            });
        }

        Ok(ListBucketsResponse {
            owner: get_child(&root, "Owner").and_then(|o| get_option_text(o, "DisplayName")),
            buckets: bucket_list,
        })
    }
}
