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

use super::S3Client;
use crate::s3::error::{Error, ParseError};
use crate::s3::header_constants::LAST_MODIFIED;
use crate::s3::multimap_ext::Multimap;
use crate::s3::parameters::Parameters;
use crate::s3::transport::RequestBody;
use crate::s3::types::StorageObject;
use crate::s3::utils::{check_bucket_name, check_object_name, from_http_header_value};
use http::{Method, StatusCode};

impl S3Client {
    /// Checks whether an object exists with a `HEAD` request. `404 Not Found`
    /// yields `false`.
    pub async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, Error> {
        check_bucket_name(bucket)?;
        check_object_name(key)?;

        let found = self
            .execute_if_found(Parameters::for_object(Method::HEAD, bucket, key), &Multimap::new())
            .await?;
        Ok(found.is_some())
    }

    /// Reads size and modification time of an object from its headers
    pub async fn stat_object(&self, bucket: &str, key: &str) -> Result<StorageObject, Error> {
        check_bucket_name(bucket)?;
        check_object_name(key)?;

        let resp = self
            .execute(
                Parameters::for_object(Method::HEAD, bucket, key),
                &Multimap::new(),
                RequestBody::Empty,
                StatusCode::OK,
            )
            .await?;

        let size = resp
            .content_length()
            .ok_or_else(|| ParseError::Header(String::from("Content-Length missing or invalid")))?;
        let last_modified = match resp.header(LAST_MODIFIED) {
            Some(v) => Some(from_http_header_value(v)?),
            None => None,
        };

        Ok(StorageObject {
            key: key.to_string(),
            size,
            last_modified,
        })
    }
}
