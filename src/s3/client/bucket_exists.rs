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
use crate::s3::error::Error;
use crate::s3::multimap_ext::Multimap;
use crate::s3::parameters::Parameters;
use crate::s3::utils::check_bucket_name;
use http::Method;

impl S3Client {
    /// Checks whether a bucket exists with a `HEAD` request. `404 Not Found`
    /// yields `false`; any other unexpected status is an error.
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        check_bucket_name(bucket)?;

        let found = self
            .execute_if_found(Parameters::for_bucket(Method::HEAD, bucket), &Multimap::new())
            .await?;
        Ok(found.is_some())
    }
}
