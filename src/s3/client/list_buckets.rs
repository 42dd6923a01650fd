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

//! S3 APIs for listing buckets.

use super::S3Client;
use crate::s3::error::Error;
use crate::s3::multimap_ext::Multimap;
use crate::s3::parameters::Parameters;
use crate::s3::response::ListBucketsResponse;
use crate::s3::transport::RequestBody;
use crate::s3::types::Bucket;
use http::StatusCode;

impl S3Client {
    /// Lists all buckets of the account, sorted by name.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use s3dropbox::s3::S3ClientBuilder;
    /// use s3dropbox::s3::creds::StaticProvider;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = S3ClientBuilder::default()
    ///         .provider(StaticProvider::new("access", "secret"))
    ///         .build()
    ///         .unwrap();
    ///     for bucket in client.list_buckets().await.unwrap() {
    ///         println!("{}", bucket.name);
    ///     }
    /// }
    /// ```
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>, Error> {
        let resp = self
            .execute(
                Parameters::for_all_buckets(),
                &Multimap::new(),
                RequestBody::Empty,
                StatusCode::OK,
            )
            .await?;
        let body = resp.bytes().await?;

        let mut buckets = ListBucketsResponse::parse(&body)?.buckets;
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buckets)
    }
}
