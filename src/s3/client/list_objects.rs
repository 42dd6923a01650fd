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

//! S3 APIs for listing objects.

use super::S3Client;
use crate::s3::error::{Error, ParseError};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::parameters::Parameters;
use crate::s3::response::ListObjectsResponse;
use crate::s3::transport::RequestBody;
use crate::s3::types::{FolderListing, ListingPage};
use crate::s3::utils::{check_bucket_name, check_object_name};
use http::{Method, StatusCode};

/// Delimiter that turns key prefixes into folders
pub const FOLDER_DELIMITER: &str = "/";

impl S3Client {
    async fn list_objects_raw(&self, bucket: &str, query: &Multimap) -> Result<ListObjectsResponse, Error> {
        let resp = self
            .execute(
                Parameters::for_bucket(Method::GET, bucket),
                query,
                RequestBody::Empty,
                StatusCode::OK,
            )
            .await?;
        let body = resp.bytes().await?;
        Ok(ListObjectsResponse::parse(&body)?)
    }

    /// Fetches one page of a bucket's objects, sorted by key.
    ///
    /// Pass `None` to start from the first page, or the previous page's
    /// [`next_marker`](ListingPage::next_marker) to continue.
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
    ///
    ///     let mut marker: Option<String> = None;
    ///     loop {
    ///         let page = client.list_objects("my-bucket", marker.as_deref()).await.unwrap();
    ///         for object in page.objects() {
    ///             println!("{} {}", object.key, object.size);
    ///         }
    ///         match page.next_marker() {
    ///             Some(next) => marker = Some(next.to_string()),
    ///             None => break,
    ///         }
    ///     }
    /// }
    /// ```
    pub async fn list_objects(&self, bucket: &str, marker: Option<&str>) -> Result<ListingPage, Error> {
        check_bucket_name(bucket)?;

        let mut query = Multimap::new();
        if let Some(marker) = marker {
            query.add("marker", marker);
        }

        let resp = self.list_objects_raw(bucket, &query).await?;
        let mut objects = resp.objects;
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(ListingPage::new(objects, resp.next_marker, marker.is_none()))
    }

    /// Lists one level of the bucket seen as a folder tree: the sub-folders
    /// and files directly under `prefix`. All pages are followed.
    ///
    /// `prefix` is either empty or ends with `/`. The folder placeholder
    /// object named exactly `prefix` is not reported as a file.
    pub async fn list_items(&self, bucket: &str, prefix: &str) -> Result<FolderListing, Error> {
        check_bucket_name(bucket)?;

        let mut listing = FolderListing::default();
        let mut marker: Option<String> = None;
        loop {
            let mut query = Multimap::new();
            query.add("delimiter", FOLDER_DELIMITER);
            if !prefix.is_empty() {
                query.add("prefix", prefix);
            }
            if let Some(m) = &marker {
                query.add("marker", m);
            }

            let resp = self.list_objects_raw(bucket, &query).await?;
            listing.folders.extend(resp.common_prefixes);
            listing.files.extend(
                resp.objects
                    .into_iter()
                    .map(|o| o.key)
                    .filter(|key| key != prefix),
            );

            match resp.next_marker {
                Some(next) if marker.as_deref() == Some(next.as_str()) => {
                    return Err(ParseError::StalledListing(next).into());
                }
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        listing.folders.sort();
        listing.files.sort();
        Ok(listing)
    }

    /// Weaker existence check that lists keys starting with `key` and looks
    /// for an exact match. Works with credentials lacking read access to the
    /// object itself.
    pub async fn object_exists_in_listing(&self, bucket: &str, key: &str) -> Result<bool, Error> {
        check_bucket_name(bucket)?;
        check_object_name(key)?;

        let mut query = Multimap::new();
        query.add("prefix", key);

        let resp = self.list_objects_raw(bucket, &query).await?;
        Ok(resp.objects.iter().any(|o| o.key == key))
    }
}
