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

//! Domain entities returned by the client. They are read-only projections of
//! server state, built fresh for every call.

use crate::s3::utils::UtcTime;

/// Location constraints accepted when creating a bucket. `us-east-1` is the
/// default location and needs no constraint.
pub const BUCKET_REGIONS: &[&str] = &[
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "sa-east-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
];

#[derive(Clone, Debug, PartialEq, Eq)]
/// Bucket information
pub struct Bucket {
    pub name: String,
    pub creation_date: Option<UtcTime>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Object information
pub struct StorageObject {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<UtcTime>,
}

/// One page of an object listing.
///
/// `next_marker` is present exactly when the listing was truncated; feed it back
/// to fetch the following page. `None` always restarts from the first page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingPage {
    objects: Vec<StorageObject>,
    next_marker: Option<String>,
    first_page: bool,
}

impl ListingPage {
    pub fn new(objects: Vec<StorageObject>, next_marker: Option<String>, first_page: bool) -> Self {
        Self {
            objects,
            next_marker,
            first_page,
        }
    }

    pub fn objects(&self) -> &[StorageObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<StorageObject> {
        self.objects
    }

    pub fn next_marker(&self) -> Option<&str> {
        self.next_marker.as_deref()
    }

    pub fn is_truncated(&self) -> bool {
        self.next_marker.is_some()
    }

    /// True when this page was requested without a marker, i.e. it replaces
    /// rather than extends what a consumer has shown so far
    pub fn is_first_page(&self) -> bool {
        self.first_page
    }
}

/// One level of a bucket viewed as a folder tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FolderListing {
    /// Common prefixes ending with the delimiter
    pub folders: Vec<String>,
    /// Keys directly under the prefix
    pub files: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Uploaded part of a multipart upload
pub struct Part {
    pub number: u16,
    pub etag: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Multipart upload in progress on the server
pub struct MultipartUploadInfo {
    pub key: String,
    pub upload_id: String,
    pub initiated: Option<UtcTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    quickcheck! {
        fn prop_truncated_iff_marker_present(marker: Option<String>, first_page: bool) -> bool {
            let page = ListingPage::new(vec![], marker.clone(), first_page);
            page.is_truncated() == marker.is_some()
                && page.next_marker() == marker.as_deref()
                && page.is_first_page() == first_page
        }
    }

    #[test]
    fn test_empty_marker_is_still_a_marker() {
        let page = ListingPage::new(vec![], Some(String::new()), false);
        assert!(page.is_truncated());
        assert_eq!(page.next_marker(), Some(""));
    }
}
