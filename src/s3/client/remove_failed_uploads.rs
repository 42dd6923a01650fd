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
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::parameters::{Parameters, SubResource};
use crate::s3::response::ListMultipartUploadsResponse;
use crate::s3::transport::RequestBody;
use crate::s3::types::MultipartUploadInfo;
use crate::s3::utils::{check_bucket_name, utc_now};
use http::{Method, StatusCode};

impl S3Client {
    /// Lists every multipart upload still open on a bucket
    pub async fn list_multipart_uploads(&self, bucket: &str) -> Result<Vec<MultipartUploadInfo>, Error> {
        check_bucket_name(bucket)?;

        let mut uploads = Vec::new();
        let mut markers: Option<(String, String)> = None;
        loop {
            let mut query = Multimap::new();
            if let Some((key_marker, upload_id_marker)) = &markers {
                query.add("key-marker", key_marker);
                query.add("upload-id-marker", upload_id_marker);
            }

            let resp = self
                .execute(
                    Parameters::for_bucket(Method::GET, bucket).with_sub_resource(SubResource::Uploads),
                    &query,
                    RequestBody::Empty,
                    StatusCode::OK,
                )
                .await?;
            let body = resp.bytes().await?;
            let page = ListMultipartUploadsResponse::parse(&body)?;
            uploads.extend(page.uploads);

            match page.next_markers {
                Some(next) if markers.as_ref() == Some(&next) => {
                    return Err(ParseError::StalledListing(format!("{}/{}", next.0, next.1)).into());
                }
                Some(next) => markers = Some(next),
                None => break,
            }
        }
        Ok(uploads)
    }

    /// Aborts a multipart upload, releasing the parts stored so far
    pub async fn abort_multipart_upload(&self, bucket: &str, key: &str, upload_id: &str) -> Result<(), Error> {
        self.execute(
            Parameters::for_object(Method::DELETE, bucket, key)
                .with_sub_resource(SubResource::UploadId(upload_id.to_string())),
            &Multimap::new(),
            RequestBody::Empty,
            StatusCode::NO_CONTENT,
        )
        .await?;
        Ok(())
    }

    /// Aborts the multipart uploads left behind on a bucket by failed or
    /// interrupted transfers, i.e. those initiated before this call.
    /// Returns how many were aborted.
    pub async fn remove_failed_uploads(&self, bucket: &str) -> Result<usize, Error> {
        let cutoff = utc_now();

        let mut aborted = 0;
        for upload in self.list_multipart_uploads(bucket).await? {
            if upload.initiated.is_some_and(|initiated| initiated >= cutoff) {
                continue;
            }
            self.abort_multipart_upload(bucket, &upload.key, &upload.upload_id)
                .await?;
            aborted += 1;
        }

        log::info!("aborted {aborted} stale multipart uploads in {bucket}");
        Ok(aborted)
    }
}
