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

//! Object uploads from local files.
//!
//! Files up to the single-request threshold go out as one `PUT`. Larger ones
//! use a multipart session that is either completed or aborted before
//! [`S3Client::create_object`] returns.

use super::S3Client;
use crate::s3::error::{Error, ParseError};
use crate::s3::header_constants::{CONTENT_MD5, CONTENT_TYPE, ETAG};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::multipart::{MultipartSession, PartSpec, SessionState, UploadStrategy};
use crate::s3::parameters::{Parameters, SubResource};
use crate::s3::progress::{ProgressListener, ProgressTracker};
use crate::s3::response::{CompleteMultipartUploadResponse, InitiateMultipartUploadResponse};
use crate::s3::transport::RequestBody;
use crate::s3::types::Part;
use crate::s3::utils::{b64encode, check_bucket_name, check_object_name, content_type_for};
use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt, stream};
use http::{Method, StatusCode};
use std::io::{self, SeekFrom};
use std::path::Path;
use std::pin::pin;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Size of the reads feeding request bodies
const READ_CHUNK_SIZE: u64 = 64 * 1024;

async fn open_at(path: &Path, offset: u64) -> Result<File, io::Error> {
    let mut file = File::open(path).await?;
    if offset > 0 {
        file.seek(SeekFrom::Start(offset)).await?;
    }
    Ok(file)
}

/// Streams `length` bytes from the current position of `file`
fn file_chunks(file: File, length: u64) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
    stream::try_unfold((file, length), |(mut file, remaining)| async move {
        if remaining == 0 {
            return Ok::<_, io::Error>(None);
        }
        let mut buf = vec![0u8; remaining.min(READ_CHUNK_SIZE) as usize];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file shrank while being uploaded",
            ));
        }
        buf.truncate(n);
        Ok(Some((Bytes::from(buf), (file, remaining - n as u64))))
    })
}

/// Base64 MD5 of a byte range of a file, read in chunks
async fn range_md5(path: &Path, offset: u64, length: u64) -> Result<String, Error> {
    let mut chunks = pin!(file_chunks(open_at(path, offset).await?, length));
    let mut hasher = md5::Context::new();
    while let Some(chunk) = chunks.try_next().await? {
        hasher.consume(&chunk);
    }
    Ok(b64encode(hasher.compute().0))
}

async fn tracked_body(
    path: &Path,
    offset: u64,
    length: u64,
    tracker: &ProgressTracker,
) -> Result<RequestBody, Error> {
    let chunks = file_chunks(open_at(path, offset).await?, length);
    Ok(RequestBody::Stream {
        length,
        stream: Box::pin(tracker.track(chunks)),
    })
}

impl S3Client {
    /// Uploads a local file as an object.
    ///
    /// The Content-Type is guessed from the file extension. `listener` sees
    /// the bytes sent so far against the file size; with parallel parts the
    /// figures of all parts are aggregated.
    ///
    /// On a multipart failure the session is aborted and the error that
    /// caused it is returned; a failing abort is only logged.
    pub async fn create_object<L: ProgressListener + 'static>(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        listener: L,
    ) -> Result<(), Error> {
        check_bucket_name(bucket)?;
        check_object_name(key)?;

        let size = tokio::fs::metadata(path).await?.len();
        let content_type = content_type_for(path);
        let tracker = ProgressTracker::new(size, Arc::new(listener));

        match self.shared.transfer_config.strategy_for(size)? {
            UploadStrategy::SingleShot => {
                self.put_object(bucket, key, path, size, &content_type, &tracker)
                    .await
            }
            UploadStrategy::Multipart { parts } => {
                self.put_object_multipart(bucket, key, path, &content_type, parts, &tracker)
                    .await
            }
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size: u64,
        content_type: &str,
        tracker: &ProgressTracker,
    ) -> Result<(), Error> {
        let mut headers = Multimap::new();
        headers.add(CONTENT_TYPE, content_type);
        headers.add(CONTENT_MD5, range_md5(path, 0, size).await?);

        let body = tracked_body(path, 0, size, tracker).await?;
        self.execute(
            Parameters::for_object_with_headers(Method::PUT, bucket, key, headers),
            &Multimap::new(),
            body,
            StatusCode::OK,
        )
        .await?;
        Ok(())
    }

    async fn put_object_multipart(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
        parts: Vec<PartSpec>,
        tracker: &ProgressTracker,
    ) -> Result<(), Error> {
        let upload_id = self
            .create_multipart_upload(bucket, key, content_type)
            .await?;
        log::info!(
            "initiated multipart upload {} for {}/{} in {} parts",
            upload_id,
            bucket,
            key,
            parts.len()
        );

        let mut session = MultipartSession::new(bucket, key, &upload_id);
        let result = self.send_mpu(&mut session, path, parts, tracker).await;
        if result.is_err() && session.state() == SessionState::Open {
            self.abort_session(&mut session).await;
        }
        result
    }

    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
    ) -> Result<String, Error> {
        let mut headers = Multimap::new();
        headers.add(CONTENT_TYPE, content_type);

        let resp = self
            .execute(
                Parameters::for_object_with_headers(Method::POST, bucket, key, headers)
                    .with_sub_resource(SubResource::Uploads),
                &Multimap::new(),
                RequestBody::Empty,
                StatusCode::OK,
            )
            .await?;
        let body = resp.bytes().await?;
        Ok(InitiateMultipartUploadResponse::parse(&body)?.upload_id)
    }

    /// Uploads all parts, then completes the session. Stops at the first
    /// failing part, dropping the uploads still in flight.
    async fn send_mpu(
        &self,
        session: &mut MultipartSession,
        path: &Path,
        parts: Vec<PartSpec>,
        tracker: &ProgressTracker,
    ) -> Result<(), Error> {
        let bucket = session.bucket().to_string();
        let key = session.key().to_string();
        let upload_id = session.upload_id().to_string();

        let mut uploads = stream::iter(parts)
            .map(|part| self.upload_part(&bucket, &key, &upload_id, part, path, tracker))
            .buffer_unordered(self.shared.transfer_config.part_concurrency);
        while let Some(part) = uploads.try_next().await? {
            session.record_part(part)?;
        }

        let resp = self
            .execute(
                Parameters::for_object(Method::POST, &bucket, &key)
                    .with_sub_resource(SubResource::UploadId(upload_id.clone())),
                &Multimap::new(),
                RequestBody::from(session.complete_body()?),
                StatusCode::OK,
            )
            .await?;
        let body = resp.bytes().await?;
        let completed = CompleteMultipartUploadResponse::parse(&body)?;
        session.mark_completed()?;

        log::info!(
            "completed multipart upload {} for {}/{} with etag {}",
            upload_id,
            bucket,
            key,
            completed.etag
        );
        Ok(())
    }

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part: PartSpec,
        path: &Path,
        tracker: &ProgressTracker,
    ) -> Result<Part, Error> {
        let mut headers = Multimap::new();
        headers.add(CONTENT_MD5, range_md5(path, part.offset, part.length).await?);

        let parameters = Parameters::for_object_with_headers(Method::PUT, bucket, key, headers)
            .with_sub_resource(SubResource::Part {
                part_number: part.number,
                upload_id: upload_id.to_string(),
            });
        let body = tracked_body(path, part.offset, part.length, tracker).await?;

        let resp = self
            .execute(parameters, &Multimap::new(), body, StatusCode::OK)
            .await?;
        let etag = resp
            .header(ETAG)
            .ok_or_else(|| ParseError::Header(format!("no ETag for part {}", part.number)))?;

        Ok(Part {
            number: part.number,
            etag: etag.to_string(),
        })
    }

    async fn abort_session(&self, session: &mut MultipartSession) {
        if session.mark_aborted().is_err() {
            return;
        }
        if let Err(e) = self
            .abort_multipart_upload(session.bucket(), session.key(), session.upload_id())
            .await
        {
            log::warn!(
                "failed to abort multipart upload {} for {}/{}: {}",
                session.upload_id(),
                session.bucket(),
                session.key(),
                e
            );
        }
    }
}
