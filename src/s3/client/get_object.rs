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
use crate::s3::progress::{ProgressListener, ProgressTracker};
use crate::s3::transport::{HttpResponse, RequestBody};
use crate::s3::utils::{check_bucket_name, check_object_name};
use http::{Method, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Sibling of `path` the body is streamed into before it replaces `path`
fn part_file_path(path: &Path) -> Result<PathBuf, Error> {
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::other(format!("path {} does not name a file", path.display()))
    })?;
    let mut part_name = std::ffi::OsString::from(".");
    part_name.push(file_name);
    part_name.push(format!(".{}.part", Uuid::new_v4().simple()));
    Ok(path.with_file_name(part_name))
}

async fn write_body(
    resp: &mut HttpResponse,
    part_path: &Path,
    tracker: &ProgressTracker,
) -> Result<(), Error> {
    let mut file = File::create(part_path).await?;
    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await?;
        tracker.advance(chunk.len() as u64);
    }
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

impl S3Client {
    /// Downloads an object into a local file, replacing it if present.
    ///
    /// The body goes to a hidden `.part` file next to `path` which is renamed
    /// over `path` once complete; a failed download leaves `path` untouched.
    /// Progress is reported after every chunk written, scaled by the
    /// Content-Length the server announced.
    pub async fn download_object<L: ProgressListener + 'static>(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        listener: L,
    ) -> Result<(), Error> {
        check_bucket_name(bucket)?;
        check_object_name(key)?;
        let part_path = part_file_path(path)?;

        let mut resp = self
            .execute(
                Parameters::for_object(Method::GET, bucket, key),
                &Multimap::new(),
                RequestBody::Empty,
                StatusCode::OK,
            )
            .await?;

        let total = resp.content_length().unwrap_or_default();
        let tracker = ProgressTracker::new(total, Arc::new(listener));

        let written = match write_body(&mut resp, &part_path, &tracker).await {
            Ok(()) => fs::rename(&part_path, path).await.map_err(Error::from),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&part_path).await {
                log::warn!(
                    "could not remove partial download {}: {}",
                    part_path.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        log::debug!(
            "downloaded {}/{} to {} ({} bytes)",
            bucket,
            key,
            path.display(),
            tracker.transferred()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_file_is_hidden_sibling() {
        let part = part_file_path(Path::new("/data/photos/puppy.jpg")).unwrap();
        assert_eq!(part.parent(), Some(Path::new("/data/photos")));
        let name = part.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".puppy.jpg."), "{name}");
        assert!(name.ends_with(".part"), "{name}");
    }

    #[test]
    fn test_part_file_needs_file_name() {
        assert!(part_file_path(Path::new("/")).is_err());
    }
}
