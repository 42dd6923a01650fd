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

//! Multipart upload session state and transfer tuning

use crate::s3::error::ValidationErr;
use crate::s3::types::Part;

/// Files up to this size are sent with a single PUT
pub const DEFAULT_SINGLE_REQUEST_THRESHOLD: u64 = 64 * 1024 * 1024; // 64 MiB

/// Size of every multipart part except the last
pub const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024; // 5 MiB

/// Maximum number of parts allowed in a multipart upload.
pub const MAX_MULTIPART_COUNT: u16 = 10_000;

/// Tuning of object uploads
///
/// # Example
///
/// ```
/// use s3dropbox::s3::multipart::TransferConfig;
///
/// let config = TransferConfig::default()
///     .single_request_threshold(100 * 1024 * 1024)
///     .part_size(10 * 1024 * 1024)
///     .part_concurrency(4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
    /// Largest file sent as one request. Default: 64 MiB
    pub single_request_threshold: u64,
    /// Default: 5 MiB
    pub part_size: u64,
    /// Parts in flight at once. Default: 1 (sequential)
    pub part_concurrency: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            single_request_threshold: DEFAULT_SINGLE_REQUEST_THRESHOLD,
            part_size: DEFAULT_PART_SIZE,
            part_concurrency: 1,
        }
    }
}

impl TransferConfig {
    pub fn single_request_threshold(mut self, threshold: u64) -> Self {
        self.single_request_threshold = threshold;
        self
    }

    pub fn part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size;
        self
    }

    pub fn part_concurrency(mut self, concurrency: usize) -> Self {
        self.part_concurrency = concurrency;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErr> {
        if self.part_size == 0 {
            return Err(ValidationErr::InvalidTransferConfig(
                "part size must be greater than zero".into(),
            ));
        }
        if self.part_concurrency == 0 {
            return Err(ValidationErr::InvalidTransferConfig(
                "part concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Decides how a file of `size` bytes is uploaded
    pub fn strategy_for(&self, size: u64) -> Result<UploadStrategy, ValidationErr> {
        self.validate()?;
        if size <= self.single_request_threshold {
            return Ok(UploadStrategy::SingleShot);
        }

        let part_count = size.div_ceil(self.part_size);
        if part_count > MAX_MULTIPART_COUNT as u64 {
            return Err(ValidationErr::InvalidTransferConfig(format!(
                "object size {} and part size {} make more than {} parts",
                size, self.part_size, MAX_MULTIPART_COUNT
            )));
        }

        Ok(UploadStrategy::Multipart {
            parts: plan_parts(size, self.part_size),
        })
    }
}

/// Byte range of the source file sent as one part
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartSpec {
    pub number: u16,
    pub offset: u64,
    pub length: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadStrategy {
    SingleShot,
    Multipart { parts: Vec<PartSpec> },
}

/// Splits `size` bytes into consecutive parts numbered from 1
pub fn plan_parts(size: u64, part_size: u64) -> Vec<PartSpec> {
    let mut parts = Vec::new();
    let mut offset = 0;
    let mut number: u16 = 1;
    while offset < size {
        let length = part_size.min(size - offset);
        parts.push(PartSpec {
            number,
            offset,
            length,
        });
        offset += length;
        number += 1;
    }
    parts
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Completed,
    Aborted,
}

impl SessionState {
    fn as_str(&self) -> &'static str {
        match self {
            SessionState::Open => "open",
            SessionState::Completed => "completed",
            SessionState::Aborted => "aborted",
        }
    }
}

/// Server-side multipart upload owned by one upload call.
///
/// A session ends exactly once, completed or aborted. After that every
/// transition is refused.
#[derive(Debug)]
pub struct MultipartSession {
    bucket: String,
    key: String,
    upload_id: String,
    completed_parts: Vec<Part>,
    state: SessionState,
}

impl MultipartSession {
    pub fn new(bucket: &str, key: &str, upload_id: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            upload_id: upload_id.to_string(),
            completed_parts: Vec::new(),
            state: SessionState::Open,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn ensure_open(&self) -> Result<(), ValidationErr> {
        if self.state != SessionState::Open {
            return Err(ValidationErr::SessionClosed {
                upload_id: self.upload_id.clone(),
                state: self.state.as_str(),
            });
        }
        Ok(())
    }

    /// Records an acknowledged part. Parts may arrive in any order.
    pub fn record_part(&mut self, part: Part) -> Result<(), ValidationErr> {
        self.ensure_open()?;
        if part.number == 0 || part.number > MAX_MULTIPART_COUNT {
            return Err(ValidationErr::InvalidPartNumber(part.number));
        }
        if self.completed_parts.iter().any(|p| p.number == part.number) {
            return Err(ValidationErr::DuplicatePart(part.number));
        }
        self.completed_parts.push(part);
        Ok(())
    }

    /// Recorded parts in ascending part-number order
    pub fn sorted_parts(&self) -> Vec<Part> {
        let mut parts = self.completed_parts.clone();
        parts.sort_by_key(|p| p.number);
        parts
    }

    /// Body of the complete request, parts in ascending order
    pub fn complete_body(&self) -> Result<String, ValidationErr> {
        self.ensure_open()?;
        if self.completed_parts.is_empty() {
            return Err(ValidationErr::EmptyParts(self.upload_id.clone()));
        }

        let mut data = String::from("<CompleteMultipartUpload>");
        for part in self.sorted_parts() {
            let s = format!(
                "<Part><PartNumber>{}</PartNumber><ETag>{}</ETag></Part>",
                part.number, part.etag
            );
            data.push_str(&s);
        }
        data.push_str("</CompleteMultipartUpload>");
        Ok(data)
    }

    pub fn mark_completed(&mut self) -> Result<(), ValidationErr> {
        self.ensure_open()?;
        self.state = SessionState::Completed;
        Ok(())
    }

    pub fn mark_aborted(&mut self) -> Result<(), ValidationErr> {
        self.ensure_open()?;
        self.state = SessionState::Aborted;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(number: u16) -> Part {
        Part {
            number,
            etag: format!("\"etag-{number}\""),
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let config = TransferConfig::default();
        assert_eq!(
            config.strategy_for(DEFAULT_SINGLE_REQUEST_THRESHOLD).unwrap(),
            UploadStrategy::SingleShot
        );
        match config.strategy_for(DEFAULT_SINGLE_REQUEST_THRESHOLD + 1).unwrap() {
            UploadStrategy::Multipart { parts } => {
                assert_eq!(parts.len(), 13);
                assert_eq!(parts.last().unwrap().length, 4 * 1024 * 1024 + 1);
            }
            UploadStrategy::SingleShot => panic!("expected multipart"),
        }
    }

    #[test]
    fn test_empty_file_is_single_shot() {
        assert_eq!(
            TransferConfig::default().strategy_for(0).unwrap(),
            UploadStrategy::SingleShot
        );
    }

    #[test]
    fn test_plan_parts_covers_file() {
        let parts = plan_parts(10, 4);
        assert_eq!(
            parts,
            vec![
                PartSpec { number: 1, offset: 0, length: 4 },
                PartSpec { number: 2, offset: 4, length: 4 },
                PartSpec { number: 3, offset: 8, length: 2 },
            ]
        );
    }

    #[test]
    fn test_too_many_parts_rejected() {
        let config = TransferConfig::default().single_request_threshold(0).part_size(1);
        assert!(config.strategy_for(MAX_MULTIPART_COUNT as u64).is_ok());
        assert!(matches!(
            config.strategy_for(MAX_MULTIPART_COUNT as u64 + 1),
            Err(ValidationErr::InvalidTransferConfig(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        assert!(TransferConfig::default().part_size(0).validate().is_err());
        assert!(TransferConfig::default().part_concurrency(0).validate().is_err());
    }

    #[test]
    fn test_complete_body_sorts_parts() {
        let mut session = MultipartSession::new("bucket", "key", "upload-1");
        for n in [3, 1, 2] {
            session.record_part(part(n)).unwrap();
        }

        let numbers: Vec<u16> = session.sorted_parts().iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(
            session.complete_body().unwrap(),
            "<CompleteMultipartUpload>\
             <Part><PartNumber>1</PartNumber><ETag>\"etag-1\"</ETag></Part>\
             <Part><PartNumber>2</PartNumber><ETag>\"etag-2\"</ETag></Part>\
             <Part><PartNumber>3</PartNumber><ETag>\"etag-3\"</ETag></Part>\
             </CompleteMultipartUpload>"
        );
    }

    #[test]
    fn test_record_part_rejects_bad_numbers() {
        let mut session = MultipartSession::new("bucket", "key", "upload-1");
        assert!(matches!(
            session.record_part(part(0)),
            Err(ValidationErr::InvalidPartNumber(0))
        ));
        session.record_part(part(1)).unwrap();
        assert!(matches!(
            session.record_part(part(1)),
            Err(ValidationErr::DuplicatePart(1))
        ));
    }

    #[test]
    fn test_complete_requires_parts() {
        let session = MultipartSession::new("bucket", "key", "upload-1");
        assert!(matches!(
            session.complete_body(),
            Err(ValidationErr::EmptyParts(_))
        ));
    }

    #[test]
    fn test_session_reaches_one_terminal_state() {
        let mut session = MultipartSession::new("bucket", "key", "upload-1");
        session.record_part(part(1)).unwrap();
        session.mark_completed().unwrap();

        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.mark_aborted().is_err());
        assert!(session.record_part(part(2)).is_err());
        assert!(session.complete_body().is_err());

        let mut session = MultipartSession::new("bucket", "key", "upload-2");
        session.mark_aborted().unwrap();
        assert!(session.mark_completed().is_err());
    }
}
