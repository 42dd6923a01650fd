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

//! Byte-level progress reporting for uploads and downloads

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Receives transfer progress. Called at least once per chunk moved.
pub trait ProgressListener: Send + Sync {
    fn processed(&self, bytes_so_far: u64, total_bytes: u64);
}

/// Listener that ignores all progress
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressListener for NoProgress {
    fn processed(&self, _bytes_so_far: u64, _total_bytes: u64) {}
}

impl<F> ProgressListener for F
where
    F: Fn(u64, u64) + Send + Sync,
{
    fn processed(&self, bytes_so_far: u64, total_bytes: u64) {
        self(bytes_so_far, total_bytes)
    }
}

/// Shared byte counter of one transfer. Clones feed the same counter, so parts
/// uploaded concurrently aggregate into a single progress figure.
#[derive(Clone)]
pub struct ProgressTracker {
    transferred: Arc<AtomicU64>,
    total: u64,
    listener: Arc<dyn ProgressListener>,
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("transferred", &self.transferred())
            .field("total", &self.total)
            .finish()
    }
}

impl ProgressTracker {
    pub fn new(total: u64, listener: Arc<dyn ProgressListener>) -> Self {
        Self {
            transferred: Arc::new(AtomicU64::new(0)),
            total,
            listener,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::SeqCst)
    }

    /// Records `bytes` more and notifies the listener
    pub fn advance(&self, bytes: u64) {
        let so_far = self.transferred.fetch_add(bytes, Ordering::SeqCst) + bytes;
        self.listener.processed(so_far, self.total);
    }

    /// Wraps a body stream so every chunk pulled from it is counted
    pub fn track<S>(&self, stream: S) -> impl Stream<Item = Result<Bytes, std::io::Error>> + use<S>
    where
        S: Stream<Item = Result<Bytes, std::io::Error>>,
    {
        let tracker = self.clone();
        stream.inspect_ok(move |chunk| tracker.advance(chunk.len() as u64))
    }
}
