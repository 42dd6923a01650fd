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

//! Decoders for XML response documents. Element lookups are namespace aware and
//! results keep document order.

mod list_buckets;
mod list_objects;
mod multipart;

pub use list_buckets::ListBucketsResponse;
pub use list_objects::ListObjectsResponse;
pub use multipart::{
    CompleteMultipartUploadResponse, InitiateMultipartUploadResponse,
    ListMultipartUploadsResponse,
};
