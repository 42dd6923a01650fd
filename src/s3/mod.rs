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

//! Implementation of Simple Storage Service (aka S3) client

pub mod client;
pub mod creds;
pub mod error;
pub mod header_constants;
pub mod http;
pub mod multimap_ext;
pub mod multipart;
pub mod parameters;
pub mod progress;
pub mod response;
pub mod signer;
pub mod transport;
pub mod types;
pub mod utils;

pub use client::{S3Client, S3ClientBuilder};

#[cfg(test)]
mod signer_tests;
