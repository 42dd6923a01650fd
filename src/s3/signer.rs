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

//! Request signature for the S3 REST API (HMAC-SHA1, signature version 2)

use crate::s3::header_constants::AUTHORIZATION;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::b64encode;
use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Scheme name carried in the Authorization header
pub const AUTH_SCHEME: &str = "AWS";

/// Returns HMAC-SHA1 hash for given key and data
pub fn hmac_hash(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut hasher = Hmac::<Sha1>::new_from_slice(key).expect("HMAC can take key of any size");
    hasher.update(data);
    hasher.finalize().into_bytes().to_vec()
}

/// Returns Base64 encoded HMAC-SHA1 signature of the canonical string.
///
/// Both inputs are signed as their UTF-8 bytes, so the same pair always yields
/// the same signature.
pub fn sign(secret_key: &str, string_to_sign: &str) -> String {
    b64encode(hmac_hash(secret_key.as_bytes(), string_to_sign.as_bytes()))
}

/// Returns the Authorization header value, `AWS <access key>:<signature>`
pub fn authorization_value(access_key: &str, signature: &str) -> String {
    format!("{AUTH_SCHEME} {access_key}:{signature}")
}

/// Signs the canonical string of a request and adds the Authorization header
pub fn sign_v2_s3(
    headers: &mut Multimap,
    string_to_sign: &str,
    access_key: &str,
    secret_key: &str,
) {
    let signature = sign(secret_key, string_to_sign);
    headers.add(AUTHORIZATION, authorization_value(access_key, &signature));
}

/// Signs the canonical string of a presigned request and adds the
/// `AWSAccessKeyId`, `Expires` and `Signature` query parameters
pub fn presign_v2(
    query: &mut Multimap,
    string_to_sign: &str,
    access_key: &str,
    secret_key: &str,
    expires: i64,
) {
    let signature = sign(secret_key, string_to_sign);
    query.add("AWSAccessKeyId", access_key);
    query.add("Expires", expires.to_string());
    query.add("Signature", signature);
}
