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

//! Addressing and signing inputs of a single protocol request

use crate::s3::error::ValidationErr;
use crate::s3::header_constants::X_AMZ_DATE;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::url_encode;
use http::Method;

const DATE_KEY: &str = "date";
const CONTENT_MD5_KEY: &str = "content-md5";
const CONTENT_TYPE_KEY: &str = "content-type";
const AMZ_HEADER_PREFIX: &str = "x-amz-";

/// Query-string marker addressing a facet of a bucket or object rather than its
/// content. It is part of the signed resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubResource {
    Acl,
    Location,
    Uploads,
    UploadId(String),
    Part { part_number: u16, upload_id: String },
}

impl SubResource {
    // Names are already in the lexicographic order the signed resource requires.
    fn write(&self, buf: &mut String, encode: bool) {
        let value = |v: &str| {
            if encode {
                url_encode(v)
            } else {
                v.to_string()
            }
        };
        match self {
            SubResource::Acl => buf.push_str("acl"),
            SubResource::Location => buf.push_str("location"),
            SubResource::Uploads => buf.push_str("uploads"),
            SubResource::UploadId(upload_id) => {
                buf.push_str("uploadId=");
                buf.push_str(&value(upload_id));
            }
            SubResource::Part {
                part_number,
                upload_id,
            } => {
                buf.push_str("partNumber=");
                buf.push_str(&part_number.to_string());
                buf.push_str("&uploadId=");
                buf.push_str(&value(upload_id));
            }
        }
    }
}

/// Everything needed to address and sign one request: method, optional bucket and
/// key, headers, optional sub-resource and, for presigned access, an expiry.
///
/// An expiry takes the place of the Date line in the canonical string.
#[derive(Clone, Debug)]
pub struct Parameters {
    method: Method,
    bucket: Option<String>,
    key: Option<String>,
    headers: Multimap,
    sub_resource: Option<SubResource>,
    expires: Option<i64>,
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl Parameters {
    fn new(
        method: Method,
        bucket: &str,
        key: &str,
        headers: Multimap,
        expires: Option<i64>,
    ) -> Self {
        Parameters {
            method,
            bucket: non_empty(bucket),
            key: non_empty(key),
            headers,
            sub_resource: None,
            expires,
        }
    }

    /// Parameters for listing all buckets of the account
    pub fn for_all_buckets() -> Self {
        Self::new(Method::GET, "", "", Multimap::new(), None)
    }

    /// Parameters for a bucket-level operation
    pub fn for_bucket(method: Method, bucket: &str) -> Self {
        Self::new(method, bucket, "", Multimap::new(), None)
    }

    /// Parameters for an object-level operation without extra headers
    pub fn for_object(method: Method, bucket: &str, key: &str) -> Self {
        Self::new(method, bucket, key, Multimap::new(), None)
    }

    /// Parameters for an object-level operation carrying a body or metadata headers
    pub fn for_object_with_headers(
        method: Method,
        bucket: &str,
        key: &str,
        headers: Multimap,
    ) -> Self {
        Self::new(method, bucket, key, headers, None)
    }

    /// Parameters for presigned object access; `expires` is in epoch seconds
    pub fn for_presigned_object(method: Method, bucket: &str, key: &str, expires: i64) -> Self {
        Self::new(method, bucket, key, Multimap::new(), Some(expires))
    }

    pub fn with_sub_resource(mut self, sub_resource: SubResource) -> Self {
        self.sub_resource = Some(sub_resource);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn headers(&self) -> &Multimap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Multimap {
        &mut self.headers
    }

    pub fn sub_resource(&self) -> Option<&SubResource> {
        self.sub_resource.as_ref()
    }

    pub fn expires(&self) -> Option<i64> {
        self.expires
    }

    pub fn into_headers(self) -> Multimap {
        self.headers
    }

    /// Request path for the URL. Path-style addressing includes the bucket,
    /// hosted-style addressing carries it in the host name instead.
    pub fn to_path(&self, include_bucket: bool) -> String {
        let mut buf = String::new();
        self.write_path(&mut buf, include_bucket, true);
        buf
    }

    /// Resource part of the canonical string, `/bucket/key?sub-resource`
    pub fn canonical_resource(&self) -> String {
        let mut buf = String::new();
        self.write_path(&mut buf, true, false);
        buf
    }

    fn write_path(&self, buf: &mut String, include_bucket: bool, encode_sub_resource: bool) {
        buf.push('/');
        if include_bucket {
            if let Some(bucket) = &self.bucket {
                buf.push_str(bucket);
                buf.push('/');
            }
        }
        if let Some(key) = &self.key {
            let mut first = true;
            for segment in key.split('/').filter(|s| !s.is_empty()) {
                if !first {
                    buf.push('/');
                }
                first = false;
                buf.push_str(&url_encode(segment));
            }
        }
        if let Some(sub_resource) = &self.sub_resource {
            buf.push('?');
            sub_resource.write(buf, encode_sub_resource);
        }
    }

    /// Builds the canonical string that gets signed.
    ///
    /// Fails when neither a Date header, an `x-amz-date` header nor an expiry is present.
    pub fn to_sign(&self) -> Result<String, ValidationErr> {
        let mut canonical = self.headers.get_canonical_headers();

        if canonical.contains_key(X_AMZ_DATE) {
            canonical.insert(DATE_KEY.to_string(), String::new());
        }
        // expiry wins over both Date and x-amz-date
        if let Some(expires) = self.expires {
            canonical.insert(DATE_KEY.to_string(), expires.to_string());
        }
        canonical.entry(CONTENT_TYPE_KEY.to_string()).or_default();
        canonical.entry(CONTENT_MD5_KEY.to_string()).or_default();
        if !canonical.contains_key(DATE_KEY) {
            return Err(ValidationErr::MissingDateHeader);
        }

        let mut buf = String::new();
        buf.push_str(self.method.as_str());
        buf.push('\n');
        for (key, value) in &canonical {
            if key.starts_with(AMZ_HEADER_PREFIX) {
                buf.push_str(key);
                buf.push(':');
            }
            buf.push_str(value);
            buf.push('\n');
        }
        self.write_path(&mut buf, true, false);

        Ok(buf)
    }

    /// Adds a header value, keeping any existing ones
    pub fn add_header<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.headers.add(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::header_constants::{CONTENT_MD5, CONTENT_TYPE, DATE};

    const DATE_VALUE: &str = "Tue, 27 Mar 2007 19:36:42 +0000";

    #[test]
    fn test_canonical_string_known_vector() {
        let mut params = Parameters::for_object(Method::GET, "johnsmith", "puppy.jpg");
        params.add_header(DATE, DATE_VALUE);
        assert_eq!(
            params.to_sign().unwrap(),
            "GET\n\n\nTue, 27 Mar 2007 19:36:42 +0000\n/johnsmith/puppy.jpg"
        );
    }

    #[test]
    fn test_canonical_string_with_content_headers() {
        let mut headers = Multimap::new();
        headers.add(CONTENT_TYPE, "image/jpeg");
        headers.add(CONTENT_MD5, "4gJE4saaMU4BqNR0kLY+lw==");
        headers.add(DATE, "Tue, 27 Mar 2007 21:15:45 +0000");
        let params =
            Parameters::for_object_with_headers(Method::PUT, "johnsmith", "photos/puppy.jpg", headers);
        assert_eq!(
            params.to_sign().unwrap(),
            "PUT\n4gJE4saaMU4BqNR0kLY+lw==\nimage/jpeg\nTue, 27 Mar 2007 21:15:45 +0000\n/johnsmith/photos/puppy.jpg"
        );
    }

    #[test]
    fn test_x_amz_date_blanks_date_line() {
        let mut params = Parameters::for_object(Method::DELETE, "johnsmith", "photos/puppy.jpg");
        params.add_header(DATE, DATE_VALUE);
        params.add_header("x-amz-date", "Tue, 27 Mar 2007 21:20:26 +0000");
        assert_eq!(
            params.to_sign().unwrap(),
            "DELETE\n\n\n\nx-amz-date:Tue, 27 Mar 2007 21:20:26 +0000\n/johnsmith/photos/puppy.jpg"
        );
    }

    #[test]
    fn test_expiry_replaces_date_line() {
        let mut params =
            Parameters::for_presigned_object(Method::GET, "johnsmith", "photos/puppy.jpg", 1175139620);
        params.add_header(DATE, DATE_VALUE);
        params.add_header("X-Amz-Date", "Tue, 27 Mar 2007 21:20:26 +0000");
        let canonical = params.to_sign().unwrap();
        assert!(canonical.starts_with("GET\n\n\n1175139620\n"));
        assert!(!canonical.contains(DATE_VALUE));
    }

    #[test]
    fn test_missing_date_is_an_error() {
        let params = Parameters::for_bucket(Method::GET, "johnsmith");
        assert!(matches!(
            params.to_sign(),
            Err(ValidationErr::MissingDateHeader)
        ));
    }

    #[test]
    fn test_amz_headers_sorted_and_joined() {
        let mut params = Parameters::for_object(Method::PUT, "static.johnsmith.net", "db-backup.dat.gz");
        params.add_header(DATE, DATE_VALUE);
        params.add_header("X-Amz-Meta-ReviewedBy", "joe@johnsmith.net");
        params.add_header("X-Amz-Meta-ReviewedBy", "jane@johnsmith.net");
        params.add_header("x-amz-acl", "public-read");
        params.add_header("X-Amz-Meta-FileChecksum", "0x02661779");
        assert_eq!(
            params.to_sign().unwrap(),
            "PUT\n\n\nTue, 27 Mar 2007 19:36:42 +0000\n\
             x-amz-acl:public-read\n\
             x-amz-meta-filechecksum:0x02661779\n\
             x-amz-meta-reviewedby:joe@johnsmith.net,jane@johnsmith.net\n\
             /static.johnsmith.net/db-backup.dat.gz"
        );
    }

    #[test]
    fn test_resource_for_all_buckets_and_bucket() {
        assert_eq!(Parameters::for_all_buckets().canonical_resource(), "/");
        assert_eq!(
            Parameters::for_bucket(Method::GET, "johnsmith").canonical_resource(),
            "/johnsmith/"
        );
    }

    #[test]
    fn test_resource_encodes_each_key_segment() {
        let params = Parameters::for_object(Method::GET, "johnsmith", "photos/2007 march/pup+py.jpg");
        assert_eq!(
            params.canonical_resource(),
            "/johnsmith/photos/2007%20march/pup%2Bpy.jpg"
        );
    }

    #[test]
    fn test_resource_omits_empty_segments() {
        let params = Parameters::for_object(Method::GET, "johnsmith", "/photos//puppy.jpg");
        assert_eq!(params.canonical_resource(), "/johnsmith/photos/puppy.jpg");
    }

    #[test]
    fn test_resource_with_sub_resources() {
        let params = Parameters::for_object(Method::POST, "johnsmith", "big.iso")
            .with_sub_resource(SubResource::Uploads);
        assert_eq!(params.canonical_resource(), "/johnsmith/big.iso?uploads");

        let params = Parameters::for_object(Method::PUT, "johnsmith", "big.iso").with_sub_resource(
            SubResource::Part {
                part_number: 2,
                upload_id: "VXBsb2FkIElE+1".to_string(),
            },
        );
        assert_eq!(
            params.canonical_resource(),
            "/johnsmith/big.iso?partNumber=2&uploadId=VXBsb2FkIElE+1"
        );
        assert_eq!(
            params.to_path(true),
            "/johnsmith/big.iso?partNumber=2&uploadId=VXBsb2FkIElE%2B1"
        );

        let params =
            Parameters::for_bucket(Method::GET, "johnsmith").with_sub_resource(SubResource::Acl);
        assert_eq!(params.canonical_resource(), "/johnsmith/?acl");
    }

    #[test]
    fn test_hosted_style_path_drops_bucket() {
        let params = Parameters::for_object(Method::GET, "johnsmith", "photos/puppy.jpg");
        assert_eq!(params.to_path(false), "/photos/puppy.jpg");
        assert_eq!(params.to_path(true), "/johnsmith/photos/puppy.jpg");
        assert_eq!(Parameters::for_bucket(Method::GET, "johnsmith").to_path(false), "/");
    }
}
