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

use rand::distr::{Alphanumeric, SampleString};
use rand::prelude::SmallRng;
use rand::{RngCore, SeedableRng};

pub fn rand_bucket_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8).to_lowercase()
}

pub fn rand_object_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8)
}

/// `size` random bytes
pub fn rand_data(size: usize) -> Vec<u8> {
    let mut rng = SmallRng::from_os_rng();
    let mut buf = vec![0; size];
    rng.fill_bytes(&mut buf);
    buf
}

/// Body of a `GET bucket` listing
pub fn list_objects_body(keys: &[&str], prefixes: &[&str], truncated: bool) -> String {
    let mut body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Name>bucket</Name><MaxKeys>1000</MaxKeys><IsTruncated>{truncated}</IsTruncated>"
    );
    for key in keys {
        body.push_str(&format!(
            "<Contents><Key>{key}</Key><LastModified>2009-10-12T17:50:30.000Z</LastModified>\
             <ETag>\"fba9dede5f27731c9771645a39863328\"</ETag><Size>434234</Size>\
             <StorageClass>STANDARD</StorageClass></Contents>"
        ));
    }
    for prefix in prefixes {
        body.push_str(&format!(
            "<CommonPrefixes><Prefix>{prefix}</Prefix></CommonPrefixes>"
        ));
    }
    body.push_str("</ListBucketResult>");
    body
}
