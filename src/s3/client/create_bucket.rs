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
use crate::s3::header_constants::CONTENT_TYPE;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::parameters::Parameters;
use crate::s3::transport::RequestBody;
use crate::s3::utils::{S3_NAMESPACE, check_bucket_name};
use http::{Method, StatusCode};

/// Region that needs no location constraint
pub const DEFAULT_REGION: &str = "us-east-1";

fn location_constraint(region: Option<&str>) -> Option<String> {
    match region {
        None | Some("") | Some(DEFAULT_REGION) => None,
        Some(region) => Some(format!(
            "<CreateBucketConfiguration xmlns=\"{S3_NAMESPACE}\"><LocationConstraint>{region}</LocationConstraint></CreateBucketConfiguration>"
        )),
    }
}

impl S3Client {
    /// Creates a bucket. Regions other than [`DEFAULT_REGION`] are sent as a
    /// location constraint; see [`BUCKET_REGIONS`](crate::s3::types::BUCKET_REGIONS)
    /// for the known ones.
    pub async fn create_bucket(&self, bucket: &str, region: Option<&str>) -> Result<(), Error> {
        check_bucket_name(bucket)?;

        let mut parameters = Parameters::for_bucket(Method::PUT, bucket);
        let body = match location_constraint(region) {
            Some(xml) => {
                parameters.headers_mut().add(CONTENT_TYPE, "application/xml");
                RequestBody::from(xml)
            }
            None => RequestBody::Empty,
        };

        self.execute(parameters, &Multimap::new(), body, StatusCode::OK)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_constraint() {
        assert_eq!(location_constraint(None), None);
        assert_eq!(location_constraint(Some("us-east-1")), None);
        assert_eq!(
            location_constraint(Some("eu-west-1")).unwrap(),
            "<CreateBucketConfiguration xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"><LocationConstraint>eu-west-1</LocationConstraint></CreateBucketConfiguration>"
        );
    }
}
