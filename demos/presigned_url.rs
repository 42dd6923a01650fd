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

use chrono::{Duration, Utc};
use clap::Parser;
use s3dropbox::s3::S3ClientBuilder;
use s3dropbox::s3::creds::StaticProvider;

/// Print a URL that grants download access to an object for a while.
///
/// Credentials are read from S3_ACCESS_KEY and S3_SECRET_KEY. No request is
/// made.
#[derive(Parser)]
struct Cli {
    bucket: String,
    object: String,
    /// Validity in minutes
    #[arg(long, default_value_t = 60)]
    minutes: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();
    let args = Cli::parse();

    let client = S3ClientBuilder::default()
        .provider(StaticProvider::new(
            &std::env::var("S3_ACCESS_KEY")?,
            &std::env::var("S3_SECRET_KEY")?,
        ))
        .build()?;

    let expiry = Utc::now() + Duration::minutes(args.minutes);
    println!("{}", client.presigned_url(&args.bucket, &args.object, expiry)?);
    Ok(())
}
