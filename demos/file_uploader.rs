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

use clap::Parser;
use log::info;
use s3dropbox::s3::S3ClientBuilder;
use s3dropbox::s3::creds::StaticProvider;
use s3dropbox::s3::http::BaseUrl;
use s3dropbox::s3::multipart::TransferConfig;
use std::path::PathBuf;

/// Upload a file to the given bucket and object key, printing progress.
///
/// Credentials are read from S3_ACCESS_KEY and S3_SECRET_KEY.
#[derive(Parser)]
struct Cli {
    /// Bucket to upload the file to (will be created if it doesn't exist)
    bucket: String,
    /// Object key to upload the file to.
    object: String,
    /// File to upload.
    file: PathBuf,
    /// Storage endpoint
    #[arg(long, default_value = "https://s3.amazonaws.com")]
    endpoint: String,
    /// Put the bucket in the path instead of the host name
    #[arg(long)]
    path_style: bool,
    /// Parts uploaded at once for large files
    #[arg(long, default_value_t = 1)]
    parallel_parts: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init(); // Note: set environment variable RUST_LOG="INFO" to log info and higher
    let args = Cli::parse();

    let mut base_url: BaseUrl = args.endpoint.parse()?;
    base_url.virtual_style = !args.path_style;

    let client = S3ClientBuilder::new(base_url)
        .provider(StaticProvider::new(
            &std::env::var("S3_ACCESS_KEY")?,
            &std::env::var("S3_SECRET_KEY")?,
        ))
        .transfer_config(TransferConfig::default().part_concurrency(args.parallel_parts))
        .build()?;

    if !client.bucket_exists(&args.bucket).await? {
        client.create_bucket(&args.bucket, None).await?;
    }

    client
        .create_object(&args.bucket, &args.object, &args.file, |so_far: u64, total: u64| {
            let percent = if total == 0 { 100 } else { so_far * 100 / total };
            eprint!("\r{so_far}/{total} bytes ({percent}%)");
        })
        .await?;
    eprintln!();

    info!(
        "Uploaded file at {:?} to {}/{}",
        args.file, args.bucket, args.object
    );
    Ok(())
}
