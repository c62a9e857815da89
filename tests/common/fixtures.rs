//! Filesystem fixtures for signing requests.

use etoken_signer::{
    ContainerName, InputFile, SignRequest, SignerConfiguration, TimestampUrl, TokenPin,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A certificate and a target file on disk, removed on drop.
pub struct SigningFixture {
    pub dir: TempDir,
    pub cert_path: PathBuf,
    pub target_path: PathBuf,
}

impl SigningFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let cert_path = dir.path().join("codesign.cer");
        let target_path = dir.path().join("app.exe");
        fs::write(&cert_path, b"0\x82\x01\x00not-a-real-certificate").expect("write cert");
        fs::write(&target_path, b"MZ\x90\x00unsigned").expect("write target");
        Self {
            dir,
            cert_path,
            target_path,
        }
    }

    pub fn request(&self, timestamp_url: Option<&str>) -> SignRequest {
        SignRequest::new(
            InputFile::new(&self.cert_path, "Certificate file").unwrap(),
            ContainerName::new("te-3f2a1b9c-6d4e").unwrap(),
            InputFile::new(&self.target_path, "File to sign").unwrap(),
            timestamp_url.map(|url| TimestampUrl::new(url).unwrap()),
            &SignerConfiguration::default(),
        )
        .unwrap()
    }
}

pub fn pin() -> TokenPin {
    TokenPin::new("token-pin").unwrap()
}
