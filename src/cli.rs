//! Command-line arguments.
//!
//! The tool takes exactly five positional arguments. Values may start with
//! `-` so PINs and container names are never mistaken for flags. With exactly
//! five arguments nothing is read as a flag, not even `--help` or `--`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::domain::request::SignRequest;
use crate::domain::types::{ContainerName, InputFile, TimestampUrl, TokenPin};
use crate::infra::config::SignerConfiguration;
use crate::infra::error::SigningResult;

#[derive(Parser)]
#[command(name = "etokensign")]
#[command(about = "Authenticode signing with a hardware token through the Windows signing wizard")]
#[command(long_about = "
Signs a file in place with a certificate whose private key lives on a hardware
token. The token is unlocked through its cryptographic service provider and
the signature is produced by the Windows signing wizard using SHA-256.

EXAMPLE:
    etokensign mycert.cer te-3f2a1b9c-6d4e 'token-pin' http://timestamp.digicert.com myapp.exe

Pass an empty timestamp URL (\"\") to sign without a timestamp.

ENVIRONMENT VARIABLES:
    ETOKENSIGN_CONFIG   Path to the configuration file
    RUST_LOG            Logging level (debug, info, warn, error)
")]
#[command(version)]
pub struct SignArgs {
    /// Signing certificate file (DER or base64 .cer)
    #[arg(value_name = "CERTIFICATE_FILE", allow_hyphen_values = true)]
    pub certificate_file: PathBuf,

    /// Private key container name on the token
    #[arg(value_name = "CONTAINER_NAME", allow_hyphen_values = true)]
    pub container_name: String,

    /// Token PIN
    #[arg(value_name = "TOKEN_PIN", allow_hyphen_values = true)]
    pub token_pin: String,

    /// RFC 3161 timestamp server URL, or "" for none
    #[arg(value_name = "TIMESTAMP_URL", allow_hyphen_values = true)]
    pub timestamp_url: String,

    /// File to sign in place
    #[arg(value_name = "FILE_TO_SIGN", allow_hyphen_values = true)]
    pub file_to_sign: PathBuf,
}

/// Everything a signing run needs, validated
#[derive(Debug)]
pub struct SignJob {
    pub request: SignRequest,
    pub pin: TokenPin,
}

impl SignArgs {
    /// Parse an argv-style iterator (program name first).
    ///
    /// # Errors
    ///
    /// Returns clap's error for a wrong argument count, `--help` or `--version`.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if let [_, certificate_file, container_name, token_pin, timestamp_url, file_to_sign] =
            args.as_slice()
        {
            return Ok(Self {
                certificate_file: PathBuf::from(certificate_file),
                container_name: utf8_value(container_name, "CONTAINER_NAME")?,
                token_pin: utf8_value(token_pin, "TOKEN_PIN")?,
                timestamp_url: utf8_value(timestamp_url, "TIMESTAMP_URL")?,
                file_to_sign: PathBuf::from(file_to_sign),
            });
        }
        Self::try_parse_from(args)
    }

    /// Validate every value and build the job.
    ///
    /// Nothing here touches the token, so bad input never costs a PIN try.
    pub fn into_job(self, config: &SignerConfiguration) -> SigningResult<SignJob> {
        let pin = TokenPin::new(self.token_pin)?;
        let container = ContainerName::new(self.container_name)?;
        let timestamp_url = TimestampUrl::optional(&self.timestamp_url)?;
        let certificate_file = InputFile::new(self.certificate_file, "Certificate file")?;
        let file_to_sign = InputFile::new(self.file_to_sign, "File to sign")?;

        let request = SignRequest::new(
            certificate_file,
            container,
            file_to_sign,
            timestamp_url,
            config,
        )?;
        Ok(SignJob { request, pin })
    }
}

fn utf8_value(value: &OsString, name: &str) -> Result<String, clap::Error> {
    value.to_str().map(str::to_owned).ok_or_else(|| {
        SignArgs::command().error(
            ErrorKind::InvalidUtf8,
            format!("{name} is not valid UTF-8"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::error::SigningError;
    use crate::HashAlgorithm;
    use tempfile::NamedTempFile;

    fn argv(rest: &[&str]) -> Vec<String> {
        std::iter::once("etokensign")
            .chain(rest.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_five_positionals_parse() {
        let args = SignArgs::parse_from_args(argv(&[
            "cert.cer",
            "container",
            "1234",
            "http://ts.ssl.com",
            "app.exe",
        ]))
        .unwrap();

        assert_eq!(args.certificate_file, PathBuf::from("cert.cer"));
        assert_eq!(args.container_name, "container");
        assert_eq!(args.token_pin, "1234");
        assert_eq!(args.timestamp_url, "http://ts.ssl.com");
        assert_eq!(args.file_to_sign, PathBuf::from("app.exe"));
    }

    #[test]
    fn test_wrong_argument_count_rejected() {
        let too_few = SignArgs::parse_from_args(argv(&["cert.cer", "container", "1234"]))
            .err()
            .unwrap();
        assert_eq!(too_few.kind(), ErrorKind::MissingRequiredArgument);

        let none = SignArgs::parse_from_args(argv(&[])).err().unwrap();
        assert_eq!(none.kind(), ErrorKind::MissingRequiredArgument);

        let too_many = SignArgs::parse_from_args(argv(&[
            "cert.cer",
            "container",
            "1234",
            "http://ts.ssl.com",
            "app.exe",
            "extra",
        ]))
        .err()
        .unwrap();
        assert_eq!(too_many.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_hyphen_values_are_positional() {
        let args = SignArgs::parse_from_args(argv(&[
            "cert.cer",
            "-container",
            "-1234",
            "",
            "app.exe",
        ]))
        .unwrap();
        assert_eq!(args.container_name, "-container");
        assert_eq!(args.token_pin, "-1234");
        assert_eq!(args.timestamp_url, "");
    }

    #[test]
    fn test_flag_lookalikes_are_values_with_five_arguments() {
        for value in ["-h", "--help", "-V", "--version", "--"] {
            let args = SignArgs::parse_from_args(argv(&[
                "cert.cer",
                value,
                value,
                value,
                "app.exe",
            ]))
            .unwrap_or_else(|e| panic!("{value:?} was not taken as a value: {:?}", e.kind()));
            assert_eq!(args.container_name, value);
            assert_eq!(args.token_pin, value);
            assert_eq!(args.timestamp_url, value);
        }
    }

    #[test]
    fn test_help_and_version_still_work_alone() {
        let help = SignArgs::parse_from_args(argv(&["--help"])).err().unwrap();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);

        let version = SignArgs::parse_from_args(argv(&["-V"])).err().unwrap();
        assert_eq!(version.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_into_job_validates_values() {
        let cert = NamedTempFile::new().unwrap();
        let target = NamedTempFile::new().unwrap();
        let config = SignerConfiguration::default();
        let make = |container: &str, pin: &str, url: &str, target: PathBuf| SignArgs {
            certificate_file: cert.path().to_path_buf(),
            container_name: container.to_string(),
            token_pin: pin.to_string(),
            timestamp_url: url.to_string(),
            file_to_sign: target,
        };

        let job = make("c", "1234", "http://ts.ssl.com", target.path().to_path_buf())
            .into_job(&config)
            .unwrap();
        assert_eq!(job.pin.as_str(), "1234");
        assert_eq!(job.request.container.as_str(), "c");
        assert_eq!(job.request.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(
            job.request.timestamp_url.as_ref().map(TimestampUrl::as_str),
            Some("http://ts.ssl.com")
        );

        let job = make("c", "1234", "", target.path().to_path_buf())
            .into_job(&config)
            .unwrap();
        assert!(job.request.timestamp_url.is_none());

        let failures = [
            make("", "1234", "", target.path().to_path_buf()),
            make("c", "", "", target.path().to_path_buf()),
            make("c", "1234", "ts.ssl.com", target.path().to_path_buf()),
            make("c", "1234", "", target.path().with_extension("missing")),
        ];
        for args in failures {
            match args.into_job(&config) {
                Err(SigningError::ValidationError(_)) => {}
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }
}
