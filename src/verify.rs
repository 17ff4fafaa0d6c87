//! Output integrity and generator version checks.

use sha2::{Digest, Sha256};

use crate::codegen::CodegenResult;
use crate::error::GenError;

/// Computes the SHA-256 hash of `content` and returns it in `sha256:hex` format.
pub fn compute_sha256(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Checks `result` against an expected fingerprint.
///
/// `expected` must be in `algorithm:hex_digest` format (e.g. `sha256:abcdef01...`).
/// Only `sha256` is currently supported.
pub fn verify_fingerprint(result: &CodegenResult, expected: &str) -> Result<(), GenError> {
    let (algo, expected_hex) = expected.split_once(':').ok_or_else(|| {
        GenError::user(format!(
            "invalid fingerprint format '{expected}'; expected 'algorithm:hex_digest'"
        ))
    })?;

    match algo {
        "sha256" => {
            let actual = result.fingerprint();
            let actual_hex = actual.trim_start_matches("sha256:");
            if !actual_hex.eq_ignore_ascii_case(expected_hex) {
                return Err(GenError::user(format!(
                    "sha256 mismatch: expected {expected_hex}, got {actual_hex}"
                )));
            }
            Ok(())
        }
        _ => Err(GenError::user(format!(
            "unsupported fingerprint algorithm '{algo}'; supported: sha256"
        ))),
    }
}

/// Checks that this generator's version satisfies `requirement`.
pub fn verify_generator_version(requirement: &str) -> Result<(), GenError> {
    check_version(env!("CARGO_PKG_VERSION"), requirement)
}

fn check_version(version: &str, requirement: &str) -> Result<(), GenError> {
    let req = semver::VersionReq::parse(requirement).map_err(|e| {
        GenError::user(format!("invalid version requirement '{requirement}': {e}"))
    })?;

    let version = semver::Version::parse(version).map_err(|e| {
        GenError::internal(format!("generator version '{version}' is not valid semver: {e}"))
    })?;

    if !req.matches(&version) {
        return Err(GenError::user(format!(
            "description requires apigen '{requirement}', but this is apigen {version}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{CodegenSink, SupportDefinition};
    use crate::error::ErrorKind;
    use crate::syntax::parser::{parse_compilation_unit, parse_name};

    fn result() -> CodegenResult {
        let mut sink = CodegenSink::default();
        sink.add_support(SupportDefinition::new(
            parse_name("Pet").unwrap(),
            parse_compilation_unit("package a; public class Pet {}").unwrap(),
        ));
        sink.finish()
    }

    #[test]
    fn fingerprint_match() {
        let result = result();
        assert!(verify_fingerprint(&result, &result.fingerprint()).is_ok());
    }

    #[test]
    fn fingerprint_mismatch() {
        let err = verify_fingerprint(
            &result(),
            "sha256:0000000000000000000000000000000000000000000000000000000000000000",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::User);
        assert!(err.to_string().contains("sha256 mismatch"));
    }

    #[test]
    fn fingerprint_unsupported_algorithm() {
        let err = verify_fingerprint(&result(), "md5:abc").unwrap_err();
        assert!(err.to_string().contains("unsupported fingerprint algorithm"));
    }

    #[test]
    fn fingerprint_invalid_format() {
        let err = verify_fingerprint(&result(), "nocolon").unwrap_err();
        assert!(err.to_string().contains("invalid fingerprint format"));
    }

    #[test]
    fn version_satisfied() {
        assert!(check_version("0.2.0", "^0.2").is_ok());
        assert!(verify_generator_version(">=0.1.0").is_ok());
    }

    #[test]
    fn version_not_satisfied() {
        let err = check_version("0.2.0", ">=2.0.0").unwrap_err();
        assert!(err.to_string().contains("requires apigen '>=2.0.0'"));
    }

    #[test]
    fn version_invalid_requirement() {
        let err = check_version("0.2.0", "not-a-version").unwrap_err();
        assert!(err.to_string().contains("invalid version requirement"));
    }

    #[test]
    fn compute_sha256_deterministic() {
        let a = compute_sha256(b"test data");
        let b = compute_sha256(b"test data");
        assert_eq!(a, b);
        assert!(a.starts_with("sha256:"));
    }
}
