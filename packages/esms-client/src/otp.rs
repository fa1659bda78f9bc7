//! One-time password codes.

use rand::Rng;
use std::fmt;

use crate::error::{EsmsError, Result};

/// Number of digits in a generated code.
pub const OTP_LENGTH: usize = 6;

const DIGITS: &[u8; 10] = b"0123456789";

/// A 6-digit, ASCII-only one-time password.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OtpCode(String);

impl OtpCode {
    /// Parse an existing code, e.g. one typed back by the user.
    pub fn parse(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code))
        } else {
            Err(EsmsError::InvalidOtpCode(code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Codes are as sensitive as passwords while they are live.
impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate a fresh code from the thread-local generator.
pub fn generate_otp_code() -> OtpCode {
    generate_otp_code_with(&mut rand::thread_rng())
}

/// Generate a code from the given random source.
///
/// Each digit is drawn independently and uniformly, with replacement, so
/// codes are not unique across calls.
pub fn generate_otp_code_with<R: Rng>(rng: &mut R) -> OtpCode {
    let code = (0..OTP_LENGTH)
        .map(|_| DIGITS[rng.gen_range(0..DIGITS.len())] as char)
        .collect();
    OtpCode(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_code_is_six_digits() {
        for _ in 0..1_000 {
            let code = generate_otp_code();
            assert_eq!(code.as_str().len(), OTP_LENGTH);
            assert!(code.as_str().chars().all(|c| "0123456789".contains(c)));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_otp_code_with(&mut StdRng::seed_from_u64(7));
        let b = generate_otp_code_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_digits_are_uniform() {
        let mut rng = StdRng::seed_from_u64(0x0e5);
        let mut counts = [0u32; 10];

        for _ in 0..10_000 {
            for b in generate_otp_code_with(&mut rng).as_str().bytes() {
                counts[(b - b'0') as usize] += 1;
            }
        }

        let total: u32 = counts.iter().sum();
        assert_eq!(total, 60_000);

        // Chi-square with 9 degrees of freedom; 40.0 sits well past p = 0.0001.
        let expected = total as f64 / 10.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(chi_square < 40.0, "digit counts {:?} (chi2 = {})", counts, chi_square);
    }

    #[test]
    fn test_default_generator_has_no_digit_bias() {
        let mut counts = [0u32; 10];
        for _ in 0..10_000 {
            for b in generate_otp_code().as_str().bytes() {
                counts[(b - b'0') as usize] += 1;
            }
        }

        // Unseeded, so the bound is loose: chi2 = 60 with 9 dof is p < 1e-9.
        let expected = 6_000.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi_square < 60.0, "digit counts {:?} (chi2 = {})", counts, chi_square);
        assert!(counts.iter().all(|&c| c > 5_500 && c < 6_500), "digit counts {:?}", counts);
    }

    #[test]
    fn test_parse_rejects_malformed_codes() {
        assert!(OtpCode::parse("123456").is_ok());
        assert!(OtpCode::parse("12345").is_err());
        assert!(OtpCode::parse("1234567").is_err());
        assert!(OtpCode::parse("12a456").is_err());
        assert!(OtpCode::parse("١٢٣٤٥٦").is_err());
    }

    #[test]
    fn test_debug_hides_code() {
        let code = OtpCode::parse("424242").unwrap();
        assert!(!format!("{:?}", code).contains("424242"));
        assert_eq!(code.to_string(), "424242");
    }
}
