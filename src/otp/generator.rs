//! Numeric code generation.

use rand::Rng;

use crate::error::{OtpError, Result};

/// Digits in a code unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Returns `length` independent decimal digits, each uniform over `0-9`.
///
/// Digits come from the thread-local `rand` generator, which is a CSPRNG
/// reseeded from the operating system.
pub fn generate_code(length: usize) -> Result<String> {
    if length == 0 {
        return Err(OtpError::InvalidLength);
    }

    let mut rng = rand::thread_rng();
    Ok((0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_length_code() {
        let code = generate_code(DEFAULT_CODE_LENGTH).unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(generate_code(0), Err(OtpError::InvalidLength)));
    }

    #[test]
    fn test_leading_zeros_are_kept() {
        // With 2000 single-digit draws, a '0' is all but certain.
        let saw_zero = (0..2000).any(|_| generate_code(1).unwrap() == "0");
        assert!(saw_zero);
    }

    #[test]
    fn test_digits_are_roughly_uniform() {
        let mut counts = [0usize; 10];
        let samples = 10_000;
        for _ in 0..samples {
            for digit in generate_code(6).unwrap().bytes() {
                counts[(digit - b'0') as usize] += 1;
            }
        }

        // Expected 6000 per digit; allow a generous band.
        for (digit, count) in counts.iter().enumerate() {
            assert!(
                (5_400..=6_600).contains(count),
                "digit {} drawn {} times",
                digit,
                count
            );
        }
    }
}
