//! Signing secret strength checks
//!
//! The access token is signed with a shared HS256 secret, so a guessable
//! secret is a full authentication bypass. The codec refuses to start with a
//! secret classified as `Weak`.

const MIN_SECRET_LENGTH: usize = 32;
const RECOMMENDED_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS: f64 = 4.0;
const STRONG_ENTROPY_BITS: f64 = 5.0;
const MAX_RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    Weak,
    Acceptable,
    Strong,
}

/// Classify an HS256 secret by length, Shannon entropy and trivial runs
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    let bytes = secret.as_bytes();

    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = shannon_entropy(bytes);
    if entropy < MIN_ENTROPY_BITS || has_trivial_run(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= STRONG_ENTROPY_BITS {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Bits per byte, 0..=8
fn shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let len = data.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Detects "aaaa" style repeats and "abcd" / "1234" style ascending runs
fn has_trivial_run(data: &[u8]) -> bool {
    let mut repeat = 1;
    let mut ascending = 1;

    for pair in data.windows(2) {
        repeat = if pair[0] == pair[1] { repeat + 1 } else { 1 };
        ascending = if pair[1] as i16 - pair[0] as i16 == 1 {
            ascending + 1
        } else {
            1
        };

        if repeat >= MAX_RUN || ascending >= MAX_RUN {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_weak() {
        assert_eq!(validate_secret_strength("short"), SecretStrength::Weak);
    }

    #[test]
    fn test_low_entropy_secret_is_weak() {
        let weak = "a".repeat(40);
        assert_eq!(validate_secret_strength(&weak), SecretStrength::Weak);
    }

    #[test]
    fn test_sequential_secret_is_weak() {
        let weak = "abcdefghijklmnopqrstuvwxyzabcdef";
        assert_eq!(validate_secret_strength(weak), SecretStrength::Weak);
    }

    #[test]
    fn test_acceptable_secret() {
        let acceptable = "J8Kq2mPvRx4TnZs9YwLcGf7DhBe3Xa6W";
        assert_eq!(
            validate_secret_strength(acceptable),
            SecretStrength::Acceptable
        );
    }

    #[test]
    fn test_strong_secret() {
        let strong = "N3vq8Zr1Lk5Tw9Xc2Hb7Mj4Pd6Sf0Gy8Qa3Ue5Ri1Oz7Kx2Cv9Bn4Wl6Jt8Fh0Ds";
        assert_eq!(validate_secret_strength(strong), SecretStrength::Strong);
    }

    #[test]
    fn test_entropy_bounds() {
        assert!(shannon_entropy(&[b'a'; 100]) < 0.1);

        let uniform: Vec<u8> = (0..=255).collect();
        assert!(shannon_entropy(&uniform) > 7.5);
    }

    #[test]
    fn test_trivial_runs() {
        assert!(has_trivial_run(b"xaaaay"));
        assert!(has_trivial_run(b"1234"));
        assert!(!has_trivial_run(b"aZ3$"));
    }
}
