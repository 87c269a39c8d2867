//! Entropy sources and random segment sampling.

use crate::error::IdError;

/// Segment alphabet, indexed by `byte % 36`.
pub const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Fills buffers with cryptographically strong random bytes.
///
/// Implementations must draw fresh bytes on every call.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), IdError>;
}

/// Operating-system entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), IdError> {
        getrandom::fill(buf).map_err(|e| {
            tracing::warn!(error = %e, "OS entropy source failed");
            IdError::RandomSourceUnavailable(e.to_string())
        })
    }
}

/// The thread-local CSPRNG from `rand`, seeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), IdError> {
        rand::fill(buf);
        Ok(())
    }
}

/// Draw `len` fresh bytes and map each to one alphabet character.
pub fn random_segment(
    source: &dyn RandomSource,
    len: usize,
    lowercase: bool,
) -> Result<String, IdError> {
    let mut bytes = vec![0u8; len];
    source.fill(&mut bytes)?;
    Ok(bytes
        .into_iter()
        .map(|b| {
            let c = ALPHABET[(b % 36) as usize] as char;
            if lowercase { c.to_ascii_lowercase() } else { c }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed byte sequence and records how many bytes were drawn.
    struct Scripted {
        bytes: Vec<u8>,
        drawn: Mutex<usize>,
    }

    impl RandomSource for Scripted {
        fn fill(&self, buf: &mut [u8]) -> Result<(), IdError> {
            let mut drawn = self.drawn.lock().unwrap();
            for b in buf.iter_mut() {
                *b = self.bytes[*drawn % self.bytes.len()];
                *drawn += 1;
            }
            Ok(())
        }
    }

    struct Broken;

    impl RandomSource for Broken {
        fn fill(&self, _buf: &mut [u8]) -> Result<(), IdError> {
            Err(IdError::RandomSourceUnavailable("no entropy".to_string()))
        }
    }

    #[test]
    fn bytes_map_modulo_36() {
        let source = Scripted {
            bytes: vec![0, 9, 10, 35, 36, 71, 255],
            drawn: Mutex::new(0),
        };
        // 255 % 36 == 3
        assert_eq!(random_segment(&source, 7, false).unwrap(), "09AZ0Z3");
        assert_eq!(*source.drawn.lock().unwrap(), 7);
    }

    #[test]
    fn lowercase_segment() {
        let source = Scripted {
            bytes: vec![10, 11, 1],
            drawn: Mutex::new(0),
        };
        assert_eq!(random_segment(&source, 3, true).unwrap(), "ab1");
    }

    #[test]
    fn failure_propagates() {
        assert!(matches!(
            random_segment(&Broken, 8, false),
            Err(IdError::RandomSourceUnavailable(_))
        ));
    }

    #[test]
    fn live_sources_fill_requested_length() {
        for source in [&OsRandom as &dyn RandomSource, &ThreadRandom] {
            let seg = random_segment(source, 15, false).unwrap();
            assert_eq!(seg.len(), 15);
            assert!(
                seg.bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
            );
        }
    }

    #[test]
    fn thread_random_fills_whole_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        ThreadRandom.fill(&mut a).unwrap();
        ThreadRandom.fill(&mut b).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn os_random_draws_fresh_bytes() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsRandom.fill(&mut a).unwrap();
        OsRandom.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
