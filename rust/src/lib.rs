//! segid: configurable, segmented, human-readable identifiers.
//!
//! A [`GeneratorConfig`] is validated once into a [`Generator`]; every call
//! to [`Generator::generate`] draws fresh randomness and reads the clock.
//! Collision avoidance is probabilistic; nothing is tracked between calls.
//!
//! # Format
//!
//! ```text
//! ID ::= [PREFIX D] [DATE [D TIME] D] SEG (D SEG){n-1} [D POSTFIX] [D CHECK]
//! ```
//!
//! `DATE` is `YYYYMMDD` or `YYMMDD`, `TIME` is `HHMMSS`, each `SEG` is drawn
//! from `[0-9A-Z]` (or lowercase), and `D` is the configured delimiter,
//! possibly empty.
//!
//! # Example
//!
//! ```
//! use segid::{GeneratorConfig, create_generator, validate_check_char};
//!
//! let generator = create_generator(GeneratorConfig::default().with_check_bit(true))
//!     .expect("valid configuration");
//! let id = generator.generate().expect("entropy available");
//! println!("{}", id); // e.g., "ID-20260212-K3J9QZ0AB12C-7"
//! assert!(validate_check_char(&id));
//! ```

mod async_api;
mod check;
mod clock;
mod config;
mod error;
mod generator;
mod random;

pub use async_api::{async_generate, async_generate_batch};
pub use check::{compute_check_char, validate_check_char};
pub use clock::{Clock, FixedClock, SystemClock, format_date_segment};
pub use config::{
    DEFAULT_NUM_SEGMENTS, DEFAULT_PREFIX, DEFAULT_SEGMENT_LENGTH, Delimiter, GeneratorConfig,
    Settings, segment_length_range,
};
pub use error::IdError;
pub use generator::{Generator, create_generator};
pub use random::{ALPHABET, OsRandom, RandomSource, ThreadRandom, random_segment};
