//! Identifier generator factory and assembler.
//!
//! Format (`sep` is the resolved delimiter, possibly empty):
//!
//! ```text
//! [PREFIX sep] [DATE [sep TIME] sep] SEG (sep SEG){n-1} [sep POSTFIX] [sep CHECK]
//! ```

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::check::compute_check_char;
use crate::clock::{Clock, SystemClock, format_date_segment};
use crate::config::{GeneratorConfig, Settings};
use crate::error::IdError;
use crate::random::{OsRandom, RandomSource, random_segment};

static DEFAULT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ID\-\d{8}\-[0-9A-Z]{12}$").unwrap());

/// Validate `config` and return a generator using OS entropy and the system clock.
pub fn create_generator(config: GeneratorConfig) -> Result<Generator, IdError> {
    Generator::new(config)
}

/// Produces identifiers from validated, immutable settings.
///
/// Cloning is cheap and clones share the same settings and sources. Calls
/// never mutate shared state, so one generator may be used from many threads.
#[derive(Clone)]
pub struct Generator {
    settings: Arc<Settings>,
    pattern: Regex,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self, IdError> {
        Self::with_sources(config, OsRandom, SystemClock)
    }

    /// Build a generator with injected entropy and time sources.
    pub fn with_sources(
        config: GeneratorConfig,
        random: impl RandomSource + 'static,
        clock: impl Clock + 'static,
    ) -> Result<Self, IdError> {
        let settings = config.validate()?;
        let pattern = if *settings.config() == GeneratorConfig::default() {
            DEFAULT_PATTERN.clone()
        } else {
            build_pattern(&settings)
        };
        Ok(Self {
            settings: Arc::new(settings),
            pattern,
            random: Arc::new(random),
            clock: Arc::new(clock),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generate one identifier.
    ///
    /// Fails only when the entropy source cannot supply bytes.
    pub fn generate(&self) -> Result<String, IdError> {
        let s = &*self.settings;
        let mut parts: Vec<String> = Vec::with_capacity(s.num_segments() + 3);

        if let Some(prefix) = s.prefix().filter(|p| !p.is_empty()) {
            parts.push(prefix.to_string());
        }
        if let Some(date) = format_date_segment(self.clock.now(), s) {
            parts.push(date);
        }
        for _ in 0..s.num_segments() {
            parts.push(random_segment(
                &*self.random,
                s.segment_length(),
                s.lowercase(),
            )?);
        }
        if let Some(postfix) = s.postfix().filter(|p| !p.is_empty()) {
            parts.push(postfix.to_string());
        }

        let mut id = parts.join(s.separator());
        if s.include_check_bit() {
            let check = compute_check_char(&id);
            id.push_str(s.separator());
            id.push(check);
        }
        Ok(id)
    }

    /// Generate `n` identifiers.
    pub fn generate_n(&self, n: usize) -> Result<Vec<String>, IdError> {
        (0..n).map(|_| self.generate()).collect()
    }

    /// An endless stream of identifiers.
    pub fn iter(&self) -> impl Iterator<Item = Result<String, IdError>> + '_ {
        std::iter::repeat_with(move || self.generate())
    }

    /// Turn the generator into a plain factory closure.
    pub fn into_fn(self) -> impl Fn() -> Result<String, IdError> + Clone + Send + Sync + 'static {
        move || self.generate()
    }

    /// An anchored regex matching exactly the ids this generator produces.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Check that `id` has this generator's shape and, when enabled, a
    /// matching check character.
    ///
    /// The check character is split off using the configured separator, so
    /// literals containing other delimiter characters are handled.
    pub fn matches(&self, id: &str) -> bool {
        if !self.pattern.is_match(id) {
            return false;
        }
        if !self.settings.include_check_bit() {
            return true;
        }
        let Some((idx, claimed)) = id.char_indices().next_back() else {
            return false;
        };
        id[..idx]
            .strip_suffix(self.settings.separator())
            .is_some_and(|body| compute_check_char(body) == claimed)
    }
}

fn build_pattern(s: &Settings) -> Regex {
    let sep = regex::escape(s.separator());
    let mut parts: Vec<String> = Vec::new();

    if let Some(prefix) = s.prefix().filter(|p| !p.is_empty()) {
        parts.push(regex::escape(prefix));
    }
    if s.include_date() {
        let date_digits = if s.use_two_digit_year() { 6 } else { 8 };
        let mut date = format!(r"\d{{{date_digits}}}");
        if s.use_timestamp() {
            date.push_str(&format!(r"{sep}\d{{6}}"));
        }
        parts.push(date);
    }
    let class = if s.lowercase() { "[0-9a-z]" } else { "[0-9A-Z]" };
    for _ in 0..s.num_segments() {
        parts.push(format!("{class}{{{}}}", s.segment_length()));
    }
    if let Some(postfix) = s.postfix().filter(|p| !p.is_empty()) {
        parts.push(regex::escape(postfix));
    }
    if s.include_check_bit() {
        parts.push("[0-9A-Z]".to_string());
    }

    let pattern = format!("^{}$", parts.join(&sep));
    // every piece is either escaped or a fixed class
    Regex::new(&pattern).expect("generated id pattern is a valid regex")
}
