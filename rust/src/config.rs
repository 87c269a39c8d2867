//! Generator configuration and its validation.
//!
//! [`GeneratorConfig`] is the caller-facing, freely editable option set.
//! [`GeneratorConfig::validate`] turns it into [`Settings`], the immutable form
//! a generator closes over. There is no way to obtain a partially valid
//! `Settings`.

use std::ops::RangeInclusive;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::IdError;

/// Prefix used when the caller does not set one.
pub const DEFAULT_PREFIX: &str = "ID";
/// Characters per random segment when the caller does not set one.
pub const DEFAULT_SEGMENT_LENGTH: u32 = 12;
/// Number of random segments when the caller does not set one.
pub const DEFAULT_NUM_SEGMENTS: u32 = 1;

const NUM_SEGMENTS_MSG: &str = "numSegments must be an integer between 1 and 4";
const SEGMENT_LENGTH_MSG: &str = "segmentLength must be an integer";
const DELIMITER_MSG: &str = "delimiter must be one of: -, _, |, ., #, or none";

// (numSegments, min segmentLength, max segmentLength)
const SEGMENT_LENGTH_RANGES: [(u32, u32, u32); 4] = [(1, 8, 15), (2, 5, 10), (3, 4, 8), (4, 3, 6)];

/// Valid `segment_length` range for a segment count, or `None` when the
/// count itself is out of range.
pub fn segment_length_range(num_segments: u32) -> Option<RangeInclusive<u32>> {
    SEGMENT_LENGTH_RANGES
        .iter()
        .find(|(n, _, _)| *n == num_segments)
        .map(|&(_, min, max)| min..=max)
}

/// Separator placed between identifier parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Dash,
    Underscore,
    Pipe,
    Dot,
    Hash,
}

impl Delimiter {
    /// Order in which check-character validation probes for a delimiter.
    pub const DETECTION_ORDER: [Delimiter; 5] = [
        Delimiter::Dash,
        Delimiter::Underscore,
        Delimiter::Pipe,
        Delimiter::Dot,
        Delimiter::Hash,
    ];

    pub fn as_char(self) -> char {
        match self {
            Self::Dash => '-',
            Self::Underscore => '_',
            Self::Pipe => '|',
            Self::Dot => '.',
            Self::Hash => '#',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dash => "-",
            Self::Underscore => "_",
            Self::Pipe => "|",
            Self::Dot => ".",
            Self::Hash => "#",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::DETECTION_ORDER.into_iter().find(|d| d.as_char() == c)
    }

    /// Parse a delimiter option. `""` and `"none"` mean no delimiter.
    pub fn parse(s: &str) -> Result<Option<Self>, IdError> {
        if s.is_empty() || s == "none" {
            return Ok(None);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c)
                .map(Some)
                .ok_or_else(|| IdError::invalid_config(DELIMITER_MSG)),
            _ => Err(IdError::invalid_config(DELIMITER_MSG)),
        }
    }
}

impl Serialize for Delimiter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Options accepted by [`crate::create_generator`].
///
/// `None` for `prefix`, `postfix` or `delimiter` means the part is omitted,
/// which differs from leaving the default in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub prefix: Option<String>,
    pub postfix: Option<String>,
    pub segment_length: u32,
    pub num_segments: u32,
    pub include_date: bool,
    pub use_timestamp: bool,
    pub use_two_digit_year: bool,
    pub use_local_time: bool,
    pub delimiter: Option<Delimiter>,
    pub lowercase: bool,
    pub include_check_bit: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefix: Some(DEFAULT_PREFIX.to_string()),
            postfix: None,
            segment_length: DEFAULT_SEGMENT_LENGTH,
            num_segments: DEFAULT_NUM_SEGMENTS,
            include_date: true,
            use_timestamp: false,
            use_two_digit_year: false,
            use_local_time: false,
            delimiter: Some(Delimiter::Dash),
            lowercase: false,
            include_check_bit: false,
        }
    }
}

impl GeneratorConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn without_prefix(mut self) -> Self {
        self.prefix = None;
        self
    }

    pub fn with_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = Some(postfix.into());
        self
    }

    pub fn without_postfix(mut self) -> Self {
        self.postfix = None;
        self
    }

    pub fn with_segment_length(mut self, segment_length: u32) -> Self {
        self.segment_length = segment_length;
        self
    }

    pub fn with_num_segments(mut self, num_segments: u32) -> Self {
        self.num_segments = num_segments;
        self
    }

    pub fn with_date(mut self, include_date: bool) -> Self {
        self.include_date = include_date;
        self
    }

    pub fn with_timestamp(mut self, use_timestamp: bool) -> Self {
        self.use_timestamp = use_timestamp;
        self
    }

    pub fn with_two_digit_year(mut self, use_two_digit_year: bool) -> Self {
        self.use_two_digit_year = use_two_digit_year;
        self
    }

    pub fn with_local_time(mut self, use_local_time: bool) -> Self {
        self.use_local_time = use_local_time;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Option<Delimiter>) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_check_bit(mut self, include_check_bit: bool) -> Self {
        self.include_check_bit = include_check_bit;
        self
    }

    /// Parse a loosely typed JSON configuration document.
    pub fn from_json(doc: &str) -> Result<Self, IdError> {
        let value: Value = serde_json::from_str(doc)?;
        Self::from_json_value(&value)
    }

    /// Build a configuration from a JSON object with camelCase keys.
    ///
    /// Missing keys keep their defaults, `null` omits `prefix`, `postfix` or
    /// `delimiter`, and unknown keys are ignored. Range checks are left to
    /// [`GeneratorConfig::validate`].
    pub fn from_json_value(value: &Value) -> Result<Self, IdError> {
        let obj = value
            .as_object()
            .ok_or_else(|| IdError::invalid_config("configuration must be an object"))?;

        let mut cfg = Self::default();

        if let Some(v) = obj.get("prefix") {
            cfg.prefix = optional_string(v, "prefix must be a string or absent")?;
        }
        if let Some(v) = obj.get("postfix") {
            cfg.postfix = optional_string(v, "postfix must be a string or absent")?;
        }
        if let Some(v) = obj.get("numSegments") {
            let n = json_integer(v).ok_or_else(|| IdError::invalid_config(NUM_SEGMENTS_MSG))?;
            cfg.num_segments = clamp_u32(n);
        }
        if let Some(v) = obj.get("segmentLength") {
            let n = json_integer(v).ok_or_else(|| IdError::invalid_config(SEGMENT_LENGTH_MSG))?;
            cfg.segment_length = clamp_u32(n);
        }
        if let Some(v) = obj.get("delimiter") {
            cfg.delimiter = match v {
                Value::Null => None,
                Value::String(s) => Delimiter::parse(s)?,
                _ => return Err(IdError::invalid_config(DELIMITER_MSG)),
            };
        }

        cfg.include_date = flag(obj, "includeDate", cfg.include_date)?;
        cfg.use_timestamp = flag(obj, "useTimestamp", cfg.use_timestamp)?;
        cfg.use_two_digit_year = flag(obj, "useTwoDigitYear", cfg.use_two_digit_year)?;
        cfg.use_local_time = flag(obj, "useLocalTime", cfg.use_local_time)?;
        cfg.lowercase = flag(obj, "lowercase", cfg.lowercase)?;
        cfg.include_check_bit = flag(obj, "includeCheckBit", cfg.include_check_bit)?;

        Ok(cfg)
    }

    /// Check every constraint and freeze the result.
    pub fn validate(self) -> Result<Settings, IdError> {
        match self.check_ranges() {
            Ok(()) => {
                tracing::debug!(
                    num_segments = self.num_segments,
                    segment_length = self.segment_length,
                    delimiter = self.delimiter.map_or("none", Delimiter::as_str),
                    "validated generator configuration"
                );
                Ok(Settings { config: self })
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejected generator configuration");
                Err(err)
            }
        }
    }

    fn check_ranges(&self) -> Result<(), IdError> {
        let range = segment_length_range(self.num_segments)
            .ok_or_else(|| IdError::invalid_config(NUM_SEGMENTS_MSG))?;
        if !range.contains(&self.segment_length) {
            return Err(IdError::invalid_config(format!(
                "segmentLength for {} segments must be between {} and {}",
                self.num_segments,
                range.start(),
                range.end()
            )));
        }
        Ok(())
    }
}

fn optional_string(v: &Value, msg: &str) -> Result<Option<String>, IdError> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(IdError::invalid_config(msg)),
    }
}

// Whole-valued floats such as `12.0` count as integers.
fn json_integer(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn clamp_u32(n: i64) -> u32 {
    n.clamp(0, i64::from(u32::MAX)) as u32
}

fn flag(obj: &Map<String, Value>, key: &str, default: bool) -> Result<bool, IdError> {
    match obj.get(key) {
        None => Ok(default),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| IdError::invalid_config(format!("{key} must be a boolean"))),
    }
}

/// Validated, immutable generator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    config: GeneratorConfig,
}

impl Settings {
    pub fn prefix(&self) -> Option<&str> {
        self.config.prefix.as_deref()
    }

    pub fn postfix(&self) -> Option<&str> {
        self.config.postfix.as_deref()
    }

    pub fn segment_length(&self) -> usize {
        self.config.segment_length as usize
    }

    pub fn num_segments(&self) -> usize {
        self.config.num_segments as usize
    }

    pub fn include_date(&self) -> bool {
        self.config.include_date
    }

    pub fn use_timestamp(&self) -> bool {
        self.config.use_timestamp
    }

    pub fn use_two_digit_year(&self) -> bool {
        self.config.use_two_digit_year
    }

    pub fn use_local_time(&self) -> bool {
        self.config.use_local_time
    }

    pub fn delimiter(&self) -> Option<Delimiter> {
        self.config.delimiter
    }

    /// The resolved separator, empty when no delimiter is configured.
    pub fn separator(&self) -> &'static str {
        self.config.delimiter.map_or("", Delimiter::as_str)
    }

    pub fn lowercase(&self) -> bool {
        self.config.lowercase
    }

    pub fn include_check_bit(&self) -> bool {
        self.config.include_check_bit
    }

    /// The configuration these settings were validated from.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl TryFrom<GeneratorConfig> for Settings {
    type Error = IdError;

    fn try_from(config: GeneratorConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}
