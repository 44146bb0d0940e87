// Validated enhancement configuration shared by every front end.
// Raw transport values (JSON fields, CLI flags, environment strings, query
// parameters) are normalized through the strict parsers here before any
// expensive work happens; downstream components never re-validate.

use crate::error::EnhanceError;

/// Canonical identifiers for the supported restoration methods.
pub const METHOD_NAMES: [&str; 3] = ["gfpgan", "RestoreFormer", "codeformer"];

/// Restoration method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Gfpgan,
    RestoreFormer,
    Codeformer,
}

impl Method {
    /// Parses a raw method string. Matching is case-insensitive; the
    /// canonical casing is restored on output.
    pub fn parse(raw: &str) -> Result<Self, EnhanceError> {
        match raw.to_ascii_lowercase().as_str() {
            "gfpgan" => Ok(Method::Gfpgan),
            "restoreformer" => Ok(Method::RestoreFormer),
            "codeformer" => Ok(Method::Codeformer),
            _ => Err(EnhanceError::InvalidMethod(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Gfpgan => "gfpgan",
            Method::RestoreFormer => "RestoreFormer",
            Method::Codeformer => "codeformer",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upscale factor, restricted to the closed set {2, 4}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Upscale {
    #[default]
    X2,
    X4,
}

impl Upscale {
    pub fn parse(raw: u32) -> Result<Self, EnhanceError> {
        match raw {
            2 => Ok(Upscale::X2),
            4 => Ok(Upscale::X4),
            other => Err(EnhanceError::InvalidUpscale(other.to_string())),
        }
    }

    pub fn factor(&self) -> u32 {
        match self {
            Upscale::X2 => 2,
            Upscale::X4 => 4,
        }
    }
}

// Strict boolean parsing for environment-style string flags.
// Accepts the same spellings as query-string booleans ("1", "true", "0",
// "false", case-insensitive); anything else is rejected rather than
// silently coerced.
pub fn parse_background_flag(raw: &str) -> Result<bool, EnhanceError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(EnhanceError::InvalidFlag(raw.to_string())),
    }
}

/// Immutable, validated configuration for one enhancement request.
/// An instance can only be obtained through `new` (typed fields) or
/// `validate` (raw transport values), so holding one implies validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementConfig {
    method: Method,
    background_enhancement: bool,
    upscale: Upscale,
}

impl EnhancementConfig {
    pub fn new(method: Method, background_enhancement: bool, upscale: Upscale) -> Self {
        Self {
            method,
            background_enhancement,
            upscale,
        }
    }

    /// Validates raw transport values into a configuration. Pure; the first
    /// invalid field short-circuits with its typed error.
    pub fn validate(
        method: &str,
        background_enhancement: bool,
        upscale: u32,
    ) -> Result<Self, EnhanceError> {
        Ok(Self {
            method: Method::parse(method)?,
            background_enhancement,
            upscale: Upscale::parse(upscale)?,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn background_enhancement(&self) -> bool {
        self.background_enhancement
    }

    pub fn upscale(&self) -> Upscale {
        self.upscale
    }
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            background_enhancement: true,
            upscale: Upscale::default(),
        }
    }
}
