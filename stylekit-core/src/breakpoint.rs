//! Device breakpoints and the key-suffix convention for responsive overrides.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{StyleError, StyleResult};

/// A device breakpoint.
///
/// `Desktop` is the canonical base. `Tablet` and `Mobile` values are optional
/// overrides stored under `<property>_<breakpoint>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Base values.
    #[default]
    Desktop,
    /// Tablet override.
    Tablet,
    /// Mobile override.
    Mobile,
}

impl Breakpoint {
    /// All breakpoints, base first.
    pub const ALL: [Self; 3] = [Self::Desktop, Self::Tablet, Self::Mobile];

    /// Lowercase name of the breakpoint.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }

    /// Key suffix used for overrides, `None` for the base breakpoint.
    #[must_use]
    pub const fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some("tablet"),
            Self::Mobile => Some("mobile"),
        }
    }

    /// Whether this is the base breakpoint.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Desktop)
    }

    /// Storage key for `base` at this breakpoint.
    ///
    /// ```
    /// use stylekit_core::Breakpoint;
    ///
    /// assert_eq!(Breakpoint::Desktop.key("margin_top"), "margin_top");
    /// assert_eq!(Breakpoint::Mobile.key("margin_top"), "margin_top_mobile");
    /// ```
    #[must_use]
    pub fn key(self, base: &str) -> Cow<'_, str> {
        match self.suffix() {
            None => Cow::Borrowed(base),
            Some(suffix) => Cow::Owned(format!("{base}_{suffix}")),
        }
    }

    /// Split a storage key into its base key and breakpoint.
    ///
    /// Keys without a recognised suffix belong to the base breakpoint.
    #[must_use]
    pub fn split_key(key: &str) -> (&str, Self) {
        for bp in [Self::Tablet, Self::Mobile] {
            if let Some(base) = bp
                .suffix()
                .and_then(|suffix| key.strip_suffix(suffix))
                .and_then(|rest| rest.strip_suffix('_'))
            {
                if !base.is_empty() {
                    return (base, bp);
                }
            }
        }
        (key, Self::Desktop)
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Breakpoint {
    type Err = StyleError;

    fn from_str(s: &str) -> StyleResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "tablet" => Ok(Self::Tablet),
            "mobile" => Ok(Self::Mobile),
            _ => Err(StyleError::InvalidBreakpoint(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_suffixing() {
        assert_eq!(Breakpoint::Desktop.key("padding_left"), "padding_left");
        assert_eq!(Breakpoint::Tablet.key("padding_left"), "padding_left_tablet");
        assert_eq!(Breakpoint::Mobile.key("margin_linked"), "margin_linked_mobile");
    }

    #[test]
    fn test_split_key() {
        assert_eq!(
            Breakpoint::split_key("margin_top_tablet"),
            ("margin_top", Breakpoint::Tablet)
        );
        assert_eq!(
            Breakpoint::split_key("marginTop_mobile"),
            ("marginTop", Breakpoint::Mobile)
        );
        assert_eq!(
            Breakpoint::split_key("margin_top"),
            ("margin_top", Breakpoint::Desktop)
        );
        // A bare suffix is a key of its own, not an override of nothing.
        assert_eq!(Breakpoint::split_key("_mobile"), ("_mobile", Breakpoint::Desktop));
        assert_eq!(Breakpoint::split_key("mobile"), ("mobile", Breakpoint::Desktop));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Tablet".parse::<Breakpoint>().unwrap(), Breakpoint::Tablet);
        assert_eq!(Breakpoint::Mobile.to_string(), "mobile");
        assert!(matches!(
            "watch".parse::<Breakpoint>(),
            Err(StyleError::InvalidBreakpoint(_))
        ));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Breakpoint::Tablet).unwrap();
        assert_eq!(json, "\"tablet\"");
        let bp: Breakpoint = serde_json::from_str("\"mobile\"").unwrap();
        assert_eq!(bp, Breakpoint::Mobile);
    }
}
