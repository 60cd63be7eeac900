//! Activity colours.
//!
//! A record's colour comes from its `color` metadata tags: an RGB array
//! or `#rrggbb` string is used as-is, otherwise the name is looked up in
//! the timeline palette.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tolkit_interchange::ActivityRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);

const PALETTE: &[(&str, Rgb)] = &[
    ("Aquamarine", Rgb(193, 226, 236)),
    ("Cadet Blue", Rgb(92, 144, 198)),
    ("Dodger Blue", Rgb(66, 130, 198)),
    ("Hot Pink", Rgb(245, 105, 171)),
    ("Khaki", Rgb(249, 217, 119)),
    ("Lavender", Rgb(218, 154, 190)),
    ("Orange", Rgb(249, 189, 133)),
    ("Orange Red", Rgb(244, 145, 19)),
    ("Pink", Rgb(245, 213, 228)),
    ("Plum", Rgb(176, 150, 193)),
    ("Purple", Rgb(144, 111, 169)),
    ("Salmon", Rgb(255, 191, 193)),
    ("Sky Blue", Rgb(166, 203, 240)),
    ("Spring Green", Rgb(124, 191, 183)),
    ("Violet Red", Rgb(183, 80, 163)),
    ("Yellow", Rgb(245, 202, 46)),
];

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// `#rrggbb` or `#rgb`.
    pub fn from_hex(text: &str) -> Option<Rgb> {
        let digits = text.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    /// `[r, g, b]` with each channel in 0..=255.
    pub fn from_array(items: &[Value]) -> Option<Rgb> {
        let channel = |v: &Value| v.as_u64().and_then(|n| u8::try_from(n).ok());
        match items {
            [r, g, b] => Some(Rgb(channel(r)?, channel(g)?, channel(b)?)),
            _ => None,
        }
    }

    /// Palette lookup; names compare case-insensitively.
    pub fn named(name: &str) -> Option<Rgb> {
        PALETTE
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|(_, rgb)| *rgb)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolve a record's colour.
///
/// Tags are visited in order. The first usable array or hex value wins
/// outright; otherwise the last named tag decides, and an unknown name
/// there falls back to black.
pub fn color_of(record: &ActivityRecord) -> Rgb {
    let mut named = None;
    for value in record.color_tags() {
        match value {
            Value::Array(items) => {
                if let Some(rgb) = Rgb::from_array(items) {
                    return rgb;
                }
            }
            Value::String(s) if s.starts_with('#') => {
                if let Some(rgb) = Rgb::from_hex(s) {
                    return rgb;
                }
            }
            Value::String(s) => named = Rgb::named(s),
            _ => {}
        }
    }
    named.unwrap_or(BLACK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Rgb::from_hex("#4282c6"), Some(Rgb(66, 130, 198)));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb(255, 255, 255)));
        assert_eq!(Rgb::from_hex("4282c6"), None);
        assert_eq!(Rgb::from_hex("#4282c"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb(66, 130, 198).to_hex(), "#4282c6");
    }

    #[test]
    fn test_array_form() {
        assert_eq!(
            Rgb::from_array(&[json!(1), json!(2), json!(3)]),
            Some(Rgb(1, 2, 3))
        );
        assert_eq!(Rgb::from_array(&[json!(1), json!(2)]), None);
        assert_eq!(Rgb::from_array(&[json!(1), json!(2), json!(300)]), None);
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Rgb::named("Dodger Blue"), Some(Rgb(66, 130, 198)));
        assert_eq!(Rgb::named("dodger blue"), Some(Rgb(66, 130, 198)));
        assert_eq!(Rgb::named("Mauve"), None);
    }

    #[test]
    fn test_serializes_as_hex() {
        assert_eq!(serde_json::to_value(Rgb(245, 202, 46)).unwrap(), json!("#f5ca2e"));
    }
}
