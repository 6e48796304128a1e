use crate::NumRange;
use anyhow::{anyhow, bail, Context};
use derive_more::Display;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// An RGBA color. Color channels are bytes, alpha is a float between 0 and 1
/// (inclusive), which is the same split that CSS color strings use.
///
/// Colors are (de)serialized as CSS color strings, in one of two forms:
/// - `#rrggbb` for opaque colors
/// - `rgba(r,g,b,a)` for anything translucent
#[derive(Copy, Clone, Debug, Display, PartialEq)]
#[display(fmt = "{}", "self.to_css()")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    alpha: f32,
}

impl Color {
    /// The valid range of values for alpha
    const ALPHA_RANGE: NumRange<f32> = NumRange::new(0.0, 1.0);

    pub const WHITE: Self = Self::new_int(255, 255, 255);
    pub const BLACK: Self = Self::new_int(0, 0, 0);

    /// Create a new opaque color from integer components
    pub const fn new_int(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Create a new color with an alpha channel. Alpha is clamped to [0, 1].
    pub fn new_rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: Self::ALPHA_RANGE.clamp(alpha),
        }
    }

    pub fn alpha(self) -> f32 {
        self.alpha
    }

    /// Is this color fully opaque?
    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// Convert this color to a CSS color string. Opaque colors come out as
    /// `#rrggbb`, translucent colors as `rgba(r,g,b,a)`.
    pub fn to_css(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            format!(
                "rgba({},{},{},{})",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                bail!("invalid hex color {:?}, expected #rrggbb", s);
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .with_context(|| format!("invalid hex color {:?}", s))
            };
            Ok(Self::new_int(channel(0)?, channel(2)?, channel(4)?))
        } else if let Some(args) = s
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                bail!("invalid rgba color {:?}, expected 4 components", s);
            }
            let channel = |i: usize| -> anyhow::Result<u8> {
                parts[i]
                    .parse()
                    .with_context(|| format!("invalid rgba color {:?}", s))
            };
            let alpha: f32 = parts[3]
                .parse()
                .with_context(|| format!("invalid alpha in {:?}", s))?;
            Self::ALPHA_RANGE
                .ensure_contains(alpha)
                .with_context(|| format!("invalid alpha in {:?}", s))?;
            Ok(Self::new_rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
        } else {
            Err(anyhow!("unsupported color format {:?}", s))
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|err: anyhow::Error| {
            de::Error::custom(format!("{:#}", err))
        })
    }
}
