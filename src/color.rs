//! ARGB color value used for LED frames.
//!
//! Channels are stored as fractions (nominally 0.0 to 1.0) and are not clamped
//! when a color is constructed or manipulated. Clamping only happens when a
//! channel is quantized to a byte, so intermediate results may overshoot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// The string was empty after trimming and removing the leading `#`.
    #[error("empty hex color string")]
    Empty,
    /// The string has an odd number of hex digits.
    #[error("hex color string has an odd number of digits")]
    OddLength,
    /// The string contains a character that is not a hex digit.
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
    /// The string decodes to a byte count other than 3 (RGB) or 4 (ARGB).
    #[error("hex color must decode to 3 or 4 bytes, got {0}")]
    InvalidLength(usize),
}

/// Quantizes a channel fraction to a byte.
///
/// Values outside `0.0..=1.0` are clamped first. NaN maps to 0.
pub fn byte_channel(fraction: f64) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts a byte channel value to its fraction.
pub fn fraction_channel(value: u8) -> f64 {
    value as f64 / 255.0
}

fn clamp_int(value: i32) -> u8 {
    value.clamp(0, u8::MAX as i32) as u8
}

/// An immutable ARGB color.
///
/// All manipulation methods return a new color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    a: f64,
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::new(1.0, 0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from channel fractions.
    pub const fn new(a: f64, r: f64, g: f64, b: f64) -> Self {
        Self { a, r, g, b }
    }

    /// Creates an opaque color from channel fractions.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(1.0, r, g, b)
    }

    /// Creates a color from byte channels.
    pub fn from_argb_bytes(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self::new(
            fraction_channel(a),
            fraction_channel(r),
            fraction_channel(g),
            fraction_channel(b),
        )
    }

    /// Creates an opaque color from byte channels.
    pub fn from_rgb_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb_bytes(u8::MAX, r, g, b)
    }

    /// Creates a color from integer channels, clamping each into `0..=255`.
    pub fn from_argb_ints(a: i32, r: i32, g: i32, b: i32) -> Self {
        Self::from_argb_bytes(clamp_int(a), clamp_int(r), clamp_int(g), clamp_int(b))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Alpha fraction.
    pub fn alpha(&self) -> f64 {
        self.a
    }

    /// Red fraction.
    pub fn red(&self) -> f64 {
        self.r
    }

    /// Green fraction.
    pub fn green(&self) -> f64 {
        self.g
    }

    /// Blue fraction.
    pub fn blue(&self) -> f64 {
        self.b
    }

    /// Alpha as byte.
    pub fn a(&self) -> u8 {
        byte_channel(self.a)
    }

    /// Red as byte.
    pub fn r(&self) -> u8 {
        byte_channel(self.r)
    }

    /// Green as byte.
    pub fn g(&self) -> u8 {
        byte_channel(self.g)
    }

    /// Blue as byte.
    pub fn b(&self) -> u8 {
        byte_channel(self.b)
    }

    /// All four channels as bytes, alpha first.
    pub fn argb_bytes(&self) -> (u8, u8, u8, u8) {
        (self.a(), self.r(), self.g(), self.b())
    }

    /// The RGB channels as bytes, in wire order.
    pub fn rgb_bytes(&self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }

    // -------------------------------------------------------------------------
    // Add / Subtract
    // -------------------------------------------------------------------------

    /// Adds byte values to the RGB channels.
    pub fn add_rgb(&self, r: i32, g: i32, b: i32) -> Self {
        Self::from_argb_ints(
            self.a() as i32,
            self.r() as i32 + r,
            self.g() as i32 + g,
            self.b() as i32 + b,
        )
        .with_alpha_fraction(self.a)
    }

    /// Adds fractions to the RGB channels.
    pub fn add_rgb_percent(&self, r: f64, g: f64, b: f64) -> Self {
        Self::new(self.a, self.r + r, self.g + g, self.b + b)
    }

    /// Adds a byte value to the alpha channel.
    pub fn add_alpha(&self, a: i32) -> Self {
        self.set_alpha(self.a() as i32 + a)
    }

    /// Adds a fraction to the alpha channel.
    pub fn add_alpha_percent(&self, a: f64) -> Self {
        Self::new(self.a + a, self.r, self.g, self.b)
    }

    /// Subtracts byte values from the RGB channels.
    pub fn subtract_rgb(&self, r: i32, g: i32, b: i32) -> Self {
        self.add_rgb(-r, -g, -b)
    }

    /// Subtracts fractions from the RGB channels.
    pub fn subtract_rgb_percent(&self, r: f64, g: f64, b: f64) -> Self {
        Self::new(self.a, self.r - r, self.g - g, self.b - b)
    }

    /// Subtracts a byte value from the alpha channel.
    pub fn subtract_alpha(&self, a: i32) -> Self {
        self.set_alpha(self.a() as i32 - a)
    }

    /// Subtracts a fraction from the alpha channel.
    pub fn subtract_alpha_percent(&self, a: f64) -> Self {
        Self::new(self.a - a, self.r, self.g, self.b)
    }

    // -------------------------------------------------------------------------
    // Multiply / Divide
    // -------------------------------------------------------------------------

    /// Multiplies the RGB channels by the given factors.
    pub fn multiply_rgb(&self, r: f64, g: f64, b: f64) -> Self {
        Self::new(self.a, self.r * r, self.g * g, self.b * b)
    }

    /// Multiplies the alpha channel by the given factor.
    pub fn multiply_alpha(&self, a: f64) -> Self {
        Self::new(self.a * a, self.r, self.g, self.b)
    }

    /// Divides the RGB channels by the given divisors.
    ///
    /// A zero divisor is not guarded; the resulting infinity or NaN clamps to
    /// 255 or 0 once quantized.
    pub fn divide_rgb(&self, r: f64, g: f64, b: f64) -> Self {
        Self::new(self.a, self.r / r, self.g / g, self.b / b)
    }

    /// Divides the alpha channel by the given divisor.
    pub fn divide_alpha(&self, a: f64) -> Self {
        Self::new(self.a / a, self.r, self.g, self.b)
    }

    // -------------------------------------------------------------------------
    // Set
    // -------------------------------------------------------------------------

    /// Overrides RGB channels with byte values; `None` keeps the channel.
    pub fn set_rgb_bytes(&self, r: Option<u8>, g: Option<u8>, b: Option<u8>) -> Self {
        Self::new(
            self.a,
            r.map_or(self.r, fraction_channel),
            g.map_or(self.g, fraction_channel),
            b.map_or(self.b, fraction_channel),
        )
    }

    /// Overrides RGB channels with integer values clamped into `0..=255`.
    pub fn set_rgb_ints(&self, r: Option<i32>, g: Option<i32>, b: Option<i32>) -> Self {
        self.set_rgb_bytes(r.map(clamp_int), g.map(clamp_int), b.map(clamp_int))
    }

    /// Overrides RGB channels with fractions.
    pub fn set_rgb_percent(&self, r: Option<f64>, g: Option<f64>, b: Option<f64>) -> Self {
        Self::new(
            self.a,
            r.unwrap_or(self.r),
            g.unwrap_or(self.g),
            b.unwrap_or(self.b),
        )
    }

    /// Sets the alpha channel from an integer clamped into `0..=255`.
    pub fn set_alpha(&self, a: i32) -> Self {
        self.with_alpha_fraction(fraction_channel(clamp_int(a)))
    }

    /// Sets the alpha channel from a fraction.
    pub fn set_alpha_percent(&self, a: f64) -> Self {
        self.with_alpha_fraction(a)
    }

    fn with_alpha_fraction(&self, a: f64) -> Self {
        Self::new(a, self.r, self.g, self.b)
    }

    // -------------------------------------------------------------------------
    // Hex conversion
    // -------------------------------------------------------------------------

    /// Formats the RGB channels as `RRGGBB` hex, optionally prefixed with `#`.
    pub fn to_rgb_hex_string(&self, leading_hash: bool) -> String {
        let [r, g, b] = self.rgb_bytes();
        format!("{}{:02X}{:02X}{:02X}", hash(leading_hash), r, g, b)
    }

    /// Formats all channels as `AARRGGBB` hex, optionally prefixed with `#`.
    pub fn to_argb_hex_string(&self, leading_hash: bool) -> String {
        let (a, r, g, b) = self.argb_bytes();
        format!("{}{:02X}{:02X}{:02X}{:02X}", hash(leading_hash), a, r, g, b)
    }

    /// Parses `#RRGGBB`, `#AARRGGBB` or the same forms without `#`.
    ///
    /// Three decoded bytes produce an opaque color; four bytes carry alpha first.
    pub fn from_hex_string(text: &str) -> Result<Self, ColorParseError> {
        let text = text.trim();
        let digits = text.strip_prefix('#').unwrap_or(text);
        let bytes = decode_hex(digits)?;
        match bytes[..] {
            [r, g, b] => Ok(Self::from_rgb_bytes(r, g, b)),
            [a, r, g, b] => Ok(Self::from_argb_bytes(a, r, g, b)),
            _ => Err(ColorParseError::InvalidLength(bytes.len())),
        }
    }
}

fn hash(leading_hash: bool) -> &'static str {
    if leading_hash {
        "#"
    } else {
        ""
    }
}

fn decode_hex(digits: &str) -> Result<Vec<u8>, ColorParseError> {
    if digits.is_empty() {
        return Err(ColorParseError::Empty);
    }
    let nibbles = digits
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or(ColorParseError::InvalidDigit(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;
    if nibbles.len() % 2 != 0 {
        return Err(ColorParseError::OddLength);
    }
    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_string(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_argb_hex_string(true))
    }
}
