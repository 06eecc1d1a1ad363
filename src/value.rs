//! Labeled values.
//!
//! A [`Value`] is a label paired with the rendered form of some datum. The
//! typed constructors fix how each kind of datum is rendered:
//!
//! | constructor | rendering |
//! |---|---|
//! | [`Value::bool`] | `true` / `false` |
//! | [`Value::bytes`], [`Value::byte`] | `0x` followed by lowercase hex, e.g. `0x0aff` |
//! | [`Value::char`] | the character itself |
//! | integers | decimal |
//! | [`Value::f32`], [`Value::f64`] | shortest digits that round-trip, in exponent form below `1e-4` and from `1e6` on, e.g. `1.5e+06`; `+Inf`, `-Inf`, `NaN` |
//! | [`Value::time`] | RFC 3339 with up to nine fractional digits, trailing zeros removed, e.g. `2001-02-03T04:05:06.000000007+09:00` |
//! | [`Value::utc_time`] | as [`Value::time`], converted to UTC first |
//! | [`Value::stack`] | a [`Stack`] snapshot, labeled `stack` |

use core::fmt;
use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::stack::{self, Stack};

/// The label of values created by [`Value::stack`] and [`Value::stack_n`].
pub const STACK_LABEL: &str = "stack";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A labeled, rendered datum attached to an error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Value {
    label: Cow<'static, str>,
    value: String,
}

macro_rules! integer_constructors {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("A value holding an `", stringify!($ty), "`, in decimal.")]
            pub fn $name(label: impl Into<Cow<'static, str>>, value: $ty) -> Self {
                Self::string(label, value.to_string())
            }
        )*
    };
}

impl Value {
    /// A value holding `value` verbatim.
    pub fn string(label: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A value holding the [`Display`](fmt::Display) rendering of `value`.
    pub fn display(label: impl Into<Cow<'static, str>>, value: &dyn fmt::Display) -> Self {
        Self::string(label, value.to_string())
    }

    /// A value holding formatted text.
    ///
    /// ```
    /// use aerrors::Value;
    ///
    /// let value = Value::fmt("retry", format_args!("{}/{}", 2, 5));
    /// assert_eq!(value.to_string(), "retry: 2/5");
    /// ```
    pub fn fmt(label: impl Into<Cow<'static, str>>, args: fmt::Arguments<'_>) -> Self {
        let value = match args.as_str() {
            Some(text) => text.to_owned(),
            None => std::fmt::format(args),
        };
        Self::string(label, value)
    }

    /// A value holding `true` or `false`.
    pub fn bool(label: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::string(label, if value { "true" } else { "false" })
    }

    /// A value holding bytes as `0x` followed by two lowercase hex digits per
    /// byte.
    pub fn bytes(label: impl Into<Cow<'static, str>>, value: &[u8]) -> Self {
        Self::string(label, hex(value))
    }

    /// A value holding a single byte, like [`Value::bytes`] with one byte.
    pub fn byte(label: impl Into<Cow<'static, str>>, value: u8) -> Self {
        Self::string(label, hex(&[value]))
    }

    /// A value holding a single character.
    pub fn char(label: impl Into<Cow<'static, str>>, value: char) -> Self {
        Self::string(label, String::from(value))
    }

    integer_constructors! {
        int: isize,
        i8: i8,
        i16: i16,
        i32: i32,
        i64: i64,
        uint: usize,
        u8: u8,
        u16: u16,
        u32: u32,
        u64: u64,
    }

    /// A value holding an `f32`, with the shortest digits that read back as
    /// the same `f32`.
    pub fn f32(label: impl Into<Cow<'static, str>>, value: f32) -> Self {
        Self::string(label, float(value))
    }

    /// A value holding an `f64`, with the shortest digits that read back as
    /// the same `f64`.
    ///
    /// ```
    /// use aerrors::Value;
    ///
    /// assert_eq!(Value::f64("x", 123456.0).value(), "123456");
    /// assert_eq!(Value::f64("x", 1234567.0).value(), "1.234567e+06");
    /// assert_eq!(Value::f64("x", 0.00001).value(), "1e-05");
    /// assert_eq!(Value::f64("x", f64::INFINITY).value(), "+Inf");
    /// ```
    pub fn f64(label: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::string(label, float(value))
    }

    /// A value holding a timestamp in RFC 3339 form, keeping its offset.
    /// UTC is written as `Z`. Fractional seconds are written up to the
    /// nanosecond without trailing zeros, and left out for whole seconds.
    ///
    /// ```
    /// use aerrors::Value;
    /// use chrono::{FixedOffset, TimeZone};
    ///
    /// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
    /// let at = jst.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap();
    /// assert_eq!(Value::time("at", &at).value(), "2001-02-03T04:05:06+09:00");
    /// ```
    pub fn time<Tz>(label: impl Into<Cow<'static, str>>, value: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let rendered = value.to_rfc3339_opts(SecondsFormat::Nanos, true);
        Self::string(label, trim_fraction(rendered))
    }

    /// Like [`Value::time`], after converting the timestamp to UTC.
    pub fn utc_time<Tz: TimeZone>(label: impl Into<Cow<'static, str>>, value: &DateTime<Tz>) -> Self {
        Self::time(label, &value.with_timezone(&Utc))
    }

    /// A `stack` value holding [`default_stack_depth`](stack::default_stack_depth)
    /// frames of the current call stack, skipping `skip` frames above the
    /// caller.
    pub fn stack(skip: usize) -> Self {
        Self::stack_n(stack::default_stack_depth(), skip)
    }

    /// A `stack` value holding up to `depth` frames of the current call stack,
    /// skipping `skip` frames above the caller.
    pub fn stack_n(depth: usize, skip: usize) -> Self {
        Self::string(STACK_LABEL, Stack::capture(depth, skip).to_string())
    }

    /// The label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The rendered datum.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the label.
    pub fn set_label(&mut self, label: impl Into<Cow<'static, str>>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// Returns this value with its label replaced.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.set_label(label);
        self
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + 2 * bytes.len());
    out.push_str("0x");
    for &byte in bytes {
        out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
    }
    out
}

/// Shortest round-trip digits, in exponent form when the decimal exponent is
/// below -4 or at least 6. The exponent has a sign and at least two digits.
fn float<F: fmt::Display + fmt::LowerExp>(value: F) -> String {
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return match scientific.as_str() {
            "inf" => "+Inf",
            "-inf" => "-Inf",
            _ => "NaN",
        }
        .to_owned();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };
    if (-4..6).contains(&exponent) {
        return value.to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// Drops trailing zeros of the fractional seconds, and the `.` when nothing
/// is left.
fn trim_fraction(mut rendered: String) -> String {
    let Some(dot) = rendered.find('.') else {
        return rendered;
    };
    let digits_end = rendered[dot + 1..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rendered.len(), |i| dot + 1 + i);
    let kept = rendered[dot + 1..digits_end].trim_end_matches('0').len();
    let cut = if kept == 0 { dot } else { dot + 1 + kept };
    rendered.replace_range(cut..digits_end, "");
    rendered
}

/// Renders `label: value`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}
