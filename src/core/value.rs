//! Purpose: Convert between stored value strings and typed scalars.
//! Exports: `FromValue`, `ToValue` and their implementations for the closed scalar set.
//! Role: Low-level conversion primitives behind `Section`'s typed get/set surface.
//! Invariants: Parse failures are signalled as `None`, never panics or wraparound.
//! Invariants: Integer conversion widens through `i128` and range-checks the target width.
//! Invariants: Float parsing is dot-decimal regardless of process locale.

/// Conversion from a stored string, opted into by a closed set of types.
///
/// `None` is the failure signal: the typed accessors substitute the caller
/// default for scalars and drop the element for lists. `base` is the numeric
/// radix; non-numeric implementations ignore it.
pub trait FromValue: Sized {
    fn from_value(raw: &str, base: u32) -> Option<Self>;
}

/// Rendering to a stored string. Custom types opt in by implementing this;
/// the caller picks the implementation at the call site.
pub trait ToValue {
    fn to_value(&self, base: u32) -> String;
}

/// Parse a (possibly signed) integer in the given radix, rejecting trailing
/// garbage. A `0x`/`0X` prefix is accepted when the radix is 16.
fn parse_int(raw: &str, base: u32) -> Option<i128> {
    if !(2..=36).contains(&base) {
        return None;
    }

    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let digits = if base == 16 {
        rest.strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .unwrap_or(rest)
    } else {
        rest
    };

    // The sign was consumed above; from_str_radix would accept a second one.
    if digits.is_empty() || digits.starts_with('+') || digits.starts_with('-') {
        return None;
    }

    let magnitude = i128::from_str_radix(digits, base).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Render an integer in the given radix with the conventional prefix:
/// `0x` for hex, a leading `0` for octal, none otherwise. Unsupported radixes
/// fall back to decimal.
fn render_int(value: i128, base: u32) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    match base {
        16 => format!("{sign}0x{magnitude:x}"),
        8 if magnitude != 0 => format!("{sign}0{magnitude:o}"),
        2 => format!("{sign}{magnitude:b}"),
        _ => format!("{sign}{magnitude}"),
    }
}

/// Parse a float, dot-decimal, rejecting magnitudes that overflow to
/// infinity unless the input literally spelled an infinity.
fn parse_float(raw: &str) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    if value.is_infinite() {
        let body = raw.trim_start_matches(['+', '-']);
        if !body.eq_ignore_ascii_case("inf") && !body.eq_ignore_ascii_case("infinity") {
            return None;
        }
    }
    Some(value)
}

macro_rules! impl_int_value {
    ($($ty:ty),* $(,)?) => {$(
        impl FromValue for $ty {
            fn from_value(raw: &str, base: u32) -> Option<Self> {
                let wide = parse_int(raw, base)?;
                <$ty>::try_from(wide).ok()
            }
        }

        impl ToValue for $ty {
            fn to_value(&self, base: u32) -> String {
                render_int(i128::from(*self), base)
            }
        }
    )*};
}

impl_int_value!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f64 {
    fn from_value(raw: &str, _base: u32) -> Option<Self> {
        parse_float(raw)
    }
}

impl ToValue for f64 {
    fn to_value(&self, _base: u32) -> String {
        format!("{self}")
    }
}

impl FromValue for f32 {
    fn from_value(raw: &str, _base: u32) -> Option<Self> {
        let wide = parse_float(raw)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return None;
        }
        Some(wide as f32)
    }
}

impl ToValue for f32 {
    fn to_value(&self, _base: u32) -> String {
        format!("{self}")
    }
}

impl FromValue for bool {
    // Booleans never fail: textual forms first, then numeric (nonzero is
    // true), and anything else reads as false.
    fn from_value(raw: &str, base: u32) -> Option<Self> {
        match raw {
            "true" => Some(true),
            "false" => Some(false),
            _ => Some(parse_int(raw, base).map(|v| v != 0).unwrap_or(false)),
        }
    }
}

impl ToValue for bool {
    fn to_value(&self, _base: u32) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

impl FromValue for String {
    fn from_value(raw: &str, _base: u32) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self, _base: u32) -> String {
        self.clone()
    }
}

impl ToValue for &str {
    fn to_value(&self, _base: u32) -> String {
        (*self).to_string()
    }
}
