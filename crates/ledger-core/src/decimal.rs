//! # Decimal Module
//!
//! Provides the `Decimal` type: an arbitrary-precision, fixed-scale,
//! signed base-10 number.
//!
//! ## Why Digit Storage?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  With a fixed-width integer of cents:                                   │
//! │    balances beyond i64::MAX cents overflow  ❌ WRONG!                   │
//! │                                                                         │
//! │  OUR SOLUTION: Decimal digits + scale                                   │
//! │    digits (LS first)  [5, 2, 3, 1]   scale 2   →   13.25               │
//! │    carries grow the integer part; nothing is ever rounded away         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ledger_core::Decimal;
//!
//! let mut balance: Decimal = "10.50".parse().unwrap();
//! balance.add(&"-3.25".parse().unwrap()).unwrap();
//! assert_eq!(balance.to_string(), "7.25");
//! assert_eq!(format!("{:+}", balance), "+7.25");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DecimalError, DecimalResult};

/// Minimum scale applied when text is parsed into a decimal whose scale was
/// never configured.
pub const DEFAULT_TEXT_SCALE: usize = 2;

// =============================================================================
// Decimal Type
// =============================================================================

/// Arbitrary-precision signed decimal with a fixed number of fractional digits.
///
/// ## Layout
/// - `digits`: base-10 digits, least significant first; the lowest `scale`
///   entries are fractional. `digits.len()` is the allocated capacity and may
///   hold leading zeros.
/// - `negative`: never set for zero.
/// - `fixed_scale`: set by [`Decimal::configure`]; parsing keeps the scale.
///
/// Equality and ordering are numeric: `1` equals `1.000`.
#[derive(Debug, Clone, Default)]
pub struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    scale: usize,
    fixed_scale: bool,
}

impl Decimal {
    /// Creates a zero value with no allocated digits and scale 0.
    pub const fn new() -> Self {
        Decimal {
            negative: false,
            digits: Vec::new(),
            scale: 0,
            fixed_scale: false,
        }
    }

    /// Returns zero (same as [`Decimal::new`]).
    pub const fn zero() -> Self {
        Decimal::new()
    }

    /// Creates a decimal holding an exact integer at scale 0.
    pub fn from_i64(value: i64) -> DecimalResult<Self> {
        let mut decimal = Decimal::new();
        decimal.set_i64(value)?;
        Ok(decimal)
    }

    /// Reserves `capacity` total digits with `scale` of them fractional.
    ///
    /// The value resets to zero and the scale becomes fixed: later text
    /// parsing keeps it instead of adapting to the input.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::Decimal;
    ///
    /// let mut d = Decimal::new();
    /// assert!(d.configure(4, 5).is_err());
    /// assert_eq!((d.digit_count(), d.scale()), (0, 0));
    ///
    /// d.configure(4, 2).unwrap();
    /// assert_eq!((d.digit_count(), d.scale()), (4, 2));
    /// ```
    pub fn configure(&mut self, capacity: usize, scale: usize) -> DecimalResult<()> {
        if scale > capacity {
            return Err(DecimalError::ScaleExceedsCapacity { scale, capacity });
        }
        let digits = zeroed(capacity)?;
        self.digits = digits;
        self.scale = scale;
        self.negative = false;
        self.fixed_scale = true;
        Ok(())
    }

    /// Allocated digit count (integer + fractional).
    #[inline]
    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Number of fractional digits.
    #[inline]
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Drops low fractional digits down to `scale`. Only used where those
    /// digits are known to be zero padding.
    fn narrow_scale(&mut self, scale: usize) {
        if scale < self.scale {
            self.digits.drain(..self.scale - scale);
            self.scale = scale;
        }
    }

    #[inline]
    fn integer_capacity(&self) -> usize {
        self.digits.len() - self.scale
    }

    /// Integer digits without leading zeros.
    fn significant_integer_len(&self) -> usize {
        significant_len(&self.digits[self.scale..])
    }

    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|&d| d == 0)
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.is_zero()
    }

    /// Flips the sign (zero stays non-negative).
    pub fn negate(&mut self) {
        self.negative = !self.negative && !self.is_zero();
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        let mut out = self.clone();
        out.negative = false;
        out
    }

    // =========================================================================
    // Integer Conversion
    // =========================================================================

    /// Assigns an exact integer, keeping the current scale.
    ///
    /// Covers the whole `i64` range; `i64::MIN` is handled through its
    /// unsigned magnitude so nothing overflows. The integer part grows as
    /// needed regardless of the configured capacity.
    pub fn set_i64(&mut self, value: i64) -> DecimalResult<()> {
        let mut magnitude = value.unsigned_abs();
        let mut integer = Vec::with_capacity(20);
        while magnitude > 0 {
            integer.push((magnitude % 10) as u8);
            magnitude /= 10;
        }

        let int_capacity = self.integer_capacity().max(integer.len());
        let mut digits = zeroed(self.scale + int_capacity)?;
        digits[self.scale..self.scale + integer.len()].copy_from_slice(&integer);

        self.digits = digits;
        self.negative = value < 0;
        Ok(())
    }

    /// Returns the integer part, truncated toward zero.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::Decimal;
    ///
    /// let d = Decimal::from_i64(i64::MIN).unwrap();
    /// assert_eq!(d.to_i64().unwrap(), i64::MIN);
    ///
    /// let d: Decimal = "-12.99".parse().unwrap();
    /// assert_eq!(d.to_i64().unwrap(), -12);
    /// ```
    pub fn to_i64(&self) -> DecimalResult<i64> {
        let mut magnitude: u64 = 0;
        for &digit in self.digits[self.scale..].iter().rev() {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(u64::from(digit)))
                .ok_or(DecimalError::OutOfRange)?;
        }

        if self.negative {
            if magnitude == i64::MIN.unsigned_abs() {
                Ok(i64::MIN)
            } else {
                i64::try_from(magnitude)
                    .map(|v| -v)
                    .map_err(|_| DecimalError::OutOfRange)
            }
        } else {
            i64::try_from(magnitude).map_err(|_| DecimalError::OutOfRange)
        }
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Number of bytes [`Decimal::write_text`] produces.
    pub fn text_len(&self, force_sign: bool) -> usize {
        let sign = usize::from(self.is_negative() || force_sign);
        let integer = self.significant_integer_len().max(1);
        let fraction = if self.scale > 0 { self.scale + 1 } else { 0 };
        sign + integer + fraction
    }

    /// Renders `[sign]digits['.'fraction]`.
    ///
    /// `-` appears iff negative; `+` appears iff `force_sign` and the value is
    /// non-negative. Exactly `scale` fractional digits follow the point.
    pub fn to_text(&self, force_sign: bool) -> String {
        let mut out = String::with_capacity(self.text_len(force_sign));
        if self.is_negative() {
            out.push('-');
        } else if force_sign {
            out.push('+');
        }

        let integer_len = self.significant_integer_len();
        if integer_len == 0 {
            out.push('0');
        } else {
            for &digit in self.digits[self.scale..self.scale + integer_len].iter().rev() {
                out.push(char::from(b'0' + digit));
            }
        }

        if self.scale > 0 {
            out.push('.');
            for &digit in self.digits[..self.scale].iter().rev() {
                out.push(char::from(b'0' + digit));
            }
        }
        out
    }

    /// Writes the text form into `buf` and returns its length.
    ///
    /// An empty `buf` is a sizing query: nothing is written and the required
    /// length is returned. A non-empty buffer that is too small fails with
    /// [`DecimalError::BufferTooSmall`] and is left untouched.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::Decimal;
    ///
    /// let d = Decimal::from_i64(-378).unwrap();
    /// let needed = d.write_text(&mut [], false).unwrap();
    /// assert_eq!(needed, 4);
    ///
    /// let mut buf = vec![0u8; needed];
    /// assert_eq!(d.write_text(&mut buf, false).unwrap(), 4);
    /// assert_eq!(&buf, b"-378");
    /// ```
    pub fn write_text(&self, buf: &mut [u8], force_sign: bool) -> DecimalResult<usize> {
        write_sized(&self.to_text(force_sign), buf)
    }

    /// Parses the longest numeric prefix of `text` and returns how many bytes
    /// it consumed.
    ///
    /// ## Grammar
    /// `[+-]? digit* ('.' digit*)?` with at least one digit overall. A
    /// trailing `.` after integer digits is consumed.
    ///
    /// ## Scale Policy
    /// - Fixed scale (after `configure`): kept; extra fractional digits are
    ///   truncated toward zero.
    /// - Otherwise: `max(fractional digits in text, DEFAULT_TEXT_SCALE)`.
    ///
    /// On failure the value is unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::Decimal;
    ///
    /// let mut d = Decimal::new();
    /// let consumed = d.set_text("-00000378.0 USD").unwrap();
    /// assert_eq!(consumed, 11);
    /// assert_eq!(d.to_string(), "-378.00");
    /// ```
    pub fn set_text(&mut self, text: &str) -> DecimalResult<usize> {
        let parsed = ScannedText::scan(text.as_bytes())?;

        let scale = if self.fixed_scale {
            self.scale
        } else {
            parsed.fraction.len().max(DEFAULT_TEXT_SCALE)
        };
        let integer = strip_leading_zeros(parsed.integer);
        let int_capacity = self.integer_capacity().max(integer.len());

        let mut digits = zeroed(scale + int_capacity)?;
        for (i, &c) in parsed.fraction.iter().take(scale).enumerate() {
            digits[scale - 1 - i] = c - b'0';
        }
        for (i, &c) in integer.iter().rev().enumerate() {
            digits[scale + i] = c - b'0';
        }

        self.negative = parsed.negative && digits.iter().any(|&d| d != 0);
        self.digits = digits;
        self.scale = scale;
        Ok(parsed.consumed)
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// Adds `other` in place.
    ///
    /// The result takes the larger of the two scales and grows its integer
    /// part on carry; nothing is truncated. On failure `self` is unchanged.
    pub fn add(&mut self, other: &Decimal) -> DecimalResult<()> {
        self.add_signed(other, other.is_negative())
    }

    /// Subtracts `other` in place (same alignment rules as [`Decimal::add`]).
    pub fn sub(&mut self, other: &Decimal) -> DecimalResult<()> {
        self.add_signed(other, other.is_positive())
    }

    fn add_signed(&mut self, other: &Decimal, other_negative: bool) -> DecimalResult<()> {
        let scale = self.scale.max(other.scale);
        // One extra integer digit absorbs the final carry.
        let width = scale + self.integer_capacity().max(other.integer_capacity()) + 1;
        let lhs = self.aligned(scale, width)?;
        let rhs = other.aligned(scale, width)?;

        let self_negative = self.is_negative();
        let (mut magnitude, negative) = if self_negative == other_negative {
            (add_magnitudes(lhs, &rhs), self_negative)
        } else if compare_magnitudes(&lhs, &rhs) == Ordering::Less {
            (sub_magnitudes(rhs, &lhs), other_negative)
        } else {
            (sub_magnitudes(lhs, &rhs), self_negative)
        };

        let keep = self
            .integer_capacity()
            .max(significant_len(&magnitude[scale..]));
        magnitude.truncate(scale + keep);

        self.negative = negative && magnitude.iter().any(|&d| d != 0);
        self.digits = magnitude;
        self.scale = scale;
        Ok(())
    }

    /// Copies the digits into a zero-padded buffer of `width` at `scale`.
    fn aligned(&self, scale: usize, width: usize) -> DecimalResult<Vec<u8>> {
        let mut out = zeroed(width)?;
        let shift = scale - self.scale;
        out[shift..shift + self.digits.len()].copy_from_slice(&self.digits);
        Ok(out)
    }

    /// Digit at decimal exponent `exp` (0 = units, -1 = tenths).
    fn digit_at(&self, exp: isize) -> u8 {
        let index = exp + self.scale as isize;
        if index < 0 {
            return 0;
        }
        self.digits.get(index as usize).copied().unwrap_or(0)
    }

    fn cmp_magnitude(&self, other: &Decimal) -> Ordering {
        let top = self.integer_capacity().max(other.integer_capacity()) as isize;
        let bottom = -(self.scale.max(other.scale) as isize);
        (bottom..top)
            .rev()
            .map(|exp| self.digit_at(exp).cmp(&other.digit_at(exp)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

// =============================================================================
// Digit Helpers
// =============================================================================

/// Allocates `len` zero digits, reporting exhaustion instead of aborting.
fn zeroed(len: usize) -> DecimalResult<Vec<u8>> {
    let mut digits = Vec::new();
    digits
        .try_reserve_exact(len)
        .map_err(|_| DecimalError::AllocationFailed { digits: len })?;
    digits.resize(len, 0);
    Ok(digits)
}

/// Length of a little-endian digit run without its leading (top) zeros.
fn significant_len(digits: &[u8]) -> usize {
    digits.iter().rposition(|&d| d != 0).map_or(0, |p| p + 1)
}

fn strip_leading_zeros(ascii: &[u8]) -> &[u8] {
    let start = ascii.iter().position(|&c| c != b'0').unwrap_or(ascii.len());
    &ascii[start..]
}

fn add_magnitudes(mut lhs: Vec<u8>, rhs: &[u8]) -> Vec<u8> {
    let mut carry = 0;
    for (l, &r) in lhs.iter_mut().zip(rhs) {
        let sum = *l + r + carry;
        *l = sum % 10;
        carry = sum / 10;
    }
    lhs
}

/// `lhs - rhs`, requires `lhs >= rhs`.
fn sub_magnitudes(mut lhs: Vec<u8>, rhs: &[u8]) -> Vec<u8> {
    let mut borrow = 0;
    for (l, &r) in lhs.iter_mut().zip(rhs) {
        let take = r + borrow;
        if *l >= take {
            *l -= take;
            borrow = 0;
        } else {
            *l = *l + 10 - take;
            borrow = 1;
        }
    }
    lhs
}

/// Compares equal-width little-endian magnitudes.
fn compare_magnitudes(lhs: &[u8], rhs: &[u8]) -> Ordering {
    lhs.iter().rev().cmp(rhs.iter().rev())
}

/// Writes `text` with the sizing-query convention shared by decimals and
/// table cells.
pub(crate) fn write_sized(text: &str, buf: &mut [u8]) -> DecimalResult<usize> {
    let needed = text.len();
    if buf.is_empty() {
        return Ok(needed);
    }
    if buf.len() < needed {
        return Err(DecimalError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }
    buf[..needed].copy_from_slice(text.as_bytes());
    Ok(needed)
}

// =============================================================================
// Text Scanner
// =============================================================================

/// Pieces of a numeric prefix.
struct ScannedText<'a> {
    negative: bool,
    integer: &'a [u8],
    fraction: &'a [u8],
    consumed: usize,
}

impl<'a> ScannedText<'a> {
    fn scan(bytes: &'a [u8]) -> DecimalResult<Self> {
        let mut pos = 0;
        let negative = match bytes.first() {
            Some(b'-') => {
                pos = 1;
                true
            }
            Some(b'+') => {
                pos = 1;
                false
            }
            _ => false,
        };

        let int_start = pos;
        pos += digit_run(&bytes[pos..]);
        let integer = &bytes[int_start..pos];

        let mut fraction: &[u8] = &[];
        if bytes.get(pos) == Some(&b'.') {
            let frac_start = pos + 1;
            let frac_end = frac_start + digit_run(&bytes[frac_start..]);
            if !integer.is_empty() || frac_end > frac_start {
                fraction = &bytes[frac_start..frac_end];
                pos = frac_end;
            }
        }

        if integer.is_empty() && fraction.is_empty() {
            return Err(DecimalError::NoDigits);
        }

        Ok(ScannedText {
            negative,
            integer,
            fraction,
            consumed: pos,
        })
    }
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|c| c.is_ascii_digit()).count()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the text form; `{:+}` forces the sign.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_text(f.sign_plus()))
    }
}

/// Strict parsing: the whole string must be a number.
impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut decimal = Decimal::new();
        let consumed = decimal.set_text(s)?;
        if consumed != s.len() {
            return Err(DecimalError::TrailingCharacters { position: consumed });
        }
        Ok(decimal)
    }
}

impl TryFrom<&Decimal> for i64 {
    type Error = DecimalError;

    fn try_from(value: &Decimal) -> Result<Self, Self::Error> {
        value.to_i64()
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric order, independent of scale and capacity.
impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

/// Serialized as its text form, which carries the scale.
///
/// Deserializing restores exactly the scale written (`"5"` comes back at
/// scale 0, not [`DEFAULT_TEXT_SCALE`]). Capacity and the fixed-scale flag
/// set by [`Decimal::configure`] are not part of the text and are not kept.
impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut decimal: Decimal = text.parse().map_err(serde::de::Error::custom)?;
        let written = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
        decimal.narrow_scale(written);
        Ok(decimal)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_new_is_unallocated_zero() {
        let d = Decimal::new();
        assert_eq!(d.digit_count(), 0);
        assert_eq!(d.scale(), 0);
        assert!(d.is_zero());
        assert_eq!(d.to_string(), "0");
    }

    #[test]
    fn test_configure() {
        let mut d = Decimal::new();

        // invalid allocation
        let err = d.configure(4, 5).unwrap_err();
        assert_eq!(
            err,
            DecimalError::ScaleExceedsCapacity {
                scale: 5,
                capacity: 4
            }
        );
        assert_eq!(d.digit_count(), 0);
        assert_eq!(d.scale(), 0);

        // valid allocation
        d.configure(4, 2).unwrap();
        assert_eq!(d.digit_count(), 4);
        assert_eq!(d.scale(), 2);
        assert_eq!(d.to_string(), "0.00");
    }

    #[test]
    fn test_failed_configure_keeps_value() {
        let mut d = dec("12.5");
        assert!(d.configure(1, 3).is_err());
        assert_eq!(d, dec("12.50"));
        assert_eq!(d.scale(), 2);
    }

    #[test]
    fn test_configure_resets_value() {
        let mut d = dec("-99.5");
        d.configure(6, 3).unwrap();
        assert!(d.is_zero());
        assert!(!d.is_negative());
        assert_eq!(d.to_string(), "0.000");
    }

    #[test]
    fn test_trivial_compare() {
        let a = Decimal::new();
        let b = Decimal::new();
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(b.cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_set_i64() {
        let mut d = Decimal::new();
        for value in [378, -96058, 392050493, -2092050493, 0] {
            d.set_i64(value).unwrap();
            assert_eq!(d.to_i64().unwrap(), value);
        }
    }

    #[test]
    fn test_set_i64_limits() {
        let mut d = Decimal::new();
        for value in [i64::MIN, i64::MIN + 1, i64::MAX, i64::MAX - 1] {
            d.set_i64(value).unwrap();
            assert_eq!(d.to_i64().unwrap(), value);
        }
    }

    #[test]
    fn test_set_i64_keeps_scale() {
        let mut d = Decimal::new();
        d.configure(8, 4).unwrap();
        d.set_i64(9515).unwrap();
        assert_eq!(d.scale(), 4);
        assert_eq!(d.to_string(), "9515.0000");

        // integer part grows past the configured capacity
        d.set_i64(123_456_789).unwrap();
        assert_eq!(d.scale(), 4);
        assert_eq!(d.to_string(), "123456789.0000");
    }

    #[test]
    fn test_to_i64_out_of_range() {
        let d = dec("9223372036854775808");
        assert_eq!(d.to_i64(), Err(DecimalError::OutOfRange));

        let d = dec("-9223372036854775808");
        assert_eq!(d.to_i64().unwrap(), i64::MIN);

        let d = dec("-9223372036854775809");
        assert_eq!(d.to_i64(), Err(DecimalError::OutOfRange));
    }

    #[test]
    fn test_to_i64_truncates() {
        assert_eq!(dec("12.99").to_i64().unwrap(), 12);
        assert_eq!(dec("-12.99").to_i64().unwrap(), -12);
        assert_eq!(dec("-0.99").to_i64().unwrap(), 0);
    }

    #[test]
    fn test_get_text() {
        let mut d = Decimal::new();
        d.set_i64(-378).unwrap();
        assert_eq!(d.write_text(&mut [], false).unwrap(), 4);
        let mut buffer = [0u8; 16];
        assert_eq!(d.write_text(&mut buffer, false).unwrap(), 4);
        assert_eq!(&buffer[..4], b"-378");

        d.configure(8, 4).unwrap();
        d.set_i64(9515).unwrap();
        assert_eq!(d.write_text(&mut [], false).unwrap(), 9);
        assert_eq!(d.write_text(&mut buffer, false).unwrap(), 9);
        assert_eq!(&buffer[..9], b"9515.0000");
        assert_eq!(d.write_text(&mut [], true).unwrap(), 10);
        assert_eq!(d.write_text(&mut buffer, true).unwrap(), 10);
        assert_eq!(&buffer[..10], b"+9515.0000");
    }

    #[test]
    fn test_write_text_too_small() {
        let d = dec("-12.50");
        let mut buffer = [b'x'; 4];
        let err = d.write_text(&mut buffer, false).unwrap_err();
        assert_eq!(
            err,
            DecimalError::BufferTooSmall {
                needed: 6,
                available: 4
            }
        );
        // nothing partially written
        assert_eq!(&buffer, b"xxxx");
    }

    #[test]
    fn test_set_text() {
        let mut d = Decimal::new();
        assert_eq!(d.set_text("-378").unwrap(), 4);
        assert_eq!(d.to_i64().unwrap(), -378);

        assert_eq!(d.set_text("-378.").unwrap(), 5);
        assert_eq!(d.to_i64().unwrap(), -378);

        assert_eq!(d.set_text("-00000378.0").unwrap(), 11);
        assert_eq!(d.to_i64().unwrap(), -378);
        assert_eq!(d.text_len(false), 7);
        assert_eq!(d.to_text(false), "-378.00");

        d.configure(8, 4).unwrap();
        assert_eq!(d.set_text("9515").unwrap(), 4);
        assert_eq!(d.to_text(false), "9515.0000");
        assert_eq!(d.to_text(true), "+9515.0000");
        assert_eq!(d.to_i64().unwrap(), 9515);
    }

    #[test]
    fn test_set_text_prefix() {
        let mut d = Decimal::new();
        assert_eq!(d.set_text("12.5 dollars").unwrap(), 4);
        assert_eq!(d, dec("12.5"));

        assert_eq!(d.set_text("+.75x").unwrap(), 4);
        assert_eq!(d, dec("0.75"));

        assert_eq!(d.set_text("7-3").unwrap(), 1);
        assert_eq!(d.to_i64().unwrap(), 7);
    }

    #[test]
    fn test_set_text_no_digits() {
        let mut d = dec("42");
        for text in ["", "-", "+", ".", "-.", "abc", " 1"] {
            assert_eq!(d.set_text(text), Err(DecimalError::NoDigits), "{text:?}");
        }
        assert_eq!(d, dec("42"));
    }

    #[test]
    fn test_set_text_default_scale() {
        let mut d = Decimal::new();
        d.set_text("5").unwrap();
        assert_eq!(d.scale(), DEFAULT_TEXT_SCALE);
        d.set_text("1.2345").unwrap();
        assert_eq!(d.scale(), 4);
        assert_eq!(d.to_string(), "1.2345");
        d.set_text("3").unwrap();
        assert_eq!(d.to_string(), "3.00");
    }

    #[test]
    fn test_set_text_fixed_scale_truncates() {
        let mut d = Decimal::new();
        d.configure(6, 2).unwrap();
        d.set_text("-1.999").unwrap();
        assert_eq!(d.scale(), 2);
        assert_eq!(d.to_string(), "-1.99");

        d.set_text("-0.001").unwrap();
        assert_eq!(d.to_string(), "0.00");
        assert!(!d.is_negative());
    }

    #[test]
    fn test_from_str_rejects_trailing() {
        assert_eq!(
            "12abc".parse::<Decimal>(),
            Err(DecimalError::TrailingCharacters { position: 2 })
        );
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let d = dec("-0.00");
        assert!(!d.is_negative());
        assert_eq!(d.to_string(), "0.00");
        assert_eq!(d, Decimal::new());
    }

    #[test]
    fn test_compare_is_scale_invariant() {
        let mut one = Decimal::new();
        one.set_i64(1).unwrap();
        let mut padded = Decimal::new();
        padded.configure(6, 3).unwrap();
        padded.set_text("1.000").unwrap();
        assert_eq!(one.cmp(&padded), Ordering::Equal);
        assert_eq!(one, padded);

        assert!(dec("1.01") > dec("1"));
        assert!(dec("-1.01") < dec("-1"));
        assert!(dec("-5") < dec("0.01"));
        assert!(dec("100") > dec("99.999"));
    }

    #[test]
    fn test_add_aligns_scales() {
        let mut total = dec("10.5");
        total.add(&dec("0.125")).unwrap();
        assert_eq!(total.scale(), 3);
        assert_eq!(total.to_string(), "10.625");
    }

    #[test]
    fn test_add_grows_on_carry() {
        let mut total = Decimal::from_i64(999).unwrap();
        total.add(&Decimal::from_i64(1).unwrap()).unwrap();
        assert_eq!(total.to_string(), "1000");

        let mut big = Decimal::from_i64(i64::MAX).unwrap();
        big.add(&Decimal::from_i64(i64::MAX).unwrap()).unwrap();
        assert_eq!(big.to_string(), "18446744073709551614");
        assert_eq!(big.to_i64(), Err(DecimalError::OutOfRange));
    }

    #[test]
    fn test_add_mixed_signs() {
        let mut total = dec("10.50");
        total.add(&dec("-3.25")).unwrap();
        assert_eq!(total.to_string(), "7.25");

        total.add(&dec("-10.00")).unwrap();
        assert_eq!(total.to_string(), "-2.75");
        assert!(total.is_negative());

        total.add(&dec("2.75")).unwrap();
        assert!(total.is_zero());
        assert!(!total.is_negative());
    }

    #[test]
    fn test_sub() {
        let mut d = dec("1.00");
        d.sub(&dec("2.5")).unwrap();
        assert_eq!(d.to_string(), "-1.50");
        d.sub(&dec("-1.5")).unwrap();
        assert!(d.is_zero());
    }

    #[test]
    fn test_negate_and_abs() {
        let mut d = dec("3.10");
        d.negate();
        assert_eq!(d.to_string(), "-3.10");
        assert_eq!(d.abs().to_string(), "3.10");

        let mut zero = Decimal::new();
        zero.negate();
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_display_flags() {
        let d = dec("5.5");
        assert_eq!(format!("{}", d), "5.50");
        assert_eq!(format!("{:+}", d), "+5.50");
        assert_eq!(format!("{:>8}", d), "    5.50");
    }

    #[test]
    fn test_serde_text_form() {
        let d = dec("-12.340");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"-12.340\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert_eq!(back.scale(), 3);
    }

    #[test]
    fn test_serde_keeps_written_scale() {
        let whole = Decimal::from_i64(5).unwrap();
        let json = serde_json::to_string(&whole).unwrap();
        assert_eq!(json, "\"5\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scale(), 0);
        assert_eq!(back.to_string(), "5");

        let mut fixed = Decimal::new();
        fixed.configure(6, 4).unwrap();
        fixed.set_text("1.5").unwrap();
        let json = serde_json::to_string(&fixed).unwrap();
        assert_eq!(json, "\"1.5000\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fixed);
        assert_eq!(back.scale(), 4);
        assert!(!back.fixed_scale);

        assert!(serde_json::from_str::<Decimal>("\"1.5x\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Decimal text: optional sign, integer digits with possible leading
    /// zeros, optional fraction.
    fn decimal_text() -> impl Strategy<Value = String> {
        (
            prop::option::of(prop_oneof![Just("-"), Just("+")]),
            "[0-9]{1,30}",
            prop::option::of("[0-9]{0,12}"),
        )
            .prop_map(|(sign, int, frac)| {
                let mut s = String::new();
                s.push_str(sign.unwrap_or(""));
                s.push_str(&int);
                if let Some(frac) = frac {
                    s.push('.');
                    s.push_str(&frac);
                }
                s
            })
    }

    proptest! {
        #[test]
        fn i64_round_trip(value in any::<i64>()) {
            let d = Decimal::from_i64(value).unwrap();
            prop_assert_eq!(d.to_i64().unwrap(), value);
        }

        #[test]
        fn text_round_trip(text in decimal_text()) {
            let mut parsed = Decimal::new();
            prop_assert_eq!(parsed.set_text(&text).unwrap(), text.len());

            let rendered = parsed.to_text(false);
            let reparsed: Decimal = rendered.parse().unwrap();
            prop_assert_eq!(&reparsed, &parsed);
            prop_assert_eq!(reparsed.to_text(false), rendered);
        }

        #[test]
        fn sizing_query_matches_write(text in decimal_text(), force in any::<bool>()) {
            let d: Decimal = text.parse().unwrap();
            let needed = d.write_text(&mut [], force).unwrap();
            let mut buf = vec![0u8; needed];
            prop_assert_eq!(d.write_text(&mut buf, force).unwrap(), needed);
            prop_assert_eq!(buf, d.to_text(force).into_bytes());
        }

        #[test]
        fn add_matches_i128(a in any::<i64>(), b in any::<i64>()) {
            let mut sum = Decimal::from_i64(a).unwrap();
            sum.add(&Decimal::from_i64(b).unwrap()).unwrap();
            prop_assert_eq!(sum.to_string(), (i128::from(a) + i128::from(b)).to_string());
        }

        #[test]
        fn order_matches_i64(a in any::<i64>(), b in any::<i64>(), scale in 0usize..6) {
            let mut x = Decimal::new();
            x.configure(scale, scale).unwrap();
            x.set_i64(a).unwrap();
            let y = Decimal::from_i64(b).unwrap();
            prop_assert_eq!(x.cmp(&y), a.cmp(&b));
        }

        #[test]
        fn add_then_sub_restores(a in decimal_text(), b in decimal_text()) {
            let original: Decimal = a.parse().unwrap();
            let other: Decimal = b.parse().unwrap();
            let mut value = original.clone();
            value.add(&other).unwrap();
            value.sub(&other).unwrap();
            prop_assert_eq!(value, original);
        }
    }
}
