//! Yard-line parsing.
//!
//! Coaches enter yard lines as signed shorthand: `-35` is the kicking team's
//! own 35, `35` or `+35` is the opponent's 35. Both ASCII `-` and the Unicode
//! minus sign (U+2212) mark the own side.

/// Absolute position on a 0..=100 scale measured from the own goal line.
pub type FieldPosition = u32;

const UNICODE_MINUS: char = '\u{2212}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Own,
    Opponent,
}

/// Splits a raw yard line into its side and numeric magnitude.
///
/// Returns `None` for blank, sign-only or non-numeric input.
fn parse_signed(raw: &str) -> Option<(Side, u32)> {
    let s = raw.trim();
    let (side, digits) = if let Some(rest) = s.strip_prefix('-') {
        (Side::Own, rest)
    } else if let Some(rest) = s.strip_prefix(UNICODE_MINUS) {
        (Side::Own, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (Side::Opponent, rest)
    } else {
        (Side::Opponent, s)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    // Saturate absurdly long inputs rather than failing; clamping happens later.
    let magnitude = digits.parse::<u32>().unwrap_or(u32::MAX);
    Some((side, magnitude))
}

/// Converts a signed yard line into an absolute field position.
///
/// Own-side `-v` maps to `v`, opponent-side `v` maps to `100 - v`; both clamp
/// to `0..=100`. Unparseable input yields `None`.
pub fn normalize(raw: Option<&str>) -> Option<FieldPosition> {
    let (side, magnitude) = parse_signed(raw?)?;
    let position = match side {
        Side::Own => magnitude.min(100),
        Side::Opponent => 100u32.saturating_sub(magnitude),
    };
    Some(position)
}

/// Unsigned magnitude of a yard line, ignoring which side of midfield it is on.
pub fn magnitude(raw: &str) -> Option<u32> {
    parse_signed(raw).map(|(_, magnitude)| magnitude)
}
