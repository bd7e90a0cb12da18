//! Distance rules per kick type.
//!
//! `None` means the distance cannot be computed from what was entered. It only
//! becomes an empty cell when a report is formatted.

use crate::field::{magnitude, normalize};

/// Yards from the line of scrimmage to the goal posts: 10 of end zone plus the
/// 8 yard snap-to-hold offset.
pub const FIELD_GOAL_OFFSET: u32 = 18;

/// Field goal distance from the unsigned yard line magnitude.
pub fn field_goal_distance(yard_line: &str) -> Option<u32> {
    magnitude(yard_line).map(|m| m.saturating_add(FIELD_GOAL_OFFSET))
}

/// Displacement between the kickoff spot and where the ball was fielded.
pub fn kickoff_distance(kick_yard_line: &str, result_yard_line: &str) -> Option<u32> {
    displacement(kick_yard_line, result_yard_line)
}

/// Displacement between the line of the punt and where it landed.
pub fn punt_distance(kick_yard_line: &str, landed_yard_line: &str) -> Option<u32> {
    displacement(kick_yard_line, landed_yard_line)
}

fn displacement(from: &str, to: &str) -> Option<u32> {
    let from = normalize(Some(from))?;
    let to = normalize(Some(to))?;
    Some(from.abs_diff(to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_goal_is_sign_independent() {
        assert_eq!(field_goal_distance("25"), Some(43));
        assert_eq!(field_goal_distance("-25"), Some(43));
        assert_eq!(field_goal_distance("+25"), Some(43));
        assert_eq!(field_goal_distance("\u{2212}25"), Some(43));
    }

    #[test]
    fn field_goal_needs_a_number() {
        assert_eq!(field_goal_distance(""), None);
        assert_eq!(field_goal_distance("-"), None);
        assert_eq!(field_goal_distance("+"), None);
        assert_eq!(field_goal_distance("left hash"), None);
    }

    #[test]
    fn kickoff_uses_absolute_positions() {
        // own 35 -> 35, opponent 20 -> 80
        assert_eq!(kickoff_distance("-35", "20"), Some(45));
        assert_eq!(kickoff_distance("20", "-35"), Some(45));
    }

    #[test]
    fn kickoff_with_missing_side_is_not_computable() {
        assert_eq!(kickoff_distance("-35", ""), None);
        assert_eq!(kickoff_distance("", "20"), None);
    }

    #[test]
    fn punt_matches_kickoff_rule() {
        assert_eq!(punt_distance("-40", "10"), Some(50));
        assert_eq!(punt_distance("-40", "-40"), Some(0));
        assert_eq!(punt_distance("-40", "x"), None);
    }
}
