// Notable-player selection by minutes played.

use crate::analysis::minutes::MinutesRounding;
use crate::model::BoxScoreLine;

/// Box-score rows whose parsed minutes are strictly greater than
/// `threshold`, in their original order.
pub fn select_notable(
    box_score: &[BoxScoreLine],
    threshold: f64,
    rounding: MinutesRounding,
) -> Vec<&BoxScoreLine> {
    box_score
        .iter()
        .filter(|line| line.minutes_played(rounding) > threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::minutes::RawMinutes;

    fn line(id: i64, minutes: RawMinutes) -> BoxScoreLine {
        BoxScoreLine {
            person_id: id,
            team_id: 1,
            first_name: format!("P{id}"),
            family_name: String::new(),
            minutes,
            points: 10.0,
            rebounds: 5.0,
            assists: 2.0,
            field_goals_made: 4.0,
            field_goals_attempted: 9.0,
            three_pointers_made: 1.0,
            three_pointers_attempted: 3.0,
        }
    }

    fn text(s: &str) -> RawMinutes {
        RawMinutes::Text(s.into())
    }

    #[test]
    fn keeps_rows_above_threshold_in_order() {
        let rows = vec![
            line(1, text("32:45")),
            line(2, text("18:59")),
            line(3, text("19:00")),
            line(4, RawMinutes::Missing),
            line(5, RawMinutes::Number(25.0)),
            line(6, text("DNP")),
        ];
        let ids: Vec<_> = select_notable(&rows, 18.0, MinutesRounding::Truncate)
            .iter()
            .map(|l| l.person_id)
            .collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn threshold_is_strict() {
        let rows = vec![line(1, text("15:30")), line(2, text("16:00"))];
        let picked = select_notable(&rows, 15.0, MinutesRounding::Truncate);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].person_id, 2);
    }

    #[test]
    fn rounding_policy_changes_membership() {
        let rows = vec![line(1, text("18:40"))];
        assert!(select_notable(&rows, 18.0, MinutesRounding::Truncate).is_empty());
        assert_eq!(select_notable(&rows, 18.0, MinutesRounding::Round).len(), 1);
        assert_eq!(select_notable(&rows, 18.0, MinutesRounding::Exact).len(), 1);
    }

    #[test]
    fn empty_box_score() {
        assert!(select_notable(&[], 0.0, MinutesRounding::Truncate).is_empty());
    }
}
