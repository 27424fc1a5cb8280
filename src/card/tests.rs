//! Unit tests for card snapshot values.

use super::{CardDomainError, CardId, CardSnapshot, ProgressType, UrgencyLevel};
use chrono::NaiveDate;
use rstest::rstest;

#[rstest]
#[case(0)]
#[case(-7)]
fn card_id_rejects_non_positive_values(#[case] raw: i64) {
    assert_eq!(
        CardId::new(raw),
        Err(CardDomainError::InvalidIdentifier {
            kind: "card",
            value: raw
        })
    );
}

#[rstest]
#[case(0, false)]
#[case(3, false)]
#[case(4, true)]
fn urgency_overdue_only_at_top_level(#[case] level: u8, #[case] overdue: bool) {
    let urgency = UrgencyLevel::new(level).expect("level is in range");
    assert_eq!(urgency.is_overdue(), overdue);
}

#[rstest]
fn urgency_rejects_levels_above_four() {
    assert_eq!(UrgencyLevel::new(5), Err(CardDomainError::InvalidUrgency(5)));
}

#[rstest]
#[case("none", ProgressType::None)]
#[case("PERCENTAGE", ProgressType::Percentage)]
#[case(" checklist ", ProgressType::Checklist)]
#[case("Custom", ProgressType::Custom)]
fn progress_type_parses_case_insensitively(#[case] raw: &str, #[case] expected: ProgressType) {
    assert_eq!(ProgressType::try_from(raw), Ok(expected));
}

#[rstest]
fn shell_snapshot_only_carries_identity() {
    let id = CardId::new(42).expect("valid card id");
    let shell = CardSnapshot::shell(id);

    assert_eq!(shell.id(), id);
    assert_eq!(shell.title(), "");
    assert!(!shell.is_scheduled());
    assert_eq!(shell.board_name(), None);
}

#[rstest]
fn builder_sets_scheduling_fields() {
    let scheduled = NaiveDate::from_ymd_opt(2026, 3, 14)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp");
    let card = CardSnapshot::new(CardId::new(1).expect("valid card id"), "Plan sprint")
        .with_scheduled_date(scheduled)
        .with_urgency(UrgencyLevel::DUE_TODAY)
        .with_board_name("Team");

    assert_eq!(card.scheduled_date(), Some(scheduled));
    assert_eq!(card.urgency().level(), 3);
    assert_eq!(card.board_name(), Some("Team"));
}
