//! Property-based tests for cardgate-core using proptest
//!
//! These tests verify invariants that should hold for all valid inputs.

use cardgate_core::{CardRecord, ExpiryDate, PinDigest, Role};
use chrono::NaiveDate;
use proptest::prelude::*;

// ============================================
// Strategies
// ============================================

fn arb_expiry() -> impl Strategy<Value = ExpiryDate> {
    (1u8..=12, 2000u16..2100).prop_map(|(month, year)| ExpiryDate::new(month, year).unwrap())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_pin() -> impl Strategy<Value = String> {
    "[0-9]{4,12}"
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Admin),
        Just(Role::User),
        "[a-z]{3,9}".prop_map(|tag| tag.parse::<Role>().unwrap()),
    ]
}

// ============================================
// Properties
// ============================================

proptest! {
    #[test]
    fn digest_is_deterministic(pin in ".{0,32}") {
        let a = PinDigest::of(&pin);
        let b = PinDigest::of(&pin);
        prop_assert!(a.matches(&b));
        prop_assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn distinct_pins_have_distinct_digests(a in arb_pin(), b in arb_pin()) {
        prop_assume!(a != b);
        prop_assert!(!PinDigest::of(&a).matches(&PinDigest::of(&b)));
    }

    #[test]
    fn expiry_display_parses_back(expiry in arb_expiry()) {
        let parsed: ExpiryDate = expiry.to_string().parse().unwrap();
        prop_assert_eq!(parsed, expiry);
    }

    #[test]
    fn card_is_valid_through_its_expiry_month(expiry in arb_expiry(), day in 1u32..=28) {
        let in_month = NaiveDate::from_ymd_opt(
            i32::from(expiry.year()),
            u32::from(expiry.month()),
            day,
        ).unwrap();
        prop_assert!(!expiry.is_expired(in_month));
    }

    #[test]
    fn expiry_is_monotonic_in_time(expiry in arb_expiry(), a in arb_date(), b in arb_date()) {
        let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
        // Once expired, a card stays expired
        if expiry.is_expired(earlier) {
            prop_assert!(expiry.is_expired(later));
        }
    }

    #[test]
    fn record_line_survives_store_encoding(
        card in "[0-9]{1,19}",
        name in "[A-Za-z][A-Za-z .'-]{0,30}",
        expiry in arb_expiry(),
        pin in arb_pin(),
        role in arb_role(),
    ) {
        let record = CardRecord::new(card, name, expiry, PinDigest::of(&pin), role);
        let decoded = CardRecord::from_line(&record.to_line()).unwrap();
        prop_assert_eq!(decoded, record);
    }
}
