// SPDX-License-Identifier: MIT

//! Proptest strategies shared across crates, gated behind `test-support`
//! (mirrors the teacher's feature-gated test-builder convention).

use crate::id::TicketId;
use proptest::prelude::*;

/// Generates strings matching `[0-9a-f]{4}`, the ticket-id format invariant
/// (§8, invariant 2).
pub fn ticket_id_strategy() -> impl Strategy<Value = TicketId> {
    "[0-9a-f]{4}".prop_map(|s| s.parse::<TicketId>().expect("generated string matches the hex alphabet"))
}

/// Generates frontmatter-safe scalar strings: printable, no newlines, no
/// leading/trailing whitespace that would be lost on trim during parsing.
pub fn scalar_string_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.-]{0,24}"
}

proptest! {
    #[test]
    fn ticket_id_strategy_always_valid(id in ticket_id_strategy()) {
        prop_assert_eq!(id.as_str().len(), 4);
    }

    #[test]
    fn frontmatter_round_trip_law(value in scalar_string_strategy()) {
        let mut doc = crate::parsing::Document::new("body");
        doc.set("field", value.clone());
        let emitted = crate::parsing::emit(&doc);
        let parsed = crate::parsing::parse(&emitted).expect("emitted document reparses");
        prop_assert_eq!(parsed.get_str("field"), Some(value.as_str()));
    }

    #[test]
    fn leading_zero_ticket_id_literal_survives_round_trip(n in 1u32..9999) {
        let literal = format!("0{n}");
        let mut doc = crate::parsing::Document::new("body");
        doc.set("id", literal.clone());
        let emitted = crate::parsing::emit(&doc);
        let parsed = crate::parsing::parse(&emitted).expect("emitted document reparses");
        prop_assert_eq!(parsed.get_str("id"), Some(literal.as_str()));
    }
}
