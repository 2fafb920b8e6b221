use proptest::prelude::*;
use registrar_domain::{ScheduleSpec, Weekdays};

fn spec() -> impl Strategy<Value = ScheduleSpec> {
    (1u8..128, 0u16..1439, 1u16..240).prop_map(|(bits, start, len)| {
        let end = (start + len).min(24 * 60);
        ScheduleSpec::new(Weekdays::from_bits_truncate(bits), start, end).unwrap()
    })
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in spec(), b in spec()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn every_section_overlaps_itself(a in spec()) {
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn disjoint_days_never_overlap(a in spec(), b in spec()) {
        if !a.days().intersects(b.days()) {
            prop_assert!(!a.overlaps(&b));
        }
    }

    #[test]
    fn canonical_text_parses_back(a in spec()) {
        let parsed: ScheduleSpec = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }
}
