mod common;

use common::*;
use proptest::prelude::*;
use registrar_domain::Registration;
use registrar_storage::EntityStore;

#[derive(Debug, Clone)]
enum Op {
    Enroll(usize, usize),
    Drop(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..4usize, 0..3usize).prop_map(|(s, c)| Op::Enroll(s, c)),
        1 => (0..4usize, 0..3usize).prop_map(|(s, c)| Op::Drop(s, c)),
    ]
}

const STUDENTS: [&str; 4] = ["S001", "S002", "S003", "S004"];
const COURSES: [(&str, u32, Option<&str>); 3] = [
    ("C001", 2, Some("MWF 09:00-10:00")),
    ("C002", 3, Some("MWF 09:30-10:30")),
    ("C003", 1, None),
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn counters_match_active_registrations(ops in prop::collection::vec(op(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let courses: Vec<_> = COURSES.iter().map(|(id, cap, sched)| course(id, *cap, *sched)).collect();
            let (engine, store) = engine_with(&STUDENTS, &courses).await;

            for op in ops {
                match op {
                    Op::Enroll(s, c) => { let _ = engine.enroll(STUDENTS[s], COURSES[c].0).await; },
                    Op::Drop(s, c) => { engine.drop(STUDENTS[s], COURSES[c].0).await.unwrap(); },
                }
            }

            for (id, capacity, _) in COURSES {
                let counter = enrolled_count(&store, id).await;
                prop_assert!(counter <= capacity);
                prop_assert_eq!(counter as usize, active_count(&store, id).await);
            }

            for student in STUDENTS {
                let active: Vec<Registration> = store
                    .find_by_index::<Registration>("registration-by-student", student)
                    .await
                    .unwrap()
                    .into_iter()
                    .filter(Registration::is_active)
                    .collect();
                let mut pairs: Vec<&str> = active.iter().map(|r| r.course_id.as_str()).collect();
                let total = pairs.len();
                pairs.sort_unstable();
                pairs.dedup();
                prop_assert_eq!(pairs.len(), total);
                // C001 and C002 overlap, so no student holds both.
                prop_assert!(!(pairs.contains(&"C001") && pairs.contains(&"C002")));
            }
            Ok(())
        })?;
    }
}
