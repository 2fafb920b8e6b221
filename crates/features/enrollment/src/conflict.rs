//! Schedule conflict policies.

use registrar_domain::Course;
use registrar_domain::config::ConflictPolicy;
use std::fmt::Debug;
use std::sync::Arc;

/// Decides whether a candidate course may join a student's current schedule.
pub trait ConflictChecker: Debug + Send + Sync + 'static {
    /// True when the two sections cannot both be taken.
    fn conflicts(&self, existing: &Course, candidate: &Course) -> bool;

    /// First course in `existing` that clashes with `candidate`.
    fn find_conflict<'a>(&self, existing: &'a [Course], candidate: &Course) -> Option<&'a Course> {
        existing.iter().find(|course| self.conflicts(course, candidate))
    }

    fn has_conflict(&self, existing: &[Course], candidate: &Course) -> bool {
        self.find_conflict(existing, candidate).is_some()
    }
}

/// Conflict iff both schedule strings are present and exactly equal.
///
/// Overlapping sections written differently (`MWF 10:00-11:00` and `MWF 10:30-11:30`)
/// pass. Kept for compatibility with data sets that rely on that.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralConflict;

impl ConflictChecker for LiteralConflict {
    fn conflicts(&self, existing: &Course, candidate: &Course) -> bool {
        match (&existing.schedule, &candidate.schedule) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Conflict iff the parsed sections share a day and their time ranges overlap.
///
/// When either schedule does not parse, falls back to [`LiteralConflict`], so textually
/// identical schedules always conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapConflict;

impl ConflictChecker for OverlapConflict {
    fn conflicts(&self, existing: &Course, candidate: &Course) -> bool {
        match (existing.schedule_spec(), candidate.schedule_spec()) {
            (Some(Ok(a)), Some(Ok(b))) => a.overlaps(&b),
            (Some(_), Some(_)) => LiteralConflict.conflicts(existing, candidate),
            _ => false,
        }
    }
}

/// The checker configured by `enrollment.conflict_policy`.
#[must_use]
pub fn checker_for(policy: ConflictPolicy) -> Arc<dyn ConflictChecker> {
    match policy {
        ConflictPolicy::Overlap => Arc::new(OverlapConflict),
        ConflictPolicy::Literal => Arc::new(LiteralConflict),
    }
}
