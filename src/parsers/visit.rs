use crate::transition::Transition;

/// One row of the visit/page join, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub id: i64,
    /// Preceding visit in the same navigation chain, 0 when there is none.
    pub from_id: i64,
    /// Microseconds since the Unix epoch.
    pub timestamp: i64,
    pub transition_code: i64,
    pub url: String,
}

impl VisitRecord {
    /// True when the next report line starts a new session block.
    ///
    /// This only checks whether the store handed out this visit's id right
    /// after its predecessor's. It is a display grouping heuristic and says
    /// nothing reliable about how the user actually navigated.
    pub fn ends_session(&self) -> bool {
        self.id.checked_sub(1) != Some(self.from_id)
    }
}

/// A visit with its transition classified and its URL normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedVisit {
    pub record: VisitRecord,
    pub transition: Transition,
    pub url: String,
    pub video_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, from_id: i64) -> VisitRecord {
        VisitRecord {
            id,
            from_id,
            timestamp: 0,
            transition_code: 1,
            url: String::new(),
        }
    }

    #[test]
    fn consecutive_ids_stay_in_session() {
        assert!(!record(10, 9).ends_session());
    }

    #[test]
    fn unrelated_predecessor_ends_session() {
        assert!(record(9, 0).ends_session());
        assert!(record(10, 3).ends_session());
        assert!(record(1, 1).ends_session());
    }

    #[test]
    fn minimum_id_does_not_overflow() {
        assert!(record(i64::MIN, i64::MAX).ends_session());
    }
}
