//! Pure aggregation helpers over in-memory snapshots of topics and sessions.
//!
//! Nothing here touches storage; callers fetch the records they care about
//! and pass them in, so these stay trivial to test with a fixed clock.

use chrono::{DateTime, Days, Utc};

use crate::model::{StudySession, SubjectId, Topic};
use crate::time::{start_of_day, start_of_week};

/// Counts a subject's completed topics.
#[must_use]
pub fn completed_topics_count(topics: &[Topic], subject_id: SubjectId) -> u32 {
    count_matching(topics, subject_id, |topic| topic.completed())
}

/// Counts all of a subject's topics.
#[must_use]
pub fn total_topics_count(topics: &[Topic], subject_id: SubjectId) -> u32 {
    count_matching(topics, subject_id, |_| true)
}

fn count_matching(topics: &[Topic], subject_id: SubjectId, pred: impl Fn(&Topic) -> bool) -> u32 {
    let count = topics
        .iter()
        .filter(|topic| topic.subject_id() == subject_id && pred(topic))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Percentage of completed items, rounded to the nearest whole percent
/// (halves round away from zero). Zero totals yield zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn completion_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

/// Sums the whole minutes studied in the calendar week containing
/// `reference`.
///
/// The week runs Sunday 00:00:00 UTC up to (but not including) the next
/// Sunday; a session counts if its start time falls in that window.
#[must_use]
pub fn weekly_study_minutes(sessions: &[StudySession], reference: DateTime<Utc>) -> i64 {
    let week_start = start_of_week(reference);
    let week_end = week_start
        .checked_add_days(Days::new(7))
        .expect("week end is within chrono's date range");

    sessions
        .iter()
        .filter(|session| session.start_time() >= week_start && session.start_time() < week_end)
        .map(StudySession::duration_minutes)
        .sum()
}

/// Returns the sessions starting on `reference`'s calendar day, ordered by
/// start time ascending.
#[must_use]
pub fn sessions_today(sessions: &[StudySession], reference: DateTime<Utc>) -> Vec<StudySession> {
    let today = start_of_day(reference);
    let mut matched: Vec<StudySession> = sessions
        .iter()
        .filter(|session| start_of_day(session.start_time()) == today)
        .cloned()
        .collect();
    matched.sort_by_key(StudySession::start_time);
    matched
}

/// Whole days until the exam, rounding partial days up; negative once the
/// exam has passed.
#[must_use]
pub fn days_until(exam_date: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    const DAY_MS: i64 = 86_400_000;
    let delta_ms = (exam_date - reference).num_milliseconds();
    // ceil division that also holds for negative deltas
    (delta_ms + DAY_MS - 1).div_euclid(DAY_MS)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SessionId, TopicId};
    use crate::time::{fixed_now, start_of_week};
    use chrono::Duration;

    fn build_topic(subject_id: SubjectId, completed: bool) -> Topic {
        Topic::from_persisted(
            TopicId::random(),
            subject_id,
            "UNIT-1",
            "syllabus notes",
            completed,
            None,
        )
        .unwrap()
    }

    fn build_session(start: DateTime<Utc>, minutes: i64) -> StudySession {
        StudySession::new(
            SessionId::random(),
            SubjectId::random(),
            None,
            start,
            start + Duration::minutes(minutes),
        )
        .unwrap()
    }

    #[test]
    fn topic_counts_scope_to_the_subject() {
        let subject = SubjectId::random();
        let other = SubjectId::random();
        let topics = vec![
            build_topic(subject, true),
            build_topic(subject, false),
            build_topic(subject, true),
            build_topic(other, true),
        ];

        assert_eq!(completed_topics_count(&topics, subject), 2);
        assert_eq!(total_topics_count(&topics, subject), 3);
        assert_eq!(completed_topics_count(&topics, other), 1);
    }

    #[test]
    fn completion_percentage_pins_rounding() {
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(3, 4), 75);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(5, 5), 100);
        assert_eq!(completion_percentage(1, 8), 13);
    }

    #[test]
    fn weekly_minutes_includes_the_week_start_boundary() {
        let week_start = start_of_week(fixed_now());
        let sessions = vec![
            build_session(week_start, 30),
            build_session(week_start + Duration::days(3), 45),
        ];

        assert_eq!(weekly_study_minutes(&sessions, fixed_now()), 75);
    }

    #[test]
    fn weekly_minutes_excludes_one_second_before_the_week() {
        let week_start = start_of_week(fixed_now());
        let sessions = vec![
            build_session(week_start - Duration::seconds(1), 60),
            build_session(week_start + Duration::hours(10), 20),
        ];

        assert_eq!(weekly_study_minutes(&sessions, fixed_now()), 20);
    }

    #[test]
    fn weekly_minutes_excludes_the_next_week() {
        let week_start = start_of_week(fixed_now());
        let sessions = vec![
            build_session(week_start + Duration::days(7), 60),
            build_session(week_start + Duration::days(6) + Duration::hours(23), 15),
        ];

        assert_eq!(weekly_study_minutes(&sessions, fixed_now()), 15);
    }

    #[test]
    fn sessions_today_filters_and_sorts_by_start() {
        let today = start_of_day(fixed_now());
        let late = build_session(today + Duration::hours(20), 30);
        let early = build_session(today + Duration::hours(8), 30);
        let yesterday = build_session(today - Duration::hours(2), 30);
        let tomorrow = build_session(today + Duration::hours(25), 30);

        let sessions = vec![late.clone(), yesterday, early.clone(), tomorrow];
        let todays = sessions_today(&sessions, fixed_now());

        assert_eq!(todays.len(), 2);
        assert_eq!(todays[0].id(), early.id());
        assert_eq!(todays[1].id(), late.id());
    }

    #[test]
    fn days_until_rounds_partial_days_up() {
        assert_eq!(days_until(fixed_now() + Duration::hours(1), fixed_now()), 1);
        assert_eq!(days_until(fixed_now() + Duration::days(3), fixed_now()), 3);
        assert_eq!(
            days_until(fixed_now() + Duration::days(3) + Duration::minutes(1), fixed_now()),
            4
        );
        assert_eq!(days_until(fixed_now(), fixed_now()), 0);
    }

    #[test]
    fn days_until_is_negative_for_past_exams() {
        assert_eq!(days_until(fixed_now() - Duration::days(2), fixed_now()), -2);
        // ceil(-1.5) == -1
        assert_eq!(
            days_until(fixed_now() - Duration::hours(36), fixed_now()),
            -1
        );
    }
}
