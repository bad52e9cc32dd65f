use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::model::{
    EventSession, FriendOverlap, InteractionInterval, IsolationLevel, LowInteractionEntry,
    SocializationSummary,
};

/// Whole minutes in one interval, rounded half-away-from-zero.
///
/// A reversed interval (`end_time < start_time`) contributes zero, never
/// a negative total.
pub fn duration_minutes(interval: &InteractionInterval) -> i64 {
    let millis = (interval.end_time - interval.start_time).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis as f64 / 60_000.0).round() as i64
}

/// Summed whole minutes across a resident's intervals.
pub fn total_interaction_minutes(intervals: &[InteractionInterval]) -> i64 {
    intervals.iter().map(duration_minutes).sum()
}

/// Residents whose summed interaction time is under `threshold_minutes`.
///
/// Strictly a *low*-interaction filter: a resident at or above the
/// threshold never appears. Order is ascending by total minutes, ties
/// broken by ascending user id, so a fixed input always ranks the same.
pub fn low_interaction(
    intervals_by_user: &BTreeMap<u64, Vec<InteractionInterval>>,
    threshold_minutes: i64,
) -> Vec<LowInteractionEntry> {
    let mut entries: Vec<LowInteractionEntry> = intervals_by_user
        .iter()
        .map(|(&user_id, intervals)| LowInteractionEntry {
            user_id,
            total_minutes: total_interaction_minutes(intervals),
        })
        .filter(|entry| entry.total_minutes < threshold_minutes)
        .collect();
    entries.sort_by_key(|entry| (entry.total_minutes, entry.user_id));
    entries
}

/// Socialization hours inside each report window, as of `now`.
///
/// Every interval is clipped to `min(end, now) - max(start, window_start)`
/// and negative spans are dropped. "Today" is the UTC calendar day
/// containing `now`; week and month are trailing 7- and 30-day windows
/// (the upstream producer's literal month rule).
pub fn socialization_summary(
    intervals: &[InteractionInterval],
    now: DateTime<Utc>,
) -> SocializationSummary {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    SocializationSummary {
        today_hours: window_hours(intervals, day_start, now),
        week_hours: window_hours(intervals, now - Duration::days(7), now),
        month_hours: window_hours(intervals, now - Duration::days(30), now),
    }
}

fn window_hours(
    intervals: &[InteractionInterval],
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let mut total_seconds = 0i64;
    for interval in intervals {
        let start = interval.start_time.max(window_start);
        let end = interval.end_time.min(now);
        if end > start {
            total_seconds += (end - start).num_seconds();
        }
    }
    round2(total_seconds as f64 / 3600.0)
}

/// Ranks other residents by cumulative co-presence with `user_id` at
/// shared events.
///
/// Overlap is the positive intersection of the two attendance windows,
/// summed across every shared event. Descending by overlap, ties by
/// ascending user id; top-N truncation is the caller's concern.
pub fn friend_overlap(user_id: u64, sessions: &[EventSession]) -> Vec<FriendOverlap> {
    let mut overlap_seconds: BTreeMap<u64, i64> = BTreeMap::new();

    for session in sessions.iter().filter(|s| s.user_id == user_id) {
        for other in sessions
            .iter()
            .filter(|s| s.user_id != user_id && s.event_id == session.event_id)
        {
            let start = session.start_time.max(other.start_time);
            let end = session.end_time.min(other.end_time);
            if end > start {
                *overlap_seconds.entry(other.user_id).or_insert(0) += (end - start).num_seconds();
            }
        }
    }

    let mut ranked: Vec<(u64, i64)> = overlap_seconds.into_iter().collect();
    ranked.sort_by_key(|&(other_id, seconds)| (Reverse(seconds), other_id));
    ranked
        .into_iter()
        .map(|(other_id, seconds)| FriendOverlap {
            user_id: other_id,
            overlap_minutes: round2(seconds as f64 / 60.0),
        })
        .collect()
}

/// Butterfly-report banding over a resident's total interaction minutes.
pub fn isolation_level(total_minutes: f64) -> IsolationLevel {
    if total_minutes < 30.0 {
        IsolationLevel::Isolated
    } else if total_minutes < 120.0 {
        IsolationLevel::Moderate
    } else {
        IsolationLevel::Social
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
