// src/services/leaderboard.rs

//! Global points table, recomputed from source rows on every read.
//!
//! total = manual points + competition placement points + attended event points.

use std::collections::HashMap;

use crate::{
    error::AppError,
    models::{
        competition::Competition,
        event::{DEFAULT_EVENT_POINTS, Event, EventRegistration},
        leaderboard::LeaderboardEntry,
        result::CompetitionResult,
        user::User,
    },
    services::{ranking, results},
    store::Store,
};

/// Pure aggregation over already-loaded rows.
///
/// Every user in `users` appears, even with nothing but a manual baseline.
/// Results and registrations whose user is unknown are skipped. A missing
/// competition or event falls back to the default point values.
pub fn aggregate(
    users: &[User],
    results: &[CompetitionResult],
    competitions: &HashMap<String, Competition>,
    registrations: &[EventRegistration],
    events: &HashMap<String, Event>,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .map(|user| LeaderboardEntry {
            user_id: user.id.clone(),
            user_name: user.display_name(),
            total_points: user.manual_points as i64,
            competition_points: 0,
            event_points: 0,
            manual_points: user.manual_points as i64,
            competitions_participated: 0,
            events_attended: 0,
            best_rank: None,
            rank: 0,
        })
        .collect();

    let index: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.user_id.clone(), i))
        .collect();

    let ranks = ranking::ranks_by_result_id(results);
    for result in results {
        let Some(&slot) = index.get(&result.user_id) else {
            continue;
        };
        let Some(&rank) = ranks.get(&result.id) else {
            continue;
        };
        let schedule = competitions
            .get(&result.competition_id)
            .map(Competition::point_schedule)
            .unwrap_or_default();
        let points = schedule.points_for_rank(rank) as i64;

        let entry = &mut entries[slot];
        entry.competition_points += points;
        entry.total_points += points;
        entry.competitions_participated += 1;
        entry.best_rank = Some(entry.best_rank.map_or(rank, |best| best.min(rank)));
    }

    for registration in registrations.iter().filter(|r| r.counts_for_points()) {
        let Some(&slot) = index.get(&registration.user_id) else {
            continue;
        };
        let points = events
            .get(&registration.event_id)
            .map(Event::attendance_points)
            .unwrap_or(DEFAULT_EVENT_POINTS) as i64;

        let entry = &mut entries[slot];
        entry.event_points += points;
        entry.total_points += points;
        entry.events_attended += 1;
    }

    // Stable, so equal totals keep user order: ranks stay positional.
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}

/// Loads every source collection and aggregates.
pub async fn compute_leaderboard(store: &dyn Store) -> Result<Vec<LeaderboardEntry>, AppError> {
    let users = store.list_users().await?;
    let results = results::all_results(store).await?;
    let competitions: HashMap<String, Competition> = store
        .list_competitions()
        .await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();
    let registrations = store.list_registrations().await?;
    let events: HashMap<String, Event> = store
        .list_events()
        .await?
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();

    let entries = aggregate(&users, &results, &competitions, &registrations, &events);
    tracing::debug!("Leaderboard computed for {} users", entries.len());
    Ok(entries)
}

/// The standing of one user, if they have a user record.
pub async fn standing_for(
    store: &dyn Store,
    user_id: &str,
) -> Result<Option<LeaderboardEntry>, AppError> {
    Ok(compute_leaderboard(store)
        .await?
        .into_iter()
        .find(|e| e.user_id == user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{event::EventStatus, user::Role},
        services::fixtures::result_row,
    };
    use chrono::Utc;

    fn user(id: &str, manual_points: i32) -> User {
        User {
            id: id.to_string(),
            name: Some(id.to_string()),
            email: None,
            role: Role::User,
            manual_points,
            trophies: Vec::new(),
            age: None,
            phone: None,
            scout_level: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn event(id: &str, points: i32) -> Event {
        Event {
            id: id.to_string(),
            title: "Camp".to_string(),
            description: None,
            date: Utc::now(),
            location: None,
            points,
            status: EventStatus::Completed,
            created_at: Utc::now(),
        }
    }

    fn registration(
        event_id: &str,
        user_id: &str,
        attended: bool,
        awarded: bool,
    ) -> EventRegistration {
        EventRegistration {
            id: EventRegistration::key(event_id, user_id),
            event_id: event_id.to_string(),
            user_id: user_id.to_string(),
            user_name: user_id.to_string(),
            user_email: None,
            registered_at: Utc::now(),
            attended,
            points_awarded: awarded,
        }
    }

    #[test]
    fn test_manual_only_user_appears() {
        let users = vec![user("u1", 15)];
        let board = aggregate(&users, &[], &HashMap::new(), &[], &HashMap::new());

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].total_points, 15);
        assert_eq!(board[0].competitions_participated, 0);
        assert_eq!(board[0].events_attended, 0);
        assert_eq!(board[0].best_rank, None);
        assert_eq!(board[0].rank, 1);
    }

    #[test]
    fn test_zero_point_users_still_listed() {
        let users = vec![user("u1", 0), user("u2", 0)];
        let board = aggregate(&users, &[], &HashMap::new(), &[], &HashMap::new());
        assert_eq!(board.len(), 2);
        assert!(board.iter().all(|e| e.total_points == 0));
    }

    #[test]
    fn test_mixed_sources_sum() {
        let users = vec![user("u1", 10), user("u2", 0)];
        let results = vec![result_row("c1", "u1", 9, 0), result_row("c1", "u2", 5, 1)];
        let registrations = vec![registration("e1", "u1", true, true)];
        let events = HashMap::from([("e1".to_string(), event("e1", 10))]);

        // competition record missing: default schedule applies (first = 100)
        let board = aggregate(&users, &results, &HashMap::new(), &registrations, &events);

        let top = &board[0];
        assert_eq!(top.user_id, "u1");
        assert_eq!(top.total_points, 120);
        assert_eq!(top.manual_points, 10);
        assert_eq!(top.competition_points, 100);
        assert_eq!(top.event_points, 10);
        assert_eq!(top.best_rank, Some(1));

        assert_eq!(board[1].user_id, "u2");
        assert_eq!(board[1].total_points, 75);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn test_event_points_require_attendance_and_award() {
        let users = vec![user("u1", 0)];
        let registrations = vec![
            registration("e1", "u1", true, false),
            registration("e2", "u1", false, false),
            registration("e3", "u1", true, true),
        ];
        // e3 has no event record: default 10
        let board = aggregate(&users, &[], &HashMap::new(), &registrations, &HashMap::new());
        assert_eq!(board[0].event_points, DEFAULT_EVENT_POINTS as i64);
        assert_eq!(board[0].events_attended, 1);
    }

    #[test]
    fn test_best_rank_is_minimum_over_competitions() {
        let users = vec![user("a", 0), user("b", 0)];
        let results = vec![
            result_row("c1", "a", 10, 0),
            result_row("c1", "b", 5, 1),
            result_row("c2", "b", 8, 2),
        ];
        let board = aggregate(&users, &results, &HashMap::new(), &[], &HashMap::new());
        let b = board.iter().find(|e| e.user_id == "b").unwrap();
        assert_eq!(b.best_rank, Some(1));
        assert_eq!(b.competitions_participated, 2);
        assert_eq!(b.competition_points, 75 + 100);
    }

    #[test]
    fn test_unknown_user_results_skipped() {
        let users = vec![user("u1", 0)];
        let results = vec![result_row("c1", "ghost", 10, 0), result_row("c1", "u1", 5, 1)];
        let board = aggregate(&users, &results, &HashMap::new(), &[], &HashMap::new());

        assert_eq!(board.len(), 1);
        // the ghost still occupies first place in the competition
        assert_eq!(board[0].best_rank, Some(2));
        assert_eq!(board[0].competition_points, 75);
    }

    #[test]
    fn test_equal_totals_rank_positionally() {
        let users = vec![user("first", 30), user("second", 30)];
        let board = aggregate(&users, &[], &HashMap::new(), &[], &HashMap::new());
        assert_eq!(board[0].user_id, "first");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 2);
    }
}
