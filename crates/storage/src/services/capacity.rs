use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Registration, Tournament, TournamentStatus};

/// Why a registration attempt was turned away. The display strings are the
/// user-facing messages surfaced by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationDenial {
    #[error("Tournament is full")]
    Full,

    #[error("Already registered for this tournament")]
    AlreadyRegistered,

    #[error("Registration deadline has passed")]
    DeadlinePassed,

    #[error("Tournament has already taken place")]
    AlreadyStarted,

    #[error("Registrations are not open for this tournament")]
    RegistrationsClosed,
}

/// Decides whether `user` may register for `tournament`. Pure: no I/O, safe to
/// call any number of times; `now` is injected so callers and tests agree on
/// the clock.
///
/// Checks run in a fixed priority order and the first failure wins, since each
/// reason carries a different user-facing message:
/// full -> already registered -> deadline -> past date -> not open.
pub fn can_register(
    tournament: &Tournament,
    existing_active: Option<&Registration>,
    now: DateTime<Utc>,
) -> Result<(), RegistrationDenial> {
    if tournament.current_players >= tournament.max_players {
        return Err(RegistrationDenial::Full);
    }

    if existing_active.is_some() {
        return Err(RegistrationDenial::AlreadyRegistered);
    }

    if let Some(deadline) = tournament.registration_deadline
        && now > deadline
    {
        return Err(RegistrationDenial::DeadlinePassed);
    }

    if now > tournament.starts_at {
        return Err(RegistrationDenial::AlreadyStarted);
    }

    if tournament.status != TournamentStatus::RegistrationOpen {
        return Err(RegistrationDenial::RegistrationsClosed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::RegistrationStatus;

    fn open_tournament() -> Tournament {
        let now = Utc::now();
        Tournament {
            tournament_id: Uuid::new_v4(),
            name: "Friday Night Melee".to_string(),
            description: None,
            game: "Super Smash Bros.".to_string(),
            starts_at: now + Duration::days(7),
            max_players: 8,
            current_players: 0,
            status: TournamentStatus::RegistrationOpen,
            created_by: Uuid::new_v4(),
            registration_deadline: None,
            entry_fee: None,
            is_public: true,
            tags: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn registration_for(tournament: &Tournament) -> Registration {
        let now = Utc::now();
        Registration {
            registration_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tournament_id: tournament.tournament_id,
            registered_at: now,
            status: RegistrationStatus::Confirmed,
            notes: None,
            checked_in: false,
            checked_in_at: None,
            final_position: None,
            points: 0,
            matches_won: 0,
            matches_lost: 0,
            matches_drawn: 0,
            prize: None,
            rating: None,
            feedback_comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admits_into_an_open_tournament_with_room() {
        let tournament = open_tournament();
        assert_eq!(can_register(&tournament, None, Utc::now()), Ok(()));
    }

    #[test]
    fn rejects_when_full() {
        let mut tournament = open_tournament();
        tournament.current_players = tournament.max_players;
        assert_eq!(
            can_register(&tournament, None, Utc::now()),
            Err(RegistrationDenial::Full)
        );
    }

    #[test]
    fn rejects_a_duplicate_registration() {
        let tournament = open_tournament();
        let existing = registration_for(&tournament);
        assert_eq!(
            can_register(&tournament, Some(&existing), Utc::now()),
            Err(RegistrationDenial::AlreadyRegistered)
        );
    }

    #[test]
    fn rejects_past_the_deadline_even_with_room() {
        let mut tournament = open_tournament();
        tournament.registration_deadline = Some(Utc::now() - Duration::hours(1));
        assert_eq!(
            can_register(&tournament, None, Utc::now()),
            Err(RegistrationDenial::DeadlinePassed)
        );
    }

    #[test]
    fn rejects_a_tournament_that_already_happened() {
        let mut tournament = open_tournament();
        tournament.starts_at = Utc::now() - Duration::days(1);
        assert_eq!(
            can_register(&tournament, None, Utc::now()),
            Err(RegistrationDenial::AlreadyStarted)
        );
    }

    #[test]
    fn rejects_when_registrations_are_not_open() {
        for status in [
            TournamentStatus::Planned,
            TournamentStatus::RegistrationClosed,
            TournamentStatus::InProgress,
            TournamentStatus::Completed,
            TournamentStatus::Cancelled,
        ] {
            let mut tournament = open_tournament();
            tournament.status = status;
            assert_eq!(
                can_register(&tournament, None, Utc::now()),
                Err(RegistrationDenial::RegistrationsClosed)
            );
        }
    }

    #[test]
    fn full_wins_over_every_other_reason() {
        // A closed, past-dated, past-deadline, full tournament with an existing
        // registration must still report "full" first.
        let mut tournament = open_tournament();
        tournament.current_players = tournament.max_players;
        tournament.status = TournamentStatus::RegistrationClosed;
        tournament.starts_at = Utc::now() - Duration::days(1);
        tournament.registration_deadline = Some(Utc::now() - Duration::days(2));
        let existing = registration_for(&tournament);
        assert_eq!(
            can_register(&tournament, Some(&existing), Utc::now()),
            Err(RegistrationDenial::Full)
        );
    }

    #[test]
    fn already_registered_wins_over_deadline_and_status() {
        let mut tournament = open_tournament();
        tournament.status = TournamentStatus::RegistrationClosed;
        tournament.registration_deadline = Some(Utc::now() - Duration::hours(1));
        let existing = registration_for(&tournament);
        assert_eq!(
            can_register(&tournament, Some(&existing), Utc::now()),
            Err(RegistrationDenial::AlreadyRegistered)
        );
    }

    #[test]
    fn deadline_wins_over_past_date_and_status() {
        let mut tournament = open_tournament();
        tournament.status = TournamentStatus::RegistrationClosed;
        tournament.starts_at = Utc::now() - Duration::hours(1);
        tournament.registration_deadline = Some(Utc::now() - Duration::hours(2));
        assert_eq!(
            can_register(&tournament, None, Utc::now()),
            Err(RegistrationDenial::DeadlinePassed)
        );
    }

    #[test]
    fn past_date_wins_over_status() {
        let mut tournament = open_tournament();
        tournament.status = TournamentStatus::Cancelled;
        tournament.starts_at = Utc::now() - Duration::hours(1);
        assert_eq!(
            can_register(&tournament, None, Utc::now()),
            Err(RegistrationDenial::AlreadyStarted)
        );
    }

    #[test]
    fn repeated_calls_are_side_effect_free() {
        let tournament = open_tournament();
        let now = Utc::now();
        for _ in 0..3 {
            assert_eq!(can_register(&tournament, None, now), Ok(()));
        }
    }

    #[test]
    fn capacity_scenario_two_slots() {
        // capacity=2: A ok, B ok, C rejected, A leaves, C ok. The count is
        // driven by hand here the way the registration flow recomputes it.
        let mut tournament = open_tournament();
        tournament.max_players = 2;

        assert_eq!(can_register(&tournament, None, Utc::now()), Ok(()));
        tournament.current_players = 1; // A

        assert_eq!(can_register(&tournament, None, Utc::now()), Ok(()));
        tournament.current_players = 2; // B

        assert_eq!(
            can_register(&tournament, None, Utc::now()),
            Err(RegistrationDenial::Full)
        ); // C
        assert_eq!(tournament.current_players, 2);

        tournament.current_players = 1; // A unregisters

        assert_eq!(can_register(&tournament, None, Utc::now()), Ok(())); // C again
        tournament.current_players = 2;
        assert!(tournament.current_players <= tournament.max_players);
    }
}
