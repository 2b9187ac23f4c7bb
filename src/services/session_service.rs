use std::collections::{HashMap, HashSet};

use tracing::info;
use uuid::Uuid;

use crate::{
    dto::session::{
        AssignTeamsRequest, GenerateRoundsRequest, ResultsView, ScoreRequest, SelectPoolRequest,
        SessionView,
    },
    error::ServiceError,
    services::{
        balancer::{self, validate_pool},
        rotation::{self, validate_teams},
        scoring::{self, sanitize_score},
    },
    state::{
        SharedState,
        roster::{Player, Team, TeamSide},
        session::{MatchKey, Session},
    },
};

/// Current session as seen by the organizer.
pub async fn get_session(state: &SharedState) -> Result<SessionView, ServiceError> {
    Ok(state.load_session().await?.into())
}

/// Replace the pool with the given roster players, discarding teams and rounds.
pub async fn select_pool(
    state: &SharedState,
    request: SelectPoolRequest,
) -> Result<SessionView, ServiceError> {
    ensure_unique(&request.player_ids)?;

    let roster = state
        .roster()
        .list_players()
        .await?
        .into_iter()
        .map(|entity| (entity.id, Player::from(entity)))
        .collect::<HashMap<_, _>>();

    let pool = request
        .player_ids
        .iter()
        .map(|id| {
            roster
                .get(id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not found")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (_, session) = state
        .with_session_mut(move |session| {
            session.pool = pool;
            session.clear_teams();
            Ok(())
        })
        .await?;
    info!(pool = session.pool.len(), "pool selected");

    Ok(session.into())
}

/// Split the pool into two balanced teams.
pub async fn balance_teams(state: &SharedState) -> Result<SessionView, ServiceError> {
    let settings = *state.config().balance();
    let (gap, session) = state
        .with_session_mut(move |session| {
            validate_pool(&session.pool)?;
            let teams = balancer::balance(&session.pool, &settings, &mut rand::rng());
            let gap = teams.rating_gap();
            session.team_a = teams.team_a;
            session.team_b = teams.team_b;
            session.clear_schedule();
            Ok(gap)
        })
        .await?;
    info!(
        team_a = session.team_a.rating_sum(),
        team_b = session.team_b.rating_sum(),
        gap,
        "teams balanced"
    );

    Ok(session.into())
}

/// Assign both teams by hand from pool members.
pub async fn assign_teams(
    state: &SharedState,
    request: AssignTeamsRequest,
) -> Result<SessionView, ServiceError> {
    let AssignTeamsRequest { team_a, team_b } = request;
    let all_ids = team_a.iter().chain(team_b.iter()).copied().collect::<Vec<_>>();
    ensure_unique(&all_ids)?;

    let (_, session) = state
        .with_session_mut(move |session| {
            let team_a = pool_members(&session.pool, &team_a)?;
            let team_b = pool_members(&session.pool, &team_b)?;
            session.team_a = team_a;
            session.team_b = team_b;
            session.clear_schedule();
            Ok(())
        })
        .await?;
    info!(
        team_a = session.team_a.len(),
        team_b = session.team_b.len(),
        "teams assigned manually"
    );

    Ok(session.into())
}

/// Put a pool member on a team, moving them out of the other one if needed.
pub async fn add_to_team(
    state: &SharedState,
    side: TeamSide,
    player_id: Uuid,
) -> Result<SessionView, ServiceError> {
    let (_, session) = state
        .with_session_mut(move |session| {
            let player = pool_player(&session.pool, player_id)?;
            session.team_mut(side.other()).remove(player_id);
            if !session.team(side).contains(player_id) {
                session.team_mut(side).push(player);
            }
            session.clear_schedule();
            Ok(())
        })
        .await?;
    info!(player = %player_id, team = %side, "player added to team");

    Ok(session.into())
}

/// Take a player off a team.
pub async fn remove_from_team(
    state: &SharedState,
    side: TeamSide,
    player_id: Uuid,
) -> Result<SessionView, ServiceError> {
    let (_, session) = state
        .with_session_mut(move |session| {
            if session.team_mut(side).remove(player_id).is_none() {
                return Err(ServiceError::NotFound(format!(
                    "player `{player_id}` is not on {side}"
                )));
            }
            session.clear_schedule();
            Ok(())
        })
        .await?;
    info!(player = %player_id, team = %side, "player removed from team");

    Ok(session.into())
}

/// Generate the rotation schedule for the current teams, replacing any previous one.
pub async fn generate_rounds(
    state: &SharedState,
    request: GenerateRoundsRequest,
) -> Result<SessionView, ServiceError> {
    let settings = *state.config().rotation();
    let GenerateRoundsRequest {
        round_count,
        avoid_repeats,
    } = request;
    if round_count == 0 {
        return Err(ServiceError::InvalidInput(
            "at least one round must be requested".into(),
        ));
    }

    let (_, session) = state
        .with_session_mut(move |session| {
            validate_teams(&session.team_a, &session.team_b)?;
            let rounds = rotation::generate(
                &session.team_a,
                &session.team_b,
                round_count,
                avoid_repeats,
                &settings,
                &mut rand::rng(),
            )?;
            session.clear_schedule();
            session.rounds = rounds;
            session.avoid_repeats = avoid_repeats;
            Ok(())
        })
        .await?;
    info!(rounds = round_count, avoid_repeats, "rounds generated");

    Ok(session.into())
}

/// Drop the schedule and its scores, keeping teams.
pub async fn clear_rounds(state: &SharedState) -> Result<SessionView, ServiceError> {
    let (_, session) = state
        .with_session_mut(|session| {
            session.clear_schedule();
            Ok(())
        })
        .await?;
    info!("rounds cleared");

    Ok(session.into())
}

/// Start over with an empty session.
pub async fn reset_session(state: &SharedState) -> Result<(), ServiceError> {
    state.clear_session().await?;
    info!("session reset");
    Ok(())
}

/// Store the score typed for a match, addressed by 1-based round and court numbers.
///
/// Characters other than digits in `0..=7` are discarded; an empty result clears the score.
pub async fn record_score(
    state: &SharedState,
    round: usize,
    court: usize,
    request: ScoreRequest,
) -> Result<ResultsView, ServiceError> {
    let key = match (round.checked_sub(1), court.checked_sub(1)) {
        (Some(round), Some(court)) => MatchKey::new(round, court),
        _ => {
            return Err(ServiceError::NotFound(format!(
                "round {round} court {court} is not scheduled"
            )));
        }
    };
    let score = sanitize_score(&request.score);

    let (_, session) = state
        .with_session_mut(move |session| {
            if session.find_match(key).is_none() {
                return Err(ServiceError::NotFound(format!(
                    "round {round} court {court} is not scheduled"
                )));
            }
            if score.is_empty() {
                session.scores.remove(&key);
            } else {
                session.scores.insert(key, score);
            }
            Ok(())
        })
        .await?;
    info!(round, court, "score recorded");

    Ok(tally_view(&session))
}

/// Points per round and overall for the current session.
pub async fn results(state: &SharedState) -> Result<ResultsView, ServiceError> {
    let session = state.load_session().await?;
    Ok(tally_view(&session))
}

fn tally_view(session: &Session) -> ResultsView {
    scoring::tally(&session.rounds, &session.scores).into()
}

fn ensure_unique(ids: &[Uuid]) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    match ids.iter().find(|id| !seen.insert(**id)) {
        Some(duplicate) => Err(ServiceError::InvalidInput(format!(
            "player `{duplicate}` listed more than once"
        ))),
        None => Ok(()),
    }
}

fn pool_player(pool: &[Player], id: Uuid) -> Result<Player, ServiceError> {
    pool.iter()
        .find(|player| player.id == id)
        .cloned()
        .ok_or_else(|| ServiceError::InvalidInput(format!("player `{id}` is not in the pool")))
}

fn pool_members(pool: &[Player], ids: &[Uuid]) -> Result<Team, ServiceError> {
    ids.iter()
        .map(|id| pool_player(pool, *id))
        .collect::<Result<Vec<_>, _>>()
        .map(Team::new)
}
