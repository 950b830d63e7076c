//! Random giveaway draws among role holders.

use rand::{seq::IndexedRandom, Rng};

use crate::{error::AppError, model::member::GuildMember};

/// Draws up to `winners` distinct non-bot members holding `role_id`.
///
/// # Returns
/// - `Ok(Vec<u64>)` - Winning user IDs, fewer than `winners` when not enough members qualify
/// - `Err(AppError::BadRequest)` - `winners` is zero or nobody holds the role
pub fn draw<R: Rng + ?Sized>(
    rng: &mut R,
    members: &[GuildMember],
    role_id: u64,
    winners: usize,
) -> Result<Vec<u64>, AppError> {
    if winners == 0 {
        return Err(AppError::BadRequest(
            "The number of winners must be at least 1".to_string(),
        ));
    }

    let eligible: Vec<u64> = members
        .iter()
        .filter(|m| !m.bot && m.holds(role_id))
        .map(|m| m.user_id)
        .collect();

    if eligible.is_empty() {
        return Err(AppError::BadRequest(format!(
            "No members with the <@&{}> role",
            role_id
        )));
    }

    Ok(eligible.choose_multiple(rng, winners).copied().collect())
}

pub fn format_winners(role_id: u64, eligible: usize, winners: &[u64]) -> String {
    let mentions: Vec<String> = winners.iter().map(|id| format!("<@{}>", id)).collect();

    format!(
        ":tada: Drew {} of {} members with <@&{}>:\n{}",
        winners.len(),
        eligible,
        role_id,
        mentions.join("\n")
    )
}

/// Number of non-bot members holding `role_id`.
pub fn eligible_count(members: &[GuildMember], role_id: u64) -> usize {
    members.iter().filter(|m| !m.bot && m.holds(role_id)).count()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn members() -> Vec<GuildMember> {
        (1..=10)
            .map(|user_id| GuildMember {
                user_id,
                bot: user_id == 1,
                joined_at: None,
                roles: if user_id % 2 == 1 { vec![7] } else { vec![] },
            })
            .collect()
    }

    #[test]
    fn draws_distinct_eligible_members() {
        let mut rng = StdRng::seed_from_u64(42);

        let winners = draw(&mut rng, &members(), 7, 3).unwrap();

        assert_eq!(winners.len(), 3);
        assert_eq!(winners.iter().collect::<HashSet<_>>().len(), 3);
        assert!(winners.iter().all(|id| id % 2 == 1 && *id != 1));
    }

    #[test]
    fn caps_at_eligible_members() {
        let mut rng = StdRng::seed_from_u64(1);

        let winners = draw(&mut rng, &members(), 7, 100).unwrap();

        assert_eq!(winners.len(), eligible_count(&members(), 7));
        assert_eq!(winners.len(), 4);
    }

    #[test]
    fn rejects_empty_draws() {
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(draw(&mut rng, &members(), 7, 0), Err(AppError::BadRequest(_))));
        assert!(matches!(draw(&mut rng, &members(), 99, 1), Err(AppError::BadRequest(_))));
    }
}
