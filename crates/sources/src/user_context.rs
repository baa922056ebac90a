//! Helper functions to build UserContext from a stored profile table
//!
//! The filters only need the set of titles the profile has already rated,
//! so it is gathered once up front rather than rescanned per candidate.

use crate::types::UserContext;
use anyhow::{Result, anyhow};
use data_loader::types::ORIGINAL_TITLE;
use data_loader::{ProfileId, Table};

/// Build a UserContext from the profile's encoded table
///
/// Every non-missing "Original Title" counts as rated, including rows that
/// were incomplete for the neighbour search.
pub fn build_user_context(profile_id: ProfileId, profile: &Table) -> Result<UserContext> {
    let titles = profile
        .text_column(ORIGINAL_TITLE)
        .ok_or_else(|| anyhow!("Profile {} has no '{}' column", profile_id, ORIGINAL_TITLE))?;

    let mut context = UserContext::new(profile_id);
    context.rated_titles = titles.into_iter().flatten().map(str::to_string).collect();

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile() -> Table {
        Table::new(
            vec!["Your Rating".to_string(), "Original Title".to_string()],
            vec![
                vec!["9".to_string(), "Heat".to_string()],
                vec!["".to_string(), "Ronin".to_string()],
                vec!["7".to_string(), "".to_string()],
                vec!["8".to_string(), "Heat".to_string()],
            ],
        )
    }

    #[test]
    fn test_build_user_context_collects_titles() {
        let context = build_user_context(ProfileId::default(), &create_test_profile()).unwrap();

        assert_eq!(context.profile_id.as_str(), "default");
        assert_eq!(context.rated_titles.len(), 2);
        assert!(context.has_rated("Heat"));
        assert!(context.has_rated("Ronin"));
        assert!(!context.has_rated("heat"));
    }

    #[test]
    fn test_profile_without_titles() {
        let profile = Table::new(vec!["Your Rating".to_string()], vec![]);
        assert!(build_user_context(ProfileId::default(), &profile).is_err());
    }
}
