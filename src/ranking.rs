//! Competition ranking of users across their cumulative metrics.
//!
//! Ranks follow SQL `RANK()` semantics: users with equal values share a rank and the next distinct
//! value skips ahead by the size of the tie group (10, 10, 5 ranks as 1, 1, 3).

use std::cmp::Ordering;

use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::db::models::{User, UserMetrics};

/// A user's position across the whole population for each metric.  1 is the highest value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRanks {
  pub matches_played: i64,
  pub number_one_results: i64,
  pub playtime: i64,
}

/// Number of a user's scores that landed on a given placement rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct RankCount {
  pub rank: i64,
  pub count: i64,
}

/// Assigns every item its competition rank when ordered by `key` descending.
///
/// The returned vector is parallel to `items`.
pub fn competition_ranks<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<i64> {
  let mut order: Vec<usize> = (0..items.len()).collect();
  order.sort_by(|&a, &b| key(&items[b]).cmp(&key(&items[a])));

  let mut ranks = vec![0; items.len()];
  let mut prev: Option<(K, i64)> = None;
  for (pos, &ix) in order.iter().enumerate() {
    let value = key(&items[ix]);
    let rank = match &prev {
      Some((prev_value, prev_rank)) if prev_value.cmp(&value) == Ordering::Equal => *prev_rank,
      _ => pos as i64 + 1,
    };
    ranks[ix] = rank;
    prev = Some((value, rank));
  }
  ranks
}

/// Ranks `user_id` against everyone in `snapshot`.  Returns `None` if the user isn't part of it.
pub fn rank_user(snapshot: &[UserMetrics], user_id: i64) -> Option<UserRanks> {
  let ix = snapshot.iter().position(|u| u.id == user_id)?;

  let matches_played = competition_ranks(snapshot, |u| u.matches_played);
  let number_one_results = competition_ranks(snapshot, |u| u.number_one_results);
  let playtime = competition_ranks(snapshot, |u| u.playtime);

  Some(UserRanks {
    matches_played: matches_played[ix],
    number_one_results: number_one_results[ix],
    playtime: playtime[ix],
  })
}

/// Fraction of matches the user won.  `None` for users that haven't played any matches yet.
pub fn number_one_rate(user: &User) -> Option<f64> {
  if user.matches_played <= 0 {
    return None;
  }
  Some(user.number_one_results as f64 / user.matches_played as f64)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn metrics(id: i64, matches_played: i64, number_one_results: i64, playtime: i64) -> UserMetrics {
    UserMetrics {
      id,
      matches_played,
      number_one_results,
      playtime,
    }
  }

  #[test]
  fn ties_share_a_rank_and_skip_ahead() {
    let ranks = competition_ranks(&[10, 10, 5], |v| *v);
    assert_eq!(ranks, vec![1, 1, 3]);
  }

  #[test]
  fn ranks_stay_parallel_to_unsorted_input() {
    let ranks = competition_ranks(&[3, 9, 3, 1, 9, 9], |v| *v);
    assert_eq!(ranks, vec![4, 1, 4, 6, 1, 1]);
  }

  #[test]
  fn empty_input() {
    let ranks = competition_ranks(&[] as &[i64], |v| *v);
    assert!(ranks.is_empty());
  }

  #[test]
  fn tie_group_size_determines_next_rank() {
    let values = [7, 7, 7, 7, 2, 2, 1];
    let ranks = competition_ranks(&values, |v| *v);
    assert_eq!(ranks, vec![1, 1, 1, 1, 5, 5, 7]);
  }

  #[test]
  fn ranks_each_metric_independently() {
    let snapshot = vec![
      metrics(1, 10, 0, 500),
      metrics(2, 10, 4, 100),
      metrics(3, 5, 4, 900),
    ];

    assert_eq!(
      rank_user(&snapshot, 1),
      Some(UserRanks {
        matches_played: 1,
        number_one_results: 3,
        playtime: 2,
      })
    );
    assert_eq!(
      rank_user(&snapshot, 3),
      Some(UserRanks {
        matches_played: 3,
        number_one_results: 1,
        playtime: 1,
      })
    );
  }

  #[test]
  fn unknown_user_is_unranked() {
    let snapshot = vec![metrics(1, 1, 1, 1)];
    assert_eq!(rank_user(&snapshot, 2), None);
  }

  #[test]
  fn number_one_rate_tolerates_zero_matches() {
    let mut user = User {
      id: 1,
      user_id: None,
      name: "a".to_owned(),
      playtime: 0,
      matches_played: 0,
      number_one_results: 0,
      administrator: false,
      auto_skip_enabled: false,
    };
    assert_eq!(number_one_rate(&user), None);

    user.matches_played = 8;
    user.number_one_results = 2;
    assert_eq!(number_one_rate(&user), Some(0.25));
  }
}
