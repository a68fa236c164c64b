//! Offset pagination for the user leaderboards.

use serde::Serialize;

use crate::db::models::User;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaderboardMetric {
  MatchesPlayed,
  NumberOneResults,
  Playtime,
}

impl LeaderboardMetric {
  /// Parses the metric segment of `/leaderboard/{metric}/{page}`.
  pub fn from_path(segment: &str) -> Option<Self> {
    match segment {
      "matches" => Some(Self::MatchesPlayed),
      "wins" => Some(Self::NumberOneResults),
      "playtime" => Some(Self::Playtime),
      _ => None,
    }
  }

  /// Column of the `Users` table this metric orders by.
  pub fn column(self) -> &'static str {
    match self {
      Self::MatchesPlayed => "MatchesPlayed",
      Self::NumberOneResults => "NumberOneResults",
      Self::Playtime => "Playtime",
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
  /// 0-indexed
  pub page: u32,
  pub page_size: u32,
}

impl PageRequest {
  pub fn new(page: u32, page_size: u32) -> Self { PageRequest { page, page_size } }

  pub fn offset(&self) -> u64 { self.page as u64 * self.page_size as u64 }

  /// Absolute 1-based leaderboard position of the row at `row_ix` within this page.
  pub fn position(&self, row_ix: usize) -> u64 { self.offset() + row_ix as u64 + 1 }
}

/// Paging controls.  These only depend on the page number, so they are produced even when the
/// page turns out to be empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
  pub previous: Option<u32>,
  /// Shortcut back to the first page, offered once it is no longer adjacent.
  pub first: Option<u32>,
  pub current: u32,
  pub next: Option<u32>,
}

impl PageLinks {
  pub fn for_page(page: u32) -> Self {
    PageLinks {
      previous: page.checked_sub(1),
      first: (page > 1).then_some(0),
      current: page,
      next: page.checked_add(1),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
  pub position: u64,
  pub id: i64,
  pub name: String,
  pub matches_played: i64,
  pub number_one_results: i64,
  pub playtime: i64,
}

pub fn build_entries(page: PageRequest, users: Vec<User>) -> Vec<LeaderboardEntry> {
  users
    .into_iter()
    .enumerate()
    .map(|(ix, user)| LeaderboardEntry {
      position: page.position(ix),
      id: user.id,
      name: user.name,
      matches_played: user.matches_played,
      number_one_results: user.number_one_results,
      playtime: user.playtime,
    })
    .collect()
}
