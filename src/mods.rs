//! Decoding of the legacy mods bitmask and placement grades stored on scores.

const MODS: [(i64, &str); 31] = [
  (1 << 0, "NoFail"),
  (1 << 1, "Easy"),
  (1 << 2, "TouchDevice"),
  (1 << 3, "Hidden"),
  (1 << 4, "HardRock"),
  (1 << 5, "SuddenDeath"),
  (1 << 6, "DoubleTime"),
  (1 << 7, "Relax"),
  (1 << 8, "HalfTime"),
  // NC is always stored together with DT's bit
  (1 << 9, "Nightcore"),
  (1 << 10, "Flashlight"),
  (1 << 11, "Autoplay"),
  (1 << 12, "SpunOut"),
  (1 << 13, "Relax2"),
  // PF is always stored together with SD's bit
  (1 << 14, "Perfect"),
  (1 << 15, "Key4"),
  (1 << 16, "Key5"),
  (1 << 17, "Key6"),
  (1 << 18, "Key7"),
  (1 << 19, "Key8"),
  (1 << 20, "FadeIn"),
  (1 << 21, "Random"),
  (1 << 22, "Cinema"),
  (1 << 23, "Target"),
  (1 << 24, "Key9"),
  (1 << 25, "KeyCoop"),
  (1 << 26, "Key1"),
  (1 << 27, "Key3"),
  (1 << 28, "Key2"),
  (1 << 29, "ScoreV2"),
  (1 << 30, "Mirror"),
];

/// Names of every mod set in `bitmap`, lowest bit first.  A bitmap of 0 (nomod) yields no names.
pub fn mod_names(bitmap: i64) -> Vec<&'static str> {
  MODS
    .iter()
    .filter(|(bit, _)| bitmap & bit != 0)
    .map(|(_, name)| *name)
    .collect()
}

/// Letter grade for the `Rank` column of a score.  The bot stores grades as 1 (F) through 7 (SS).
pub fn grade_name(rank: i64) -> &'static str {
  match rank {
    1 => "F",
    2 => "D",
    3 => "C",
    4 => "B",
    5 => "A",
    6 => "S",
    7 => "SS",
    _ => "N/A",
  }
}
