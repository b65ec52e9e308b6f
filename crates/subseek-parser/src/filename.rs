//! Season/episode detection from subtitle file names.

use once_cell::sync::Lazy;
use regex::Regex;
use subseek_core::SeasonEpisode;

static SEASON_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"S(\d+)E(\d+)").expect("season/episode pattern is valid"));

/// Find the first `S<digits>E<digits>` tag anywhere in `name`.
///
/// Matching is case-sensitive. `None` means the file carries no usable tag
/// and should be skipped by the indexer.
///
/// ```
/// use subseek_parser::parse_season_episode;
///
/// let se = parse_season_episode("小谢尔顿.S02E13.chs&eng.ass").unwrap();
/// assert_eq!((se.season, se.episode), (2, 13));
/// assert!(parse_season_episode("s02e13.ass").is_none());
/// ```
pub fn parse_season_episode(name: &str) -> Option<SeasonEpisode> {
    let caps = SEASON_EPISODE_RE.captures(name)?;
    let season = caps[1].parse().ok()?;
    let episode = caps[2].parse().ok()?;
    Some(SeasonEpisode::new(season, episode))
}
