//! Episode placeholders in source-media filename templates.

use std::collections::HashMap;

use subseek_core::SeasonEpisode;

/// Substitution context for source-media paths.
///
/// Understands `{season}`, `{episode}` and their zero-padded forms
/// `{season:02}` and `{episode:02}`.
///
/// ```
/// use subseek_av::EpisodeTemplate;
/// use subseek_core::SeasonEpisode;
///
/// let t = EpisodeTemplate::new(SeasonEpisode::new(1, 5));
/// assert_eq!(t.substitute("S{season:02}.{episode:02}.mkv"), "S01.05.mkv");
/// assert_eq!(t.substitute("season-{season}/ep{episode}.mp3"), "season-1/ep5.mp3");
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeTemplate {
    vars: HashMap<&'static str, String>,
}

impl EpisodeTemplate {
    pub fn new(tag: SeasonEpisode) -> Self {
        let mut vars = HashMap::new();
        vars.insert("season", tag.season.to_string());
        vars.insert("season:02", format!("{:02}", tag.season));
        vars.insert("episode", tag.episode.to_string());
        vars.insert("episode:02", format!("{:02}", tag.episode));
        Self { vars }
    }

    /// Replace every known `{name}` in `template`. Unknown placeholders are
    /// left untouched.
    pub fn substitute(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.vars {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }

    pub fn substitute_all(&self, templates: &[String]) -> Vec<String> {
        templates.iter().map(|t| self.substitute(t)).collect()
    }
}
