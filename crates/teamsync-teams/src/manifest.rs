/// The persisted team manifest (`teams.yaml`)
use crate::document::YamlDocument;
use crate::error::{Result, TeamError};
use serde_yaml::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use teamsync_github::Login;

/// Team slug to desired members
pub type TeamMap = BTreeMap<String, BTreeSet<Login>>;

pub const TEAMS_KEY: &str = "teams";
pub const INVITE_SENT_KEY: &str = "invite_sent";

/// Written above `invite_sent` on every save
pub const INVITE_SENT_COMMENT: &str =
    "# AUTOMATICALLY UPDATED \u{2014} DO NOT EDIT THIS SECTION MANUALLY";

const SHAPE_HINT: &str = "teams.yaml must contain a mapping 'teams: {team_slug: [user, ...]}'";

/// Desired team membership plus the derived invite-status cache
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub teams: TeamMap,
    /// Desired logins with a pending invitation that are not org members yet
    pub invite_sent: BTreeSet<Login>,
    /// Other top-level keys, carried through untouched
    pub extra: BTreeMap<String, Value>,
}

impl Manifest {
    /// Parse a manifest, requiring `teams` to be a mapping
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_text(text, true)
    }

    /// Parse a manifest, treating a missing or malformed `teams` as empty
    pub fn parse_lenient(text: &str) -> Result<Self> {
        Self::from_text(text, false)
    }

    /// Read and parse a manifest, returning it with the original text
    pub fn load(path: &Path) -> Result<(Self, String)> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TeamError::InvalidManifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        let manifest = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), teams = manifest.teams.len(), "Loaded manifest");
        Ok((manifest, text))
    }

    /// Like [`Manifest::load`], but a missing file yields an empty manifest
    pub fn load_or_default(path: &Path) -> Result<(Self, Option<String>)> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok((Self::parse_lenient(&text)?, Some(text))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No previous manifest, starting empty");
                Ok((Self::default(), None))
            }
            Err(e) => Err(TeamError::IoError(e)),
        }
    }

    /// Union of every team's desired members
    pub fn desired_all(&self) -> BTreeSet<Login> {
        self.teams.values().flatten().cloned().collect()
    }

    /// Replace the invite-status cache
    pub fn set_invite_sent(&mut self, invite_sent: BTreeSet<Login>) {
        self.invite_sent = invite_sent;
    }

    /// Serialize with sorted keys and the warning comment above `invite_sent`
    pub fn render(&self) -> Result<String> {
        let mut doc = YamlDocument::new();
        for (key, value) in &self.extra {
            doc.insert(key.clone(), value.clone());
        }

        let teams = self
            .teams
            .iter()
            .map(|(slug, members)| (Value::String(slug.clone()), logins_value(members)))
            .collect();
        doc.insert(TEAMS_KEY, Value::Mapping(teams));
        doc.insert(INVITE_SENT_KEY, logins_value(&self.invite_sent));
        doc.set_leading_comment(INVITE_SENT_KEY, INVITE_SENT_COMMENT);

        doc.render()
    }

    fn from_text(text: &str, strict: bool) -> Result<Self> {
        let root: Value = serde_yaml::from_str(text)?;
        let mapping = match root {
            Value::Mapping(mapping) => mapping,
            Value::Null if !strict => return Ok(Self::default()),
            _ => return Err(TeamError::InvalidManifest(SHAPE_HINT.to_string())),
        };

        let mut manifest = Self::default();
        let mut saw_teams = false;
        for (key, value) in mapping {
            let key = match key {
                Value::String(key) => key,
                other => {
                    return Err(TeamError::InvalidManifest(format!(
                        "top-level keys must be strings, found {other:?}"
                    )))
                }
            };
            match key.as_str() {
                TEAMS_KEY => match value {
                    Value::Mapping(teams) => {
                        saw_teams = true;
                        manifest.teams = parse_teams(teams)?;
                    }
                    _ if strict => return Err(TeamError::InvalidManifest(SHAPE_HINT.to_string())),
                    _ => {}
                },
                INVITE_SENT_KEY => {
                    manifest.invite_sent = normalize_logins(&value).into_iter().collect();
                }
                _ => {
                    manifest.extra.insert(key, value);
                }
            }
        }

        if strict && !saw_teams {
            return Err(TeamError::InvalidManifest(SHAPE_HINT.to_string()));
        }
        Ok(manifest)
    }
}

fn parse_teams(teams: serde_yaml::Mapping) -> Result<TeamMap> {
    let mut out = TeamMap::new();
    for (slug, users) in teams {
        let slug = match slug {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(TeamError::InvalidManifest(format!(
                    "team slug must be a string, found {other:?}"
                )))
            }
        };
        if !matches!(users, Value::Null | Value::Sequence(_)) {
            return Err(TeamError::InvalidManifest(format!(
                "team '{slug}' must map to a list of users"
            )));
        }
        out.insert(slug, normalize_logins(&users).into_iter().collect());
    }
    Ok(out)
}

/// Keep trimmed, non-empty string entries of a list; anything else is ignored
pub fn normalize_logins(value: &Value) -> Vec<Login> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn logins_value(logins: &BTreeSet<Login>) -> Value {
    Value::Sequence(logins.iter().cloned().map(Value::String).collect())
}

/// Write `new_text` unless it matches what was read; returns whether it wrote
pub fn write_if_changed(path: &Path, old_text: Option<&str>, new_text: &str) -> Result<bool> {
    if old_text == Some(new_text) {
        tracing::info!(path = %path.display(), "No changes to manifest needed");
        return Ok(false);
    }
    std::fs::write(path, new_text)?;
    tracing::info!(path = %path.display(), "Manifest updated");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<Login> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_normalizes_entries() {
        let text = "teams:\n  core:\n  - ' alice '\n  - ''\n  - 42\n  - bob\n  - bob\n  empty:\n";
        let manifest = Manifest::parse(text).unwrap();

        assert_eq!(manifest.teams["core"], set(&["alice", "bob"]));
        assert!(manifest.teams["empty"].is_empty());
        assert!(manifest.invite_sent.is_empty());
    }

    #[test]
    fn test_parse_requires_teams_mapping() {
        assert!(matches!(
            Manifest::parse("teams: [a, b]\n"),
            Err(TeamError::InvalidManifest(_))
        ));
        assert!(matches!(
            Manifest::parse("other: 1\n"),
            Err(TeamError::InvalidManifest(_))
        ));
        assert!(matches!(Manifest::parse(""), Err(TeamError::InvalidManifest(_))));
    }

    #[test]
    fn test_lenient_parse_tolerates_bad_shape() {
        let manifest = Manifest::parse_lenient("teams: nope\n").unwrap();
        assert!(manifest.teams.is_empty());
        assert_eq!(Manifest::parse_lenient("").unwrap(), Manifest::default());
    }

    #[test]
    fn test_render_places_comment_before_invite_sent() {
        let mut manifest = Manifest::default();
        manifest.teams.insert("core".to_string(), set(&["bob", "alice"]));
        manifest.set_invite_sent(set(&["charlie"]));

        let text = manifest.render().unwrap();
        assert!(text.starts_with(&format!("{INVITE_SENT_COMMENT}\ninvite_sent:")));
        assert!(text.contains("teams:"));
        assert_eq!(text.matches(INVITE_SENT_COMMENT).count(), 1);
    }

    #[test]
    fn test_render_is_a_fixed_point() {
        let text = "zzz:\n  keep: true\nteams:\n  web:\n  - carol\n  core:\n  - bob\n  - alice\ninvite_sent:\n- dave\n";
        let first = Manifest::parse(text).unwrap().render().unwrap();
        let second = Manifest::parse(&first).unwrap().render().unwrap();

        assert_eq!(first, second);
        let reparsed = Manifest::parse(&first).unwrap();
        assert_eq!(reparsed.teams["core"], set(&["alice", "bob"]));
        assert_eq!(reparsed.invite_sent, set(&["dave"]));
        assert!(reparsed.extra.contains_key("zzz"));
    }

    #[test]
    fn test_boolean_like_logins_stay_quoted() {
        let text = "teams:\n  core:\n  - alice\n  - 'yes'\n  'on':\n  - 'off'\n";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(manifest.teams["core"], set(&["alice", "yes"]));
        assert_eq!(manifest.teams["on"], set(&["off"]));

        let rendered = manifest.render().unwrap();
        assert!(rendered.contains("  - 'yes'\n"));
        assert!(rendered.contains("  'on':\n  - 'off'\n"));
        assert_eq!(Manifest::parse(&rendered).unwrap().render().unwrap(), rendered);
    }

    #[test]
    fn test_desired_all_is_union() {
        let mut manifest = Manifest::default();
        manifest.teams.insert("a".to_string(), set(&["x", "y"]));
        manifest.teams.insert("b".to_string(), set(&["y", "z"]));
        assert_eq!(manifest.desired_all(), set(&["x", "y", "z"]));
    }

    #[test]
    fn test_write_if_changed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teams.yaml");

        assert!(write_if_changed(&path, None, "teams: {}\n").unwrap());
        assert!(!write_if_changed(&path, Some("teams: {}\n"), "teams: {}\n").unwrap());
        assert!(write_if_changed(&path, Some("teams: {}\n"), "teams:\n  a: []\n").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "teams:\n  a: []\n");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, text) = Manifest::load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(manifest, Manifest::default());
        assert!(text.is_none());
    }
}
