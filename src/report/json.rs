//! Structured JSON record of an analysis.

use chrono::SecondsFormat;
use serde::Serialize;

use super::{RenderError, ReportPayload, ReportSection};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    timestamp: String,
    username: &'a str,
    partial: bool,
    stats: JsonStats,
    not_following_back: Vec<JsonUser<'a>>,
    you_dont_follow_back: Vec<JsonUser<'a>>,
    mutual_follows: Vec<JsonUser<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonStats {
    total_followers: usize,
    total_following: usize,
    not_following_back: usize,
    you_dont_follow_back: usize,
    mutual_follows: usize,
}

#[derive(Debug, Serialize)]
struct JsonUser<'a> {
    username: &'a str,
    profile: &'a str,
    avatar: &'a str,
}

fn users(section: &ReportSection) -> Vec<JsonUser<'_>> {
    section
        .entities
        .iter()
        .map(|e| JsonUser {
            username: &e.handle,
            profile: &e.profile_url,
            avatar: &e.avatar_url,
        })
        .collect()
}

/// Renders the payload as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if serialization fails.
pub fn render_json(payload: &ReportPayload) -> Result<String, RenderError> {
    let report = JsonReport {
        timestamp: payload
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        username: &payload.account,
        partial: payload.partial,
        stats: JsonStats {
            total_followers: payload.stats.followers,
            total_following: payload.stats.following,
            not_following_back: payload.stats.one_way_out,
            you_dont_follow_back: payload.stats.one_way_in,
            mutual_follows: payload.stats.mutual,
        },
        not_following_back: users(&payload.one_way_out),
        you_dont_follow_back: users(&payload.one_way_in),
        mutual_follows: users(&payload.mutual),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::tests::sample_payload;

    #[test]
    fn test_json_shape() {
        let rendered = render_json(&sample_payload()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["username"], "octocat");
        assert_eq!(value["timestamp"], "2024-05-17T09:30:15.000Z");
        assert_eq!(value["partial"], false);
        assert_eq!(value["stats"]["totalFollowers"], 3);
        assert_eq!(value["stats"]["totalFollowing"], 3);
        assert_eq!(value["stats"]["mutualFollows"], 2);
        assert_eq!(value["stats"]["notFollowingBack"], 1);
        assert_eq!(value["stats"]["youDontFollowBack"], 1);
        assert_eq!(value["notFollowingBack"][0]["username"], "d");
        assert_eq!(
            value["notFollowingBack"][0]["profile"],
            "https://github.com/d"
        );
        assert_eq!(
            value["youDontFollowBack"][0]["avatar"],
            "https://avatars.example/a.png"
        );
        assert_eq!(value["mutualFollows"].as_array().unwrap().len(), 2);
    }
}
