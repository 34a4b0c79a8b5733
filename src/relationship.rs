//! Relationship analysis between a followers list and a following list.
//!
//! [`analyze`] is pure: two ordered entity lists in, three ordered subsets out.
//! Membership is decided by handle only, using hash sets, so the whole pass
//! is linear in the size of both inputs.

use std::collections::HashSet;

use serde::Serialize;

use crate::api::Entity;

/// The three derived relationship lists.
///
/// - `mutual` and `one_way_out` are drawn from `following`, in its order.
/// - `one_way_in` is drawn from `followers`, in its order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Followed accounts that follow back.
    pub mutual: Vec<Entity>,
    /// Followed accounts that do not follow back.
    pub one_way_out: Vec<Entity>,
    /// Followers that are not followed back.
    pub one_way_in: Vec<Entity>,
}

/// Splits `followers` and `following` into mutual and one-way relationships.
///
/// Duplicate handles in an input survive unchanged in the matching output.
#[must_use]
pub fn analyze(followers: &[Entity], following: &[Entity]) -> AnalysisResult {
    let follower_handles: HashSet<&str> = followers.iter().map(|e| e.handle.as_str()).collect();
    let following_handles: HashSet<&str> = following.iter().map(|e| e.handle.as_str()).collect();

    let (mutual, one_way_out): (Vec<Entity>, Vec<Entity>) = following
        .iter()
        .cloned()
        .partition(|e| follower_handles.contains(e.handle.as_str()));

    let one_way_in = followers
        .iter()
        .filter(|e| !following_handles.contains(e.handle.as_str()))
        .cloned()
        .collect();

    AnalysisResult {
        mutual,
        one_way_out,
        one_way_in,
    }
}
