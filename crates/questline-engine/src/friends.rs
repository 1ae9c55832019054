//! Friend graph edits: request delivery, acceptance, rejection, and
//! removal.
//!
//! These are pure set/list edits on the local player's record. Delivering
//! a request to the other player's inbox, and mirroring the symmetric
//! friendship edge onto their snapshot, are the host's responsibility --
//! [`accept_request`] hands back the accepted request so the host can do
//! exactly that.

use questline_types::{FriendRequest, Player};
use tracing::debug;

/// Deliver a friend request to `player`'s inbox.
///
/// Skipped silently when a request from the same sender is already
/// pending, or the sender is already a confirmed friend. Returns the
/// updated player.
pub fn send_request(player: &Player, request: FriendRequest) -> Player {
    let mut player = player.clone();
    if player.is_friend(&request.from_username)
        || player.has_pending_request_from(&request.from_username)
    {
        return player;
    }
    debug!(from = %request.from_username, to = %player.username, "Friend request delivered");
    player.friend_requests.push(request);
    player
}

/// Accept the pending request from `from_username`.
///
/// Removes the request and adds the sender to `friends`. The removed
/// request is returned so the host can mirror the symmetric edge onto the
/// sender's snapshot. When no such request is pending the player is
/// returned unchanged with `None`.
pub fn accept_request(player: &Player, from_username: &str) -> (Player, Option<FriendRequest>) {
    let mut player = player.clone();
    let Some(position) = player
        .friend_requests
        .iter()
        .position(|req| req.from_username == from_username)
    else {
        return (player, None);
    };

    let request = player.friend_requests.remove(position);
    player.friends.insert(request.from_username.clone());
    debug!(friend = %request.from_username, player = %player.username, "Friend request accepted");
    (player, Some(request))
}

/// Reject the pending request from `from_username`.
///
/// The request is removed with no friendship edge. Unknown senders are a
/// no-op.
pub fn reject_request(player: &Player, from_username: &str) -> Player {
    let mut player = player.clone();
    player
        .friend_requests
        .retain(|req| req.from_username != from_username);
    player
}

/// Remove `username` from the player's friend set.
///
/// Deletes the local edge only: pending requests are untouched, and the
/// reciprocal edge on the other player's snapshot is the host's to remove.
pub fn remove_friend(player: &Player, username: &str) -> Player {
    let mut player = player.clone();
    player.friends.remove(username);
    player
}
