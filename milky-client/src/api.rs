//! Generated API methods of [`MilkyClient`].
//!
//! This file is generated by `milky-gen-client` from `openapi.json`.
//! Do not edit it by hand.

#![allow(unused_imports)]
#![allow(clippy::too_many_arguments)]

use serde_json::{Value, json};

use crate::{ClientError, MessageContent, MilkyClient};

impl MilkyClient {
    /// Get login information
    ///
    /// # Returns
    /// An object with the following fields:
    /// * `uin` (`int64`) - QQ number
    /// * `nickname` (`text`) - Nickname
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the API reports a failure.
    pub async fn get_login_info(&self) -> Result<Value, ClientError> {
        self.call("get_login_info", json!({})).await
    }

    /// Get a user profile
    ///
    /// # Arguments
    /// * `user_id` - User QQ number
    ///
    /// # Returns
    /// An object with the following fields:
    /// * `nickname` (`text`) - Nickname
    /// * `sex` (`Sex`) - Sex ("male" | "female" | "unknown")
    /// * `age` (`int64`) - Age
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the API reports a failure.
    pub async fn get_user_profile(
        &self,
        user_id: i64,
    ) -> Result<Value, ClientError> {
        self.call(
            "get_user_profile",
            json!({
                "user_id": user_id,
            }),
        )
        .await
    }

    /// Get the friend list
    ///
    /// # Arguments
    /// * `no_cache` - Whether to bypass the cache (default: `false`)
    ///
    /// # Returns
    /// An object with the following fields:
    /// * `friends` (`sequence<FriendEntity>`) - Friend list
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the API reports a failure.
    pub async fn get_friend_list(
        &self,
        no_cache: Option<bool>,
    ) -> Result<Value, ClientError> {
        let no_cache = no_cache.unwrap_or(false);
        self.call(
            "get_friend_list",
            json!({
                "no_cache": no_cache,
            }),
        )
        .await
    }

    /// Send a private message
    ///
    /// # Arguments
    /// * `user_id` - Friend QQ number
    /// * `message` - Message content
    ///
    /// # Returns
    /// An object with the following fields:
    /// * `message_seq` (`int64`) - Message sequence number
    /// * `time` (`int64`) - Send time
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the API reports a failure.
    pub async fn send_private_message(
        &self,
        user_id: i64,
        message: impl Into<MessageContent>,
    ) -> Result<Value, ClientError> {
        let message = Into::<MessageContent>::into(message).into_segments();
        self.call(
            "send_private_message",
            json!({
                "user_id": user_id,
                "message": message,
            }),
        )
        .await
    }

    /// Send a group message
    ///
    /// # Arguments
    /// * `group_id` - Group number
    /// * `message` - Message content
    ///
    /// # Returns
    /// An object with the following fields:
    /// * `message_seq` (`int64`) - Message sequence number
    /// * `time` (`int64`) - Send time
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the API reports a failure.
    pub async fn send_group_message(
        &self,
        group_id: i64,
        message: impl Into<MessageContent>,
    ) -> Result<Value, ClientError> {
        let message = Into::<MessageContent>::into(message).into_segments();
        self.call(
            "send_group_message",
            json!({
                "group_id": group_id,
                "message": message,
            }),
        )
        .await
    }

    /// Recall a group message
    ///
    /// # Arguments
    /// * `group_id` - Group number
    /// * `message_seq` - Message sequence number
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the API reports a failure.
    pub async fn recall_group_message(
        &self,
        group_id: i64,
        message_seq: i64,
    ) -> Result<Value, ClientError> {
        self.call(
            "recall_group_message",
            json!({
                "group_id": group_id,
                "message_seq": message_seq,
            }),
        )
        .await
    }

    /// Get history messages
    ///
    /// # Arguments
    /// * `message_scene` - Message scene ("friend" | "group" | "temp")
    /// * `peer_id` - Friend QQ number or group number
    /// * `start_message_seq` - First message sequence number, newest when absent
    /// * `limit` - Number of messages (default: `20`)
    ///
    /// # Returns
    /// An object with the following fields:
    /// * `messages` (`sequence<IncomingMessage>`) - Messages
    /// * `next_message_seq` (`int64`) - Sequence number to continue from
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the API reports a failure.
    pub async fn get_history_messages(
        &self,
        message_scene: &str,
        peer_id: i64,
        start_message_seq: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Value, ClientError> {
        let limit = limit.unwrap_or(20);
        self.call(
            "get_history_messages",
            json!({
                "message_scene": message_scene,
                "peer_id": peer_id,
                "start_message_seq": start_message_seq,
                "limit": limit,
            }),
        )
        .await
    }
}
