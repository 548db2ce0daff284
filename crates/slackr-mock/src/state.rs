use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use uuid::Uuid;

use slackr_types::api::UpdateProfileRequest;
use slackr_types::models::{
    Channel, ChannelId, ChannelSummary, Message, MessageId, React, User, UserId, UserSummary,
};

/// Messages per page, matching the real backend.
pub const PAGE_SIZE: usize = 25;

/// Error answered as `{error}` with the given status.
#[derive(Debug)]
pub struct Rejection {
    pub status: u16,
    pub message: String,
}

impl Rejection {
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: 400,
            message: message.to_string(),
        }
    }

    pub fn forbidden(message: &str) -> Self {
        Self {
            status: 403,
            message: message.to_string(),
        }
    }
}

pub type Outcome<T> = std::result::Result<T, Rejection>;

pub struct StoredUser {
    pub password: String,
    pub profile: User,
}

pub struct StoredChannel {
    pub info: Channel,
    /// Oldest first.
    pub messages: Vec<Message>,
}

#[derive(Default)]
pub struct Store {
    pub requests: usize,
    pub users: BTreeMap<UserId, StoredUser>,
    pub tokens: HashMap<String, UserId>,
    pub channels: BTreeMap<ChannelId, StoredChannel>,
    pub failing_channels: HashSet<ChannelId>,
    next_id: u64,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // -- Auth --

    pub fn create_user(&mut self, email: &str, password: &str, name: &str) -> UserId {
        let id = self.next_id();
        self.users.insert(
            id,
            StoredUser {
                password: password.to_string(),
                profile: User {
                    id,
                    email: email.to_string(),
                    name: name.to_string(),
                    bio: None,
                    image: None,
                },
            },
        );
        id
    }

    pub fn issue_token(&mut self, user_id: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Outcome<(String, UserId)> {
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(Rejection::bad_request("Invalid input"));
        }
        if self.users.values().any(|user| user.profile.email == email) {
            return Err(Rejection::bad_request("Email address already registered"));
        }
        let user_id = self.create_user(email, password, name);
        Ok((self.issue_token(user_id), user_id))
    }

    pub fn login(&mut self, email: &str, password: &str) -> Outcome<(String, UserId)> {
        let user_id = self
            .users
            .iter()
            .find(|(_, user)| user.profile.email == email && user.password == password)
            .map(|(id, _)| *id)
            .ok_or_else(|| Rejection::bad_request("Invalid email or password"))?;
        Ok((self.issue_token(user_id), user_id))
    }

    pub fn authenticate(&self, token: Option<&str>) -> Outcome<UserId> {
        token
            .and_then(|token| self.tokens.get(token))
            .copied()
            .ok_or_else(|| Rejection::forbidden("Invalid token"))
    }

    pub fn logout(&mut self, token: &str) {
        self.tokens.remove(token);
    }

    // -- Channels --

    pub fn create_channel(
        &mut self,
        creator: UserId,
        name: &str,
        description: &str,
        private: bool,
    ) -> ChannelId {
        let id = self.next_id();
        self.channels.insert(
            id,
            StoredChannel {
                info: Channel {
                    id,
                    name: name.to_string(),
                    creator,
                    description: description.to_string(),
                    private,
                    created_at: Utc::now(),
                    members: vec![creator],
                },
                messages: Vec::new(),
            },
        );
        id
    }

    pub fn summaries(&self) -> Vec<ChannelSummary> {
        self.channels
            .values()
            .map(|channel| ChannelSummary {
                id: channel.info.id,
                name: channel.info.name.clone(),
                creator: channel.info.creator,
                private: channel.info.private,
                members: channel.info.members.clone(),
            })
            .collect()
    }

    pub fn channel(&self, channel_id: ChannelId) -> Outcome<&StoredChannel> {
        self.channels
            .get(&channel_id)
            .ok_or_else(|| Rejection::bad_request("Invalid channel ID"))
    }

    fn channel_mut(&mut self, channel_id: ChannelId) -> Outcome<&mut StoredChannel> {
        self.channels
            .get_mut(&channel_id)
            .ok_or_else(|| Rejection::bad_request("Invalid channel ID"))
    }

    pub fn member_channel(&self, channel_id: ChannelId, user_id: UserId) -> Outcome<&StoredChannel> {
        let channel = self.channel(channel_id)?;
        if !channel.info.members.contains(&user_id) {
            return Err(Rejection::forbidden(
                "Authorised user is not a member of this channel",
            ));
        }
        Ok(channel)
    }

    fn member_channel_mut(
        &mut self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Outcome<&mut StoredChannel> {
        let channel = self.channel_mut(channel_id)?;
        if !channel.info.members.contains(&user_id) {
            return Err(Rejection::forbidden(
                "Authorised user is not a member of this channel",
            ));
        }
        Ok(channel)
    }

    pub fn update_channel(
        &mut self,
        channel_id: ChannelId,
        user_id: UserId,
        name: &str,
        description: &str,
    ) -> Outcome<()> {
        let channel = self.member_channel_mut(channel_id, user_id)?;
        channel.info.name = name.to_string();
        channel.info.description = description.to_string();
        Ok(())
    }

    pub fn join(&mut self, channel_id: ChannelId, user_id: UserId) -> Outcome<()> {
        let channel = self.channel_mut(channel_id)?;
        if channel.info.members.contains(&user_id) {
            return Err(Rejection::bad_request(
                "Authorised user is already a member of this channel",
            ));
        }
        if channel.info.private && channel.info.creator != user_id {
            return Err(Rejection::forbidden("You cannot join a private channel"));
        }
        channel.info.members.push(user_id);
        Ok(())
    }

    pub fn leave(&mut self, channel_id: ChannelId, user_id: UserId) -> Outcome<()> {
        let channel = self.member_channel_mut(channel_id, user_id)?;
        channel.info.members.retain(|member| *member != user_id);
        Ok(())
    }

    pub fn invite(&mut self, channel_id: ChannelId, user_id: UserId, invitee: UserId) -> Outcome<()> {
        if !self.users.contains_key(&invitee) {
            return Err(Rejection::bad_request("Invalid user ID"));
        }
        let channel = self.member_channel_mut(channel_id, user_id)?;
        if channel.info.members.contains(&invitee) {
            return Err(Rejection::bad_request(
                "Invited user is already a member of this channel",
            ));
        }
        channel.info.members.push(invitee);
        Ok(())
    }

    // -- Users --

    pub fn user_summaries(&self) -> Vec<UserSummary> {
        self.users
            .values()
            .map(|user| UserSummary {
                id: user.profile.id,
                email: user.profile.email.clone(),
            })
            .collect()
    }

    pub fn user(&self, user_id: UserId) -> Outcome<&User> {
        self.users
            .get(&user_id)
            .map(|user| &user.profile)
            .ok_or_else(|| Rejection::bad_request("Invalid user ID"))
    }

    pub fn update_profile(&mut self, user_id: UserId, update: UpdateProfileRequest) -> Outcome<()> {
        let taken = self
            .users
            .values()
            .any(|user| user.profile.id != user_id && user.profile.email == update.email);
        if taken {
            return Err(Rejection::bad_request("Email address already taken"));
        }
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Rejection::bad_request("Invalid user ID"))?;
        user.profile.email = update.email;
        user.profile.name = update.name;
        if update.bio.is_some() {
            user.profile.bio = update.bio;
        }
        if update.image.is_some() {
            user.profile.image = update.image;
        }
        if let Some(password) = update.password {
            user.password = password;
        }
        Ok(())
    }

    // -- Messages --

    /// Newest first, `PAGE_SIZE` at a time.
    pub fn message_page(&self, channel_id: ChannelId, user_id: UserId, start: usize) -> Outcome<Vec<Message>> {
        if self.failing_channels.contains(&channel_id) {
            return Err(Rejection {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        let channel = self.member_channel(channel_id, user_id)?;
        Ok(channel
            .messages
            .iter()
            .rev()
            .skip(start)
            .take(PAGE_SIZE)
            .cloned()
            .collect())
    }

    pub fn post_message(
        &mut self,
        channel_id: ChannelId,
        sender: UserId,
        text: Option<String>,
        image: Option<String>,
    ) -> Outcome<MessageId> {
        if text.is_none() && image.is_none() {
            return Err(Rejection::bad_request("Message must contain text or an image"));
        }
        let id = self.next_id();
        let channel = self.member_channel_mut(channel_id, sender)?;
        channel.messages.push(Message {
            id,
            message: text,
            image,
            sender,
            sent_at: Utc::now(),
            edited: false,
            edited_at: None,
            pinned: false,
            reacts: Vec::new(),
        });
        Ok(id)
    }

    fn message_mut(
        &mut self,
        channel_id: ChannelId,
        user_id: UserId,
        message_id: MessageId,
    ) -> Outcome<&mut Message> {
        self.member_channel_mut(channel_id, user_id)?
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
            .ok_or_else(|| Rejection::bad_request("Invalid message ID"))
    }

    pub fn edit_message(
        &mut self,
        channel_id: ChannelId,
        user_id: UserId,
        message_id: MessageId,
        text: Option<String>,
        image: Option<String>,
    ) -> Outcome<()> {
        let message = self.message_mut(channel_id, user_id, message_id)?;
        if message.sender != user_id {
            return Err(Rejection::forbidden("Authorised user did not send this message"));
        }
        message.message = text;
        if image.is_some() {
            message.image = image;
        }
        message.edited = true;
        message.edited_at = Some(Utc::now());
        Ok(())
    }

    pub fn delete_message(
        &mut self,
        channel_id: ChannelId,
        user_id: UserId,
        message_id: MessageId,
    ) -> Outcome<()> {
        let sender = self.message_mut(channel_id, user_id, message_id)?.sender;
        if sender != user_id {
            return Err(Rejection::forbidden("Authorised user did not send this message"));
        }
        let channel = self.channel_mut(channel_id)?;
        channel.messages.retain(|message| message.id != message_id);
        Ok(())
    }

    pub fn set_pinned(
        &mut self,
        channel_id: ChannelId,
        user_id: UserId,
        message_id: MessageId,
        pinned: bool,
    ) -> Outcome<()> {
        let message = self.message_mut(channel_id, user_id, message_id)?;
        if message.pinned == pinned {
            return Err(Rejection::bad_request(if pinned {
                "Message is already pinned"
            } else {
                "Message is not pinned"
            }));
        }
        message.pinned = pinned;
        Ok(())
    }

    pub fn set_react(
        &mut self,
        channel_id: ChannelId,
        user_id: UserId,
        message_id: MessageId,
        emoji: &str,
        add: bool,
    ) -> Outcome<()> {
        let message = self.message_mut(channel_id, user_id, message_id)?;
        let exists = message.has_reacted(user_id, emoji);
        match (add, exists) {
            (true, true) => Err(Rejection::bad_request(
                "Message already contains an active react from this user",
            )),
            (false, false) => Err(Rejection::bad_request(
                "Message does not contain an active react from this user",
            )),
            (true, false) => {
                message.reacts.push(React {
                    user: user_id,
                    react: emoji.to_string(),
                });
                Ok(())
            }
            (false, true) => {
                message
                    .reacts
                    .retain(|react| !(react.user == user_id && react.react == emoji));
                Ok(())
            }
        }
    }
}
