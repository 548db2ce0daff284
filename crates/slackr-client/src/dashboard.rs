//! Top-level wiring: login and registration, the dashboard's features, and
//! routing between them.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::{info, warn};

use slackr_types::events::ClientEvent;
use slackr_types::models::{ChannelId, ChannelSummary, MessageId};

use crate::channels::{ChannelActions, ChannelDetails, ChannelDetailsView, ChannelList};
use crate::error::{ClientError, Result};
use crate::messages::notifications::NewMessagesCallback;
use crate::messages::{BannerBoard, MessageFeed, NotificationPoller};
use crate::page::{LoginForm, Page, PageController, RegisterForm};
use crate::router::{Route, Router};
use crate::session::Session;
use crate::users::{ProfileView, UserManager};

/// Outcome of picking a channel in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Opened(ChannelDetailsView),
    /// Public channel the viewer has not joined yet.
    JoinPrompt(ChannelSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Home,
    Channel(Selection),
    Profile(ProfileView),
}

pub struct Dashboard {
    session: Arc<Session>,
    pub pages: PageController,
    pub router: Router,
    pub channels: ChannelList,
    pub details: ChannelDetails,
    pub channel_actions: ChannelActions,
    pub feed: Arc<MessageFeed>,
    pub users: UserManager,
    pub poller: NotificationPoller,
    pub banners: BannerBoard,
}

impl Dashboard {
    pub fn new(session: Arc<Session>, poll_interval: Duration) -> Self {
        let feed = Arc::new(MessageFeed::new(session.clone()));
        let poller = NotificationPoller::new(session.clone(), poll_interval);
        poller.on_new_messages(reload_open_channel(feed.clone(), session.clone()));

        Self {
            pages: PageController::new(),
            router: Router::new(),
            channels: ChannelList::new(session.clone()),
            details: ChannelDetails::new(session.clone()),
            channel_actions: ChannelActions::new(session.clone()),
            users: UserManager::new(session.clone()),
            banners: BannerBoard::default(),
            feed,
            poller,
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Resumes a stored session or shows the login page.
    pub async fn start(&self) -> Result<Page> {
        if self.session.auth.is_logged_in()? {
            info!("Resuming stored session");
            self.enter().await?;
        } else {
            self.pages.show(Page::Login);
        }
        Ok(self.pages.current())
    }

    pub async fn login(&self, form: LoginForm) -> Result<()> {
        form.validate()?;
        let auth = self
            .session
            .api
            .login(form.email.trim(), &form.password)
            .await?;
        self.session.begin(&auth.token, auth.user_id)?;

        let me = self.session.users.resolve(auth.user_id).await;
        self.session.auth.save_name(&me.name)?;
        self.enter().await
    }

    pub async fn register(&self, form: RegisterForm) -> Result<()> {
        form.validate()?;
        let auth = self
            .session
            .api
            .register(form.email.trim(), &form.password, form.name.trim())
            .await?;
        self.session.begin(&auth.token, auth.user_id)?;
        self.session.auth.save_name(form.name.trim())?;
        self.enter().await
    }

    async fn enter(&self) -> Result<()> {
        self.pages.show(Page::Dashboard);
        self.poller.start();
        self.channels.load().await?;
        Ok(())
    }

    /// Always ends the local session, even when the backend call fails.
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.session.api.logout().await {
            warn!("Logout request failed: {}", e);
        }

        self.poller.stop();
        self.poller.reset();
        self.feed.close();
        self.channels.clear();
        self.banners.clear();
        self.router.navigate(Route::Home);
        self.pages.show(Page::Login);
        self.session.end()
    }

    /// Opens a joined channel, auto-joins the creator, prompts outsiders of
    /// public channels to join, and refuses private ones.
    pub async fn select_channel(&self, channel_id: ChannelId) -> Result<Selection> {
        let me = self.session.user_id()?;
        let summary = match self.channels.find(channel_id) {
            Some(summary) => summary,
            None => {
                self.channels.load().await?;
                self.channels
                    .find(channel_id)
                    .ok_or_else(|| ClientError::validation("Invalid channel ID"))?
            }
        };

        if summary.is_member(me) {
            return self.open(channel_id).await.map(Selection::Opened);
        }
        if summary.creator == me {
            info!("Auto-joining own channel {}", channel_id);
            return self.join_and_open(channel_id).await.map(Selection::Opened);
        }
        if !summary.private {
            return Ok(Selection::JoinPrompt(summary));
        }
        Err(ClientError::validation("You are not a member of this private channel"))
    }

    pub async fn join_and_open(&self, channel_id: ChannelId) -> Result<ChannelDetailsView> {
        self.channel_actions.join(channel_id).await?;
        self.channels.load().await?;
        self.open(channel_id).await
    }

    async fn open(&self, channel_id: ChannelId) -> Result<ChannelDetailsView> {
        let channel = self.details.fetch(channel_id).await?.value;
        let view = self.details.view(&channel).await?;

        self.feed.load_messages(channel_id).await?;
        if let Some(newest) = self.feed.messages().iter().map(|message| message.id).max() {
            self.poller.mark_seen(channel_id, newest);
        }
        self.poller.set_current_channel(Some(channel_id));
        self.channels.set_active(Some(channel_id));
        self.router.navigate(Route::Channel(channel_id));
        Ok(view)
    }

    pub async fn leave_channel(&self, channel_id: ChannelId) -> Result<()> {
        self.channel_actions.leave(channel_id).await?;
        if self.feed.channel() == Some(channel_id) {
            self.close_channel();
        }
        self.channels.load().await?;
        Ok(())
    }

    pub fn close_channel(&self) {
        self.feed.close();
        self.poller.set_current_channel(None);
        self.channels.set_active(None);
        self.router.navigate(Route::Home);
    }

    /// Follows a URL fragment such as `#channel=4`.
    pub async fn navigate(&self, fragment: &str) -> Result<Navigation> {
        match Route::parse(fragment) {
            Route::Home => {
                self.close_channel();
                Ok(Navigation::Home)
            }
            Route::Channel(channel_id) => self
                .select_channel(channel_id)
                .await
                .map(Navigation::Channel),
            route @ (Route::OwnProfile | Route::Profile(_)) => {
                let user_id = match route {
                    Route::Profile(user_id) => Some(user_id),
                    _ => None,
                };
                let profile = self.users.profile(user_id).await?;
                self.router.navigate(route);
                Ok(Navigation::Profile(profile))
            }
        }
    }

    /// Shows `err` in the error popup without leaving the page.
    pub fn report(&self, err: &ClientError) {
        self.pages.show_error(err.to_string());
        self.session.report(err);
    }
}

fn reload_open_channel(feed: Arc<MessageFeed>, session: Arc<Session>) -> NewMessagesCallback {
    Arc::new(move |channel_id: ChannelId, message_ids: Vec<MessageId>| {
        let feed = feed.clone();
        let session = session.clone();
        async move {
            if let Err(e) = feed.refresh(channel_id).await {
                warn!("Reload of channel {} failed: {}", channel_id, e);
                return;
            }
            session.events.publish(ClientEvent::ChannelMessagesChanged {
                channel_id,
                message_ids,
            });
        }
        .boxed()
    })
}
