mod commands;
mod config;
mod view;

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use slackr_api::ApiClient;
use slackr_client::messages::images::Lightbox;
use slackr_client::messages::scroll::restored_scroll_top;
use slackr_client::messages::LoadMore;
use slackr_client::page::{LoginForm, Page, RegisterForm};
use slackr_client::users::ProfileUpdate;
use slackr_client::{ClientError, Dashboard, Navigation, Selection, Session};
use slackr_db::Database;
use slackr_types::events::ClientEvent;

use commands::Command;
use config::Config;

enum Flow {
    Continue,
    Quit,
}

struct App {
    dashboard: Dashboard,
    lightbox: Option<Lightbox>,
}

impl App {
    fn print_channels(&self) -> Result<(), ClientError> {
        print!("{}", view::channel_list(&self.dashboard.channels.render()?));
        Ok(())
    }

    fn print_feed(&self) -> Result<(), ClientError> {
        println!("{}", view::feed(&self.dashboard.feed.view()?));
        Ok(())
    }

    fn print_selection(&self, selection: Selection) -> Result<(), ClientError> {
        match selection {
            Selection::Opened(details) => {
                print!("{}", view::details(&details));
                self.print_feed()
            }
            Selection::JoinPrompt(summary) => {
                println!(
                    "You are not a member of #{}. Type `join {}` to join.",
                    summary.name, summary.id
                );
                Ok(())
            }
        }
    }

    fn open_channel(&self) -> Result<u64, ClientError> {
        self.dashboard
            .feed
            .channel()
            .ok_or_else(|| ClientError::validation("Please select a channel first"))
    }

    async fn run(&mut self, command: Command) -> Result<Flow, ClientError> {
        let dashboard = &self.dashboard;
        match command {
            Command::Login { email, password } => {
                dashboard.login(LoginForm { email, password }).await?;
                self.print_channels()?;
            }
            Command::Register {
                email,
                password,
                confirm_password,
                name,
            } => {
                dashboard.pages.show(Page::Register);
                dashboard
                    .register(RegisterForm {
                        email,
                        name,
                        password,
                        confirm_password,
                    })
                    .await?;
                self.print_channels()?;
            }
            Command::Logout => {
                self.lightbox = None;
                dashboard.logout().await?;
            }
            Command::Channels => {
                let fetched = dashboard.channels.load().await?;
                if fetched.is_cached() {
                    println!("(offline copy)");
                }
                self.print_channels()?;
            }
            Command::Open(channel_id) => {
                let selection = dashboard.select_channel(channel_id).await?;
                self.print_selection(selection)?;
            }
            Command::Join(channel_id) => {
                let details = dashboard.join_and_open(channel_id).await?;
                self.print_selection(Selection::Opened(details))?;
            }
            Command::Leave(channel_id) => {
                dashboard.leave_channel(channel_id).await?;
                println!("Left channel {}", channel_id);
            }
            Command::Create {
                name,
                description,
                private,
            } => {
                let channel_id = dashboard
                    .channel_actions
                    .create(&name, &description, private)
                    .await?;
                dashboard.channels.load().await?;
                println!("Created #{} ({})", name.trim(), channel_id);
            }
            Command::EditChannel {
                channel_id,
                name,
                description,
            } => {
                dashboard
                    .channel_actions
                    .edit(channel_id, &name, &description)
                    .await?;
                dashboard.channels.load().await?;
                self.print_channels()?;
            }
            Command::Details => {
                let channel = dashboard.details.fetch(self.open_channel()?).await?;
                print!("{}", view::details(&dashboard.details.view(&channel.value).await?));
            }
            Command::Send(text) => {
                dashboard.feed.send_message(&text, None).await?;
                self.print_feed()?;
            }
            Command::Image { path, caption } => {
                dashboard
                    .feed
                    .send_message(&caption, Some(Path::new(&path)))
                    .await?;
                self.print_feed()?;
            }
            Command::Edit { message_id, text } => {
                dashboard.feed.edit_message(message_id, &text, None).await?;
                self.print_feed()?;
            }
            Command::Delete(message_id) => {
                dashboard.feed.delete_message(message_id).await?;
                self.print_feed()?;
            }
            Command::Pin(message_id) => {
                dashboard.feed.pin_message(message_id).await?;
                self.print_feed()?;
            }
            Command::Unpin(message_id) => {
                dashboard.feed.unpin_message(message_id).await?;
                self.print_feed()?;
            }
            Command::React { message_id, emoji } => {
                dashboard.feed.toggle_reaction_on(message_id, &emoji).await?;
                self.print_feed()?;
            }
            Command::More => {
                let before = view::height(&view::feed(&dashboard.feed.view()?));
                match dashboard.feed.load_more().await? {
                    LoadMore::Loaded { added, has_more } => {
                        let rendered = view::feed(&dashboard.feed.view()?);
                        println!("{}", rendered);
                        let top = restored_scroll_top(before, view::height(&rendered));
                        println!(
                            "Loaded {} older message(s), you were at line {}{}",
                            added,
                            top + 1,
                            if has_more { "" } else { ". Start of channel." }
                        );
                    }
                    LoadMore::Busy => println!("Already loading older messages"),
                    LoadMore::Exhausted => println!("No older messages"),
                    LoadMore::Stale => {}
                }
            }
            Command::Pinned => {
                print!("{}", view::pinned(&dashboard.feed.pinned()?));
            }
            Command::View(message_id) => {
                let lightbox = dashboard
                    .feed
                    .lightbox(message_id)
                    .ok_or_else(|| ClientError::validation("That message has no image"))?;
                println!("{}", view::lightbox(&lightbox));
                self.lightbox = Some(lightbox);
            }
            Command::Next => step(&mut self.lightbox, true),
            Command::Prev => step(&mut self.lightbox, false),
            Command::Close => {
                if self.lightbox.take().is_none() {
                    dashboard.close_channel();
                }
            }
            Command::Profile(user_id) => {
                print!("{}", view::profile(&dashboard.users.profile(user_id).await?));
            }
            Command::UpdateProfile { email, name, bio } => {
                dashboard
                    .users
                    .update_profile(ProfileUpdate {
                        email,
                        name,
                        bio,
                        ..Default::default()
                    })
                    .await?;
                print!("{}", view::profile(&dashboard.users.profile(None).await?));
            }
            Command::Invite(None) => {
                let candidates = dashboard.users.invite_candidates(self.open_channel()?).await?;
                print!("{}", view::invite_candidates(&candidates));
            }
            Command::Invite(Some(user_id)) => {
                dashboard.users.invite(self.open_channel()?, user_id).await?;
                println!("Invited user {}", user_id);
            }
            Command::Go(fragment) => match dashboard.navigate(&fragment).await? {
                Navigation::Home => println!("Home"),
                Navigation::Channel(selection) => self.print_selection(selection)?,
                Navigation::Profile(profile) => print!("{}", view::profile(&profile)),
            },
            Command::Offline => dashboard.session().offline.set_online(false),
            Command::Online => dashboard.session().offline.set_online(true),
            Command::Dismiss(index) => {
                let banners = dashboard.banners.visible();
                match index {
                    Some(index) => {
                        let banner = index
                            .checked_sub(1)
                            .and_then(|i| banners.get(i))
                            .ok_or_else(|| ClientError::validation("No such notification"))?;
                        dashboard.banners.close(banner.id);
                    }
                    None => dashboard.banners.clear(),
                }
                dashboard.pages.hide_error();
            }
            Command::Help => print!("{}", view::help()),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn on_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::Notification(notification) => {
                self.dashboard.banners.push(notification);
                for (i, banner) in self.dashboard.banners.visible().iter().enumerate() {
                    println!("{}", view::banner(i + 1, banner));
                }
            }
            ClientEvent::OnlineStatusChanged { online } => {
                if online {
                    println!("Back online");
                } else {
                    println!("You are offline. Showing cached content.");
                }
            }
            ClientEvent::ChannelMessagesChanged { .. } => {
                if let Err(e) = self.print_feed() {
                    warn!("Could not redraw messages: {}", e);
                }
            }
            ClientEvent::ErrorRaised { message } => println!("Error: {}", message),
            ClientEvent::SessionEnded => println!("Logged out"),
            ClientEvent::ChannelsChanged => {}
        }
    }
}

fn step(lightbox: &mut Option<Lightbox>, forward: bool) {
    match lightbox {
        Some(lightbox) => {
            if forward {
                lightbox.next();
            } else {
                lightbox.prev();
            }
            println!("{}", view::lightbox(lightbox));
        }
        None => println!("No image open"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slackr=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!("Using backend {}", config.backend_url);

    let db = Arc::new(Database::open(&config.db_path)?);
    let session = Session::new(ApiClient::new(&config.backend_url), db)?;
    let mut events = session.events.subscribe();

    let mut app = App {
        dashboard: Dashboard::new(session, config.poll_interval),
        lightbox: None,
    };

    match app.dashboard.start().await {
        Ok(Page::Dashboard) => {
            if let Err(e) = app.print_channels() {
                app.dashboard.report(&e);
            }
        }
        Ok(_) => println!("Welcome to Slackr. `login <email> <password>` or `register ...`"),
        Err(e) => app.dashboard.report(&e),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match commands::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match app.run(command).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => app.dashboard.report(&e),
                }
            }
            event = events.recv() => match event {
                Ok(event) => app.on_event(event),
                Err(RecvError::Lagged(skipped)) => warn!("Dropped {} client events", skipped),
                Err(RecvError::Closed) => break,
            },
        }
    }

    app.dashboard.poller.stop();
    info!("Bye");
    Ok(())
}
