use anyhow::{Context, bail};

use slackr_types::models::{ChannelId, MessageId, UserId};

/// Name and usage of every command, in help order.
pub const USAGE: &[(&str, &str)] = &[
    ("login", "login <email> <password>"),
    ("register", "register <email> <password> <confirm> <name...>"),
    ("logout", "logout"),
    ("channels", "channels"),
    ("open", "open <channel>"),
    ("join", "join <channel>"),
    ("leave", "leave <channel>"),
    ("create", "create [--private] <name> [description...]"),
    ("edit-channel", "edit-channel <channel> <name> [description...]"),
    ("details", "details"),
    ("send", "send <text...>"),
    ("image", "image <path> [caption...]"),
    ("edit", "edit <message> <text...>"),
    ("delete", "delete <message>"),
    ("pin", "pin <message>"),
    ("unpin", "unpin <message>"),
    ("react", "react <message> <emoji>"),
    ("more", "more"),
    ("pinned", "pinned"),
    ("view", "view <message>"),
    ("next", "next"),
    ("prev", "prev"),
    ("close", "close"),
    ("profile", "profile [user]"),
    ("update-profile", "update-profile <email> <name> [bio...]"),
    ("invite", "invite [user]"),
    ("go", "go <#fragment>"),
    ("offline", "offline"),
    ("online", "online"),
    ("dismiss", "dismiss [banner]"),
    ("help", "help"),
    ("quit", "quit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        confirm_password: String,
        name: String,
    },
    Logout,
    Channels,
    Open(ChannelId),
    Join(ChannelId),
    Leave(ChannelId),
    Create {
        name: String,
        description: String,
        private: bool,
    },
    EditChannel {
        channel_id: ChannelId,
        name: String,
        description: String,
    },
    Details,
    Send(String),
    Image {
        path: String,
        caption: String,
    },
    Edit {
        message_id: MessageId,
        text: String,
    },
    Delete(MessageId),
    Pin(MessageId),
    Unpin(MessageId),
    React {
        message_id: MessageId,
        emoji: String,
    },
    More,
    Pinned,
    View(MessageId),
    Next,
    Prev,
    Close,
    Profile(Option<UserId>),
    UpdateProfile {
        email: String,
        name: String,
        bio: Option<String>,
    },
    Invite(Option<UserId>),
    Go(String),
    Offline,
    Online,
    /// 1-based banner index; `None` dismisses all.
    Dismiss(Option<usize>),
    Help,
    Quit,
}

/// Splits off the first whitespace-delimited word.
fn word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim_start()),
        None => (input, ""),
    }
}

fn usage(name: &str) -> anyhow::Error {
    match USAGE.iter().find(|(command, _)| *command == name) {
        Some((_, usage)) => anyhow::anyhow!("Usage: {}", usage),
        None => anyhow::anyhow!("Unknown command: {} (try `help`)", name),
    }
}

fn id(name: &str, arg: &str) -> anyhow::Result<u64> {
    if arg.is_empty() {
        return Err(usage(name));
    }
    arg.parse()
        .with_context(|| format!("Expected a numeric id, got `{}`", arg))
}

fn optional_id(arg: &str) -> anyhow::Result<Option<u64>> {
    if arg.is_empty() {
        Ok(None)
    } else {
        arg.parse()
            .map(Some)
            .with_context(|| format!("Expected a numeric id, got `{}`", arg))
    }
}

pub fn parse(line: &str) -> anyhow::Result<Command> {
    let (name, rest) = word(line.trim());

    let command = match name {
        "login" => {
            let (email, rest) = word(rest);
            let (password, _) = word(rest);
            if password.is_empty() {
                return Err(usage(name));
            }
            Command::Login {
                email: email.into(),
                password: password.into(),
            }
        }
        "register" => {
            let (email, rest) = word(rest);
            let (password, rest) = word(rest);
            let (confirm_password, display_name) = word(rest);
            if display_name.trim().is_empty() {
                return Err(usage(name));
            }
            Command::Register {
                email: email.into(),
                password: password.into(),
                confirm_password: confirm_password.into(),
                name: display_name.trim().into(),
            }
        }
        "logout" => Command::Logout,
        "channels" => Command::Channels,
        "open" => Command::Open(id(name, word(rest).0)?),
        "join" => Command::Join(id(name, word(rest).0)?),
        "leave" => Command::Leave(id(name, word(rest).0)?),
        "create" => {
            let (first, tail) = word(rest);
            let (private, rest) = if first == "--private" {
                (true, tail)
            } else {
                (false, rest)
            };
            let (channel_name, description) = word(rest);
            if channel_name.is_empty() {
                return Err(usage(name));
            }
            Command::Create {
                name: channel_name.into(),
                description: description.trim().into(),
                private,
            }
        }
        "edit-channel" => {
            let (channel, rest) = word(rest);
            let (channel_name, description) = word(rest);
            if channel_name.is_empty() {
                return Err(usage(name));
            }
            Command::EditChannel {
                channel_id: id(name, channel)?,
                name: channel_name.into(),
                description: description.trim().into(),
            }
        }
        "details" => Command::Details,
        "send" => Command::Send(rest.trim().into()),
        "image" => {
            let (path, caption) = word(rest);
            if path.is_empty() {
                return Err(usage(name));
            }
            Command::Image {
                path: path.into(),
                caption: caption.trim().into(),
            }
        }
        "edit" => {
            let (message, text) = word(rest);
            Command::Edit {
                message_id: id(name, message)?,
                text: text.trim().into(),
            }
        }
        "delete" => Command::Delete(id(name, word(rest).0)?),
        "pin" => Command::Pin(id(name, word(rest).0)?),
        "unpin" => Command::Unpin(id(name, word(rest).0)?),
        "react" => {
            let (message, rest) = word(rest);
            let (emoji, _) = word(rest);
            if emoji.is_empty() {
                return Err(usage(name));
            }
            Command::React {
                message_id: id(name, message)?,
                emoji: emoji.into(),
            }
        }
        "more" => Command::More,
        "pinned" => Command::Pinned,
        "view" => Command::View(id(name, word(rest).0)?),
        "next" => Command::Next,
        "prev" => Command::Prev,
        "close" => Command::Close,
        "profile" => Command::Profile(optional_id(word(rest).0)?),
        "update-profile" => {
            let (email, rest) = word(rest);
            let (display_name, bio) = word(rest);
            if display_name.is_empty() {
                return Err(usage(name));
            }
            let bio = bio.trim();
            Command::UpdateProfile {
                email: email.into(),
                name: display_name.into(),
                bio: (!bio.is_empty()).then(|| bio.to_string()),
            }
        }
        "invite" => Command::Invite(optional_id(word(rest).0)?),
        "go" => Command::Go(rest.trim().into()),
        "offline" => Command::Offline,
        "online" => Command::Online,
        "dismiss" => Command::Dismiss(optional_id(word(rest).0)?.map(|index| index as usize)),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => bail!("Type `help` for a list of commands"),
        other => return Err(usage(other)),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login_and_register() {
        assert_eq!(
            parse("login ada@example.com hunter2").unwrap(),
            Command::Login {
                email: "ada@example.com".into(),
                password: "hunter2".into(),
            }
        );
        assert_eq!(
            parse("register ada@example.com pw pw Ada Lovelace").unwrap(),
            Command::Register {
                email: "ada@example.com".into(),
                password: "pw".into(),
                confirm_password: "pw".into(),
                name: "Ada Lovelace".into(),
            }
        );
    }

    #[test]
    fn text_keeps_inner_spacing() {
        assert_eq!(
            parse("send  hello   there ").unwrap(),
            Command::Send("hello   there".into())
        );
        assert_eq!(
            parse("edit 4 fixed typo").unwrap(),
            Command::Edit {
                message_id: 4,
                text: "fixed typo".into(),
            }
        );
    }

    #[test]
    fn create_takes_private_flag() {
        assert_eq!(
            parse("create --private team our space").unwrap(),
            Command::Create {
                name: "team".into(),
                description: "our space".into(),
                private: true,
            }
        );
        assert_eq!(
            parse("create lobby").unwrap(),
            Command::Create {
                name: "lobby".into(),
                description: String::new(),
                private: false,
            }
        );
    }

    #[test]
    fn optional_arguments() {
        assert_eq!(parse("profile").unwrap(), Command::Profile(None));
        assert_eq!(parse("profile 7").unwrap(), Command::Profile(Some(7)));
        assert_eq!(parse("invite").unwrap(), Command::Invite(None));
        assert_eq!(parse("dismiss 2").unwrap(), Command::Dismiss(Some(2)));
        assert_eq!(
            parse("update-profile a@b.c Ada").unwrap(),
            Command::UpdateProfile {
                email: "a@b.c".into(),
                name: "Ada".into(),
                bio: None,
            }
        );
    }

    #[test]
    fn missing_arguments_show_usage() {
        assert_eq!(parse("open").unwrap_err().to_string(), "Usage: open <channel>");
        assert_eq!(
            parse("react 3").unwrap_err().to_string(),
            "Usage: react <message> <emoji>"
        );
        assert!(parse("open general").unwrap_err().to_string().contains("numeric id"));
    }

    #[test]
    fn unknown_commands_point_to_help() {
        assert_eq!(
            parse("dance").unwrap_err().to_string(),
            "Unknown command: dance (try `help`)"
        );
    }

    #[test]
    fn every_command_has_usage() {
        for (name, usage) in USAGE {
            assert!(usage.starts_with(name));
        }
    }
}
