use anyhow::Context;
use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::Message;
use crate::http_api::HttpCallSource;
use crate::screen::{
    AddFriendScreen, AppContext, ChatOverviewScreen, ConversationScreen, CreateGroupScreen,
    FeedItem, FetchState, FriendRequestsScreen, FriendsScreen, GroupsScreen, LoginScreen,
    RegisterScreen, Registration, Route, ScreenError, MISSING_GROUP_ID,
};
use crate::worker::ConversationId;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account. Log in afterwards
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "HOWUDOIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Login {
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "HOWUDOIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show who is logged in
    Whoami,
    /// Everyone you have chatted with, plus your groups
    Chats,
    Friends,
    AddFriend {
        nickname: String,
    },
    /// Pending friend requests sent to you
    Requests,
    Accept {
        sender: String,
    },
    Groups,
    GroupDetails {
        group_id: i64,
    },
    GroupMembers {
        group_id: i64,
    },
    AddMember {
        group_id: i64,
        nickname: String,
    },
    CreateGroup {
        name: String,
        #[arg(required = true)]
        members: Vec<String>,
    },
    /// Chat with a friend. Each line you type is sent; `/refresh` fetches now, `/status` shows the
    /// last fetch, `/quit` leaves
    Chat {
        friend: String,
    },
    /// Chat in a group, same controls as `chat`
    GroupChat {
        group_id: i64,
    },
}

/// The invocation that shows `route`.
pub(crate) fn command_hint(route: &Route) -> String {
    match route {
        Route::Login => "howudoin login".to_string(),
        Route::Register => "howudoin register".to_string(),
        Route::ChatOverview => "howudoin chats".to_string(),
        Route::Friends => "howudoin friends".to_string(),
        Route::AddFriend => "howudoin add-friend <nickname>".to_string(),
        Route::FriendRequests => "howudoin requests".to_string(),
        Route::Groups => "howudoin groups".to_string(),
        Route::CreateGroup => "howudoin create-group <name> <members>...".to_string(),
        Route::DirectMessages { friend } => format!("howudoin chat {friend}"),
        Route::GroupMessages { group_id, .. } => format!("howudoin group-chat {group_id}"),
    }
}

pub async fn run<CS: HttpCallSource + 'static>(
    ctx: AppContext<CS>,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Register {
            name,
            lastname,
            nickname,
            email,
            password,
        } => {
            let (confirmation, next) = RegisterScreen::new(ctx)
                .submit(&Registration {
                    name: &name,
                    lastname: &lastname,
                    nickname: &nickname,
                    email: &email,
                    password: &password,
                })
                .await?;
            println!("{confirmation}");
            println!("Next: {}", command_hint(&next));
        }

        Commands::Login {
            nickname,
            email,
            password,
        } => {
            let mut screen = LoginScreen::new(ctx);
            match screen.submit(&nickname, &email, &password).await {
                Ok(next) => {
                    println!("Logged in as {nickname}");
                    println!("Next: {}", command_hint(&next));
                }
                Err(e) => {
                    if matches!(e, ScreenError::Application(_)) {
                        eprintln!("No account yet? Run `{}`.", command_hint(&screen.register()));
                    }
                    return Err(e.into());
                }
            }
        }

        Commands::Logout => {
            let next = ctx.logout()?;
            println!("Logged out. Log in again with `{}`.", command_hint(&next));
        }

        Commands::Whoami => println!("{}", ctx.session()?.nickname()),

        Commands::Chats => {
            let mut screen = ChatOverviewScreen::new(ctx);
            for notice in screen.focus().await? {
                println!("({notice})");
            }
            if screen.feed.is_empty() {
                println!("No chats found.");
            }
            for item in screen.feed.items() {
                let label = match &item {
                    FeedItem::Direct(friend) => friend.to_string(),
                    FeedItem::Group(group) => group.name.clone(),
                };
                match item.route() {
                    Some(route) => println!("{label}  `{}`", command_hint(&route)),
                    None => println!("{label}  ({MISSING_GROUP_ID})"),
                }
            }
            println!(
                "Friends: `{}`  Groups: `{}`",
                command_hint(&screen.friends()),
                command_hint(&screen.groups())
            );
        }

        Commands::Friends => {
            let mut screen = FriendsScreen::new(ctx);
            screen.focus().await?;
            if screen.friends.is_empty() {
                println!("No friends found.");
            }
            for friend in &screen.friends {
                println!("{friend}  `{}`", command_hint(&screen.open_chat(friend)));
            }
            println!(
                "Add a friend: `{}`  Requests: `{}`",
                command_hint(&screen.add_friend()),
                command_hint(&screen.friend_requests())
            );
        }

        Commands::AddFriend { nickname } => {
            let mut screen = AddFriendScreen::new(ctx);
            screen.set_target(nickname);
            println!("{}", screen.submit().await?);
        }

        Commands::Requests => {
            let mut screen = FriendRequestsScreen::new(ctx);
            let requests = screen.fetch().await?;
            if requests.is_empty() {
                println!("No pending friend requests.");
            }
            for request in requests {
                println!("{}", request.sender);
            }
        }

        Commands::Accept { sender } => {
            let mut screen = FriendRequestsScreen::new(ctx);
            println!("{}", screen.accept(&sender).await?);
            if let FetchState::Failure(reason) = &screen.state {
                log::warn!("Could not refresh pending requests: {reason}");
            }
        }

        Commands::Groups => {
            let mut screen = GroupsScreen::new(ctx);
            screen.fetch().await?;
            if screen.groups.is_empty() {
                println!("No groups found.");
            }
            for group in &screen.groups {
                match screen.open_group(group) {
                    Ok(route) => println!("{}  `{}`", group.name, command_hint(&route)),
                    Err(e) => println!("{}  ({e})", group.name),
                }
            }
            println!("New group: `{}`", command_hint(&screen.create_group()));
        }

        Commands::GroupDetails { group_id } => {
            let mut screen = GroupsScreen::new(ctx);
            let details = screen.open_details(group_id).await?;
            println!("#{} {}", details.id, details.name);
            if let Some(created) = &details.created_time {
                println!("Created: {created}");
            }
            println!("Members: {}", details.members.join(", "));
            screen.close_details();
        }

        Commands::GroupMembers { group_id } => {
            for member in GroupsScreen::new(ctx).members(group_id).await? {
                println!("{member}");
            }
        }

        Commands::AddMember { group_id, nickname } => {
            println!(
                "{}",
                GroupsScreen::new(ctx).add_member(group_id, &nickname).await?
            );
        }

        Commands::CreateGroup { name, members } => {
            let mut screen = CreateGroupScreen::new(ctx);
            screen.load_friends().await?;
            screen.set_name(name);
            for member in &members {
                if let Err(e) = screen.add_member(member) {
                    println!("{e}");
                }
            }
            println!("{}", screen.submit().await?);
        }

        Commands::Chat { friend } => {
            chat(ctx, ConversationId::Direct { friend }).await?;
        }

        Commands::GroupChat { group_id } => {
            chat(ctx, ConversationId::Group { id: group_id }).await?;
        }
    }

    Ok(())
}

fn print_message(message: &Message) {
    println!("{}: {}", message.sender, message.content);
}

/// What the terminal has to print to go from one transcript to the next.
#[derive(Debug, PartialEq, Eq)]
enum TranscriptUpdate<'a> {
    /// Everything printed so far is still there, in order; print only these.
    Append(&'a [Message]),
    /// Something printed earlier changed or went away; print everything again.
    Redraw(&'a [Message]),
}

/// A locally appended message has no id until the server's copy replaces it.
fn same_message(a: &Message, b: &Message) -> bool {
    match (a.id, b.id) {
        (Some(a), Some(b)) => a == b,
        _ => a.sender == b.sender && a.content == b.content,
    }
}

fn transcript_update<'a>(shown: &[Message], current: &'a [Message]) -> TranscriptUpdate<'a> {
    let is_prefix = shown.len() <= current.len()
        && shown.iter().zip(current).all(|(a, b)| same_message(a, b));
    if is_prefix {
        TranscriptUpdate::Append(&current[shown.len()..])
    } else {
        TranscriptUpdate::Redraw(current)
    }
}

async fn chat<CS: HttpCallSource + 'static>(
    ctx: AppContext<CS>,
    conversation: ConversationId,
) -> anyhow::Result<()> {
    let mut screen = ConversationScreen::new(ctx);
    screen.open(conversation)?;

    let mut timeline_rx = screen.subscribe();
    let printer = tokio::spawn(async move {
        let mut shown: Vec<Message> = Vec::new();
        let mut last_status = FetchState::Idle;
        loop {
            {
                let timeline = timeline_rx.borrow_and_update();
                match transcript_update(&shown, &timeline.messages) {
                    TranscriptUpdate::Append(new) => new.iter().for_each(print_message),
                    TranscriptUpdate::Redraw(all) => {
                        println!("----");
                        all.iter().for_each(print_message);
                    }
                }
                shown.clone_from(&timeline.messages);

                if timeline.status != last_status {
                    if let FetchState::Failure(reason) = &timeline.status {
                        eprintln!("! {reason}");
                    }
                    if !timeline.status.is_loading() {
                        last_status = timeline.status.clone();
                    }
                }
            }

            if timeline_rx.changed().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Reading stdin")? {
        match line.trim() {
            "/quit" => break,
            "/refresh" => {
                if let Err(e) = screen.refresh().await {
                    eprintln!("! {e}");
                }
            }
            "/status" => match (screen.is_polling(), screen.timeline().status) {
                (false, _) => eprintln!("! Polling has stopped."),
                (true, FetchState::Failure(reason)) => eprintln!("! {reason}"),
                (true, FetchState::Loading) => eprintln!("Fetching..."),
                (true, _) => eprintln!("Up to date."),
            },
            _ => {
                screen.set_draft(line);
                match screen.send().await {
                    // Fetch the server's copy now instead of at the next tick.
                    Ok(_) => screen.request_poll(),
                    Err(e) => eprintln!("! {e}"),
                }
            }
        }
    }

    screen.close();
    printer.abort();
    Ok(())
}
