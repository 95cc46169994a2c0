//! Line-oriented interactive chat loop.

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::mode::Mode;
use crate::core::router::RoundReply;

const BANNER_RULE: &str = "============================================================";
const SECTION_RULE: &str = "------------------------------------------------------------";
const GOODBYE: &str = "👋 Goodbye! Thanks for chatting!";

pub async fn run_chat(app: App) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout();
    write_banner(&app, &mut stdout)?;
    run_loop(app, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    Ok(())
}

/// Read lines from `reader` until `/quit` or end of input, writing prompts
/// and replies to `out`. Returns the app so callers can inspect the final
/// session.
pub async fn run_loop<R, W>(mut app: App, reader: R, out: &mut W) -> Result<App, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    write_notices(&mut app, out)?;

    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out, "\n\n{GOODBYE}")?;
            break;
        };

        let result = process_input(&mut app, &line);
        write_notices(&mut app, out)?;

        match result {
            CommandResult::Continue => {}
            CommandResult::Quit => break,
            CommandResult::ProcessAsMessage(message) => {
                writeln!(out, "\n{}", app.thinking_label())?;
                match app.send_message(&message).await {
                    Ok(replies) => writeln!(out, "\n{}\n", format_replies(&replies))?,
                    Err(err) => writeln!(out, "\n❌ {err}\n")?,
                }
                write_notices(&mut app, out)?;
            }
        }
    }
    Ok(app)
}

/// One block per speaker, separated by blank lines.
pub fn format_replies(replies: &[RoundReply]) -> String {
    replies
        .iter()
        .map(RoundReply::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn write_notices<W: Write>(app: &mut App, out: &mut W) -> io::Result<()> {
    for notice in app.take_notices() {
        writeln!(out, "{}", notice.render())?;
    }
    Ok(())
}

pub fn write_banner<W: Write>(app: &App, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{BANNER_RULE}")?;
    writeln!(out, "🤖 AI-Powered Chatbot (Claude & ChatGPT)")?;
    writeln!(out, "{BANNER_RULE}")?;
    writeln!(out, "\nType /help for available commands, /quit to leave.")?;
    writeln!(out, "\n{SECTION_RULE}\n")?;

    let provider = app
        .providers
        .active()
        .unwrap_or(app.providers.preferred());
    writeln!(out, "Current provider: {}", provider.as_str().to_uppercase())?;
    match app.session.mode() {
        Mode::ActiveFriend(name) => writeln!(out, "Current friend: {name}")?,
        Mode::GroupChat(members) => writeln!(out, "Group chat mode: {}", members.join(", "))?,
        Mode::MainBot => writeln!(out, "Current personality: {}", app.session.personality())?,
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::OwnerKey;
    use crate::core::personality::Personality;
    use crate::utils::test_utils::{
        create_test_app, create_test_app_with, provider_error, ScriptedProvider,
    };

    async fn drive(app: App, input: &str) -> (App, String) {
        let mut out = Vec::new();
        let app = run_loop(app, input.as_bytes(), &mut out).await.unwrap();
        (app, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn messages_are_answered_until_quit() {
        let (app, out) = drive(create_test_app(), "hello\n/quit\nnever sent\n").await;

        assert!(out.contains("[CLAUDE] Thinking..."));
        assert!(out.contains("\nAI: default: hello\n"));
        assert!(out.contains(GOODBYE));
        assert!(!out.contains("never sent"));
        assert_eq!(app.session.history(&OwnerKey::MainBot).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn end_of_input_says_goodbye() {
        let (_, out) = drive(create_test_app(), "").await;
        assert!(out.starts_with("You: "));
        assert!(out.ends_with(&format!("{GOODBYE}\n")));
    }

    #[tokio::test]
    async fn group_round_prints_each_friend_in_order() {
        let input = "/addfriend Alex funny\n/addfriend Sam wise\n/groupchat Alex Sam\nhi\n";
        let (_, out) = drive(create_test_app(), input).await;

        assert!(out.contains("✓ Friend 'Alex' added with funny personality!"));
        assert!(out.contains("[GROUP CHAT] Friends discussing..."));
        assert!(out.contains("Alex: funny: hi\n\nSam: wise: hi"));
    }

    #[tokio::test]
    async fn failed_speaker_is_shown_inline() {
        let provider =
            ScriptedProvider::new().fail_for(Personality::Wise, provider_error("overloaded"));
        let input = "/addfriend Alex funny\n/addfriend Sam wise\n/groupchat Alex Sam\nhi\n";
        let (_, out) = drive(create_test_app_with(provider), input).await;

        assert!(out.contains("Alex: funny: hi"));
        assert!(out.contains("❌ Sam: Scripted API error 500: overloaded"));
    }

    #[tokio::test]
    async fn unknown_commands_are_not_sent() {
        let (app, out) = drive(create_test_app(), "/dance\n").await;
        assert!(out.contains("Unknown command: /dance"));
        assert!(!out.contains("Thinking"));
        assert!(app.session.history(&OwnerKey::MainBot).unwrap().is_empty());
    }

    #[test]
    fn banner_reports_mode() {
        let mut app = create_test_app();
        app.session.add_friend("Alex", "funny").unwrap();
        app.session.switch_to_friend("Alex").unwrap();

        let mut out = Vec::new();
        write_banner(&app, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Current provider: CLAUDE"));
        assert!(text.contains("Current friend: Alex"));
    }
}
