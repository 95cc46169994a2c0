//! One-shot `say` command: send a single message and print the reply.

use std::error::Error;

use crate::cli::chat::format_replies;
use crate::core::app::App;

/// Send `prompt` to the main bot, or to `friend` when given, and return the
/// printed text plus whether every reply succeeded.
pub async fn say(
    app: &mut App,
    prompt: &str,
    friend: Option<&str>,
) -> Result<(String, bool), Box<dyn Error>> {
    if let Some(name) = friend {
        app.session.switch_to_friend(name)?;
    }
    let replies = app.send_message(prompt).await?;
    let ok = replies.iter().all(|reply| !reply.is_error());
    Ok((format_replies(&replies), ok))
}

pub async fn run_say(
    mut app: App,
    prompt: Vec<String>,
    friend: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: banter say <prompt>");
        std::process::exit(1);
    }

    for notice in app.take_notices() {
        eprintln!("{}", notice.render());
    }

    match say(&mut app, prompt.trim(), friend.as_deref()).await {
        Ok((text, true)) => {
            println!("{text}");
            Ok(())
        }
        Ok((text, false)) => {
            eprintln!("{text}");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::personality::Personality;
    use crate::utils::test_utils::{
        create_test_app, create_test_app_with, provider_error, ScriptedProvider,
    };

    #[tokio::test]
    async fn main_bot_answers_by_default() {
        let mut app = create_test_app();
        let (text, ok) = say(&mut app, "ping", None).await.unwrap();
        assert!(ok);
        assert_eq!(text, "AI: default: ping");
    }

    #[tokio::test]
    async fn friend_can_be_addressed_directly() {
        let mut app = create_test_app();
        app.session.add_friend("Alex", "funny").unwrap();

        let (text, ok) = say(&mut app, "joke?", Some("alex")).await.unwrap();
        assert!(ok);
        assert_eq!(text, "Alex: funny: joke?");
    }

    #[tokio::test]
    async fn unknown_friend_is_an_error() {
        let mut app = create_test_app();
        let err = say(&mut app, "hi", Some("Ghost")).await.unwrap_err();
        assert!(err.to_string().contains("Ghost"));
    }

    #[tokio::test]
    async fn provider_failure_is_reported_as_not_ok() {
        let provider = ScriptedProvider::new()
            .fail_for(Personality::Default, provider_error("down"));
        let mut app = create_test_app_with(provider);
        let (text, ok) = say(&mut app, "hi", None).await.unwrap();
        assert!(!ok);
        assert!(text.contains("down"));
    }
}
