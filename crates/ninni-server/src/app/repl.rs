use anyhow::Result;
use chrono::{Local, Utc};
use colored::Colorize;
use ninni_chat::{new_session_id, ChatState, Message, ReplyOutcome, Sender, DEFAULT_GREETING};
use ninni_models::ChatRequest;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::ChatArgs;

/// Chat with a running server from the terminal
pub async fn run_chat_repl(args: &ChatArgs) -> Result<()> {
    let base_url = args.server.trim_end_matches('/').to_string();
    let http = reqwest::Client::new();

    let now = Utc::now();
    let session_id = args.session.clone().unwrap_or_else(|| new_session_id(now));
    let mut state = ChatState::with_greeting(session_id, DEFAULT_GREETING, now);

    println!("{}", "🌙 Ninni - your gentle sleep companion".bright_cyan().bold());
    println!(
        "{}",
        format!("Server: {}  Session: {}", base_url, state.session_id()).bright_black()
    );
    println!("{}", "Type '/quit' to leave\n".bright_black());

    if let Some(greeting) = state.latest() {
        print_message(greeting);
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    println!("{}", "Sweet dreams! 💤".bright_cyan());
                    break;
                }

                let Some(request) = state.submit(&line, Utc::now()) else {
                    continue;
                };
                let _ = rl.add_history_entry(trimmed);

                let outcome = send_chat(&http, &base_url, &request).await;
                if let ReplyOutcome::TransportFailed(reason) = &outcome {
                    tracing::debug!(%reason, "Chat request failed");
                }

                state.receive(outcome, Utc::now());
                if let Some(reply) = state.latest() {
                    print_message(reply);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Sweet dreams! 💤".bright_cyan());
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// POST one request and classify whatever comes back
pub async fn send_chat(http: &reqwest::Client, base_url: &str, request: &ChatRequest) -> ReplyOutcome {
    let response = match http
        .post(format!("{}/api/chat", base_url))
        .json(request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => return ReplyOutcome::TransportFailed(err.to_string()),
    };

    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => ReplyOutcome::classify(status, &body),
        Err(err) => ReplyOutcome::TransportFailed(err.to_string()),
    }
}

fn print_message(message: &Message) {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    match message.sender {
        Sender::Assistant => println!(
            "{} {} {}\n",
            format!("[{}]", time).bright_black(),
            "Ninni:".bright_magenta().bold(),
            message.text
        ),
        Sender::User => {}
    }
}
