use anyhow::Result;
use chat_language_guard::config::GuardConfig;
use chat_language_guard::i18n::Language;
use chat_language_guard::session::ChatSession;
use chat_language_guard::submission::SubmitRejection;
use chat_language_guard::switch::SwitchRequest;
use chat_language_guard::transport::InMemoryTransport;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP: &str = "\
Type a line to replace the draft. Commands:
  /send        submit the draft
  /en, /fr     request a conversation language switch
  /yes, /no    confirm or cancel a pending switch
  /clear       clear the chat
  /metrics     print guard counters as JSON
  /quit        exit";

enum Step {
    Line(Option<String>),
    Detection(chat_language_guard::debounce::Detection),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chat_language_guard=info".parse()?),
        )
        .init();

    let config = GuardConfig::from_env()?;
    info!(
        language = config.default_language.code(),
        debounce_ms = config.debounce.as_millis() as u64,
        "Starting chat language guard shell"
    );

    let mut session = ChatSession::new(&config, InMemoryTransport::new(config.default_language));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    render(&session);

    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line?),
            Some(detection) = session.next_detection() => Step::Detection(detection),
        };

        match step {
            Step::Detection(detection) => {
                if session.handle_detection(detection) {
                    render(&session);
                }
            }
            Step::Line(None) => break,
            Step::Line(Some(line)) => {
                if !handle_line(&mut session, line.trim_end())? {
                    break;
                }
                render(&session);
            }
        }
    }

    info!("Shell closed");
    Ok(())
}

/// Returns `false` when the shell should exit.
fn handle_line(session: &mut ChatSession<InMemoryTransport>, line: &str) -> Result<bool> {
    match line {
        "/quit" => return Ok(false),
        "/send" => match session.submit() {
            Ok(question) => println!("> sent: {}", question),
            Err(SubmitRejection::EmptyDraft) => println!("> nothing to send"),
            Err(rejection) => println!("> not sent: {}", rejection),
        },
        "/en" | "/fr" => {
            let target = Language::from_code(&line[1..])?;
            match session.press_language(target) {
                SwitchRequest::Unchanged => println!("> already in {}", target),
                SwitchRequest::Locked(pending) => {
                    println!("> a switch to {} is pending: /yes or /no", pending)
                }
                SwitchRequest::Pending(_) => {}
            }
        }
        "/yes" => match session.confirm_switch() {
            Ok(language) => println!("> conversation language is now {}", language),
            Err(e) => println!("> {}", e),
        },
        "/no" => {
            if session.cancel_switch().is_none() {
                println!("> no language switch is pending");
            }
        }
        "/clear" => {
            if session.clear_chat() {
                println!("> chat cleared");
            } else {
                println!("> clearing is locked until the switch is confirmed or cancelled");
            }
        }
        "/metrics" => println!("{}", serde_json::to_string_pretty(&session.metrics())?),
        draft => {
            if !session.input(draft) {
                println!("> input is locked until the switch is confirmed or cancelled");
            }
        }
    }
    Ok(true)
}

fn render(session: &ChatSession<InMemoryTransport>) {
    let view = session.view();

    if let Some(banner) = &view.mismatch_banner {
        let marker = if banner.blocking { "!!" } else { "!" };
        println!("{} {}", marker, banner.message);
    }
    if let Some(banner) = &view.switch_banner {
        println!("? {}", banner.message_en);
        println!("? {}", banner.message_fr);
        println!(
            "  [{}] /no   [{}] /yes",
            banner.cancel_label, banner.confirm_label
        );
    }

    let toggles: Vec<String> = view
        .toggles
        .iter()
        .map(|t| {
            if t.active {
                format!("[{}]", t.label)
            } else {
                t.label.to_string()
            }
        })
        .collect();
    println!(
        "{} | {} message(s) | {}",
        toggles.join(" "),
        session.transport().history().len(),
        if view.input.enabled {
            view.input.placeholder
        } else {
            "(locked)"
        }
    );
}
