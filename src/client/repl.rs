use log::{ error, info };
use std::error::Error;
use std::time::Duration;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader };

use super::controller::{ ChatController, FAILURE_NOTICE };
use super::render::render_conversation;
use super::{ HttpRelayClient, RelayTransport };
use crate::cli::ChatArgs;

pub const TITLE: &str = "Chat with Coach";
pub const HELP: &str = "Commands: /clear to clear the chat, /quit to exit.";
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the chat? [y/N] ";

type BoxError = Box<dyn Error + Send + Sync>;

pub async fn run_chat(args: ChatArgs) -> Result<(), BoxError> {
    let timeout = (args.request_timeout_secs > 0).then(|| Duration::from_secs(args.request_timeout_secs));
    let transport = HttpRelayClient::new(&args.api_url, timeout)?;
    info!("Relay endpoint: {}", transport.send_url(&args.chat_id));

    let mut controller = ChatController::new(args.chat_id);
    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    run_session(&mut controller, &transport, input, &mut output).await
}

/// Drives one interactive session until `/quit` or end of input.
pub async fn run_session<T, R, W>(
    controller: &mut ChatController,
    transport: &T,
    input: R,
    output: &mut W
) -> Result<(), BoxError>
    where T: RelayTransport + ?Sized, R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin
{
    let mut lines = input.lines();
    write_out(output, &format!("{}\n{}\n\n", TITLE, HELP)).await?;
    write_out(output, &render_conversation(controller.conversation(), false)).await?;

    loop {
        write_out(output, "> ").await?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => {
                break;
            }
        };

        match line.trim() {
            "/quit" | "/exit" => {
                break;
            }
            "/clear" => {
                if controller.conversation().is_empty() {
                    continue;
                }
                write_out(output, CLEAR_PROMPT).await?;
                let answer = lines.next_line().await?.unwrap_or_default();
                if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") && controller.clear() {
                    write_out(output, &render_conversation(controller.conversation(), false)).await?;
                }
            }
            _ => {
                let pending = match controller.begin_send(&line) {
                    Some(p) => p,
                    None => {
                        continue;
                    }
                };
                write_out(output, &render_conversation(controller.conversation(), true)).await?;

                let result = transport.send_message(&pending.chat_id, &pending.request).await;
                match controller.finish_send(result) {
                    Ok(_) => {
                        write_out(output, &render_conversation(controller.conversation(), false)).await?;
                    }
                    Err(e) => {
                        error!("Error sending message: {}", e);
                        write_out(output, &format!("{}\n", FAILURE_NOTICE)).await?;
                        if let Some(detail) = controller.last_failure() {
                            write_out(output, &format!("({})\n", detail)).await?;
                        }
                        write_out(output, &render_conversation(controller.conversation(), false)).await?;
                    }
                }
            }
        }
    }

    Ok(())
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), BoxError> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::render::{ EMPTY_TITLE, TYPING_INDICATOR };
    use crate::error::ClientError;
    use crate::models::chat::Sender;
    use crate::models::wire::{ SendMessageRequest, SendMessageResponse, WireConversation, WireMessage };
    use async_trait::async_trait;

    struct EchoRelay {
        fail: bool,
    }

    #[async_trait]
    impl RelayTransport for EchoRelay {
        async fn send_message(
            &self,
            _chat_id: &str,
            request: &SendMessageRequest
        ) -> Result<SendMessageResponse, ClientError> {
            if self.fail {
                return Err(ClientError::NetworkFailure("connection refused".into()));
            }
            let text = request.message.clone().unwrap_or_default();
            let coach = WireMessage {
                text: format!("you said {}", text),
                sender: Sender::Coach,
                timestamp: "2025-01-01T00:00:02.000Z".into(),
            };
            let mut messages = request.conversation.messages.clone();
            messages.push(WireMessage {
                text,
                sender: Sender::User,
                timestamp: "2025-01-01T00:00:01.000Z".into(),
            });
            messages.push(coach.clone());
            Ok(SendMessageResponse { message: coach, conversation: WireConversation { messages } })
        }
    }

    async fn session(relay: EchoRelay, input: &str) -> (ChatController, String) {
        let mut controller = ChatController::new("default");
        let mut output = Vec::new();
        run_session(&mut controller, &relay, input.as_bytes(), &mut output).await.unwrap();
        (controller, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn sends_and_shows_reply() {
        let (ctl, out) = session(EchoRelay { fail: false }, "hello\n/quit\n").await;
        assert_eq!(ctl.conversation().len(), 2);
        assert!(out.contains(EMPTY_TITLE));
        assert!(out.contains(TYPING_INDICATOR));
        assert!(out.contains("you said hello"));
    }

    #[tokio::test]
    async fn failure_prints_notice_and_keeps_prior_state() {
        let (ctl, out) = session(EchoRelay { fail: true }, "hello\n").await;
        assert!(ctl.conversation().is_empty());
        assert!(out.contains(FAILURE_NOTICE));
        assert!(out.contains("connection refused"));
    }

    #[tokio::test]
    async fn clear_requires_confirmation() {
        let (ctl, _) = session(EchoRelay { fail: false }, "hello\n/clear\nn\n").await;
        assert_eq!(ctl.conversation().len(), 2);

        let (ctl, out) = session(EchoRelay { fail: false }, "hello\n/clear\ny\n").await;
        assert!(ctl.conversation().is_empty());
        assert!(out.contains(CLEAR_PROMPT));
    }

    #[tokio::test]
    async fn blank_lines_are_ignored() {
        let (ctl, out) = session(EchoRelay { fail: false }, "   \n\n").await;
        assert!(ctl.conversation().is_empty());
        assert!(!out.contains(TYPING_INDICATOR));
    }
}
