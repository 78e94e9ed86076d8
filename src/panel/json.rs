use anyhow::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::{PanelEnd, ViewDocument, ViewMessage};

/// Panel driven by an editor host speaking JSON lines.
///
/// Each input line is one [`ViewMessage`]; each [`ViewDocument`] is written as
/// one output line. Lines that do not parse are logged and skipped.
pub async fn run<W>(mut input: mpsc::Receiver<String>, mut output: W, mut end: PanelEnd) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut input_open = true;

    loop {
        tokio::select! {
            document = end.documents.recv() => {
                let Some(document) = document else { break };
                write_document(&mut output, &document).await?;
            }
            line = input.recv(), if input_open => {
                match line {
                    Some(line) => {
                        if let Some(message) = parse_message(&line) {
                            if end.messages.send(message).await.is_err() {
                                break;
                            }
                        }
                    }
                    None => {
                        // Host closed its side; flush whatever the session still sends.
                        input_open = false;
                        end.messages = closed_sender();
                    }
                }
            }
        }
    }

    output.flush().await?;
    Ok(())
}

pub fn parse_message(line: &str) -> Option<ViewMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!("ignoring panel message {:?}: {}", line, e);
            None
        }
    }
}

async fn write_document<W: AsyncWrite + Unpin>(output: &mut W, document: &ViewDocument) -> Result<()> {
    let mut line = serde_json::to_string(document)?;
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Sender whose receiver is already gone, so the session sees the panel hang up.
fn closed_sender() -> tokio::sync::mpsc::Sender<ViewMessage> {
    let (tx, _) = tokio::sync::mpsc::channel(1);
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::channel;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_message_skips_noise() {
        assert_eq!(parse_message("   "), None);
        assert_eq!(parse_message("{not json"), None);
        assert_eq!(
            parse_message(r#"{"type":"showDetail","hash":"abc"}"#),
            Some(ViewMessage::ShowDetail { hash: "abc".into() })
        );
    }

    #[tokio::test]
    async fn test_forwards_messages_and_writes_documents() {
        let (mut handle, end) = channel();
        let (input_tx, input) = mpsc::channel(4);
        input_tx
            .send(r#"{"type":"showDetail","hash":"h1"}"#.to_string())
            .await
            .unwrap();
        drop(input_tx);
        let mut output = Vec::new();

        let session = async move {
            let message = handle.messages.recv().await;
            handle
                .documents
                .send(ViewDocument::Error {
                    kind: crate::panel::ErrorKind::Vcs,
                    message: "boom".into(),
                    remediation: None,
                })
                .await
                .unwrap();
            message
        };

        let (panel_result, message) = tokio::join!(run(input, &mut output, end), session);
        panel_result.unwrap();

        assert_eq!(message, Some(ViewMessage::ShowDetail { hash: "h1".into() }));
        let written = String::from_utf8(output).unwrap();
        let document: ViewDocument = serde_json::from_str(written.trim()).unwrap();
        assert!(matches!(document, ViewDocument::Error { message, .. } if message == "boom"));
    }
}
