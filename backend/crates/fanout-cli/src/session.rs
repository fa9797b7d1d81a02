use crate::{ClientResult, InputLine, parse_line};

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_tungstenite::tungstenite::{self, Message};

const PROMPT: &str = "Enter message to send (or 'quit' to exit): ";

/// Run the interactive loop until `quit`, end of input, or a dead connection.
///
/// Every non-empty trimmed input line goes out as one text frame. Every frame
/// the relay pushes is written to `output`.
pub async fn run_session<S, R, W>(ws: S, input: R, mut output: W) -> ClientResult<()>
where
    S: Stream<Item = Result<Message, tungstenite::Error>>
        + Sink<Message, Error = tungstenite::Error>
        + Unpin,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (mut ws_sender, mut ws_receiver) = ws.split();
    let mut lines = input.lines();

    write_out(&mut output, PROMPT).await?;

    loop {
        tokio::select! {
            frame = ws_receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    write_out(&mut output, &format!("\nReceived: {}\n", text.as_str())).await?;
                    write_out(&mut output, PROMPT).await?;
                }
                Some(Ok(Message::Binary(data))) => {
                    let text = String::from_utf8_lossy(&data);
                    write_out(&mut output, &format!("\nReceived: {}\n", text)).await?;
                    write_out(&mut output, PROMPT).await?;
                }
                Some(Ok(Message::Close(_))) | None => {
                    write_out(&mut output, "\nConnection closed by server\n").await?;
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match parse_line(&line) {
                    InputLine::Quit => break,
                    InputLine::Skip => {}
                    InputLine::Send(text) => ws_sender.send(Message::text(text)).await?,
                }
                write_out(&mut output, PROMPT).await?;
            }
        }
    }

    // Best effort: the relay unregisters us either way
    let _ = ws_sender.send(Message::Close(None)).await;
    let _ = ws_sender.close().await;

    Ok(())
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> ClientResult<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
