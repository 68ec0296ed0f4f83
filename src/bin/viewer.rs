//! Terminal viewer
//!
//! Connects to a pixelboard hub, keeps a local mirror of the canvas,
//! and places pixels from stdin commands.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixelboard_rs::canvas::Color;
use pixelboard_rs::error::PixelboardError;
use pixelboard_rs::viewer::{Redraw, ViewerClient};
use pixelboard_rs::websocket::ServerMessage;

const DEFAULT_URL: &str = "ws://127.0.0.1:3000/ws";

enum Command {
    Place { x: i64, y: i64, color: Color },
    Get { x: u32, y: u32 },
    Size,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["/place", x, y, color] => Some(Command::Place {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
            color: color.parse().ok()?,
        }),
        ["/get", x, y] => Some(Command::Get {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        }),
        ["/size"] => Some(Command::Size),
        ["/quit"] => Some(Command::Quit),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), PixelboardError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelboard_rs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());

    println!("🔌 Connecting to {}...", url);
    let mut client = ViewerClient::connect(&url).await?;
    println!("✅ Connected\n");
    println!("📝 Commands:");
    println!("   /place <x> <y> <#RRGGBB> - Paint a cell");
    println!("   /get <x> <y>             - Show a cell from the local mirror");
    println!("   /size                    - Show canvas dimensions");
    println!("   /quit                    - Exit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = client.next_event() => {
                match event {
                    Ok(ServerMessage::FullCanvas(grid)) => {
                        println!("🖼  Snapshot received: {}x{}", grid.width(), grid.height());
                    }
                    Ok(ServerMessage::PixelUpdate(edit)) => {
                        println!("🎨 ({}, {}) = {}", edit.x, edit.y, edit.color);
                    }
                    Err(PixelboardError::ConnectionClosed) => {
                        println!("\n🔌 Hub closed the connection");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                }
                // The terminal has nothing to repaint; drain so cells don't accumulate
                if let Redraw::Cells(cells) = client.mirror_mut().take_redraw() {
                    tracing::trace!("{} cells changed", cells.len());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match parse_command(line) {
                    Some(Command::Place { x, y, color }) => {
                        if !client.place(x, y, color).await? {
                            println!("⚠️  ({}, {}) is outside the canvas", x, y);
                        }
                    }
                    Some(Command::Get { x, y }) => match client.mirror().get(x, y) {
                        Some(color) => println!("({}, {}) = {}", x, y, color),
                        None => println!("⚠️  ({}, {}) is outside the canvas", x, y),
                    },
                    Some(Command::Size) => match client.mirror().dimensions() {
                        Some((w, h)) => println!("Canvas is {}x{}", w, h),
                        None => println!("No snapshot yet"),
                    },
                    Some(Command::Quit) => break,
                    None => println!("❓ Unknown command: {}", line),
                }
            }
        }
    }

    client.close().await
}
