//! Basic Gemini client usage example

use gemini_client::{GeminiClient, Tool};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment
    let client = GeminiClient::from_env()?;

    // Single-shot generation
    println!("=== Generate ===");
    let text = client
        .generate_text("gemini-2.5-flash", "What is Rust in one sentence?")
        .await?;
    println!("Response: {}", text);

    // Grounded multi-turn chat
    println!("\n=== Chat ===");
    let mut chat = client
        .chat("gemini-2.5-flash")
        .tool(Tool::google_maps())
        .build();

    let first = chat
        .send_message("Name two bakeries in Duluth, MN. One line each.")
        .await?;
    println!("{}", first);

    let second = chat.send_message("Two more, not the ones above.").await?;
    println!("{}", second);

    Ok(())
}
