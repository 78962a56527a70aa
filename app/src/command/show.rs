use std::path::PathBuf;

use pngcard_config::Config;
use pngcard_core::CardRecord;
use pngcard_decode::CardDecoder;
use pngcard_extract::discover::path_identity;

use super::build_extractor;

/// Input parameters for the Show command strategy.
#[derive(Debug, Clone)]
pub struct ShowInput {
    pub file: PathBuf,
    /// 1-based greeting index; out of range shows the first greeting.
    pub greeting: usize,
    pub json: bool,
}

/// Strategy for printing a single card.
#[derive(Debug, Clone, Copy)]
pub struct ShowStrategy;

impl super::CommandStrategy for ShowStrategy {
    type Input = ShowInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        if !input.file.is_file() {
            anyhow::bail!("Not a file: {}", input.file.display());
        }

        let extractor = build_extractor(&config.extractor);
        let Some(payload) = extractor.extract_single(&input.file).await else {
            println!("No character card found in {}", input.file.display());
            return Ok(());
        };

        let decoder = CardDecoder::new();
        let Some(card) = decoder.decode(&payload, &path_identity(&input.file)) else {
            println!("Could not decode the card in {}", input.file.display());
            return Ok(());
        };

        if input.json {
            println!("{}", serde_json::to_string_pretty(card.as_ref())?);
        } else {
            print!("{}", render_card(&card, input.greeting));
        }
        Ok(())
    }
}

fn render_card(card: &CardRecord, greeting: usize) -> String {
    let count = card.greeting_count();
    let shown = if (1..=count).contains(&greeting) {
        greeting
    } else {
        1
    };

    let mut out = format!("Name: {}\n", card.name());
    if !card.tags().is_empty() {
        out.push_str(&format!("Tags: {}\n", card.tags().join(", ")));
    }
    for (label, text) in [
        ("Description", card.description()),
        ("Personality", card.personality()),
        ("Scenario", card.scenario()),
    ] {
        if !text.is_empty() {
            out.push_str(&format!("\n{label}:\n{text}\n"));
        }
    }
    out.push_str(&format!(
        "\nGreeting {shown}/{count}:\n{}\n",
        card.greeting(shown - 1)
    ));
    out
}
