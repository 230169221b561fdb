use anyhow::{Context, Result};
use std::path::Path;

use curio_web::Config;

const CONFIG_TEMPLATE: &str = r#"# curio configuration
#
# The API key is read from the provider's environment variable by default:
#   GROQ_API_KEY, OPENAI_API_KEY, OPENROUTER_API_KEY, ...
# You can also set it directly in this file (not recommended).
#
# Every value can be overridden with CURIO_<SECTION>__<KEY>, e.g.
#   CURIO_LLM__MODEL=openai/gpt-4o-mini

[server]
bind = "127.0.0.1:8501"

[llm]
# provider/model; known providers: groq, openai, ollama, openrouter, together, mistral
model = "groq/llama3-70b-8192"
temperature = 0.2
# api_key = "gsk_..."             # or set GROQ_API_KEY
# base_url = "http://localhost:8080/v1"
# request_timeout_secs = 120
# max_tokens = 4096

# ── Persona ──────────────────────────────────────────────────────
# Uncomment to replace parts of the researcher persona.

[agent]
# role = "Personalized Content Researcher"
# goal = "..."
# backstory = "..."
"#;

pub fn run() -> Result<()> {
    let config_dir = Config::config_dir()?;
    let config_path = config_dir.join("config.toml");

    // Create directory if needed
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

    if config_path.exists() {
        println!("Existing config file found:\n  {}", config_path.display());
        print!("\nOverwrite? (The existing file will be backed up) [y/N] ");

        // Flush stdout so the prompt appears before reading
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }

        backup_file(&config_path)?;
    }

    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());

    println!("\nNext steps:");
    println!("  1. Set your API key:  export GROQ_API_KEY=\"gsk_...\"");
    println!("  2. Start the web UI:  curio serve");
    println!("  3. Or run one query:  curio -q \"best travel destinations in europe\"");

    Ok(())
}

/// Back up a file to <name>.bak, appending a timestamp if .bak already exists.
fn backup_file(path: &Path) -> Result<()> {
    let mut backup = path.with_extension("toml.bak");

    if backup.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let name = format!("toml.bak.{}", timestamp);
        backup = path.with_extension(name);
    }

    std::fs::rename(path, &backup)
        .with_context(|| format!("Failed to back up {} to {}", path.display(), backup.display()))?;
    println!("  Backed up to {}", backup.display());

    Ok(())
}
