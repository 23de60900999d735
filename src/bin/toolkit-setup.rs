//! Interactive environment setup

use chat_toolkit::setup::catalog::DOT_ENV_FILE_PATH;
use chat_toolkit::setup::env_file::EnvFile;
use chat_toolkit::setup::prompter::TerminalPrompter;
use chat_toolkit::setup::wizard::Wizard;
use tracing_subscriber::filter::LevelFilter;

fn main() -> anyhow::Result<()> {
    // prompts own the terminal, only surface problems
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::WARN)
        .init();

    let mut wizard = Wizard::new(TerminalPrompter::new(), EnvFile::new(DOT_ENV_FILE_PATH));
    wizard.run()?;

    Ok(())
}
