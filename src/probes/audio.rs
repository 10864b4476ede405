use super::Env;
use crate::errors::ProbeError;
use tokio::time;

/// Speak the test phrase through the configured engine.
pub async fn run(env: &mut Env<'_>) -> Result<(), ProbeError> {
    env.printer.blank()?;
    env.printer.line("Testing audio functionality...")?;
    let audio = &env.config.audio;
    let tool = audio.tool();
    tool.check()?;
    match &audio.say {
        Some(_) => env.printer.pass("Custom TTS command found")?,
        None => env
            .printer
            .pass(format!("TTS engine {} found", audio.engine.name()))?,
    }

    env.printer.line(format!(
        "Testing TTS (you should hear '{}')...",
        audio.phrase
    ))?;
    tool.run(&audio.phrase, audio.timeout()).await?;
    time::sleep(audio.settle_time()).await;
    env.printer.pass("TTS test completed")?;
    Ok(())
}
