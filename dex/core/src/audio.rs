//! Audio Playback
//!
//! Cries are played by handing the clip URL to an external player process.
//! Every call starts a fresh player; nothing waits on it and nothing reports
//! back. A bad URL or a missing player binary only shows up in the debug log.

use std::process::Stdio;

use tokio::process::Command;

/// Default external player: ffplay without a window, exiting at end of clip
pub const DEFAULT_PLAYER_COMMAND: &[&str] = &["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"];

/// Fire-and-forget audio player
pub trait AudioPlayer: Send {
    /// Start playing the clip at `url`
    fn play(&self, url: &str);
}

impl<P: AudioPlayer + ?Sized> AudioPlayer for Box<P> {
    fn play(&self, url: &str) {
        (**self).play(url);
    }
}

/// Plays clips by spawning an external command with the URL appended
#[derive(Clone, Debug)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    /// Build a player from a command line (`program arg...`)
    ///
    /// Returns `None` for an empty command.
    #[must_use]
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The program that gets spawned
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command_for(&self, url: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        let (program, args) = DEFAULT_PLAYER_COMMAND
            .split_first()
            .map_or(("ffplay", &[][..]), |(p, a)| (*p, a));
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&self, url: &str) {
        match self.command_for(url).spawn() {
            Ok(mut child) => {
                tracing::debug!(program = %self.program, url, "Started audio player");
                // Reap the child so it does not linger as a zombie
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if !status.success() => {
                            tracing::debug!(%status, "Audio player exited with failure");
                        }
                        Err(e) => tracing::debug!(error = %e, "Audio player wait failed"),
                        Ok(_) => {}
                    }
                });
            }
            Err(e) => {
                tracing::debug!(program = %self.program, error = %e, "Could not start audio player");
            }
        }
    }
}

/// Player that never makes a sound
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn play(&self, url: &str) {
        tracing::trace!(url, "Audio muted");
    }
}
