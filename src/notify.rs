//! Completion sound, best effort: a missing player or sound file is only logged.

use crate::args;
use crate::platform::Tool;
use crate::tool_resolver::ToolPathResolver;
use crate::toolbox::run_tool;
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

/// Arguments for the sound player found at `player`
fn player_args(player: &Path) -> Option<Vec<OsString>> {
    let name = player.file_stem()?.to_str()?.to_ascii_lowercase();
    let args = match name.as_str() {
        "afplay" => args!["/System/Library/Sounds/Glass.aiff"],
        "powershell" => args![
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            "[System.Media.SystemSounds]::Asterisk.Play()"
        ],
        "paplay" => args!["/usr/share/sounds/freedesktop/stereo/complete.oga"],
        "canberra-gtk-play" => args!["-i", "complete"],
        "aplay" => args!["-q", "/usr/share/sounds/alsa/Front_Center.wav"],
        _ => return None,
    };
    Some(args)
}

/// Play the "batch finished" sound
pub async fn play_completion_sound(resolver: &ToolPathResolver) {
    let Some(player) = resolver.resolve(Tool::SoundPlayer) else {
        debug!("No sound player available");
        return;
    };
    let Some(args) = player_args(&player) else {
        debug!("Unknown sound player {}", player.display());
        return;
    };

    if let Err(e) = run_tool(Tool::SoundPlayer, &player, &args).await {
        debug!("Completion sound failed: {}", e);
    }
}
