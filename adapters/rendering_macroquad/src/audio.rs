use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use macroquad::audio::{self, Sound};
use raven_hunt_core::SoundCue;

/// One-shot sound effects keyed by cue.
#[derive(Default)]
pub(crate) struct SoundBank {
    sounds: HashMap<SoundCue, Sound>,
}

impl SoundBank {
    /// Decodes every listed sound file.
    pub(crate) async fn load(entries: &[(SoundCue, PathBuf)]) -> Result<Self> {
        let mut sounds = HashMap::with_capacity(entries.len());
        for (cue, path) in entries {
            let bytes = fs::read(path)
                .with_context(|| format!("failed to read sound asset at {}", path.display()))?;
            let sound = audio::load_sound_from_bytes(&bytes)
                .await
                .map_err(|error| anyhow!("{error:?}"))
                .with_context(|| format!("failed to decode sound {cue:?}"))?;
            let _ = sounds.insert(*cue, sound);
        }
        Ok(Self { sounds })
    }

    /// Fires the cue without waiting for it to finish.
    pub(crate) fn play(&self, cue: SoundCue) {
        if let Some(sound) = self.sounds.get(&cue) {
            audio::play_sound_once(*sound);
        }
    }
}
