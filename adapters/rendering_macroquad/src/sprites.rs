use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::{
    color::WHITE,
    math::{Rect as MacroquadRect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, Texture2D},
};
use raven_hunt_core::{Rect, SoundCue, SpriteKey};
use serde::Deserialize;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Cache of sprite sheets loaded from the asset manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
    sounds: Vec<(SoundCue, PathBuf)>,
}

impl SpriteAtlas {
    /// Loads every sprite listed in the manifest at `path`.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Copies `source` from the sheet into `destination`, scaling to fit.
    pub(crate) fn draw(&self, key: SpriteKey, source: Rect, destination: Rect) -> Result<()> {
        let texture = *self
            .textures
            .get(&key)
            .with_context(|| format!("sprite {key:?} missing from atlas"))?;

        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(destination.width, destination.height)),
            source: Some(MacroquadRect::new(
                source.x,
                source.y,
                source.width,
                source.height,
            )),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(texture, destination.x, destination.y, WHITE, params);
        Ok(())
    }

    /// Sound files listed alongside the sprites, in canonical cue order.
    pub(crate) fn sounds(&self) -> &[(SoundCue, PathBuf)] {
        &self.sounds
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read asset manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let manifest = parse_manifest(&contents, &base)?;
        Self::from_entries(manifest, &mut loader)
    }

    fn from_entries(
        manifest: ResolvedManifest,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(manifest.sprites.len());
        for (key, path) in manifest.sprites {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self {
            textures,
            sounds: manifest.sounds,
        })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
    #[serde(default)]
    sounds: HashMap<String, String>,
}

#[derive(Debug, PartialEq)]
struct ResolvedManifest {
    sprites: Vec<(SpriteKey, PathBuf)>,
    sounds: Vec<(SoundCue, PathBuf)>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<ResolvedManifest> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut sprites = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        if sprites.insert(key, base_path.join(relative_path)).is_some() {
            bail!("asset manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = sprites.remove(&key) else {
            bail!("asset manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    let mut sounds = HashMap::new();
    for (name, relative_path) in manifest.sounds {
        let cue = parse_sound_cue(&name)
            .with_context(|| format!("unknown sound cue `{name}` in manifest"))?;
        let _ = sounds.insert(cue, base_path.join(relative_path));
    }
    let sounds = SoundCue::ALL
        .into_iter()
        .filter_map(|cue| sounds.remove(&cue).map(|path| (cue, path)))
        .collect();

    Ok(ResolvedManifest {
        sprites: ordered,
        sounds,
    })
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "Target" => Ok(SpriteKey::Target),
        "Burst" => Ok(SpriteKey::Burst),
        _ => bail!("unknown sprite key `{name}`"),
    }
}

fn parse_sound_cue(name: &str) -> Result<SoundCue> {
    match name {
        "Burst" => Ok(SoundCue::Burst),
        "GameOver" => Ok(SoundCue::GameOver),
        _ => bail!("unknown sound cue `{name}`"),
    }
}
