//! Icon resolver - Maps tokens to pre-rendered icons at query time

use once_cell::unsync::OnceCell;
use std::path::PathBuf;

use crate::core::model::IconRef;
use crate::icons::raster::icon_path;
use crate::store::Token;

pub struct IconResolver {
    images_dir: PathBuf,
    mono_icon: PathBuf,
    /// Shared icon for non-color tokens, looked up once
    mono: OnceCell<IconRef>,
}

impl IconResolver {
    pub fn new(images_dir: impl Into<PathBuf>, mono_icon: &str) -> Self {
        let images_dir = images_dir.into();
        Self {
            mono_icon: images_dir.join(mono_icon),
            images_dir,
            mono: OnceCell::new(),
        }
    }

    pub fn resolve(&self, token: &Token) -> IconRef {
        if token.is_color_like {
            existing_or_default(icon_path(&self.images_dir, &token.name))
        } else {
            self.mono
                .get_or_init(|| existing_or_default(self.mono_icon.clone()))
                .clone()
        }
    }
}

fn existing_or_default(path: PathBuf) -> IconRef {
    if path.is_file() {
        IconRef::path(path)
    } else {
        IconRef::default_marker()
    }
}
