// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The demo scene's asset list.

use marquee_core::asset::{
    AssetRequest, DuplicateKeyError, Manifest, SpritesheetOptions, VideoLoadEvent, VideoOptions,
};

/// Where the demo scene's assets live, relative to the working directory.
pub const DEFAULT_ASSET_DIR: &str = "./assets/";

/// Builds the manifest of the demo scene.
pub fn scene_manifest() -> Result<Manifest, DuplicateKeyError> {
    let mut manifest = Manifest::new();

    for (key, url) in [
        ("colorsquare", "colorsquare.png"),
        ("fastboy", "fastboy.png"),
        ("parallaxSky", "parallaxSky.png"),
        ("parallaxMountains", "parallaxMountains.png"),
        ("parallaxTreeline", "parallaxTreeline.png"),
        ("squarepattern", "squarepattern.png"),
        ("colorwaves", "colorwaves.jpeg"),
    ] {
        manifest.add(AssetRequest::image(key, url))?;
    }

    manifest.add(AssetRequest::spritesheet(
        "pinkhover",
        "pinkhover.png",
        SpritesheetOptions::new(100, 100).with_end_frame(7),
    ))?;
    manifest.add(AssetRequest::atlas(
        "fruitandveg",
        "fruitandveg.png",
        "fruitandveg.json",
    ))?;

    manifest.add(AssetRequest::audio("jumpSFX", "jumpSFX.wav"))?;
    manifest.add(AssetRequest::audio("rail", "railonnines.mp3"))?;

    manifest.add(AssetRequest::video(
        "hypnotic",
        "hypnotic.mp4",
        VideoOptions {
            mime: None,
            load_event: VideoLoadEvent::LoadedData,
            as_blob: false,
            no_audio: true,
        },
    ))?;

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_io::ManifestFile;

    #[test]
    fn scene_file_declares_the_built_in_scene() {
        let file = ManifestFile::from_ron_str(include_str!("../assets/scene.ron")).unwrap();
        let from_file = file.into_manifest().unwrap();
        let built_in = scene_manifest().unwrap();

        assert_eq!(from_file.entries(), built_in.entries());
    }
}
