#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::bail;
use cgmath::{Matrix4, Point3};
use zoo_ngin::audio::AudioBackend;

/// Records what would have been played; clips listed as missing fail to load.
#[derive(Default)]
pub(crate) struct MockBackend {
    missing: Vec<PathBuf>,
    pub fail_play: bool,
    started: Vec<PathBuf>,
    playing: Vec<bool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(paths: &[&str]) -> Self {
        Self {
            missing: paths.iter().map(PathBuf::from).collect(),
            ..Default::default()
        }
    }

    pub fn started(&self) -> &[PathBuf] {
        &self.started
    }

    pub fn play_count(&self) -> usize {
        self.started.len()
    }

    /// Every voice reaches the end of its clip.
    pub fn finish_all(&mut self) {
        self.playing.iter_mut().for_each(|playing| *playing = false);
    }
}

impl AudioBackend for MockBackend {
    type Clip = PathBuf;
    type Voice = usize;

    fn load(&mut self, path: &Path) -> anyhow::Result<PathBuf> {
        if self.missing.iter().any(|missing| missing == path) {
            bail!("{} does not exist", path.display());
        }
        Ok(path.to_path_buf())
    }

    fn play(&mut self, clip: &PathBuf) -> anyhow::Result<usize> {
        if self.fail_play {
            bail!("output device went away");
        }
        self.started.push(clip.clone());
        self.playing.push(true);
        Ok(self.playing.len() - 1)
    }

    fn is_playing(&self, voice: &usize) -> bool {
        self.playing.get(*voice).copied().unwrap_or(false)
    }
}

pub(crate) fn point(x: f32, y: f32, z: f32) -> Point3<f32> {
    Point3::new(x, y, z)
}

pub(crate) fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let actual: [[f32; 4]; 4] = actual.into();
    let expected: [[f32; 4]; 4] = expected.into();
    for (c, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        for r in 0..4 {
            assert!(
                (a[r] - e[r]).abs() < 1e-4,
                "matrices differ at column {c}, row {r}: {actual:?} vs {expected:?}"
            );
        }
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}
