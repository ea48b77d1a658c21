//! Shared utilities for the integration tests.

use assert_cmd::Command;
use image::{ImageBuffer, Rgb};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An empty project root in a temp directory.
#[allow(dead_code)]
pub struct TestProject {
    root: TempDir,
}

#[allow(dead_code)]
impl TestProject {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for the `postpress` binary pointed at this project.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("postpress").expect("Failed to locate postpress binary");
        cmd.arg("--root").arg(self.path()).env_remove("RUST_LOG");
        cmd
    }

    /// Write a gradient source image outside the project trees.
    pub fn image(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let dir = self.path().join("sources");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        write_image(&path, width, height);
        path
    }

    pub fn preview_html(&self) -> String {
        fs::read_to_string(self.path().join("temp/post.html")).unwrap()
    }

    pub fn export_html(&self) -> String {
        fs::read_to_string(self.path().join("exp/post/post.html")).unwrap()
    }

    /// Run `postpress start` with fixed metadata and a 2000x1000 header.
    pub fn start_post(&self) {
        let header = self.image("header.jpg", 2000, 1000);
        self.cli()
            .args([
                "start",
                "--page-title",
                "Balade",
                "--title",
                "Le port",
                "--subtitle",
                "Un matin",
                "--author",
                "Camille",
                "--date",
                "17/10/26",
                "--header",
            ])
            .arg(header)
            .assert()
            .success();
    }
}

/// Write a gradient image; the format follows the extension of `path`.
pub fn write_image(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    img.save(path).unwrap();
}
