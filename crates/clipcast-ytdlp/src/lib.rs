// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `yt-dlp` video source adapter.
//!
//! Implements [`VideoSource`] by shelling out to the `yt-dlp` executable.
//! The final output path is taken from `--print after_move:filepath`, which
//! reflects post-processing moves, and is verified to exist on disk before
//! success is reported. A reported path that is not present on storage is a
//! failure, never a silent success.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clipcast_core::{ClipcastError, VideoSource};
use tracing::{debug, info, warn};

/// Preferred format chain: mp4 video + m4a audio, falling back to best mp4,
/// then best available.
const FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Video source backed by the `yt-dlp` command-line tool.
pub struct YtDlpSource {
    bin: String,
    videos_dir: PathBuf,
}

impl YtDlpSource {
    /// Creates a source that downloads into `videos_dir` using the given
    /// `yt-dlp` executable (name or path).
    pub fn new(bin: impl Into<String>, videos_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            videos_dir: videos_dir.into(),
        }
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn acquire(&self, url: &str) -> Result<PathBuf, ClipcastError> {
        // Re-ensure the directory right before download; it may have been
        // removed since startup.
        tokio::fs::create_dir_all(&self.videos_dir)
            .await
            .map_err(|e| ClipcastError::Acquire {
                message: format!("failed to create {}", self.videos_dir.display()),
                source: Some(Box::new(e)),
            })?;

        let template = self.videos_dir.join("%(title)s.%(ext)s");
        debug!(url, bin = %self.bin, "invoking yt-dlp");

        let output = tokio::process::Command::new(&self.bin)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("--restrict-filenames")
            .arg("--format")
            .arg(FORMAT)
            .arg("--recode-video")
            .arg("mp4")
            .arg("--no-simulate")
            .arg("--print")
            .arg("after_move:filepath")
            .arg("--output")
            .arg(&template)
            .arg(url)
            .output()
            .await
            .map_err(|e| ClipcastError::Acquire {
                message: format!("failed to execute {}", self.bin),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(url, exit = ?output.status.code(), "yt-dlp failed");
            return Err(ClipcastError::Acquire {
                message: format!(
                    "yt-dlp exited with {:?}: {}",
                    output.status.code(),
                    last_line(&stderr).unwrap_or("no diagnostic output")
                ),
                source: None,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = last_line(&stdout).ok_or_else(|| ClipcastError::Acquire {
            message: format!("yt-dlp reported no output path for {url}"),
            source: None,
        })?;

        let path = PathBuf::from(reported);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                info!(url, path = %path.display(), "video downloaded");
                Ok(path)
            }
            _ => Err(ClipcastError::Acquire {
                message: format!(
                    "yt-dlp reported {} but the file is not present",
                    path.display()
                ),
                source: None,
            }),
        }
    }
}

/// Last non-empty line of process output.
fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).next_back()
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable stand-in for yt-dlp into `dir`.
    fn fake_ytdlp(dir: &Path, script_body: &str) -> String {
        let path = dir.join("fake-yt-dlp");
        std::fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn acquire_returns_path_printed_by_tool() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("v.mp4");
        let bin = fake_ytdlp(
            dir.path(),
            &format!(": > \"{0}\"\necho \"{0}\"", out.display()),
        );
        let source = YtDlpSource::new(bin, dir.path().join("videos"));

        let path = source.acquire("https://tiktok.com/@a/video/1").await.unwrap();
        assert_eq!(path, out);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_ytdlp(dir.path(), "echo 'ERROR: unsupported url' >&2\nexit 1");
        let source = YtDlpSource::new(bin, dir.path().join("videos"));

        let err = source.acquire("https://tiktok.com/@a/video/1").await.unwrap_err();
        assert!(matches!(err, ClipcastError::Acquire { .. }));
        assert!(err.to_string().contains("unsupported url"));
    }

    #[tokio::test]
    async fn reported_but_missing_file_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ghost = dir.path().join("ghost.mp4");
        let bin = fake_ytdlp(dir.path(), &format!("echo \"{}\"", ghost.display()));
        let source = YtDlpSource::new(bin, dir.path().join("videos"));

        let err = source.acquire("https://tiktok.com/@a/video/1").await.unwrap_err();
        assert!(err.to_string().contains("not present"));
    }

    #[tokio::test]
    async fn empty_output_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_ytdlp(dir.path(), "exit 0");
        let source = YtDlpSource::new(bin, dir.path().join("videos"));

        let err = source.acquire("https://tiktok.com/@a/video/1").await.unwrap_err();
        assert!(err.to_string().contains("no output path"));
    }

    #[tokio::test]
    async fn missing_binary_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = YtDlpSource::new("/nonexistent/yt-dlp", dir.path().join("videos"));
        let err = source.acquire("https://tiktok.com/@a/video/1").await.unwrap_err();
        assert!(matches!(err, ClipcastError::Acquire { .. }));
    }

    #[test]
    fn last_line_skips_blank_tail() {
        assert_eq!(last_line("a\nb\n\n"), Some("b"));
        assert_eq!(last_line("\n  \n"), None);
    }
}
