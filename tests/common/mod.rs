#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use camgallery::config::AppConfig;
use camgallery::gallery::Photo;
use camgallery::server::{self, AppState};
use reqwest::StatusCode;
use tempfile::TempDir;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    static_dir: TempDir,
}

impl TestServer {
    /// Serve a fresh static tree on an unused port. `seed` runs before the
    /// indexes are loaded so it can lay out files on disk.
    pub async fn start_with(seed: impl FnOnce(&Path)) -> Result<Self> {
        let static_dir = tempfile::tempdir().context("failed to create static dir")?;
        seed(static_dir.path());

        let state = AppState::open(static_dir.path(), &static_dir.path().join("settings.json"))?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let config = AppConfig::from_env().server;
        let served = state.clone();
        tokio::spawn(async move {
            if let Err(e) = server::serve(listener, served, &config).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        let server = Self {
            port,
            base_url,
            state,
            static_dir,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    pub async fn start() -> Result<Self> {
        Self::start_with(|_| {}).await
    }

    pub fn url(&self) -> reqwest::Url {
        reqwest::Url::parse(&self.base_url).expect("valid base url")
    }

    pub fn static_path(&self) -> &Path {
        self.static_dir.path()
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.static_dir.path().join("photos")
    }

    pub fn timelapses_dir(&self) -> PathBuf {
        self.static_dir.path().join("timelapses")
    }

    /// Write a JPG (and optionally a DNG) plus its thumbnail and register the photo.
    pub async fn add_photo(&self, name: &str, capture_date: &str, with_dng: bool) -> Result<()> {
        let photos_dir = self.photos_dir();
        fs::write(photos_dir.join(format!("{}.jpg", name)), b"jpeg")?;
        fs::write(photos_dir.join("thumbnails").join(format!("{}.jpg", name)), b"thumb")?;
        if with_dng {
            fs::write(photos_dir.join(format!("{}.dng", name)), b"raw")?;
        }

        self.state.photos.write().await.add(Photo {
            name: name.to_string(),
            iso: 100_i64.into(),
            speed: 8000_i64.into(),
            exposure_time: "1/125s".to_string(),
            white_balance: "Day".to_string(),
            capture_date: capture_date.to_string(),
            jpg_path: Some(format!("{}.jpg", name)),
            dng_path: with_dng.then(|| format!("{}.dng", name)),
        })?;
        Ok(())
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Lay out a timelapse folder with `frames` JPGs and matching thumbnails.
pub fn seed_timelapse(static_dir: &Path, timelapse: &str, frames: u32) {
    let dir = static_dir.join("timelapses").join(timelapse);
    fs::create_dir_all(dir.join("tmp")).expect("create timelapse dir");
    fs::write(dir.join("tmp").join("ref.jpg"), b"ref").expect("write reference");
    for n in 1..=frames {
        let name = format!("tl_{}_2024-05-01_21-00-00_ISO_100_1-60s.jpg", n);
        fs::write(dir.join(&name), b"jpeg").expect("write frame");
        fs::write(dir.join("tmp").join(&name), b"thumb").expect("write thumbnail");
    }
}
