//! Shared test harness for integration tests.
//!
//! [`TestHarness`] indexes a small set of bilingual ASS fixtures into an
//! in-memory database and can serve the full router on a random port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use subseek_core::config::Config;
use subseek_db::pool::{init_memory_pool, DbPool};
use subseek_server::context::AppContext;
use subseek_server::router::build_router;
use tempfile::TempDir;

/// Fixture subtitle files: (file name, dialogue lines as (zh, en)).
pub const FIXTURES: &[(&str, &[(&str, &str)])] = &[
    (
        "Young.Sheldon.S01E01.ass",
        &[
            ("我们今天去公园", "We are going to the park today"),
            ("你好，谢尔顿", "Hello, Sheldon"),
            ("再见", "Goodbye"),
        ],
    ),
    (
        "Young.Sheldon.S01E02.ass",
        &[("公园关门了", "The park is closed"), ("真遗憾", "What a pity")],
    ),
    (
        "Young.Sheldon.S02E05.ass",
        &[("你好，妈妈", "Hello, Mom")],
    ),
    ("notes.ass", &[("没有集数", "No episode tag")]),
];

pub fn ass_script(lines: &[(&str, &str)]) -> String {
    let mut script = String::from(
        "[Script Info]\nTitle: fixture\n\n[Events]\n\
         Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
    );
    for (i, (zh, en)) in lines.iter().enumerate() {
        script.push_str(&format!(
            "Dialogue: 0,0:00:{:02}.00,0:00:{:02}.50,Default,,0,0,0,,{zh}\\N{en}\r\n",
            i * 2 + 1,
            i * 2 + 2,
        ));
    }
    script
}

/// Write every fixture into `dir`.
pub fn write_fixtures(dir: &Path) {
    std::fs::create_dir_all(dir).expect("create fixture dir");
    for (name, lines) in FIXTURES {
        std::fs::write(dir.join(name), ass_script(lines)).expect("write fixture");
    }
}

pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub root: TempDir,
}

impl TestHarness {
    /// Index the fixtures into a fresh in-memory database.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let subs = root.path().join("subs");
        write_fixtures(&subs);

        let config = Self::config_for(root.path());
        let db = init_memory_pool().expect("failed to create in-memory pool");
        {
            let conn = subseek_db::pool::get_conn(&db).expect("conn");
            subseek_index::build_index(&conn, &subs, &Default::default()).expect("index fixtures");
        }

        let ctx = AppContext::with_tools(db.clone(), config, Default::default());
        Self { ctx, db, root }
    }

    /// Default config with every clip directory inside `root`.
    pub fn config_for(root: &Path) -> Config {
        let mut config = Config::default();
        config.index.source_dir = root.join("subs");
        config.clips.audio.media_dir = root.join("audio");
        config.clips.audio.temp_dir = root.join("temp_audio");
        config.clips.video.media_dir = root.join("video");
        config.clips.video.temp_dir = root.join("temp_video");
        config
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    pub fn conn(&self) -> subseek_db::pool::PooledConnection {
        subseek_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }
}
