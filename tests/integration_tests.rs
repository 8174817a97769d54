//! End-to-end tests: a panel client driving a real responder over the
//! in-memory transport, against a tempdir-backed local file system.

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use tempfile::TempDir;
use tokio::sync::mpsc;

use file_explorer_bridge::config::ExplorerConfig;
use file_explorer_bridge::core::{LocalFileSystem, RootDirectories, RootKind};
use file_explorer_bridge::panel::events::{EventProxy, PanelEvent};
use file_explorer_bridge::panel::state::PanelView;
use file_explorer_bridge::panel::PanelClient;
use file_explorer_bridge::protocol::memory;
use file_explorer_bridge::responder::Responder;

mod helpers {
    use super::*;

    pub fn write_file(root: &camino::Utf8Path, relative_path: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent.as_std_path()).expect("failed to create parent");
        }
        std::fs::write(path.as_std_path(), contents).expect("failed to write file");
        path
    }

    #[derive(Clone)]
    pub struct TestEventProxy {
        pub sender: mpsc::UnboundedSender<PanelEvent>,
    }

    impl EventProxy for TestEventProxy {
        fn send_event(&self, event: PanelEvent) {
            if let Err(e) = self.sender.send(event) {
                panic!("Test receiver dropped: {}", e);
            }
        }
    }

    /// A complete session: responder on one end of the channel, panel on the
    /// other, three real root directories inside a tempdir.
    pub struct TestHarness {
        pub panel: PanelClient<TestEventProxy>,
        pub responder: Responder,
        pub event_rx: mpsc::UnboundedReceiver<PanelEvent>,
        pub document_root: Utf8PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        pub fn new() -> Self {
            Self::with_setup(ExplorerConfig::default(), |_| {})
        }

        pub fn with_config(config: ExplorerConfig) -> Self {
            Self::with_setup(config, |_| {})
        }

        /// Builds the session after `setup` has populated the document root,
        /// so the initial listing already sees the fixture files.
        pub fn with_setup(
            config: ExplorerConfig,
            setup: impl FnOnce(&camino::Utf8Path),
        ) -> Self {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init();

            let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
            let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
                .expect("temp dir path is not UTF-8");
            let roots = RootDirectories {
                document: base.join("files"),
                cache: base.join("cache"),
                bundle: base.join("bundle"),
            };
            for root in [&roots.document, &roots.cache, &roots.bundle] {
                std::fs::create_dir_all(root.as_std_path()).expect("failed to create root");
            }
            let document_root = roots.document.clone();
            setup(&document_root);

            let (panel_end, app_end) = memory::pair();
            let responder = Responder::attach(
                Arc::new(app_end),
                Arc::new(LocalFileSystem::new(roots)),
            );

            let (event_tx, event_rx) = mpsc::unbounded_channel();
            let panel = PanelClient::attach(
                Arc::new(panel_end),
                config,
                TestEventProxy { sender: event_tx },
            );

            Self {
                panel,
                responder,
                event_rx,
                document_root,
                _temp_dir: temp_dir,
            }
        }

        pub fn create_file(&self, relative_path: &str, contents: &[u8]) -> Utf8PathBuf {
            write_file(&self.document_root, relative_path, contents)
        }

        pub async fn next_event(&mut self) -> Option<PanelEvent> {
            tokio::time::timeout(Duration::from_secs(2), self.event_rx.recv())
                .await
                .ok()
                .flatten()
        }

        /// Consumes events until one satisfies `predicate` on a state
        /// update, or the timeout panics the test.
        pub async fn wait_for_view<F>(&mut self, predicate: F) -> Box<PanelView>
        where
            F: Fn(&PanelView) -> bool,
        {
            loop {
                match self.next_event().await {
                    Some(PanelEvent::StateUpdate(view)) if predicate(&view) => return view,
                    Some(_) => {}
                    None => panic!("timed out waiting for a matching state update"),
                }
            }
        }

        pub async fn wait_for_notice(&mut self) -> String {
            loop {
                match self.next_event().await {
                    Some(PanelEvent::Notice(message)) => return message,
                    Some(_) => {}
                    None => panic!("timed out waiting for a notice"),
                }
            }
        }

        pub async fn wait_for_error(&mut self) -> String {
            loop {
                match self.next_event().await {
                    Some(PanelEvent::Error(message)) => return message,
                    Some(_) => {}
                    None => panic!("timed out waiting for an error"),
                }
            }
        }

        /// Waits until the initial root resolution and first listing landed.
        pub async fn wait_for_session_start(&mut self) {
            let root = self.document_root.clone();
            self.wait_for_view(|view| view.browse_path == root.as_str() && view.connected)
                .await;
        }

        pub async fn assert_no_further_event(&mut self) {
            if let Ok(Some(event)) =
                tokio::time::timeout(Duration::from_millis(200), self.event_rx.recv()).await
            {
                panic!("unexpected event: {:?}", event);
            }
        }
    }
}

#[tokio::test]
async fn session_start_seeds_browse_path_from_the_default_root() {
    let mut harness = helpers::TestHarness::new();

    let view = {
        let root = harness.document_root.clone();
        harness
            .wait_for_view(move |view| view.browse_path == root.as_str())
            .await
    };

    assert!(view.breadcrumbs.is_empty(), "at the root there are no segments");
}

#[tokio::test]
async fn cache_root_session_starts_in_the_cache_directory() {
    let mut harness = helpers::TestHarness::with_config(ExplorerConfig {
        default_root: RootKind::Cache,
        ..Default::default()
    });

    harness
        .wait_for_view(|view| view.browse_path.ends_with("/cache"))
        .await;
}

#[tokio::test]
async fn initial_listing_arrives_after_session_start() {
    let mut harness = helpers::TestHarness::with_setup(ExplorerConfig::default(), |root| {
        helpers::write_file(root, "readme.txt", b"hello");
    });

    let view = harness
        .wait_for_view(|view| view.entries.iter().any(|e| e.name == "readme.txt"))
        .await;

    let entry = view.entries.iter().find(|e| e.name == "readme.txt").unwrap();
    let stat = entry.stat().expect("entry should carry a stat");
    assert!(stat.exists);
    assert_eq!(stat.size, 5);
}

#[tokio::test]
async fn delete_refreshes_the_listing_exactly_once() {
    let mut harness = helpers::TestHarness::with_setup(ExplorerConfig::default(), |root| {
        helpers::write_file(root, "doomed.txt", b"bye");
        helpers::write_file(root, "survivor.txt", b"hi");
    });
    let doomed = harness.document_root.join("doomed.txt");
    harness.wait_for_session_start().await;
    harness
        .wait_for_view(|view| view.entries.len() == 2)
        .await;

    harness.panel.delete_path(doomed.as_str());

    assert_eq!(harness.wait_for_notice().await, "File deleted");
    let view = harness
        .wait_for_view(|view| view.entries.len() == 1)
        .await;
    assert_eq!(view.entries[0].name, "survivor.txt");
    // One refresh only: no further traffic follows the re-listing.
    harness.assert_no_further_event().await;
}

#[tokio::test]
async fn upload_round_trips_binary_content() {
    let mut harness = helpers::TestHarness::new();
    harness.wait_for_session_start().await;
    let bytes: Vec<u8> = (0..=255u8).collect();

    harness.panel.upload_file("blob.bin", &bytes);

    assert_eq!(harness.wait_for_notice().await, "File uploaded");
    let view = harness
        .wait_for_view(|view| view.entries.iter().any(|e| e.name == "blob.bin"))
        .await;
    let stat = view.entries[0].stat().unwrap();
    assert_eq!(stat.size, 256);

    let written = std::fs::read(harness.document_root.join("blob.bin").as_std_path()).unwrap();
    assert_eq!(written, bytes);
}

#[tokio::test]
async fn uploading_a_zero_byte_file_succeeds_and_refreshes() {
    let mut harness = helpers::TestHarness::new();
    harness.wait_for_session_start().await;

    harness.panel.upload_file("empty.txt", &[]);

    assert_eq!(harness.wait_for_notice().await, "File uploaded");
    let view = harness
        .wait_for_view(|view| view.entries.iter().any(|e| e.name == "empty.txt"))
        .await;
    assert_eq!(view.entries[0].stat().unwrap().size, 0);
}

#[tokio::test]
async fn new_folder_appears_in_the_refreshed_listing() {
    let mut harness = helpers::TestHarness::new();
    harness.wait_for_session_start().await;

    harness.panel.create_folder("photos");

    assert_eq!(harness.wait_for_notice().await, "Folder created");
    let view = harness
        .wait_for_view(|view| view.entries.iter().any(|e| e.name == "photos"))
        .await;
    assert!(view.entries[0].stat().unwrap().is_directory);
}

#[tokio::test]
async fn navigating_into_folders_builds_breadcrumbs_and_back() {
    let mut harness = helpers::TestHarness::new();
    harness.create_file("photos/2024/shot.jpg", b"jpeg");
    harness.wait_for_session_start().await;

    let nested = harness.document_root.join("photos/2024");
    harness.panel.open_directory(nested.as_str());
    let view = harness
        .wait_for_view(|view| view.entries.iter().any(|e| e.name == "shot.jpg"))
        .await;
    assert_eq!(view.breadcrumbs, vec!["photos", "2024"]);

    // Clicking the first breadcrumb segment goes up to /photos.
    harness.panel.open_breadcrumb(0);
    let photos = harness.document_root.join("photos");
    let view = harness
        .wait_for_view(move |view| view.browse_path == photos.as_str())
        .await;
    assert_eq!(view.breadcrumbs, vec!["photos"]);

    harness.panel.open_root();
    let root = harness.document_root.clone();
    let view = harness
        .wait_for_view(move |view| view.browse_path == root.as_str())
        .await;
    assert!(view.breadcrumbs.is_empty());
}

#[tokio::test]
async fn download_reconstructs_the_exact_bytes() {
    let mut harness = helpers::TestHarness::new();
    let bytes: Vec<u8> = (0..=255u8).rev().collect();
    let path = harness.create_file("dump.bin", &bytes);
    harness.wait_for_session_start().await;

    harness.panel.download_file(path.as_str());

    loop {
        match harness.next_event().await {
            Some(PanelEvent::Download {
                path: download_path,
                mime,
                bytes: downloaded,
            }) => {
                assert_eq!(download_path, path.as_str());
                assert_eq!(mime, "application/octet-stream");
                assert_eq!(downloaded, bytes);
                break;
            }
            Some(_) => {}
            None => panic!("timed out waiting for the download"),
        }
    }
}

#[tokio::test]
async fn failed_operations_surface_as_errors_and_leave_state_alone() {
    let mut harness = helpers::TestHarness::with_setup(ExplorerConfig::default(), |root| {
        helpers::write_file(root, "keep.txt", b"keep");
    });
    harness.wait_for_session_start().await;
    harness
        .wait_for_view(|view| view.entries.len() == 1)
        .await;

    let missing = harness.document_root.join("not-there.txt");
    harness.panel.download_file(missing.as_str());

    let message = harness.wait_for_error().await;
    assert!(message.contains("not-there.txt"), "unhelpful error: {message}");

    let view = harness.panel.view();
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].name, "keep.txt");
}

#[tokio::test]
async fn detached_responder_answers_nothing() {
    let mut harness = helpers::TestHarness::new();
    harness.wait_for_session_start().await;
    // Drain the initial (empty) listing update before going quiet.
    match harness.next_event().await {
        Some(PanelEvent::StateUpdate(_)) => {}
        other => panic!("expected the initial listing update, got {:?}", other),
    }

    harness.responder.detach();
    harness.panel.refresh();

    if let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_millis(200), harness.event_rx.recv()).await
    {
        panic!("reply arrived after responder detach: {:?}", event);
    }
}
