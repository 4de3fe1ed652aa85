//! Rendering tests for the TUI views
//!
//! The app is driven through `reduce` with canned load events and drawn into
//! a `TestBackend`; assertions look for the text a user would see.

mod common;

use common::{FakeClient, container};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dockhand::config::Config;
use dockhand::groups::GroupStore;
use dockhand::models::{Image, LogEntry};
use dockhand::tui::{App, Event, Theme, reduce};
use insta::assert_snapshot;
use ratatui::{Terminal, backend::TestBackend};
use std::sync::Arc;

struct Fixture {
    app: App,
    store: Arc<GroupStore>,
    _dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(GroupStore::open_in(dir.path()).unwrap());
    let mut app = App::new(
        Arc::new(FakeClient::new()),
        Arc::clone(&store),
        Config::default(),
        Theme::default(),
    );
    reduce(
        &mut app,
        Event::ContainersLoaded(Ok(vec![
            container("aaaaaaaaaaaa1111", "web", "running"),
            container("bbbbbbbbbbbb2222", "db", "exited"),
        ])),
    );
    reduce(&mut app, Event::GroupsLoaded(Ok(Vec::new())));
    Fixture {
        app,
        store,
        _dir: dir,
    }
}

fn press(app: &mut App, code: KeyCode) {
    reduce(app, Event::Input(KeyEvent::new(code, KeyModifiers::NONE)));
}

/// Draw the app and flatten the buffer into one string per row
fn draw(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_containers_view_lists_rows() {
    let mut f = fixture();
    let screen = draw(&mut f.app, 120, 30);

    assert!(screen.contains("dockhand"));
    assert!(screen.contains("1 Containers (2)"));
    assert!(screen.contains("web"));
    assert!(screen.contains("db"));
    assert!(screen.contains("running"));
    assert!(screen.contains("exited"));
}

#[tokio::test]
async fn test_delete_shows_confirmation_modal() {
    let mut f = fixture();
    press(&mut f.app, KeyCode::Char('d'));
    let screen = draw(&mut f.app, 120, 30);

    assert!(screen.contains("Confirm Operation"));
    assert!(screen.contains("CONFIRMATION REQUIRED"));
    assert!(screen.contains("to confirm"));
}

#[tokio::test]
async fn test_filter_hides_non_matching_rows() {
    let mut f = fixture();
    press(&mut f.app, KeyCode::Char('/'));
    press(&mut f.app, KeyCode::Char('w'));
    let screen = draw(&mut f.app, 120, 30);

    assert!(screen.contains("web"));
    let body_rows = screen.lines().filter(|l| l.contains("exited")).count();
    assert_eq!(body_rows, 0);
}

#[tokio::test]
async fn test_images_view() {
    let mut f = fixture();
    press(&mut f.app, KeyCode::Char('2'));
    reduce(
        &mut f.app,
        Event::ImagesLoaded(Ok(vec![Image {
            id: "sha256:0123456789abcdef".into(),
            repo_tags: vec!["nginx:1.27".into()],
            size: 50 * 1024 * 1024,
            ..Default::default()
        }])),
    );
    let screen = draw(&mut f.app, 120, 30);

    assert!(screen.contains("REPOSITORY"));
    assert!(screen.contains("nginx"));
    assert!(screen.contains("1.27"));
    assert!(screen.contains("0123456789ab"));
}

#[tokio::test]
async fn test_groups_view_shows_sub_tabs() {
    let mut f = fixture();
    let group = f
        .store
        .create("stack", "web and db", vec!["aaaaaaaaaaaa1111".into()])
        .unwrap();
    press(&mut f.app, KeyCode::Char('3'));
    reduce(&mut f.app, Event::GroupsLoaded(Ok(vec![group])));
    let screen = draw(&mut f.app, 120, 30);

    assert!(screen.contains("Groups"));
    assert!(screen.contains("In Group"));
    assert!(screen.contains("Available"));
    assert!(screen.contains("stack"));
    assert!(screen.contains("web and db"));
}

#[tokio::test]
async fn test_about_view() {
    let mut f = fixture();
    press(&mut f.app, KeyCode::Char('7'));
    let screen = draw(&mut f.app, 120, 40);

    assert!(screen.contains(&format!("dockhand v{}", env!("CARGO_PKG_VERSION"))));
    assert!(screen.contains("GENERAL"));
    assert!(screen.contains("CONTAINERS"));
}

#[tokio::test]
async fn test_log_viewer_shows_lines() {
    let mut f = fixture();
    press(&mut f.app, KeyCode::Char('l'));
    let subscription = f.app.views().logs.subscription_id().unwrap();
    reduce(
        &mut f.app,
        Event::LogLine {
            subscription,
            entry: LogEntry::stdout("listening on :8080"),
        },
    );
    let screen = draw(&mut f.app, 120, 30);

    assert!(screen.contains("Logs: web"));
    assert!(screen.contains("following"));
    assert!(screen.contains("listening on :8080"));
}

#[tokio::test]
async fn test_too_small_terminal() {
    let mut f = fixture();
    let screen = draw(&mut f.app, 59, 11);
    let line = screen.lines().find(|l| l.contains("too small")).unwrap();
    let text = line.trim_matches(|c: char| c == '│' || c.is_whitespace());
    assert_snapshot!(text, @"Terminal too small! Need at least 60x12 (current: 59x11)");
}
