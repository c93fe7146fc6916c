mod common;

use anyhow::Result;
use camgallery::client::{delete_photo, Document, HttpTransport, ViewModel};

#[tokio::test]
async fn deleting_a_photo_removes_files_and_card() -> Result<()> {
    let server = common::TestServer::start().await?;
    server.add_photo("sunset_01", "2024-05-01", true).await?;

    let transport = HttpTransport::new(server.url(), None)?;
    let view = Document::with_resources(["sunset_01"]);

    let deleted = delete_photo(&transport, &view, "sunset_01").await?;

    assert!(deleted);
    assert!(view.get_element("sunset_01_card").is_none());
    assert!(!view.element("sunset_01_error").unwrap().is_visible());

    let photos_dir = server.photos_dir();
    assert!(!photos_dir.join("sunset_01.jpg").exists());
    assert!(!photos_dir.join("sunset_01.dng").exists());
    assert!(!photos_dir.join("thumbnails").join("sunset_01.jpg").exists());
    assert!(server.state.photos.read().await.get("sunset_01").is_none());
    Ok(())
}

#[tokio::test]
async fn deleting_an_unknown_photo_shows_the_inline_error() -> Result<()> {
    let server = common::TestServer::start().await?;
    server.add_photo("kept", "2024-05-01", false).await?;

    let transport = HttpTransport::new(server.url(), None)?;
    let view = Document::with_resources(["ghost"]);

    let deleted = delete_photo(&transport, &view, "ghost").await?;

    assert!(!deleted);
    assert!(view.contains("ghost_card"));
    assert!(view.element("ghost_error").unwrap().is_visible());
    assert!(server.photos_dir().join("kept.jpg").exists());
    Ok(())
}

#[tokio::test]
async fn repeated_delete_is_tolerated() -> Result<()> {
    let server = common::TestServer::start().await?;
    server.add_photo("twice", "2024-05-01", false).await?;

    let transport = HttpTransport::new(server.url(), None)?;
    let view = Document::with_resources(["twice"]);

    assert!(delete_photo(&transport, &view, "twice").await?);
    // The server no longer knows the photo, so it reports an error this time;
    // the card is already gone and stays gone.
    assert!(!delete_photo(&transport, &view, "twice").await?);
    assert!(!view.contains("twice_card"));
    Ok(())
}

#[tokio::test]
async fn concurrent_deletes_of_different_photos() -> Result<()> {
    let server = common::TestServer::start().await?;
    for name in ["a", "b", "c"] {
        server.add_photo(name, "2024-05-01", false).await?;
    }

    let transport = HttpTransport::new(server.url(), None)?;
    let view = Document::with_resources(["a", "b", "c"]);

    let (a, b, c) = tokio::join!(
        delete_photo(&transport, &view, "a"),
        delete_photo(&transport, &view, "b"),
        delete_photo(&transport, &view, "c"),
    );

    assert!(a? && b? && c?);
    assert_eq!(view.len(), 3, "only the error indicators remain");
    assert!(server.state.photos.read().await.is_empty());
    Ok(())
}
