//! Runs against a live database when `STORYCONV_TEST_DB` holds a connection
//! string, and is skipped otherwise.

#![cfg(feature = "postgres")]

use std::time::{SystemTime, UNIX_EPOCH};

use storyconv_storage::{
    PostgresRepository, SearchQuery, StorageError, StoryRepository, tls_connector,
};

const SCHEMA: &str = include_str!("../schema.sql");

fn database() -> Option<String> {
    std::env::var("STORYCONV_TEST_DB").ok().filter(|url| !url.is_empty())
}

fn unique_marker() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("zzprobe{}x{nanos}", std::process::id())
}

async fn seed(url: &str, marker: &str) -> tokio_postgres::Client {
    let (client, connection) = tokio_postgres::connect(url, tls_connector().unwrap()).await.unwrap();
    tokio::spawn(connection);

    client.batch_execute(SCHEMA).await.unwrap();
    for (title, author) in [
        (format!("Лиса {marker}"), Some("Толстой")),
        (format!("Лиса {marker}"), Some("Афанасьев")),
        (format!("Журавль {marker}"), None),
    ] {
        let url = format!("https://skazki.example/{}", unique_marker());
        client
            .execute(
                "INSERT INTO story (title, url, author) VALUES ($1, $2, $3)",
                &[&title, &url, &author],
            )
            .await
            .unwrap();
    }
    client
}

async fn cleanup(client: &tokio_postgres::Client, marker: &str) {
    client
        .execute(
            "DELETE FROM story WHERE title LIKE $1",
            &[&format!("%{marker}")],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_and_bookkeeping() {
    let Some(url) = database() else {
        eprintln!("STORYCONV_TEST_DB not set, skipping");
        return;
    };
    let marker = unique_marker();
    let client = seed(&url, &marker).await;
    let repository = PostgresRepository::new(&url, 2).unwrap();

    let both = repository
        .search(&SearchQuery::parse(&format!("лиса {marker}")))
        .await
        .unwrap();
    assert_eq!(both.len(), 2);

    let narrowed = repository
        .search(&SearchQuery::parse(&format!("Лиса {marker} автор толст")))
        .await
        .unwrap();
    assert_eq!(narrowed.len(), 1);
    let story = narrowed.into_iter().next().unwrap();
    assert_eq!(story.author.as_deref(), Some("Толстой"));
    assert_eq!(story.filepath, None);
    assert_eq!(story.access_count, 0);

    repository
        .record_conversion(&story, "storage/lisa/tolstoi-lisa.epub")
        .await
        .unwrap();
    repository.record_access(&story).await.unwrap();

    let reloaded = repository
        .search(&SearchQuery::parse(&format!("Лиса {marker} автор Толстой")))
        .await
        .unwrap();
    assert_eq!(
        reloaded[0].filepath.as_deref(),
        Some("storage/lisa/tolstoi-lisa.epub")
    );
    assert_eq!(reloaded[0].access_count, 2);

    let none = repository
        .search(&SearchQuery::parse(&format!("Журавль {marker} автор Крылов")))
        .await
        .unwrap();
    assert!(none.is_empty());

    cleanup(&client, &marker).await;

    let gone = repository.record_access(&story).await;
    assert!(matches!(gone, Err(StorageError::StoryNotFound { .. })));
}
