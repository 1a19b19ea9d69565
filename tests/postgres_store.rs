//! Runs against a live PostgreSQL named by `DATABASE_URL`:
//! `cargo test --test postgres_store -- --ignored`

use directory_service::{DirectoryPatch, DirectoryStore, NewDirectory, PgDirectoryStore};

async fn store(table: &str) -> PgDirectoryStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap();
    sqlx::query(&format!("DROP TABLE IF EXISTS \"{}\"", table))
        .execute(&pool)
        .await
        .unwrap();
    let store = PgDirectoryStore::with_table(pool, table);
    store.ensure_table().await.unwrap();
    store
}

#[tokio::test]
#[ignore]
async fn crud_round_trip() {
    let store = store("directories_crud_test").await;
    let created = store
        .create(NewDirectory {
            name: "Eng".into(),
            emails: vec!["a@x.com".into(), "b@x.com".into()],
        })
        .await
        .unwrap();
    assert_eq!(store.get(created.id).await.unwrap(), Some(created.clone()));

    let patched = store
        .update(
            created.id,
            DirectoryPatch {
                name: Some("Platform".into()),
                emails: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.name, "Platform");
    assert_eq!(patched.emails, created.emails);

    assert!(store.delete(created.id).await.unwrap());
    assert!(store.get(created.id).await.unwrap().is_none());
    assert!(!store.delete(created.id).await.unwrap());
    assert!(store.update(created.id, DirectoryPatch::default()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn list_is_ordered_and_windowed() {
    let store = store("directories_list_test").await;
    for i in 0..5 {
        store
            .create(NewDirectory {
                name: format!("d{}", i),
                emails: vec![],
            })
            .await
            .unwrap();
    }
    assert_eq!(store.count().await.unwrap(), 5);
    let page = store.list(2, 2).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].id < page[1].id);
    assert_eq!(page[0].name, "d2");
    store.ping().await.unwrap();
}
