use items_rust::db::repositories::LocalRepository;
use items_rust::db::services;
use items_rust::models::{ItemChanges, ItemId, NewItem};

async fn seeded(count: usize) -> LocalRepository {
    let repo = LocalRepository::new();
    for i in 0..count {
        services::create_item(&repo, &NewItem::new(format!("item {}", i)))
            .await
            .unwrap();
    }
    repo
}

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
}

#[tokio::test]
async fn test_list_respects_max_limit() {
    let repo = seeded(10).await;

    let capped = services::list_items(&repo, 0, 100, 3).await.unwrap();
    assert_eq!(capped.len(), 3);

    let within = services::list_items(&repo, 8, 5, 1000).await.unwrap();
    assert_eq!(within.len(), 2);
    assert_eq!(within[0].id, ItemId::new(9));
}

#[tokio::test]
async fn test_crud_round() {
    let repo = LocalRepository::new();

    let item = services::create_item(&repo, &NewItem::new("A")).await.unwrap();
    let fetched = services::get_item(&repo, item.id).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&item));

    let updated = services::update_item(
        &repo,
        item.id,
        &ItemChanges::default().description(Some("d".to_string())),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "A");
    assert_eq!(updated.description.as_deref(), Some("d"));

    assert!(services::delete_item(&repo, item.id).await.unwrap());
    assert!(services::get_item(&repo, item.id).await.unwrap().is_none());
}
