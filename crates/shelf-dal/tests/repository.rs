use serde_json::json;
use shelf_dal::{CreateQuote, Entity, Payload, Quote, Repository, UpdateQuote};

fn create(repo: &mut Repository<Quote>, text: &str) -> Quote {
    let payload = CreateQuote::from_json(&json!({
        "text": text,
        "character": "Leela",
        "episode": "Space Pilot 3000"
    }))
    .unwrap();
    repo.create(payload)
}

#[test]
fn test_create_list_delete() {
    let mut repo = Repository::<Quote>::new();
    let first = create(&mut repo, "One");
    let second = create(&mut repo, "Two");
    let third = create(&mut repo, "Three");

    assert!(repo.delete(second.id));
    assert!(repo.get(second.id).is_err());

    let listed = repo.list_all();
    assert_eq!(listed, vec![first, third]);
}

#[test]
fn test_update_round_trip() {
    let mut repo = Repository::<Quote>::new().with_sample_data();
    let created = create(&mut repo, "Nothing is impossible");
    assert_eq!(created.id, 5);

    let update = UpdateQuote::from_json(&json!({"character": "Farnsworth", "year": 3000})).unwrap();
    repo.update(created.id, update).unwrap();

    let stored = repo.get(created.id).unwrap();
    assert_eq!(stored.text, created.text);
    assert_eq!(stored.episode, created.episode);
    assert_eq!(stored.character, "Farnsworth");
    assert_eq!(stored.year, Some(3000));
    assert_eq!(stored.season, None);
    assert_eq!(stored.created_at(), created.created_at());
    assert!(stored.updated_at() >= stored.created_at());
}

#[test]
fn test_counts_after_creates_and_deletes() {
    let mut repo = Repository::<Quote>::new();
    let ids: Vec<u64> = (0..10).map(|i| create(&mut repo, &format!("Quote {i}")).id).collect();
    for id in ids.iter().step_by(3) {
        assert!(repo.delete(*id));
    }
    assert_eq!(repo.count(), 10 - 4);
    assert_eq!(repo.list_all().len(), repo.count());
}
