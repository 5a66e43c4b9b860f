//! End-to-end status workflow through the public API.

use model_status::{
    Error, HasStatuses, MorphMap, OwnerRef, StatusConfig, StatusStore, StatusUpdated,
};

#[derive(Debug, Clone, PartialEq)]
struct Document {
    id: i64,
}

impl HasStatuses for Document {
    fn status_key(&self) -> i64 {
        self.id
    }

    fn is_valid_status(&self, name: &str, value: Option<&str>) -> bool {
        match name {
            "stage" => matches!(value, Some("draft" | "review" | "published" | "archived")),
            "pinned" => value.is_none(),
            _ => false,
        }
    }
}

async fn store() -> StatusStore {
    StatusStore::in_memory(
        StatusConfig::new("statuses"),
        MorphMap::new().with::<Document>("document"),
    )
    .await
    .expect("in-memory store")
}

#[tokio::test]
async fn publication_workflow() {
    let store = store().await;
    let mut events = store.subscribe();
    let docs: Vec<Document> = (1..=3).map(|id| Document { id }).collect();

    for doc in &docs {
        store.statuses_of(doc).set_status("stage", Some("draft")).await.unwrap();
    }
    store
        .statuses_of(&docs[0])
        .set_status("stage", Some("review"))
        .await
        .unwrap()
        .set_status("stage", Some("published"))
        .await
        .unwrap()
        .set_status("pinned", None)
        .await
        .unwrap();

    let published = store
        .filter_current_status(docs.clone(), "stage", &["published"])
        .await
        .unwrap();
    assert_eq!(published, vec![Document { id: 1 }]);

    // Doc 1 was a draft once but no longer is
    let drafts = store.current_status::<Document>("stage", &["draft"]).await.unwrap();
    assert_eq!(drafts, vec![2, 3]);

    let mut received: Vec<StatusUpdated> = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    assert_eq!(received.len(), 6);
    assert!(received.iter().all(|e| e.owner.owner_type == "document"));

    let last_stage = received
        .iter()
        .rev()
        .find(|e| e.new.name == "stage")
        .unwrap();
    assert_eq!(last_stage.owner, OwnerRef::new("document", 1));
    assert_eq!(
        last_stage.old.as_ref().and_then(|s| s.value.as_deref()),
        Some("review")
    );
}

#[tokio::test]
async fn rejected_values_and_archival() {
    let store = store().await;
    let doc = Document { id: 7 };
    let mut statuses = store.statuses_of(&doc);

    statuses.set_status("stage", Some("draft")).await.unwrap();

    let err = statuses.set_status("stage", Some("lost")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidStatus { name } if name == "stage"));
    let err = statuses.set_status("pinned", Some("yes")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidStatus { name } if name == "pinned"));

    let current = statuses.status("stage").await.unwrap().unwrap();
    assert!(current.is("draft"));

    statuses.set_status("stage", Some("archived")).await.unwrap();
    assert_eq!(statuses.statuses().await.unwrap().len(), 1);

    assert_eq!(statuses.delete_status(&["stage", "pinned"]).await.unwrap(), 1);
    assert!(!statuses.has_ever_had_status("stage").await.unwrap());
    assert!(store
        .current_status::<Document>("stage", &["archived"])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn subscriber_task_sees_writes() {
    let store = store().await;
    let mut events = store.subscribe();

    let listener = tokio::spawn(async move {
        let event = events.recv().await.unwrap();
        (event.old.is_none(), event.new.to_string())
    });

    let doc = Document { id: 1 };
    store.statuses_of(&doc).set_status("stage", Some("draft")).await.unwrap();

    let (first_write, rendered) = listener.await.unwrap();
    assert!(first_write);
    assert_eq!(rendered, "stage=draft");
}
