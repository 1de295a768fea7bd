use crate::models::book::{Book, BookUpdate, NewBook};
use crate::models::error::ApiError;
use crate::models::storage::DocumentStore;
use tracing::info;

pub async fn list_books(
    store: &(dyn DocumentStore + Send + Sync),
) -> Result<Vec<Book>, ApiError> {
    Ok(store.load_all().await?)
}

/// First record with a matching id, by linear scan.
pub async fn find_book(
    store: &(dyn DocumentStore + Send + Sync),
    book_id: &str,
) -> Result<Book, ApiError> {
    store
        .load_all()
        .await?
        .into_iter()
        .find(|book| book.id == book_id)
        .ok_or(ApiError::BookNotFound)
}

/// Appends a new record. The id is the collection size at load time plus one,
/// so ids freed by a delete can be handed out again.
pub async fn create_book(
    store: &(dyn DocumentStore + Send + Sync),
    new_book: NewBook,
) -> Result<Book, ApiError> {
    let (title, author) = new_book.into_fields()?.ok_or(ApiError::MissingFields)?;

    let mut books = store.load_all().await?;
    let book = Book {
        id: (books.len() + 1).to_string(),
        title,
        author,
    };
    books.push(book.clone());
    store.save_all(&books).await?;

    info!("Created book {} ({} by {})", book.id, book.title, book.author);
    Ok(book)
}

/// Merges the fields of `body` into the first record with a matching id.
/// The body is only decoded once that record is known to exist.
pub async fn update_book(
    store: &(dyn DocumentStore + Send + Sync),
    book_id: &str,
    body: &[u8],
) -> Result<Book, ApiError> {
    let mut books = store.load_all().await?;
    let book = books
        .iter_mut()
        .find(|book| book.id == book_id)
        .ok_or(ApiError::BookNotFound)?;

    let update = BookUpdate::from_json(body)?;
    update.apply_to(book);
    let updated = book.clone();

    store.save_all(&books).await?;

    info!("Updated book {}", book_id);
    Ok(updated)
}

/// Removes every record with a matching id. The document is left untouched
/// when nothing matches.
pub async fn delete_book(
    store: &(dyn DocumentStore + Send + Sync),
    book_id: &str,
) -> Result<(), ApiError> {
    let mut books = store.load_all().await?;
    let before = books.len();
    books.retain(|book| book.id != book_id);

    if books.len() == before {
        return Err(ApiError::BookNotFound);
    }

    store.save_all(&books).await?;

    info!("Deleted {} record(s) with id {}", before - books.len(), book_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::storage::JsonFileStore;
    use tempfile::TempDir;

    async fn empty_store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        store.initialize().await.unwrap();
        (dir, store)
    }

    fn new_book(title: &str, author: &str) -> NewBook {
        NewBook {
            title: Some(title.into()),
            author: Some(author.into()),
        }
    }

    #[tokio::test]
    async fn ids_follow_collection_size() {
        let (_dir, store) = empty_store().await;

        let first = create_book(&store, new_book("Dune", "Herbert")).await.unwrap();
        let second = create_book(&store, new_book("Ubik", "Dick")).await.unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
    }

    #[tokio::test]
    async fn id_is_reused_after_delete() {
        let (_dir, store) = empty_store().await;
        create_book(&store, new_book("Dune", "Herbert")).await.unwrap();
        create_book(&store, new_book("Ubik", "Dick")).await.unwrap();

        delete_book(&store, "1").await.unwrap();
        let third = create_book(&store, new_book("Solaris", "Lem")).await.unwrap();

        assert_eq!(third.id, "2");
        let ids: Vec<String> = list_books(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.id)
            .collect();
        assert_eq!(ids, vec!["2", "2"]);
    }

    #[tokio::test]
    async fn find_and_update_use_first_match_but_delete_removes_all() {
        let (_dir, store) = empty_store().await;
        create_book(&store, new_book("Dune", "Herbert")).await.unwrap();
        create_book(&store, new_book("Ubik", "Dick")).await.unwrap();
        delete_book(&store, "1").await.unwrap();
        create_book(&store, new_book("Solaris", "Lem")).await.unwrap();

        assert_eq!(find_book(&store, "2").await.unwrap().title, "Ubik");

        let updated = update_book(&store, "2", br#"{"title":"Ubik (1969)"}"#)
            .await
            .unwrap();
        assert_eq!(updated.title, "Ubik (1969)");
        let titles: Vec<String> = list_books(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, vec!["Ubik (1969)", "Solaris"]);

        delete_book(&store, "2").await.unwrap();
        assert!(list_books(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_without_touching_storage() {
        let (_dir, store) = empty_store().await;
        let before = std::fs::read(store.path()).unwrap();

        let err = create_book(
            &store,
            NewBook {
                title: Some("X".into()),
                author: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::MissingFields));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn update_of_missing_book_ignores_body() {
        let (_dir, store) = empty_store().await;

        let err = update_book(&store, "9", b"not json").await.unwrap_err();

        assert!(matches!(err, ApiError::BookNotFound));
    }

    #[tokio::test]
    async fn update_with_malformed_body_is_internal() {
        let (_dir, store) = empty_store().await;
        create_book(&store, new_book("Dune", "Herbert")).await.unwrap();

        let err = update_book(&store, "1", b"{").await.unwrap_err();

        assert!(matches!(err, ApiError::Body(_)));
        assert_eq!(find_book(&store, "1").await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn update_with_array_body_leaves_record_alone() {
        let (_dir, store) = empty_store().await;
        create_book(&store, new_book("Dune", "Herbert")).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = update_book(&store, "1", br#"["T","U"]"#).await.unwrap_err();

        assert!(matches!(err, ApiError::Body(_)));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn create_with_falsy_title_is_missing_fields() {
        let (_dir, store) = empty_store().await;

        let err = create_book(
            &store,
            NewBook {
                title: Some(false.into()),
                author: Some("x".into()),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::MissingFields));
    }

    #[tokio::test]
    async fn delete_of_missing_book_keeps_document_bytes() {
        let (_dir, store) = empty_store().await;
        create_book(&store, new_book("Dune", "Herbert")).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = delete_book(&store, "42").await.unwrap_err();

        assert!(matches!(err, ApiError::BookNotFound));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }
}
