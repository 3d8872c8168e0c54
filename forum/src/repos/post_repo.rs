/*
 * Responsibility
 * - posts CRUD over the in-memory store
 * - Deleting a post removes its comments in the same critical section
 * - A post is only created under an existing category
 */
use chrono::{DateTime, Utc};

use crate::repos::store::Store;

#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: i64,
    pub titulo: String,
    pub contenido: String,
    pub category_id: i64,
    pub author_id: i64,
    // Snapshot taken at creation; may be the email fallback
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewPost {
    pub titulo: String,
    pub contenido: String,
    pub category_id: i64,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
}

fn newest_first(rows: &mut [PostRow]) {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

pub async fn list(store: &Store) -> Vec<PostRow> {
    let mut rows: Vec<PostRow> = store.tables.read().await.posts.values().cloned().collect();
    newest_first(&mut rows);
    rows
}

pub async fn list_by_author(store: &Store, author_id: i64) -> Vec<PostRow> {
    let mut rows: Vec<PostRow> = store
        .tables
        .read()
        .await
        .posts
        .values()
        .filter(|p| p.author_id == author_id)
        .cloned()
        .collect();
    newest_first(&mut rows);
    rows
}

pub async fn list_by_category(store: &Store, category_id: i64) -> Vec<PostRow> {
    let mut rows: Vec<PostRow> = store
        .tables
        .read()
        .await
        .posts
        .values()
        .filter(|p| p.category_id == category_id)
        .cloned()
        .collect();
    newest_first(&mut rows);
    rows
}

pub async fn get(store: &Store, id: i64) -> Option<PostRow> {
    store.tables.read().await.posts.get(&id).cloned()
}

/// `None` when the category does not exist.
pub async fn create(store: &Store, new: NewPost) -> Option<PostRow> {
    let mut tables = store.tables.write().await;
    if !tables.categories.contains_key(&new.category_id) {
        return None;
    }
    tables.last_post_id += 1;

    let now = Utc::now();
    let row = PostRow {
        id: tables.last_post_id,
        titulo: new.titulo,
        contenido: new.contenido,
        category_id: new.category_id,
        author_id: new.author_id,
        author_name: new.author_name,
        author_avatar: new.author_avatar,
        created_at: now,
        updated_at: now,
    };
    tables.posts.insert(row.id, row.clone());
    Some(row)
}

pub async fn update(store: &Store, id: i64, titulo: String, contenido: String) -> Option<PostRow> {
    let mut tables = store.tables.write().await;
    let row = tables.posts.get_mut(&id)?;

    row.titulo = titulo;
    row.contenido = contenido;
    row.updated_at = Utc::now();
    Some(row.clone())
}

/// Remove the post and its comments. Returns the removed post and how many comments went with it.
pub async fn delete_with_comments(store: &Store, id: i64) -> Option<(PostRow, usize)> {
    let mut tables = store.tables.write().await;
    let post = tables.posts.remove(&id)?;

    let before = tables.comments.len();
    tables.comments.retain(|_, c| c.post_id != id);
    let removed = before - tables.comments.len();

    Some((post, removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::{
        category_repo,
        comment_repo::{self, NewComment},
    };

    async fn seeded() -> Store {
        let store = Store::new();
        category_repo::seed_defaults(&store).await;
        store
    }

    fn new_post(author_id: i64, titulo: &str) -> NewPost {
        NewPost {
            titulo: titulo.to_string(),
            contenido: "contenido".to_string(),
            category_id: 1,
            author_id,
            author_name: None,
            author_avatar: None,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = seeded().await;
        create(&store, new_post(1, "first")).await.unwrap();
        create(&store, new_post(2, "second")).await.unwrap();

        let titles: Vec<_> = list(&store).await.into_iter().map(|p| p.titulo).collect();
        assert_eq!(titles, ["second", "first"]);
        assert_eq!(list_by_author(&store, 2).await.len(), 1);
    }

    #[tokio::test]
    async fn delete_takes_comments_along() {
        let store = seeded().await;
        let keep = create(&store, new_post(1, "keep")).await.unwrap();
        let gone = create(&store, new_post(1, "gone")).await.unwrap();

        for post_id in [keep.id, gone.id, gone.id] {
            comment_repo::create(
                &store,
                NewComment {
                    post_id,
                    contenido: "hola".to_string(),
                    author_id: 2,
                    author_name: None,
                    author_avatar: None,
                },
            )
            .await
            .unwrap();
        }

        let (post, removed) = delete_with_comments(&store, gone.id).await.unwrap();
        assert_eq!(post.id, gone.id);
        assert_eq!(removed, 2);
        assert_eq!(comment_repo::count_for_post(&store, keep.id).await, 1);
        assert!(delete_with_comments(&store, gone.id).await.is_none());
    }

    #[tokio::test]
    async fn unknown_category_is_refused() {
        let store = seeded().await;
        let post = NewPost {
            category_id: 42,
            ..new_post(1, "huerfano")
        };

        assert!(create(&store, post).await.is_none());
        assert!(list(&store).await.is_empty());
    }

    #[tokio::test]
    async fn list_by_category_filters_and_orders() {
        let store = seeded().await;
        create(&store, new_post(1, "juego viejo")).await.unwrap();
        create(
            &store,
            NewPost {
                category_id: 3,
                ..new_post(1, "gadget")
            },
        )
        .await
        .unwrap();
        create(&store, new_post(2, "juego nuevo")).await.unwrap();

        let titles: Vec<_> = list_by_category(&store, 1)
            .await
            .into_iter()
            .map(|p| p.titulo)
            .collect();
        assert_eq!(titles, ["juego nuevo", "juego viejo"]);
        assert_eq!(list_by_category(&store, 3).await.len(), 1);
        assert!(list_by_category(&store, 2).await.is_empty());
    }
}
