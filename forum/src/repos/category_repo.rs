/*
 * Responsibility
 * - categories CRUD over the in-memory store
 * - slug and nombre are unique; a category referenced by a post cannot be deleted
 */
use chrono::{DateTime, Utc};

use crate::repos::{error::RepoError, store::Store};

#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    // URL-friendly and immutable: "videojuegos", "peliculas-series"
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewCategory {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub slug: String,
}

/// Categories a fresh forum starts with.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 3] = [
    ("Videojuegos", "Consolas, PC y todo lo que se juega", "videojuegos"),
    ("Películas y Series", "Cine, series y animación", "peliculas-series"),
    ("Tecnología", "Hardware, software y gadgets", "tecnologia"),
];

pub async fn list(store: &Store) -> Vec<CategoryRow> {
    store.tables.read().await.categories.values().cloned().collect()
}

pub async fn get(store: &Store, id: i64) -> Option<CategoryRow> {
    store.tables.read().await.categories.get(&id).cloned()
}

pub async fn get_by_slug(store: &Store, slug: &str) -> Option<CategoryRow> {
    store
        .tables
        .read()
        .await
        .categories
        .values()
        .find(|c| c.slug == slug)
        .cloned()
}

pub async fn create(store: &Store, new: NewCategory) -> Result<CategoryRow, RepoError> {
    let mut tables = store.tables.write().await;

    if tables.categories.values().any(|c| c.slug == new.slug) {
        return Err(RepoError::Conflict("a category with that slug already exists"));
    }
    if tables
        .categories
        .values()
        .any(|c| c.nombre.eq_ignore_ascii_case(&new.nombre))
    {
        return Err(RepoError::Conflict("a category with that name already exists"));
    }

    tables.last_category_id += 1;
    let row = CategoryRow {
        id: tables.last_category_id,
        nombre: new.nombre,
        descripcion: new.descripcion,
        slug: new.slug,
        created_at: Utc::now(),
    };
    tables.categories.insert(row.id, row.clone());
    Ok(row)
}

/// Rename / re-describe. The slug never changes.
pub async fn update(
    store: &Store,
    id: i64,
    nombre: String,
    descripcion: Option<String>,
) -> Result<CategoryRow, RepoError> {
    let mut tables = store.tables.write().await;

    if tables
        .categories
        .values()
        .any(|c| c.id != id && c.nombre.eq_ignore_ascii_case(&nombre))
    {
        return Err(RepoError::Conflict("a category with that name already exists"));
    }

    let row = tables
        .categories
        .get_mut(&id)
        .ok_or(RepoError::NotFound("category"))?;
    row.nombre = nombre;
    row.descripcion = descripcion;
    Ok(row.clone())
}

pub async fn delete(store: &Store, id: i64) -> Result<CategoryRow, RepoError> {
    let mut tables = store.tables.write().await;

    if !tables.categories.contains_key(&id) {
        return Err(RepoError::NotFound("category"));
    }
    if tables.posts.values().any(|p| p.category_id == id) {
        return Err(RepoError::Conflict("category still has posts"));
    }

    tables
        .categories
        .remove(&id)
        .ok_or(RepoError::NotFound("category"))
}

/// Insert the default categories when the table is empty. Returns how many were added.
pub async fn seed_defaults(store: &Store) -> usize {
    let mut tables = store.tables.write().await;
    if !tables.categories.is_empty() {
        return 0;
    }

    let now = Utc::now();
    for (nombre, descripcion, slug) in DEFAULT_CATEGORIES {
        tables.last_category_id += 1;
        let id = tables.last_category_id;
        tables.categories.insert(
            id,
            CategoryRow {
                id,
                nombre: nombre.to_string(),
                descripcion: Some(descripcion.to_string()),
                slug: slug.to_string(),
                created_at: now,
            },
        );
    }
    DEFAULT_CATEGORIES.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::post_repo::{self, NewPost};

    fn new_category(nombre: &str, slug: &str) -> NewCategory {
        NewCategory {
            nombre: nombre.to_string(),
            descripcion: None,
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn slug_and_name_are_unique() {
        let store = Store::new();
        create(&store, new_category("Anime", "anime")).await.unwrap();

        assert!(matches!(
            create(&store, new_category("Otro", "anime")).await,
            Err(RepoError::Conflict(_))
        ));
        assert!(matches!(
            create(&store, new_category("ANIME", "anime-2")).await,
            Err(RepoError::Conflict(_))
        ));
        assert_eq!(list(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_slug_and_rejects_taken_name() {
        let store = Store::new();
        let anime = create(&store, new_category("Anime", "anime")).await.unwrap();
        create(&store, new_category("Comics", "comics")).await.unwrap();

        let renamed = update(&store, anime.id, "Anime y Manga".to_string(), None)
            .await
            .unwrap();
        assert_eq!(renamed.slug, "anime");
        assert_eq!(get_by_slug(&store, "anime").await.unwrap().nombre, "Anime y Manga");

        assert!(matches!(
            update(&store, anime.id, "comics".to_string(), None).await,
            Err(RepoError::Conflict(_))
        ));
        assert!(matches!(
            update(&store, 99, "x".to_string(), None).await,
            Err(RepoError::NotFound("category"))
        ));
    }

    #[tokio::test]
    async fn category_in_use_cannot_be_deleted() {
        let store = Store::new();
        let anime = create(&store, new_category("Anime", "anime")).await.unwrap();
        let post = post_repo::create(
            &store,
            NewPost {
                titulo: "hola".to_string(),
                contenido: "mundo".to_string(),
                category_id: anime.id,
                author_id: 1,
                author_name: None,
                author_avatar: None,
            },
        )
        .await
        .unwrap();

        assert!(matches!(delete(&store, anime.id).await, Err(RepoError::Conflict(_))));

        post_repo::delete_with_comments(&store, post.id).await.unwrap();
        assert_eq!(delete(&store, anime.id).await.unwrap().slug, "anime");
        assert!(get(&store, anime.id).await.is_none());
    }

    #[tokio::test]
    async fn defaults_are_seeded_once() {
        let store = Store::new();
        assert_eq!(seed_defaults(&store).await, 3);
        assert_eq!(seed_defaults(&store).await, 0);
        assert!(get_by_slug(&store, "peliculas-series").await.is_some());
    }
}
