//! `CatalogRepo` over SQLite.
//!
//! Title reads resolve the category inline and aggregate the rounded mean
//! review score in the same query; genre lists are fetched per title
//! afterwards. Multi-row title writes run in a transaction so a title can
//! never exist half-linked to its genres.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use domains::{CatalogRepo, Category, Genre, Result, Title, TitleDetail, TitleFilter};

use crate::{storage_err, SqliteStore};

fn row_to_category(row: &SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
    }
}

fn row_to_genre(row: &SqliteRow) -> Genre {
    Genre {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
    }
}

fn row_to_title(row: &SqliteRow, genres: Vec<Genre>) -> TitleDetail {
    TitleDetail {
        id: row.get("id"),
        name: row.get("name"),
        year: row.get("year"),
        description: row.get("description"),
        rating: row.get("rating"),
        category: Category {
            id: row.get("category_id"),
            name: row.get("category_name"),
            slug: row.get("category_slug"),
        },
        genres,
    }
}

const TITLE_SELECT: &str = "SELECT t.id, t.name, t.year, t.description,
       t.category_id, c.name AS category_name, c.slug AS category_slug,
       CAST(ROUND(AVG(r.score)) AS INTEGER) AS rating
  FROM titles t
  JOIN categories c ON c.id = t.category_id
  LEFT JOIN reviews r ON r.title_id = t.id";

impl SqliteStore {
    async fn genres_for_title(&self, title_id: Uuid) -> Result<Vec<Genre>> {
        let rows = sqlx::query(
            "SELECT g.id, g.name, g.slug
               FROM genres g
               JOIN title_genres tg ON tg.genre_id = g.id
              WHERE tg.title_id = ?
              ORDER BY g.name, g.id",
        )
        .bind(title_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows.iter().map(row_to_genre).collect())
    }
}

#[async_trait]
impl CatalogRepo for SqliteStore {
    async fn insert_category(&self, category: Category) -> Result<Category> {
        sqlx::query("INSERT INTO categories (id, name, slug) VALUES (?, ?, ?)")
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(category)
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.as_ref().map(row_to_category))
    }

    async fn list_categories(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Category>, i64)> {
        let needle = search.as_deref();
        let rows = sqlx::query(
            "SELECT * FROM categories
              WHERE (? IS NULL OR instr(lower(name), lower(?)) > 0)
              ORDER BY name, id
              LIMIT ? OFFSET ?",
        )
        .bind(needle)
        .bind(needle)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories
              WHERE (? IS NULL OR instr(lower(name), lower(?)) > 0)",
        )
        .bind(needle)
        .bind(needle)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok((rows.iter().map(row_to_category).collect(), count))
    }

    async fn delete_category(&self, slug: &str) -> Result<bool> {
        let done = sqlx::query("DELETE FROM categories WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(done.rows_affected() > 0)
    }

    async fn insert_genre(&self, genre: Genre) -> Result<Genre> {
        sqlx::query("INSERT INTO genres (id, name, slug) VALUES (?, ?, ?)")
            .bind(genre.id)
            .bind(&genre.name)
            .bind(&genre.slug)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(genre)
    }

    async fn genre_by_slug(&self, slug: &str) -> Result<Option<Genre>> {
        let row = sqlx::query("SELECT * FROM genres WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.as_ref().map(row_to_genre))
    }

    async fn list_genres(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Genre>, i64)> {
        let needle = search.as_deref();
        let rows = sqlx::query(
            "SELECT * FROM genres
              WHERE (? IS NULL OR instr(lower(name), lower(?)) > 0)
              ORDER BY name, id
              LIMIT ? OFFSET ?",
        )
        .bind(needle)
        .bind(needle)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM genres
              WHERE (? IS NULL OR instr(lower(name), lower(?)) > 0)",
        )
        .bind(needle)
        .bind(needle)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok((rows.iter().map(row_to_genre).collect(), count))
    }

    async fn delete_genre(&self, slug: &str) -> Result<bool> {
        let done = sqlx::query("DELETE FROM genres WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(done.rows_affected() > 0)
    }

    async fn insert_title(&self, title: Title, genre_ids: Vec<Uuid>) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        sqlx::query(
            "INSERT INTO titles (id, name, year, description, category_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(title.id)
        .bind(&title.name)
        .bind(title.year)
        .bind(&title.description)
        .bind(title.category_id)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        for genre_id in genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES (?, ?)")
                .bind(title.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }
        tx.commit().await.map_err(storage_err)
    }

    async fn update_title(&self, title: &Title, genre_ids: Option<Vec<Uuid>>) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        sqlx::query(
            "UPDATE titles
                SET name = ?, year = ?, description = ?, category_id = ?
              WHERE id = ?",
        )
        .bind(&title.name)
        .bind(title.year)
        .bind(&title.description)
        .bind(title.category_id)
        .bind(title.id)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        if let Some(genre_ids) = genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = ?")
                .bind(title.id)
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
            for genre_id in genre_ids {
                sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES (?, ?)")
                    .bind(title.id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(storage_err)?;
            }
        }
        tx.commit().await.map_err(storage_err)
    }

    async fn title_by_id(&self, id: Uuid) -> Result<Option<TitleDetail>> {
        let query = format!("{TITLE_SELECT} WHERE t.id = ? GROUP BY t.id");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        match row {
            Some(row) => {
                let genres = self.genres_for_title(id).await?;
                Ok(Some(row_to_title(&row, genres)))
            }
            None => Ok(None),
        }
    }

    async fn list_titles(
        &self,
        filter: TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TitleDetail>, i64)> {
        const FILTER: &str = " WHERE (? IS NULL OR c.slug = ?)
   AND (? IS NULL OR t.year = ?)
   AND (? IS NULL OR instr(lower(t.name), lower(?)) > 0)
   AND (? IS NULL OR EXISTS (
        SELECT 1 FROM title_genres tg
          JOIN genres g ON g.id = tg.genre_id
         WHERE tg.title_id = t.id AND g.slug = ?))";

        let category = filter.category.as_deref();
        let search = filter.search.as_deref();
        let genre = filter.genre.as_deref();

        let query = format!("{TITLE_SELECT}{FILTER} GROUP BY t.id ORDER BY t.name, t.id LIMIT ? OFFSET ?");
        let rows = sqlx::query(&query)
            .bind(category)
            .bind(category)
            .bind(filter.year)
            .bind(filter.year)
            .bind(search)
            .bind(search)
            .bind(genre)
            .bind(genre)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        let count_query = format!(
            "SELECT COUNT(*) FROM titles t JOIN categories c ON c.id = t.category_id{FILTER}"
        );
        let count: i64 = sqlx::query_scalar(&count_query)
            .bind(category)
            .bind(category)
            .bind(filter.year)
            .bind(filter.year)
            .bind(search)
            .bind(search)
            .bind(genre)
            .bind(genre)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        let mut titles = Vec::with_capacity(rows.len());
        for row in &rows {
            let genres = self.genres_for_title(row.get("id")).await?;
            titles.push(row_to_title(row, genres));
        }
        Ok((titles, count))
    }

    async fn delete_title(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM titles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(done.rows_affected() > 0)
    }
}
