//! In-memory post collection.

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::query::select;
use quill_core::domain::{
    NewPost, Page, Post, PostChanges, PostFilter, PostId, PostQuery, PostSort,
};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

struct PostStore {
    /// Newest insert first.
    posts: Vec<Post>,
    /// Next id to hand out. Never decremented, so deleted ids stay retired.
    next_id: PostId,
}

impl PostStore {
    fn post_mut(&mut self, id: PostId) -> Result<&mut Post, RepoError> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)
    }
}

/// Volatile post repository. Posts live as long as the process.
pub struct InMemoryPostRepository {
    store: RwLock<PostStore>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(PostStore {
                posts: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        let id = store.next_id;
        store.next_id += 1;

        let post = post.into_post(id);
        store.posts.insert(0, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn record_view(&self, id: PostId) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let post = store.post_mut(id)?;
        post.views += 1;
        Ok(post.clone())
    }

    async fn list(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(query.run(&store.posts))
    }

    async fn select(&self, filter: &PostFilter, sort: PostSort) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(select(filter, sort, &store.posts))
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let post = store.post_mut(id)?;
        changes.apply(post);
        Ok(post.clone())
    }

    async fn delete(&self, id: PostId) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let index = store
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        Ok(store.posts.remove(index))
    }

    async fn like(&self, id: PostId) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let post = store.post_mut(id)?;
        post.likes += 1;
        Ok(post.likes)
    }

    async fn record_comment(&self, id: PostId) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let post = store.post_mut(id)?;
        post.comments_count += 1;
        Ok(post.comments_count)
    }

    async fn categories(&self) -> Result<Vec<String>, RepoError> {
        let store = self.store.read().await;

        let mut categories: Vec<String> = Vec::new();
        for post in &store.posts {
            if !categories.contains(&post.category) {
                categories.push(post.category.clone());
            }
        }
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quill_core::domain::{PageRequest, PostStatus};
    use uuid::Uuid;

    use super::*;

    fn draft(title: &str, category: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: format!("{title} content"),
            excerpt: format!("{title}..."),
            author_id: Uuid::nil(),
            category: category.to_string(),
            tags: vec![],
            featured_image: String::new(),
            status: PostStatus::Published,
        }
    }

    async fn seeded(n: usize) -> InMemoryPostRepository {
        let repo = InMemoryPostRepository::new();
        for i in 1..=n {
            repo.create(draft(&format!("Post {i}"), "General"))
                .await
                .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let repo = InMemoryPostRepository::new();

        let first = repo.create(draft("a", "g")).await.unwrap();
        let second = repo.create(draft("b", "g")).await.unwrap();
        repo.delete(second.id).await.unwrap();
        let third = repo.create(draft("c", "g")).await.unwrap();
        repo.delete(first.id).await.unwrap();
        repo.delete(third.id).await.unwrap();
        let fourth = repo.create(draft("d", "g")).await.unwrap();

        assert_eq!(
            vec![first.id, second.id, third.id, fourth.id],
            vec![1, 2, 3, 4]
        );
    }

    #[tokio::test]
    async fn test_new_posts_are_prepended() {
        let repo = seeded(3).await;

        let page = repo.list(&PostQuery::default()).await.unwrap();

        let ids: Vec<u64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_record_view_increments_once_per_call() {
        let repo = seeded(1).await;

        assert_eq!(repo.record_view(1).await.unwrap().views, 1);
        assert_eq!(repo.record_view(1).await.unwrap().views, 2);
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().views, 2);
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let repo = seeded(1).await;

        assert!(matches!(repo.record_view(9).await, Err(RepoError::NotFound)));
        assert!(matches!(repo.like(9).await, Err(RepoError::NotFound)));
        assert!(matches!(repo.delete(9).await, Err(RepoError::NotFound)));
        assert!(matches!(
            repo.update(9, PostChanges::default()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let repo = seeded(1).await;

        let updated = repo
            .update(
                1,
                PostChanges {
                    category: Some("Tech".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.category, "Tech");
        assert_eq!(updated.title, "Post 1");
        assert_eq!(updated.content, "Post 1 content");
    }

    #[tokio::test]
    async fn test_delete_returns_removed_post() {
        let repo = seeded(2).await;

        let removed = repo.delete(1).await.unwrap();

        assert_eq!(removed.title, "Post 1");
        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_likes_are_not_lost() {
        let repo = Arc::new(seeded(1).await);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.like(1).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().likes, 50);
    }

    #[tokio::test]
    async fn test_categories_are_distinct_in_collection_order() {
        let repo = InMemoryPostRepository::new();
        for category in ["Tech", "Life", "Tech", "Travel"] {
            repo.create(draft("t", category)).await.unwrap();
        }

        assert_eq!(
            repo.categories().await.unwrap(),
            vec!["Travel".to_string(), "Tech".to_string(), "Life".to_string()]
        );
    }

    #[tokio::test]
    async fn test_popular_listing_ranks_by_views_and_likes() {
        let repo = seeded(3).await;
        repo.like(1).await.unwrap();
        repo.like(1).await.unwrap();
        repo.record_view(2).await.unwrap();

        let page = repo
            .list(&PostQuery {
                sort: PostSort::Popular,
                page: PageRequest::new(Some(1), Some(10)),
                ..Default::default()
            })
            .await
            .unwrap();

        let ids: Vec<u64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_select_is_unpaginated() {
        let repo = seeded(25).await;

        let all = repo
            .select(&PostFilter::default(), PostSort::Newest)
            .await
            .unwrap();

        assert_eq!(all.len(), 25);
    }
}
