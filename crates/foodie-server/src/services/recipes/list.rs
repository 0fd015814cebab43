use foodie_error::ApiError;
use foodie_model::filter::{RecipeFilter, RecipeOrdering};
use foodie_model::page::Page;
use foodie_model::recipe::{Recipe, RecipeStatus, RecipeSuggestion, RecipeView};

use crate::extract::SessionUser;
use crate::App;

#[derive(Debug)]
pub struct ListRecipesResult {
    pub recipes: Vec<RecipeView>,
    pub total: u64,
}

#[derive(Debug, Default)]
pub struct ListRecipes {
    pub filter: RecipeFilter,
    pub ordering: RecipeOrdering,
    pub page: Page,
}

impl ListRecipes {
    /// Only published recipes are listed, unless users list their own
    /// recipes with `author_id`.
    #[tracing::instrument(skip_all, name = "services.recipes.list")]
    pub async fn perform(
        self,
        app: &App,
        session_user: Option<&SessionUser>,
    ) -> Result<ListRecipesResult, ApiError> {
        let mut filter = self.filter;
        filter.saved_by = None;

        let own_recipes = matches!(
            (filter.author_id, session_user),
            (Some(author_id), Some(user)) if author_id == user.id
        );
        if !own_recipes {
            filter.status = Some(RecipeStatus::Published);
        }

        let mut conn = app.db_read().await?;
        let recipes = RecipeView::list(&mut conn, &filter, self.ordering, self.page).await?;
        let total = RecipeView::count(&mut conn, &filter).await?;

        Ok(ListRecipesResult { recipes, total })
    }
}

#[derive(Debug, Default)]
pub struct ListSavedRecipes {
    pub filter: RecipeFilter,
    pub ordering: RecipeOrdering,
    pub page: Page,
}

impl ListSavedRecipes {
    /// Saved recipes that are no longer published are left out.
    #[tracing::instrument(skip_all, name = "services.recipes.list_saved")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<ListRecipesResult, ApiError> {
        let filter = RecipeFilter {
            saved_by: Some(session_user.id),
            status: Some(RecipeStatus::Published),
            ..self.filter
        };

        let mut conn = app.db_read().await?;
        let recipes = RecipeView::list(&mut conn, &filter, self.ordering, self.page).await?;
        let total = RecipeView::count(&mut conn, &filter).await?;

        Ok(ListRecipesResult { recipes, total })
    }
}

/// Fixed size listings of published recipes for the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeShortcut {
    Featured,
    Popular,
    Recent,
}

impl RecipeShortcut {
    const fn limit(self) -> u64 {
        match self {
            Self::Featured => 6,
            Self::Popular | Self::Recent => 12,
        }
    }

    fn query(self) -> (RecipeFilter, RecipeOrdering) {
        let mut filter = RecipeFilter {
            status: Some(RecipeStatus::Published),
            ..Default::default()
        };
        let ordering = match self {
            Self::Featured => {
                filter.is_featured = Some(true);
                RecipeOrdering::Newest
            }
            Self::Popular => RecipeOrdering::Popular,
            Self::Recent => RecipeOrdering::Newest,
        };
        (filter, ordering)
    }

    #[tracing::instrument(skip(app), name = "services.recipes.shortcut")]
    pub async fn perform(self, app: &App) -> Result<Vec<RecipeView>, ApiError> {
        let (filter, ordering) = self.query();
        let mut conn = app.db_read().await?;
        let recipes =
            RecipeView::list(&mut conn, &filter, ordering, Page::first(self.limit())).await?;

        Ok(recipes)
    }
}

#[derive(Debug)]
pub struct RecipeSuggestions<'a> {
    pub term: &'a str,
}

impl RecipeSuggestions<'_> {
    #[tracing::instrument(skip_all, name = "services.recipes.suggestions")]
    pub async fn perform(self, app: &App) -> Result<Vec<RecipeSuggestion>, ApiError> {
        let mut conn = app.db_read().await?;
        Ok(Recipe::suggestions(&mut conn, self.term).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::recipes::UpdateRecipe;
    use crate::test_utils;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_list_published_recipes_only() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Dal")
            .call()
            .await;
        test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Secret Sauce")
            .status(RecipeStatus::Draft)
            .call()
            .await;

        let result = ListRecipes::default().perform(&app, None).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.recipes[0].recipe.slug, "dal");

        // asking for drafts of someone else changes nothing
        let result = ListRecipes {
            filter: RecipeFilter {
                status: Some(RecipeStatus::Draft),
                ..Default::default()
            },
            ..Default::default()
        }
        .perform(&app, None)
        .await
        .unwrap();
        assert_eq!(result.total, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_list_own_drafts() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Dal")
            .call()
            .await;
        test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Secret Sauce")
            .status(RecipeStatus::Draft)
            .call()
            .await;

        let result = ListRecipes {
            filter: RecipeFilter {
                author_id: Some(alice.user.id),
                ..Default::default()
            },
            ..Default::default()
        }
        .perform(&app, Some(&alice.get_session_user(&app).await))
        .await
        .unwrap();
        assert_eq!(result.total, 2);

        let result = ListRecipes {
            filter: RecipeFilter {
                author_id: Some(alice.user.id),
                status: Some(RecipeStatus::Draft),
                ..Default::default()
            },
            ..Default::default()
        }
        .perform(&app, Some(&alice.get_session_user(&app).await))
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.recipes[0].recipe.slug, "secret-sauce");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_list_featured_recipes() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Dal")
            .call()
            .await;
        test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Biryani")
            .call()
            .await;

        UpdateRecipe {
            slug: "biryani",
            is_featured: Some(true),
            ..Default::default()
        }
        .perform(&app, &alice.get_session_user(&app).await)
        .await
        .unwrap();

        let featured = RecipeShortcut::Featured.perform(&app).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].recipe.slug, "biryani");

        let recent = RecipeShortcut::Recent.perform(&app).await.unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_suggest_recipes() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Chicken Biryani")
            .call()
            .await;

        let suggestions = RecipeSuggestions { term: "biry" }
            .perform(&app)
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].slug, "chicken-biryani");

        let suggestions = RecipeSuggestions { term: "b" }.perform(&app).await.unwrap();
        assert!(suggestions.is_empty());
    }
}
