use foodie_error::ApiError;
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::counter::Counter;
use foodie_model::ingredient::NewIngredient;
use foodie_model::recipe::{Difficulty, InsertRecipe, Recipe, RecipeStatus, RecipeView};
use foodie_model::step::NewRecipeStep;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

#[derive(Debug, Default)]
pub struct CreateRecipe<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub short_description: &'a str,
    pub prep_time: i64,
    pub cook_time: i64,
    pub total_time: Option<i64>,
    pub servings: i64,
    pub difficulty: Difficulty,
    pub instructions: &'a str,
    pub tips: &'a str,
    /// Comma separated.
    pub tags: &'a str,
    /// Category slug.
    pub category: Option<&'a str>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,
    pub status: RecipeStatus,
    pub is_featured: bool,
    pub ingredients: Vec<NewIngredient<'a>>,
    pub steps: Vec<NewRecipeStep<'a>>,
}

impl CreateRecipe<'_> {
    fn validate(&self) -> Result<(), ApiError> {
        super::check_required("title", self.title)?;
        super::check_required("description", self.description)?;
        super::check_required("instructions", self.instructions)?;
        super::check_minutes("preparation time", self.prep_time)?;
        super::check_minutes("cooking time", self.cook_time)?;
        if let Some(total_time) = self.total_time {
            super::check_minutes("total time", total_time)?;
        }
        super::check_servings(self.servings)?;
        for value in [self.calories, self.protein, self.carbohydrates, self.fat] {
            super::check_nutrition(value)?;
        }
        super::check_ingredients(&self.ingredients)?;
        super::check_steps(&self.steps)?;
        Ok(())
    }

    #[tracing::instrument(skip_all, name = "services.recipes.create")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<super::RecipeDetails, ApiError> {
        self.validate()?;

        let mut conn = app.db_write().await?;
        let category_id = match self.category {
            Some(slug) => Some(super::resolve_category(&mut conn, slug).await?),
            None => None,
        };

        let slug = Recipe::unique_slug(&mut conn, self.title).await?;
        let recipe = InsertRecipe::builder()
            .author_id(session_user.id)
            .maybe_category_id(category_id)
            .title(self.title)
            .slug(&slug)
            .description(self.description)
            .short_description(self.short_description)
            .prep_time(self.prep_time)
            .cook_time(self.cook_time)
            .maybe_total_time(self.total_time)
            .servings(self.servings)
            .difficulty(self.difficulty)
            .instructions(self.instructions)
            .tips(self.tips)
            .tags(self.tags)
            .maybe_calories(self.calories)
            .maybe_protein(self.protein)
            .maybe_carbohydrates(self.carbohydrates)
            .maybe_fat(self.fat)
            .status(self.status)
            .is_featured(self.is_featured)
            .build()
            .insert(&mut conn)
            .await?;
        super::replace_contents(
            &mut conn,
            recipe.id,
            Some(self.ingredients.as_slice()),
            Some(self.steps.as_slice()),
        )
        .await?;

        Counter::UserRecipes(session_user.id)
            .refresh(&mut conn)
            .await?;
        if let Some(category_id) = recipe.category_id {
            Counter::CategoryRecipes(category_id)
                .refresh(&mut conn)
                .await?;
        }

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::RecipeCreated)
            .description(activity::describe(
                &session_user.email,
                "created",
                "recipe",
                &recipe.title,
            ))
            .related_object((ObjectType::Recipe, recipe.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let Some(view) = RecipeView::find(&mut conn, recipe.id).await? else {
            return Err(util::recipe_not_found());
        };
        let details = super::RecipeDetails::load(&mut conn, view).await?;
        conn.commit().await?;

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use foodie_model::activity::UserActivity;
    use foodie_model::category::Category;
    use foodie_model::ingredient::IngredientUnit;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_create_recipe() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let category = test_utils::recipes::category()
            .app(&app)
            .name("Rice Dishes")
            .call()
            .await;

        let request = CreateRecipe {
            title: "Chicken Biryani",
            description: "Fragrant rice with chicken.",
            prep_time: 30,
            cook_time: 60,
            servings: 4,
            instructions: "Layer and cook.",
            tags: "rice, chicken",
            category: Some("rice-dishes"),
            status: RecipeStatus::Published,
            ..Default::default()
        };

        let view = request
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .unwrap()
            .view;

        assert_eq!(view.recipe.slug, "chicken-biryani");
        assert_eq!(view.recipe.total_time, 90);
        assert!(view.recipe.published_at.is_some());
        assert_eq!(view.category_slug.as_deref(), Some("rice-dishes"));

        let author = test_utils::users::find(&app, alice.user.id).await;
        assert_eq!(author.recipes_count, 1);

        let mut conn = app.db_read().await.unwrap();
        let category = Category::find(&mut conn, category.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(category.recipe_count, 1);

        let activities = UserActivity::list_for_user(&mut conn, alice.user.id, None, 1)
            .await
            .unwrap();
        assert_eq!(activities[0].activity_type, ActivityType::RecipeCreated);
        assert_eq!(
            activities[0].description,
            "User alice@example.com created recipe: Chicken Biryani"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_give_unique_slugs() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let first = test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Dal")
            .call()
            .await;
        let second = test_utils::recipes::create()
            .app(&app)
            .author(&alice)
            .title("Dal")
            .call()
            .await;

        assert_eq!(first.recipe.slug, "dal");
        assert_eq!(second.recipe.slug, "dal-2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_invalid_recipe() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let request = CreateRecipe {
            title: "Dal",
            description: "Lentils.",
            servings: 0,
            instructions: "Boil.",
            ..Default::default()
        };

        let error = request
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "message": "Recipe must serve at least one person",
            }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_unknown_category() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let request = CreateRecipe {
            title: "Dal",
            description: "Lentils.",
            servings: 2,
            instructions: "Boil.",
            category: Some("nowhere"),
            ..Default::default()
        };

        let error = request
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "message": "Unknown recipe category: nowhere",
            }),
        );

        let author = test_utils::users::find(&app, alice.user.id).await;
        assert_eq!(author.recipes_count, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_create_recipe_with_ingredients_and_steps() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let request = CreateRecipe {
            title: "Khichuri",
            description: "Rainy day comfort.",
            servings: 3,
            instructions: "Cook rice and lentils together.",
            ingredients: vec![
                NewIngredient {
                    name: "Rice",
                    quantity: "1",
                    unit: Some(IngredientUnit::Cup),
                },
                NewIngredient {
                    name: "Lentils",
                    quantity: "1/2",
                    unit: Some(IngredientUnit::Cup),
                },
            ],
            steps: vec![
                NewRecipeStep {
                    step_number: 2,
                    title: "Simmer",
                    description: "Add water and simmer.",
                    timer: Some(1200),
                },
                NewRecipeStep {
                    step_number: 1,
                    title: "Roast",
                    description: "Dry roast the lentils.",
                    timer: None,
                },
            ],
            ..Default::default()
        };

        let details = request
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .unwrap();

        let names = details
            .ingredients
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Lentils", "Rice"]);

        let steps = details
            .steps
            .iter()
            .map(|v| (v.step_number, v.title.as_str(), v.timer))
            .collect::<Vec<_>>();
        assert_eq!(steps, [(1, "Roast", None), (2, "Simmer", Some(1200))]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_repeated_step_numbers() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let step = NewRecipeStep {
            step_number: 1,
            title: "Boil",
            description: "",
            timer: None,
        };
        let request = CreateRecipe {
            title: "Dal",
            description: "Lentils.",
            servings: 2,
            instructions: "Boil.",
            steps: vec![step, step],
            ..Default::default()
        };

        let error = request
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "message": "Step number 1 is used more than once",
            }),
        );

        let author = test_utils::users::find(&app, alice.user.id).await;
        assert_eq!(author.recipes_count, 0);
    }
}
