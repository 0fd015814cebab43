use chrono::{NaiveDate, TimeZone, Utc};

use super::RecipeFilter;
use crate::id::{RecipeId, UserId};
use crate::recipe::{Difficulty, Recipe, RecipeStatus, RecipeView};

fn recipe_view(prep_time: i64, tags: &str) -> RecipeView {
    let created_at = Utc.with_ymd_and_hms(2024, 10, 19, 12, 0, 0).unwrap();
    RecipeView {
        recipe: Recipe {
            id: RecipeId(1),
            author_id: UserId(1),
            category_id: None,
            title: "Chicken Biryani".into(),
            slug: "chicken-biryani".into(),
            description: "Fragrant rice with chicken.".into(),
            short_description: String::new(),
            prep_time,
            cook_time: 45,
            total_time: prep_time + 45,
            servings: 4,
            difficulty: Difficulty::Medium,
            instructions: "Layer and steam.".into(),
            tips: String::new(),
            tags: tags.into(),
            calories: None,
            protein: None,
            carbohydrates: None,
            fat: None,
            status: RecipeStatus::Published,
            is_featured: false,
            views_count: 0,
            likes_count: 0,
            comments_count: 0,
            saves_count: 0,
            created_at,
            updated_at: created_at,
            published_at: Some(created_at),
        },
        author_email: "alice@example.com".into(),
        category_slug: Some("rice".into()),
        category_name: Some("Rice".into()),
        average_rating: 0.0,
        ratings_count: 0,
    }
}

#[test]
fn empty_filter_matches_everything() {
    assert!(RecipeFilter::default().matches(&recipe_view(10, "")));
}

#[test]
fn should_filter_by_prep_time_range() {
    let filter = RecipeFilter {
        min_prep_time: Some(15),
        ..Default::default()
    };

    let matched = [10, 20, 30]
        .into_iter()
        .filter(|prep_time| filter.matches(&recipe_view(*prep_time, "")))
        .collect::<Vec<_>>();

    assert_eq!(matched, [20, 30]);
}

#[test]
fn should_match_any_tag_ignoring_case() {
    let view = recipe_view(10, "Rice,Spicy");

    let filter = RecipeFilter {
        tags: Some(" spicy , sweet ,".into()),
        ..Default::default()
    };
    assert!(filter.matches(&view));

    let filter = RecipeFilter {
        tags: Some("sweet".into()),
        ..Default::default()
    };
    assert!(!filter.matches(&view));

    let filter = RecipeFilter {
        tags: Some(" , ".into()),
        ..Default::default()
    };
    assert!(filter.matches(&view));
}

#[test]
fn created_before_includes_the_whole_day() {
    let view = recipe_view(10, "");
    let day = NaiveDate::from_ymd_opt(2024, 10, 19).unwrap();

    let filter = RecipeFilter {
        created_after: Some(day),
        created_before: Some(day),
        ..Default::default()
    };
    assert!(filter.matches(&view));

    let filter = RecipeFilter {
        created_before: day.pred_opt(),
        ..Default::default()
    };
    assert!(!filter.matches(&view));
}

#[test]
fn has_nutrition_only_constrains_when_true() {
    let mut view = recipe_view(10, "");

    let wants_nutrition = RecipeFilter {
        has_nutrition: Some(true),
        ..Default::default()
    };
    let ignores_nutrition = RecipeFilter {
        has_nutrition: Some(false),
        ..Default::default()
    };

    assert!(!wants_nutrition.matches(&view));
    assert!(ignores_nutrition.matches(&view));

    view.recipe.protein = Some(12.5);
    assert!(wants_nutrition.matches(&view));
    assert!(ignores_nutrition.matches(&view));
}

#[test]
fn should_search_title_and_description() {
    let view = recipe_view(10, "");

    for (term, expected) in [("BIRYANI", true), ("fragrant", true), ("  ", true), ("beef", false)]
    {
        let filter = RecipeFilter {
            search: Some(term.into()),
            ..Default::default()
        };
        assert_eq!(filter.matches(&view), expected, "{term}");
    }
}

#[test]
fn should_compare_author_and_rating() {
    let mut view = recipe_view(10, "");
    view.average_rating = 3.5;

    let filter = RecipeFilter {
        author: Some("ALICE@example.com".into()),
        min_rating: Some(3.0),
        difficulty: Some(Difficulty::Medium),
        category: Some("rice".into()),
        ..Default::default()
    };
    assert!(filter.matches(&view));

    let filter = RecipeFilter {
        min_rating: Some(4.0),
        ..Default::default()
    };
    assert!(!filter.matches(&view));
}

#[test]
fn should_deserialize_from_query_string_shape() {
    let filter: RecipeFilter = serde_json::from_value(serde_json::json!({
        "difficulty": "hard",
        "min_servings": 2,
        "created_after": "2024-01-31",
    }))
    .unwrap();

    assert_eq!(filter.difficulty, Some(Difficulty::Hard));
    assert_eq!(filter.min_servings, Some(2));
    assert_eq!(filter.created_after, NaiveDate::from_ymd_opt(2024, 1, 31));
}
