use sea_query::{
    Alias, Asterisk, Condition, Expr, Func, LikeExpr, Order, Query, SelectStatement, SimpleExpr,
    SubQueryStatement,
};

use crate::category::CategoryIdent;
use crate::filter::{RecipeFilter, RecipeOrdering};
use crate::rating::RatingIdent;
use crate::reaction::ReactionIdent;
use crate::recipe::RecipeIdent;
use crate::user::UserIdent;

const fn col(column: RecipeIdent) -> (RecipeIdent, RecipeIdent) {
    (RecipeIdent::Recipes, column)
}

const LIKE_ESCAPE: char = '!';

/// `%term%` with `LIKE` wildcards escaped.
pub(crate) fn like_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn rating_subquery(value: SimpleExpr) -> SimpleExpr {
    let select = Query::select()
        .expr(value)
        .from(RatingIdent::RecipeRatings)
        .and_where(
            Expr::col((RatingIdent::RecipeRatings, RatingIdent::RecipeId))
                .equals(col(RecipeIdent::Id)),
        )
        .to_owned();

    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(select)))
}

/// Average rating of the current recipe row, `0.0` if unrated.
pub(crate) fn average_rating() -> SimpleExpr {
    Func::coalesce([
        rating_subquery(Func::avg(Expr::col(RatingIdent::Rating)).into()),
        Expr::val(0.0).into(),
    ])
    .into()
}

pub(crate) fn ratings_count() -> SimpleExpr {
    rating_subquery(Func::count(Expr::col(Asterisk)).into())
}

/// `SELECT recipes.*, <author>, <category>, <rating summary>` with the
/// joins every [`RecipeFilter`] condition relies on.
pub(crate) fn recipe_view_select() -> SelectStatement {
    let mut select = Query::select();
    select
        .column((RecipeIdent::Recipes, Asterisk))
        .expr_as(
            Expr::col((UserIdent::Users, UserIdent::Email)),
            Alias::new("author_email"),
        )
        .expr_as(
            Expr::col((CategoryIdent::Categories, CategoryIdent::Slug)),
            Alias::new("category_slug"),
        )
        .expr_as(
            Expr::col((CategoryIdent::Categories, CategoryIdent::Name)),
            Alias::new("category_name"),
        )
        .expr_as(average_rating(), Alias::new("average_rating"))
        .expr_as(ratings_count(), Alias::new("ratings_count"));

    with_joins(&mut select);
    select
}

/// `SELECT COUNT(*)` over the same rows as [`recipe_view_select`].
pub(crate) fn recipe_count_select() -> SelectStatement {
    let mut select = Query::select();
    select.expr(Func::count(Expr::col(col(RecipeIdent::Id))));
    with_joins(&mut select);
    select
}

fn with_joins(select: &mut SelectStatement) {
    select
        .from(RecipeIdent::Recipes)
        .inner_join(
            UserIdent::Users,
            Expr::col((UserIdent::Users, UserIdent::Id)).equals(col(RecipeIdent::AuthorId)),
        )
        .left_join(
            CategoryIdent::Categories,
            Expr::col((CategoryIdent::Categories, CategoryIdent::Id))
                .equals(col(RecipeIdent::CategoryId)),
        );
}

fn in_range(
    condition: Condition,
    column: RecipeIdent,
    min: Option<i64>,
    max: Option<i64>,
) -> Condition {
    let condition = match min {
        Some(min) => condition.add(Expr::col(col(column)).gte(min)),
        None => condition,
    };
    match max {
        Some(max) => condition.add(Expr::col(col(column)).lte(max)),
        None => condition,
    }
}

impl RecipeFilter {
    pub(crate) fn condition(&self) -> Condition {
        use RecipeIdent as R;

        let mut cond = Condition::all();
        cond = in_range(cond, R::PrepTime, self.min_prep_time, self.max_prep_time);
        cond = in_range(cond, R::CookTime, self.min_cook_time, self.max_cook_time);
        cond = in_range(cond, R::TotalTime, self.min_total_time, self.max_total_time);
        cond = in_range(cond, R::Servings, self.min_servings, self.max_servings);

        if let Some(difficulty) = self.difficulty {
            cond = cond.add(Expr::col(col(R::Difficulty)).eq(difficulty.as_str()));
        }
        if let Some(status) = self.status {
            cond = cond.add(Expr::col(col(R::Status)).eq(status.as_str()));
        }
        if let Some(is_featured) = self.is_featured {
            cond = cond.add(Expr::col(col(R::IsFeatured)).eq(is_featured));
        }
        if let Some(author_id) = self.author_id {
            cond = cond.add(Expr::col(col(R::AuthorId)).eq(author_id.0));
        }

        if let Some(category) = self.category.as_deref() {
            let slug = Expr::col((CategoryIdent::Categories, CategoryIdent::Slug));
            cond = cond.add(slug.eq(category));
        }

        // `users.email` is declared with `COLLATE NOCASE`
        if let Some(author) = self.author.as_deref() {
            let email = Expr::col((UserIdent::Users, UserIdent::Email));
            cond = cond.add(email.eq(author.trim()));
        }

        let tags = self.tag_list();
        if !tags.is_empty() {
            let any = tags.into_iter().fold(Condition::any(), |any, tag| {
                any.add(Expr::col(col(R::Tags)).like(like_pattern(tag)))
            });
            cond = cond.add(any);
        }

        if let Some(min_rating) = self.min_rating {
            cond = cond.add(Expr::expr(average_rating()).gte(min_rating));
        }

        if let Some(from) = self.created_from() {
            cond = cond.add(Expr::col(col(R::CreatedAt)).gte(from));
        }
        if let Some(until) = self.created_until() {
            cond = cond.add(Expr::col(col(R::CreatedAt)).lt(until));
        }

        if self.has_nutrition == Some(true) {
            cond = cond.add(
                Condition::any()
                    .add(Expr::col(col(R::Calories)).is_not_null())
                    .add(Expr::col(col(R::Protein)).is_not_null())
                    .add(Expr::col(col(R::Carbohydrates)).is_not_null())
                    .add(Expr::col(col(R::Fat)).is_not_null()),
            );
        }

        if let Some(term) = self.search_term() {
            let any = [R::Title, R::Description, R::ShortDescription, R::Tags]
                .into_iter()
                .fold(Condition::any(), |any, column| {
                    any.add(Expr::col(col(column)).like(like_pattern(term)))
                });
            cond = cond.add(any);
        }

        if let Some(user_id) = self.saved_by {
            cond = cond.add(
                Expr::col(col(R::Id)).in_subquery(
                    Query::select()
                        .column(ReactionIdent::RecipeId)
                        .from(ReactionIdent::RecipeSaves)
                        .and_where(Expr::col(ReactionIdent::UserId).eq(user_id.0))
                        .take(),
                ),
            );
        }

        cond
    }
}

impl RecipeOrdering {
    pub(crate) fn apply(self, select: &mut SelectStatement) {
        use RecipeIdent as R;

        match self {
            Self::Newest | Self::Oldest => {}
            Self::Views => {
                select.order_by(col(R::ViewsCount), Order::Desc);
            }
            Self::Likes => {
                select.order_by(col(R::LikesCount), Order::Desc);
            }
            Self::Comments => {
                select.order_by(col(R::CommentsCount), Order::Desc);
            }
            Self::Saves => {
                select.order_by(col(R::SavesCount), Order::Desc);
            }
            Self::Title => {
                select.order_by(col(R::Title), Order::Asc);
            }
            Self::Rating => {
                select.order_by_expr(average_rating(), Order::Desc);
            }
            Self::Popular => {
                select
                    .order_by(col(R::ViewsCount), Order::Desc)
                    .order_by(col(R::LikesCount), Order::Desc);
            }
        }

        let order = if self == Self::Oldest {
            Order::Asc
        } else {
            Order::Desc
        };
        select
            .order_by(col(R::CreatedAt), order.clone())
            .order_by(col(R::Id), order);
    }
}
