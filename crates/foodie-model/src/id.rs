use thiserror::Error;

macro_rules! newtypes {
    {
        $( $Ident:ident: $ty:ty, )*
    } => {$(
        #[derive(Debug, serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $Ident(pub $ty);

        impl From<$ty> for $Ident {
            fn from(value: $ty) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $Ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $Ident
        where
            $ty: sqlx::Encode<'q, sqlx::Sqlite>,
        {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <$ty>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $Ident
        where
            $ty: sqlx::Decode<'r, sqlx::Sqlite>,
        {
            fn decode(
                value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let inner = <$ty>::decode(value)?;
                if inner < 0 {
                    return Err(Box::new(NegativeId));
                }

                Ok(Self(inner))
            }
        }

        impl<DB: sqlx::Database> sqlx::Type<DB> for $Ident
        where
            $ty: sqlx::Type<DB>,
        {
            fn type_info() -> <DB as sqlx::Database>::TypeInfo {
                <$ty>::type_info()
            }

            fn compatible(ty: &<DB as sqlx::Database>::TypeInfo) -> bool {
                <$ty>::compatible(ty)
            }
        }
    )*};
}

#[derive(Debug, Error)]
#[error("unexpected ID has a negative value")]
struct NegativeId;

newtypes! {
    UserId: i64,
    FollowerId: i64,

    CategoryId: i64,
    RecipeId: i64,
    RatingId: i64,
    RecipeCommentId: i64,
    IngredientId: i64,
    RecipeStepId: i64,

    BlogCategoryId: i64,
    BlogId: i64,
    BlogCommentId: i64,

    ActivityId: i64,
}
