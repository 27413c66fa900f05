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

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $Ident {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <$ty as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $Ident {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let inner = <$ty as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                if inner < 0 {
                    return Err(Box::new(NegativeId));
                }

                Ok(Self(inner))
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $Ident {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <$ty as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }
    )*};
}

#[derive(Debug, Error)]
#[error("unexpected ID has a negative value")]
struct NegativeId;

newtypes! {
    UserId: i64,
    PostId: i64,
    CommentId: i64,
    RelationId: i64,
}
