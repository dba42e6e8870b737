//! Menu item categories.

use serde::{Deserialize, Serialize};

/// Category of a menu item.
///
/// The wire format is the SCREAMING_SNAKE_CASE name (`MAIN_COURSE`), both in
/// JSON and in the database TEXT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Appetizer,
    MainCourse,
    Dessert,
    Beverage,
    Special,
}

impl Category {
    /// All categories, in menu display order.
    pub const ALL: [Self; 5] = [
        Self::Appetizer,
        Self::MainCourse,
        Self::Dessert,
        Self::Beverage,
        Self::Special,
    ];

    /// Wire-format name (`APPETIZER`, `MAIN_COURSE`, ...).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Appetizer => "APPETIZER",
            Self::MainCourse => "MAIN_COURSE",
            Self::Dessert => "DESSERT",
            Self::Beverage => "BEVERAGE",
            Self::Special => "SPECIAL",
        }
    }

    /// Human-readable section heading for menus.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Appetizer => "Appetizers",
            Self::MainCourse => "Main Courses",
            Self::Dessert => "Desserts",
            Self::Beverage => "Beverages",
            Self::Special => "Chef's Specials",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPETIZER" => Ok(Self::Appetizer),
            "MAIN_COURSE" => Ok(Self::MainCourse),
            "DESSERT" => Ok(Self::Dessert),
            "BEVERAGE" => Ok(Self::Beverage),
            "SPECIAL" => Ok(Self::Special),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Category {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Category {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<Self>().map_err(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Category {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Category::MainCourse).unwrap();
        assert_eq!(json, "\"MAIN_COURSE\"");

        let parsed: Category = serde_json::from_str("\"SPECIAL\"").unwrap();
        assert_eq!(parsed, Category::Special);
    }

    #[test]
    fn test_rejects_unknown_category() {
        assert!("SIDE_DISH".parse::<Category>().is_err());
        assert!(serde_json::from_str::<Category>("\"side\"").is_err());
    }
}
