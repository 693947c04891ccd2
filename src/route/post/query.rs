use std::str::FromStr;

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::Database;

use super::{model, Error};

/// The columns a client may order a post listing by.
///
/// A closed enumeration, mapped to column names below, so a client-supplied
/// sort field can never reach the SQL layer as raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
	Content,
	CreatedAt,
}

impl SortField {
	fn column(self) -> &'static str {
		match self {
			Self::Content => "content",
			Self::CreatedAt => "created_at",
		}
	}
}

impl FromStr for SortField {
	type Err = Error;

	fn from_str(field: &str) -> Result<Self, Self::Err> {
		match field.to_lowercase().as_str() {
			"content" => Ok(Self::Content),
			"createdat" | "created_at" => Ok(Self::CreatedAt),
			_ => Err(Error::UnknownSortField(field.to_owned())),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
	Asc,
	Desc,
}

impl SortDirection {
	fn keyword(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

impl FromStr for SortDirection {
	type Err = Error;

	fn from_str(direction: &str) -> Result<Self, Self::Err> {
		match direction.to_lowercase().as_str() {
			"asc" => Ok(Self::Asc),
			"desc" => Ok(Self::Desc),
			_ => Err(Error::UnknownSortDirection(direction.to_owned())),
		}
	}
}

/// A validated ordering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
	pub field: SortField,
	pub direction: SortDirection,
}

impl Sort {
	/// Parses a `field,direction` token, e.g. `createdAt,desc`.
	///
	/// Both parts must be present and non-blank; the field must be in the
	/// sortable allow-list and the direction `asc` or `desc`, in any case.
	pub fn parse(token: &str) -> Result<Self, Error> {
		let (field, direction) = token
			.split_once(',')
			.ok_or_else(|| Error::MalformedSort(token.to_owned()))?;

		let (field, direction) = (field.trim(), direction.trim());

		if field.is_empty() || direction.is_empty() {
			return Err(Error::MalformedSort(token.to_owned()));
		}

		Ok(Self {
			field: field.parse()?,
			direction: direction.parse()?,
		})
	}
}

impl Default for Sort {
	/// Newest first.
	fn default() -> Self {
		Self {
			field: SortField::CreatedAt,
			direction: SortDirection::Desc,
		}
	}
}

/// The optional predicates a listing may be narrowed by, ANDed together.
///
/// Both [`fetch_page`] and [`count`] render their WHERE clause through
/// [`Filter::push`], which is what keeps the page and the total in
/// agreement for any combination of parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Filter {
	user_id: Option<Uuid>,
	search: Option<String>,
}

impl Filter {
	/// Blank search text (after trimming) counts as absent.
	pub fn new(user_id: Option<Uuid>, search: Option<&str>) -> Self {
		Self {
			user_id,
			search: search
				.map(str::trim)
				.filter(|search| !search.is_empty())
				.map(str::to_owned),
		}
	}

	/// Appends a WHERE clause covering every present condition. With no
	/// conditions present, appends nothing and the query matches all rows.
	fn push<'args>(&'args self, query: &mut QueryBuilder<'args, Postgres>) {
		if self.user_id.is_none() && self.search.is_none() {
			return;
		}

		query.push(" WHERE ");

		let mut clause = query.separated(" AND ");

		if let Some(user_id) = self.user_id {
			clause
				.push("user_id = ")
				.push_bind_unseparated(user_id);
		}

		if let Some(search) = &self.search {
			clause
				.push("content ILIKE '%' || ")
				.push_bind_unseparated(search.as_str())
				.push_unseparated(" || '%'");
		}
	}
}

const POST_COLUMNS: &str = "id, user_id, content, created_at, updated_at";

/// Fetches one page of posts matching `filter`.
///
/// Rows are ordered by the resolved sort column and direction with an
/// `id ASC` tie-break, so pages are stable across requests even when the
/// primary sort key has duplicate values.
pub async fn fetch_page(
	database: &Database,
	filter: &Filter,
	sort: Sort,
	offset: i64,
	limit: i64,
) -> sqlx::Result<Vec<model::Post>> {
	let mut query = QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts"));

	filter.push(&mut query);

	query
		.push(" ORDER BY ")
		.push(sort.field.column())
		.push(" ")
		.push(sort.direction.keyword())
		.push(", id ASC LIMIT ")
		.push_bind(limit)
		.push(" OFFSET ")
		.push_bind(offset);

	query
		.build_query_as::<model::Post>()
		.fetch_all(database)
		.await
}

/// Counts every post matching `filter`, ignoring pagination.
pub async fn count(database: &Database, filter: &Filter) -> sqlx::Result<i64> {
	let mut query = QueryBuilder::new("SELECT COUNT(*) FROM posts");

	filter.push(&mut query);

	query.build_query_scalar::<i64>().fetch_one(database).await
}

#[cfg(test)]
mod test {
	use super::*;

	fn rendered(filter: &Filter) -> String {
		let mut query = QueryBuilder::<Postgres>::new("SELECT 1 FROM posts");

		filter.push(&mut query);
		query.sql().to_owned()
	}

	#[test]
	fn test_sort_token_accepts_allowed_fields() {
		let sort = Sort::parse("content,asc").unwrap();

		assert_eq!(sort.field, SortField::Content);
		assert_eq!(sort.direction, SortDirection::Asc);

		// Case-insensitive, both spellings of the timestamp column.
		assert_eq!(
			Sort::parse("createdAt,DESC").unwrap().field,
			SortField::CreatedAt
		);
		assert_eq!(
			Sort::parse("CREATED_AT,desc").unwrap().field,
			SortField::CreatedAt
		);
	}

	#[test]
	fn test_sort_token_trims_whitespace() {
		let sort = Sort::parse(" content , desc ").unwrap();

		assert_eq!(sort.field, SortField::Content);
		assert_eq!(sort.direction, SortDirection::Desc);
	}

	#[test]
	fn test_sort_token_rejects_unknown_field() {
		assert!(matches!(
			Sort::parse("id,asc"),
			Err(Error::UnknownSortField(..))
		));
		assert!(matches!(
			Sort::parse("bogus,asc"),
			Err(Error::UnknownSortField(..))
		));
	}

	#[test]
	fn test_sort_token_rejects_unknown_direction() {
		assert!(matches!(
			Sort::parse("content,sideways"),
			Err(Error::UnknownSortDirection(..))
		));
	}

	#[test]
	fn test_sort_token_rejects_malformed_input() {
		for token in ["", "content", ",", "content,", ",asc", " , "] {
			assert!(
				matches!(Sort::parse(token), Err(Error::MalformedSort(..))),
				"{token:?} should be malformed",
			);
		}
	}

	#[test]
	fn test_default_sort_is_newest_first() {
		let sort = Sort::default();

		assert_eq!(sort.field, SortField::CreatedAt);
		assert_eq!(sort.direction, SortDirection::Desc);
	}

	#[test]
	fn test_filter_treats_blank_search_as_absent() {
		assert_eq!(Filter::new(None, Some("   ")), Filter::new(None, None));
		assert_eq!(
			Filter::new(None, Some(" hello ")),
			Filter::new(None, Some("hello"))
		);
	}

	#[test]
	fn test_empty_filter_matches_all_rows() {
		assert_eq!(rendered(&Filter::new(None, None)), "SELECT 1 FROM posts");
	}

	#[test]
	fn test_filter_conditions_are_anded() {
		let user_id = Uuid::new_v4();

		assert_eq!(
			rendered(&Filter::new(Some(user_id), None)),
			"SELECT 1 FROM posts WHERE user_id = $1"
		);
		assert_eq!(
			rendered(&Filter::new(None, Some("hello"))),
			"SELECT 1 FROM posts WHERE content ILIKE '%' || $1 || '%'"
		);
		assert_eq!(
			rendered(&Filter::new(Some(user_id), Some("hello"))),
			"SELECT 1 FROM posts WHERE user_id = $1 AND content ILIKE '%' || $2 || '%'"
		);
	}
}
