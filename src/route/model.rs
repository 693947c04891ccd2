use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

/// A single page of results plus the metadata needed to walk the full
/// result set.
///
/// `total_elements` counts every row matching the filter, ignoring
/// pagination; `total_pages` is the integer ceiling of that count over the
/// page size, so an empty result set has zero pages and is still a valid
/// response.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
	pub content: Vec<T>,
	pub page: i64,
	pub size: i64,
	pub total_elements: i64,
	pub total_pages: i64,
}

impl<T> PagedResponse<T> {
	/// Assembles the envelope. `size` must be positive, which every caller
	/// guarantees through request validation.
	pub fn new(content: Vec<T>, page: i64, size: i64, total_elements: i64) -> Self {
		Self {
			content,
			page,
			size,
			total_elements,
			total_pages: (total_elements + size - 1) / size,
		}
	}
}

#[cfg(test)]
mod test {
	use super::PagedResponse;

	#[test]
	fn test_total_pages_rounds_up() {
		let page = PagedResponse::new(vec![1, 2, 3], 0, 2, 7);

		assert_eq!(page.total_pages, 4);

		let page = PagedResponse::new(vec![1, 2], 0, 2, 6);

		assert_eq!(page.total_pages, 3);
	}

	#[test]
	fn test_empty_result_has_zero_pages() {
		let page = PagedResponse::<i64>::new(Vec::new(), 0, 10, 0);

		assert_eq!(page.total_elements, 0);
		assert_eq!(page.total_pages, 0);
	}

	#[test]
	fn test_envelope_field_names() {
		let page = PagedResponse::new(vec![1], 1, 5, 11);
		let value = serde_json::to_value(&page).unwrap();

		assert_eq!(value["totalElements"], 11);
		assert_eq!(value["totalPages"], 3);
		assert_eq!(value["page"], 1);
		assert_eq!(value["size"], 5);
	}
}
