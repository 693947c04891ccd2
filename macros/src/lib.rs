mod model;
mod route;

use proc_macro::TokenStream;

/// Creates the documentation function for a route handler, named after the
/// handler with the suffix `_docs`, from the handler's doc comment.
///
/// The first line of the doc comment becomes the operation summary and the
/// remaining lines the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two companion structs for the model: `Create<X>Input` and
/// `Update<X>Input`.
///
/// Fields marked `#[serde(skip_deserializing)]` or `#[serde(skip)]` are
/// omitted from both; every other field is carried over verbatim in the
/// create struct and wrapped in `Option` in the update struct.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
