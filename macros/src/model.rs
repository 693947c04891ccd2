use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::{TokenStream, TokenTree};
use quote::{format_ident, quote, ToTokens};
use syn::{punctuated::Punctuated, Meta, Token};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelField>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelField {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

/// Whether the field carries `#[serde(skip_deserializing)]` or
/// `#[serde(skip)]` and should therefore not appear in the input structs.
fn is_server_populated(field: &ModelField) -> bool {
	field.attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(
				token,
				TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip"
			)
		})
	})
}

/// Re-emits the struct's attributes for the generated input structs,
/// dropping `sqlx::FromRow` from any derive list: the inputs are request
/// bodies, not database rows.
fn input_attrs(attrs: &[syn::Attribute]) -> Vec<TokenStream> {
	attrs
		.iter()
		.map(|attr| {
			if attr.path().is_ident("derive") {
				if let Meta::List(ref list) = attr.meta {
					if let Ok(paths) = list
						.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
					{
						let derives = paths.into_iter().filter(|path| {
							path.segments
								.last()
								.map_or(true, |segment| segment.ident != "FromRow")
						});

						return quote!(#[derive(#(#derives),*)]);
					}
				}
			}

			quote!(#attr)
		})
		.collect()
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelReceiver::from_derive_input(&input) {
		Ok(receiver) => receiver,
		Err(error) => return error.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}Input", ident);
	let update_ident = format_ident!("Update{}Input", ident);

	let attrs = input_attrs(&receiver.attrs);

	let fields = receiver.data.take_struct().expect("expected struct");
	let fields = fields
		.iter()
		.filter(|field| !is_server_populated(field))
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;

			Some((&field.attrs, ident, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: Option<#ty>,
		}
	});

	quote! {
		#input

		#(#attrs)*
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#(#attrs)*
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}
