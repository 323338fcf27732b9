//! `#[derive(Reflect)]` for queryfilter.
//!
//! ```ignore
//! use queryfilter::Reflect;
//!
//! #[derive(Reflect)]
//! struct Filters {
//!     #[tag(filter = "age,op=gte")]
//!     min_age: Option<i32>,
//!     #[tag(filter = "color", qf = "colour")]
//!     color: Option<String>,
//!     // untagged fields are listed but never read
//!     cursor: Option<SomeCursor>,
//! }
//! ```
//!
//! Each `key = "text"` pair inside `#[tag(...)]` becomes one tag, so the tag
//! key the renderer looks for can be chosen at runtime. Type parameters used
//! by tagged fields get a `Reflect` bound. A unit struct is an empty record.

use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields, Ident, LitStr};

#[proc_macro_derive(Reflect, attributes(tag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let empty = Punctuated::<Field, Comma>::new();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => &empty,
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Reflect can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect can only be derived for structs",
            ));
        }
    };

    let params: Vec<&Ident> = input.generics.type_params().map(|p| &p.ident).collect();
    let mut bounded: Vec<&Ident> = Vec::new();

    let mut entries = Vec::with_capacity(fields.len());
    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let field_name = ident.unraw().to_string();
        let tags = parse_tags(&field.attrs)?;

        if tags.is_empty() {
            entries.push(quote! {
                ::queryfilter::Field::opaque(#field_name)
            });
            continue;
        }

        for param in &params {
            if !bounded.contains(param) && mentions(field.ty.to_token_stream(), param) {
                bounded.push(*param);
            }
        }

        let keys = tags.iter().map(|(k, _)| k);
        let texts = tags.iter().map(|(_, t)| t);
        entries.push(quote! {
            ::queryfilter::Field::new(#field_name, ::queryfilter::Reflect::reflect(&self.#ident))
                #(.with_tag(#keys, #texts))*
        });
    }

    let mut generics = input.generics.clone();
    for param in bounded {
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(#param: ::queryfilter::Reflect));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::queryfilter::Reflect for #name #ty_generics #where_clause {
            fn reflect(&self) -> ::queryfilter::Reflected {
                ::queryfilter::Reflected::Record(::std::vec![#(#entries),*])
            }
        }
    })
}

/// Whether a type mentions the type parameter `param` anywhere.
fn mentions(ty: TokenStream2, param: &Ident) -> bool {
    ty.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => ident == *param,
        TokenTree::Group(group) => mentions(group.stream(), param),
        _ => false,
    })
}

/// Collect `key = "text"` pairs from every `#[tag(...)]` attribute.
fn parse_tags(attrs: &[syn::Attribute]) -> syn::Result<Vec<(String, LitStr)>> {
    let mut tags = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("tag") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let key = meta
                .path
                .get_ident()
                .map(|i| i.to_string())
                .ok_or_else(|| meta.error("expected a tag key, e.g. filter = \"col,op=eq\""))?;
            if tags.iter().any(|(k, _)| k == &key) {
                return Err(meta.error(format!("duplicate tag key `{}`", key)));
            }
            let text: LitStr = meta.value()?.parse()?;
            tags.push((key, text));
            Ok(())
        })?;
    }

    Ok(tags)
}
