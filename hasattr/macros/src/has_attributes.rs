use crate::CRATE;
use quote::quote;
use syn::spanned::Spanned;

pub fn derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input: syn::DeriveInput = syn::parse_macro_input!(input as syn::DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        syn::Data::Struct(s) => &s.fields,
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "`HasAttributes` can only be derived on structs",
            ))
        }
    };

    let store_field = store_field(input, fields)?;
    let schema = schema_entries(input)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let schema_fn = match schema {
        Some(entries) => {
            let keys = entries.iter().map(|(key, _)| key);
            let descriptors = entries.iter().map(|(_, ty)| ty);
            quote! {
                fn schema() -> ::std::option::Option<::std::sync::Arc<#CRATE::Schema>> {
                    #CRATE::__private::lazy_static! {
                        static ref SCHEMA: ::std::sync::Arc<#CRATE::Schema> = ::std::sync::Arc::new(
                            #CRATE::Schema::new()#(.attribute(#keys, #descriptors))*
                        );
                    }
                    ::std::option::Option::Some(::std::sync::Arc::clone(&*SCHEMA))
                }
            }
        }
        None => quote! {},
    };

    Ok(quote! {
        impl #impl_generics #CRATE::HasAttributes for #name #ty_generics #where_clause {
            #schema_fn

            fn attribute_store(&self) -> &#CRATE::AttributeStore {
                &self.#store_field
            }

            fn attribute_store_mut(&mut self) -> &mut #CRATE::AttributeStore {
                &mut self.#store_field
            }
        }
    })
}

/// Finds the field marked `#[attributes]`.
fn store_field(input: &syn::DeriveInput, fields: &syn::Fields) -> syn::Result<proc_macro2::TokenStream> {
    let mut found = None;

    for (i, field) in fields.iter().enumerate() {
        if !field.attrs.iter().any(|attr| attr.path.is_ident("attributes")) {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new(
                field.span(),
                "only one field can be marked `#[attributes]`",
            ));
        }
        found = Some(match &field.ident {
            Some(ident) => quote!(#ident),
            None => {
                let index = syn::Index::from(i);
                quote!(#index)
            }
        });
    }

    found.ok_or_else(|| {
        syn::Error::new(
            input.ident.span(),
            "`HasAttributes` needs a field of type `AttributeStore` marked `#[attributes]`",
        )
    })
}

/// Parses `#[schema(name = "descriptor", ...)]`. Returns `None` if the attribute is absent.
fn schema_entries(input: &syn::DeriveInput) -> syn::Result<Option<Vec<(String, String)>>> {
    let mut entries: Option<Vec<(String, String)>> = None;

    for attr in input.attrs.iter().filter(|attr| attr.path.is_ident("schema")) {
        let entries = entries.get_or_insert_with(Vec::new);
        let list = match attr.parse_meta()? {
            syn::Meta::List(list) => list,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "expected `#[schema(name = \"type\", ...)]`",
                ))
            }
        };

        for nested in list.nested.iter() {
            let nv = match nested {
                syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) => nv,
                other => return Err(syn::Error::new(other.span(), "expected `name = \"type\"`")),
            };
            let key = match nv.path.get_ident() {
                Some(ident) => ident.to_string(),
                None => return Err(syn::Error::new(nv.path.span(), "expected an attribute name")),
            };
            let ty = match &nv.lit {
                syn::Lit::Str(s) if !s.value().is_empty() => s.value(),
                other => return Err(syn::Error::new(other.span(), "expected a non-empty type name")),
            };
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(syn::Error::new(
                    nv.path.span(),
                    format!("attribute `{}` is declared twice", key),
                ));
            }
            entries.push((key, ty));
        }
    }

    Ok(entries)
}
