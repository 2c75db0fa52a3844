#![recursion_limit = "256"]
extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{ToTokens, TokenStreamExt};

mod has_attributes;

//--------------------------------------------------------------------------------------------------
struct CrateName;
const CRATE: CrateName = CrateName;

impl ToTokens for CrateName {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        tokens.append(syn::Ident::new("hasattr", Span::call_site()))
    }
}

//--------------------------------------------------------------------------------------------------
#[proc_macro_derive(HasAttributes, attributes(attributes, schema))]
pub fn has_attributes_derive(input: TokenStream) -> TokenStream {
    has_attributes::derive(input)
}
