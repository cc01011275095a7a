use proc_macro::TokenStream;
use quote::{quote, ToTokens};
use std::env::var_os;
use syn::parse::Parse;

mod attr_parsing;
mod injectable;

/// Implements `wireup::Injectable`.
///
/// On an inherent `impl` block, the method marked `#[constructor]` (or the method named `new`)
/// becomes the constructor, and its params become the args to inject.
/// The constructor accepts `#[inject(arg, with_instance = expr)]`, `#[inject(arg, with_class = Type)]`,
/// `#[inject(arg, with_provider = expr)]` and `#[annotate_arg(arg, "annotation")]`.
///
/// On a struct, the class is constructed with `Default`.
#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let err = syn::Error::new(proc_macro2::Span::call_site(), "#[injectable] takes no arguments");
        return err.into_compile_error().into();
    }
    expand_with(item, injectable::expand)
}

fn expand_with<F, I, K>(input: TokenStream, f: F) -> TokenStream
where
    F: FnOnce(I) -> syn::Result<K>,
    I: Parse,
    K: ToTokens,
{
    expand(syn::parse(input).and_then(f))
}

fn expand<T>(result: syn::Result<T>) -> TokenStream
where
    T: ToTokens,
{
    match result {
        Ok(tokens) => {
            let tokens = (quote! { #tokens }).into();
            if var_os("MACROS_DEBUG").is_some() {
                eprintln!("{tokens}");
            }
            tokens
        }
        Err(err) => err.into_compile_error().into(),
    }
}
