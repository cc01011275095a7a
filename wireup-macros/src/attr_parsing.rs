use quote::ToTokens;
use syn::{
    parse::{Parse, ParseStream},
    Attribute, Ident, Token,
};

/// `key = value` inside an attribute
pub(crate) struct Assignment<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K: Parse, V: Parse> Parse for Assignment<K, V> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let key = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;
        Ok(Self { key, value })
    }
}

/// Parses `key = value` into `slot`, which must still be empty
pub(crate) fn parse_assignment_once<K, V>(input: ParseStream<'_>, slot: &mut Option<V>) -> syn::Result<()>
where
    K: Parse + ToTokens,
    V: Parse,
{
    let Assignment { key, value } = input.parse::<Assignment<K, V>>()?;
    if slot.replace(value).is_some() {
        let message = format!("`{}` specified more than once", key.to_token_stream());
        return Err(syn::Error::new_spanned(key, message));
    }
    Ok(())
}

/// Helper attribute whose args start with the name of a constructor arg
pub(crate) trait ArgAttr: Parse {
    const IDENT: &'static str;
    const DUPLICATE: &'static str;

    fn arg(&self) -> &Ident;
}

/// Parses every `#[T::IDENT(..)]` of `attrs` in order. One arg can't be named by two of them.
pub(crate) fn parse_arg_attrs<T: ArgAttr>(attrs: &[Attribute]) -> syn::Result<Vec<T>> {
    let mut parsed = Vec::<T>::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(T::IDENT)) {
        let next = attr.parse_args::<T>()?;
        if parsed.iter().any(|prev| prev.arg() == next.arg()) {
            return Err(syn::Error::new_spanned(next.arg(), T::DUPLICATE));
        }
        parsed.push(next);
    }
    Ok(parsed)
}
