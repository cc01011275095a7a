use syn::{
    parse::{Parse, ParseStream},
    Attribute, Expr, Ident, LitStr, Token, Type,
};

use crate::attr_parsing::{parse_arg_attrs, parse_assignment_once, ArgAttr};

pub(crate) mod kw {
    syn::custom_keyword!(with_instance);
    syn::custom_keyword!(with_class);
    syn::custom_keyword!(with_provider);
}

pub(crate) enum InjectSource {
    Instance(Expr),
    Class(Type),
    Provider(Expr),
}

pub(crate) struct InjectArg {
    pub(super) name: Ident,
    pub(super) source: InjectSource,
}

impl Parse for InjectArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse::<Ident>()?;
        input.parse::<Token![,]>()?;

        let mut instance = None::<Expr>;
        let mut class = None::<Type>;
        let mut provider = None::<Expr>;

        while !input.is_empty() {
            let lh = input.lookahead1();
            if lh.peek(kw::with_instance) {
                parse_assignment_once::<kw::with_instance, _>(input, &mut instance)?;
            } else if lh.peek(kw::with_class) {
                parse_assignment_once::<kw::with_class, _>(input, &mut class)?;
            } else if lh.peek(kw::with_provider) {
                parse_assignment_once::<kw::with_provider, _>(input, &mut provider)?;
            } else {
                return Err(lh.error());
            }

            let _ = input.parse::<Token![,]>();
        }

        let source = match (instance, class, provider) {
            (Some(expr), None, None) => InjectSource::Instance(expr),
            (None, Some(ty), None) => InjectSource::Class(ty),
            (None, None, Some(expr)) => InjectSource::Provider(expr),
            (None, None, None) => {
                return Err(syn::Error::new_spanned(
                    &name,
                    "expected one of `with_instance`, `with_class` or `with_provider`",
                ))
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    &name,
                    "only one of `with_instance`, `with_class` or `with_provider` can be specified",
                ))
            }
        };

        Ok(Self { name, source })
    }
}

pub(crate) struct AnnotateArg {
    pub(super) name: Ident,
    pub(super) annotation: LitStr,
}

impl Parse for AnnotateArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse::<Ident>()?;
        input.parse::<Token![,]>()?;
        let annotation = input.parse::<LitStr>()?;
        let _ = input.parse::<Token![,]>();

        Ok(Self { name, annotation })
    }
}

impl ArgAttr for InjectArg {
    const IDENT: &'static str = "inject";
    const DUPLICATE: &'static str = "arg is injected more than once";

    fn arg(&self) -> &Ident {
        &self.name
    }
}

impl ArgAttr for AnnotateArg {
    const IDENT: &'static str = "annotate_arg";
    const DUPLICATE: &'static str = "arg is annotated more than once";

    fn arg(&self) -> &Ident {
        &self.name
    }
}

pub(crate) fn parse_inject_attrs(attrs: &[Attribute]) -> syn::Result<Vec<InjectArg>> {
    parse_arg_attrs(attrs)
}

pub(crate) fn parse_annotate_attrs(attrs: &[Attribute]) -> syn::Result<Vec<AnnotateArg>> {
    parse_arg_attrs(attrs)
}
