mod attr;

use crate::injectable::attr::{parse_annotate_attrs, parse_inject_attrs, InjectSource};

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
    ext::IdentExt as _, spanned::Spanned as _, Error, FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, Item, ItemImpl,
    ItemStruct, Pat, PathArguments, ReturnType, Type,
};

const HELPER_ATTRS: [&str; 3] = ["constructor", "inject", "annotate_arg"];

struct Param<'a> {
    ident: &'a Ident,
    name: String,
    ty: &'a Type,
    /// `T` of an `Arc<T>` param
    shared: Option<&'a Type>,
}

impl Param<'_> {
    /// Type of the value the param is provided as
    fn provided_ty(&self) -> &Type {
        self.shared.unwrap_or(self.ty)
    }
}

fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn is_result(output: &ReturnType) -> syn::Result<bool> {
    match output {
        ReturnType::Default => Err(Error::new_spanned(
            output,
            "constructor must return `Self` or `Result<Self, E>`",
        )),
        ReturnType::Type(_, ty) => Ok(matches!(
            ty.as_ref(),
            Type::Path(type_path) if type_path.path.segments.last().is_some_and(|segment| segment.ident == "Result")
        )),
    }
}

fn collect_params(constructor: &ImplItemFn) -> syn::Result<Box<[Param<'_>]>> {
    constructor
        .sig
        .inputs
        .iter()
        .map(|input| match input {
            FnArg::Typed(pat_type) => match pat_type.pat.as_ref() {
                Pat::Ident(pat_ident) => Ok(Param {
                    ident: &pat_ident.ident,
                    name: pat_ident.ident.unraw().to_string(),
                    ty: pat_type.ty.as_ref(),
                    shared: arc_inner(pat_type.ty.as_ref()),
                }),
                pat => Err(Error::new_spanned(pat, "constructor params must be plain identifiers")),
            },
            FnArg::Receiver(_) => Err(Error::new_spanned(input, "constructor can't take `self`")),
        })
        .collect()
}

fn find_param<'a, 'b>(params: &'a [Param<'b>], name: &Ident) -> syn::Result<&'a Param<'b>> {
    let unraw = name.unraw().to_string();
    params
        .iter()
        .find(|param| param.name == unraw)
        .ok_or_else(|| Error::new_spanned(name, "constructor has no such arg"))
}

fn expand_constructor(constructor: &ImplItemFn, self_ty: &Type) -> syn::Result<TokenStream> {
    let fn_name = &constructor.sig.ident;
    let span = constructor.span();

    if constructor.sig.asyncness.is_some() {
        return Err(Error::new_spanned(constructor.sig.asyncness, "constructor can't be async"));
    }

    let fallible = is_result(&constructor.sig.output)?;
    let params = collect_params(constructor)?;

    let names = params.iter().map(|param| &param.name).collect::<Box<[_]>>();
    let idents = params.iter().map(|param| param.ident).collect::<Box<[_]>>();
    let extracts = params.iter().map(|param| {
        let name = &param.name;
        match param.shared {
            Some(inner) => quote_spanned! { param.ty.span() => __wireup_args.get::<#inner>(#name)? },
            None => {
                let ty = param.ty;
                quote_spanned! { param.ty.span() => __wireup_args.cloned::<#ty>(#name)? }
            }
        }
    });

    let call = if fallible {
        quote! { <#self_ty>::#fn_name(#( #idents ),*).map_err(::wireup::CallErrorKind::custom) }
    } else {
        quote! { ::core::result::Result::Ok::<Self, ::wireup::CallErrorKind>(<#self_ty>::#fn_name(#( #idents ),*)) }
    };

    let annotations = parse_annotate_attrs(&constructor.attrs)?
        .into_iter()
        .map(|arg| {
            let param = find_param(&params, &arg.name)?;
            let name = &param.name;
            let annotation = &arg.annotation;
            Ok(quote_spanned! { arg.name.span() => .annotate_arg(#name, #annotation)? })
        })
        .collect::<syn::Result<Box<[_]>>>()?;

    let injections = parse_inject_attrs(&constructor.attrs)?
        .into_iter()
        .map(|arg| {
            let param = find_param(&params, &arg.name)?;
            let name = &param.name;
            let provision = match &arg.source {
                InjectSource::Instance(expr) => {
                    let ty = param.provided_ty();
                    quote_spanned! { expr.span() => ::wireup::Provision::instance::<#ty>(#expr) }
                }
                InjectSource::Class(ty) => {
                    quote_spanned! { ty.span() => ::wireup::Provision::class_of::<#ty>() }
                }
                InjectSource::Provider(expr) => {
                    quote_spanned! { expr.span() => ::wireup::Provision::provider(#expr) }
                }
            };
            Ok(quote_spanned! { arg.name.span() => .inject(#name, #provision)? })
        })
        .collect::<syn::Result<Box<[_]>>>()?;

    Ok(quote_spanned! { span =>
        fn constructor() -> ::core::result::Result<::wireup::Function, ::wireup::InjectErrorKind> {
            let function = ::wireup::Function::new(
                concat!(stringify!(#self_ty), "::", stringify!(#fn_name)),
                ::wireup::Signature::new() #( .param(#names) )*,
                |__wireup_args: ::wireup::Arguments| {
                    #( let #idents = #extracts; )*
                    #call
                },
            )
            #( #annotations )*
            #( #injections )*;
            ::core::result::Result::Ok(function)
        }
    })
}

fn strip_helper_attrs(impl_item_fn: &mut ImplItemFn) {
    impl_item_fn
        .attrs
        .retain(|attr| !HELPER_ATTRS.iter().any(|ident| attr.path().is_ident(ident)));
}

fn has_helper_attrs(impl_item_fn: &ImplItemFn) -> Option<&syn::Attribute> {
    impl_item_fn
        .attrs
        .iter()
        .find(|attr| HELPER_ATTRS[1..].iter().any(|ident| attr.path().is_ident(ident)))
}

fn expand_impl(mut item_impl: ItemImpl) -> syn::Result<TokenStream> {
    let marked = item_impl
        .items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            ImplItem::Fn(impl_item_fn) if impl_item_fn.attrs.iter().any(|attr| attr.path().is_ident("constructor")) => {
                Some(index)
            }
            _ => None,
        })
        .collect::<Box<[_]>>();

    let index = match &*marked {
        [index] => *index,
        [] => item_impl
            .items
            .iter()
            .position(|item| matches!(item, ImplItem::Fn(impl_item_fn) if impl_item_fn.sig.ident == "new"))
            .ok_or_else(|| Error::new_spanned(&item_impl.self_ty, "expected a `new` method or a method marked #[constructor]"))?,
        [_, second, ..] => {
            return Err(Error::new_spanned(
                &item_impl.items[*second],
                "#[constructor] can only be used once per type",
            ))
        }
    };

    for (other, item) in item_impl.items.iter().enumerate() {
        if let ImplItem::Fn(impl_item_fn) = item {
            if other != index {
                if let Some(attr) = has_helper_attrs(impl_item_fn) {
                    return Err(Error::new_spanned(attr, "can only be used on the constructor"));
                }
            }
        }
    }

    let ImplItem::Fn(constructor) = &item_impl.items[index] else {
        return Err(Error::new_spanned(&item_impl.items[index], "constructor must be a method"));
    };
    let constructor_tokens = expand_constructor(constructor, &item_impl.self_ty)?;

    if let ImplItem::Fn(constructor) = &mut item_impl.items[index] {
        strip_helper_attrs(constructor);
    }

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    Ok(quote! {
        #item_impl

        impl #impl_generics ::wireup::Injectable for #self_ty #where_clause {
            #constructor_tokens
        }
    })
}

fn expand_struct(item_struct: &ItemStruct) -> TokenStream {
    let ident = &item_struct.ident;
    let (impl_generics, ty_generics, where_clause) = item_struct.generics.split_for_impl();

    quote! {
        #item_struct

        impl #impl_generics ::wireup::Injectable for #ident #ty_generics #where_clause {
            fn constructor() -> ::core::result::Result<::wireup::Function, ::wireup::InjectErrorKind> {
                ::core::result::Result::Ok(::wireup::Function::new(
                    concat!(stringify!(#ident), "::default"),
                    ::wireup::Signature::new(),
                    |_| ::core::result::Result::Ok::<Self, ::wireup::CallErrorKind>(<Self as ::core::default::Default>::default()),
                ))
            }
        }
    }
}

pub(crate) fn expand(item: Item) -> syn::Result<TokenStream> {
    match item {
        Item::Impl(ItemImpl { trait_: Some(_), .. }) => Err(Error::new_spanned(item, "you can't use macro with trait")),
        Item::Impl(item_impl) => expand_impl(item_impl),
        Item::Struct(item_struct) => Ok(expand_struct(&item_struct)),
        _ => Err(Error::new_spanned(
            item,
            "#[injectable] can only be used on `impl` blocks and structs",
        )),
    }
}
