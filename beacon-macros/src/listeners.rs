//! `#[listeners]` expansion.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, FnArg, ImplItem, ItemImpl, LitStr, Meta, Token, parse::Parser,
    punctuated::Punctuated,
};

/// One marked method.
struct Row {
    method: syn::Ident,
    names: Vec<LitStr>,
}

pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[listeners] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut input = match syn::parse::<ItemImpl>(item) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error().into(),
    };

    match collect_rows(&mut input) {
        Ok(rows) => generate(&input, &rows).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn collect_rows(input: &mut ItemImpl) -> syn::Result<Vec<Row>> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[listeners] must be placed on an inherent impl block",
        ));
    }

    let mut rows = Vec::new();
    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        let mut names = Vec::new();
        let mut marked = false;
        let mut kept = Vec::with_capacity(method.attrs.len());
        for attr in method.attrs.drain(..) {
            if attr.path().is_ident("on") {
                marked = true;
                names.extend(parse_names(&attr)?);
            } else {
                kept.push(attr);
            }
        }
        method.attrs = kept;
        if !marked {
            continue;
        }

        check_signature(&method.sig)?;
        rows.push(Row {
            method: method.sig.ident.clone(),
            names,
        });
    }
    Ok(rows)
}

/// `#[on]` yields no names, `#[on("a", "b")]` yields the literals.
fn parse_names(attr: &Attribute) -> syn::Result<Vec<LitStr>> {
    match &attr.meta {
        Meta::Path(_) => Ok(Vec::new()),
        Meta::List(list) => {
            let parser = Punctuated::<LitStr, Token![,]>::parse_terminated;
            let names = parser.parse2(list.tokens.clone())?;
            if names.is_empty() {
                return Err(syn::Error::new_spanned(list, "expected event names"));
            }
            Ok(names.into_iter().collect())
        }
        Meta::NameValue(value) => Err(syn::Error::new_spanned(
            value,
            "expected #[on] or #[on(\"name\", ...)]",
        )),
    }
}

fn check_signature(sig: &syn::Signature) -> syn::Result<()> {
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "listener methods must be synchronous",
        ));
    }
    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                "listener methods must take `&self` first",
            ));
        }
    }
    match (inputs.next(), inputs.next()) {
        (Some(FnArg::Typed(_)), None) => Ok(()),
        _ => Err(syn::Error::new_spanned(
            &sig.inputs,
            "listener methods must take exactly `&self` and `&mut Event`",
        )),
    }
}

fn generate(input: &ItemImpl, rows: &[Row]) -> proc_macro2::TokenStream {
    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let entries = rows.iter().map(|row| {
        let method = &row.method;
        let names = if row.names.is_empty() {
            let name = LitStr::new(&method.to_string(), method.span());
            quote! { [::beacon::Event::reserved_name(#name)] }
        } else {
            let names = &row.names;
            quote! { [#(#names),*] }
        };
        quote! {
            ::beacon::AutoListener::new(
                #names,
                |this: &Self, event: &mut ::beacon::Event| {
                    ::beacon::IntoListenerResult::into_listener_result(Self::#method(this, event))
                },
            )
        }
    });

    quote! {
        #input

        impl #impl_generics ::beacon::AutoListen for #self_ty #where_clause {
            fn auto_listeners() -> ::std::vec::Vec<::beacon::AutoListener<Self>> {
                ::std::vec![#(#entries),*]
            }
        }
    }
}
