//! Procedural macros for Beacon.
//!
//! - `#[derive(EventTarget)]` - Implements `EventTarget` for a struct
//!   embedding an `EventDispatcher`
//! - `#[listeners]` - Generates an `AutoListen` table from `#[on(..)]` methods

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Type, parse_macro_input};

mod listeners;

/// Derive macro for implementing `EventTarget`.
///
/// The dispatcher field is the one marked `#[event_dispatcher]`, or else the
/// only field whose type is named `EventDispatcher`.
///
/// ```rust,ignore
/// #[derive(EventTarget)]
/// struct Downloader {
///     #[event_dispatcher]
///     events: EventDispatcher,
/// }
/// ```
#[proc_macro_derive(EventTarget, attributes(event_dispatcher))]
pub fn derive_event_target(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return syn::Error::new_spanned(name, "EventTarget can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let marked: Vec<_> = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| {
            field
                .attrs
                .iter()
                .any(|attr| attr.path().is_ident("event_dispatcher"))
        })
        .collect();
    let by_type: Vec<_> = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| is_dispatcher_type(&field.ty))
        .collect();

    let (index, field) = match (marked.as_slice(), by_type.as_slice()) {
        ([one], _) => *one,
        ([], [one]) => *one,
        ([_, _, ..], _) => {
            return syn::Error::new_spanned(
                name,
                "only one field may be marked #[event_dispatcher]",
            )
            .to_compile_error()
            .into();
        }
        _ => {
            return syn::Error::new_spanned(
                name,
                "mark the dispatcher field with #[event_dispatcher]",
            )
            .to_compile_error()
            .into();
        }
    };

    let accessor = match (fields, &field.ident) {
        (Fields::Named(_), Some(ident)) => quote! { &self.#ident },
        _ => {
            let index = syn::Index::from(index);
            quote! { &self.#index }
        }
    };

    let expanded = quote! {
        impl #impl_generics ::beacon::EventTarget for #name #ty_generics #where_clause {
            fn event_dispatcher(&self) -> &::beacon::EventDispatcher {
                #accessor
            }
        }
    };

    TokenStream::from(expanded)
}

fn is_dispatcher_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "EventDispatcher"),
        _ => false,
    }
}

/// Attribute macro generating an `AutoListen` table for an inherent impl.
///
/// Methods marked `#[on("a", "b")]` are subscribed to the listed names. A
/// bare `#[on]` subscribes the method to its own name behind the reserved
/// prefix (`Event::reserved_name`). Marked methods take `&self` and
/// `&mut Event` and return `()` or `Result<(), E>`.
///
/// ```rust,ignore
/// #[beacon::listeners]
/// impl Door {
///     #[on("open", "close")]
///     fn log(&self, event: &mut Event) { /* ... */ }
///
///     #[on]
///     fn ready(&self, _event: &mut Event) -> Result<(), BoxError> { Ok(()) }
/// }
/// ```
#[proc_macro_attribute]
pub fn listeners(attr: TokenStream, item: TokenStream) -> TokenStream {
    listeners::expand(attr, item)
}
