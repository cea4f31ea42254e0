use darling::ast::{Data, Style};
use darling::util::{Ignored, PathList};
use darling::{FromDeriveInput, FromField};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, GenericArgument, Ident, PathArguments, Type, parse_macro_input};

#[derive(FromDeriveInput)]
#[darling(attributes(inject), supports(struct_any))]
struct InjectableInput {
    ident: Ident,
    generics: syn::Generics,
    data: Data<Ignored, InjectableField>,
}

#[derive(FromField)]
#[darling(attributes(inject))]
struct InjectableField {
    ident: Option<Ident>,
    ty: Type,
    #[darling(default)]
    one_of: Option<PathList>,
}

pub(crate) fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match InjectableInput::from_derive_input(&input).and_then(expand) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn expand(input: InjectableInput) -> darling::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(
            darling::Error::custom("Injectable cannot be derived for generic types")
                .with_span(&input.generics),
        );
    }

    let ident = &input.ident;
    let fields = input
        .data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum"))?;

    let mut parameters = Vec::with_capacity(fields.fields.len());
    let mut values = Vec::with_capacity(fields.fields.len());
    for (index, field) in fields.fields.iter().enumerate() {
        let name = field
            .ident
            .as_ref()
            .map_or_else(|| index.to_string(), Ident::to_string);
        let (parameter, value) = bind_field(field, &name);
        parameters.push(parameter);
        values.push(value);
    }

    let construct = match fields.style {
        Style::Struct => {
            let names = fields.fields.iter().filter_map(|f| f.ident.as_ref());
            quote! { #ident { #(#names: #values),* } }
        }
        Style::Tuple => quote! { #ident( #(#values),* ) },
        Style::Unit => quote! { #ident },
    };

    let arguments = if values.is_empty() {
        quote! { _arguments }
    } else {
        quote! { mut arguments }
    };

    Ok(quote! {
        impl ::mawrid::Injectable for #ident {
            fn descriptor() -> ::mawrid::TypeDescriptor {
                ::mawrid::TypeDescriptor::of::<Self>(|#arguments: ::mawrid::Arguments| {
                    ::core::result::Result::Ok(::mawrid::Instance::new(#construct))
                })
                #(.with_parameter(#parameters))*
            }
        }

        ::mawrid::__private::inventory::submit! {
            ::mawrid::TypeRegistration::new(<#ident as ::mawrid::Injectable>::descriptor)
        }
    })
}

/// Returns the parameter declaration and the argument extraction for a field.
fn bind_field(field: &InjectableField, name: &str) -> (TokenStream2, TokenStream2) {
    if let Some(alternatives) = &field.one_of {
        let alternatives = alternatives.iter();
        return (
            quote! {
                ::mawrid::Parameter::union(
                    #name,
                    ::std::vec![#(::mawrid::DependencyKey::of::<#alternatives>()),*],
                )
            },
            quote! { arguments.instance()? },
        );
    }

    if is_instance(&field.ty) {
        return (
            quote! { ::mawrid::Parameter::untyped(#name) },
            quote! { arguments.instance()? },
        );
    }

    if let Some(inner) = arc_inner(&field.ty) {
        return (
            quote! { ::mawrid::Parameter::single(#name, ::mawrid::DependencyKey::of::<#inner>()) },
            quote! { arguments.shared::<#inner>()? },
        );
    }

    let ty = &field.ty;
    (
        quote! { ::mawrid::Parameter::single(#name, ::mawrid::DependencyKey::of::<#ty>()) },
        quote! { arguments.cloned::<#ty>()? },
    )
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    }
}

fn is_instance(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|seg| seg.ident == "Instance" && seg.arguments.is_none())
}

/// `Arc<T>` → `T`
fn arc_inner(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Arc" {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }

    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
