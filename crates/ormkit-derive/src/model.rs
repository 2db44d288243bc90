//! Model derive macro implementation

mod attrs;

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let table_hook = attrs::get_table_name(&input)?.map(|table| {
        quote! {
            fn table_name() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(#table)
            }
        }
    });

    let mut field_defs = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let ty = &field.ty;
        let ident_str = ident.unraw().to_string();
        let tag = attrs::get_field_tag(field)?.map(|tag| quote! { .tag(#tag) });

        // `with_offset` is sound here: the offset comes from `offset_of!` on this very field
        // and `#ty` is its declared type.
        field_defs.push(quote! {
            unsafe {
                ::ormkit::model::FieldDef::<Self>::new::<#ty>(
                    #ident_str,
                    |m| ::core::convert::Into::<::ormkit::Value>::into(
                        ::core::clone::Clone::clone(&m.#ident),
                    ),
                    |m, v| {
                        m.#ident = <#ty as ::ormkit::SqlType>::from_value(v)?;
                        ::core::result::Result::Ok(())
                    },
                )
                #tag
                .with_offset::<#ty>(::core::mem::offset_of!(Self, #ident))
            }
        });
    }

    let type_name = name.unraw().to_string();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::ormkit::Model for #name #ty_generics #where_clause {
            fn type_name() -> &'static str {
                #type_name
            }

            #table_hook

            fn fields() -> ::std::vec::Vec<::ormkit::model::FieldDef<Self>> {
                ::std::vec![#(#field_defs),*]
            }
        }
    })
}
