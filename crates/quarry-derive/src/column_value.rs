use crate::util::{parse_column_attrs, parse_value_attrs, plain_name, reject_generics};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Error, Fields, FieldsNamed, Type};

// derive_column_value
pub fn derive_column_value(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(Error::into_compile_error)
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    reject_generics(&input.generics, "ColumnValue")?;

    let attrs = parse_value_attrs(&input.attrs)?;
    let type_name = attrs
        .name
        .map_or_else(|| input.ident.to_string(), |lit| lit.value());

    if attrs.ordered
        && !matches!(&input.data, Data::Struct(data) if matches!(data.fields, Fields::Unnamed(_)))
    {
        return Err(Error::new_spanned(
            &input.ident,
            "`ordered` only applies to single-field tuple structs",
        ));
    }

    match &input.data {
        Data::Enum(data) => expand_enum(input, data, &type_name),
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => expand_message(input, named, &type_name),
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                Ok(expand_newtype(input, &fields.unnamed[0].ty, attrs.ordered))
            }
            other => Err(Error::new_spanned(
                other,
                "ColumnValue structs need named fields or exactly one unnamed field",
            )),
        },
        Data::Union(_) => Err(Error::new_spanned(
            &input.ident,
            "ColumnValue cannot be derived for unions",
        )),
    }
}

// Fieldless enum -> `ValueType::Enum`.
fn expand_enum(input: &DeriveInput, data: &DataEnum, type_name: &str) -> Result<TokenStream, Error> {
    if data.variants.is_empty() {
        return Err(Error::new_spanned(
            &input.ident,
            "ColumnValue enums need at least one variant",
        ));
    }

    let ident = &input.ident;
    let mut arms = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                variant,
                "ColumnValue enums can only have unit variants",
            ));
        }

        let variant_ident = &variant.ident;
        let variant_name = plain_name(variant_ident);
        arms.push(quote!(Self::#variant_ident => #variant_name,));
    }

    Ok(quote! {
        impl ::quarry::traits::ColumnValue for #ident {
            const VALUE_TYPE: ::quarry::value::ValueType =
                ::quarry::value::ValueType::Enum(#type_name);

            fn to_value(&self) -> ::quarry::value::Value {
                let variant = match self {
                    #(#arms)*
                };

                ::quarry::value::Value::Enum(::quarry::value::EnumValue::new(#type_name, variant))
            }
        }
    })
}

// Named-field struct -> `ValueType::Message`; every field is itself a column value.
fn expand_message(
    input: &DeriveInput,
    named: &FieldsNamed,
    type_name: &str,
) -> Result<TokenStream, Error> {
    let ident = &input.ident;
    let mut fields = Vec::with_capacity(named.named.len());

    for field in &named.named {
        let attrs = parse_column_attrs(&field.attrs)?;
        if attrs.accessor.is_some() {
            return Err(Error::new_spanned(
                field,
                "`accessor` only applies to EntityState columns",
            ));
        }
        if attrs.skip {
            continue;
        }

        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = attrs
            .name
            .map_or_else(|| plain_name(field_ident), |lit| lit.value());

        fields.push(quote! {
            .with_field(#field_name, ::quarry::traits::ColumnValue::to_value(&self.#field_ident))
        });
    }

    Ok(quote! {
        impl ::quarry::traits::ColumnValue for #ident {
            const VALUE_TYPE: ::quarry::value::ValueType =
                ::quarry::value::ValueType::Message(#type_name);

            fn to_value(&self) -> ::quarry::value::Value {
                ::quarry::value::Value::Message(
                    ::quarry::value::MessageValue::new(#type_name)
                        #(#fields)*
                )
            }
        }
    })
}

// Single-field tuple struct -> the inner value, unchanged.
fn expand_newtype(input: &DeriveInput, inner: &Type, ordered: bool) -> TokenStream {
    let ident = &input.ident;

    let ordered_impl = ordered.then(|| {
        quote! {
            impl ::quarry::traits::OrderedValue for #ident {}
        }
    });

    quote! {
        impl ::quarry::traits::ColumnValue for #ident {
            const VALUE_TYPE: ::quarry::value::ValueType =
                <#inner as ::quarry::traits::ColumnValue>::VALUE_TYPE;

            fn to_value(&self) -> ::quarry::value::Value {
                ::quarry::traits::ColumnValue::to_value(&self.0)
            }
        }

        #ordered_impl
    }
}
