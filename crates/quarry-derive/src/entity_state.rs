use crate::util::{
    is_path_ident, parse_column_attrs, parse_name_attr, plain_name, reject_generics, upper_snake,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Error, Fields, Ident, Type};

// builder methods a generated accessor would silently lose to
const RESERVED_ACCESSORS: &[&str] = &[
    "build",
    "column",
    "config",
    "either",
    "either_all",
    "filter",
    "id",
    "limit",
    "order_by",
    "with_config",
    "with_mask",
];

///
/// ColumnField
///

struct ColumnField {
    ident: Ident,
    ty: Type,
    name: String,
    constant: Ident,
    accessor: Ident,
}

// derive_entity_state
pub fn derive_entity_state(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(Error::into_compile_error)
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    reject_generics(&input.generics, "EntityState")?;

    let ident = &input.ident;
    let vis = &input.vis;
    let entity_name = parse_name_attr(&input.attrs, "entity")?
        .map_or_else(|| ident.to_string(), |lit| lit.value());
    let columns_trait = format_ident!("{}Columns", ident);
    let fields = column_fields(input)?;

    let constants = fields.iter().map(|field| {
        let ColumnField {
            ty, name, constant, ..
        } = field;
        let doc = format!("Column `{name}`.");

        quote! {
            #[doc = #doc]
            pub const #constant: ::quarry::model::TypedColumn<Self, #ty> =
                ::quarry::model::TypedColumn::new(#name);
        }
    });

    let column_list = fields.iter().map(|field| {
        let constant = &field.constant;
        quote!(Self::#constant.column())
    });

    let value_arms = fields.iter().map(|field| {
        let ColumnField { ident, name, .. } = field;
        quote! {
            #name => Some(::quarry::traits::ColumnValue::to_value(&self.#ident)),
        }
    });

    let accessor_sigs = fields.iter().map(|field| {
        let ColumnField { ty, accessor, .. } = field;
        quote! {
            fn #accessor(self) -> ::quarry::query::Criterion<I, #ident, #ty>;
        }
    });

    let accessor_impls = fields.iter().map(|field| {
        let ColumnField {
            ty,
            constant,
            accessor,
            ..
        } = field;
        quote! {
            fn #accessor(self) -> ::quarry::query::Criterion<I, #ident, #ty> {
                self.column(#ident::#constant)
            }
        }
    });

    let trait_doc = format!("Per-column criteria for `{ident}` queries.");

    Ok(quote! {
        impl #ident {
            #(#constants)*
        }

        impl ::quarry::traits::EntityState for #ident {
            const ENTITY_NAME: &'static str = #entity_name;
            const COLUMNS: &'static [::quarry::model::Column] = &[#(#column_list),*];
        }

        impl ::quarry::traits::RecordView for #ident {
            fn value(&self, column: &str) -> Option<::quarry::value::Value> {
                match column {
                    #(#value_arms)*
                    _ => None,
                }
            }
        }

        #[doc = #trait_doc]
        #vis trait #columns_trait<I: ::quarry::traits::EntityId> {
            #(#accessor_sigs)*
        }

        impl<I: ::quarry::traits::EntityId> #columns_trait<I>
            for ::quarry::query::QueryBuilder<I, #ident>
        {
            #(#accessor_impls)*
        }
    })
}

fn column_fields(input: &DeriveInput) -> Result<Vec<ColumnField>, Error> {
    let message = "EntityState can only be derived for structs with named fields";
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => return Err(Error::new_spanned(other, message)),
        },
        _ => return Err(Error::new_spanned(&input.ident, message)),
    };

    let mut out = Vec::with_capacity(named.len());
    let mut errors: Option<Error> = None;
    let mut push_error = |err: Error| match errors.as_mut() {
        Some(existing) => existing.combine(err),
        None => errors = Some(err),
    };

    for field in named {
        let attrs = match parse_column_attrs(&field.attrs) {
            Ok(attrs) => attrs,
            Err(err) => {
                push_error(err);
                continue;
            }
        };
        if attrs.skip {
            continue;
        }

        let Some(ident) = field.ident.clone() else {
            continue;
        };
        if is_path_ident(&field.ty, "Option") {
            push_error(Error::new_spanned(
                &field.ty,
                "optional fields are not columns; mark them #[column(skip)]",
            ));
            continue;
        }

        let field_name = plain_name(&ident);
        let accessor = attrs.accessor.unwrap_or_else(|| ident.clone());
        if RESERVED_ACCESSORS.contains(&plain_name(&accessor).as_str()) {
            push_error(Error::new_spanned(
                &accessor,
                format!(
                    "`{accessor}` is a builder method; rename the accessor with #[column(accessor = \"..\")]"
                ),
            ));
            continue;
        }

        out.push(ColumnField {
            constant: format_ident!("{}", upper_snake(&field_name)),
            name: attrs.name.map_or(field_name, |lit| lit.value()),
            ty: field.ty.clone(),
            ident,
            accessor,
        });
    }

    for (index, field) in out.iter().enumerate() {
        if out[..index].iter().any(|prior| prior.name == field.name) {
            push_error(Error::new_spanned(
                &field.ident,
                format!("duplicate column name `{}`", field.name),
            ));
        }
    }

    match errors {
        Some(err) => Err(err),
        None => Ok(out),
    }
}
