use syn::{Attribute, Error, Generics, Ident, LitStr, Type, ext::IdentExt};

///
/// ColumnAttrs
///
/// Parsed `#[column(..)]` options on one named field.
///

#[derive(Default)]
pub struct ColumnAttrs {
    pub skip: bool,
    pub name: Option<LitStr>,
    pub accessor: Option<Ident>,
}

pub fn parse_column_attrs(attrs: &[Attribute]) -> Result<ColumnAttrs, Error> {
    let mut out = ColumnAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("column")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else if meta.path.is_ident("name") {
                out.name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("accessor") {
                let lit: LitStr = meta.value()?.parse()?;
                out.accessor = Some(lit.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `skip`, `name = \"..\"` or `accessor = \"..\"`"))
            }
        })?;
    }

    Ok(out)
}

/// Parse a single `name = ".."` option from `#[<attr>(..)]`.
pub fn parse_name_attr(attrs: &[Attribute], attr_name: &str) -> Result<Option<LitStr>, Error> {
    let mut name = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident(attr_name)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `name = \"..\"`"))
            }
        })?;
    }

    Ok(name)
}

///
/// ValueAttrs
///
/// Parsed `#[value(..)]` options on a `ColumnValue` type.
///

#[derive(Default)]
pub struct ValueAttrs {
    pub name: Option<LitStr>,
    pub ordered: bool,
}

pub fn parse_value_attrs(attrs: &[Attribute]) -> Result<ValueAttrs, Error> {
    let mut out = ValueAttrs::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                out.name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("ordered") {
                out.ordered = true;
                Ok(())
            } else {
                Err(meta.error("expected `name = \"..\"` or `ordered`"))
            }
        })?;
    }

    Ok(out)
}

pub fn reject_generics(generics: &Generics, label: &str) -> Result<(), Error> {
    if generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::new_spanned(
            generics,
            format!("{label} cannot be derived for generic types"),
        ))
    }
}

/// Field or variant name without any raw-identifier prefix.
pub fn plain_name(ident: &Ident) -> String {
    ident.unraw().to_string()
}

/// `days_since_started` -> `DAYS_SINCE_STARTED`
pub fn upper_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        out.extend(ch.to_uppercase());
    }

    out
}

pub fn is_path_ident(ty: &Type, ident: &str) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == ident)
}
