use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Result, Visibility};

pub fn expand(input: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "unsupported data type: Record requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "unsupported data type: Record can only be derived for structs",
            ))
        }
    };

    let type_name = name.unraw().to_string();
    let table_name = match parse_table_attr(&input.attrs)? {
        Some(table) => quote! { ::core::option::Option::Some(#table) },
        None => quote! { ::core::option::Option::None },
    };

    let mut defs = Vec::new();
    let mut datums = Vec::new();
    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        if !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }
        let annotation = parse_field_attr(&field.attrs)?;
        if annotation.as_ref().is_some_and(|a| a.value().trim() == "-") {
            continue;
        }

        let ty = &field.ty;
        let field_name = ident.unraw().to_string();
        let annotation = annotation.map(|a| a.value()).unwrap_or_default();
        let rust_type = compact_type(&quote!(#ty).to_string());

        defs.push(quote! {
            ::tsrow_sdk::record::FieldDef {
                name: #field_name,
                annotation: #annotation,
                rust_type: #rust_type,
                natural_type: <#ty as ::tsrow_sdk::record::FieldValue>::NATURAL_TYPE,
            }
        });
        datums.push(quote! {
            ::tsrow_sdk::record::FieldValue::to_datum(&self.#ident)
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tsrow_sdk::record::Record for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const TABLE_NAME: ::core::option::Option<&'static str> = #table_name;
            const FIELDS: &'static [::tsrow_sdk::record::FieldDef] = &[#(#defs),*];

            fn datums(&self) -> ::std::vec::Vec<::tsrow_sdk::datum::Datum> {
                ::std::vec![#(#datums),*]
            }
        }
    })
}

// -- Helpers ------------------------------------------------------------------

/// Drop token spacing except between two word characters, so `& 'a str`
/// reads `&'a str` and `Option < u32 >` reads `Option<u32>`.
fn compact_type(tokens: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let chars: Vec<char> = tokens.chars().collect();
    let mut out = String::with_capacity(tokens.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let before = i.checked_sub(1).and_then(|j| chars.get(j)).copied();
            let after = chars.get(i + 1).copied();
            if !(before.is_some_and(is_word) && after.is_some_and(is_word)) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// `#[tsrow(table = "...")]` on the struct.
fn parse_table_attr(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut table = None;
    for attr in attrs {
        if !attr.path().is_ident("tsrow") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(meta.error("table name must not be empty"));
                }
                table = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unknown tsrow attribute, expected `table = \"...\"`"))
            }
        })?;
    }
    Ok(table)
}

/// `#[tsrow("...")]` on a field.
fn parse_field_attr(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut found: Option<LitStr> = None;
    for attr in attrs {
        if !attr.path().is_ident("tsrow") {
            continue;
        }
        let lit: LitStr = attr.parse_args()?;
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate tsrow attribute"));
        }
        found = Some(lit);
    }
    Ok(found)
}
