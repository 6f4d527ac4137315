use crate::helper::{quote_slice, split_fields, to_str_lit};
use darling::{FromMeta, ast::NestedMeta};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, ItemStruct, Lit, parse_quote, punctuated::Punctuated};

///
/// FieldList
///
/// Comma-separated list of document field paths, e.g. `"tenant, ts"`.
///

#[derive(Clone, Debug, Default)]
pub struct FieldList(pub Vec<String>);

impl FromMeta for FieldList {
    fn from_string(value: &str) -> darling::Result<Self> {
        Ok(Self(split_fields(value)))
    }
}

///
/// ShardedArgs
///
/// Arguments of `#[sharded(...)]` and `#[entity(sharded(...))]`. A leading
/// unnamed string is the `value` alias. Both aliases are passed through as
/// written; conflicts are reported when the entity is first resolved.
///

#[derive(Clone, Debug, Default)]
pub struct ShardedArgs {
    pub value: Option<FieldList>,
    pub shard_key: Option<FieldList>,
}

impl FromMeta for ShardedArgs {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let (unnamed, named) = match items.split_first() {
            Some((NestedMeta::Lit(lit), rest)) => (Some(lit), rest),
            _ => (None, items),
        };

        let NamedArgs { value, shard_key } = NamedArgs::from_list(named)?;
        let value = match unnamed {
            None => value,
            Some(Lit::Str(fields)) if value.is_none() => {
                Some(FieldList(split_fields(&fields.value())))
            }
            Some(Lit::Str(fields)) => {
                return Err(darling::Error::duplicate_field("value").with_span(fields));
            }
            Some(lit) => return Err(darling::Error::unexpected_lit_type(lit)),
        };

        Ok(Self { value, shard_key })
    }
}

///
/// NamedArgs
///

#[derive(FromMeta)]
struct NamedArgs {
    #[darling(default)]
    value: Option<FieldList>,

    #[darling(default)]
    shard_key: Option<FieldList>,
}

impl ShardedArgs {
    /// Constant expression building the runtime descriptor.
    pub fn runtime_part(&self) -> TokenStream {
        let mut tokens = quote!(::docmap::model::sharded::Sharded::new());

        if let Some(FieldList(fields)) = &self.value {
            let fields = quote_slice(fields, to_str_lit);
            tokens = quote!(#tokens.with_value(#fields));
        }
        if let Some(FieldList(fields)) = &self.shard_key {
            let fields = quote_slice(fields, to_str_lit);
            tokens = quote!(#tokens.with_shard_key(#fields));
        }

        tokens
    }
}

/// Expand `#[sharded(...)]` into an `#[entity(sharded(...))]` helper on the
/// struct, adding `#[derive(Entity)]` when the struct does not carry it.
pub fn expand(attr: TokenStream, item: TokenStream) -> darling::Result<TokenStream> {
    // validate arguments up front so errors point at the attribute
    let metas = NestedMeta::parse_meta_list(attr.clone())?;
    ShardedArgs::from_list(&metas)?;

    let mut item: ItemStruct = syn::parse2(item)?;

    if !derives_entity(&item.attrs)? {
        item.attrs.insert(0, parse_quote!(#[derive(::docmap::Entity)]));
    }

    let helper: Attribute = if metas.is_empty() {
        parse_quote!(#[entity(sharded)])
    } else {
        parse_quote!(#[entity(sharded(#attr))])
    };
    item.attrs.push(helper);

    Ok(quote!(#item))
}

fn derives_entity(attrs: &[Attribute]) -> syn::Result<bool> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let paths =
            attr.parse_args_with(Punctuated::<syn::Path, syn::Token![,]>::parse_terminated)?;

        if paths
            .iter()
            .any(|path| path.segments.last().is_some_and(|s| s.ident == "Entity"))
        {
            return Ok(true);
        }
    }

    Ok(false)
}
