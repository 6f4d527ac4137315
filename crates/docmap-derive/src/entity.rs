use crate::{
    helper::{lower_first, quote_option, quote_slice, to_model, to_str_lit},
    sharded::ShardedArgs,
};
use darling::{FromDeriveInput, FromField, util::Override};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, LitStr, Path};

/// Document key the identifier field is stored under.
const ID_FIELD: &str = "_id";

///
/// EntityArgs
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
pub struct EntityArgs {
    ident: Ident,
    generics: Generics,
    data: darling::ast::Data<(), EntityField>,

    #[darling(default)]
    name: Option<LitStr>,

    #[darling(default)]
    collection: Option<LitStr>,

    /// Field holding the identifier; defaults to `id`.
    #[darling(default)]
    id: Option<Ident>,

    /// Supertype this entity inherits mapping metadata from.
    #[darling(default)]
    extends: Option<Path>,

    #[darling(default)]
    sharded: Option<Override<ShardedArgs>>,
}

///
/// EntityField
///

#[derive(Debug, FromField)]
#[darling(attributes(entity))]
pub struct EntityField {
    ident: Option<Ident>,

    #[darling(default)]
    rename: Option<LitStr>,

    #[darling(default)]
    skip: bool,
}

///
/// MappedField
/// A struct field together with its document key.
///

struct MappedField<'a> {
    ident: &'a Ident,
    key: String,
}

impl EntityArgs {
    fn mapped_fields(&self) -> darling::Result<Vec<MappedField<'_>>> {
        let id_ident = self.id.as_ref().map_or_else(|| "id".to_string(), ToString::to_string);
        let fields = self
            .data
            .as_ref()
            .take_struct()
            .map(|fields| fields.fields)
            .unwrap_or_default();

        let mut id = None;
        let mut rest = Vec::with_capacity(fields.len());
        for field in fields.into_iter().filter(|f| !f.skip) {
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };

            if *ident == id_ident || *ident == ID_FIELD {
                if id.is_some() {
                    return Err(darling::Error::custom(
                        "entity declares more than one identifier field",
                    )
                    .with_span(ident));
                }
                id = Some(MappedField {
                    ident,
                    key: ID_FIELD.to_string(),
                });
                continue;
            }

            let key = field
                .rename
                .as_ref()
                .map_or_else(|| ident.to_string(), LitStr::value);
            rest.push(MappedField { ident, key });
        }

        let Some(id) = id else {
            let err = darling::Error::custom(format!(
                "entity requires an identifier field named `{id_ident}`"
            ));
            return Err(err.with_span(&self.ident));
        };

        Ok(std::iter::once(id).chain(rest).collect())
    }

    fn sharded_part(&self) -> TokenStream {
        let sharded = self.sharded.as_ref().map(|sharded| match sharded {
            Override::Inherit => ShardedArgs::default(),
            Override::Explicit(args) => args.clone(),
        });

        quote_option(sharded.as_ref(), ShardedArgs::runtime_part)
    }
}

pub fn derive_entity(input: TokenStream) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(input: TokenStream) -> darling::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let args = EntityArgs::from_derive_input(&input)?;

    if !args.generics.params.is_empty() {
        return Err(
            darling::Error::custom("Entity cannot be derived for generic types")
                .with_span(&args.generics),
        );
    }

    let ident = &args.ident;
    let fields = args.mapped_fields()?;

    let entity_name = args
        .name
        .as_ref()
        .map_or_else(|| ident.to_string(), LitStr::value);
    let collection = args
        .collection
        .as_ref()
        .map_or_else(|| lower_first(&entity_name), LitStr::value);

    let keys: Vec<String> = fields.iter().map(|f| f.key.clone()).collect();
    let keys = quote_slice(&keys, to_str_lit);
    let sharded = args.sharded_part();
    let parent = quote_option(args.extends.as_ref(), to_model);

    let inserts = fields.iter().map(|MappedField { ident, key }| {
        quote! {
            doc.insert(#key, ::docmap::traits::FieldValue::to_value(&self.#ident));
        }
    });

    Ok(quote! {
        impl ::docmap::traits::Path for #ident {
            const PATH: &'static str = concat!(module_path!(), "::", stringify!(#ident));
        }

        impl ::docmap::traits::EntityKind for #ident {
            const MODEL: &'static ::docmap::model::entity::EntityModel =
                &::docmap::model::entity::EntityModel {
                    path: <Self as ::docmap::traits::Path>::PATH,
                    entity_name: #entity_name,
                    collection: #collection,
                    fields: #keys,
                    sharded: #sharded,
                    parent: #parent,
                };
        }

        impl ::docmap::traits::EntityValue for #ident {
            fn to_document(&self) -> ::docmap::value::Document {
                let mut doc = ::docmap::value::Document::new();
                #(#inserts)*

                doc
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(input: TokenStream) -> String {
        expand(input).expect("expand").to_string()
    }

    #[test]
    fn id_field_is_mapped_first() {
        let out = expand_str(quote! {
            struct Customer {
                country: String,
                id: u64,
            }
        });

        assert!(out.contains("fields : & [\"_id\" , \"country\"]"), "{out}");
        assert!(out.contains("collection : \"customer\""), "{out}");
        assert!(out.contains("sharded : None"), "{out}");
    }

    #[test]
    fn rename_skip_and_custom_id() {
        let out = expand_str(quote! {
            #[entity(id = "key", collection = "people")]
            struct Person {
                key: u64,
                #[entity(rename = "full_name")]
                name: String,
                #[entity(skip)]
                cache: u8,
            }
        });

        assert!(out.contains("fields : & [\"_id\" , \"full_name\"]"), "{out}");
        assert!(out.contains("collection : \"people\""), "{out}");
        assert!(!out.contains("cache"), "{out}");
    }

    #[test]
    fn bare_sharded_uses_default_descriptor() {
        let out = expand_str(quote! {
            #[entity(sharded)]
            struct Order {
                id: u64,
            }
        });

        assert!(
            out.contains("sharded : Some (:: docmap :: model :: sharded :: Sharded :: new ())"),
            "{out}"
        );
    }

    #[test]
    fn unnamed_sharded_fields_map_to_value() {
        let out = expand_str(quote! {
            #[entity(sharded("tenant"))]
            struct Event {
                id: u64,
                tenant: String,
            }
        });

        assert!(out.contains("with_value (& [\"tenant\"])"), "{out}");
    }

    #[test]
    fn extends_points_at_parent_model() {
        let out = expand_str(quote! {
            #[entity(extends = "Base")]
            struct Derived {
                id: u64,
            }
        });

        assert!(
            out.contains("parent : Some (< Base as :: docmap :: traits :: EntityKind > :: MODEL)"),
            "{out}"
        );
    }

    #[test]
    fn missing_id_is_an_error() {
        let err = expand(quote! {
            struct NoId {
                name: String,
            }
        })
        .expect_err("no id");

        assert!(err.to_string().contains("identifier"), "{err}");
    }

    #[test]
    fn generics_are_rejected() {
        let err = expand(quote! {
            struct Wrapper<T> {
                id: u64,
                inner: T,
            }
        })
        .expect_err("generic");

        assert!(err.to_string().contains("generic"), "{err}");
    }
}
