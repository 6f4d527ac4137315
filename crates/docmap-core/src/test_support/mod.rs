//! Hand-written entities for core tests; downstream crates use the derive.

///
/// test_entity
///
/// Declares a struct plus its `Path`, `EntityKind` and `EntityValue` impls.
/// The identifier field must be spelled `_id` and listed first.
///

macro_rules! test_entity {
    (
        struct $entity:ident {
            $($field:ident : $ty:ty),* $(,)?
        }

        sharded: $sharded:expr,
        parent: $parent:expr $(,)?
    ) => {
        #[derive(Clone, Debug, Default)]
        pub(crate) struct $entity {
            $(pub(crate) $field: $ty),*
        }

        impl $crate::traits::Path for $entity {
            const PATH: &'static str = concat!("test_support::", stringify!($entity));
        }

        impl $crate::traits::EntityKind for $entity {
            const MODEL: &'static $crate::model::entity::EntityModel =
                &$crate::model::entity::EntityModel {
                    path: <Self as $crate::traits::Path>::PATH,
                    entity_name: stringify!($entity),
                    collection: stringify!($entity),
                    fields: &[$(stringify!($field)),*],
                    sharded: $sharded,
                    parent: $parent,
                };
        }

        impl $crate::traits::EntityValue for $entity {
            fn to_document(&self) -> $crate::value::Document {
                let mut doc = $crate::value::Document::new();
                $(
                    doc.insert(
                        stringify!($field),
                        $crate::traits::FieldValue::to_value(&self.$field),
                    );
                )*

                doc
            }
        }
    };
}

pub(crate) mod fixtures {
    use crate::{model::sharded::Sharded, traits::EntityKind, value::Document};

    test_entity! {
        struct Order {
            _id: u64,
            total: u64,
        }

        sharded: Some(Sharded::new()),
        parent: None,
    }

    test_entity! {
        struct Customer {
            _id: u64,
            country: String,
            name: String,
        }

        sharded: Some(Sharded::new().with_shard_key(&["country"])),
        parent: None,
    }

    test_entity! {
        struct Event {
            _id: u64,
            tenant: String,
            ts: i64,
        }

        sharded: Some(Sharded::new().with_value(&["tenant", "ts"])),
        parent: None,
    }

    test_entity! {
        struct Bad {
            _id: u64,
            a: String,
            b: String,
        }

        sharded: Some(Sharded::new().with_value(&["a"]).with_shard_key(&["b"])),
        parent: None,
    }

    test_entity! {
        struct Base {
            _id: u64,
            tenant: String,
        }

        sharded: Some(Sharded::new().with_value(&["tenant"])),
        parent: None,
    }

    test_entity! {
        struct Derived {
            _id: u64,
            tenant: String,
            payload: String,
        }

        sharded: None,
        parent: Some(<Base as EntityKind>::MODEL),
    }

    test_entity! {
        struct Override {
            _id: u64,
            tenant: String,
            region: String,
        }

        sharded: Some(Sharded::new().with_shard_key(&["region"])),
        parent: Some(<Base as EntityKind>::MODEL),
    }

    test_entity! {
        struct Plain {
            _id: u64,
            name: String,
        }

        sharded: None,
        parent: None,
    }

    test_entity! {
        struct Profile {
            _id: u64,
            address: Document,
        }

        sharded: Some(Sharded::new().with_value(&["address.country"])),
        parent: None,
    }

    test_entity! {
        struct Sparse {
            _id: Option<u64>,
            region: Option<String>,
        }

        sharded: Some(Sharded::new().with_value(&["region"])),
        parent: None,
    }
}
