use crate::{
    model::{
        entity::EntityModel,
        shard_key::ShardKey,
        sharded::{DuplicateFieldPolicy, Sharded, ShardedError},
    },
    value::{Document, Value},
};
use proptest::prelude::*;

fn arb_fields() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_.]{0,7}", 0..6)
}

proptest! {
    #[test]
    fn fields_round_trip_in_order(fields in arb_fields()) {
        let key = ShardKey::of(fields.clone());

        prop_assert_eq!(key.size(), fields.len());
        prop_assert_eq!(key.fields().collect::<Vec<_>>(), fields.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn index_document_has_one_ascending_entry_per_field(
        fields in prop::collection::hash_set("[a-z]{1,6}", 1..6)
    ) {
        let fields: Vec<String> = fields.into_iter().collect();
        let doc = ShardKey::of(fields.clone()).to_index_document();

        prop_assert_eq!(doc.len(), fields.len());
        for ((key, value), expected) in doc.iter().zip(&fields) {
            prop_assert_eq!(key, expected.as_str());
            prop_assert_eq!(value, &Value::Int(1));
        }
    }

    #[test]
    fn queries_do_not_alter_later_results(fields in arb_fields()) {
        let key = ShardKey::of(fields);
        let before = (key.size(), key.as_slice().to_vec(), key.to_index_document());

        let _ = key.fields().count();
        let _ = key.to_index_document();
        let _ = key.clone();

        prop_assert_eq!(before, (key.size(), key.as_slice().to_vec(), key.to_index_document()));
    }
}

#[test]
fn none_is_empty_and_canonical() {
    let a = ShardKey::none();
    let b = ShardKey::none();

    assert_eq!(a.size(), 0);
    assert!(a.is_none());
    assert_eq!(a.to_index_document(), Document::new());
    assert!(ShardKey::ptr_eq(&a, &b));
    assert!(ShardKey::ptr_eq(&a, &ShardKey::of(Vec::<String>::new())));
    assert_ne!(a, ShardKey::of(["_id"]));
}

#[test]
fn id_key_serializes_to_single_entry() {
    let doc = ShardKey::of(["_id"]).to_index_document();
    let json = serde_json::to_string(&doc).expect("serialize index document");

    assert_eq!(json, r#"{"_id":1}"#);
}

#[test]
fn field_order_is_significant() {
    let ab = ShardKey::of(["a", "b"]);
    let ba = ShardKey::of(["b", "a"]);

    assert_ne!(ab, ba);
    assert_ne!(ab.to_index_document(), ba.to_index_document());
    assert_eq!(ab, ShardKey::of(vec!["a".to_string(), "b".to_string()]));
}

#[test]
fn duplicate_fields_collapse_in_index_document() {
    let key = ShardKey::of(["a", "b", "a"]);

    assert_eq!(key.size(), 3);
    assert_eq!(
        key.to_index_document().keys().collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[test]
fn display_lists_fields() {
    assert_eq!(ShardKey::of(["tenant", "ts"]).to_string(), "(tenant, ts)");
    assert_eq!(ShardKey::none().to_string(), "()");
}

#[test]
fn default_descriptor_resolves_to_id() {
    let sharded = Sharded::new();

    assert_eq!(sharded.value(), Ok(&["_id"][..]));
    assert_eq!(sharded.shard_key(), Ok(&["_id"][..]));
    assert!(!sharded.is_explicit());
    assert_eq!(
        sharded.resolve(DuplicateFieldPolicy::Allow),
        Ok(ShardKey::of(["_id"]))
    );
}

#[test]
fn either_alias_sets_the_same_attribute() {
    let by_value = Sharded::new().with_value(&["tenant", "ts"]);
    let by_shard_key = Sharded::new().with_shard_key(&["tenant", "ts"]);

    assert_eq!(by_value.value(), by_value.shard_key());
    assert_eq!(by_shard_key.value(), by_shard_key.shard_key());
    assert_eq!(
        by_value.resolve(DuplicateFieldPolicy::Allow),
        by_shard_key.resolve(DuplicateFieldPolicy::Allow)
    );
}

#[test]
fn equal_explicit_aliases_are_accepted() {
    let sharded = Sharded::new()
        .with_value(&["country"])
        .with_shard_key(&["country"]);

    assert_eq!(sharded.value(), Ok(&["country"][..]));
}

#[test]
fn differing_explicit_aliases_conflict() {
    let sharded = Sharded::new().with_value(&["a"]).with_shard_key(&["b"]);
    let expected = ShardedError::AliasConflict {
        value: vec!["a".into()],
        shard_key: vec!["b".into()],
    };

    assert_eq!(sharded.value(), Err(expected.clone()));
    assert_eq!(sharded.shard_key(), Err(expected.clone()));
    assert_eq!(sharded.resolve(DuplicateFieldPolicy::Allow), Err(expected));
}

#[test]
fn explicit_empty_declarations_are_rejected() {
    assert_eq!(
        Sharded::new()
            .with_shard_key(&[])
            .resolve(DuplicateFieldPolicy::Allow),
        Err(ShardedError::EmptyDeclaration)
    );
    assert_eq!(
        Sharded::new()
            .with_value(&["tenant", " "])
            .resolve(DuplicateFieldPolicy::Allow),
        Err(ShardedError::EmptyField { index: 1 })
    );
}

#[test]
fn duplicate_policy_controls_repeated_fields() {
    let sharded = Sharded::new().with_value(&["a", "a"]);

    assert_eq!(
        sharded.resolve(DuplicateFieldPolicy::Allow),
        Ok(ShardKey::of(["a", "a"]))
    );
    assert_eq!(
        sharded.resolve(DuplicateFieldPolicy::Reject),
        Err(ShardedError::DuplicateField { field: "a".into() })
    );
}

static BASE: EntityModel = EntityModel {
    path: "tests::Base",
    entity_name: "Base",
    collection: "base",
    fields: &["_id", "tenant"],
    sharded: Some(Sharded::new().with_value(&["tenant"])),
    parent: None,
};

static MIDDLE: EntityModel = EntityModel {
    path: "tests::Middle",
    entity_name: "Middle",
    collection: "middle",
    fields: &["_id", "tenant"],
    sharded: None,
    parent: Some(&BASE),
};

static LEAF: EntityModel = EntityModel {
    path: "tests::Leaf",
    entity_name: "Leaf",
    collection: "leaf",
    fields: &["_id", "tenant"],
    sharded: None,
    parent: Some(&MIDDLE),
};

#[test]
fn descriptor_is_found_on_nearest_ancestor() {
    let (owner, sharded) = LEAF
        .sharded_descriptor(8)
        .expect("within depth")
        .expect("inherited descriptor");

    assert_eq!(owner.path, "tests::Base");
    assert_eq!(sharded.value(), Ok(&["tenant"][..]));
    assert_eq!(
        LEAF.ancestors().map(|m| m.entity_name).collect::<Vec<_>>(),
        vec!["Leaf", "Middle", "Base"]
    );
}

#[test]
fn ancestry_walk_is_bounded() {
    assert_eq!(LEAF.sharded_descriptor(2).map(|found| found.is_some()), Err(2));
    assert!(BASE.sharded_descriptor(1).is_ok());
}
