//! Behaviour of the store across realistic operation sequences
//!
//! This tests:
//! - Move re-parenting and sibling reordering
//! - URI propagation to descendants
//! - Non-cascading removal
//! - Bootstrap tolerance and ADD idempotence

use pagetree_store::selectors;
use pagetree_store::{
    parse_operations, Focus, MovePosition, NodeBatch, Operation, Store, MAX_SAFE_INDEX,
};
use serde_json::json;

fn init(nodes: serde_json::Value) -> Operation {
    Operation::Init {
        nodes: NodeBatch::from_value(nodes),
        site_node: Some("p".to_string()),
        document_node: None,
        focused: None,
    }
}

fn siblings() -> Operation {
    init(json!({
        "p": { "nodeType": "Site", "index": 0 },
        "a": { "nodeType": "Page", "parentContextPath": "p", "index": 1 },
        "b": { "nodeType": "Page", "parentContextPath": "p", "index": 2 },
        "c": { "nodeType": "Page", "parentContextPath": "p", "index": 3 },
    }))
}

fn child_order(store: &Store, parent: &str) -> Vec<String> {
    store
        .state()
        .by_context_path
        .get(parent)
        .unwrap()
        .children
        .iter()
        .map(|c| c.context_path.clone())
        .collect()
}

#[test]
fn test_move_after_sibling_reorders() {
    let mut store = Store::new();
    store.dispatch(siblings());

    let state = store.dispatch(Operation::Move {
        node_to_be_moved: "a".to_string(),
        target_node: "b".to_string(),
        position: MovePosition::After,
    });

    let a = state.by_context_path.get("a").unwrap();
    assert_eq!(a.index, 3);
    assert_eq!(a.parent_context_path.as_deref(), Some("p"));
    assert_eq!(child_order(&store, "p"), vec!["b", "a", "c"]);
}

#[test]
fn test_move_into_sorts_last() {
    let mut store = Store::new();
    store.dispatch(init(json!({
        "p": { "nodeType": "Site" },
        "x": { "nodeType": "Page", "parentContextPath": "p", "index": 1 },
        "y": { "nodeType": "Page", "parentContextPath": "p", "index": 2 },
        "y1": { "nodeType": "Page", "parentContextPath": "y", "index": 500 },
        "y2": { "nodeType": "Page", "parentContextPath": "y", "index": 1000000 },
    })));

    let state = store.dispatch(Operation::Move {
        node_to_be_moved: "x".to_string(),
        target_node: "y".to_string(),
        position: MovePosition::Into,
    });

    let x = state.by_context_path.get("x").unwrap();
    assert_eq!(x.parent_context_path.as_deref(), Some("y"));
    assert_eq!(x.index, MAX_SAFE_INDEX);
    assert_eq!(child_order(&store, "y"), vec!["y1", "y2", "x"]);
    assert_eq!(child_order(&store, "p"), vec!["y"]);
}

#[test]
fn test_repeated_moves_collide_without_renormalizing() {
    let mut store = Store::new();
    store.dispatch(siblings());

    for node in ["a", "c"] {
        store.dispatch(Operation::Move {
            node_to_be_moved: node.to_string(),
            target_node: "b".to_string(),
            position: MovePosition::Before,
        });
    }

    let state = store.state();
    assert_eq!(state.by_context_path.get("a").unwrap().index, 1);
    assert_eq!(state.by_context_path.get("c").unwrap().index, 1);
    assert_eq!(child_order(&store, "p"), vec!["a", "c", "b"]);

    store.dispatch(Operation::NormalizeIndices {
        parent_context_path: "p".to_string(),
        step: 1,
    });
    let indices: Vec<i64> = store
        .state()
        .by_context_path
        .get("p")
        .unwrap()
        .children
        .iter()
        .map(|c| c.index)
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(child_order(&store, "p"), vec!["a", "c", "b"]);
}

#[test]
fn test_update_uri_rewrites_descendants_only_on_separator() {
    let mut store = Store::new();
    store.dispatch(init(json!({
        "p": { "nodeType": "Site", "uri": "/" },
        "shop": { "nodeType": "Page", "parentContextPath": "p", "uri": "/shop@live" },
        "shoes": { "nodeType": "Page", "parentContextPath": "shop", "uri": "/shop/shoes@live" },
        "red": { "nodeType": "Page", "parentContextPath": "shoes", "uri": "/shop/shoes/red@live" },
        "shine": { "nodeType": "Page", "parentContextPath": "shop", "uri": "/shop/shoeshine@live" },
        "text": { "nodeType": "Text", "parentContextPath": "shoes" },
    })));

    let state = store.dispatch(Operation::UpdateUri {
        old_uri_fragment: "shop/shoes".to_string(),
        new_uri_fragment: "shop/sneakers".to_string(),
    });

    let uri = |cp: &str| state.by_context_path.get(cp).unwrap().uri.clone();
    assert_eq!(uri("shoes").as_deref(), Some("/shop/sneakers@live"));
    assert_eq!(uri("red").as_deref(), Some("/shop/sneakers/red@live"));
    assert_eq!(uri("shine").as_deref(), Some("/shop/shoeshine@live"));
    assert_eq!(uri("shop").as_deref(), Some("/shop@live"));
    assert_eq!(uri("text"), None);
}

#[test]
fn test_update_uri_leaves_repeated_segment_names_alone() {
    let mut store = Store::new();
    store.dispatch(init(json!({
        "p": { "nodeType": "Site", "uri": "/" },
        "news": { "nodeType": "Page", "parentContextPath": "p", "uri": "/news@live" },
        "archive": { "nodeType": "Page", "parentContextPath": "news", "uri": "/news/archive@live" },
        "inner": { "nodeType": "Page", "parentContextPath": "archive", "uri": "/news/archive/news@live" },
        "y2020": { "nodeType": "Page", "parentContextPath": "inner", "uri": "/news/archive/news/2020@live" },
    })));

    let state = store.dispatch(Operation::UpdateUri {
        old_uri_fragment: "news".to_string(),
        new_uri_fragment: "blog".to_string(),
    });

    let uri = |cp: &str| state.by_context_path.get(cp).unwrap().uri.clone();
    assert_eq!(uri("news").as_deref(), Some("/blog@live"));
    assert_eq!(uri("archive").as_deref(), Some("/blog/archive@live"));
    assert_eq!(uri("inner").as_deref(), Some("/blog/archive/news@live"));
    assert_eq!(uri("y2020").as_deref(), Some("/blog/archive/news/2020@live"));
}

#[test]
fn test_move_beside_root_detaches_node() {
    let mut store = Store::new();
    store.dispatch(siblings());

    let state = store.dispatch(Operation::Move {
        node_to_be_moved: "a".to_string(),
        target_node: "p".to_string(),
        position: MovePosition::Before,
    });

    let a = state.by_context_path.get("a").unwrap();
    assert_eq!(a.parent_context_path, None);
    assert_eq!(a.index, -1);
    assert_eq!(child_order(&store, "p"), vec!["b", "c"]);
    assert_eq!(selectors::parent_of(&state, "a"), None);

    let state = store.dispatch(Operation::Move {
        node_to_be_moved: "b".to_string(),
        target_node: "p".to_string(),
        position: MovePosition::After,
    });

    let b = state.by_context_path.get("b").unwrap();
    assert_eq!(b.parent_context_path, None);
    assert_eq!(b.index, 1);
    assert_eq!(child_order(&store, "p"), vec!["c"]);
}

#[test]
fn test_add_is_idempotent() {
    let batch = NodeBatch::from_value(json!({
        "d": { "nodeType": "Page", "parentContextPath": "p", "index": 0 },
        "b": { "nodeType": "Folder", "parentContextPath": "p", "index": 9 },
    }));

    let mut once = Store::new();
    once.dispatch(siblings());
    let first = once.dispatch(Operation::Add {
        nodes: batch.clone(),
    });

    let mut twice = Store::new();
    twice.dispatch(siblings());
    twice.dispatch(Operation::Add {
        nodes: batch.clone(),
    });
    let second = twice.dispatch(Operation::Add { nodes: batch });

    assert_eq!(*first, *second);
    assert_eq!(child_order(&twice, "p"), vec!["d", "a", "c", "b"]);
    assert_eq!(second.by_context_path.get("b").unwrap().node_type, "Folder");
}

#[test]
fn test_add_replaces_whole_record() {
    let mut store = Store::new();
    store.dispatch(init(json!({
        "p": { "nodeType": "Site" },
        "a": {
            "nodeType": "Page",
            "parentContextPath": "p",
            "uri": "/a@live",
            "properties": { "title": "A", "_hidden": true }
        },
    })));

    let state = store.dispatch(Operation::Add {
        nodes: NodeBatch::from_value(json!({
            "a": { "nodeType": "Page", "parentContextPath": "p", "properties": { "subtitle": "new" } }
        })),
    });

    let a = state.by_context_path.get("a").unwrap();
    assert_eq!(a.uri, None);
    assert!(!a.is_hidden());
    assert!(a.properties.rest.get("title").is_none());
    assert_eq!(a.properties.rest.get("subtitle"), Some(&json!("new")));
}

#[test]
fn test_unfocus_always_clears() {
    let mut store = Store::new();
    store.dispatch(siblings());

    let state = store.dispatch(Operation::Unfocus);
    assert_eq!(state.focused, Focus::new("", ""));

    store.dispatch(Operation::Focus {
        context_path: "a".to_string(),
        fusion_path: "page<Neos.Neos:Page>/body".to_string(),
    });
    let state = store.dispatch(Operation::Unfocus);
    assert_eq!(
        serde_json::to_value(&state.focused).unwrap(),
        json!({ "contextPath": "", "fusionPath": "" })
    );
}

#[test]
fn test_remove_orphans_descendants() {
    let mut store = Store::new();
    store.dispatch(init(json!({
        "p": { "nodeType": "Site" },
        "parent": { "nodeType": "Page", "parentContextPath": "p", "index": 1 },
        "child": { "nodeType": "Page", "parentContextPath": "parent", "index": 1 },
    })));
    store.dispatch(Operation::Focus {
        context_path: "parent".to_string(),
        fusion_path: String::new(),
    });

    store.dispatch(Operation::Remove {
        context_path: "parent".to_string(),
    });
    // Next structural operation rebuilds the index
    let state = store.dispatch(Operation::Add {
        nodes: NodeBatch::new(),
    });

    assert!(state.by_context_path.get("child").is_some());
    assert!(state
        .by_context_path
        .nodes()
        .iter()
        .all(|node| node.children.iter().all(|c| c.context_path != "child")));
    assert_eq!(child_order(&store, "p"), Vec::<String>::new());

    // Stale focus is tolerated
    assert_eq!(state.focused.context_path, "parent");
    assert!(selectors::focused_node(&state).is_none());
}

#[test]
fn test_malformed_bootstrap_entries_are_excluded() {
    let mut store = Store::new();
    let state = store.dispatch(init(json!({
        "p": { "nodeType": "Site" },
        "ok": { "nodeType": "Page", "parentContextPath": "p" },
        "broken": { "nodeType": 17 },
        "also-broken": [],
    })));

    assert_eq!(state.by_context_path.keys(), vec!["p", "ok"]);
    assert_eq!(child_order(&store, "p"), vec!["ok"]);
}

#[test]
fn test_script_replay_with_undo() {
    let ops = parse_operations(
        r#"[
            { "type": "HIDE", "contextPath": "b" },
            { "type": "MOVE", "nodeToBeMoved": "c", "targetNode": "a", "position": "before" },
            { "type": "CUT", "contextPath": "a" },
            { "type": "PASTE", "contextPath": "c" }
        ]"#,
    )
    .unwrap();

    let mut store = Store::new();
    store.dispatch(siblings());
    for op in ops {
        store.dispatch(op);
    }

    assert_eq!(child_order(&store, "p"), vec!["c", "a", "b"]);
    assert!(store.state().by_context_path.get("b").unwrap().is_hidden());
    assert_eq!(store.state().clipboard, None);

    assert!(store.undo());
    assert_eq!(child_order(&store, "p"), vec!["a", "b", "c"]);
    assert!(store.undo());
    assert!(!store.state().by_context_path.get("b").unwrap().is_hidden());
    assert!(!store.undo());
}
