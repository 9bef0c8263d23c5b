use super::*;
use crate::foundation::config::Diagnostics;

#[test]
fn default_registry_knows_the_builtin_kinds() {
    let registry = ModelRegistry::default();
    assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["code", "graph", "tree"]);

    let opts = AlgonimOpts::default();
    assert_eq!(registry.create("tree", &opts).unwrap().kind(), "tree");
    assert!(matches!(
        registry.create("pie", &opts),
        Err(AlgonimError::UnknownModel(kind)) if kind == "pie"
    ));
}

#[test]
fn graphs_inherit_the_host_diagnostics() {
    let opts = AlgonimOpts {
        diagnostics: Diagnostics::enabled(),
        ..AlgonimOpts::default()
    };
    match ModelRegistry::default().create("graph", &opts).unwrap() {
        Model::Graph(g) => assert_eq!(g.diagnostics(), Diagnostics::enabled()),
        other => panic!("expected a graph, got {}", other.kind()),
    }
}

#[test]
fn custom_constructors_can_be_registered() {
    let mut registry = ModelRegistry::empty();
    assert!(registry.create("code", &AlgonimOpts::default()).is_err());

    registry.register("listing", |_| Model::Code(Code::with_lines(["fn main() {}"])));
    match registry.create("listing", &AlgonimOpts::default()).unwrap() {
        Model::Code(c) => assert_eq!(c.lines().len(), 1),
        other => panic!("expected code, got {}", other.kind()),
    }
}

#[test]
fn store_hands_out_sequential_ids() {
    let mut store = ModelStore::new();
    assert!(store.is_empty());
    let a = store.insert(Code::new().into());
    let b = store.insert(Tree::new().into());
    assert_eq!((a.index(), b.index()), (0, 1));
    assert_eq!(store.len(), 2);
    assert!(store.contains(b));
    assert_eq!(store.get(b).unwrap().kind(), "tree");
    assert!(matches!(store.get(ModelId(2)), Err(AlgonimError::InvalidHandle(_))));
    assert_eq!(
        store.iter().map(|(id, m)| (id, m.kind())).collect::<Vec<_>>(),
        vec![(a, "code"), (b, "tree")]
    );
}
