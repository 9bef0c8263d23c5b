//! Domain visualizations drawn into panes.

pub mod code;
pub mod graph;
pub mod tree;

use std::collections::BTreeMap;

use crate::foundation::config::AlgonimOpts;
use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::gfx::drawer::Drawer;

pub use code::Code;
pub use graph::Graph;
pub use tree::Tree;

/// Handle to a model owned by a [`ModelStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(usize);

impl ModelId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub enum Model {
    Code(Code),
    Graph(Graph),
    Tree(Tree),
}

impl Model {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Code(_) => "code",
            Self::Graph(_) => "graph",
            Self::Tree(_) => "tree",
        }
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>) {
        match self {
            Self::Code(m) => m.draw(drawer),
            Self::Graph(m) => m.draw(drawer),
            Self::Tree(m) => m.draw(drawer),
        }
    }
}

impl From<Code> for Model {
    fn from(m: Code) -> Self {
        Self::Code(m)
    }
}

impl From<Graph> for Model {
    fn from(m: Graph) -> Self {
        Self::Graph(m)
    }
}

impl From<Tree> for Model {
    fn from(m: Tree) -> Self {
        Self::Tree(m)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ModelStore {
    models: Vec<Model>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: Model) -> ModelId {
        self.models.push(model);
        ModelId(self.models.len() - 1)
    }

    pub fn get(&self, id: ModelId) -> AlgonimResult<&Model> {
        self.models
            .get(id.0)
            .ok_or_else(|| AlgonimError::invalid_handle(format!("model {} does not exist", id.0)))
    }

    pub fn get_mut(&mut self, id: ModelId) -> AlgonimResult<&mut Model> {
        self.models
            .get_mut(id.0)
            .ok_or_else(|| AlgonimError::invalid_handle(format!("model {} does not exist", id.0)))
    }

    pub fn contains(&self, id: ModelId) -> bool {
        id.0 < self.models.len()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelId, &Model)> {
        self.models.iter().enumerate().map(|(i, m)| (ModelId(i), m))
    }
}

pub type ModelConstructor = fn(&AlgonimOpts) -> Model;

/// Name to constructor table behind `create_model`.
#[derive(Clone, Debug)]
pub struct ModelRegistry {
    constructors: BTreeMap<String, ModelConstructor>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("code", |_| Model::Code(Code::new()));
        registry.register("graph", |opts| Model::Graph(Graph::new(opts.diagnostics)));
        registry.register("tree", |_| Model::Tree(Tree::new()));
        registry
    }
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Adds or replaces the constructor for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, ctor: ModelConstructor) {
        self.constructors.insert(kind.into(), ctor);
    }

    pub fn create(&self, kind: &str, opts: &AlgonimOpts) -> AlgonimResult<Model> {
        self.constructors
            .get(kind)
            .map(|ctor| ctor(opts))
            .ok_or_else(|| AlgonimError::UnknownModel(kind.to_string()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/registry.rs"]
mod tests;
