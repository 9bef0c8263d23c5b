//! JSON scene files: models, a layout over them, and optional animation steps.
//!
//! ```json
//! {
//!   "width": 640, "height": 480,
//!   "models": {
//!     "src": { "kind": "code", "lines": ["if x then", "  y"], "arrow_line": 0 },
//!     "g":   { "kind": "graph", "nodes": [{ "id": "a", "x": 80, "y": 60, "value": "A" }] }
//!   },
//!   "layout": { "split": "vertical", "ratio": 0.3, "left": "src", "right": "g" },
//!   "steps": [{ "delay_ms": 500, "actions": [{ "op": "set_arrow_line", "model": "src", "line": 1 }] }]
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use crate::foundation::config::AlgonimOpts;
use crate::foundation::core::{Color, Point};
use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::gfx::border::Border;
use crate::gfx::styles::FontStyleOverrides;
use crate::models::ModelId;
use crate::models::code::SignId;
use crate::models::graph::{EdgeId, Graph, NodeId};
use crate::models::tree::{Tree, TreeNodeId};
use crate::pane::layout::Layout;
use crate::widget::algonim::Algonim;
use crate::widget::slideshow::Animation;

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub background: Option<Color>,
    pub models: BTreeMap<String, ModelSpec>,
    /// Layout description with model leaves given by name.
    pub layout: serde_json::Value,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelSpec {
    Code(CodeSpec),
    Graph(GraphSpec),
    Tree(TreeSpec),
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CodeSpec {
    pub lines: Vec<String>,
    pub arrow_line: Option<usize>,
    pub signs: Vec<SignSpec>,
    pub font: Option<FontStyleOverrides>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignSpec {
    /// Name for later `destroy_sign` actions.
    #[serde(default)]
    pub id: Option<String>,
    pub line: usize,
    pub text: String,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct GraphSpec {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    pub border: Option<Border>,
    pub font: Option<FontStyleOverrides>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub border: Option<Border>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub bidirectional: bool,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TreeSpec {
    pub root: Option<TreeNodeSpec>,
    pub border: Option<Border>,
    pub font: Option<FontStyleOverrides>,
    pub level_height: Option<f64>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeNodeSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub value: String,
    /// `null` entries are empty slots.
    #[serde(default)]
    pub children: Vec<Option<TreeNodeSpec>>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    /// Hold time of the keyframe after this step; the host default when absent.
    #[serde(default)]
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    SetArrowLine {
        model: String,
        line: Option<usize>,
    },
    SetLines {
        model: String,
        lines: Vec<String>,
    },
    AddSign {
        model: String,
        line: usize,
        text: String,
        #[serde(default)]
        id: Option<String>,
    },
    DestroySign {
        model: String,
        sign: String,
    },
    ClearSigns {
        model: String,
        line: usize,
    },
    MoveNode {
        model: String,
        node: String,
        x: f64,
        y: f64,
    },
    SetNodeValue {
        model: String,
        node: String,
        value: String,
    },
    AddEdge {
        model: String,
        from: String,
        to: String,
        #[serde(default)]
        bidirectional: bool,
        #[serde(default)]
        id: Option<String>,
    },
    RemoveEdge {
        model: String,
        edge: String,
    },
    SetBidirectional {
        model: String,
        edge: String,
        bidirectional: bool,
    },
    SetTreeValue {
        model: String,
        node: String,
        value: String,
    },
    DeleteTreeNode {
        model: String,
        node: String,
        #[serde(default)]
        keep_slot: bool,
    },
}

/// Scene names resolved to the handles of the built models.
#[derive(Clone, Debug, Default)]
pub struct SceneHandles {
    pub models: BTreeMap<String, ModelId>,
    graph_nodes: BTreeMap<(ModelId, String), NodeId>,
    edges: BTreeMap<(ModelId, String), EdgeId>,
    signs: BTreeMap<(ModelId, String), SignId>,
    tree_nodes: BTreeMap<(ModelId, String), TreeNodeId>,
}

impl SceneHandles {
    pub fn model(&self, name: &str) -> AlgonimResult<ModelId> {
        self.models
            .get(name)
            .copied()
            .ok_or_else(|| AlgonimError::validation(format!("scene has no model named '{name}'")))
    }

    pub fn graph_node(&self, model: ModelId, name: &str) -> AlgonimResult<NodeId> {
        lookup(&self.graph_nodes, model, name, "graph node")
    }

    pub fn edge(&self, model: ModelId, name: &str) -> AlgonimResult<EdgeId> {
        lookup(&self.edges, model, name, "edge")
    }

    pub fn sign(&self, model: ModelId, name: &str) -> AlgonimResult<SignId> {
        lookup(&self.signs, model, name, "sign")
    }

    pub fn tree_node(&self, model: ModelId, name: &str) -> AlgonimResult<TreeNodeId> {
        lookup(&self.tree_nodes, model, name, "tree node")
    }
}

fn lookup<T: Copy>(
    map: &BTreeMap<(ModelId, String), T>,
    model: ModelId,
    name: &str,
    what: &str,
) -> AlgonimResult<T> {
    map.get(&(model, name.to_string()))
        .copied()
        .ok_or_else(|| AlgonimError::validation(format!("unknown {what} '{name}'")))
}

impl Scene {
    pub fn from_json_str(s: &str) -> AlgonimResult<Self> {
        serde_json::from_str(s).map_err(|e| AlgonimError::serde(e.to_string()))
    }

    pub fn from_json_value(v: serde_json::Value) -> AlgonimResult<Self> {
        serde_json::from_value(v).map_err(|e| AlgonimError::serde(e.to_string()))
    }

    /// Builds the host with every model and the layout in place.
    ///
    /// `opts` supplies everything the scene does not set itself.
    #[tracing::instrument(level = "debug", skip_all, fields(models = self.models.len()))]
    pub fn build(&self, mut opts: AlgonimOpts) -> AlgonimResult<(Algonim, SceneHandles)> {
        opts.width = self.width;
        opts.height = self.height;
        if let Some(bg) = self.background {
            opts.background = bg;
        }

        let mut alg = Algonim::new(opts);
        let mut handles = SceneHandles::default();
        for (name, spec) in &self.models {
            let id = match spec {
                ModelSpec::Code(spec) => build_code(&mut alg, &mut handles, spec)?,
                ModelSpec::Graph(spec) => build_graph(&mut alg, &mut handles, spec)?,
                ModelSpec::Tree(spec) => build_tree(&mut alg, &mut handles, spec)?,
            };
            handles.models.insert(name.clone(), id);
        }

        let layout = Layout::from_json(&self.layout, &|name| handles.models.get(name).copied())?;
        alg.set_layout(&layout)?;
        Ok((alg, handles))
    }

    /// Playback of the scene's steps against a host built by [`Scene::build`].
    pub fn playback(&self, handles: SceneHandles) -> ScenePlayback {
        ScenePlayback {
            steps: self.steps.clone(),
            handles,
            next: 0,
        }
    }
}

fn build_code(alg: &mut Algonim, handles: &mut SceneHandles, spec: &CodeSpec) -> AlgonimResult<ModelId> {
    let id = alg.create_model("code")?;
    let code = alg.code_mut(id)?;
    code.set_lines(spec.lines.iter().cloned());
    if let Some(font) = &spec.font {
        code.font = font.clone();
    }
    code.set_arrow_line(spec.arrow_line)?;
    for sign in &spec.signs {
        let sign_id = code.add_sign(sign.line, sign.text.clone())?;
        if let Some(name) = &sign.id {
            handles.signs.insert((id, name.clone()), sign_id);
        }
    }
    Ok(id)
}

fn build_graph(alg: &mut Algonim, handles: &mut SceneHandles, spec: &GraphSpec) -> AlgonimResult<ModelId> {
    let id = alg.create_model("graph")?;
    let graph: &mut Graph = alg.graph_mut(id)?;
    if let Some(border) = &spec.border {
        graph.default_border = border.clone();
    }
    if let Some(font) = &spec.font {
        graph.font = font.clone();
    }
    for node in &spec.nodes {
        let key = (id, node.id.clone());
        if handles.graph_nodes.contains_key(&key) {
            return Err(AlgonimError::validation(format!("duplicate graph node id '{}'", node.id)));
        }
        let n = graph.add_node(Point::new(node.x, node.y), node.value.clone());
        graph.set_border(n, node.border.clone())?;
        handles.graph_nodes.insert(key, n);
    }
    for edge in &spec.edges {
        let from = handles.graph_node(id, &edge.from)?;
        let to = handles.graph_node(id, &edge.to)?;
        let e = graph.add_edge(from, to, edge.bidirectional)?;
        if let Some(name) = &edge.id {
            handles.edges.insert((id, name.clone()), e);
        }
    }
    Ok(id)
}

fn build_tree(alg: &mut Algonim, handles: &mut SceneHandles, spec: &TreeSpec) -> AlgonimResult<ModelId> {
    let id = alg.create_model("tree")?;
    let tree: &mut Tree = alg.tree_mut(id)?;
    if let Some(border) = &spec.border {
        tree.border = border.clone();
    }
    if let Some(font) = &spec.font {
        tree.font = font.clone();
    }
    if let Some(h) = spec.level_height {
        tree.level_height = h;
    }
    let Some(root) = &spec.root else {
        return Ok(id);
    };

    let root_id = tree.set_root(root.value.clone());
    let mut stack = vec![(root_id, root)];
    while let Some((node, node_spec)) = stack.pop() {
        if let Some(name) = &node_spec.id {
            handles.tree_nodes.insert((id, name.clone()), node);
        }
        for child in &node_spec.children {
            match child {
                Some(c) => {
                    let c_id = tree.add_child(node, c.value.clone())?;
                    stack.push((c_id, c));
                }
                None => {
                    tree.add_empty_slot(node)?;
                }
            }
        }
    }
    Ok(id)
}

impl Action {
    pub fn apply(&self, alg: &mut Algonim, handles: &mut SceneHandles) -> AlgonimResult<()> {
        match self {
            Self::SetArrowLine { model, line } => {
                let m = handles.model(model)?;
                alg.code_mut(m)?.set_arrow_line(*line)
            }
            Self::SetLines { model, lines } => {
                let m = handles.model(model)?;
                alg.code_mut(m)?.set_lines(lines.iter().cloned());
                handles.signs.retain(|(owner, _), _| *owner != m);
                Ok(())
            }
            Self::AddSign {
                model,
                line,
                text,
                id,
            } => {
                let m = handles.model(model)?;
                let sign = alg.code_mut(m)?.add_sign(*line, text.clone())?;
                if let Some(name) = id {
                    handles.signs.insert((m, name.clone()), sign);
                }
                Ok(())
            }
            Self::DestroySign { model, sign } => {
                let m = handles.model(model)?;
                let s = handles.sign(m, sign)?;
                alg.code_mut(m)?.destroy_sign(s)
            }
            Self::ClearSigns { model, line } => {
                let m = handles.model(model)?;
                alg.code_mut(m)?.clear_signs(*line)
            }
            Self::MoveNode { model, node, x, y } => {
                let m = handles.model(model)?;
                let n = handles.graph_node(m, node)?;
                alg.graph_mut(m)?.set_position(n, Point::new(*x, *y))
            }
            Self::SetNodeValue { model, node, value } => {
                let m = handles.model(model)?;
                let n = handles.graph_node(m, node)?;
                alg.graph_mut(m)?.set_value(n, value.clone())
            }
            Self::AddEdge {
                model,
                from,
                to,
                bidirectional,
                id,
            } => {
                let m = handles.model(model)?;
                let (from, to) = (handles.graph_node(m, from)?, handles.graph_node(m, to)?);
                let e = alg.graph_mut(m)?.add_edge(from, to, *bidirectional)?;
                if let Some(name) = id {
                    handles.edges.insert((m, name.clone()), e);
                }
                Ok(())
            }
            Self::RemoveEdge { model, edge } => {
                let m = handles.model(model)?;
                let e = handles.edge(m, edge)?;
                alg.graph_mut(m)?.remove_edge(e)
            }
            Self::SetBidirectional {
                model,
                edge,
                bidirectional,
            } => {
                let m = handles.model(model)?;
                let e = handles.edge(m, edge)?;
                alg.graph_mut(m)?.set_bidirectional(e, *bidirectional)
            }
            Self::SetTreeValue { model, node, value } => {
                let m = handles.model(model)?;
                let n = handles.tree_node(m, node)?;
                alg.tree_mut(m)?.set_value(n, value.clone())
            }
            Self::DeleteTreeNode {
                model,
                node,
                keep_slot,
            } => {
                let m = handles.model(model)?;
                let n = handles.tree_node(m, node)?;
                alg.tree_mut(m)?.delete(n, *keep_slot)
            }
        }
    }
}

/// [`Animation`] over a scene's steps.
#[derive(Clone, Debug)]
pub struct ScenePlayback {
    steps: Vec<StepSpec>,
    handles: SceneHandles,
    next: usize,
}

impl ScenePlayback {
    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }
}

impl Animation for ScenePlayback {
    fn next_step(&mut self, alg: &mut Algonim) -> AlgonimResult<Option<Duration>> {
        let Some(step) = self.steps.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        for action in &step.actions {
            action.apply(alg, &mut self.handles)?;
        }
        let hold = step
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or(alg.opts().keyframe_delay);
        Ok(Some(hold))
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
