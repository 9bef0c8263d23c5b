//! Node-link graph with bookkept adjacency lists.
//!
//! Nodes and edges live in arenas addressed by [`NodeId`]/[`EdgeId`]; removed slots stay
//! empty so stale ids are detected instead of aliasing a newer element.
//!
//! Every edge is listed in `source.outgoing` and `destination.incoming`. A bidirectional
//! edge is additionally listed in `source.incoming` and `destination.outgoing`.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use crate::foundation::config::Diagnostics;
use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::gfx::border::Border;
use crate::gfx::drawer::Drawer;
use crate::gfx::styles::{
    ArrowStyleOverrides, FontStyle, FontStyleOverrides, LineStyleOverrides, TextAlign,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Incoming,
    Outgoing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub position: Point,
    pub value: String,
    /// Overrides the graph's default border.
    pub border: Option<Border>,
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

impl Node {
    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[EdgeId] {
        &self.outgoing
    }

    fn list(&self, dir: Direction) -> &Vec<EdgeId> {
        match dir {
            Direction::Incoming => &self.incoming,
            Direction::Outgoing => &self.outgoing,
        }
    }

    fn list_mut(&mut self, dir: Direction) -> &mut Vec<EdgeId> {
        match dir {
            Direction::Incoming => &mut self.incoming,
            Direction::Outgoing => &mut self.outgoing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    source: NodeId,
    destination: NodeId,
    bidirectional: bool,
}

impl Edge {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn bidirectional(&self) -> bool {
        self.bidirectional
    }

    /// Adjacency list memberships this edge requires.
    fn memberships(&self) -> BTreeSet<(NodeId, Direction)> {
        let mut set = BTreeSet::from([
            (self.source, Direction::Outgoing),
            (self.destination, Direction::Incoming),
        ]);
        if self.bidirectional {
            set.insert((self.source, Direction::Incoming));
            set.insert((self.destination, Direction::Outgoing));
        }
        set
    }
}

#[derive(Clone, Debug)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    diagnostics: Diagnostics,
    pub default_border: Border,
    pub font: FontStyleOverrides,
    pub edge_line: LineStyleOverrides,
    pub arrow: ArrowStyleOverrides,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(Diagnostics::default())
    }
}

impl Graph {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            diagnostics,
            default_border: Border::default(),
            font: FontStyleOverrides::default(),
            edge_line: LineStyleOverrides::default(),
            arrow: ArrowStyleOverrides::default(),
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    pub fn add_node(&mut self, position: Point, value: impl Into<String>) -> NodeId {
        self.nodes.push(Some(Node {
            position,
            value: value.into(),
            border: None,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }));
        NodeId(self.nodes.len() - 1)
    }

    /// Removes the node together with every edge attached to it.
    pub fn remove_node(&mut self, id: NodeId) -> AlgonimResult<()> {
        let node = self.node(id)?;
        let attached: BTreeSet<EdgeId> = node
            .incoming
            .iter()
            .chain(node.outgoing.iter())
            .copied()
            .collect();
        for edge in attached {
            self.remove_edge(edge)?;
        }
        self.nodes[id.0] = None;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> AlgonimResult<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| AlgonimError::invalid_handle(format!("graph node {} does not exist", id.0)))
    }

    fn node_mut(&mut self, id: NodeId) -> AlgonimResult<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| AlgonimError::invalid_handle(format!("graph node {} does not exist", id.0)))
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| NodeId(i))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| EdgeId(i))
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) -> AlgonimResult<()> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> AlgonimResult<()> {
        self.node_mut(id)?.value = value.into();
        Ok(())
    }

    pub fn set_border(&mut self, id: NodeId, border: Option<Border>) -> AlgonimResult<()> {
        self.node_mut(id)?.border = border;
        Ok(())
    }

    pub fn add_edge(
        &mut self,
        source: NodeId,
        destination: NodeId,
        bidirectional: bool,
    ) -> AlgonimResult<EdgeId> {
        self.node(source)?;
        self.node(destination)?;

        let id = EdgeId(self.edges.len());
        let edge = Edge {
            source,
            destination,
            bidirectional,
        };
        self.edges.push(Some(edge));
        self.relink(id, &BTreeSet::new(), &edge.memberships());
        self.check_invariants();
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> AlgonimResult<()> {
        let edge = *self.edge(id)?;
        self.relink(id, &edge.memberships(), &BTreeSet::new());
        self.edges[id.0] = None;
        self.check_invariants();
        Ok(())
    }

    pub fn edge(&self, id: EdgeId) -> AlgonimResult<&Edge> {
        self.edges
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| AlgonimError::invalid_handle(format!("graph edge {} does not exist", id.0)))
    }

    pub fn set_source(&mut self, id: EdgeId, source: NodeId) -> AlgonimResult<()> {
        self.node(source)?;
        self.update_edge(id, |e| e.source = source)
    }

    pub fn set_destination(&mut self, id: EdgeId, destination: NodeId) -> AlgonimResult<()> {
        self.node(destination)?;
        self.update_edge(id, |e| e.destination = destination)
    }

    pub fn set_bidirectional(&mut self, id: EdgeId, bidirectional: bool) -> AlgonimResult<()> {
        self.update_edge(id, |e| e.bidirectional = bidirectional)
    }

    fn update_edge(&mut self, id: EdgeId, f: impl FnOnce(&mut Edge)) -> AlgonimResult<()> {
        let old = *self.edge(id)?;
        let mut new = old;
        f(&mut new);
        if new == old {
            return Ok(());
        }
        self.relink(id, &old.memberships(), &new.memberships());
        self.edges[id.0] = Some(new);
        self.check_invariants();
        Ok(())
    }

    fn relink(
        &mut self,
        edge: EdgeId,
        old: &BTreeSet<(NodeId, Direction)>,
        new: &BTreeSet<(NodeId, Direction)>,
    ) {
        for &(node, dir) in old.difference(new) {
            self.unlink(edge, node, dir);
        }
        for &(node, dir) in new.difference(old) {
            self.link(edge, node, dir);
        }
    }

    fn link(&mut self, edge: EdgeId, node: NodeId, dir: Direction) {
        let checks = self.diagnostics.consistency_checks;
        let diagnostics = self.diagnostics;
        let Some(Some(n)) = self.nodes.get_mut(node.0) else {
            return;
        };
        let list = n.list_mut(dir);
        if list.contains(&edge) {
            if checks {
                diagnostics.warn_inconsistency(&format!(
                    "edge {} linked twice into {dir:?} of node {}",
                    edge.0, node.0
                ));
            }
            return;
        }
        list.push(edge);
    }

    fn unlink(&mut self, edge: EdgeId, node: NodeId, dir: Direction) {
        let checks = self.diagnostics.consistency_checks;
        let diagnostics = self.diagnostics;
        let Some(Some(n)) = self.nodes.get_mut(node.0) else {
            return;
        };
        let list = n.list_mut(dir);
        let Some(pos) = list.iter().position(|e| *e == edge) else {
            return;
        };
        list.remove(pos);
        if checks && list.contains(&edge) {
            diagnostics.warn_inconsistency(&format!(
                "edge {} still in {dir:?} of node {} after unlinking",
                edge.0, node.0
            ));
        }
    }

    /// Every adjacency bookkeeping problem in the graph. Empty for a consistent graph.
    pub fn consistency_report(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for id in self.edge_ids() {
            let Ok(edge) = self.edge(id) else { continue };
            for (node, dir) in edge.memberships() {
                match self.node(node) {
                    Ok(n) => {
                        let count = n.list(dir).iter().filter(|e| **e == id).count();
                        if count != 1 {
                            problems.push(format!(
                                "edge {} appears {count} times in {dir:?} of node {}",
                                id.0, node.0
                            ));
                        }
                    }
                    Err(_) => problems.push(format!(
                        "edge {} references missing node {}",
                        id.0, node.0
                    )),
                }
            }
        }

        for id in self.node_ids() {
            let Ok(node) = self.node(id) else { continue };
            for dir in [Direction::Incoming, Direction::Outgoing] {
                for &e in node.list(dir) {
                    let required = self
                        .edge(e)
                        .map(|edge| edge.memberships().contains(&(id, dir)))
                        .unwrap_or(false);
                    if !required {
                        problems.push(format!(
                            "node {} lists edge {} in {dir:?} without a matching edge",
                            id.0, e.0
                        ));
                    }
                }
            }
        }
        problems
    }

    /// Logs every bookkeeping problem when consistency checks are enabled.
    pub fn check_invariants(&self) {
        if !self.diagnostics.consistency_checks {
            return;
        }
        for problem in self.consistency_report() {
            self.diagnostics.warn_inconsistency(&problem);
        }
    }

    /// All nodes reachable from `start` along edges in either direction, `start` first.
    pub fn discover_linked_nodes(&self, start: NodeId) -> AlgonimResult<Vec<NodeId>> {
        self.node(start)?;
        let mut visited = vec![false; self.nodes.len()];
        let mut found = Vec::new();
        let mut stack = vec![start];
        visited[start.0] = true;

        while let Some(id) = stack.pop() {
            found.push(id);
            let Ok(node) = self.node(id) else { continue };
            for &e in node.outgoing.iter().chain(node.incoming.iter()) {
                let Ok(edge) = self.edge(e) else { continue };
                for next in [edge.source, edge.destination] {
                    if !visited[next.0] && self.node(next).is_ok() {
                        visited[next.0] = true;
                        stack.push(next);
                    }
                }
            }
        }
        Ok(found)
    }

    /// Nodes grouped by connected component, in discovery order.
    pub fn components(&self) -> Vec<Vec<NodeId>> {
        let mut seen = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        for id in self.node_ids() {
            if seen[id.0] {
                continue;
            }
            let Ok(component) = self.discover_linked_nodes(id) else {
                continue;
            };
            for n in &component {
                seen[n.0] = true;
            }
            out.push(component);
        }
        out
    }

    fn border_of<'g>(&'g self, node: &'g Node) -> &'g Border {
        node.border.as_ref().unwrap_or(&self.default_border)
    }

    pub fn draw(&self, drawer: &mut Drawer<'_>) {
        let align = TextAlign::default();
        let style = FontStyle::resolve(&self.font);

        let mut content = vec![Size::ZERO; self.nodes.len()];
        for id in self.node_ids() {
            if let Ok(node) = self.node(id) {
                let m = drawer.measure_text_with(&node.value, &align, &style);
                content[id.0] = Size::new(m.width, m.height());
            }
        }

        for component in self.components() {
            for id in component {
                let Ok(node) = self.node(id) else { continue };
                draw_labeled_node(
                    drawer,
                    node.position,
                    &node.value,
                    content[id.0],
                    self.border_of(node),
                    &align,
                    &style,
                );

                for &e in &node.outgoing {
                    let Ok(edge) = self.edge(e) else { continue };
                    // Bidirectional edges are also outgoing at the destination.
                    if edge.source != id || edge.destination == id {
                        continue;
                    }
                    let Ok(dest) = self.node(edge.destination) else {
                        continue;
                    };
                    draw_trimmed_edge(
                        drawer,
                        EdgeEnd {
                            center: node.position,
                            content: content[id.0],
                            border: self.border_of(node),
                        },
                        EdgeEnd {
                            center: dest.position,
                            content: content[edge.destination.0],
                            border: self.border_of(dest),
                        },
                        edge.bidirectional,
                        &self.edge_line,
                        Some(&self.arrow),
                    );
                }
            }
        }
    }
}

/// One endpoint of an edge drawn between bordered nodes.
pub(crate) struct EdgeEnd<'b> {
    pub center: Point,
    pub content: Size,
    pub border: &'b Border,
}

/// Border and centered label of a node at `center`.
pub(crate) fn draw_labeled_node(
    drawer: &mut Drawer<'_>,
    center: Point,
    label: &str,
    content: Size,
    border: &Border,
    align: &TextAlign,
    style: &FontStyle,
) {
    let bounds = border.bounds(content);
    let origin = drawer.origin();
    let mut sub = drawer.subregion(bounds.offset(center.x + origin.x, center.y + origin.y));
    let mut centered = sub.with_translated_origin(-bounds.origin.to_vec2());
    border.draw(&mut centered, content);
    centered.draw_text_with(label, Point::ORIGIN, align, style);
}

/// Line between two nodes with both ends moved onto the node outlines. With `arrow` set it
/// gets a head at `to`, and one at `from` as well when `bidirectional`.
pub(crate) fn draw_trimmed_edge(
    drawer: &mut Drawer<'_>,
    from: EdgeEnd<'_>,
    to: EdgeEnd<'_>,
    bidirectional: bool,
    line: &LineStyleOverrides,
    arrow: Option<&ArrowStyleOverrides>,
) {
    let d: Vec2 = to.center - from.center;
    let angle = d.y.atan2(d.x);
    let start = from.center + from.border.boundary_point(from.content, angle).to_vec2();
    let end = to.center + to.border.boundary_point(to.content, angle + PI).to_vec2();

    drawer.draw_line(start, end, line);
    if let Some(arrow) = arrow {
        drawer.draw_arrowhead(end, start, line, arrow);
        if bidirectional {
            drawer.draw_arrowhead(start, end, line, arrow);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/graph.rs"]
mod tests;
