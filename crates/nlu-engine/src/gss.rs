//! Graph-structured stack (spec.md §2 component 4, §3 "GSS Vertex",
//! "Z-node"): the generalized parser's non-deterministic stack, merging
//! identical frames so ambiguity doesn't blow up the stack into a tree.
//!
//! Per-query arena, same integer-handle discipline as [`crate::forest`].

use std::collections::HashMap;

use nlu_core::StateId;

use crate::forest::NodeId;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct VertexId(u32);

impl VertexId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ZNodeId(u32);

impl ZNodeId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub state: StateId,
    pub position: u32,
    /// Incoming edges (this vertex is their target).
    pub z_nodes: Vec<ZNodeId>,
}

/// An edge into its owning vertex, labelled by the SPPF node that was
/// shifted/reduced to reach it. `predecessors` is a set: several GSS
/// paths that reached the same vertex via an edge with the same label
/// collapse into one z-node (spec.md §3, §4.2 "GSS merging").
#[derive(Debug, Clone)]
pub struct ZNode {
    pub vertex: VertexId,
    pub node: NodeId,
    pub predecessors: Vec<VertexId>,
}

#[derive(Debug, Default)]
pub struct Gss {
    vertices: Vec<Vertex>,
    z_nodes: Vec<ZNode>,
    vertex_index: HashMap<(StateId, u32), VertexId>,
}

impl Gss {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create the vertex for `(state, position)` -- identity per
    /// spec.md §3 ("Identity within a single `start` position is by
    /// state").
    pub fn get_or_create_vertex(&mut self, state: StateId, position: u32) -> VertexId {
        if let Some(&id) = self.vertex_index.get(&(state, position)) {
            return id;
        }
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            state,
            position,
            z_nodes: Vec::new(),
        });
        self.vertex_index.insert((state, position), id);
        id
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0 as usize]
    }

    pub fn z_node(&self, id: ZNodeId) -> &ZNode {
        &self.z_nodes[id.0 as usize]
    }

    /// Record an edge `predecessor -> target`, labelled `node`. Merges
    /// into an existing z-node on `target` carrying the same label if
    /// one exists; otherwise creates a new one. Returns the z-node and
    /// whether it was newly created (callers only enqueue reductions
    /// the first time a z-node -- and therefore its shift -- appears).
    pub fn add_edge(&mut self, target: VertexId, predecessor: VertexId, node: NodeId) -> (ZNodeId, bool) {
        let existing = self.vertices[target.0 as usize]
            .z_nodes
            .iter()
            .copied()
            .find(|&zid| self.z_nodes[zid.0 as usize].node == node);

        if let Some(zid) = existing {
            let z = &mut self.z_nodes[zid.0 as usize];
            if !z.predecessors.contains(&predecessor) {
                z.predecessors.push(predecessor);
            }
            return (zid, false);
        }

        let zid = ZNodeId(self.z_nodes.len() as u32);
        self.z_nodes.push(ZNode {
            vertex: target,
            node,
            predecessors: vec![predecessor],
        });
        self.vertices[target.0 as usize].z_nodes.push(zid);
        (zid, true)
    }

    /// Every `(path-end vertex, children in RHS order)` reachable by
    /// walking back `hops` edges from `zid` (spec.md §4.2 "Walk back
    /// |RHS|-1 edges from the z-node to enumerate all GSS paths of that
    /// length"). `hops == 0` for a unary rule's sole child; `hops == 1`
    /// for a binary rule's second child.
    pub fn enumerate_paths(&self, zid: ZNodeId, hops: usize) -> Vec<(VertexId, Vec<NodeId>)> {
        let mut out = Vec::new();
        self.walk_back(zid, hops, &[], &mut out);
        out
    }

    fn walk_back(&self, zid: ZNodeId, hops: usize, tail: &[NodeId], out: &mut Vec<(VertexId, Vec<NodeId>)>) {
        let z = &self.z_nodes[zid.0 as usize];
        let mut children = Vec::with_capacity(tail.len() + 1);
        children.push(z.node);
        children.extend_from_slice(tail);

        if hops == 0 {
            for &pred in &z.predecessors {
                out.push((pred, children.clone()));
            }
            return;
        }

        for &pred in &z.predecessors {
            let incoming = self.vertices[pred.0 as usize].z_nodes.clone();
            for inc in incoming {
                self.walk_back(inc, hops - 1, &children, out);
            }
        }
    }

    pub fn vertices_at(&self, position: u32) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(move |(_, v)| v.position == position)
            .map(|(i, _)| VertexId(i as u32))
    }
}
