use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use geom::LonLat;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct NodeID(pub usize);

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct EdgeID(pub usize);

/// An interned street name. Unnamed roads have no NameID at all.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct NameID(pub usize);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node #{}", self.0)
    }
}

impl fmt::Display for EdgeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Edge #{}", self.0)
    }
}

/// Attributes of one directed arc, read-only for the guidance engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeData {
    pub name: Option<NameID>,
    pub roundabout: bool,
    /// The underlying road only carries traffic in one direction.
    pub oneway: bool,
    /// This arc runs against the legal direction of a oneway road. It stays in the graph so the
    /// back-bearing candidate always exists, but traffic may never enter it.
    pub wrong_way: bool,
}

/// A directed arc between two nodes. Every road contributes an arc in each direction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeID,
    pub dst: NodeID,
    /// The arc digitized in the opposite direction along the same road.
    pub twin: EdgeID,
    pub data: EdgeData,
}

/// A node-based road graph. The engine only ever reads it; immutable for the lifetime of a
/// classification batch, so distinct nodes can be processed concurrently without locks.
#[derive(Clone, Debug, Default)]
pub struct RoadGraph {
    nodes: Vec<LonLat>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeID>>,
    names: Vec<String>,
    name_lookup: HashMap<String, NameID>,
}

impl RoadGraph {
    pub fn new() -> RoadGraph {
        RoadGraph::default()
    }

    pub fn add_node(&mut self, pt: LonLat) -> NodeID {
        self.nodes.push(pt);
        self.adjacency.push(Vec::new());
        NodeID(self.nodes.len() - 1)
    }

    /// Adds a road between two nodes as a pair of twin arcs. The reverse arc of a oneway road is
    /// kept with `wrong_way` set. Returns (forwards, backwards).
    pub fn add_road(
        &mut self,
        from: NodeID,
        to: NodeID,
        name: Option<&str>,
        oneway: bool,
        roundabout: bool,
    ) -> (EdgeID, EdgeID) {
        let name = name.map(|n| self.intern_name(n));
        let forwards = EdgeID(self.edges.len());
        let backwards = EdgeID(self.edges.len() + 1);
        self.edges.push(Edge {
            src: from,
            dst: to,
            twin: backwards,
            data: EdgeData {
                name,
                roundabout,
                oneway,
                wrong_way: false,
            },
        });
        self.edges.push(Edge {
            src: to,
            dst: from,
            twin: forwards,
            data: EdgeData {
                name,
                roundabout,
                oneway,
                wrong_way: oneway,
            },
        });
        self.adjacency[from.0].push(forwards);
        self.adjacency[to.0].push(backwards);
        (forwards, backwards)
    }

    fn intern_name(&mut self, name: &str) -> NameID {
        if let Some(id) = self.name_lookup.get(name) {
            return *id;
        }
        let id = NameID(self.names.len());
        self.names.push(name.to_string());
        self.name_lookup.insert(name.to_string(), id);
        id
    }

    pub fn edge(&self, e: EdgeID) -> &Edge {
        &self.edges[e.0]
    }

    pub fn edge_data(&self, e: EdgeID) -> &EdgeData {
        &self.edges[e.0].data
    }

    pub fn target(&self, e: EdgeID) -> NodeID {
        self.edges[e.0].dst
    }

    pub fn coordinate(&self, n: NodeID) -> LonLat {
        self.nodes[n.0]
    }

    pub fn adjacent_edges(&self, n: NodeID) -> &[EdgeID] {
        &self.adjacency[n.0]
    }

    pub fn name(&self, id: NameID) -> &str {
        &self.names[id.0]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = EdgeID> {
        (0..self.edges.len()).map(EdgeID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twin_arcs_and_oneways() {
        let mut graph = RoadGraph::new();
        let a = graph.add_node(LonLat::new(0.0, 0.0));
        let b = graph.add_node(LonLat::new(0.001, 0.0));
        let (fwd, back) = graph.add_road(a, b, Some("Main Street"), true, false);

        assert_eq!(graph.edge(fwd).twin, back);
        assert_eq!(graph.edge(back).twin, fwd);
        assert_eq!(graph.target(fwd), b);
        assert_eq!(graph.target(back), a);
        assert!(!graph.edge_data(fwd).wrong_way);
        assert!(graph.edge_data(back).wrong_way);
        assert_eq!(graph.adjacent_edges(a), &[fwd]);
        assert_eq!(graph.adjacent_edges(b), &[back]);
    }

    #[test]
    fn names_are_interned() {
        let mut graph = RoadGraph::new();
        let a = graph.add_node(LonLat::new(0.0, 0.0));
        let b = graph.add_node(LonLat::new(0.001, 0.0));
        let c = graph.add_node(LonLat::new(0.002, 0.0));
        let (e1, _) = graph.add_road(a, b, Some("Main Street"), false, false);
        let (e2, _) = graph.add_road(b, c, Some("Main Street"), false, false);
        let (e3, _) = graph.add_road(a, c, None, false, false);

        assert_eq!(graph.edge_data(e1).name, graph.edge_data(e2).name);
        assert_eq!(graph.name(graph.edge_data(e1).name.unwrap()), "Main Street");
        assert_eq!(graph.edge_data(e3).name, None);
    }
}
