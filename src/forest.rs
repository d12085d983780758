// The blossom forest: flowers, edges and the arena that owns them.
//
// Vertices are numbered 0 .. (nvertex-1) and their flowers carry the same
// numbers. Blossoms ("green" flowers) are allocated above that range and
// their slots are recycled once a blossom is burst.
//
// Edges are numbered 0 .. (nedge-1) in input order and are never removed.

use std::fmt;

pub type Vertex   = usize;
pub type FlowerId = usize;
pub type EdgeId   = usize;
pub type Weight   = f64;
pub type WeightedEdge = (Vertex, Vertex, Weight); // i, j, wt

/// Role of a flower in the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowerKind {
    EvenInTree,
    OddInTree,
    InDumbbell,
    /// Contracted inside a parent blossom.
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Regular,
    /// Tight, and either a tree edge or a cycle edge of a blossom.
    FullBlocking,
    /// Tight and part of the matching.
    FullInPairing,
}

impl EdgeKind {
    pub fn is_full(self) -> bool {
        self != EdgeKind::Regular
    }

    /// Swap blocking and in-pairing; regular edges stay regular.
    pub fn toggled(self) -> EdgeKind {
        match self {
            EdgeKind::FullBlocking  => EdgeKind::FullInPairing,
            EdgeKind::FullInPairing => EdgeKind::FullBlocking,
            EdgeKind::Regular       => EdgeKind::Regular,
        }
    }
}

/// A base vertex ("blue") or a contracted odd cycle ("green").
#[derive(Debug, Clone)]
pub struct Flower {
    pub kind:  FlowerKind,
    pub power: Weight,

    // If this is a blossom,
    // subflowers is the cyclic list of flowers it is made of and stem is
    // the one among them holding the blossom's base.
    pub subflowers: Vec<FlowerId>,
    pub stem:       Option<FlowerId>,

    // Tree links; only meaningful while the flower is in a tree.
    pub parent:   Option<FlowerId>,
    pub children: Vec<FlowerId>,

    // Edges with exactly one end inside this flower.
    pub edges: Vec<EdgeId>,

    // Set for base vertices only.
    pub vertex: Option<Vertex>,
}

impl Flower {
    fn blue(v: Vertex, power: Weight) -> Flower {
        Flower {
            kind:       FlowerKind::EvenInTree,
            power,
            subflowers: vec![],
            stem:       None,
            parent:     None,
            children:   vec![],
            edges:      vec![],
            vertex:     Some(v),
        }
    }

    /// A fresh blossom. It starts out even with zero power; contraction
    /// only ever happens below an even common ancestor.
    pub(crate) fn green(stem: FlowerId, subflowers: Vec<FlowerId>) -> Flower {
        Flower {
            kind:       FlowerKind::EvenInTree,
            power:      0.0,
            subflowers,
            stem:       Some(stem),
            parent:     None,
            children:   vec![],
            edges:      vec![],
            vertex:     None,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.kind != FlowerKind::Internal
    }

    #[inline]
    pub fn is_green(&self) -> bool {
        !self.subflowers.is_empty()
    }

    #[inline]
    pub fn is_in_dumbbell(&self) -> bool {
        self.kind == FlowerKind::InDumbbell
    }

    #[inline]
    pub fn is_in_tree(&self) -> bool {
        matches!(self.kind, FlowerKind::EvenInTree | FlowerKind::OddInTree)
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub kind:   EdgeKind,
    pub weight: Weight,
    /// Every flower enclosing either end, at every nesting level,
    /// in the order they were added.
    pub flowers: Vec<FlowerId>,
    /// The two base flowers.
    pub ends: [FlowerId; 2],
}

impl Edge {
    fn new(i: Vertex, j: Vertex, weight: Weight) -> Edge {
        Edge {
            kind:    EdgeKind::Regular,
            weight,
            flowers: vec![i, j],
            ends:    [i, j],
        }
    }

    #[inline]
    pub fn touches(&self, f: FlowerId) -> bool {
        self.flowers.contains(&f)
    }
}

#[derive(Debug)]
pub struct Forest {
    pub(crate) nvertex: usize,
    pub(crate) flowers: Vec<Option<Flower>>,
    pub(crate) edges:   Vec<Edge>,
    // Flower slots freed by burst blossoms, reused by new ones.
    pub(crate) unused:  Vec<FlowerId>,
    pub(crate) verify:  bool,
}

impl Forest {
    /// Build one base flower per vertex and wire every edge to its two ends.
    /// Vertices are 0-based; there is no edge from a vertex to itself.
    ///
    /// Every vertex starts with half the smallest negative weight as its
    /// power (zero if no weight is negative), so no edge starts overfull.
    /// A common shift of all vertex powers changes every perfect matching
    /// by the same amount.
    pub fn new(nvertex: usize, edges: &[WeightedEdge]) -> Forest {
        let start = edges.iter().fold(0.0, |low: Weight, &(_, _, wt)| low.min(wt)) / 2.0;
        let mut blues: Vec<Flower> = (0..nvertex).map(|v| Flower::blue(v, start)).collect();
        let mut list = Vec::with_capacity(edges.len());

        for (k, &(i, j, wt)) in edges.iter().enumerate() {
            assert!(i != j, "edge {} is a self-loop on vertex {}", k, i);
            assert!(i < nvertex && j < nvertex, "edge {} leaves the vertex range", k);
            blues[i].edges.push(k);
            blues[j].edges.push(k);
            list.push(Edge::new(i, j, wt));
        }

        Forest {
            nvertex,
            flowers: blues.into_iter().map(Some).collect(),
            edges:   list,
            unused:  vec![],
            verify:  true,
        }
    }

    /// Turn the post-solve optimum check on or off (on by default).
    pub fn verify(&mut self, on: bool) -> &mut Self {
        self.verify = on;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.nvertex
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn flower(&self, f: FlowerId) -> &Flower {
        match self.flowers.get(f) {
            Some(Some(flower)) => flower,
            _ => panic!("flower {} is not alive", f),
        }
    }

    pub(crate) fn flower_mut(&mut self, f: FlowerId) -> &mut Flower {
        match self.flowers.get_mut(f) {
            Some(Some(flower)) => flower,
            _ => panic!("flower {} is not alive", f),
        }
    }

    pub fn edge(&self, k: EdgeId) -> &Edge {
        &self.edges[k]
    }

    pub(crate) fn edge_mut(&mut self, k: EdgeId) -> &mut Edge {
        &mut self.edges[k]
    }

    /// Ids of every live flower, base vertices first.
    pub fn flower_ids(&self) -> impl Iterator<Item = FlowerId> + '_ {
        self.flowers
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(f, _)| f)
    }

    pub(crate) fn allocate(&mut self, flower: Flower) -> FlowerId {
        match self.unused.pop() {
            Some(f) => {
                self.flowers[f] = Some(flower);
                f
            }
            None => {
                self.flowers.push(Some(flower));
                self.flowers.len() - 1
            }
        }
    }

    pub(crate) fn release(&mut self, f: FlowerId) {
        assert!(f >= self.nvertex, "base flower {} can not be released", f);
        self.flowers[f] = None;
        self.unused.push(f);
    }

    /// The top of the tree containing f.
    pub fn root(&self, f: FlowerId) -> FlowerId {
        let mut current = f;
        while let Some(parent) = self.flower(current).parent {
            current = parent;
        }
        current
    }

    /// f, its parent, and so on up to the root.
    pub fn path_to_root(&self, f: FlowerId) -> Vec<FlowerId> {
        let mut path = vec![f];
        while let Some(parent) = self.flower(path[path.len() - 1]).parent {
            path.push(parent);
        }
        path
    }

    /// The in-pairing edge leaving f, if f is matched.
    pub fn matching_edge(&self, f: FlowerId) -> Option<EdgeId> {
        self.flower(f)
            .edges
            .iter()
            .copied()
            .find(|&k| self.edges[k].kind == EdgeKind::FullInPairing)
    }

    /// An edge of the given kind leaving a and entering b.
    pub fn edge_between(&self, a: FlowerId, b: FlowerId, kind: EdgeKind) -> Option<EdgeId> {
        self.flower(a)
            .edges
            .iter()
            .copied()
            .find(|&k| self.edges[k].kind == kind && self.edges[k].touches(b))
    }

    /// The two top-level flowers an edge runs between.
    pub fn free_flowers(&self, k: EdgeId) -> [FlowerId; 2] {
        let free: Vec<FlowerId> = self.edges[k]
            .flowers
            .iter()
            .copied()
            .filter(|&f| self.flower(f).is_free())
            .collect();
        assert!(free.len() == 2, "edge {} connects {} free flowers", k, free.len());
        [free[0], free[1]]
    }

    /// The free flower at the other end of edge k from f.
    pub fn across(&self, k: EdgeId, f: FlowerId) -> FlowerId {
        let [a, b] = self.free_flowers(k);
        if a == f {
            b
        } else {
            assert!(b == f, "edge {} does not leave flower {}", k, f);
            a
        }
    }

    /// Generate the leaf vertices of a blossom.
    pub fn blossom_leaves(&self, f: FlowerId) -> Vec<FlowerId> {
        let flower = self.flower(f);
        if !flower.is_green() {
            return vec![f];
        }
        let mut leaves = vec![];
        for &s in &flower.subflowers {
            leaves.extend(self.blossom_leaves(s));
        }
        leaves
    }

    /// The input vertex a base flower stands for.
    pub fn vertex_of(&self, f: FlowerId) -> Vertex {
        self.flower(f).vertex.expect("a blossom has no vertex of its own")
    }

    /// The base vertex of a (possibly trivial) blossom.
    pub fn blossom_base(&self, f: FlowerId) -> FlowerId {
        let mut current = f;
        while let Some(stem) = self.flower(current).stem {
            current = stem;
        }
        current
    }

    /// Weight left over after every enclosing flower took its power.
    pub fn slack(&self, k: EdgeId) -> Weight {
        let edge = &self.edges[k];
        edge.flowers
            .iter()
            .fold(edge.weight, |s, &f| s - self.flower(f).power)
    }

    /// How fast the slack of edge k shrinks per unit of epsilon.
    pub fn rate(&self, k: EdgeId) -> i32 {
        self.edges[k]
            .flowers
            .iter()
            .map(|&f| match self.flower(f).kind {
                FlowerKind::EvenInTree => 1,
                FlowerKind::OddInTree  => -1,
                _ => 0,
            })
            .sum()
    }

    /// Edges currently in the matching, in input order.
    pub fn pairing_edges(&self) -> Vec<EdgeId> {
        (0..self.edges.len())
            .filter(|&k| self.edges[k].kind == EdgeKind::FullInPairing)
            .collect()
    }
}

/// One line per free flower:
/// `G<base>|v|v|...|` for a blossom and its leaves,
/// `B<v>|` followed by `M<w>|` / `L<w>|` for matched and blocking
/// neighbours of a base vertex. Vertices print 1-based.
impl fmt::Display for Forest {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        for f in self.flower_ids() {
            let flower = self.flower(f);
            if !flower.is_free() {
                continue;
            }
            if flower.is_green() {
                write!(out, "G{}|", self.vertex_of(self.blossom_base(f)) + 1)?;
                for leaf in self.blossom_leaves(f) {
                    write!(out, "{}|", self.vertex_of(leaf) + 1)?;
                }
            } else {
                write!(out, "B{}|", self.vertex_of(f) + 1)?;
                for &k in &flower.edges {
                    let edge = &self.edges[k];
                    let tag = match edge.kind {
                        EdgeKind::FullInPairing => 'M',
                        EdgeKind::FullBlocking  => 'L',
                        EdgeKind::Regular       => continue,
                    };
                    let other = if edge.ends[0] == f { edge.ends[1] } else { edge.ends[0] };
                    write!(out, "{}{}|", tag, self.vertex_of(other) + 1)?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
