// The four ways the forest changes shape once a step has been applied.
//
// Each action starts from a forest that satisfies the invariants and leaves
// one behind; in between, nothing else may look at the forest.

use crate::forest::{EdgeId, EdgeKind, Flower, FlowerId, FlowerKind, Forest};
use crate::reorder::reorder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// An odd blossom ran out of power and was expanded.
    Burst,
    /// A dumbbell was hung below a tree.
    Append,
    /// An odd cycle inside one tree was contracted into a blossom.
    Contract,
    /// Two trees were joined through a new matching edge and dissolved.
    Augment,
}

impl Forest {
    /// Decide what a freshly tightened edge leads to.
    pub fn classify(&self, k: EdgeId) -> Action {
        let [a, b] = self.free_flowers(k);
        if self.flower(a).is_in_dumbbell() || self.flower(b).is_in_dumbbell() {
            Action::Append
        } else if self.root(a) == self.root(b) {
            Action::Contract
        } else {
            Action::Augment
        }
    }

    /// Expand an odd blossom whose power reached zero.
    ///
    /// The run of subflowers from the one facing the tree parent down to the
    /// stem stays in the tree with alternating kinds; the rest of the cycle
    /// falls apart into dumbbells.
    pub fn burst(&mut self, g: FlowerId) {
        let flower = self.flower(g);
        assert!(flower.is_green() && flower.kind == FlowerKind::OddInTree, "burst: flower {} is not an odd blossom", g);
        assert!(flower.children.len() == 1, "burst: odd blossom {} has {} children", g, flower.children.len());
        let parent = flower.parent.expect("burst: odd blossom without a parent");
        let child  = flower.children[0];
        let stem   = flower.stem.expect("burst: blossom without a stem");
        let subflowers = flower.subflowers.clone();

        // Find the subflower that connects to the parent.
        let parent_edge = self.edge_between(parent, g, EdgeKind::FullBlocking)
                              .expect("burst: no blocking edge up to the parent");
        let upper = subflowers.iter()
                              .position(|&s| self.edge(parent_edge).touches(s))
                              .expect("burst: parent edge does not enter the blossom");
        let lower = subflowers.iter()
                              .position(|&s| s == stem)
                              .expect("burst: stem is not a subflower");

        // upper first, then an odd number of subflowers, then the stem,
        // then an even number of subflowers.
        let (ring, lower) = reorder(&subflowers, upper, lower);
        let (upper_flower, lower_flower) = (ring[0], ring[lower]);

        // The parent adopts the upper subflower in place of the blossom.
        for c in self.flower_mut(parent).children.iter_mut() {
            if *c == g {
                *c = upper_flower;
            }
        }
        self.flower_mut(upper_flower).parent = Some(parent);

        // The blossom's child moves below the stem subflower.
        self.flower_mut(child).parent = Some(lower_flower);
        self.flower_mut(lower_flower).children.push(child);

        // Relabel the run that stays in the tree, counting from the upper
        // subflower, which takes the blossom's odd place.
        for i in 0..=lower {
            let s = self.flower_mut(ring[i]);
            s.kind = if i % 2 == 0 { FlowerKind::OddInTree } else { FlowerKind::EvenInTree };
            if s.parent.is_none() {
                s.parent = Some(ring[i - 1]);
            }
            if s.children.is_empty() {
                s.children.push(ring[i + 1]);
            }
        }
        for &s in &ring[lower + 1..] {
            self.flower_mut(s).kind = FlowerKind::InDumbbell;
        }

        // Cycle edges from the stem round to the upper subflower no longer
        // hold anything together.
        for i in lower..ring.len() {
            let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
            if let Some(k) = self.edge_between(a, b, EdgeKind::FullBlocking) {
                self.edge_mut(k).kind = EdgeKind::Regular;
            }
        }

        for k in self.flower(g).edges.clone() {
            self.edge_mut(k).flowers.retain(|&f| f != g);
        }
        self.release(g);
    }

    /// Hang the dumbbell reached by edge k below the tree flower at its
    /// other end.
    pub fn append(&mut self, k: EdgeId) {
        self.edge_mut(k).kind = EdgeKind::FullBlocking;

        let [mut tree, mut upper] = self.free_flowers(k);
        if self.flower(tree).is_in_dumbbell() {
            std::mem::swap(&mut tree, &mut upper);
        }
        assert!(self.flower(tree).is_in_tree(), "append: flower {} is not in a tree", tree);
        assert!(self.flower(upper).is_in_dumbbell(), "append: flower {} is not in a dumbbell", upper);

        self.flower_mut(tree).children.push(upper);
        {
            let f = self.flower_mut(upper);
            f.parent = Some(tree);
            f.kind   = FlowerKind::OddInTree;
        }

        let pairing = self.matching_edge(upper).expect("append: dumbbell without a matching edge");
        let lower = self.across(pairing, upper);

        self.flower_mut(upper).children.push(lower);
        let f = self.flower_mut(lower);
        f.parent = Some(upper);
        f.kind   = FlowerKind::EvenInTree;
    }

    /// Contract the odd cycle closed by edge k into a new blossom and return it.
    ///
    /// Both ends of k must hang in the same tree. Their lowest common
    /// ancestor W is even, so the new blossom takes W's place as an even
    /// flower with zero power.
    pub fn contract(&mut self, k: EdgeId) -> FlowerId {
        self.edge_mut(k).kind = EdgeKind::FullBlocking;

        let [kf, hf] = self.free_flowers(k);
        let kpath = self.path_to_root(kf);
        let hpath = self.path_to_root(hf);

        // Walk down from the root while both paths agree.
        let shared = kpath.iter()
                          .rev()
                          .zip(hpath.iter().rev())
                          .take_while(|(a, b)| a == b)
                          .count();
        assert!(shared > 0, "contract: edge {} joins two different trees", k);
        let w = kpath[kpath.len() - shared];
        assert!(self.flower(w).kind == FlowerKind::EvenInTree, "contract: common ancestor {} is not even", w);

        // W, K_p, ..., K_1, K, H, H_1, ..., H_q
        let mut subflowers = vec![w];
        subflowers.extend(kpath[..kpath.len() - shared].iter().rev());
        subflowers.extend(&hpath[..hpath.len() - shared]);
        assert!(subflowers.len() % 2 == 1, "contract: cycle through edge {} is even", k);

        let parent = self.flower(w).parent;
        let z = self.allocate(Flower::green(w, subflowers.clone()));
        self.flower_mut(z).parent = parent;
        if let Some(p) = parent {
            for c in self.flower_mut(p).children.iter_mut() {
                if *c == w {
                    *c = z;
                }
            }
        }

        // Collect children and edges that leave the new blossom.
        let leaves = self.blossom_leaves(z);
        let mut children = vec![];
        let mut edges = vec![];
        for &s in &subflowers {
            let flower = self.flower(s);
            for &c in &flower.children {
                if !leaves.contains(&self.blossom_base(c)) {
                    children.push(c);
                }
            }
            for &e in &flower.edges {
                let [i, j] = self.edge(e).ends;
                if !(leaves.contains(&i) && leaves.contains(&j)) {
                    edges.push(e);
                }
            }
        }
        for &c in &children {
            self.flower_mut(c).parent = Some(z);
        }
        for &e in &edges {
            self.edge_mut(e).flowers.push(z);
        }
        {
            let flower = self.flower_mut(z);
            flower.children = children;
            flower.edges    = edges;
        }

        for &s in &subflowers {
            let flower = self.flower_mut(s);
            flower.kind   = FlowerKind::Internal;
            flower.parent = None;
            flower.children.clear();
        }
        z
    }

    /// Match edge k, which joins two different trees, flip every edge on the
    /// alternating paths from its ends to their roots, and break both trees
    /// up into dumbbells.
    pub fn augment(&mut self, k: EdgeId) {
        self.edge_mut(k).kind = EdgeKind::FullInPairing;

        for start in self.free_flowers(k) {
            let mut flower = start;
            let mut outgoing = k;
            loop {
                self.flip_alternating_path(flower, outgoing);

                let odd = match self.flower(flower).parent {
                    Some(p) => p,
                    None => break, // reached the root
                };
                let matched = self.matching_edge(odd).expect("augment: odd tree flower is not matched");
                self.edge_mut(matched).kind = EdgeKind::FullBlocking;

                let even = self.flower(odd).parent.expect("augment: odd tree flower without a parent");
                outgoing = self.edge_between(even, odd, EdgeKind::FullBlocking)
                               .expect("augment: no blocking edge up from an odd flower");
                self.edge_mut(outgoing).kind = EdgeKind::FullInPairing;

                self.flip_alternating_path(odd, outgoing);
                flower = even;
            }
            self.dismantle(flower);
        }
    }

    fn flip_alternating_path(&mut self, f: FlowerId, outgoing: EdgeId) {
        for k in self.alternating_path_edges(f, outgoing) {
            let edge = self.edge_mut(k);
            edge.kind = edge.kind.toggled();
        }
    }

    /// Edges inside blossom f on the even alternating path from its base to
    /// the subflower where `outgoing` leaves, nested blossoms included.
    /// That subflower becomes the new stem.
    fn alternating_path_edges(&mut self, f: FlowerId, outgoing: EdgeId) -> Vec<EdgeId> {
        let mut path = vec![];
        if !self.flower(f).is_green() {
            return path;
        }

        let subflowers = self.flower(f).subflowers.clone();
        let stem = self.flower(f).stem.expect("blossom without a stem");
        let stem_ix = subflowers.iter()
                                .position(|&s| s == stem)
                                .expect("stem is not a subflower");
        let exit_ix = subflowers.iter()
                                .position(|&s| self.flower(s).edges.contains(&outgoing))
                                .expect("outgoing edge does not leave the blossom");

        // stem first, then an odd number of subflowers, then the exit
        // subflower, then an even number of subflowers.
        let (ring, exit_ix) = reorder(&subflowers, stem_ix, exit_ix);

        for i in (0..exit_ix).step_by(2) {
            let (a, b) = (ring[i], ring[i + 1]);
            let link = self.edge_between(a, b, EdgeKind::FullBlocking)
                           .expect("no blocking edge between consecutive subflowers");
            // Read before b's stem moves.
            let matched = self.matching_edge(b).expect("odd subflower is not matched");

            path.extend(self.alternating_path_edges(a, link));
            path.push(link);
            path.extend(self.alternating_path_edges(b, link));
            path.push(matched);
        }
        path.extend(self.alternating_path_edges(ring[exit_ix], outgoing));

        self.flower_mut(f).stem = Some(ring[exit_ix]);
        path
    }

    /// Turn every flower of the tree below f into a dumbbell member. Tree
    /// edges that are not matched go back to regular.
    fn dismantle(&mut self, f: FlowerId) {
        for c in self.flower(f).children.clone() {
            self.dismantle(c);
        }
        for k in self.flower(f).edges.clone() {
            if self.edge(k).kind == EdgeKind::FullBlocking {
                self.edge_mut(k).kind = EdgeKind::Regular;
            }
        }
        let flower = self.flower_mut(f);
        flower.kind   = FlowerKind::InDumbbell;
        flower.parent = None;
        flower.children.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Event, Step};

    // Run one scheduler step and the action it calls for.
    fn advance(forest: &mut Forest) -> Action {
        let Step { epsilon, event } = forest.next_step().expect("no step left");
        forest.apply_epsilon(epsilon);
        match event {
            Event::Burst(g) => {
                forest.burst(g);
                Action::Burst
            }
            Event::Tighten(k) => {
                let action = forest.classify(k);
                match action {
                    Action::Append   => forest.append(k),
                    Action::Contract => {
                        forest.contract(k);
                    }
                    Action::Augment  => forest.augment(k),
                    Action::Burst    => unreachable!(),
                }
                action
            }
        }
    }

    fn kinds(forest: &Forest, edges: &[EdgeId]) -> Vec<EdgeKind> {
        edges.iter().map(|&k| forest.edge(k).kind).collect()
    }

    use crate::forest::EdgeKind::{FullBlocking as L, FullInPairing as M, Regular as R};
    use crate::forest::FlowerKind::{EvenInTree as Even, InDumbbell as Dumbbell, Internal, OddInTree as Odd};

    #[test]
    fn augment_two_roots() {
        let mut forest = Forest::new(2, &[(0, 1, 3.0)]);
        assert_eq!(advance(&mut forest), Action::Augment);
        assert_eq!(forest.edge(0).kind, M);
        assert_eq!(forest.flower(0).kind, Dumbbell);
        assert_eq!(forest.flower(1).kind, Dumbbell);
        assert_eq!(forest.flower(0).power, 1.5);
        assert_eq!(forest.slack(0), 0.0);
    }

    #[test]
    fn append_hangs_both_ends() {
        // 1-2-3 triangle, weights 1
        let mut forest = Forest::new(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        assert_eq!(advance(&mut forest), Action::Augment);
        assert_eq!(advance(&mut forest), Action::Append);

        assert_eq!(forest.edge(1).kind, L);
        assert_eq!(forest.flower(2).kind, Even);
        assert_eq!(forest.flower(2).children, vec![1]);
        assert_eq!(forest.flower(1).kind, Odd);
        assert_eq!(forest.flower(1).parent, Some(2));
        assert_eq!(forest.flower(1).children, vec![0]);
        assert_eq!(forest.flower(0).kind, Even);
        assert_eq!(forest.flower(0).parent, Some(1));
        assert_eq!(forest.root(0), 2);
    }

    #[test]
    fn contract_triangle() {
        let mut forest = Forest::new(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        advance(&mut forest);
        advance(&mut forest);
        assert_eq!(forest.classify(2), Action::Contract);
        assert_eq!(advance(&mut forest), Action::Contract);

        let z = 3;
        let blossom = forest.flower(z);
        assert_eq!(blossom.subflowers, vec![2, 1, 0]);
        assert_eq!(blossom.stem, Some(2));
        assert_eq!(blossom.kind, Even);
        assert_eq!(blossom.power, 0.0);
        assert_eq!(blossom.parent, None);
        assert!(blossom.children.is_empty());
        assert!(blossom.edges.is_empty());
        for f in 0..3 {
            assert_eq!(forest.flower(f).kind, Internal);
            assert_eq!(forest.flower(f).parent, None);
            assert!(forest.flower(f).children.is_empty());
        }
        assert_eq!(kinds(&forest, &[0, 1, 2]), vec![M, L, L]);
        assert_eq!(forest.blossom_base(z), 2);

        // Everything is internal now; no power can move.
        assert_eq!(forest.next_step(), None);
    }

    #[test]
    fn augment_through_blossom() {
        // triangle 1-2-3 with weights 2 and a pendant 1-4 with weight 5
        let mut forest = Forest::new(4, &[(0, 1, 2.0), (1, 2, 2.0), (0, 2, 2.0), (0, 3, 5.0)]);
        assert_eq!(advance(&mut forest), Action::Augment);
        assert_eq!(advance(&mut forest), Action::Append);
        assert_eq!(advance(&mut forest), Action::Contract);

        let z = 4;
        assert_eq!(forest.flower(z).edges, vec![3]);
        assert_eq!(forest.edge(3).flowers, vec![0, 3, z]);
        assert_eq!(forest.free_flowers(3), [3, z]);

        assert_eq!(advance(&mut forest), Action::Augment);
        assert_eq!(kinds(&forest, &[0, 1, 2, 3]), vec![L, M, L, M]);
        assert_eq!(forest.flower(z).stem, Some(0));
        assert_eq!(forest.blossom_base(z), 0);
        assert_eq!(forest.flower(z).kind, Dumbbell);
        assert_eq!(forest.flower(3).kind, Dumbbell);
        assert_eq!(forest.flower(z).power, 1.5);
        assert_eq!(forest.flower(3).power, 2.5);
        assert_eq!(forest.slack(3), 0.0);
    }

    #[test]
    fn augment_flips_tree_path() {
        // path 1-2-3-4
        let mut forest = Forest::new(4, &[(0, 1, 3.0), (1, 2, 1.0), (2, 3, 3.0)]);
        assert_eq!(advance(&mut forest), Action::Augment);
        assert_eq!(advance(&mut forest), Action::Append);
        assert_eq!(forest.path_to_root(2), vec![2, 1, 0]);

        assert_eq!(advance(&mut forest), Action::Augment);
        assert_eq!(kinds(&forest, &[0, 1, 2]), vec![M, R, M]);
        for f in 0..4 {
            assert_eq!(forest.flower(f).kind, Dumbbell);
            assert_eq!(forest.flower(f).parent, None);
            assert!(forest.flower(f).children.is_empty());
        }
    }

    #[test]
    fn burst_odd_blossom() {
        // the pendant graph again, plus 2-5 and 5-6
        let mut forest = Forest::new(6, &[
            (0, 1, 2.0), (1, 2, 2.0), (0, 2, 2.0), (0, 3, 5.0), (1, 4, 6.0), (4, 5, 20.0),
        ]);
        for expected in [Action::Augment, Action::Append, Action::Contract, Action::Augment, Action::Append] {
            assert_eq!(advance(&mut forest), expected);
        }

        let z = 6;
        assert_eq!(forest.flower(z).kind, Odd);
        assert_eq!(forest.flower(z).parent, Some(4));
        assert_eq!(forest.flower(z).children, vec![3]);
        assert_eq!(forest.flower(z).power, 1.5);
        assert_eq!(forest.next_step(), Some(Step { epsilon: 1.5, event: Event::Burst(z) }));

        assert_eq!(advance(&mut forest), Action::Burst);
        assert!(forest.flower_ids().all(|f| f < z));

        // 5 -> 2 -> 3 -> 1 -> 4
        assert_eq!(forest.flower(4).children, vec![1]);
        assert_eq!(forest.path_to_root(3), vec![3, 0, 2, 1, 4]);
        let tree: Vec<FlowerKind> = [4, 1, 2, 0, 3].iter().map(|&f| forest.flower(f).kind).collect();
        assert_eq!(tree, vec![Even, Odd, Even, Odd, Even]);

        // 1-2 closed the cycle and is released; the rest keep their roles.
        assert_eq!(kinds(&forest, &[0, 1, 2, 3, 4, 5]), vec![R, M, L, M, L, R]);
        assert_eq!(forest.edge(4).flowers, vec![1, 4]);
        assert_eq!(forest.edge(3).flowers, vec![0, 3]);
        assert_eq!(forest.flower(0).power, 1.0);

        assert_eq!(advance(&mut forest), Action::Augment);
        assert_eq!(kinds(&forest, &[0, 1, 2, 3, 4, 5]), vec![R, M, R, M, R, M]);
    }
}
