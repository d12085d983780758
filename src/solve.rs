// Driver loop: alternate dual steps and structural actions until the
// matching is complete or no power can move any more.

use tracing::{debug, info, trace, warn};

use crate::actions::Action;
use crate::forest::{EdgeKind, Forest, Vertex, Weight};
use crate::reorder::reorder;
use crate::schedule::{Event, Step};

// Slack tolerated by the optimum check, relative to the largest weight.
const TOLERANCE: Weight = 1e-9;

/// How often each action ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub steps:         usize,
    pub bursts:        usize,
    pub appends:       usize,
    pub contractions:  usize,
    pub augmentations: usize,
}

impl Stats {
    fn record(&mut self, action: Action) {
        self.steps += 1;
        match action {
            Action::Burst    => self.bursts += 1,
            Action::Append   => self.appends += 1,
            Action::Contract => self.contractions += 1,
            Action::Augment  => self.augmentations += 1,
        }
    }
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub vertex_count: usize,
    /// Total weight of the matched edges.
    pub weight: Weight,
    /// Matched vertex pairs, 0-based, in input order of their edges.
    pub pairs: Vec<(Vertex, Vertex)>,
    pub stats: Stats,
}

impl Summary {
    /// True when every vertex but at most one is matched.
    pub fn is_complete(&self) -> bool {
        self.pairs.len() == self.vertex_count / 2
    }
}

impl Forest {
    /// Move the powers by one step and carry out the action it unlocks.
    /// Returns None, leaving the forest untouched, once nothing can move.
    pub fn step(&mut self) -> Option<Action> {
        let Step { epsilon, event } = self.next_step()?;
        self.apply_epsilon(epsilon);

        let action = match event {
            Event::Burst(g) => {
                debug!("burst: epsilon={} blossom={:?}", epsilon,
                       self.blossom_leaves(g).iter().map(|&v| self.vertex_of(v) + 1).collect::<Vec<_>>());
                self.burst(g);
                Action::Burst
            }
            Event::Tighten(k) => {
                let [i, j] = self.edge(k).ends;
                let action = self.classify(k);
                debug!("{:?}: epsilon={} edge=({}, {})", action, epsilon, i + 1, j + 1);
                match action {
                    Action::Append   => self.append(k),
                    Action::Contract => {
                        let z = self.contract(k);
                        debug!("new blossom {} with stem vertex {}", z, self.blossom_base(z) + 1);
                    }
                    Action::Augment  => self.augment(k),
                    Action::Burst    => unreachable!("a tight edge never bursts a blossom"),
                }
                action
            }
        };
        trace!("state after {:?}:\n{}", action, self);
        Some(action)
    }

    /// Run steps until floor(n/2) pairs are matched or no step is left.
    pub fn solve(&mut self) -> Summary {
        let target = self.nvertex / 2;
        info!("solving: vertices={} edges={} target_pairs={}", self.nvertex, self.edges.len(), target);

        let mut stats = Stats::default();
        let mut npairs = 0;
        while npairs < target {
            let action = match self.step() {
                Some(action) => action,
                None => break,
            };
            stats.record(action);
            if action == Action::Augment {
                npairs += 1;
            }
        }

        if self.verify {
            self.verify_optimum();
        }

        let pairing = self.pairing_edges();
        let weight = pairing.iter()
                            .rev()
                            .fold(0.0, |sum, &k| sum + self.edge(k).weight);
        let pairs = pairing.iter()
                           .map(|&k| {
                               let [i, j] = self.edge(k).ends;
                               (self.vertex_of(i), self.vertex_of(j))
                           })
                           .collect();
        let summary = Summary { vertex_count: self.nvertex, weight, pairs, stats };

        if !summary.is_complete() {
            warn!("complete pairing not found: {} of {} pairs", summary.pairs.len(), target);
        }
        info!("solved: pairs={} weight={} steps={}", summary.pairs.len(), summary.weight, stats.steps);
        summary
    }

    /// Verify that the matching and the powers are consistent and optimal.
    /// Panics on the first violation.
    pub fn verify_optimum(&self) {
        let tolerance = TOLERANCE * self.edges
                                        .iter()
                                        .fold(1.0, |big: Weight, e| big.max(e.weight.abs()));

        // 0. every vertex is matched at most once, and there are at most
        //    floor(n/2) pairs;
        let pairing = self.pairing_edges();
        let mut covered = vec![false; self.nvertex];
        for &k in &pairing {
            for v in self.edge(k).ends {
                assert!(!covered[v], "vertex {} is matched twice", v + 1);
                covered[v] = true;
            }
        }
        assert!(pairing.len() <= self.nvertex / 2, "{} pairs among {} vertices", pairing.len(), self.nvertex);

        // 1. all edges have non-negative slack and
        // 2. all matched edges have zero slack;
        for k in 0..self.edges.len() {
            let s = self.slack(k);
            assert!(s >= -tolerance, "edge {} has negative slack {}", k, s);
            if self.edge(k).kind == EdgeKind::FullInPairing {
                assert!(s.abs() <= tolerance, "matched edge {} is not tight: slack {}", k, s);
            }
        }

        // 3. blossoms are odd cycles alternating between blocking and
        //    matched edges from their stem, and free ones have no negative power.
        for f in self.flower_ids() {
            let flower = self.flower(f);
            if !flower.is_green() {
                continue;
            }
            let n = flower.subflowers.len();
            assert!(n % 2 == 1, "blossom {} has {} subflowers", f, n);
            if flower.is_free() {
                assert!(flower.power >= -tolerance, "free blossom {} has power {}", f, flower.power);
            }

            let stem = flower.stem.expect("blossom without a stem");
            let stem_ix = flower.subflowers
                                .iter()
                                .position(|&s| s == stem)
                                .expect("stem is not a subflower");
            let (ring, _) = reorder(&flower.subflowers, stem_ix, stem_ix);
            for i in 0..n {
                let kind = if i % 2 == 1 { EdgeKind::FullInPairing } else { EdgeKind::FullBlocking };
                assert!(self.edge_between(ring[i], ring[(i + 1) % n], kind).is_some(),
                        "blossom {}: no {:?} edge between subflowers {} and {}", f, kind, ring[i], ring[(i + 1) % n]);
            }
        }
        // Optimum verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_edges() {
        let mut forest = Forest::new(0, &[]);
        let summary = forest.solve();
        assert!(summary.pairs.is_empty());
        assert_eq!(summary.weight, 0.0);
        assert_eq!(summary.stats, Stats::default());
        assert!(summary.is_complete());
    }

    #[test]
    fn isolated_vertices() {
        let mut forest = Forest::new(2, &[]);
        let summary = forest.solve();
        assert!(summary.pairs.is_empty());
        assert!(!summary.is_complete());
    }

    #[test]
    fn single_edge() {
        let mut forest = Forest::new(2, &[(0, 1, 1.0)]);
        let summary = forest.solve();
        assert_eq!(summary.pairs, vec![(0, 1)]);
        assert_eq!(summary.weight, 1.0);
        assert_eq!(summary.stats.augmentations, 1);
        assert_eq!(summary.stats.steps, 1);
    }

    #[test]
    fn stops_at_target() {
        // Once 1-2 is matched in the triangle nothing else is tried.
        let mut forest = Forest::new(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        let summary = forest.solve();
        assert_eq!(summary.pairs, vec![(0, 1)]);
        assert_eq!(summary.stats.steps, 1);
        assert!(summary.is_complete());
        assert_eq!(forest.flower(2).kind, crate::forest::FlowerKind::EvenInTree);
    }

    #[test]
    fn termination_is_stable() {
        let mut forest = Forest::new(4, &[(0, 1, 1.0)]);
        let summary = forest.solve();
        assert_eq!(summary.pairs.len(), 1);
        assert_eq!(forest.next_step(), None);
        assert_eq!(forest.next_step(), None);
        assert_eq!(forest.step(), None);
    }

    #[test]
    fn verification_can_be_skipped() {
        let mut forest = Forest::new(4, &[(0, 1, 2.0), (2, 3, 3.0), (1, 2, 1.0)]);
        let summary = forest.verify(false).solve();
        assert_eq!(summary.pairs, vec![(0, 1), (2, 3)]);
        assert_eq!(summary.weight, 5.0);
    }

    #[test]
    fn negative_weights() {
        let mut forest = Forest::new(4, &[(0, 1, -7.0), (0, 2, -1.0), (0, 3, -3.0),
                                          (1, 2, 8.0), (1, 3, -1.0), (2, 3, 2.0)]);
        let summary = forest.solve();
        assert_eq!(summary.pairs, vec![(0, 1), (2, 3)]);
        assert_eq!(summary.weight, -5.0);
    }

    #[test]
    fn negative_weight_partial_matching() {
        let mut forest = Forest::new(4, &[(0, 1, 10.0), (1, 3, -5.0)]);
        let summary = forest.solve();
        assert_eq!(summary.pairs, vec![(1, 3)]);
        assert_eq!(summary.weight, -5.0);
        assert!(!summary.is_complete());
    }

    #[test]
    fn rounding_on_large_weights_is_tolerated() {
        let mut forest = Forest::new(2, &[(0, 1, 1e11)]);
        forest.flower_mut(0).power = 5e10 + 1e-5;
        forest.flower_mut(1).power = 5e10;
        forest.edge_mut(0).kind = EdgeKind::FullInPairing;
        forest.verify_optimum();
    }

    #[test]
    #[should_panic(expected = "negative slack")]
    fn overfull_edge_is_caught() {
        let mut forest = Forest::new(2, &[(0, 1, 1.0)]);
        forest.flower_mut(0).power = 2.0;
        forest.verify_optimum();
    }
}
