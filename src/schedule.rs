// Dual step selection: how far the powers can move before the forest has
// to change shape.

use crate::forest::{EdgeId, FlowerId, FlowerKind, Forest, Weight};

/// What becomes possible once the powers moved by a step's epsilon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The edge has no slack left.
    Tighten(EdgeId),
    /// The odd blossom has no power left.
    Burst(FlowerId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub epsilon: Weight,
    pub event:   Event,
}

impl Forest {
    /// Smallest epsilon that makes some non-full edge tight, and that edge.
    /// Edges whose slack does not shrink are never candidates.
    pub fn min_edge_epsilon(&self) -> Option<(Weight, EdgeId)> {
        let mut best: Option<(Weight, EdgeId)> = None;
        for k in 0..self.edges.len() {
            if self.edges[k].kind.is_full() {
                continue;
            }
            let rate = self.rate(k);
            if rate <= 0 {
                continue;
            }
            // Negative slack here is rounding noise on an edge that is already tight.
            let d = self.slack(k).max(0.0) / rate as Weight;
            if best.map_or(true, |(delta, _)| d < delta) {
                best = Some((d, k));
            }
        }
        best
    }

    /// Smallest power among odd blossoms, and that blossom.
    pub fn min_green_epsilon(&self) -> Option<(Weight, FlowerId)> {
        let mut best: Option<(Weight, FlowerId)> = None;
        for f in self.flower_ids() {
            let flower = self.flower(f);
            if flower.kind != FlowerKind::OddInTree || !flower.is_green() {
                continue;
            }
            if best.map_or(true, |(delta, _)| flower.power < delta) {
                best = Some((flower.power, f));
            }
        }
        best
    }

    /// The next step, or None once no power can move any more.
    /// On a tie the edge wins over the blossom.
    pub fn next_step(&self) -> Option<Step> {
        match (self.min_edge_epsilon(), self.min_green_epsilon()) {
            (Some((de, _)), Some((dg, g))) if de > dg => Some(Step { epsilon: dg, event: Event::Burst(g) }),
            (None, Some((dg, g)))  => Some(Step { epsilon: dg, event: Event::Burst(g) }),
            (Some((de, k)), _)     => Some(Step { epsilon: de, event: Event::Tighten(k) }),
            (None, None)           => None,
        }
    }

    /// Raise even tree flowers and lower odd ones by epsilon.
    pub fn apply_epsilon(&mut self, epsilon: Weight) {
        for slot in self.flowers.iter_mut() {
            if let Some(flower) = slot {
                match flower.kind {
                    FlowerKind::EvenInTree => flower.power += epsilon,
                    FlowerKind::OddInTree  => flower.power -= epsilon,
                    _ => {}
                }
            }
        }
    }
}
