// Weighted matching in general graphs with a blossom forest.

// Every vertex carries a dual variable, its "power". Powers rise
// continuously, and an edge becomes usable ("full") once the powers of the
// flowers around it add up to its weight. Flowers are single vertices
// ("blue") or contracted odd cycles of flowers ("green", blossoms).
// Free flowers are grouped into alternating trees and matched pairs
// ("dumbbells"). Each time the powers stop, the forest changes shape:
// an odd blossom with no power left is burst, a dumbbell is appended to a
// tree, an odd cycle within a tree is contracted into a blossom, or two trees
// are joined by a new matched edge and fall apart into dumbbells.

// The algorithm is based on the "blossom" method for finding augmenting
// paths and the "primal-dual" method for weighted matching, both due to
// Jack Edmonds.

// Edges are (i, j, wt) with vertices numbered 0 .. (n-1); no vertex has an
// edge to itself. Since every matched edge is tight and no edge may be
// overfull, the matching found is one of minimum weight among the perfect
// matchings, if the graph has one.

pub mod forest;
pub mod schedule;
pub mod reorder;
pub mod actions;
pub mod solve;
pub mod io;
pub mod error;

pub use actions::Action;
pub use error::{Error, Result};
pub use forest::{EdgeId, EdgeKind, FlowerId, FlowerKind, Forest, Vertex, Weight, WeightedEdge};
pub use io::{format_matching, parse_graph, read_graph, Graph};
pub use reorder::reorder;
pub use schedule::{Event, Step};
pub use solve::{Stats, Summary};
