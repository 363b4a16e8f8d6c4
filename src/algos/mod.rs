pub use self::algo::Algo;
pub use self::greedy::Greedy;
pub use self::optimal::{Optimal, SolveBudget};

mod algo;
mod greedy;
mod optimal;
