//! Tradecut - barter trade matching as weighted max-cut.
//!
//! Items and pairwise trade desires form a weighted graph. Splitting the
//! items into a "keep" group and a "trade" group so that the total weight of
//! desires crossing the split is maximal is a max-cut problem, posed here as
//! a QUBO and handed to a pluggable optimizer.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Pure types: `TradeGraph`, `Qubo`, `QuboFormulator`,
//!   `SolutionInterpreter`, `TradeResult`
//! - **`port`** - Traits the core depends on: `QuboOptimizer`, `Renderer`
//! - **`adapter`** - Port implementations
//!   - `ExhaustiveOptimizer` - Gray-code brute force for small problems
//!   - `AnnealingOptimizer` - Classical simulated annealing
//!   - `HighsOptimizer` - Exact linearized solve via good_lp (requires `highs` feature)
//!   - `SapiOptimizer` - Remote quantum annealing service over HTTPS
//!   - `DotRenderer` - Graphviz output
//!   - the `tradecut` CLI
//! - **`application`** - `TradeNetworkSolver` use case and caller-side retry
//! - **`infrastructure`** - TOML configuration and component factories
//!
//! # Features
//!
//! - `highs` (default) - Enable the HiGHS backend
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tradecut::adapter::outbound::optimizer::ExhaustiveOptimizer;
//! use tradecut::application::TradeNetworkSolver;
//! use tradecut::port::SolverConfig;
//!
//! # async fn example() -> tradecut::error::Result<()> {
//! let mut solver =
//!     TradeNetworkSolver::new(Arc::new(ExhaustiveOptimizer::new()), SolverConfig::default());
//! solver.add_trade_desire("Alice_Bike", "Bob_Laptop")?;
//! solver.add_trade_desire("Bob_Laptop", "Charlie_Guitar")?;
//!
//! let (result, energy) = solver.solve().await?;
//! assert_eq!(result.total_cut_weight, -energy);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
